#![forbid(unsafe_code)]

//! Fun collage.
//!
//! Image entries become labelled boxes laid out by a continuously relaxing
//! force simulation: seeded scatter for the initial placement, nearest
//! neighbors plus seeded cross-links as springs, one relaxation step per
//! frame. Boxes render grayscale and colorize on hover; a click opens the
//! image's link.

use std::time::Duration;

use folio_content::{CollageImage, FunContent, Span, load};
use folio_core::events::AppEvent;
use folio_core::geometry::{Rect, Vec2};
use folio_core::input::{InputEvent, MouseKind};
use folio_core::rng::Lcg;
use folio_core::schedule::FrameHandle;
use folio_core::state::TabId;
use folio_layout::edges::{Edge, cross_links, nearest_neighbor_edges};
use folio_layout::force::{ForceParams, ForceSim};
use folio_layout::hit::hit_rect;
use folio_layout::scatter::{ScatterParams, scatter};
use folio_render::buffer::Buffer;
use folio_render::canvas::{PX_PER_CELL_X, PX_PER_CELL_Y, Painter};
use folio_render::cell::{Cell, CellAttrs, Rgba};
use folio_runtime::{Ctx, TabComponent};

use crate::theme;

const LAYOUT_SEED: u64 = 42;
const CROSS_LINK_SEED: u64 = 123;
const NEIGHBORS: usize = 3;

/// Box size in cells per span.
fn box_cells(span: Span) -> (u16, u16) {
    match span {
        Span::Small => (8, 3),
        Span::Medium => (12, 4),
        Span::Large => (16, 5),
    }
}

/// Half extents in canvas sub-pixels.
fn half_extents(span: Span) -> Vec2 {
    let (w, h) = box_cells(span);
    Vec2::new(
        (w * PX_PER_CELL_X) as f32 / 2.0,
        (h * PX_PER_CELL_Y) as f32 / 2.0,
    )
}

/// The fun tab component.
pub struct Collage {
    images: Vec<CollageImage>,
    sim: ForceSim,
    edges: Vec<Edge>,
    hovered: Option<usize>,
    frames: Option<FrameHandle>,
    painter: Painter,
}

impl Collage {
    pub fn new() -> Self {
        Self {
            images: Vec::new(),
            sim: ForceSim::new(Vec::new(), ForceParams::default()),
            edges: Vec::new(),
            hovered: None,
            frames: None,
            painter: Painter::new(0, 0),
        }
    }

    fn force_params() -> ForceParams {
        ForceParams {
            center_pull: 0.5,
            repulsion: 90_000.0,
            max_repulsion: 350.0,
            spring: 1.6,
            rest_length: 42.0,
            damping: 0.85,
            max_speed: 120.0,
            padding: 20.0,
        }
    }

    /// Seed positions and springs for the current area.
    fn layout(&mut self, area: Rect) {
        self.painter = Painter::for_area(area);
        let width = self.painter.width() as f32;
        let height = self.painter.height() as f32;

        let params = ScatterParams {
            padding: 20.0,
            min_spacing: 30.0,
            max_attempts: 200,
            ring_scale: 0.35,
            ring_offset: 12.0,
            jitter: 30.0,
        };
        let mut rng = Lcg::new(LAYOUT_SEED);
        let positions = scatter(self.images.len(), width, height, &params, &mut rng);

        self.edges = nearest_neighbor_edges(&positions, NEIGHBORS);
        let mut link_rng = Lcg::new(CROSS_LINK_SEED);
        cross_links(&mut self.edges, positions.len(), &mut link_rng);

        self.sim = ForceSim::new(positions, Self::force_params());
    }

    fn node_at(&self, point: Vec2) -> Option<usize> {
        hit_rect(
            self.sim
                .positions()
                .iter()
                .zip(&self.images)
                .map(|(pos, image)| (*pos, half_extents(image.span))),
            point,
        )
    }

    fn draw_box(&self, buf: &mut Buffer, area: Rect, index: usize) {
        let image = &self.images[index];
        let pos = self.sim.positions()[index];
        let (w, h) = box_cells(image.span);
        let hovered = self.hovered == Some(index);

        let cx = area.x as i32 + (pos.x / PX_PER_CELL_X as f32) as i32;
        let cy = area.y as i32 + (pos.y / PX_PER_CELL_Y as f32) as i32;
        let x0 = cx - w as i32 / 2;
        let y0 = cy - h as i32 / 2;

        let border = if hovered { theme::ACCENT } else { theme::DIM };
        let label_color = if hovered { theme::FG } else { theme::DIM };

        for row in 0..h as i32 {
            for col in 0..w as i32 {
                let x = x0 + col;
                let y = y0 + row;
                if x < area.x as i32 || y < area.y as i32 {
                    continue;
                }
                let (x, y) = (x as u16, y as u16);
                if x >= area.right() || y >= area.bottom() {
                    continue;
                }
                let edge_row = row == 0 || row == h as i32 - 1;
                let edge_col = col == 0 || col == w as i32 - 1;
                let ch = match (edge_row, edge_col) {
                    (true, true) => '+',
                    (true, false) => '-',
                    (false, true) => '|',
                    (false, false) => ' ',
                };
                if ch != ' ' {
                    buf.set(x, y, Cell::from_char(ch).fg(border));
                } else {
                    buf.set(x, y, Cell::from_char(' ').bg(Rgba::gray(24)));
                }
            }
        }

        // Label centered inside.
        let label: String = image.alt.chars().take(w as usize - 2).collect();
        let label_y = cy;
        let label_x = cx - label.chars().count() as i32 / 2;
        if label_y >= area.y as i32 && (label_y as u16) < area.bottom() && label_x >= 0 {
            let attrs = if hovered {
                CellAttrs::BOLD
            } else {
                CellAttrs::empty()
            };
            buf.print_text_clipped(
                label_x.max(x0 + 1) as u16,
                label_y as u16,
                &label,
                label_color,
                attrs,
                ((x0 + w as i32 - 1).max(0) as u16).min(area.right()),
            );
        }
    }
}

impl Default for Collage {
    fn default() -> Self {
        Self::new()
    }
}

impl TabComponent for Collage {
    fn init(&mut self, ctx: &mut Ctx<'_>) {
        let path = ctx.content_dir.join("fun.json");
        let content: FunContent = match load(&path) {
            Ok(content) => {
                ctx.bus.emit(AppEvent::ContentLoaded { tab: TabId::Fun });
                content
            }
            Err(err) => {
                tracing::warn!(error = %err, "fun content failed, rendering empty");
                ctx.bus.emit(AppEvent::ContentError {
                    tab: TabId::Fun,
                    message: err.to_string(),
                });
                FunContent::default()
            }
        };
        self.images = content.images;
        self.layout(ctx.area);
    }

    fn render(&mut self, ctx: &mut Ctx<'_>) {
        if self.frames.as_ref().is_some_and(FrameHandle::is_active) {
            self.layout(ctx.area);
            return;
        }
        self.layout(ctx.area);
        self.frames = Some(ctx.scheduler.borrow_mut().request_frames());
        ctx.bus.emit(AppEvent::AnimationStart);
    }

    fn cleanup(&mut self) {
        if let Some(handle) = self.frames.take() {
            handle.cancel();
        }
        self.hovered = None;
    }

    fn frame(&mut self, buf: &mut Buffer, area: Rect, dt: Duration) {
        if !self.frames.as_ref().is_some_and(FrameHandle::is_active) {
            return;
        }
        if area.is_empty() {
            return;
        }

        let width = self.painter.width() as f32;
        let height = self.painter.height() as f32;
        self.sim.step(&self.edges, width, height, dt.as_secs_f32());

        self.painter.clear();
        for edge in &self.edges {
            let a = self.sim.positions()[edge.a];
            let b = self.sim.positions()[edge.b];
            self.painter
                .line(a.x as i32, a.y as i32, b.x as i32, b.y as i32, Some(theme::EDGE));
        }
        self.painter.blit(buf, area, theme::EDGE);

        for index in 0..self.images.len() {
            self.draw_box(buf, area, index);
        }

        if self.images.is_empty() {
            let msg = "nothing here yet";
            let x = area.x + area.width.saturating_sub(msg.len() as u16) / 2;
            let y = area.y + area.height / 2;
            buf.print_text_clipped(x, y, msg, theme::DIM, CellAttrs::empty(), area.right());
        }
    }

    fn input(&mut self, event: &InputEvent, ctx: &mut Ctx<'_>) {
        match event {
            InputEvent::Mouse(mouse) => {
                let Some(point) = Painter::cell_to_px(ctx.area, mouse.x, mouse.y) else {
                    if mouse.kind == MouseKind::Moved {
                        self.hovered = None;
                    }
                    return;
                };
                match mouse.kind {
                    MouseKind::Moved => {
                        self.hovered = self.node_at(point);
                    }
                    MouseKind::Down(_) => {
                        if let Some(index) = self.node_at(point) {
                            if let Some(url) = self.images[index].url.clone() {
                                crate::open_external(&url);
                            }
                        }
                    }
                    _ => {}
                }
            }
            InputEvent::Resize { .. } => {
                self.layout(ctx.area);
                self.hovered = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::events::{EventBus, EventKind};
    use folio_core::schedule::Scheduler;
    use folio_core::input::Mouse;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    const FUN_JSON: &str = r#"{
        "images": [
            {"id": "i1", "alt": "street", "span": "large"},
            {"id": "i2", "alt": "mountain", "span": "medium"},
            {"id": "i3", "alt": "cat", "span": "small"},
            {"id": "i4", "alt": "harbor", "span": "medium"}
        ]
    }"#;

    struct Fixture {
        bus: EventBus,
        scheduler: folio_core::schedule::SharedScheduler,
        dir: tempfile::TempDir,
        area: Rect,
    }

    impl Fixture {
        fn new(content: Option<&str>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            if let Some(body) = content {
                let mut file = std::fs::File::create(dir.path().join("fun.json")).unwrap();
                file.write_all(body.as_bytes()).unwrap();
            }
            Self {
                bus: EventBus::new(),
                scheduler: Scheduler::shared(),
                dir,
                area: Rect::new(0, 2, 100, 30),
            }
        }

        fn ctx(&self) -> Ctx<'_> {
            Ctx {
                area: self.area,
                bus: &self.bus,
                scheduler: &self.scheduler,
                content_dir: self.dir.path(),
            }
        }
    }

    fn mounted(fx: &Fixture) -> Collage {
        let mut collage = Collage::new();
        collage.init(&mut fx.ctx());
        collage.render(&mut fx.ctx());
        collage
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                text.push(buf.get(x, y).unwrap().ch);
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn init_seeds_nodes_edges_and_sim() {
        let fx = Fixture::new(Some(FUN_JSON));
        let collage = mounted(&fx);
        assert_eq!(collage.sim.len(), 4);
        assert!(!collage.edges.is_empty());

        let mut seen = std::collections::HashSet::new();
        for edge in &collage.edges {
            assert!(edge.a < edge.b);
            assert!(edge.b < 4);
            assert!(seen.insert(*edge));
        }
    }

    #[test]
    fn relaxation_keeps_nodes_bounded() {
        let fx = Fixture::new(Some(FUN_JSON));
        let mut collage = mounted(&fx);
        let mut buf = Buffer::new(100, 32);
        for _ in 0..300 {
            buf.clear();
            collage.frame(&mut buf, fx.area, Duration::from_millis(33));
        }
        let width = collage.painter.width() as f32;
        let height = collage.painter.height() as f32;
        for pos in collage.sim.positions() {
            assert!(pos.x.is_finite() && pos.y.is_finite());
            assert!(pos.x >= 0.0 && pos.x <= width);
            assert!(pos.y >= 0.0 && pos.y <= height);
        }
    }

    #[test]
    fn frames_draw_labelled_boxes() {
        let fx = Fixture::new(Some(FUN_JSON));
        let mut collage = mounted(&fx);
        let mut buf = Buffer::new(100, 32);
        for _ in 0..30 {
            buf.clear();
            collage.frame(&mut buf, fx.area, Duration::from_millis(33));
        }
        let text = buffer_text(&buf);
        assert!(text.contains("street"));
        assert!(text.contains("cat"));
    }

    #[test]
    fn hover_hits_box_extents() {
        let fx = Fixture::new(Some(FUN_JSON));
        let mut collage = mounted(&fx);
        let pos = collage.sim.positions()[0];
        let mx = fx.area.x + (pos.x / PX_PER_CELL_X as f32) as u16;
        let my = fx.area.y + (pos.y / PX_PER_CELL_Y as f32) as u16;
        collage.input(
            &InputEvent::Mouse(Mouse {
                kind: MouseKind::Moved,
                x: mx,
                y: my,
            }),
            &mut fx.ctx(),
        );
        assert_eq!(collage.hovered, Some(0));

        collage.input(
            &InputEvent::Mouse(Mouse {
                kind: MouseKind::Moved,
                x: fx.area.x,
                y: fx.area.y,
            }),
            &mut fx.ctx(),
        );
        assert!(collage.hovered.is_none() || collage.hovered != Some(0));
    }

    #[test]
    fn failed_load_degrades_and_reports() {
        let fx = Fixture::new(None);
        let errors = Rc::new(RefCell::new(0));
        let errors2 = Rc::clone(&errors);
        let _sub = fx.bus.on(EventKind::ContentError, move |_| *errors2.borrow_mut() += 1);

        let mut collage = mounted(&fx);
        assert!(collage.images.is_empty());
        assert_eq!(*errors.borrow(), 1);

        let mut buf = Buffer::new(100, 32);
        collage.frame(&mut buf, fx.area, Duration::from_millis(33));
        assert!(buffer_text(&buf).contains("nothing here yet"));
    }

    #[test]
    fn lifecycle_guards_hold() {
        let fx = Fixture::new(Some(FUN_JSON));
        let mut collage = mounted(&fx);
        collage.render(&mut fx.ctx());
        assert_eq!(fx.scheduler.borrow_mut().active_frame_count(), 1);

        collage.cleanup();
        assert_eq!(fx.scheduler.borrow_mut().active_frame_count(), 0);

        let mut buf = Buffer::new(100, 32);
        collage.frame(&mut buf, fx.area, Duration::from_millis(33));
        assert_eq!(buf, Buffer::new(100, 32));

        collage.render(&mut fx.ctx());
        assert_eq!(fx.scheduler.borrow_mut().active_frame_count(), 1);
    }
}
