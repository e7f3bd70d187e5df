#![forbid(unsafe_code)]

//! Writing network.
//!
//! Scatter-laid shimmering orbs, one per writing item, connected to their
//! nearest neighbors plus a handful of seeded cross-links. Hover grows the
//! orb, accents it, and shows a tooltip; a click opens the item's link and
//! announces the selection. Fixed seeds keep the layout identical across
//! runs for the same content.

use std::time::Duration;

use folio_content::{WritingContent, WritingItem, load};
use folio_core::events::AppEvent;
use folio_core::geometry::{Rect, Vec2};
use folio_core::input::{InputEvent, MouseKind};
use folio_core::rng::Lcg;
use folio_core::schedule::FrameHandle;
use folio_core::state::TabId;
use folio_layout::edges::{Edge, cross_links, nearest_neighbor_edges};
use folio_layout::hit::hit_circle;
use folio_layout::scatter::{ScatterParams, scatter};
use folio_render::buffer::Buffer;
use folio_render::canvas::{PX_PER_CELL_X, PX_PER_CELL_Y, Painter};
use folio_render::cell::CellAttrs;
use folio_runtime::{Ctx, TabComponent};

use crate::theme;

/// Layout seed; cross-links use their own.
const LAYOUT_SEED: u64 = 42;
const CROSS_LINK_SEED: u64 = 123;

/// Orb radius in canvas sub-pixels.
const NODE_RADIUS: f32 = 4.0;
/// Extra hit slack around an orb.
const HIT_SLACK: f32 = 3.0;
/// Neighbors per node.
const NEIGHBORS: usize = 3;

#[derive(Debug)]
struct Node {
    item: WritingItem,
    pos: Vec2,
    shimmer_offset: f32,
}

/// The writing tab component.
pub struct WritingNetwork {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    hovered: Option<usize>,
    frames: Option<FrameHandle>,
    time: f32,
    painter: Painter,
}

impl WritingNetwork {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            hovered: None,
            frames: None,
            time: 0.0,
            painter: Painter::new(0, 0),
        }
    }

    fn scatter_params() -> ScatterParams {
        ScatterParams {
            padding: 14.0,
            min_spacing: NODE_RADIUS * 4.0,
            max_attempts: 200,
            ring_scale: 0.35,
            ring_offset: 10.0,
            jitter: 24.0,
        }
    }

    /// Recompute positions and edges for the current area. Seeded, so the
    /// same content and size always produce the same picture.
    fn layout(&mut self, area: Rect) {
        self.painter = Painter::for_area(area);
        let width = self.painter.width() as f32;
        let height = self.painter.height() as f32;

        let mut rng = Lcg::new(LAYOUT_SEED);
        let positions = scatter(
            self.nodes.len(),
            width,
            height,
            &Self::scatter_params(),
            &mut rng,
        );
        for (node, pos) in self.nodes.iter_mut().zip(positions) {
            node.pos = pos;
            node.shimmer_offset = rng.next_f32() * std::f32::consts::TAU;
        }

        self.edges = nearest_neighbor_edges(
            &self.nodes.iter().map(|n| n.pos).collect::<Vec<_>>(),
            NEIGHBORS,
        );
        let mut link_rng = Lcg::new(CROSS_LINK_SEED);
        cross_links(&mut self.edges, self.nodes.len(), &mut link_rng);
    }

    fn node_at(&self, point: Vec2) -> Option<usize> {
        hit_circle(
            self.nodes.iter().map(|n| (n.pos, NODE_RADIUS)),
            point,
            HIT_SLACK,
        )
    }

    fn draw_tooltip(&self, buf: &mut Buffer, area: Rect, index: usize) {
        let node = &self.nodes[index];
        let title = node.item.title.as_str();
        let meta = match (node.item.kind.is_empty(), node.item.date.is_empty()) {
            (false, false) => format!("{} \u{00B7} {}", node.item.kind, node.item.date),
            (false, true) => node.item.kind.clone(),
            (true, false) => node.item.date.clone(),
            (true, true) => String::new(),
        };
        let width = title.chars().count().max(meta.chars().count()) as u16 + 2;

        let cell_x = area.x + (node.pos.x / PX_PER_CELL_X as f32) as u16;
        let cell_y = area.y + (node.pos.y / PX_PER_CELL_Y as f32) as u16;
        let x = (cell_x + 3).min(area.right().saturating_sub(width));
        let y = cell_y
            .saturating_sub(1)
            .clamp(area.y, area.bottom().saturating_sub(2));

        buf.print_text_clipped(x, y, title, theme::FG, CellAttrs::BOLD, area.right());
        if !meta.is_empty() {
            buf.print_text_clipped(x, y + 1, &meta, theme::DIM, CellAttrs::empty(), area.right());
        }
    }
}

impl Default for WritingNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TabComponent for WritingNetwork {
    fn init(&mut self, ctx: &mut Ctx<'_>) {
        let path = ctx.content_dir.join("writing.json");
        let content: WritingContent = match load(&path) {
            Ok(content) => {
                ctx.bus.emit(AppEvent::ContentLoaded {
                    tab: TabId::Writing,
                });
                content
            }
            Err(err) => {
                tracing::warn!(error = %err, "writing content failed, rendering empty");
                ctx.bus.emit(AppEvent::ContentError {
                    tab: TabId::Writing,
                    message: err.to_string(),
                });
                WritingContent::default()
            }
        };
        self.nodes = content
            .items
            .into_iter()
            .map(|item| Node {
                item,
                pos: Vec2::ZERO,
                shimmer_offset: 0.0,
            })
            .collect();
        self.layout(ctx.area);
        self.time = 0.0;
    }

    fn render(&mut self, ctx: &mut Ctx<'_>) {
        // A live loop means this is a redundant render; just refresh layout
        // for a possibly new container.
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
        self.time += dt.as_secs_f32();
        self.painter.clear();

        for edge in &self.edges {
            let a = self.nodes[edge.a].pos;
            let b = self.nodes[edge.b].pos;
            self.painter
                .line(a.x as i32, a.y as i32, b.x as i32, b.y as i32, Some(theme::EDGE));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let hovered = self.hovered == Some(index);
            let radius = if hovered {
                NODE_RADIUS + 1.0
            } else {
                NODE_RADIUS
            };
            let color = if hovered {
                theme::ACCENT
            } else {
                let shimmer = 0.85 + 0.15 * (self.time * 2.0 + node.shimmer_offset).sin();
                theme::MID.scale(shimmer)
            };
            self.painter
                .disc(node.pos.x as i32, node.pos.y as i32, radius as i32, Some(color));
            if hovered {
                self.painter.circle(
                    node.pos.x as i32,
                    node.pos.y as i32,
                    (radius + 2.0) as i32,
                    Some(theme::ACCENT.scale(0.6)),
                );
            }
        }

        self.painter.blit(buf, area, theme::MID);

        if let Some(index) = self.hovered {
            self.draw_tooltip(buf, area, index);
        }

        if self.nodes.is_empty() {
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
                            let node = &self.nodes[index];
                            ctx.bus.emit(AppEvent::PostSelected {
                                id: node.item.id.clone(),
                            });
                            if let Some(url) = node.item.url.clone() {
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
