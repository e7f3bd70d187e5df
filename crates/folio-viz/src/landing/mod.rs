#![forbid(unsafe_code)]

//! Landing orchestrator.
//!
//! Composes the two independently animated layers, the rotating emblem and
//! the radiating section nodes, on one canvas under a single frame handle,
//! and owns the hand-off into the content view. Selection emits
//! [`AppEvent::LandingComplete`] and delegates the surface swap to
//! [`folio_runtime::enter_content`]; the app cleans the landing up when it
//! observes the store's view transition.

pub mod emblem;
pub mod frames;
pub mod network;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use folio_core::events::{AppEvent, EventBus};
use folio_core::geometry::{Rect, Vec2};
use folio_core::input::{InputEvent, Key, MouseKind};
use folio_core::schedule::{FrameHandle, SharedScheduler};
use folio_core::state::TabId;
use folio_render::buffer::Buffer;
use folio_render::canvas::{PX_PER_CELL_X, PX_PER_CELL_Y, Painter};
use folio_render::cell::CellAttrs;
use folio_runtime::{SharedPanels, SharedRouter, enter_content};

use crate::theme;
use emblem::Emblem;
use network::NodeWeb;

/// Shared landing handle, owned by the app.
pub type SharedLanding = Rc<RefCell<Landing>>;

/// The landing surface.
pub struct Landing {
    emblem: Emblem,
    web: NodeWeb,
    painter: Painter,
    area: Rect,
    frames: Option<FrameHandle>,
    bus: EventBus,
    scheduler: SharedScheduler,
    router: SharedRouter,
    panels: SharedPanels,
}

impl Landing {
    pub fn new(
        bus: EventBus,
        scheduler: SharedScheduler,
        router: SharedRouter,
        panels: SharedPanels,
    ) -> SharedLanding {
        Rc::new(RefCell::new(Self {
            emblem: Emblem::new(),
            web: NodeWeb::new(),
            painter: Painter::new(0, 0),
            area: Rect::default(),
            frames: None,
            bus,
            scheduler,
            router,
            panels,
        }))
    }

    /// Size the layers against the landing surface.
    pub fn init(&mut self, area: Rect) {
        self.area = area;
        self.painter = Painter::for_area(area);
        self.emblem.init(area);

        let (cx, cy) = self.emblem.center_cell(area);
        let center = Vec2::new(
            ((cx - area.x) * PX_PER_CELL_X) as f32,
            ((cy - area.y) * PX_PER_CELL_Y) as f32,
        );
        let size = Vec2::new(
            (area.width * PX_PER_CELL_X) as f32,
            (area.height * PX_PER_CELL_Y) as f32,
        );
        self.web.init(center, self.emblem.radius_px(area), size);
    }

    /// Start the animation loop. Safe to call repeatedly; a live handle is
    /// reused rather than double-started.
    pub fn render(&mut self) {
        if self.frames.as_ref().is_some_and(FrameHandle::is_active) {
            return;
        }
        self.frames = Some(self.scheduler.borrow_mut().request_frames());
        self.bus.emit(AppEvent::LandingEnter);
        self.bus.emit(AppEvent::AnimationStart);
    }

    /// Draw one frame. A no-op once the handle is cancelled.
    pub fn frame(&mut self, buf: &mut Buffer, dt: Duration) {
        if !self.frames.as_ref().is_some_and(FrameHandle::is_active) {
            return;
        }
        self.emblem.update(dt);
        self.web.update(dt);

        self.painter.clear();
        self.web.render(&mut self.painter);
        self.painter.blit(buf, self.area, theme::FG);
        self.emblem.render(buf, self.area);
        self.web.render_labels(buf, self.area);

        let fading = self.panels.borrow().landing_fading;
        if fading {
            dim_area(buf, self.area);
        } else {
            let hint = "click a node, or press 1 / 2 / 3";
            let x = self.area.x + self.area.width.saturating_sub(hint.len() as u16) / 2;
            let y = self.area.bottom().saturating_sub(2);
            buf.print_text_clipped(x, y, hint, theme::DIM, CellAttrs::empty(), self.area.right());
        }
    }

    /// Pointer and keyboard interaction.
    pub fn input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Mouse(mouse) => {
                let Some(point) = Painter::cell_to_px(self.area, mouse.x, mouse.y) else {
                    return;
                };
                match mouse.kind {
                    MouseKind::Moved => {
                        self.web.hover(point);
                    }
                    MouseKind::Down(_) => {
                        if let Some(tab) = self.web.section_at(point) {
                            self.select(tab);
                        }
                    }
                    _ => {}
                }
            }
            InputEvent::Key(Key::Char(c)) => {
                let tab = match c {
                    '1' => Some(TabId::Work),
                    '2' => Some(TabId::Writing),
                    '3' => Some(TabId::Fun),
                    _ => None,
                };
                if let Some(tab) = tab {
                    self.select(tab);
                }
            }
            InputEvent::Key(Key::Enter) => {
                if let Some(tab) = self.web.hovered() {
                    self.select(tab);
                }
            }
            InputEvent::Resize { .. } => {
                let area = self.panels.borrow().landing_area;
                self.init(area);
            }
            _ => {}
        }
    }

    /// Section selected: announce, then hand off to the router.
    fn select(&mut self, tab: TabId) {
        if self.panels.borrow().landing_fading {
            return;
        }
        tracing::info!(%tab, "landing section selected");
        self.bus.emit(AppEvent::LandingComplete { section: Some(tab) });
        enter_content(&self.router, tab);
    }

    /// Stop the loop and release the handle. Re-enterable via `init` +
    /// `render`.
    pub fn cleanup(&mut self) {
        if let Some(handle) = self.frames.take() {
            handle.cancel();
        }
        self.bus.emit(AppEvent::AnimationEnd);
    }

    /// Whether the animation loop is running.
    pub fn is_running(&self) -> bool {
        self.frames.as_ref().is_some_and(FrameHandle::is_active)
    }
}

fn dim_area(buf: &mut Buffer, area: Rect) {
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                if !cell.fg.is_default() {
                    cell.fg = cell.fg.scale(0.4);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::events::EventKind;
    use folio_core::input::{Mouse, MouseButton};
    use folio_core::schedule::{Scheduler, advance_shared};
    use folio_core::state::{StateStore, View};
    use folio_runtime::{Ctx, Panels, Router, TabComponent};
    use std::path::PathBuf;

    struct Probe;
    impl TabComponent for Probe {
        fn init(&mut self, _ctx: &mut Ctx<'_>) {}
        fn render(&mut self, _ctx: &mut Ctx<'_>) {}
        fn cleanup(&mut self) {}
    }

    fn fixture() -> (SharedLanding, EventBus, Rc<StateStore>, folio_core::schedule::SharedScheduler) {
        let bus = EventBus::new();
        let state = StateStore::new(bus.clone());
        let scheduler = Scheduler::shared();
        let panels = Panels::shared();
        let area = Rect::new(0, 0, 80, 24);
        {
            let mut p = panels.borrow_mut();
            p.landing_area = area;
            p.register(TabId::Work, Rect::new(0, 2, 80, 22));
            p.register(TabId::Writing, Rect::new(0, 2, 80, 22));
            p.register(TabId::Fun, Rect::new(0, 2, 80, 22));
        }
        let router = Router::new(
            Rc::clone(&state),
            bus.clone(),
            Rc::clone(&scheduler),
            Rc::clone(&panels),
            PathBuf::from("content"),
        );
        for tab in TabId::ALL {
            router.borrow_mut().register(tab, Box::new(Probe));
        }
        let landing = Landing::new(bus.clone(), Rc::clone(&scheduler), router, panels);
        landing.borrow_mut().init(area);
        (landing, bus, state, scheduler)
    }

    #[test]
    fn render_starts_loop_once() {
        let (landing, bus, _state, scheduler) = fixture();
        let starts = Rc::new(RefCell::new(0));
        let starts2 = Rc::clone(&starts);
        let _sub = bus.on(EventKind::AnimationStart, move |_| *starts2.borrow_mut() += 1);

        landing.borrow_mut().render();
        landing.borrow_mut().render();
        assert_eq!(*starts.borrow(), 1);
        assert!(landing.borrow().is_running());
        assert_eq!(scheduler.borrow_mut().active_frame_count(), 1);
    }

    #[test]
    fn cleanup_cancels_loop_and_is_reenterable() {
        let (landing, _bus, _state, scheduler) = fixture();
        landing.borrow_mut().render();
        landing.borrow_mut().cleanup();
        assert!(!landing.borrow().is_running());
        assert_eq!(scheduler.borrow_mut().active_frame_count(), 0);

        // Frames after cleanup draw nothing.
        let mut buf = Buffer::new(80, 24);
        landing
            .borrow_mut()
            .frame(&mut buf, Duration::from_millis(16));
        assert!(buf == Buffer::new(80, 24));

        landing.borrow_mut().render();
        assert!(landing.borrow().is_running());
    }

    #[test]
    fn frames_draw_the_scene() {
        let (landing, _bus, _state, _scheduler) = fixture();
        landing.borrow_mut().render();
        let mut buf = Buffer::new(80, 24);
        for _ in 0..80 {
            buf.clear();
            landing
                .borrow_mut()
                .frame(&mut buf, Duration::from_millis(16));
        }
        let lit = (0..24)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get(x, y).unwrap().ch != ' ')
            .count();
        assert!(lit > 30, "landing frame too sparse: {lit}");
    }

    #[test]
    fn keyboard_selection_enters_content() {
        let (landing, bus, state, scheduler) = fixture();
        landing.borrow_mut().render();

        let sections = Rc::new(RefCell::new(Vec::new()));
        let sections2 = Rc::clone(&sections);
        let _sub = bus.on(EventKind::LandingComplete, move |event| {
            if let AppEvent::LandingComplete { section } = event {
                sections2.borrow_mut().push(*section);
            }
        });

        landing
            .borrow_mut()
            .input(&InputEvent::Key(Key::Char('2')));
        advance_shared(&scheduler, Duration::from_millis(501));
        advance_shared(&scheduler, Duration::from_millis(151));

        assert_eq!(state.get().view, View::Content);
        assert_eq!(state.get().tab, TabId::Writing);
        // Selection announced with the section, then the store's targeted
        // emission on the view change.
        assert_eq!(
            *sections.borrow(),
            vec![Some(TabId::Writing), None]
        );
    }

    #[test]
    fn click_on_a_node_selects_its_section() {
        let (landing, _bus, state, scheduler) = fixture();
        landing.borrow_mut().render();
        // Finish the draw-in so nodes are present.
        let mut buf = Buffer::new(80, 24);
        for _ in 0..80 {
            landing
                .borrow_mut()
                .frame(&mut buf, Duration::from_millis(16));
        }

        // Click the fun node, translated from canvas space to cells.
        let (node_x, node_y) = {
            let landing_ref = landing.borrow();
            let fun = &landing_ref.web.nodes()[2];
            (
                landing_ref.area.x + (fun.pos.x / PX_PER_CELL_X as f32) as u16,
                landing_ref.area.y + (fun.pos.y / PX_PER_CELL_Y as f32) as u16,
            )
        };
        landing.borrow_mut().input(&InputEvent::Mouse(Mouse {
            kind: MouseKind::Down(MouseButton::Left),
            x: node_x,
            y: node_y,
        }));
        advance_shared(&scheduler, Duration::from_millis(501));
        advance_shared(&scheduler, Duration::from_millis(151));
        assert_eq!(state.get().tab, TabId::Fun);
    }

    #[test]
    fn selection_while_fading_is_ignored() {
        let (landing, bus, _state, _scheduler) = fixture();
        landing.borrow_mut().render();

        let hits = Rc::new(RefCell::new(0));
        let hits2 = Rc::clone(&hits);
        let _sub = bus.on(EventKind::LandingComplete, move |_| *hits2.borrow_mut() += 1);

        landing.borrow_mut().input(&InputEvent::Key(Key::Char('1')));
        landing.borrow_mut().input(&InputEvent::Key(Key::Char('3')));
        assert_eq!(*hits.borrow(), 1);
    }
}
