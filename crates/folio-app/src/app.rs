#![forbid(unsafe_code)]

//! Application wiring and the main loop.
//!
//! `build` assembles the world: bus, store, scheduler, panels, router with
//! the three tab components, nav bar, and landing orchestrator. `run` owns
//! the terminal and drives everything: translated events dispatch first,
//! timers fire, then one frame is drawn and presented.

use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event as cte;

use folio_core::events::{AppEvent, EventBus, EventKind, Subscription};
use folio_core::geometry::Rect;
use folio_core::input::{InputEvent, Key};
use folio_core::schedule::{Scheduler, SharedScheduler, advance_shared};
use folio_core::state::{BlogView, StateStore, StateSubscription, StateUpdate, TabId, View};
use folio_render::buffer::Buffer;
use folio_render::cell::CellAttrs;
use folio_render::presenter::Presenter;
use folio_runtime::{Panels, Router, SharedPanels, SharedRouter, activate_direct, install};
use folio_viz::landing::{Landing, SharedLanding};
use folio_viz::nav::{SharedTabNav, TabNav};
use folio_viz::{Collage, Timeline, WritingNetwork, theme};

use crate::cli::Args;
use crate::input;
use crate::terminal::TerminalSession;

/// Everything the main loop touches.
pub(crate) struct World {
    pub bus: EventBus,
    pub state: Rc<StateStore>,
    pub scheduler: SharedScheduler,
    pub panels: SharedPanels,
    pub router: SharedRouter,
    pub nav: SharedTabNav,
    pub landing: SharedLanding,
    _bus_subs: Vec<Subscription>,
    _state_subs: Vec<StateSubscription>,
}

pub(crate) fn build(args: &Args, width: u16, height: u16) -> World {
    let bus = EventBus::new();
    let state = StateStore::new(bus.clone());
    let scheduler = Scheduler::shared();
    let panels = Panels::shared();

    let router = Router::new(
        Rc::clone(&state),
        bus.clone(),
        Rc::clone(&scheduler),
        Rc::clone(&panels),
        args.content_dir.clone(),
    );
    install(&router);
    {
        let mut r = router.borrow_mut();
        r.register(TabId::Work, Box::new(Timeline::new()));
        r.register(TabId::Writing, Box::new(WritingNetwork::new()));
        r.register(TabId::Fun, Box::new(Collage::new()));
    }

    let nav = TabNav::new(Rc::clone(&state), bus.clone());
    TabNav::install(&nav);

    let landing = Landing::new(
        bus.clone(),
        Rc::clone(&scheduler),
        Rc::clone(&router),
        Rc::clone(&panels),
    );

    layout_surfaces(&panels, &nav, width, height);
    let landing_area = panels.borrow().landing_area;
    landing.borrow_mut().init(landing_area);

    let mut bus_subs = Vec::new();
    {
        let post_state = Rc::clone(&state);
        bus_subs.push(bus.on(EventKind::PostSelected, move |event| {
            if let AppEvent::PostSelected { id } = event {
                post_state.set(
                    StateUpdate::new()
                        .current_post(Some(id.clone()))
                        .blog_view(BlogView::Single),
                );
            }
        }));
        let close_state = Rc::clone(&state);
        bus_subs.push(bus.on(EventKind::PostClosed, move |_| {
            close_state.set(
                StateUpdate::new()
                    .current_post(None)
                    .blog_view(BlogView::List),
            );
        }));
        bus_subs.push(bus.on(EventKind::LandingComplete, |event| {
            if let AppEvent::LandingComplete { section } = event {
                tracing::info!(?section, "landing complete");
            }
        }));
    }

    let mut state_subs = Vec::new();
    {
        let fading_landing = Rc::clone(&landing);
        state_subs.push(state.subscribe(move |change| {
            if change.old.view == View::Landing && change.new.view == View::Content {
                if let Ok(mut landing) = fading_landing.try_borrow_mut() {
                    landing.cleanup();
                }
            }
        }));
    }

    World {
        bus,
        state,
        scheduler,
        panels,
        router,
        nav,
        landing,
        _bus_subs: bus_subs,
        _state_subs: state_subs,
    }
}

/// Recompute every surface for a terminal size.
pub(crate) fn layout_surfaces(panels: &SharedPanels, nav: &SharedTabNav, width: u16, height: u16) {
    {
        let mut p = panels.borrow_mut();
        p.landing_area = Rect::from_size(width, height);
        let panel_area = Rect::new(0, 3, width, height.saturating_sub(3));
        for tab in TabId::ALL {
            p.register(tab, panel_area);
        }
    }
    nav.borrow_mut().layout(Rect::new(0, 1, width, 1));
}

pub fn run(args: Args) -> io::Result<()> {
    let mut session = TerminalSession::new()?;
    let result = run_loop(&args, &session);
    session.restore()?;
    result
}

fn run_loop(args: &Args, session: &TerminalSession) -> io::Result<()> {
    let (width, height) = session.size()?;
    let world = build(args, width, height);

    if args.skip_landing {
        activate_direct(&world.router, args.tab.unwrap_or_default());
    } else {
        world.landing.borrow_mut().render();
    }

    let mut presenter = Presenter::new(io::BufWriter::new(io::stdout()));
    let mut buf = Buffer::new(width, height);
    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let mut last_frame = Instant::now();

    loop {
        let deadline = last_frame + frame_budget;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !cte::poll(timeout)? {
                break;
            }
            match cte::read()? {
                cte::Event::Key(key) if input::is_quit(&key) => return Ok(()),
                raw => {
                    if let Some(event) = input::translate(raw) {
                        dispatch(&world, &event, &mut buf, &mut presenter);
                    }
                }
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame);
        last_frame = now;

        advance_shared(&world.scheduler, dt);
        draw(&world, &mut buf, dt);
        presenter.present(&buf)?;
    }
}

pub(crate) fn dispatch<W: Write>(
    world: &World,
    event: &InputEvent,
    buf: &mut Buffer,
    presenter: &mut Presenter<W>,
) {
    if let InputEvent::Resize { width, height } = event {
        buf.resize(*width, *height);
        presenter.invalidate();
        layout_surfaces(&world.panels, &world.nav, *width, *height);
        if world.panels.borrow().landing_visible {
            world.landing.borrow_mut().input(event);
        }
        folio_runtime::dispatch_input(&world.router, event);
        return;
    }

    if world.panels.borrow().landing_visible {
        world.landing.borrow_mut().input(event);
        return;
    }

    if let InputEvent::Key(Key::Escape) = event {
        if world.state.get().current_post.is_some() {
            world.bus.emit(AppEvent::PostClosed);
            return;
        }
    }
    world.nav.borrow_mut().input(event);
    folio_runtime::dispatch_input(&world.router, event);
}

pub(crate) fn draw(world: &World, buf: &mut Buffer, dt: Duration) {
    buf.clear();
    let (landing_visible, content_visible) = {
        let panels = world.panels.borrow();
        (panels.landing_visible, panels.content_visible)
    };

    if landing_visible {
        world.landing.borrow_mut().frame(buf, dt);
    }
    if content_visible {
        draw_chrome(buf);
        world.nav.borrow_mut().tick();
        world.nav.borrow().draw(buf);
        folio_runtime::frame(&world.router, buf, dt);
    }
}

fn draw_chrome(buf: &mut Buffer) {
    buf.print_text(1, 0, "folio", theme::FG, CellAttrs::BOLD);
    let hint = "tab / 1-3 switch \u{00B7} q quit";
    let x = buf.width().saturating_sub(hint.chars().count() as u16 + 1);
    buf.print_text(x, 0, hint, theme::DIM, CellAttrs::empty());
    for x in 0..buf.width() {
        buf.set(
            x,
            2,
            folio_render::cell::Cell::from_char('\u{2500}').fg(theme::EDGE),
        );
    }
}
