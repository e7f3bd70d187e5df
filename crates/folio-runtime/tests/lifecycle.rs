//! Router lifecycle scenarios driven headlessly with mock components and a
//! manually advanced scheduler.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use folio_core::events::{AppEvent, EventBus, EventKind};
use folio_core::geometry::Rect;
use folio_core::schedule::{Scheduler, SharedScheduler, advance_shared};
use folio_core::state::{StateStore, TabId, View};
use folio_runtime::{
    Ctx, Panels, Router, SharedPanels, SharedRouter, TAB_EXIT_DELAY, TabComponent, activate_direct,
    enter_content, navigate,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Counts {
    init: u32,
    render: u32,
    cleanup: u32,
}

#[derive(Clone, Default)]
struct CountsHandle(Rc<RefCell<Counts>>);

impl CountsHandle {
    fn get(&self) -> Counts {
        self.0.borrow().clone()
    }
}

struct MockComponent {
    counts: CountsHandle,
    last_area: Rc<RefCell<Option<Rect>>>,
}

impl MockComponent {
    fn new(counts: CountsHandle) -> Self {
        Self {
            counts,
            last_area: Rc::new(RefCell::new(None)),
        }
    }
}

impl TabComponent for MockComponent {
    fn init(&mut self, ctx: &mut Ctx<'_>) {
        self.counts.0.borrow_mut().init += 1;
        *self.last_area.borrow_mut() = Some(ctx.area);
    }

    fn render(&mut self, ctx: &mut Ctx<'_>) {
        self.counts.0.borrow_mut().render += 1;
        *self.last_area.borrow_mut() = Some(ctx.area);
    }

    fn cleanup(&mut self) {
        self.counts.0.borrow_mut().cleanup += 1;
    }
}

struct Fixture {
    bus: EventBus,
    state: Rc<StateStore>,
    scheduler: SharedScheduler,
    panels: SharedPanels,
    router: SharedRouter,
    work: CountsHandle,
    writing: CountsHandle,
    fun: CountsHandle,
}

/// Build a router with work/writing/fun mocks. `register_fun_panel` lets
/// the missing-container scenario leave one panel out.
fn fixture(register_fun_panel: bool) -> Fixture {
    let bus = EventBus::new();
    let state = StateStore::new(bus.clone());
    let scheduler = Scheduler::shared();
    let panels = Panels::shared();

    {
        let mut p = panels.borrow_mut();
        p.register(TabId::Work, Rect::new(0, 2, 80, 20));
        p.register(TabId::Writing, Rect::new(0, 2, 80, 20));
        if register_fun_panel {
            p.register(TabId::Fun, Rect::new(0, 2, 80, 20));
        }
    }

    let router = Router::new(
        Rc::clone(&state),
        bus.clone(),
        Rc::clone(&scheduler),
        Rc::clone(&panels),
        PathBuf::from("content"),
    );
    folio_runtime::install(&router);

    let work = CountsHandle::default();
    let writing = CountsHandle::default();
    let fun = CountsHandle::default();
    {
        let mut r = router.borrow_mut();
        r.register(TabId::Work, Box::new(MockComponent::new(work.clone())));
        r.register(TabId::Writing, Box::new(MockComponent::new(writing.clone())));
        r.register(TabId::Fun, Box::new(MockComponent::new(fun.clone())));
    }

    Fixture {
        bus,
        state,
        scheduler,
        panels,
        router,
        work,
        writing,
        fun,
    }
}

fn settle(fx: &Fixture) {
    advance_shared(&fx.scheduler, TAB_EXIT_DELAY + Duration::from_millis(1));
}

fn mount_work(fx: &Fixture) {
    navigate(&fx.router, TabId::Work);
    settle(fx);
    assert_eq!(fx.router.borrow().current(), Some(TabId::Work));
}

#[test]
fn switching_tabs_runs_the_full_lifecycle() {
    let fx = fixture(true);
    mount_work(&fx);

    let changed = Rc::new(RefCell::new(Vec::new()));
    let changed2 = Rc::clone(&changed);
    let _sub = fx.bus.on(EventKind::TabChanged, move |event| {
        if let AppEvent::TabChanged { tab } = event {
            changed2.borrow_mut().push(*tab);
        }
    });

    navigate(&fx.router, TabId::Writing);
    // Mid-transition: old component cleaned up, new one not yet mounted.
    assert!(fx.state.get().transitioning);
    assert_eq!(fx.work.get().cleanup, 1);
    assert_eq!(fx.writing.get().init, 0);

    settle(&fx);

    assert_eq!(fx.work.get().cleanup, 1);
    assert_eq!(fx.writing.get(), Counts { init: 1, render: 1, cleanup: 0 });
    let state = fx.state.get();
    assert_eq!(state.tab, TabId::Writing);
    assert!(!state.transitioning);
    assert_eq!(*changed.borrow(), vec![TabId::Writing]);
    assert_eq!(fx.panels.borrow().active(), Some(TabId::Writing));
}

#[test]
fn navigation_while_transitioning_is_dropped() {
    let fx = fixture(true);
    mount_work(&fx);

    navigate(&fx.router, TabId::Writing);
    navigate(&fx.router, TabId::Fun);
    settle(&fx);

    assert_eq!(fx.state.get().tab, TabId::Writing);
    assert_eq!(fx.fun.get(), Counts::default());
    assert_eq!(fx.router.borrow().current(), Some(TabId::Writing));
}

#[test]
fn unregistered_tab_changes_nothing() {
    let bus = EventBus::new();
    let state = StateStore::new(bus.clone());
    let scheduler = Scheduler::shared();
    let panels = Panels::shared();
    panels
        .borrow_mut()
        .register(TabId::Work, Rect::new(0, 2, 80, 20));
    let router = Router::new(
        Rc::clone(&state),
        bus.clone(),
        Rc::clone(&scheduler),
        Rc::clone(&panels),
        PathBuf::from("content"),
    );
    let work = CountsHandle::default();
    router
        .borrow_mut()
        .register(TabId::Work, Box::new(MockComponent::new(work.clone())));
    assert!(!router.borrow().is_registered(TabId::Fun));

    navigate(&router, TabId::Work);
    advance_shared(&scheduler, TAB_EXIT_DELAY + Duration::from_millis(1));
    let before = state.get();

    navigate(&router, TabId::Fun);
    advance_shared(&scheduler, TAB_EXIT_DELAY + Duration::from_millis(1));

    assert_eq!(state.get(), before);
    assert_eq!(work.get().cleanup, 0);
    assert_eq!(router.borrow().current(), Some(TabId::Work));
}

#[test]
fn renavigating_to_current_initialized_tab_is_a_noop() {
    let fx = fixture(true);
    mount_work(&fx);
    let before = fx.state.get();

    navigate(&fx.router, TabId::Work);
    settle(&fx);

    assert_eq!(fx.state.get(), before);
    assert_eq!(fx.work.get(), Counts { init: 1, render: 1, cleanup: 0 });
}

#[test]
fn revisiting_a_tab_reinits_never_rerenders_every_activation() {
    let fx = fixture(true);
    mount_work(&fx);
    assert_eq!(fx.work.get(), Counts { init: 1, render: 1, cleanup: 0 });

    navigate(&fx.router, TabId::Writing);
    settle(&fx);
    navigate(&fx.router, TabId::Work);
    settle(&fx);

    // Init exactly once across both activations, render once per activation.
    assert_eq!(fx.work.get(), Counts { init: 1, render: 2, cleanup: 1 });
    assert_eq!(fx.writing.get().cleanup, 1);
}

#[test]
fn nav_requests_arrive_via_the_bus() {
    let fx = fixture(true);
    mount_work(&fx);

    fx.bus.emit(AppEvent::TabChange {
        from: TabId::Work,
        to: TabId::Fun,
    });
    settle(&fx);

    assert_eq!(fx.state.get().tab, TabId::Fun);
    assert_eq!(fx.fun.get().init, 1);
}

#[test]
fn missing_panel_aborts_but_resets_transitioning() {
    let fx = fixture(false);
    mount_work(&fx);

    navigate(&fx.router, TabId::Fun);
    assert!(fx.state.get().transitioning);
    settle(&fx);

    let state = fx.state.get();
    assert!(!state.transitioning, "state machine must not wedge");
    assert_eq!(state.tab, TabId::Work);
    assert_eq!(fx.fun.get(), Counts::default());
    // The outgoing component was already cleaned up; nothing is mounted.
    assert_eq!(fx.router.borrow().current(), None);

    // And the router accepts a fresh request afterwards.
    navigate(&fx.router, TabId::Writing);
    settle(&fx);
    assert_eq!(fx.state.get().tab, TabId::Writing);
    assert_eq!(fx.writing.get().init, 1);
}

#[test]
fn enter_content_reveals_and_mounts_the_section() {
    let fx = fixture(true);
    assert_eq!(fx.state.get().view, View::Landing);

    enter_content(&fx.router, TabId::Writing);
    assert!(fx.panels.borrow().landing_fading);
    assert!(!fx.panels.borrow().content_visible);

    advance_shared(&fx.scheduler, Duration::from_millis(501));
    {
        let panels = fx.panels.borrow();
        assert!(!panels.landing_visible);
        assert!(panels.content_visible);
    }
    assert_eq!(fx.state.get().view, View::Content);
    assert_eq!(fx.state.get().tab, TabId::Writing);

    settle(&fx);
    assert_eq!(fx.writing.get(), Counts { init: 1, render: 1, cleanup: 0 });
    assert_eq!(fx.router.borrow().current(), Some(TabId::Writing));
}

#[test]
fn enter_content_twice_is_a_noop() {
    let fx = fixture(true);
    enter_content(&fx.router, TabId::Work);
    advance_shared(&fx.scheduler, Duration::from_millis(501));
    settle(&fx);
    assert_eq!(fx.work.get().init, 1);

    enter_content(&fx.router, TabId::Fun);
    advance_shared(&fx.scheduler, Duration::from_millis(501));
    settle(&fx);
    assert_eq!(fx.fun.get(), Counts::default());
    assert_eq!(fx.state.get().tab, TabId::Work);
}

#[test]
fn skip_landing_mounts_directly() {
    let fx = fixture(true);
    assert!(activate_direct(&fx.router, TabId::Fun));

    let state = fx.state.get();
    assert_eq!(state.view, View::Content);
    assert_eq!(state.tab, TabId::Fun);
    assert!(fx.panels.borrow().content_visible);
    assert_eq!(fx.fun.get(), Counts { init: 1, render: 1, cleanup: 0 });
    assert!(fx.router.borrow().has_initialized(TabId::Fun));
    assert_eq!(fx.scheduler.borrow().pending_timers(), 0);
}

#[test]
fn duplicate_registration_is_refused() {
    let fx = fixture(true);
    let late = CountsHandle::default();
    fx.router
        .borrow_mut()
        .register(TabId::Work, Box::new(MockComponent::new(late.clone())));

    mount_work(&fx);
    assert_eq!(fx.work.get().init, 1);
    assert_eq!(late.get(), Counts::default());
}
