#![forbid(unsafe_code)]

//! The tab navigation state machine.
//!
//! The router owns the component registry and drives mount transitions:
//! cleanup of the outgoing component always completes before the incoming
//! component's init/render begins, and the `transitioning` flag serializes
//! requests so at most one switch is in flight. Rejected requests are
//! dropped with a log line, never queued.
//!
//! The router lives behind a shared handle ([`SharedRouter`]); the free
//! functions here take the handle so delayed continuations can re-enter it
//! through the scheduler. Requests that arrive while the router is already
//! mid-dispatch (for example the store's own targeted `TabChange` emission
//! re-entering during a transition) fail the `try_borrow_mut` and are
//! dropped, which is exactly the discard semantics the transition flag
//! promises.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use folio_core::events::{AppEvent, EventBus, EventKind, Subscription};
use folio_core::schedule::SharedScheduler;
use folio_core::state::{StateStore, StateUpdate, TabId, View};
use folio_core::input::InputEvent;
use folio_render::buffer::Buffer;

use crate::component::{Ctx, TabComponent};
use crate::panel::SharedPanels;

/// Exit-animation delay between deactivating the old panel and mounting the
/// new one.
pub const TAB_EXIT_DELAY: Duration = Duration::from_millis(150);

/// Delay between the landing fade-out mark and revealing the content
/// surface.
pub const LANDING_HIDE_DELAY: Duration = Duration::from_millis(500);

/// Shared router handle.
pub type SharedRouter = Rc<std::cell::RefCell<Router>>;

/// Registry plus transition state.
pub struct Router {
    components: HashMap<TabId, Box<dyn TabComponent>>,
    initialized: HashSet<TabId>,
    current: Option<TabId>,
    state: Rc<StateStore>,
    bus: EventBus,
    scheduler: SharedScheduler,
    panels: SharedPanels,
    content_dir: PathBuf,
    subscriptions: Vec<Subscription>,
}

impl Router {
    /// Create a router behind its shared handle.
    pub fn new(
        state: Rc<StateStore>,
        bus: EventBus,
        scheduler: SharedScheduler,
        panels: SharedPanels,
        content_dir: PathBuf,
    ) -> SharedRouter {
        Rc::new(std::cell::RefCell::new(Self {
            components: HashMap::new(),
            initialized: HashSet::new(),
            current: None,
            state,
            bus,
            scheduler,
            panels,
            content_dir,
            subscriptions: Vec::new(),
        }))
    }

    /// Register a tab component. First registration wins; duplicates are
    /// refused and logged.
    pub fn register(&mut self, tab: TabId, component: Box<dyn TabComponent>) {
        if self.components.contains_key(&tab) {
            tracing::warn!(%tab, "duplicate component registration refused");
            return;
        }
        self.components.insert(tab, component);
    }

    pub fn is_registered(&self, tab: TabId) -> bool {
        self.components.contains_key(&tab)
    }

    /// The mounted tab, if any.
    pub fn current(&self) -> Option<TabId> {
        self.current
    }

    /// Whether a tab has been through its one-time init.
    pub fn has_initialized(&self, tab: TabId) -> bool {
        self.initialized.contains(&tab)
    }

    /// Init-once-then-render activation. The caller has already resolved
    /// and marked the panel.
    fn activate(&mut self, tab: TabId) {
        let Some(area) = self.panels.borrow().area_of(tab) else {
            return;
        };
        let mut ctx = Ctx {
            area,
            bus: &self.bus,
            scheduler: &self.scheduler,
            content_dir: &self.content_dir,
        };
        let Some(component) = self.components.get_mut(&tab) else {
            return;
        };
        if !self.initialized.contains(&tab) {
            tracing::info!(%tab, "initializing component");
            component.init(&mut ctx);
            self.initialized.insert(tab);
        }
        component.render(&mut ctx);
        self.current = Some(tab);
    }
}

/// Wire the router to the bus: navigation requests arrive as
/// [`AppEvent::TabChange`].
pub fn install(this: &SharedRouter) {
    let bus = this.borrow().bus.clone();
    let weak = Rc::downgrade(this);
    let sub = bus.on(EventKind::TabChange, move |event| {
        if let AppEvent::TabChange { to, .. } = event {
            if let Some(router) = weak.upgrade() {
                navigate(&router, *to);
            }
        }
    });
    this.borrow_mut().subscriptions.push(sub);
}

/// Request a switch to `tab`.
///
/// No-op when a transition is in flight, when `tab` is unregistered, or
/// when `tab` is the current tab and already initialized.
pub fn navigate(this: &SharedRouter, tab: TabId) {
    let mut router = match this.try_borrow_mut() {
        Ok(router) => router,
        Err(_) => {
            tracing::debug!(%tab, "navigation dropped: router busy");
            return;
        }
    };

    let state = router.state.get();
    if state.transitioning {
        tracing::debug!(%tab, "navigation dropped: transition in flight");
        return;
    }
    if !router.components.contains_key(&tab) {
        tracing::warn!(%tab, "navigation to unregistered tab ignored");
        return;
    }
    if state.tab == tab && router.initialized.contains(&tab) {
        tracing::debug!(%tab, "navigation ignored: already on tab");
        return;
    }

    router.state.set(StateUpdate::new().transitioning(true));

    if let Some(current) = router.current.take() {
        if let Some(component) = router.components.get_mut(&current) {
            component.cleanup();
        }
    }
    router.panels.borrow_mut().deactivate_all();

    let scheduler = Rc::clone(&router.scheduler);
    let weak = Rc::downgrade(this);
    drop(router);
    scheduler
        .borrow_mut()
        .schedule_once(TAB_EXIT_DELAY, move || {
            if let Some(router) = weak.upgrade() {
                finish_navigation(&router, tab);
            }
        });
}

fn finish_navigation(this: &SharedRouter, tab: TabId) {
    let mut router = this.borrow_mut();

    let panel_found = {
        let mut panels = router.panels.borrow_mut();
        if panels.area_of(tab).is_some() {
            panels.activate(tab);
            true
        } else {
            false
        }
    };
    if !panel_found {
        tracing::warn!(%tab, "no panel container for tab, aborting navigation");
        router.state.set(StateUpdate::new().transitioning(false));
        return;
    }

    router.activate(tab);
    router
        .state
        .set(StateUpdate::new().tab(tab).transitioning(false));

    let bus = router.bus.clone();
    drop(router);
    bus.emit(AppEvent::TabChanged { tab });
}

/// Landing-to-content hand-off.
///
/// Marks the landing surface fading; after [`LANDING_HIDE_DELAY`] hides it,
/// reveals the content surface, updates state, and delegates the mount to
/// [`navigate`].
pub fn enter_content(this: &SharedRouter, section: TabId) {
    {
        let router = match this.try_borrow() {
            Ok(router) => router,
            Err(_) => return,
        };
        if router.state.get().view == View::Content {
            tracing::debug!("enter_content ignored: already in content view");
            return;
        }
        router.panels.borrow_mut().begin_landing_fade();
    }

    let scheduler = Rc::clone(&this.borrow().scheduler);
    let weak = Rc::downgrade(this);
    scheduler
        .borrow_mut()
        .schedule_once(LANDING_HIDE_DELAY, move || {
            let Some(router_rc) = weak.upgrade() else {
                return;
            };
            {
                let router = router_rc.borrow();
                router.panels.borrow_mut().show_content();
                router
                    .state
                    .set(StateUpdate::new().view(View::Content).tab(section));
            }
            navigate(&router_rc, section);
        });
}

/// Skip-landing startup path: reveal content and mount `tab` directly,
/// bypassing the transition delays. Returns whether the mount happened.
pub fn activate_direct(this: &SharedRouter, tab: TabId) -> bool {
    let mut router = this.borrow_mut();
    if !router.components.contains_key(&tab) {
        tracing::warn!(%tab, "cannot skip to unregistered tab");
        return false;
    }
    {
        let mut panels = router.panels.borrow_mut();
        if panels.area_of(tab).is_none() {
            tracing::warn!(%tab, "no panel container for tab, skip aborted");
            return false;
        }
        panels.show_content();
        panels.activate(tab);
    }
    router
        .state
        .set(StateUpdate::new().view(View::Content).tab(tab));
    router.activate(tab);
    true
}

/// Draw the mounted component's frame.
pub fn frame(this: &SharedRouter, buf: &mut Buffer, dt: Duration) {
    let Ok(mut router) = this.try_borrow_mut() else {
        return;
    };
    let Some(tab) = router.current else {
        return;
    };
    let Some(area) = router.panels.borrow().area_of(tab) else {
        return;
    };
    if let Some(component) = router.components.get_mut(&tab) {
        component.frame(buf, area, dt);
    }
}

/// Forward translated input to the mounted component.
pub fn dispatch_input(this: &SharedRouter, event: &InputEvent) {
    let Ok(mut router) = this.try_borrow_mut() else {
        return;
    };
    let Some(tab) = router.current else {
        return;
    };
    let Some(area) = router.panels.borrow().area_of(tab) else {
        return;
    };
    let router = &mut *router;
    let mut ctx = Ctx {
        area,
        bus: &router.bus,
        scheduler: &router.scheduler,
        content_dir: &router.content_dir,
    };
    if let Some(component) = router.components.get_mut(&tab) {
        component.input(event, &mut ctx);
    }
}
