#![forbid(unsafe_code)]

//! Application state store.
//!
//! A single injected instance holds the UI state record. All mutation goes
//! through [`StateStore::set`], which diffs against the previous snapshot,
//! emits targeted bus events for the significant fields, then notifies
//! generic subscribers in subscription order. Reads return decoupled
//! snapshots.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use crate::events::{AppEvent, EventBus};

/// Which top-level surface is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Landing,
    Content,
}

/// One of the three content sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TabId {
    #[default]
    Work,
    Writing,
    Fun,
}

impl TabId {
    /// All tabs in display order.
    pub const ALL: [TabId; 3] = [TabId::Work, TabId::Writing, TabId::Fun];

    /// Human-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            TabId::Work => "Work",
            TabId::Writing => "Writing",
            TabId::Fun => "Fun",
        }
    }

    /// Stable identifier used in logs and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            TabId::Work => "work",
            TabId::Writing => "writing",
            TabId::Fun => "fun",
        }
    }

    /// The next tab in display order, wrapping.
    pub fn next(self) -> TabId {
        match self {
            TabId::Work => TabId::Writing,
            TabId::Writing => TabId::Fun,
            TabId::Fun => TabId::Work,
        }
    }

    /// The previous tab in display order, wrapping.
    pub fn prev(self) -> TabId {
        match self {
            TabId::Work => TabId::Fun,
            TabId::Writing => TabId::Work,
            TabId::Fun => TabId::Writing,
        }
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TabId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(TabId::Work),
            "writing" => Ok(TabId::Writing),
            "fun" => Ok(TabId::Fun),
            other => Err(format!("unknown tab {other:?} (expected work, writing, or fun)")),
        }
    }
}

/// Blog sub-view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogView {
    #[default]
    List,
    Single,
}

/// The full UI state record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub view: View,
    pub tab: TabId,
    pub current_post: Option<String>,
    pub blog_view: BlogView,
    /// True only while a tab switch is in flight.
    pub transitioning: bool,
    pub loading: bool,
}

/// A typed partial update. Fields left `None` are untouched, so an update
/// cannot introduce a field outside the schema.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub view: Option<View>,
    pub tab: Option<TabId>,
    pub current_post: Option<Option<String>>,
    pub blog_view: Option<BlogView>,
    pub transitioning: Option<bool>,
    pub loading: Option<bool>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }

    #[must_use]
    pub fn tab(mut self, tab: TabId) -> Self {
        self.tab = Some(tab);
        self
    }

    #[must_use]
    pub fn current_post(mut self, post: Option<String>) -> Self {
        self.current_post = Some(post);
        self
    }

    #[must_use]
    pub fn blog_view(mut self, blog_view: BlogView) -> Self {
        self.blog_view = Some(blog_view);
        self
    }

    #[must_use]
    pub fn transitioning(mut self, transitioning: bool) -> Self {
        self.transitioning = Some(transitioning);
        self
    }

    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    fn apply(&self, state: &mut AppState) {
        if let Some(view) = self.view {
            state.view = view;
        }
        if let Some(tab) = self.tab {
            state.tab = tab;
        }
        if let Some(ref post) = self.current_post {
            state.current_post = post.clone();
        }
        if let Some(blog_view) = self.blog_view {
            state.blog_view = blog_view;
        }
        if let Some(transitioning) = self.transitioning {
            state.transitioning = transitioning;
        }
        if let Some(loading) = self.loading {
            state.loading = loading;
        }
    }
}

/// Payload delivered to generic state subscribers.
#[derive(Debug, Clone)]
pub struct StateChange {
    pub updates: StateUpdate,
    pub old: AppState,
    pub new: AppState,
}

type ChangeHandler = Rc<RefCell<dyn FnMut(&StateChange)>>;
type SubscriberList = Rc<RefCell<Vec<(u64, ChangeHandler)>>>;

/// The single-writer state container.
pub struct StateStore {
    state: RefCell<AppState>,
    bus: EventBus,
    subscribers: SubscriberList,
    next_id: std::cell::Cell<u64>,
}

impl StateStore {
    /// Create a store with default state, publishing targeted events on `bus`.
    pub fn new(bus: EventBus) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(AppState::default()),
            bus,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: std::cell::Cell::new(0),
        })
    }

    /// Decoupled snapshot of the current state.
    pub fn get(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Apply a partial update.
    ///
    /// Targeted events fire before the generic change notification: a changed
    /// `tab` emits [`AppEvent::TabChange`]; a `view` transition into
    /// [`View::Content`] emits [`AppEvent::LandingComplete`].
    pub fn set(&self, updates: StateUpdate) {
        let old = self.state.borrow().clone();
        let mut new = old.clone();
        updates.apply(&mut new);
        *self.state.borrow_mut() = new.clone();

        if old.tab != new.tab {
            tracing::debug!(from = %old.tab, to = %new.tab, "tab changed");
            self.bus.emit(AppEvent::TabChange {
                from: old.tab,
                to: new.tab,
            });
        }
        if old.view != new.view && new.view == View::Content {
            self.bus.emit(AppEvent::LandingComplete { section: None });
        }

        let change = StateChange { updates, old, new };
        let snapshot: Vec<ChangeHandler> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in snapshot {
            if let Ok(mut f) = handler.try_borrow_mut() {
                f(&change);
            }
        }
    }

    /// Subscribe to generic change notifications. Returns a cancellation
    /// handle.
    pub fn subscribe(&self, handler: impl FnMut(&StateChange) + 'static) -> StateSubscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(handler))));
        StateSubscription {
            subscribers: Rc::downgrade(&self.subscribers),
            id,
        }
    }
}

/// Cancellation handle returned by [`StateStore::subscribe`].
pub struct StateSubscription {
    subscribers: Weak<RefCell<Vec<(u64, ChangeHandler)>>>,
    id: u64,
}

impl StateSubscription {
    /// Remove the handler; no further notifications are delivered to it.
    pub fn cancel(self) {
        if let Some(list) = self.subscribers.upgrade() {
            list.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn defaults_match_initial_ui() {
        let state = AppState::default();
        assert_eq!(state.view, View::Landing);
        assert_eq!(state.tab, TabId::Work);
        assert_eq!(state.current_post, None);
        assert_eq!(state.blog_view, BlogView::List);
        assert!(!state.transitioning);
        assert!(!state.loading);
    }

    #[test]
    fn last_write_wins_and_untouched_fields_persist() {
        let store = StateStore::new(EventBus::new());
        store.set(StateUpdate::new().tab(TabId::Writing).loading(true));
        store.set(StateUpdate::new().tab(TabId::Fun));
        store.set(StateUpdate::new().transitioning(true));

        let state = store.get();
        assert_eq!(state.tab, TabId::Fun);
        assert!(state.loading);
        assert!(state.transitioning);
        assert_eq!(state.view, View::Landing);
    }

    #[test]
    fn snapshot_is_decoupled_from_store() {
        let store = StateStore::new(EventBus::new());
        let mut snapshot = store.get();
        snapshot.tab = TabId::Fun;
        snapshot.loading = true;
        assert_eq!(store.get().tab, TabId::Work);
        assert!(!store.get().loading);
    }

    #[test]
    fn tab_change_emits_targeted_event_before_generic_notification() {
        let bus = EventBus::new();
        let store = StateStore::new(bus.clone());
        let order = Rc::new(RefCell::new(Vec::new()));

        let order2 = Rc::clone(&order);
        let _bus_sub = bus.on(EventKind::TabChange, move |event| {
            if let AppEvent::TabChange { from, to } = event {
                order2.borrow_mut().push(format!("targeted {from}->{to}"));
            }
        });
        let order3 = Rc::clone(&order);
        let _store_sub = store.subscribe(move |change| {
            order3
                .borrow_mut()
                .push(format!("generic tab={}", change.new.tab));
        });

        store.set(StateUpdate::new().tab(TabId::Writing));
        assert_eq!(
            *order.borrow(),
            vec![
                "targeted work->writing".to_string(),
                "generic tab=writing".to_string()
            ]
        );
    }

    #[test]
    fn unchanged_tab_emits_no_targeted_event() {
        let bus = EventBus::new();
        let store = StateStore::new(bus.clone());
        let hits = Rc::new(RefCell::new(0));
        let hits2 = Rc::clone(&hits);
        let _sub = bus.on(EventKind::TabChange, move |_| *hits2.borrow_mut() += 1);

        store.set(StateUpdate::new().tab(TabId::Work));
        store.set(StateUpdate::new().loading(true));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn entering_content_emits_landing_complete() {
        let bus = EventBus::new();
        let store = StateStore::new(bus.clone());
        let hits = Rc::new(RefCell::new(0));
        let hits2 = Rc::clone(&hits);
        let _sub = bus.on(EventKind::LandingComplete, move |_| *hits2.borrow_mut() += 1);

        store.set(StateUpdate::new().view(View::Content));
        // Leaving content does not re-fire.
        store.set(StateUpdate::new().view(View::Landing));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn unsubscribe_silences_handler() {
        let store = StateStore::new(EventBus::new());
        let hits = Rc::new(RefCell::new(0));
        let hits2 = Rc::clone(&hits);
        let sub = store.subscribe(move |_| *hits2.borrow_mut() += 1);

        store.set(StateUpdate::new().loading(true));
        sub.cancel();
        store.set(StateUpdate::new().loading(false));
        store.set(StateUpdate::new().tab(TabId::Fun));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn change_payload_carries_old_and_new() {
        let store = StateStore::new(EventBus::new());
        let seen = Rc::new(RefCell::new(None));
        let seen2 = Rc::clone(&seen);
        let _sub = store.subscribe(move |change| {
            *seen2.borrow_mut() = Some((change.old.clone(), change.new.clone()));
        });

        store.set(StateUpdate::new().tab(TabId::Fun).transitioning(true));
        let (old, new) = seen.borrow().clone().expect("notification");
        assert_eq!(old.tab, TabId::Work);
        assert!(!old.transitioning);
        assert_eq!(new.tab, TabId::Fun);
        assert!(new.transitioning);
    }

    #[test]
    fn tab_parsing_round_trips() {
        for tab in TabId::ALL {
            assert_eq!(tab.name().parse::<TabId>().unwrap(), tab);
        }
        assert!("blog".parse::<TabId>().is_err());
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(TabId::Fun.next(), TabId::Work);
        assert_eq!(TabId::Work.prev(), TabId::Fun);
    }
}
