#![forbid(unsafe_code)]

//! Typed in-process event bus.
//!
//! Cross-component communication runs through a closed set of application
//! events. Delivery is synchronous and in subscription order; the bus is a
//! delivery mechanism, not an error boundary, and does not care which kinds
//! the application chooses to emit.
//!
//! Emission snapshots the matching handler list first, so handlers may
//! subscribe, cancel, or emit further events while a delivery pass is in
//! flight without affecting that pass.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::state::TabId;

/// The closed set of application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Navigation request: switch to a tab.
    TabChange { from: TabId, to: TabId },
    /// Navigation confirmation: a tab switch completed.
    TabChanged { tab: TabId },
    /// The landing hand-off fired. `section` is present when a landing node
    /// was clicked, absent when the store observed the view transition.
    LandingComplete { section: Option<TabId> },
    /// The landing surface became interactive.
    LandingEnter,
    /// A component finished loading its content document.
    ContentLoaded { tab: TabId },
    /// A component failed to load its content document and degraded to the
    /// empty default.
    ContentError { tab: TabId, message: String },
    /// A decorative animation loop started.
    AnimationStart,
    /// A decorative animation loop stopped.
    AnimationEnd,
    /// A writing node was opened.
    PostSelected { id: String },
    /// The selected post was dismissed.
    PostClosed,
}

/// Discriminant used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TabChange,
    TabChanged,
    LandingComplete,
    LandingEnter,
    ContentLoaded,
    ContentError,
    AnimationStart,
    AnimationEnd,
    PostSelected,
    PostClosed,
}

impl AppEvent {
    /// The kind this event is delivered under.
    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::TabChange { .. } => EventKind::TabChange,
            AppEvent::TabChanged { .. } => EventKind::TabChanged,
            AppEvent::LandingComplete { .. } => EventKind::LandingComplete,
            AppEvent::LandingEnter => EventKind::LandingEnter,
            AppEvent::ContentLoaded { .. } => EventKind::ContentLoaded,
            AppEvent::ContentError { .. } => EventKind::ContentError,
            AppEvent::AnimationStart => EventKind::AnimationStart,
            AppEvent::AnimationEnd => EventKind::AnimationEnd,
            AppEvent::PostSelected { .. } => EventKind::PostSelected,
            AppEvent::PostClosed => EventKind::PostClosed,
        }
    }
}

type Handler = Rc<RefCell<dyn FnMut(&AppEvent)>>;

struct Entry {
    id: u64,
    kind: EventKind,
    once: bool,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    entries: Vec<Entry>,
    next_id: u64,
}

/// A cheaply clonable handle to the shared bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a kind. Returns a cancellation handle; dropping the
    /// handle without calling [`Subscription::cancel`] leaves the handler
    /// subscribed for the life of the bus.
    pub fn on(&self, kind: EventKind, handler: impl FnMut(&AppEvent) + 'static) -> Subscription {
        self.register(kind, handler, false)
    }

    /// Subscribe for a single delivery; the handler is removed before it is
    /// invoked, so nested emits cannot fire it twice.
    pub fn once(&self, kind: EventKind, handler: impl FnMut(&AppEvent) + 'static) -> Subscription {
        self.register(kind, handler, true)
    }

    fn register(
        &self,
        kind: EventKind,
        handler: impl FnMut(&AppEvent) + 'static,
        once: bool,
    ) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(Entry {
            id,
            kind,
            once,
            handler: Rc::new(RefCell::new(handler)),
        });
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver an event to all current subscribers of its kind, in
    /// subscription order.
    pub fn emit(&self, event: AppEvent) {
        let kind = event.kind();
        let matching: Vec<(u64, Handler)> = {
            let inner = self.inner.borrow();
            inner
                .entries
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| (e.id, Rc::clone(&e.handler)))
                .collect()
        };

        // Drop one-shot entries before invoking anything.
        {
            let mut inner = self.inner.borrow_mut();
            inner
                .entries
                .retain(|e| !(e.once && matching.iter().any(|(id, _)| *id == e.id)));
        }

        for (id, handler) in matching {
            match handler.try_borrow_mut() {
                Ok(mut f) => f(&event),
                // A handler re-entering itself through a nested emit.
                Err(_) => tracing::debug!(handler = id, ?kind, "skipped re-entrant handler"),
            }
        }
    }

    /// Number of live subscriptions, for tests and diagnostics.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

/// Cancellation handle returned by [`EventBus::on`] and [`EventBus::once`].
pub struct Subscription {
    inner: Weak<RefCell<BusInner>>,
    id: u64,
}

impl Subscription {
    /// Remove the handler. Subsequent emits deliver nothing to it.
    pub fn cancel(self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().entries.retain(|e| e.id != self.id);
        }
    }
}
