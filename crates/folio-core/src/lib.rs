#![forbid(unsafe_code)]

//! Core primitives for the folio terminal portfolio engine.
//!
//! This crate is platform-free: geometry, input events, the deterministic
//! RNG, animation easing, the application state store, the typed event bus,
//! and the timer/frame scheduler. Terminal I/O lives in `folio-render` and
//! `folio-app`; this crate can be driven headlessly from tests.

pub mod anim;
pub mod events;
pub mod geometry;
pub mod input;
pub mod rng;
pub mod schedule;
pub mod state;

pub use events::{AppEvent, EventBus, EventKind, Subscription};
pub use geometry::{Rect, Vec2};
pub use input::{InputEvent, Key, Mouse, MouseButton, MouseKind};
pub use rng::Lcg;
pub use schedule::{FrameHandle, Scheduler, SharedScheduler, TimerId};
pub use state::{
    AppState, BlogView, StateChange, StateStore, StateSubscription, StateUpdate, TabId, View,
};
