#![forbid(unsafe_code)]

//! The tab component contract.
//!
//! Every visualization the router can mount implements [`TabComponent`].
//! The three lifecycle operations mirror the mount cycle: `init` once per
//! instance (lazily, on first activation), `render` on every activation,
//! `cleanup` on every deactivation. The remaining methods are the
//! immediate-mode surface (per-frame drawing and translated input) and
//! default to no-ops for components that render once and sit still.

use std::path::Path;
use std::time::Duration;

use folio_core::events::EventBus;
use folio_core::geometry::Rect;
use folio_core::input::InputEvent;
use folio_core::schedule::SharedScheduler;
use folio_render::buffer::Buffer;

/// Per-call context handed to lifecycle and input methods.
///
/// Constructed by the router for each call; components must not retain
/// references into it. Long-lived handles (the bus, the scheduler) are
/// cheap to clone out of it instead.
pub struct Ctx<'a> {
    /// The component's container area. Refreshed on every activation and
    /// resize; absolute positions are never preserved across size changes.
    pub area: Rect,
    pub bus: &'a EventBus,
    pub scheduler: &'a SharedScheduler,
    /// Directory holding the section content documents.
    pub content_dir: &'a Path,
}

/// A mountable tab visualization.
///
/// # Lifecycle rules
///
/// - `init` must be re-invokable after a `cleanup` on the same instance.
/// - `render` must be safely callable multiple times; implementations guard
///   against double-starting their own frame loop by checking the frame
///   handle they already hold.
/// - `cleanup` must synchronously cancel the frame handle and release every
///   acquired resource, leaving the component re-enterable.
pub trait TabComponent {
    /// Acquire content and compute the initial layout.
    fn init(&mut self, ctx: &mut Ctx<'_>);

    /// Activation render.
    fn render(&mut self, ctx: &mut Ctx<'_>);

    /// Deactivation: release everything acquired since `init`/`render`.
    fn cleanup(&mut self);

    /// Draw one frame while mounted. `dt` is the time since the previous
    /// frame.
    fn frame(&mut self, buf: &mut Buffer, area: Rect, dt: Duration) {
        let _ = (buf, area, dt);
    }

    /// Translated input while mounted.
    fn input(&mut self, event: &InputEvent, ctx: &mut Ctx<'_>) {
        let _ = (event, ctx);
    }
}
