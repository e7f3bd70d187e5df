#![forbid(unsafe_code)]

//! Visualization components: the landing animation, the three tab
//! visualizations, the navigation bar, and the text-scramble effect.
//!
//! Every tab component follows the same shape: content is fetched once at
//! `init` and degrades to an empty default, layout is deterministic for a
//! given seed, the frame loop is guarded by a [`folio_core::FrameHandle`]
//! held by the component itself, and `cleanup` cancels it synchronously.

pub mod collage;
pub mod landing;
pub mod nav;
pub mod scramble;
pub mod theme;
pub mod timeline;
pub mod writing;

pub use collage::Collage;
pub use landing::{Landing, SharedLanding};
pub use nav::{SharedTabNav, TabNav};
pub use scramble::TextScramble;
pub use timeline::Timeline;
pub use writing::WritingNetwork;

/// Open an external link in the system browser, logging failures.
///
/// One-way side effect with no response contract; a refused launch only
/// produces a warning.
pub(crate) fn open_external(url: &str) {
    if let Err(err) = open::that(url) {
        tracing::warn!(url, error = %err, "failed to open external link");
    }
}
