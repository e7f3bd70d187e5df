#![forbid(unsafe_code)]

//! Shared palette.

use folio_render::cell::Rgba;

/// Primary foreground.
pub const FG: Rgba = Rgba::WHITE;
/// Highlight orange used for hover and pulse accents.
pub const ACCENT: Rgba = Rgba::rgb(255, 69, 0);
/// Secondary text.
pub const MID: Rgba = Rgba::gray(204);
/// Tertiary text and inactive chrome.
pub const DIM: Rgba = Rgba::gray(136);
/// Edge lines between nodes.
pub const EDGE: Rgba = Rgba::gray(68);
