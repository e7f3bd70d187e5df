#![forbid(unsafe_code)]

//! Pointer hit-testing.
//!
//! Coordinates arrive already translated into canvas-local sub-pixel space.
//! Candidates are tested in list order and the first match wins, matching
//! the paint order the visualizations use.

use folio_core::geometry::Vec2;

/// First circle containing `point`, with `slack` added to every radius.
pub fn hit_circle(
    nodes: impl IntoIterator<Item = (Vec2, f32)>,
    point: Vec2,
    slack: f32,
) -> Option<usize> {
    nodes
        .into_iter()
        .position(|(center, radius)| point.distance(center) < radius + slack)
}

/// First rectangle (center + half extents) containing `point`.
pub fn hit_rect(
    nodes: impl IntoIterator<Item = (Vec2, Vec2)>,
    point: Vec2,
) -> Option<usize> {
    nodes.into_iter().position(|(center, half)| {
        (point.x - center.x).abs() <= half.x && (point.y - center.y).abs() <= half.y
    })
}
