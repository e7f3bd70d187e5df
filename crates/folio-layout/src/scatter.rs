#![forbid(unsafe_code)]

//! Seeded scatter layout with rejection sampling.
//!
//! Candidates are drawn on a ring around the canvas center with jitter, then
//! rejected when they leave the padded bounds or crowd an earlier node.
//! When the attempt budget runs out the node falls back to deterministic
//! even angular spacing, clamped so the fallback also respects the padding.

use folio_core::geometry::Vec2;
use folio_core::rng::Lcg;

/// Tuning for [`scatter`]. Distances are in canvas sub-pixels.
#[derive(Debug, Clone)]
pub struct ScatterParams {
    /// Minimum distance from every canvas edge.
    pub padding: f32,
    /// Minimum center-to-center spacing between nodes.
    pub min_spacing: f32,
    /// Rejection-sampling attempt budget per node.
    pub max_attempts: u32,
    /// Ring radius as a fraction of the short canvas dimension.
    pub ring_scale: f32,
    /// Base offset added to the ring radius.
    pub ring_offset: f32,
    /// Total jitter span applied to each candidate, per axis.
    pub jitter: f32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            padding: 80.0,
            min_spacing: 64.0,
            max_attempts: 200,
            ring_scale: 0.35,
            ring_offset: 50.0,
            jitter: 100.0,
        }
    }
}

/// Place `count` nodes inside a `width` × `height` canvas.
///
/// Deterministic for a given `rng` seed. Every returned position, fallback
/// placements included, lies within `params.padding` of the canvas edges
/// whenever the padded region is non-empty.
pub fn scatter(
    count: usize,
    width: f32,
    height: f32,
    params: &ScatterParams,
    rng: &mut Lcg,
) -> Vec<Vec2> {
    let center = Vec2::new(width / 2.0, height / 2.0);
    let short = width.min(height);
    let mut positions: Vec<Vec2> = Vec::with_capacity(count);

    for i in 0..count {
        let mut placed = false;
        let mut attempts = 0;

        while !placed && attempts < params.max_attempts {
            attempts += 1;

            let angle = rng.next_f32() * std::f32::consts::TAU;
            let distance = rng.next_f32() * short * params.ring_scale + params.ring_offset;
            let jitter_x = (rng.next_f32() - 0.5) * params.jitter;
            let jitter_y = (rng.next_f32() - 0.5) * params.jitter;

            let candidate = Vec2::new(
                center.x + angle.cos() * distance + jitter_x,
                center.y + angle.sin() * distance + jitter_y,
            );

            if candidate.x < params.padding
                || candidate.x > width - params.padding
                || candidate.y < params.padding
                || candidate.y > height - params.padding
            {
                continue;
            }
            if positions
                .iter()
                .any(|p| p.distance(candidate) < params.min_spacing)
            {
                continue;
            }

            positions.push(candidate);
            placed = true;
        }

        if !placed {
            let angle = (i as f32 / count.max(1) as f32) * std::f32::consts::TAU;
            let distance = short * 0.3;
            let fallback = Vec2::new(
                center.x + angle.cos() * distance,
                center.y + angle.sin() * distance,
            );
            positions.push(clamp_to_padding(fallback, width, height, params.padding));
        }
    }

    positions
}

fn clamp_to_padding(p: Vec2, width: f32, height: f32, padding: f32) -> Vec2 {
    // A degenerate canvas (padding >= half extent) collapses to the center.
    let min_x = padding.min(width / 2.0);
    let max_x = (width - padding).max(width / 2.0);
    let min_y = padding.min(height / 2.0);
    let max_y = (height - padding).max(height / 2.0);
    p.clamp(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
}
