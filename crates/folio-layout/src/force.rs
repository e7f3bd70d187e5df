#![forbid(unsafe_code)]

//! Force-directed relaxation.
//!
//! Runs one step per animation frame: center pull, bounded pairwise
//! repulsion, spring constraints along edges, velocity damping, and boundary
//! clamping. Damping below 1 and the repulsion cap keep the system
//! convergent rather than oscillating or diverging.

use folio_core::geometry::Vec2;

use crate::edges::Edge;

/// Tuning for [`ForceSim`]. Distances in canvas sub-pixels, forces in
/// sub-pixels per second squared.
#[derive(Debug, Clone)]
pub struct ForceParams {
    /// Pull toward the canvas center.
    pub center_pull: f32,
    /// Pairwise repulsion strength (inverse-square falloff).
    pub repulsion: f32,
    /// Cap on the repulsion magnitude between any pair.
    pub max_repulsion: f32,
    /// Spring constant along edges.
    pub spring: f32,
    /// Spring rest length.
    pub rest_length: f32,
    /// Per-step velocity retention. Must stay below 1.
    pub damping: f32,
    /// Speed cap, sub-pixels per second.
    pub max_speed: f32,
    /// Minimum distance from every canvas edge.
    pub padding: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            center_pull: 0.6,
            repulsion: 60_000.0,
            max_repulsion: 400.0,
            spring: 2.0,
            rest_length: 60.0,
            damping: 0.85,
            max_speed: 160.0,
            padding: 16.0,
        }
    }
}

/// A relaxing node system. Positions are exposed for rendering between
/// steps; velocities are internal.
#[derive(Debug, Clone)]
pub struct ForceSim {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    params: ForceParams,
}

impl ForceSim {
    /// Start from the given positions at rest.
    pub fn new(positions: Vec<Vec2>, params: ForceParams) -> Self {
        let velocities = vec![Vec2::ZERO; positions.len()];
        Self {
            positions,
            velocities,
            params,
        }
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Replace all positions (after a resize re-seed) and zero velocities.
    pub fn reset(&mut self, positions: Vec<Vec2>) {
        self.velocities = vec![Vec2::ZERO; positions.len()];
        self.positions = positions;
    }

    /// Mean speed across nodes, used to detect settling.
    pub fn mean_speed(&self) -> f32 {
        if self.velocities.is_empty() {
            return 0.0;
        }
        self.velocities.iter().map(|v| v.length()).sum::<f32>() / self.velocities.len() as f32
    }

    /// Advance the simulation by `dt` seconds within a `width` × `height`
    /// canvas, treating `edges` as springs.
    pub fn step(&mut self, edges: &[Edge], width: f32, height: f32, dt: f32) {
        let n = self.positions.len();
        if n == 0 || dt <= 0.0 {
            return;
        }
        let dt = dt.min(0.1);
        let center = Vec2::new(width / 2.0, height / 2.0);
        let p = &self.params;

        let mut forces = vec![Vec2::ZERO; n];

        for i in 0..n {
            forces[i] += (center - self.positions[i]) * p.center_pull;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.positions[i] - self.positions[j];
                let dist = delta.length().max(1.0);
                let magnitude = (p.repulsion / (dist * dist)).min(p.max_repulsion);
                // Coincident nodes have no separation direction; derive a
                // deterministic one from the pair indices.
                let dir = if delta.length() > 1e-3 {
                    delta.normalized()
                } else {
                    let angle = (i * 31 + j) as f32;
                    Vec2::new(angle.cos(), angle.sin())
                };
                let push = dir * magnitude;
                forces[i] += push;
                forces[j] += push * -1.0;
            }
        }

        for edge in edges {
            if edge.a >= n || edge.b >= n {
                continue;
            }
            let delta = self.positions[edge.b] - self.positions[edge.a];
            let dist = delta.length().max(1.0);
            let stretch = dist - p.rest_length;
            let pull = delta.normalized() * (stretch * p.spring);
            forces[edge.a] += pull;
            forces[edge.b] += pull * -1.0;
        }

        let min = Vec2::new(p.padding.min(width / 2.0), p.padding.min(height / 2.0));
        let max = Vec2::new(
            (width - p.padding).max(width / 2.0),
            (height - p.padding).max(height / 2.0),
        );

        for i in 0..n {
            let mut v = (self.velocities[i] + forces[i] * dt) * p.damping;
            let speed = v.length();
            if speed > p.max_speed {
                v = v.normalized() * p.max_speed;
            }
            self.velocities[i] = v;
            self.positions[i] = (self.positions[i] + v * dt).clamp(min, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::nearest_neighbor_edges;
    use crate::scatter::{ScatterParams, scatter};
    use folio_core::rng::Lcg;

    fn seeded_sim(n: usize, width: f32, height: f32) -> (ForceSim, Vec<Edge>) {
        let params = ScatterParams {
            padding: 20.0,
            min_spacing: 20.0,
            ..ScatterParams::default()
        };
        let positions = scatter(n, width, height, &params, &mut Lcg::new(42));
        let edges = nearest_neighbor_edges(&positions, 3);
        (ForceSim::new(positions, ForceParams::default()), edges)
    }

    #[test]
    fn positions_stay_finite_and_bounded() {
        let (mut sim, edges) = seeded_sim(14, 400.0, 300.0);
        for _ in 0..600 {
            sim.step(&edges, 400.0, 300.0, 1.0 / 30.0);
        }
        for p in sim.positions() {
            assert!(p.x.is_finite() && p.y.is_finite());
            assert!((16.0..=384.0).contains(&p.x), "{p:?}");
            assert!((16.0..=284.0).contains(&p.y), "{p:?}");
        }
    }

    #[test]
    fn system_settles_instead_of_oscillating() {
        let (mut sim, edges) = seeded_sim(10, 500.0, 400.0);
        for _ in 0..30 {
            sim.step(&edges, 500.0, 400.0, 1.0 / 30.0);
        }
        let early = sim.mean_speed();
        for _ in 0..600 {
            sim.step(&edges, 500.0, 400.0, 1.0 / 30.0);
        }
        let late = sim.mean_speed();
        assert!(late < early.max(1.0), "early {early}, late {late}");
        assert!(late < 20.0, "still moving fast after settling: {late}");
    }

    #[test]
    fn repulsion_separates_coincident_nodes() {
        let positions = vec![Vec2::new(100.0, 100.0); 3];
        let mut sim = ForceSim::new(positions, ForceParams::default());
        for _ in 0..120 {
            sim.step(&[], 200.0, 200.0, 1.0 / 30.0);
        }
        let p = sim.positions();
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert!(p[i].distance(p[j]) > 5.0, "nodes {i},{j} still overlap");
            }
        }
    }

    #[test]
    fn springs_pull_toward_rest_length() {
        let positions = vec![Vec2::new(50.0, 150.0), Vec2::new(450.0, 150.0)];
        let edges = vec![Edge::new(0, 1).unwrap()];
        let mut sim = ForceSim::new(positions, ForceParams::default());
        let initial = sim.positions()[0].distance(sim.positions()[1]);
        for _ in 0..300 {
            sim.step(&edges, 500.0, 300.0, 1.0 / 30.0);
        }
        let settled = sim.positions()[0].distance(sim.positions()[1]);
        assert!(settled < initial);
    }

    #[test]
    fn empty_and_zero_dt_are_noops() {
        let mut sim = ForceSim::new(Vec::new(), ForceParams::default());
        sim.step(&[], 100.0, 100.0, 1.0 / 30.0);
        assert!(sim.is_empty());

        let mut sim = ForceSim::new(vec![Vec2::new(10.0, 10.0)], ForceParams::default());
        let before = sim.positions()[0];
        sim.step(&[], 100.0, 100.0, 0.0);
        assert_eq!(sim.positions()[0], before);
    }

    #[test]
    fn stale_edge_indices_are_ignored() {
        let mut sim = ForceSim::new(vec![Vec2::new(10.0, 10.0)], ForceParams::default());
        let stale = vec![Edge::new(0, 5).unwrap()];
        sim.step(&stale, 100.0, 100.0, 1.0 / 30.0);
        assert!(sim.positions()[0].x.is_finite());
    }

    #[test]
    fn reset_replaces_state() {
        let (mut sim, edges) = seeded_sim(5, 300.0, 300.0);
        for _ in 0..60 {
            sim.step(&edges, 300.0, 300.0, 1.0 / 30.0);
        }
        sim.reset(vec![Vec2::new(1.0, 1.0); 2]);
        assert_eq!(sim.len(), 2);
        assert_eq!(sim.mean_speed(), 0.0);
    }
}
