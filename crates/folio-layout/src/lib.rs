#![forbid(unsafe_code)]

//! Layout algorithms for the node visualizations.
//!
//! Two placement strategies: a one-shot seeded scatter with rejection
//! sampling ([`scatter`]) and a continuously relaxed force simulation
//! ([`force`]). Edge sets derive deterministically from positions
//! ([`edges`]); pointer lookup runs through [`hit`]. All randomness is
//! seeded, so identical content yields identical geometry across runs.

pub mod edges;
pub mod force;
pub mod hit;
pub mod scatter;

pub use edges::{Edge, cross_links, nearest_neighbor_edges};
pub use force::{ForceParams, ForceSim};
pub use hit::{hit_circle, hit_rect};
pub use scatter::{ScatterParams, scatter};
