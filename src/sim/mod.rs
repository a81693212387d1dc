//! Deterministic transition module
//!
//! All geometry and animation lives here. This module must be pure and deterministic:
//! - Frame-counted timing only
//! - Seeded RNG only
//! - Stable iteration order (shards in tessellation order)
//! - No presentation or platform dependencies

pub mod bbox;
pub mod ease;
pub mod fragment;
pub mod glare;
pub mod polygon;
pub mod sampler;
pub mod shard;
pub mod state;
pub mod sweep;
pub mod tick;
pub mod voronoi;

pub use bbox::{BoundingBox, Rect};
pub use ease::Ease;
pub use fragment::{Fragment, cut_fragment, mask_fragment};
pub use glare::GlareState;
pub use polygon::Polygon;
pub use sampler::{PointSet, reflect_across_edges, sample_vertices};
pub use shard::{MotionState, Shard, ShardSprite, sweep_tween};
pub use state::{TransitionPhase, TransitionState};
pub use sweep::SweepFrontier;
pub use tick::{TickInput, tick};
pub use voronoi::{Cell, box_cells, shrink_cells, tessellate, tessellate_with_retry, voronoi_cells};
