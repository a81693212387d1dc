//! Transition state
//!
//! Everything that changes over a transition lives in one value. Ticks
//! mutate it; nothing else does.

use image::RgbaImage;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bbox::BoundingBox;
use super::fragment::cut_fragment;
use super::glare::GlareState;
use super::sampler::sample_vertices;
use super::shard::{MotionState, Shard};
use super::sweep::SweepFrontier;
use super::voronoi::{tessellate, tessellate_with_retry};
use crate::consts::IDLE_SPIN_RANGE;
use crate::error::ShatterError;
use crate::settings::ShatterConfig;

/// Phase of the transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPhase {
    /// Waiting for a start signal; the intact image is shown
    Paused,
    /// Building shards (completes within the tick that enters it)
    Shattering,
    /// Glare fading out while shards spin down
    GlareFading,
    /// Frontier sweeping shards off the canvas
    Sweeping,
    /// Every shard gone; holding before accepting a reset
    CoolingDown,
    /// Waiting for a reset signal
    ReadyToReset,
}

/// Complete transition state
#[derive(Debug, Clone)]
pub struct TransitionState {
    pub config: ShatterConfig,
    /// Shattered region (fixed for the life of the state)
    pub bbox: BoundingBox,
    pub phase: TransitionPhase,
    pub shards: Vec<Shard>,
    pub glare: GlareState,
    pub frontier: SweepFrontier,
    /// Frames left in `CoolingDown`
    pub cooldown_ticks: u32,
    /// Tick counter
    pub time_ticks: u64,
    /// Completed shatters since creation
    pub shatter_count: u32,
    /// Seeded from `config.seed`; every random draw goes through here
    pub rng: Pcg32,
    source: RgbaImage,
    next_id: u32,
}

impl TransitionState {
    /// Create a paused transition over `source`, which is drawn at the box offset.
    pub fn new(config: ShatterConfig, source: RgbaImage) -> Result<Self, ShatterError> {
        config.validate()?;
        let bbox = config.bounding_box();

        let box_width = bbox.size.x.ceil() as u32;
        let box_height = bbox.size.y.ceil() as u32;
        if source.width() < box_width || source.height() < box_height {
            return Err(ShatterError::SourceTooSmall {
                image_width: source.width(),
                image_height: source.height(),
                box_width,
                box_height,
            });
        }

        Ok(Self {
            rng: Pcg32::seed_from_u64(config.seed),
            bbox,
            phase: TransitionPhase::Paused,
            shards: Vec::new(),
            glare: GlareState::inactive(),
            frontier: SweepFrontier::new(&bbox),
            cooldown_ticks: 0,
            time_ticks: 0,
            shatter_count: 0,
            source,
            next_id: 1,
            config,
        })
    }

    /// The immutable source raster
    #[inline]
    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    /// Allocate a new shard ID
    pub fn next_shard_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the shard collection with freshly sampled geometry.
    ///
    /// Resets the glare, frontier and cooldown. Returns the shard count.
    pub fn shatter(&mut self) -> Result<usize, ShatterError> {
        let bbox = self.bbox;
        let count = self.config.vertex_count();
        let shrink = self.config.shrink_factor;
        let rng = &mut self.rng;
        let polygons = tessellate_with_retry(self.config.max_shatter_attempts, |_| {
            let points = sample_vertices(&bbox, count, rng);
            tessellate(&points, &bbox, shrink)
        })?;

        self.shards.clear();
        for polygon in polygons {
            let fragment = cut_fragment(&self.source, &bbox, &polygon);
            let spin = self.rng.random_range(-IDLE_SPIN_RANGE..IDLE_SPIN_RANGE);
            let id = self.next_shard_id();
            self.shards.push(Shard::new(
                id,
                polygon,
                fragment,
                spin,
                self.config.idle_friction,
            ));
        }

        self.glare = GlareState::new();
        self.frontier = SweepFrontier::new(&bbox);
        self.cooldown_ticks = 0;
        self.shatter_count += 1;
        log::info!(
            "Shatter #{}: {} shards from {} vertices",
            self.shatter_count,
            self.shards.len(),
            count
        );
        Ok(self.shards.len())
    }

    /// Drop all geometry and go back to `Paused`
    pub fn restart(&mut self) {
        self.shards.clear();
        self.glare = GlareState::inactive();
        self.frontier = SweepFrontier::new(&self.bbox);
        self.cooldown_ticks = 0;
        self.phase = TransitionPhase::Paused;
        log::info!("Transition restarted");
    }

    /// Every shard has left the canvas
    pub fn all_gone(&self) -> bool {
        self.shards.iter().all(|s| s.motion == MotionState::Gone)
    }

    /// Shards still on the canvas
    pub fn visible_shards(&self) -> impl Iterator<Item = &Shard> {
        self.shards.iter().filter(|s| s.is_visible())
    }

    /// Shards that have not started sweeping
    pub fn idle_shards(&self) -> impl Iterator<Item = &Shard> {
        self.shards.iter().filter(|s| s.motion == MotionState::Idle)
    }
}
