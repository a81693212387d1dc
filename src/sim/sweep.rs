//! Sweep frontier
//!
//! A vertical line that starts at the box's left edge and steps right by a
//! random 8-12 units per frame. Idle shards whose centroid falls left of it
//! start sweeping, so motion spreads across the image as a wave.

use rand::Rng;

use super::bbox::BoundingBox;
use super::shard::{MotionState, Shard};
use crate::consts::FRONTIER_STEP;

/// Advancing horizontal threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepFrontier {
    /// Current x position
    pub x: f64,
    /// Stop advancing once past this
    pub far_edge: f64,
}

impl SweepFrontier {
    pub fn new(bbox: &BoundingBox) -> Self {
        Self {
            x: bbox.min().x,
            far_edge: bbox.max().x,
        }
    }

    /// Reached the far edge
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.x >= self.far_edge
    }

    /// Step right by a random increment, until the far edge is reached
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.is_exhausted() {
            self.x += rng.random_range(FRONTIER_STEP.0..=FRONTIER_STEP.1);
        }
    }

    #[inline]
    pub fn has_passed(&self, x: f64) -> bool {
        x < self.x
    }

    /// Start every idle shard whose centroid the frontier has passed.
    ///
    /// Returns how many shards were triggered this frame.
    pub fn trigger<R: Rng + ?Sized>(
        &self,
        shards: &mut [Shard],
        bbox: &BoundingBox,
        margin: f64,
        rng: &mut R,
    ) -> usize {
        let mut triggered = 0;
        for shard in shards
            .iter_mut()
            .filter(|s| s.motion == MotionState::Idle)
        {
            if self.has_passed(shard.centroid().x) {
                shard.begin_sweep(bbox, margin, rng);
                triggered += 1;
            }
        }
        triggered
    }
}
