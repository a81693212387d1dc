//! Shards and their per-frame motion
//!
//! A shard keeps the mask cut at creation for its whole life. Motion lives in
//! the outline (rotated about its centroid, translated while sweeping) and in
//! the accumulated angle; each frame the mask is re-rotated by that angle and
//! placed so its pivot lands on the outline's live centroid.

use glam::{DVec2, IVec2, UVec2};
use image::RgbaImage;
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use rand::Rng;

use super::bbox::{BoundingBox, Rect};
use super::ease::Ease;
use super::fragment::Fragment;
use super::polygon::Polygon;
use crate::colors::TRANSPARENT;
use crate::consts::{REST_THRESHOLD, SWEEP_SPIN_SPEEDS, TWEEN_SAMPLES};
use crate::rotate_about;

/// Shard motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Spinning down in place
    Idle,
    /// Following its sweep tween off the canvas
    Sweeping,
    /// Off the canvas; no longer drawn
    Gone,
}

/// One polygonal fragment of the source image
#[derive(Debug, Clone)]
pub struct Shard {
    pub id: u32,
    /// Current world-space outline
    pub polygon: Polygon,
    /// Crop of the source under the original outline's bounds
    pub source_fragment: RgbaImage,
    /// `source_fragment` with everything outside the original outline transparent
    pub masked_image: RgbaImage,
    /// Accumulated rotation (degrees, clockwise on screen)
    pub rotation_angle: f64,
    /// Degrees per frame
    pub rotation_velocity: f64,
    pub friction: f64,
    pub motion: MotionState,
    /// Sweep x positions, one per frame; built on sweep entry
    pub tween: Option<Vec<f64>>,
    pub tween_frame: usize,
    /// Canvas placement of the rendered image
    pub top_left: DVec2,
    /// Rotation pivot in mask pixel coordinates (the original centroid)
    pivot: DVec2,
}

/// A shard's image for this frame and where to draw it
#[derive(Debug, Clone)]
pub struct ShardSprite {
    pub image: RgbaImage,
    pub top_left: IVec2,
}

/// Where the rotated mask lands
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    /// Rotated mask bounds, relative to the unrotated mask origin (integral)
    min: DVec2,
    size: UVec2,
    top_left: DVec2,
}

impl Shard {
    pub fn new(
        id: u32,
        polygon: Polygon,
        fragment: Fragment,
        rotation_velocity: f64,
        friction: f64,
    ) -> Self {
        let pivot = polygon.centroid() - fragment.origin;
        let mut shard = Self {
            id,
            polygon,
            source_fragment: fragment.source,
            masked_image: fragment.masked,
            rotation_angle: 0.0,
            rotation_velocity,
            friction,
            motion: MotionState::Idle,
            tween: None,
            tween_frame: 0,
            top_left: DVec2::ZERO,
            pivot,
        };
        shard.top_left = shard.placement().top_left;
        shard
    }

    #[inline]
    pub fn centroid(&self) -> DVec2 {
        self.polygon.centroid()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.motion != MotionState::Gone
    }

    /// Size of the rotated image at the current angle
    pub fn sprite_size(&self) -> UVec2 {
        self.placement().size
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        match self.motion {
            MotionState::Idle => {
                self.spin();
            }
            MotionState::Sweeping => {
                self.spin();
                self.advance_tween();
            }
            MotionState::Gone => return,
        }
        self.top_left = self.placement().top_left;
    }

    /// Apply this frame's spin, then decay it
    fn spin(&mut self) {
        let step = self.rotation_velocity;
        if step != 0.0 {
            self.rotation_angle += step;
            self.polygon = self.polygon.rotated(self.polygon.centroid(), step);
        }

        self.rotation_velocity *= self.friction;
        if self.rotation_velocity.abs() <= REST_THRESHOLD {
            self.rotation_velocity = 0.0;
        }
    }

    fn advance_tween(&mut self) {
        let Some(tween) = self.tween.as_ref() else {
            return;
        };
        let last = tween.len().saturating_sub(1);
        let prev = self.tween_frame;
        self.tween_frame = (self.tween_frame + 1).min(last);

        let dx = tween[self.tween_frame] - tween[prev];
        if dx != 0.0 {
            self.polygon = self.polygon.translated(DVec2::new(dx, 0.0));
        }
        if self.tween_frame == last {
            self.motion = MotionState::Gone;
        }
    }

    /// Start sweeping off the canvas. Only idle shards respond.
    ///
    /// Spin friction is lifted and a faster spin is drawn. The tween is built
    /// once, from the current placement: it carries the shard leftwards past
    /// the box's left edge by a full box width plus `margin`.
    pub fn begin_sweep<R: Rng + ?Sized>(&mut self, bbox: &BoundingBox, margin: f64, rng: &mut R) {
        if self.motion != MotionState::Idle {
            return;
        }
        self.friction = 1.0;
        self.rotation_velocity = SWEEP_SPIN_SPEEDS[rng.random_range(0..SWEEP_SPIN_SPEEDS.len())];

        if self.tween.is_none() {
            let placement = self.placement();
            let start = placement.top_left.x;
            let travel = (start - bbox.min().x).max(0.0)
                + bbox.size.x
                + margin
                + placement.size.x as f64;
            self.tween = Some(sweep_tween(start, start - travel));
            self.tween_frame = 0;
        }
        self.motion = MotionState::Sweeping;
    }

    fn placement(&self) -> Placement {
        let (w, h) = self.masked_image.dimensions();
        let corners = [
            DVec2::ZERO,
            DVec2::new(w as f64, 0.0),
            DVec2::new(w as f64, h as f64),
            DVec2::new(0.0, h as f64),
        ];
        let rotated = corners.map(|c| rotate_about(c, self.pivot, self.rotation_angle));
        let bounds = Rect::from_points(rotated).unwrap_or(Rect {
            min: DVec2::ZERO,
            max: DVec2::ZERO,
        });
        // Trim float noise so a zero angle keeps the mask's own size
        let min = (bounds.min + 1e-6).floor();
        let max = (bounds.max - 1e-6).ceil();
        let size = (max - min).max(DVec2::ONE).as_uvec2();

        Placement {
            min,
            size,
            top_left: self.centroid() - (self.pivot - min),
        }
    }

    /// Render this frame's image: the mask rotated about its pivot
    pub fn render(&self) -> ShardSprite {
        let placement = self.placement();
        let image = if self.rotation_angle == 0.0 {
            self.masked_image.clone()
        } else {
            let mut out = RgbaImage::from_pixel(placement.size.x, placement.size.y, TRANSPARENT);
            let pivot = self.pivot.as_vec2();
            let shift = (self.pivot - placement.min).as_vec2();
            let projection = Projection::translate(shift.x, shift.y)
                * Projection::rotate(self.rotation_angle.to_radians() as f32)
                * Projection::translate(-pivot.x, -pivot.y);
            warp_into(
                &self.masked_image,
                &projection,
                Interpolation::Nearest,
                TRANSPARENT,
                &mut out,
            );
            out
        };
        ShardSprite {
            image,
            top_left: self.top_left.round().as_ivec2(),
        }
    }
}

/// Sweep tween: `TWEEN_SAMPLES` x positions eased (quintic in/out) from `from` toward `to`
pub fn sweep_tween(from: f64, to: f64) -> Vec<f64> {
    Ease::InOutQuint.samples(from, to, TWEEN_SAMPLES)
}
