//! Shatter - Voronoi shard transition effect
//!
//! Core modules:
//! - `sim`: Deterministic geometry + animation (sampling, tessellation, shards, phases)
//! - `renderer`: Renderer collaborator trait and a CPU canvas compositor
//! - `settings`: Data-driven transition configuration
//! - `error`: Library error type

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ShatterError;
pub use settings::{ShardDensity, ShatterConfig};

use glam::DVec2;

/// Transition configuration constants
pub mod consts {
    /// Nominal frame cadence. Durations are frame-counted; this only informs the driver.
    pub const FRAME_RATE: u32 = 30;

    /// Vertices sampled inside the bounding box (before reflection)
    pub const VERTEX_COUNT: usize = 100;
    /// Cells with a vertex further than this outside the box are dropped
    pub const BOUNDARY_EPSILON: f64 = 1.0;
    /// Scale applied to each cell about its own centroid to open the cracks
    pub const SHRINK_FACTOR: f64 = 0.9;
    /// Shatter attempts before an empty tessellation is reported upward
    pub const MAX_SHATTER_ATTEMPTS: u32 = 5;

    /// Initial idle spin is drawn from (-IDLE_SPIN_RANGE, IDLE_SPIN_RANGE) degrees/frame
    pub const IDLE_SPIN_RANGE: f64 = 1.0;
    /// Per-frame multiplicative decay of idle spin
    pub const IDLE_FRICTION: f64 = 0.9;
    /// Spin at or below this magnitude snaps to exactly zero
    pub const REST_THRESHOLD: f64 = 0.05;
    /// Spin speeds (degrees/frame) picked when a shard starts sweeping
    pub const SWEEP_SPIN_SPEEDS: [f64; 6] = [-5.0, -4.0, -3.0, 3.0, 4.0, 5.0];

    /// Samples in a sweep tween (one consumed per frame)
    pub const TWEEN_SAMPLES: usize = 60;
    /// Extra distance past the canvas a sweeping shard travels
    pub const SWEEP_MARGIN: f64 = 200.0;
    /// Frontier advance per frame (min, max)
    pub const FRONTIER_STEP: (f64, f64) = (8.0, 12.0);

    /// Glare starting alpha
    pub const GLARE_MAX_ALPHA: u8 = 130;
    /// Glare fade length in frames (0.6s at 30 fps)
    pub const GLARE_FADE_FRAMES: u32 = 18;

    /// Hold after the last shard leaves, before a reset is accepted
    pub const COOLDOWN_FRAMES: u32 = 30;
}

/// Palette
pub mod colors {
    use image::Rgba;

    pub const DARKEST: Rgba<u8> = Rgba([0x12, 0x12, 0x12, 0xff]);
    /// Color key for pixels outside a shard polygon
    pub const TRANSPARENT: Rgba<u8> = Rgba([0xff, 0x00, 0xff, 0x00]);
    /// Mask marker for pixels outside the polygon
    pub const MARKER_BACKGROUND: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);
    /// Mask marker for pixels inside the polygon
    pub const MARKER_FOREGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
}

/// Rotate `point` about `origin` by `degrees`.
///
/// Canvas coordinates are y-down, so positive angles turn clockwise on screen.
#[inline]
pub fn rotate_about(point: DVec2, origin: DVec2, degrees: f64) -> DVec2 {
    origin + DVec2::from_angle(degrees.to_radians()).rotate(point - origin)
}
