//! Transition settings
//!
//! Loaded once at startup from JSON; every field has a default so partial
//! files are fine.

use std::path::Path;

use glam::{DVec2, UVec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ShatterError;
use crate::sim::BoundingBox;

/// Shard density presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShardDensity {
    Coarse,
    #[default]
    Medium,
    Fine,
}

impl ShardDensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShardDensity::Coarse => "Coarse",
            ShardDensity::Medium => "Medium",
            ShardDensity::Fine => "Fine",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "coarse" | "low" => Some(ShardDensity::Coarse),
            "medium" | "med" => Some(ShardDensity::Medium),
            "fine" | "high" => Some(ShardDensity::Fine),
            _ => None,
        }
    }

    /// Sampled vertices for this preset
    pub fn vertex_count(&self) -> usize {
        match self {
            ShardDensity::Coarse => 40,
            ShardDensity::Medium => VERTEX_COUNT,
            ShardDensity::Fine => 200,
        }
    }
}

/// Shatter transition configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShatterConfig {
    /// Seed for the transition's RNG (same seed, same shatter)
    pub seed: u64,

    // === Canvas ===
    /// Full canvas handed to the renderer
    pub canvas_size: UVec2,
    /// Top-left of the shattered region; the source image is drawn here
    pub box_offset: DVec2,
    /// Size of the shattered region
    pub box_size: DVec2,
    /// Background fill (RGBA)
    pub background: [u8; 4],

    // === Geometry ===
    /// Density preset
    pub density: ShardDensity,
    /// Explicit vertex count (overrides `density`)
    pub vertex_count: Option<usize>,
    /// Per-cell shrink about its centroid (0, 1]
    pub shrink_factor: f64,
    /// Attempts before giving up on an empty tessellation
    pub max_shatter_attempts: u32,

    // === Motion ===
    /// Idle spin decay per frame [0, 1)
    pub idle_friction: f64,
    /// Distance past the canvas that sweeping shards travel
    pub sweep_margin: f64,
    /// Frames held after the last shard leaves
    pub cooldown_frames: u32,
}

impl Default for ShatterConfig {
    fn default() -> Self {
        Self {
            seed: 0,

            canvas_size: UVec2::new(768, 768),
            box_offset: DVec2::new(128.0, 128.0),
            box_size: DVec2::new(512.0, 512.0),
            background: crate::colors::DARKEST.0,

            density: ShardDensity::Medium,
            vertex_count: None,
            shrink_factor: SHRINK_FACTOR,
            max_shatter_attempts: MAX_SHATTER_ATTEMPTS,

            idle_friction: IDLE_FRICTION,
            sweep_margin: SWEEP_MARGIN,
            cooldown_frames: COOLDOWN_FRAMES,
        }
    }
}

impl ShatterConfig {
    /// Create a config from a density preset
    pub fn from_density(density: ShardDensity) -> Self {
        Self {
            density,
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ShatterError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShatterError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ShatterError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Effective sampled vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertex_count.unwrap_or_else(|| self.density.vertex_count())
    }

    /// The shattered region
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.box_offset, self.box_size)
    }

    pub fn validate(&self) -> Result<(), ShatterError> {
        let invalid = |msg: String| Err(ShatterError::InvalidConfig(msg));

        if !(self.box_size.x > 0.0 && self.box_size.y > 0.0) || !self.box_size.is_finite() {
            return invalid(format!("box_size must be positive, got {}", self.box_size));
        }
        if !self.box_offset.is_finite() || self.box_offset.min_element() < 0.0 {
            return invalid(format!("box_offset must be non-negative, got {}", self.box_offset));
        }
        let box_far = self.box_offset + self.box_size;
        if box_far.x > self.canvas_size.x as f64 || box_far.y > self.canvas_size.y as f64 {
            return invalid(format!(
                "canvas {} does not contain box ending at {}",
                self.canvas_size, box_far
            ));
        }
        if self.vertex_count() == 0 {
            return invalid("vertex_count must be at least 1".to_string());
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor <= 1.0) {
            return invalid(format!("shrink_factor must be in (0, 1], got {}", self.shrink_factor));
        }
        if !(0.0..1.0).contains(&self.idle_friction) {
            return invalid(format!("idle_friction must be in [0, 1), got {}", self.idle_friction));
        }
        if self.sweep_margin.is_nan() || self.sweep_margin < 0.0 {
            return invalid(format!("sweep_margin must be non-negative, got {}", self.sweep_margin));
        }
        if self.max_shatter_attempts == 0 {
            return invalid("max_shatter_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_scene() {
        let config = ShatterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.vertex_count(), 100);
        let bbox = config.bounding_box();
        assert_eq!(bbox.min(), DVec2::new(128.0, 128.0));
        assert_eq!(bbox.max(), DVec2::new(640.0, 640.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ShatterConfig::from_json_str(r#"{ "seed": 7, "density": "fine" }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.vertex_count(), 200);
        assert_eq!(config.shrink_factor, SHRINK_FACTOR);
    }

    #[test]
    fn test_vertex_count_override() {
        let config = ShatterConfig {
            vertex_count: Some(12),
            ..ShatterConfig::from_density(ShardDensity::Coarse)
        };
        assert_eq!(config.vertex_count(), 12);
    }

    #[test]
    fn test_density_from_str() {
        assert_eq!(ShardDensity::from_str("FINE"), Some(ShardDensity::Fine));
        assert_eq!(ShardDensity::from_str("med"), Some(ShardDensity::Medium));
        assert_eq!(ShardDensity::from_str("chunky"), None);
        assert_eq!(ShardDensity::Coarse.as_str(), "Coarse");
    }

    #[test]
    fn test_validate_rejects_degenerate_box() {
        let config = ShatterConfig {
            box_size: DVec2::new(0.0, 512.0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ShatterError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_box_outside_canvas() {
        let config = ShatterConfig {
            canvas_size: UVec2::new(600, 600),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_friction() {
        let config = ShatterConfig {
            idle_friction: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ShatterConfig::from_json_str("{ seed: "),
            Err(ShatterError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ShatterConfig::load("/nonexistent/shatter.json").unwrap_err();
        assert!(matches!(err, ShatterError::ConfigIo { .. }));
    }
}
