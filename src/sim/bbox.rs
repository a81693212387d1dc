//! Axis-aligned boxes
//!
//! `BoundingBox` is the shattered canvas region (offset + size) and is
//! immutable once a shatter begins. `Rect` is the min/max bounds of a polygon.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// The working canvas region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub offset: DVec2,
    pub size: DVec2,
}

impl BoundingBox {
    pub fn new(offset: DVec2, size: DVec2) -> Self {
        Self { offset, size }
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        self.offset
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.offset + self.size
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.size.x * self.size.y
    }

    /// Inclusive containment
    pub fn contains(&self, p: DVec2) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Containment with `epsilon` of slack on every edge
    pub fn contains_within(&self, p: DVec2, epsilon: f64) -> bool {
        self.expanded(epsilon).contains(p)
    }

    /// Grow (or shrink, for negative `margin`) every edge by `margin`
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            offset: self.offset - DVec2::splat(margin),
            size: self.size + DVec2::splat(2.0 * margin),
        }
    }

    /// Corners in ring order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [DVec2; 4] {
        let (min, max) = (self.min(), self.max());
        [min, DVec2::new(max.x, min.y), max, DVec2::new(min.x, max.y)]
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }
}

/// Min/max bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    /// Bounds of a point cloud (`None` when empty)
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |r, p| Self {
            min: r.min.min(p),
            max: r.max.max(p),
        }))
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}
