//! Closed polygon rings
//!
//! Vertices are stored once (the closing edge back to the first vertex is
//! implicit). Every transform returns a new polygon; a shard swaps in the
//! new value rather than editing vertices in place.

use glam::DVec2;

use super::bbox::Rect;
use crate::rotate_about;

/// Areas below this are treated as zero
pub const AREA_EPSILON: f64 = 1e-9;

/// A closed ring of vertices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<DVec2>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate edges as (start, end), including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Shoelace area (positive for clockwise rings in y-down canvas space)
    pub fn signed_area(&self) -> f64 {
        self.edges().map(|(a, b)| a.perp_dot(b)).sum::<f64>() * 0.5
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// At least three vertices and non-zero area
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3 && self.area() > AREA_EPSILON
    }

    /// Area-weighted centroid. Falls back to the vertex mean for degenerate rings.
    pub fn centroid(&self) -> DVec2 {
        if self.vertices.is_empty() {
            return DVec2::ZERO;
        }
        // Relative to the first vertex to keep the products small
        let origin = self.vertices[0];
        let mut weighted = DVec2::ZERO;
        let mut twice_area = 0.0;
        for (a, b) in self.edges() {
            let (a, b) = (a - origin, b - origin);
            let cross = a.perp_dot(b);
            twice_area += cross;
            weighted += (a + b) * cross;
        }
        if twice_area.abs() <= AREA_EPSILON {
            let sum: DVec2 = self.vertices.iter().copied().sum();
            return sum / self.vertices.len() as f64;
        }
        origin + weighted / (3.0 * twice_area)
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.vertices.iter().copied())
    }

    /// Rotate about `origin` by `degrees` (clockwise on screen)
    pub fn rotated(&self, origin: DVec2, degrees: f64) -> Self {
        self.map(|p| rotate_about(p, origin, degrees))
    }

    pub fn translated(&self, delta: DVec2) -> Self {
        self.map(|p| p + delta)
    }

    /// Uniform scale about `origin`
    pub fn scaled(&self, origin: DVec2, factor: f64) -> Self {
        self.map(|p| origin + (p - origin) * factor)
    }

    fn map(&self, f: impl Fn(DVec2) -> DVec2) -> Self {
        Self {
            vertices: self.vertices.iter().copied().map(f).collect(),
        }
    }

    /// Even-odd point containment
    pub fn contains(&self, p: DVec2) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Distance from `p` to the nearest edge
    pub fn distance_to_boundary(&self, p: DVec2) -> f64 {
        self.edges()
            .map(|(a, b)| {
                let ab = b - a;
                let len_sq = ab.length_squared();
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                p.distance(a + ab * t)
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Keep the part of a convex ring where `normal · p <= offset`.
    ///
    /// Sutherland-Hodgman against a single half-plane. The result may be empty.
    pub fn clip_half_plane(&self, normal: DVec2, offset: f64) -> Self {
        let n = self.vertices.len();
        let mut out = Vec::with_capacity(n + 1);
        for i in 0..n {
            let cur = self.vertices[i];
            let next = self.vertices[(i + 1) % n];
            let d_cur = normal.dot(cur) - offset;
            let d_next = normal.dot(next) - offset;

            if d_cur <= 0.0 {
                out.push(cur);
            }
            if (d_cur < 0.0 && d_next > 0.0) || (d_cur > 0.0 && d_next < 0.0) {
                let t = d_cur / (d_cur - d_next);
                out.push(cur + (next - cur) * t);
            }
        }
        Self { vertices: out }
    }
}
