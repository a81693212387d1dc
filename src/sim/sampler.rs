//! Vertex sampling for the tessellation
//!
//! Sampled points are mirrored across all four box edges. Each mirror pair's
//! bisector is the edge itself, so every sampled point's cell is cut exactly
//! at the box boundary and no shard extends past the canvas.

use glam::DVec2;
use rand::Rng;

use super::bbox::BoundingBox;

/// Points fed to the tessellation: sampled seeds plus their reflections
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    /// Seeds strictly inside the box
    pub sampled: Vec<DVec2>,
    /// Mirror images across the four box edges
    pub reflected: Vec<DVec2>,
}

impl PointSet {
    /// All points, sampled first
    pub fn all(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.sampled.iter().chain(self.reflected.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.sampled.len() + self.reflected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sampled.is_empty()
    }
}

/// Sample `count` uniform points strictly inside `bbox` and reflect each across every edge.
///
/// A degenerate box has no interior and yields no points.
pub fn sample_vertices<R: Rng + ?Sized>(bbox: &BoundingBox, count: usize, rng: &mut R) -> PointSet {
    if bbox.is_degenerate() {
        return PointSet::default();
    }
    let (min, max) = (bbox.min(), bbox.max());

    let sampled: Vec<DVec2> = (0..count)
        .map(|_| {
            DVec2::new(
                sample_open(rng, min.x, max.x),
                sample_open(rng, min.y, max.y),
            )
        })
        .collect();

    let reflected = sampled
        .iter()
        .flat_map(|&p| reflect_across_edges(bbox, p))
        .collect();

    PointSet { sampled, reflected }
}

/// Mirror `p` across the left, right, top and bottom edges
pub fn reflect_across_edges(bbox: &BoundingBox, p: DVec2) -> [DVec2; 4] {
    let (min, max) = (bbox.min(), bbox.max());
    [
        DVec2::new(2.0 * min.x - p.x, p.y),
        DVec2::new(2.0 * max.x - p.x, p.y),
        DVec2::new(p.x, 2.0 * min.y - p.y),
        DVec2::new(p.x, 2.0 * max.y - p.y),
    ]
}

/// Uniform in the open interval (lo, hi)
fn sample_open<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    loop {
        let v = rng.random_range(lo..hi);
        if v > lo {
            return v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn reference_box() -> BoundingBox {
        BoundingBox::new(DVec2::new(128.0, 128.0), DVec2::new(512.0, 512.0))
    }

    #[test]
    fn test_sampled_strictly_inside() {
        let bbox = reference_box();
        let mut rng = Pcg32::seed_from_u64(1);
        let points = sample_vertices(&bbox, 500, &mut rng);
        assert_eq!(points.sampled.len(), 500);
        for p in &points.sampled {
            assert!(p.x > 128.0 && p.x < 640.0);
            assert!(p.y > 128.0 && p.y < 640.0);
        }
    }

    #[test]
    fn test_every_point_reflected_four_times() {
        let bbox = reference_box();
        let mut rng = Pcg32::seed_from_u64(2);
        let points = sample_vertices(&bbox, 25, &mut rng);
        assert_eq!(points.reflected.len(), 100);
        assert_eq!(points.len(), 125);
        for p in &points.reflected {
            assert!(!bbox.contains(*p));
        }
    }

    #[test]
    fn test_reflection_is_mirror() {
        let bbox = reference_box();
        let p = DVec2::new(138.0, 600.0);
        let [left, right, top, bottom] = reflect_across_edges(&bbox, p);
        assert_eq!(left, DVec2::new(118.0, 600.0));
        assert_eq!(right, DVec2::new(1142.0, 600.0));
        assert_eq!(top, DVec2::new(138.0, -344.0));
        assert_eq!(bottom, DVec2::new(138.0, 680.0));
    }

    #[test]
    fn test_seeded_sampling_is_deterministic() {
        let bbox = reference_box();
        let a = sample_vertices(&bbox, 10, &mut Pcg32::seed_from_u64(42));
        let b = sample_vertices(&bbox, 10, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.sampled, b.sampled);
    }

    #[test]
    fn test_degenerate_box_yields_nothing() {
        let bbox = BoundingBox::new(DVec2::new(10.0, 10.0), DVec2::new(0.0, 50.0));
        let points = sample_vertices(&bbox, 10, &mut Pcg32::seed_from_u64(1));
        assert!(points.is_empty());
        assert_eq!(points.len(), 0);
    }
}
