//! Voronoi tessellation of the sampled points
//!
//! Each cell is built by intersecting half-planes: start from a frame well
//! outside the box and clip by the perpendicular bisector between the seed
//! and every neighbour, nearest first. Cells that still touch the frame are
//! unbounded. Surviving cells inside the box are shrunk about their own
//! centroids to open the cracks between shards.

use std::cmp::Ordering;

use glam::DVec2;

use super::bbox::BoundingBox;
use super::polygon::Polygon;
use super::sampler::PointSet;
use crate::consts::BOUNDARY_EPSILON;
use crate::error::ShatterError;

/// Vertices within this distance of the clipping frame mark a cell as unbounded
const FRAME_TOLERANCE: f64 = 1e-6;

/// One Voronoi region
#[derive(Debug, Clone)]
pub struct Cell {
    pub seed: DVec2,
    pub polygon: Polygon,
    /// False if the region reaches the clipping frame (infinite in the true diagram)
    pub bounded: bool,
}

/// Frame large enough that every bounded cell of interest lies inside it
fn clipping_frame(bbox: &BoundingBox) -> BoundingBox {
    bbox.expanded(2.0 * bbox.size.max_element())
}

/// Compute the Voronoi region of every distinct point, clipped to a frame around `bbox`.
pub fn voronoi_cells(points: &[DVec2], bbox: &BoundingBox) -> Vec<Cell> {
    let mut seeds: Vec<DVec2> = points.iter().copied().filter(|p| p.is_finite()).collect();
    seeds.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    seeds.dedup();

    let frame = clipping_frame(bbox);
    let frame_ring = Polygon::new(frame.corners().to_vec());

    let mut neighbours: Vec<(f64, DVec2)> = Vec::with_capacity(seeds.len());
    seeds
        .iter()
        .map(|&seed| {
            neighbours.clear();
            neighbours.extend(
                seeds
                    .iter()
                    .filter(|&&other| other != seed)
                    .map(|&other| (seed.distance_squared(other), other)),
            );
            neighbours.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut polygon = frame_ring.clone();
            let mut reach_sq = max_distance_squared(&polygon, seed);
            for &(dist_sq, other) in &neighbours {
                // A neighbour further than twice the cell's reach cannot cut it
                if dist_sq > 4.0 * reach_sq {
                    break;
                }
                let normal = other - seed;
                let midpoint = (seed + other) * 0.5;
                polygon = polygon.clip_half_plane(normal, normal.dot(midpoint));
                if polygon.is_empty() {
                    break;
                }
                reach_sq = max_distance_squared(&polygon, seed);
            }

            let bounded = !polygon.is_empty() && !touches_frame(&polygon, &frame);
            Cell {
                seed,
                polygon,
                bounded,
            }
        })
        .collect()
}

fn max_distance_squared(polygon: &Polygon, seed: DVec2) -> f64 {
    polygon
        .vertices()
        .iter()
        .map(|v| v.distance_squared(seed))
        .fold(0.0, f64::max)
}

fn touches_frame(polygon: &Polygon, frame: &BoundingBox) -> bool {
    let inner = frame.expanded(-FRAME_TOLERANCE);
    polygon.vertices().iter().any(|&v| !inner.contains(v))
}

/// True if the cell is a usable shard outline for `bbox`
fn keep_cell(cell: &Cell, bbox: &BoundingBox) -> bool {
    cell.bounded
        && cell.polygon.is_valid()
        && cell
            .polygon
            .vertices()
            .iter()
            .all(|&v| bbox.contains_within(v, BOUNDARY_EPSILON))
        && bbox.contains(cell.polygon.centroid())
}

/// Bounded, valid cells that lie inside `bbox` (before shrinking).
///
/// With the reflected points included these tile the box exactly.
pub fn box_cells(points: &PointSet, bbox: &BoundingBox) -> Vec<Polygon> {
    let all: Vec<DVec2> = points.all().collect();
    let cells = voronoi_cells(&all, bbox);
    let total = cells.len();
    let kept: Vec<Polygon> = cells
        .into_iter()
        .filter(|cell| keep_cell(cell, bbox))
        .map(|cell| cell.polygon)
        .collect();
    log::debug!(
        "Tessellation: {} points, {} cells, {} inside box",
        all.len(),
        total,
        kept.len()
    );
    kept
}

/// Shrink each polygon about its own centroid, dropping any that degenerate
pub fn shrink_cells(cells: Vec<Polygon>, factor: f64) -> Vec<Polygon> {
    cells
        .into_iter()
        .map(|poly| poly.scaled(poly.centroid(), factor))
        .filter(Polygon::is_valid)
        .collect()
}

/// Full tessellation: box cells shrunk by `shrink_factor`
pub fn tessellate(points: &PointSet, bbox: &BoundingBox, shrink_factor: f64) -> Vec<Polygon> {
    shrink_cells(box_cells(points, bbox), shrink_factor)
}

/// Run `attempt` until it yields at least one polygon, up to `max_attempts` times.
pub fn tessellate_with_retry(
    max_attempts: u32,
    mut attempt: impl FnMut(u32) -> Vec<Polygon>,
) -> Result<Vec<Polygon>, ShatterError> {
    for n in 1..=max_attempts {
        let polygons = attempt(n);
        if !polygons.is_empty() {
            return Ok(polygons);
        }
        log::warn!("Shatter attempt {}/{} produced no shards, resampling", n, max_attempts);
    }
    Err(ShatterError::EmptyTessellation {
        attempts: max_attempts,
    })
}
