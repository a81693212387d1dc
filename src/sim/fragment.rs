//! Shard image fragments
//!
//! A fragment is the source image cropped to a polygon's bounding rectangle,
//! plus a masked copy where everything outside the polygon is transparent.
//! The mask is built in two passes: rasterize the polygon as a marker image
//! (foreground inside, background outside), then min-compose the markers
//! with the crop. Background-marked pixels are then replaced with the
//! transparent color key.

use glam::{DVec2, UVec2};
use image::{Pixel, RgbaImage, imageops};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use super::bbox::BoundingBox;
use super::polygon::Polygon;
use crate::colors::{MARKER_BACKGROUND, MARKER_FOREGROUND, TRANSPARENT};
use crate::consts::BOUNDARY_EPSILON;

/// Pixel buffers cut for one polygon
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Canvas position of the fragment's top-left pixel (fractional if the box offset is)
    pub origin: DVec2,
    /// Crop of the source image
    pub source: RgbaImage,
    /// Same size as `source`; transparent outside the polygon
    pub masked: RgbaImage,
}

impl Fragment {
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.source.width(), self.source.height())
    }
}

/// Cut the fragment for `polygon` (canvas coordinates) out of `source`.
///
/// `source` is drawn with its top-left at `bbox.offset`.
///
/// # Panics
///
/// If the polygon's bounds leave the source image. Tessellation keeps every
/// polygon inside the box and the source is validated to cover the box, so
/// this is an invariant violation.
pub fn cut_fragment(source: &RgbaImage, bbox: &BoundingBox, polygon: &Polygon) -> Fragment {
    let bounds = polygon.bounds().expect("shard polygons are never empty");

    // Integer crop in image space
    let extent = DVec2::new(source.width() as f64, source.height() as f64);
    let image_min = (bounds.min - bbox.offset).floor();
    let image_max = (bounds.max - bbox.offset).ceil();
    assert!(
        image_min.min_element() >= -BOUNDARY_EPSILON
            && image_max.x <= extent.x + BOUNDARY_EPSILON
            && image_max.y <= extent.y + BOUNDARY_EPSILON,
        "polygon bounds {:?}..{:?} exceed source image {}x{}",
        image_min,
        image_max,
        source.width(),
        source.height()
    );
    // Cells may graze the box edge by float noise
    let image_min = image_min.clamp(DVec2::ZERO, extent - 1.0);
    let image_max = image_max.clamp(image_min + 1.0, extent);
    let crop_origin = image_min.as_uvec2();
    let crop_size = (image_max - image_min).as_uvec2().max(UVec2::ONE);

    let cropped =
        imageops::crop_imm(source, crop_origin.x, crop_origin.y, crop_size.x, crop_size.y)
            .to_image();

    let world_origin = bbox.offset + image_min;
    let local = polygon.translated(-world_origin);
    let masked = mask_fragment(&cropped, &local);

    Fragment {
        origin: world_origin,
        source: cropped,
        masked,
    }
}

/// Build the masked copy of `fragment`; `local` is in fragment pixel coordinates.
pub fn mask_fragment(fragment: &RgbaImage, local: &Polygon) -> RgbaImage {
    let markers = polygon_markers(fragment.width(), fragment.height(), local);

    let mut masked = fragment.clone();
    for ((dst, src), marker) in masked
        .pixels_mut()
        .zip(fragment.pixels())
        .zip(markers.pixels())
    {
        *dst = marker.map2(src, u8::min);
        if *marker == MARKER_BACKGROUND {
            *dst = TRANSPARENT;
        }
    }
    masked
}

/// Marker image: foreground inside `local`, background elsewhere
fn polygon_markers(width: u32, height: u32, local: &Polygon) -> RgbaImage {
    let mut markers = RgbaImage::from_pixel(width, height, MARKER_BACKGROUND);
    let ring = raster_ring(local);
    if ring.len() >= 3 {
        draw_polygon_mut(&mut markers, &ring, MARKER_FOREGROUND);
    }
    markers
}

/// Round to pixel corners, dropping repeats (the rasterizer rejects a closed ring)
pub(crate) fn raster_ring(polygon: &Polygon) -> Vec<Point<i32>> {
    let mut ring: Vec<Point<i32>> = Vec::with_capacity(polygon.len());
    for v in polygon.vertices() {
        let p = to_raster(*v);
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

#[inline]
fn to_raster(v: DVec2) -> Point<i32> {
    let r = v.round();
    Point::new(r.x as i32, r.y as i32)
}
