//! Opening glare: a translucent white flash over the idle shards
//!
//! Alpha starts at `GLARE_MAX_ALPHA` and follows a quadratic ease-in/out
//! down to zero over `GLARE_FADE_FRAMES` frames. Once zero it stays inactive
//! until the next shatter.

use glam::UVec2;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;

use super::ease::Ease;
use super::fragment::raster_ring;
use super::polygon::Polygon;
use crate::colors::TRANSPARENT;
use crate::consts::{GLARE_FADE_FRAMES, GLARE_MAX_ALPHA};

/// Glare fade state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlareState {
    /// Current overlay alpha (0 = inactive)
    pub alpha: u8,
    /// Fade progress, 1.0 -> 0.0
    pub counter: f64,
}

impl Default for GlareState {
    fn default() -> Self {
        Self::new()
    }
}

impl GlareState {
    /// Full-strength glare
    pub fn new() -> Self {
        Self {
            alpha: GLARE_MAX_ALPHA,
            counter: 1.0,
        }
    }

    /// Glare that never shows
    pub fn inactive() -> Self {
        Self {
            alpha: 0,
            counter: 0.0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.alpha > 0
    }

    /// Step the fade after a frame has been drawn at the current alpha.
    pub fn advance(&mut self) {
        if !self.is_active() {
            return;
        }
        let eased = Ease::InOutQuad.apply(self.counter) * GLARE_MAX_ALPHA as f64;
        self.alpha = eased.floor().clamp(0.0, GLARE_MAX_ALPHA as f64) as u8;
        self.counter -= 1.0 / GLARE_FADE_FRAMES as f64;
    }

    /// Canvas-sized overlay: the polygons filled white at the current alpha.
    ///
    /// Returns `None` once the glare has faded out.
    pub fn overlay<'a>(
        &self,
        canvas: UVec2,
        polygons: impl IntoIterator<Item = &'a Polygon>,
    ) -> Option<RgbaImage> {
        if !self.is_active() {
            return None;
        }
        let color = Rgba([255, 255, 255, self.alpha]);
        let mut image = RgbaImage::from_pixel(canvas.x, canvas.y, TRANSPARENT);
        for polygon in polygons {
            let ring = raster_ring(polygon);
            if ring.len() >= 3 {
                draw_polygon_mut(&mut image, &ring, color);
            }
        }
        Some(image)
    }
}
