//! CPU compositor
//!
//! Alpha-blends every draw onto one RGBA canvas. Used by the headless
//! driver to write frames to disk.

use std::convert::Infallible;

use glam::{IVec2, UVec2};
use image::{Rgba, RgbaImage, imageops};

use super::Renderer;

pub struct CanvasRenderer {
    canvas: RgbaImage,
    frames_presented: u64,
}

impl CanvasRenderer {
    pub fn new(size: UVec2) -> Self {
        Self {
            canvas: RgbaImage::new(size.x, size.y),
            frames_presented: 0,
        }
    }

    /// The last composited frame
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Renderer for CanvasRenderer {
    type Error = Infallible;

    fn begin_frame(&mut self, background: Rgba<u8>) {
        for px in self.canvas.pixels_mut() {
            *px = background;
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, top_left: IVec2) {
        // Clips anything outside the canvas
        imageops::overlay(&mut self.canvas, image, top_left.x as i64, top_left.y as i64);
    }

    fn end_frame(&mut self) -> Result<(), Infallible> {
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{DARKEST, TRANSPARENT};
    use crate::renderer::render_frame;
    use crate::settings::ShatterConfig;
    use crate::sim::{TickInput, TransitionPhase, TransitionState, tick};
    use glam::DVec2;

    #[test]
    fn test_transparent_pixels_leave_canvas_untouched() {
        let mut renderer = CanvasRenderer::new(UVec2::new(8, 8));
        renderer.begin_frame(DARKEST);
        let mut sprite = RgbaImage::from_pixel(4, 4, TRANSPARENT);
        sprite.put_pixel(1, 1, Rgba([200, 10, 10, 255]));
        renderer.draw_image(&sprite, IVec2::new(2, 2));

        assert_eq!(*renderer.canvas().get_pixel(3, 3), Rgba([200, 10, 10, 255]));
        assert_eq!(*renderer.canvas().get_pixel(2, 2), DARKEST);
    }

    #[test]
    fn test_offscreen_draws_are_clipped() {
        let mut renderer = CanvasRenderer::new(UVec2::new(8, 8));
        renderer.begin_frame(DARKEST);
        let sprite = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        renderer.draw_image(&sprite, IVec2::new(-3, -3));
        renderer.draw_image(&sprite, IVec2::new(-100, 2));

        assert_eq!(*renderer.canvas().get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*renderer.canvas().get_pixel(1, 1), DARKEST);
    }

    #[test]
    fn test_paused_canvas_matches_source() {
        let config = ShatterConfig {
            canvas_size: UVec2::new(64, 64),
            box_offset: DVec2::new(8.0, 4.0),
            box_size: DVec2::new(48.0, 48.0),
            vertex_count: Some(6),
            ..Default::default()
        };
        let source = RgbaImage::from_fn(48, 48, |x, y| Rgba([x as u8 * 5, y as u8 * 5, 7, 255]));
        let state = TransitionState::new(config, source.clone()).unwrap();
        let mut renderer = CanvasRenderer::new(UVec2::new(64, 64));
        render_frame(&state, &mut renderer).unwrap();

        assert_eq!(renderer.canvas().get_pixel(8 + 10, 4 + 20), source.get_pixel(10, 20));
        assert_eq!(*renderer.canvas().get_pixel(2, 2), DARKEST);
        assert_eq!(renderer.frames_presented(), 1);
    }

    #[test]
    fn test_shards_show_source_colors_after_glare() {
        let config = ShatterConfig {
            seed: 3,
            canvas_size: UVec2::new(96, 96),
            box_offset: DVec2::new(16.0, 16.0),
            box_size: DVec2::new(64.0, 64.0),
            vertex_count: Some(4),
            ..Default::default()
        };
        let color = Rgba([30, 160, 220, 255]);
        let source = RgbaImage::from_pixel(64, 64, color);
        let mut state = TransitionState::new(config, source).unwrap();
        tick(&mut state, &TickInput { start: true, ..Default::default() }).unwrap();
        while state.phase == TransitionPhase::GlareFading {
            tick(&mut state, &TickInput::default()).unwrap();
        }

        let mut renderer = CanvasRenderer::new(UVec2::new(96, 96));
        render_frame(&state, &mut renderer).unwrap();
        // Every shard centroid is still near its start and shows the source color
        for shard in state.idle_shards() {
            let c = shard.centroid().round().as_uvec2();
            assert_eq!(*renderer.canvas().get_pixel(c.x, c.y), color);
        }
        // Outside the box stays background
        assert_eq!(*renderer.canvas().get_pixel(2, 2), DARKEST);
    }
}
