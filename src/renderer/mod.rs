//! Rendering module
//!
//! The transition only hands images and positions to a renderer; how they
//! reach the screen is up to the implementation.

pub mod canvas;

pub use canvas::CanvasRenderer;

use glam::IVec2;
use image::{Rgba, RgbaImage};

use crate::sim::{TransitionPhase, TransitionState};

/// Collaborator that presents a frame
pub trait Renderer {
    type Error;

    /// Clear to `background`
    fn begin_frame(&mut self, background: Rgba<u8>);

    /// Composite `image` with its top-left at `top_left`; transparent pixels are skipped
    fn draw_image(&mut self, image: &RgbaImage, top_left: IVec2);

    /// Present the frame
    fn end_frame(&mut self) -> Result<(), Self::Error>;
}

/// What went into a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub shards_drawn: usize,
    pub intact_source: bool,
    pub glare: bool,
}

/// Draw the current state.
///
/// Paused frames show the intact source at the box offset. Otherwise every
/// visible shard is drawn in order, then the glare over the idle shards.
pub fn render_frame<R: Renderer>(
    state: &TransitionState,
    renderer: &mut R,
) -> Result<FrameStats, R::Error> {
    let mut stats = FrameStats::default();
    renderer.begin_frame(Rgba(state.config.background));

    if state.phase == TransitionPhase::Paused {
        renderer.draw_image(state.source(), state.bbox.offset.round().as_ivec2());
        stats.intact_source = true;
    }

    for shard in state.visible_shards() {
        let sprite = shard.render();
        renderer.draw_image(&sprite.image, sprite.top_left);
        stats.shards_drawn += 1;
    }

    let idle = state.idle_shards().map(|s| &s.polygon);
    if let Some(overlay) = state.glare.overlay(state.config.canvas_size, idle) {
        renderer.draw_image(&overlay, IVec2::ZERO);
        stats.glare = true;
    }

    renderer.end_frame()?;
    Ok(stats)
}
