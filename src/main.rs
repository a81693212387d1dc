//! Shatter entry point
//!
//! Runs the transition headless and writes the composited frames as PNGs.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use image::{Rgba, RgbaImage, imageops};

use shatter::renderer::{CanvasRenderer, render_frame};
use shatter::consts::FRAME_RATE;
use shatter::sim::{TickInput, TransitionPhase, TransitionState, tick};
use shatter::{ShardDensity, ShatterConfig};

#[derive(Parser, Debug)]
#[command(name = "shatter", version)]
struct Args {
    /// Source image; scaled to the bounding box. A gradient is generated if omitted.
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    /// Density preset: coarse, medium or fine (overrides the config).
    #[arg(long)]
    density: Option<String>,

    /// Output directory for frames.
    #[arg(long, default_value = "frames")]
    out: PathBuf,

    /// Write every Nth frame.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Stop after this many frames regardless of phase.
    #[arg(long, default_value_t = 1000)]
    max_frames: u64,

    /// Shatter cycles to run (each reset starts another).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    cycles: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ShatterConfig::load(path)?,
        None => ShatterConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(name) = &args.density {
        config.density = ShardDensity::from_str(name)
            .with_context(|| format!("unknown density '{}'", name))?;
        config.vertex_count = None;
    }
    log::info!(
        "Shatter starting: seed={} density={} vertices={}",
        config.seed,
        config.density.as_str(),
        config.vertex_count()
    );

    let box_size = config.box_size.ceil().as_uvec2();
    let source = match &args.image {
        Some(path) => load_source(path, box_size.x, box_size.y)?,
        None => gradient(box_size.x, box_size.y),
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let canvas_size = config.canvas_size;
    let mut state = TransitionState::new(config, source)?;
    let mut renderer = CanvasRenderer::new(canvas_size);
    let every = args.every.max(1);

    let mut cycles_done = 0;
    let mut last_phase = state.phase;
    let mut written = 0;
    for frame in 0..args.max_frames {
        let input = TickInput {
            start: frame == 0,
            reset: state.phase == TransitionPhase::ReadyToReset && cycles_done < args.cycles,
        };
        tick(&mut state, &input)?;

        // Count a cycle once, on entry to ReadyToReset
        if state.phase != last_phase {
            if state.phase == TransitionPhase::ReadyToReset {
                cycles_done += 1;
                log::info!("Cycle {}/{} complete at frame {}", cycles_done, args.cycles, frame);
            }
            last_phase = state.phase;
        }

        render_frame(&state, &mut renderer)?;
        if frame % every == 0 {
            let path = args.out.join(format!("frame_{:05}.png", frame));
            renderer
                .canvas()
                .save(&path)
                .with_context(|| format!("write png '{}'", path.display()))?;
            written += 1;
        }

        if cycles_done >= args.cycles {
            break;
        }
    }

    log::info!(
        "Done: {} ticks ({:.1}s at {} fps), {} frames written to {}",
        state.time_ticks,
        state.time_ticks as f64 / FRAME_RATE as f64,
        FRAME_RATE,
        written,
        args.out.display()
    );
    Ok(())
}

fn load_source(path: &Path, width: u32, height: u32) -> anyhow::Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    if image.dimensions() == (width, height) {
        return Ok(image);
    }
    log::info!(
        "Scaling {} from {}x{} to {}x{}",
        path.display(),
        image.width(),
        image.height(),
        width,
        height
    );
    Ok(imageops::resize(&image, width, height, imageops::FilterType::Triangle))
}

/// Diagonal gradient stand-in for a source image
fn gradient(width: u32, height: u32) -> RgbaImage {
    let span = (width + height).max(1) as f32;
    RgbaImage::from_fn(width, height, |x, y| {
        let t = (x + y) as f32 / span;
        Rgba([
            (0xbd as f32 * (1.0 - t) + 0x50 as f32 * t) as u8,
            (0x93 as f32 * (1.0 - t) + 0xfa as f32 * t) as u8,
            (0xf9 as f32 * (1.0 - t) + 0x7b as f32 * t) as u8,
            0xff,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_defaults_to_one() {
        let args = Args::try_parse_from(["shatter"]).unwrap();
        assert_eq!(args.cycles, 1);
    }

    #[test]
    fn test_zero_cycles_rejected() {
        assert!(Args::try_parse_from(["shatter", "--cycles", "0"]).is_err());
        let args = Args::try_parse_from(["shatter", "--cycles", "3"]).unwrap();
        assert_eq!(args.cycles, 3);
    }
}
