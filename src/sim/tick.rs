//! Per-frame transition tick
//!
//! Advances the phase machine by exactly one frame.

use super::state::{TransitionPhase, TransitionState};
use crate::error::ShatterError;

/// External signals for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Begin the transition (honoured only while `Paused`)
    pub start: bool,
    /// Shatter again (honoured only while `ReadyToReset`)
    pub reset: bool,
}

/// Advance the transition by one frame.
///
/// A failed shatter returns the transition to `Paused` and reports the error.
pub fn tick(state: &mut TransitionState, input: &TickInput) -> Result<(), ShatterError> {
    let phase_before = state.phase;

    // Signals only count in the phase that waits for them
    match state.phase {
        TransitionPhase::Paused if input.start => state.phase = TransitionPhase::Shattering,
        TransitionPhase::ReadyToReset if input.reset => state.phase = TransitionPhase::Shattering,
        _ => {}
    }

    state.time_ticks += 1;

    match state.phase {
        TransitionPhase::Paused | TransitionPhase::ReadyToReset => {}
        TransitionPhase::Shattering => {
            if let Err(err) = state.shatter() {
                log::error!("Shatter failed: {}", err);
                state.phase = TransitionPhase::Paused;
                return Err(err);
            }
            state.phase = TransitionPhase::GlareFading;
        }
        TransitionPhase::GlareFading => {
            update_shards(state);
            state.glare.advance();
            if !state.glare.is_active() {
                state.phase = TransitionPhase::Sweeping;
            }
        }
        TransitionPhase::Sweeping => {
            state.frontier.advance(&mut state.rng);
            let triggered = state.frontier.trigger(
                &mut state.shards,
                &state.bbox,
                state.config.sweep_margin,
                &mut state.rng,
            );
            if triggered > 0 {
                log::debug!("Frontier at {:.1}: {} shards released", state.frontier.x, triggered);
            }
            update_shards(state);
            if state.all_gone() {
                state.cooldown_ticks = state.config.cooldown_frames;
                state.phase = TransitionPhase::CoolingDown;
            }
        }
        TransitionPhase::CoolingDown => {
            state.cooldown_ticks = state.cooldown_ticks.saturating_sub(1);
            if state.cooldown_ticks == 0 {
                state.phase = TransitionPhase::ReadyToReset;
            }
        }
    }

    if state.phase != phase_before {
        log::info!(
            "Tick {}: {:?} -> {:?}",
            state.time_ticks,
            phase_before,
            state.phase
        );
    }
    Ok(())
}

fn update_shards(state: &mut TransitionState) {
    for shard in &mut state.shards {
        shard.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ShatterConfig;
    use crate::sim::shard::MotionState;
    use glam::{DVec2, UVec2};
    use image::{Rgba, RgbaImage};

    fn small_config(seed: u64) -> ShatterConfig {
        ShatterConfig {
            seed,
            canvas_size: UVec2::new(128, 128),
            box_offset: DVec2::new(16.0, 16.0),
            box_size: DVec2::new(96.0, 96.0),
            vertex_count: Some(12),
            cooldown_frames: 5,
            ..Default::default()
        }
    }

    fn new_state(seed: u64) -> TransitionState {
        let source = RgbaImage::from_fn(96, 96, |x, y| Rgba([(x * 2) as u8, (y * 2) as u8, 60, 255]));
        TransitionState::new(small_config(seed), source).unwrap()
    }

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    fn reset() -> TickInput {
        TickInput {
            reset: true,
            ..Default::default()
        }
    }

    /// Tick with no signals until `phase` is reached; returns ticks taken
    fn run_until(state: &mut TransitionState, phase: TransitionPhase) -> usize {
        let mut ticks = 0;
        while state.phase != phase {
            tick(state, &TickInput::default()).unwrap();
            ticks += 1;
            assert!(ticks < 2000, "stuck in {:?}", state.phase);
        }
        ticks
    }

    #[test]
    fn test_paused_until_started() {
        let mut state = new_state(1);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default()).unwrap();
        }
        assert_eq!(state.phase, TransitionPhase::Paused);
        assert!(state.shards.is_empty());

        tick(&mut state, &start()).unwrap();
        assert_eq!(state.phase, TransitionPhase::GlareFading);
        assert_eq!(state.shards.len(), 12);
        assert_eq!(state.shatter_count, 1);
    }

    #[test]
    fn test_reset_ignored_while_paused() {
        let mut state = new_state(1);
        tick(&mut state, &reset()).unwrap();
        assert_eq!(state.phase, TransitionPhase::Paused);
        assert_eq!(state.shatter_count, 0);
    }

    #[test]
    fn test_start_ignored_mid_transition() {
        let mut state = new_state(2);
        tick(&mut state, &start()).unwrap();
        let ids: Vec<u32> = state.shards.iter().map(|s| s.id).collect();
        for _ in 0..5 {
            tick(&mut state, &start()).unwrap();
            tick(&mut state, &reset()).unwrap();
        }
        assert_eq!(state.shatter_count, 1);
        assert_eq!(state.shards.iter().map(|s| s.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_glare_phase_lasts_fade_length() {
        let mut state = new_state(3);
        tick(&mut state, &start()).unwrap();
        let ticks = run_until(&mut state, TransitionPhase::Sweeping);
        assert_eq!(ticks, crate::consts::GLARE_FADE_FRAMES as usize);
        assert!(!state.glare.is_active());
    }

    #[test]
    fn test_full_cycle_phase_order() {
        let mut state = new_state(4);
        let mut phases = vec![state.phase];
        tick(&mut state, &start()).unwrap();
        for _ in 0..2000 {
            if phases.last() != Some(&state.phase) {
                phases.push(state.phase);
            }
            if state.phase == TransitionPhase::ReadyToReset {
                break;
            }
            tick(&mut state, &TickInput::default()).unwrap();
        }
        assert_eq!(
            phases,
            vec![
                TransitionPhase::Paused,
                TransitionPhase::GlareFading,
                TransitionPhase::Sweeping,
                TransitionPhase::CoolingDown,
                TransitionPhase::ReadyToReset,
            ]
        );
        assert!(state.all_gone());
        assert_eq!(state.visible_shards().count(), 0);
    }

    #[test]
    fn test_cooldown_length() {
        let mut state = new_state(5);
        tick(&mut state, &start()).unwrap();
        run_until(&mut state, TransitionPhase::CoolingDown);
        assert_eq!(run_until(&mut state, TransitionPhase::ReadyToReset), 5);

        // Holds until a reset arrives
        for _ in 0..10 {
            tick(&mut state, &start()).unwrap();
        }
        assert_eq!(state.phase, TransitionPhase::ReadyToReset);
    }

    #[test]
    fn test_idle_shards_stay_ahead_of_frontier() {
        let mut state = new_state(6);
        tick(&mut state, &start()).unwrap();
        run_until(&mut state, TransitionPhase::Sweeping);
        while state.phase == TransitionPhase::Sweeping {
            tick(&mut state, &TickInput::default()).unwrap();
            for shard in state.idle_shards() {
                assert!(!state.frontier.has_passed(shard.centroid().x));
            }
        }
    }

    #[test]
    fn test_sweeping_shards_move_left() {
        let mut state = new_state(7);
        tick(&mut state, &start()).unwrap();
        run_until(&mut state, TransitionPhase::Sweeping);
        let start_x: Vec<f64> = state.shards.iter().map(|s| s.centroid().x).collect();
        for _ in 0..30 {
            tick(&mut state, &TickInput::default()).unwrap();
        }
        let moved = state
            .shards
            .iter()
            .zip(&start_x)
            .filter(|(s, x)| s.motion != MotionState::Idle && s.centroid().x < **x)
            .count();
        assert!(moved > 0);
    }

    #[test]
    fn test_reset_reshatters_with_fresh_geometry() {
        let mut state = new_state(8);
        tick(&mut state, &start()).unwrap();
        let first: Vec<_> = state.shards.iter().map(|s| s.polygon.clone()).collect();
        run_until(&mut state, TransitionPhase::ReadyToReset);

        tick(&mut state, &reset()).unwrap();
        assert_eq!(state.phase, TransitionPhase::GlareFading);
        assert_eq!(state.shatter_count, 2);
        assert!(state.glare.is_active());
        assert!(state.shards.iter().all(|s| s.motion == MotionState::Idle));
        let second: Vec<_> = state.shards.iter().map(|s| s.polygon.clone()).collect();
        assert_ne!(first, second);

        // IDs keep counting across shatters
        assert!(state.shards.iter().all(|s| s.id > 12));
    }

    #[test]
    fn test_restart_returns_to_paused() {
        let mut state = new_state(9);
        tick(&mut state, &start()).unwrap();
        run_until(&mut state, TransitionPhase::Sweeping);
        state.restart();
        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.phase, TransitionPhase::Paused);
        tick(&mut state, &start()).unwrap();
        assert_eq!(state.phase, TransitionPhase::GlareFading);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = new_state(42);
        let mut b = new_state(42);
        tick(&mut a, &start()).unwrap();
        tick(&mut b, &start()).unwrap();
        for _ in 0..80 {
            tick(&mut a, &TickInput::default()).unwrap();
            tick(&mut b, &TickInput::default()).unwrap();
            assert_eq!(a.phase, b.phase);
            assert_eq!(a.frontier, b.frontier);
            for (sa, sb) in a.shards.iter().zip(&b.shards) {
                assert_eq!(sa.polygon, sb.polygon);
                assert_eq!(sa.rotation_angle, sb.rotation_angle);
                assert_eq!(sa.motion, sb.motion);
            }
        }
    }

    #[test]
    fn test_empty_tessellation_returns_to_paused() {
        let config = ShatterConfig {
            max_shatter_attempts: 2,
            ..small_config(1)
        };
        let source = RgbaImage::new(96, 96);
        let mut state = TransitionState::new(config, source).unwrap();
        // A zero-area box region cannot be reached through config; force it
        state.bbox = crate::sim::BoundingBox::new(DVec2::new(16.0, 16.0), DVec2::ZERO);
        let err = tick(&mut state, &start()).unwrap_err();
        assert!(matches!(err, ShatterError::EmptyTessellation { attempts: 2 }));
        assert_eq!(state.phase, TransitionPhase::Paused);
    }
}
