//! Fixed-timestep driver
//!
//! The presentation layer calls [`FixedStep::advance`] once per rendered
//! frame with whatever time elapsed. The driver turns that into whole
//! `SIM_DT` ticks, so gameplay speed does not depend on the frame rate.

use super::state::GameState;
use super::tick::{TickInput, tick};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            max_substeps: max_substeps.max(1),
        }
    }

    /// Leftover time not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Run as many ticks as `frame_dt` covers. One-shot inputs are applied
    /// on the first tick only and cleared from `input` once used. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, input: &mut TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < self.max_substeps {
            tick(state, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            input.clear_one_shots();
        }

        // Drop what we could not catch up on rather than spiral
        if substeps == self.max_substeps && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::GamePhase;
    use crate::sim::state::Rules;

    #[test]
    fn test_ticks_match_elapsed_time() {
        let mut state = GameState::new(Rules::default(), 10);
        let mut input = TickInput {
            start: true,
            ..Default::default()
        };
        let mut clock = FixedStep::default();

        // 30 frames at 30 fps is one second of simulation
        let mut ticks = 0;
        for _ in 0..30 {
            ticks += clock.advance(&mut state, &mut input, 1.0 / 30.0);
        }
        assert!((59..=60).contains(&ticks));
        assert_eq!(state.phase(), GamePhase::Playing);
        assert!(!input.has_one_shots());
    }

    #[test]
    fn test_huge_frame_is_clamped() {
        let mut state = GameState::new(Rules::default(), 10);
        let mut input = TickInput::default();
        let mut clock = FixedStep::new(3);
        let ticks = clock.advance(&mut state, &mut input, 5.0);
        assert_eq!(ticks, 3);
        assert!(clock.pending() < SIM_DT);
    }

    #[test]
    fn test_one_shot_applied_once() {
        let mut state = GameState::new(Rules::default(), 10);
        let mut input = TickInput {
            start: true,
            ..Default::default()
        };
        let mut clock = FixedStep::default();
        clock.advance(&mut state, &mut input, SIM_DT * 2.5);

        input.pause = true;
        let ticks = clock.advance(&mut state, &mut input, SIM_DT * 3.0);
        assert!(ticks >= 3);
        // A pause held over several ticks must not toggle back
        assert_eq!(state.phase(), GamePhase::Paused);
    }
}
