//! Fixed-timestep frame driver
//!
//! The shell calls `frame` once per rendered frame with that frame's input
//! and wall-clock delta. Input is applied once, then the world advances in
//! whole `SIM_DT` ticks; leftover time carries to the next frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigError;
use crate::settings::SimSettings;
use crate::sim::{GameEvent, GameState, Intent, apply_intents, fixed_step, restart};

/// A running world plus its timestep accumulator
#[derive(Debug, Clone)]
pub struct Simulation {
    state: GameState,
    accumulator: f32,
}

impl Simulation {
    /// Validate `settings` and build the starting world
    pub fn new(settings: SimSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(settings)?,
            accumulator: 0.0,
        })
    }

    /// Apply one frame of input and run the ticks it paid for
    ///
    /// `frame_dt` is clamped to `MAX_FRAME_DT` and at most `MAX_SUBSTEPS`
    /// ticks run; returns how many did.
    pub fn frame(&mut self, intent: &Intent, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        apply_intents(&mut self.state, intent, dt);
        if intent.restart {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            fixed_step(&mut self.state, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop time the substep cap couldn't pay for
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Read-only view for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Rebuild the world from its settings
    pub fn restart(&mut self) {
        restart(&mut self.state);
        self.accumulator = 0.0;
    }

    /// Serialize the current world (pending events are not included)
    pub fn snapshot_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Resume from a snapshot written by `snapshot_json`
    ///
    /// Rejects worlds whose player or phase breaks the health invariants.
    pub fn from_snapshot_json(json: &str) -> Result<Self, ConfigError> {
        let state: GameState = serde_json::from_str(json)?;
        state.validate()?;
        log::info!(
            "Resumed snapshot at tick {} ({:?})",
            state.time_ticks,
            state.phase
        );
        Ok(Self {
            state,
            accumulator: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn game() -> Simulation {
        Simulation::new(SimSettings::full_game()).unwrap()
    }

    #[test]
    fn test_frame_runs_whole_ticks() {
        let mut sim = game();
        assert_eq!(sim.frame(&Intent::default(), SIM_DT * 2.5), 2);
        assert_eq!(sim.state().time_ticks, 2);
        // The leftover half tick carries over
        assert_eq!(sim.frame(&Intent::default(), SIM_DT * 0.6), 1);
        assert_eq!(sim.state().time_ticks, 3);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut sim = game();
        // 0.1 s at 60 Hz is six ticks, give or take float rounding
        let ran = sim.frame(&Intent::default(), 5.0);
        assert!((5..=6).contains(&ran));
        let ticks = sim.state().time_ticks;

        sim.frame(&Intent::default(), f32::NAN);
        sim.frame(&Intent::default(), -1.0);
        // Only a carried-over remainder can still be paid for
        assert!(sim.state().time_ticks <= ticks + 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut sim = game();
        for _ in 0..10 {
            assert!(sim.frame(&Intent::default(), MAX_FRAME_DT) <= MAX_SUBSTEPS);
        }
    }

    #[test]
    fn test_restart_intent_resets_clock() {
        let mut sim = game();
        sim.frame(&Intent::default(), 0.05);
        let ticks = sim.frame(
            &Intent {
                restart: true,
                ..Default::default()
            },
            0.05,
        );
        assert_eq!(ticks, 0);
        assert_eq!(sim.state().time_ticks, 0);
        assert_eq!(sim.state().phase, GamePhase::Playing);
        assert_eq!(sim.drain_events(), vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_snapshot_resumes_identically() {
        let mut sim = game();
        let walk = Intent {
            horizontal: 1.0,
            ..Default::default()
        };
        for _ in 0..30 {
            sim.frame(&walk, SIM_DT);
        }

        let json = sim.snapshot_json().unwrap();
        let mut resumed = Simulation::from_snapshot_json(&json).unwrap();
        for _ in 0..30 {
            sim.frame(&walk, SIM_DT);
            resumed.frame(&walk, SIM_DT);
        }
        assert_eq!(sim.state().player.position, resumed.state().player.position);
        assert_eq!(sim.state().time_ticks, resumed.state().time_ticks);
    }

    #[test]
    fn test_tampered_snapshot_is_rejected() {
        let sim = game();
        let json = sim.snapshot_json().unwrap();
        let mut doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        doc["player"]["hp"] = 99.into();
        doc["player"]["lives"] = 0.into();

        let err = Simulation::from_snapshot_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSnapshot { .. }));
        assert!(err.to_string().contains("hp 99"));
    }

    #[test]
    fn test_bad_snapshot_is_rejected() {
        assert!(matches!(
            Simulation::from_snapshot_json("{\"nope\": 1}"),
            Err(ConfigError::Parse(_))
        ));
    }
}
