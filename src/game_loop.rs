//! Host-facing game loop
//!
//! The host calls [`GameLoop::initialize`] once, [`GameLoop::update`] once per
//! rendered frame, and [`GameLoop::shutdown`] when tearing down.

use rand_pcg::Pcg32;
use serde::Serialize;

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::sim::{Frame, GamePhase, GameState, TickInput, tick};

/// Statistics for one session, kept in memory only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Runs started, including restarts after game over
    pub runs: u32,
    /// Highest score reached in any run
    pub best_score: u32,
    /// Frames simulated
    pub frames: u64,
}

/// Owns the simulation and translates host frames into ticks
#[derive(Debug, Clone)]
pub struct GameLoop {
    state: GameState,
    summary: SessionSummary,
}

impl GameLoop {
    /// Validate settings, derive the tube layout and set up the first run
    pub fn initialize(settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        let state = GameState::new(settings, seed)?;
        log::info!(
            "Game initialized with seed {} ({}x{} screen, {} tubes)",
            seed,
            state.screen.x,
            state.screen.y,
            state.conveyor.len()
        );
        Ok(Self::from_state(state))
    }

    /// Like [`initialize`](Self::initialize), with a caller-provided RNG
    pub fn with_rng(settings: &Settings, rng: Pcg32) -> Result<Self, ConfigError> {
        GameState::with_rng(settings, rng).map(Self::from_state)
    }

    fn from_state(state: GameState) -> Self {
        Self {
            state,
            summary: SessionSummary::default(),
        }
    }

    /// Advance one frame and return what to draw
    pub fn update(&mut self, delta: f32, tapped: bool) -> Frame {
        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            log::warn!("Ignoring invalid frame delta {}", delta);
            0.0
        };

        let before = self.state.phase;
        tick(&mut self.state, &TickInput { tapped }, delta);
        self.summary.frames += 1;

        if before != GamePhase::Playing && self.state.phase == GamePhase::Playing {
            self.summary.runs += 1;
        }
        self.summary.best_score = self.summary.best_score.max(self.state.score);

        Frame::capture(&self.state)
    }

    /// What to draw without advancing time
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.state)
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// End the session and hand back its statistics
    pub fn shutdown(self) -> SessionSummary {
        log::info!(
            "Session over: {} runs, best score {}, {} frames",
            self.summary.runs,
            self.summary.best_score,
            self.summary.frames
        );
        self.summary
    }
}
