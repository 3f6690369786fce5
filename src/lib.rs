//! Flappy Core - headless simulation for a single-screen tube-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, tube conveyor, scoring, collisions)
//! - `game_loop`: Host-facing initialize/update/shutdown API
//! - `settings`: Screen geometry and gameplay tuning
//! - `autopilot`: Demo controller for headless runs

pub mod autopilot;
pub mod error;
pub mod game_loop;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use game_loop::{GameLoop, SessionSummary};
pub use settings::{Dimensions, Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Downward acceleration applied to the player velocity (units/s²)
    pub const GRAVITY: f32 = 20.0;
    /// Velocity added by a single tap
    pub const BUMP_SPEED: f32 = 20.0;
    /// Horizontal tube scroll speed (units/s)
    pub const SCROLL_SPEED: f32 = 400.0;
    /// Vertical opening between the lower and upper block of a tube
    pub const GAP: f32 = 600.0;
    /// Minimum distance between the gap and the screen top/bottom
    pub const MIN_TUBE_POS: f32 = 200.0;
    /// Tubes on the conveyor
    pub const NUM_TUBES: usize = 4;
    /// Tube spacing as a fraction of screen width
    pub const TUBE_SPACING_RATIO: f32 = 0.75;

    /// Player sprite animation rate (frames per second)
    pub const ANIMATION_FPS: f32 = 10.0;
    /// Frames in the looping player animation
    pub const ANIMATION_FRAMES: u32 = 2;

    /// Reference screen and sprite sizes
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    pub const PLAYER_FRAME_WIDTH: f32 = 136.0;
    pub const PLAYER_FRAME_HEIGHT: f32 = 96.0;
    pub const TUBE_WIDTH: f32 = 100.0;
    pub const TUBE_HEIGHT: f32 = 600.0;

    /// Score text offset from the top-left corner
    pub const SCORE_INSET_X: f32 = 50.0;
    pub const SCORE_INSET_Y: f32 = 25.0;
}
