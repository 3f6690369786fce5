//! Screen geometry and gameplay tuning
//!
//! Loaded from a JSON file by the headless runner; hosts may also build it in code.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Host-supplied geometry (pixels in the reference build)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Screen width and height
    pub screen: Vec2,
    /// Size of one player animation frame
    pub player_frame: Vec2,
    /// Size of a single tube block (lower and upper blocks share it)
    pub tube_block: Vec2,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            screen: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            player_frame: Vec2::new(PLAYER_FRAME_WIDTH, PLAYER_FRAME_HEIGHT),
            tube_block: Vec2::new(TUBE_WIDTH, TUBE_HEIGHT),
        }
    }
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Velocity lost per second
    pub gravity: f32,
    /// Velocity gained per tap
    pub bump_speed: f32,
    /// Tube scroll speed (units/s)
    pub scroll_speed: f32,
    /// Opening between lower and upper block
    pub gap: f32,
    /// Minimum clearance between the gap and either screen edge
    pub min_tube_pos: f32,
    /// Number of tubes on the conveyor
    pub num_tubes: usize,
    /// Tube spacing as a fraction of screen width
    pub tube_spacing_ratio: f32,
    /// Player animation rate
    pub animation_fps: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            bump_speed: BUMP_SPEED,
            scroll_speed: SCROLL_SPEED,
            gap: GAP,
            min_tube_pos: MIN_TUBE_POS,
            num_tubes: NUM_TUBES,
            tube_spacing_ratio: TUBE_SPACING_RATIO,
            animation_fps: ANIMATION_FPS,
        }
    }
}

/// Everything needed to initialize a game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dimensions: Dimensions,
    pub tuning: Tuning,
}

impl Settings {
    /// Settings for the given geometry and tube count, with default tuning
    pub fn new(screen: Vec2, player_frame: Vec2, tube_block: Vec2, num_tubes: usize) -> Self {
        Self {
            dimensions: Dimensions {
                screen,
                player_frame,
                tube_block,
            },
            tuning: Tuning {
                num_tubes,
                ..Tuning::default()
            },
        }
    }

    /// Settings for a given screen, keeping default sprites and tuning
    pub fn for_screen(width: f32, height: f32) -> Self {
        let mut settings = Self::default();
        settings.dimensions.screen = Vec2::new(width, height);
        settings
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check the preconditions the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = &self.dimensions;
        let tuning = &self.tuning;

        positive("screen width", dims.screen.x)?;
        positive("screen height", dims.screen.y)?;
        positive("player frame width", dims.player_frame.x)?;
        positive("player frame height", dims.player_frame.y)?;
        positive("tube width", dims.tube_block.x)?;
        positive("tube height", dims.tube_block.y)?;

        positive("scroll_speed", tuning.scroll_speed)?;
        positive("gap", tuning.gap)?;
        positive("tube_spacing_ratio", tuning.tube_spacing_ratio)?;
        positive("animation_fps", tuning.animation_fps)?;
        finite("gravity", tuning.gravity)?;
        finite("bump_speed", tuning.bump_speed)?;
        if !(tuning.min_tube_pos.is_finite() && tuning.min_tube_pos >= 0.0) {
            return Err(ConfigError::NegativeMargin(tuning.min_tube_pos));
        }
        if tuning.num_tubes == 0 {
            return Err(ConfigError::NoTubes);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}
