//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`], owned by the host
//! and passed by exclusive reference into [`tick`](super::tick).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::conveyor::{Conveyor, TubeLayout};
use crate::error::ConfigError;
use crate::settings::{Settings, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Run is set up, waiting for the first tap
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for a tap to restart
    GameOver,
}

/// Why the last run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEnd {
    /// Player fell to the bottom of the screen
    Floor,
    /// Player hit a block of the tube at this ring index
    Collision { tube: usize },
}

/// The player sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Bottom-left corner of the sprite
    pub pos: Vec2,
    /// Vertical velocity, applied to `pos.y` once per frame
    pub velocity: f32,
    /// Sprite frame size
    pub size: Vec2,
}

impl Player {
    /// Player centred on screen, at rest
    pub fn spawn(screen: Vec2, size: Vec2) -> Self {
        Self {
            pos: Vec2::new(screen.x / 2.0 - size.x / 2.0, screen.y / 2.0 - size.y / 2.0),
            velocity: 0.0,
            size,
        }
    }

    /// Highest y before the sprite pokes above the screen
    #[inline]
    pub fn ceiling(&self, screen_height: f32) -> f32 {
        screen_height - self.size.y
    }

    /// Circle collider centred on the sprite, as wide as the sprite
    pub fn collider(&self) -> Circle {
        Circle::new(
            Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y / 2.0),
            self.size.x / 2.0,
        )
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG started from (0 when an RNG was injected)
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Player sprite
    pub player: Player,
    /// Tube ring
    pub conveyor: Conveyor,
    /// Tubes cleared this run
    pub score: u32,
    /// Index of the only tube that can score next
    pub scoring_tube: usize,
    /// Seconds into the current animation cycle, advanced in every phase
    pub elapsed: f32,
    /// How the most recent run ended
    pub last_end: Option<RunEnd>,
    /// Screen size
    pub screen: Vec2,
    /// Gameplay constants
    pub tuning: Tuning,
    /// Gap offset source
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        let mut state = Self::with_rng(settings, Pcg32::seed_from_u64(seed))?;
        state.seed = seed;
        Ok(state)
    }

    /// Create a new game state drawing gap offsets from `rng`
    pub fn with_rng(settings: &Settings, mut rng: Pcg32) -> Result<Self, ConfigError> {
        settings.validate()?;

        let dims = &settings.dimensions;
        let layout = TubeLayout::derive(dims, &settings.tuning);
        let conveyor = Conveyor::new(layout, dims.screen.x, &mut rng);

        Ok(Self {
            seed: 0,
            phase: GamePhase::Idle,
            player: Player::spawn(dims.screen, dims.player_frame),
            conveyor,
            score: 0,
            scoring_tube: 0,
            elapsed: 0.0,
            last_end: None,
            screen: dims.screen,
            tuning: settings.tuning.clone(),
            rng,
        })
    }

    /// Put the player, score and tubes back to the start of a run
    pub fn reset_run(&mut self) {
        self.player = Player::spawn(self.screen, self.player.size);
        self.score = 0;
        self.scoring_tube = 0;
        self.last_end = None;
        self.conveyor.reset(self.screen.x, &mut self.rng);
    }

    #[inline]
    pub fn layout(&self) -> &TubeLayout {
        self.conveyor.layout()
    }

    /// A tube scores once its left edge reaches the player's left edge
    #[inline]
    pub fn scoring_threshold(&self) -> f32 {
        self.screen.x / 2.0 - self.player.size.x / 2.0
    }
}
