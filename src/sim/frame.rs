//! Render commands for the host
//!
//! A [`Frame`] is everything the host needs to draw one frame: sprite
//! positions, the animation frame, score text and the game-over banner.

use glam::Vec2;
use serde::Serialize;

use super::state::{GamePhase, GameState, RunEnd};
use crate::consts::*;

/// Player sprite draw call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteDraw {
    /// Bottom-left corner
    pub pos: Vec2,
    /// Index into the looping animation
    pub frame: u32,
}

/// Draw positions of one tube's blocks (bottom-left corners)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TubeDraw {
    pub lower: Vec2,
    pub upper: Vec2,
}

/// Everything drawn in one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub phase: GamePhase,
    /// Hidden once the run has ended
    pub player: Option<SpriteDraw>,
    pub tubes: Vec<TubeDraw>,
    pub score: u32,
    /// Top-left anchor of the score text
    pub score_anchor: Vec2,
    /// Centre of the game-over banner, only while the run is over
    pub game_over_banner: Option<Vec2>,
    pub last_end: Option<RunEnd>,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        let layout = state.layout();
        let screen = state.screen;

        let player = (state.phase != GamePhase::GameOver).then(|| SpriteDraw {
            pos: state.player.pos,
            frame: animation_frame(state.elapsed, state.tuning.animation_fps),
        });

        let tubes = state
            .conveyor
            .tubes()
            .iter()
            .map(|tube| TubeDraw {
                lower: Vec2::new(tube.x, tube.offset),
                upper: Vec2::new(tube.x, tube.upper_y(layout)),
            })
            .collect();

        let game_over_banner = (state.phase == GamePhase::GameOver)
            .then(|| Vec2::new(screen.x / 2.0, screen.y * 2.0 / 3.0));

        Self {
            phase: state.phase,
            player,
            tubes,
            score: state.score,
            score_anchor: Vec2::new(SCORE_INSET_X, screen.y - SCORE_INSET_Y),
            game_over_banner,
            last_end: state.last_end,
        }
    }

    /// Score as drawn on screen
    pub fn score_text(&self) -> String {
        self.score.to_string()
    }
}

/// Frame of the looping player animation shown `elapsed` seconds into the cycle
pub fn animation_frame(elapsed: f32, fps: f32) -> u32 {
    ((elapsed * fps).max(0.0) as u64 % ANIMATION_FRAMES as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_animation_alternates_at_ten_fps() {
        assert_eq!(animation_frame(0.0, 10.0), 0);
        assert_eq!(animation_frame(0.05, 10.0), 0);
        assert_eq!(animation_frame(0.15, 10.0), 1);
        assert_eq!(animation_frame(0.25, 10.0), 0);
        assert_eq!(animation_frame(1.35, 10.0), 1);
    }

    #[test]
    fn test_idle_frame() {
        let state = GameState::new(&Settings::default(), 4).unwrap();
        let frame = Frame::capture(&state);

        assert_eq!(frame.phase, GamePhase::Idle);
        assert_eq!(frame.player.map(|p| p.pos), Some(Vec2::new(332.0, 252.0)));
        assert_eq!(frame.tubes.len(), 4);
        assert_eq!(frame.tubes[0].lower.x, 800.0);
        assert_eq!(frame.score_anchor, Vec2::new(50.0, 575.0));
        assert_eq!(frame.score_text(), "0");
        assert!(frame.game_over_banner.is_none());
    }

    #[test]
    fn test_tube_blocks_separated_by_gap() {
        let state = GameState::new(&Settings::for_screen(1080.0, 1920.0), 4).unwrap();
        let frame = Frame::capture(&state);
        let layout = state.layout();

        for tube in &frame.tubes {
            assert_eq!(tube.lower.x, tube.upper.x);
            assert!((tube.upper.y - tube.lower.y - layout.tube_height - layout.gap).abs() < 1e-3);
        }
    }

    #[test]
    fn test_game_over_frame() {
        let mut state = GameState::new(&Settings::default(), 4).unwrap();
        tick(&mut state, &TickInput::tap(), 0.016);
        state.player.pos.y = 0.1;
        state.player.velocity = -1.0;
        tick(&mut state, &TickInput::default(), 0.016);

        let frame = Frame::capture(&state);
        assert_eq!(frame.phase, GamePhase::GameOver);
        assert!(frame.player.is_none());
        assert_eq!(frame.game_over_banner, Some(Vec2::new(400.0, 400.0)));
        assert_eq!(frame.last_end, Some(RunEnd::Floor));
    }

    #[test]
    fn test_frame_serializes() {
        let state = GameState::new(&Settings::default(), 4).unwrap();
        let json = serde_json::to_string(&Frame::capture(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Idle\""));
        assert!(json.contains("\"score\":0"));
    }
}
