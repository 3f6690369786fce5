//! Per-frame simulation tick
//!
//! Core game loop: phase transitions, player physics, tube scrolling, scoring
//! and collision checks, driven by the host's frame delta.

use super::collision::circle_rect_overlap;
use super::state::{GamePhase, GameState, RunEnd};
use crate::consts::ANIMATION_FRAMES;

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// The screen was tapped since the previous frame
    pub tapped: bool,
}

impl TickInput {
    pub fn tap() -> Self {
        Self { tapped: true }
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Wrapped to one animation cycle
    let period = ANIMATION_FRAMES as f32 / state.tuning.animation_fps;
    state.elapsed = (state.elapsed + dt) % period;

    match state.phase {
        GamePhase::Idle => {
            // Run was already set up; just start it
            if input.tapped {
                state.phase = GamePhase::Playing;
                log::info!("Run started");
            }
        }

        GamePhase::Playing => play(state, input, dt),

        GamePhase::GameOver => {
            if input.tapped {
                state.reset_run();
                state.phase = GamePhase::Playing;
                log::info!("Run restarted");
            }
        }
    }
}

fn play(state: &mut GameState, input: &TickInput, dt: f32) {
    let hit_floor = integrate_player(state, input, dt);

    let distance = state.tuning.scroll_speed * dt;
    state.conveyor.advance(distance, &mut state.rng);

    score_passed_tubes(state);

    // Floor contact wins over a same-frame collision
    if hit_floor {
        end_run(state, RunEnd::Floor);
        return;
    }

    if let Some(tube) = find_collision(state) {
        end_run(state, RunEnd::Collision { tube });
    }
}

/// Apply bump, gravity and the ceiling clamp. Returns true on floor contact.
fn integrate_player(state: &mut GameState, input: &TickInput, dt: f32) -> bool {
    let tuning = &state.tuning;
    let ceiling = state.player.ceiling(state.screen.y);
    let player = &mut state.player;

    if input.tapped {
        player.velocity += tuning.bump_speed;
    }

    // Semi-implicit Euler: the new velocity moves the player this frame
    player.velocity -= tuning.gravity * dt;

    let new_y = player.pos.y + player.velocity;
    if new_y <= ceiling {
        player.pos.y = new_y;
    } else {
        player.pos.y = ceiling;
        player.velocity = 0.0;
    }

    player.pos.y <= 0.0
}

/// Score the armed tube, and any following ones, whose left edge has reached
/// the player. Each scored tube passes the arm to the next ring slot.
fn score_passed_tubes(state: &mut GameState) {
    let threshold = state.scoring_threshold();
    let count = state.conveyor.len();

    for _ in 0..count {
        let tube = &state.conveyor.tubes()[state.scoring_tube];
        if tube.x > threshold {
            break;
        }

        state.score += 1;
        state.scoring_tube = (state.scoring_tube + 1) % count;
        log::debug!("Score: {}", state.score);
    }
}

/// Index of the first tube whose lower or upper block touches the player
fn find_collision(state: &GameState) -> Option<usize> {
    let circle = state.player.collider();
    state
        .conveyor
        .colliders()
        .find(|(_, blocks)| blocks.iter().any(|rect| circle_rect_overlap(&circle, rect)))
        .map(|(i, _)| i)
}

fn end_run(state: &mut GameState, end: RunEnd) {
    state.phase = GamePhase::GameOver;
    state.last_end = Some(end);
    log::info!("Run ended ({:?}) with score {}", end, state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::animation_frame;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// Default 800x600 screen, where the gap is as tall as the screen
    fn playing_state() -> GameState {
        let mut state = GameState::new(&Settings::default(), 12345).unwrap();
        tick(&mut state, &TickInput::tap(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    /// Playing state where the player hovers in place
    fn hovering_state(settings: &mut Settings) -> GameState {
        settings.tuning.gravity = 0.0;
        let mut state = GameState::new(settings, 12345).unwrap();
        tick(&mut state, &TickInput::tap(), DT);
        state
    }

    #[test]
    fn test_idle_waits_for_tap() {
        let mut state = GameState::new(&Settings::default(), 12345).unwrap();
        let tubes = state.conveyor.tubes().to_vec();
        let player = state.player;

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.conveyor.tubes(), tubes.as_slice());
        assert_eq!(state.player, player);
    }

    #[test]
    fn test_idle_tap_starts_without_moving() {
        let mut state = GameState::new(&Settings::default(), 12345).unwrap();
        let player = state.player;

        tick(&mut state, &TickInput::tap(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player, player);
    }

    #[test]
    fn test_bump_then_gravity() {
        let mut state = playing_state();
        let y0 = state.player.pos.y;

        tick(&mut state, &TickInput::tap(), DT);
        let expected = 20.0 - 20.0 * DT;
        assert!((state.player.velocity - expected).abs() < 1e-5);
        assert!((state.player.pos.y - (y0 + expected)).abs() < 1e-4);
    }

    #[test]
    fn test_bumps_stack() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::tap(), DT);
        tick(&mut state, &TickInput::tap(), DT);
        let expected = 2.0 * (20.0 - 20.0 * DT);
        assert!((state.player.velocity - expected).abs() < 1e-4);
    }

    #[test]
    fn test_falls_without_input() {
        let mut state = playing_state();
        let y0 = state.player.pos.y;
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.player.velocity < 0.0);
        assert!(state.player.pos.y < y0);
    }

    #[test]
    fn test_ceiling_clamp_zeroes_velocity() {
        let mut state = playing_state();
        state.player.pos.y = 500.0;
        state.player.velocity = 50.0;

        tick(&mut state, &TickInput::tap(), DT);
        assert_eq!(state.player.pos.y, 600.0 - 96.0);
        assert_eq!(state.player.velocity, 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pinned_at_ceiling_is_not_fatal() {
        let mut state = playing_state();
        // Stop before the first tube reaches the player
        for _ in 0..40 {
            tick(&mut state, &TickInput::tap(), DT);
            assert_eq!(state.phase, GamePhase::Playing);
        }
        assert_eq!(state.player.pos.y, 504.0);
        assert_eq!(state.player.velocity, 0.0);
    }

    #[test]
    fn test_floor_ends_run() {
        let mut state = playing_state();
        let mut frames = 0;
        while state.phase == GamePhase::Playing {
            tick(&mut state, &TickInput::default(), DT);
            frames += 1;
            assert!(frames < 10_000, "player never reached the floor");
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.last_end, Some(RunEnd::Floor));
        assert!(state.player.pos.y <= 0.0);
    }

    #[test]
    fn test_floor_checked_before_collision() {
        let mut state = playing_state();
        state.player.pos.y = 1.0;
        state.player.velocity = -5.0;

        // Park a tube's lower block right on top of the player
        let layout = *state.layout();
        let tube = &mut state.conveyor.tubes_mut()[1];
        tube.x = 350.0;
        tube.offset = -layout.tube_height + 50.0;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.last_end, Some(RunEnd::Floor));
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = playing_state();
        let layout = *state.layout();

        // Lower block reaching up through the player's centre
        let tube = &mut state.conveyor.tubes_mut()[2];
        tube.x = 380.0;
        tube.offset = 400.0 - layout.tube_height;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.last_end, Some(RunEnd::Collision { tube: 2 }));
    }

    #[test]
    fn test_upper_block_collision() {
        let mut settings = Settings::for_screen(1080.0, 1920.0);
        settings.dimensions.tube_block = Vec2::new(160.0, 1200.0);
        let mut state = hovering_state(&mut settings);

        // Player centre at y=960; bring the upper block down to 1000
        let layout = *state.layout();
        let tube = &mut state.conveyor.tubes_mut()[0];
        tube.x = 500.0;
        tube.offset = 1000.0 - layout.gap - layout.tube_height;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.last_end, Some(RunEnd::Collision { tube: 0 }));
    }

    #[test]
    fn test_game_over_freezes_until_tap() {
        let mut state = playing_state();
        state.player.pos.y = 0.5;
        state.player.velocity = -1.0;
        state.score = 3;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let tubes = state.conveyor.tubes().to_vec();
        let player = state.player;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.conveyor.tubes(), tubes.as_slice());
        assert_eq!(state.player, player);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_tap_after_game_over_restarts() {
        let mut state = playing_state();
        state.player.pos.y = 0.5;
        state.player.velocity = -1.0;
        state.score = 3;
        state.scoring_tube = 3;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &TickInput::tap(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.scoring_tube, 0);
        assert_eq!(state.player.pos, Vec2::new(332.0, 252.0));
        assert_eq!(state.player.velocity, 0.0);
        assert_eq!(state.conveyor.tubes()[0].x, 800.0);
        assert_eq!(state.last_end, None);
    }

    #[test]
    fn test_tubes_scroll_while_playing() {
        let mut state = playing_state();
        let x0 = state.conveyor.tubes()[0].x;
        tick(&mut state, &TickInput::default(), 0.5);
        assert!((state.conveyor.tubes()[0].x - (x0 - 200.0)).abs() < 1e-3);
    }

    #[test]
    fn test_each_tube_scores_once_per_lap() {
        let mut settings = Settings::default();
        let mut state = hovering_state(&mut settings);
        let mut arm_passes = Vec::new();
        let mut last_score = state.score;

        while arm_passes.len() < 2 {
            let before = state.scoring_tube;
            tick(&mut state, &TickInput::default(), DT);
            assert_eq!(state.phase, GamePhase::Playing);
            assert!(state.score - last_score <= 1);
            last_score = state.score;

            if before == 0 && state.scoring_tube == 1 {
                arm_passes.push(state.score);
            }
        }

        // Tube 0 scored twice; every other tube exactly once in between
        assert_eq!(arm_passes[1] - arm_passes[0], 4);
    }

    #[test]
    fn test_scoring_threshold_is_players_left_edge() {
        let mut settings = Settings::default();
        let mut state = hovering_state(&mut settings);

        state.conveyor.tubes_mut()[0].x = 332.5;
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.score, 0);

        state.conveyor.tubes_mut()[0].x = 332.0;
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.score, 1);
        assert_eq!(state.scoring_tube, 1);

        // Already scored; staying past the threshold does not re-trigger
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_large_delta_scores_each_passed_tube() {
        let mut settings = Settings::default();
        settings.tuning.tube_spacing_ratio = 0.25;
        let mut state = hovering_state(&mut settings);

        // Tubes at 800, 1000, 1200, 1400 move to -80, 120, 320, 520
        tick(&mut state, &TickInput::default(), 2.2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 3);
        assert_eq!(state.scoring_tube, 3);
    }

    #[test]
    fn test_animation_clock_survives_long_uptime() {
        let mut state = GameState::new(&Settings::default(), 12345).unwrap();
        for _ in 0..1000 {
            tick(&mut state, &TickInput::default(), 3600.0);
            assert!(state.elapsed >= 0.0 && state.elapsed < 0.2);
        }

        // A full cycle of small frames still shows both sprites
        let mut seen = [false; 2];
        for _ in 0..12 {
            tick(&mut state, &TickInput::default(), DT);
            seen[animation_frame(state.elapsed, 10.0) as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_determinism() {
        let settings = Settings::for_screen(1080.0, 1920.0);
        let mut state1 = GameState::new(&settings, 99999).unwrap();
        let mut state2 = GameState::new(&settings, 99999).unwrap();

        for i in 0..600 {
            let input = TickInput { tapped: i % 20 == 0 };
            tick(&mut state1, &input, DT);
            tick(&mut state2, &input, DT);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player, state2.player);
        assert_eq!(state1.conveyor.tubes(), state2.conveyor.tubes());
    }
}
