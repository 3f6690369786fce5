//! Demo controller
//!
//! Plays the game for headless runs: starts every run and keeps the player
//! near the gap of the next tube ahead.

use crate::sim::{GamePhase, GameState, Tube};

/// Whether the autopilot taps this frame
pub fn decide(state: &GameState) -> bool {
    match state.phase {
        GamePhase::Idle | GamePhase::GameOver => true,
        GamePhase::Playing => {
            let center = state.player.collider().center.y;
            let target = next_tube(state)
                .map(|tube| tube.gap_center(state.layout()))
                .unwrap_or(state.screen.y / 2.0);

            // Only bump on the way down, so bumps don't stack into the ceiling
            center < target && state.player.velocity <= 0.0
        }
    }
}

/// Nearest tube the player has not fully passed yet
fn next_tube(state: &GameState) -> Option<&Tube> {
    let player_left = state.player.pos.x;
    let width = state.layout().tube_width;

    state
        .conveyor
        .tubes()
        .iter()
        .filter(|tube| tube.x + width >= player_left)
        .min_by(|a, b| a.x.total_cmp(&b.x))
}
