//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the host-supplied frame delta
//! - Seeded RNG only
//! - Tubes live in a fixed ring, processed in slot order
//! - No rendering or platform dependencies

pub mod collision;
pub mod conveyor;
pub mod frame;
pub mod state;
pub mod tick;

pub use collision::{Circle, Rect, circle_rect_overlap};
pub use conveyor::{Conveyor, Tube, TubeLayout};
pub use frame::{Frame, SpriteDraw, TubeDraw, animation_frame};
pub use state::{GamePhase, GameState, Player, RunEnd};
pub use tick::{TickInput, tick};
