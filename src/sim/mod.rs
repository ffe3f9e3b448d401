//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per `tick`, no wall-clock time
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod duel;
pub mod event;
pub mod flappy;
pub mod grid;
pub mod snake;

pub use duel::{Duel, DuelOutcome, DuelPhase, Opponent};
pub use event::GameEvent;
pub use flappy::{Bird, FlappyState, FlappyTuning, Pipe, check_collision};
pub use grid::{Board, Cell, Mark, select_move};
pub use snake::{Direction, Field, Snake, SnakeOutcome, SnakeState};
