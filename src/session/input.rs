//! Discrete input events consumed by the state machine

use serde::{Deserialize, Serialize};

use crate::sim::{Cell, Direction};

/// Input from the platform surface, already decoded from raw keys/clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    /// Pick a numbered option directly (1-indexed)
    Select(usize),
    Confirm,
    Cancel,
    /// Pause toggle
    Pause,
    /// Exit from any state
    Quit,
    /// Side-scroller impulse
    Flap,
    /// Printable character for name entry
    Text(char),
    Backspace,
    /// Grid move
    Place { row: usize, col: usize },
}

impl InputEvent {
    /// Heading requested by a directional event
    pub fn direction(&self) -> Option<Direction> {
        match self {
            InputEvent::Up => Some(Direction::Up),
            InputEvent::Down => Some(Direction::Down),
            InputEvent::Left => Some(Direction::Left),
            InputEvent::Right => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn cell(&self) -> Option<Cell> {
        match *self {
            InputEvent::Place { row, col } => Some(Cell::new(row, col)),
            _ => None,
        }
    }
}

/// What the run loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}
