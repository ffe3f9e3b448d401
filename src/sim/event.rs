//! Events raised by the core for audio/visual collaborators

use serde::{Deserialize, Serialize};

use super::grid::Mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Bird received an upward impulse
    Flapped,
    /// An obstacle was passed
    Scored,
    /// Actor hit an obstacle, a wall or itself
    Collided,
    /// Snake ate the food
    AteFood,
    /// A mark landed on the grid
    MarkPlaced(Mark),
    /// Grid match ended (win or draw)
    MatchDecided,
    /// Session entered game over
    GameOver,
    /// Final score qualified for the leaderboard
    HighScore,
}
