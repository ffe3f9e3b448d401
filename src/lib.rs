//! Arcade Loop - fixed-tick game loop engine for three small arcade titles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (side-scroller, snake, grid duel)
//! - `session`: Menu/play/pause/game-over state machine driving the simulation
//! - `highscores`: Per-difficulty leaderboards persisted as JSON
//! - `renderer`: Abstract draw commands emitted once per tick
//! - `audio`: Sound cues raised by the core for the collaborator to play
//! - `platform`: Input/present surface and the single-threaded run loop
//! - `persistence`: Durable JSON files
//! - `settings`: Difficulty presets, themes and the configuration context

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{LeaderboardEntry, LeaderboardStore, LeaderboardTable, Leaderboards};
pub use session::{Arcade, Control, InputEvent, Screen, Title};
pub use settings::{Difficulty, Settings, Theme};

/// Game configuration constants
pub mod consts {
    /// Frame rate for menus and the side-scroller
    pub const FRAME_RATE: u32 = 60;

    /// Leaderboard capacity per bucket
    pub const MAX_LEADERBOARD_ENTRIES: usize = 5;
    /// Name used when the player confirms an empty name
    pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

    /// Side-scroller play field
    pub const FLAPPY_WIDTH: f32 = 400.0;
    pub const FLAPPY_HEIGHT: f32 = 600.0;
    /// Bird is pinned horizontally, only y moves
    pub const BIRD_X: f32 = 80.0;
    pub const BIRD_RADIUS: f32 = 20.0;
    /// Upward kick applied on flap (negative = up)
    pub const FLAP_STRENGTH: f32 = -10.0;
    pub const PIPE_WIDTH: f32 = 70.0;
    pub const PIPE_SPEED: f32 = 3.0;
    /// A pipe spawns once the spawn timer exceeds this many ticks
    pub const PIPE_SPAWN_INTERVAL: u32 = 90;
    /// Minimum distance between a gap and the top/bottom edge
    pub const PIPE_GAP_MARGIN: i32 = 50;

    /// Snake play field (pixels) and cell size
    pub const SNAKE_WIDTH: i32 = 600;
    pub const SNAKE_HEIGHT: i32 = 400;
    pub const SNAKE_CELL: i32 = 20;
    pub const SNAKE_INITIAL_LENGTH: usize = 3;

    /// Grid duel board size (N x N)
    pub const GRID_SIZE: usize = 3;
    /// Computer "thinking" cooldown, in ticks (1 second at 60 Hz)
    pub const THINKING_TICKS: u32 = 60;
}
