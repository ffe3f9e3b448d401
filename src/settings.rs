//! Game settings, difficulty presets and themes
//!
//! `Settings` is the configuration context handed to the state machine at
//! construction. Persisted as JSON next to the leaderboards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_RATE, THINKING_TICKS};
use crate::persistence;

/// Difficulty presets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Downward acceleration per tick for the side-scroller
    pub fn gravity(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.35,
            Difficulty::Medium => 0.5,
            Difficulty::Hard => 0.5,
        }
    }

    /// Vertical size of a pipe gap
    pub fn pipe_gap(&self) -> f32 {
        match self {
            Difficulty::Easy => 220.0,
            Difficulty::Medium => 180.0,
            Difficulty::Hard => 150.0,
        }
    }

    /// Snake ticks per second
    pub fn snake_tick_rate(&self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 15,
            Difficulty::Hard => 25,
        }
    }
}

/// RGB color
pub type Rgb = [u8; 3];

/// Colors handed to the render collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    /// Lines, grid and body text
    pub foreground: Rgb,
    /// Player actor (bird, snake, X)
    pub primary: Rgb,
    /// Obstacles and pickups (pipes, food, O)
    pub secondary: Rgb,
    /// Selected menu option, buttons
    pub highlight: Rgb,
}

/// Visual themes. Each title offers its own subset, see `Title::themes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Daylight,
    Classic,
    Dark,
    Desert,
    Charcoal,
    Light,
    Pastel,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Daylight => "Daylight",
            Theme::Classic => "Classic",
            Theme::Dark | Theme::Charcoal => "Dark",
            Theme::Desert => "Desert",
            Theme::Light => "Light",
            Theme::Pastel => "Pastel",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Daylight => Palette {
                background: [255, 255, 255],
                foreground: [0, 0, 0],
                primary: [0, 162, 232],
                secondary: [34, 177, 76],
                highlight: [200, 0, 0],
            },
            Theme::Classic => Palette {
                background: [50, 153, 213],
                foreground: [255, 255, 255],
                primary: [0, 255, 0],
                secondary: [213, 50, 80],
                highlight: [255, 0, 0],
            },
            Theme::Dark => Palette {
                background: [0, 0, 0],
                foreground: [255, 255, 255],
                primary: [255, 255, 255],
                secondary: [213, 50, 80],
                highlight: [255, 0, 0],
            },
            Theme::Desert => Palette {
                background: [210, 180, 140],
                foreground: [255, 255, 255],
                primary: [0, 0, 128],
                secondary: [213, 50, 80],
                highlight: [255, 0, 0],
            },
            Theme::Charcoal => Palette {
                background: [30, 30, 30],
                foreground: [200, 200, 200],
                primary: [255, 0, 0],
                secondary: [0, 255, 0],
                highlight: [50, 50, 50],
            },
            Theme::Light => Palette {
                background: [255, 255, 255],
                foreground: [0, 0, 0],
                primary: [0, 0, 255],
                secondary: [255, 165, 0],
                highlight: [200, 200, 200],
            },
            Theme::Pastel => Palette {
                background: [240, 240, 200],
                foreground: [100, 100, 100],
                primary: [128, 0, 128],
                secondary: [0, 128, 128],
                highlight: [180, 180, 150],
            },
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding leaderboard and settings files
    pub data_dir: PathBuf,
    /// Tick rate for menus, the side-scroller and the grid duel
    pub frame_rate: u32,
    /// Computer cooldown before it plays, in ticks
    pub thinking_ticks: u32,
    /// Fixed RNG seed (random per run when absent)
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            frame_rate: FRAME_RATE,
            thinking_ticks: THINKING_TICKS,
            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.3,
            muted: false,
        }
    }
}

impl Settings {
    pub const DEFAULT_DATA_DIR: &'static str = "saves";
    const FILE_NAME: &'static str = "settings.json";

    /// Settings rooted at a specific data directory
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Path of a file inside the data directory
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Frame rate clamped to something the clock can honor
    pub fn effective_frame_rate(&self) -> u32 {
        self.frame_rate.clamp(1, 240)
    }

    /// Load settings from `<dir>/settings.json`, falling back to defaults
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        match persistence::read_json::<Settings>(&path) {
            Ok(Some(mut settings)) => {
                settings.data_dir = dir.to_path_buf();
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::with_data_dir(dir)
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {e:#}");
                Self::with_data_dir(dir)
            }
        }
    }

    /// Save settings to `<data_dir>/settings.json`
    pub fn save(&self) -> anyhow::Result<()> {
        persistence::write_json(&self.data_file(Self::FILE_NAME), self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
