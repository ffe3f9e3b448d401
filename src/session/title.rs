//! The three titles and what each one offers

use serde::{Deserialize, Serialize};

use crate::highscores::StoreLayout;
use crate::settings::Theme;
use crate::sim::Opponent;

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play,
    PlayVersus(Opponent),
    HighScores,
    Quit,
    /// Same as `Quit`, labelled "Exit"
    Exit,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Play => "Play",
            MenuItem::PlayVersus(Opponent::Human) => "Play PvP",
            MenuItem::PlayVersus(Opponent::Computer) => "Play PvC",
            MenuItem::HighScores => "High Scores",
            MenuItem::Quit => "Quit",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Game title hosted by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
    Flappy,
    Snake,
    TicTacToe,
}

impl Title {
    pub fn name(&self) -> &'static str {
        match self {
            Title::Flappy => "Flappy Bird",
            Title::Snake => "Snake Game",
            Title::TicTacToe => "Tic Tac Toe",
        }
    }

    pub fn menu_items(&self) -> &'static [MenuItem] {
        match self {
            Title::Flappy | Title::Snake => &[MenuItem::Play, MenuItem::HighScores, MenuItem::Quit],
            Title::TicTacToe => &[
                MenuItem::PlayVersus(Opponent::Human),
                MenuItem::PlayVersus(Opponent::Computer),
                MenuItem::Exit,
            ],
        }
    }

    /// Themes offered on the theme screen; empty means no theme screen
    pub fn themes(&self) -> &'static [Theme] {
        match self {
            Title::Flappy => &[],
            Title::Snake => &[Theme::Classic, Theme::Dark, Theme::Desert],
            Title::TicTacToe => &[Theme::Charcoal, Theme::Light, Theme::Pastel],
        }
    }

    pub fn default_theme(&self) -> Theme {
        self.themes().first().copied().unwrap_or_default()
    }

    pub fn uses_difficulty(&self) -> bool {
        !matches!(self, Title::TicTacToe)
    }

    /// Background music while playing
    pub fn has_music(&self) -> bool {
        matches!(self, Title::Flappy)
    }

    /// Leaderboard file name and layout, if the title keeps scores
    pub fn scores_file(&self) -> Option<(&'static str, StoreLayout)> {
        match self {
            Title::Flappy => Some(("flappy_highscores.json", StoreLayout::Flat)),
            Title::Snake => Some(("snake_highscores.json", StoreLayout::PerDifficulty)),
            Title::TicTacToe => None,
        }
    }

    pub fn max_name_len(&self) -> usize {
        match self {
            Title::Flappy => 10,
            Title::Snake => 20,
            Title::TicTacToe => 0,
        }
    }
}
