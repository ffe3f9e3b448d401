//! Abstract draw commands
//!
//! Positions are in field units: pixels for the side-scroller and snake,
//! cell coordinates for the grid.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::audio::AudioCommand;
use crate::session::Screen;
use crate::settings::Palette;
use crate::sim::{GameEvent, Mark};

/// Screen tag for the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenKind {
    Menu,
    ThemeSelect,
    DifficultySelect,
    Playing,
    Paused,
    GameOver,
    NameEntry,
    Leaderboard,
}

impl From<&Screen> for ScreenKind {
    fn from(screen: &Screen) -> Self {
        match screen {
            Screen::Menu { .. } => ScreenKind::Menu,
            Screen::ThemeSelect { .. } => ScreenKind::ThemeSelect,
            Screen::DifficultySelect { .. } => ScreenKind::DifficultySelect,
            Screen::Playing => ScreenKind::Playing,
            Screen::Paused => ScreenKind::Paused,
            Screen::GameOver => ScreenKind::GameOver,
            Screen::NameEntry { .. } => ScreenKind::NameEntry,
            Screen::Leaderboard => ScreenKind::Leaderboard,
        }
    }
}

/// How an overlay line should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextRole {
    Heading,
    Body,
    /// Outcome line (winner, crash)
    Result,
    /// Control hints
    Hint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Title(String),
    MenuOption {
        label: String,
        selected: bool,
    },
    Text {
        text: String,
        role: TextRole,
    },
    Score(u32),
    Bird {
        center: Vec2,
        radius: f32,
    },
    /// Pipe pair; solid above `gap_top` and below `gap_bottom`
    Pipe {
        x: f32,
        width: f32,
        gap_top: f32,
        gap_bottom: f32,
    },
    SnakeSegment {
        cell: IVec2,
        size: i32,
        head: bool,
    },
    Food {
        cell: IVec2,
        size: i32,
    },
    GridLines {
        size: usize,
    },
    Mark {
        row: usize,
        col: usize,
        mark: Mark,
    },
    LeaderboardRow {
        bucket: String,
        rank: usize,
        name: String,
        score: u32,
    },
}

/// Everything the collaborator needs for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub screen: ScreenKind,
    pub palette: Palette,
    pub commands: Vec<DrawCommand>,
    pub events: Vec<GameEvent>,
    pub audio: Vec<AudioCommand>,
}

impl Frame {
    pub fn new(screen: ScreenKind, palette: Palette) -> Self {
        Self {
            screen,
            palette,
            commands: Vec::new(),
            events: Vec::new(),
            audio: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn text(&mut self, text: impl Into<String>, role: TextRole) {
        self.push(DrawCommand::Text {
            text: text.into(),
            role,
        });
    }

    /// Text of every overlay line, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } | DrawCommand::Title(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Label of the highlighted menu option
    pub fn selected_option(&self) -> Option<&str> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::MenuOption {
                label,
                selected: true,
            } => Some(label.as_str()),
            _ => None,
        })
    }
}
