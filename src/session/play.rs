//! A live game instance

use crate::consts::GRID_SIZE;
use crate::settings::{Difficulty, Theme};
use crate::sim::{Duel, FlappyState, FlappyTuning, GameEvent, Opponent, SnakeState};

use super::title::Title;

/// Simulation owned by a session
#[derive(Debug, Clone)]
pub enum Play {
    Flappy(FlappyState),
    Snake(SnakeState),
    Duel(Duel),
}

/// Created on entering play, replaced on replay, dropped on return to menu
#[derive(Debug, Clone)]
pub struct Session {
    pub difficulty: Difficulty,
    pub theme: Theme,
    /// Simulation ticks advanced (paused ticks excluded)
    pub ticks: u64,
    play: Play,
    /// One-shot: set when the game-over leaderboard check has run
    leaderboard_checked: bool,
    /// Rank achieved on the leaderboard, once recorded
    rank: Option<usize>,
}

impl Session {
    pub fn new(
        title: Title,
        difficulty: Difficulty,
        theme: Theme,
        opponent: Opponent,
        thinking_ticks: u32,
        seed: u64,
    ) -> Self {
        let play = match title {
            Title::Flappy => Play::Flappy(FlappyState::new(
                FlappyTuning::for_difficulty(difficulty),
                seed,
            )),
            Title::Snake => Play::Snake(SnakeState::new(seed)),
            Title::TicTacToe => Play::Duel(Duel::new(GRID_SIZE, opponent, thinking_ticks, seed)),
        };
        Self {
            difficulty,
            theme,
            ticks: 0,
            play,
            leaderboard_checked: false,
            rank: None,
        }
    }

    pub fn play(&self) -> &Play {
        &self.play
    }

    pub fn play_mut(&mut self) -> &mut Play {
        &mut self.play
    }

    pub fn score(&self) -> u32 {
        match &self.play {
            Play::Flappy(s) => s.score,
            Play::Snake(s) => s.score,
            Play::Duel(_) => 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        match &self.play {
            Play::Flappy(s) => s.is_terminal(),
            Play::Snake(s) => s.is_terminal(),
            Play::Duel(d) => d.is_terminal(),
        }
    }

    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    pub(super) fn set_rank(&mut self, rank: Option<usize>) {
        self.rank = rank;
    }

    /// Returns true the first time only
    pub(super) fn take_leaderboard_check(&mut self) -> bool {
        !std::mem::replace(&mut self.leaderboard_checked, true)
    }

    /// Advance the simulation one step
    pub fn tick(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.ticks += 1;
        match &mut self.play {
            Play::Flappy(s) => s.tick(),
            Play::Snake(s) => s.tick(),
            Play::Duel(d) => d.tick(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        match &mut self.play {
            Play::Flappy(s) => s.drain_events(),
            Play::Snake(s) => s.drain_events(),
            Play::Duel(d) => d.drain_events(),
        }
    }
}
