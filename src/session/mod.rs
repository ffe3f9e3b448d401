//! Session state machine
//!
//! `Arcade` owns the screen, the live `Session`, leaderboards and audio cues
//! for one title. Input events drive screen transitions; `tick` advances the
//! simulation while playing and routes terminal conditions into game over and
//! the leaderboard check.

pub mod input;
pub mod play;
pub mod title;

pub use input::{Control, InputEvent};
pub use play::{Play, Session};
pub use title::{MenuItem, Title};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioCommand, AudioMixer};
use crate::consts::DEFAULT_PLAYER_NAME;
use crate::highscores::{LeaderboardEntry, LeaderboardStore, Leaderboards};
use crate::renderer::{self, Frame};
use crate::settings::{Difficulty, Settings, Theme};
use crate::sim::{GameEvent, Opponent};

/// Current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu { selected: usize },
    ThemeSelect { selected: usize },
    DifficultySelect { selected: usize },
    Playing,
    /// Simulation suspended, input and rendering continue
    Paused,
    GameOver,
    NameEntry { name: String },
    Leaderboard,
}

/// Wrap a menu cursor
fn step(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (selected + 1) % len
    } else {
        (selected + len - 1) % len
    }
}

/// Cursor movement or choice on a list screen
enum ListAction {
    Moved(usize),
    Chosen(usize),
    Back,
    Ignored,
}

fn list_action(event: InputEvent, selected: usize, len: usize) -> ListAction {
    match event {
        InputEvent::Up => ListAction::Moved(step(selected, len, false)),
        InputEvent::Down => ListAction::Moved(step(selected, len, true)),
        InputEvent::Confirm => ListAction::Chosen(selected),
        InputEvent::Select(n) if (1..=len).contains(&n) => ListAction::Chosen(n - 1),
        InputEvent::Cancel => ListAction::Back,
        _ => ListAction::Ignored,
    }
}

/// One title's state machine
pub struct Arcade {
    title: Title,
    settings: Settings,
    screen: Screen,
    difficulty: Difficulty,
    theme: Theme,
    opponent: Opponent,
    session: Option<Session>,
    store: Option<LeaderboardStore>,
    boards: Option<Leaderboards>,
    mixer: AudioMixer,
    events: Vec<GameEvent>,
    rng: Pcg32,
    /// Loop iterations since start, paused or not
    ticks: u64,
}

impl Arcade {
    pub fn new(title: Title, settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("{} starting with seed {}", title.name(), seed);

        let store = title.scores_file().map(|(file, layout)| {
            LeaderboardStore::new(settings.data_file(file), layout, title.max_name_len())
        });
        let boards = store.as_ref().map(LeaderboardStore::load_all);

        Self {
            title,
            mixer: AudioMixer::new(&settings),
            settings,
            screen: Screen::Menu { selected: 0 },
            difficulty: Difficulty::default(),
            theme: title.default_theme(),
            opponent: Opponent::default(),
            session: None,
            store,
            boards,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
        }
    }

    pub fn title(&self) -> Title {
        self.title
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn opponent(&self) -> Opponent {
        self.opponent
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn leaderboards(&self) -> Option<&Leaderboards> {
        self.boards.as_ref()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks per second for the current screen
    pub fn tick_rate(&self) -> u32 {
        match (self.title, &self.screen) {
            (Title::Snake, Screen::Playing) => self.difficulty.snake_tick_rate(),
            _ => self.settings.effective_frame_rate(),
        }
    }

    /// Apply one input event
    pub fn handle_input(&mut self, event: InputEvent) -> Control {
        if event == InputEvent::Quit {
            log::info!("Quit requested");
            return Control::Quit;
        }

        match self.screen.clone() {
            Screen::Menu { selected } => {
                let items = self.title.menu_items();
                match list_action(event, selected, items.len()) {
                    ListAction::Moved(selected) => self.screen = Screen::Menu { selected },
                    ListAction::Chosen(i) => return self.activate(items[i]),
                    ListAction::Back | ListAction::Ignored => {}
                }
            }
            Screen::ThemeSelect { selected } => {
                let themes = self.title.themes();
                match list_action(event, selected, themes.len()) {
                    ListAction::Moved(selected) => self.screen = Screen::ThemeSelect { selected },
                    ListAction::Chosen(i) => {
                        self.theme = themes[i];
                        self.after_theme();
                    }
                    ListAction::Back => self.to_menu(),
                    ListAction::Ignored => {}
                }
            }
            Screen::DifficultySelect { selected } => {
                match list_action(event, selected, Difficulty::ALL.len()) {
                    ListAction::Moved(selected) => {
                        self.screen = Screen::DifficultySelect { selected }
                    }
                    ListAction::Chosen(i) => {
                        self.difficulty = Difficulty::ALL[i];
                        self.start_session();
                    }
                    ListAction::Back => self.to_menu(),
                    ListAction::Ignored => {}
                }
            }
            Screen::Playing => self.play_input(event),
            Screen::Paused => match event {
                InputEvent::Pause | InputEvent::Confirm => {
                    log::debug!("Resumed");
                    self.screen = Screen::Playing;
                }
                InputEvent::Cancel => {
                    log::info!("Session abandoned");
                    self.to_menu();
                }
                _ => {}
            },
            Screen::GameOver => match event {
                InputEvent::Confirm => self.start_session(),
                InputEvent::Cancel => self.to_menu(),
                _ => {}
            },
            Screen::NameEntry { mut name } => match event {
                InputEvent::Text(c) if !c.is_control() => {
                    if name.chars().count() < self.title.max_name_len() {
                        name.push(c);
                        self.screen = Screen::NameEntry { name };
                    }
                }
                InputEvent::Backspace => {
                    name.pop();
                    self.screen = Screen::NameEntry { name };
                }
                InputEvent::Confirm => {
                    self.commit_name(&name);
                    self.screen = Screen::GameOver;
                }
                InputEvent::Cancel => {
                    self.commit_name(DEFAULT_PLAYER_NAME);
                    self.to_menu();
                }
                _ => {}
            },
            Screen::Leaderboard => {
                if matches!(event, InputEvent::Confirm | InputEvent::Cancel) {
                    self.to_menu();
                }
            }
        }
        Control::Continue
    }

    /// Advance one tick. Only the playing screen moves the simulation.
    pub fn tick(&mut self) {
        self.ticks += 1;
        if self.screen != Screen::Playing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.tick();
        let terminal = session.is_terminal();
        for event in session.drain_events() {
            self.raise(event);
        }
        if terminal {
            self.game_over();
        }
    }

    /// Compose what to draw and take pending events and audio cues
    pub fn frame(&mut self) -> Frame {
        let mut frame = renderer::compose(self);
        frame.events = std::mem::take(&mut self.events);
        frame.audio = self.mixer.drain();
        frame
    }

    /// Pending audio cues without composing a frame
    pub fn drain_audio(&mut self) -> Vec<AudioCommand> {
        self.mixer.drain()
    }

    fn activate(&mut self, item: MenuItem) -> Control {
        match item {
            MenuItem::Play => self.after_menu(),
            MenuItem::PlayVersus(opponent) => {
                self.opponent = opponent;
                self.after_menu();
            }
            MenuItem::HighScores => {
                self.reload_boards();
                self.screen = Screen::Leaderboard;
            }
            MenuItem::Quit | MenuItem::Exit => {
                log::info!("Quit from menu");
                return Control::Quit;
            }
        }
        Control::Continue
    }

    fn after_menu(&mut self) {
        if self.title.themes().is_empty() {
            self.after_theme();
        } else {
            let selected = self
                .title
                .themes()
                .iter()
                .position(|t| *t == self.theme)
                .unwrap_or(0);
            self.screen = Screen::ThemeSelect { selected };
        }
    }

    fn after_theme(&mut self) {
        if self.title.uses_difficulty() {
            let selected = Difficulty::ALL
                .iter()
                .position(|d| *d == self.difficulty)
                .unwrap_or(0);
            self.screen = Screen::DifficultySelect { selected };
        } else {
            self.start_session();
        }
    }

    /// Fresh session with the current selections
    fn start_session(&mut self) {
        self.reload_boards();
        let seed = self.rng.random::<u64>();
        self.session = Some(Session::new(
            self.title,
            self.difficulty,
            self.theme,
            self.opponent,
            self.settings.thinking_ticks,
            seed,
        ));
        self.screen = Screen::Playing;
        if self.title.has_music() {
            self.mixer.start_music();
        }
        log::info!(
            "New {} session ({}, {}, seed {})",
            self.title.name(),
            self.difficulty.as_str(),
            self.theme.as_str(),
            seed
        );
    }

    fn to_menu(&mut self) {
        self.mixer.stop_music();
        self.session = None;
        self.screen = Screen::Menu { selected: 0 };
    }

    fn play_input(&mut self, event: InputEvent) {
        if matches!(event, InputEvent::Pause | InputEvent::Cancel) {
            log::debug!("Paused");
            self.screen = Screen::Paused;
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.play_mut() {
            Play::Flappy(state) => {
                if matches!(event, InputEvent::Flap | InputEvent::Up) {
                    state.flap();
                }
            }
            Play::Snake(state) => {
                if let Some(direction) = event.direction() {
                    state.request_turn(direction);
                }
            }
            Play::Duel(duel) => {
                if let Some(cell) = event.cell() {
                    duel.place(cell);
                }
            }
        }
        // moves placed by input may end a duel before the next tick
        let terminal = session.is_terminal();
        for event in session.drain_events() {
            self.raise(event);
        }
        if terminal {
            self.game_over();
        }
    }

    fn raise(&mut self, event: GameEvent) {
        self.mixer.on_event(event);
        self.events.push(event);
    }

    fn game_over(&mut self) {
        self.mixer.stop_music();
        self.screen = Screen::GameOver;

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.take_leaderboard_check() {
            return;
        }
        let score = session.score();
        let difficulty = session.difficulty;
        log::info!("Game over with score {score}");
        self.raise(GameEvent::GameOver);

        let qualifies = self
            .boards
            .as_ref()
            .is_some_and(|b| b.table(difficulty).qualifies(score));
        if qualifies {
            log::info!("Score {score} qualifies for the {} table", difficulty.as_str());
            self.raise(GameEvent::HighScore);
            self.screen = Screen::NameEntry {
                name: String::new(),
            };
        }
    }

    fn commit_name(&mut self, name: &str) {
        let (Some(session), Some(store), Some(boards)) =
            (self.session.as_mut(), self.store.as_ref(), self.boards.as_mut())
        else {
            return;
        };
        let entry = LeaderboardEntry::new(name, session.score(), store.max_name_len());
        let rank = boards.record(session.difficulty, entry.clone());
        session.set_rank(rank);
        if rank.is_none() {
            return;
        }
        log::info!("Recorded {} with {} at rank {:?}", entry.name, entry.score, rank);
        if let Err(e) = store.persist(boards) {
            log::warn!("Failed to save high scores: {e:#}");
        }
    }

    fn reload_boards(&mut self) {
        if let Some(store) = &self.store {
            self.boards = Some(store.load_all());
        }
    }
}
