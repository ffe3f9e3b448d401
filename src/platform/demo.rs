//! Headless autopilot surface
//!
//! Reads each presented frame and answers with the input a simple player
//! would give: confirm through menus, steer toward the goal while playing,
//! sign high scores as "DEMO", and quit after a number of rounds.

use anyhow::Result;
use glam::{IVec2, Vec2};

use crate::consts::{FLAPPY_HEIGHT, SNAKE_CELL, SNAKE_HEIGHT, SNAKE_WIDTH};
use crate::renderer::{DrawCommand, Frame, ScreenKind};
use crate::session::InputEvent;
use crate::sim::{Direction, GameEvent};

use super::Surface;

const DEMO_NAME: &str = "DEMO";

pub struct DemoSurface {
    rounds: u32,
    rounds_played: u32,
    /// Quit after this many frames even mid-round
    frame_limit: Option<u64>,
    frames: u64,
    last: Option<Frame>,
    last_bird_y: Option<f32>,
    last_head: Option<IVec2>,
    best_score: u32,
}

impl DemoSurface {
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
            rounds_played: 0,
            frame_limit: None,
            frames: 0,
            last: None,
            last_bird_y: None,
            last_head: None,
            best_score: 0,
        }
    }

    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    fn decide(&mut self) -> Vec<InputEvent> {
        let Some(frame) = self.last.take() else {
            return Vec::new();
        };
        let input = match frame.screen {
            ScreenKind::Menu => vec![menu_choice(&frame)],
            ScreenKind::ThemeSelect | ScreenKind::DifficultySelect | ScreenKind::Paused => {
                vec![InputEvent::Confirm]
            }
            ScreenKind::Playing => self.play(&frame),
            ScreenKind::NameEntry => DEMO_NAME
                .chars()
                .map(InputEvent::Text)
                .chain([InputEvent::Confirm])
                .collect(),
            ScreenKind::GameOver => {
                self.rounds_played += 1;
                log::info!("Demo round {} finished", self.rounds_played);
                if self.rounds_played >= self.rounds {
                    vec![InputEvent::Quit]
                } else {
                    vec![InputEvent::Confirm]
                }
            }
            ScreenKind::Leaderboard => vec![InputEvent::Cancel],
        };
        if frame.screen != ScreenKind::Playing {
            self.last_bird_y = None;
            self.last_head = None;
        }
        input
    }

    fn play(&mut self, frame: &Frame) -> Vec<InputEvent> {
        let mut bird = None;
        let mut pipes = Vec::new();
        let mut body = Vec::new();
        let mut head = None;
        let mut food = None;
        let mut grid = None;
        let mut marked = Vec::new();

        for command in &frame.commands {
            match command {
                DrawCommand::Bird { center, radius } => bird = Some((*center, *radius)),
                DrawCommand::Pipe {
                    x,
                    width,
                    gap_top,
                    gap_bottom,
                } => pipes.push((*x + *width, *gap_top, *gap_bottom)),
                DrawCommand::SnakeSegment { cell, head: true, .. } => head = Some(*cell),
                DrawCommand::SnakeSegment { cell, .. } => body.push(*cell),
                DrawCommand::Food { cell, .. } => food = Some(*cell),
                DrawCommand::GridLines { size } => grid = Some(*size),
                DrawCommand::Mark { row, col, .. } => marked.push((*row, *col)),
                DrawCommand::Score(score) => self.best_score = self.best_score.max(*score),
                _ => {}
            }
        }

        if let Some((center, radius)) = bird {
            return self.steer_bird(center, radius, &pipes);
        }
        if let Some(head) = head {
            return self.steer_snake(head, &body, food);
        }
        if let Some(size) = grid {
            let free = (0..size)
                .flat_map(|row| (0..size).map(move |col| (row, col)))
                .find(|cell| !marked.contains(cell));
            if let Some((row, col)) = free {
                return vec![InputEvent::Place { row, col }];
            }
        }
        Vec::new()
    }

    /// Flap when falling below the next gap
    fn steer_bird(&mut self, center: Vec2, radius: f32, pipes: &[(f32, f32, f32)]) -> Vec<InputEvent> {
        let falling = self.last_bird_y.is_some_and(|y| center.y > y);
        self.last_bird_y = Some(center.y);

        let target = pipes
            .iter()
            .filter(|(right, _, _)| *right >= center.x - radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, _, gap_bottom)| gap_bottom - radius * 1.5)
            .unwrap_or(FLAPPY_HEIGHT / 2.0);

        if falling && center.y > target {
            vec![InputEvent::Flap]
        } else {
            Vec::new()
        }
    }

    /// Greedy step toward food that avoids walls and the body
    fn steer_snake(&mut self, head: IVec2, body: &[IVec2], food: Option<IVec2>) -> Vec<InputEvent> {
        let heading = self
            .last_head
            .and_then(|prev| {
                let step = (head - prev) / SNAKE_CELL;
                Direction::ALL.into_iter().find(|d| d.delta() == step)
            })
            .unwrap_or(Direction::Right);
        self.last_head = Some(head);

        // the tail cell moves away this tick
        let blocked = &body[body.len().min(1)..];
        let safe = |d: &Direction| {
            let next = head + d.delta() * SNAKE_CELL;
            (0..SNAKE_WIDTH).contains(&next.x)
                && (0..SNAKE_HEIGHT).contains(&next.y)
                && !blocked.contains(&next)
        };
        let goal = food.unwrap_or(head);
        let choice = Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(heading))
            .filter(safe)
            .min_by_key(|d| {
                let next = head + d.delta() * SNAKE_CELL;
                let dist = (goal - next).abs();
                // prefer going straight on ties
                (dist.x + dist.y, *d != heading)
            });

        match choice {
            Some(d) if d != heading => vec![direction_event(d)],
            _ => Vec::new(),
        }
    }
}

fn direction_event(direction: Direction) -> InputEvent {
    match direction {
        Direction::Up => InputEvent::Up,
        Direction::Down => InputEvent::Down,
        Direction::Left => InputEvent::Left,
        Direction::Right => InputEvent::Right,
    }
}

/// Play against the computer when offered, else the first option
fn menu_choice(frame: &Frame) -> InputEvent {
    let labels: Vec<&str> = frame
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::MenuOption { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    labels
        .iter()
        .position(|l| *l == "Play PvC")
        .or_else(|| labels.iter().position(|l| l.starts_with("Play")))
        .map(|i| InputEvent::Select(i + 1))
        .unwrap_or(InputEvent::Confirm)
}

impl Surface for DemoSurface {
    fn poll_input(&mut self) -> Result<Vec<InputEvent>> {
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            log::info!("Demo frame limit reached");
            return Ok(vec![InputEvent::Quit]);
        }
        Ok(self.decide())
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.frames += 1;
        for event in &frame.events {
            match event {
                GameEvent::HighScore => log::info!("Demo set a high score"),
                other => log::trace!("Event {:?}", other),
            }
        }
        self.last = Some(frame.clone());
        Ok(())
    }
}
