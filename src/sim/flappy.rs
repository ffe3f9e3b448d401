//! Side-scroller simulation
//!
//! A bird falls under gravity between scrolling pipe pairs. One call to
//! `tick` advances exactly one fixed step; there is no dt and no terminal
//! velocity cap.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::consts::*;
use crate::settings::Difficulty;

/// Per-difficulty physics parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlappyTuning {
    pub gravity: f32,
    pub pipe_gap: f32,
    pub flap_strength: f32,
    pub pipe_speed: f32,
    pub spawn_interval: u32,
}

impl FlappyTuning {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            gravity: difficulty.gravity(),
            pipe_gap: difficulty.pipe_gap(),
            flap_strength: FLAP_STRENGTH,
            pipe_speed: PIPE_SPEED,
            spawn_interval: PIPE_SPAWN_INTERVAL,
        }
    }
}

/// The player-controlled bird
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    /// Vertical velocity, positive is down
    pub vel: f32,
    pub radius: f32,
}

impl Bird {
    pub fn new(y: f32) -> Self {
        Self {
            pos: Vec2::new(BIRD_X, y),
            vel: 0.0,
            radius: BIRD_RADIUS,
        }
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.radius
    }

    /// velocity += gravity; position += velocity
    pub fn integrate(&mut self, gravity: f32) {
        self.vel += gravity;
        self.pos.y += self.vel;
    }
}

/// A pipe pair with a gap between `gap_top` and `gap_bottom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    scored: bool,
}

impl Pipe {
    /// `gap_top < gap_bottom` always holds since `gap_height` is positive
    pub fn new(id: u32, x: f32, gap_top: f32, gap_height: f32) -> Self {
        Self {
            id,
            x,
            gap_top,
            gap_bottom: gap_top + gap_height.abs(),
            scored: false,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    pub fn scored(&self) -> bool {
        self.scored
    }

    /// Horizontal extents overlap (strict on both sides)
    pub fn overlaps_x(&self, bird: &Bird) -> bool {
        bird.right() > self.x && bird.left() < self.right()
    }

    /// Bird's vertical extent lies within the gap
    pub fn gap_contains(&self, bird: &Bird) -> bool {
        bird.top() >= self.gap_top && bird.bottom() <= self.gap_bottom
    }

    /// Flag the pipe as passed. True only the first time.
    fn mark_scored(&mut self) -> bool {
        if self.scored {
            return false;
        }
        self.scored = true;
        true
    }
}

/// Terminal if the bird touches the top/bottom edge or clips any pipe it overlaps
pub fn check_collision(bird: &Bird, pipes: &[Pipe]) -> bool {
    if bird.bottom() >= FLAPPY_HEIGHT || bird.top() <= 0.0 {
        return true;
    }
    pipes
        .iter()
        .any(|pipe| pipe.overlaps_x(bird) && !pipe.gap_contains(bird))
}

/// Complete side-scroller state
#[derive(Debug, Clone)]
pub struct FlappyState {
    pub tuning: FlappyTuning,
    pub bird: Bird,
    /// Active pipes, oldest first
    pub pipes: Vec<Pipe>,
    pub score: u32,
    pub time_ticks: u64,
    spawn_timer: u32,
    flap_requested: bool,
    terminal: bool,
    next_id: u32,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl FlappyState {
    pub fn new(tuning: FlappyTuning, seed: u64) -> Self {
        Self {
            tuning,
            bird: Bird::new(FLAPPY_HEIGHT / 2.0),
            pipes: Vec::new(),
            score: 0,
            time_ticks: 0,
            spawn_timer: 0,
            flap_requested: false,
            terminal: false,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Queue an impulse for the next tick
    pub fn flap(&mut self) {
        if !self.terminal {
            self.flap_requested = true;
        }
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one fixed step
    pub fn tick(&mut self) {
        if self.terminal {
            return;
        }
        self.time_ticks += 1;

        if std::mem::take(&mut self.flap_requested) {
            self.bird.vel = self.tuning.flap_strength;
            self.events.push(GameEvent::Flapped);
        }
        self.bird.integrate(self.tuning.gravity);

        self.spawn_timer += 1;
        if self.spawn_timer > self.tuning.spawn_interval {
            self.spawn_pipe();
            self.spawn_timer = 0;
        }

        for pipe in &mut self.pipes {
            pipe.x -= self.tuning.pipe_speed;
        }
        self.pipes.retain(|p| p.right() > 0.0);

        for pipe in &mut self.pipes {
            if pipe.right() < self.bird.pos.x && pipe.mark_scored() {
                self.score += 1;
                self.events.push(GameEvent::Scored);
            }
        }

        if check_collision(&self.bird, &self.pipes) {
            self.terminal = true;
            self.events.push(GameEvent::Collided);
            log::debug!("Bird collided at tick {} (score {})", self.time_ticks, self.score);
        }
    }

    /// Spawn a pipe at the trailing edge with a random gap that fits
    /// inside the field with the margin kept on both sides
    fn spawn_pipe(&mut self) {
        let gap = self.tuning.pipe_gap.round() as i32;
        let max_top = (FLAPPY_HEIGHT as i32 - gap - PIPE_GAP_MARGIN).max(PIPE_GAP_MARGIN);
        let top = self.rng.random_range(PIPE_GAP_MARGIN..=max_top);

        let id = self.next_id;
        self.next_id += 1;
        self.pipes
            .push(Pipe::new(id, FLAPPY_WIDTH, top as f32, gap as f32));
        log::trace!("Pipe {} spawned, gap {}..{}", id, top, top + gap);
    }
}
