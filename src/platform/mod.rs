//! Platform abstraction layer
//!
//! The core never touches windows, keyboards or speakers. A `Surface` turns
//! raw input into `InputEvent`s and presents `Frame`s; `run` drives one
//! `Arcade` against it on a single thread at the current tick rate.

pub mod demo;

pub use demo::DemoSurface;

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::renderer::Frame;
use crate::session::{Arcade, Control, InputEvent, Title};
use crate::settings::Settings;

/// Input and presentation collaborator
pub trait Surface {
    /// Events received since the last poll, oldest first
    fn poll_input(&mut self) -> Result<Vec<InputEvent>>;

    /// Show one frame
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Paces the loop to a tick rate
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    throttle: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            throttle: true,
        }
    }

    /// Never sleeps (headless runs and tests)
    pub fn unthrottled() -> Self {
        Self {
            last: Instant::now(),
            throttle: false,
        }
    }

    pub fn tick_duration(rate: u32) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(rate.max(1)))
    }

    /// Sleep out the rest of the current tick. Returns the time slept.
    pub fn wait(&mut self, rate: u32) -> Duration {
        let target = Self::tick_duration(rate);
        let elapsed = self.last.elapsed();
        let slept = if self.throttle && elapsed < target {
            let remaining = target - elapsed;
            thread::sleep(remaining);
            remaining
        } else {
            Duration::ZERO
        };
        self.last = Instant::now();
        slept
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Run until the surface asks to quit. Returns the number of frames presented.
///
/// Each iteration polls input, advances one tick, presents the frame and
/// then waits on the clock.
pub fn run<S: Surface>(arcade: &mut Arcade, surface: &mut S, clock: &mut FrameClock) -> Result<u64> {
    log::info!("{} running", arcade.title().name());
    let mut frames = 0u64;
    loop {
        for event in surface.poll_input()? {
            if arcade.handle_input(event) == Control::Quit {
                log::info!("Exiting after {frames} frames");
                return Ok(frames);
            }
        }
        arcade.tick();
        let frame = arcade.frame();
        surface.present(&frame)?;
        frames += 1;
        clock.wait(arcade.tick_rate());
    }
}

/// Load settings from the default data directory and run a title with the
/// autopilot surface at real-time pace
pub fn launch(title: Title, demo_rounds: u32) -> Result<()> {
    let settings = Settings::load(Path::new(Settings::DEFAULT_DATA_DIR));
    let mut arcade = Arcade::new(title, settings);
    let mut surface = DemoSurface::new(demo_rounds);
    run(&mut arcade, &mut surface, &mut FrameClock::new())?;
    log::info!("Best score this run: {}", surface.best_score());
    Ok(())
}
