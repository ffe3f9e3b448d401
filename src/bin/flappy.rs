//! Flappy Bird entry point

use arcade_loop::Title;
use arcade_loop::platform;

/// Rounds the autopilot plays before exiting
const DEMO_ROUNDS: u32 = 3;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Bird starting...");
    platform::launch(Title::Flappy, DEMO_ROUNDS)
}
