//! Grid Invaders entry point
//!
//! Loads tuning, opens the terminal host and runs the game loop until the
//! player quits.

use std::io::{BufWriter, stdout};

use anyhow::Context;

use grid_invaders::consts::TUNING_ENV;
use grid_invaders::platform::TerminalHost;
use grid_invaders::sim::GameState;
use grid_invaders::{LoopDriver, Tuning};

fn load_tuning() -> anyhow::Result<Tuning> {
    match std::env::var_os(TUNING_ENV) {
        Some(path) => Tuning::load(&path)
            .with_context(|| format!("loading {TUNING_ENV}={}", path.to_string_lossy())),
        None => {
            log::info!("Using default tuning");
            Ok(Tuning::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Grid Invaders starting...");

    let tuning = load_tuning()?;
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("Effective tuning: {}", tuning.to_json()?);
    }
    let mut driver = LoopDriver::new(GameState::new(tuning));

    // Dropping the host restores the terminal, including on error
    let mut host = TerminalHost::new(BufWriter::new(stdout())).context("opening terminal")?;
    driver.run(&mut host).context("running game loop")?;
    drop(host);

    log::info!("Final score: {}", driver.state.score);
    Ok(())
}
