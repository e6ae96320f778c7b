//! Grid Invaders - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, round state)
//! - `input`: Raw key events to per-tick intents
//! - `renderer`: World state to host-agnostic draw commands
//! - `game_loop`: Fixed-timestep driver over an abstract host
//! - `platform`: Terminal host used by the binary
//! - `tuning`: Data-driven game balance

pub mod game_loop;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game_loop::{Host, LoopDriver};
pub use input::{Action, InputAdapter, Key};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one host frame at 60 Hz).
    /// Per-tick speeds in [`crate::Tuning`] are expressed in this unit.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame the driver will try to catch up on (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Environment variable naming an optional tuning JSON file
    pub const TUNING_ENV: &str = "GRID_INVADERS_TUNING";
}
