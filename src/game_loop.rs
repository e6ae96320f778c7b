//! Fixed timestep loop driver
//!
//! Couples the simulation to whatever cadence the host paints at. Each host
//! frame: wait for the frame, collect input, run as many fixed ticks as the
//! elapsed time covers, project the state and hand the frame back. The loop
//! has no exit condition of its own; Won/Lost are states, and only the host
//! closing ends it.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::input::InputAdapter;
use crate::renderer::{Frame, build_frame, score_label};
use crate::sim::{GameEvent, GameState, tick};

/// The environment the game runs in (terminal, browser, test harness)
pub trait Host {
    type Error;

    /// Deliver pending raw input to the adapter. Returns `Ok(false)` once the
    /// host has shut down.
    fn pump_input(&mut self, input: &mut InputAdapter) -> Result<bool, Self::Error>;

    /// Paint a frame
    fn present(&mut self, frame: &Frame) -> Result<(), Self::Error>;

    /// Update the score label shown next to the arena
    fn set_score_label(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Yield until the next frame; returns seconds since the previous one
    fn next_frame(&mut self) -> f32;
}

/// Owns the round and its pending input between host frames
#[derive(Debug)]
pub struct LoopDriver {
    pub state: GameState,
    pub input: InputAdapter,
    accumulator: f32,
    score_label: String,
    label_dirty: bool,
}

impl LoopDriver {
    pub fn new(state: GameState) -> Self {
        let score_label = score_label(state.score);
        Self {
            state,
            input: InputAdapter::new(),
            accumulator: 0.0,
            score_label,
            label_dirty: false,
        }
    }

    pub fn score_label(&self) -> &str {
        &self.score_label
    }

    /// Run simulation ticks for `elapsed` seconds of host time.
    /// Returns the number of ticks run.
    pub fn update(&mut self, elapsed: f32) -> u32 {
        // NaN or infinite host time counts as an empty frame
        let elapsed = if elapsed.is_finite() { elapsed } else { 0.0 };
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // One-shot intents are consumed by the first tick that sees them
            let input = self.input.take();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if self.accumulator >= SIM_DT {
            log::debug!(
                "Dropping {:.1} ms of simulation backlog",
                self.accumulator * 1000.0
            );
            self.accumulator = 0.0;
        }

        self.process_events();
        substeps
    }

    /// Project the current state
    pub fn frame(&self) -> Frame {
        build_frame(&self.state)
    }

    /// Drive the host until it closes
    pub fn run<H: Host>(&mut self, host: &mut H) -> Result<(), H::Error> {
        host.set_score_label(&self.score_label)?;

        loop {
            let elapsed = host.next_frame();
            if !host.pump_input(&mut self.input)? {
                log::info!("Host closed after {} ticks", self.state.time_ticks);
                return Ok(());
            }

            self.update(elapsed);

            if std::mem::take(&mut self.label_dirty) {
                host.set_score_label(&self.score_label)?;
            }
            host.present(&self.frame())?;
        }
    }

    fn process_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreChanged { score } => {
                    self.score_label = score_label(score);
                    self.label_dirty = true;
                }
                GameEvent::PhaseChanged { phase } => {
                    log::info!("Phase changed to {phase:?}");
                }
                GameEvent::RoundRestarted => log::info!("New round started"),
                GameEvent::EnemyDestroyed { index } => log::trace!("Enemy {index} destroyed"),
                GameEvent::ProjectileFired => log::trace!("Projectile fired"),
            }
        }
    }
}
