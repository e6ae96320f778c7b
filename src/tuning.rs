//! Game balance and arena layout
//!
//! Every gameplay constant lives here so a round can be rebuilt from scratch
//! on restart. Defaults reproduce the classic 800x600 layout; a JSON file can
//! override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay constants (sizes in arena units, speeds in units per tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Distance from the arena bottom to the player's resting line
    pub player_floor_offset: f32,
    /// Enemies whose bottom edge passes `arena_height - floor_margin` end the round
    pub floor_margin: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,

    // === Projectiles ===
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,

    // === Enemy grid ===
    pub enemy_rows: u32,
    pub enemy_cols: u32,
    /// Top-left corner of the (row 0, col 0) enemy
    pub enemy_origin: (f32, f32),
    /// Distance between neighbouring enemies' top-left corners
    pub enemy_spacing: (f32, f32),
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed: f32,
    /// Vertical drop applied on every direction reversal
    pub enemy_descent: f32,

    // === Scoring ===
    pub kill_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            player_floor_offset: 50.0,
            floor_margin: 50.0,

            player_width: 50.0,
            player_height: 20.0,
            player_speed: 7.0,

            projectile_width: 5.0,
            projectile_height: 15.0,
            projectile_speed: 8.0,

            enemy_rows: 4,
            enemy_cols: 10,
            enemy_origin: (100.0, 50.0),
            enemy_spacing: (60.0, 40.0),
            enemy_width: 30.0,
            enemy_height: 20.0,
            enemy_speed: 2.0,
            enemy_descent: 20.0,

            kill_score: 100,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check that the layout is playable
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("projectile_width", self.projectile_width),
            ("projectile_height", self.projectile_height),
            ("projectile_speed", self.projectile_speed),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("enemy_speed", self.enemy_speed),
            ("enemy_descent", self.enemy_descent),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.enemy_rows == 0 || self.enemy_cols == 0 {
            return Err(TuningError::Invalid("enemy grid is empty".into()));
        }
        if self.enemy_rows.checked_mul(self.enemy_cols).is_none() {
            return Err(TuningError::Invalid(format!(
                "enemy grid of {}x{} is too large",
                self.enemy_rows, self.enemy_cols
            )));
        }
        let (spacing_x, spacing_y) = self.enemy_spacing;
        if !(spacing_x.is_finite() && spacing_x >= self.enemy_width) {
            return Err(TuningError::Invalid(format!(
                "enemy_spacing x must be at least enemy_width, got {spacing_x}"
            )));
        }
        if !(spacing_y.is_finite() && spacing_y >= self.enemy_height) {
            return Err(TuningError::Invalid(format!(
                "enemy_spacing y must be at least enemy_height, got {spacing_y}"
            )));
        }
        if self.player_width > self.arena_width {
            return Err(TuningError::Invalid(
                "player is wider than the arena".into(),
            ));
        }
        if self.player_floor_offset <= 0.0 || self.player_floor_offset > self.arena_height {
            return Err(TuningError::Invalid(
                "player resting line lies outside the arena".into(),
            ));
        }

        let grid_min = self.enemy_position(0, 0);
        let grid_max = self.enemy_position(self.enemy_rows - 1, self.enemy_cols - 1)
            + self.enemy_size();
        if grid_min.x < 0.0 || grid_min.y < 0.0 || grid_max.x > self.arena_width {
            return Err(TuningError::Invalid(
                "enemy grid does not fit the arena".into(),
            ));
        }
        if grid_max.y > self.floor_line() {
            return Err(TuningError::Invalid(
                "enemy grid starts below the floor line".into(),
            ));
        }

        Ok(())
    }

    /// Number of enemies in a full grid
    pub fn enemy_count(&self) -> usize {
        (self.enemy_rows as usize).saturating_mul(self.enemy_cols as usize)
    }

    /// Starting top-left corner of the enemy at `(row, col)`
    pub fn enemy_position(&self, row: u32, col: u32) -> Vec2 {
        Vec2::new(
            self.enemy_origin.0 + col as f32 * self.enemy_spacing.0,
            self.enemy_origin.1 + row as f32 * self.enemy_spacing.1,
        )
    }

    pub fn enemy_size(&self) -> Vec2 {
        Vec2::new(self.enemy_width, self.enemy_height)
    }

    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    pub fn projectile_size(&self) -> Vec2 {
        Vec2::new(self.projectile_width, self.projectile_height)
    }

    /// Y coordinate an enemy's bottom edge must not pass
    pub fn floor_line(&self) -> f32 {
        self.arena_height - self.floor_margin
    }
}
