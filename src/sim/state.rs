//! Round state and entity types
//!
//! Everything the step function mutates lives in [`GameState`]. The state is
//! an owned value threaded through `tick` and the renderer; there are no
//! globals, so independent rounds can coexist (tests rely on this).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every enemy destroyed
    Won,
    /// An enemy crossed the floor line
    Lost,
}

impl GamePhase {
    /// True once the round has ended (restart becomes available)
    pub fn is_over(self) -> bool {
        self != GamePhase::Playing
    }
}

/// Horizontal marching direction of the enemy grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum March {
    #[default]
    Right,
    Left,
}

impl March {
    /// +1 for right, -1 for left
    pub fn sign(self) -> f32 {
        match self {
            March::Right => 1.0,
            March::Left => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            March::Right => March::Left,
            March::Left => March::Right,
        }
    }
}

/// Something that happened during a tick, for hosts and logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    ProjectileFired,
    EnemyDestroyed { index: usize },
    ScoreChanged { score: u64 },
    PhaseChanged { phase: GamePhase },
    RoundRestarted,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per tick
    pub speed: f32,
    /// Movement intents applied on the most recent tick
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.arena_width / 2.0 - tuning.player_width / 2.0,
                tuning.arena_height - tuning.player_floor_offset,
            ),
            size: tuning.player_size(),
            speed: tuning.player_speed,
            moving_left: false,
            moving_right: false,
        }
    }

    /// Largest x the paddle may occupy
    pub fn max_x(&self, arena_width: f32) -> f32 {
        (arena_width - self.size.x).max(0.0)
    }

    /// Spawn point for a projectile of the given size, centred on the paddle
    pub fn muzzle(&self, projectile_size: Vec2) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size.x / 2.0 - projectile_size.x / 2.0,
            self.pos.y,
        )
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A grid enemy. Enemies are never removed mid-round, only marked dead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A player shot travelling straight up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per tick
    pub speed: f32,
}

impl Projectile {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Layout and balance the round was built from
    pub tuning: Tuning,
    pub player: Player,
    /// Fixed grid in row-major order (row 0 at the top)
    pub enemies: Vec<Enemy>,
    /// Live projectiles in firing order
    pub projectiles: Vec<Projectile>,
    pub score: u64,
    pub direction: March,
    pub phase: GamePhase,
    /// Ticks simulated this round
    pub time_ticks: u64,
    /// Events since the last drain (not part of the snapshot)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameState {
    /// Build a fresh round
    pub fn new(tuning: Tuning) -> Self {
        Self {
            player: Player::new(&tuning),
            enemies: build_enemy_grid(&tuning),
            projectiles: Vec::new(),
            score: 0,
            direction: March::Right,
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Rebuild the round from scratch. Only honoured once the round is over;
    /// returns whether the restart happened.
    pub fn restart(&mut self) -> bool {
        if !self.phase.is_over() {
            log::warn!("Ignoring restart request while playing");
            return false;
        }

        let events = std::mem::take(&mut self.events);
        *self = Self::new(self.tuning.clone());
        self.events = events;
        self.events.push(GameEvent::RoundRestarted);
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        log::info!("Round restarted");
        true
    }

    /// Spawn a projectile at the player's muzzle. Ignored unless playing.
    pub fn fire(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("Ignoring fire request in phase {:?}", self.phase);
            return false;
        }

        let size = self.tuning.projectile_size();
        self.projectiles.push(Projectile {
            pos: self.player.muzzle(size),
            size,
            speed: self.tuning.projectile_speed,
        });
        self.events.push(GameEvent::ProjectileFired);
        true
    }

    /// Move to a terminal phase. Transitions only leave `Playing`.
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != GamePhase::Playing || phase == GamePhase::Playing {
            return;
        }
        self.phase = phase;
        self.events.push(GameEvent::PhaseChanged { phase });
        log::info!(
            "Round ended: {:?} at tick {} with score {}",
            phase,
            self.time_ticks,
            self.score
        );
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_enemies().count()
    }

    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(|e| !e.alive)
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Lay out the full enemy grid in row-major order
fn build_enemy_grid(tuning: &Tuning) -> Vec<Enemy> {
    let size = tuning.enemy_size();
    let mut enemies = Vec::with_capacity(tuning.enemy_count());
    for row in 0..tuning.enemy_rows {
        for col in 0..tuning.enemy_cols {
            enemies.push(Enemy {
                pos: tuning.enemy_position(row, col),
                size,
                alive: true,
            });
        }
    }
    enemies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_round() {
        let state = GameState::default();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), 40);
        assert_eq!(state.alive_count(), 40);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.direction, March::Right);
        assert_eq!(state.player.pos, Vec2::new(375.0, 550.0));
        assert_eq!(state.enemies[0].pos, Vec2::new(100.0, 50.0));
        assert_eq!(state.enemies[11].pos, Vec2::new(160.0, 90.0));
    }

    #[test]
    fn test_fire_spawns_at_muzzle() {
        let mut state = GameState::default();
        assert!(state.fire());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, Vec2::new(397.5, 550.0));
        assert_eq!(state.projectiles[0].size, Vec2::new(5.0, 15.0));
        assert_eq!(state.drain_events(), vec![GameEvent::ProjectileFired]);
    }

    #[test]
    fn test_fire_ignored_after_round_ends() {
        let mut state = GameState::default();
        state.set_phase(GamePhase::Lost);
        assert!(!state.fire());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = GameState::default();
        state.score = 300;
        state.enemies[4].alive = false;
        assert!(!state.restart());
        assert_eq!(state.score, 300);
        assert!(!state.enemies[4].alive);
    }

    #[test]
    fn test_phase_never_reverses() {
        let mut state = GameState::default();
        state.set_phase(GamePhase::Won);
        state.set_phase(GamePhase::Lost);
        state.set_phase(GamePhase::Playing);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PhaseChanged {
                phase: GamePhase::Won
            }]
        );
    }

    #[test]
    fn test_restart_matches_fresh_round() {
        let fresh = serde_json::to_string(&GameState::default()).unwrap();

        let mut state = GameState::default();
        state.fire();
        state.score = 1200;
        state.direction = March::Left;
        state.player.pos.x = 12.0;
        state.time_ticks = 77;
        for enemy in state.enemies.iter_mut().take(12) {
            enemy.alive = false;
            enemy.pos.y += 60.0;
        }
        state.set_phase(GamePhase::Lost);

        assert!(state.restart());
        assert_eq!(serde_json::to_string(&state).unwrap(), fresh);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::RoundRestarted));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 0 }));
    }

    #[test]
    fn test_march_reversal() {
        assert_eq!(March::Right.sign(), 1.0);
        assert_eq!(March::Right.reversed(), March::Left);
        assert_eq!(March::Left.reversed().sign(), 1.0);
    }
}
