//! Fixed timestep simulation tick
//!
//! Advances a round by one step: player movement, projectiles, the enemy
//! march, collisions and the win/loss checks, in that order.

use super::collision::find_hits;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::SIM_DT;

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left while held
    pub move_left: bool,
    /// Move right while held
    pub move_right: bool,
    /// Fire requests collected since the last tick (one projectile each)
    pub fire: u32,
    /// Restart request; honoured only once the round is over
    pub restart: bool,
}

impl TickInput {
    /// Drop the edge-triggered parts, keeping held movement
    pub fn clear_one_shots(&mut self) {
        self.fire = 0;
        self.restart = false;
    }
}

/// Advance the game state by `dt` seconds.
///
/// Speeds in the tuning are per tick at [`SIM_DT`]; other values of `dt`
/// scale movement proportionally. The enemy descent is per reversal and
/// does not scale.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart && state.restart() {
        return;
    }

    // Round over: nothing moves until restart
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    let steps = dt / SIM_DT;

    // Shots leave from where the paddle is before it moves this tick
    for _ in 0..input.fire {
        state.fire();
    }

    move_player(state, input, steps);
    advance_projectiles(state, steps);

    if march_enemies(state, steps) {
        reverse_and_descend(state);
    }

    resolve_collisions(state);

    // A same-tick floor breach already ended the round above
    if state.phase == GamePhase::Playing && state.all_enemies_dead() {
        state.set_phase(GamePhase::Won);
    }
}

/// Left then right, each clamped independently
fn move_player(state: &mut GameState, input: &TickInput, steps: f32) {
    let max_x = state.player.max_x(state.tuning.arena_width);
    let player = &mut state.player;
    let delta = player.speed * steps;

    player.moving_left = input.move_left;
    player.moving_right = input.move_right;

    if input.move_left {
        player.pos.x = (player.pos.x - delta).clamp(0.0, max_x);
    }
    if input.move_right {
        player.pos.x = (player.pos.x + delta).clamp(0.0, max_x);
    }
}

/// Move shots up and drop any that reached the top
fn advance_projectiles(state: &mut GameState, steps: f32) {
    state.projectiles.retain_mut(|p| {
        p.pos.y -= p.speed * steps;
        p.pos.y > 0.0
    });
}

/// Shift every alive enemy sideways. Returns true if any of them ended up
/// past an arena edge; every enemy moves regardless.
fn march_enemies(state: &mut GameState, steps: f32) -> bool {
    let dx = state.direction.sign() * state.tuning.enemy_speed * steps;
    let arena_width = state.tuning.arena_width;

    let mut edge_reached = false;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.x += dx;
        if enemy.pos.x < 0.0 || enemy.pos.x + enemy.size.x > arena_width {
            edge_reached = true;
        }
    }
    edge_reached
}

/// Flip the march and drop the grid one step; a breach of the floor line
/// loses the round on this tick
fn reverse_and_descend(state: &mut GameState) {
    state.direction = state.direction.reversed();

    let descent = state.tuning.enemy_descent;
    let floor = state.tuning.floor_line();

    let mut breached = false;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.y += descent;
        if enemy.pos.y + enemy.size.y > floor {
            breached = true;
        }
    }

    log::debug!(
        "Enemies reversed to {:?} at tick {}",
        state.direction,
        state.time_ticks
    );

    if breached {
        state.set_phase(GamePhase::Lost);
    }
}

/// Apply this tick's hits: kill, score, and retire the spent projectiles
fn resolve_collisions(state: &mut GameState) {
    let hits = find_hits(&state.projectiles, &state.enemies);
    if hits.is_empty() {
        return;
    }

    let mut spent = vec![false; state.projectiles.len()];
    for hit in &hits {
        spent[hit.projectile] = true;
        state.enemies[hit.enemy].alive = false;
        state.score += state.tuning.kill_score;
        state.events.push(GameEvent::EnemyDestroyed { index: hit.enemy });
        log::debug!("Enemy {} destroyed, score {}", hit.enemy, state.score);
    }

    let mut index = 0;
    state.projectiles.retain(|_| {
        let keep = !spent[index];
        index += 1;
        keep
    });

    state.events.push(GameEvent::ScoreChanged { score: state.score });
}
