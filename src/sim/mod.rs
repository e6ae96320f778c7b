//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit timestep only
//! - Stable iteration order (firing order for projectiles, grid order for enemies)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Hit, find_hits};
pub use state::{Enemy, GameEvent, GamePhase, GameState, March, Player, Projectile};
pub use tick::{TickInput, tick};
