//! Hit detection between projectiles and the enemy grid
//!
//! Detection is a read-only pass that produces a list of [`Hit`]s; applying
//! them (killing enemies, removing projectiles, scoring) happens afterwards in
//! `tick`, so nothing is removed from a collection while it is being scanned.

use glam::Vec2;

use super::state::{Enemy, Projectile};

/// Axis-aligned bounding box (top-left corner plus size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max().x
            && self.max().x > other.min.x
            && self.min.y < other.max().y
            && self.max().y > other.min.y
    }
}

/// A projectile that struck an enemy this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile: usize,
    pub enemy: usize,
}

/// Pair each projectile with at most one enemy.
///
/// Projectiles are visited in firing order and enemies in grid order; the
/// first alive, unclaimed enemy a projectile overlaps is its hit. An enemy
/// claimed by an earlier projectile is skipped, so every kill is credited once.
pub fn find_hits(projectiles: &[Projectile], enemies: &[Enemy]) -> Vec<Hit> {
    let mut claimed = vec![false; enemies.len()];
    let mut hits = Vec::new();

    for (pi, projectile) in projectiles.iter().enumerate() {
        let bounds = projectile.bounds();
        let target = enemies
            .iter()
            .enumerate()
            .find(|(ei, enemy)| enemy.alive && !claimed[*ei] && bounds.overlaps(&enemy.bounds()));

        if let Some((ei, _)) = target {
            claimed[ei] = true;
            hits.push(Hit {
                projectile: pi,
                enemy: ei,
            });
        }
    }

    hits
}
