//! Raw key events to per-tick intents
//!
//! Hosts feed key-down/key-up events in whatever order they arrive; the
//! adapter only records intents. The loop driver takes a [`TickInput`]
//! snapshot at the start of each tick, so asynchronous delivery never touches
//! the world state directly.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Host-agnostic key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Char(char),
}

/// What a key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Fire,
    Restart,
}

impl Action {
    /// Default key bindings
    pub fn for_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowLeft | Key::Char('a') | Key::Char('A') => Some(Action::MoveLeft),
            Key::ArrowRight | Key::Char('d') | Key::Char('D') => Some(Action::MoveRight),
            Key::Space => Some(Action::Fire),
            Key::Char('r') | Key::Char('R') => Some(Action::Restart),
            _ => None,
        }
    }
}

/// Collects intents between ticks.
///
/// Movement is level-triggered: a direction stays active while any key bound
/// to it is held, so releasing `a` does not cancel a held left arrow. Fire and
/// restart are edge-triggered: every key-down counts once, and the count is
/// consumed by the next tick. Repeated key-downs from host auto-repeat are
/// discrete events and each one fires.
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    pending: TickInput,
    held: HashSet<Key>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match Action::for_key(key) {
            Some(Action::MoveLeft | Action::MoveRight) => {
                self.held.insert(key);
                self.refresh_movement();
            }
            Some(Action::Fire) => self.pending.fire = self.pending.fire.saturating_add(1),
            Some(Action::Restart) => self.pending.restart = true,
            None => {}
        }
    }

    /// Only movement has a release; fire and restart ignore it
    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.refresh_movement();
        }
    }

    /// Snapshot intents for a tick and clear the one-shot requests
    pub fn take(&mut self) -> TickInput {
        let input = self.pending.clone();
        self.pending.clear_one_shots();
        input
    }

    fn refresh_movement(&mut self) {
        let held = |action| {
            self.held
                .iter()
                .any(|&key| Action::for_key(key) == Some(action))
        };
        let (left, right) = (held(Action::MoveLeft), held(Action::MoveRight));
        self.pending.move_left = left;
        self.pending.move_right = right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_is_held_until_released() {
        let mut adapter = InputAdapter::new();
        adapter.key_down(Key::ArrowLeft);
        assert!(adapter.take().move_left);
        assert!(adapter.take().move_left);

        adapter.key_up(Key::ArrowLeft);
        assert!(!adapter.take().move_left);
    }

    #[test]
    fn test_fire_counts_each_press_once() {
        let mut adapter = InputAdapter::new();
        adapter.key_down(Key::Space);
        adapter.key_down(Key::Space);
        adapter.key_up(Key::Space);

        assert_eq!(adapter.take().fire, 2);
        // Holding without new key-downs does not repeat
        assert_eq!(adapter.take().fire, 0);
    }

    #[test]
    fn test_restart_is_one_shot() {
        let mut adapter = InputAdapter::new();
        adapter.key_down(Key::Char('r'));
        assert!(adapter.take().restart);
        assert!(!adapter.take().restart);
    }

    #[test]
    fn test_both_directions_can_be_held() {
        let mut adapter = InputAdapter::new();
        adapter.key_down(Key::ArrowLeft);
        adapter.key_down(Key::Char('d'));
        let input = adapter.take();
        assert!(input.move_left && input.move_right);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut adapter = InputAdapter::new();
        adapter.key_down(Key::Char('x'));
        assert_eq!(adapter.take(), TickInput::default());
    }

    #[test]
    fn test_pending_fire_survives_until_taken() {
        let mut adapter = InputAdapter::new();
        adapter.key_down(Key::Space);
        adapter.key_down(Key::ArrowRight);
        adapter.key_up(Key::ArrowRight);
        assert_eq!(adapter.take().fire, 1);
    }

    #[test]
    fn test_alternate_bindings_hold_independently() {
        let mut adapter = InputAdapter::new();
        adapter.key_down(Key::ArrowLeft);
        adapter.key_down(Key::Char('a'));
        adapter.key_up(Key::Char('a'));
        assert!(adapter.take().move_left);

        adapter.key_up(Key::ArrowLeft);
        assert!(!adapter.take().move_left);

        adapter.key_down(Key::Char('D'));
        adapter.key_down(Key::ArrowRight);
        adapter.key_up(Key::ArrowRight);
        assert!(adapter.take().move_right);
        adapter.key_up(Key::Char('D'));
        assert!(!adapter.take().move_right);
    }

    #[test]
    fn test_release_without_press_is_harmless() {
        let mut adapter = InputAdapter::new();
        adapter.key_down(Key::ArrowLeft);
        adapter.key_up(Key::Char('a'));
        adapter.key_up(Key::Space);
        assert!(adapter.take().move_left);
    }
}
