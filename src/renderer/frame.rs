//! Render projection: world state to draw commands

use super::{Color, DrawCommand, Frame, TextAlign};
use crate::sim::{Aabb, GamePhase, GameState};

const BACKGROUND: Color = Color::BLACK;
const PLAYER: Color = Color::GREEN;
const ENEMY: Color = Color::RED;
const PROJECTILE: Color = Color::WHITE;
const BANNER: Color = Color::WHITE;

const BANNER_SIZE: f32 = 48.0;
const HINT_SIZE: f32 = 24.0;
const HINT_OFFSET: f32 = 40.0;

pub const WON_TEXT: &str = "YOU WIN!";
pub const LOST_TEXT: &str = "GAME OVER!";
pub const RESTART_HINT: &str = "Press R to restart";

fn rect(bounds: Aabb, color: Color) -> DrawCommand {
    DrawCommand::FillRect {
        x: bounds.min.x,
        y: bounds.min.y,
        w: bounds.size.x,
        h: bounds.size.y,
        color,
    }
}

fn centered_text(text: &str, x: f32, y: f32, size: f32) -> DrawCommand {
    DrawCommand::Text {
        text: text.to_string(),
        x,
        y,
        size,
        align: TextAlign::Center,
        color: BANNER,
    }
}

/// Project the state into draw order: background, player, alive enemies,
/// projectiles, then the end-of-round banner if the round is over.
pub fn build_frame(state: &GameState) -> Frame {
    let width = state.tuning.arena_width;
    let height = state.tuning.arena_height;

    let mut commands = Vec::with_capacity(4 + state.enemies.len() + state.projectiles.len());

    commands.push(DrawCommand::FillRect {
        x: 0.0,
        y: 0.0,
        w: width,
        h: height,
        color: BACKGROUND,
    });
    commands.push(rect(state.player.bounds(), PLAYER));
    commands.extend(state.alive_enemies().map(|e| rect(e.bounds(), ENEMY)));
    commands.extend(state.projectiles.iter().map(|p| rect(p.bounds(), PROJECTILE)));

    let banner = match state.phase {
        GamePhase::Playing => None,
        GamePhase::Won => Some(WON_TEXT),
        GamePhase::Lost => Some(LOST_TEXT),
    };
    if let Some(text) = banner {
        let (cx, cy) = (width / 2.0, height / 2.0);
        commands.push(centered_text(text, cx, cy, BANNER_SIZE));
        commands.push(centered_text(RESTART_HINT, cx, cy + HINT_OFFSET, HINT_SIZE));
    }

    Frame {
        width,
        height,
        commands,
    }
}

/// Side-channel score text for a host label
pub fn score_label(score: u64) -> String {
    format!("Score: {score}")
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::{Projectile, TickInput, tick};

    fn texts(frame: &Frame) -> Vec<&str> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_frame_layout() {
        let state = GameState::default();
        let frame = build_frame(&state);

        // background + player + 40 enemies
        assert_eq!(frame.commands.len(), 42);
        assert_eq!(
            frame.commands[0],
            DrawCommand::FillRect {
                x: 0.0,
                y: 0.0,
                w: 800.0,
                h: 600.0,
                color: Color::BLACK
            }
        );
        assert_eq!(
            frame.commands[1],
            DrawCommand::FillRect {
                x: 375.0,
                y: 550.0,
                w: 50.0,
                h: 20.0,
                color: Color::GREEN
            }
        );
        assert!(texts(&frame).is_empty());
    }

    #[test]
    fn test_dead_enemies_are_not_drawn() {
        let mut state = GameState::default();
        state.enemies[0].alive = false;
        state.enemies[39].alive = false;
        assert_eq!(build_frame(&state).commands.len(), 40);
    }

    #[test]
    fn test_projectiles_drawn_last_in_firing_order() {
        let mut state = GameState::default();
        let size = state.tuning.projectile_size();
        for x in [10.0, 20.0] {
            state.projectiles.push(Projectile {
                pos: Vec2::new(x, 300.0),
                size,
                speed: 8.0,
            });
        }
        let frame = build_frame(&state);
        let tail: Vec<_> = frame.commands.iter().rev().take(2).collect();
        assert!(matches!(tail[0], DrawCommand::FillRect { x, color, .. } if *x == 20.0 && *color == Color::WHITE));
        assert!(matches!(tail[1], DrawCommand::FillRect { x, .. } if *x == 10.0));
    }

    #[test]
    fn test_banner_only_when_round_over() {
        let mut state = GameState::default();
        state.set_phase(GamePhase::Lost);
        let frame = build_frame(&state);
        assert_eq!(texts(&frame), vec![LOST_TEXT, RESTART_HINT]);

        let mut state = GameState::default();
        state.set_phase(GamePhase::Won);
        let frame = build_frame(&state);
        assert_eq!(texts(&frame), vec![WON_TEXT, RESTART_HINT]);
        match frame.commands.last() {
            Some(DrawCommand::Text { x, y, align, .. }) => {
                assert_eq!((*x, *y), (400.0, 340.0));
                assert_eq!(*align, TextAlign::Center);
            }
            other => panic!("expected restart hint, got {other:?}"),
        }
    }

    #[test]
    fn test_projection_does_not_mutate() {
        let mut state = GameState::default();
        tick(
            &mut state,
            &TickInput {
                fire: 1,
                ..Default::default()
            },
            crate::consts::SIM_DT,
        );
        let before = serde_json::to_string(&state).unwrap();
        let first = build_frame(&state);
        let second = build_frame(&state);
        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn test_score_label() {
        assert_eq!(score_label(0), "Score: 0");
        assert_eq!(score_label(1200), "Score: 1200");
    }
}
