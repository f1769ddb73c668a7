//! Scene builder: game state in, triangle list out
//!
//! The simulation knows nothing about drawing; this module walks the state
//! once per frame and emits flat-color geometry for the pipeline. All art
//! is procedural, in the spirit of the obstacle and cat shapes being simple
//! silhouettes a player reads at a glance.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::background::Background;
use crate::consts::*;
use crate::sim::{GamePhase, GameState, Obstacle, ObstacleKind, Player, PlayerPose};

/// Build the complete shape list for one frame
pub fn build(state: &GameState, background: &Background) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(16 * 1024);

    background.emit(&mut out);

    if state.phase != GamePhase::Splash {
        for obstacle in &state.obstacles {
            draw_obstacle(&mut out, obstacle);
        }
        for projectile in &state.projectiles {
            let b = projectile.bounds();
            shapes::rect(
                &mut out,
                b.min,
                Vec2::new(b.width(), b.height()),
                colors::PROJECTILE,
            );
            // Short fading trail behind the shot
            shapes::rect(
                &mut out,
                b.min - Vec2::new(14.0, -1.0),
                Vec2::new(12.0, b.height() - 2.0),
                [1.0, 0.9, 0.3, 0.4],
            );
        }
        draw_cat(&mut out, &state.player, state.time_ticks);
    }

    for particle in &state.particles {
        let alpha = particle.ttl as f32 / particle.lifetime.max(1) as f32;
        let mut color = particle.color;
        color[3] = alpha;
        shapes::circle(&mut out, particle.pos, particle.size, color, 6);
    }

    if state.phase == GamePhase::GameOver || state.phase == GamePhase::Paused {
        shapes::rect(
            &mut out,
            Vec2::ZERO,
            Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            colors::OVERLAY,
        );
    }

    out
}

fn draw_cat(out: &mut Vec<Vertex>, player: &Player, time_ticks: u64) {
    let b = player.bounds();
    let (body, dark) = match player.pose {
        PlayerPose::Dead => (colors::CAT_DEAD, colors::CAT_DEAD),
        _ => (colors::CAT_BODY, colors::CAT_DARK),
    };

    match player.pose {
        PlayerPose::Sliding => {
            // Low profile: stretched body, head forward
            shapes::rect(
                out,
                Vec2::new(b.min.x, b.min.y + 10.0),
                Vec2::new(b.width() - 14.0, b.height() - 10.0),
                body,
            );
            let head = Vec2::new(b.max.x - 12.0, b.min.y + 16.0);
            shapes::circle(out, head, 14.0, body, 12);
            draw_ears(out, head, 10.0, dark);
            draw_eye(out, head + Vec2::new(5.0, -3.0), player.pose);
            // Tail trailing along the ground
            shapes::line(
                out,
                Vec2::new(b.min.x, b.max.y - 8.0),
                Vec2::new(b.min.x - 20.0, b.max.y - 14.0),
                4.0,
                dark,
            );
        }
        _ => {
            // Torso
            shapes::rect(
                out,
                Vec2::new(b.min.x + 2.0, b.max.y - 48.0),
                Vec2::new(b.width() - 10.0, 34.0),
                body,
            );
            // Legs: two pairs, swinging with a four-frame run cycle
            let airborne = player.pose == PlayerPose::Jumping;
            let phase = ((time_ticks / 6) % 4) as f32;
            let swing = if airborne || player.pose == PlayerPose::Dead {
                0.0
            } else {
                (phase - 1.5) * 4.0
            };
            let leg_y = b.max.y - 14.0;
            let leg_size = Vec2::new(9.0, 14.0);
            shapes::rect(out, Vec2::new(b.min.x + 6.0 + swing, leg_y), leg_size, dark);
            shapes::rect(out, Vec2::new(b.min.x + 22.0 - swing, leg_y), leg_size, dark);
            shapes::rect(out, Vec2::new(b.max.x - 32.0 + swing, leg_y), leg_size, dark);
            shapes::rect(out, Vec2::new(b.max.x - 16.0 - swing, leg_y), leg_size, dark);

            // Head with ears
            let head = Vec2::new(b.max.x - 16.0, b.min.y + 18.0);
            shapes::circle(out, head, 18.0, body, 14);
            draw_ears(out, head, 14.0, dark);
            draw_eye(out, head + Vec2::new(7.0, -4.0), player.pose);

            // Tail, raised while running, straight while jumping
            let tail_tip = if airborne {
                Vec2::new(b.min.x - 22.0, b.max.y - 40.0)
            } else {
                Vec2::new(b.min.x - 16.0, b.max.y - 60.0)
            };
            shapes::line(
                out,
                Vec2::new(b.min.x + 4.0, b.max.y - 40.0),
                tail_tip,
                5.0,
                dark,
            );
        }
    }
}

fn draw_ears(out: &mut Vec<Vertex>, head: Vec2, radius: f32, color: [f32; 4]) {
    shapes::triangle(
        out,
        head + Vec2::new(-radius, -radius * 0.4),
        head + Vec2::new(-radius * 0.5, -radius - 6.0),
        head + Vec2::new(-radius * 0.1, -radius * 0.7),
        color,
    );
    shapes::triangle(
        out,
        head + Vec2::new(radius * 0.1, -radius * 0.7),
        head + Vec2::new(radius * 0.6, -radius - 6.0),
        head + Vec2::new(radius, -radius * 0.4),
        color,
    );
}

fn draw_eye(out: &mut Vec<Vertex>, pos: Vec2, pose: PlayerPose) {
    if pose == PlayerPose::Dead {
        // X eye
        let arm = 4.0;
        shapes::line(
            out,
            pos + Vec2::new(-arm, -arm),
            pos + Vec2::new(arm, arm),
            2.0,
            [0.05, 0.05, 0.05, 1.0],
        );
        shapes::line(
            out,
            pos + Vec2::new(-arm, arm),
            pos + Vec2::new(arm, -arm),
            2.0,
            [0.05, 0.05, 0.05, 1.0],
        );
    } else {
        shapes::circle(out, pos, 4.0, colors::WHITE, 8);
        shapes::circle(out, pos + Vec2::new(1.0, 0.0), 2.0, [0.05, 0.05, 0.05, 1.0], 6);
    }
}

/// Per-kind palettes, three variants each
fn obstacle_palette(kind: ObstacleKind, variant: u8) -> ([f32; 4], [f32; 4], [f32; 4]) {
    let v = (variant % 3) as usize;
    match kind {
        ObstacleKind::Rock => {
            [
                ([0.47, 0.47, 0.47, 1.0], [0.59, 0.59, 0.59, 1.0], [0.24, 0.24, 0.24, 1.0]),
                ([0.57, 0.45, 0.31, 1.0], [0.69, 0.55, 0.39, 1.0], [0.33, 0.27, 0.18, 1.0]),
                ([0.43, 0.51, 0.35, 1.0], [0.55, 0.63, 0.43, 1.0], [0.24, 0.31, 0.22, 1.0]),
            ][v]
        }
        ObstacleKind::Log | ObstacleKind::FallenTree => {
            [
                ([0.45, 0.29, 0.13, 1.0], [0.57, 0.39, 0.20, 1.0], [0.29, 0.18, 0.08, 1.0]),
                ([0.39, 0.27, 0.16, 1.0], [0.51, 0.37, 0.24, 1.0], [0.24, 0.16, 0.10, 1.0]),
                ([0.51, 0.33, 0.14, 1.0], [0.63, 0.43, 0.22, 1.0], [0.33, 0.20, 0.08, 1.0]),
            ][v]
        }
        ObstacleKind::Bush => {
            [
                ([0.16, 0.39, 0.14, 1.0], [0.27, 0.55, 0.24, 1.0], [0.10, 0.27, 0.08, 1.0]),
                ([0.47, 0.33, 0.10, 1.0], [0.61, 0.43, 0.14, 1.0], [0.35, 0.24, 0.06, 1.0]),
                ([0.16, 0.39, 0.14, 1.0], [0.27, 0.55, 0.24, 1.0], [0.71, 0.16, 0.16, 1.0]),
            ][v]
        }
        ObstacleKind::Balloon => {
            [
                ([0.86, 0.16, 0.16, 1.0], [1.0, 0.31, 0.31, 1.0], [0.31, 0.31, 0.31, 1.0]),
                ([0.16, 0.31, 0.86, 1.0], [0.31, 0.47, 1.0, 1.0], [0.31, 0.31, 0.31, 1.0]),
                ([0.90, 0.82, 0.20, 1.0], [1.0, 0.94, 0.35, 1.0], [0.31, 0.31, 0.31, 1.0]),
            ][v]
        }
    }
}

fn draw_obstacle(out: &mut Vec<Vertex>, obstacle: &Obstacle) {
    let b = obstacle.bounds();
    let (base, light, dark) = obstacle_palette(obstacle.kind, obstacle.variant);

    match obstacle.kind {
        ObstacleKind::Rock => {
            let center = b.center();
            let radius = b.width().min(b.height()) / 2.0;
            shapes::circle(out, center, radius, base, 8);
            shapes::circle(out, center - Vec2::new(radius * 0.3, radius * 0.3), radius * 0.45, light, 8);
            shapes::circle(out, center + Vec2::new(radius * 0.35, radius * 0.35), radius * 0.25, dark, 6);
        }
        ObstacleKind::Log => {
            shapes::rect(out, b.min, Vec2::new(b.width(), b.height()), base);
            // End-grain disc and bark stripes
            shapes::ellipse(
                out,
                Vec2::new(b.min.x + 6.0, b.center().y),
                Vec2::new(6.0, b.height() / 2.0),
                light,
                10,
            );
            for i in 0..2 {
                let y = b.min.y + b.height() * (0.35 + 0.3 * i as f32);
                shapes::line(
                    out,
                    Vec2::new(b.min.x + 14.0, y),
                    Vec2::new(b.max.x - 6.0, y),
                    2.0,
                    dark,
                );
            }
        }
        ObstacleKind::Bush => {
            let r = b.height() / 2.0;
            shapes::circle(out, Vec2::new(b.min.x + r, b.max.y - r), r, base, 10);
            shapes::circle(out, Vec2::new(b.center().x, b.min.y + r * 0.9), r * 0.9, light, 10);
            shapes::circle(out, Vec2::new(b.max.x - r, b.max.y - r), r, base, 10);
            // Detail dots: highlights or berries depending on the palette
            for i in 0..4 {
                let pos = Vec2::new(
                    b.min.x + b.width() * (0.2 + 0.2 * i as f32),
                    b.min.y + b.height() * if i % 2 == 0 { 0.35 } else { 0.6 },
                );
                shapes::circle(out, pos, 3.0, dark, 6);
            }
        }
        ObstacleKind::FallenTree => {
            // Trunk lying across the lane with a root disc and stub branches
            let trunk_height = b.height() * 0.5;
            shapes::rect(
                out,
                Vec2::new(b.min.x, b.max.y - trunk_height),
                Vec2::new(b.width(), trunk_height),
                base,
            );
            shapes::ellipse(
                out,
                Vec2::new(b.max.x - 8.0, b.max.y - trunk_height / 2.0),
                Vec2::new(8.0, trunk_height / 2.0 + 4.0),
                dark,
                10,
            );
            shapes::line(
                out,
                Vec2::new(b.min.x + b.width() * 0.3, b.max.y - trunk_height),
                Vec2::new(b.min.x + b.width() * 0.2, b.min.y),
                5.0,
                light,
            );
            shapes::line(
                out,
                Vec2::new(b.min.x + b.width() * 0.6, b.max.y - trunk_height),
                Vec2::new(b.min.x + b.width() * 0.7, b.min.y + 8.0),
                4.0,
                light,
            );
        }
        ObstacleKind::Balloon => {
            let envelope_height = b.height() * 0.6;
            let center = Vec2::new(b.center().x, b.min.y + envelope_height / 2.0);
            shapes::ellipse(
                out,
                center,
                Vec2::new(b.width() / 2.0, envelope_height / 2.0),
                base,
                14,
            );
            shapes::ellipse(
                out,
                center - Vec2::new(b.width() * 0.15, envelope_height * 0.2),
                Vec2::new(b.width() * 0.15, envelope_height * 0.18),
                light,
                8,
            );
            // Knot and jagged string down to the box bottom
            let knot = Vec2::new(center.x, b.min.y + envelope_height);
            shapes::rect(out, knot - Vec2::new(3.0, 0.0), Vec2::new(6.0, 6.0), base);
            let mut from = knot + Vec2::new(0.0, 6.0);
            let steps = 3;
            for i in 1..=steps {
                let sway = if i % 2 == 0 { 4.0 } else { -4.0 };
                let to = Vec2::new(
                    knot.x + sway,
                    knot.y + 6.0 + (b.max.y - knot.y - 6.0) * i as f32 / steps as f32,
                );
                shapes::line(out, from, to, 1.5, dark);
                from = to;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_splash_scene_has_no_cat() {
        let tuning = Tuning::default();
        let state = GameState::new(1, &tuning);
        let background = Background::new(1, crate::background::Theme::BlueDusk);
        let splash = build(&state, &background);

        let mut running = state.clone();
        running.phase = GamePhase::Running;
        let with_cat = build(&running, &background);
        assert!(with_cat.len() > splash.len());
    }

    #[test]
    fn test_every_obstacle_kind_draws() {
        let kinds = [
            ObstacleKind::Rock,
            ObstacleKind::Log,
            ObstacleKind::Bush,
            ObstacleKind::FallenTree,
            ObstacleKind::Balloon,
        ];
        for kind in kinds {
            let mut out = Vec::new();
            draw_obstacle(
                &mut out,
                &Obstacle {
                    id: 1,
                    kind,
                    x: 300.0,
                    bottom: GROUND_LEVEL,
                    size: kind.base_size(),
                    speed: 420.0,
                    variant: 2,
                    passed: false,
                },
            );
            assert!(!out.is_empty(), "{kind:?} emitted nothing");
            assert_eq!(out.len() % 3, 0, "{kind:?} not a triangle list");
        }
    }
}
