//! Fixed timestep simulation tick
//!
//! One call advances the run by exactly one tick, in a fixed order:
//! input, physics, spawner, collision (against post-movement positions),
//! score/shot bookkeeping. Rendering reads the state afterwards and never
//! mutates it.

use glam::Vec2;
use rand::Rng;

use super::collision::aabb_overlap;
use super::state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, PlayerPose, Projectile,
};
use crate::consts::*;
use crate::tuning::Tuning;

/// Downward pull on visual particles (px/s²)
const PARTICLE_GRAVITY: f32 = 360.0;
/// Upward drift of score popups (px/s)
const POPUP_RISE: f32 = 60.0;

/// Input commands for a single tick
///
/// One-shot flags are set on key-down and cleared by the caller once a tick
/// has consumed them; `slide` tracks the held key.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump (one-shot)
    pub jump: bool,
    /// Slide key currently held
    pub slide: bool,
    /// Fire a shot (one-shot)
    pub shoot: bool,
    /// Restart after game over / leave the splash screen (one-shot)
    pub restart: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

impl TickInput {
    /// Any key that starts the run from the splash screen
    fn any_action(&self) -> bool {
        self.jump || self.slide || self.shoot || self.restart
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Running,
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Splash => {
            if input.any_action() {
                log::info!("Run started (seed {})", state.seed);
                state.phase = GamePhase::Running;
            }
        }
        GamePhase::Paused => {}
        GamePhase::GameOver => {
            // Motion is frozen; leftover particles and popups still decay
            step_particles(state, dt);
            if input.restart {
                restart(state, tuning);
            }
        }
        GamePhase::Running => run_tick(state, input, tuning, dt),
    }
}

/// Rebuild the state for a new run, chaining the seed off the old RNG
fn restart(state: &mut GameState, tuning: &Tuning) {
    let seed = state.rng.random();
    *state = GameState::new(seed, tuning);
    state.phase = GamePhase::Running;
    state.events.push(GameEvent::Restarted);
    log::info!("Restarted (seed {seed})");
}

fn run_tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    state.time_ticks += 1;

    // --- Input ---
    if input.jump && state.player.grounded() && state.player.alive() {
        state.player.vy = tuning.jump_velocity;
        state.player.pose = PlayerPose::Jumping;
        state.spawn_jump_dust();
        state.events.push(GameEvent::Jumped);
    }

    if input.shoot && state.player.shots > 0 && state.player.alive() {
        state.player.shots -= 1;
        let id = state.next_entity_id();
        let pos = state.player.muzzle();
        state.projectiles.push(Projectile { id, pos });
        state.events.push(GameEvent::Fired);
    }

    // --- Physics ---
    if state.player.grounded() {
        state.player.pose = if input.slide {
            PlayerPose::Sliding
        } else {
            PlayerPose::Running
        };
    } else {
        state.player.vy += tuning.gravity * dt;
        state.player.y += state.player.vy * dt;
        if state.player.y >= GROUND_LEVEL && state.player.vy >= 0.0 {
            state.player.y = GROUND_LEVEL;
            state.player.vy = 0.0;
            state.player.pose = if input.slide {
                PlayerPose::Sliding
            } else {
                PlayerPose::Running
            };
        }
    }

    for obstacle in &mut state.obstacles {
        obstacle.x -= obstacle.speed * dt;
    }
    state.obstacles.retain(|o| !o.offscreen());

    for projectile in &mut state.projectiles {
        projectile.pos.x += PROJECTILE_SPEED * dt;
    }
    state.projectiles.retain(|p| !p.offscreen());

    // --- Spawner ---
    if state.spawn_timer == 0 {
        spawn_obstacle(state, tuning);
        state.spawn_timer = tuning.spawn_interval_ticks(state.score, &mut state.rng);
    } else {
        state.spawn_timer -= 1;
    }

    // --- Collision (post-movement positions) ---
    resolve_shots(state);

    let player_box = state.player.bounds();
    let airborne = !state.player.grounded();
    let hit = state.obstacles.iter().find(|o| {
        aabb_overlap(&player_box, &o.bounds()) && (airborne || !o.kind.is_airborne_hazard())
    });
    if hit.is_some() {
        state.player.pose = PlayerPose::Dead;
        state.phase = GamePhase::GameOver;
        state.spawn_impact_burst(player_box.center());
        state.events.push(GameEvent::Died);
        log::info!("Run over at score {}", state.score);
    }

    // --- Score / shots ---
    if state.phase == GamePhase::Running {
        update_score(state, tuning);
    }

    step_particles(state, dt);
}

/// Each projectile destroys the first obstacle it overlaps; both are removed
fn resolve_shots(state: &mut GameState) {
    let mut dead_projectiles = Vec::new();
    let mut dead_obstacles = Vec::new();
    let mut bursts = Vec::new();

    for projectile in &state.projectiles {
        let shot_box = projectile.bounds();
        let target = state
            .obstacles
            .iter()
            .filter(|o| !dead_obstacles.contains(&o.id))
            .find(|o| aabb_overlap(&shot_box, &o.bounds()));
        if let Some(obstacle) = target {
            dead_projectiles.push(projectile.id);
            dead_obstacles.push(obstacle.id);
            bursts.push(obstacle.bounds().center());
        }
    }

    if dead_projectiles.is_empty() {
        return;
    }

    state.projectiles.retain(|p| !dead_projectiles.contains(&p.id));
    state.obstacles.retain(|o| !dead_obstacles.contains(&o.id));
    for center in bursts {
        state.spawn_impact_burst(center);
        state.events.push(GameEvent::ObstacleShot);
    }
}

fn spawn_obstacle(state: &mut GameState, tuning: &Tuning) {
    let kind = ObstacleKind::pick(&mut state.rng);
    let scale = state
        .rng
        .random_range(tuning.scale_jitter_min..=tuning.scale_jitter_max);
    let size = kind.base_size() * scale;
    let bottom = if kind == ObstacleKind::Balloon {
        let altitude = state
            .rng
            .random_range(tuning.balloon_altitude_min..=tuning.balloon_altitude_max);
        GROUND_LEVEL - altitude
    } else {
        GROUND_LEVEL
    };
    let speed = state.scroll_speed
        + state
            .rng
            .random_range(-tuning.speed_jitter..=tuning.speed_jitter);
    let variant = state.rng.random_range(0..3);
    let id = state.next_entity_id();

    state.obstacles.push(Obstacle {
        id,
        kind,
        x: SCREEN_WIDTH,
        bottom,
        size,
        speed,
        variant,
        passed: false,
    });
}

/// Award points for freshly passed obstacles and shots for threshold crossings
fn update_score(state: &mut GameState, tuning: &Tuning) {
    let prev_score = state.score;
    let player_left = PLAYER_X;
    let head = Vec2::new(
        PLAYER_X + PLAYER_WIDTH / 2.0,
        state.player.bounds().min.y - 20.0,
    );

    let mut gained = 0u32;
    let mut popups = Vec::new();
    for obstacle in &mut state.obstacles {
        if obstacle.passed || obstacle.x + obstacle.size.x >= player_left {
            continue;
        }
        obstacle.passed = true;

        let mut points = obstacle.kind.points();
        if obstacle.kind == ObstacleKind::Balloon {
            state.combo += 1;
            popups.push((format!("+{points} BONUS!"), head));
            state.events.push(GameEvent::BonusScored);
        } else {
            state.combo = 0;
        }

        // Every two balloons in a row add a bonus point
        if state.combo >= 2 {
            points += state.combo / 2;
            if state.combo >= 3 {
                popups.push((format!("COMBO x{}!", state.combo), head - Vec2::new(0.0, 20.0)));
            }
        }

        gained += points;
        state.events.push(GameEvent::Scored);
    }

    if gained == 0 {
        return;
    }

    state.score = prev_score + gained;
    for (text, pos) in popups {
        state.push_popup(text, pos);
    }

    // One shot per threshold crossing, even when points jump past it
    let awards = state.score / tuning.shot_threshold - prev_score / tuning.shot_threshold;
    if awards > 0 {
        state.player.shots += awards;
        for _ in 0..awards {
            state.events.push(GameEvent::ShotAwarded);
        }
    }

    state.scroll_speed = tuning.scroll_speed_for(state.score);
}

/// Advance particles and popups; gameplay never reads these
fn step_particles(state: &mut GameState, dt: f32) {
    for particle in &mut state.particles {
        particle.pos += particle.vel * dt;
        particle.vel.y += PARTICLE_GRAVITY * dt;
        particle.ttl = particle.ttl.saturating_sub(1);
        // Shrink in the last third of life
        if particle.ttl * 3 < particle.lifetime {
            particle.size = (particle.size - 0.5).max(1.0);
        }
    }
    state.particles.retain(|p| p.ttl > 0);

    for popup in &mut state.popups {
        popup.pos.y -= POPUP_RISE * dt;
        popup.ttl = popup.ttl.saturating_sub(1);
    }
    state.popups.retain(|p| p.ttl > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Aabb;

    fn running_state(seed: u64) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(seed, &tuning);
        state.phase = GamePhase::Running;
        (state, tuning)
    }

    /// A rock resting on the ground at the given left edge
    fn rock_at(state: &mut GameState, x: f32) -> u32 {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Rock,
            x,
            bottom: GROUND_LEVEL,
            size: ObstacleKind::Rock.base_size(),
            speed: 420.0,
            variant: 0,
            passed: false,
        });
        id
    }

    #[test]
    fn test_splash_to_running() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        assert_eq!(state.phase, GamePhase::Splash);

        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.phase, GamePhase::Splash);

        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, &tuning, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_pause_toggle() {
        let (mut state, tuning) = running_state(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &tuning, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let ticks_before = state.time_ticks;
        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.time_ticks, ticks_before, "paused state must not advance");

        tick(&mut state, &pause, &tuning, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_jump_apex_and_landing() {
        let (mut state, tuning) = running_state(2);
        state.spawn_timer = 100_000; // keep the lane empty

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, &tuning, SIM_DT);
        assert!(!state.player.grounded());

        // v0 = 1200, g = 3600: apex at v0/g = 1/3 s (20 ticks),
        // back on the ground at 2*v0/g (40 ticks). Allow discretization slack.
        let mut peak = GROUND_LEVEL;
        let mut peak_tick = 0;
        let mut landed_tick = None;
        for i in 1..=60u32 {
            tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
            if state.player.y < peak {
                peak = state.player.y;
                peak_tick = i;
            }
            if landed_tick.is_none() && state.player.grounded() {
                landed_tick = Some(i);
            }
        }

        let apex_height = GROUND_LEVEL - peak;
        // v0²/2g = 200 px
        assert!(
            (apex_height - 200.0).abs() < 25.0,
            "apex height {apex_height}"
        );
        assert!((17..=23).contains(&peak_tick), "apex at tick {peak_tick}");
        let landed = landed_tick.expect("never landed");
        assert!((37..=44).contains(&landed), "landed at tick {landed}");
        // Never below the floor
        assert!(state.player.y <= GROUND_LEVEL);
    }

    #[test]
    fn test_obstacles_scroll_left_and_despawn() {
        let (mut state, tuning) = running_state(3);
        state.spawn_timer = 100_000;
        // A balloon well above the lane, so the grounded cat survives its
        // whole trip across the screen
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Balloon,
            x: 400.0,
            bottom: GROUND_LEVEL - 140.0,
            size: ObstacleKind::Balloon.base_size(),
            speed: 420.0,
            variant: 0,
            passed: false,
        });

        let mut last_x = 400.0;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
            if let Some(o) = state.obstacles.first() {
                assert!(o.x < last_x, "obstacle must move strictly left");
                last_x = o.x;
            }
        }

        // Scroll the rest of the way off screen
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_pass_scores_once_and_awards_shot_at_threshold() {
        let (mut state, tuning) = running_state(4);
        state.spawn_timer = 100_000;
        state.score = 19;
        state.scroll_speed = tuning.scroll_speed_for(19);

        // Just about to cross the player's left edge
        rock_at(&mut state, PLAYER_X - 52.0 - 1.0);
        let shots_before = state.player.shots;

        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.score, 20);
        assert_eq!(state.player.shots, shots_before + 1);

        // Further ticks must not double-count the same obstacle
        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.score, 20);
        assert_eq!(state.player.shots, shots_before + 1);
    }

    #[test]
    fn test_two_point_jump_crosses_threshold_once() {
        let (mut state, tuning) = running_state(5);
        state.spawn_timer = 100_000;
        state.score = 19;

        // A balloon pass is worth 2: 19 -> 21 crosses 20 exactly once
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Balloon,
            x: PLAYER_X - 48.0 - 1.0,
            bottom: GROUND_LEVEL - 100.0,
            size: ObstacleKind::Balloon.base_size(),
            speed: 420.0,
            variant: 0,
            passed: false,
        });

        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.score, 21);
        assert_eq!(state.player.shots, 1);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_ground_collision_is_game_over_same_tick() {
        let (mut state, tuning) = running_state(6);
        state.spawn_timer = 100_000;
        // Overlapping the player even after one tick of scrolling
        rock_at(&mut state, PLAYER_X + 10.0);

        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.pose, PlayerPose::Dead);
        assert!(!state.particles.is_empty(), "death should spawn a burst");
    }

    #[test]
    fn test_balloon_harmless_on_ground_lethal_in_air() {
        let (mut state, tuning) = running_state(7);
        state.spawn_timer = 100_000;

        let balloon = |state: &mut GameState| {
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle {
                id,
                kind: ObstacleKind::Balloon,
                // Low and wide enough to overlap even the grounded cat
                x: PLAYER_X - 20.0,
                bottom: GROUND_LEVEL - 30.0,
                size: Vec2::new(200.0, 84.0),
                speed: 420.0,
                variant: 0,
                passed: false,
            });
        };

        balloon(&mut state);
        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running, "grounded cat passes under");

        // Now jump into it
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, &tuning, SIM_DT);
        for _ in 0..10 {
            if state.phase == GamePhase::GameOver {
                break;
            }
            tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_slide_shrinks_hitbox_and_recovers() {
        let (mut state, tuning) = running_state(8);
        state.spawn_timer = 100_000;

        let slide = TickInput {
            slide: true,
            ..Default::default()
        };
        tick(&mut state, &slide, &tuning, SIM_DT);
        assert_eq!(state.player.pose, PlayerPose::Sliding);
        assert_eq!(state.player.bounds().height(), PLAYER_SLIDE_HEIGHT);
        // Bottom edge stays on the ground line
        assert_eq!(state.player.bounds().max.y, GROUND_LEVEL);

        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.player.pose, PlayerPose::Running);
        assert_eq!(state.player.bounds().height(), PLAYER_HEIGHT);
    }

    #[test]
    fn test_shot_destroys_first_obstacle_only() {
        let (mut state, tuning) = running_state(9);
        state.spawn_timer = 100_000;
        state.player.shots = 1;

        let near = rock_at(&mut state, 300.0);
        let far = rock_at(&mut state, 600.0);

        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        tick(&mut state, &shoot, &tuning, SIM_DT);
        assert_eq!(state.player.shots, 0);
        assert_eq!(state.projectiles.len(), 1);

        // Let the projectile fly; it should take out the near rock only
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
            if state.obstacles.len() == 1 {
                break;
            }
        }
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, far);
        assert_ne!(state.obstacles[0].id, near);
        assert!(state.projectiles.is_empty(), "shot is consumed by the hit");
    }

    #[test]
    fn test_shoot_without_shots_is_ignored() {
        let (mut state, tuning) = running_state(10);
        state.spawn_timer = 100_000;
        assert_eq!(state.player.shots, 0);

        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        tick(&mut state, &shoot, &tuning, SIM_DT);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_game_over_freezes_motion_until_restart() {
        let (mut state, tuning) = running_state(11);
        state.spawn_timer = 100_000;
        rock_at(&mut state, PLAYER_X + 10.0);
        tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let frozen_x = state.obstacles[0].x;
        let score = state.score;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        }
        assert_eq!(state.obstacles[0].x, frozen_x);
        assert_eq!(state.score, score);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, &tuning, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.shots, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.player.pose, PlayerPose::Running);
    }

    #[test]
    fn test_spawner_respects_minimum_interval() {
        let (mut state, tuning) = running_state(12);
        state.score = 100_000; // difficulty pinned to the floor

        let mut spawn_gaps = Vec::new();
        let mut last_spawn_tick = None;
        let mut count_before = state.obstacles.len();
        for t in 0..1000u64 {
            tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
            if state.phase != GamePhase::Running {
                break;
            }
            if state.obstacles.len() > count_before {
                if let Some(last) = last_spawn_tick {
                    spawn_gaps.push(t - last);
                }
                last_spawn_tick = Some(t);
            }
            count_before = state.obstacles.len();
        }

        assert!(!spawn_gaps.is_empty());
        for gap in spawn_gaps {
            // 800 ms floor = 48 ticks (+1 for the spawn tick itself)
            assert!(gap >= 48, "spawn gap {gap} below the safe minimum");
        }
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut a = GameState::new(424242, &tuning);
        let mut b = GameState::new(424242, &tuning);

        let script = [
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                slide: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = script[i % script.len()];
            tick(&mut a, &input, &tuning, SIM_DT);
            tick(&mut b, &input, &tuning, SIM_DT);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.id, ob.id);
            assert!((oa.x - ob.x).abs() < 1e-4);
        }
        assert!((a.player.y - b.player.y).abs() < 1e-4);
    }

    #[test]
    fn test_player_never_sinks_below_ground() {
        let (mut state, tuning) = running_state(13);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        for i in 0..600 {
            let input = if i % 37 == 0 {
                jump
            } else {
                TickInput::default()
            };
            tick(&mut state, &input, &tuning, SIM_DT);
            assert!(state.player.y <= GROUND_LEVEL + 1e-3);
            if state.phase != GamePhase::Running {
                break;
            }
        }
    }

    #[test]
    fn test_popup_and_particle_decay() {
        let (mut state, tuning) = running_state(14);
        state.spawn_timer = 100_000;
        state.push_popup("+2 BONUS!".into(), Vec2::new(100.0, 100.0));
        state.spawn_jump_dust();
        assert!(!state.popups.is_empty());
        assert!(!state.particles.is_empty());

        for _ in 0..=120 {
            tick(&mut state, &TickInput::default(), &tuning, SIM_DT);
        }
        assert!(state.popups.is_empty());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_player_box_is_aabb() {
        let (state, _tuning) = running_state(15);
        let b = state.player.bounds();
        assert_eq!(
            b,
            Aabb::from_bottom_left(
                Vec2::new(PLAYER_X, GROUND_LEVEL),
                Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
            )
        );
    }
}
