//! Game state and core simulation types
//!
//! Everything the per-tick pipeline reads or writes lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for any input
    Splash,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// What the cat is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPose {
    Running,
    Jumping,
    Sliding,
    Dead,
}

/// The player-controlled cat
///
/// The lane is fixed; only the vertical axis is simulated. `y` is the bottom
/// edge of the collision box in screen coordinates (y grows downward), so
/// grounded means `y == GROUND_LEVEL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Bottom edge of the collision box
    pub y: f32,
    /// Vertical velocity (px/s, positive = falling)
    pub vy: f32,
    pub pose: PlayerPose,
    /// Shots available to fire
    pub shots: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            y: GROUND_LEVEL,
            vy: 0.0,
            pose: PlayerPose::Running,
            shots: 0,
        }
    }
}

impl Player {
    pub fn grounded(&self) -> bool {
        self.y >= GROUND_LEVEL && self.vy >= 0.0
    }

    pub fn alive(&self) -> bool {
        self.pose != PlayerPose::Dead
    }

    /// Collision box for the current pose
    ///
    /// Sliding halves the height; the bottom edge never moves.
    pub fn bounds(&self) -> Aabb {
        let height = match self.pose {
            PlayerPose::Sliding => PLAYER_SLIDE_HEIGHT,
            _ => PLAYER_HEIGHT,
        };
        Aabb::from_bottom_left(
            Vec2::new(PLAYER_X, self.y),
            Vec2::new(PLAYER_WIDTH, height),
        )
    }

    /// Point projectiles are fired from (front of the cat, mid-body)
    pub fn muzzle(&self) -> Vec2 {
        let b = self.bounds();
        Vec2::new(b.max.x, (b.min.y + b.max.y) * 0.5)
    }
}

/// Obstacle variants the spawner can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Log,
    Bush,
    FallenTree,
    /// Floats above the lane; lethal only to an airborne cat
    Balloon,
}

impl ObstacleKind {
    /// Unscaled collision box size
    pub fn base_size(self) -> Vec2 {
        match self {
            ObstacleKind::Rock => Vec2::new(52.0, 52.0),
            ObstacleKind::Log => Vec2::new(70.0, 34.0),
            ObstacleKind::Bush => Vec2::new(66.0, 42.0),
            ObstacleKind::FallenTree => Vec2::new(96.0, 48.0),
            ObstacleKind::Balloon => Vec2::new(48.0, 84.0),
        }
    }

    /// Points awarded for passing this obstacle
    pub fn points(self) -> u32 {
        match self {
            ObstacleKind::Balloon => 2,
            _ => 1,
        }
    }

    pub fn is_airborne_hazard(self) -> bool {
        self == ObstacleKind::Balloon
    }

    /// Pick a kind with the spawner's weighting
    /// (Rock 25%, Log 20%, Bush 20%, FallenTree 20%, Balloon 15%)
    pub fn pick(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..100u32) {
            0..25 => ObstacleKind::Rock,
            25..45 => ObstacleKind::Log,
            45..65 => ObstacleKind::Bush,
            65..85 => ObstacleKind::FallenTree,
            _ => ObstacleKind::Balloon,
        }
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Left edge; strictly decreases each tick while the run is live
    pub x: f32,
    /// Bottom edge (balloons float above the ground line)
    pub bottom: f32,
    pub size: Vec2,
    /// Individual scroll speed (px/s), jittered around the global speed
    pub speed: f32,
    /// Palette variant index for drawing
    pub variant: u8,
    /// Set once the score for passing has been awarded
    pub passed: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_bottom_left(Vec2::new(self.x, self.bottom), self.size)
    }

    /// Fully off-screen to the left
    pub fn offscreen(&self) -> bool {
        self.x + self.size.x < 0.0
    }
}

/// A shot fired by the cat, travelling left-to-right
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
}

impl Projectile {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT))
    }

    pub fn offscreen(&self) -> bool {
        self.pos.x - PROJECTILE_WIDTH / 2.0 > SCREEN_WIDTH
    }
}

/// A transient visual particle (dust, debris)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 4],
    pub size: f32,
    /// Remaining life in ticks
    pub ttl: u32,
    /// Initial life, kept for alpha fade
    pub lifetime: u32,
}

/// Floating score text ("+2 BONUS!", "COMBO x3!")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePopup {
    pub text: String,
    pub pos: Vec2,
    /// Remaining life in ticks
    pub ttl: u32,
}

/// Popup lifetime in ticks (one second)
pub const POPUP_TTL: u32 = 60;

/// Things that happened during a tick that the outside world may react to
/// (sound effects, HUD flashes). Purely informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Scored,
    BonusScored,
    ShotAwarded,
    Fired,
    ObstacleShot,
    Died,
    Restarted,
}

/// Complete game state (deterministic, advanced only by `tick`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; every random draw of the run comes from here
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Score for the current run
    pub score: u32,
    /// Consecutive balloons passed
    pub combo: u32,
    /// Current global scroll speed (px/s), rises with score
    pub scroll_speed: f32,
    /// Ticks until the next obstacle spawns
    pub spawn_timer: u32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    #[serde(skip)]
    pub popups: Vec<ScorePopup>,
    /// Events emitted since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state on the splash screen
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn_timer = tuning.spawn_interval_ticks(0, &mut rng);
        Self {
            seed,
            rng,
            phase: GamePhase::Splash,
            time_ticks: 0,
            score: 0,
            combo: 0,
            scroll_speed: tuning.base_scroll_speed,
            spawn_timer,
            player: Player::default(),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            popups: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a burst of particles with properties drawn from the given ranges
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_particles(
        &mut self,
        origin: Vec2,
        count: usize,
        color_lo: [f32; 3],
        color_hi: [f32; 3],
        vel_x: (f32, f32),
        vel_y: (f32, f32),
        size: (f32, f32),
        ttl: (u32, u32),
    ) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                return;
            }
            let color = [
                self.rng.random_range(color_lo[0]..=color_hi[0]),
                self.rng.random_range(color_lo[1]..=color_hi[1]),
                self.rng.random_range(color_lo[2]..=color_hi[2]),
                1.0,
            ];
            let lifetime = self.rng.random_range(ttl.0..=ttl.1);
            let particle = Particle {
                pos: origin,
                vel: Vec2::new(
                    self.rng.random_range(vel_x.0..=vel_x.1),
                    self.rng.random_range(vel_y.0..=vel_y.1),
                ),
                color,
                size: self.rng.random_range(size.0..=size.1),
                ttl: lifetime,
                lifetime,
            };
            self.particles.push(particle);
        }
    }

    /// Dust kicked up at the cat's feet on takeoff
    pub fn spawn_jump_dust(&mut self) {
        let feet = Vec2::new(PLAYER_X + PLAYER_WIDTH / 2.0, self.player.y);
        self.spawn_particles(
            feet,
            15,
            [0.78, 0.78, 0.70],
            [0.90, 0.90, 0.86],
            (-120.0, 120.0),
            (-180.0, -60.0),
            (2.0, 5.0),
            (20, 40),
        );
    }

    /// Debris burst on a fatal collision or a shot obstacle
    pub fn spawn_impact_burst(&mut self, origin: Vec2) {
        self.spawn_particles(
            origin,
            30,
            [0.78, 0.20, 0.20],
            [1.0, 0.60, 0.40],
            (-180.0, 180.0),
            (-300.0, 60.0),
            (3.0, 7.0),
            (30, 60),
        );
    }

    pub fn push_popup(&mut self, text: String, pos: Vec2) {
        self.popups.push(ScorePopup {
            text,
            pos,
            ttl: POPUP_TTL,
        });
    }
}
