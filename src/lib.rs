//! Cat Dash - a single-lane cat runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, score)
//! - `renderer`: wgpu rendering pipeline (flat-color shapes + text atlas)
//! - `background`: Procedural parallax scenery
//! - `tuning`: Data-driven game balance
//! - `highscore`: Single-integer high score persistence
//! - `audio`: Optional sound effects behind a mute toggle

pub mod app;
pub mod audio;
pub mod background;
pub mod game_loop;
pub mod highscore;
pub mod input;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use highscore::HighScore;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Y coordinate of the ground line (screen coords, y grows downward)
    pub const GROUND_LEVEL: f32 = SCREEN_HEIGHT - 100.0;

    /// Player lane (left edge of the collision box)
    pub const PLAYER_X: f32 = 100.0;
    /// Collision box while running/jumping
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 88.0;
    /// Collision box height while sliding
    pub const PLAYER_SLIDE_HEIGHT: f32 = 44.0;

    /// Projectile dimensions and speed (px, px/s)
    pub const PROJECTILE_WIDTH: f32 = 18.0;
    pub const PROJECTILE_HEIGHT: f32 = 6.0;
    pub const PROJECTILE_SPEED: f32 = 900.0;

    /// Hard cap on live particles
    pub const MAX_PARTICLES: usize = 256;
}
