//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the game state
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, aabb_overlap};
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Particle, Player, PlayerPose,
    Projectile, ScorePopup,
};
pub use tick::{TickInput, tick};
