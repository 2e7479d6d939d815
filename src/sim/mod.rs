//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (level generation)
//! - Stable iteration order (registry/spawn order)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod level;
pub mod patrol;
pub mod player;
pub mod projectile;
pub mod registry;
pub mod state;
pub mod tick;

pub use aabb::{Aabb, crossing_fraction, overlaps, swept_crosses_plane};
pub use collision::{Contact, SweepInput, VerticalResolution, resolve_vertical};
pub use level::{LevelLayout, LevelParams, generate_layout};
pub use player::{DamageOutcome, Player, PlayerStatus};
pub use registry::EntityRegistry;
pub use state::{
    Enemy, Fireball, GameEvent, GamePhase, GameState, HealingFireball, LossCause, Obstacle,
    Platform, Surface,
};
pub use tick::{Intent, apply_intents, fixed_step, restart};
