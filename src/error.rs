//! Construction errors
//!
//! The simulation step itself cannot fail; only building a world from a bad
//! configuration can.

use thiserror::Error;

/// Rejected configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An entity was given a zero, negative, or non-finite size
    #[error("{entity} has invalid size ({x}, {y}, {z}); every extent must be positive")]
    InvalidSize {
        /// Which record was rejected (e.g. "player", "enemy #2")
        entity: String,
        x: f32,
        y: f32,
        z: f32,
    },

    /// A scalar setting is out of its allowed range
    #[error("{field} = {value} is out of range: {reason}")]
    OutOfRange {
        /// Dotted settings path (e.g. "physics.gravity")
        field: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// Patrol bounds must describe a non-empty interval
    #[error("enemy #{index} has patrol range [{start}, {end}] which is empty or inverted")]
    InvalidPatrolRange { index: usize, start: f32, end: f32 },

    /// A position contains NaN or infinity
    #[error("{entity} has a non-finite position")]
    NonFinitePosition { entity: String },

    /// Max hp / max lives must allow at least one hit
    #[error("{field} must be at least 1")]
    ZeroCapacity { field: &'static str },

    /// A probability outside [0, 1] or NaN
    #[error("{field} = {value} is not a probability in [0, 1]")]
    InvalidChance { field: &'static str, value: f64 },

    /// A resumed world breaks a player or phase invariant
    #[error("snapshot rejected: {reason}")]
    InvalidSnapshot { reason: String },

    /// Settings document could not be parsed
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}
