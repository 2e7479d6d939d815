//! Ledgefall - 2.5D platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (swept collision, patrol AI, projectiles, player rules)
//! - `settings`: Configuration record supplied once at initialization
//! - `runner`: Fixed-timestep frame driver for a render/input shell
//! - `error`: Construction failures

pub mod error;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use runner::Simulation;
pub use settings::SimSettings;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default overlap tolerance so edge-touching boxes don't register
    pub const OVERLAP_EPSILON: f32 = 0.01;
    /// Below this swept delta the crossing fraction falls back to 0
    pub const SWEEP_DELTA_EPSILON: f32 = 1e-6;
    /// Band around an obstacle face within which landing/bumping is accepted
    pub const OBSTACLE_CONTACT_TOLERANCE: f32 = 0.1;
    /// A bottom edge this close to a surface top counts as resting on it
    pub const REST_TOLERANCE: f32 = 0.001;

    /// Horizontal axis magnitude below which facing is left unchanged
    pub const AXIS_DEADZONE: f32 = 0.01;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Sign of an input axis, or `None` inside the deadzone
#[inline]
pub fn axis_sign(axis: f32) -> Option<f32> {
    if axis.abs() > consts::AXIS_DEADZONE {
        Some(axis.signum())
    } else {
        None
    }
}
