//! Player body and health state machine
//!
//! States: Alive, Invincible (timer > 0, damage ignored), and the
//! instantaneous Respawning transition. Won/Lost are tracked on
//! [`GameState`](super::GameState) since they stop the whole world.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::VerticalResolution;
use crate::settings::PlayerSettings;

/// Result of a damage request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible; nothing changed
    Ignored,
    /// Lost hp but still standing
    Hurt { hp: u32 },
    /// Lost a life and was moved back to the start
    Respawned { lives: u32 },
    /// Lost the last life
    OutOfLives,
}

/// Sub-state of a living player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Alive,
    Invincible,
}

/// The single dynamic actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub half_extents: Vec3,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub grounded: bool,
    pub hp: u32,
    pub max_hp: u32,
    pub lives: u32,
    pub max_lives: u32,
    /// Seconds of invincibility left
    pub invincibility: f32,
    /// Landed or bumped during the last fixed step
    pub collided_this_frame: bool,
}

impl Player {
    pub fn new(settings: &PlayerSettings) -> Self {
        Self {
            position: settings.start_position,
            velocity: Vec3::ZERO,
            half_extents: settings.size * 0.5,
            facing: 1.0,
            grounded: false,
            hp: settings.max_hp,
            max_hp: settings.max_hp,
            lives: settings.max_lives,
            max_lives: settings.max_lives,
            invincibility: 0.0,
            collided_this_frame: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents * 2.0)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.half_extents.y
    }

    #[inline]
    pub fn facing_dir(&self) -> Vec3 {
        Vec3::new(self.facing, 0.0, 0.0)
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    pub fn status(&self) -> PlayerStatus {
        if self.is_invincible() {
            PlayerStatus::Invincible
        } else {
            PlayerStatus::Alive
        }
    }

    /// Commit the collision resolver's answer for this step
    pub fn apply_resolution(&mut self, resolution: &VerticalResolution) {
        self.position = resolution.position;
        self.velocity = resolution.velocity;
        self.grounded = resolution.grounded;
        self.collided_this_frame = resolution.contact.is_collision();
    }

    /// Apply damage, respawning or running out of lives when hp hits zero
    pub fn take_damage(&mut self, amount: u32, settings: &PlayerSettings) -> DamageOutcome {
        if self.is_invincible() {
            return DamageOutcome::Ignored;
        }

        self.hp = self.hp.saturating_sub(amount);
        self.invincibility = settings.hit_invincibility;

        if self.hp > 0 {
            return DamageOutcome::Hurt { hp: self.hp };
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            log::debug!("Player out of lives");
            return DamageOutcome::OutOfLives;
        }

        self.respawn(settings);
        DamageOutcome::Respawned { lives: self.lives }
    }

    /// Restore full hp at the start position with the longer grace period
    pub fn respawn(&mut self, settings: &PlayerSettings) {
        self.hp = self.max_hp;
        self.position = settings.start_position;
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.invincibility = settings.respawn_invincibility;
        log::debug!("Player respawned with {} lives left", self.lives);
    }

    /// Heal up to max hp; returns the hp actually restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Count the invincibility timer down, clearing it at zero
    pub fn tick_invincibility(&mut self, dt: f32) {
        if self.invincibility > 0.0 {
            self.invincibility -= dt;
            if self.invincibility <= 0.0 {
                self.invincibility = 0.0;
            }
        }
    }
}
