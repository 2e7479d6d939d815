//! Simulation settings
//!
//! Everything the core needs is supplied once, up front, as this record.
//! The core never reads files; a shell may build the record from JSON via
//! [`SimSettings::from_json`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Gravity, speeds, and world limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Vertical acceleration (units/s², negative is down)
    pub gravity: f32,
    /// Most negative vertical velocity allowed
    pub terminal_velocity: f32,
    /// Upward velocity applied on jump
    pub jump_velocity: f32,
    /// Horizontal (and depth) walking speed
    pub move_speed: f32,
    /// Falling below this Y costs a life
    pub fall_floor_y: f32,
    /// Projectiles beyond ±this on X or Z are retired
    pub world_bound: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            terminal_velocity: -50.0,
            jump_velocity: 8.0,
            move_speed: 5.0,
            fall_floor_y: -10.0,
            world_bound: 30.0,
        }
    }
}

/// Player body and health tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Full size of the player box
    pub size: Vec3,
    pub start_position: Vec3,
    pub max_hp: u32,
    pub max_lives: u32,
    /// Invincibility after a normal hit (seconds)
    pub hit_invincibility: f32,
    /// Longer grace period after a respawn (seconds)
    pub respawn_invincibility: f32,
    /// Damage dealt by touching a live enemy
    pub contact_damage: u32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            size: Vec3::ONE,
            start_position: Vec3::new(0.0, 2.0, 0.0),
            max_hp: 3,
            max_lives: 3,
            hit_invincibility: 1.0,
            respawn_invincibility: 2.0,
            contact_damage: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSettings {
    pub speed: f32,
    pub radius: f32,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            speed: 10.0,
            radius: 0.25,
        }
    }
}

/// Win condition and hazard tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Reaching either platform edge wins
    pub win_at_edges: bool,
    /// How close to an edge counts as reaching it
    pub win_edge_margin: f32,
    /// Inflation applied to the player box for obstacle hazard contact
    pub hazard_skin: f32,
    /// Cosmetic rotation rate for enemies/obstacles/pickups (rad/s)
    pub spin_rate: f32,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            win_at_edges: false,
            win_edge_margin: 1.0,
            hazard_skin: 0.05,
            spin_rate: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSpawn {
    pub center: Vec3,
    /// Full size
    pub size: Vec3,
}

impl Default for PlatformSpawn {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, -1.0, 0.0),
            size: Vec3::new(20.0, 1.0, 4.0),
        }
    }
}

/// How an obstacle treats the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Standable, blocks movement
    #[default]
    Solid,
    /// Standable and blocking, but touching it costs the current life
    Instakill,
    /// Never standable; touching it ends the run
    Spike,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub position: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub kind: ObstacleKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub position: Vec3,
    pub size: Vec3,
    pub speed: f32,
    pub patrol_start: f32,
    pub patrol_end: f32,
    #[serde(default = "default_true")]
    pub moving_right: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleSpawn {
    pub position: Vec3,
    pub size: Vec3,
    pub heal_amount: u32,
}

fn default_true() -> bool {
    true
}

/// Complete configuration record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub physics: PhysicsSettings,
    pub player: PlayerSettings,
    pub projectile: ProjectileSettings,
    pub rules: RuleSettings,
    pub platform: PlatformSpawn,
    pub obstacles: Vec<ObstacleSpawn>,
    pub enemies: Vec<EnemySpawn>,
    pub collectibles: Vec<CollectibleSpawn>,
}

impl SimSettings {
    /// Full game layout: hazards, patrolling enemies, healing pickups, edge win
    pub fn full_game() -> Self {
        let mut settings = Self::default();
        settings.rules.win_at_edges = true;

        // Platform top sits at y = -0.5
        settings.obstacles = vec![
            ObstacleSpawn {
                position: Vec3::new(-4.0, 0.0, 0.0),
                size: Vec3::ONE,
                kind: ObstacleKind::Solid,
            },
            ObstacleSpawn {
                position: Vec3::new(3.0, 0.25, 0.0),
                size: Vec3::new(1.0, 1.5, 1.0),
                kind: ObstacleKind::Solid,
            },
            ObstacleSpawn {
                position: Vec3::new(6.0, -0.25, 0.0),
                size: Vec3::new(1.0, 0.5, 1.0),
                kind: ObstacleKind::Instakill,
            },
            ObstacleSpawn {
                position: Vec3::new(-7.0, -0.25, 0.0),
                size: Vec3::new(1.0, 0.5, 1.0),
                kind: ObstacleKind::Spike,
            },
        ];
        settings.enemies = vec![
            EnemySpawn {
                position: Vec3::new(-2.0, 0.0, 0.0),
                size: Vec3::splat(0.8),
                speed: 1.5,
                patrol_start: -3.0,
                patrol_end: -1.2,
                moving_right: true,
            },
            EnemySpawn {
                position: Vec3::new(4.5, 0.0, 0.0),
                size: Vec3::splat(0.8),
                speed: 2.0,
                patrol_start: 4.0,
                patrol_end: 5.5,
                moving_right: false,
            },
        ];
        settings.collectibles = vec![
            CollectibleSpawn {
                position: Vec3::new(1.5, 0.0, 0.0),
                size: Vec3::splat(0.5),
                heal_amount: 1,
            },
            CollectibleSpawn {
                position: Vec3::new(-5.5, 0.0, 0.0),
                size: Vec3::splat(0.5),
                heal_amount: 2,
            },
        ];
        settings
    }

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations that would produce undefined physics
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        check_finite("physics.gravity", physics.gravity)?;
        if physics.gravity >= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "physics.gravity",
                value: physics.gravity,
                reason: "gravity must pull downward (negative)",
            });
        }
        if !physics.terminal_velocity.is_finite() || physics.terminal_velocity >= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "physics.terminal_velocity",
                value: physics.terminal_velocity,
                reason: "terminal velocity must be negative",
            });
        }
        check_positive("physics.jump_velocity", physics.jump_velocity)?;
        check_non_negative("physics.move_speed", physics.move_speed)?;
        check_finite("physics.fall_floor_y", physics.fall_floor_y)?;
        check_positive("physics.world_bound", physics.world_bound)?;

        let player = &self.player;
        check_size("player", player.size)?;
        check_position("player", player.start_position)?;
        if player.max_hp == 0 {
            return Err(ConfigError::ZeroCapacity { field: "player.max_hp" });
        }
        if player.max_lives == 0 {
            return Err(ConfigError::ZeroCapacity { field: "player.max_lives" });
        }
        check_non_negative("player.hit_invincibility", player.hit_invincibility)?;
        check_non_negative("player.respawn_invincibility", player.respawn_invincibility)?;

        check_non_negative("projectile.speed", self.projectile.speed)?;
        check_positive("projectile.radius", self.projectile.radius)?;

        check_non_negative("rules.win_edge_margin", self.rules.win_edge_margin)?;
        check_non_negative("rules.hazard_skin", self.rules.hazard_skin)?;
        check_finite("rules.spin_rate", self.rules.spin_rate)?;

        check_size("platform", self.platform.size)?;
        check_position("platform", self.platform.center)?;

        for (i, obstacle) in self.obstacles.iter().enumerate() {
            check_size(&format!("obstacle #{i}"), obstacle.size)?;
            check_position(&format!("obstacle #{i}"), obstacle.position)?;
        }
        for (i, enemy) in self.enemies.iter().enumerate() {
            check_size(&format!("enemy #{i}"), enemy.size)?;
            check_position(&format!("enemy #{i}"), enemy.position)?;
            check_non_negative("enemies[].speed", enemy.speed)?;
            if !(enemy.patrol_start.is_finite() && enemy.patrol_end.is_finite())
                || enemy.patrol_start >= enemy.patrol_end
            {
                return Err(ConfigError::InvalidPatrolRange {
                    index: i,
                    start: enemy.patrol_start,
                    end: enemy.patrol_end,
                });
            }
        }
        for (i, pickup) in self.collectibles.iter().enumerate() {
            check_size(&format!("collectible #{i}"), pickup.size)?;
            check_position(&format!("collectible #{i}"), pickup.position)?;
        }
        Ok(())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            reason: "must be finite",
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            reason: "must be positive",
        })
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            reason: "must be zero or positive",
        })
    }
}

fn check_size(entity: &str, size: Vec3) -> Result<(), ConfigError> {
    if size.is_finite() && size.cmpgt(Vec3::ZERO).all() {
        Ok(())
    } else {
        Err(ConfigError::InvalidSize {
            entity: entity.to_string(),
            x: size.x,
            y: size.y,
            z: size.z,
        })
    }
}

fn check_position(entity: &str, position: Vec3) -> Result<(), ConfigError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinitePosition {
            entity: entity.to_string(),
        })
    }
}
