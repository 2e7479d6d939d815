//! World state and entity records
//!
//! `GameState` is the single owned snapshot the renderer reads every frame.
//! Entities are plain data; behavior lives in the sibling modules.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::player::Player;
use super::registry::EntityRegistry;
use crate::error::ConfigError;
use crate::normalize_angle;
use crate::settings::{ObstacleKind, PlatformSpawn, SimSettings};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Reached a platform edge
    Won,
    /// Out of lives or touched a spike
    Lost,
}

impl GamePhase {
    /// Won and Lost are terminal until a restart
    pub fn is_over(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// What the player is standing on or bumped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Platform,
    Obstacle { id: u32 },
}

/// Why a run ended in a loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    OutOfLives,
    Spike { obstacle_id: u32 },
}

/// Things that happened during a step, drained by the shell for audio/UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Landed { surface: Surface },
    BumpedHead { surface: Surface },
    Fired { projectile_id: u32 },
    EnemyKilled { enemy_id: u32, projectile_id: u32 },
    Damaged { amount: u32, hp: u32 },
    Healed { collectible_id: u32, hp: u32 },
    Respawned { lives: u32 },
    Won,
    Lost { cause: LossCause },
    Restarted,
}

/// The static ground slab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub center: Vec3,
    /// Full size
    pub size: Vec3,
}

impl Platform {
    pub fn from_spawn(spawn: &PlatformSpawn) -> Self {
        Self {
            center: spawn.center,
            size: spawn.size,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.center, self.size)
    }

    #[inline]
    pub fn top_y(&self) -> f32 {
        self.center.y + self.size.y * 0.5
    }

    #[inline]
    pub fn left_x(&self) -> f32 {
        self.center.x - self.size.x * 0.5
    }

    #[inline]
    pub fn right_x(&self) -> f32 {
        self.center.x + self.size.x * 0.5
    }
}

/// A static block: solid, lethal, or a spike
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub position: Vec3,
    pub size: Vec3,
    pub kind: ObstacleKind,
    /// Cosmetic rotation phase (radians)
    pub spin: f32,
}

impl Obstacle {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    /// Spikes are always instakill
    #[inline]
    pub fn is_instakill(&self) -> bool {
        matches!(self.kind, ObstacleKind::Instakill | ObstacleKind::Spike)
    }

    #[inline]
    pub fn is_spike(&self) -> bool {
        self.kind == ObstacleKind::Spike
    }

    /// Everything except spikes can be landed on and blocks walking
    #[inline]
    pub fn is_standable(&self) -> bool {
        !self.is_spike()
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub position: Vec3,
    pub size: Vec3,
    pub speed: f32,
    pub patrol_start: f32,
    pub patrol_end: f32,
    pub moving_right: bool,
    /// False is terminal; dead enemies stay in the registry
    pub alive: bool,
    /// Cosmetic rotation phase (radians)
    pub spin: f32,
}

impl Enemy {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    #[inline]
    pub fn direction(&self) -> f32 {
        if self.moving_right { 1.0 } else { -1.0 }
    }
}

/// Healing pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealingFireball {
    pub id: u32,
    pub position: Vec3,
    pub size: Vec3,
    pub heal_amount: u32,
    /// True is terminal
    pub collected: bool,
    /// Cosmetic rotation phase (radians)
    pub spin: f32,
}

impl HealingFireball {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }
}

/// Player-fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fireball {
    pub id: u32,
    pub position: Vec3,
    /// Constant, set at spawn
    pub velocity: Vec3,
    pub size: Vec3,
    /// False is terminal
    pub active: bool,
}

impl Fireball {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }
}

/// Complete world snapshot (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Layout and tuning this world was built from (reused by restart)
    pub settings: SimSettings,
    /// Simulated seconds since the last (re)start
    pub elapsed: f32,
    /// Fixed ticks since the last (re)start
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub platform: Platform,
    pub registry: EntityRegistry,
    /// Events since the shell last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Validate settings and build the starting world
    pub fn new(settings: SimSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let mut state = Self {
            player: Player::new(&settings.player),
            platform: Platform::from_spawn(&settings.platform),
            registry: EntityRegistry::new(),
            settings,
            elapsed: 0.0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
        };
        state.initialize_from_config();
        Ok(state)
    }

    /// Rebuild every entity list and the player from the stored settings
    ///
    /// Used both at startup and by restart, so the two can never disagree.
    pub fn initialize_from_config(&mut self) {
        self.player = Player::new(&self.settings.player);
        self.platform = Platform::from_spawn(&self.settings.platform);
        self.registry = EntityRegistry::from_settings(&self.settings);
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.events.clear();

        log::debug!(
            "World initialized: {} obstacles, {} enemies, {} collectibles",
            self.registry.obstacles.len(),
            self.registry.enemies.len(),
            self.registry.collectibles.len()
        );
    }

    /// Check a world built outside `new`, such as a resumed snapshot
    ///
    /// Settings must be valid, the player must agree with them, and the
    /// phase must agree with the remaining lives.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings.validate()?;

        let player = &self.player;
        let cfg = &self.settings.player;
        let reject = |reason: String| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidSnapshot { reason })
        };

        if player.max_hp != cfg.max_hp || player.max_lives != cfg.max_lives {
            return reject(format!(
                "player capacity {}/{} differs from settings {}/{}",
                player.max_hp, player.max_lives, cfg.max_hp, cfg.max_lives
            ));
        }
        if player.hp > player.max_hp {
            return reject(format!("hp {} exceeds max {}", player.hp, player.max_hp));
        }
        if player.lives > player.max_lives {
            return reject(format!("lives {} exceed max {}", player.lives, player.max_lives));
        }
        if !(player.position.is_finite() && player.velocity.is_finite()) {
            return reject("player position or velocity is not finite".to_string());
        }
        if !(player.invincibility.is_finite() && player.invincibility >= 0.0) {
            return reject(format!("invincibility {} is negative", player.invincibility));
        }
        if player.lives == 0 && self.phase != GamePhase::Lost {
            return reject(format!("no lives left but phase is {:?}", self.phase));
        }
        if player.hp == 0 && self.phase != GamePhase::Lost {
            return reject(format!("hp is 0 but phase is {:?}", self.phase));
        }
        Ok(())
    }

    #[inline]
    pub fn won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    #[inline]
    pub fn lost(&self) -> bool {
        self.phase == GamePhase::Lost
    }

    /// Enter a terminal phase; no-op if the run is already over
    pub(crate) fn finish(&mut self, phase: GamePhase, event: GameEvent) {
        if self.phase.is_over() || !phase.is_over() {
            return;
        }
        self.phase = phase;
        self.events.push(event);
        log::info!("Run ended: {:?} after {:.2}s", phase, self.elapsed);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance cosmetic rotation on everything that spins
    pub(crate) fn advance_spin(&mut self, dt: f32) {
        let delta = self.settings.rules.spin_rate * dt;
        if delta == 0.0 {
            return;
        }
        for obstacle in &mut self.registry.obstacles {
            obstacle.spin = normalize_angle(obstacle.spin + delta);
        }
        for enemy in self.registry.enemies.iter_mut().filter(|e| e.alive) {
            enemy.spin = normalize_angle(enemy.spin + delta);
        }
        for pickup in self.registry.collectibles.iter_mut().filter(|c| !c.collected) {
            pickup.spin = normalize_angle(pickup.spin + delta);
        }
    }
}
