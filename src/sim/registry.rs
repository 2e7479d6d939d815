//! Entity storage and lifecycle
//!
//! Records are plain data kept in spawn order. Nothing is ever removed
//! mid-run: dead enemies, collected pickups and spent projectiles are
//! flagged and skipped, so indices and iteration order stay stable until the
//! next restart rebuilds the lists.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, Fireball, HealingFireball, Obstacle};
use crate::settings::{CollectibleSpawn, EnemySpawn, ObstacleSpawn, SimSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub obstacles: Vec<Obstacle>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<HealingFireball>,
    pub projectiles: Vec<Fireball>,
    /// Next entity ID
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            projectiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Build the starting entity lists from a layout
    pub fn from_settings(settings: &SimSettings) -> Self {
        let mut registry = Self::new();
        for spawn in &settings.obstacles {
            registry.spawn_obstacle(spawn);
        }
        for spawn in &settings.enemies {
            registry.spawn_enemy(spawn);
        }
        for spawn in &settings.collectibles {
            registry.spawn_collectible(spawn);
        }
        registry
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_obstacle(&mut self, spawn: &ObstacleSpawn) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            position: spawn.position,
            size: spawn.size,
            kind: spawn.kind,
            spin: 0.0,
        });
        id
    }

    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            position: spawn.position,
            size: spawn.size,
            speed: spawn.speed,
            patrol_start: spawn.patrol_start,
            patrol_end: spawn.patrol_end,
            moving_right: spawn.moving_right,
            alive: true,
            spin: 0.0,
        });
        id
    }

    pub fn spawn_collectible(&mut self, spawn: &CollectibleSpawn) -> u32 {
        let id = self.next_entity_id();
        self.collectibles.push(HealingFireball {
            id,
            position: spawn.position,
            size: spawn.size,
            heal_amount: spawn.heal_amount,
            collected: false,
            spin: 0.0,
        });
        id
    }

    pub fn spawn_projectile(&mut self, position: Vec3, velocity: Vec3, size: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.projectiles.push(Fireball {
            id,
            position,
            velocity,
            size,
            active: true,
        });
        id
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    pub fn active_projectiles(&self) -> impl Iterator<Item = &Fireball> {
        self.projectiles.iter().filter(|p| p.active)
    }

    pub fn uncollected(&self) -> impl Iterator<Item = &HealingFireball> {
        self.collectibles.iter().filter(|c| !c.collected)
    }
}
