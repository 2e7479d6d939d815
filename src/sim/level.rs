//! Seeded level layout generation
//!
//! Produces obstacle/enemy/pickup spawn lists on top of the platform. The
//! platform's width is cut into equal slots; the start area and the win
//! margins are left clear, the remaining slots are shuffled with a seeded
//! PCG, and each entity takes one slot. Same seed, same layout.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::{
    CollectibleSpawn, EnemySpawn, ObstacleKind, ObstacleSpawn, PlatformSpawn, SimSettings,
    check_non_negative,
};

/// Width of one placement slot along X
const SLOT_WIDTH: f32 = 1.5;
const ENEMY_SIZE: f32 = 0.8;
const PICKUP_SIZE: f32 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    pub obstacle_count: usize,
    pub enemy_count: usize,
    pub collectible_count: usize,
    /// Chance an obstacle is a spike
    pub spike_chance: f64,
    /// Chance a non-spike obstacle is instakill
    pub instakill_chance: f64,
    /// Keep this much X clear on either side of the player's start
    pub start_clearance: f32,
    /// Keep this much X clear inside each platform edge
    pub edge_clearance: f32,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            obstacle_count: 4,
            enemy_count: 2,
            collectible_count: 2,
            spike_chance: 0.2,
            instakill_chance: 0.25,
            start_clearance: 1.5,
            edge_clearance: 1.5,
        }
    }
}

impl LevelParams {
    /// Reject chances outside [0, 1] and negative clearances
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_chance("level.spike_chance", self.spike_chance)?;
        check_chance("level.instakill_chance", self.instakill_chance)?;
        check_non_negative("level.start_clearance", self.start_clearance)?;
        check_non_negative("level.edge_clearance", self.edge_clearance)?;
        Ok(())
    }
}

fn check_chance(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidChance { field, value })
    }
}

/// Generated spawn lists, sorted left to right
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelLayout {
    pub seed: u64,
    pub obstacles: Vec<ObstacleSpawn>,
    pub enemies: Vec<EnemySpawn>,
    pub collectibles: Vec<CollectibleSpawn>,
}

impl LevelLayout {
    /// Replace the layout lists in `settings` with this one
    pub fn apply_to(self, settings: &mut SimSettings) {
        settings.obstacles = self.obstacles;
        settings.enemies = self.enemies;
        settings.collectibles = self.collectibles;
    }
}

/// Slot centers usable for placement
fn free_slots(platform: &PlatformSpawn, start_x: f32, params: &LevelParams) -> Vec<f32> {
    let left = platform.center.x - platform.size.x * 0.5 + params.edge_clearance;
    let right = platform.center.x + platform.size.x * 0.5 - params.edge_clearance;
    if right - left < SLOT_WIDTH {
        return Vec::new();
    }
    let count = ((right - left) / SLOT_WIDTH).floor() as usize;
    (0..count)
        .map(|i| left + SLOT_WIDTH * (i as f32 + 0.5))
        .filter(|x| (x - start_x).abs() >= params.start_clearance + SLOT_WIDTH * 0.5)
        .collect()
}

/// Generate a layout for `platform` from `seed`
///
/// Counts are truncated to the number of free slots; obstacles are placed
/// first, then enemies, then pickups. Fails only on invalid `params`.
pub fn generate_layout(
    seed: u64,
    platform: &PlatformSpawn,
    start_x: f32,
    params: &LevelParams,
) -> Result<LevelLayout, ConfigError> {
    params.validate()?;
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut slots = free_slots(platform, start_x, params);
    slots.shuffle(&mut rng);
    let mut slots = slots.into_iter();

    let top = platform.center.y + platform.size.y * 0.5;
    let z = platform.center.z;
    let mut layout = LevelLayout {
        seed,
        ..Default::default()
    };

    for x in slots.by_ref().take(params.obstacle_count) {
        let kind = if rng.random_bool(params.spike_chance) {
            ObstacleKind::Spike
        } else if rng.random_bool(params.instakill_chance) {
            ObstacleKind::Instakill
        } else {
            ObstacleKind::Solid
        };
        // Spikes and lethal blocks stay low enough to jump over
        let height = match kind {
            ObstacleKind::Spike | ObstacleKind::Instakill => 0.5,
            ObstacleKind::Solid => rng.random_range(0.5..1.5f32),
        };
        layout.obstacles.push(ObstacleSpawn {
            position: Vec3::new(x, top + height * 0.5, z),
            size: Vec3::new(1.0, height, 1.0),
            kind,
        });
    }

    for x in slots.by_ref().take(params.enemy_count) {
        let half_range = (SLOT_WIDTH - ENEMY_SIZE) * 0.5;
        layout.enemies.push(EnemySpawn {
            position: Vec3::new(x, top + ENEMY_SIZE * 0.5, z),
            size: Vec3::splat(ENEMY_SIZE),
            speed: rng.random_range(1.0..2.5f32),
            patrol_start: x - half_range,
            patrol_end: x + half_range,
            moving_right: rng.random_bool(0.5),
        });
    }

    for x in slots.by_ref().take(params.collectible_count) {
        layout.collectibles.push(CollectibleSpawn {
            position: Vec3::new(x, top + PICKUP_SIZE, z),
            size: Vec3::splat(PICKUP_SIZE),
            heal_amount: 1,
        });
    }

    layout
        .obstacles
        .sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
    layout
        .enemies
        .sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
    layout
        .collectibles
        .sort_by(|a, b| a.position.x.total_cmp(&b.position.x));

    log::info!(
        "Level seed {}: {} obstacles, {} enemies, {} pickups",
        seed,
        layout.obstacles.len(),
        layout.enemies.len(),
        layout.collectibles.len()
    );

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64) -> LevelLayout {
        generate_layout(seed, &PlatformSpawn::default(), 0.0, &LevelParams::default()).unwrap()
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = serde_json::to_string(&generate(42)).unwrap();
        let b = serde_json::to_string(&generate(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_respects_counts_and_clearances() {
        let params = LevelParams::default();
        for seed in 0..50 {
            let layout = generate(seed);
            assert_eq!(layout.obstacles.len(), params.obstacle_count);
            assert_eq!(layout.enemies.len(), params.enemy_count);
            assert_eq!(layout.collectibles.len(), params.collectible_count);

            for obstacle in &layout.obstacles {
                assert!(obstacle.position.x.abs() >= params.start_clearance);
                assert!(obstacle.position.x.abs() <= 10.0 - params.edge_clearance);
                // Resting on the platform top
                let bottom = obstacle.position.y - obstacle.size.y * 0.5;
                assert!((bottom + 0.5).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_generated_layout_is_valid() {
        for seed in 0..20 {
            let mut settings = SimSettings::full_game();
            generate(seed).apply_to(&mut settings);
            assert!(settings.validate().is_ok(), "seed {seed} produced bad layout");
        }
    }

    #[test]
    fn test_counts_truncate_to_free_slots() {
        let params = LevelParams {
            obstacle_count: 100,
            enemy_count: 100,
            collectible_count: 100,
            ..Default::default()
        };
        let layout = generate_layout(7, &PlatformSpawn::default(), 0.0, &params).unwrap();
        let slots = free_slots(&PlatformSpawn::default(), 0.0, &params).len();
        assert_eq!(layout.obstacles.len(), slots);
        assert!(layout.enemies.is_empty());
        assert!(layout.collectibles.is_empty());
    }

    #[test]
    fn test_bad_params_are_rejected() {
        let platform = PlatformSpawn::default();
        let params = LevelParams {
            spike_chance: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            generate_layout(1, &platform, 0.0, &params),
            Err(ConfigError::InvalidChance {
                field: "level.spike_chance",
                ..
            })
        ));

        let params = LevelParams {
            instakill_chance: f64::NAN,
            ..Default::default()
        };
        assert!(generate_layout(1, &platform, 0.0, &params).is_err());

        let params = LevelParams {
            edge_clearance: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            generate_layout(1, &platform, 0.0, &params),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_no_two_entities_share_a_slot() {
        let layout = generate(3);
        let mut xs: Vec<f32> = layout
            .obstacles
            .iter()
            .map(|o| o.position.x)
            .chain(layout.enemies.iter().map(|e| e.position.x))
            .chain(layout.collectibles.iter().map(|c| c.position.x))
            .collect();
        xs.sort_by(f32::total_cmp);
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= SLOT_WIDTH - 1e-4);
        }
    }
}
