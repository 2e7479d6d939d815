//! Player-fired projectiles
//!
//! Fireballs fly in a straight line at constant velocity, retire when they
//! leave the world bounds, and kill the first live enemy they overlap.

use glam::Vec3;

use super::aabb::overlaps;
use super::player::Player;
use super::registry::EntityRegistry;
use super::state::{Enemy, Fireball};
use crate::consts::OVERLAP_EPSILON;
use crate::settings::ProjectileSettings;

/// A projectile/enemy pair resolved this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile_id: u32,
    pub enemy_id: u32,
}

/// Spawn a fireball just in front of the player; returns its id
pub fn fire(registry: &mut EntityRegistry, player: &Player, settings: &ProjectileSettings) -> u32 {
    let facing = player.facing_dir();
    let offset = player.half_extents.x + settings.radius;
    registry.spawn_projectile(
        player.position + facing * offset,
        facing * settings.speed,
        Vec3::splat(settings.radius * 2.0),
    )
}

/// Move active projectiles and retire those past `world_bound` on X or Z
pub fn advance(projectiles: &mut [Fireball], world_bound: f32, dt: f32) {
    for shot in projectiles.iter_mut().filter(|p| p.active) {
        shot.position += shot.velocity * dt;
        if shot.position.x.abs() > world_bound || shot.position.z.abs() > world_bound {
            shot.active = false;
        }
    }
}

/// Test each active projectile against live enemies; first match wins
///
/// Both sides of a hit are flagged in the same pass, so one projectile kills
/// at most one enemy and a dead enemy can't absorb a second shot.
pub fn resolve_hits(projectiles: &mut [Fireball], enemies: &mut [Enemy]) -> Vec<Hit> {
    let mut hits = Vec::new();
    for shot in projectiles.iter_mut().filter(|p| p.active) {
        let bounds = shot.aabb();
        if let Some(enemy) = enemies
            .iter_mut()
            .filter(|e| e.alive)
            .find(|e| overlaps(&bounds, &e.aabb(), OVERLAP_EPSILON))
        {
            enemy.alive = false;
            shot.active = false;
            hits.push(Hit {
                projectile_id: shot.id,
                enemy_id: enemy.id,
            });
        }
    }
    hits
}

/// Advance then hit-test, as one simulator step
pub fn update_projectiles(registry: &mut EntityRegistry, world_bound: f32, dt: f32) -> Vec<Hit> {
    advance(&mut registry.projectiles, world_bound, dt);
    resolve_hits(&mut registry.projectiles, &mut registry.enemies)
}
