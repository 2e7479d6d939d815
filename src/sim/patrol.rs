//! Enemy patrol AI
//!
//! Each live enemy walks back and forth along X between its patrol bounds.
//! A step that would push it into any obstacle is refused and the enemy
//! turns around instead. Enemies never fall, jump, or look at the platform.

use super::aabb::overlaps;
use super::state::{Enemy, Obstacle};
use crate::consts::OVERLAP_EPSILON;

impl Enemy {
    /// Advance one patrol step
    pub fn patrol(&mut self, obstacles: &[Obstacle], dt: f32) {
        if !self.alive {
            return;
        }

        let mut candidate = self.position;
        candidate.x += self.direction() * self.speed * dt;

        let moved = self.aabb().at(candidate);
        if obstacles
            .iter()
            .any(|o| overlaps(&moved, &o.aabb(), OVERLAP_EPSILON))
        {
            self.moving_right = !self.moving_right;
            return;
        }

        self.position = candidate;

        if self.moving_right && self.position.x >= self.patrol_end {
            self.moving_right = false;
        } else if !self.moving_right && self.position.x <= self.patrol_start {
            self.moving_right = true;
        }
    }
}

/// Step every live enemy in registry order
pub fn update_patrols(enemies: &mut [Enemy], obstacles: &[Obstacle], dt: f32) {
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        enemy.patrol(obstacles, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ObstacleKind;
    use glam::Vec3;

    fn enemy(x: f32, moving_right: bool) -> Enemy {
        Enemy {
            id: 1,
            position: Vec3::new(x, 0.0, 0.0),
            size: Vec3::splat(0.8),
            speed: 2.0,
            patrol_start: -2.0,
            patrol_end: 2.0,
            moving_right,
            alive: true,
            spin: 0.0,
        }
    }

    #[test]
    fn test_moves_toward_patrol_direction() {
        let mut e = enemy(0.0, true);
        e.patrol(&[], 0.5);
        assert_eq!(e.position.x, 1.0);
        assert!(e.moving_right);

        let mut e = enemy(0.0, false);
        e.patrol(&[], 0.5);
        assert_eq!(e.position.x, -1.0);
    }

    #[test]
    fn test_reverses_at_patrol_bounds() {
        let mut e = enemy(1.5, true);
        e.patrol(&[], 0.5);
        assert_eq!(e.position.x, 2.5);
        assert!(!e.moving_right);

        e.patrol(&[], 0.5);
        assert_eq!(e.position.x, 1.5);
    }

    #[test]
    fn test_oscillates_within_bounds() {
        let mut e = enemy(0.0, true);
        let step = e.speed / 60.0;
        for _ in 0..2_000 {
            e.patrol(&[], 1.0 / 60.0);
            assert!(e.position.x <= e.patrol_end + step + 1e-4);
            assert!(e.position.x >= e.patrol_start - step - 1e-4);
        }
    }

    #[test]
    fn test_blocked_by_obstacle_turns_without_moving() {
        // Block whose left face is just ahead of the enemy's right face
        let block = Obstacle {
            id: 9,
            position: Vec3::new(1.0, 0.0, 0.0),
            size: Vec3::ONE,
            kind: ObstacleKind::Solid,
            spin: 0.0,
        };
        let mut e = enemy(0.05, true);
        e.patrol(std::slice::from_ref(&block), 0.1);
        assert_eq!(e.position.x, 0.05);
        assert!(!e.moving_right);

        // Next step heads away and succeeds
        e.patrol(std::slice::from_ref(&block), 0.1);
        assert!(e.position.x < 0.05);
    }

    #[test]
    fn test_spikes_block_enemies_too() {
        let spike = Obstacle {
            id: 9,
            position: Vec3::new(-1.0, 0.0, 0.0),
            size: Vec3::ONE,
            kind: ObstacleKind::Spike,
            spin: 0.0,
        };
        let mut e = enemy(-0.05, false);
        e.patrol(&[spike], 0.1);
        assert_eq!(e.position.x, -0.05);
        assert!(e.moving_right);
    }

    #[test]
    fn test_dead_enemies_are_skipped() {
        let mut enemies = vec![enemy(0.0, true), enemy(0.0, true)];
        enemies[1].alive = false;
        update_patrols(&mut enemies, &[], 0.5);
        assert_eq!(enemies[0].position.x, 1.0);
        assert_eq!(enemies[1].position.x, 0.0);
    }
}
