//! Continuous vertical collision against the platform and obstacles
//!
//! The tricky part of the platformer: a fast fall must never tunnel through
//! a thin slab, landing on top must be told apart from hitting a face from
//! below, and a player standing still must not jitter or sink.
//!
//! Everything is resolved against the swept XZ footprint (the union of the
//! player box at "now" and "next"), so horizontal motion within a step can't
//! skip past a surface either.

use glam::Vec3;

use super::aabb::{Aabb, crossing_fraction, overlaps_xz, swept_crosses_plane};
use super::state::{Obstacle, Platform, Surface};
use crate::consts::{OBSTACLE_CONTACT_TOLERANCE, REST_TOLERANCE};

/// A proposed player move for one fixed step
#[derive(Debug, Clone, Copy)]
pub struct SweepInput {
    pub position: Vec3,
    /// Where the player would be with no collision
    pub next: Vec3,
    pub velocity: Vec3,
    pub half_extents: Vec3,
}

/// How the move ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Free move
    None,
    /// Already on a surface and stayed there
    Resting(Surface),
    /// Fell onto a surface this step
    Landed(Surface),
    /// Rose into a surface from below this step
    Ceiling(Surface),
}

impl Contact {
    /// Landing and bumping count as collisions; resting does not
    pub fn is_collision(&self) -> bool {
        matches!(self, Contact::Landed(_) | Contact::Ceiling(_))
    }
}

/// Settled player state after resolution
#[derive(Debug, Clone, Copy)]
pub struct VerticalResolution {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub contact: Contact,
}

impl VerticalResolution {
    fn free(input: &SweepInput) -> Self {
        Self {
            position: input.next,
            velocity: input.velocity,
            grounded: false,
            contact: Contact::None,
        }
    }

    /// Sit the bottom exactly on `plane_y`
    fn on_top(at: Vec3, input: &SweepInput, plane_y: f32, contact: Contact) -> Self {
        Self {
            position: Vec3::new(at.x, plane_y + input.half_extents.y, at.z),
            velocity: Vec3::new(input.velocity.x, 0.0, input.velocity.z),
            grounded: true,
            contact,
        }
    }

    /// Stop upward motion with the center placed at `y`
    fn below(at: Vec3, input: &SweepInput, y: f32, contact: Contact) -> Self {
        Self {
            position: Vec3::new(at.x, y, at.z),
            velocity: Vec3::new(input.velocity.x, 0.0, input.velocity.z),
            grounded: false,
            contact,
        }
    }
}

#[inline]
fn is_resting(bottom_now: f32, plane_y: f32, vel_y: f32) -> bool {
    vel_y <= 0.0 && (bottom_now - plane_y).abs() <= REST_TOLERANCE
}

/// Resolve one vertical move against the platform, then obstacles
///
/// The platform is tested first. Obstacles are only tried when the platform
/// didn't intercept the move, in registry order; the first obstacle that
/// qualifies wins with no distance tie-break. Spikes are never surfaces.
///
/// An obstacle lands the player only when the bottom edge crosses its top
/// from above this step. A head bump needs the top edge to end at or above
/// the underside after starting no more than `OBSTACLE_CONTACT_TOLERANCE`
/// past it.
pub fn resolve_vertical(
    input: &SweepInput,
    platform: &Platform,
    obstacles: &[Obstacle],
) -> VerticalResolution {
    let half_y = input.half_extents.y;
    let bottom_now = input.position.y - half_y;
    let bottom_next = input.next.y - half_y;
    let top_now = input.position.y + half_y;
    let top_next = input.next.y + half_y;
    let vel_y = input.velocity.y;

    let footprint = Aabb::new(input.position, input.half_extents * 2.0).swept_to(input.next);

    // --- Platform: the bottom edge against the top plane, both directions ---
    if overlaps_xz(&footprint, &platform.aabb()) {
        let plane = platform.top_y();

        if is_resting(bottom_now, plane, vel_y) {
            return VerticalResolution::on_top(
                input.next,
                input,
                plane,
                Contact::Resting(Surface::Platform),
            );
        }

        if swept_crosses_plane(bottom_now, bottom_next, plane) {
            let t = crossing_fraction(bottom_now, bottom_next, plane);
            let contact_pos = input.position.lerp(input.next, t);

            return if bottom_now > plane {
                log::trace!("Landed on platform at t={t:.3}");
                VerticalResolution::on_top(
                    contact_pos,
                    input,
                    plane,
                    Contact::Landed(Surface::Platform),
                )
            } else {
                // Rising into the underside: the platform is a single plane,
                // so the box is pushed back until its bottom sits one
                // half-height below it.
                VerticalResolution::below(
                    contact_pos,
                    input,
                    plane - half_y,
                    Contact::Ceiling(Surface::Platform),
                )
            };
        }
    }

    // --- Obstacles as secondary platforms ---
    for obstacle in obstacles.iter().filter(|o| o.is_standable()) {
        let bounds = obstacle.aabb();
        if !overlaps_xz(&footprint, &bounds) {
            continue;
        }
        let surface = Surface::Obstacle { id: obstacle.id };
        let top = bounds.top();
        let underside = bounds.bottom();

        if is_resting(bottom_now, top, vel_y) {
            return VerticalResolution::on_top(input.next, input, top, Contact::Resting(surface));
        }

        // Landing needs a real crossing from above; a bottom already below
        // the top is never stepped up onto it.
        if vel_y <= 0.0 && bottom_now > top && swept_crosses_plane(bottom_now, bottom_next, top) {
            let t = crossing_fraction(bottom_now, bottom_next, top);
            let contact_pos = input.position.lerp(input.next, t);
            return VerticalResolution::on_top(contact_pos, input, top, Contact::Landed(surface));
        }

        if vel_y > 0.0
            && top_now <= underside + OBSTACLE_CONTACT_TOLERANCE
            && top_next >= underside
        {
            let t = crossing_fraction(top_now, top_next, underside);
            let contact_pos = input.position.lerp(input.next, t);
            return VerticalResolution::below(
                contact_pos,
                input,
                underside - half_y,
                Contact::Ceiling(surface),
            );
        }
    }

    VerticalResolution::free(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ObstacleKind, PlatformSpawn};

    fn platform() -> Platform {
        Platform::from_spawn(&PlatformSpawn::default())
    }

    fn sweep(y: f32, vel_y: f32, dt: f32) -> SweepInput {
        let position = Vec3::new(0.0, y, 0.0);
        let velocity = Vec3::new(0.0, vel_y, 0.0);
        SweepInput {
            position,
            next: position + velocity * dt,
            velocity,
            half_extents: Vec3::splat(0.5),
        }
    }

    fn obstacle(id: u32, position: Vec3, size: Vec3, kind: ObstacleKind) -> Obstacle {
        Obstacle {
            id,
            position,
            size,
            kind,
            spin: 0.0,
        }
    }

    #[test]
    fn test_fast_fall_lands_exactly_on_top() {
        // From well above to far below in a single step
        let input = sweep(5.0, -1000.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), &[]);
        assert_eq!(result.position.y, 0.0);
        assert_eq!(result.velocity.y, 0.0);
        assert!(result.grounded);
        assert_eq!(result.contact, Contact::Landed(Surface::Platform));
    }

    #[test]
    fn test_jump_into_underside_snaps_below() {
        // Bottom at -1.0, rising through the top plane at -0.5
        let input = sweep(-0.5, 60.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), &[]);
        assert_eq!(result.position.y, -1.0);
        assert_eq!(result.velocity.y, 0.0);
        assert!(!result.grounded);
        assert_eq!(result.contact, Contact::Ceiling(Surface::Platform));
    }

    #[test]
    fn test_resting_player_does_not_sink() {
        // Grounded player after gravity has nudged velocity down
        let input = sweep(0.0, -20.0 / 60.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), &[]);
        assert_eq!(result.position.y, 0.0);
        assert_eq!(result.velocity.y, 0.0);
        assert!(result.grounded);
        assert_eq!(result.contact, Contact::Resting(Surface::Platform));
        assert!(!result.contact.is_collision());
    }

    #[test]
    fn test_zero_delta_on_plane_is_not_a_collision() {
        let input = sweep(0.0, 0.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), &[]);
        assert_eq!(result.position.y, 0.0);
        assert!(!result.contact.is_collision());
    }

    #[test]
    fn test_off_platform_falls_freely() {
        let mut input = sweep(0.0, -1.0, 1.0 / 60.0);
        input.position.x = 12.0;
        input.next.x = 12.0;
        let result = resolve_vertical(&input, &platform(), &[]);
        assert_eq!(result.position, input.next);
        assert!(!result.grounded);
        assert_eq!(result.contact, Contact::None);
    }

    #[test]
    fn test_swept_footprint_catches_diagonal_entry() {
        // Starts past the right edge, ends over the platform's top
        let position = Vec3::new(10.8, 1.0, 0.0);
        let velocity = Vec3::new(-60.0, -120.0, 0.0);
        let input = SweepInput {
            position,
            next: position + velocity / 60.0,
            velocity,
            half_extents: Vec3::splat(0.5),
        };
        let result = resolve_vertical(&input, &platform(), &[]);
        assert!(result.grounded);
        assert_eq!(result.position.y, 0.0);
        // Horizontal position interpolated to the contact point
        assert!(result.position.x < 10.8 && result.position.x > 9.8);
    }

    #[test]
    fn test_lands_on_obstacle_top() {
        let block = obstacle(7, Vec3::new(0.0, 0.0, 0.0), Vec3::ONE, ObstacleKind::Solid);
        let input = sweep(2.0, -30.0, 1.0 / 60.0);
        let mut y = input.position.y;
        let mut vel = input.velocity.y;
        let mut result = resolve_vertical(&input, &platform(), std::slice::from_ref(&block));
        for _ in 0..120 {
            if result.grounded {
                break;
            }
            y = result.position.y;
            vel = result.velocity.y - 20.0 / 60.0;
            let next = sweep(y, vel, 1.0 / 60.0);
            result = resolve_vertical(&next, &platform(), std::slice::from_ref(&block));
        }
        assert!(result.grounded, "never landed (last y={y}, vel={vel})");
        assert_eq!(result.position.y, 1.0);
        assert_eq!(result.contact, Contact::Landed(Surface::Obstacle { id: 7 }));
    }

    #[test]
    fn test_no_step_up_from_below_obstacle_top() {
        // Bottom 0.05 under the block top while falling: nothing crossed
        let block = obstacle(5, Vec3::new(0.0, 0.0, 0.0), Vec3::ONE, ObstacleKind::Solid);
        let input = sweep(0.95, -3.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), std::slice::from_ref(&block));
        assert_eq!(result.contact, Contact::None);
        assert_eq!(result.position, input.next);
        assert!(!result.grounded);
    }

    #[test]
    fn test_spike_is_not_a_surface() {
        let spike = obstacle(3, Vec3::new(0.0, 0.0, 0.0), Vec3::ONE, ObstacleKind::Spike);
        let input = sweep(1.05, -6.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), &[spike]);
        assert_eq!(result.contact, Contact::None);
        assert!(result.position.y < 1.0);
    }

    #[test]
    fn test_head_bump_on_obstacle_underside() {
        // Floating block with its underside at 1.0; player top at 0.95 rising
        let block = obstacle(4, Vec3::new(0.0, 1.5, 0.0), Vec3::ONE, ObstacleKind::Solid);
        let input = sweep(0.45, 8.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), &[block]);
        assert_eq!(result.contact, Contact::Ceiling(Surface::Obstacle { id: 4 }));
        assert_eq!(result.position.y, 0.5);
        assert_eq!(result.velocity.y, 0.0);
        assert!(!result.grounded);
    }

    #[test]
    fn test_first_obstacle_in_registry_order_wins() {
        // Two overlapping blocks with the same top; id 1 listed first
        let a = obstacle(1, Vec3::new(0.2, 0.0, 0.0), Vec3::ONE, ObstacleKind::Solid);
        let b = obstacle(2, Vec3::new(-0.2, 0.0, 0.0), Vec3::ONE, ObstacleKind::Instakill);
        let input = sweep(1.05, -10.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), &[a, b]);
        assert_eq!(result.contact, Contact::Landed(Surface::Obstacle { id: 1 }));
    }

    #[test]
    fn test_platform_beats_obstacle() {
        // Obstacle hanging below the platform top, both under the player
        let block = obstacle(9, Vec3::new(0.0, -3.0, 0.0), Vec3::ONE, ObstacleKind::Solid);
        let input = sweep(1.0, -200.0, 1.0 / 60.0);
        let result = resolve_vertical(&input, &platform(), &[block]);
        assert_eq!(result.contact, Contact::Landed(Surface::Platform));
    }
}
