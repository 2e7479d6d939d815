//! Axis-aligned box geometry and swept plane-crossing math
//!
//! An `Aabb` is a center plus full extents. Min/max are derived on every
//! query rather than stored, so a box built from an entity is never stale.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::SWEEP_DELTA_EPSILON;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    /// Full size along each axis
    pub size: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Box spanning two corners (any order)
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            center: (min + max) * 0.5,
            size: max - min,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents()
    }

    /// Y of the top face
    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.size.y * 0.5
    }

    /// Y of the bottom face
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.size.y * 0.5
    }

    /// Same box moved to a new center
    #[inline]
    pub fn at(&self, center: Vec3) -> Self {
        Self {
            center,
            size: self.size,
        }
    }

    /// Grow every face outward by `skin`
    #[inline]
    pub fn expanded(&self, skin: f32) -> Self {
        Self {
            center: self.center,
            size: self.size + Vec3::splat(2.0 * skin),
        }
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Self {
        Self::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Footprint swept between this box and the same box at `next_center`
    pub fn swept_to(&self, next_center: Vec3) -> Self {
        self.union(&self.at(next_center))
    }
}

/// Overlap depth of two closed intervals (negative when separated)
#[inline]
fn interval_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    a_max.min(b_max) - a_min.max(b_min)
}

/// True iff the boxes overlap on all three axes by strictly more than `epsilon`
///
/// Boxes that merely touch (or overlap by less than `epsilon`) do not count.
pub fn overlaps(a: &Aabb, b: &Aabb, epsilon: f32) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());
    interval_overlap(a_min.x, a_max.x, b_min.x, b_max.x) > epsilon
        && interval_overlap(a_min.y, a_max.y, b_min.y, b_max.y) > epsilon
        && interval_overlap(a_min.z, a_max.z, b_min.z, b_max.z) > epsilon
}

/// Strict overlap of the X and Z footprints only (Y ignored)
pub fn overlaps_xz(a: &Aabb, b: &Aabb) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());
    a_max.x > b_min.x && a_min.x < b_max.x && a_max.z > b_min.z && a_min.z < b_max.z
}

/// True iff a value moving from `now` to `next` crosses `plane`
///
/// Crossing means strictly above to at-or-below (falling onto), or strictly
/// below to at-or-above (rising into). Starting exactly on the plane is never
/// a crossing.
#[inline]
pub fn swept_crosses_plane(now: f32, next: f32, plane: f32) -> bool {
    (now > plane && next <= plane) || (now < plane && next >= plane)
}

/// Fraction in [0, 1] along `now -> next` at which the value equals `plane`
///
/// Near-zero deltas return 0 instead of dividing.
#[inline]
pub fn crossing_fraction(now: f32, next: f32, plane: f32) -> f32 {
    let delta = next - now;
    if delta.abs() <= SWEEP_DELTA_EPSILON {
        return 0.0;
    }
    ((plane - now) / delta).clamp(0.0, 1.0)
}
