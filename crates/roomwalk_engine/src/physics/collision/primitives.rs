//! Primitive collision shapes and intersection algorithms
//!
//! Provides the ray and axis-aligned box types every collider in the room is
//! expressed with, plus the slab ray test used by all casts.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants::EPSILON, Vec3};

/// A ray for ray casting
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// Returns `None` for a zero-length direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let length = direction.norm();
        if length <= EPSILON {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / length,
        })
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from two opposite corners (in any order)
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Create an AABB centered at a point with given extents (half-size)
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        let extents = extents.abs();
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the full size of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        let delta = Vec3::repeat(margin);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Check if this AABB contains a point (boundary inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Point of the box closest to `point` (the point itself when inside)
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.sup(&self.min).inf(&self.max)
    }

    /// Unit axis of the face `point` is nearest to
    ///
    /// Compares the point's offset from the center against each half extent
    /// and returns the signed axis with the least slack. This is a face
    /// normal, not a penetration direction.
    pub fn face_normal(&self, point: Vec3) -> Vec3 {
        let offset = point - self.center();
        let extents = self.extents();

        let mut axis = 0;
        let mut least_slack = f32::INFINITY;
        for i in 0..3 {
            let slack = extents[i] - offset[i].abs();
            if slack < least_slack {
                least_slack = slack;
                axis = i;
            }
        }

        let mut normal = Vec3::zeros();
        normal[axis] = if offset[axis] < 0.0 { -1.0 } else { 1.0 };
        normal
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns the distance to the entry point when the ray enters the box
    /// within `max_distance`. Rays starting strictly inside the box report no
    /// hit: overlap is resolved by push-out, and a cast from inside must not
    /// pin the mover in place. Zero direction components are handled without
    /// dividing by zero.
    pub fn intersect_ray(&self, ray: &Ray, max_distance: f32) -> Option<f32> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for i in 0..3 {
            let origin = ray.origin[i];
            let dir = ray.direction[i];

            if dir.abs() <= EPSILON {
                // Parallel to this slab: either always inside it or never.
                if origin < self.min[i] || origin > self.max[i] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t1 = (self.min[i] - origin) * inv;
            let mut t2 = (self.max[i] - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_enter = t_enter.max(t1);
            t_exit = t_exit.min(t2);

            if t_enter > t_exit {
                return None;
            }
        }

        // Inside on every axis (or parallel inside every slab).
        if t_enter < 0.0 || t_exit < 0.0 {
            return None;
        }
        if t_enter > max_distance {
            return None;
        }
        Some(t_enter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> AABB {
        AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_hits_front_face() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let t = unit_box().intersect_ray(&ray, 100.0).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ray_beyond_max_distance_misses() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(unit_box().intersect_ray(&ray, 3.9).is_none());
    }

    #[test]
    fn test_axis_parallel_ray_outside_slab_misses() {
        // Parallel to the box, offset above it: no NaN, no hit.
        let ray = Ray::new(Vec3::new(-5.0, 2.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(unit_box().intersect_ray(&ray, 100.0).is_none());
    }

    #[test]
    fn test_ray_from_inside_reports_no_hit() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(unit_box().intersect_ray(&ray, 100.0).is_none());
    }

    #[test]
    fn test_ray_starting_on_entry_face_hits_at_zero() {
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(unit_box().intersect_ray(&ray, 1.0), Some(0.0));
    }

    #[test]
    fn test_zero_direction_ray_rejected() {
        assert!(Ray::new(Vec3::zeros(), Vec3::zeros()).is_none());
    }

    #[test]
    fn test_face_normal_picks_least_slack_axis() {
        let aabb = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 1.0));
        assert_eq!(aabb.face_normal(Vec3::new(4.0, 1.0, 0.5)), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(aabb.face_normal(Vec3::new(2.0, 1.0, 0.0)), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(aabb.face_normal(Vec3::new(2.0, 2.0, 0.5)), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_closest_point_clamps_to_surface() {
        let closest = unit_box().closest_point(Vec3::new(3.0, 0.5, -2.0));
        assert_eq!(closest, Vec3::new(1.0, 0.5, -1.0));
    }

    #[test]
    fn test_new_orders_corners() {
        let aabb = AABB::new(Vec3::new(1.0, -1.0, 3.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 3.0));
    }
}
