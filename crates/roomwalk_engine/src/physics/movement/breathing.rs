//! Push-out from breathing walls
//!
//! Breathing walls move on their own, so the capsule can end a tick inside
//! one without having moved. Casts ignore boxes they start inside; this
//! correction is what gets the capsule back out.

use crate::foundation::math::{constants::EPSILON, Vec3};
use crate::physics::collision::Capsule;
use crate::physics::collision_layers::ColliderLayer;
use crate::physics::geometry::GeometryRegistry;

/// Summed correction out of every overlapping dynamic collider at `pose`
///
/// Each overlap is resolved along the vector from the closest box point to
/// the capsule center, scaled to the penetration depth plus `margin`
/// (a fraction, `0.1` for ten percent). A center buried inside a box pushes
/// out through the nearest face.
pub fn breathing_wall_push_out(
    registry: &GeometryRegistry,
    pose: Vec3,
    capsule: &Capsule,
    margin: f32,
) -> Vec3 {
    let center = capsule.center(pose);
    let radius = capsule.radius;
    let scale = 1.0 + margin;

    let mut push = Vec3::zeros();
    for (_, wall) in registry.colliders(ColliderLayer::Dynamic) {
        if !wall.enabled || !wall.bounds.expanded(radius).contains_point(center) {
            continue;
        }

        let offset = center - wall.bounds.closest_point(center);
        let distance = offset.norm();
        if distance > EPSILON {
            let depth = radius - distance;
            if depth > 0.0 {
                push += offset / distance * depth * scale;
            }
        } else {
            let normal = wall.bounds.face_normal(center);
            let local = center - wall.bounds.center();
            let slack = (wall.bounds.extents() - local.abs()).dot(&normal.abs());
            push += normal * (slack + radius) * scale;
        }
    }
    push
}
