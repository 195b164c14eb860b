//! Ground detection

use crate::core::config::SolverConfig;
use crate::foundation::math::{up, utils::rad_to_deg, Vec3};
use crate::physics::collision::{Capsule, CapsuleCaster, SKIN_WIDTH};

/// What is under the capsule's feet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundInfo {
    /// Ground within the grounded threshold
    pub grounded: bool,
    /// Surface normal (up when nothing was found)
    pub normal: Vec3,
    /// Angle between the normal and up, in degrees
    pub slope_degrees: f32,
    /// Gap between the feet and the ground; infinite when nothing was found
    pub distance: f32,
    /// Slope is gentle enough to stand on
    pub can_stand: bool,
}

impl GroundInfo {
    /// Nothing below within probe range
    pub fn airborne() -> Self {
        Self {
            grounded: false,
            normal: up(),
            slope_degrees: 0.0,
            distance: f32::INFINITY,
            can_stand: false,
        }
    }
}

/// Probe straight down from just above the feet
pub fn detect_ground(
    caster: &CapsuleCaster<'_>,
    pose: Vec3,
    capsule: &Capsule,
    config: &SolverConfig,
) -> GroundInfo {
    let origin = capsule.feet(pose) + up() * config.probe_offset;
    let hit = caster.sphere_cast(origin, -up(), config.probe_distance);
    if !hit.hit {
        return GroundInfo::airborne();
    }

    let slope_degrees = rad_to_deg(hit.normal.dot(&up()).clamp(-1.0, 1.0).acos());
    GroundInfo {
        grounded: hit.distance <= config.probe_offset + config.grounded_threshold,
        normal: hit.normal,
        slope_degrees,
        distance: hit.distance - config.probe_offset,
        can_stand: slope_degrees < config.max_slope_degrees,
    }
}

/// Height of the floor under `pose`, searching from `above` over the feet
/// down to `below` under them
pub fn floor_height(
    caster: &CapsuleCaster<'_>,
    pose: Vec3,
    capsule: &Capsule,
    above: f32,
    below: f32,
) -> Option<f32> {
    let feet = capsule.feet(pose);
    let origin = feet + up() * above.max(SKIN_WIDTH);
    let hit = caster.sphere_cast(origin, -up(), above.max(SKIN_WIDTH) + below.max(0.0));
    hit.hit.then_some(hit.point.y)
}

/// Pose with the feet dropped (or lifted) onto the floor within range
///
/// Returns `None` when no floor lies within `max_rise` above or `max_drop`
/// below the feet.
pub fn snap_to_ground(
    caster: &CapsuleCaster<'_>,
    pose: Vec3,
    capsule: &Capsule,
    max_rise: f32,
    max_drop: f32,
) -> Option<Vec3> {
    let feet = capsule.feet(pose);
    floor_height(caster, pose, capsule, max_rise, max_drop)
        .map(|y| capsule.pose_from_feet(Vec3::new(feet.x, y, feet.z)))
}
