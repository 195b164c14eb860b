//! Full movement test
//!
//! One call per tick answering everything the orchestrator needs to decide
//! how to move.

use crate::core::config::{CastConfig, SolverConfig};
use crate::foundation::math::Vec3;
use crate::physics::collision::{Capsule, CapsuleCaster, CollisionResult};
use crate::physics::geometry::check_doorway_bounds;

use super::breathing::breathing_wall_push_out;
use super::ground::{detect_ground, GroundInfo};

/// Result of [`test_movement`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementTest {
    /// Ground under the start pose
    pub ground: GroundInfo,
    /// Index of the doorway whose trigger holds the end pose
    pub doorway: Option<usize>,
    /// Capsule cast from start to end
    pub collision: CollisionResult,
    /// Correction out of breathing walls at the end pose
    pub push_out: Vec3,
}

impl MovementTest {
    /// The requested move can be applied as is
    pub fn is_clear(&self) -> bool {
        !self.collision.hit
    }
}

/// Ground at `start`, doorway at `end`, the cast between them and
/// breathing-wall push-out at `end`
pub fn test_movement(
    caster: &CapsuleCaster<'_>,
    start: Vec3,
    end: Vec3,
    capsule: &Capsule,
    solver: &SolverConfig,
    cast: &CastConfig,
) -> MovementTest {
    let registry = caster.registry();
    MovementTest {
        ground: detect_ground(caster, start, capsule, solver),
        doorway: check_doorway_bounds(registry.portals(), end, capsule.radius).map(|p| p.index),
        collision: caster.multi_ray_capsule_check(start, end, capsule),
        push_out: breathing_wall_push_out(registry, end, capsule, cast.push_out_margin),
    }
}
