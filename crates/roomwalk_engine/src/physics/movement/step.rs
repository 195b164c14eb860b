//! Step climbing

use crate::core::config::SolverConfig;
use crate::foundation::math::{horizontal, up, Vec3};
use crate::physics::collision::{Capsule, CapsuleCaster};

use super::ground::floor_height;

/// Outcome of [`attempt_step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// The capsule made it over the obstacle
    pub success: bool,
    /// Resulting pose; the start pose on failure
    pub position: Vec3,
}

impl StepResult {
    fn failed(start: Vec3) -> Self {
        Self {
            success: false,
            position: start,
        }
    }
}

/// Try to climb over whatever blocked the move from `start` to `end`
///
/// Raises the capsule by the max step height, repeats the horizontal part of
/// the move up there and drops back onto the floor below. Either cast being
/// blocked fails the step. With no floor found under the raised end the
/// capsule keeps its starting height.
pub fn attempt_step(
    caster: &CapsuleCaster<'_>,
    start: Vec3,
    end: Vec3,
    capsule: &Capsule,
    config: &SolverConfig,
) -> StepResult {
    let rise = up() * config.max_step_height;
    let raised_start = start + rise;
    if caster.multi_ray_capsule_check(start, raised_start, capsule).hit {
        log::trace!("Step blocked overhead at {start:?}");
        return StepResult::failed(start);
    }

    let raised_end = raised_start + horizontal(end - start);
    if caster.multi_ray_capsule_check(raised_start, raised_end, capsule).hit {
        log::trace!("Step blocked at raised height");
        return StepResult::failed(start);
    }

    let drop = config.max_step_height * 2.0;
    let position = match floor_height(caster, raised_end, capsule, 0.0, drop) {
        Some(floor) => {
            let feet = capsule.feet(raised_end);
            capsule.pose_from_feet(Vec3::new(feet.x, floor, feet.z))
        }
        None => Vec3::new(raised_end.x, start.y, raised_end.z),
    };

    StepResult {
        success: true,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::AABB;
    use crate::physics::geometry::GeometryRegistry;
    use approx::assert_relative_eq;

    fn room_with_block(height: f32) -> GeometryRegistry {
        let mut registry = GeometryRegistry::default();
        registry.add_static_collider("floor", AABB::new(Vec3::new(-5.0, -0.2, -5.0), Vec3::new(5.0, 0.0, 5.0)));
        registry.add_static_collider("block", AABB::new(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, height, 3.0)));
        registry
    }

    #[test]
    fn test_step_below_max_height_succeeds() {
        let registry = room_with_block(0.25);
        let caster = CapsuleCaster::new(&registry);
        let config = SolverConfig::default();
        let capsule = Capsule::default();

        let start = Vec3::new(0.0, 0.0, 0.5);
        let end = Vec3::new(0.0, 0.0, 1.5);
        assert!(caster.multi_ray_capsule_check(start, end, &capsule).hit);

        let result = attempt_step(&caster, start, end, &capsule, &config);
        assert!(result.success);
        assert_relative_eq!(result.position, Vec3::new(0.0, 0.25, 1.5), epsilon = 1e-5);
    }

    #[test]
    fn test_step_too_tall_fails() {
        let config = SolverConfig::default();
        let registry = room_with_block(config.max_step_height + 1.0);
        let caster = CapsuleCaster::new(&registry);
        let capsule = Capsule::default();

        let start = Vec3::new(0.0, 0.0, 0.5);
        let result = attempt_step(&caster, start, Vec3::new(0.0, 0.0, 1.5), &capsule, &config);
        assert!(!result.success);
        assert_eq!(result.position, start);
    }

    #[test]
    fn test_step_blocked_overhead_fails() {
        let mut registry = room_with_block(0.25);
        registry.add_static_collider("beam", AABB::new(Vec3::new(-5.0, 1.7, -5.0), Vec3::new(5.0, 2.0, 5.0)));
        let caster = CapsuleCaster::new(&registry);
        let start = Vec3::new(0.0, 0.0, 0.5);
        let result = attempt_step(&caster, start, Vec3::new(0.0, 0.0, 1.5), &Capsule::default(), &SolverConfig::default());
        assert!(!result.success);
    }

    #[test]
    fn test_step_without_floor_keeps_height() {
        let registry = GeometryRegistry::default();
        let caster = CapsuleCaster::new(&registry);
        let start = Vec3::new(0.0, 1.0, 0.0);
        let result = attempt_step(&caster, start, Vec3::new(0.5, 1.0, 0.0), &Capsule::default(), &SolverConfig::default());
        assert!(result.success);
        assert_relative_eq!(result.position, Vec3::new(0.5, 1.0, 0.0), epsilon = 1e-6);
    }
}
