//! Slide response along blocking surfaces

use crate::core::config::SolverConfig;
use crate::foundation::math::{constants::EPSILON, Vec3};
use crate::physics::collision::{Capsule, CapsuleCaster};

/// Remove the part of `movement` going into the surface and damp the rest
///
/// The projected vector is re-tested from `start`; if it is blocked again
/// the projection repeats against the new surface. Runs out of iterations or
/// degenerate vectors give zero.
pub fn slide_along_surface(
    caster: &CapsuleCaster<'_>,
    start: Vec3,
    movement: Vec3,
    normal: Vec3,
    capsule: &Capsule,
    config: &SolverConfig,
) -> Vec3 {
    slide_step(caster, start, movement, normal, capsule, config, 0)
}

fn slide_step(
    caster: &CapsuleCaster<'_>,
    start: Vec3,
    movement: Vec3,
    normal: Vec3,
    capsule: &Capsule,
    config: &SolverConfig,
    iteration: u32,
) -> Vec3 {
    if iteration >= config.max_slide_iterations {
        log::trace!("Slide budget exhausted");
        return Vec3::zeros();
    }
    let Some(normal) = normal.try_normalize(EPSILON) else {
        return Vec3::zeros();
    };

    let slide = clip_to_plane(movement, normal) * (1.0 - config.slide_friction);
    if slide.norm() < config.min_slide_length {
        return Vec3::zeros();
    }

    let result = caster.multi_ray_capsule_check(start, start + slide, capsule);
    if result.hit {
        slide_step(caster, start, slide, result.normal, capsule, config, iteration + 1)
    } else {
        slide
    }
}

/// `movement` with its component along `normal` removed
pub fn clip_to_plane(movement: Vec3, normal: Vec3) -> Vec3 {
    movement - normal * movement.dot(&normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::AABB;
    use crate::physics::geometry::GeometryRegistry;
    use approx::assert_relative_eq;

    fn corridor() -> GeometryRegistry {
        let mut registry = GeometryRegistry::default();
        registry.add_static_collider("north", AABB::new(Vec3::new(-10.0, 0.0, -2.2), Vec3::new(10.0, 3.0, -2.0)));
        registry
    }

    #[test]
    fn test_perpendicular_component_removed() {
        let registry = corridor();
        let caster = CapsuleCaster::new(&registry);
        let normal = Vec3::new(0.0, 0.0, 1.0);
        let slide = slide_along_surface(
            &caster,
            Vec3::new(0.0, 0.0, -1.5),
            Vec3::new(0.5, 0.0, -0.5),
            normal,
            &Capsule::default(),
            &SolverConfig::default(),
        );

        assert_relative_eq!(slide.dot(&normal), 0.0, epsilon = 1e-6);
        assert_relative_eq!(slide, Vec3::new(0.45, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_head_on_movement_gives_zero() {
        let registry = corridor();
        let caster = CapsuleCaster::new(&registry);
        let slide = slide_along_surface(
            &caster,
            Vec3::new(0.0, 0.0, -1.5),
            Vec3::new(0.0, 0.0, -0.5),
            Vec3::new(0.0, 0.0, 1.0),
            &Capsule::default(),
            &SolverConfig::default(),
        );
        assert_eq!(slide, Vec3::zeros());
    }

    #[test]
    fn test_zero_normal_gives_zero() {
        let registry = corridor();
        let caster = CapsuleCaster::new(&registry);
        let slide = slide_along_surface(
            &caster,
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zeros(),
            &Capsule::default(),
            &SolverConfig::default(),
        );
        assert_eq!(slide, Vec3::zeros());
    }

    #[test]
    fn test_slide_into_corner_stops() {
        let mut registry = corridor();
        registry.add_static_collider("east", AABB::new(Vec3::new(1.0, 0.0, -5.0), Vec3::new(1.2, 3.0, 5.0)));
        let caster = CapsuleCaster::new(&registry);
        let slide = slide_along_surface(
            &caster,
            Vec3::new(0.5, 0.0, -1.5),
            Vec3::new(0.5, 0.0, -0.5),
            Vec3::new(0.0, 0.0, 1.0),
            &Capsule::default(),
            &SolverConfig::default(),
        );
        assert_eq!(slide, Vec3::zeros());
    }
}
