//! Capsule cast engine
//!
//! Casts are approximated by rays: a single ray for [`CapsuleCaster::sphere_cast`]
//! and seven parallel rays from fixed capsule samples for
//! [`CapsuleCaster::multi_ray_capsule_check`]. Thin geometry narrower than the
//! gap between samples can slip through; room colliders are sized so it
//! doesn't.

use crate::core::config::RenderablePriority;
use crate::foundation::math::{constants::EPSILON, Vec3};
use crate::physics::collision_layers::LayerMask;
use crate::physics::geometry::{ColliderKey, GeometryRegistry, RenderableRef};

use super::capsule::Capsule;
use super::primitives::Ray;

/// What a cast ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// A registry box
    Collider(ColliderKey),
    /// A render object reported by the [`RenderableProbe`]
    Renderable(RenderableRef),
}

/// Outcome of one cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether anything was hit
    pub hit: bool,
    /// Contact point, or the end of the cast on a miss
    pub point: Vec3,
    /// Surface normal at the contact (zero on a miss)
    pub normal: Vec3,
    /// Travel distance to the contact, or the full distance on a miss
    pub distance: f32,
    /// How far the capsule would sink into the surface at the requested end
    pub penetration: f32,
    /// Hit object
    pub target: Option<HitTarget>,
}

impl CollisionResult {
    /// Clear cast that traveled `distance` and stopped at `point`
    pub fn miss(point: Vec3, distance: f32) -> Self {
        Self {
            hit: false,
            point,
            normal: Vec3::zeros(),
            distance,
            penetration: 0.0,
            target: None,
        }
    }
}

/// Ray hit against render-side geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableHit {
    /// Render object hit
    pub renderable: RenderableRef,
    /// Distance along the ray
    pub distance: f32,
    /// Contact point
    pub point: Vec3,
    /// Surface normal
    pub normal: Vec3,
}

/// Raycast against the actual render meshes of furniture and art
///
/// Installed by the owner when tighter-than-box collision is wanted.
pub trait RenderableProbe {
    /// Nearest hit along `ray` within `max_distance`
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RenderableHit>;
}

/// Casts against one registry
pub struct CapsuleCaster<'a> {
    registry: &'a GeometryRegistry,
    renderables: Option<&'a dyn RenderableProbe>,
    priority: RenderablePriority,
    mask: LayerMask,
}

impl<'a> CapsuleCaster<'a> {
    /// Box-only caster over the blocking layers
    pub fn new(registry: &'a GeometryRegistry) -> Self {
        Self {
            registry,
            renderables: None,
            priority: RenderablePriority::default(),
            mask: LayerMask::SOLID,
        }
    }

    /// Query `probe` before the boxes on every ray
    pub fn with_renderables(
        mut self,
        probe: &'a dyn RenderableProbe,
        priority: RenderablePriority,
    ) -> Self {
        self.renderables = Some(probe);
        self.priority = priority;
        self
    }

    /// Registry this caster queries
    pub fn registry(&self) -> &'a GeometryRegistry {
        self.registry
    }

    /// Restrict casts to `mask`
    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    /// Nearest hit along one ray
    pub fn sphere_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> CollisionResult {
        self.sphere_cast_filtered(origin, direction, max_distance, self.mask)
    }

    /// Nearest hit along one ray, considering only layers in `mask`
    pub fn sphere_cast_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> CollisionResult {
        let Some(ray) = Ray::new(origin, direction) else {
            return CollisionResult::miss(origin, 0.0);
        };
        let max_distance = max_distance.max(0.0);

        let renderable = self
            .renderables
            .and_then(|probe| probe.raycast(&ray, max_distance))
            .filter(|hit| hit.distance <= max_distance);
        if let Some(hit) = renderable {
            if self.priority == RenderablePriority::AlwaysWins {
                return Self::renderable_result(hit);
            }
        }

        let mut best: Option<(f32, ColliderKey)> = None;
        for (key, collider) in self.registry.query(mask) {
            if let Some(t) = collider.bounds.intersect_ray(&ray, max_distance) {
                if best.map_or(true, |(best_t, _)| t < best_t) {
                    best = Some((t, key));
                }
            }
        }

        match (renderable, best) {
            (Some(hit), Some((t, _))) if hit.distance <= t => Self::renderable_result(hit),
            (Some(hit), None) => Self::renderable_result(hit),
            (_, Some((t, key))) => {
                let point = ray.point_at(t);
                let normal = self
                    .registry
                    .collider(key)
                    .map_or_else(|| -ray.direction, |c| c.bounds.face_normal(point));
                CollisionResult {
                    hit: true,
                    point,
                    normal,
                    distance: t,
                    penetration: 0.0,
                    target: Some(HitTarget::Collider(key)),
                }
            }
            (None, None) => CollisionResult::miss(ray.point_at(max_distance), max_distance),
        }
    }

    fn renderable_result(hit: RenderableHit) -> CollisionResult {
        CollisionResult {
            hit: true,
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
            penetration: 0.0,
            target: Some(HitTarget::Renderable(hit.renderable)),
        }
    }

    /// Approximate capsule sweep from pose `start` to pose `end`
    ///
    /// Every sample ray reaches `travel + radius` so contact is reported
    /// before the capsule surface touches. The nearest sample hit wins and
    /// its penetration is how far short of that reach it stopped.
    pub fn multi_ray_capsule_check(&self, start: Vec3, end: Vec3, capsule: &Capsule) -> CollisionResult {
        let delta = end - start;
        let travel = delta.norm();
        if travel <= EPSILON {
            return CollisionResult::miss(start, 0.0);
        }
        let direction = delta / travel;
        let reach = travel + capsule.radius;

        let mut nearest: Option<CollisionResult> = None;
        for sample in capsule.sample_points(start) {
            let result = self.sphere_cast(sample, direction, reach);
            if result.hit && nearest.map_or(true, |n| result.distance < n.distance) {
                nearest = Some(result);
            }
        }

        match nearest {
            Some(mut hit) => {
                hit.penetration = (reach - hit.distance).max(0.0);
                hit
            }
            None => CollisionResult::miss(end, travel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::AABB;
    use crate::physics::collision_layers::ColliderLayer;
    use approx::assert_relative_eq;

    struct FixedProbe(RenderableHit);

    impl RenderableProbe for FixedProbe {
        fn raycast(&self, _ray: &Ray, max_distance: f32) -> Option<RenderableHit> {
            (self.0.distance <= max_distance).then_some(self.0)
        }
    }

    fn wall_registry() -> (GeometryRegistry, ColliderKey) {
        let mut registry = GeometryRegistry::default();
        let key = registry.add_static_collider(
            "wall",
            AABB::new(Vec3::new(-5.0, 0.0, -5.2), Vec3::new(5.0, 3.0, -5.0)),
        );
        (registry, key)
    }

    fn probe_at(distance: f32) -> FixedProbe {
        FixedProbe(RenderableHit {
            renderable: RenderableRef(42),
            distance,
            point: Vec3::new(0.0, 1.0, -distance),
            normal: Vec3::z(),
        })
    }

    #[test]
    fn test_sphere_cast_hits_wall_with_face_normal() {
        let (registry, key) = wall_registry();
        let caster = CapsuleCaster::new(&registry);
        let result = caster.sphere_cast(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 10.0);

        assert!(result.hit);
        assert_relative_eq!(result.distance, 5.0, epsilon = 1e-5);
        assert_relative_eq!(result.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_eq!(result.target, Some(HitTarget::Collider(key)));
    }

    #[test]
    fn test_sphere_cast_miss_reports_full_distance() {
        let (registry, _) = wall_registry();
        let caster = CapsuleCaster::new(&registry);
        let result = caster.sphere_cast(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 4.0);
        assert!(!result.hit);
        assert_relative_eq!(result.distance, 4.0);
        assert_relative_eq!(result.point, Vec3::new(0.0, 1.0, 4.0), epsilon = 1e-6);
    }

    #[test]
    fn test_filtered_cast_ignores_other_layers() {
        let (registry, _) = wall_registry();
        let caster = CapsuleCaster::new(&registry);
        let result = caster.sphere_cast_filtered(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            10.0,
            ColliderLayer::Furniture.mask(),
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_nearest_priority_compares_distances() {
        let (registry, _) = wall_registry();
        let far = probe_at(7.0);
        let caster = CapsuleCaster::new(&registry).with_renderables(&far, RenderablePriority::Nearest);
        let result = caster.sphere_cast(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 10.0);
        assert!(matches!(result.target, Some(HitTarget::Collider(_))));

        let near = probe_at(2.0);
        let caster = CapsuleCaster::new(&registry).with_renderables(&near, RenderablePriority::Nearest);
        let result = caster.sphere_cast(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 10.0);
        assert_eq!(result.target, Some(HitTarget::Renderable(RenderableRef(42))));
        assert_relative_eq!(result.distance, 2.0);
    }

    #[test]
    fn test_always_wins_priority_prefers_renderable() {
        let (registry, _) = wall_registry();
        let far = probe_at(7.0);
        let caster =
            CapsuleCaster::new(&registry).with_renderables(&far, RenderablePriority::AlwaysWins);
        let result = caster.sphere_cast(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 10.0);
        assert_eq!(result.target, Some(HitTarget::Renderable(RenderableRef(42))));
    }

    #[test]
    fn test_capsule_check_zero_travel() {
        let (registry, _) = wall_registry();
        let caster = CapsuleCaster::new(&registry);
        let capsule = Capsule::default();
        let pose = Vec3::new(0.0, 0.0, -4.0);
        let result = caster.multi_ray_capsule_check(pose, pose, &capsule);
        assert!(!result.hit);
        assert_eq!(result.distance, 0.0);
    }

    #[test]
    fn test_capsule_check_reports_penetration() {
        let (registry, _) = wall_registry();
        let caster = CapsuleCaster::new(&registry);
        let capsule = Capsule::default();

        // Front sample starts 0.3 ahead of the center, 4.0 from the wall
        let start = Vec3::new(0.0, 0.0, -0.7);
        let end = Vec3::new(0.0, 0.0, -4.5);
        let result = caster.multi_ray_capsule_check(start, end, &capsule);

        assert!(result.hit);
        assert_relative_eq!(result.distance, 4.0, epsilon = 1e-5);
        assert_relative_eq!(result.penetration, 3.8 + 0.3 - 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_capsule_check_clear_path() {
        let (registry, _) = wall_registry();
        let caster = CapsuleCaster::new(&registry);
        let capsule = Capsule::default();
        let end = Vec3::new(1.0, 0.0, -2.0);
        let result = caster.multi_ray_capsule_check(Vec3::zeros(), end, &capsule);
        assert!(!result.hit);
        assert_relative_eq!(result.distance, (end).norm(), epsilon = 1e-6);
        assert_eq!(result.point, end);
    }

    #[test]
    fn test_low_ledge_seen_by_bottom_sample() {
        let mut registry = GeometryRegistry::default();
        registry.add_static_collider("ledge", AABB::new(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.15, 2.0)));
        let caster = CapsuleCaster::new(&registry);
        let result =
            caster.multi_ray_capsule_check(Vec3::zeros(), Vec3::new(0.0, 0.0, 0.9), &Capsule::default());
        assert!(result.hit);
        assert_relative_eq!(result.normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }
}
