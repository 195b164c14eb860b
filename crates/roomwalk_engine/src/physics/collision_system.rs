//! Collision system
//!
//! Single owner of the active room's geometry and of the collision settings.
//! The navigation layer holds it by `&mut` during a tick; nothing here is
//! global, locked or shared across threads.

use crate::core::config::CollisionConfig;
use crate::foundation::math::Vec3;
use crate::physics::collision::{Capsule, CapsuleCaster, CollisionResult, RenderableProbe};
use crate::physics::geometry::{
    check_doorway_bounds, ColliderSnapshot, DoorwayPortal, GeometryRegistry, RoomDescription,
};
use crate::physics::movement::{
    attempt_step, breathing_wall_push_out, detect_ground, slide_along_surface, snap_to_ground, test_movement, GroundInfo,
    MovementTest, StepResult,
};

/// Collision core facade
pub struct CollisionSystem {
    registry: GeometryRegistry,
    config: CollisionConfig,
    renderables: Option<Box<dyn RenderableProbe>>,

    /// Enable debug mode
    pub debug_enabled: bool,
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

impl CollisionSystem {
    /// Empty system; call [`Self::set_room`] before moving anything
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            registry: GeometryRegistry::new(config.room),
            config,
            renderables: None,
            debug_enabled: false,
        }
    }

    /// Active settings
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// The player capsule
    pub fn capsule(&self) -> &Capsule {
        &self.config.capsule
    }

    /// Read access to the geometry
    pub fn registry(&self) -> &GeometryRegistry {
        &self.registry
    }

    /// Write access for room dressing
    pub fn registry_mut(&mut self) -> &mut GeometryRegistry {
        &mut self.registry
    }

    /// Rebuild the geometry for `room`
    pub fn set_room(&mut self, room: &RoomDescription) {
        self.registry.set_room(room);
    }

    /// Move a breathing wall; unknown ids are ignored
    pub fn update_breathing_wall(&mut self, id: &str, offset: f32) {
        self.registry.update_breathing_wall(id, offset);
    }

    /// Drop all geometry
    pub fn clear(&mut self) {
        self.registry.clear();
    }

    /// Install a mesh-accurate probe for renderable objects
    pub fn set_renderable_probe(&mut self, probe: Box<dyn RenderableProbe>) {
        self.renderables = Some(probe);
    }

    /// Go back to box-only casts
    pub fn clear_renderable_probe(&mut self) {
        self.renderables = None;
    }

    /// Caster over the current geometry with the configured renderable policy
    pub fn caster(&self) -> CapsuleCaster<'_> {
        let caster = CapsuleCaster::new(&self.registry);
        match self.renderables.as_deref() {
            Some(probe) => caster.with_renderables(probe, self.config.cast.renderable_priority),
            None => caster,
        }
    }

    /// Nearest hit along a ray
    pub fn sphere_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> CollisionResult {
        self.caster().sphere_cast(origin, direction, max_distance)
    }

    /// Seven-ray capsule sweep between two poses
    pub fn multi_ray_capsule_check(&self, start: Vec3, end: Vec3) -> CollisionResult {
        self.caster()
            .multi_ray_capsule_check(start, end, &self.config.capsule)
    }

    /// Ground under `pose`
    pub fn detect_ground(&self, pose: Vec3) -> GroundInfo {
        detect_ground(&self.caster(), pose, &self.config.capsule, &self.config.solver)
    }

    /// Try to climb a blocking ledge
    pub fn attempt_step(&self, start: Vec3, end: Vec3) -> StepResult {
        attempt_step(&self.caster(), start, end, &self.config.capsule, &self.config.solver)
    }

    /// Project blocked movement along the surface with normal `normal`
    pub fn slide_along_surface(&self, start: Vec3, movement: Vec3, normal: Vec3) -> Vec3 {
        slide_along_surface(
            &self.caster(),
            start,
            movement,
            normal,
            &self.config.capsule,
            &self.config.solver,
        )
    }

    /// Ground, doorway, cast and push-out for one tick
    pub fn test_movement(&self, start: Vec3, end: Vec3) -> MovementTest {
        test_movement(
            &self.caster(),
            start,
            end,
            &self.config.capsule,
            &self.config.solver,
            &self.config.cast,
        )
    }

    /// Correction out of breathing walls overlapping the capsule at `pose`
    pub fn breathing_push_out(&self, pose: Vec3) -> Vec3 {
        breathing_wall_push_out(&self.registry, pose, &self.config.capsule, self.config.cast.push_out_margin)
    }

    /// Pose settled onto the floor within step height above or below
    pub fn snap_to_ground(&self, pose: Vec3) -> Option<Vec3> {
        let step = self.config.solver.max_step_height;
        snap_to_ground(&self.caster(), pose, &self.config.capsule, step, step)
    }

    /// First doorway whose trigger grown by `radius` holds `position`
    pub fn check_doorway_bounds(&self, position: Vec3, radius: f32) -> Option<&DoorwayPortal> {
        check_doorway_bounds(self.registry.portals(), position, radius)
    }

    /// Whether `position` is inside any doorway trigger
    pub fn is_in_doorway(&self, position: Vec3, radius: f32) -> bool {
        self.check_doorway_bounds(position, radius).is_some()
    }

    /// Keep `pose` `margin` inside a polygon footprint
    ///
    /// Rectangular rooms are confined by their walls alone and come back
    /// unchanged.
    pub fn clamp_to_room(&self, pose: Vec3, margin: f32) -> Vec3 {
        match self.registry.polygon() {
            Some(polygon) => {
                let (x, z) = polygon.clamp_to_room(pose.x, pose.z, margin);
                Vec3::new(x, pose.y, z)
            }
            None => pose,
        }
    }

    /// Every collider's layer and bounds
    pub fn snapshot(&self) -> Vec<ColliderSnapshot> {
        self.registry.snapshot()
    }
}
