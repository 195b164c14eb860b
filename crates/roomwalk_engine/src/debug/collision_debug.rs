//! Collision-specific debug visualization
//!
//! Colliders by layer, doorway triggers, the player capsule and the last
//! movement cast.

use crate::debug::draw::{DebugDrawSystem, DebugShape};
use crate::foundation::math::{up, Vec3, Vec4};
use crate::physics::geometry::{ColliderSnapshot, DoorwayPortal};
use crate::physics::{Capsule, ColliderLayer, CollisionResult, CollisionSystem};

const COLLIDER_PREFIX: &str = "collider/";
const PORTAL_PREFIX: &str = "portal/";

/// Length of the drawn hit normal
const NORMAL_LENGTH: f32 = 0.25;

/// Color scheme for collision visualization
#[derive(Clone, Debug)]
pub struct CollisionDebugColors {
    /// Room shell
    pub static_layer: Vec4,
    /// Breathing walls
    pub dynamic_layer: Vec4,
    /// Furniture
    pub furniture_layer: Vec4,
    /// Art objects
    pub art_layer: Vec4,
    /// Trigger colliders and doorway triggers
    pub trigger_layer: Vec4,
    /// Capsule while moving freely
    pub capsule_clear: Vec4,
    /// Capsule after a blocked move
    pub capsule_blocked: Vec4,
    /// Cast rays and contacts
    pub cast: Vec4,
}

impl CollisionDebugColors {
    /// Color for a collider layer
    pub fn for_layer(&self, layer: ColliderLayer) -> Vec4 {
        match layer {
            ColliderLayer::Static => self.static_layer,
            ColliderLayer::Dynamic => self.dynamic_layer,
            ColliderLayer::Furniture => self.furniture_layer,
            ColliderLayer::Art => self.art_layer,
            ColliderLayer::Trigger => self.trigger_layer,
        }
    }
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            static_layer: Vec4::new(0.6, 0.6, 0.6, 0.2),    // Grey
            dynamic_layer: Vec4::new(1.0, 0.5, 0.0, 0.4),   // Orange
            furniture_layer: Vec4::new(0.0, 1.0, 0.0, 0.3), // Green
            art_layer: Vec4::new(1.0, 0.0, 1.0, 0.3),       // Magenta
            trigger_layer: Vec4::new(0.0, 1.0, 1.0, 0.2),   // Cyan
            capsule_clear: Vec4::new(0.0, 0.6, 1.0, 0.5),
            capsule_blocked: Vec4::new(1.0, 0.0, 0.0, 0.5),
            cast: Vec4::new(1.0, 1.0, 0.0, 1.0),
        }
    }
}

/// Draws the collision state of the active room
#[derive(Debug)]
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: CollisionDebugColors,

    /// Show collider boxes
    pub show_colliders: bool,

    /// Show doorway triggers
    pub show_portals: bool,

    /// Show the player capsule and casts
    pub show_player: bool,
}

impl CollisionDebugVisualizer {
    /// Visualizer with every overlay on
    pub fn new() -> Self {
        Self {
            debug_draw: DebugDrawSystem::new(),
            colors: CollisionDebugColors::default(),
            show_colliders: true,
            show_portals: true,
            show_player: true,
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Redraw colliders and doorway triggers from `system`
    ///
    /// Does nothing unless the system has debug drawing switched on.
    pub fn sync(&mut self, system: &CollisionSystem) {
        if !system.debug_enabled {
            return;
        }
        self.draw_colliders(&system.snapshot());
        self.draw_portals(system.registry().portals());
    }

    /// Replace the collider boxes with `snapshot`
    pub fn draw_colliders(&mut self, snapshot: &[ColliderSnapshot]) {
        self.debug_draw.clear_persistent_prefix(COLLIDER_PREFIX);
        if !self.show_colliders {
            return;
        }
        for (i, collider) in snapshot.iter().filter(|c| c.enabled).enumerate() {
            let color = self.colors.for_layer(collider.layer);
            self.debug_draw.draw_persistent(
                format!("{COLLIDER_PREFIX}{i}/{}", collider.id),
                DebugShape::aabb(&collider.bounds, color),
            );
        }
    }

    /// Replace the doorway trigger boxes
    pub fn draw_portals(&mut self, portals: &[DoorwayPortal]) {
        self.debug_draw.clear_persistent_prefix(PORTAL_PREFIX);
        if !self.show_portals {
            return;
        }
        for portal in portals {
            self.debug_draw.draw_persistent(
                format!("{PORTAL_PREFIX}{}", portal.index),
                DebugShape::aabb(&portal.trigger_bounds, self.colors.trigger_layer),
            );
        }
    }

    /// Draw the capsule at `pose` for one frame
    pub fn draw_capsule(&mut self, pose: Vec3, capsule: &Capsule, blocked: bool) {
        if !self.show_player {
            return;
        }
        let color = if blocked {
            self.colors.capsule_blocked
        } else {
            self.colors.capsule_clear
        };
        let center = capsule.center(pose);
        let half = up() * capsule.half_segment();
        self.debug_draw.draw(DebugShape::Capsule {
            start: center - half,
            end: center + half,
            radius: capsule.radius,
            color,
            duration: 0.0,
        });
    }

    /// Draw a cast from `origin` and its contact, if any, for one frame
    pub fn draw_cast(&mut self, origin: Vec3, result: &CollisionResult) {
        if !self.show_player {
            return;
        }
        let color = self.colors.cast;
        self.debug_draw.draw_line(origin, result.point, color, 0.0);
        if result.hit {
            self.debug_draw.draw_point(result.point, color, 6.0, 0.0);
            self.debug_draw
                .draw_line(result.point, result.point + result.normal * NORMAL_LENGTH, color, 0.0);
        }
    }

    /// Clear all visualization
    pub fn clear(&mut self) {
        self.debug_draw.clear();
    }

    /// Expire one-frame shapes
    pub fn update(&mut self, delta_time: f32) {
        self.debug_draw.update(delta_time);
    }

    /// All debug shapes for rendering
    pub fn get_shapes(&self) -> impl Iterator<Item = &DebugShape> + '_ {
        self.debug_draw.get_shapes()
    }

    /// Enable or disable the whole overlay
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Whether the overlay is on
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }

    /// Underlying draw system
    pub fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug_draw
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::geometry::{DoorwayPlacement, RoomDescription, WallSide};

    fn debug_room() -> CollisionSystem {
        let mut system = CollisionSystem::default();
        system.set_room(
            &RoomDescription::rectangular(10.0, 3.0, 10.0)
                .with_doorway(DoorwayPlacement::on_wall(WallSide::North, 1.2, 2.2)),
        );
        system.debug_enabled = true;
        system
    }

    #[test]
    fn test_sync_draws_colliders_and_portals() {
        let system = debug_room();
        let mut viz = CollisionDebugVisualizer::new();
        viz.sync(&system);

        let expected = system.snapshot().len() + system.registry().portals().len();
        assert_eq!(viz.get_shapes().count(), expected);

        // Resync replaces rather than accumulates
        viz.sync(&system);
        assert_eq!(viz.get_shapes().count(), expected);
    }

    #[test]
    fn test_sync_skipped_without_debug_flag() {
        let mut system = debug_room();
        system.debug_enabled = false;
        let mut viz = CollisionDebugVisualizer::new();
        viz.sync(&system);
        assert_eq!(viz.get_shapes().count(), 0);
    }

    #[test]
    fn test_layer_colors() {
        let system = debug_room();
        let mut viz = CollisionDebugVisualizer::new();
        viz.show_portals = false;
        viz.sync(&system);
        let grey = CollisionDebugColors::default().static_layer;
        assert!(viz.get_shapes().all(|shape| shape.color() == grey));
    }

    #[test]
    fn test_player_shapes_last_one_frame() {
        let system = debug_room();
        let mut viz = CollisionDebugVisualizer::new();
        let pose = Vec3::zeros();
        let result = system.multi_ray_capsule_check(pose, Vec3::new(9.0, 0.0, 0.0));
        assert!(result.hit);

        viz.draw_capsule(pose, system.capsule(), result.hit);
        viz.draw_cast(system.capsule().center(pose), &result);
        assert_eq!(viz.get_shapes().count(), 4);

        viz.update(0.016);
        assert_eq!(viz.get_shapes().count(), 0);
    }
}
