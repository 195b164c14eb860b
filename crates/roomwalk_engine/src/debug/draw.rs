//! Debug drawing primitives and system
//!
//! Lines, points, spheres, boxes and capsules handed to whatever renderer
//! the host uses. Temporary shapes expire after their duration; persistent
//! shapes stay until removed by id.

use std::collections::HashMap;

use crate::foundation::math::{Vec3, Vec4};
use crate::physics::AABB;

/// Identifier for persistent debug shapes
pub type DebugShapeId = String;

/// Debug shape primitives
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Segment start
        start: Vec3,
        /// Segment end
        end: Vec3,
        /// RGBA color
        color: Vec4,
        /// Seconds left
        duration: f32,
    },

    /// Sphere at center with radius
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
        /// RGBA color
        color: Vec4,
        /// Seconds left
        duration: f32,
    },

    /// Axis-aligned box
    Box {
        /// Box center
        center: Vec3,
        /// Half extents
        extents: Vec3,
        /// RGBA color
        color: Vec4,
        /// Seconds left
        duration: f32,
    },

    /// Capsule between two hemisphere centers
    Capsule {
        /// Lower hemisphere center
        start: Vec3,
        /// Upper hemisphere center
        end: Vec3,
        /// Capsule radius
        radius: f32,
        /// RGBA color
        color: Vec4,
        /// Seconds left
        duration: f32,
    },

    /// Point at position
    Point {
        /// Point position
        position: Vec3,
        /// RGBA color
        color: Vec4,
        /// Point size in pixels
        size: f32,
        /// Seconds left
        duration: f32,
    },
}

impl DebugShape {
    /// Box shape covering `bounds`
    pub fn aabb(bounds: &AABB, color: Vec4) -> Self {
        Self::Box {
            center: bounds.center(),
            extents: bounds.extents(),
            color,
            duration: f32::INFINITY,
        }
    }

    fn duration_mut(&mut self) -> &mut f32 {
        match self {
            Self::Line { duration, .. }
            | Self::Sphere { duration, .. }
            | Self::Box { duration, .. }
            | Self::Capsule { duration, .. }
            | Self::Point { duration, .. } => duration,
        }
    }

    /// Remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            Self::Line { duration, .. }
            | Self::Sphere { duration, .. }
            | Self::Box { duration, .. }
            | Self::Capsule { duration, .. }
            | Self::Point { duration, .. } => *duration,
        }
    }

    /// Shape color
    pub fn color(&self) -> Vec4 {
        match self {
            Self::Line { color, .. }
            | Self::Sphere { color, .. }
            | Self::Box { color, .. }
            | Self::Capsule { color, .. }
            | Self::Point { color, .. } => *color,
        }
    }

    /// Same shape with a new duration
    pub fn with_duration(mut self, new_duration: f32) -> Self {
        *self.duration_mut() = new_duration;
        self
    }

    /// Decrease duration by `delta_time`; true once expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = self.duration_mut();
        *duration -= delta_time;
        *duration <= 0.0
    }
}

/// Collects debug shapes for rendering
#[derive(Debug)]
pub struct DebugDrawSystem {
    temporary_shapes: Vec<DebugShape>,
    persistent_shapes: HashMap<DebugShapeId, DebugShape>,

    /// Master enable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Empty, enabled system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Add a temporary shape
    pub fn draw(&mut self, shape: DebugShape) {
        if self.enabled {
            self.temporary_shapes.push(shape);
        }
    }

    /// Draw a line segment (temporary)
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4, duration: f32) {
        self.draw(DebugShape::Line {
            start,
            end,
            color,
            duration,
        });
    }

    /// Draw a sphere (temporary)
    pub fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec4, duration: f32) {
        self.draw(DebugShape::Sphere {
            center,
            radius,
            color,
            duration,
        });
    }

    /// Draw a box (temporary)
    pub fn draw_box(&mut self, center: Vec3, extents: Vec3, color: Vec4, duration: f32) {
        self.draw(DebugShape::Box {
            center,
            extents,
            color,
            duration,
        });
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec3, color: Vec4, size: f32, duration: f32) {
        self.draw(DebugShape::Point {
            position,
            color,
            size,
            duration,
        });
    }

    /// Draw a shape that stays until removed
    pub fn draw_persistent(&mut self, id: impl Into<DebugShapeId>, shape: DebugShape) {
        if self.enabled {
            self.persistent_shapes.insert(id.into(), shape);
        }
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Remove persistent shapes whose id starts with `prefix`
    pub fn clear_persistent_prefix(&mut self, prefix: &str) {
        self.persistent_shapes.retain(|id, _| !id.starts_with(prefix));
    }

    /// Expire temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if self.enabled {
            self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
        }
    }

    /// Every shape to render this frame
    pub fn get_shapes(&self) -> impl Iterator<Item = &DebugShape> + '_ {
        let enabled = self.enabled;
        self.temporary_shapes
            .iter()
            .chain(self.persistent_shapes.values())
            .filter(move |_| enabled)
    }

    /// Number of stored shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
