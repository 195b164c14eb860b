//! Debug visualization for the collision layer

pub mod collision_debug;
pub mod draw;

pub use collision_debug::{CollisionDebugColors, CollisionDebugVisualizer};
pub use draw::{DebugDrawSystem, DebugShape, DebugShapeId};
