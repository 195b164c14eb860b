//! Physics module for collision detection and response
//!
//! Capsule-versus-box movement against the active room: the geometry
//! registry, ray-based capsule casts, and the ground/step/slide solver.

pub mod collision;
pub mod collision_layers;
pub mod collision_system;
pub mod geometry;
pub mod movement;

#[cfg(test)]
mod tests;

pub use collision::{Capsule, CapsuleCaster, CollisionResult, HitTarget, Ray, RenderableProbe, AABB};
pub use collision_layers::{ColliderLayer, LayerMask};
pub use collision_system::CollisionSystem;
pub use geometry::{
    ColliderKey, DoorwayPlacement, DoorwayPortal, DoorwaySite, GeometryRegistry, RoomDescription,
    RoomPolygon, WallSide,
};
pub use movement::{GroundInfo, MovementTest, StepResult};
