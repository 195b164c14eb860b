//! Room geometry
//!
//! The registry of collidable volumes for the active room, the shell builder
//! that fills it from a [`RoomDescription`], footprint polygon helpers and
//! doorway trigger checks.

pub mod builder;
pub mod polygon;
pub mod portal;
pub mod registry;
pub mod room;

pub use builder::{build_shell, ShellCollider, ShellGeometry};
pub use polygon::{
    clamp_to_polygon, closest_edge, closest_point_on_segment, point_in_polygon, polygon_centroid,
    signed_distance_to_polygon, EdgeHit, RoomPolygon,
};
pub use portal::{check_doorway_bounds, is_in_doorway, DoorwayPortal};
pub use registry::{
    BreathingWallState, Collider, ColliderKey, ColliderSnapshot, GeometryRegistry, RenderableRef,
};
pub use room::{DoorwayPlacement, DoorwaySite, RoomDescription, WallSide};
