//! Doorway portals and trigger containment

use crate::foundation::math::{to_xz, Vec3};
use crate::physics::collision::AABB;

use super::room::{DoorwaySite, WallSide};

/// One doorway of the active room
///
/// The frame volume blocks through the registry's jamb and lintel colliders;
/// the trigger volume is advisory and only reports presence.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorwayPortal {
    /// Position in the room description's doorway list
    pub index: usize,
    /// Site as written in the room description
    pub site: DoorwaySite,
    /// Footprint edge the opening was cut into
    pub edge_index: usize,
    /// Cardinal side closest to the doorway's outward direction
    pub side: WallSide,
    /// Opening width after clamping to the edge
    pub width: f32,
    /// Opening height
    pub height: f32,
    /// Normalized center along the edge after clamping
    pub position: f32,
    /// Floor-level center of the opening on the wall plane
    pub center: Vec3,
    /// Horizontal unit normal pointing out of the room
    pub outward_normal: Vec3,
    /// Solid outline of the jambs and lintel
    pub frame_bounds: AABB,
    /// Passthrough volume straddling the wall plane
    pub trigger_bounds: AABB,
}

impl DoorwayPortal {
    /// Whether `position` is inside the trigger grown by `radius`
    pub fn contains(&self, position: Vec3, radius: f32) -> bool {
        self.trigger_bounds.expanded(radius).contains_point(position)
    }

    /// Signed horizontal distance of `position` past the wall plane
    ///
    /// Positive once the point is on the outside of the room.
    pub fn distance_past_wall(&self, position: Vec3) -> f32 {
        to_xz(position - self.center).dot(&to_xz(self.outward_normal))
    }

    /// Wall the player enters through in the destination room
    pub fn entry_side(&self) -> WallSide {
        self.side.opposite()
    }
}

/// First doorway whose expanded trigger contains `position`
pub fn check_doorway_bounds(
    portals: &[DoorwayPortal],
    position: Vec3,
    radius: f32,
) -> Option<&DoorwayPortal> {
    portals.iter().find(|portal| portal.contains(position, radius))
}

/// Whether any doorway trigger contains `position`
pub fn is_in_doorway(portals: &[DoorwayPortal], position: Vec3, radius: f32) -> bool {
    check_doorway_bounds(portals, position, radius).is_some()
}
