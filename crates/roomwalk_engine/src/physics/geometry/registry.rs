//! Geometry registry
//!
//! Owns every collidable volume of the active room. The whole set is thrown
//! away and rebuilt by [`GeometryRegistry::set_room`] whenever the room
//! changes; between rebuilds room dressing appends furniture, art and
//! breathing walls.

use slotmap::{new_key_type, SlotMap};

use crate::core::config::RoomBuildConfig;
use crate::foundation::math::{constants::EPSILON, from_xz, Vec3};
use crate::physics::collision::AABB;
use crate::physics::collision_layers::{ColliderLayer, LayerMask};

use super::builder::build_shell;
use super::polygon::RoomPolygon;
use super::portal::DoorwayPortal;
use super::room::RoomDescription;

new_key_type! {
    /// Generational handle to one registry entry
    pub struct ColliderKey;
}

/// Opaque handle to a render-side object backing a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableRef(pub u64);

/// One collidable volume
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Caller-chosen id; not required to be unique
    pub id: String,
    /// Layer tag
    pub layer: ColliderLayer,
    /// World bounds
    pub bounds: AABB,
    /// Render object this collider stands in for
    pub renderable: Option<RenderableRef>,
    /// Disabled colliders are skipped by every query
    pub enabled: bool,
}

/// Moving wall state
///
/// `bounds` always equals the original extents centered at
/// `base_position + direction * offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct BreathingWallState {
    /// Id shared with the dynamic collider
    pub id: String,
    /// Dynamic collider driven by this state
    pub key: ColliderKey,
    /// Center at zero offset
    pub base_position: Vec3,
    /// Unit breathe direction (zero when none was usable)
    pub direction: Vec3,
    /// Current offset along `direction`
    pub offset: f32,
    /// Half size, fixed at registration
    pub extents: Vec3,
    /// Derived bounds
    pub bounds: AABB,
}

impl BreathingWallState {
    fn new(id: String, key: ColliderKey, bounds: AABB, direction: Vec3) -> Self {
        let length = direction.norm();
        let direction = if length > EPSILON {
            direction / length
        } else {
            log::warn!("Breathing wall '{id}' has no usable direction; it will not move");
            Vec3::zeros()
        };
        Self {
            id,
            key,
            base_position: bounds.center(),
            direction,
            offset: 0.0,
            extents: bounds.extents(),
            bounds,
        }
    }

    fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
        self.bounds =
            AABB::from_center_extents(self.base_position + self.direction * offset, self.extents);
    }
}

/// Read-only view of one collider for debug drawing
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderSnapshot {
    /// Registry key
    pub key: ColliderKey,
    /// Collider id
    pub id: String,
    /// Layer tag
    pub layer: ColliderLayer,
    /// World bounds
    pub bounds: AABB,
    /// Enabled flag
    pub enabled: bool,
}

/// All collidable volumes of the active room
#[derive(Debug, Default)]
pub struct GeometryRegistry {
    colliders: SlotMap<ColliderKey, Collider>,
    breathing_walls: Vec<BreathingWallState>,
    portals: Vec<DoorwayPortal>,
    footprint: Option<RoomPolygon>,
    polygonal: bool,
    room_bounds: Option<AABB>,
    build: RoomBuildConfig,
}

impl GeometryRegistry {
    /// Empty registry using the given shell dimensions
    pub fn new(build: RoomBuildConfig) -> Self {
        Self {
            build,
            ..Self::default()
        }
    }

    /// Replace everything with the shell of `room`
    pub fn set_room(&mut self, room: &RoomDescription) {
        self.clear();

        let polygon = room.polygon.as_ref().and_then(|vertices| {
            let polygon = RoomPolygon::new(vertices.clone());
            if polygon.is_none() {
                log::warn!(
                    "Room polygon with {} vertices is degenerate, using a {}x{} rectangle",
                    vertices.len(),
                    room.width,
                    room.depth
                );
            }
            polygon
        });
        self.polygonal = polygon.is_some();
        let footprint = polygon.unwrap_or_else(|| RoomPolygon::rectangle(room.width, room.depth));

        let (lo, hi) = footprint.bounds();
        self.room_bounds = Some(AABB::new(from_xz(lo, 0.0), from_xz(hi, room.height.max(0.0))));

        let shell = build_shell(room, &footprint, &self.build);
        for collider in shell.colliders {
            self.insert(collider.id, ColliderLayer::Static, collider.bounds, None);
        }
        self.portals = shell.portals;
        self.footprint = Some(footprint);

        log::debug!(
            "Room rebuilt: {} static colliders, {} doorways, polygonal = {}",
            self.colliders.len(),
            self.portals.len(),
            self.polygonal
        );
    }

    fn insert(
        &mut self,
        id: impl Into<String>,
        layer: ColliderLayer,
        bounds: AABB,
        renderable: Option<RenderableRef>,
    ) -> ColliderKey {
        self.colliders.insert(Collider {
            id: id.into(),
            layer,
            bounds,
            renderable,
            enabled: true,
        })
    }

    /// Append a static collider
    pub fn add_static_collider(&mut self, id: impl Into<String>, bounds: AABB) -> ColliderKey {
        self.insert(id, ColliderLayer::Static, bounds, None)
    }

    /// Append a furniture collider
    pub fn add_furniture_collider(
        &mut self,
        id: impl Into<String>,
        bounds: AABB,
        renderable: Option<RenderableRef>,
    ) -> ColliderKey {
        let id = id.into();
        log::debug!("Furniture '{id}' added");
        self.insert(id, ColliderLayer::Furniture, bounds, renderable)
    }

    /// Append an art collider
    pub fn add_art_collider(
        &mut self,
        id: impl Into<String>,
        bounds: AABB,
        renderable: Option<RenderableRef>,
    ) -> ColliderKey {
        let id = id.into();
        log::debug!("Art '{id}' added");
        self.insert(id, ColliderLayer::Art, bounds, renderable)
    }

    /// Append a trigger volume; triggers never block
    pub fn add_trigger_collider(&mut self, id: impl Into<String>, bounds: AABB) -> ColliderKey {
        self.insert(id, ColliderLayer::Trigger, bounds, None)
    }

    /// Append a dynamic wall that moves along `direction`
    pub fn add_breathing_wall(
        &mut self,
        id: impl Into<String>,
        bounds: AABB,
        direction: Vec3,
        renderable: Option<RenderableRef>,
    ) -> ColliderKey {
        let id = id.into();
        let key = self.insert(id.clone(), ColliderLayer::Dynamic, bounds, renderable);
        log::debug!("Breathing wall '{id}' added");
        self.breathing_walls
            .push(BreathingWallState::new(id, key, bounds, direction));
        key
    }

    /// Move every breathing wall named `id` to `offset` along its direction
    ///
    /// Unknown ids are ignored.
    pub fn update_breathing_wall(&mut self, id: &str, offset: f32) {
        let mut found = false;
        for wall in self.breathing_walls.iter_mut().filter(|w| w.id == id) {
            found = true;
            wall.set_offset(offset);
            if let Some(collider) = self.colliders.get_mut(wall.key) {
                collider.bounds = wall.bounds;
            }
        }
        if !found {
            log::trace!("update_breathing_wall: unknown id '{id}'");
        }
    }

    /// Drop every collider, portal and the footprint
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.breathing_walls.clear();
        self.portals.clear();
        self.footprint = None;
        self.polygonal = false;
        self.room_bounds = None;
    }

    /// Remove one entry; returns it when the key was live
    pub fn remove_collider(&mut self, key: ColliderKey) -> Option<Collider> {
        let removed = self.colliders.remove(key);
        if removed.is_some() {
            self.breathing_walls.retain(|w| w.key != key);
        } else {
            log::trace!("remove_collider: stale key {key:?}");
        }
        removed
    }

    /// Enable or disable one entry; returns whether the key was live
    pub fn set_collider_enabled(&mut self, key: ColliderKey, enabled: bool) -> bool {
        match self.colliders.get_mut(key) {
            Some(collider) => {
                collider.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Look up one entry
    pub fn collider(&self, key: ColliderKey) -> Option<&Collider> {
        self.colliders.get(key)
    }

    /// Entries on one layer
    pub fn colliders(&self, layer: ColliderLayer) -> impl Iterator<Item = (ColliderKey, &Collider)> {
        self.colliders.iter().filter(move |(_, c)| c.layer == layer)
    }

    /// Enabled entries whose layer passes `mask`
    pub fn query(&self, mask: LayerMask) -> impl Iterator<Item = (ColliderKey, &Collider)> {
        self.colliders
            .iter()
            .filter(move |(_, c)| c.enabled && mask.includes(c.layer))
    }

    /// Number of entries across all layers
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the registry holds nothing
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// First breathing wall named `id`
    pub fn breathing_wall(&self, id: &str) -> Option<&BreathingWallState> {
        self.breathing_walls.iter().find(|w| w.id == id)
    }

    /// All breathing walls
    pub fn breathing_walls(&self) -> &[BreathingWallState] {
        &self.breathing_walls
    }

    /// Doorways of the active room
    pub fn portals(&self) -> &[DoorwayPortal] {
        &self.portals
    }

    /// Footprint of the active room (a rectangle for rectangular rooms)
    pub fn footprint(&self) -> Option<&RoomPolygon> {
        self.footprint.as_ref()
    }

    /// Footprint only when the room was described by a polygon
    pub fn polygon(&self) -> Option<&RoomPolygon> {
        self.footprint.as_ref().filter(|_| self.polygonal)
    }

    /// Interior bounds of the active room
    pub fn room_bounds(&self) -> Option<AABB> {
        self.room_bounds
    }

    /// Shell dimensions used by [`Self::set_room`]
    pub fn build_config(&self) -> &RoomBuildConfig {
        &self.build
    }

    /// Every entry grouped by layer, for debug views
    pub fn snapshot(&self) -> Vec<ColliderSnapshot> {
        ColliderLayer::ALL
            .iter()
            .flat_map(|&layer| self.colliders(layer))
            .map(|(key, c)| ColliderSnapshot {
                key,
                id: c.id.clone(),
                layer: c.layer,
                bounds: c.bounds,
                enabled: c.enabled,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::geometry::room::{DoorwayPlacement, WallSide};
    use approx::assert_relative_eq;

    fn unit_box_at(center: Vec3) -> AABB {
        AABB::from_center_extents(center, Vec3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_set_room_replaces_everything() {
        let mut registry = GeometryRegistry::default();
        registry.add_furniture_collider("sofa", unit_box_at(Vec3::new(1.0, 0.5, 1.0)), None);
        registry.add_breathing_wall("lung", unit_box_at(Vec3::zeros()), Vec3::x(), None);

        let room = RoomDescription::rectangular(10.0, 3.0, 10.0)
            .with_doorway(DoorwayPlacement::on_wall(WallSide::North, 1.2, 2.2));
        registry.set_room(&room);

        assert_eq!(registry.colliders(ColliderLayer::Furniture).count(), 0);
        assert!(registry.breathing_walls().is_empty());
        assert_eq!(registry.portals().len(), 1);
        assert!(registry.polygon().is_none());
        assert_eq!(registry.footprint().map(RoomPolygon::edge_count), Some(4));
        assert!(registry.colliders(ColliderLayer::Static).count() > 6);
    }

    #[test]
    fn test_duplicate_ids_append() {
        let mut registry = GeometryRegistry::default();
        let a = registry.add_art_collider("frame", unit_box_at(Vec3::zeros()), None);
        let b = registry.add_art_collider("frame", unit_box_at(Vec3::x()), Some(RenderableRef(7)));
        assert_ne!(a, b);
        assert_eq!(registry.colliders(ColliderLayer::Art).count(), 2);
        assert_eq!(registry.collider(b).and_then(|c| c.renderable), Some(RenderableRef(7)));
    }

    #[test]
    fn test_breathing_wall_offset_moves_center() {
        let mut registry = GeometryRegistry::default();
        let bounds = AABB::new(Vec3::new(2.0, 0.0, -1.0), Vec3::new(2.4, 3.0, 1.0));
        let key = registry.add_breathing_wall("lung", bounds, Vec3::new(1.0, 0.0, 0.0), None);

        registry.update_breathing_wall("lung", 0.5);

        let moved = registry.collider(key).unwrap().bounds;
        assert_relative_eq!(moved.center(), bounds.center() + Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(moved.size(), bounds.size(), epsilon = 1e-6);
        assert_eq!(registry.breathing_wall("lung").unwrap().bounds, moved);
    }

    #[test]
    fn test_breathing_wall_direction_is_normalized() {
        let mut registry = GeometryRegistry::default();
        let bounds = unit_box_at(Vec3::zeros());
        registry.add_breathing_wall("lung", bounds, Vec3::new(0.0, 0.0, 4.0), None);
        registry.update_breathing_wall("lung", 0.25);
        assert_relative_eq!(
            registry.breathing_wall("lung").unwrap().bounds.center(),
            Vec3::new(0.0, 0.0, 0.25),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_unknown_breathing_wall_is_ignored() {
        let mut registry = GeometryRegistry::default();
        let bounds = unit_box_at(Vec3::zeros());
        registry.add_breathing_wall("lung", bounds, Vec3::x(), None);
        registry.update_breathing_wall("nope", 3.0);
        assert_eq!(registry.breathing_wall("lung").unwrap().bounds, bounds);
    }

    #[test]
    fn test_degenerate_polygon_falls_back_to_rectangle() {
        let mut registry = GeometryRegistry::default();
        let mut room = RoomDescription::rectangular(6.0, 3.0, 4.0);
        room.polygon = Some(vec![Vec2::zeros(), Vec2::new(1.0, 1.0)]);
        registry.set_room(&room);

        assert!(registry.polygon().is_none());
        let bounds = registry.room_bounds().unwrap();
        assert_relative_eq!(bounds.size(), Vec3::new(6.0, 3.0, 4.0), epsilon = 1e-6);
    }

    #[test]
    fn test_polygon_room_keeps_centroid() {
        let mut registry = GeometryRegistry::default();
        let room = RoomDescription::polygonal(
            vec![Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.0), Vec2::new(3.0, 6.0)],
            3.0,
        );
        registry.set_room(&room);
        let polygon = registry.polygon().unwrap();
        assert_relative_eq!(polygon.centroid(), Vec2::new(3.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_disabled_and_trigger_colliders_skip_queries() {
        let mut registry = GeometryRegistry::default();
        let a = registry.add_static_collider("a", unit_box_at(Vec3::zeros()));
        registry.add_trigger_collider("t", unit_box_at(Vec3::zeros()));
        assert_eq!(registry.query(LayerMask::SOLID).count(), 1);

        assert!(registry.set_collider_enabled(a, false));
        assert_eq!(registry.query(LayerMask::SOLID).count(), 0);
        assert_eq!(registry.query(LayerMask::all()).count(), 1);
    }

    #[test]
    fn test_removed_key_goes_stale_after_clear() {
        let mut registry = GeometryRegistry::default();
        let key = registry.add_static_collider("a", unit_box_at(Vec3::zeros()));
        registry.clear();
        registry.add_static_collider("b", unit_box_at(Vec3::zeros()));
        assert!(registry.collider(key).is_none());
        assert!(registry.remove_collider(key).is_none());
        assert!(!registry.set_collider_enabled(key, false));
    }

    #[test]
    fn test_snapshot_groups_by_layer() {
        let mut registry = GeometryRegistry::default();
        registry.add_art_collider("painting", unit_box_at(Vec3::zeros()), None);
        registry.add_static_collider("pillar", unit_box_at(Vec3::x()));
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].layer, ColliderLayer::Static);
        assert_eq!(snapshot[1].id, "painting");
    }
}
