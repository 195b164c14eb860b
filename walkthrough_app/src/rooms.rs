//! Seeded room generation and dressing for the walkthrough demo

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use roomwalk_engine::foundation::math::{Vec2, Vec3};
use roomwalk_engine::physics::geometry::{DoorwayPlacement, GeometryRegistry, RoomDescription, WallSide};
use roomwalk_engine::physics::AABB;

const DOOR_WIDTH: f32 = 1.2;
const DOOR_HEIGHT: f32 = 2.2;
const CORNER_INSET: f32 = 0.8;
const PANEL_THICKNESS: f32 = 0.2;

/// A generated room and the wall the walker should leave through
#[derive(Debug, Clone)]
pub struct GeneratedRoom {
    pub description: RoomDescription,
    pub entry: Option<WallSide>,
    pub exit: WallSide,
    pub breathing: Option<WallSide>,
}

impl GeneratedRoom {
    fn has_doorway(&self, side: WallSide) -> bool {
        self.exit == side || self.entry == Some(side)
    }
}

/// Deterministic room source
pub struct RoomGenerator {
    rng: StdRng,
    count: usize,
}

impl RoomGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            count: 0,
        }
    }

    /// Next room, with a doorway on `entry` when arriving from another room
    pub fn next_room(&mut self, entry: Option<WallSide>) -> GeneratedRoom {
        self.count += 1;
        let width = self.rng.gen_range(7.0..14.0_f32).round();
        let depth = self.rng.gen_range(7.0..14.0_f32).round();
        let height = self.rng.gen_range(2.8..4.0_f32);

        let candidates: Vec<WallSide> = WallSide::ALL
            .into_iter()
            .filter(|side| Some(*side) != entry)
            .collect();
        let exit = candidates[self.rng.gen_range(0..candidates.len())];

        // Every third room gets chamfered corners
        let mut description = if self.count % 3 == 0 {
            RoomDescription::polygonal(chamfered(width, depth, 1.0), height)
        } else {
            RoomDescription::rectangular(width, height, depth)
        };

        let position = self.rng.gen_range(0.35..0.65);
        description = description.with_doorway(
            DoorwayPlacement::on_wall(exit, DOOR_WIDTH, DOOR_HEIGHT).with_position(position),
        );
        if let Some(entry) = entry {
            description = description.with_doorway(DoorwayPlacement::on_wall(entry, DOOR_WIDTH, DOOR_HEIGHT));
        }

        let breathing = WallSide::ALL
            .into_iter()
            .find(|side| *side != exit && Some(*side) != entry)
            .filter(|_| self.rng.gen_bool(0.5));

        GeneratedRoom {
            description,
            entry,
            exit,
            breathing,
        }
    }

    /// Furniture in the corners and the optional breathing panel
    pub fn dress(&mut self, room: &GeneratedRoom, registry: &mut GeometryRegistry) {
        let (hw, hd) = (room.description.width * 0.5, room.description.depth * 0.5);
        let chamfer = if room.description.polygon.is_some() { 1.0 } else { 0.0 };
        let reach = CORNER_INSET + chamfer;

        for (i, (sx, sz)) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].into_iter().enumerate() {
            let x_wall = if sx < 0.0 { WallSide::West } else { WallSide::East };
            let z_wall = if sz < 0.0 { WallSide::North } else { WallSide::South };
            // Keep the corner between two doorways open for the walk line
            if (room.has_doorway(x_wall) && room.has_doorway(z_wall)) || !self.rng.gen_bool(0.6) {
                continue;
            }
            let size = Vec3::new(
                self.rng.gen_range(0.5..1.0),
                self.rng.gen_range(0.1..1.2),
                self.rng.gen_range(0.5..1.0),
            );
            let center = Vec3::new(sx * (hw - reach - size.x * 0.5), size.y * 0.5, sz * (hd - reach - size.z * 0.5));
            registry.add_furniture_collider(
                format!("furniture-{i}"),
                AABB::from_center_extents(center, size * 0.5),
                None,
            );
        }

        if let Some(side) = room.breathing {
            let normal = side.outward_normal();
            let along = Vec3::new(normal.z.abs(), 0.0, normal.x.abs());
            let (span, wall_distance) = if along.x > 0.5 { (hw, hd) } else { (hd, hw) };
            let half_span = (span - 1.5).max(0.5);
            let center = normal * (wall_distance - PANEL_THICKNESS * 0.5)
                + Vec3::new(0.0, room.description.height * 0.5, 0.0);
            let extents = along * half_span
                + normal.abs() * (PANEL_THICKNESS * 0.5)
                + Vec3::new(0.0, room.description.height * 0.5, 0.0);
            registry.add_breathing_wall("panel", AABB::from_center_extents(center, extents), -normal, None);
        }
    }
}

/// Rectangle with its corners cut at 45 degrees
fn chamfered(width: f32, depth: f32, cut: f32) -> Vec<Vec2> {
    let (hw, hd) = (width * 0.5, depth * 0.5);
    vec![
        Vec2::new(-hw + cut, -hd),
        Vec2::new(hw - cut, -hd),
        Vec2::new(hw, -hd + cut),
        Vec2::new(hw, hd - cut),
        Vec2::new(hw - cut, hd),
        Vec2::new(-hw + cut, hd),
        Vec2::new(-hw, hd - cut),
        Vec2::new(-hw, -hd + cut),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooms_are_deterministic_per_seed() {
        let mut a = RoomGenerator::new(7);
        let mut b = RoomGenerator::new(7);
        for _ in 0..5 {
            let (ra, rb) = (a.next_room(Some(WallSide::South)), b.next_room(Some(WallSide::South)));
            assert_eq!(ra.description, rb.description);
            assert_eq!(ra.exit, rb.exit);
        }
    }

    #[test]
    fn test_exit_never_on_entry_wall() {
        let mut generator = RoomGenerator::new(11);
        for _ in 0..20 {
            let room = generator.next_room(Some(WallSide::West));
            assert_ne!(room.exit, WallSide::West);
            assert_eq!(room.description.doorways.len(), 2);
        }
    }

    #[test]
    fn test_dressing_keeps_center_clear() {
        let mut generator = RoomGenerator::new(3);
        for _ in 0..6 {
            let room = generator.next_room(None);
            let mut registry = GeometryRegistry::default();
            registry.set_room(&room.description);
            generator.dress(&room, &mut registry);
            for (_, collider) in registry.query(roomwalk_engine::physics::LayerMask::FURNITURE) {
                assert!(!collider.bounds.expanded(0.5).contains_point(Vec3::new(0.0, 0.5, 0.0)));
            }
        }
    }
}
