//! Walking at a doorway in a 10 x 3 x 10 room

#[cfg(test)]
mod tests {
    use super::super::walk_until_blocked;
    use crate::foundation::math::Vec3;
    use crate::physics::{CollisionSystem, DoorwayPlacement, RoomDescription, WallSide};

    const TICK: f32 = 0.05;

    fn north_door_room() -> CollisionSystem {
        let mut system = CollisionSystem::default();
        system.set_room(
            &RoomDescription::rectangular(10.0, 3.0, 10.0)
                .with_doorway(DoorwayPlacement::on_wall(WallSide::North, 1.2, 2.2)),
        );
        system
    }

    #[test]
    fn test_center_approach_passes_through() {
        let system = north_door_room();
        let end = walk_until_blocked(&system, Vec3::zeros(), Vec3::new(0.0, 0.0, -TICK), 130);
        assert!(end.z < -5.5, "stopped at {end:?}");
    }

    #[test]
    fn test_center_approach_enters_trigger() {
        let system = north_door_room();
        let radius = system.capsule().radius;
        let mut pose = Vec3::zeros();
        let mut entered = false;
        for _ in 0..110 {
            pose.z -= TICK;
            entered |= system.is_in_doorway(pose, radius);
        }
        assert!(entered);
        assert!(!system.is_in_doorway(Vec3::zeros(), radius));
    }

    #[test]
    fn test_capsule_that_fits_passes() {
        let system = north_door_room();
        let end = walk_until_blocked(&system, Vec3::new(0.25, 0.0, 0.0), Vec3::new(0.0, 0.0, -TICK), 130);
        assert!(end.z < -5.5, "stopped at {end:?}");
    }

    #[test]
    fn test_off_center_approaches_blocked_before_wall_plane() {
        let system = north_door_room();
        for x in [-3.0, -0.5, 0.4, 2.0, 4.0] {
            let end = walk_until_blocked(&system, Vec3::new(x, 0.0, 0.0), Vec3::new(0.0, 0.0, -TICK), 130);
            assert!(end.z > -5.0, "x = {x} reached {end:?}");
            assert!(end.z < -4.0, "x = {x} stopped early at {end:?}");
        }
    }

    #[test]
    fn test_other_walls_block() {
        let system = north_door_room();
        for delta in [Vec3::new(TICK, 0.0, 0.0), Vec3::new(-TICK, 0.0, 0.0), Vec3::new(0.0, 0.0, TICK)] {
            let end = walk_until_blocked(&system, Vec3::zeros(), delta, 130);
            assert!(end.x.abs() < 5.0 && end.z < 5.0, "escaped to {end:?}");
        }
    }

    #[test]
    fn test_sliding_along_wall_keeps_moving() {
        let system = north_door_room();
        let start = Vec3::new(-3.0, 0.0, -4.6);
        let movement = Vec3::new(TICK, 0.0, -TICK);
        let test = system.test_movement(start, start + movement);
        assert!(test.collision.hit);

        let slide = system.slide_along_surface(start, movement, test.collision.normal);
        assert!(slide.x > 0.0);
        assert!(slide.z.abs() < 1e-6);
    }
}
