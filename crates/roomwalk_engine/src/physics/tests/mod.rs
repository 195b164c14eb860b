//! Scenario tests driving the collision system the way the navigation
//! layer does

mod doorway_walkthrough;

use crate::foundation::math::Vec3;
use crate::physics::CollisionSystem;

/// Walk in fixed increments, stopping at the first blocked tick
///
/// Steps and slides are left out so blocking is observable directly.
pub(crate) fn walk_until_blocked(system: &CollisionSystem, start: Vec3, delta: Vec3, ticks: usize) -> Vec3 {
    let mut pose = start;
    for _ in 0..ticks {
        let test = system.test_movement(pose, pose + delta);
        if !test.is_clear() {
            break;
        }
        pose += delta;
    }
    pose
}
