//! Movement orchestrator
//!
//! Turns per-tick walking input into a corrected capsule pose. The order per
//! tick is fixed: one movement test, then a step attempt or a slide when the
//! move is blocked, then breathing-wall push-out, ground snapping and
//! footprint clamping. Doorway presence at the final pose feeds the commit
//! policy that raises [`TransitionEvent`]s.

use crate::core::config::{CommitPolicy, NavigationConfig};
use crate::foundation::math::{constants::EPSILON, from_xz, horizontal, Vec3};
use crate::physics::geometry::WallSide;
use crate::physics::CollisionSystem;

use super::transition::TransitionEvent;

/// Clearance kept between a spawn pose and the entry doorway's trigger
const SPAWN_CLEARANCE: f32 = 0.1;

/// Walking intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementInput {
    /// Desired horizontal direction; lengths above one are normalized
    pub direction: Vec3,
}

impl MovementInput {
    /// Input walking along `direction`
    pub fn walk(direction: Vec3) -> Self {
        Self { direction }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Pose after the tick
    pub pose: Vec3,
    /// Applied displacement
    pub displacement: Vec3,
    /// The requested move hit something
    pub blocked: bool,
    /// A step-up was taken
    pub stepped: bool,
    /// Ground under the start pose
    pub grounded: bool,
    /// Doorway trigger holding the final pose
    pub doorway: Option<usize>,
    /// Raised when the commit policy fires
    pub transition: Option<TransitionEvent>,
}

/// Drives the player capsule through the active room
#[derive(Debug, Clone)]
pub struct MovementOrchestrator {
    pose: Vec3,
    config: NavigationConfig,
    current_doorway: Option<usize>,
    dwell: f32,
    latched: Option<usize>,
}

impl MovementOrchestrator {
    /// Orchestrator with the capsule's feet at `pose`
    pub fn new(pose: Vec3, config: NavigationConfig) -> Self {
        Self {
            pose,
            config,
            current_doorway: None,
            dwell: 0.0,
            latched: None,
        }
    }

    /// Current pose
    pub fn pose(&self) -> Vec3 {
        self.pose
    }

    /// Navigation settings
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Teleport, forgetting any doorway presence
    pub fn set_pose(&mut self, pose: Vec3) {
        self.pose = pose;
        self.current_doorway = None;
        self.dwell = 0.0;
        self.latched = None;
    }

    /// Place the capsule just inside the doorway on `entry` in the freshly
    /// built room, or at the footprint centroid when there is none
    pub fn arrive(&mut self, system: &CollisionSystem, entry: WallSide) -> Vec3 {
        let radius = system.capsule().radius;
        let doorway = system.registry().portals().iter().find(|p| p.side == entry);
        let pose = match doorway {
            Some(portal) => {
                let depth = portal.trigger_bounds.size().dot(&portal.outward_normal.abs());
                portal.center - portal.outward_normal * (depth * 0.5 + radius + SPAWN_CLEARANCE)
            }
            None => system
                .registry()
                .footprint()
                .map_or_else(Vec3::zeros, |f| from_xz(f.centroid(), 0.0)),
        };
        let pose = system.snap_to_ground(pose).unwrap_or(pose);
        self.set_pose(pose);
        log::debug!("Arrived through {entry:?} at {pose:?}");
        pose
    }

    /// Advance one tick of `dt` seconds
    pub fn tick(&mut self, system: &CollisionSystem, input: MovementInput, dt: f32) -> TickOutcome {
        let dt = dt.max(0.0);
        let mut wish = horizontal(input.direction);
        if wish.norm() > 1.0 {
            wish = wish.normalize();
        }
        let delta = wish * self.config.walk_speed * dt;

        let start = self.pose;
        let end = start + delta;
        let test = system.test_movement(start, end);

        let mut stepped = false;
        let mut next = if test.is_clear() {
            end
        } else {
            let step = system.attempt_step(start, end);
            if step.success {
                stepped = true;
                step.position
            } else {
                start + system.slide_along_surface(start, delta, test.collision.normal)
            }
        };
        // A blocked or stepped move ends away from `end`
        next += if test.is_clear() { test.push_out } else { system.breathing_push_out(next) };

        if self.config.snap_to_ground && !stepped && delta.norm() > EPSILON {
            if let Some(snapped) = system.snap_to_ground(next) {
                next = snapped;
            }
        }

        let radius = system.capsule().radius;
        let doorway = system.check_doorway_bounds(next, radius).map(|p| p.index);
        if doorway.is_none() {
            next = system.clamp_to_room(next, radius);
        }

        self.pose = next;
        let transition = self.update_commit(system, doorway, dt);

        TickOutcome {
            pose: next,
            displacement: next - start,
            blocked: test.collision.hit,
            stepped,
            grounded: test.ground.grounded,
            doorway,
            transition,
        }
    }

    fn update_commit(
        &mut self,
        system: &CollisionSystem,
        doorway: Option<usize>,
        dt: f32,
    ) -> Option<TransitionEvent> {
        if doorway != self.current_doorway {
            self.dwell = 0.0;
            if doorway.is_none() || doorway != self.latched {
                self.latched = None;
            }
        }
        self.current_doorway = doorway;

        let index = doorway?;
        if self.latched == Some(index) {
            return None;
        }
        self.dwell += dt;

        let portal = system.registry().portals().iter().find(|p| p.index == index)?;
        let fire = match self.config.commit_policy {
            CommitPolicy::Dwell => self.dwell >= self.config.commit_dwell_seconds,
            CommitPolicy::CrossFrame => portal.distance_past_wall(self.pose) > 0.0,
        };
        if !fire {
            return None;
        }

        self.latched = Some(index);
        let event = TransitionEvent::from_portal(portal);
        log::info!(
            "Doorway {} committed ({:?}) after {:.2}s",
            index,
            self.config.commit_policy,
            self.dwell
        );
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::geometry::{DoorwayPlacement, RoomDescription};
    use crate::physics::AABB;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn room() -> CollisionSystem {
        let mut system = CollisionSystem::default();
        system.set_room(
            &RoomDescription::rectangular(10.0, 3.0, 10.0)
                .with_doorway(DoorwayPlacement::on_wall(WallSide::North, 1.2, 2.2)),
        );
        system
    }

    fn north() -> MovementInput {
        MovementInput::walk(Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_free_walk_moves_at_walk_speed() {
        let system = room();
        let mut orchestrator = MovementOrchestrator::new(Vec3::zeros(), NavigationConfig::default());
        let outcome = orchestrator.tick(&system, MovementInput::walk(Vec3::new(2.0, 0.0, 0.0)), 0.1);

        assert!(!outcome.blocked);
        assert!(outcome.grounded);
        assert_relative_eq!(outcome.pose, Vec3::new(0.3, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_wall_stops_forward_progress() {
        let system = room();
        let mut orchestrator = MovementOrchestrator::new(Vec3::new(3.0, 0.0, 0.0), NavigationConfig::default());
        for _ in 0..300 {
            orchestrator.tick(&system, north(), DT);
        }
        let pose = orchestrator.pose();
        assert!(pose.z > -5.0 + 0.2, "walked into the wall: {pose:?}");
    }

    #[test]
    fn test_diagonal_into_wall_slides() {
        let system = room();
        let mut orchestrator = MovementOrchestrator::new(Vec3::new(-3.0, 0.0, -4.55), NavigationConfig::default());
        let input = MovementInput::walk(Vec3::new(1.0, 0.0, -1.0).normalize());
        let before = orchestrator.pose();
        let outcome = orchestrator.tick(&system, input, DT);

        assert!(outcome.blocked);
        assert!(outcome.pose.x > before.x);
        assert_relative_eq!(outcome.pose.z, before.z, epsilon = 1e-5);
    }

    #[test]
    fn test_walks_up_onto_low_platform() {
        let mut system = room();
        system
            .registry_mut()
            .add_furniture_collider("dais", AABB::new(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 0.2, -1.0)), None);
        let mut orchestrator = MovementOrchestrator::new(Vec3::zeros(), NavigationConfig::default());
        let mut stepped = false;
        for _ in 0..30 {
            stepped |= orchestrator.tick(&system, north(), DT).stepped;
        }
        assert!(stepped);
        assert_relative_eq!(orchestrator.pose().y, 0.2, epsilon = 1e-4);
    }

    #[test]
    fn test_dwell_commit_fires_once_per_entry() {
        let system = room();
        let config = NavigationConfig::default();
        let mut orchestrator = MovementOrchestrator::new(Vec3::new(0.0, 0.0, -4.0), config);

        let mut events = Vec::new();
        for _ in 0..60 {
            let outcome = orchestrator.tick(&system, MovementInput::default(), DT);
            events.extend(outcome.transition);
        }
        // Standing still at z = -4.0 is outside the trigger
        assert!(events.is_empty());

        orchestrator.set_pose(Vec3::new(0.0, 0.0, -4.9));
        for _ in 0..120 {
            let outcome = orchestrator.tick(&system, MovementInput::default(), DT);
            events.extend(outcome.transition);
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].doorway, 0);
        assert_eq!(events[0].exit_side, WallSide::North);
        assert_eq!(events[0].entry_side, WallSide::South);
    }

    #[test]
    fn test_leaving_trigger_rearms_commit() {
        let system = room();
        let mut orchestrator = MovementOrchestrator::new(Vec3::new(0.0, 0.0, -4.9), NavigationConfig::default());
        let mut fired = 0;
        for _ in 0..60 {
            fired += usize::from(orchestrator.tick(&system, MovementInput::default(), DT).transition.is_some());
        }
        orchestrator.set_pose(Vec3::new(0.0, 0.0, -2.0));
        orchestrator.tick(&system, MovementInput::default(), DT);
        orchestrator.set_pose(Vec3::new(0.0, 0.0, -4.9));
        for _ in 0..60 {
            fired += usize::from(orchestrator.tick(&system, MovementInput::default(), DT).transition.is_some());
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_cross_frame_waits_for_wall_plane() {
        let system = room();
        let config = NavigationConfig::default().with_commit_policy(CommitPolicy::CrossFrame);
        let mut orchestrator = MovementOrchestrator::new(Vec3::new(0.0, 0.0, -3.5), config);

        let mut fired_at = None;
        for _ in 0..120 {
            let outcome = orchestrator.tick(&system, north(), DT);
            if outcome.transition.is_some() {
                fired_at = Some(outcome.pose);
                break;
            }
            assert!(outcome.pose.z >= -5.0);
        }
        let pose = fired_at.expect("never crossed");
        assert!(pose.z < -5.0);
    }

    #[test]
    fn test_breathing_wall_pushes_blocked_walker_by_overlap() {
        let mut system = room();
        system.registry_mut().add_breathing_wall(
            "lung",
            AABB::new(Vec3::new(0.4, 0.0, -2.0), Vec3::new(0.8, 3.0, 2.0)),
            Vec3::new(-1.0, 0.0, 0.0),
            None,
        );
        // Breathes 0.1 into a capsule of radius 0.3 standing at the origin
        system.update_breathing_wall("lung", 0.2);

        let mut orchestrator = MovementOrchestrator::new(Vec3::zeros(), NavigationConfig::default());
        let outcome = orchestrator.tick(&system, MovementInput::walk(Vec3::new(1.0, 0.0, 0.0)), DT);
        assert!(outcome.blocked);
        assert_relative_eq!(outcome.pose.x, -0.11, epsilon = 1e-4);
        assert_relative_eq!(outcome.pose.z, 0.0, epsilon = 1e-5);
        assert_eq!(system.breathing_push_out(outcome.pose), Vec3::zeros());
    }

    #[test]
    fn test_arrive_places_capsule_outside_entry_trigger() {
        let mut system = CollisionSystem::default();
        system.set_room(
            &RoomDescription::rectangular(8.0, 3.0, 8.0)
                .with_doorway(DoorwayPlacement::on_wall(WallSide::South, 1.2, 2.2)),
        );
        let mut orchestrator = MovementOrchestrator::new(Vec3::zeros(), NavigationConfig::default());
        let pose = orchestrator.arrive(&system, WallSide::South);

        let radius = system.capsule().radius;
        assert!(!system.is_in_doorway(pose, radius));
        assert_relative_eq!(pose.z, 3.1, epsilon = 1e-4);

        let outcome = orchestrator.tick(&system, MovementInput::default(), DT);
        assert!(outcome.transition.is_none());
    }
}
