//! # Roomwalk Engine
//!
//! Capsule collision and doorway navigation for first-person walks through
//! procedurally generated rooms.
//!
//! ## Features
//!
//! - **Geometry Registry**: layered box colliders, breathing walls and
//!   doorway triggers for the active room
//! - **Room Shell Builder**: walls, floor, ceiling, lintels and jambs from a
//!   rectangular or polygonal room description
//! - **Capsule Casts**: seven-ray capsule sweeps with optional mesh-accurate
//!   probes for renderable objects
//! - **Movement Solver**: ground detection, step climbing, surface sliding
//!   and breathing-wall push-out
//! - **Navigation**: per-tick movement orchestration and room-to-room
//!   transitions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomwalk_engine::prelude::*;
//!
//! let mut system = CollisionSystem::new(CollisionConfig::default());
//! system.set_room(
//!     &RoomDescription::rectangular(10.0, 3.0, 10.0)
//!         .with_doorway(DoorwayPlacement::on_wall(WallSide::North, 1.2, 2.2)),
//! );
//!
//! let mut walker = MovementOrchestrator::new(Vec3::zeros(), NavigationConfig::default());
//! let outcome = walker.tick(&system, MovementInput::walk(Vec3::new(0.0, 0.0, -1.0)), 1.0 / 60.0);
//! if let Some(event) = outcome.transition {
//!     println!("leaving through {:?}", event.exit_side);
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod core;
pub mod debug;
pub mod foundation;
pub mod navigation;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::{ApplicationConfig, CollisionConfig, CommitPolicy, NavigationConfig},
        debug::CollisionDebugVisualizer,
        foundation::math::{Vec2, Vec3},
        navigation::{
            MovementInput, MovementOrchestrator, TickOutcome, TransitionEvent,
            TransitionStateMachine,
        },
        physics::{
            Capsule, ColliderLayer, CollisionResult, CollisionSystem, DoorwayPlacement,
            GeometryRegistry, RenderableProbe, RoomDescription, WallSide, AABB,
        },
    };
}
