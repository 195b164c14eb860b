//! Ground, step and slide solver
//!
//! Stateless functions over a [`CapsuleCaster`](crate::physics::collision::CapsuleCaster).
//! Every budget (slide iterations, step height, probe length) is fixed, so
//! each call terminates in a bounded number of casts.

pub mod breathing;
pub mod ground;
pub mod probe;
pub mod slide;
pub mod step;

pub use breathing::breathing_wall_push_out;
pub use ground::{detect_ground, floor_height, snap_to_ground, GroundInfo};
pub use probe::{test_movement, MovementTest};
pub use slide::{clip_to_plane, slide_along_surface};
pub use step::{attempt_step, StepResult};
