//! Collision detection module
//!
//! Provides the shapes the movement model is expressed with and the ray-based
//! capsule cast engine that queries the geometry registry.

pub mod capsule;
pub mod cast;
pub mod primitives;

pub use capsule::{Capsule, CAPSULE_SAMPLE_COUNT, SKIN_WIDTH};
pub use cast::{CapsuleCaster, CollisionResult, HitTarget, RenderableHit, RenderableProbe};
pub use primitives::{Ray, AABB};
