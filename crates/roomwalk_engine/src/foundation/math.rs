//! Math utilities and types
//!
//! Provides the vector aliases used by the collision core. The world is
//! Y-up; room footprints live in the XZ plane and are handled as [`Vec2`]
//! where `x = world x` and `y = world z`.

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D vector type (XZ footprint coordinates)
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (debug colors)
pub type Vec4 = Vector4<f32>;

/// World up axis
#[inline]
pub fn up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Project a world position onto the XZ footprint plane
#[inline]
pub fn to_xz(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Lift a footprint point back into world space at height `y`
#[inline]
pub fn from_xz(p: Vec2, y: f32) -> Vec3 {
    Vec3::new(p.x, y, p.y)
}

/// Drop the vertical component of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Lengths below this are treated as zero
    pub const EPSILON: f32 = 1.0e-6;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}
