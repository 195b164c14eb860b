//! Player capsule shape and its fixed ray sample layout

use serde::{Deserialize, Serialize};

use crate::foundation::math::{up, Vec3};

/// Number of sample rays used to approximate a capsule cast
pub const CAPSULE_SAMPLE_COUNT: usize = 7;

/// Inset of the top and bottom samples from the capsule's extremes
pub const SKIN_WIDTH: f32 = 0.02;

/// Vertical capsule used as the player's movement volume
///
/// The pose origin handed around by the navigation layer is the capsule's
/// feet; the geometric center sits `center_offset` above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capsule {
    /// Radius of the cylinder and hemispherical caps
    pub radius: f32,
    /// Total height from bottom cap to top cap
    pub height: f32,
    /// Distance from the pose origin up to the capsule center
    pub center_offset: f32,
}

impl Default for Capsule {
    fn default() -> Self {
        Self::new(0.3, 1.6)
    }
}

impl Capsule {
    /// Capsule whose pose origin is at its feet
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            height,
            center_offset: height * 0.5,
        }
    }

    /// Override the pose-to-center offset
    pub fn with_center_offset(mut self, offset: f32) -> Self {
        self.center_offset = offset;
        self
    }

    /// Half the distance between the two hemisphere centers
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// Capsule center for a pose origin
    pub fn center(&self, pose: Vec3) -> Vec3 {
        pose + up() * self.center_offset
    }

    /// Lowest point of the capsule for a pose origin
    pub fn feet(&self, pose: Vec3) -> Vec3 {
        self.center(pose) - up() * (self.height * 0.5)
    }

    /// Pose origin that puts the capsule's lowest point at `feet`
    pub fn pose_from_feet(&self, feet: Vec3) -> Vec3 {
        feet + up() * (self.height * 0.5 - self.center_offset)
    }

    /// The seven ray origins of the capsule approximation
    ///
    /// Order: top, center, bottom, +X, -X, +Z, -Z. Top and bottom sit
    /// [`SKIN_WIDTH`] inside the capsule's extremes, so ledges lower than the
    /// radius are still seen while the supporting floor is not.
    pub fn sample_points(&self, pose: Vec3) -> [Vec3; CAPSULE_SAMPLE_COUNT] {
        let center = self.center(pose);
        let vertical = up() * (self.height * 0.5 - SKIN_WIDTH).max(0.0);
        let r = self.radius;
        [
            center + vertical,
            center,
            center - vertical,
            center + Vec3::new(r, 0.0, 0.0),
            center - Vec3::new(r, 0.0, 0.0),
            center + Vec3::new(0.0, 0.0, r),
            center - Vec3::new(0.0, 0.0, r),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_pose_is_feet() {
        let capsule = Capsule::default();
        let pose = Vec3::new(1.0, 0.0, 2.0);
        assert_relative_eq!(capsule.feet(pose), pose, epsilon = 1e-6);
        assert_relative_eq!(capsule.center(pose), Vec3::new(1.0, 0.8, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_sample_layout() {
        let capsule = Capsule::new(0.3, 1.6);
        let samples = capsule.sample_points(Vec3::zeros());

        assert_relative_eq!(samples[0].y, 1.6 - SKIN_WIDTH, epsilon = 1e-6);
        assert_relative_eq!(samples[1].y, 0.8, epsilon = 1e-6);
        assert_relative_eq!(samples[2].y, SKIN_WIDTH, epsilon = 1e-6);
        assert_relative_eq!(samples[3].x, 0.3, epsilon = 1e-6);
        assert_relative_eq!(samples[6].z, -0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_pose_from_feet_with_custom_offset() {
        let capsule = Capsule::new(0.3, 1.6).with_center_offset(1.5);
        let feet = Vec3::new(0.0, 2.0, 0.0);
        let pose = capsule.pose_from_feet(feet);
        assert_relative_eq!(capsule.feet(pose), feet, epsilon = 1e-6);
    }
}
