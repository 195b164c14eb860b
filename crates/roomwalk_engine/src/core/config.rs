//! # Unified Configuration System
//!
//! All tunables of the collision core and the navigation layer live here as
//! serde-serializable structs with sensible defaults. Every struct uses
//! `#[serde(default)]` so partial files only override what they mention.
//!
//! ## Configuration Categories
//!
//! - **Collision Config**: capsule shape, solver thresholds, cast policy, room building
//! - **Navigation Config**: walking speed, doorway commit policy, transition timing
//! - **Logging Config**: default log level for binaries

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::physics::collision::Capsule;

/// How renderable-object hits compete with box-collider hits in one cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderablePriority {
    /// Closest hit wins regardless of which representation produced it
    #[default]
    Nearest,
    /// A renderable hit always wins over box hits in the same cast
    AlwaysWins,
}

/// When the orchestrator turns doorway presence into a transition event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommitPolicy {
    /// Stay inside the trigger for `commit_dwell_seconds`
    #[default]
    Dwell,
    /// Cross the doorway's wall plane toward the outside of the room
    CrossFrame,
}

/// # Solver Configuration
///
/// Thresholds for ground detection, step climbing and slide response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum ledge height climbed without jumping (meters)
    pub max_step_height: f32,
    /// Ground probe starts this far above the feet
    pub probe_offset: f32,
    /// Length of the downward ground probe
    pub probe_distance: f32,
    /// Tolerance below the feet that still counts as grounded
    pub grounded_threshold: f32,
    /// Steepest walkable slope in degrees
    pub max_slope_degrees: f32,
    /// Fraction of slide movement removed per iteration
    pub slide_friction: f32,
    /// Slide recursion budget before movement is dropped for the tick
    pub max_slide_iterations: u32,
    /// Slide vectors shorter than this are treated as zero
    pub min_slide_length: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_step_height: 0.3,
            probe_offset: 0.1,
            probe_distance: 0.5,
            grounded_threshold: 0.05,
            max_slope_degrees: 45.0,
            slide_friction: 0.1,
            max_slide_iterations: 3,
            min_slide_length: 1.0e-4,
        }
    }
}

impl SolverConfig {
    /// Set the maximum step height
    pub fn with_max_step_height(mut self, height: f32) -> Self {
        self.max_step_height = height;
        self
    }

    /// Set the slide friction
    pub fn with_slide_friction(mut self, friction: f32) -> Self {
        self.slide_friction = friction;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_step_height < 0.0 {
            return Err(ConfigError::Invalid("max_step_height must be >= 0".to_string()));
        }
        if self.probe_distance <= self.probe_offset {
            return Err(ConfigError::Invalid(
                "probe_distance must exceed probe_offset".to_string(),
            ));
        }
        if !(0.0..90.0).contains(&self.max_slope_degrees) {
            return Err(ConfigError::Invalid("max_slope_degrees must be in [0, 90)".to_string()));
        }
        if !(0.0..1.0).contains(&self.slide_friction) {
            return Err(ConfigError::Invalid("slide_friction must be in [0, 1)".to_string()));
        }
        if self.max_slide_iterations == 0 {
            return Err(ConfigError::Invalid("max_slide_iterations must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// # Cast Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    /// Renderable versus box priority
    pub renderable_priority: RenderablePriority,
    /// Extra fraction added when resolving breathing-wall penetration
    pub push_out_margin: f32,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            renderable_priority: RenderablePriority::Nearest,
            push_out_margin: 0.1,
        }
    }
}

/// # Room Build Configuration
///
/// Dimensions used when synthesizing shell colliders from a room description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomBuildConfig {
    /// Wall box thickness, placed outside the interior face
    pub wall_thickness: f32,
    /// Floor and ceiling slab thickness
    pub floor_thickness: f32,
    /// Doorway jamb width used when a doorway does not specify one
    pub frame_thickness: f32,
    /// Trigger depth across the wall plane (capped at the doorway width)
    pub trigger_depth: f32,
    /// Box length used to tessellate non axis-aligned polygon edges
    pub angled_wall_resolution: f32,
}

impl Default for RoomBuildConfig {
    fn default() -> Self {
        Self {
            wall_thickness: 0.2,
            floor_thickness: 0.2,
            frame_thickness: 0.1,
            trigger_depth: 1.0,
            angled_wall_resolution: 0.25,
        }
    }
}

impl RoomBuildConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wall_thickness <= 0.0 || self.floor_thickness <= 0.0 {
            return Err(ConfigError::Invalid("wall and floor thickness must be > 0".to_string()));
        }
        if self.angled_wall_resolution <= 0.0 {
            return Err(ConfigError::Invalid("angled_wall_resolution must be > 0".to_string()));
        }
        Ok(())
    }
}

/// # Collision Configuration
///
/// Everything the collision system needs besides the geometry itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Player capsule shape
    pub capsule: Capsule,
    /// Ground/step/slide thresholds
    pub solver: SolverConfig,
    /// Cast policy
    pub cast: CastConfig,
    /// Shell synthesis
    pub room: RoomBuildConfig,
}

impl CollisionConfig {
    /// Set the capsule shape
    pub fn with_capsule(mut self, capsule: Capsule) -> Self {
        self.capsule = capsule;
        self
    }

    /// Set the solver thresholds
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Set the renderable priority
    pub fn with_renderable_priority(mut self, priority: RenderablePriority) -> Self {
        self.cast.renderable_priority = priority;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capsule.radius <= 0.0 || self.capsule.height <= 0.0 {
            return Err(ConfigError::Invalid("capsule radius and height must be > 0".to_string()));
        }
        if self.capsule.height < 2.0 * self.capsule.radius {
            return Err(ConfigError::Invalid(
                "capsule height must be at least twice its radius".to_string(),
            ));
        }
        if self.solver.max_step_height >= self.capsule.height {
            return Err(ConfigError::Invalid(
                "max_step_height must be below the capsule height".to_string(),
            ));
        }
        self.solver.validate()?;
        self.room.validate()
    }
}

/// # Navigation Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Walking speed in meters per second
    pub walk_speed: f32,
    /// Doorway commit policy
    pub commit_policy: CommitPolicy,
    /// Seconds of sustained presence for [`CommitPolicy::Dwell`]
    pub commit_dwell_seconds: f32,
    /// Total crossfade length in seconds
    pub transition_duration: f32,
    /// Progress (0..1) at which the room swap commits
    pub transition_commit_at: f32,
    /// Snap the capsule down onto nearby ground after each tick
    pub snap_to_ground: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            commit_policy: CommitPolicy::Dwell,
            commit_dwell_seconds: 0.35,
            transition_duration: 1.2,
            transition_commit_at: 0.5,
            snap_to_ground: true,
        }
    }
}

impl NavigationConfig {
    /// Set the commit policy
    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.commit_policy = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.walk_speed < 0.0 {
            return Err(ConfigError::Invalid("walk_speed must be >= 0".to_string()));
        }
        if self.transition_duration <= 0.0 {
            return Err(ConfigError::Invalid("transition_duration must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.transition_commit_at) {
            return Err(ConfigError::Invalid("transition_commit_at must be in [0, 1]".to_string()));
        }
        Ok(())
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Logging setup
    pub logging: LoggingConfig,
    /// Collision core
    pub collision: CollisionConfig,
    /// Navigation layer
    pub navigation: NavigationConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collision.validate()?;
        self.navigation.validate()
    }
}

impl Config for ApplicationConfig {}
