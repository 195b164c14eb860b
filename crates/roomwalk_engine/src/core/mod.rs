//! # Core Module
//!
//! Shared abstractions used by every subsystem. At the moment this is the
//! unified configuration system.

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    CastConfig,
    CollisionConfig,
    CommitPolicy,
    Config,
    ConfigError,
    LoggingConfig,
    NavigationConfig,
    RenderablePriority,
    RoomBuildConfig,
    SolverConfig,
};
