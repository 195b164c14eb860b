//! Navigation layer
//!
//! Per-tick movement orchestration on top of the collision system and the
//! room-to-room transition state machine.

pub mod orchestrator;
pub mod transition;

pub use orchestrator::{MovementInput, MovementOrchestrator, TickOutcome};
pub use transition::{
    TransitionCommit, TransitionError, TransitionEvent, TransitionPhase, TransitionStateMachine,
};
