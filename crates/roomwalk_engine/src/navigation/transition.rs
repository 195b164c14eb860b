//! Room-to-room transition state machine
//!
//! Runs a timed crossfade once the orchestrator raises a
//! [`TransitionEvent`]. Part way through, [`TransitionStateMachine::update`]
//! hands back a [`TransitionCommit`]; that is the owner's cue to rebuild the
//! collision geometry for the destination room.

use thiserror::Error;

use crate::core::config::NavigationConfig;
use crate::physics::geometry::{DoorwayPortal, DoorwaySite, WallSide};

/// Doorway crossing raised by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEvent {
    /// Doorway index in the room being left
    pub doorway: usize,
    /// Where that doorway was cut
    pub exit_site: DoorwaySite,
    /// Side of the current room the player leaves through
    pub exit_side: WallSide,
    /// Side of the next room the player arrives through
    pub entry_side: WallSide,
}

impl TransitionEvent {
    /// Event for leaving through `portal`
    pub fn from_portal(portal: &DoorwayPortal) -> Self {
        Self {
            doorway: portal.index,
            exit_site: portal.site,
            exit_side: portal.side,
            entry_side: portal.entry_side(),
        }
    }
}

/// Room swap point reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCommit {
    /// Event that started the transition
    pub event: TransitionEvent,
}

/// Where the crossfade is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// No transition running
    Idle,
    /// Old room fading out; swap not committed yet
    Leaving,
    /// Swap committed; new room fading in
    Arriving,
}

/// Transition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// `begin` while another transition is running
    #[error("Transition through doorway {0} is already running")]
    AlreadyTransitioning(usize),
}

/// Owns the cross-room progress
#[derive(Debug, Clone)]
pub struct TransitionStateMachine {
    phase: TransitionPhase,
    progress: f32,
    duration: f32,
    commit_at: f32,
    active: Option<TransitionEvent>,
}

impl TransitionStateMachine {
    /// Machine with a crossfade of `duration` seconds committing at
    /// progress `commit_at`
    pub fn new(duration: f32, commit_at: f32) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            progress: 0.0,
            duration: duration.max(f32::EPSILON),
            commit_at: commit_at.clamp(0.0, 1.0),
            active: None,
        }
    }

    /// Machine using the navigation settings
    pub fn from_config(config: &NavigationConfig) -> Self {
        Self::new(config.transition_duration, config.transition_commit_at)
    }

    /// Start a transition
    pub fn begin(&mut self, event: TransitionEvent) -> Result<(), TransitionError> {
        if let Some(active) = self.active {
            return Err(TransitionError::AlreadyTransitioning(active.doorway));
        }
        log::info!(
            "Transition started through doorway {} ({:?} -> {:?})",
            event.doorway,
            event.exit_side,
            event.entry_side
        );
        self.active = Some(event);
        self.progress = 0.0;
        self.phase = TransitionPhase::Leaving;
        Ok(())
    }

    /// Advance by `dt` seconds
    ///
    /// Returns the commit exactly once per transition, on the update that
    /// crosses the commit point. A single large step may commit and finish
    /// together.
    pub fn update(&mut self, dt: f32) -> Option<TransitionCommit> {
        let event = self.active?;
        self.progress = (self.progress + dt.max(0.0) / self.duration).min(1.0);

        let mut commit = None;
        if self.phase == TransitionPhase::Leaving && self.progress >= self.commit_at {
            log::info!("Transition committed at progress {:.2}", self.progress);
            self.phase = TransitionPhase::Arriving;
            commit = Some(TransitionCommit { event });
        }

        if self.progress >= 1.0 {
            log::debug!("Transition through doorway {} finished", event.doorway);
            self.phase = TransitionPhase::Idle;
            self.active = None;
        }
        commit
    }

    /// Abort without committing; no-op when idle
    pub fn cancel(&mut self) {
        if let Some(event) = self.active.take() {
            log::debug!("Transition through doorway {} cancelled", event.doorway);
        }
        self.phase = TransitionPhase::Idle;
        self.progress = 0.0;
    }

    /// Crossfade value in `0..=1`
    pub fn progress(&self) -> f32 {
        if self.active.is_some() { self.progress } else { 0.0 }
    }

    /// Current phase
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Whether a transition is running
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The running transition's event
    pub fn active_event(&self) -> Option<&TransitionEvent> {
        self.active.as_ref()
    }
}

impl Default for TransitionStateMachine {
    fn default() -> Self {
        Self::from_config(&NavigationConfig::default())
    }
}
