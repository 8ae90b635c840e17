//! Future state machine

use serde::{Deserialize, Serialize};

/// Future state in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FutureState {
    /// Submitted, computation not yet started
    #[default]
    Pending,
    /// Computation is executing
    Running,
    /// Computation delivered a value
    Completed,
    /// Computation delivered an error, or never delivered at all
    Failed,
    /// A bounded wait elapsed first
    TimedOut,
    /// Cancelled before the computation started
    Cancelled,
}

impl FutureState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::TimedOut | Self::Cancelled
        )
    }

    /// Valid state transitions
    pub fn can_transition_to(&self, next: FutureState) -> bool {
        match (self, next) {
            // From PENDING
            (Self::Pending, Self::Running) => true,
            (Self::Pending, Self::Cancelled) => true,
            (Self::Pending, Self::TimedOut) => true,
            // Spawn failure
            (Self::Pending, Self::Failed) => true,

            // From RUNNING
            (Self::Running, Self::Completed) => true,
            (Self::Running, Self::Failed) => true,
            (Self::Running, Self::TimedOut) => true,

            _ => false,
        }
    }
}
