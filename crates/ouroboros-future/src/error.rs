//! Future-specific error types

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors carried by a finished future
#[derive(Error, Debug, Clone)]
pub enum FutureError {
    /// The computation itself reported a failure
    #[error("{0}")]
    Task(Arc<anyhow::Error>),

    /// A bounded wait gave up before the computation delivered
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Cancelled manually")]
    Cancelled,

    /// The background routine exited without delivering a result
    #[error("Computation exited without producing a result")]
    Abandoned,

    #[error("Failed to spawn background thread: {0}")]
    Spawn(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Discriminant of [`FutureError`], used to branch on failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FutureErrorKind {
    Task,
    Timeout,
    Cancelled,
    Abandoned,
    Spawn,
    Configuration,
}

impl FutureError {
    /// Wrap an error produced by the computation
    pub fn task(err: impl Into<anyhow::Error>) -> Self {
        FutureError::Task(Arc::new(err.into()))
    }

    pub fn kind(&self) -> FutureErrorKind {
        match self {
            FutureError::Task(_) => FutureErrorKind::Task,
            FutureError::Timeout(_) => FutureErrorKind::Timeout,
            FutureError::Cancelled => FutureErrorKind::Cancelled,
            FutureError::Abandoned => FutureErrorKind::Abandoned,
            FutureError::Spawn(_) => FutureErrorKind::Spawn,
            FutureError::Configuration(_) => FutureErrorKind::Configuration,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FutureError::Timeout(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FutureError::Cancelled)
    }

    /// The computation's own error, if this is a task failure
    pub fn task_error(&self) -> Option<&anyhow::Error> {
        match self {
            FutureError::Task(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for FutureError {
    fn from(err: anyhow::Error) -> Self {
        FutureError::Task(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_keeps_message() {
        let err = FutureError::task(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.kind(), FutureErrorKind::Task);
        assert_eq!(err.to_string(), "disk on fire");
        assert!(err.task_error().is_some());
    }

    #[test]
    fn test_kinds_are_distinct() {
        let timeout = FutureError::Timeout(Duration::from_millis(5));
        assert!(timeout.is_timeout());
        assert!(!timeout.is_cancelled());

        let cancelled = FutureError::Cancelled;
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.to_string(), "Cancelled manually");
        assert!(cancelled.task_error().is_none());
    }

    #[test]
    fn test_cancel_detection_ignores_message_text() {
        // A task failing with the same text is still a task failure
        let err = FutureError::task(anyhow::anyhow!("Cancelled manually"));
        assert!(!err.is_cancelled());
        assert_eq!(err.kind(), FutureErrorKind::Task);
    }
}
