//! Value/error pair produced by a computation

use std::fmt;

use crate::error::FutureError;

/// Outcome of a computation: a value on success, an error otherwise.
///
/// Immutable once built. A [`FutureHandle`](crate::FutureHandle) caches the
/// first one it observes and hands out that same instance afterwards.
#[derive(Debug, Clone)]
pub struct TaskResult<T> {
    value: Option<T>,
    error: Option<FutureError>,
}

impl<T> TaskResult<T> {
    /// Create a success result
    pub fn success(value: T) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    /// Create a failure result from the computation's own error
    pub fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::from_error(FutureError::task(error))
    }

    pub(crate) fn from_error(error: FutureError) -> Self {
        Self {
            value: None,
            error: Some(error),
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// `None` when the computation succeeded
    pub fn error(&self) -> Option<&FutureError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<T, FutureError> {
        match (self.value, self.error) {
            (_, Some(err)) => Err(err),
            (Some(value), None) => Ok(value),
            // Unreachable through the public constructors
            (None, None) => Err(FutureError::Abandoned),
        }
    }
}

impl<T, E> From<Result<T, E>> for TaskResult<T>
where
    E: Into<anyhow::Error>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => Self::failure(err),
        }
    }
}

impl<T: fmt::Display> fmt::Display for TaskResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}", value)?,
            None => f.write_str("nil")?,
        }
        match &self.error {
            Some(err) => write!(f, " with ({} error)", err),
            None => f.write_str(" with (no error)"),
        }
    }
}
