//! Launch configuration for background computations.
//!
//! # Example
//! ```rust,ignore
//! use ouroboros_future::{submit_with, FutureConfig, TaskResult};
//!
//! // From environment
//! let config = FutureConfig::from_env()?;
//!
//! let handle = submit_with(&config, || TaskResult::success(42));
//! ```

use crate::error::FutureError;

/// Default prefix for background thread names
pub const DEFAULT_THREAD_PREFIX: &str = "future";

/// How background threads are spawned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FutureConfig {
    /// Thread name prefix; the future id is appended
    pub thread_name_prefix: String,
    /// Stack size for the background thread (None = platform default)
    pub stack_size: Option<usize>,
}

impl Default for FutureConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: DEFAULT_THREAD_PREFIX.to_string(),
            stack_size: None,
        }
    }
}

impl FutureConfig {
    /// Create configuration from environment variables.
    ///
    /// - `FUTURE_THREAD_PREFIX` -> thread name prefix (default `future`)
    /// - `FUTURE_STACK_SIZE` -> stack size in bytes
    pub fn from_env() -> Result<Self, FutureError> {
        let thread_name_prefix = std::env::var("FUTURE_THREAD_PREFIX")
            .unwrap_or_else(|_| DEFAULT_THREAD_PREFIX.to_string());

        let stack_size = match std::env::var("FUTURE_STACK_SIZE") {
            Ok(raw) => Some(parse_stack_size(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            thread_name_prefix,
            stack_size,
        })
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub(crate) fn thread_name(&self, id: impl std::fmt::Display) -> String {
        format!("{}-{}", self.thread_name_prefix, id)
    }
}

fn parse_stack_size(raw: &str) -> Result<usize, FutureError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(FutureError::Configuration(
            "FUTURE_STACK_SIZE must be greater than zero".to_string(),
        )),
        Ok(size) => Ok(size),
        Err(e) => Err(FutureError::Configuration(format!(
            "Invalid FUTURE_STACK_SIZE '{}': {}",
            raw, e
        ))),
    }
}
