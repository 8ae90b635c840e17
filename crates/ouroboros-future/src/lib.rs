//! ouroboros-future: single-value futures over background threads
//!
//! Submit a zero-argument computation and get a [`FutureHandle`] back
//! immediately. The handle supports blocking retrieval with or without a
//! deadline, cancellation before the computation starts, completion
//! inspection and a done callback.
//!
//! # Example
//! ```rust,ignore
//! use ouroboros_future::{submit, TaskResult};
//! use std::time::Duration;
//!
//! let handle = submit(|| TaskResult::success(30 + 23));
//! let result = handle.get_with_timeout(Duration::from_secs(1));
//! println!("{}", result); // "53 with (no error)"
//! ```

pub mod config;
pub mod error;
pub mod future;
pub mod result;
pub mod state;

// Re-exports
pub use config::FutureConfig;
pub use error::{FutureError, FutureErrorKind};
pub use future::{FutureHandle, FutureId};
pub use result::TaskResult;
pub use state::FutureState;

/// Result type for future operations
pub type Result<T> = std::result::Result<T, FutureError>;

/// Start `task` on its own thread and return its handle without blocking
pub fn submit<T, F>(task: F) -> FutureHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> TaskResult<T> + Send + 'static,
{
    submit_with(&FutureConfig::default(), task)
}

/// Like [`submit`], spawning the thread according to `config`.
///
/// If the thread cannot be spawned the returned handle is already FAILED
/// with [`FutureError::Spawn`].
pub fn submit_with<T, F>(config: &FutureConfig, task: F) -> FutureHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> TaskResult<T> + Send + 'static,
{
    let handle = FutureHandle::new(task);
    handle.start_with(config);
    handle
}
