//! Future handle over a background computation
//!
//! A [`FutureHandle`] owns the receiving half of a one-slot handoff channel.
//! The computation runs on its own named thread and pushes exactly one
//! [`TaskResult`] into the channel; callers block on the handle until it
//! arrives, a deadline passes, or they cancel before the computation starts.
//!
//! The first terminal outcome (completed, failed, timed out, cancelled) is
//! written once and cached. Every later call, from any thread, sees the same
//! cached result.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::FutureConfig;
use crate::error::FutureError;
use crate::result::TaskResult;
use crate::state::FutureState;

/// Unique future identifier using UUID v7 (time-ordered)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FutureId(pub uuid::Uuid);

impl FutureId {
    /// Create a new future ID
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for FutureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FutureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Computation<T> = Box<dyn FnOnce() -> TaskResult<T> + Send + 'static>;
type DoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// Progress of the background routine, shared with its thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Running,
    Finished,
    /// Cancelled before start; the routine must not invoke the computation
    Skipped,
}

/// Cached terminal outcome
struct Terminal<T> {
    state: FutureState,
    result: TaskResult<T>,
}

impl<T> Terminal<T> {
    fn delivered(result: TaskResult<T>) -> Self {
        let state = if result.is_success() {
            FutureState::Completed
        } else {
            FutureState::Failed
        };
        Self { state, result }
    }

    fn synthesized(state: FutureState, error: FutureError) -> Self {
        Self {
            state,
            result: TaskResult::from_error(error),
        }
    }
}

/// Everything the background thread needs, moved onto it at launch
struct Launch<T> {
    task: Computation<T>,
    sender: Sender<TaskResult<T>>,
}

impl<T> Launch<T> {
    fn run(self, id: FutureId, phase: Arc<Mutex<Phase>>) {
        {
            let mut current = phase.lock();
            if *current == Phase::Skipped {
                debug!(future_id = %id, "Cancelled before start, skipping computation");
                return;
            }
            *current = Phase::Running;
        }

        debug!(future_id = %id, "Computation started");

        let result = {
            let _running = RunningGuard { phase: phase.as_ref() };
            (self.task)()
        };

        debug!(
            future_id = %id,
            success = result.is_success(),
            "Computation finished"
        );

        // Capacity 1 and a single send: this never blocks. It only fails
        // when the handle has been dropped.
        if self.sender.try_send(result).is_err() {
            debug!(future_id = %id, "Handle dropped, discarding result");
        }
    }
}

/// Clears the running flag on every exit path, unwinding included
struct RunningGuard<'a> {
    phase: &'a Mutex<Phase>,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = Phase::Finished;
    }
}

/// Handle to a value being produced by a background computation
pub struct FutureHandle<T> {
    id: FutureId,
    phase: Arc<Mutex<Phase>>,
    outcome: OnceCell<Terminal<T>>,
    receiver: Mutex<Receiver<TaskResult<T>>>,
    launch: Mutex<Option<Launch<T>>>,
    callback: Mutex<Option<DoneCallback>>,
}

impl<T: Send + 'static> FutureHandle<T> {
    /// Create a handle without starting the computation.
    ///
    /// The handle stays PENDING until [`start`](Self::start) is called.
    /// Use [`submit`](crate::submit) to create and start in one step.
    pub fn new<F>(task: F) -> Self
    where
        F: FnOnce() -> TaskResult<T> + Send + 'static,
    {
        let (sender, receiver) = bounded(1);

        Self {
            id: FutureId::new(),
            phase: Arc::new(Mutex::new(Phase::Pending)),
            outcome: OnceCell::new(),
            receiver: Mutex::new(receiver),
            launch: Mutex::new(Some(Launch {
                task: Box::new(task),
                sender,
            })),
            callback: Mutex::new(None),
        }
    }

    /// Start the computation with the default configuration
    pub fn start(&self) -> bool {
        self.start_with(&FutureConfig::default())
    }

    /// Start the computation on a new background thread.
    ///
    /// Returns `true` if a thread was launched by this call. Returns `false`
    /// if it was already started, if the handle is already terminal, or if
    /// the thread could not be spawned (the handle then fails with
    /// [`FutureError::Spawn`]).
    pub fn start_with(&self, config: &FutureConfig) -> bool {
        let launch = match self.launch.lock().take() {
            Some(launch) => launch,
            None => return false,
        };

        if self.outcome.get().is_some() {
            debug!(future_id = %self.id, "Future already terminal, not launching");
            return false;
        }

        let id = self.id.clone();
        let phase = Arc::clone(&self.phase);

        let mut builder = thread::Builder::new().name(config.thread_name(&self.id));
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        match builder.spawn(move || launch.run(id, phase)) {
            Ok(_) => {
                debug!(future_id = %self.id, "Background computation launched");
                true
            }
            Err(e) => {
                error!(future_id = %self.id, error = %e, "Failed to spawn background thread");
                self.settle(Terminal::synthesized(
                    FutureState::Failed,
                    FutureError::Spawn(e.to_string()),
                ));
                false
            }
        }
    }
}

impl<T> FutureHandle<T> {
    pub fn id(&self) -> &FutureId {
        &self.id
    }

    /// Block until the computation delivers its result.
    ///
    /// Returns the cached result immediately once the future is terminal.
    /// There is no deadline: a handle that was never started blocks until
    /// another thread starts it.
    pub fn get(&self) -> &TaskResult<T> {
        if let Some(terminal) = self.outcome.get() {
            return &terminal.result;
        }

        let receiver = self.receiver.lock();

        // Another caller may have settled while we waited for the receiver
        if let Some(terminal) = self.outcome.get() {
            return &terminal.result;
        }

        let terminal = match receiver.recv() {
            Ok(result) => Terminal::delivered(result),
            Err(_) => Terminal::synthesized(FutureState::Failed, FutureError::Abandoned),
        };
        drop(receiver);

        self.settle(terminal)
    }

    /// Block for at most `timeout`, measured from this call.
    ///
    /// If the deadline passes first the future becomes permanently
    /// TIMED_OUT: the computation keeps running but its result is discarded,
    /// and every later retrieval returns the timeout.
    pub fn get_with_timeout(&self, timeout: Duration) -> &TaskResult<T> {
        if let Some(terminal) = self.outcome.get() {
            return &terminal.result;
        }

        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.get(),
        };

        let receiver = match self.receiver.try_lock_until(deadline) {
            Some(receiver) => receiver,
            None => {
                return self.settle(Terminal::synthesized(
                    FutureState::TimedOut,
                    FutureError::Timeout(timeout),
                ))
            }
        };

        if let Some(terminal) = self.outcome.get() {
            return &terminal.result;
        }

        let terminal = match receiver.recv_deadline(deadline) {
            Ok(result) => Terminal::delivered(result),
            Err(RecvTimeoutError::Timeout) => {
                Terminal::synthesized(FutureState::TimedOut, FutureError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Terminal::synthesized(FutureState::Failed, FutureError::Abandoned)
            }
        };
        drop(receiver);

        self.settle(terminal)
    }

    /// Non-blocking retrieval: `None` while the result is still outstanding
    pub fn try_get(&self) -> Option<&TaskResult<T>> {
        if let Some(terminal) = self.outcome.get() {
            return Some(&terminal.result);
        }

        // A blocked retriever holds the receiver; nothing to take here
        let receiver = self.receiver.try_lock()?;

        let terminal = match receiver.try_recv() {
            Ok(result) => Terminal::delivered(result),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                Terminal::synthesized(FutureState::Failed, FutureError::Abandoned)
            }
        };
        drop(receiver);

        Some(self.settle(terminal))
    }

    /// Cancel the future if its computation has not started yet.
    ///
    /// Returns `false` when the computation is running, has finished, or the
    /// future is already terminal. A running computation is never
    /// interrupted.
    pub fn cancel(&self) -> bool {
        if self.outcome.get().is_some() {
            return false;
        }

        {
            let mut phase = self.phase.lock();
            if *phase != Phase::Pending {
                return false;
            }

            let mut won = false;
            self.outcome.get_or_init(|| {
                won = true;
                Terminal::synthesized(FutureState::Cancelled, FutureError::Cancelled)
            });
            if !won {
                return false;
            }

            *phase = Phase::Skipped;
        }

        info!(future_id = %self.id, "Future cancelled before start");

        // Unstarted handle: dropping the launch closes the channel
        self.launch.lock().take();

        self.fire_callback();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.terminal_state() == Some(FutureState::Cancelled)
    }

    /// True while the computation is executing on its thread
    pub fn is_running(&self) -> bool {
        *self.phase.lock() == Phase::Running
    }

    /// True once the future reached any terminal state
    pub fn is_complete(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Current lifecycle state.
    ///
    /// Terminal states are only reached through a retrieval or cancel call.
    /// A computation that finished but has not been retrieved yet still
    /// reports `Running`.
    pub fn state(&self) -> FutureState {
        if let Some(state) = self.terminal_state() {
            return state;
        }

        match *self.phase.lock() {
            Phase::Pending => FutureState::Pending,
            _ => FutureState::Running,
        }
    }

    /// Register the callback run when a retrieval or cancel call first
    /// settles this future.
    ///
    /// Only one slot exists: registering again replaces the previous
    /// callback. Runs on the caller's thread, before that call returns.
    pub fn add_done_callback<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *self.callback.lock() = Some(Box::new(callback));
    }

    fn terminal_state(&self) -> Option<FutureState> {
        self.outcome.get().map(|terminal| terminal.state)
    }

    /// Record `terminal` unless another call got there first, and return
    /// whichever outcome is cached.
    fn settle(&self, terminal: Terminal<T>) -> &TaskResult<T> {
        let mut won = false;
        let stored = self.outcome.get_or_init(|| {
            won = true;
            terminal
        });

        if won {
            self.log_settled(stored);
            self.fire_callback();
        }

        &stored.result
    }

    fn log_settled(&self, terminal: &Terminal<T>) {
        let error = terminal.result.error();
        match terminal.state {
            FutureState::TimedOut => {
                warn!(future_id = %self.id, "Future timed out, abandoning computation");
            }
            FutureState::Failed if matches!(error, Some(FutureError::Abandoned)) => {
                warn!(future_id = %self.id, "Computation exited without a result");
            }
            state => {
                debug!(
                    future_id = %self.id,
                    state = ?state,
                    error = ?error.map(|e| e.to_string()),
                    "Future settled"
                );
            }
        }
    }

    fn fire_callback(&self) {
        // Take it out first so the callback may touch this handle
        let callback = self.callback.lock().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl<T> std::fmt::Debug for FutureHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FutureHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("callback", &self.callback.lock().as_ref().map(|_| "Some(callback)"))
            .finish()
    }
}
