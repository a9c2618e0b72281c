//! Rendering backend seam
//!
//! A `Backend` binds the protocol to an actual toolkit. The actor
//! validates every action against its own bookkeeping first, so a
//! backend only ever sees actions whose names resolve; its job is to
//! mutate native widget state and to translate native input into
//! protocol events.

use std::sync::Arc;

use facade_core::{Action, Event};
use thiserror::Error;

/// Failures inside a rendering backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be brought up.
    #[error("backend initialization failed: {0}")]
    InitFailed(String),

    /// A native call failed; the mutation was not applied.
    #[error("native call failed: {0}")]
    Native(String),

    /// The backend is gone and cannot continue.
    #[error("backend terminated: {0}")]
    Terminated(String),
}

/// Interrupts a backend's blocking wait from any thread.
///
/// `wake` must be edge-triggered and latching: calling it while the
/// backend is not waiting makes the *next* wait return promptly.
/// Multiple calls may coalesce into a single wakeup.
pub trait Waker: Send + Sync {
    fn wake(&self);
}

/// What ended one blocking wait.
pub enum WaitOutcome {
    /// Native input arrived, already translated into protocol events.
    Input(Vec<Event>),
    /// A `Waker` fired; the actor should re-check its inbox.
    Woken,
    /// The backend wants the run loop to end (e.g. window close).
    Quit,
    /// The backend cannot continue; the actor terminates.
    Failed(BackendError),
}

/// One rendering toolkit binding.
///
/// All three methods are called from the single thread that owns the
/// toolkit's state; only the `Waker` escapes to other threads.
pub trait Backend {
    /// Apply one actor-validated mutation to the native tree.
    ///
    /// Must be atomic: on error the native tree looks as if the action
    /// never happened.
    fn apply(&mut self, action: &Action) -> Result<(), BackendError>;

    /// Park until native input arrives, the waker fires, or the
    /// backend shuts down.
    fn wait(&mut self) -> WaitOutcome;

    /// A handle that interrupts `wait` from any thread.
    fn waker(&self) -> Arc<dyn Waker>;
}
