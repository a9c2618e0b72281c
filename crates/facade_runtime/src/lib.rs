//! Facade GUI actor
//!
//! The runtime half of the facade protocol: a single-threaded actor
//! that owns the live widget tree, drains an unbounded inbox of
//! [`Action`](facade_core::Action)s in FIFO order, applies them through
//! a rendering [`Backend`], and reports user interactions and failures
//! back as [`Event`](facade_core::Event)s.
//!
//! - **Strict single-writer**: only the thread inside [`GuiActor::run`]
//!   ever touches widget state. Everything else goes through channels.
//! - **Wake primitive**: [`UiHandle::signal`] interrupts the backend's
//!   blocking wait so queued actions are never stranded behind it.
//! - **Errors stay in-band**: a bad action produces an
//!   `Event::Error`, never a panic and never actor termination.
//!
//! The [`headless`] module provides a deterministic in-process backend
//! for tests and demos.

pub mod actor;
pub mod backend;
pub mod headless;
pub mod registry;
mod wake;

pub use actor::{ActorError, GuiActor, UiHandle};
pub use backend::{Backend, BackendError, WaitOutcome, Waker};
pub use headless::{HeadlessBackend, HeadlessHandle};
