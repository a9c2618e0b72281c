//! The GUI actor
//!
//! One `GuiActor` owns one live widget tree. Applications talk to it
//! through a cloneable [`UiHandle`] (unbounded action inbox plus wake
//! signal) and listen on the event receiver returned at construction.
//! The actor applies actions in strict FIFO order on the thread that
//! calls [`GuiActor::run`] - the only thread allowed to touch widget
//! state.
//!
//! Every recoverable failure turns into an `Event::Error`; only a
//! fatal backend failure ends the run loop with an `ActorError`. The
//! closing of the event channel is the authoritative termination
//! signal for the application.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use facade_core::{Action, Event, UiError, Widget, WidgetKind};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::backend::{Backend, WaitOutcome};
use crate::registry::Registry;
use crate::wake::WakeState;

/// Fatal actor failure. Anything recoverable is reported in-band as
/// `Event::Error` instead.
#[derive(Error, Debug)]
pub enum ActorError {
    #[error(transparent)]
    Backend(#[from] crate::backend::BackendError),
}

/// Application-side handle: enqueue actions and wake the actor.
///
/// Cheap to clone; any number of producer threads may hold one.
/// Actions from one producer are applied in that producer's send
/// order.
#[derive(Clone)]
pub struct UiHandle {
    actions: Sender<Action>,
    wake: Arc<WakeState>,
}

impl UiHandle {
    /// Enqueue an action. The inbox is unbounded, so this never
    /// blocks; if the actor has already terminated the action is
    /// quietly dropped.
    pub fn send(&self, action: Action) {
        if self.actions.send(action).is_err() {
            tracing::debug!("action dropped: actor has terminated");
        }
    }

    /// Wake the actor so it re-checks its inbox promptly, even if it
    /// is parked inside the backend's blocking wait. Non-blocking,
    /// callable from any thread any number of times, safe before
    /// `run` starts; concurrent signals coalesce.
    pub fn signal(&self) {
        self.wake.signal();
    }

    /// `send` followed by `signal` - the common case.
    pub fn post(&self, action: Action) {
        self.send(action);
        self.signal();
    }
}

/// Single-threaded owner of the live widget tree.
pub struct GuiActor {
    actions: Receiver<Action>,
    events: Sender<Event>,
    wake: Arc<WakeState>,
    registry: Registry,
}

impl GuiActor {
    /// Create an actor plus its application-side endpoints: the action
    /// handle and the event receiver. Actions may be enqueued
    /// immediately; they sit in the inbox until `run` drains them.
    pub fn new() -> (GuiActor, UiHandle, Receiver<Event>) {
        let (action_tx, action_rx) = mpsc::channel();
        // Grow-dynamically backpressure policy: the event channel is
        // unbounded so emitting can never stall the UI thread. A slow
        // consumer costs memory, not correctness.
        let (event_tx, event_rx) = mpsc::channel();
        let wake = Arc::new(WakeState::new());
        let actor = GuiActor {
            actions: action_rx,
            events: event_tx,
            wake: wake.clone(),
            registry: Registry::new(),
        };
        let handle = UiHandle {
            actions: action_tx,
            wake,
        };
        (actor, handle, event_rx)
    }

    /// Run the actor to termination. Blocks the calling thread for the
    /// actor's entire lifetime; must be called on the thread that owns
    /// the backend's toolkit state.
    ///
    /// Returns `Ok` when the backend requests shutdown (window close),
    /// `Err` on fatal backend failure. Either way the event channel
    /// closes when the actor is dropped.
    pub fn run<B: Backend>(mut self, mut backend: B) -> Result<(), ActorError> {
        self.wake.install(backend.waker());
        tracing::debug!("actor running");
        loop {
            self.drain(&mut backend);
            // A signal that arrived during the drain means someone may
            // have enqueued right behind it; loop once more instead of
            // parking.
            if self.wake.take_pending() {
                continue;
            }
            match backend.wait() {
                WaitOutcome::Woken => {}
                WaitOutcome::Input(events) => {
                    for event in events {
                        self.emit(event);
                    }
                }
                WaitOutcome::Quit => {
                    tracing::debug!("backend requested shutdown");
                    return Ok(());
                }
                WaitOutcome::Failed(error) => {
                    tracing::error!(%error, "backend failed, terminating");
                    return Err(error.into());
                }
            }
        }
    }

    /// Apply everything currently queued, in FIFO order.
    fn drain<B: Backend>(&mut self, backend: &mut B) {
        loop {
            match self.actions.try_recv() {
                Ok(action) => self.dispatch(action, backend),
                // Disconnected just means all handles are gone; the UI
                // keeps serving input until the backend quits.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn dispatch<B: Backend>(&mut self, action: Action, backend: &mut B) {
        tracing::debug!(action = action.kind(), widget = action.target(), "applying");
        if let Err(error) = self.apply(action, backend) {
            tracing::warn!(%error, "action rejected");
            self.emit(Event::Error { error });
        }
    }

    /// Apply one action: validate against the name table, hand the
    /// mutation to the backend, and only then commit the bookkeeping.
    /// On any error the table is untouched, keeping the action atomic
    /// from the application's point of view.
    fn apply<B: Backend>(&mut self, action: Action, backend: &mut B) -> Result<(), UiError> {
        use WidgetKind::*;

        let action = normalize(action);
        match &action {
            Action::Append { parent, children } => {
                self.expect_kind(parent, &[VBox, HBox])?;
                self.registry.validate_insert(children.iter())?;
                self.backend_apply(backend, &action)?;
                for child in children {
                    self.registry.insert_subtree(Some(parent), child);
                }
            }
            Action::AddToBox { parent, child, .. } => {
                self.expect_kind(parent, &[VBox, HBox])?;
                self.registry.validate_insert(std::iter::once(child))?;
                self.backend_apply(backend, &action)?;
                self.registry.insert_subtree(Some(parent), child);
            }
            Action::SetChild { parent, child } => {
                self.expect_kind(parent, &[EventBox, Frame, Scrolled])?;
                self.replace_children(backend, &action, parent, child)?;
            }
            Action::SetBoxContents { parent, child } => {
                self.expect_kind(parent, &[VBox, HBox])?;
                self.replace_children(backend, &action, parent, child)?;
            }
            Action::InsertRow { grid, row, .. } => {
                self.expect_kind(grid, &[Grid])?;
                self.registry
                    .validate_insert(row.iter().map(|cell| &cell.widget))?;
                self.backend_apply(backend, &action)?;
                for cell in row {
                    self.registry.insert_subtree(Some(grid), &cell.widget);
                }
            }
            Action::GridSet { grid, child, .. } => {
                self.expect_kind(grid, &[Grid])?;
                self.registry.validate_insert(std::iter::once(child))?;
                self.backend_apply(backend, &action)?;
                self.registry.insert_subtree(Some(grid), child);
            }
            Action::SetText { name, .. } => {
                self.expect_kind(name, &[Label, Button, CheckButton])?;
                self.backend_apply(backend, &action)?;
            }
            Action::SetEntry { name, .. } => {
                self.expect_kind(name, &[Entry])?;
                self.backend_apply(backend, &action)?;
            }
            Action::SetTextView { name, .. } => {
                self.expect_kind(name, &[TextView])?;
                self.backend_apply(backend, &action)?;
            }
            Action::SetImage { name, .. } => {
                self.expect_kind(name, &[Image, Button])?;
                self.backend_apply(backend, &action)?;
            }
            Action::StartSpinner { name } | Action::StopSpinner { name } => {
                self.expect_kind(name, &[Spinner])?;
                self.backend_apply(backend, &action)?;
            }
            Action::SetProgress { name, .. } => {
                self.expect_kind(name, &[Progress])?;
                self.backend_apply(backend, &action)?;
            }
            Action::Sensitive { name, .. }
            | Action::SetBackground { name, .. }
            | Action::SetForeground { name, .. }
            | Action::SetFocus { name } => {
                self.expect_live(name)?;
                self.backend_apply(backend, &action)?;
            }
            Action::Destroy { name } => {
                self.expect_live(name)?;
                self.backend_apply(backend, &action)?;
                self.registry.remove_subtree(name);
            }
            Action::Reset { root } => {
                // Only internal duplicates can invalidate a reset; the
                // old tree is gone the moment it is accepted.
                Registry::new().validate_insert(std::iter::once(root))?;
                self.backend_apply(backend, &action)?;
                self.registry.clear();
                self.registry.insert_subtree(None, root);
            }
            Action::SetTitle { .. } | Action::FileOpen { .. } => {
                self.backend_apply(backend, &action)?;
            }
        }
        Ok(())
    }

    /// Replace everything under `parent` with `child`. The outgoing
    /// subtree's names may be reused by the incoming one.
    fn replace_children<B: Backend>(
        &mut self,
        backend: &mut B,
        action: &Action,
        parent: &str,
        child: &Widget,
    ) -> Result<(), UiError> {
        let old_children = self.registry.children_of(parent);
        let mut doomed: FxHashSet<String> = FxHashSet::default();
        for old in &old_children {
            doomed.extend(self.registry.subtree_names(old));
        }
        self.registry
            .validate_insert_allowing(std::iter::once(child), &doomed)?;
        self.backend_apply(backend, action)?;
        for old in &old_children {
            self.registry.remove_subtree(old);
        }
        self.registry.insert_subtree(Some(parent), child);
        Ok(())
    }

    fn backend_apply<B: Backend>(
        &self,
        backend: &mut B,
        action: &Action,
    ) -> Result<(), UiError> {
        backend.apply(action).map_err(|error| {
            tracing::error!(action = action.kind(), %error, "backend rejected action");
            UiError::Backend(error.to_string())
        })
    }

    fn expect_live(&self, name: &str) -> Result<(), UiError> {
        if self.registry.contains(name) {
            Ok(())
        } else {
            Err(UiError::UnknownWidget(name.to_string()))
        }
    }

    fn expect_kind(&self, name: &str, allowed: &[WidgetKind]) -> Result<(), UiError> {
        match self.registry.kind_of(name) {
            None => Err(UiError::UnknownWidget(name.to_string())),
            Some(kind) if allowed.contains(&kind) => Ok(()),
            Some(_) => Err(UiError::WrongKind {
                name: name.to_string(),
                expected: allowed
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(" or "),
            }),
        }
    }

    fn emit(&self, event: Event) {
        if self.events.send(event).is_err() {
            tracing::warn!("event dropped: application receiver disconnected");
        }
    }
}

fn normalize(mut action: Action) -> Action {
    if let Action::SetProgress { fraction, .. } = &mut action {
        *fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
    action
}
