//! Event protocol
//!
//! An `Event` is one actor-issued notification: a user interaction, an
//! operation result, or a protocol error. Events are emitted in the
//! order their causes occur on the UI thread; a `Click` snapshot
//! reflects input values at the moment of the click, never later ones.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::widget::CalendarDate;

/// Point-in-time capture of every tracked input widget, keyed by
/// widget name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub entries: FxHashMap<String, String>,
    pub text_views: FxHashMap<String, String>,
    /// Selected label per combo.
    pub combos: FxHashMap<String, String>,
    pub checks: FxHashMap<String, bool>,
    /// Selected option index per radio group.
    pub radios: FxHashMap<String, usize>,
    pub calendars: FxHashMap<String, CalendarDate>,
    pub spin_buttons: FxHashMap<String, f64>,
}

/// The closed set of notifications flowing from the actor to the
/// application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A widget was activated. Carries a consistent snapshot of all
    /// tracked input values at the moment of activation.
    Click {
        name: String,
        snapshot: InputSnapshot,
    },
    /// Live-typing notification from a widget built with
    /// `update_on_change`.
    Update { name: String, text: String },
    /// Outcome of an earlier `Action::FileOpen`; `token` is the value
    /// the application attached to the request.
    OpenResult {
        ok: bool,
        path: String,
        token: Value,
    },
    /// Opaque UI state transition marker.
    State { id: i32 },
    /// A recoverable failure. The actor keeps running.
    Error { error: UiError },
}

/// Recoverable UI failures, reported in-band as `Event::Error`.
#[derive(Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum UiError {
    /// An action addressed a name with no live widget behind it.
    #[error("no live widget named {0:?}")]
    UnknownWidget(String),

    /// A structural action tried to introduce a name that is already
    /// live.
    #[error("widget name {0:?} is already in use")]
    NameCollision(String),

    /// The target exists but is the wrong kind of widget for the
    /// requested operation.
    #[error("widget {name:?} has the wrong kind (want {expected})")]
    WrongKind { name: String, expected: String },

    /// A native rendering call failed. The mutation was not applied.
    #[error("backend failure: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_snapshot_round_trip() {
        let mut snapshot = InputSnapshot::default();
        snapshot.entries.insert("e1".into(), "hello".into());
        snapshot.checks.insert("c1".into(), true);
        snapshot.calendars.insert(
            "cal".into(),
            CalendarDate {
                year: 2024,
                month: 6,
                day: 30,
            },
        );
        let event = Event::Click {
            name: "b1".into(),
            snapshot,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        let back: Event = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        assert_eq!(
            UiError::UnknownWidget("missing".into()).to_string(),
            "no live widget named \"missing\""
        );
        assert_eq!(
            UiError::WrongKind {
                name: "l1".into(),
                expected: "entry".into(),
            }
            .to_string(),
            "widget \"l1\" has the wrong kind (want entry)"
        );
    }
}
