//! Action protocol
//!
//! An `Action` is one application-issued UI mutation. Actions are
//! self-describing, independent, and applied strictly in the order the
//! actor receives them. Targets are addressed by widget name only;
//! referencing an unknown name is a protocol error surfaced as an
//! `Event::Error`, never a crash.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Color;
use crate::widget::{GridCell, Icon, Widget};

/// The closed set of UI mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Append children under a box, after any existing children.
    Append { parent: String, children: Vec<Widget> },
    /// Insert one child into a box at a packing position.
    AddToBox {
        parent: String,
        pos: i32,
        child: Widget,
    },
    /// Replace the sole child of a single-child container.
    SetChild { parent: String, child: Widget },
    /// Drop everything inside a box and install one new child.
    SetBoxContents { parent: String, child: Widget },
    /// Insert a row of cells into a grid at a row position.
    InsertRow {
        grid: String,
        pos: i32,
        row: Vec<GridCell>,
    },
    /// Place a widget into one grid cell.
    GridSet {
        grid: String,
        col: i32,
        row: i32,
        child: Widget,
    },

    /// Change the display text of a label, button or check button.
    SetText { name: String, text: String },
    /// Overwrite the contents of an entry.
    SetEntry { name: String, text: String },
    /// Overwrite the contents of a text view.
    SetTextView { name: String, text: String },
    /// Swap the icon shown by an image or button.
    SetImage { name: String, icon: Icon },
    /// Enable or grey out a widget.
    Sensitive { name: String, sensitive: bool },
    SetBackground { name: String, color: Color },
    SetForeground { name: String, color: Color },
    /// Move keyboard focus to a widget.
    SetFocus { name: String },
    /// Update a progress bar; `fraction` is clamped to [0, 1].
    SetProgress {
        name: String,
        fraction: f64,
        text: String,
    },
    /// Set the window title.
    SetTitle { title: String },

    StartSpinner { name: String },
    StopSpinner { name: String },
    /// Remove a widget and its whole subtree; every contained name
    /// becomes available for reuse.
    Destroy { name: String },
    /// Discard the entire tree and install a new root atomically.
    Reset { root: Widget },

    /// Ask the backend to run a file chooser. The result arrives as an
    /// `Event::OpenResult` echoing `token` unchanged.
    FileOpen {
        save: bool,
        title: String,
        token: Value,
    },
}

impl Action {
    /// Variant name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Append { .. } => "Append",
            Action::AddToBox { .. } => "AddToBox",
            Action::SetChild { .. } => "SetChild",
            Action::SetBoxContents { .. } => "SetBoxContents",
            Action::InsertRow { .. } => "InsertRow",
            Action::GridSet { .. } => "GridSet",
            Action::SetText { .. } => "SetText",
            Action::SetEntry { .. } => "SetEntry",
            Action::SetTextView { .. } => "SetTextView",
            Action::SetImage { .. } => "SetImage",
            Action::Sensitive { .. } => "Sensitive",
            Action::SetBackground { .. } => "SetBackground",
            Action::SetForeground { .. } => "SetForeground",
            Action::SetFocus { .. } => "SetFocus",
            Action::SetProgress { .. } => "SetProgress",
            Action::SetTitle { .. } => "SetTitle",
            Action::StartSpinner { .. } => "StartSpinner",
            Action::StopSpinner { .. } => "StopSpinner",
            Action::Destroy { .. } => "Destroy",
            Action::Reset { .. } => "Reset",
            Action::FileOpen { .. } => "FileOpen",
        }
    }

    /// The name this action addresses, if it addresses one.
    pub fn target(&self) -> Option<&str> {
        match self {
            Action::Append { parent, .. }
            | Action::AddToBox { parent, .. }
            | Action::SetChild { parent, .. }
            | Action::SetBoxContents { parent, .. } => Some(parent),
            Action::InsertRow { grid, .. } | Action::GridSet { grid, .. } => Some(grid),
            Action::SetText { name, .. }
            | Action::SetEntry { name, .. }
            | Action::SetTextView { name, .. }
            | Action::SetImage { name, .. }
            | Action::Sensitive { name, .. }
            | Action::SetBackground { name, .. }
            | Action::SetForeground { name, .. }
            | Action::SetFocus { name }
            | Action::SetProgress { name, .. }
            | Action::StartSpinner { name }
            | Action::StopSpinner { name }
            | Action::Destroy { name } => Some(name),
            Action::SetTitle { .. } | Action::Reset { .. } | Action::FileOpen { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Entry, Label, VBox};

    #[test]
    fn test_actions_serialize_round_trip() {
        let action = Action::Append {
            parent: "root".into(),
            children: vec![
                Entry::new("e1").text("seed").into(),
                Label::new("l1", "hi").into(),
            ],
        };
        let json = serde_json::to_string(&action).expect("serialize");
        let back: Action = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, action);
    }

    #[test]
    fn test_file_open_token_survives_serialization() {
        let action = Action::FileOpen {
            save: false,
            title: "Open".into(),
            token: serde_json::json!({"request": 7}),
        };
        let json = serde_json::to_string(&action).expect("serialize");
        let back: Action = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, action);
    }

    #[test]
    fn test_target_resolution() {
        let reset = Action::Reset {
            root: VBox::new("root").into(),
        };
        assert_eq!(reset.target(), None);
        assert_eq!(
            Action::Destroy { name: "e1".into() }.target(),
            Some("e1")
        );
        assert_eq!(reset.kind(), "Reset");
    }
}
