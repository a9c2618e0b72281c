//! Facade protocol core
//!
//! This crate defines the toolkit-independent data model that lets
//! application logic drive a GUI without linking against any rendering
//! toolkit:
//!
//! - **Widget model**: a closed set of container and leaf descriptions
//!   forming an owned tree, addressed purely by widget name
//! - **Action protocol**: every mutation an application may request of
//!   a live UI
//! - **Event protocol**: every notification a UI may send back
//!
//! All protocol values are plain serializable data; constructing them
//! has no side effects. The live tree itself is owned by the actor in
//! `facade_runtime`, which consumes Actions and produces Events.
//!
//! # Example
//!
//! ```rust
//! use facade_core::{Action, Entry, Label, VBox, Widget};
//!
//! let root: Widget = VBox::new("root")
//!     .spacing(4)
//!     .child(Label::new("greeting", "Hello"))
//!     .child(Entry::new("input").update_on_change())
//!     .into();
//!
//! let action = Action::Reset { root };
//! assert_eq!(action.kind(), "Reset");
//! ```

pub mod action;
pub mod color;
pub mod event;
pub mod widget;

pub use action::Action;
pub use color::Color;
pub use event::{Event, InputSnapshot, UiError};
pub use widget::{
    Align, Button, Calendar, CalendarDate, CheckButton, Combo, Entry, EventBox, Frame, Grid,
    GridCell, HBox, Icon, Image, Label, Paned, Progress, Props, RadioGroup, Scrolled, SpinButton,
    Spinner, TextView, VBox, Widget, WidgetKind,
};
