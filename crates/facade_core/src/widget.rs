//! Widget tree description
//!
//! A `Widget` is a pure description of a UI element - constructing one
//! performs no toolkit work. Containers own their children, so a
//! description is always a tree, never a graph.
//!
//! Widgets are addressed exclusively by **name**. A name must be unique
//! within the live tree; the model itself does not enforce this - the
//! actor rejects colliding insertions at apply time. A widget with an
//! empty name is anonymous: it renders, but no Action or Event can
//! reach it.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Alignment of a widget within the space allotted to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    #[default]
    None,
    Start,
    End,
    Fill,
    Center,
}

/// Built-in status images usable by buttons and image widgets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Icon {
    #[default]
    None,
    Red,
    Yellow,
    Green,
    Black,
    Error,
}

/// A calendar date as year/month/day, months and days starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Default for CalendarDate {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
        }
    }
}

/// Properties shared by every widget variant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Props {
    /// Unique address of this widget within the live tree. Empty means
    /// anonymous.
    pub name: String,
    pub padding: u32,
    pub expand: bool,
    pub fill: bool,
    /// Pack from the end of the containing box instead of the start.
    pub pack_end: bool,
    pub foreground: Color,
    pub background: Color,
    pub focused: bool,
    pub insensitive: bool,
    /// Requested size; zero means toolkit-natural.
    pub width: i32,
    pub height: i32,
    pub font: String,
    pub h_expand: bool,
    pub v_expand: bool,
    pub margin: i32,
    pub margin_top: i32,
    pub margin_bottom: i32,
    pub margin_left: i32,
    pub h_align: Align,
    pub v_align: Align,
}

impl Props {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Chained setters for the shared `Props` fields, in the same shape on
/// every variant.
macro_rules! impl_props {
    ($ty:ident) => {
        impl $ty {
            pub fn props(&self) -> &Props {
                &self.props
            }

            pub fn padding(mut self, padding: u32) -> Self {
                self.props.padding = padding;
                self
            }

            pub fn expand(mut self) -> Self {
                self.props.expand = true;
                self
            }

            pub fn fill(mut self) -> Self {
                self.props.fill = true;
                self
            }

            pub fn pack_end(mut self) -> Self {
                self.props.pack_end = true;
                self
            }

            pub fn foreground(mut self, color: Color) -> Self {
                self.props.foreground = color;
                self
            }

            pub fn background(mut self, color: Color) -> Self {
                self.props.background = color;
                self
            }

            pub fn focused(mut self) -> Self {
                self.props.focused = true;
                self
            }

            pub fn insensitive(mut self) -> Self {
                self.props.insensitive = true;
                self
            }

            pub fn size(mut self, width: i32, height: i32) -> Self {
                self.props.width = width;
                self.props.height = height;
                self
            }

            pub fn font(mut self, font: impl Into<String>) -> Self {
                self.props.font = font.into();
                self
            }

            pub fn margin(mut self, margin: i32) -> Self {
                self.props.margin = margin;
                self
            }

            pub fn align(mut self, h: Align, v: Align) -> Self {
                self.props.h_align = h;
                self.props.v_align = v;
                self
            }
        }

        impl From<$ty> for Widget {
            fn from(widget: $ty) -> Widget {
                Widget::$ty(widget)
            }
        }
    };
}

/// Vertical box container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VBox {
    pub props: Props,
    pub spacing: u32,
    pub children: Vec<Widget>,
}

impl VBox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            ..Self::default()
        }
    }

    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn child(mut self, child: impl Into<Widget>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Horizontal box container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HBox {
    pub props: Props,
    pub spacing: u32,
    pub children: Vec<Widget>,
}

impl HBox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            ..Self::default()
        }
    }

    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn child(mut self, child: impl Into<Widget>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Invisible container that adds an input surface around one child.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBox {
    pub props: Props,
    pub child: Option<Box<Widget>>,
}

impl EventBox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            child: None,
        }
    }

    pub fn child(mut self, child: impl Into<Widget>) -> Self {
        self.child = Some(Box::new(child.into()));
        self
    }
}

/// Two children split by a draggable divider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paned {
    pub props: Props,
    pub left: Box<Widget>,
    pub right: Box<Widget>,
}

impl Paned {
    pub fn new(name: impl Into<String>, left: impl Into<Widget>, right: impl Into<Widget>) -> Self {
        Self {
            props: Props::new(name),
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }
}

/// Scrollable container with one child, optionally behind a viewport.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scrolled {
    pub props: Props,
    pub child: Option<Box<Widget>>,
    pub horizontal: bool,
    pub viewport: bool,
}

impl Scrolled {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            ..Self::default()
        }
    }

    pub fn child(mut self, child: impl Into<Widget>) -> Self {
        self.child = Some(Box::new(child.into()));
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.horizontal = true;
        self
    }

    pub fn viewport(mut self) -> Self {
        self.viewport = true;
        self
    }
}

/// One cell of a grid: a widget plus its column/row span.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub width: u32,
    pub height: u32,
    pub widget: Widget,
}

impl GridCell {
    pub fn new(widget: impl Into<Widget>) -> Self {
        Self {
            width: 1,
            height: 1,
            widget: widget.into(),
        }
    }

    pub fn span(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Two-dimensional arrangement of cells.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub props: Props,
    pub rows: Vec<Vec<GridCell>>,
    pub row_spacing: u32,
    pub col_spacing: u32,
    pub row_homogeneous: bool,
    pub col_homogeneous: bool,
}

impl Grid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            ..Self::default()
        }
    }

    pub fn spacing(mut self, row: u32, col: u32) -> Self {
        self.row_spacing = row;
        self.col_spacing = col;
        self
    }

    pub fn homogeneous(mut self, rows: bool, cols: bool) -> Self {
        self.row_homogeneous = rows;
        self.col_homogeneous = cols;
        self
    }

    pub fn row(mut self, cells: Vec<GridCell>) -> Self {
        self.rows.push(cells);
        self
    }
}

/// Decorative border around one child.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub props: Props,
    pub child: Option<Box<Widget>>,
}

impl Frame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            child: None,
        }
    }

    pub fn child(mut self, child: impl Into<Widget>) -> Self {
        self.child = Some(Box::new(child.into()));
        self
    }
}

/// Static text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub props: Props,
    pub text: String,
    /// Toolkit markup; takes precedence over `text` when non-empty.
    pub markup: String,
    pub size: i32,
    pub x_align: f32,
    pub y_align: f32,
    /// Wrap width in characters; zero disables wrapping.
    pub wrap: i32,
    pub selectable: bool,
}

impl Label {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn wrap(mut self, chars: i32) -> Self {
        self.wrap = chars;
        self
    }

    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }
}

/// Single-line text input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub props: Props,
    pub text: String,
    /// Requested width in characters; zero means toolkit-natural.
    pub width: i32,
    pub password: bool,
    /// Emit an `Update` event on every keystroke.
    pub update_on_change: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn width(mut self, chars: i32) -> Self {
        self.width = chars;
        self
    }

    pub fn password(mut self) -> Self {
        self.password = true;
        self
    }

    pub fn update_on_change(mut self) -> Self {
        self.update_on_change = true;
        self
    }
}

/// Multi-line text view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextView {
    pub props: Props,
    pub editable: bool,
    pub text: String,
    pub wrap: bool,
    /// Emit an `Update` event on every buffer change.
    pub update_on_change: bool,
    pub spell_check: bool,
}

impl TextView {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn update_on_change(mut self) -> Self {
        self.update_on_change = true;
        self
    }

    pub fn spell_check(mut self) -> Self {
        self.spell_check = true;
        self
    }
}

/// Clickable button carrying text, markup or an icon.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub props: Props,
    pub text: String,
    pub markup: String,
    pub icon: Icon,
}

impl Button {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }
}

/// Indeterminate activity indicator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Spinner {
    pub props: Props,
}

impl Spinner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
        }
    }
}

/// Determinate progress bar.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub props: Props,
}

impl Progress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
        }
    }
}

/// Dropdown over a list of string options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub props: Props,
    pub labels: Vec<String>,
    pub pre_selected: Option<String>,
}

impl Combo {
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            props: Props::new(name),
            labels,
            pre_selected: None,
        }
    }

    pub fn pre_selected(mut self, label: impl Into<String>) -> Self {
        self.pre_selected = Some(label.into());
        self
    }
}

/// Group of mutually exclusive radio options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RadioGroup {
    pub props: Props,
    pub labels: Vec<String>,
}

impl RadioGroup {
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            props: Props::new(name),
            labels,
        }
    }
}

/// Toggleable check box with a label.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckButton {
    pub props: Props,
    pub text: String,
}

impl CheckButton {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
            text: text.into(),
        }
    }
}

/// Numeric input constrained to a range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinButton {
    pub props: Props,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SpinButton {
    pub fn new(name: impl Into<String>, min: f64, max: f64, step: f64) -> Self {
        Self {
            props: Props::new(name),
            min,
            max,
            step,
        }
    }
}

/// Month-view date picker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub props: Props,
}

impl Calendar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            props: Props::new(name),
        }
    }
}

/// Static image display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub props: Props,
    pub icon: Icon,
    pub x_align: f32,
    pub y_align: f32,
}

impl Image {
    pub fn new(name: impl Into<String>, icon: Icon) -> Self {
        Self {
            props: Props::new(name),
            icon,
            ..Self::default()
        }
    }
}

impl_props!(VBox);
impl_props!(HBox);
impl_props!(EventBox);
impl_props!(Paned);
impl_props!(Scrolled);
impl_props!(Grid);
impl_props!(Frame);
impl_props!(Label);
impl_props!(Entry);
impl_props!(TextView);
impl_props!(Button);
impl_props!(Spinner);
impl_props!(Progress);
impl_props!(Combo);
impl_props!(RadioGroup);
impl_props!(CheckButton);
impl_props!(SpinButton);
impl_props!(Calendar);
impl_props!(Image);

/// The closed set of widget variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Widget {
    VBox(VBox),
    HBox(HBox),
    EventBox(EventBox),
    Paned(Paned),
    Scrolled(Scrolled),
    Grid(Grid),
    Frame(Frame),
    Label(Label),
    Entry(Entry),
    TextView(TextView),
    Button(Button),
    Spinner(Spinner),
    Progress(Progress),
    Combo(Combo),
    RadioGroup(RadioGroup),
    CheckButton(CheckButton),
    SpinButton(SpinButton),
    Calendar(Calendar),
    Image(Image),
}

/// Discriminant of a `Widget`, used for kind checks in error reporting
/// and by actor-side bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    VBox,
    HBox,
    EventBox,
    Paned,
    Scrolled,
    Grid,
    Frame,
    Label,
    Entry,
    TextView,
    Button,
    Spinner,
    Progress,
    Combo,
    RadioGroup,
    CheckButton,
    SpinButton,
    Calendar,
    Image,
}

impl WidgetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            WidgetKind::VBox => "vbox",
            WidgetKind::HBox => "hbox",
            WidgetKind::EventBox => "event box",
            WidgetKind::Paned => "paned",
            WidgetKind::Scrolled => "scrolled",
            WidgetKind::Grid => "grid",
            WidgetKind::Frame => "frame",
            WidgetKind::Label => "label",
            WidgetKind::Entry => "entry",
            WidgetKind::TextView => "text view",
            WidgetKind::Button => "button",
            WidgetKind::Spinner => "spinner",
            WidgetKind::Progress => "progress",
            WidgetKind::Combo => "combo",
            WidgetKind::RadioGroup => "radio group",
            WidgetKind::CheckButton => "check button",
            WidgetKind::SpinButton => "spin button",
            WidgetKind::Calendar => "calendar",
            WidgetKind::Image => "image",
        }
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Widget {
    /// The widget's name; empty for anonymous widgets.
    pub fn name(&self) -> &str {
        &self.props().name
    }

    pub fn props(&self) -> &Props {
        match self {
            Widget::VBox(w) => &w.props,
            Widget::HBox(w) => &w.props,
            Widget::EventBox(w) => &w.props,
            Widget::Paned(w) => &w.props,
            Widget::Scrolled(w) => &w.props,
            Widget::Grid(w) => &w.props,
            Widget::Frame(w) => &w.props,
            Widget::Label(w) => &w.props,
            Widget::Entry(w) => &w.props,
            Widget::TextView(w) => &w.props,
            Widget::Button(w) => &w.props,
            Widget::Spinner(w) => &w.props,
            Widget::Progress(w) => &w.props,
            Widget::Combo(w) => &w.props,
            Widget::RadioGroup(w) => &w.props,
            Widget::CheckButton(w) => &w.props,
            Widget::SpinButton(w) => &w.props,
            Widget::Calendar(w) => &w.props,
            Widget::Image(w) => &w.props,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self {
            Widget::VBox(_) => WidgetKind::VBox,
            Widget::HBox(_) => WidgetKind::HBox,
            Widget::EventBox(_) => WidgetKind::EventBox,
            Widget::Paned(_) => WidgetKind::Paned,
            Widget::Scrolled(_) => WidgetKind::Scrolled,
            Widget::Grid(_) => WidgetKind::Grid,
            Widget::Frame(_) => WidgetKind::Frame,
            Widget::Label(_) => WidgetKind::Label,
            Widget::Entry(_) => WidgetKind::Entry,
            Widget::TextView(_) => WidgetKind::TextView,
            Widget::Button(_) => WidgetKind::Button,
            Widget::Spinner(_) => WidgetKind::Spinner,
            Widget::Progress(_) => WidgetKind::Progress,
            Widget::Combo(_) => WidgetKind::Combo,
            Widget::RadioGroup(_) => WidgetKind::RadioGroup,
            Widget::CheckButton(_) => WidgetKind::CheckButton,
            Widget::SpinButton(_) => WidgetKind::SpinButton,
            Widget::Calendar(_) => WidgetKind::Calendar,
            Widget::Image(_) => WidgetKind::Image,
        }
    }

    /// Direct children, in packing order.
    pub fn children(&self) -> Vec<&Widget> {
        match self {
            Widget::VBox(w) => w.children.iter().collect(),
            Widget::HBox(w) => w.children.iter().collect(),
            Widget::EventBox(w) => w.child.iter().map(AsRef::as_ref).collect(),
            Widget::Paned(w) => vec![&w.left, &w.right],
            Widget::Scrolled(w) => w.child.iter().map(AsRef::as_ref).collect(),
            Widget::Grid(w) => w
                .rows
                .iter()
                .flatten()
                .map(|cell| &cell.widget)
                .collect(),
            Widget::Frame(w) => w.child.iter().map(AsRef::as_ref).collect(),
            _ => Vec::new(),
        }
    }

    /// Pre-order visit of this widget and every descendant.
    pub fn for_each(&self, f: &mut dyn FnMut(&Widget)) {
        f(self);
        for child in self.children() {
            child.for_each(f);
        }
    }

    /// Collect `(name, kind)` for every named node in the subtree,
    /// pre-order. Anonymous widgets are skipped but still descended
    /// into.
    pub fn named_nodes(&self) -> Vec<(String, WidgetKind)> {
        let mut nodes = Vec::new();
        self.for_each(&mut |w| {
            if !w.name().is_empty() {
                nodes.push((w.name().to_string(), w.kind()));
            }
        });
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_assemble_pure_data() {
        let w: Widget = VBox::new("root")
            .spacing(4)
            .padding(8)
            .expand()
            .child(Label::new("l", "hi").wrap(40))
            .child(Entry::new("e").password().update_on_change())
            .into();

        assert_eq!(w.name(), "root");
        assert_eq!(w.kind(), WidgetKind::VBox);
        assert_eq!(w.props().padding, 8);
        assert!(w.props().expand);
        assert_eq!(w.children().len(), 2);
    }

    #[test]
    fn test_named_nodes_skips_anonymous_but_descends() {
        let w: Widget = VBox::new("root")
            .child(
                // Anonymous wrapper around a named button.
                HBox::new("").child(Button::new("ok", "OK")),
            )
            .child(Label::new("", "decoration"))
            .child(
                Grid::new("g")
                    .row(vec![GridCell::new(Label::new("cell", "x")).span(2, 1)]),
            )
            .into();

        let names: Vec<String> = w.named_nodes().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["root", "ok", "g", "cell"]);
    }

    #[test]
    fn test_paned_and_scrolled_children() {
        let w: Widget = Paned::new(
            "split",
            Scrolled::new("left").viewport().child(Label::new("a", "A")),
            Frame::new("right").child(Label::new("b", "B")),
        )
        .into();

        let names: Vec<String> = w.named_nodes().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["split", "left", "a", "right", "b"]);
    }
}
