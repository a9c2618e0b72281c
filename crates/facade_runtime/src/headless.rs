//! Deterministic in-process backend
//!
//! No toolkit, no window: the headless backend mirrors input-widget
//! values keyed by name and lets tests and demos play the user through
//! a thread-safe [`HeadlessHandle`] - click a button, type into an
//! entry, resolve a file chooser. Everything the actor applies and
//! everything the handle simulates is serialized through one lock, so
//! runs are reproducible.

use std::collections::VecDeque;
use std::sync::Arc;

use facade_core::{
    Action, CalendarDate, Color, Event, Icon, InputSnapshot, Widget, WidgetKind,
};
use parking_lot::{Condvar, Mutex};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::backend::{Backend, BackendError, WaitOutcome, Waker};

/// One simulated user interaction.
enum Sim {
    Click(String),
    TypeEntry { name: String, text: String },
    TypeTextView { name: String, text: String },
    SelectCombo { name: String, label: String },
    SetCheck { name: String, checked: bool },
    PickRadio { name: String, index: usize },
    PickDate { name: String, date: CalendarDate },
    Spin { name: String, value: f64 },
}

/// The headless stand-in for a native widget tree.
#[derive(Default)]
struct Mirror {
    title: String,
    kinds: FxHashMap<String, WidgetKind>,
    children: FxHashMap<String, Vec<String>>,
    entries: FxHashMap<String, String>,
    text_views: FxHashMap<String, String>,
    combos: FxHashMap<String, String>,
    checks: FxHashMap<String, bool>,
    radios: FxHashMap<String, usize>,
    calendars: FxHashMap<String, CalendarDate>,
    spin_buttons: FxHashMap<String, f64>,
    texts: FxHashMap<String, String>,
    icons: FxHashMap<String, Icon>,
    foregrounds: FxHashMap<String, Color>,
    backgrounds: FxHashMap<String, Color>,
    progress: FxHashMap<String, (f64, String)>,
    live_typing: FxHashSet<String>,
    insensitive: FxHashSet<String>,
    spinning: FxHashSet<String>,
    focus: Option<String>,
}

impl Mirror {
    fn mount(&mut self, parent: Option<&str>, widget: &Widget) {
        let name = widget.name();
        let anchor = if name.is_empty() {
            parent.map(str::to_string)
        } else {
            self.kinds.insert(name.to_string(), widget.kind());
            if let Some(parent) = parent {
                self.children
                    .entry(parent.to_string())
                    .or_default()
                    .push(name.to_string());
            }
            self.seed(name, widget);
            Some(name.to_string())
        };
        for child in widget.children() {
            self.mount(anchor.as_deref(), child);
        }
    }

    /// Give a freshly mounted widget its construction-time value.
    fn seed(&mut self, name: &str, widget: &Widget) {
        match widget {
            Widget::Entry(w) => {
                self.entries.insert(name.to_string(), w.text.clone());
                if w.update_on_change {
                    self.live_typing.insert(name.to_string());
                }
            }
            Widget::TextView(w) => {
                self.text_views.insert(name.to_string(), w.text.clone());
                if w.update_on_change {
                    self.live_typing.insert(name.to_string());
                }
            }
            Widget::Combo(w) => {
                self.combos.insert(
                    name.to_string(),
                    w.pre_selected.clone().unwrap_or_default(),
                );
            }
            Widget::CheckButton(w) => {
                self.checks.insert(name.to_string(), false);
                self.texts.insert(name.to_string(), w.text.clone());
            }
            Widget::RadioGroup(_) => {
                self.radios.insert(name.to_string(), 0);
            }
            Widget::Calendar(_) => {
                self.calendars
                    .insert(name.to_string(), CalendarDate::default());
            }
            Widget::SpinButton(w) => {
                self.spin_buttons.insert(name.to_string(), w.min);
            }
            Widget::Label(w) => {
                self.texts.insert(name.to_string(), w.text.clone());
            }
            Widget::Button(w) => {
                self.texts.insert(name.to_string(), w.text.clone());
                self.icons.insert(name.to_string(), w.icon);
            }
            Widget::Image(w) => {
                self.icons.insert(name.to_string(), w.icon);
            }
            _ => {}
        }
    }

    fn purge(&mut self, name: &str) {
        self.kinds.remove(name);
        self.entries.remove(name);
        self.text_views.remove(name);
        self.combos.remove(name);
        self.checks.remove(name);
        self.radios.remove(name);
        self.calendars.remove(name);
        self.spin_buttons.remove(name);
        self.texts.remove(name);
        self.icons.remove(name);
        self.foregrounds.remove(name);
        self.backgrounds.remove(name);
        self.progress.remove(name);
        self.live_typing.remove(name);
        self.insensitive.remove(name);
        self.spinning.remove(name);
        if self.focus.as_deref() == Some(name) {
            self.focus = None;
        }
        if let Some(children) = self.children.remove(name) {
            for child in children {
                self.purge(&child);
            }
        }
    }

    fn destroy(&mut self, name: &str) {
        self.purge(name);
        for children in self.children.values_mut() {
            children.retain(|child| child != name);
        }
    }

    fn reset(&mut self, root: &Widget) {
        let title = std::mem::take(&mut self.title);
        *self = Mirror {
            title,
            ..Mirror::default()
        };
        self.mount(None, root);
    }

    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            entries: self.entries.clone(),
            text_views: self.text_views.clone(),
            combos: self.combos.clone(),
            checks: self.checks.clone(),
            radios: self.radios.clone(),
            calendars: self.calendars.clone(),
            spin_buttons: self.spin_buttons.clone(),
        }
    }
}

#[derive(Default)]
struct State {
    mirror: Mirror,
    sims: VecDeque<Sim>,
    /// Events synthesized while applying actions (file chooser
    /// results), delivered by the next wait.
    pending: VecDeque<Event>,
    /// Scripted answer for file chooser requests; `None` cancels.
    file_response: Option<String>,
    woken: bool,
    quit: bool,
    parked: bool,
}

struct Shared {
    state: Mutex<State>,
    cond: Condvar,
}

struct HeadlessWaker {
    shared: Arc<Shared>,
}

impl Waker for HeadlessWaker {
    fn wake(&self) {
        let mut state = self.shared.state.lock();
        state.woken = true;
        self.shared.cond.notify_all();
    }
}

/// Backend half: give this to [`GuiActor::run`].
///
/// [`GuiActor::run`]: crate::GuiActor::run
pub struct HeadlessBackend {
    shared: Arc<Shared>,
}

/// Driver half: simulate the user and inspect the mirrored tree from
/// any thread.
#[derive(Clone)]
pub struct HeadlessHandle {
    shared: Arc<Shared>,
}

impl HeadlessBackend {
    pub fn new() -> (HeadlessBackend, HeadlessHandle) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::default()),
            cond: Condvar::new(),
        });
        (
            HeadlessBackend {
                shared: shared.clone(),
            },
            HeadlessHandle { shared },
        )
    }

    fn run_sim(state: &mut State, sim: Sim, events: &mut Vec<Event>) {
        match sim {
            Sim::Click(name) => {
                if state.mirror.kinds.contains_key(&name) {
                    events.push(Event::Click {
                        name,
                        snapshot: state.mirror.snapshot(),
                    });
                } else {
                    tracing::warn!(%name, "simulated click on unknown widget, ignored");
                }
            }
            Sim::TypeEntry { name, text } => {
                if state.mirror.entries.contains_key(&name) {
                    state.mirror.entries.insert(name.clone(), text.clone());
                    if state.mirror.live_typing.contains(&name) {
                        events.push(Event::Update { name, text });
                    }
                } else {
                    tracing::warn!(%name, "simulated typing into unknown entry, ignored");
                }
            }
            Sim::TypeTextView { name, text } => {
                if state.mirror.text_views.contains_key(&name) {
                    state.mirror.text_views.insert(name.clone(), text.clone());
                    if state.mirror.live_typing.contains(&name) {
                        events.push(Event::Update { name, text });
                    }
                } else {
                    tracing::warn!(%name, "simulated typing into unknown text view, ignored");
                }
            }
            Sim::SelectCombo { name, label } => {
                if state.mirror.combos.contains_key(&name) {
                    state.mirror.combos.insert(name, label);
                }
            }
            Sim::SetCheck { name, checked } => {
                if state.mirror.checks.contains_key(&name) {
                    state.mirror.checks.insert(name, checked);
                }
            }
            Sim::PickRadio { name, index } => {
                if state.mirror.radios.contains_key(&name) {
                    state.mirror.radios.insert(name, index);
                }
            }
            Sim::PickDate { name, date } => {
                if state.mirror.calendars.contains_key(&name) {
                    state.mirror.calendars.insert(name, date);
                }
            }
            Sim::Spin { name, value } => {
                if state.mirror.spin_buttons.contains_key(&name) {
                    state.mirror.spin_buttons.insert(name, value);
                }
            }
        }
    }
}

impl Backend for HeadlessBackend {
    fn apply(&mut self, action: &Action) -> Result<(), BackendError> {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        let mirror = &mut state.mirror;
        match action {
            Action::Append { parent, children } => {
                for child in children {
                    mirror.mount(Some(parent), child);
                }
            }
            Action::AddToBox { parent, child, .. } => mirror.mount(Some(parent), child),
            Action::SetChild { parent, child } | Action::SetBoxContents { parent, child } => {
                for old in mirror.children.get(parent).cloned().unwrap_or_default() {
                    mirror.destroy(&old);
                }
                mirror.mount(Some(parent), child);
            }
            Action::InsertRow { grid, row, .. } => {
                for cell in row {
                    mirror.mount(Some(grid), &cell.widget);
                }
            }
            Action::GridSet { grid, child, .. } => mirror.mount(Some(grid), child),
            Action::SetText { name, text } => {
                mirror.texts.insert(name.clone(), text.clone());
            }
            Action::SetEntry { name, text } => {
                mirror.entries.insert(name.clone(), text.clone());
            }
            Action::SetTextView { name, text } => {
                mirror.text_views.insert(name.clone(), text.clone());
            }
            Action::SetImage { name, icon } => {
                mirror.icons.insert(name.clone(), *icon);
            }
            Action::Sensitive { name, sensitive } => {
                if *sensitive {
                    mirror.insensitive.remove(name);
                } else {
                    mirror.insensitive.insert(name.clone());
                }
            }
            Action::SetBackground { name, color } => {
                mirror.backgrounds.insert(name.clone(), *color);
            }
            Action::SetForeground { name, color } => {
                mirror.foregrounds.insert(name.clone(), *color);
            }
            Action::SetFocus { name } => mirror.focus = Some(name.clone()),
            Action::SetProgress {
                name,
                fraction,
                text,
            } => {
                mirror.progress.insert(name.clone(), (*fraction, text.clone()));
            }
            Action::SetTitle { title } => mirror.title = title.clone(),
            Action::StartSpinner { name } => {
                mirror.spinning.insert(name.clone());
            }
            Action::StopSpinner { name } => {
                mirror.spinning.remove(name);
            }
            Action::Destroy { name } => mirror.destroy(name),
            Action::Reset { root } => mirror.reset(root),
            Action::FileOpen { token, .. } => {
                let response = state.file_response.clone();
                state.pending.push_back(Event::OpenResult {
                    ok: response.is_some(),
                    path: response.unwrap_or_default(),
                    token: token.clone(),
                });
            }
        }
        Ok(())
    }

    fn wait(&mut self) -> WaitOutcome {
        let mut state = self.shared.state.lock();
        loop {
            if state.quit {
                return WaitOutcome::Quit;
            }
            if state.woken {
                state.woken = false;
                return WaitOutcome::Woken;
            }
            if !state.pending.is_empty() {
                return WaitOutcome::Input(state.pending.drain(..).collect());
            }
            if !state.sims.is_empty() {
                let mut events = Vec::new();
                while let Some(sim) = state.sims.pop_front() {
                    Self::run_sim(&mut state, sim, &mut events);
                }
                if !events.is_empty() {
                    return WaitOutcome::Input(events);
                }
                continue;
            }
            state.parked = true;
            self.shared.cond.notify_all();
            self.shared.cond.wait(&mut state);
            state.parked = false;
        }
    }

    fn waker(&self) -> Arc<dyn Waker> {
        Arc::new(HeadlessWaker {
            shared: self.shared.clone(),
        })
    }
}

impl HeadlessHandle {
    fn push(&self, sim: Sim) {
        let mut state = self.shared.state.lock();
        state.sims.push_back(sim);
        self.shared.cond.notify_all();
    }

    /// Click a named widget. The resulting `Event::Click` snapshots
    /// every tracked input value as of the moment the click is
    /// processed.
    pub fn click(&self, name: impl Into<String>) {
        self.push(Sim::Click(name.into()));
    }

    /// Replace an entry's contents as if the user typed it. Emits an
    /// `Event::Update` if the entry was built with `update_on_change`.
    pub fn type_entry(&self, name: impl Into<String>, text: impl Into<String>) {
        self.push(Sim::TypeEntry {
            name: name.into(),
            text: text.into(),
        });
    }

    /// Replace a text view's contents as if the user typed it.
    pub fn type_text_view(&self, name: impl Into<String>, text: impl Into<String>) {
        self.push(Sim::TypeTextView {
            name: name.into(),
            text: text.into(),
        });
    }

    pub fn select_combo(&self, name: impl Into<String>, label: impl Into<String>) {
        self.push(Sim::SelectCombo {
            name: name.into(),
            label: label.into(),
        });
    }

    pub fn set_check(&self, name: impl Into<String>, checked: bool) {
        self.push(Sim::SetCheck {
            name: name.into(),
            checked,
        });
    }

    pub fn pick_radio(&self, name: impl Into<String>, index: usize) {
        self.push(Sim::PickRadio {
            name: name.into(),
            index,
        });
    }

    pub fn pick_date(&self, name: impl Into<String>, date: CalendarDate) {
        self.push(Sim::PickDate {
            name: name.into(),
            date,
        });
    }

    pub fn spin(&self, name: impl Into<String>, value: f64) {
        self.push(Sim::Spin {
            name: name.into(),
            value,
        });
    }

    /// Script the answer to subsequent file chooser requests. `Some`
    /// resolves with that path, `None` cancels.
    pub fn respond_file_open(&self, path: Option<String>) {
        self.shared.state.lock().file_response = path;
    }

    /// Ask the run loop to terminate, as a window close would.
    pub fn quit(&self) {
        let mut state = self.shared.state.lock();
        state.quit = true;
        self.shared.cond.notify_all();
    }

    /// Block until the actor has drained its inbox, processed all
    /// simulated input, and parked. After this returns, everything
    /// sent earlier is fully applied - the backbone of deterministic
    /// threaded tests.
    pub fn wait_idle(&self) {
        let mut state = self.shared.state.lock();
        while !(state.parked && !state.woken && state.sims.is_empty() && state.pending.is_empty())
        {
            self.shared.cond.wait(&mut state);
        }
    }

    /// Names of all live widgets in the mirrored tree.
    pub fn live_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.shared.state.lock().mirror.kinds.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_live(&self, name: &str) -> bool {
        self.shared.state.lock().mirror.kinds.contains_key(name)
    }

    pub fn title(&self) -> String {
        self.shared.state.lock().mirror.title.clone()
    }

    pub fn entry_text(&self, name: &str) -> Option<String> {
        self.shared.state.lock().mirror.entries.get(name).cloned()
    }

    pub fn text_of(&self, name: &str) -> Option<String> {
        self.shared.state.lock().mirror.texts.get(name).cloned()
    }

    pub fn is_spinning(&self, name: &str) -> bool {
        self.shared.state.lock().mirror.spinning.contains(name)
    }

    pub fn progress_of(&self, name: &str) -> Option<(f64, String)> {
        self.shared.state.lock().mirror.progress.get(name).cloned()
    }

    pub fn focused(&self) -> Option<String> {
        self.shared.state.lock().mirror.focus.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facade_core::{Entry, Label, VBox};

    fn mounted() -> Mirror {
        let mut mirror = Mirror::default();
        let root: Widget = VBox::new("root")
            .child(Entry::new("e1").text("seed").update_on_change())
            .child(VBox::new("inner").child(Label::new("l1", "x")))
            .into();
        mirror.mount(None, &root);
        mirror
    }

    #[test]
    fn test_mount_seeds_input_values() {
        let mirror = mounted();
        assert_eq!(mirror.entries.get("e1").map(String::as_str), Some("seed"));
        assert!(mirror.live_typing.contains("e1"));
        assert_eq!(mirror.texts.get("l1").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_destroy_purges_recursively() {
        let mut mirror = mounted();
        mirror.destroy("inner");
        assert!(!mirror.kinds.contains_key("inner"));
        assert!(!mirror.kinds.contains_key("l1"));
        assert!(mirror.kinds.contains_key("e1"));
        assert!(mirror
            .children
            .get("root")
            .is_some_and(|c| !c.contains(&"inner".to_string())));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut mirror = mounted();
        let snapshot = mirror.snapshot();
        mirror.entries.insert("e1".into(), "changed".into());
        assert_eq!(
            snapshot.entries.get("e1").map(String::as_str),
            Some("seed")
        );
    }

    #[test]
    fn test_reset_keeps_title_drops_tree() {
        let mut mirror = mounted();
        mirror.title = "App".into();
        mirror.reset(&VBox::new("fresh").into());
        assert_eq!(mirror.title, "App");
        assert!(mirror.kinds.contains_key("fresh"));
        assert!(!mirror.kinds.contains_key("e1"));
    }
}

