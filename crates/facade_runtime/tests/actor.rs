//! End-to-end tests: application thread, actor thread, headless
//! backend. These exercise the protocol guarantees across a real
//! thread boundary:
//! - FIFO application of actions, membership bookkeeping
//! - protocol errors surface as events, never terminate the actor
//! - click snapshots capture values as of the click, not later ones
//! - channel closure is the termination signal

use std::thread;

use facade_core::{Action, Button, Entry, Event, Label, UiError, VBox, Widget};
use facade_runtime::{GuiActor, HeadlessBackend, HeadlessHandle, UiHandle};

fn root() -> Widget {
    VBox::new("root").into()
}

/// Spin up an actor on its own thread against a headless backend.
fn launch() -> (
    UiHandle,
    HeadlessHandle,
    std::sync::mpsc::Receiver<Event>,
    thread::JoinHandle<anyhow::Result<()>>,
) {
    let (actor, ui, events) = GuiActor::new();
    let (backend, headless) = HeadlessBackend::new();
    let join = thread::spawn(move || {
        actor.run(backend)?;
        Ok(())
    });
    (ui, headless, events, join)
}

fn shutdown(
    headless: &HeadlessHandle,
    join: thread::JoinHandle<anyhow::Result<()>>,
    events: &std::sync::mpsc::Receiver<Event>,
) -> Vec<Event> {
    headless.quit();
    join.join().expect("actor thread panicked").expect("actor failed");
    events.try_iter().collect()
}

#[test]
fn test_click_snapshot_reflects_values_at_click_time() {
    let (ui, headless, events, join) = launch();

    ui.post(Action::Reset { root: root() });
    ui.post(Action::Append {
        parent: "root".into(),
        children: vec![Entry::new("e1").into(), Button::new("b1", "Go").into()],
    });
    ui.post(Action::SetEntry {
        name: "e1".into(),
        text: "hello".into(),
    });
    headless.wait_idle();

    headless.click("b1");
    headless.wait_idle();

    // Enqueued after the click happened; must not leak into the
    // snapshot.
    ui.post(Action::SetEntry {
        name: "e1".into(),
        text: "later".into(),
    });
    headless.wait_idle();

    let collected = shutdown(&headless, join, &events);
    let clicks: Vec<&Event> = collected
        .iter()
        .filter(|event| matches!(event, Event::Click { .. }))
        .collect();
    assert_eq!(clicks.len(), 1);
    match clicks[0] {
        Event::Click { name, snapshot } => {
            assert_eq!(name, "b1");
            assert_eq!(
                snapshot.entries.get("e1").map(String::as_str),
                Some("hello")
            );
        }
        _ => unreachable!(),
    }
    // The entry did pick up the later value, just after the click.
    assert_eq!(headless.entry_text("e1").as_deref(), Some("later"));
}

#[test]
fn test_membership_tracks_append_and_destroy() {
    let (ui, headless, events, join) = launch();

    ui.post(Action::Reset { root: root() });
    ui.post(Action::Append {
        parent: "root".into(),
        children: vec![Entry::new("e1").into(), Button::new("b1", "Go").into()],
    });
    ui.post(Action::Destroy { name: "e1".into() });
    // Second destroy of the same name: protocol error, not a crash.
    ui.post(Action::Destroy { name: "e1".into() });
    headless.wait_idle();

    assert_eq!(headless.live_names(), vec!["b1", "root"]);

    let collected = shutdown(&headless, join, &events);
    let errors: Vec<&UiError> = collected
        .iter()
        .filter_map(|event| match event {
            Event::Error { error } => Some(error),
            _ => None,
        })
        .collect();
    assert_eq!(errors, vec![&UiError::UnknownWidget("e1".into())]);
}

#[test]
fn test_add_to_missing_box_reports_and_adds_nothing() {
    let (ui, headless, events, join) = launch();

    ui.post(Action::Reset { root: root() });
    ui.post(Action::AddToBox {
        parent: "missing".into(),
        pos: 0,
        child: Label::new("l1", "orphan").into(),
    });
    headless.wait_idle();

    assert!(!headless.is_live("l1"));

    let collected = shutdown(&headless, join, &events);
    assert!(collected.iter().any(|event| matches!(
        event,
        Event::Error {
            error: UiError::UnknownWidget(name)
        } if name == "missing"
    )));
}

#[test]
fn test_actions_on_one_widget_leave_others_alone() {
    let (ui, headless, events, join) = launch();

    ui.post(Action::Reset { root: root() });
    ui.post(Action::Append {
        parent: "root".into(),
        children: vec![
            Entry::new("a").text("seed-a").into(),
            Entry::new("b").text("seed-b").into(),
            Button::new("go", "Go").into(),
        ],
    });
    ui.post(Action::SetEntry {
        name: "a".into(),
        text: "changed".into(),
    });
    headless.wait_idle();
    headless.click("go");
    headless.wait_idle();

    let collected = shutdown(&headless, join, &events);
    let snapshot = collected
        .iter()
        .find_map(|event| match event {
            Event::Click { snapshot, .. } => Some(snapshot),
            _ => None,
        })
        .expect("click event");
    assert_eq!(snapshot.entries.get("a").map(String::as_str), Some("changed"));
    assert_eq!(snapshot.entries.get("b").map(String::as_str), Some("seed-b"));
}

#[test]
fn test_update_events_and_file_chooser_round_trip() {
    let (ui, headless, events, join) = launch();

    ui.post(Action::Reset { root: root() });
    ui.post(Action::Append {
        parent: "root".into(),
        children: vec![Entry::new("search").update_on_change().into()],
    });
    headless.wait_idle();

    headless.type_entry("search", "fac");
    headless.wait_idle();

    headless.respond_file_open(Some("/tmp/pick.txt".into()));
    ui.post(Action::FileOpen {
        save: false,
        title: "Open".into(),
        token: serde_json::json!(7),
    });
    headless.wait_idle();

    let collected = shutdown(&headless, join, &events);
    assert!(collected.contains(&Event::Update {
        name: "search".into(),
        text: "fac".into(),
    }));
    assert!(collected.contains(&Event::OpenResult {
        ok: true,
        path: "/tmp/pick.txt".into(),
        token: serde_json::json!(7),
    }));
}

#[test]
fn test_actions_enqueued_before_run_are_applied() {
    let (actor, ui, events) = GuiActor::new();
    let (backend, headless) = HeadlessBackend::new();

    // Queue up and signal before the loop even exists.
    ui.post(Action::Reset { root: root() });
    ui.post(Action::SetTitle {
        title: "early".into(),
    });
    ui.signal();

    let join = thread::spawn(move || actor.run(backend));
    headless.wait_idle();
    assert_eq!(headless.title(), "early");

    headless.quit();
    join.join().expect("actor thread panicked").expect("actor failed");
    // Channel closure is the authoritative termination signal.
    assert!(events.try_iter().next().is_none());
    assert!(events.recv().is_err());
}

#[test]
fn test_reset_makes_old_names_unresolvable() {
    let (ui, headless, events, join) = launch();

    ui.post(Action::Reset { root: root() });
    ui.post(Action::Append {
        parent: "root".into(),
        children: vec![Entry::new("e1").into()],
    });
    ui.post(Action::Reset {
        root: VBox::new("fresh").into(),
    });
    ui.post(Action::SetEntry {
        name: "e1".into(),
        text: "ghost".into(),
    });
    headless.wait_idle();

    assert_eq!(headless.live_names(), vec!["fresh"]);

    let collected = shutdown(&headless, join, &events);
    assert!(collected.iter().any(|event| matches!(
        event,
        Event::Error {
            error: UiError::UnknownWidget(name)
        } if name == "e1"
    )));
}
