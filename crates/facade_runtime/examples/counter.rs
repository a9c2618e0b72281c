//! Counter demo against the headless backend.
//!
//! A producer thread owns the application logic: it builds the UI with
//! a Reset, reacts to Click events by bumping a counter, and pushes the
//! new count back as a SetText. The headless handle plays the user.
//!
//! Run with: `cargo run --example counter`

use std::thread;

use facade_core::{Action, Button, Event, HBox, Label, VBox};
use facade_runtime::{GuiActor, HeadlessBackend};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (actor, ui, events) = GuiActor::new();
    let (backend, headless) = HeadlessBackend::new();

    let user = headless.clone();
    let app = thread::spawn(move || {
        ui.post(Action::SetTitle {
            title: "Counter".into(),
        });
        ui.post(Action::Reset {
            root: VBox::new("root")
                .spacing(4)
                .child(Label::new("count", "0"))
                .child(
                    HBox::new("row")
                        .child(Button::new("inc", "+1"))
                        .child(Button::new("done", "Done")),
                )
                .into(),
        });
        headless.wait_idle();

        // The "user" clicks +1 three times, then Done.
        for _ in 0..3 {
            user.click("inc");
        }
        user.click("done");

        let mut count = 0;
        for event in events {
            match event {
                Event::Click { name, .. } if name == "inc" => {
                    count += 1;
                    ui.post(Action::SetText {
                        name: "count".into(),
                        text: count.to_string(),
                    });
                }
                Event::Click { name, .. } if name == "done" => {
                    user.wait_idle();
                    tracing::info!(count, label = %user.text_of("count").unwrap_or_default(), "done");
                    user.quit();
                }
                other => tracing::debug!(?other, "ignored"),
            }
        }
        count
    });

    actor.run(backend)?;
    let count = app.join().expect("app thread panicked");
    println!("final count: {count}");
    Ok(())
}
