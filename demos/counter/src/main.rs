//! Counter Example
//!
//! Two small options-style apps on one page: a counter whose method bumps
//! the count, and a name card whose render calls a method that reads state.
//!
//! Pass a RON config path as the first argument to override the defaults.

use sprout_core::{record, Value};
use sprout_host::{init_logging, Frames, HostConfig, Page, TextRenderer};

fn main() -> sprout_host::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    init_logging(&config.log_filter);

    println!("=== Sprout Counter Example ===\n");

    let frames = Frames::new();
    let mut page = Page::new(config);

    let counter = page.mount(
        page.options("counter")
            .data(|| record([("count", 0i64)]))
            .method("incrementByOne", |scope, _args| {
                scope.update("count", |count| Ok(Value::Int(count.expect_int()? + 1)))
            })
            .renderer(TextRenderer::template("Count: {{ count }}", &frames)),
        "#app",
    )?;

    let card = page.mount(
        page.options("card")
            .data(|| record([("firstName", "Harry"), ("lastName", "Potter")]))
            .method("fullName", |scope, _args| {
                let first = scope.get("firstName")?;
                let last = scope.get("lastName")?;
                Ok(format!("{} {}", first, last.expect_str()?.to_uppercase()))
            })
            .renderer(TextRenderer::new(&frames, |scope| {
                Ok(format!("Full name: {}", scope.call("fullName", &[])?))
            })),
        "#card",
    )?;

    for frame in frames.all() {
        println!("{}", frame);
    }

    println!("\nClicking the button three times in one task...");
    page.run(|page| {
        let app = page.app_mut(counter)?;
        for _ in 0..3 {
            app.call("incrementByOne", &[])?;
        }
        Ok(())
    })?;
    if let Some(frame) = frames.last() {
        println!("{}", frame);
    }

    println!("\nRenaming the card...");
    page.run(|page| {
        page.app_mut(card)?.set("lastName", "Granger")?;
        page.app_mut(card)?.set("firstName", "Hermione")?;
        Ok(())
    })?;
    if let Some(frame) = frames.last() {
        println!("{}", frame);
    }

    println!("\nFrames rendered:");
    println!("  counter: {}", frames.texts_for("counter").len());
    println!("  card: {}", frames.texts_for("card").len());
    println!("  fullName() = {}", page.call(card, "fullName", &[])?);

    println!("\n=== Example Complete ===");
    Ok(())
}
