//! CSS Perspective Playground Example
//!
//! Sliders feed four numbers into a computed `boxStyle` map. The render pass
//! shows the transform, `reset` restores the defaults in one flush, and
//! `copy` writes the CSS to the clipboard and raises an alert.

use sprout_core::{record, AppOptions, Scope, Value};
use sprout_host::{init_logging, Alerts, Clipboard, Frames, HostConfig, Page, TextRenderer};

const DEFAULTS: [(&str, i64); 4] = [
    ("perspective", 100),
    ("rotateX", 0),
    ("rotateY", 0),
    ("rotateZ", 0),
];

fn transform(scope: &mut Scope<'_>) -> sprout_core::Result<String> {
    Ok(format!(
        "perspective({}px) rotateX({}deg) rotateY({}deg) rotateZ({}deg)",
        scope.get("perspective")?,
        scope.get("rotateX")?,
        scope.get("rotateY")?,
        scope.get("rotateZ")?,
    ))
}

fn playground(options: AppOptions, frames: &Frames, clipboard: &Clipboard, alerts: &Alerts) -> AppOptions {
    let clipboard = clipboard.clone();
    let alerts = alerts.clone();
    options
        .data(|| record(DEFAULTS))
        .computed("boxStyle", |scope| {
            Ok(Value::map(record([("transform", transform(scope)?)])))
        })
        .method("reset", |scope, _args| {
            for (name, value) in DEFAULTS {
                scope.set(name, value)?;
            }
            Ok(Value::Null)
        })
        .method("copy", move |scope, _args| {
            let style = scope.get("boxStyle")?;
            let transform = style.expect_map()?.get("transform").cloned().unwrap_or_default();
            let text = format!("transform: {};", transform);
            clipboard.write_text(text.clone());
            alerts.alert(format!("CSS Copied to Clipboard!\n\n{}", text));
            Ok(text)
        })
        .renderer(TextRenderer::template("box { transform: {{ boxStyle.transform }} }", frames))
}

fn main() -> sprout_host::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    init_logging(&config.log_filter);

    println!("=== Sprout CSS Perspective Playground ===\n");

    let frames = Frames::new();
    let clipboard = Clipboard::new();
    let alerts = Alerts::new();
    let mut page = Page::new(config);

    let app = page.mount(
        playground(page.options("playground"), &frames, &clipboard, &alerts),
        "#app",
    )?;
    print_last(&frames);

    println!("\nDragging the sliders...");
    for (slider, value) in [("perspective", 250), ("rotateX", 30), ("rotateY", -15), ("rotateZ", 45)] {
        page.run(|page| Ok(page.app_mut(app)?.set(slider, value)?))?;
        print_last(&frames);
    }

    println!("\nCopying...");
    page.call(app, "copy", &[])?;
    if let Some(text) = clipboard.read_text() {
        println!("clipboard: {}", text);
    }
    if let Some(message) = alerts.last() {
        println!("alert: {}", message.replace('\n', " "));
    }

    println!("\nResetting...");
    let before = frames.len();
    page.call(app, "reset", &[])?;
    print_last(&frames);
    println!("renders for reset: {}", frames.len() - before);

    println!("\n=== Example Complete ===");
    Ok(())
}

fn print_last(frames: &Frames) {
    if let Some(frame) = frames.last() {
        println!("{}", frame);
    }
}
