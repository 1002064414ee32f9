//! Two Instances Example
//!
//! Two apps share one page but nothing else: each has its own state and its
//! own flush queue. After 2000 ms a timer renames the second app only.

use sprout_core::record;
use sprout_host::{init_logging, Frames, HostConfig, Page, TextRenderer};

fn main() -> sprout_host::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    init_logging(&config.log_filter);

    println!("=== Sprout Two Instances Example ===\n");

    let frames = Frames::new();
    let mut page = Page::new(config);
    let template = "{{ firstName }} {{ lastName }}";

    let app1 = page.mount(
        page.options("app1")
            .data(|| record([("firstName", "Kshittiz"), ("lastName", "Chaudhary")]))
            .renderer(TextRenderer::template(template, &frames)),
        "#app1",
    )?;
    let app2 = page.mount(
        page.options("app2")
            .data(|| record([("firstName", "Ram"), ("lastName", "Thapa")]))
            .renderer(TextRenderer::template(template, &frames)),
        "#app2",
    )?;

    for frame in frames.all() {
        println!("t={:>4}ms {}", page.now(), frame);
    }

    page.set_timeout(2000, move |page| {
        let now = page.now();
        let vm = page.app_mut(app2)?;
        vm.set("firstName", "Harry")?;
        vm.set("lastName", "Potter")?;
        println!("t={:>4}ms console: {} {}", now, vm.get("firstName")?, vm.get("lastName")?);
        Ok(())
    });

    let rendered = frames.len();
    page.run_until_idle()?;
    for frame in frames.all().into_iter().skip(rendered) {
        println!("t={:>4}ms {}", page.now(), frame);
    }

    println!("\nFinal state:");
    for handle in [app1, app2] {
        let app = page.app(handle)?;
        println!("  {} -> {:?}", app.name(), app.snapshot());
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
