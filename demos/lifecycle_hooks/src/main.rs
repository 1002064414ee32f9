//! Lifecycle Hooks Example
//!
//! Logs every hook as the app is created, mounted, updated and finally
//! unmounted by a 5000 ms timer.

use sprout_core::{record, Error, Scope};
use sprout_host::{init_logging, Frames, HostConfig, Page, TextRenderer};

fn message(scope: &mut Scope<'_>) -> String {
    match scope.get("message") {
        Ok(value) => value.to_string(),
        Err(Error::NotYetReactive) => "undefined".to_string(),
        Err(e) => format!("<{}>", e),
    }
}

fn element(scope: &Scope<'_>) -> String {
    scope
        .target()
        .map(|target| target.to_string())
        .unwrap_or_else(|| "null".to_string())
}

fn main() -> sprout_host::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    init_logging(&config.log_filter);

    println!("=== Sprout Lifecycle Hooks Example ===\n");

    let frames = Frames::new();
    let mut page = Page::new(config);

    let app = page.mount(
        page.options("hooks")
            .data(|| record([("message", "Hello From Sprout")]))
            .method("updateMessage", |scope, _args| scope.set("message", "Message Updated!"))
            .renderer(TextRenderer::template("<p>{{ message }}</p>", &frames))
            // Creation
            .before_create(|scope| {
                println!("beforeCreate: {}", message(scope));
                Ok(())
            })
            .created(|scope| {
                println!("created: {}", message(scope));
                Ok(())
            })
            // Mounting
            .before_mount(|scope| {
                println!("beforeMount: {}", element(scope));
                Ok(())
            })
            .mounted(|scope| {
                println!("mounted: {}", element(scope));
                Ok(())
            })
            // Updating
            .before_update(|scope| {
                println!("beforeUpdate: {}", message(scope));
                Ok(())
            })
            .updated(|scope| {
                println!("updated: {}", message(scope));
                Ok(())
            })
            // Unmounting
            .before_unmount(|_| {
                println!("beforeUnmount: Component is about to be removed");
                Ok(())
            })
            .unmounted(|_| {
                println!("unmounted: Component removed from DOM");
                Ok(())
            }),
        "#app",
    )?;

    page.set_timeout(1000, move |page| {
        println!("\n[t={}ms] clicking \"Update Message\"", page.now());
        page.app_mut(app)?.call("updateMessage", &[])?;
        Ok(())
    });
    page.set_timeout(5000, move |page| {
        println!("\n[t={}ms] unmounting", page.now());
        page.app_mut(app)?.unmount()?;
        Ok(())
    });

    page.run_until_idle()?;

    println!("\nFrames rendered:");
    for frame in frames.all() {
        println!("  {}", frame);
    }
    println!("Final phase: {}", page.app(app)?.phase());

    println!("\n=== Example Complete ===");
    Ok(())
}
