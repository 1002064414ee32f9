//! Sprout Host - runs sprout apps on a simulated page
//!
//! The core engine knows nothing about the world around an app. This crate
//! supplies that world for binaries and tests:
//! - [`Page`]: mounted apps, a virtual clock and `setTimeout`-style timers,
//!   with a flush of every app after each task
//! - [`TextRenderer`]: a render effect producing one text line per pass
//! - [`Clipboard`] and [`Alerts`]: platform side-effect sinks
//! - [`HostConfig`]: RON configuration, and [`init_logging`]
//!
//! ```
//! use sprout_core::{record, Value};
//! use sprout_host::{Frames, HostConfig, Page, TextRenderer};
//!
//! let frames = Frames::new();
//! let mut page = Page::new(HostConfig::default());
//! let app = page
//!     .mount(
//!         page.options("names")
//!             .data(|| record([("firstName", "Ram"), ("lastName", "Thapa")]))
//!             .renderer(TextRenderer::template("{{ firstName }} {{ lastName }}", &frames)),
//!         "#app2",
//!     )
//!     .unwrap();
//!
//! page.set_timeout(2000, move |page| {
//!     page.app_mut(app)?.set("firstName", "Harry")?;
//!     page.app_mut(app)?.set("lastName", "Potter")?;
//!     Ok(())
//! });
//! page.advance(2000).unwrap();
//!
//! assert_eq!(frames.texts_for("names"), vec!["Ram Thapa", "Harry Potter"]);
//! assert_eq!(page.app(app).unwrap().get("firstName").unwrap(), Value::from("Harry"));
//! ```

pub mod config;
mod error;
mod logging;
mod page;
mod platform;
mod render;

pub use config::HostConfig;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use page::{AppHandle, Page, Task, TimerId};
pub use platform::{Alerts, Clipboard};
pub use render::{interpolate, Frame, Frames, TextRenderer};
