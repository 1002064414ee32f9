//! Sprout Core - Reactive state and lifecycle engine
//!
//! This crate provides the engine that sits underneath a small options-style
//! UI app:
//! - Dynamic value types (`Value`, `ValueMap`)
//! - A reactive store whose reads are tracked and whose writes schedule work
//! - A dependency graph from properties to the effects that read them
//! - A per-app scheduler that batches effect re-runs into one flush per tick
//! - A lifecycle state machine with registered hooks
//!
//! ## Model
//!
//! An app is described by [`AppOptions`] (data factory, computed values,
//! methods, watchers, a render effect and lifecycle hooks) and turned into a
//! live [`App`] by [`create_app`]. State is always reached through an explicit
//! [`Scope`] handle handed to every callback.
//!
//! ```
//! use sprout_core::{create_app, record, AppOptions, Value};
//!
//! let mut app = create_app(
//!     AppOptions::new("counter")
//!         .data(|| record([("count", Value::from(0))]))
//!         .computed("double", |scope| Ok(scope.get("count")?.expect_int()? * 2)),
//! );
//! app.mount("#app").unwrap();
//!
//! app.set("count", 5).unwrap();
//! app.flush().unwrap();
//! assert_eq!(app.get("double").unwrap(), Value::Int(10));
//!
//! // Rewriting the same value schedules nothing.
//! app.set("count", 5).unwrap();
//! assert!(!app.has_pending());
//! ```

mod app;
pub mod config;
pub mod deps;
mod effect;
mod error;
mod identity;
pub mod lifecycle;
pub mod scheduler;
mod scope;
pub mod store;
mod value;

pub use app::{create_app, App, AppOptions, Method};
pub use config::SchedulerConfig;
pub use deps::DepGraph;
pub use effect::{EffectKind, Renderer};
pub use error::{Error, Result};
pub use identity::{EffectId, MountTarget};
pub use lifecycle::{Hook, Phase};
pub use scheduler::{FlushReport, Scheduler};
pub use scope::Scope;
pub use store::Store;
pub use value::{record, Value, ValueMap};
