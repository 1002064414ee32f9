//! Effects: the units of recomputation an app registers
//!
//! Three kinds exist. Computed effects derive a named read-only value,
//! watchers run side effects (and may write state), and the render effect
//! hands the current state to the host renderer.

use crate::{EffectId, Result, Scope, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of an effect, which also fixes its place in a flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Derives a named, read-only value
    Computed,
    /// Side-effecting reactive callback
    Watcher,
    /// The host render pass
    Render,
}

impl EffectKind {
    /// Flush priority (lower runs first)
    ///
    /// Computed values settle before watchers observe them, and the render pass
    /// sees both.
    pub fn rank(&self) -> u8 {
        match self {
            EffectKind::Computed => 0,
            EffectKind::Watcher => 1,
            EffectKind::Render => 2,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectKind::Computed => write!(f, "computed"),
            EffectKind::Watcher => write!(f, "watcher"),
            EffectKind::Render => write!(f, "render"),
        }
    }
}

/// The host renderer, run as the render effect
///
/// Every read made through `scope` is tracked, so the renderer re-runs on the
/// next flush after any property it displayed changes.
pub trait Renderer {
    /// Produce the visual tree for the current state
    fn render(&mut self, scope: &mut Scope<'_>) -> Result<()>;
}

impl<F> Renderer for F
where
    F: FnMut(&mut Scope<'_>) -> Result<()>,
{
    fn render(&mut self, scope: &mut Scope<'_>) -> Result<()> {
        self(scope)
    }
}

pub(crate) type ComputedFn = Box<dyn Fn(&mut Scope<'_>) -> Result<Value>>;
pub(crate) type WatcherFn = Box<dyn FnMut(&mut Scope<'_>) -> Result<()>>;

/// The callable part of an effect
pub(crate) enum EffectBody {
    Computed(ComputedFn),
    Watcher(WatcherFn),
    Render(Box<dyn Renderer>),
}

impl EffectBody {
    fn kind(&self) -> EffectKind {
        match self {
            EffectBody::Computed(_) => EffectKind::Computed,
            EffectBody::Watcher(_) => EffectKind::Watcher,
            EffectBody::Render(_) => EffectKind::Render,
        }
    }

    /// Run the body; computed effects yield their new value
    pub(crate) fn run(&mut self, scope: &mut Scope<'_>) -> Result<Option<Value>> {
        match self {
            EffectBody::Computed(compute) => compute(scope).map(Some),
            EffectBody::Watcher(watch) => watch(scope).map(|()| None),
            EffectBody::Render(renderer) => renderer.render(scope).map(|()| None),
        }
    }
}

/// A registered effect
pub(crate) struct EffectEntry {
    pub(crate) label: String,
    pub(crate) kind: EffectKind,
    /// Taken out while the effect runs, so the body can borrow the app state
    body: Option<EffectBody>,
    /// Successful runs; a run that returned an error is not counted
    pub(crate) runs: u64,
}

/// All effects of one app, in registration order
#[derive(Default)]
pub(crate) struct EffectTable {
    entries: IndexMap<EffectId, EffectEntry>,
    next_id: u64,
}

impl EffectTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register an effect and return its id
    pub(crate) fn register(&mut self, label: impl Into<String>, body: EffectBody) -> EffectId {
        self.next_id += 1;
        let id = EffectId(self.next_id);
        self.entries.insert(
            id,
            EffectEntry {
                label: label.into(),
                kind: body.kind(),
                body: Some(body),
                runs: 0,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: EffectId) -> Option<&EffectEntry> {
        self.entries.get(&id)
    }

    pub(crate) fn label(&self, id: EffectId) -> &str {
        self.entries
            .get(&id)
            .map(|entry| entry.label.as_str())
            .unwrap_or("<unknown>")
    }

    /// Find an effect by its label
    pub(crate) fn find(&self, label: &str) -> Option<EffectId> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.label == label)
            .map(|(id, _)| *id)
    }

    /// Ids of effects of `kind` that have never run successfully, in
    /// registration order
    pub(crate) fn never_run(&self, kind: EffectKind) -> Vec<EffectId> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.kind == kind && entry.runs == 0)
            .map(|(id, _)| *id)
            .collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (EffectId, &EffectEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    pub(crate) fn take_body(&mut self, id: EffectId) -> Option<EffectBody> {
        self.entries.get_mut(&id).and_then(|entry| entry.body.take())
    }

    /// Put a body back after it ran, counting the run if it succeeded
    pub(crate) fn restore_body(&mut self, id: EffectId, body: EffectBody, succeeded: bool) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.body = Some(body);
            if succeeded {
                entry.runs += 1;
            }
        }
    }
}
