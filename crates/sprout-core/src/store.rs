//! Reactive store
//!
//! The store owns an app's state record, the cached values of its computed
//! properties, the dependency graph and the flush queue. Reads made on behalf
//! of a running effect subscribe that effect; writes that change a value hand
//! the property's subscribers to the scheduler. Writes never recompute
//! inline. A computed value that has never run, or whose effect is queued,
//! is stale: [`Scope::get`](crate::Scope::get) runs it before reading.

use crate::{
    DepGraph, EffectId, EffectKind, Error, Result, Scheduler, SchedulerConfig, Value, ValueMap,
};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Reactive state of one app
#[derive(Debug, Default)]
pub struct Store {
    /// The data record (`None` until installed at `created`)
    data: Option<ValueMap>,
    /// Cached computed values, declared up front
    computed: IndexMap<String, Value>,
    /// Computed name -> the effect producing it
    producers: HashMap<String, EffectId>,
    /// Computed values not produced yet
    uncomputed: HashSet<String>,
    graph: DepGraph,
    scheduler: Scheduler,
    kinds: HashMap<EffectId, EffectKind>,
}

impl Store {
    /// Create an empty store
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            scheduler: Scheduler::with_config(config),
            ..Self::default()
        }
    }

    /// Declare a computed property; its value is `Null` until first computed
    pub fn declare_computed(&mut self, name: impl Into<String>, effect: EffectId) -> Result<()> {
        let name = name.into();
        if self.computed.contains_key(&name) {
            return Err(Error::DuplicateProperty(name));
        }
        self.computed.insert(name.clone(), Value::Null);
        self.producers.insert(name.clone(), effect);
        self.uncomputed.insert(name);
        self.register_effect(effect, EffectKind::Computed);
        Ok(())
    }

    /// Make an effect schedulable
    pub fn register_effect(&mut self, effect: EffectId, kind: EffectKind) {
        self.kinds.insert(effect, kind);
    }

    /// Install the data record; the store becomes reactive
    ///
    /// Fails if a data key collides with a computed property.
    pub fn install(&mut self, record: ValueMap) -> Result<()> {
        if let Some(key) = record.keys().find(|key| self.computed.contains_key(*key)) {
            return Err(Error::DuplicateProperty(key.clone()));
        }
        self.data = Some(record);
        Ok(())
    }

    /// Check if the data record is installed
    pub fn is_installed(&self) -> bool {
        self.data.is_some()
    }

    /// Read a property, subscribing `reader` to it
    pub fn get(&mut self, name: &str, reader: Option<EffectId>) -> Result<Value> {
        let value = self.peek(name)?;
        if let Some(effect) = reader {
            if self.graph.track(name, effect) {
                trace!(property = name, %effect, "track");
            }
        }
        Ok(value)
    }

    /// Read a property without subscribing anything
    pub fn peek(&self, name: &str) -> Result<Value> {
        let data = self.data.as_ref().ok_or(Error::NotYetReactive)?;
        data.get(name)
            .or_else(|| self.computed.get(name))
            .cloned()
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))
    }

    /// Write a data property
    ///
    /// Returns false (and schedules nothing) if `value` is the same as the
    /// current value.
    pub fn set(&mut self, name: &str, value: Value) -> Result<bool> {
        let data = self.data.as_mut().ok_or(Error::NotYetReactive)?;
        let Some(slot) = data.get_mut(name) else {
            return Err(if self.computed.contains_key(name) {
                Error::ReadonlyComputed(name.to_string())
            } else {
                Error::UnknownProperty(name.to_string())
            });
        };
        if slot.same(&value) {
            return Ok(false);
        }
        *slot = value;
        self.trigger(name);
        Ok(true)
    }

    /// The effect to run before `name` can be read, if `name` is a stale
    /// computed value
    pub fn stale_computed(&self, name: &str) -> Option<EffectId> {
        let effect = *self.producers.get(name)?;
        (self.uncomputed.contains(name) || self.scheduler.is_pending(effect)).then_some(effect)
    }

    /// Store a freshly computed value, scheduling readers if it changed
    pub(crate) fn write_computed(&mut self, name: &str, value: Value) -> bool {
        let Some(slot) = self.computed.get_mut(name) else {
            return false;
        };
        self.uncomputed.remove(name);
        if slot.same(&value) {
            return false;
        }
        *slot = value;
        self.trigger(name);
        true
    }

    fn trigger(&mut self, name: &str) {
        for effect in self.graph.invalidate(name) {
            if let Some(kind) = self.kinds.get(&effect) {
                self.scheduler.enqueue(effect, *kind);
            }
        }
    }

    /// Forget an effect's reads before it runs again
    pub fn begin_run(&mut self, effect: EffectId) {
        self.graph.untrack(effect);
    }

    /// Drop all subscriptions and pending work
    ///
    /// Returns how many pending effects were discarded.
    pub fn teardown(&mut self) -> usize {
        self.graph.clear();
        self.uncomputed.clear();
        self.scheduler.discard()
    }

    /// Check whether `name` is a computed property
    pub fn is_computed(&self, name: &str) -> bool {
        self.computed.contains_key(name)
    }

    /// Data record followed by computed values
    pub fn snapshot(&self) -> ValueMap {
        let mut snapshot = self.data.clone().unwrap_or_default();
        for (name, value) in &self.computed {
            snapshot.insert(name.clone(), value.clone());
        }
        snapshot
    }

    /// Get the dependency graph
    pub fn graph(&self) -> &DepGraph {
        &self.graph
    }

    /// Get the scheduler
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Get the scheduler mutably
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }
}
