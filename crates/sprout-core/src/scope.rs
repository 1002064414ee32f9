//! Explicit state handle passed to every app callback

use crate::app::MethodTable;
use crate::effect::EffectTable;
use crate::{EffectId, Error, MountTarget, Result, Store, Value, ValueMap};
use tracing::debug;

/// Access to an app's reactive state from inside a callback
///
/// Methods, hooks, watchers, computed values and the renderer all receive a
/// `Scope` instead of an implicit `this`. While an effect runs, every
/// [`get`](Self::get) subscribes that effect to the property it read.
pub struct Scope<'a> {
    store: &'a mut Store,
    effects: &'a mut EffectTable,
    methods: &'a MethodTable,
    target: Option<&'a MountTarget>,
    app: &'a str,
    reader: Option<EffectId>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        store: &'a mut Store,
        effects: &'a mut EffectTable,
        methods: &'a MethodTable,
        target: Option<&'a MountTarget>,
        app: &'a str,
        reader: Option<EffectId>,
    ) -> Self {
        Self {
            store,
            effects,
            methods,
            target,
            app,
            reader,
        }
    }

    /// Read a property (data or computed)
    ///
    /// A stale computed value is recomputed first, so computed values may
    /// read each other in any declaration order.
    pub fn get(&mut self, name: &str) -> Result<Value> {
        if let Some(effect) = self.store.stale_computed(name) {
            self.run_effect(effect)?;
        }
        self.store.get(name, self.reader)
    }

    /// Read a property without subscribing the running effect
    pub fn peek(&self, name: &str) -> Result<Value> {
        self.store.peek(name)
    }

    /// Write a data property
    ///
    /// Returns whether the value changed. Dependent effects run at the next
    /// flush, never inline.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.store.set(name, value.into())
    }

    /// Read-modify-write a data property
    pub fn update(&mut self, name: &str, f: impl FnOnce(&Value) -> Result<Value>) -> Result<bool> {
        let current = self.get(name)?;
        let next = f(&current)?;
        self.set(name, next)
    }

    /// Call a method registered on the app
    pub fn call(&mut self, method: &str, args: &[Value]) -> Result<Value> {
        let f = self
            .methods
            .get(method)
            .cloned()
            .ok_or_else(|| Error::UnknownMethod(method.to_string()))?;
        f(self, args)
    }

    /// Run one effect with its reads tracked
    ///
    /// Returns false if the effect is already running further up the stack;
    /// a computed value read from inside its own computation keeps its
    /// previous value.
    pub(crate) fn run_effect(&mut self, id: EffectId) -> Result<bool> {
        let Some(mut body) = self.effects.take_body(id) else {
            return Ok(false);
        };
        self.store.scheduler_mut().remove(id);
        self.store.begin_run(id);
        debug!(app = self.app, effect = self.effects.label(id), "run effect");
        let mut scope = Scope {
            store: &mut *self.store,
            effects: &mut *self.effects,
            methods: self.methods,
            target: self.target,
            app: self.app,
            reader: Some(id),
        };
        let result = body.run(&mut scope);
        self.effects.restore_body(id, body, result.is_ok());
        if let Some(value) = result? {
            self.store.write_computed(self.effects.label(id), value);
        }
        Ok(true)
    }

    /// Whole state record plus computed values (untracked)
    pub fn snapshot(&self) -> ValueMap {
        self.store.snapshot()
    }

    /// The host element the app is mounted on, once `mount` was called
    pub fn target(&self) -> Option<&MountTarget> {
        self.target
    }

    /// Name of the app this scope belongs to
    pub fn app_name(&self) -> &str {
        self.app
    }

    /// The effect whose reads are being tracked, if any
    pub fn reader(&self) -> Option<EffectId> {
        self.reader
    }
}
