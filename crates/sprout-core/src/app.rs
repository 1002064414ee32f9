//! App factory and the live app instance
//!
//! [`create_app`] turns an [`AppOptions`] description into an [`App`] in the
//! `uncreated` phase. The app then moves through its lifecycle on explicit
//! calls:
//!
//! - [`App::setup`]: `beforeCreate`, install the data record, run computed
//!   values and watchers once, `created`
//! - [`App::mount`]: `beforeMount`, first render, `mounted`
//! - [`App::flush`]: drain the queue; around the render pass `beforeUpdate`
//!   and `updated` fire
//! - [`App::unmount`]: `beforeUnmount`, drop all pending work and
//!   subscriptions, `unmounted`

use crate::effect::{ComputedFn, EffectBody, EffectTable, WatcherFn};
use crate::lifecycle::{HookFn, Hooks};
use crate::{
    EffectId, EffectKind, Error, FlushReport, Hook, MountTarget, Phase, Renderer, Result,
    SchedulerConfig, Scope, Store, Value, ValueMap,
};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// A method callable by name through [`App::call`] or [`Scope::call`]
pub type Method = Rc<dyn Fn(&mut Scope<'_>, &[Value]) -> Result<Value>>;

pub(crate) type MethodTable = IndexMap<String, Method>;

type DataFactory = Box<dyn FnOnce() -> ValueMap>;

/// Description of an app: data, computed values, methods, effects and hooks
///
/// # Example
///
/// ```
/// use sprout_core::{create_app, record, AppOptions, Value};
///
/// let options = AppOptions::new("names")
///     .data(|| record([("firstName", "Harry"), ("lastName", "Potter")]))
///     .method("fullName", |scope, _args| {
///         let first = scope.get("firstName")?;
///         let last = scope.get("lastName")?;
///         Ok(format!("{} {}", first, last.expect_str()?.to_uppercase()))
///     });
///
/// let mut app = create_app(options);
/// app.mount("#app").unwrap();
/// assert_eq!(app.call("fullName", &[]).unwrap(), Value::from("Harry POTTER"));
/// ```
pub struct AppOptions {
    name: String,
    data: Option<DataFactory>,
    computed: Vec<(String, ComputedFn)>,
    watchers: Vec<(String, WatcherFn)>,
    renderer: Option<Box<dyn Renderer>>,
    methods: MethodTable,
    hooks: Hooks,
    scheduler: SchedulerConfig,
}

impl AppOptions {
    /// Start describing an app; `name` is used in logs and errors
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
            computed: Vec::new(),
            watchers: Vec::new(),
            renderer: None,
            methods: MethodTable::new(),
            hooks: Hooks::new(),
            scheduler: SchedulerConfig::default(),
        }
    }

    /// Set the factory producing the initial data record
    pub fn data(mut self, factory: impl FnOnce() -> ValueMap + 'static) -> Self {
        self.data = Some(Box::new(factory));
        self
    }

    /// Add a computed property
    pub fn computed<F, V>(mut self, name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&mut Scope<'_>) -> Result<V> + 'static,
        V: Into<Value>,
    {
        let compute: ComputedFn =
            Box::new(move |scope: &mut Scope<'_>| -> Result<Value> { compute(scope).map(Into::into) });
        self.computed.push((name.into(), compute));
        self
    }

    /// Add a method
    pub fn method<F, V>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Scope<'_>, &[Value]) -> Result<V> + 'static,
        V: Into<Value>,
    {
        let method: Method = Rc::new(move |scope: &mut Scope<'_>, args: &[Value]| -> Result<Value> {
            f(scope, args).map(Into::into)
        });
        self.methods.insert(name.into(), method);
        self
    }

    /// Add a watcher: runs once at setup, then again after anything it read changes
    pub fn watch<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.watchers.push((name.into(), Box::new(f)));
        self
    }

    /// Set the render effect from a closure
    pub fn render<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.renderer(f)
    }

    /// Set the render effect
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Register a lifecycle hook
    pub fn hook<F>(mut self, hook: Hook, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        let f: HookFn = Box::new(f);
        self.hooks.set(hook, f);
        self
    }

    pub fn before_create<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.hook(Hook::BeforeCreate, f)
    }

    pub fn created<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.hook(Hook::Created, f)
    }

    pub fn before_mount<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.hook(Hook::BeforeMount, f)
    }

    pub fn mounted<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.hook(Hook::Mounted, f)
    }

    pub fn before_update<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.hook(Hook::BeforeUpdate, f)
    }

    pub fn updated<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.hook(Hook::Updated, f)
    }

    pub fn before_unmount<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.hook(Hook::BeforeUnmount, f)
    }

    pub fn unmounted<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<()> + 'static,
    {
        self.hook(Hook::Unmounted, f)
    }

    /// Set the scheduler configuration
    pub fn scheduler(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = config;
        self
    }

    /// Shorthand for a scheduler configuration with the given flush limit
    pub fn flush_limit(self, limit: usize) -> Self {
        self.scheduler(SchedulerConfig::with_flush_limit(limit))
    }
}

impl fmt::Debug for AppOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppOptions")
            .field("name", &self.name)
            .field("computed", &self.computed.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field("watchers", &self.watchers.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("render", &self.renderer.is_some())
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Create an app from its description; nothing runs until [`App::setup`] or
/// [`App::mount`]
pub fn create_app(options: AppOptions) -> App {
    let AppOptions {
        name,
        data,
        computed,
        watchers,
        renderer,
        methods,
        hooks,
        scheduler,
    } = options;

    let mut store = Store::new(scheduler);
    let mut effects = EffectTable::new();
    let mut error = None;

    for (label, compute) in computed {
        let id = effects.register(label.clone(), EffectBody::Computed(compute));
        if let Err(e) = store.declare_computed(label, id) {
            error.get_or_insert(e);
        }
    }
    for (label, watch) in watchers {
        let id = effects.register(label, EffectBody::Watcher(watch));
        store.register_effect(id, EffectKind::Watcher);
    }
    if let Some(renderer) = renderer {
        let id = effects.register("render", EffectBody::Render(renderer));
        store.register_effect(id, EffectKind::Render);
    }

    App {
        name,
        phase: Phase::Uncreated,
        store,
        effects,
        methods,
        hooks,
        data,
        target: None,
        error,
    }
}

/// A live app instance
///
/// Owns its store, dependency graph and flush queue; nothing is shared
/// between apps.
pub struct App {
    name: String,
    phase: Phase,
    store: Store,
    effects: EffectTable,
    methods: MethodTable,
    hooks: Hooks,
    data: Option<DataFactory>,
    target: Option<MountTarget>,
    /// Declaration error found by `create_app`, reported at setup
    error: Option<Error>,
}

impl App {
    /// Get the app name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the mount target, if mounted
    pub fn target(&self) -> Option<&MountTarget> {
        self.target.as_ref()
    }

    /// Run `beforeCreate`, install the data record, run computed values and
    /// watchers once, then run `created`
    pub fn setup(&mut self) -> Result<()> {
        if self.phase == Phase::Uncreated {
            if let Some(error) = self.error.take() {
                return Err(error);
            }
            self.enter(Hook::BeforeCreate)?;
        }
        if self.phase != Phase::BeforeCreate {
            return Err(self.invalid("set up"));
        }
        if !self.store.is_installed() {
            let record = self.data.take().map(|factory| factory()).unwrap_or_default();
            self.store.install(record)?;
        }
        self.run_initial(EffectKind::Computed)?;
        self.run_initial(EffectKind::Watcher)?;
        self.enter(Hook::Created)
    }

    /// Mount the app on `target`, setting it up first if needed
    pub fn mount(&mut self, target: impl Into<MountTarget>) -> Result<()> {
        if matches!(self.phase, Phase::Uncreated | Phase::BeforeCreate) {
            self.setup()?;
        }
        if !matches!(self.phase, Phase::Created | Phase::BeforeMount) {
            return Err(self.invalid("mount"));
        }
        self.target = Some(target.into());
        if self.phase == Phase::Created {
            self.enter(Hook::BeforeMount)?;
        }
        self.run_initial(EffectKind::Render)?;
        self.enter(Hook::Mounted)
    }

    /// Run every pending effect once
    ///
    /// If the render effect is pending, `beforeUpdate` fires before any effect
    /// runs; if a computed value or watcher queues the render mid-flush, it
    /// fires right before the render. `updated` fires once the queue is empty.
    /// Effects queued by the flush itself join it.
    ///
    /// If one effect is queued more than the flush limit allows, it is dropped
    /// from the queue and the flush fails with [`Error::InfiniteUpdateLoop`].
    /// The effect keeps the subscriptions of its last run, so it reacts to
    /// later writes again; other pending effects wait for the next flush. An
    /// effect error aborts the update cycle the same way: the app returns to
    /// `mounted` without `updated`. Calling `flush` before setup, after
    /// unmount or while flushing does nothing.
    pub fn flush(&mut self) -> Result<FlushReport> {
        let mut report = FlushReport::new();
        if !self.store.is_installed() || self.phase.is_terminal() {
            return Ok(report);
        }
        if !self.store.scheduler_mut().begin_flush() {
            return Ok(report);
        }
        debug!(app = %self.name, pending = self.store.scheduler().len(), "flush");
        let result = self.drain(&mut report);
        self.store.scheduler_mut().end_flush();
        result.map(|()| report)
    }

    fn drain(&mut self, report: &mut FlushReport) -> Result<()> {
        if self.store.scheduler().has_pending_kind(EffectKind::Render) {
            self.begin_update(report)?;
        }
        let limit = self.store.scheduler().flush_limit();
        while let Some((_, kind)) = self.store.scheduler().peek() {
            if kind == EffectKind::Render {
                self.begin_update(report)?;
            }
            let Some(next) = self.store.scheduler_mut().pop() else {
                break;
            };
            if next.run > limit {
                let effect = self.effects.label(next.id).to_string();
                warn!(app = %self.name, %effect, limit, "flush aborted: infinite update loop");
                self.abort_update();
                return Err(Error::InfiniteUpdateLoop { effect, limit });
            }
            if let Err(e) = self.run_effect(next.id) {
                self.abort_update();
                return Err(e);
            }
            report.ran.push(next.id);
        }
        if report.updated {
            self.enter(Hook::Updated)?;
            self.phase = Phase::Mounted;
        }
        Ok(())
    }

    /// Fire `beforeUpdate` once per flush
    fn begin_update(&mut self, report: &mut FlushReport) -> Result<()> {
        if report.updated {
            return Ok(());
        }
        match self.phase {
            Phase::Mounted => {
                self.enter(Hook::BeforeUpdate)?;
                report.updated = true;
            }
            // `updated` failed last flush; finish that cycle
            Phase::BeforeUpdate => report.updated = true,
            _ => {}
        }
        Ok(())
    }

    fn abort_update(&mut self) {
        if self.phase == Phase::BeforeUpdate {
            debug!(app = %self.name, "update aborted");
            self.phase = Phase::Mounted;
        }
    }

    /// Run `beforeUnmount`, discard pending work and subscriptions, then run
    /// `unmounted`
    pub fn unmount(&mut self) -> Result<()> {
        match self.phase {
            Phase::Unmounted => return Err(self.invalid("unmount")),
            Phase::BeforeUnmount => {}
            _ => self.enter(Hook::BeforeUnmount)?,
        }
        let discarded = self.store.teardown();
        debug!(app = %self.name, discarded, "teardown");
        self.enter(Hook::Unmounted)?;
        self.target = None;
        Ok(())
    }

    /// Call a method by name
    pub fn call(&mut self, method: &str, args: &[Value]) -> Result<Value> {
        self.scope(None).call(method, args)
    }

    /// Read a property (untracked)
    pub fn get(&self, name: &str) -> Result<Value> {
        self.store.peek(name)
    }

    /// Write a data property; dependents run at the next flush
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.store.set(name, value.into())
    }

    /// Check whether a flush has work to do
    pub fn has_pending(&self) -> bool {
        self.store.scheduler().has_pending()
    }

    /// Data record followed by computed values
    pub fn snapshot(&self) -> ValueMap {
        self.store.snapshot()
    }

    /// Find an effect by label (`"render"` for the render effect)
    pub fn effect_id(&self, label: &str) -> Option<EffectId> {
        self.effects.find(label)
    }

    /// Number of times an effect has run since the app was created
    pub fn effect_runs(&self, id: EffectId) -> u64 {
        self.effects.get(id).map(|entry| entry.runs).unwrap_or(0)
    }

    /// Labels and kinds of all effects, in registration order
    pub fn effects(&self) -> Vec<(String, EffectKind)> {
        self.effects
            .iter()
            .map(|(_, entry)| (entry.label.clone(), entry.kind))
            .collect()
    }

    /// Get the reactive store
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn scope(&mut self, reader: Option<EffectId>) -> Scope<'_> {
        Scope::new(
            &mut self.store,
            &mut self.effects,
            &self.methods,
            self.target.as_ref(),
            &self.name,
            reader,
        )
    }

    /// Run the hook for `hook`, then enter its phase
    fn enter(&mut self, hook: Hook) -> Result<()> {
        let next = hook.phase();
        debug_assert!(
            self.phase.can_advance_to(next),
            "{} -> {} is not a lifecycle transition",
            self.phase,
            next
        );
        if let Some(mut f) = self.hooks.take(hook) {
            let result = f(&mut self.scope(None));
            self.hooks.restore(hook, f);
            if let Err(source) = result {
                warn!(app = %self.name, %hook, phase = %self.phase, "hook failed");
                return Err(Error::Hook {
                    hook,
                    source: Box::new(source),
                });
            }
        }
        debug!(app = %self.name, from = %self.phase, to = %next, "lifecycle");
        self.phase = next;
        Ok(())
    }

    /// Run effects of `kind` that have not yet run successfully
    fn run_initial(&mut self, kind: EffectKind) -> Result<()> {
        for id in self.effects.never_run(kind) {
            // Computed values read by an earlier one already ran on demand
            if self.effect_runs(id) == 0 {
                self.run_effect(id)?;
            }
        }
        Ok(())
    }

    fn run_effect(&mut self, id: EffectId) -> Result<()> {
        self.scope(None).run_effect(id).map(|_| ())
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            phase: self.phase,
            action,
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("target", &self.target)
            .field("store", &self.store)
            .field("hooks", &self.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use std::cell::{Cell, RefCell};

    type Log = Rc<RefCell<Vec<String>>>;

    fn logging_hooks(options: AppOptions, log: &Log) -> AppOptions {
        Hook::ALL.into_iter().fold(options, |options, hook| {
            let log = Rc::clone(log);
            options.hook(hook, move |_| {
                log.borrow_mut().push(hook.to_string());
                Ok(())
            })
        })
    }

    fn counter(log: &Log) -> App {
        let frames = Rc::clone(log);
        create_app(
            AppOptions::new("counter")
                .data(|| record([("count", 0i64)]))
                .computed("double", |scope| Ok(scope.get("count")?.expect_int()? * 2))
                .method("increment", |scope, _| {
                    scope.update("count", |v| Ok(Value::Int(v.expect_int()? + 1)))
                })
                .render(move |scope| {
                    let line = format!("{} / {}", scope.get("count")?, scope.get("double")?);
                    frames.borrow_mut().push(line);
                    Ok(())
                }),
        )
    }

    #[test]
    fn test_double_scenario() {
        let frames = Log::default();
        let mut app = counter(&frames);
        app.mount("#app").unwrap();
        assert_eq!(frames.borrow().as_slice(), ["0 / 0"]);

        app.set("count", 5).unwrap();
        let report = app.flush().unwrap();
        assert_eq!(app.get("double").unwrap(), Value::Int(10));
        assert!(report.updated);

        // Computed ran before the render, so render ran once and saw 10
        let render = app.effect_id("render").unwrap();
        assert_eq!(report.runs_of(render), 1);
        assert_eq!(frames.borrow().last().map(String::as_str), Some("5 / 10"));

        // Same value: nothing queued, nothing to flush
        assert!(!app.set("count", 5).unwrap());
        assert!(!app.has_pending());
        assert!(app.flush().unwrap().is_empty());
    }

    #[test]
    fn test_methods_schedule_instead_of_rendering() {
        let frames = Log::default();
        let mut app = counter(&frames);
        app.mount("#app").unwrap();

        app.call("increment", &[]).unwrap();
        app.call("increment", &[]).unwrap();
        app.call("increment", &[]).unwrap();
        assert_eq!(frames.borrow().len(), 1);

        let report = app.flush().unwrap();
        assert_eq!(report.runs(), 2); // double + render, once each
        assert_eq!(frames.borrow().last().map(String::as_str), Some("3 / 6"));
    }

    #[test]
    fn test_hook_order_setup_mount_unmount() {
        let log = Log::default();
        let mut app = create_app(logging_hooks(
            AppOptions::new("hooks").data(|| record([("message", "Hello")])),
            &log,
        ));

        app.setup().unwrap();
        assert_eq!(app.phase(), Phase::Created);
        app.mount("#app").unwrap();
        assert_eq!(app.phase(), Phase::Mounted);
        app.unmount().unwrap();
        assert_eq!(app.phase(), Phase::Unmounted);

        assert_eq!(
            log.borrow().as_slice(),
            ["beforeCreate", "created", "beforeMount", "mounted", "beforeUnmount", "unmounted"]
        );
    }

    #[test]
    fn test_update_hooks_wrap_render() {
        let log = Log::default();
        let render_log = Rc::clone(&log);
        let mut app = create_app(logging_hooks(
            AppOptions::new("hooks")
                .data(|| record([("message", "Hello")]))
                .render(move |scope| {
                    let message = scope.get("message")?;
                    render_log.borrow_mut().push(format!("render {}", message));
                    Ok(())
                }),
            &log,
        ));
        app.mount("#app").unwrap();
        log.borrow_mut().clear();

        app.set("message", "Updated").unwrap();
        app.flush().unwrap();
        assert_eq!(
            log.borrow().as_slice(),
            ["beforeUpdate", "render Updated", "updated"]
        );
        assert_eq!(app.phase(), Phase::Mounted);
    }

    #[test]
    fn test_no_update_hooks_without_render() {
        let log = Log::default();
        let mut app = create_app(logging_hooks(
            AppOptions::new("hooks")
                .data(|| record([("a", 1i64)]))
                .computed("b", |scope| scope.get("a")),
            &log,
        ));
        app.mount("#app").unwrap();
        log.borrow_mut().clear();

        app.set("a", 2).unwrap();
        let report = app.flush().unwrap();
        assert!(!report.updated);
        assert!(log.borrow().is_empty());
        assert_eq!(app.get("b").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_state_before_created_is_not_reactive() {
        let seen = Log::default();
        let seen_hook = Rc::clone(&seen);
        let mut app = create_app(
            AppOptions::new("early")
                .data(|| record([("message", "Hello")]))
                .before_create(move |scope| {
                    let read = scope.get("message");
                    seen_hook.borrow_mut().push(format!("{:?}", read.err()));
                    Ok(())
                })
                .method("touch", |scope, _| scope.set("message", "x")),
        );

        assert!(matches!(app.call("touch", &[]), Err(Error::NotYetReactive)));
        assert!(matches!(app.set("message", "x"), Err(Error::NotYetReactive)));

        app.setup().unwrap();
        assert_eq!(seen.borrow().as_slice(), ["Some(NotYetReactive)"]);
        assert_eq!(app.call("touch", &[]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_failing_hook_keeps_last_phase() {
        let attempts = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&attempts);
        let mut app = create_app(
            AppOptions::new("flaky")
                .data(|| record([("n", 0i64)]))
                .mounted(move |_| {
                    *counter.borrow_mut() += 1;
                    if *counter.borrow() == 1 {
                        Err(Error::callback("element missing"))
                    } else {
                        Ok(())
                    }
                }),
        );

        let err = app.mount("#app").unwrap_err();
        assert_eq!(err.failed_hook(), Some(Hook::Mounted));
        assert_eq!(app.phase(), Phase::BeforeMount);

        // Retrying resumes from beforeMount without re-running beforeMount
        app.mount("#app").unwrap();
        assert_eq!(app.phase(), Phase::Mounted);
        assert_eq!(*attempts.borrow(), 2);
    }

    #[test]
    fn test_conditional_reads_are_pruned() {
        let mut app = create_app(
            AppOptions::new("branch")
                .data(|| record([("useA", Value::Bool(true)), ("a", 1.into()), ("b", 2.into())]))
                .computed("picked", |scope| {
                    if scope.get("useA")?.is_truthy() {
                        scope.get("a")
                    } else {
                        scope.get("b")
                    }
                }),
        );
        app.mount("#app").unwrap();
        let picked = app.effect_id("picked").unwrap();

        app.set("useA", false).unwrap();
        app.flush().unwrap();
        assert_eq!(app.get("picked").unwrap(), Value::Int(2));
        assert!(!app.store().graph().is_subscribed("a", picked));

        // `a` is no longer read: writing it schedules nothing
        app.set("a", 100).unwrap();
        assert!(!app.has_pending());

        app.set("b", 3).unwrap();
        assert!(app.has_pending());
        app.flush().unwrap();
        assert_eq!(app.get("picked").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_runaway_watcher_hits_flush_limit() {
        let mut app = create_app(
            AppOptions::new("runaway")
                .data(|| record([("count", 0i64)]))
                .watch("bump", |scope| {
                    let count = scope.get("count")?.expect_int()?;
                    scope.set("count", count + 1)?;
                    Ok(())
                })
                .flush_limit(10),
        );
        app.mount("#app").unwrap();
        assert!(app.has_pending());

        let err = app.flush().unwrap_err();
        assert!(matches!(err, Error::InfiniteUpdateLoop { ref effect, limit: 10 } if effect == "bump"));

        // The runaway effect is stopped and the app stays usable
        assert!(!app.has_pending());
        assert_eq!(app.get("count").unwrap(), Value::Int(11));
        app.set("count", 0).unwrap();
        assert!(!app.has_pending());
        assert!(app.flush().unwrap().is_empty());
    }

    #[test]
    fn test_cascade_runs_in_same_flush() {
        let mut app = create_app(
            AppOptions::new("cascade")
                .data(|| record([("celsius", Value::from(0)), ("label", Value::from(""))]))
                .computed("fahrenheit", |scope| {
                    Ok(scope.get("celsius")?.expect_int()? * 9 / 5 + 32)
                })
                .watch("describe", |scope| {
                    let f = scope.get("fahrenheit")?;
                    scope.set("label", format!("{}F", f))?;
                    Ok(())
                }),
        );
        app.mount("#app").unwrap();
        assert_eq!(app.get("label").unwrap(), Value::from("32F"));

        app.set("celsius", 100).unwrap();
        let report = app.flush().unwrap();
        assert_eq!(app.get("label").unwrap(), Value::from("212F"));
        assert_eq!(report.runs(), 2);
    }

    #[test]
    fn test_unmount_discards_pending() {
        let frames = Log::default();
        let mut app = counter(&frames);
        app.mount("#app").unwrap();

        app.set("count", 1).unwrap();
        assert!(app.has_pending());
        app.unmount().unwrap();
        assert!(!app.has_pending());
        assert!(app.flush().unwrap().is_empty());
        assert_eq!(frames.borrow().len(), 1);

        // State stays readable and writable but nothing reacts
        app.set("count", 2).unwrap();
        assert!(!app.has_pending());
        assert!(matches!(app.unmount(), Err(Error::InvalidTransition { .. })));
        assert!(matches!(app.mount("#app"), Err(Error::InvalidTransition { .. })));
    }

    #[test]
    fn test_errors_for_unknown_names() {
        let frames = Log::default();
        let mut app = counter(&frames);
        app.mount("#app").unwrap();

        assert!(matches!(app.get("cuont"), Err(Error::UnknownProperty(_))));
        assert!(matches!(app.set("double", 1), Err(Error::ReadonlyComputed(_))));
        assert!(matches!(app.call("decrement", &[]), Err(Error::UnknownMethod(_))));
        assert!(matches!(app.mount("#other"), Err(Error::InvalidTransition { .. })));
    }

    #[test]
    fn test_duplicate_property_reported_at_setup() {
        let mut app = create_app(
            AppOptions::new("dup")
                .data(|| record([("double", 1i64)]))
                .computed("double", |_| Ok(2i64)),
        );
        assert!(matches!(app.setup(), Err(Error::DuplicateProperty(_))));
    }

    #[test]
    fn test_hooks_see_mount_target() {
        let seen = Log::default();
        let before = Rc::clone(&seen);
        let after = Rc::clone(&seen);
        let mut app = create_app(
            AppOptions::new("target")
                .before_mount(move |scope| {
                    before.borrow_mut().push(format!("{:?}", scope.target().map(|t| t.to_string())));
                    Ok(())
                })
                .mounted(move |scope| {
                    after.borrow_mut().push(format!("{:?}", scope.target().map(|t| t.to_string())));
                    Ok(())
                }),
        );
        app.mount("#app").unwrap();
        assert_eq!(seen.borrow().as_slice(), ["Some(\"#app\")", "Some(\"#app\")"]);
        assert_eq!(app.target().map(MountTarget::as_str), Some("#app"));
    }

    #[test]
    fn test_computed_chain_in_any_declaration_order() {
        let frames = Log::default();
        let log = Rc::clone(&frames);
        let mut app = create_app(
            AppOptions::new("chain")
                .data(|| record([("count", 1i64)]))
                .computed("quad", |scope| Ok(scope.get("double")?.expect_int()? * 2))
                .computed("double", |scope| Ok(scope.get("count")?.expect_int()? * 2))
                .render(move |scope| {
                    let line = format!("{} {}", scope.get("count")?, scope.get("quad")?);
                    log.borrow_mut().push(line);
                    Ok(())
                }),
        );
        app.mount("#app").unwrap();
        assert_eq!(frames.borrow().as_slice(), ["1 4"]);
        let quad = app.effect_id("quad").unwrap();
        let double = app.effect_id("double").unwrap();
        assert_eq!(app.effect_runs(double), 1);

        app.set("count", 3).unwrap();
        let report = app.flush().unwrap();
        assert_eq!(app.get("quad").unwrap(), Value::Int(12));
        assert_eq!(report.runs_of(double), 1);
        assert_eq!(report.runs_of(quad), 1);
        assert_eq!(frames.borrow().last().map(String::as_str), Some("3 12"));
    }

    #[test]
    fn test_computed_reads_later_string_computed() {
        let mut app = create_app(
            AppOptions::new("greeting")
                .data(|| record([("name", "ann")]))
                .computed("greeting", |scope| Ok(format!("Hi {}", scope.get("upper")?)))
                .computed("upper", |scope| Ok(scope.get("name")?.expect_str()?.to_uppercase())),
        );
        app.mount("#app").unwrap();
        assert_eq!(app.get("greeting").unwrap(), Value::from("Hi ANN"));

        app.set("name", "bo").unwrap();
        app.flush().unwrap();
        assert_eq!(app.get("greeting").unwrap(), Value::from("Hi BO"));
    }

    #[test]
    fn test_failed_render_runs_again_on_retry() {
        let frames = Log::default();
        let log = Rc::clone(&frames);
        let not_ready = Rc::new(Cell::new(true));
        let mut app = create_app(
            AppOptions::new("retry")
                .data(|| record([("count", 0i64)]))
                .render(move |scope| {
                    if not_ready.replace(false) {
                        return Err(Error::callback("host not ready"));
                    }
                    log.borrow_mut().push(scope.get("count")?.to_string());
                    Ok(())
                }),
        );

        assert!(matches!(app.mount("#app"), Err(Error::Callback(_))));
        assert_eq!(app.phase(), Phase::BeforeMount);

        app.mount("#app").unwrap();
        assert_eq!(frames.borrow().as_slice(), ["0"]);

        app.set("count", 5).unwrap();
        assert!(app.has_pending());
        app.flush().unwrap();
        assert_eq!(frames.borrow().as_slice(), ["0", "5"]);
    }

    #[test]
    fn test_failed_computed_recovers_on_setup_retry() {
        let mut app = create_app(
            AppOptions::new("ratio")
                .data(|| record([("divisor", 0i64)]))
                .computed("ratio", |scope| {
                    let divisor = scope.get("divisor")?.expect_int()?;
                    if divisor == 0 {
                        return Err(Error::callback("division by zero"));
                    }
                    Ok(100 / divisor)
                }),
        );

        assert!(matches!(app.setup(), Err(Error::Callback(_))));
        assert_eq!(app.phase(), Phase::BeforeCreate);

        app.set("divisor", 4).unwrap();
        app.setup().unwrap();
        assert_eq!(app.phase(), Phase::Created);
        assert_eq!(app.get("ratio").unwrap(), Value::Int(25));
        assert!(!app.has_pending());
    }

    #[test]
    fn test_runaway_render_keeps_last_subscriptions() {
        let log = Log::default();
        let mut app = create_app(logging_hooks(
            AppOptions::new("runaway")
                .data(|| record([("n", 0i64), ("other", 0i64)]))
                .render(|scope| {
                    scope.get("other")?;
                    let n = scope.get("n")?.expect_int()?;
                    scope.set("n", n + 1)?;
                    Ok(())
                })
                .flush_limit(5),
            &log,
        ));
        app.mount("#app").unwrap();
        log.borrow_mut().clear();

        let err = app.flush().unwrap_err();
        assert!(matches!(err, Error::InfiniteUpdateLoop { ref effect, limit: 5 } if effect == "render"));
        assert_eq!(app.phase(), Phase::Mounted);
        assert_eq!(log.borrow().as_slice(), ["beforeUpdate"]);

        // Still subscribed to what its last run read
        assert!(!app.has_pending());
        app.set("other", 1).unwrap();
        assert!(app.has_pending());
    }

    #[test]
    fn test_before_update_precedes_pending_effects() {
        let log = Log::default();
        let compute_log = Rc::clone(&log);
        let render_log = Rc::clone(&log);
        let mut app = create_app(logging_hooks(
            AppOptions::new("order")
                .data(|| record([("count", 0i64)]))
                .computed("double", move |scope| {
                    compute_log.borrow_mut().push("compute".to_string());
                    Ok(scope.get("count")?.expect_int()? * 2)
                })
                .render(move |scope| {
                    scope.get("count")?;
                    scope.get("double")?;
                    render_log.borrow_mut().push("render".to_string());
                    Ok(())
                }),
            &log,
        ));
        app.mount("#app").unwrap();
        log.borrow_mut().clear();

        app.set("count", 1).unwrap();
        app.flush().unwrap();
        assert_eq!(
            log.borrow().as_slice(),
            ["beforeUpdate", "compute", "render", "updated"]
        );
    }

    #[test]
    fn test_before_update_when_render_queued_mid_flush() {
        let log = Log::default();
        let compute_log = Rc::clone(&log);
        let render_log = Rc::clone(&log);
        let mut app = create_app(logging_hooks(
            AppOptions::new("late")
                .data(|| record([("count", 0i64)]))
                .computed("double", move |scope| {
                    compute_log.borrow_mut().push("compute".to_string());
                    Ok(scope.get("count")?.expect_int()? * 2)
                })
                .render(move |scope| {
                    scope.get("double")?;
                    render_log.borrow_mut().push("render".to_string());
                    Ok(())
                }),
            &log,
        ));
        app.mount("#app").unwrap();
        log.borrow_mut().clear();

        app.set("count", 1).unwrap();
        app.flush().unwrap();
        assert_eq!(
            log.borrow().as_slice(),
            ["compute", "beforeUpdate", "render", "updated"]
        );
    }
}
