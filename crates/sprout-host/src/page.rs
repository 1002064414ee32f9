//! Page: the host event loop for sprout apps
//!
//! A page owns every app mounted on it, a virtual millisecond clock and a
//! timer list. Work reaches the apps as tasks: the initial script passed to
//! [`Page::run`] and the callbacks registered with [`Page::set_timeout`]. The
//! end of a task is the tick boundary, so after every task the page flushes
//! each app that has pending work, one app after another in mount order.

use crate::{Error, HostConfig, Result};
use sprout_core::{create_app, App, AppOptions, MountTarget, Phase};
use std::fmt;
use tracing::{debug, info, warn};

/// Handle to an app mounted on a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppHandle(usize);

impl fmt::Display for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app:{}", self.0)
    }
}

/// Handle to a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A unit of host work
pub type Task = Box<dyn FnOnce(&mut Page) -> Result<()>>;

struct Timer {
    id: TimerId,
    due: u64,
    task: Task,
}

/// Host page with its apps, clock and timers
pub struct Page {
    config: HostConfig,
    apps: Vec<App>,
    /// Current virtual time in milliseconds
    now: u64,
    /// Pending timers sorted by (due, id)
    timers: Vec<Timer>,
    next_timer: u64,
}

impl Page {
    /// Create an empty page
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            apps: Vec::new(),
            now: 0,
            timers: Vec::new(),
            next_timer: 0,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Start describing an app that uses the page's scheduler settings
    pub fn options(&self, name: impl Into<String>) -> AppOptions {
        AppOptions::new(name).scheduler(self.config.scheduler)
    }

    /// Create and mount an app on `target`, then flush it
    ///
    /// The app joins the page before it mounts. If mounting or the first
    /// flush fails, [`Error::Mount`] carries its handle so the caller can
    /// inspect the app or retry with [`App::mount`].
    pub fn mount(&mut self, options: AppOptions, target: impl Into<MountTarget>) -> Result<AppHandle> {
        let handle = AppHandle(self.apps.len());
        self.apps.push(create_app(options));
        let app = self.app_mut(handle)?;
        let mounted = app.mount(target).and_then(|()| app.flush()).map(drop);
        if let Err(source) = mounted {
            warn!(app = app.name(), %handle, error = %source, "mount failed");
            return Err(Error::Mount { app: handle, source });
        }
        info!(app = app.name(), %handle, target = ?app.target().map(MountTarget::as_str), "mounted");
        Ok(handle)
    }

    /// Get a mounted app
    pub fn app(&self, handle: AppHandle) -> Result<&App> {
        self.apps.get(handle.0).ok_or(Error::UnknownApp(handle))
    }

    /// Get a mounted app mutably
    pub fn app_mut(&mut self, handle: AppHandle) -> Result<&mut App> {
        self.apps.get_mut(handle.0).ok_or(Error::UnknownApp(handle))
    }

    /// All apps, in mount order
    pub fn apps(&self) -> impl Iterator<Item = (AppHandle, &App)> {
        self.apps
            .iter()
            .enumerate()
            .map(|(index, app)| (AppHandle(index), app))
    }

    /// Run a task now, then flush every app with pending work
    pub fn run<T>(&mut self, task: impl FnOnce(&mut Page) -> Result<T>) -> Result<T> {
        let output = task(self)?;
        self.flush_all()?;
        Ok(output)
    }

    /// Call a method on an app as its own task
    pub fn call(
        &mut self,
        handle: AppHandle,
        method: &str,
        args: &[sprout_core::Value],
    ) -> Result<sprout_core::Value> {
        self.run(|page| Ok(page.app_mut(handle)?.call(method, args)?))
    }

    /// Unmount an app as its own task
    pub fn unmount(&mut self, handle: AppHandle) -> Result<()> {
        self.run(|page| Ok(page.app_mut(handle)?.unmount()?))
    }

    /// Flush every app that has pending work, in mount order
    ///
    /// Each app is flushed even if an earlier one failed; the first error is
    /// returned.
    pub fn flush_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for app in self.apps.iter_mut().filter(|app| app.has_pending()) {
            if let Err(e) = app.flush() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Schedule `task` to run `delay_ms` after the current time
    pub fn set_timeout(
        &mut self,
        delay_ms: u64,
        task: impl FnOnce(&mut Page) -> Result<()> + 'static,
    ) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        let due = self.now + delay_ms;
        debug!(timer = id.0, due, "set timeout");
        self.timers.push(Timer {
            id,
            due,
            task: Box::new(task),
        });
        self.timers.sort_by_key(|timer| (timer.due, timer.id));
        id
    }

    /// Cancel a pending timer; returns false if it already ran or never existed
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of timers not yet run
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward by `ms`, running every timer that falls due
    ///
    /// Timers scheduled by a running timer run in the same call if they fall
    /// due before the end of the window. Returns how many timers ran.
    pub fn advance(&mut self, ms: u64) -> Result<usize> {
        let until = self.now + ms;
        let mut ran = 0;
        while self.timers.first().is_some_and(|timer| timer.due <= until) {
            self.run_next_timer()?;
            ran += 1;
        }
        self.now = until;
        Ok(ran)
    }

    /// Run timers until none are left; returns how many ran
    pub fn run_until_idle(&mut self) -> Result<usize> {
        let mut ran = 0;
        while !self.timers.is_empty() {
            self.run_next_timer()?;
            ran += 1;
        }
        Ok(ran)
    }

    fn run_next_timer(&mut self) -> Result<()> {
        if self.timers.is_empty() {
            return Ok(());
        }
        let timer = self.timers.remove(0);
        self.now = self.now.max(timer.due);
        debug!(timer = timer.id.0, now = self.now, "timer fired");
        self.run(timer.task)
    }

    /// Check whether every app on the page is unmounted
    pub fn is_empty(&self) -> bool {
        self.apps.iter().all(|app| app.phase() == Phase::Unmounted)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("now", &self.now)
            .field("apps", &self.apps)
            .field("timers", &self.timers.iter().map(|t| (t.id, t.due)).collect::<Vec<_>>())
            .finish()
    }
}
