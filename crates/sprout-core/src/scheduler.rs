//! Per-app flush queue
//!
//! Writes never run effects inline. They enqueue effect ids here, and the app
//! drains the queue once per tick in [`App::flush`](crate::App::flush).
//!
//! Ordering within a flush: computed effects first, then watchers, then the
//! render effect; within a kind, in the order first enqueued. An effect
//! enqueued while the flush is draining joins the same drain. The scheduler
//! counts runs per effect so the app can stop a flush that keeps re-queueing
//! the same effect.

use crate::{EffectId, EffectKind, SchedulerConfig};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::trace;

/// An effect taken off the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    /// The effect to run
    pub id: EffectId,
    /// Its kind
    pub kind: EffectKind,
    /// How many times it has been taken in the current flush, this one included
    pub run: usize,
}

/// Result of one flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Effects that ran, in run order
    pub ran: Vec<EffectId>,
    /// Whether `beforeUpdate`/`updated` fired
    pub updated: bool,
}

impl FlushReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of effect runs
    pub fn runs(&self) -> usize {
        self.ran.len()
    }

    /// How many times `id` ran
    pub fn runs_of(&self, id: EffectId) -> usize {
        self.ran.iter().filter(|ran| **ran == id).count()
    }

    /// Check if nothing ran
    pub fn is_empty(&self) -> bool {
        self.ran.is_empty()
    }
}

/// Pending effect set for the current tick
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// Pending effects in first-enqueued order (deduplicated by id)
    pending: IndexMap<EffectId, EffectKind>,
    /// Runs per effect during the current flush
    runs: HashMap<EffectId, usize>,
    flushing: bool,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler with a specific configuration
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Queue an effect for the next flush
    ///
    /// Returns false if it was already pending.
    pub fn enqueue(&mut self, id: EffectId, kind: EffectKind) -> bool {
        if self.pending.contains_key(&id) {
            return false;
        }
        trace!(effect = %id, %kind, flushing = self.flushing, "enqueue");
        self.pending.insert(id, kind);
        true
    }

    /// The effect that [`pop`](Self::pop) would return next
    pub fn peek(&self) -> Option<(EffectId, EffectKind)> {
        self.next_index()
            .and_then(|index| self.pending.get_index(index))
            .map(|(id, kind)| (*id, *kind))
    }

    /// Take the next effect to run
    pub fn pop(&mut self) -> Option<Pending> {
        let index = self.next_index()?;
        let (id, kind) = self.pending.shift_remove_index(index)?;
        let run = self.runs.entry(id).or_insert(0);
        *run += 1;
        Some(Pending { id, kind, run: *run })
    }

    fn next_index(&self) -> Option<usize> {
        self.pending
            .values()
            .enumerate()
            .min_by_key(|(index, kind)| (kind.rank(), *index))
            .map(|(index, _)| index)
    }

    /// Drop one effect from the queue (it ran outside the flush order)
    pub fn remove(&mut self, id: EffectId) -> bool {
        self.pending.shift_remove(&id).is_some()
    }

    /// Drop everything pending, returning how many effects were discarded
    pub fn discard(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Mark the start of a flush
    ///
    /// Returns false if a flush is already in progress; flushes do not nest.
    pub fn begin_flush(&mut self) -> bool {
        if self.flushing {
            return false;
        }
        self.flushing = true;
        self.runs.clear();
        true
    }

    /// Mark the end of a flush
    pub fn end_flush(&mut self) {
        self.flushing = false;
        self.runs.clear();
    }

    /// Check if anything is pending
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of pending effects
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Check whether `id` is pending
    pub fn is_pending(&self, id: EffectId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Check whether an effect of `kind` is pending
    pub fn has_pending_kind(&self, kind: EffectKind) -> bool {
        self.pending.values().any(|pending| *pending == kind)
    }

    /// Maximum runs of one effect per flush
    pub fn flush_limit(&self) -> usize {
        self.config.flush_limit()
    }
}
