//! Dependency graph between reactive properties and effects
//!
//! Pure bookkeeping: the graph records which effects read which property
//! during their last run. It holds effect ids only and never owns or runs an
//! effect.
//!
//! Two indexes are kept in step:
//! - property -> subscribers (who to schedule when the property changes)
//! - effect -> reads (what to forget before the effect runs again)
//!
//! The reverse index is what makes stale-dependency pruning cheap: before an
//! effect re-runs, [`DepGraph::untrack`] drops it from every property it read
//! last time, so a branch that is no longer taken stops triggering it.

use crate::EffectId;
use indexmap::IndexSet;
use std::collections::HashMap;

/// Property -> effect subscriptions, rebuilt on every effect run
#[derive(Debug, Clone, Default)]
pub struct DepGraph {
    subscribers: HashMap<String, IndexSet<EffectId>>,
    reads: HashMap<EffectId, IndexSet<String>>,
}

impl DepGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `effect` read `property`
    ///
    /// Returns false if the subscription already existed.
    pub fn track(&mut self, property: &str, effect: EffectId) -> bool {
        let added = self
            .subscribers
            .entry(property.to_string())
            .or_default()
            .insert(effect);
        if added {
            self.reads
                .entry(effect)
                .or_default()
                .insert(property.to_string());
        }
        added
    }

    /// Take the subscribers of `property`, clearing its subscriber set
    ///
    /// Subscribers come back in the order they first subscribed.
    pub fn invalidate(&mut self, property: &str) -> IndexSet<EffectId> {
        let subscribers = self.subscribers.remove(property).unwrap_or_default();
        for effect in &subscribers {
            if let Some(reads) = self.reads.get_mut(effect) {
                reads.shift_remove(property);
                if reads.is_empty() {
                    self.reads.remove(effect);
                }
            }
        }
        subscribers
    }

    /// Drop every subscription `effect` holds
    ///
    /// Returns how many properties the effect was subscribed to.
    pub fn untrack(&mut self, effect: EffectId) -> usize {
        let Some(reads) = self.reads.remove(&effect) else {
            return 0;
        };
        for property in &reads {
            if let Some(subscribers) = self.subscribers.get_mut(property) {
                subscribers.shift_remove(&effect);
                if subscribers.is_empty() {
                    self.subscribers.remove(property);
                }
            }
        }
        reads.len()
    }

    /// Effects currently subscribed to `property`
    pub fn subscribers(&self, property: &str) -> Vec<EffectId> {
        self.subscribers
            .get(property)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Properties `effect` read in its last run
    pub fn dependencies(&self, effect: EffectId) -> Vec<&str> {
        self.reads
            .get(&effect)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Check whether `effect` is subscribed to `property`
    pub fn is_subscribed(&self, property: &str, effect: EffectId) -> bool {
        self.subscribers
            .get(property)
            .is_some_and(|set| set.contains(&effect))
    }

    /// Check if no subscription exists
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Drop all subscriptions
    pub fn clear(&mut self) {
        self.subscribers.clear();
        self.reads.clear();
    }
}
