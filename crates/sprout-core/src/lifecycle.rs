//! Lifecycle state machine and hook slots
//!
//! ```text
//! uncreated -> beforeCreate -> created -> beforeMount -> mounted
//!                                                          |  ^
//!                                            beforeUpdate <-+  |
//!                                                 |            |
//!                                              updated --------+
//! (any) -> beforeUnmount -> unmounted
//! ```
//!
//! A phase is entered only after its hook returned `Ok`. A failing hook leaves
//! the app in the phase it was already in.

use crate::{Result, Scope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of an app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Phase {
    #[default]
    Uncreated,
    BeforeCreate,
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    BeforeUnmount,
    Unmounted,
}

impl Phase {
    /// Get the phase name as hooks are named
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Uncreated => "uncreated",
            Phase::BeforeCreate => "beforeCreate",
            Phase::Created => "created",
            Phase::BeforeMount => "beforeMount",
            Phase::Mounted => "mounted",
            Phase::BeforeUpdate => "beforeUpdate",
            Phase::Updated => "updated",
            Phase::BeforeUnmount => "beforeUnmount",
            Phase::Unmounted => "unmounted",
        }
    }

    /// Check whether `next` directly follows this phase
    pub fn can_advance_to(&self, next: Phase) -> bool {
        use Phase::*;
        match (self, next) {
            (Uncreated, BeforeCreate)
            | (BeforeCreate, Created)
            | (Created, BeforeMount)
            | (BeforeMount, Mounted)
            | (Mounted, BeforeUpdate)
            | (BeforeUpdate, Updated)
            | (Updated, Mounted)
            | (BeforeUnmount, Unmounted) => true,
            (Unmounted | BeforeUnmount, BeforeUnmount) => false,
            (_, BeforeUnmount) => true,
            _ => false,
        }
    }

    /// Check if the app is mounted (including inside an update cycle)
    pub fn is_mounted(&self) -> bool {
        matches!(self, Phase::Mounted | Phase::BeforeUpdate | Phase::Updated)
    }

    /// Check if the phase is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Unmounted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A lifecycle hook slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hook {
    BeforeCreate,
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    BeforeUnmount,
    Unmounted,
}

impl Hook {
    /// Every hook, in lifecycle order
    pub const ALL: [Hook; 8] = [
        Hook::BeforeCreate,
        Hook::Created,
        Hook::BeforeMount,
        Hook::Mounted,
        Hook::BeforeUpdate,
        Hook::Updated,
        Hook::BeforeUnmount,
        Hook::Unmounted,
    ];

    /// The phase entered once this hook returns
    pub fn phase(&self) -> Phase {
        match self {
            Hook::BeforeCreate => Phase::BeforeCreate,
            Hook::Created => Phase::Created,
            Hook::BeforeMount => Phase::BeforeMount,
            Hook::Mounted => Phase::Mounted,
            Hook::BeforeUpdate => Phase::BeforeUpdate,
            Hook::Updated => Phase::Updated,
            Hook::BeforeUnmount => Phase::BeforeUnmount,
            Hook::Unmounted => Phase::Unmounted,
        }
    }

    fn slot(&self) -> usize {
        match self {
            Hook::BeforeCreate => 0,
            Hook::Created => 1,
            Hook::BeforeMount => 2,
            Hook::Mounted => 3,
            Hook::BeforeUpdate => 4,
            Hook::Updated => 5,
            Hook::BeforeUnmount => 6,
            Hook::Unmounted => 7,
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.phase().name())
    }
}

/// A registered lifecycle callback
pub type HookFn = Box<dyn FnMut(&mut Scope<'_>) -> Result<()>>;

/// The eight hook slots of an app
#[derive(Default)]
pub struct Hooks {
    slots: [Option<HookFn>; 8],
}

impl Hooks {
    /// Create empty slots
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, replacing any previous one
    pub fn set(&mut self, hook: Hook, f: HookFn) {
        self.slots[hook.slot()] = Some(f);
    }

    /// Check whether a callback is registered
    pub fn is_registered(&self, hook: Hook) -> bool {
        self.slots[hook.slot()].is_some()
    }

    /// Take a callback out to run it; put it back with [`restore`](Self::restore)
    pub(crate) fn take(&mut self, hook: Hook) -> Option<HookFn> {
        self.slots[hook.slot()].take()
    }

    pub(crate) fn restore(&mut self, hook: Hook, f: HookFn) {
        self.slots[hook.slot()] = Some(f);
    }

    /// Registered hooks, in lifecycle order
    pub fn registered(&self) -> Vec<Hook> {
        Hook::ALL
            .into_iter()
            .filter(|hook| self.is_registered(*hook))
            .collect()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("registered", &self.registered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_transitions() {
        assert!(Phase::Uncreated.can_advance_to(Phase::BeforeCreate));
        assert!(Phase::BeforeCreate.can_advance_to(Phase::Created));
        assert!(Phase::Created.can_advance_to(Phase::BeforeMount));
        assert!(Phase::BeforeMount.can_advance_to(Phase::Mounted));

        assert!(!Phase::Uncreated.can_advance_to(Phase::Created));
        assert!(!Phase::Created.can_advance_to(Phase::Mounted));
        assert!(!Phase::Mounted.can_advance_to(Phase::Created));
    }

    #[test]
    fn test_update_cycle_repeats() {
        let mut phase = Phase::Mounted;
        for _ in 0..3 {
            for next in [Phase::BeforeUpdate, Phase::Updated, Phase::Mounted] {
                assert!(phase.can_advance_to(next), "{} -> {}", phase, next);
                phase = next;
            }
        }
    }

    #[test]
    fn test_unmount_from_anywhere_and_terminal() {
        for phase in [Phase::Uncreated, Phase::Created, Phase::Mounted, Phase::Updated] {
            assert!(phase.can_advance_to(Phase::BeforeUnmount));
        }
        assert!(Phase::BeforeUnmount.can_advance_to(Phase::Unmounted));
        assert!(Phase::Unmounted.is_terminal());
        for next in [Phase::BeforeUnmount, Phase::Mounted, Phase::Uncreated] {
            assert!(!Phase::Unmounted.can_advance_to(next));
        }
    }

    #[test]
    fn test_hook_names_and_phases() {
        assert_eq!(Hook::BeforeCreate.to_string(), "beforeCreate");
        assert_eq!(Hook::Unmounted.phase(), Phase::Unmounted);
        assert_eq!(Phase::BeforeUpdate.to_string(), "beforeUpdate");
    }

    #[test]
    fn test_hook_slots() {
        let noop = |_: &mut Scope<'_>| -> Result<()> { Ok(()) };
        let mut hooks = Hooks::new();
        hooks.set(Hook::Mounted, Box::new(noop));
        hooks.set(Hook::Created, Box::new(noop));

        assert_eq!(hooks.registered(), vec![Hook::Created, Hook::Mounted]);

        let f = hooks.take(Hook::Mounted).expect("registered");
        assert!(!hooks.is_registered(Hook::Mounted));
        hooks.restore(Hook::Mounted, f);
        assert!(hooks.is_registered(Hook::Mounted));
    }
}
