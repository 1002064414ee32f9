//! Platform stand-ins: clipboard and alert dialogs
//!
//! Both are cheap shared handles. Clone one into a method closure to give the
//! method access; read it back from the host side.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// In-memory text clipboard
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    text: Rc<RefCell<Option<String>>>,
}

impl Clipboard {
    /// Create an empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents
    pub fn write_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = Some(text.into());
    }

    /// Current contents, if anything was written
    pub fn read_text(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

/// Recorded alert messages
#[derive(Debug, Clone, Default)]
pub struct Alerts {
    messages: Rc<RefCell<Vec<String>>>,
}

impl Alerts {
    /// Create an empty alert log
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an alert
    pub fn alert(&self, message: impl Into<String>) {
        let message = message.into();
        info!(%message, "alert");
        self.messages.borrow_mut().push(message);
    }

    /// All alerts shown so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// The most recent alert
    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}
