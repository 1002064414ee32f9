//! Text renderer
//!
//! Stands in for a DOM renderer: each render pass produces one line of text
//! and appends it to a shared [`Frames`] log. Templates use `{{ name }}`
//! placeholders; a dotted name (`{{ boxStyle.transform }}`) reads a field of
//! a map value. Every placeholder is read through the tracked scope, so the
//! render effect re-runs when any displayed property changes.

use sprout_core::{Error, Renderer, Result, Scope, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// One rendered frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Name of the app that rendered it
    pub app: String,
    /// Mount target at render time
    pub target: Option<String>,
    pub text: String,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "[{}] {}", target, self.text),
            None => write!(f, "[{}] {}", self.app, self.text),
        }
    }
}

/// Shared log of rendered frames
#[derive(Debug, Clone, Default)]
pub struct Frames {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl Frames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, frame: Frame) {
        self.frames.borrow_mut().push(frame);
    }

    /// Every frame, oldest first
    pub fn all(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }

    /// The most recent frame
    pub fn last(&self) -> Option<Frame> {
        self.frames.borrow().last().cloned()
    }

    /// Texts rendered by one app, oldest first
    pub fn texts_for(&self, app: &str) -> Vec<String> {
        self.frames
            .borrow()
            .iter()
            .filter(|frame| frame.app == app)
            .map(|frame| frame.text.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }
}

type TextFn = Box<dyn FnMut(&mut Scope<'_>) -> Result<String>>;

enum Source {
    Template(String),
    Function(TextFn),
}

/// Renderer producing one text line per render pass
pub struct TextRenderer {
    source: Source,
    frames: Frames,
}

impl TextRenderer {
    /// Render with a `{{ name }}` template
    pub fn template(template: impl Into<String>, frames: &Frames) -> Self {
        Self {
            source: Source::Template(template.into()),
            frames: frames.clone(),
        }
    }

    /// Render with a function of the scope
    pub fn new<F>(frames: &Frames, f: F) -> Self
    where
        F: FnMut(&mut Scope<'_>) -> Result<String> + 'static,
    {
        Self {
            source: Source::Function(Box::new(f)),
            frames: frames.clone(),
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, scope: &mut Scope<'_>) -> Result<()> {
        let text = match &mut self.source {
            Source::Template(template) => interpolate(template, scope)?,
            Source::Function(f) => f(scope)?,
        };
        debug!(app = scope.app_name(), %text, "render");
        self.frames.push(Frame {
            app: scope.app_name().to_string(),
            target: scope.target().map(|target| target.to_string()),
            text,
        });
        Ok(())
    }
}

/// Fill `{{ name }}` placeholders from the scope
///
/// An unterminated `{{` is copied through as-is.
pub fn interpolate(template: &str, scope: &mut Scope<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        let value = lookup(scope, after[..end].trim())?;
        out.push_str(&value.to_string());
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn lookup(scope: &mut Scope<'_>, path: &str) -> Result<Value> {
    let mut segments = path.split('.');
    let root = segments.next().unwrap_or_default();
    let mut value = scope.get(root)?;
    for segment in segments {
        value = value
            .expect_map()?
            .get(segment)
            .cloned()
            .ok_or_else(|| Error::UnknownProperty(path.to_string()))?;
    }
    Ok(value)
}
