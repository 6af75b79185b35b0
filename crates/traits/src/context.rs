//! The isolated execution context a preview document is rendered into.
//!
//! In a browser this is an `<iframe>`; the trait keeps the renderer testable
//! without one.

use std::fmt::Debug;
use thiserror::Error;

/// Errors raised by an [`IsolatedContext`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Direct document access was refused (for example by a cross-origin policy).
    #[error("Direct document access refused: {0}")]
    AccessDenied(String),

    /// Script injection into the live document failed.
    #[error("Script injection failed: {0}")]
    Injection(String),

    /// The context could not be created at all.
    #[error("Isolated context unavailable: {0}")]
    Unavailable(String),
}

/// A sandboxed rendering surface with its own global scope.
///
/// Every load fully replaces the previous document.
pub trait IsolatedContext: Debug {
    /// Replace the document through direct document access.
    ///
    /// Embedded scripts run inside the context as part of the load.
    fn write_direct(&mut self, html: &str) -> Result<(), ContextError>;

    /// Append a script element to the head of the document written by
    /// [`write_direct`](Self::write_direct).
    fn inject_script(&mut self, source: &str) -> Result<(), ContextError>;

    /// Replace the document without direct access (the `srcdoc` path).
    ///
    /// This path cannot fail, but the host gets no handle on the resulting
    /// document.
    fn load_fallback(&mut self, html: &str);

    /// Returns a human-readable name for this context (for logging/debugging).
    fn name(&self) -> &'static str;
}

// Blanket implementation for boxed contexts
impl<C: IsolatedContext + ?Sized> IsolatedContext for Box<C> {
    fn write_direct(&mut self, html: &str) -> Result<(), ContextError> {
        (**self).write_direct(html)
    }

    fn inject_script(&mut self, source: &str) -> Result<(), ContextError> {
        (**self).inject_script(source)
    }

    fn load_fallback(&mut self, html: &str) {
        (**self).load_fallback(html)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// How a document reached an [`InMemoryContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRecord {
    Direct(String),
    Fallback(String),
    Script(String),
}

/// A simulated context that records every load.
///
/// Direct access and script injection can be refused to exercise the
/// fallback paths.
#[derive(Debug, Default)]
pub struct InMemoryContext {
    records: Vec<LoadRecord>,
    refuse_direct: bool,
    refuse_injection: bool,
}

impl InMemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose direct document access is always refused.
    pub fn cross_origin() -> Self {
        Self {
            refuse_direct: true,
            ..Self::default()
        }
    }

    pub fn with_refused_injection(mut self) -> Self {
        self.refuse_injection = true;
        self
    }

    pub fn records(&self) -> &[LoadRecord] {
        &self.records
    }

    /// The HTML of the most recent direct or fallback load.
    pub fn current_document(&self) -> Option<&str> {
        self.records.iter().rev().find_map(|record| match record {
            LoadRecord::Direct(html) | LoadRecord::Fallback(html) => Some(html.as_str()),
            LoadRecord::Script(_) => None,
        })
    }

    pub fn injected_scripts(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(|record| match record {
            LoadRecord::Script(source) => Some(source.as_str()),
            _ => None,
        })
    }
}

impl IsolatedContext for InMemoryContext {
    fn write_direct(&mut self, html: &str) -> Result<(), ContextError> {
        if self.refuse_direct {
            return Err(ContextError::AccessDenied(
                "simulated cross-origin frame".to_string(),
            ));
        }
        self.records.push(LoadRecord::Direct(html.to_string()));
        Ok(())
    }

    fn inject_script(&mut self, source: &str) -> Result<(), ContextError> {
        if self.refuse_injection {
            return Err(ContextError::Injection("document has no head".to_string()));
        }
        self.records.push(LoadRecord::Script(source.to_string()));
        Ok(())
    }

    fn load_fallback(&mut self, html: &str) {
        self.records.push(LoadRecord::Fallback(html.to_string()));
    }

    fn name(&self) -> &'static str {
        "InMemoryContext"
    }
}
