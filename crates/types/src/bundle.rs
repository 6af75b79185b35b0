use crate::role::DocumentRole;
use serde::{Deserialize, Serialize};

/// The three source buffers of a project.
///
/// Every role is always present; an unused buffer is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBundle {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl SourceBundle {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    pub fn get(&self, role: DocumentRole) -> &str {
        match role {
            DocumentRole::Markup => &self.markup,
            DocumentRole::Style => &self.style,
            DocumentRole::Script => &self.script,
        }
    }

    pub fn set(&mut self, role: DocumentRole, text: impl Into<String>) {
        let slot = match role {
            DocumentRole::Markup => &mut self.markup,
            DocumentRole::Style => &mut self.style,
            DocumentRole::Script => &mut self.script,
        };
        *slot = text.into();
    }

    /// Iterates `(role, text)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentRole, &str)> {
        DocumentRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

/// A complete renderable document produced by composing a [`SourceBundle`].
///
/// The text is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument(String);

impl ComposedDocument {
    pub fn new(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ComposedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
