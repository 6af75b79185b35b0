//! The text-input widget capability.

use std::fmt::Debug;

/// A selection as byte offsets into the widget's text.
///
/// `start <= end` always holds; a caret is an empty selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both ends into `text`, snapping down to character boundaries.
    pub fn clamp_to(self, text: &str) -> Self {
        let snap = |mut i: usize| {
            i = i.min(text.len());
            while !text.is_char_boundary(i) {
                i -= 1;
            }
            i
        };
        Self::new(snap(self.start), snap(self.end))
    }
}

/// A text widget the editor reads from and writes to.
pub trait TextInput: Debug {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn selection(&self) -> Selection;
    fn set_selection(&mut self, selection: Selection);
}

/// A plain in-memory widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryTextInput {
    text: String,
    selection: Selection,
}

impl InMemoryTextInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: Selection::default(),
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection.clamp_to(&self.text);
        self
    }
}

impl TextInput for InMemoryTextInput {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.selection = self.selection.clamp_to(&self.text);
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp_to(&self.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_orders_ends() {
        let sel = Selection::new(7, 2);
        assert_eq!(sel, Selection { start: 2, end: 7 });
    }

    #[test]
    fn test_clamp_snaps_to_char_boundary() {
        // 'é' is two bytes
        let text = "aé";
        let sel = Selection::new(2, 10).clamp_to(text);
        assert_eq!(sel, Selection { start: 1, end: 3 });
    }

    #[test]
    fn test_set_text_clamps_selection() {
        let mut input = InMemoryTextInput::new("hello world").with_selection(Selection::new(6, 11));
        input.set_text("hi");
        assert_eq!(input.selection(), Selection { start: 2, end: 2 });
    }
}
