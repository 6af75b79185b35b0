//! A `<textarea>` as a [`TextInput`].
//!
//! The DOM reports selections in UTF-16 code units; [`Selection`] uses byte
//! offsets, so both directions are converted here.

use livepen_traits::{Selection, TextInput};
use web_sys::HtmlTextAreaElement;

/// Byte offset of the UTF-16 offset `units` in `text`, clamped to its end.
pub fn utf16_to_byte(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for (byte, ch) in text.char_indices() {
        if seen >= units {
            return byte;
        }
        seen += ch.len_utf16();
    }
    text.len()
}

/// UTF-16 offset of the byte offset `byte` in `text`.
pub fn byte_to_utf16(text: &str, byte: usize) -> usize {
    text[..byte.min(text.len())]
        .chars()
        .map(char::len_utf16)
        .sum()
}

#[derive(Debug, Clone)]
pub struct TextAreaInput {
    element: HtmlTextAreaElement,
}

impl TextAreaInput {
    pub fn new(element: HtmlTextAreaElement) -> Self {
        Self { element }
    }
}

impl TextInput for TextAreaInput {
    fn text(&self) -> String {
        self.element.value()
    }

    fn set_text(&mut self, text: &str) {
        self.element.set_value(text);
    }

    fn selection(&self) -> Selection {
        let text = self.element.value();
        let offset = |units: Option<u32>| utf16_to_byte(&text, units.unwrap_or(0) as usize);
        let start = self.element.selection_start().ok().flatten();
        let end = self.element.selection_end().ok().flatten();
        Selection::new(offset(start), offset(end)).clamp_to(&text)
    }

    fn set_selection(&mut self, selection: Selection) {
        let text = self.element.value();
        let selection = selection.clamp_to(&text);
        let start = byte_to_utf16(&text, selection.start) as u32;
        let end = byte_to_utf16(&text, selection.end) as u32;
        let _ = self.element.set_selection_range(start, end);
    }
}
