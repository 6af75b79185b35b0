//! Line-oriented editing commands over a [`TextInput`].
//!
//! Multi-line commands work on every line the selection touches. Afterwards
//! the selection covers the rewritten lines.

use itertools::Itertools;
use livepen_traits::{Selection, TextInput};

/// The result of an edit: new text and the selection to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub selection: Selection,
}

/// Byte range of the full lines touched by `selection`.
///
/// A non-empty selection ending right after a newline does not touch the
/// following line.
pub fn line_span(text: &str, selection: Selection) -> (usize, usize) {
    let selection = selection.clamp_to(text);
    let start = text[..selection.start]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut anchor = selection.end;
    if !selection.is_empty() && anchor > start && text[..anchor].ends_with('\n') {
        anchor -= 1;
    }
    let end = text[anchor..]
        .find('\n')
        .map(|i| anchor + i)
        .unwrap_or(text.len());
    (start, end)
}

fn rewrite_span(
    text: &str,
    selection: Selection,
    rewrite: impl Fn(&[&str]) -> Vec<String>,
) -> Edit {
    let (start, end) = line_span(text, selection);
    let lines: Vec<&str> = text[start..end].split('\n').collect();
    let block = rewrite(&lines).into_iter().join("\n");

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..start]);
    out.push_str(&block);
    out.push_str(&text[end..]);
    Edit {
        selection: Selection::new(start, start + block.len()),
        text: out,
    }
}

fn is_commented(line: &str, prefix: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(prefix)
}

fn uncomment_line(line: &str, prefix: &str) -> String {
    match line.trim_start().strip_prefix(prefix) {
        Some(rest) => {
            let mut chars = rest.chars();
            match chars.next() {
                Some(c) if c.is_whitespace() => chars.as_str().to_string(),
                _ => rest.to_string(),
            }
        }
        None => line.to_string(),
    }
}

/// Comments out the touched lines, or uncomments them when every one is
/// already commented or blank.
///
/// Commenting prefixes non-blank lines with `"{prefix} "`. Uncommenting
/// removes leading whitespace, the prefix and at most one following
/// whitespace character.
pub fn toggle_comment_text(text: &str, selection: Selection, prefix: &str) -> Edit {
    rewrite_span(text, selection, |lines| {
        if lines.iter().all(|line| is_commented(line, prefix)) {
            lines
                .iter()
                .map(|line| uncomment_line(line, prefix))
                .collect()
        } else {
            lines
                .iter()
                .map(|line| {
                    if line.trim().is_empty() {
                        line.to_string()
                    } else {
                        format!("{prefix} {line}")
                    }
                })
                .collect()
        }
    })
}

/// Prefixes every touched line with `unit`.
pub fn indent_text(text: &str, selection: Selection, unit: &str) -> Edit {
    rewrite_span(text, selection, |lines| {
        lines.iter().map(|line| format!("{unit}{line}")).collect()
    })
}

/// Removes one indentation step from every touched line: `tab_size` spaces,
/// or else a single tab character.
pub fn outdent_text(text: &str, selection: Selection, tab_size: usize) -> Edit {
    let spaces = " ".repeat(tab_size.max(1));
    rewrite_span(text, selection, |lines| {
        lines
            .iter()
            .map(|line| {
                line.strip_prefix(spaces.as_str())
                    .or_else(|| line.strip_prefix('\t'))
                    .unwrap_or(line)
                    .to_string()
            })
            .collect()
    })
}

/// Replaces the selection with `unit` and places the caret after it.
pub fn insert_tab_text(text: &str, selection: Selection, unit: &str) -> Edit {
    let selection = selection.clamp_to(text);
    let mut out = String::with_capacity(text.len() + unit.len());
    out.push_str(&text[..selection.start]);
    out.push_str(unit);
    out.push_str(&text[selection.end..]);
    Edit {
        text: out,
        selection: Selection::caret(selection.start + unit.len()),
    }
}

fn apply(input: &mut dyn TextInput, edit: impl FnOnce(&str, Selection) -> Edit) -> bool {
    let text = input.text();
    let result = edit(&text, input.selection());
    let changed = result.text != text;
    input.set_text(&result.text);
    input.set_selection(result.selection);
    changed
}

/// Returns whether the text changed.
pub fn toggle_comment(input: &mut dyn TextInput, prefix: &str) -> bool {
    apply(input, |text, sel| toggle_comment_text(text, sel, prefix))
}

/// Indents the touched lines, or inserts one indentation unit when the
/// selection does not cross a line break.
pub fn indent(input: &mut dyn TextInput, unit: &str) -> bool {
    apply(input, |text, sel| {
        let sel = sel.clamp_to(text);
        if text[sel.start..sel.end].contains('\n') {
            indent_text(text, sel, unit)
        } else {
            insert_tab_text(text, sel, unit)
        }
    })
}

pub fn outdent(input: &mut dyn TextInput, tab_size: usize) -> bool {
    apply(input, |text, sel| outdent_text(text, sel, tab_size))
}

pub fn insert_tab(input: &mut dyn TextInput, unit: &str) -> bool {
    apply(input, |text, sel| insert_tab_text(text, sel, unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepen_traits::InMemoryTextInput;

    fn whole(text: &str) -> Selection {
        Selection::new(0, text.len())
    }

    #[test]
    fn test_line_span_caret() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_span(text, Selection::caret(5)), (4, 7));
        assert_eq!(line_span(text, Selection::caret(0)), (0, 3));
        assert_eq!(line_span(text, Selection::caret(text.len())), (8, 13));
    }

    #[test]
    fn test_line_span_excludes_line_after_trailing_newline() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_span(text, Selection::new(0, 4)), (0, 3));
    }

    #[test]
    fn test_comment_prefixes_non_blank_lines() {
        let text = "let a = 1;\n\n  let b = 2;";
        let edit = toggle_comment_text(text, whole(text), "//");
        assert_eq!(edit.text, "// let a = 1;\n\n//   let b = 2;");
        assert_eq!(edit.selection, Selection::new(0, edit.text.len()));
    }

    #[test]
    fn test_uncomment_when_all_commented_or_blank() {
        let text = "// a\n\n  //b\n//  c";
        let edit = toggle_comment_text(text, whole(text), "//");
        assert_eq!(edit.text, "a\n\nb\n c");
    }

    #[test]
    fn test_mixed_lines_are_commented() {
        let text = "// a\nb";
        let edit = toggle_comment_text(text, whole(text), "//");
        assert_eq!(edit.text, "// // a\n// b");
    }

    #[test]
    fn test_comment_toggle_round_trips() {
        let text = "function f() {\n    return 1;\n}";
        let commented = toggle_comment_text(text, whole(text), "//");
        let restored = toggle_comment_text(&commented.text, commented.selection, "//");
        assert_eq!(restored.text, text);
    }

    #[test]
    fn test_comment_touches_only_selected_lines() {
        let text = "a\nb\nc";
        let edit = toggle_comment_text(text, Selection::caret(2), "//");
        assert_eq!(edit.text, "a\n// b\nc");
        assert_eq!(edit.selection, Selection::new(2, 6));
    }

    #[test]
    fn test_indent_and_outdent() {
        let text = "a\n\tb\n  c";
        let indented = indent_text(text, whole(text), "    ");
        assert_eq!(indented.text, "    a\n    \tb\n      c");

        let outdented = outdent_text(&indented.text, indented.selection, 4);
        assert_eq!(outdented.text, text);

        let again = outdent_text(&outdented.text, outdented.selection, 4);
        assert_eq!(again.text, "a\nb\n  c");
    }

    #[test]
    fn test_insert_tab_replaces_selection() {
        let edit = insert_tab_text("abcdef", Selection::new(2, 4), "  ");
        assert_eq!(edit.text, "ab  ef");
        assert_eq!(edit.selection, Selection::caret(4));
    }

    #[test]
    fn test_indent_single_line_inserts_unit() {
        let mut input = InMemoryTextInput::new("ab").with_selection(Selection::caret(1));
        assert!(indent(&mut input, "    "));
        assert_eq!(input.text(), "a    b");
        assert_eq!(input.selection(), Selection::caret(5));
    }

    #[test]
    fn test_indent_multi_line_selection() {
        let mut input = InMemoryTextInput::new("a\nb").with_selection(Selection::new(0, 3));
        assert!(indent(&mut input, "  "));
        assert_eq!(input.text(), "  a\n  b");
    }

    #[test]
    fn test_outdent_without_indentation_reports_no_change() {
        let mut input = InMemoryTextInput::new("a");
        assert!(!outdent(&mut input, 4));
    }

    #[test]
    fn test_toggle_on_input_handles_multibyte_text() {
        let mut input =
            InMemoryTextInput::new("ñandú\nok").with_selection(Selection::new(0, 2));
        assert!(toggle_comment(&mut input, "//"));
        assert_eq!(input.text(), "// ñandú\nok");
    }
}
