//! Keyboard shortcuts.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Save,
    Run,
    ToggleComment,
    Help,
    Indent,
    Outdent,
}

impl Shortcut {
    pub const ALL: [Shortcut; 6] = [
        Shortcut::Save,
        Shortcut::Run,
        Shortcut::ToggleComment,
        Shortcut::Help,
        Shortcut::Indent,
        Shortcut::Outdent,
    ];

    /// Maps a key event to a shortcut.
    ///
    /// `key` is the DOM `KeyboardEvent.key` value. `ctrl_or_meta` is set when
    /// either Ctrl or Cmd is held; `ctrl` only for Ctrl itself, since the
    /// comment toggle is bound to Ctrl alone.
    pub fn from_key(key: &str, ctrl_or_meta: bool, ctrl: bool, shift: bool) -> Option<Self> {
        match key {
            "s" if ctrl_or_meta => Some(Shortcut::Save),
            "r" if ctrl_or_meta => Some(Shortcut::Run),
            "/" if ctrl => Some(Shortcut::ToggleComment),
            "F1" => Some(Shortcut::Help),
            "Tab" if shift => Some(Shortcut::Outdent),
            "Tab" => Some(Shortcut::Indent),
            _ => None,
        }
    }

    pub fn keys(self) -> &'static str {
        match self {
            Shortcut::Save => "Ctrl/Cmd + S",
            Shortcut::Run => "Ctrl/Cmd + R",
            Shortcut::ToggleComment => "Ctrl + /",
            Shortcut::Help => "F1",
            Shortcut::Indent => "Tab",
            Shortcut::Outdent => "Shift + Tab",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Shortcut::Save => "Save code",
            Shortcut::Run => "Run code",
            Shortcut::ToggleComment => "Comment/uncomment lines",
            Shortcut::Help => "Show this help",
            Shortcut::Indent => "Indent code",
            Shortcut::Outdent => "Outdent code",
        }
    }

    /// A listing of every shortcut, one per line.
    pub fn help_text() -> String {
        let mut text = String::from("Keyboard shortcuts:\n");
        for shortcut in Self::ALL {
            text.push_str(&format!("\n{:<14}{}", shortcut.keys(), shortcut.description()));
        }
        text
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_or_cmd_bindings() {
        assert_eq!(Shortcut::from_key("s", true, false, false), Some(Shortcut::Save));
        assert_eq!(Shortcut::from_key("r", true, true, false), Some(Shortcut::Run));
        assert_eq!(Shortcut::from_key("s", false, false, false), None);
    }

    #[test]
    fn test_comment_requires_ctrl_itself() {
        assert_eq!(
            Shortcut::from_key("/", true, true, false),
            Some(Shortcut::ToggleComment)
        );
        // Cmd + / on its own is not bound
        assert_eq!(Shortcut::from_key("/", true, false, false), None);
    }

    #[test]
    fn test_tab_bindings() {
        assert_eq!(Shortcut::from_key("Tab", false, false, false), Some(Shortcut::Indent));
        assert_eq!(Shortcut::from_key("Tab", false, false, true), Some(Shortcut::Outdent));
    }

    #[test]
    fn test_f1_needs_no_modifier() {
        assert_eq!(Shortcut::from_key("F1", false, false, false), Some(Shortcut::Help));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(Shortcut::from_key("x", true, true, true), None);
        assert_eq!(Shortcut::from_key("S", true, false, false), None);
    }

    #[test]
    fn test_help_text_lists_every_shortcut() {
        let help = Shortcut::help_text();
        for shortcut in Shortcut::ALL {
            assert!(help.contains(shortcut.keys()));
            assert!(help.contains(shortcut.description()));
        }
    }
}
