//! Persisted user preferences.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const DEFAULT_TAB_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Editor preferences.
///
/// Missing fields in a stored record fall back to their defaults, so records
/// written by older versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    pub font_size: u32,
    pub tab_size: usize,
    pub auto_save: bool,
    pub line_numbers: bool,
    pub theme: Theme,
    pub power_saver: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            tab_size: DEFAULT_TAB_SIZE,
            auto_save: true,
            line_numbers: false,
            theme: Theme::Light,
            power_saver: false,
        }
    }
}

impl EditorSettings {
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    /// Sets the tab width; zero is raised to one.
    pub fn with_tab_size(mut self, size: usize) -> Self {
        self.tab_size = size.max(1);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_auto_save(mut self, enabled: bool) -> Self {
        self.set_auto_save(enabled);
        self
    }

    /// Enabling power-saver mode also switches auto-save off. Disabling it
    /// leaves auto-save as it is.
    pub fn set_power_saver(&mut self, enabled: bool) {
        self.power_saver = enabled;
        if enabled {
            self.auto_save = false;
        }
    }

    /// Auto-save cannot be turned on while power-saver mode is active.
    pub fn set_auto_save(&mut self, enabled: bool) {
        self.auto_save = enabled && !self.power_saver;
    }

    /// Re-applies the rules the setters enforce to values that bypassed
    /// them, such as a stored record: the tab width is at least one and
    /// power-saver mode keeps auto-save off.
    pub fn normalized(mut self) -> Self {
        self.tab_size = self.tab_size.max(1);
        self.set_power_saver(self.power_saver);
        self
    }

    /// The spaces inserted by one indentation step.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.tab_size.max(1))
    }
}
