//! The editor session: one explicitly owned object holding everything the
//! editor needs between events.

use crate::defaults::starter_bundle;
use crate::editing;
use crate::error::SessionError;
use crate::export::{ExportArtifact, LazyArchiver, export_project};
use crate::persistence::{ProjectSnapshot, STORAGE_KEY};
use crate::settings::{EditorSettings, Theme};
use crate::shortcuts::Shortcut;
use chrono::{DateTime, TimeDelta, Utc};
use livepen_preview::{PreviewRenderer, RenderOutcome};
use livepen_traits::{IsolatedContext, Storage, TextInput};
use livepen_types::{DiagnosticEntry, DocumentRole, SourceBundle};
use log::{debug, info, warn};

/// Largest accepted buffer, in bytes.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Quiet period after the last edit before an auto-save is due.
pub const AUTOSAVE_DEBOUNCE_MS: i64 = 500;

/// Size of the active buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferStats {
    pub lines: usize,
    pub chars: usize,
}

impl BufferStats {
    pub fn of(text: &str) -> Self {
        Self {
            lines: text.split('\n').count(),
            chars: text.chars().count(),
        }
    }
}

/// What a handled shortcut did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutEffect {
    Saved,
    Ran(RenderOutcome),
    /// The active buffer was rewritten from the text input.
    Edited { changed: bool },
    Help(String),
}

/// Buffers, settings and the preview renderer of one editor.
#[derive(Debug)]
pub struct EditorSession<C: IsolatedContext = Box<dyn IsolatedContext>> {
    bundle: SourceBundle,
    active: DocumentRole,
    settings: EditorSettings,
    renderer: PreviewRenderer<C>,
    last_edit: Option<DateTime<Utc>>,
    last_saved: Option<DateTime<Utc>>,
}

impl<C: IsolatedContext> EditorSession<C> {
    /// A session over `context` with the starter project and default
    /// settings.
    pub fn new(context: C) -> Self {
        Self::from_parts(
            starter_bundle(),
            EditorSettings::default(),
            PreviewRenderer::new(context),
        )
    }

    pub(crate) fn from_parts(
        bundle: SourceBundle,
        settings: EditorSettings,
        renderer: PreviewRenderer<C>,
    ) -> Self {
        Self {
            bundle,
            active: DocumentRole::Markup,
            settings,
            renderer,
            last_edit: None,
            last_saved: None,
        }
    }

    // --- buffers ---

    pub fn bundle(&self) -> &SourceBundle {
        &self.bundle
    }

    pub fn active_role(&self) -> DocumentRole {
        self.active
    }

    pub fn active_text(&self) -> &str {
        self.bundle.get(self.active)
    }

    pub fn switch_to(&mut self, role: DocumentRole) {
        debug!("Switching to {}", role);
        self.active = role;
    }

    /// Switches by exact file name; names outside the role table are
    /// rejected.
    pub fn switch_to_file(&mut self, name: &str) -> Result<DocumentRole, SessionError> {
        let role = DocumentRole::from_file_name(name)
            .ok_or_else(|| SessionError::UnknownFile(name.to_string()))?;
        self.switch_to(role);
        Ok(role)
    }

    pub fn update_active(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.set_buffer(self.active, text)
    }

    pub fn set_buffer(
        &mut self,
        role: DocumentRole,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        let text = text.into();
        if text.len() > MAX_FILE_SIZE {
            return Err(SessionError::FileTooLarge {
                role,
                size: text.len(),
                limit: MAX_FILE_SIZE,
            });
        }
        self.bundle.set(role, text);
        Ok(())
    }

    pub fn stats(&self) -> BufferStats {
        BufferStats::of(self.active_text())
    }

    // --- preview ---

    /// Renders the current buffers.
    pub fn run(&mut self) -> RenderOutcome {
        self.renderer.render(&self.bundle)
    }

    pub fn pump_diagnostics(&mut self) -> usize {
        self.renderer.pump()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.renderer.entries()
    }

    pub fn clear_diagnostics(&mut self) {
        self.renderer.clear();
    }

    pub fn renderer(&self) -> &PreviewRenderer<C> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut PreviewRenderer<C> {
        &mut self.renderer
    }

    // --- editing ---

    fn sync_from_input(&mut self, input: &dyn TextInput) -> Result<(), SessionError> {
        self.update_active(input.text())
    }

    pub fn toggle_comment(&mut self, input: &mut dyn TextInput) -> Result<bool, SessionError> {
        let changed = editing::toggle_comment(input, self.active.info().line_comment);
        self.sync_from_input(input)?;
        Ok(changed)
    }

    pub fn indent(&mut self, input: &mut dyn TextInput) -> Result<bool, SessionError> {
        let changed = editing::indent(input, &self.settings.indent_unit());
        self.sync_from_input(input)?;
        Ok(changed)
    }

    pub fn outdent(&mut self, input: &mut dyn TextInput) -> Result<bool, SessionError> {
        let changed = editing::outdent(input, self.settings.tab_size);
        self.sync_from_input(input)?;
        Ok(changed)
    }

    pub fn insert_tab(&mut self, input: &mut dyn TextInput) -> Result<bool, SessionError> {
        let changed = editing::insert_tab(input, &self.settings.indent_unit());
        self.sync_from_input(input)?;
        Ok(changed)
    }

    /// Carries out `shortcut` against the active buffer.
    pub fn handle_shortcut(
        &mut self,
        shortcut: Shortcut,
        input: &mut dyn TextInput,
        storage: &dyn Storage,
    ) -> Result<ShortcutEffect, SessionError> {
        debug!("Shortcut {:?}", shortcut);
        match shortcut {
            Shortcut::Save => {
                self.save(storage)?;
                Ok(ShortcutEffect::Saved)
            }
            Shortcut::Run => Ok(ShortcutEffect::Ran(self.run())),
            Shortcut::Help => Ok(ShortcutEffect::Help(Shortcut::help_text())),
            Shortcut::ToggleComment => {
                let changed = self.toggle_comment(input)?;
                Ok(ShortcutEffect::Edited { changed })
            }
            Shortcut::Indent => {
                let changed = self.indent(input)?;
                Ok(ShortcutEffect::Edited { changed })
            }
            Shortcut::Outdent => {
                let changed = self.outdent(input)?;
                Ok(ShortcutEffect::Edited { changed })
            }
        }
    }

    // --- settings ---

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.settings = settings.normalized();
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.settings.font_size = size;
    }

    pub fn set_tab_size(&mut self, size: usize) {
        self.settings.tab_size = size.max(1);
    }

    pub fn set_line_numbers(&mut self, enabled: bool) {
        self.settings.line_numbers = enabled;
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.settings.set_auto_save(enabled);
        if !self.settings.auto_save {
            self.last_edit = None;
        }
    }

    pub fn set_power_saver(&mut self, enabled: bool) {
        info!("Power-saver mode {}", if enabled { "on" } else { "off" });
        self.settings.set_power_saver(enabled);
        if enabled {
            self.last_edit = None;
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.settings.theme = self.settings.theme.toggled();
        self.settings.theme
    }

    // --- persistence ---

    /// Writes the project record to `storage`.
    pub fn save(&mut self, storage: &dyn Storage) -> Result<(), SessionError> {
        self.save_at(storage, Utc::now())
    }

    pub fn save_at(
        &mut self,
        storage: &dyn Storage,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let json = ProjectSnapshot::capture(&self.bundle, &self.settings, now).to_json()?;
        storage.save(STORAGE_KEY, &json)?;
        debug!("Saved project to {} ({} bytes)", storage.name(), json.len());
        self.last_saved = Some(now);
        self.last_edit = None;
        Ok(())
    }

    /// Merges the stored project over the current buffers and adopts the
    /// stored settings.
    ///
    /// Returns `Ok(false)` when there is no record, or when the record is
    /// corrupt; a corrupt record is logged and leaves the session untouched.
    pub fn restore(&mut self, storage: &dyn Storage) -> Result<bool, SessionError> {
        let Some(json) = storage.load(STORAGE_KEY)? else {
            return Ok(false);
        };
        let snapshot = match ProjectSnapshot::from_json(&json) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("Ignoring corrupt project record: {}", err);
                return Ok(false);
            }
        };

        let mut bundle = self.bundle.clone();
        snapshot.merge_into(&mut bundle);
        let oversized: Vec<DocumentRole> = bundle
            .iter()
            .filter(|(_, text)| text.len() > MAX_FILE_SIZE)
            .map(|(role, _)| role)
            .collect();
        for role in oversized {
            warn!("Ignoring oversized stored {}", role);
            bundle.set(role, self.bundle.get(role));
        }

        self.bundle = bundle;
        self.settings = snapshot.settings.normalized();
        self.last_saved = snapshot.saved_at;
        info!("Restored project from {}", storage.name());
        Ok(true)
    }

    /// Replaces every buffer with the starter project.
    pub fn reset_to_default(&mut self) {
        self.bundle = starter_bundle();
        self.active = DocumentRole::Markup;
        self.last_edit = None;
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    // --- auto-save ---

    /// Records an edit at `now`, restarting the debounce window.
    pub fn note_edit(&mut self, now: DateTime<Utc>) {
        if self.settings.auto_save {
            self.last_edit = Some(now);
        }
    }

    /// Whether the quiet period since the last edit has elapsed with
    /// auto-save enabled.
    pub fn autosave_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_edit {
            Some(edited) if self.settings.auto_save => {
                now - edited >= TimeDelta::milliseconds(AUTOSAVE_DEBOUNCE_MS)
            }
            _ => false,
        }
    }

    /// Saves when an auto-save is due. Returns whether it saved.
    pub fn autosave(
        &mut self,
        storage: &dyn Storage,
        now: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        if !self.autosave_due(now) {
            return Ok(false);
        }
        self.save_at(storage, now)?;
        Ok(true)
    }

    // --- export ---

    pub async fn export_archive(
        &self,
        archiver: &LazyArchiver,
    ) -> Result<ExportArtifact, SessionError> {
        Ok(export_project(&self.bundle, archiver, Utc::now()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepen_preview::LoadPath;
    use livepen_traits::{InMemoryContext, InMemoryStorage, InMemoryTextInput, Selection};
    use livepen_types::DiagnosticKind;
    use serde_json::json;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn session() -> EditorSession<InMemoryContext> {
        init_logger();
        EditorSession::new(InMemoryContext::new())
    }

    #[test]
    fn test_starts_on_markup_with_starter_project() {
        let session = session();
        assert_eq!(session.active_role(), DocumentRole::Markup);
        assert_eq!(session.bundle(), &starter_bundle());
    }

    #[test]
    fn test_switch_to_file() {
        let mut session = session();
        assert_eq!(session.switch_to_file("style.css").unwrap(), DocumentRole::Style);
        assert_eq!(session.active_role(), DocumentRole::Style);

        let err = session.switch_to_file("STYLE.CSS").unwrap_err();
        assert!(matches!(err, SessionError::UnknownFile(name) if name == "STYLE.CSS"));
        assert_eq!(session.active_role(), DocumentRole::Style);
    }

    #[test]
    fn test_oversized_buffer_rejected() {
        let mut session = session();
        let huge = "x".repeat(MAX_FILE_SIZE + 1);
        assert!(matches!(
            session.update_active(huge),
            Err(SessionError::FileTooLarge { .. })
        ));
        assert_eq!(session.bundle().markup, starter_bundle().markup);

        session.update_active("x".repeat(MAX_FILE_SIZE)).unwrap();
        assert_eq!(session.active_text().len(), MAX_FILE_SIZE);
    }

    #[test]
    fn test_stats() {
        let mut session = session();
        session.switch_to(DocumentRole::Script);
        session.update_active("a\nbé\n").unwrap();
        assert_eq!(session.stats(), BufferStats { lines: 3, chars: 5 });
    }

    #[test]
    fn test_run_and_pump() {
        let mut session = session();
        session.set_buffer(DocumentRole::Markup, "<p>hi</p>").unwrap();
        session.set_buffer(DocumentRole::Style, "").unwrap();
        session.set_buffer(DocumentRole::Script, "").unwrap();

        let outcome = session.run();
        assert_eq!(outcome.path, LoadPath::Direct);
        assert_eq!(
            session.renderer().context().unwrap().current_document(),
            Some("<style></style>\n<p>hi</p>\n<script></script>")
        );

        let port = session.renderer().port();
        port.post(json!({"type": "console", "method": "warn", "args": ["careful"]}));
        assert_eq!(session.pump_diagnostics(), 1);

        let entries: Vec<_> = session.diagnostics().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind(), DiagnosticKind::Warning);

        session.clear_diagnostics();
        assert_eq!(session.diagnostics().count(), 0);
    }

    #[test]
    fn test_toggle_comment_updates_active_buffer() {
        let mut session = session();
        session.switch_to(DocumentRole::Script);
        session.update_active("a();\nb();").unwrap();

        let mut input = InMemoryTextInput::new(session.active_text())
            .with_selection(Selection::new(0, 9));
        assert!(session.toggle_comment(&mut input).unwrap());
        assert_eq!(session.active_text(), "// a();\n// b();");

        assert!(session.toggle_comment(&mut input).unwrap());
        assert_eq!(session.active_text(), "a();\nb();");
    }

    #[test]
    fn test_indent_uses_tab_size() {
        let mut session = session();
        session.set_tab_size(2);
        session.update_active("x").unwrap();
        let mut input = InMemoryTextInput::new("x");

        session.insert_tab(&mut input).unwrap();
        assert_eq!(session.active_text(), "  x");

        session.outdent(&mut input).unwrap();
        assert_eq!(session.active_text(), "x");
    }

    #[test]
    fn test_handle_shortcuts() {
        let mut session = session();
        let storage = InMemoryStorage::new();
        let mut input = InMemoryTextInput::new(session.active_text());

        assert_eq!(
            session
                .handle_shortcut(Shortcut::Save, &mut input, &storage)
                .unwrap(),
            ShortcutEffect::Saved
        );
        assert!(storage.load(STORAGE_KEY).unwrap().is_some());

        let ran = session
            .handle_shortcut(Shortcut::Run, &mut input, &storage)
            .unwrap();
        assert!(matches!(ran, ShortcutEffect::Ran(outcome) if outcome.bridged));

        let help = session
            .handle_shortcut(Shortcut::Help, &mut input, &storage)
            .unwrap();
        assert!(matches!(help, ShortcutEffect::Help(text) if text.contains("F1")));
    }

    #[test]
    fn test_save_and_restore() {
        let storage = InMemoryStorage::new();
        let mut first = session();
        first.set_buffer(DocumentRole::Script, "saved()").unwrap();
        first.set_power_saver(true);
        first.save(&storage).unwrap();
        assert!(first.last_saved().is_some());

        let mut second = session();
        assert!(second.restore(&storage).unwrap());
        assert_eq!(second.bundle().script, "saved()");
        assert_eq!(second.bundle().markup, starter_bundle().markup);
        assert!(second.settings().power_saver);
        assert!(!second.settings().auto_save);
        assert_eq!(second.last_saved(), first.last_saved());
    }

    #[test]
    fn test_restore_without_record() {
        let mut session = session();
        assert!(!session.restore(&InMemoryStorage::new()).unwrap());
    }

    #[test]
    fn test_restore_corrupt_record_keeps_defaults() {
        let storage = InMemoryStorage::new();
        storage.save(STORAGE_KEY, "{\"files\": oops").unwrap();

        let mut session = session();
        session.set_tab_size(8);
        assert!(!session.restore(&storage).unwrap());
        assert_eq!(session.bundle(), &starter_bundle());
        assert_eq!(session.settings().tab_size, 8);
    }

    #[test]
    fn test_restore_enforces_settings_rules() {
        let storage = InMemoryStorage::new();
        storage
            .save(
                STORAGE_KEY,
                r#"{"files":{},"settings":{"powerSaver":true,"autoSave":true,"tabSize":0}}"#,
            )
            .unwrap();

        let mut session = session();
        assert!(session.restore(&storage).unwrap());
        assert!(session.settings().power_saver);
        assert!(!session.settings().auto_save);
        assert_eq!(session.settings().tab_size, 1);

        let now = Utc::now();
        session.note_edit(now);
        assert!(!session.autosave_due(now + TimeDelta::seconds(5)));
    }

    #[test]
    fn test_reset_to_default() {
        let mut session = session();
        session.switch_to(DocumentRole::Style);
        session.update_active("").unwrap();
        session.reset_to_default();
        assert_eq!(session.bundle(), &starter_bundle());
        assert_eq!(session.active_role(), DocumentRole::Markup);
    }

    #[test]
    fn test_autosave_debounce() {
        let storage = InMemoryStorage::new();
        let mut session = session();
        let t0 = Utc::now();

        assert!(!session.autosave_due(t0));
        session.note_edit(t0);
        assert!(!session.autosave_due(t0 + TimeDelta::milliseconds(499)));
        assert!(session.autosave_due(t0 + TimeDelta::milliseconds(500)));

        // a later edit restarts the window
        session.note_edit(t0 + TimeDelta::milliseconds(400));
        assert!(!session.autosave_due(t0 + TimeDelta::milliseconds(800)));

        assert!(session
            .autosave(&storage, t0 + TimeDelta::milliseconds(900))
            .unwrap());
        assert!(!session.autosave_due(t0 + TimeDelta::milliseconds(2000)));
    }

    #[test]
    fn test_power_saver_stops_autosave() {
        let mut session = session();
        let t0 = Utc::now();
        session.note_edit(t0);
        session.set_power_saver(true);
        assert!(!session.autosave_due(t0 + TimeDelta::seconds(5)));

        session.note_edit(t0);
        assert!(!session.autosave_due(t0 + TimeDelta::seconds(5)));
    }

    #[tokio::test]
    async fn test_export_archive_falls_back_to_json() {
        let session = session();
        let artifact = session
            .export_archive(&LazyArchiver::fallback_only())
            .await
            .unwrap();
        assert!(artifact.file_name.starts_with("livepen-project-"));
        assert!(artifact.file_name.ends_with(".json"));

        let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(value["files"]["script.js"], starter_bundle().script);
        assert!(value["files"]["README.md"].is_string());
    }
}
