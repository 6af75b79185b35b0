//! The `LivePen` object exported to JavaScript.

use crate::context::IframeContext;
use crate::download::download;
use crate::error::LivePenError;
use crate::input::TextAreaInput;
use crate::listener::MessageBridge;
use crate::storage::LocalStorage;
use crate::zip::JsZipLoader;
use chrono::Utc;
use livepen_core::{
    BufferStats, EditorSession, LazyArchiver, SessionBuilder, SessionError, Shortcut,
    ShortcutEffect, export_project,
};
use livepen_preview::LoadPath;
use livepen_traits::{InMemoryStorage, IsolatedContext, Storage};
use livepen_types::{DiagnosticKind, DocumentRole};
use log::{info, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{HtmlTextAreaElement, KeyboardEvent};

/// One console line as handed to JavaScript.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticView {
    kind: DiagnosticKind,
    label: &'static str,
    timestamp: String,
    text: String,
    line: String,
}

#[derive(Serialize)]
struct StatsView {
    lines: usize,
    chars: usize,
}

impl From<BufferStats> for StatsView {
    fn from(stats: BufferStats) -> Self {
        Self {
            lines: stats.lines,
            chars: stats.chars,
        }
    }
}

/// The editor, wired to a preview `<iframe>` and `localStorage`.
///
/// # Example
///
/// ```javascript
/// const pen = new LivePen('preview-frame');
/// pen.setBuffer('script.js', "console.log('hi')");
/// pen.run();
/// setTimeout(() => { pen.pump(); console.table(pen.diagnostics()); }, 50);
/// ```
#[wasm_bindgen]
pub struct LivePen {
    session: Rc<RefCell<EditorSession>>,
    storage: Box<dyn Storage>,
    archiver: Rc<LazyArchiver>,
    _bridge: Option<MessageBridge>,
}

#[wasm_bindgen]
impl LivePen {
    /// Creates an editor previewing into the `<iframe>` with id `frame_id`
    /// and restores any saved project.
    ///
    /// A missing frame does not fail construction; runs then report the
    /// preview as unavailable.
    #[wasm_bindgen(constructor)]
    pub fn new(frame_id: &str) -> Result<LivePen, JsValue> {
        let context = IframeContext::from_element_id(frame_id)
            .map(|frame| Box::new(frame) as Box<dyn IsolatedContext>);
        let mut session = SessionBuilder::new().with_context_result(context).build();

        let bridge = match MessageBridge::attach(session.renderer().port()) {
            Ok(bridge) => Some(bridge),
            Err(err) => {
                warn!("Console relay disabled: {}", err);
                None
            }
        };

        let storage: Box<dyn Storage> = match LocalStorage::new() {
            Ok(storage) => Box::new(storage),
            Err(err) => {
                warn!("{}; keeping the project in memory only", err);
                Box::new(InMemoryStorage::new())
            }
        };
        if session.restore(storage.as_ref()).map_err(LivePenError::from)? {
            info!("Restored saved project");
        }

        Ok(Self {
            session: Rc::new(RefCell::new(session)),
            storage,
            archiver: Rc::new(LazyArchiver::new(JsZipLoader::default())),
            _bridge: bridge,
        })
    }

    /// Replaces the text of one file.
    #[wasm_bindgen(js_name = setBuffer)]
    pub fn set_buffer(&self, file: &str, text: String) -> Result<(), JsValue> {
        let role = DocumentRole::from_file_name(file)
            .ok_or_else(|| LivePenError::from(SessionError::UnknownFile(file.to_string())))?;
        self.session
            .borrow_mut()
            .set_buffer(role, text)
            .map_err(LivePenError::from)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = getBuffer)]
    pub fn get_buffer(&self, file: &str) -> Option<String> {
        let role = DocumentRole::from_file_name(file)?;
        Some(self.session.borrow().bundle().get(role).to_string())
    }

    #[wasm_bindgen(js_name = switchFile)]
    pub fn switch_file(&self, file: &str) -> Result<String, JsValue> {
        let mut session = self.session.borrow_mut();
        session.switch_to_file(file).map_err(LivePenError::from)?;
        Ok(session.active_text().to_string())
    }

    #[wasm_bindgen(js_name = activeFile)]
    pub fn active_file(&self) -> String {
        self.session.borrow().active_role().file_name().to_string()
    }

    /// Stores the active buffer after user input and restarts the auto-save
    /// debounce.
    pub fn input(&self, text: String) -> Result<(), JsValue> {
        let mut session = self.session.borrow_mut();
        session.update_active(text).map_err(LivePenError::from)?;
        session.note_edit(Utc::now());
        Ok(())
    }

    /// Saves if the auto-save debounce has elapsed. Call periodically.
    #[wasm_bindgen(js_name = autosaveTick)]
    pub fn autosave_tick(&self) -> Result<bool, JsValue> {
        Ok(self
            .session
            .borrow_mut()
            .autosave(self.storage.as_ref(), Utc::now())
            .map_err(LivePenError::from)?)
    }

    /// Renders the buffers into the preview. Returns how the document was
    /// loaded: `"direct"`, `"fallback"` or `"unavailable"`.
    pub fn run(&self) -> String {
        let outcome = self.session.borrow_mut().run();
        match outcome.path {
            LoadPath::Direct => "direct",
            LoadPath::Fallback => "fallback",
            LoadPath::Unavailable => "unavailable",
        }
        .to_string()
    }

    /// Moves relayed console output into the log. Returns the number of new
    /// entries.
    pub fn pump(&self) -> usize {
        self.session.borrow_mut().pump_diagnostics()
    }

    pub fn diagnostics(&self) -> Result<JsValue, JsValue> {
        let session = self.session.borrow();
        let views: Vec<DiagnosticView> = session
            .diagnostics()
            .map(|entry| DiagnosticView {
                kind: entry.kind(),
                label: entry.kind().label(),
                timestamp: entry.timestamp().to_rfc3339(),
                text: entry.text(),
                line: entry.render_line(),
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&views).map_err(LivePenError::from)?)
    }

    #[wasm_bindgen(js_name = clearConsole)]
    pub fn clear_console(&self) {
        self.session.borrow_mut().clear_diagnostics();
    }

    /// Appends a host-side entry. `kind` is one of `log`, `info`, `warn`,
    /// `error`; `args` is an array of arbitrary values.
    pub fn log(&self, kind: &str, args: JsValue) -> Result<(), JsValue> {
        let kind = match kind {
            "info" => DiagnosticKind::Info,
            "warn" => DiagnosticKind::Warning,
            "error" => DiagnosticKind::Error,
            _ => DiagnosticKind::Trace,
        };
        let values: Vec<serde_json::Value> =
            serde_wasm_bindgen::from_value(args).map_err(LivePenError::from)?;
        self.session
            .borrow_mut()
            .renderer_mut()
            .append_values(kind, &values);
        Ok(())
    }

    pub fn save(&self) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .save(self.storage.as_ref())
            .map_err(LivePenError::from)?;
        Ok(())
    }

    pub fn restore(&self) -> Result<bool, JsValue> {
        Ok(self
            .session
            .borrow_mut()
            .restore(self.storage.as_ref())
            .map_err(LivePenError::from)?)
    }

    #[wasm_bindgen(js_name = resetToDefault)]
    pub fn reset_to_default(&self) {
        self.session.borrow_mut().reset_to_default();
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        let stats = StatsView::from(self.session.borrow().stats());
        Ok(serde_wasm_bindgen::to_value(&stats).map_err(LivePenError::from)?)
    }

    pub fn settings(&self) -> Result<JsValue, JsValue> {
        let session = self.session.borrow();
        Ok(serde_wasm_bindgen::to_value(session.settings()).map_err(LivePenError::from)?)
    }

    #[wasm_bindgen(js_name = setPowerSaver)]
    pub fn set_power_saver(&self, enabled: bool) {
        self.session.borrow_mut().set_power_saver(enabled);
    }

    #[wasm_bindgen(js_name = setAutoSave)]
    pub fn set_auto_save(&self, enabled: bool) {
        self.session.borrow_mut().set_auto_save(enabled);
    }

    #[wasm_bindgen(js_name = setTabSize)]
    pub fn set_tab_size(&self, size: usize) {
        self.session.borrow_mut().set_tab_size(size);
    }

    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&self, size: u32) {
        self.session.borrow_mut().set_font_size(size);
    }

    #[wasm_bindgen(js_name = setLineNumbers)]
    pub fn set_line_numbers(&self, enabled: bool) {
        self.session.borrow_mut().set_line_numbers(enabled);
    }

    /// Returns the new theme, `"light"` or `"dark"`.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> Result<JsValue, JsValue> {
        let theme = self.session.borrow_mut().toggle_theme();
        Ok(serde_wasm_bindgen::to_value(&theme).map_err(LivePenError::from)?)
    }

    /// Handles a `keydown` on the editor textarea. Returns whether the key
    /// was a shortcut; its default action is then prevented.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(
        &self,
        event: &KeyboardEvent,
        editor: HtmlTextAreaElement,
    ) -> Result<bool, JsValue> {
        let ctrl = event.ctrl_key();
        let Some(shortcut) =
            Shortcut::from_key(&event.key(), ctrl || event.meta_key(), ctrl, event.shift_key())
        else {
            return Ok(false);
        };
        event.prevent_default();

        let mut input = TextAreaInput::new(editor);
        let effect = self
            .session
            .borrow_mut()
            .handle_shortcut(shortcut, &mut input, self.storage.as_ref())
            .map_err(LivePenError::from)?;

        if let ShortcutEffect::Help(text) = effect {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&text);
            }
        }
        Ok(true)
    }

    /// Exports the project as a zip (or a JSON project file when JSZip is
    /// unavailable) and starts the download. Resolves to the file name.
    #[wasm_bindgen(js_name = exportArchive)]
    pub fn export_archive(&self) -> js_sys::Promise {
        let session = self.session.clone();
        let archiver = self.archiver.clone();

        future_to_promise(async move {
            let bundle = session.borrow().bundle().clone();
            let artifact = export_project(&bundle, &archiver, Utc::now())
                .await
                .map_err(LivePenError::from)?;

            for note in archiver.take_notifications() {
                session.borrow_mut().renderer_mut().log_host_error(note);
            }

            download(&artifact)?;
            Ok(JsValue::from_str(&artifact.file_name))
        })
    }
}
