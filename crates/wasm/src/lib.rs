//! WebAssembly bindings for the livepen editor.
//!
//! This crate connects the platform-agnostic editor session to the browser:
//! the preview `<iframe>`, the window `message` channel, `localStorage`, the
//! JSZip library and file downloads.
//!
//! # Architecture
//!
//! Everything runs on the page's single thread. JavaScript calls into
//! [`LivePen`]; the preview frame talks back only through `postMessage`,
//! which [`MessageBridge`] forwards into the session's relay channel. Console
//! output reaches the log when the page calls `pump()`.
//!
//! ## Module Structure
//!
//! - [`editor`] - the exported `LivePen` object
//! - [`context`] - `<iframe>` implementation of the isolated context
//! - [`listener`] - the window `message` listener
//! - [`storage`] - `localStorage` persistence
//! - [`zip`] - JSZip loader and archiver
//! - [`download`] - Blob/object URL downloads
//! - [`input`] - `<textarea>` text input with UTF-16 offset conversion
//! - [`error`] - Error types with JavaScript interop
//!
//! # Example
//!
//! ```javascript
//! import init, { LivePen } from '@livepen/wasm';
//!
//! await init();
//!
//! const pen = new LivePen('preview');
//! editor.addEventListener('keydown', (e) => pen.handleKey(e, editor));
//! editor.addEventListener('input', () => pen.input(editor.value));
//! setInterval(() => { pen.autosaveTick(); pen.pump(); render(pen.diagnostics()); }, 250);
//! ```

pub mod context;
pub mod download;
pub mod editor;
pub mod error;
pub mod input;
pub mod listener;
pub mod storage;
pub mod zip;

pub use context::IframeContext;
pub use download::download;
pub use editor::LivePen;
pub use error::{ErrorCode, LivePenError};
pub use input::TextAreaInput;
pub use listener::MessageBridge;
pub use storage::LocalStorage;
pub use zip::{JSZIP_URL, JsZipArchiver, JsZipLoader};

use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// Installs the panic hook so panics show up in the browser console. Called
/// automatically by wasm-pack's generated JavaScript.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }
}

/// Get the version of the livepen-wasm library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
