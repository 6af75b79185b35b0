//! Live preview for the livepen editor.
//!
//! This crate renders composed documents into an isolated execution context
//! and relays the context's console output back to the host.
//!
//! ## Components
//!
//! - [`PreviewRenderer`]: owns the context, the log and the relay inbox
//! - [`DiagnosticLog`]: bounded, ordered console history
//! - [`relay_channel`]: bounded channel between the boundary listener and
//!   the renderer
//! - [`bridge_script`]: console interception injected into the context
//!
//! ## Usage
//!
//! ```ignore
//! use livepen_preview::PreviewRenderer;
//! use livepen_traits::InMemoryContext;
//! use livepen_types::SourceBundle;
//!
//! let mut renderer = PreviewRenderer::new(InMemoryContext::new());
//! renderer.render(&SourceBundle::new("<p>hi</p>", "", "console.log('hi')"));
//!
//! // Listener side: forward raw `message` payloads.
//! let port = renderer.port();
//! port.post(serde_json::json!({"type": "console", "method": "log", "args": ["hi"]}));
//!
//! renderer.pump();
//! for entry in renderer.entries() {
//!     println!("{}", entry.render_line());
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod history;
pub mod relay;
pub mod renderer;

pub use bridge::bridge_script;
pub use config::PreviewConfig;
pub use history::DiagnosticLog;
pub use relay::{
    ConsoleMessage, ConsoleMethod, RelayInbox, RelayPort, UNSERIALIZABLE_PLACEHOLDER,
    relay_channel, stringify_arg,
};
pub use renderer::{LoadPath, PreviewRenderer, RenderOutcome, RenderPhase};
