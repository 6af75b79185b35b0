//! # livepen
//!
//! A client-side source editor with live preview. Three buffers (markup,
//! style, script) are composed into one document, rendered in an isolated
//! context, and the context's console output is relayed back to the host.
//!
//! This crate re-exports the workspace:
//!
//! - [`types`]: roles, bundles and diagnostics
//! - [`traits`]: capabilities (isolated context, storage, archiving, text input)
//! - [`composer`]: document composition
//! - [`preview`]: the preview renderer and console relay
//! - [`session`]: the editor session
//!
//! Browser bindings live in the separate `livepen-wasm` crate.
//!
//! ```ignore
//! use livepen::{EditorSession, InMemoryContext, InMemoryStorage};
//!
//! let mut session = EditorSession::new(InMemoryContext::new());
//! session.update_active("<h1>Hello</h1>")?;
//! session.run();
//! session.save(&InMemoryStorage::new())?;
//! ```

pub use livepen_composer as composer;
pub use livepen_core as session;
pub use livepen_preview as preview;
pub use livepen_traits as traits;
pub use livepen_types as types;

pub use livepen_composer::{
    Placement, ScriptPlacement, StylePlacement, compose, compose_with_placement,
};
pub use livepen_core::{
    EditorSession, EditorSettings, ExportArtifact, LazyArchiver, ProjectSnapshot, SessionBuilder,
    SessionError, Shortcut, ShortcutEffect, Theme,
};
pub use livepen_preview::{
    ConsoleMessage, ConsoleMethod, DiagnosticLog, LoadPath, PreviewConfig, PreviewRenderer,
    RelayPort, RenderOutcome, RenderPhase,
};
pub use livepen_traits::{
    ArchiveEntry, ArchiveError, Archiver, ArchiverLoader, ContextError, InMemoryContext,
    InMemoryStorage, InMemoryTextInput, IsolatedContext, JsonBundleArchiver, Selection, Storage,
    StorageError, TextInput,
};
pub use livepen_types::{
    ComposedDocument, DiagnosticEntry, DiagnosticKind, DocumentRole, SourceBundle,
};
