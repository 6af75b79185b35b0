//! # livepen-core
//!
//! The editor session layer of livepen.
//!
//! - **session**: [`EditorSession`], the one owned object holding buffers,
//!   settings and the preview renderer
//! - **builder**: [`SessionBuilder`] for configuring a session
//! - **editing**: line commands (comment toggle, indent, outdent, tab)
//! - **persistence**: the [`ProjectSnapshot`] record kept in storage
//! - **export**: [`LazyArchiver`] and project export
//! - **shortcuts**: keyboard bindings
//! - **settings**: [`EditorSettings`]
//! - **error**: [`SessionError`]
//!
//! Platform access (storage, archiving, the isolated context, the text
//! widget) goes through the traits in `livepen-traits`; this crate has no
//! browser dependencies.

pub use livepen_preview as preview;
pub use livepen_traits as traits;
pub use livepen_types as types;

pub mod builder;
pub mod defaults;
pub mod editing;
pub mod error;
pub mod export;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod shortcuts;

pub use builder::SessionBuilder;
pub use defaults::starter_bundle;
pub use error::SessionError;
pub use export::{Archived, ExportArtifact, LazyArchiver, export_project, project_entries};
pub use persistence::{ProjectSnapshot, STORAGE_KEY};
pub use session::{
    AUTOSAVE_DEBOUNCE_MS, BufferStats, EditorSession, MAX_FILE_SIZE, ShortcutEffect,
};
pub use settings::{EditorSettings, Theme};
pub use shortcuts::Shortcut;
