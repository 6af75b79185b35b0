//! Archiver trait for packaging a project into a single downloadable file.
//!
//! Implementations may depend on code loaded at runtime (a browser zip
//! library, for instance). [`JsonBundleArchiver`] has no such dependency and
//! is always available as a fallback.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use thiserror::Error;

/// Error type for archive creation and archiver loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Archiver could not be loaded: {0}")]
    LoadFailed(String),

    #[error("Failed to add '{name}' to archive: {message}")]
    Entry { name: String, message: String },

    #[error("Failed to generate archive: {0}")]
    Generate(String),
}

/// A single file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub contents: String,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Packs a list of entries into one binary artifact.
///
/// The trait is `?Send` because browser-backed implementations hold
/// JavaScript handles.
#[async_trait(?Send)]
pub trait Archiver: Debug {
    /// Pack `entries`, in order, into a single artifact.
    async fn archive(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError>;

    /// File extension for the produced artifact, without a dot.
    fn file_extension(&self) -> &'static str;

    /// MIME type of the produced artifact.
    fn mime_type(&self) -> &'static str;

    /// Returns a human-readable name for this archiver (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Produces a preferred [`Archiver`] whose code may have to be fetched first.
#[async_trait(?Send)]
pub trait ArchiverLoader: Debug {
    async fn load(&self) -> Result<Box<dyn Archiver>, ArchiveError>;
}

#[derive(Serialize)]
struct JsonBundle<'a> {
    files: BTreeMap<&'a str, &'a str>,
    version: &'static str,
}

/// Writes all entries into one pretty-printed JSON document.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBundleArchiver;

#[async_trait(?Send)]
impl Archiver for JsonBundleArchiver {
    async fn archive(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
        let bundle = JsonBundle {
            files: entries
                .iter()
                .map(|entry| (entry.name.as_str(), entry.contents.as_str()))
                .collect(),
            version: env!("CARGO_PKG_VERSION"),
        };
        serde_json::to_vec_pretty(&bundle).map_err(|e| ArchiveError::Generate(e.to_string()))
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn name(&self) -> &'static str {
        "JsonBundleArchiver"
    }
}
