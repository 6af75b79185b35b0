//! Project export through a lazily loaded archiver.
//!
//! The preferred archiver is resolved on first use and cached for the life of
//! the [`LazyArchiver`], whether loading succeeded or not. When it is
//! unavailable, or fails to produce an archive, export degrades to
//! [`JsonBundleArchiver`].

use chrono::{DateTime, Local, Utc};
use livepen_traits::{ArchiveEntry, ArchiveError, Archiver, ArchiverLoader, JsonBundleArchiver};
use livepen_types::SourceBundle;
use log::{info, warn};
use std::cell::RefCell;
use tokio::sync::OnceCell;

pub const README_NAME: &str = "README.md";
pub const EXPORT_PREFIX: &str = "livepen-project";

/// Bytes produced by an archiver, with the metadata needed to offer them as
/// a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archived {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
    pub mime_type: &'static str,
    /// Name of the archiver that produced the bytes.
    pub archiver: &'static str,
}

/// A finished export, ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct LazyArchiver {
    loader: Option<Box<dyn ArchiverLoader>>,
    preferred: OnceCell<Option<Box<dyn Archiver>>>,
    fallback: JsonBundleArchiver,
    notifications: RefCell<Vec<String>>,
}

impl LazyArchiver {
    pub fn new(loader: impl ArchiverLoader + 'static) -> Self {
        Self {
            loader: Some(Box::new(loader)),
            preferred: OnceCell::new(),
            fallback: JsonBundleArchiver,
            notifications: RefCell::new(Vec::new()),
        }
    }

    /// An archiver that always produces the JSON bundle.
    pub fn fallback_only() -> Self {
        Self {
            loader: None,
            preferred: OnceCell::new_with(Some(None)),
            fallback: JsonBundleArchiver,
            notifications: RefCell::new(Vec::new()),
        }
    }

    /// Whether the loader has run (or was never needed).
    pub fn is_resolved(&self) -> bool {
        self.preferred.initialized()
    }

    /// Whether exports currently go to the JSON bundle.
    pub fn uses_fallback(&self) -> bool {
        matches!(self.preferred.get(), Some(None))
    }

    /// Notifications raised for the user so far.
    pub fn notifications(&self) -> Vec<String> {
        self.notifications.borrow().clone()
    }

    /// Removes and returns pending notifications.
    pub fn take_notifications(&self) -> Vec<String> {
        std::mem::take(&mut *self.notifications.borrow_mut())
    }

    fn notify(&self, message: String) {
        self.notifications.borrow_mut().push(message);
    }

    async fn resolve(&self) -> Option<&dyn Archiver> {
        self.preferred
            .get_or_init(|| async {
                let loader = self.loader.as_ref()?;
                match loader.load().await {
                    Ok(archiver) => {
                        info!("Loaded archiver {}", archiver.name());
                        Some(archiver)
                    }
                    Err(err) => {
                        warn!("Archiver unavailable, falling back to JSON bundle: {}", err);
                        self.notify(format!(
                            "{err}. Exporting as a JSON project file instead."
                        ));
                        None
                    }
                }
            })
            .await
            .as_deref()
    }

    /// Packs `entries` with the preferred archiver, or the JSON bundle when
    /// the preferred one is unavailable or fails.
    pub async fn archive(&self, entries: &[ArchiveEntry]) -> Result<Archived, ArchiveError> {
        if let Some(preferred) = self.resolve().await {
            match preferred.archive(entries).await {
                Ok(bytes) => {
                    return Ok(Archived {
                        bytes,
                        extension: preferred.file_extension(),
                        mime_type: preferred.mime_type(),
                        archiver: preferred.name(),
                    });
                }
                Err(err) => {
                    warn!("{} failed, falling back to JSON bundle: {}", preferred.name(), err);
                    self.notify(format!("{err}. Exporting as a JSON project file instead."));
                }
            }
        }

        let bytes = self.fallback.archive(entries).await?;
        Ok(Archived {
            bytes,
            extension: self.fallback.file_extension(),
            mime_type: self.fallback.mime_type(),
            archiver: self.fallback.name(),
        })
    }
}

pub fn readme(generated_at: DateTime<Local>) -> String {
    format!(
        "# livepen project\n\nGenerated with livepen\nDate: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// The archive entries of a project: the three files, then a README.
pub fn project_entries(bundle: &SourceBundle, now: DateTime<Utc>) -> Vec<ArchiveEntry> {
    bundle
        .iter()
        .map(|(role, text)| ArchiveEntry::new(role.file_name(), text))
        .chain(std::iter::once(ArchiveEntry::new(
            README_NAME,
            readme(now.with_timezone(&Local)),
        )))
        .collect()
}

pub async fn export_project(
    bundle: &SourceBundle,
    archiver: &LazyArchiver,
    now: DateTime<Utc>,
) -> Result<ExportArtifact, ArchiveError> {
    let archived = archiver.archive(&project_entries(bundle, now)).await?;
    info!(
        "Exported project with {} ({} bytes)",
        archived.archiver,
        archived.bytes.len()
    );
    Ok(ExportArtifact {
        file_name: format!(
            "{}-{}.{}",
            EXPORT_PREFIX,
            now.timestamp_millis(),
            archived.extension
        ),
        mime_type: archived.mime_type.to_string(),
        bytes: archived.bytes,
    })
}
