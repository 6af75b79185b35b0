//! The persisted project record.

use crate::settings::EditorSettings;
use chrono::{DateTime, Utc};
use livepen_types::{DocumentRole, SourceBundle};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage key of the project record.
pub const STORAGE_KEY: &str = "livepen_editor";

/// The three files by file name, the settings, and when they were saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: EditorSettings,
    pub saved_at: Option<DateTime<Utc>>,
}

impl ProjectSnapshot {
    pub fn capture(
        bundle: &SourceBundle,
        settings: &EditorSettings,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            files: bundle
                .iter()
                .map(|(role, text)| (role.file_name().to_string(), text.to_string()))
                .collect(),
            settings: settings.clone(),
            saved_at: Some(saved_at),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Writes the stored files over `bundle`.
    ///
    /// Roles absent from the record keep their current text; file names
    /// outside the role table are skipped. Returns the roles written.
    pub fn merge_into(&self, bundle: &mut SourceBundle) -> Vec<DocumentRole> {
        let mut written = Vec::new();
        for (name, text) in &self.files {
            match DocumentRole::from_file_name(name) {
                Some(role) => {
                    bundle.set(role, text.as_str());
                    written.push(role);
                }
                None => debug!("Ignoring stored file with unknown name '{}'", name),
            }
        }
        written
    }
}
