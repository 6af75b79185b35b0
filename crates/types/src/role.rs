//! The three logical source roles and their static mapping table.
//!
//! Behaviour that depends on a buffer's kind (file name, comment syntax,
//! language label) is looked up in [`ROLE_TABLE`] rather than derived from a
//! file name suffix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three buffers that make up a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentRole {
    Markup,
    Style,
    Script,
}

/// Static facts about a [`DocumentRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleInfo {
    pub role: DocumentRole,
    /// File name used for persistence and export.
    pub file_name: &'static str,
    pub extension: &'static str,
    /// Human-readable language label.
    pub language: &'static str,
    /// Prefix used by the line-comment toggle.
    pub line_comment: &'static str,
}

/// The explicit role mapping table, in display order.
pub const ROLE_TABLE: [RoleInfo; 3] = [
    RoleInfo {
        role: DocumentRole::Markup,
        file_name: "index.html",
        extension: "html",
        language: "HTML",
        line_comment: "//",
    },
    RoleInfo {
        role: DocumentRole::Style,
        file_name: "style.css",
        extension: "css",
        language: "CSS",
        line_comment: "//",
    },
    RoleInfo {
        role: DocumentRole::Script,
        file_name: "script.js",
        extension: "js",
        language: "JavaScript",
        line_comment: "//",
    },
];

impl DocumentRole {
    pub const ALL: [DocumentRole; 3] = [
        DocumentRole::Markup,
        DocumentRole::Style,
        DocumentRole::Script,
    ];

    pub fn info(self) -> &'static RoleInfo {
        match self {
            DocumentRole::Markup => &ROLE_TABLE[0],
            DocumentRole::Style => &ROLE_TABLE[1],
            DocumentRole::Script => &ROLE_TABLE[2],
        }
    }

    pub fn file_name(self) -> &'static str {
        self.info().file_name
    }

    /// Resolves a role from its exact file name in the mapping table.
    pub fn from_file_name(name: &str) -> Option<Self> {
        ROLE_TABLE
            .iter()
            .find(|info| info.file_name == name)
            .map(|info| info.role)
    }
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_role() {
        for role in DocumentRole::ALL {
            assert_eq!(role.info().role, role);
        }
    }

    #[test]
    fn test_from_file_name_exact_match() {
        assert_eq!(
            DocumentRole::from_file_name("style.css"),
            Some(DocumentRole::Style)
        );
        assert_eq!(
            DocumentRole::from_file_name("script.js"),
            Some(DocumentRole::Script)
        );
    }

    #[test]
    fn test_from_file_name_ignores_suffix_lookalikes() {
        assert_eq!(DocumentRole::from_file_name("other.js"), None);
        assert_eq!(DocumentRole::from_file_name("INDEX.HTML"), None);
        assert_eq!(DocumentRole::from_file_name(""), None);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&DocumentRole::Markup).unwrap();
        assert_eq!(json, "\"markup\"");
    }
}
