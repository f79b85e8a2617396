//! Extension descriptors and the static registry they live in.
//!
//! An extension is an externally hosted package overlay, identified by a
//! short flag value (`--extension <flag>`) and fetched by repository URL and
//! branch. The registry is loaded once at startup and is read-only for the
//! rest of the process.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// A single registry entry.
///
/// Serialized with the registry document's field names:
///
/// ```json
/// { "extensionFlagValue": "foo-ext", "description": "...",
///   "repository": "https://github.com/org/foo-ext", "branch": "main" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    #[serde(rename = "extensionFlagValue")]
    pub flag_value: String,
    #[serde(default)]
    pub description: String,
    pub repository: String,
    pub branch: String,
}

impl Extension {
    pub fn new(
        flag_value: impl Into<String>,
        description: impl Into<String>,
        repository: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            flag_value: flag_value.into(),
            description: description.into(),
            repository: repository.into(),
            branch: branch.into(),
        }
    }

    /// Workspace member path this extension registers as: `packages/<flag>`.
    pub fn workspace_member(&self) -> String {
        workspace_member(&self.flag_value)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let blank = |s: &str| s.trim().is_empty();
        let reason = if blank(&self.flag_value) {
            Some("extensionFlagValue is empty")
        } else if blank(&self.repository) {
            Some("repository is empty")
        } else if blank(&self.branch) {
            Some("branch is empty")
        } else if self.flag_value.contains(['/', '\\']) {
            Some("extensionFlagValue must be a single path segment")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidExtension {
                flag: self.flag_value.clone(),
                reason: reason.into(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}@{})", self.flag_value, self.repository, self.branch)
    }
}

/// Workspace member path for a package name.
pub fn workspace_member(package_name: &str) -> String {
    format!("packages/{package_name}")
}

/// Ordered, read-only collection of extension descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionRegistry {
    extensions: Vec<Extension>,
}

impl ExtensionRegistry {
    pub fn new(extensions: Vec<Extension>) -> Self {
        Self { extensions }
    }

    /// Registry with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// First descriptor whose flag equals `flag`. Case-sensitive.
    pub fn find_by_flag(&self, flag: &str) -> Option<&Extension> {
        self.extensions.iter().find(|ext| ext.flag_value == flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter()
    }

    pub fn flags(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.flag_value.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl FromIterator<Extension> for ExtensionRegistry {
    fn from_iter<I: IntoIterator<Item = Extension>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
