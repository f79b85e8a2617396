//! Loads the extension registry document.
//!
//! The registry is a JSON array:
//!
//! ```json
//! [
//!   {
//!     "extensionFlagValue": "foo-ext",
//!     "description": "Adds the foo dashboard",
//!     "repository": "https://github.com/org/foo-ext",
//!     "branch": "main"
//!   }
//! ]
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use strata_core::domain::{DomainError, DomainValidator, Extension, ExtensionRegistry};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Registry {path} is not a valid extension list: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Registry {path} has an invalid entry: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

/// Parse a registry document.
pub fn parse_registry(content: &str) -> Result<ExtensionRegistry, serde_json::Error> {
    let extensions: Vec<Extension> = serde_json::from_str(content)?;
    Ok(ExtensionRegistry::new(extensions))
}

/// Read and validate the registry at `path`.
pub fn try_load_registry(path: &Path) -> Result<ExtensionRegistry, RegistryError> {
    let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = parse_registry(&content).map_err(|source| RegistryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    DomainValidator::validate_registry(&registry).map_err(|source| RegistryError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(registry)
}

/// Load the registry once at startup.
///
/// A missing or malformed registry is logged and yields an empty registry,
/// so every extension request resolves to a skip.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_registry(path: &Path) -> ExtensionRegistry {
    match try_load_registry(path) {
        Ok(registry) => {
            debug!(extensions = registry.len(), "Registry loaded");
            registry
        }
        Err(e) => {
            warn!(error = %e, "Extension registry unavailable; extensions disabled");
            ExtensionRegistry::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[
        {"extensionFlagValue": "foo-ext", "description": "Foo",
         "repository": "https://example.invalid/foo-ext", "branch": "main"},
        {"extensionFlagValue": "bar", "repository": "https://example.invalid/bar", "branch": "dev"}
    ]"#;

    #[test]
    fn parses_entries_in_order() {
        let registry = parse_registry(SAMPLE).unwrap();
        assert_eq!(registry.flags(), vec!["foo-ext", "bar"]);
        assert_eq!(registry.find_by_flag("bar").unwrap().branch, "dev");
    }

    #[test]
    fn missing_file_yields_empty_registry() {
        let tmp = TempDir::new().unwrap();
        let registry = load_registry(&tmp.path().join("extensions.json"));
        assert!(registry.is_empty());
    }

    #[test]
    fn malformed_file_yields_empty_registry() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("extensions.json");
        std::fs::write(&path, "{ not a list").unwrap();

        assert!(matches!(try_load_registry(&path), Err(RegistryError::Parse { .. })));
        assert!(load_registry(&path).is_empty());
    }

    #[test]
    fn incomplete_entry_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("extensions.json");
        std::fs::write(
            &path,
            r#"[{"extensionFlagValue": "x", "repository": "", "branch": "main"}]"#,
        )
        .unwrap();

        assert!(matches!(try_load_registry(&path), Err(RegistryError::Invalid { .. })));
    }
}
