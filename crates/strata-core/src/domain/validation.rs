use crate::domain::{
    entities::{Extension, ExtensionRegistry, ScaffoldOptions},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_extension(extension: &Extension) -> Result<(), DomainError> {
        extension.validate()
    }

    /// Every entry must be complete. Duplicate flags are allowed; lookups
    /// return the first.
    pub fn validate_registry(registry: &ExtensionRegistry) -> Result<(), DomainError> {
        registry.iter().try_for_each(Extension::validate)
    }

    /// Only the directory is checked here. An extension name that matches no
    /// registry entry is resolved later as a skipped overlay.
    pub fn validate_options(options: &ScaffoldOptions) -> Result<(), DomainError> {
        if options.directory.as_os_str().is_empty() {
            return Err(DomainError::InvalidArgs("target directory is empty".into()));
        }
        Ok(())
    }
}
