//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running the scaffold pipeline.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The extension repository could not be cloned.
    #[error("Failed to fetch {repository} (branch '{branch}'): {reason}")]
    FetchFailed {
        repository: String,
        branch: String,
        reason: String,
    },

    /// Overlaying a fetched extension onto the workspace failed.
    #[error("Failed to install extension '{extension}': {reason}")]
    ExtensionInstall { extension: String, reason: String },

    /// No render function exists for a template file.
    #[error("Template '{template}' has no render function")]
    TemplateMissing { template: String },

    /// A template could not be compiled into a render function.
    #[error("Template '{template}' is invalid: {reason}")]
    TemplateInvalid { template: String, reason: String },

    /// A render function failed.
    #[error("Template rendering failed for '{template}': {reason}")]
    RenderingFailed { template: String, reason: String },

    /// An args file could not be read or parsed.
    #[error("Failed to load render arguments from {path}: {reason}")]
    ArgsLoadFailed { path: PathBuf, reason: String },

    /// A package manifest could not be read, parsed or written.
    #[error("Manifest merge failed for {path}: {reason}")]
    ManifestMerge { path: PathBuf, reason: String },

    /// An external command (git, yarn) exited unsuccessfully.
    #[error("Command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// Shared adapter state is unusable (lock poisoned, etc.).
    #[error("Adapter state lock poisoned")]
    LockPoisoned,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the template root exists (templates.root)".into(),
            ],
            Self::FetchFailed { repository, branch, .. } => vec![
                format!("Could not clone {} at branch '{}'", repository, branch),
                "Check your network connection and that git is installed".into(),
                "Verify the branch exists in the extension repository".into(),
            ],
            Self::ExtensionInstall { extension, .. } => vec![
                format!("Extension '{}' was fetched but could not be applied", extension),
                "The target directory may be partially populated; remove it before retrying"
                    .into(),
            ],
            Self::TemplateMissing { template } => vec![
                format!("No renderer is registered for {}", template),
                "Register a render function or check the template file name".into(),
            ],
            Self::TemplateInvalid { template, .. } | Self::RenderingFailed { template, .. } => {
                vec![
                    format!("Fix the template source: {}", template),
                    "Run with -vv to see the arguments passed to the template".into(),
                ]
            }
            Self::CommandFailed { command, .. } => vec![
                format!("`{}` did not succeed", command),
                "Ensure the command is installed and in your PATH".into(),
                "A rerun inside an existing git repository is expected to fail".into(),
            ],
            Self::LockPoisoned => vec![
                "An adapter panicked while holding shared state".into(),
                "Try again".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateMissing { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. }
            | Self::ManifestMerge { .. }
            | Self::LockPoisoned
            | Self::ExtensionInstall { .. } => ErrorCategory::Internal,
            Self::FetchFailed { .. } | Self::CommandFailed { .. } => ErrorCategory::External,
            Self::TemplateInvalid { .. }
            | Self::RenderingFailed { .. }
            | Self::ArgsLoadFailed { .. } => ErrorCategory::Validation,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
