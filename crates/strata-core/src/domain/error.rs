// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside report structs and application errors)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid extension '{flag}': {reason}")]
    InvalidExtension { flag: String, reason: String },

    #[error("Manifest is not a valid JSON object: {0}")]
    InvalidManifest(String),

    #[error("Render arguments must be a JSON object: {0}")]
    InvalidArgs(String),

    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("'{path}' is not inside '{root}'")]
    PathOutsideRoot { path: String, root: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("'{path}' is not a template file")]
    NotATemplate { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidExtension { flag, .. } => vec![
                format!("Registry entry '{}' is incomplete", flag),
                "Every entry needs extensionFlagValue, repository and branch".into(),
            ],
            Self::InvalidManifest(_) => vec![
                "Check that every package.json is a JSON object".into(),
                "Run the file through a JSON linter to find the syntax error".into(),
            ],
            Self::InvalidArgs(_) => vec![
                "Args files must export plain data".into(),
                "Use a JSON object or `export const name = <json>;` lines".into(),
            ],
            Self::InvalidPattern { pattern, .. } => vec![
                format!("'{}' is not a valid regular expression", pattern),
                "Check scaffold.exclude in your configuration file".into(),
            ],
            Self::NotATemplate { .. } => vec![
                "Template files must carry a `.template.` infix, e.g. `page.template.tsx`".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidExtension { .. }
            | Self::InvalidManifest(_)
            | Self::InvalidArgs(_)
            | Self::InvalidPattern { .. } => ErrorCategory::Validation,
            Self::NotATemplate { .. } => ErrorCategory::NotFound,
            Self::AbsolutePathNotAllowed { .. } | Self::PathOutsideRoot { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
