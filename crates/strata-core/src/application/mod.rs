//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService and its stages)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BaseCopyReport, DEFAULT_BRANCH, DEFAULT_SCRATCH_DIR, ExtensionOverlay, RenderedTemplate,
    ScaffoldReport, ScaffoldService, TemplateMaterializer, TreeMerger,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ArgsLoader, DirEntry, ExtensionFetcher, Filesystem, Render, TemplateResolver, VersionControl,
};

pub use error::ApplicationError;
