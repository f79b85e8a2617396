// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Strata.
//!
//! Pure data and rules: extension descriptors, manifests and their merge
//! semantics, template naming, copy rules and render arguments. All I/O is
//! handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod layout;
pub mod outcome;
pub mod rules;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    extension::workspace_member,
    manifest::{MANIFEST_FILE, MERGEABLE_COLLECTIONS},
    template::{
        ARGS_MARKER, DEV_SIDECAR_SUFFIX, TEMPLATE_MARKER, is_args_file, is_template_file,
    },
    Extension, ExtensionRegistry, Manifest, RelativePath, ScaffoldOptions, TemplateDescriptor,
    TemplateName, TemplateOrigin,
};

pub use error::{DomainError, ErrorCategory};
pub use layout::{EXTENSION_LAYOUTS, ExtensionLayout};
pub use outcome::{OverlayOutcome, OverlayReport, SkipReason};
pub use rules::{CopyDecision, CopyRules, DEFAULT_EXCLUDES, SkipCause};
pub use validation::DomainValidator;
pub use value_objects::RenderArgs;
