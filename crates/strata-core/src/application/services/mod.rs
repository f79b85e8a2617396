//! Application services - orchestrate use cases.
//!
//! `ScaffoldService` drives the pipeline; the other services are its stages
//! and are usable on their own.

pub mod extension_overlay;
pub mod materializer;
pub mod scaffold_service;
pub mod tree_merger;

pub use extension_overlay::{DEFAULT_SCRATCH_DIR, ExtensionOverlay, ScratchDir};
pub use materializer::{RenderedTemplate, TemplateMaterializer};
pub use scaffold_service::{BaseCopyReport, DEFAULT_BRANCH, ScaffoldReport, ScaffoldService};
pub use tree_merger::TreeMerger;
