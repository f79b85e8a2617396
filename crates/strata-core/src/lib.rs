//! Strata Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Strata
//! workspace scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, ExtensionOverlay,    │
//! │   TemplateMaterializer, TreeMerger)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Fetcher, VCS, Resolver)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     strata-adapters (Infrastructure)    │
//! │  (LocalFilesystem, GitCli, Handlebars)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Extension, Manifest, CopyRules, Args)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strata_core::{application::ScaffoldService, domain::ScaffoldOptions};
//!
//! let service = ScaffoldService::new(base_root, fs, fetcher, vcs, resolver, args_loader)
//!     .with_registry(registry);
//! let report = service.scaffold(ScaffoldOptions::new("./my-dapp").with_extension("foo-ext"))?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ScaffoldReport, ScaffoldService,
        ports::{
            ArgsLoader, ExtensionFetcher, Filesystem, Render, TemplateResolver, VersionControl,
        },
    };
    pub use crate::domain::{
        CopyRules, Extension, ExtensionRegistry, Manifest, OverlayOutcome, RenderArgs,
        ScaffoldOptions, SkipReason, TemplateDescriptor,
    };
    pub use crate::error::{StrataError, StrataResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
