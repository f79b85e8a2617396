//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `strata-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `ExtensionFetcher`: Cloning extension repositories
//!   - `VersionControl`: Repository bootstrap
//!   - `TemplateResolver` / `Render`: Template rendering
//!   - `ArgsLoader`: Parsing args files
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ArgsLoader, DirEntry, ExtensionFetcher, Filesystem, Render, TemplateResolver, VersionControl,
};

#[cfg(test)]
pub use output::{MockExtensionFetcher, MockFilesystem, MockVersionControl};
