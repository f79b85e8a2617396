//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod args_loader;
pub mod filesystem;
pub mod git;
pub mod package_manager;
pub mod registry_loader;
pub mod renderer;

mod process;

// Re-export commonly used adapters
pub use args_loader::ExportArgsLoader;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use git::GitCli;
pub use package_manager::PackageManager;
pub use registry_loader::{RegistryError, load_registry};
pub use renderer::{HandlebarsTemplate, TemplateRegistry};
