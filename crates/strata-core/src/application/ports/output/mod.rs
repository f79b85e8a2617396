//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{Extension, RenderArgs, TemplateDescriptor};
use crate::error::StrataResult;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Listings are sorted by path so that every traversal is deterministic.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StrataResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()>;

    fn read_to_string(&self, path: &Path) -> StrataResult<String>;

    /// Copy bytes from `from` to `to`, replacing `to` if present. The parent
    /// of `to` must exist.
    fn copy_file(&self, from: &Path, to: &Path) -> StrataResult<()>;

    /// Create a symbolic link at `link` pointing to the file `original`,
    /// replacing `link` if present. The parent of `link` must exist.
    fn symlink_file(&self, original: &Path, link: &Path) -> StrataResult<()>;

    /// Immediate children of a directory.
    fn read_dir(&self, path: &Path) -> StrataResult<Vec<DirEntry>>;

    /// Every file below `root`, recursively. Directories are not listed.
    fn walk_files(&self, root: &Path) -> StrataResult<Vec<PathBuf>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> StrataResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StrataResult<()>;
}

/// Port for retrieving an extension's repository.
///
/// Implemented by `strata_adapters::git::GitCli` (shallow clone).
#[cfg_attr(test, mockall::automock)]
pub trait ExtensionFetcher: Send + Sync {
    /// Place a checkout of `extension` at `dest`, which exists and is empty.
    fn fetch(&self, extension: &Extension, dest: &Path) -> StrataResult<()>;
}

/// Port for initialising version control in a fresh workspace.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    fn init(&self, dir: &Path) -> StrataResult<()>;

    /// Create and switch to `branch`.
    fn create_branch(&self, dir: &Path, branch: &str) -> StrataResult<()>;
}

/// A render function: arguments in, file content out.
pub trait Render: Send + Sync {
    fn render(&self, args: &RenderArgs) -> StrataResult<String>;
}

impl<F> Render for F
where
    F: Fn(&RenderArgs) -> String + Send + Sync,
{
    fn render(&self, args: &RenderArgs) -> StrataResult<String> {
        Ok(self(args))
    }
}

/// Port that turns a discovered template into a render function.
///
/// Implemented by `strata_adapters::renderer::TemplateRegistry`.
pub trait TemplateResolver: Send + Sync {
    /// `source` is the template file's content.
    fn resolve(&self, template: &TemplateDescriptor, source: &str)
    -> StrataResult<Box<dyn Render>>;
}

/// Port that parses an args file into render arguments.
///
/// Implemented by `strata_adapters::args_loader::ExportArgsLoader`.
pub trait ArgsLoader: Send + Sync {
    fn load(&self, path: &Path, content: &str) -> StrataResult<RenderArgs>;
}
