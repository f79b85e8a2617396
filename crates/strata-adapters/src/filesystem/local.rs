//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use strata_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::{StrataError, StrataResult},
};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> StrataResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()> {
        unlink_symlink(path)?;
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> StrataResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> StrataResult<()> {
        unlink_symlink(to)?;
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, &format!("copy to {}", to.display())))
    }

    fn symlink_file(&self, original: &Path, link: &Path) -> StrataResult<()> {
        let original = std::fs::canonicalize(original)
            .map_err(|e| map_io_error(original, e, "resolve link source"))?;
        if std::fs::symlink_metadata(link).is_ok() {
            std::fs::remove_file(link).map_err(|e| map_io_error(link, e, "replace file"))?;
        }
        create_symlink(&original, link).map_err(|e| {
            map_io_error(link, e, &format!("link to {}", original.display()))
        })
    }

    fn read_dir(&self, path: &Path) -> StrataResult<Vec<DirEntry>> {
        let entries =
            std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;

        let mut listing = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory entry"))?;
            let file_type = entry
                .file_type()
                .map_err(|e| map_io_error(&entry.path(), e, "get file type"))?;
            listing.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                is_dir: file_type.is_dir(),
            });
        }
        listing.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(listing)
    }

    fn walk_files(&self, root: &Path) -> StrataResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                let reason = e.to_string();
                StrataError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to walk directory: {reason}"),
                })
            })?;
            let linked_file = entry.path_is_symlink() && entry.path().is_file();
            if entry.file_type().is_file() || linked_file {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove_file(&self, path: &Path) -> StrataResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> StrataResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

/// Writes through a link would land in the linked file, so drop the link
/// and write a regular file in its place.
fn unlink_symlink(path: &Path) -> StrataResult<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove link"))
        }
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StrataError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
