//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use strata_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::{StrataError, StrataResult},
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle after boxing one into a
/// service.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// Link path -> original. Linked files also hold a snapshot in `files`.
    links: BTreeMap<PathBuf, PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn require_parent(&self, path: &Path) -> StrataResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(not_found(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Original a link points to, if `path` was created by `symlink_file`.
    pub fn link_target(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        let inner = self.inner.read().ok()?;
        inner.links.get(path.as_ref()).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> StrataResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }

    fn write(&self) -> StrataResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StrataResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(not_found(path, "A file exists at this path"));
        }
        inner.add_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()> {
        let mut inner = self.write()?;
        inner.require_parent(path)?;
        inner.links.remove(path);
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> StrataResult<String> {
        let inner = self.read()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path, "No such file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> StrataResult<()> {
        let mut inner = self.write()?;
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from, "No such file"))?;
        inner.require_parent(to)?;
        inner.links.remove(to);
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn symlink_file(&self, original: &Path, link: &Path) -> StrataResult<()> {
        let mut inner = self.write()?;
        let content = inner
            .files
            .get(original)
            .cloned()
            .ok_or_else(|| not_found(original, "No such file"))?;
        inner.require_parent(link)?;
        inner.files.insert(link.to_path_buf(), content);
        inner.links.insert(link.to_path_buf(), original.to_path_buf());
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> StrataResult<Vec<DirEntry>> {
        let inner = self.read()?;
        if !inner.directories.contains(path) {
            return Err(not_found(path, "No such directory"));
        }

        let child = |p: &Path| p.parent() == Some(path);
        let dirs = inner.directories.iter().filter(|p| child(p)).map(|p| (p, true));
        let files = inner.files.keys().filter(|p| child(p)).map(|p| (p, false));

        let mut listing: Vec<DirEntry> = dirs
            .chain(files)
            .filter_map(|(p, is_dir)| {
                Some(DirEntry {
                    name: p.file_name()?.to_string_lossy().into_owned(),
                    path: p.clone(),
                    is_dir,
                })
            })
            .collect();
        listing.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(listing)
    }

    fn walk_files(&self, root: &Path) -> StrataResult<Vec<PathBuf>> {
        let inner = self.read()?;
        if !inner.directories.contains(root) {
            return Err(not_found(root, "No such directory"));
        }
        Ok(inner
            .files
            .keys()
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .cloned()
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) -> StrataResult<()> {
        let mut inner = self.write()?;
        inner.links.remove(path);
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path, "No such file"))
    }

    fn remove_dir_all(&self, path: &Path) -> StrataResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(path) {
            return Err(not_found(path, "No such directory"));
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.links.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

fn not_found(path: &Path, reason: &str) -> StrataError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}
