//! Filesystem merge primitives shared by the base copy and the overlay.

use std::path::Path;
use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{Manifest, RelativePath, workspace_member},
    error::StrataResult,
};

/// Tree and manifest operations over a [`Filesystem`].
pub struct TreeMerger<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> TreeMerger<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    /// Copy every directory and file under `source` into `dest`, creating
    /// `dest` and its parents. Existing files are overwritten.
    ///
    /// Returns the number of files copied.
    #[instrument(skip_all, fields(source = %source.display(), dest = %dest.display()))]
    pub fn copy_tree(&self, source: &Path, dest: &Path) -> StrataResult<usize> {
        self.merge_tree_filtered(source, dest, |_| true)
    }

    /// Overlay `source` onto `dest`: same-named files are replaced, files
    /// only in `dest` are kept, missing directories are created.
    pub fn merge_tree(&self, source: &Path, dest: &Path) -> StrataResult<usize> {
        self.merge_tree_filtered(source, dest, |_| true)
    }

    /// [`merge_tree`](Self::merge_tree) restricted to entries for which
    /// `include` holds. Paths are relative to `source`; an excluded
    /// directory is not descended into.
    pub fn merge_tree_filtered<F>(&self, source: &Path, dest: &Path, include: F) -> StrataResult<usize>
    where
        F: Fn(&RelativePath) -> bool,
    {
        if !self.fs.is_dir(source) {
            return Err(ApplicationError::FilesystemError {
                path: source.to_path_buf(),
                reason: "source directory does not exist".into(),
            }
            .into());
        }
        self.fs.create_dir_all(dest)?;
        self.copy_dir(source, dest, &RelativePath::new(""), &include)
    }

    fn copy_dir(
        &self,
        source: &Path,
        dest: &Path,
        rel: &RelativePath,
        include: &dyn Fn(&RelativePath) -> bool,
    ) -> StrataResult<usize> {
        let mut copied = 0;
        for entry in self.fs.read_dir(source)? {
            let child_rel = rel.join(&entry.name)?;
            if !include(&child_rel) {
                debug!(path = %child_rel, "Filtered out");
                continue;
            }
            let target = dest.join(&entry.name);
            if entry.is_dir {
                self.fs.create_dir_all(&target)?;
                copied += self.copy_dir(&entry.path, &target, &child_rel, include)?;
            } else {
                self.fs.copy_file(&entry.path, &target)?;
                copied += 1;
            }
        }
        Ok(copied)
    }

    /// Merge the mergeable collections of `source` into `target` and write
    /// `target` back.
    ///
    /// Failures are not fatal: they are logged, `target` keeps its previous
    /// content and the call returns `false`.
    pub fn merge_manifest(&self, source: &Path, target: &Path) -> bool {
        match self.try_merge_manifest(source, target) {
            Ok(merged) => {
                debug!(
                    source = %source.display(),
                    target = %target.display(),
                    collections = ?merged,
                    "Manifest merged"
                );
                true
            }
            Err(e) => {
                warn!(
                    source = %source.display(),
                    target = %target.display(),
                    error = %e,
                    "Manifest merge failed; keeping target unchanged"
                );
                false
            }
        }
    }

    /// Fallible core of [`merge_manifest`](Self::merge_manifest). Returns the
    /// collections that were merged.
    pub fn try_merge_manifest(&self, source: &Path, target: &Path) -> StrataResult<Vec<&'static str>> {
        let incoming = self.read_manifest(source)?;
        let mut existing = self.read_manifest(target)?;
        let merged = existing.merge_collections_from(&incoming);
        self.fs.write_file(target, &existing.to_pretty_string())?;
        Ok(merged)
    }

    /// Register `packages/<package_name>` in the manifest's workspace list.
    ///
    /// Returns `true` only when the manifest was changed and written. An
    /// unreadable manifest is logged and left alone, like
    /// [`merge_manifest`](Self::merge_manifest).
    pub fn append_workspace_member(&self, manifest_path: &Path, package_name: &str) -> bool {
        self.try_append_workspace_member(manifest_path, package_name)
            .unwrap_or_else(|e| {
                warn!(
                    manifest = %manifest_path.display(),
                    package = package_name,
                    error = %e,
                    "Could not register workspace member"
                );
                false
            })
    }

    /// Fallible core of [`append_workspace_member`](Self::append_workspace_member).
    pub fn try_append_workspace_member(&self, manifest_path: &Path, package_name: &str) -> StrataResult<bool> {
        let mut manifest = self.read_manifest(manifest_path)?;
        let member = workspace_member(package_name);
        if !manifest.add_workspace_member(&member) {
            debug!(%member, "Workspace member already present or no workspace list");
            return Ok(false);
        }
        self.fs
            .write_file(manifest_path, &manifest.to_pretty_string())?;
        Ok(true)
    }

    /// Recursively merge `source` into `target`, `source` winning. A missing
    /// `target` counts as an empty manifest.
    pub fn deep_merge_manifest(&self, source: &Path, target: &Path) -> StrataResult<()> {
        let incoming = self.read_manifest(source)?;
        let mut existing = if self.fs.is_file(target) {
            self.read_manifest(target)?
        } else {
            Manifest::empty()
        };
        existing.deep_merge_from(&incoming);

        if let Some(parent) = target.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write_file(target, &existing.to_pretty_string())
    }

    fn read_manifest(&self, path: &Path) -> StrataResult<Manifest> {
        let content = self.fs.read_to_string(path)?;
        Manifest::parse(&content).map_err(|e| {
            ApplicationError::ManifestMerge {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
