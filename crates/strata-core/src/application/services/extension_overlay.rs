//! Extension overlay: fetch an extension and fold it into the workspace.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::tree_merger::TreeMerger;
use crate::{
    application::{
        ApplicationError,
        ports::{ExtensionFetcher, Filesystem},
    },
    domain::{
        Extension, ExtensionLayout, ExtensionRegistry, MANIFEST_FILE, OverlayOutcome,
        OverlayReport, RelativePath, SkipReason, layout,
    },
    error::{StrataError, StrataResult},
};

/// Directory name for the checkout, created inside the target.
pub const DEFAULT_SCRATCH_DIR: &str = ".temp-extension";

/// A directory that is removed when the guard goes out of scope.
///
/// Removal failures are logged, never raised.
pub struct ScratchDir<'a> {
    fs: &'a dyn Filesystem,
    path: PathBuf,
}

impl<'a> ScratchDir<'a> {
    /// Create `path` empty. A stale directory from an earlier run is cleared
    /// first.
    pub fn create(fs: &'a dyn Filesystem, path: PathBuf) -> StrataResult<Self> {
        if fs.exists(&path) {
            debug!(path = %path.display(), "Clearing stale scratch directory");
            fs.remove_dir_all(&path)?;
        }
        fs.create_dir_all(&path)?;
        Ok(Self { fs, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.fs.remove_dir_all(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove scratch directory");
        }
    }
}

/// Fetches an extension and overlays it onto a scaffolded workspace.
pub struct ExtensionOverlay<'a> {
    fs: &'a dyn Filesystem,
    fetcher: &'a dyn ExtensionFetcher,
    registry: &'a ExtensionRegistry,
    scratch_dir: &'a str,
}

impl<'a> ExtensionOverlay<'a> {
    pub fn new(
        fs: &'a dyn Filesystem,
        fetcher: &'a dyn ExtensionFetcher,
        registry: &'a ExtensionRegistry,
    ) -> Self {
        Self {
            fs,
            fetcher,
            registry,
            scratch_dir: DEFAULT_SCRATCH_DIR,
        }
    }

    pub fn with_scratch_dir(mut self, name: &'a str) -> Self {
        self.scratch_dir = name;
        self
    }

    /// Apply the extension named `requested` to the workspace at `target`.
    ///
    /// Unmet preconditions yield [`OverlayOutcome::Skipped`]. A failed clone
    /// is `FetchFailed`; any later failure is `ExtensionInstall`. Either
    /// leaves the target partially updated.
    #[instrument(skip_all, fields(target = %target.display(), extension = ?requested))]
    pub fn apply(&self, target: &Path, requested: Option<&str>) -> StrataResult<OverlayOutcome> {
        let Some(flag) = requested else {
            return Ok(OverlayOutcome::Skipped(SkipReason::NotRequested));
        };
        if flag.trim().is_empty() {
            return Ok(OverlayOutcome::Skipped(SkipReason::BlankName));
        }
        let Some(extension) = self.registry.find_by_flag(flag) else {
            info!(%flag, "Extension not found in registry, skipping overlay");
            return Ok(OverlayOutcome::Skipped(SkipReason::UnknownExtension(
                flag.to_string(),
            )));
        };
        if !self.fs.is_dir(&target.join("packages")) {
            warn!("Target has no packages directory, skipping overlay");
            return Ok(OverlayOutcome::Skipped(SkipReason::NoPackagesDir));
        }

        let scratch = ScratchDir::create(self.fs, target.join(self.scratch_dir))?;

        info!(repository = %extension.repository, branch = %extension.branch, "Fetching extension");
        self.fetcher.fetch(extension, scratch.path())?;

        let report = self
            .install(extension, scratch.path(), target)
            .map_err(|e| ApplicationError::ExtensionInstall {
                extension: extension.flag_value.clone(),
                reason: e.to_string(),
            })?;

        info!(
            merged = report.merged_packages.len(),
            copied = report.copied_packages.len(),
            manifests = report.merged_manifests.len(),
            "Extension applied"
        );
        Ok(OverlayOutcome::Applied(report))
    }

    fn install(&self, extension: &Extension, checkout: &Path, target: &Path) -> Result<OverlayReport, StrataError> {
        let merger = TreeMerger::new(self.fs);
        let flag = extension.flag_value.as_str();
        let target_packages = target.join("packages");
        let mut report = OverlayReport {
            extension: flag.to_string(),
            ..OverlayReport::default()
        };

        // Files first: the extension's own package, then its siblings.
        if let Some((found, dir)) = layout::probe(
            checkout,
            |l, root| l.package_dir(root, flag),
            |p| self.fs.is_dir(p),
        ) {
            debug!(layout = found.name, "Installing extension package");
            merger.copy_tree(&dir, &target_packages.join(flag))?;
            report.layout = Some(found.name);
            report.package_installed = true;
        } else {
            warn!(%flag, "Extension has no package of its own");
        }

        let sources = layout::probe(checkout, ExtensionLayout::packages_root, |p| self.fs.is_dir(p));
        let mut merged = Vec::new();
        if let Some((_, packages_root)) = &sources {
            for entry in self.fs.read_dir(packages_root)? {
                if !entry.is_dir || entry.name == flag {
                    continue;
                }
                let dest = target_packages.join(&entry.name);
                if self.fs.is_dir(&dest) {
                    // An existing top-level manifest is merged below, not replaced.
                    let has_manifest = self.fs.is_file(&dest.join(MANIFEST_FILE));
                    merger.merge_tree_filtered(&entry.path, &dest, |rel| {
                        !has_manifest || *rel != RelativePath::new(MANIFEST_FILE)
                    })?;
                    if has_manifest {
                        merged.push((entry.name.clone(), entry.path.clone(), dest));
                    }
                    report.merged_packages.push(entry.name);
                } else {
                    merger.copy_tree(&entry.path, &dest)?;
                    report.copied_packages.push(entry.name);
                }
            }
        }

        // Then manifests.
        for (name, source, dest) in &merged {
            let incoming = source.join(MANIFEST_FILE);
            let existing = dest.join(MANIFEST_FILE);
            if self.fs.is_file(&incoming)
                && self.fs.is_file(&existing)
                && merger.merge_manifest(&incoming, &existing)
            {
                report.merged_manifests.push(name.clone());
            }
        }

        let target_root = target.join(MANIFEST_FILE);
        if let Some((_, root_manifest)) =
            layout::probe(checkout, ExtensionLayout::root_manifest_path, |p| self.fs.is_file(p))
        {
            if self.fs.is_file(&target_root) {
                report.root_manifest_merged = merger.merge_manifest(&root_manifest, &target_root);
                report.workspace_member_added = merger.append_workspace_member(&target_root, flag);
            }
        }

        Ok(report)
    }
}
