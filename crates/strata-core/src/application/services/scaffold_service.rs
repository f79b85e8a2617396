//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire scaffolding workflow:
//! 1. Copy the base template with inclusion rules
//! 2. Overlay the requested extension
//! 3. Render deferred templates
//! 4. Remove template and args markers
//! 5. Initialise version control
//!
//! Stages run strictly in order. There is no rollback: a failure leaves the
//! target partially populated.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    extension_overlay::{DEFAULT_SCRATCH_DIR, ExtensionOverlay},
    materializer::{RenderedTemplate, TemplateMaterializer},
    tree_merger::TreeMerger,
};
use crate::{
    application::ports::{ArgsLoader, ExtensionFetcher, Filesystem, TemplateResolver, VersionControl},
    domain::{
        CopyDecision, CopyRules, DomainValidator as validator, ExtensionRegistry,
        OverlayOutcome, RelativePath, ScaffoldOptions, SkipCause, is_args_file, is_template_file,
    },
    error::{StrataError, StrataResult},
};

pub const DEFAULT_BRANCH: &str = "main";

const ENV_EXAMPLE: &str = ".env.example";
const ENV_FILE: &str = ".env";

/// What a scaffold run did.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldReport {
    pub run_id: Uuid,
    pub target: PathBuf,
    pub base: BaseCopyReport,
    pub overlay: OverlayOutcome,
    pub rendered: Vec<RenderedTemplate>,
    /// Marker files deleted during cleanup.
    pub removed_markers: usize,
}

/// Result of the base copy stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseCopyReport {
    pub copied_files: usize,
    /// Files linked back to the base template (dev mode).
    pub linked_files: usize,
    /// Files left alone because the target already had them.
    pub kept_existing: usize,
    pub skipped: usize,
    /// `.env` files seeded, relative to the target.
    pub seeded_env: Vec<RelativePath>,
    pub merged_manifests: usize,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    base_root: PathBuf,
    filesystem: Box<dyn Filesystem>,
    fetcher: Box<dyn ExtensionFetcher>,
    vcs: Box<dyn VersionControl>,
    resolver: Box<dyn TemplateResolver>,
    args_loader: Box<dyn ArgsLoader>,
    registry: ExtensionRegistry,
    rules: CopyRules,
    branch: String,
    scratch_dir: String,
}

impl ScaffoldService {
    /// Create a new scaffold service reading the base template from
    /// `base_root`.
    ///
    /// The registry starts empty; see [`with_registry`](Self::with_registry).
    pub fn new(
        base_root: impl Into<PathBuf>,
        filesystem: Box<dyn Filesystem>,
        fetcher: Box<dyn ExtensionFetcher>,
        vcs: Box<dyn VersionControl>,
        resolver: Box<dyn TemplateResolver>,
        args_loader: Box<dyn ArgsLoader>,
    ) -> Self {
        Self {
            base_root: base_root.into(),
            filesystem,
            fetcher,
            vcs,
            resolver,
            args_loader,
            registry: ExtensionRegistry::empty(),
            rules: CopyRules::standard(),
            branch: DEFAULT_BRANCH.to_string(),
            scratch_dir: DEFAULT_SCRATCH_DIR.to_string(),
        }
    }

    pub fn with_registry(mut self, registry: ExtensionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_rules(mut self, rules: CopyRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_scratch_dir(mut self, name: impl Into<String>) -> Self {
        self.scratch_dir = name.into();
        self
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Scaffold a new workspace.
    #[instrument(
        skip_all,
        fields(
            target = %options.directory.display(),
            extension = ?options.extension,
            dev = options.dev,
        )
    )]
    pub fn scaffold(&self, options: ScaffoldOptions) -> StrataResult<ScaffoldReport> {
        validator::validate_options(&options)?;
        if !self.filesystem.is_dir(&self.base_root) {
            return Err(StrataError::Configuration {
                message: format!(
                    "base template not found at {}",
                    self.base_root.display()
                ),
            });
        }

        let run_id = Uuid::new_v4();
        let target = options.directory.as_path();
        info!(%run_id, "Scaffolding workspace");

        let base = self.copy_base(target, options.dev)?;
        info!(
            copied = base.copied_files,
            kept = base.kept_existing,
            manifests = base.merged_manifests,
            "Base template copied"
        );

        let overlay = ExtensionOverlay::new(self.filesystem.as_ref(), self.fetcher.as_ref(), &self.registry)
            .with_scratch_dir(&self.scratch_dir)
            .apply(target, options.extension.as_deref())?;
        if let OverlayOutcome::Skipped(reason) = &overlay {
            debug!(%reason, "Overlay skipped");
        }

        let with_extension_args = options
            .extension
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty());
        let rendered = TemplateMaterializer::new(
            self.filesystem.as_ref(),
            self.resolver.as_ref(),
            self.args_loader.as_ref(),
        )
        .materialize(&self.base_root, target, with_extension_args, options.dev)?;

        let removed_markers = self.remove_markers(&target.join("packages"));

        self.vcs.init(target)?;
        self.vcs.create_branch(target, &self.branch)?;

        info!(rendered = rendered.len(), removed_markers, "Scaffold completed successfully");
        Ok(ScaffoldReport {
            run_id,
            target: target.to_path_buf(),
            base,
            overlay,
            rendered,
            removed_markers,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Copy the base tree without clobbering, seed `.env` files and merge
    /// base manifests.
    ///
    /// In dev mode base files are symlinked so edits in the workspace land in
    /// the template. Generated output is still copied.
    fn copy_base(&self, target: &Path, dev: bool) -> StrataResult<BaseCopyReport> {
        let fs = self.filesystem.as_ref();
        let mut report = BaseCopyReport::default();
        fs.create_dir_all(target)?;

        let mut manifests = Vec::new();
        for source in fs.walk_files(&self.base_root)? {
            let rel = RelativePath::within(&self.base_root, &source)?;
            let dest = target.join(rel.as_path());

            match self.rules.decide(&rel, dev) {
                CopyDecision::Copy => {}
                CopyDecision::Skip(SkipCause::Manifest) => {
                    manifests.push(rel);
                    continue;
                }
                CopyDecision::Skip(SkipCause::Placeholder) => {
                    // Keep the directory the placeholder was holding open.
                    if let (None, Some(parent)) = (self.rules.excluded_by(&rel), dest.parent()) {
                        fs.create_dir_all(parent)?;
                    }
                    report.skipped += 1;
                    continue;
                }
                CopyDecision::Skip(cause) => {
                    debug!(path = %rel, ?cause, "Skipped");
                    report.skipped += 1;
                    continue;
                }
            }

            if fs.exists(&dest) {
                report.kept_existing += 1;
                continue;
            }
            if let Some(parent) = dest.parent() {
                fs.create_dir_all(parent)?;
            }
            if dev && !CopyRules::is_generated(&rel) {
                fs.symlink_file(&source, &dest)?;
                report.linked_files += 1;
            } else {
                fs.copy_file(&source, &dest)?;
                report.copied_files += 1;
            }
        }

        report.seeded_env = self.seed_env_files(target)?;

        let merger = TreeMerger::new(fs);
        for rel in manifests {
            if let Some(pattern) = self.rules.excluded_by(&rel) {
                debug!(path = %rel, %pattern, "Manifest excluded");
                continue;
            }
            merger.deep_merge_manifest(&self.base_root.join(rel.as_path()), &target.join(rel.as_path()))?;
            report.merged_manifests += 1;
        }

        Ok(report)
    }

    /// `.env` from `.env.example` for every base package that ships one.
    fn seed_env_files(&self, target: &Path) -> StrataResult<Vec<RelativePath>> {
        let fs = self.filesystem.as_ref();
        let packages = self.base_root.join("packages");
        if !fs.is_dir(&packages) {
            return Ok(Vec::new());
        }

        let mut seeded = Vec::new();
        for entry in fs.read_dir(&packages)? {
            let example = entry.path.join(ENV_EXAMPLE);
            if !entry.is_dir || !fs.is_file(&example) {
                continue;
            }
            let rel = RelativePath::new("packages").join(&entry.name)?.join(ENV_FILE)?;
            let dest = target.join(rel.as_path());
            if fs.exists(&dest) {
                continue;
            }
            if let Some(parent) = dest.parent() {
                fs.create_dir_all(parent)?;
            }
            fs.copy_file(&example, &dest)?;
            seeded.push(rel);
        }
        Ok(seeded)
    }

    /// Delete template and args files under `root`. Failures are logged.
    fn remove_markers(&self, root: &Path) -> usize {
        let fs = self.filesystem.as_ref();
        if !fs.is_dir(root) {
            return 0;
        }
        let files = match fs.walk_files(root) {
            Ok(files) => files,
            Err(e) => {
                warn!(path = %root.display(), error = %e, "Cleanup skipped");
                return 0;
            }
        };

        files
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| is_template_file(n) || is_args_file(n))
            })
            .filter(|p| match fs.remove_file(p) {
                Ok(()) => true,
                Err(e) => {
                    warn!(path = %p.display(), error = %e, "Failed to remove marker file");
                    false
                }
            })
            .count()
    }
}
