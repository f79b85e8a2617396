//! Deferred template rendering.
//!
//! Discovers `*.template.*` files in the base tree, resolves each to a render
//! function, gathers arguments from args files an extension dropped into the
//! target, and writes the rendered output next to where the template would
//! have been.

use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::{ArgsLoader, Filesystem, TemplateResolver},
    domain::{DEV_SIDECAR_SUFFIX, RelativePath, RenderArgs, TemplateDescriptor, is_template_file},
    error::{StrataError, StrataResult},
};

/// One rendered template.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTemplate {
    /// Template path relative to the base root.
    pub template: RelativePath,
    /// Output path relative to the target root.
    pub output: RelativePath,
    /// Args files that contributed, relative to the target root.
    pub args_files: Vec<RelativePath>,
    /// Dev-mode diagnostics file, when written.
    pub sidecar: Option<PathBuf>,
}

pub struct TemplateMaterializer<'a> {
    fs: &'a dyn Filesystem,
    resolver: &'a dyn TemplateResolver,
    args_loader: &'a dyn ArgsLoader,
}

impl<'a> TemplateMaterializer<'a> {
    pub fn new(
        fs: &'a dyn Filesystem,
        resolver: &'a dyn TemplateResolver,
        args_loader: &'a dyn ArgsLoader,
    ) -> Self {
        Self {
            fs,
            resolver,
            args_loader,
        }
    }

    /// Every template file under `base_root`, in path order.
    pub fn discover(&self, base_root: &Path) -> StrataResult<Vec<TemplateDescriptor>> {
        self.fs
            .walk_files(base_root)?
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(is_template_file)
            })
            .map(|p| TemplateDescriptor::from_base(base_root, &p).map_err(StrataError::from))
            .collect()
    }

    /// Render every template under `base_root` into `target`.
    ///
    /// Args files are looked up only when `with_extension_args` is set.
    /// Renders run concurrently; the first failure in discovery order is
    /// returned once all have finished.
    #[instrument(skip_all, fields(base = %base_root.display(), target = %target.display()))]
    pub fn materialize(
        &self,
        base_root: &Path,
        target: &Path,
        with_extension_args: bool,
        dev: bool,
    ) -> StrataResult<Vec<RenderedTemplate>> {
        let templates = self.discover(base_root)?;
        info!(count = templates.len(), "Rendering templates");

        let results: Vec<StrataResult<RenderedTemplate>> = thread::scope(|s| {
            let handles: Vec<_> = templates
                .iter()
                .map(|t| s.spawn(move || self.render_one(t, target, with_extension_args, dev)))
                .collect();

            handles
                .into_iter()
                .map(|h| {
                    h.join().unwrap_or_else(|_| {
                        Err(StrataError::Internal {
                            message: "render worker panicked".into(),
                        })
                    })
                })
                .collect()
        });

        results.into_iter().collect()
    }

    fn render_one(
        &self,
        template: &TemplateDescriptor,
        target: &Path,
        with_extension_args: bool,
        dev: bool,
    ) -> StrataResult<RenderedTemplate> {
        let source = self.fs.read_to_string(&template.source_path)?;
        let render = self.resolver.resolve(template, &source)?;

        let mut args_files = Vec::new();
        let mut sources = Vec::new();
        if with_extension_args {
            let rel = template.args_relative_path();
            let path = target.join(rel.as_path());
            if self.fs.is_file(&path) {
                match self.load_args(&path) {
                    Ok(args) => {
                        sources.push(args);
                        args_files.push(rel);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Ignoring unreadable args file");
                    }
                }
            }
        }
        let args = RenderArgs::combine(sources);

        let output = template.rendered_relative_path();
        let output_path = target.join(output.as_path());
        let content = render.render(&args)?;

        if let Some(parent) = output_path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write_file(&output_path, &content)?;
        debug!(template = %template.relative_path, output = %output, "Rendered");

        let sidecar = if dev {
            let path = sidecar_path(&output_path);
            self.fs
                .write_file(&path, &describe(template, &args_files, &args))?;
            Some(path)
        } else {
            None
        };

        Ok(RenderedTemplate {
            template: template.relative_path.clone(),
            output,
            args_files,
            sidecar,
        })
    }

    fn load_args(&self, path: &Path) -> StrataResult<RenderArgs> {
        let content = self.fs.read_to_string(path)?;
        self.args_loader.load(path, &content)
    }
}

fn sidecar_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(DEV_SIDECAR_SUFFIX);
    PathBuf::from(name)
}

fn describe(template: &TemplateDescriptor, args_files: &[RelativePath], args: &RenderArgs) -> String {
    let files = if args_files.is_empty() {
        "  (none)".to_string()
    } else {
        args_files
            .iter()
            .map(|f| format!("  - {f}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "Generated at: {}\nTemplate: {}\nArgs files:\n{}\nResolved args:\n{}\n",
        chrono::Utc::now().to_rfc3339(),
        template.relative_path,
        files,
        args
    )
}
