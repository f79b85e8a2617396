use std::path::PathBuf;

/// Fully resolved options for one scaffold run.
///
/// Produced by the CLI (flags + config defaults) before the core runs and
/// passed by value; the core never sees unresolved or optional-unknown
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Target directory for the new workspace.
    pub directory: PathBuf,
    /// Install dependencies afterwards. Consumed by the CLI, not the core.
    pub install: bool,
    /// Diagnostics mode: copy generated artifacts verbatim and write `.dev`
    /// sidecars next to rendered templates.
    pub dev: bool,
    /// Extension flag value, if one was requested.
    pub extension: Option<String>,
}

impl ScaffoldOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            install: false,
            dev: false,
            extension: None,
        }
    }

    pub fn with_install(mut self, install: bool) -> Self {
        self.install = install;
        self
    }

    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Whether the caller asked for an extension at all.
    ///
    /// A blank flag still counts as requested; the overlay stage reports it
    /// as a skip.
    pub fn extension_requested(&self) -> bool {
        self.extension.is_some()
    }
}
