//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables prefixed `STRATA__`, e.g.
//!    `STRATA__DEFAULTS__INSTALL=false`
//! 3. Config file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use strata_core::application::{DEFAULT_BRANCH, DEFAULT_SCRATCH_DIR};

const ENV_PREFIX: &str = "STRATA";
const BASE_DIR: &str = "base";
const REGISTRY_FILE: &str = "extensions.json";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new workspaces.
    pub defaults: Defaults,
    /// Where the base template and registry live.
    pub templates: TemplateConfig,
    /// Pipeline tuning.
    pub scaffold: ScaffoldConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub directory: PathBuf,
    pub install: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding `base/` and, by default, `extensions.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Extra exclude patterns, added to the built-in ones.
    pub exclude: Vec<String>,
    pub scratch_dir: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./my-dapp-example"),
            install: true,
        }
    }
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            scratch_dir: DEFAULT_SCRATCH_DIR.into(),
            branch: DEFAULT_BRANCH.into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        let built = Config::builder()
            .add_source(
                Config::try_from(&Self::default()).context("serializing built-in defaults")?,
            )
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("loading configuration from {}", path.display()))?;

        built
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.strata.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "strata")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".strata.toml"))
    }

    /// Directory holding the templates.
    pub fn templates_root(&self) -> PathBuf {
        self.templates.root.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("", "", "strata")
                .map(|d| d.data_dir().join("templates"))
                .unwrap_or_else(|| PathBuf::from("templates"))
        })
    }

    /// Apply a `--templates` override. An explicit `templates.registry`
    /// still wins for the registry.
    pub fn with_templates_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.templates.root = Some(root);
        }
        self
    }

    /// The base template directory, `<root>/base`.
    pub fn base_template_dir(&self) -> PathBuf {
        self.templates_root().join(BASE_DIR)
    }

    /// The extension registry, `<root>/extensions.json` unless overridden.
    pub fn registry_path(&self) -> PathBuf {
        self.templates
            .registry
            .clone()
            .unwrap_or_else(|| self.templates_root().join(REGISTRY_FILE))
    }

    /// Render the defaults as a commented TOML document.
    pub fn default_toml(path: &Path) -> anyhow::Result<String> {
        let body = toml::to_string_pretty(&Self::default())
            .context("serializing default config to TOML")?;
        Ok(format!(
            "# Configuration for strata\n# File: {}\n\n{body}",
            path.display()
        ))
    }
}
