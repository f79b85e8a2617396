//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Layered workspace scaffolding",
    long_about = "Strata copies a base workspace template, overlays an optional \
                  extension fetched from git, and renders deferred templates.",
    after_help = "EXAMPLES:\n\
        \x20 strata new my-dapp\n\
        \x20 strata new my-dapp --extension foo-ext --skip-install\n\
        \x20 strata extensions --format json\n\
        \x20 strata completions bash > /usr/share/bash-completion/completions/strata",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scaffold a new workspace.
    #[command(
        visible_alias = "n",
        about = "Scaffold a new workspace",
        after_help = "EXAMPLES:\n\
            \x20 strata new                          # uses defaults.directory\n\
            \x20 strata new ./my-dapp --install\n\
            \x20 strata new ./my-dapp -e foo-ext -s\n\
            \x20 strata new ./my-dapp --dev --force"
    )]
    New(NewArgs),

    /// List the extensions in the registry.
    #[command(
        visible_alias = "ls",
        alias = "ext",
        about = "List available extensions",
        after_help = "EXAMPLES:\n\
            \x20 strata extensions\n\
            \x20 strata extensions --format list\n\
            \x20 strata extensions --format json"
    )]
    Extensions(ExtensionsArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 strata init\n\
            \x20 strata init --force\n\
            \x20 strata --config ./strata.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish"
    )]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `strata new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Target directory.  Falls back to `defaults.directory` from config.
    #[arg(value_name = "DIRECTORY", help = "Directory to scaffold into")]
    pub directory: Option<PathBuf>,

    /// Run `yarn install` and `yarn format` after scaffolding.
    #[arg(
        short = 'i',
        long = "install",
        conflicts_with = "skip_install",
        help = "Install dependencies after scaffolding"
    )]
    pub install: bool,

    /// Never install dependencies, whatever the config says.
    #[arg(short = 's', long = "skip-install", help = "Skip dependency installation")]
    pub skip_install: bool,

    /// Link base files instead of copying them, keep generated output and
    /// write render sidecars.
    #[arg(
        long = "dev",
        help = "Link base files back to the templates and write .dev render notes"
    )]
    pub dev: bool,

    /// Extension to overlay, by its registry flag.
    #[arg(
        short = 'e',
        long = "extension",
        value_name = "FLAG",
        help = "Extension to apply (see `strata extensions`)"
    )]
    pub extension: Option<String>,

    /// Scaffold into a non-empty directory.
    #[arg(long = "force", help = "Allow a non-empty target directory")]
    pub force: bool,
}

impl NewArgs {
    /// Explicit install choice, if the user made one.
    pub fn install_choice(&self) -> Option<bool> {
        match (self.install, self.skip_install) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

// ── extensions ────────────────────────────────────────────────────────────────

/// Arguments for `strata extensions`.
#[derive(Debug, Args)]
pub struct ExtensionsArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `extensions` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One flag per line.
    List,
    /// JSON array, same shape as the registry file.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `strata completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
