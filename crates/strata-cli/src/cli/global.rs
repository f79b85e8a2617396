//! Flags shared by every `strata` subcommand.
//!
//! `--config` and `--templates` decide where the base template and the
//! extension registry come from; the rest shape logging and output.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Warnings and errors
    -v      - Info level (pipeline stages, fetched extension)
    -vv     - Debug level (per-file copy and merge decisions)
    -vvv    - Trace level"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only report errors; skips the summary and next steps"
    )]
    pub quiet: bool,

    /// Also set by `NO_COLOR` (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "STRATA_CONFIG",
        value_name = "FILE",
        help = "Config file (default: platform config dir, see `strata init`)"
    )]
    pub config: Option<PathBuf>,

    /// Overrides `templates.root` from the config file.
    #[arg(
        short = 't',
        long = "templates",
        global = true,
        value_name = "DIR",
        help = "Templates directory holding base/ and extensions.json"
    )]
    pub templates: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        env = "STRATA_OUTPUT_FORMAT",
        value_enum,
        default_value = "auto",
        help = "How results are printed"
    )]
    pub output_format: OutputFormat,
}

/// Rendering of scaffold reports and extension listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise.
    #[default]
    Auto,
    /// Coloured summary with a spinner.
    Human,
    /// Uncoloured summary, no spinner.
    Plain,
    /// One JSON document on stdout.
    Json,
}
