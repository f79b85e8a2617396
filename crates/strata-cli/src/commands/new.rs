//! Implementation of the `strata new` command.
//!
//! Responsibility: resolve options from flags and config, wire the adapters
//! into a `ScaffoldService`, then run the post-scaffold tools (yarn, the
//! first commit).  No pipeline logic lives here.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, info, instrument};

use strata_adapters::{
    ExportArgsLoader, GitCli, LocalFilesystem, PackageManager, TemplateRegistry, load_registry,
};
use strata_core::{
    application::{ScaffoldReport, ScaffoldService},
    domain::{CopyRules, OverlayOutcome, ScaffoldOptions, SkipReason},
    error::StrataError,
};

use crate::{
    cli::{NewArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

const FIRST_COMMIT_MESSAGE: &str = "Initial commit with strata";

/// Execute the `strata new` command.
///
/// Dispatch sequence:
/// 1. Resolve the target directory and install choice
/// 2. Refuse a non-empty target unless `--force`
/// 3. Run the scaffold pipeline
/// 4. `yarn install` + `yarn format` when installing
/// 5. Create the first commit
/// 6. Print a summary and next steps
#[instrument(skip_all, fields(directory = ?args.directory, extension = ?args.extension))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let options = resolve_options(&args, &config)?;
    debug!(
        directory = %options.directory.display(),
        install = options.install,
        dev = options.dev,
        "Options resolved"
    );

    ensure_target_available(&options.directory, args.force)?;

    let service = build_service(&config)?;
    warn_unknown_extension(&service, options.extension.as_deref(), &output)?;

    let target = options.directory.clone();
    let install = options.install;

    let spinner = output.spinner(format!("Scaffolding workspace in {}", target.display()));
    let result = service.scaffold(options);
    spinner.finish_and_clear();
    let report = result?;

    info!(run_id = %report.run_id, "Scaffold finished");

    if install {
        run_tool(&output, "Installing dependencies with yarn", || {
            PackageManager::yarn().install(&target)
        })?;
        run_tool(&output, "Formatting files", || {
            PackageManager::yarn().format(&target)
        })?;
    } else {
        debug!("Dependency installation skipped");
    }

    run_tool(&output, "Creating first commit", || {
        GitCli::new().commit_all(&target, FIRST_COMMIT_MESSAGE)
    })?;

    if output.format() == OutputFormat::Json {
        output.json(&report_json(&report, install))?;
        return Ok(());
    }

    show_summary(&report, &output)?;
    if !output.is_quiet() {
        show_next_steps(&target, install, &output)?;
    }
    Ok(())
}

// ── Option resolution ─────────────────────────────────────────────────────────

/// Merge flags over config defaults into pipeline options.
pub fn resolve_options(args: &NewArgs, config: &AppConfig) -> CliResult<ScaffoldOptions> {
    let directory = args
        .directory
        .clone()
        .unwrap_or_else(|| config.defaults.directory.clone());
    if directory.as_os_str().is_empty() {
        return Err(CliError::InvalidInput {
            message: "directory cannot be empty".into(),
        });
    }
    let directory = std::path::absolute(&directory)
        .with_cli_context(|| format!("resolving directory '{}'", directory.display()))?;

    let install = args.install_choice().unwrap_or(config.defaults.install);

    let mut options = ScaffoldOptions::new(directory)
        .with_install(install)
        .with_dev(args.dev);
    if let Some(extension) = &args.extension {
        options = options.with_extension(extension.as_str());
    }
    Ok(options)
}

/// A missing or empty directory is fine; anything else needs `--force`.
fn ensure_target_available(path: &Path, force: bool) -> CliResult<()> {
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' exists and is not a directory", path.display()),
        });
    }
    let mut entries = std::fs::read_dir(path)
        .with_cli_context(|| format!("reading directory '{}'", path.display()))?;
    if entries.next().is_some() && !force {
        return Err(CliError::DirectoryNotEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn build_service(config: &AppConfig) -> CliResult<ScaffoldService> {
    let rules =
        CopyRules::with_excludes(&config.scaffold.exclude).map_err(|e| CliError::ConfigError {
            message: format!("invalid scaffold.exclude pattern: {e}"),
            source: Some(Box::new(e)),
        })?;
    let registry = load_registry(&config.registry_path());
    let base_root = config.base_template_dir();
    debug!(base = %base_root.display(), extensions = registry.len(), "Wiring scaffold service");

    Ok(ScaffoldService::new(
        base_root,
        Box::new(LocalFilesystem::new()),
        Box::new(GitCli::new()),
        Box::new(GitCli::new()),
        Box::new(TemplateRegistry::new()),
        Box::new(ExportArgsLoader::new()),
    )
    .with_registry(registry)
    .with_rules(rules)
    .with_branch(config.scaffold.branch.clone())
    .with_scratch_dir(config.scaffold.scratch_dir.clone()))
}

/// An unknown extension is not an error, but the user should hear about it
/// before the run rather than after.
fn warn_unknown_extension(
    service: &ScaffoldService,
    requested: Option<&str>,
    output: &OutputManager,
) -> CliResult<()> {
    let Some(flag) = requested.filter(|f| !f.trim().is_empty()) else {
        return Ok(());
    };
    if service.registry().find_by_flag(flag).is_some() {
        return Ok(());
    }
    let known = service.registry().flags();
    let hint = if known.is_empty() {
        "the registry is empty".to_string()
    } else {
        format!("known: {}", known.join(", "))
    };
    output.warning(&format!(
        "Extension '{flag}' is not in the registry ({hint}); continuing without it"
    ))?;
    Ok(())
}

fn run_tool<F>(output: &OutputManager, label: &str, step: F) -> CliResult<()>
where
    F: FnOnce() -> Result<(), StrataError>,
{
    let spinner = output.spinner(label);
    let result = step();
    spinner.finish_and_clear();
    match result {
        Ok(()) => {
            output.success(label)?;
            Ok(())
        }
        Err(e) => {
            output.error(&format!("{label} failed"))?;
            Err(CliError::ExternalCommandFailed {
                command: format!("{label} ({e})"),
                source: Some(Box::new(e)),
            })
        }
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_summary(report: &ScaffoldReport, out: &OutputManager) -> CliResult<()> {
    out.success(&format!("Workspace created at {}", report.target.display()))?;
    out.print(&format!(
        "  Base files:   {} copied, {} kept",
        report.base.copied_files, report.base.kept_existing
    ))?;
    if report.base.linked_files > 0 {
        out.print(&format!(
            "  Linked:       {} (dev mode, edits reach the template)",
            report.base.linked_files
        ))?;
    }
    for env in &report.base.seeded_env {
        out.print(&format!("  Seeded:       {env}"))?;
    }
    match &report.overlay {
        OverlayOutcome::Applied(overlay) => {
            out.print(&format!("  Extension:    {}", overlay.extension))?;
            if !overlay.merged_packages.is_empty() {
                out.print(&format!(
                    "  Merged into:  {}",
                    overlay.merged_packages.join(", ")
                ))?;
            }
            if !overlay.copied_packages.is_empty() {
                out.print(&format!(
                    "  Added:        {}",
                    overlay.copied_packages.join(", ")
                ))?;
            }
        }
        OverlayOutcome::Skipped(SkipReason::NotRequested) => {}
        OverlayOutcome::Skipped(reason) => {
            out.warning(&format!("Extension skipped: {reason}"))?;
        }
    }
    out.print(&format!("  Rendered:     {} templates", report.rendered.len()))?;
    Ok(())
}

fn show_next_steps(target: &Path, installed: bool, out: &OutputManager) -> CliResult<()> {
    out.print("")?;
    out.header("Next steps:")?;
    out.command(&format!("cd {}", display_relative(target).display()))?;
    if !installed {
        out.command("yarn install")?;
    }
    out.command("yarn start")?;
    Ok(())
}

/// Show `target` relative to the working directory when it is below it.
fn display_relative(target: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| target.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| target.to_path_buf())
}

fn report_json(report: &ScaffoldReport, installed: bool) -> serde_json::Value {
    let overlay = match &report.overlay {
        OverlayOutcome::Applied(o) => json!({
            "status": "applied",
            "extension": o.extension,
            "layout": o.layout,
            "packageInstalled": o.package_installed,
            "mergedPackages": o.merged_packages,
            "copiedPackages": o.copied_packages,
            "mergedManifests": o.merged_manifests,
            "rootManifestMerged": o.root_manifest_merged,
            "workspaceMemberAdded": o.workspace_member_added,
        }),
        OverlayOutcome::Skipped(reason) => json!({
            "status": "skipped",
            "reason": reason.to_string(),
        }),
    };
    json!({
        "runId": report.run_id.to_string(),
        "target": report.target.display().to_string(),
        "installed": installed,
        "base": {
            "copiedFiles": report.base.copied_files,
            "linkedFiles": report.base.linked_files,
            "keptExisting": report.base.kept_existing,
            "skipped": report.base.skipped,
            "seededEnv": report.base.seeded_env.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "mergedManifests": report.base.merged_manifests,
        },
        "overlay": overlay,
        "rendered": report.rendered.iter().map(|r| json!({
            "template": r.template.to_string(),
            "output": r.output.to_string(),
            "argsFiles": r.args_files.iter().map(ToString::to_string).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "removedMarkers": report.removed_markers,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use tempfile::TempDir;

    fn new_args(argv: &[&str]) -> NewArgs {
        let mut full = vec!["strata", "new"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::New(args) => args,
            other => panic!("expected New, got {other:?}"),
        }
    }

    #[test]
    fn directory_falls_back_to_config_default() {
        let options = resolve_options(&new_args(&[]), &AppConfig::default()).unwrap();
        assert!(options.directory.is_absolute());
        assert!(options.directory.ends_with("my-dapp-example"));
        assert!(options.install);
        assert!(!options.dev);
        assert!(options.extension.is_none());
    }

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        config.defaults.install = false;

        let options =
            resolve_options(&new_args(&["./x", "-i", "--dev", "-e", "foo-ext"]), &config).unwrap();

        assert!(options.directory.ends_with("x"));
        assert!(options.install);
        assert!(options.dev);
        assert_eq!(options.extension.as_deref(), Some("foo-ext"));
    }

    #[test]
    fn skip_install_beats_config_default() {
        let options = resolve_options(&new_args(&["-s"]), &AppConfig::default()).unwrap();
        assert!(!options.install);
    }

    #[test]
    fn empty_directory_argument_is_rejected() {
        let err = resolve_options(&new_args(&[""]), &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
    }

    #[test]
    fn missing_and_empty_targets_are_available() {
        let tmp = TempDir::new().unwrap();
        assert!(ensure_target_available(&tmp.path().join("new"), false).is_ok());
        assert!(ensure_target_available(tmp.path(), false).is_ok());
    }

    #[test]
    fn non_empty_target_needs_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("README.md"), "hi").unwrap();

        assert!(matches!(
            ensure_target_available(tmp.path(), false),
            Err(CliError::DirectoryNotEmpty { .. })
        ));
        assert!(ensure_target_available(tmp.path(), true).is_ok());
    }

    #[test]
    fn file_target_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(
            ensure_target_available(&file, true),
            Err(CliError::InvalidInput { .. })
        ));
    }

    #[test]
    fn bad_exclude_pattern_is_a_config_error() {
        let mut config = AppConfig::default();
        config.scaffold.exclude = vec!["(".into()];
        let err = build_service(&config).err().unwrap();
        assert_eq!(err.exit_code(), 4);
    }
}
