//! Implementation of the `strata extensions` command.

use strata_adapters::load_registry;
use strata_core::domain::Extension;

use crate::{
    cli::{ExtensionsArgs, ListFormat, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// List the extensions in the configured registry.
pub fn execute(args: ExtensionsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let path = config.registry_path();
    let registry = load_registry(&path);
    let extensions: Vec<&Extension> = registry.iter().collect();

    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Json => {
            let value = serde_json::to_value(&extensions).map_err(std::io::Error::other)?;
            output.json(&value)?;
        }
        ListFormat::List => {
            for ext in &extensions {
                output.print(&ext.flag_value)?;
            }
        }
        ListFormat::Table => {
            if extensions.is_empty() {
                output.info(&format!("No extensions registered in {}", path.display()))?;
                return Ok(());
            }
            output.header("Available extensions:")?;
            for line in table_rows(&extensions) {
                output.print(&line)?;
            }
        }
    }

    Ok(())
}

/// Aligned `flag  description  (repository#branch)` rows.
fn table_rows(extensions: &[&Extension]) -> Vec<String> {
    let width = extensions
        .iter()
        .map(|e| e.flag_value.len())
        .max()
        .unwrap_or(0);
    extensions
        .iter()
        .map(|e| {
            let description = if e.description.is_empty() {
                "-"
            } else {
                e.description.as_str()
            };
            format!(
                "  {:<width$}  {}  ({}#{})",
                e.flag_value, description, e.repository, e.branch
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_align_flags() {
        let a = Extension::new("foo-ext", "Foo dashboard", "https://x/foo.git", "main");
        let b = Extension::new("b", "", "https://x/b.git", "dev");

        let rows = table_rows(&[&a, &b]);

        assert_eq!(
            rows,
            vec![
                "  foo-ext  Foo dashboard  (https://x/foo.git#main)".to_string(),
                "  b        -  (https://x/b.git#dev)".to_string(),
            ]
        );
    }
}
