//! Args file parsing.
//!
//! An args file is either a JSON object document:
//!
//! ```json
//! { "title": "My dApp", "menuItems": [] }
//! ```
//!
//! or a module of exported constants whose initialisers are JSON values:
//!
//! ```ts
//! export const title = "My dApp";
//! export const menuItems = [{ "label": "Debug", "href": "/debug" }];
//! ```
//!
//! `export default { ... }` with a JSON object body contributes its keys too.
//! Later declarations override earlier ones.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use strata_core::{
    application::{ApplicationError, ports::ArgsLoader},
    domain::RenderArgs,
    error::StrataResult,
};

/// Parses JSON documents and `export const` modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportArgsLoader;

impl ExportArgsLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ArgsLoader for ExportArgsLoader {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn load(&self, path: &Path, content: &str) -> StrataResult<RenderArgs> {
        parse_args(content).map_err(|reason| {
            ApplicationError::ArgsLoadFailed {
                path: path.to_path_buf(),
                reason,
            }
            .into()
        })
    }
}

fn declaration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?m)^[ \t]*export[ \t]+(?:const[ \t]+([A-Za-z_$][A-Za-z0-9_$]*)(?:[ \t]*:[^=\n]+)?[ \t]*=|default)[ \t]*",
        )
        .expect("declaration pattern is valid")
    })
}

/// Parse args file content into render arguments.
pub fn parse_args(content: &str) -> Result<RenderArgs, String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(RenderArgs::new());
    }
    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return RenderArgs::from_value(value).map_err(|e| e.to_string());
        }
    }

    let mut args = RenderArgs::new();
    let mut found = false;
    for caps in declaration_pattern().captures_iter(content) {
        found = true;
        let Some(whole) = caps.get(0) else { continue };
        let value = leading_json_value(&content[whole.end()..])?;

        match caps.get(1) {
            Some(name) => {
                debug!(name = name.as_str(), "Loaded export");
                args.insert(name.as_str(), value);
            }
            None => {
                let defaults = RenderArgs::from_value(value)
                    .map_err(|e| format!("export default: {e}"))?;
                args.merge(defaults);
            }
        }
    }

    if found {
        Ok(args)
    } else {
        Err("expected a JSON object or `export const` declarations".into())
    }
}

/// The first JSON value at the start of `input`; trailing text is ignored.
fn leading_json_value(input: &str) -> Result<Value, String> {
    let mut de = serde_json::Deserializer::from_str(input);
    Value::deserialize(&mut de).map_err(|e| format!("initialiser is not JSON: {e}"))
}
