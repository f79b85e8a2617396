// ============================================================================
// domain/entities/template.rs - DEFERRED TEMPLATE FILES
// ============================================================================

//! Placeholder files that are rendered after the extension overlay.
//!
//! A template file carries a `.template.` infix in its name:
//! `foo.template.ts` renders to `foo.ts`, and its arguments live in the
//! sibling `foo.args.ts`. Only file names are inspected; directories with
//! the infix in their name are ordinary directories.

use std::path::{Path, PathBuf};

use super::common::RelativePath;
use crate::domain::error::DomainError;

/// Infix marking a file as a deferred template.
pub const TEMPLATE_MARKER: &str = ".template.";

/// Infix marking a file as render arguments for a template.
pub const ARGS_MARKER: &str = ".args.";

/// Suffix appended to rendered output for the dev-mode diagnostics sidecar.
pub const DEV_SIDECAR_SUFFIX: &str = ".dev";

pub fn is_template_file(name: &str) -> bool {
    TemplateName::parse(name).is_some()
}

pub fn is_args_file(name: &str) -> bool {
    split_marker(name, ARGS_MARKER).is_some()
}

/// `stem<marker>ext` with a non-empty stem and extension.
fn split_marker<'a>(name: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    let idx = name.find(marker)?;
    let stem = &name[..idx];
    let ext = &name[idx + marker.len()..];
    (!stem.is_empty() && !ext.is_empty()).then_some((stem, ext))
}

/// Parsed `<stem>.template.<ext>` file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateName {
    stem: String,
    extension: String,
}

impl TemplateName {
    pub fn parse(file_name: &str) -> Option<Self> {
        split_marker(file_name, TEMPLATE_MARKER).map(|(stem, ext)| Self {
            stem: stem.to_string(),
            extension: ext.to_string(),
        })
    }

    /// `foo.template.ts` -> `foo.ts`
    pub fn output_name(&self) -> String {
        format!("{}.{}", self.stem, self.extension)
    }

    /// `foo.template.ts` -> `foo.args.ts`
    pub fn args_name(&self) -> String {
        format!("{}{}{}", self.stem, ARGS_MARKER, self.extension)
    }
}

/// Where a template was discovered.
///
/// Only the base template tree is scanned; extension-supplied placeholders
/// are not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOrigin {
    Base,
}

/// One discovered template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    /// Absolute path of the template inside the base tree.
    pub source_path: PathBuf,
    /// Path relative to the base root; also the render function key.
    pub relative_path: RelativePath,
    /// Output file name with the marker removed.
    pub target_name: String,
    pub origin: TemplateOrigin,
    name: TemplateName,
}

impl TemplateDescriptor {
    /// Describe `source_path`, found under `base_root`.
    pub fn from_base(base_root: &Path, source_path: &Path) -> Result<Self, DomainError> {
        let relative_path = RelativePath::within(base_root, source_path)?;
        let name = relative_path
            .file_name()
            .and_then(TemplateName::parse)
            .ok_or_else(|| DomainError::NotATemplate {
                path: source_path.display().to_string(),
            })?;

        Ok(Self {
            source_path: source_path.to_path_buf(),
            target_name: name.output_name(),
            relative_path,
            origin: TemplateOrigin::Base,
            name,
        })
    }

    /// Where the rendered file goes, relative to the target root.
    pub fn rendered_relative_path(&self) -> RelativePath {
        self.relative_path.with_file_name(&self.target_name)
    }

    /// Where an extension would have placed this template's args file,
    /// relative to the target root.
    pub fn args_relative_path(&self) -> RelativePath {
        self.relative_path.with_file_name(&self.name.args_name())
    }

    pub fn key(&self) -> String {
        self.relative_path.to_slash_string()
    }
}
