// ============================================================================
// domain/rules.rs - BASE COPY INCLUSION RULES
// ============================================================================

use regex::Regex;

use super::entities::{manifest::MANIFEST_FILE, RelativePath};
use crate::domain::error::DomainError;

/// Exclude patterns applied when no configuration overrides them.
pub const DEFAULT_EXCLUDES: [&str; 3] = [r"\.github/", r"CHANGELOG\.md", r"__test.*__"];

/// Placeholder that keeps empty directories in the base tree.
pub const PLACEHOLDER_FILE: &str = ".gitkeep";

/// Environment-specific generated output, copied only in dev mode. File
/// names match at any depth.
const DEV_ONLY_FILE_NAMES: [&str; 1] = ["yarn.lock"];
const DEV_ONLY_DIRS: [&str; 1] = ["packages/nextjs/generated"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyDecision {
    Copy,
    Skip(SkipCause),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipCause {
    /// Manifests are merged, not copied.
    Manifest,
    Placeholder,
    Excluded { pattern: String },
    DevOnly,
}

/// Decides which base template files reach the target.
///
/// Rules are evaluated against the forward-slash relative path.
#[derive(Debug, Clone)]
pub struct CopyRules {
    excludes: Vec<Regex>,
}

impl CopyRules {
    /// The default exclude set.
    pub fn standard() -> Self {
        let excludes = DEFAULT_EXCLUDES
            .iter()
            .map(|p| Regex::new(p).expect("built-in exclude pattern"))
            .collect();
        Self { excludes }
    }

    /// Defaults plus `extra`.
    pub fn with_excludes<I, S>(extra: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self::standard();
        for pattern in extra {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
            rules.excludes.push(regex);
        }
        Ok(rules)
    }

    pub fn decide(&self, path: &RelativePath, dev: bool) -> CopyDecision {
        match path.file_name() {
            Some(MANIFEST_FILE) => return CopyDecision::Skip(SkipCause::Manifest),
            Some(PLACEHOLDER_FILE) => return CopyDecision::Skip(SkipCause::Placeholder),
            _ => {}
        }

        if let Some(pattern) = self.excluded_by(path) {
            return CopyDecision::Skip(SkipCause::Excluded {
                pattern: pattern.to_string(),
            });
        }

        if !dev && Self::is_generated(path) {
            return CopyDecision::Skip(SkipCause::DevOnly);
        }

        CopyDecision::Copy
    }

    /// First exclude pattern matching `path`.
    pub fn excluded_by(&self, path: &RelativePath) -> Option<&str> {
        let slash = path.to_slash_string();
        self.excludes
            .iter()
            .find(|r| r.is_match(&slash))
            .map(Regex::as_str)
    }

    /// Generated output that dev mode copies verbatim.
    pub fn is_generated(path: &RelativePath) -> bool {
        if path
            .file_name()
            .is_some_and(|name| DEV_ONLY_FILE_NAMES.contains(&name))
        {
            return true;
        }
        let slash = path.to_slash_string();
        DEV_ONLY_DIRS
            .iter()
            .any(|dir| slash.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/')))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.excludes.iter().map(Regex::as_str)
    }
}

impl Default for CopyRules {
    fn default() -> Self {
        Self::standard()
    }
}
