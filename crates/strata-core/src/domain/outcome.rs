use std::fmt;

/// Result of the extension overlay stage.
///
/// Failures are `Err` on the surrounding `Result`; this only covers the two
/// successful shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayOutcome {
    Skipped(SkipReason),
    Applied(OverlayReport),
}

impl OverlayOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn report(&self) -> Option<&OverlayReport> {
        match self {
            Self::Applied(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }
}

/// Why an overlay was not attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotRequested,
    BlankName,
    UnknownExtension(String),
    NoPackagesDir,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => write!(f, "no extension requested"),
            Self::BlankName => write!(f, "extension name is blank"),
            Self::UnknownExtension(flag) => write!(f, "extension '{flag}' is not in the registry"),
            Self::NoPackagesDir => write!(f, "target has no packages directory"),
        }
    }
}

/// What an applied overlay changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayReport {
    pub extension: String,
    /// Layout the extension's own package was found under, if any.
    pub layout: Option<&'static str>,
    /// Whether `packages/<flag>` was copied into the target.
    pub package_installed: bool,
    /// Sibling packages merged into existing target packages.
    pub merged_packages: Vec<String>,
    /// Sibling packages copied because the target lacked them.
    pub copied_packages: Vec<String>,
    /// Packages whose manifests were merged.
    pub merged_manifests: Vec<String>,
    pub root_manifest_merged: bool,
    pub workspace_member_added: bool,
}
