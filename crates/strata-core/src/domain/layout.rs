//! Directory conventions an extension repository may follow.

use std::path::{Path, PathBuf};

/// Where an extension keeps its packages and its root manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionLayout {
    pub name: &'static str,
    pub packages_dir: &'static str,
    pub root_manifest: &'static str,
}

impl ExtensionLayout {
    pub fn packages_root(&self, checkout: &Path) -> PathBuf {
        checkout.join(self.packages_dir)
    }

    pub fn package_dir(&self, checkout: &Path, package: &str) -> PathBuf {
        self.packages_root(checkout).join(package)
    }

    pub fn root_manifest_path(&self, checkout: &Path) -> PathBuf {
        checkout.join(self.root_manifest)
    }
}

/// Layouts in probe order; the first match wins.
pub const EXTENSION_LAYOUTS: [ExtensionLayout; 2] = [
    ExtensionLayout {
        name: "standard",
        packages_dir: "packages",
        root_manifest: "package.json",
    },
    ExtensionLayout {
        name: "nested",
        packages_dir: "extensions/packages",
        root_manifest: "extensions/package.json",
    },
];

/// First layout whose path (chosen by `select`) satisfies `exists`.
pub fn probe<F, E>(checkout: &Path, select: F, exists: E) -> Option<(ExtensionLayout, PathBuf)>
where
    F: Fn(&ExtensionLayout, &Path) -> PathBuf,
    E: Fn(&Path) -> bool,
{
    EXTENSION_LAYOUTS.iter().find_map(|layout| {
        let candidate = select(layout, checkout);
        exists(&candidate).then(|| (*layout, candidate))
    })
}
