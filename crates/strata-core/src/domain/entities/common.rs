use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to be relative to some tree root.
///
/// Invariant: Never absolute. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if path is absolute (use `try_new` for fallible).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(
            !path.is_absolute(),
            "RelativePath cannot be absolute: {:?}",
            path
        );
        Self(path)
    }

    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() {
            Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            })
        } else {
            Ok(Self(path))
        }
    }

    /// The part of `path` below `root`.
    ///
    /// Used to carry a file discovered in one tree (the base template) over
    /// to the same position in another (the target workspace).
    pub fn within(root: &Path, path: &Path) -> Result<Self, DomainError> {
        path.strip_prefix(root)
            .map(|rel| Self(rel.to_path_buf()))
            .map_err(|_| DomainError::PathOutsideRoot {
                path: path.display().to_string(),
                root: root.display().to_string(),
            })
    }

    /// Join a segment, maintaining relative invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        let segment = segment.as_ref();
        if segment.is_absolute() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: segment.display().to_string(),
            });
        }
        Ok(Self(self.0.join(segment)))
    }

    /// Final component as UTF-8, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    /// Same directory, different final component.
    pub fn with_file_name(&self, name: &str) -> Self {
        Self(self.0.with_file_name(name))
    }

    /// Forward-slash rendering, independent of the host separator.
    ///
    /// Inclusion rules are written against this form so that
    /// `packages/nextjs/generated` matches on every platform.
    pub fn to_slash_string(&self) -> String {
        self.0
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_slash_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_strips_root() {
        let rel = RelativePath::within(
            Path::new("/tpl/base"),
            Path::new("/tpl/base/packages/nextjs/app.ts"),
        )
        .unwrap();
        assert_eq!(rel.to_slash_string(), "packages/nextjs/app.ts");
        assert_eq!(rel.file_name(), Some("app.ts"));
    }

    #[test]
    fn within_rejects_foreign_paths() {
        assert!(matches!(
            RelativePath::within(Path::new("/tpl/base"), Path::new("/elsewhere/x")),
            Err(DomainError::PathOutsideRoot { .. })
        ));
    }

    #[test]
    fn try_new_rejects_absolute() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("packages/x").is_ok());
    }

    #[test]
    fn with_file_name_keeps_directory() {
        let rel = RelativePath::new("packages/nextjs/foo.template.ts");
        assert_eq!(
            rel.with_file_name("foo.ts").to_slash_string(),
            "packages/nextjs/foo.ts"
        );
    }
}
