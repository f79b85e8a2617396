//! Git adapter using the system `git` binary.

use std::path::Path;
use tracing::{info, instrument};

use strata_core::{
    application::{
        ApplicationError,
        ports::{ExtensionFetcher, VersionControl},
    },
    domain::Extension,
    error::StrataResult,
};

use crate::process;

/// Shells out to `git`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: "git".into(),
        }
    }

    /// Use a different executable, e.g. an absolute path.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Stage everything and record the first commit.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn commit_all(&self, dir: &Path, message: &str) -> StrataResult<()> {
        self.run(dir, &["add", "-A"])?;
        self.run(dir, &["commit", "-m", message, "--no-verify"])?;
        info!("Created initial commit");
        Ok(())
    }

    fn run(&self, dir: &Path, args: &[&str]) -> StrataResult<String> {
        process::run(&self.program, args, dir).map_err(|reason| {
            ApplicationError::CommandFailed {
                command: process::display(&self.program, args),
                reason,
            }
            .into()
        })
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionFetcher for GitCli {
    /// Shallow, single-branch clone into `dest`.
    #[instrument(skip_all, fields(repository = %extension.repository, branch = %extension.branch))]
    fn fetch(&self, extension: &Extension, dest: &Path) -> StrataResult<()> {
        let dest_str = dest.to_string_lossy();
        let args = [
            "clone",
            "--branch",
            extension.branch.as_str(),
            "--single-branch",
            "--depth",
            "1",
            extension.repository.as_str(),
            &*dest_str,
        ];
        let cwd = dest.parent().unwrap_or(dest);

        process::run(&self.program, &args, cwd).map_err(|reason| ApplicationError::FetchFailed {
            repository: extension.repository.clone(),
            branch: extension.branch.clone(),
            reason,
        })?;
        info!("Extension cloned");
        Ok(())
    }
}

impl VersionControl for GitCli {
    fn init(&self, dir: &Path) -> StrataResult<()> {
        self.run(dir, &["init"]).map(|_| ())
    }

    fn create_branch(&self, dir: &Path, branch: &str) -> StrataResult<()> {
        self.run(dir, &["checkout", "-b", branch]).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_binary_is_a_command_failure() {
        let tmp = TempDir::new().unwrap();
        let git = GitCli::with_program("strata-no-such-git");
        let err = git.init(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("strata-no-such-git init"));
    }

    #[test]
    fn failed_clone_is_a_fetch_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("checkout");
        std::fs::create_dir_all(&dest).unwrap();
        let ext = Extension::new("x", "", "/nonexistent/repo.git", "main");

        let err = GitCli::with_program("strata-no-such-git")
            .fetch(&ext, &dest)
            .unwrap_err();

        assert!(err.is_retryable());
    }
}
