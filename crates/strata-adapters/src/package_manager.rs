//! Package manager invocation for the post-scaffold install step.

use std::path::Path;
use tracing::{info, instrument};

use strata_core::{application::ApplicationError, error::StrataResult};

use crate::process;

/// Runs `yarn` (or a compatible binary) in a workspace.
#[derive(Debug, Clone)]
pub struct PackageManager {
    program: String,
}

impl PackageManager {
    pub fn yarn() -> Self {
        Self::with_program("yarn")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn install(&self, dir: &Path) -> StrataResult<()> {
        self.run(dir, &["install"])?;
        info!("Dependencies installed");
        Ok(())
    }

    /// Run the workspace's `format` script.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn format(&self, dir: &Path) -> StrataResult<()> {
        self.run(dir, &["format"])?;
        info!("Workspace formatted");
        Ok(())
    }

    fn run(&self, dir: &Path, args: &[&str]) -> StrataResult<()> {
        process::run(&self.program, args, dir)
            .map(|_| ())
            .map_err(|reason| {
                ApplicationError::CommandFailed {
                    command: process::display(&self.program, args),
                    reason,
                }
                .into()
            })
    }
}

impl Default for PackageManager {
    fn default() -> Self {
        Self::yarn()
    }
}
