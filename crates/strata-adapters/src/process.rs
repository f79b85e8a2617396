//! External command execution shared by the git and package manager adapters.

use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Run `program args...` in `dir`, capturing output.
///
/// `Err` carries a one-line reason: the spawn error, or the exit status
/// followed by trimmed stderr.
pub(crate) fn run(program: &str, args: &[&str], dir: &Path) -> Result<String, String> {
    debug!(%program, ?args, dir = %dir.display(), "Running command");
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| format!("could not start `{program}`: {e}"))?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    Err(if stderr.is_empty() {
        output.status.to_string()
    } else {
        format!("{}: {}", output.status, stderr)
    })
}

/// `program arg arg` for error messages.
pub(crate) fn display(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
