//! # Privileged Writer
//!
//! Writing into `/usr/local/bin` from an unprivileged install needs an escalation
//! helper. The installer only ever needs one capability from it, so that is all
//! [`PrivilegedWriter`] exposes. [`SudoWriter`] is the real implementation; the tests
//! substitute an in-memory recorder.

use crate::error::{InstallError, Result};
use crate::log_debug;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Escalation helper used when none is configured.
pub const DEFAULT_HELPER: &str = "sudo";

pub trait PrivilegedWriter {
    /// Writes `contents` to `path` and marks the file executable.
    fn write_executable(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Writes through `<helper> tee <path>` and then runs `<helper> chmod +x <path>`.
///
/// The helper is `sudo` in production. It may prompt on the terminal; stdin of
/// `tee` is the script, not the tty.
#[derive(Debug, Clone)]
pub struct SudoWriter {
    /// Program that runs `tee`/`chmod` with elevated privileges.
    pub program: PathBuf,
}

impl Default for SudoWriter {
    fn default() -> Self {
        SudoWriter::with_program(DEFAULT_HELPER)
    }
}

impl SudoWriter {
    /// Uses `program` instead of `sudo` as the escalation helper.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        SudoWriter {
            program: program.into(),
        }
    }

    /// Pipes `contents` into `<helper> tee <path>`, discarding tee's stdout.
    ///
    /// # Returns
    /// * `Ok(())` when the helper exits successfully.
    /// * `Err(InstallError::Privileged)` carrying the helper's stderr otherwise.
    fn tee(&self, path: &Path, contents: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .arg("tee")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(path, e))?;

        // Dropping stdin after the write closes the pipe so `tee` can exit.
        // A helper that refuses early closes its end first, so its exit status wins over a broken pipe.
        let piped = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(contents.as_bytes()),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| privileged(path, format!("{} tee did not finish: {e}", self.name())))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(privileged(
                path,
                format!("{} tee failed: {}", self.name(), stderr.trim()),
            ));
        }
        piped.map_err(|e| {
            privileged(path, format!("could not pipe script to {} tee: {e}", self.name()))
        })
    }

    /// Runs `<helper> chmod +x <path>`.
    fn chmod_executable(&self, path: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("chmod")
            .arg("+x")
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.spawn_error(path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(privileged(
                path,
                format!("{} chmod failed: {}", self.name(), stderr.trim()),
            ));
        }
        Ok(())
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }

    fn spawn_error(&self, path: &Path, e: std::io::Error) -> InstallError {
        privileged(path, format!("could not start {}: {e}", self.name()))
    }
}

impl PrivilegedWriter for SudoWriter {
    fn write_executable(&self, path: &Path, contents: &str) -> Result<()> {
        log_debug!(
            "[EPM::Sudo] Writing {} bytes to {} via {}",
            contents.len(),
            path.display().to_string().yellow(),
            self.name()
        );
        self.tee(path, contents)?;
        self.chmod_executable(path)
    }
}

fn privileged(path: &Path, reason: String) -> InstallError {
    InstallError::Privileged {
        path: path.to_path_buf(),
        reason,
    }
}

/// The forwarding script placed at the wrapper path for unprivileged installs.
///
/// # Arguments
/// * `real_target`: the installed `epm` the wrapper should exec.
///
/// # Returns
/// * A bash script that execs `real_target` with every argument forwarded.
pub fn wrapper_script(real_target: &Path) -> String {
    format!(
        "#!/usr/bin/env bash\nexec \"{}\" \"$@\"\n",
        real_target.display()
    )
}
