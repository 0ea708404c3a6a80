// Small filesystem helpers used by the installer: shebang patching, the executable
// bit, moving the artifact into place and reading/writing rc files.

use crate::error::{InstallError, Result};
use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Interpreter line prepended to downloads that do not carry one.
pub const DEFAULT_SHEBANG: &str = "#!/usr/bin/env python3\n";

/// What [`ensure_interpreter_header`] did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOutcome {
    AlreadyPresent,
    Prepended,
    /// Not UTF-8 text, so the file was left alone.
    SkippedBinary,
}

/// Makes sure `path` starts with an interpreter directive (`#!`).
///
/// Files that already start with `#!` are untouched. Files that are not valid
/// UTF-8 are treated as binaries and also left untouched, so they are never corrupted.
pub fn ensure_interpreter_header(path: &Path) -> Result<HeaderOutcome> {
    let bytes = fs::read(path).map_err(|e| InstallError::fs("read", path, e))?;

    if bytes.starts_with(b"#!") {
        log_debug!("[EPM::Files] {} already has an interpreter line", path.display());
        return Ok(HeaderOutcome::AlreadyPresent);
    }

    if std::str::from_utf8(&bytes).is_err() {
        log_warn!(
            "[EPM::Files] {} is not UTF-8 text; leaving its header untouched",
            path.display().to_string().yellow()
        );
        return Ok(HeaderOutcome::SkippedBinary);
    }

    let mut patched = Vec::with_capacity(DEFAULT_SHEBANG.len() + bytes.len());
    patched.extend_from_slice(DEFAULT_SHEBANG.as_bytes());
    patched.extend_from_slice(&bytes);
    fs::write(path, patched).map_err(|e| InstallError::fs("write", path, e))?;

    log_debug!("[EPM::Files] Prepended interpreter line to {}", path.display());
    Ok(HeaderOutcome::Prepended)
}

/// Adds the owner/group/other execute bits, keeping every other permission bit.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| InstallError::fs("stat", path, e))?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions).map_err(|e| InstallError::fs("chmod", path, e))?;
    log_debug!("[EPM::Files] Marked {} executable", path.display());
    Ok(())
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Moves `from` to `to`, replacing whatever is at `to`.
///
/// Tries a rename first. When that fails (typically because the temp dir is on a
/// different filesystem) the file is copied and the source removed.
pub fn move_into_place(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => {
            log_debug!("[EPM::Files] Renamed {} -> {}", from.display(), to.display());
            Ok(())
        }
        Err(e) => {
            log_debug!(
                "[EPM::Files] Rename {} -> {} failed ({}); falling back to copy",
                from.display(),
                to.display(),
                e
            );
            copy_then_remove(from, to)
        }
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> Result<()> {
    // Unlink first so a running `epm` keeps its old inode instead of being overwritten in place.
    match fs::remove_file(to) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(InstallError::fs("replace", to, e)),
    }
    fs::copy(from, to).map_err(|e| InstallError::fs("copy to", to, e))?;
    fs::remove_file(from).map_err(|e| InstallError::fs("remove", from, e))?;
    Ok(())
}

/// Reads a text file, treating a missing file as empty.
///
/// # Arguments
/// * `path`: the file to read, typically a shell rc file.
///
/// # Returns
/// * `Ok(String)` with the content, or an empty string if the file does not exist.
/// * `Err(InstallError::Filesystem)` for any other read error (permissions, invalid UTF-8).
pub fn read_text_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(InstallError::fs("read", path, e)),
    }
}

/// Replaces the content of `path` with `content`, creating the file if needed.
///
/// # Returns
/// * `Err(InstallError::Filesystem)` naming `path` if the write fails.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| InstallError::fs("write", path, e))
}
