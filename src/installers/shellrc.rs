// Adds and removes the PATH export block in the user's shell rc file.
// The text manipulation lives in `libs::rc_markers`; this module only decides
// which file to touch and does the reading and writing.

use crate::error::Result;
use crate::libs::rc_markers::{MarkerPair, apply_marker, remove_marker};
use crate::libs::utilities::file_operations::{read_text_or_empty, write_text};
use crate::schemas::platform_context::PlatformContext;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Outcome of a PATH registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RcUpdate {
    /// The export block was appended to this file.
    Added(PathBuf),
    /// The export line was already present in this file.
    AlreadyPresent(PathBuf),
    /// Shell not recognized; no rc file was read or written.
    Skipped,
}

impl RcUpdate {
    /// The rc file that was selected, if any.
    pub fn rc_file(&self) -> Option<&Path> {
        match self {
            RcUpdate::Added(path) | RcUpdate::AlreadyPresent(path) => Some(path),
            RcUpdate::Skipped => None,
        }
    }
}

/// Makes sure the rc file of the invoking shell exports `bin_dir` on `PATH`.
///
/// # Arguments
/// * `platform`: supplies the shell kind and home directory that pick the rc file.
/// * `bin_dir`: directory to put in front of `$PATH`.
///
/// # Returns
/// * `Ok(RcUpdate)` saying whether the block was added, already there, or skipped
///   because the shell is not bash or zsh.
/// * `Err(InstallError::Filesystem)` if the rc file cannot be read or written.
pub fn register_path(platform: &PlatformContext, bin_dir: &Path) -> Result<RcUpdate> {
    let Some(rc_path) = platform.rc_file() else {
        log_debug!(
            "[EPM::ShellRc] Shell '{}' is not bash or zsh; not touching any rc file",
            platform.shell
        );
        return Ok(RcUpdate::Skipped);
    };

    let pair = MarkerPair::for_bin_dir(bin_dir);
    let existing = read_text_or_empty(&rc_path)?;
    let updated = apply_marker(&existing, &pair);

    if updated == existing {
        log_debug!(
            "[EPM::ShellRc] {} already exports {}",
            rc_path.display(),
            bin_dir.display()
        );
        return Ok(RcUpdate::AlreadyPresent(rc_path));
    }

    log_info!(
        "[EPM::ShellRc] Adding PATH export to {}",
        rc_path.display().to_string().cyan()
    );
    write_text(&rc_path, &updated)?;
    Ok(RcUpdate::Added(rc_path))
}

/// Removes the export block for `bin_dir` from the invoking shell's rc file.
///
/// Returns `true` when the file was rewritten. Missing rc files and
/// unrecognized shells are a no-op.
pub fn unregister_path(platform: &PlatformContext, bin_dir: &Path) -> Result<bool> {
    let Some(rc_path) = platform.rc_file() else {
        log_debug!(
            "[EPM::ShellRc] Shell '{}' is not bash or zsh; nothing to clean",
            platform.shell
        );
        return Ok(false);
    };
    if !rc_path.exists() {
        log_debug!("[EPM::ShellRc] {} does not exist; nothing to clean", rc_path.display());
        return Ok(false);
    }

    let pair = MarkerPair::for_bin_dir(bin_dir);
    let existing = read_text_or_empty(&rc_path)?;
    let cleaned = remove_marker(&existing, &pair);

    if cleaned == existing {
        log_debug!("[EPM::ShellRc] No epm PATH export found in {}", rc_path.display());
        return Ok(false);
    }

    write_text(&rc_path, &cleaned)?;
    log_info!(
        "[EPM::ShellRc] Cleaned PATH export from {}",
        rc_path.display().to_string().cyan()
    );
    Ok(true)
}
