//! # Uninstall Command
//!
//! Removes the installed `epm` for the current privilege level and, for non-root
//! users, takes the PATH export block back out of the shell rc file.
//! Running it when nothing is installed is fine; it just reports the absence.

use crate::error::{InstallError, Result};
use crate::installers::shellrc::unregister_path;
use crate::libs::paths::InstallLayout;
use crate::log_info;
use crate::schemas::platform_context::PlatformContext;
use colored::Colorize;
use std::fs;
use std::io;

/// What an uninstall actually removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UninstallReport {
    /// `epm` existed at the target path and was deleted.
    pub removed_artifact: bool,
    /// The PATH export block was found in the rc file and taken out.
    pub rc_cleaned: bool,
}

/// Uninstalls epm for the current process, detecting privilege level, shell and home directory.
///
/// # Returns
/// * `Ok(UninstallReport)` describing what was removed (possibly nothing).
/// * `Err(InstallError)` if the platform cannot be detected or a file cannot be removed or rewritten.
pub fn run() -> Result<UninstallReport> {
    let platform = PlatformContext::detect()?;
    let layout = InstallLayout::for_platform(&platform);
    uninstall_with(&platform, &layout)
}

/// Removes the artifact described by `layout` and, for non-root users, the rc file block.
///
/// # Arguments
/// * `platform`: privilege level, shell and home directory to act for.
/// * `layout`: where the artifact was installed; `layout.target_dir` is the exported PATH entry.
///
/// # Returns
/// * `Ok(UninstallReport)`; a missing artifact or rc block is reported, not an error.
/// * `Err(InstallError::Filesystem)` when an existing file cannot be removed or rewritten.
pub fn uninstall_with(platform: &PlatformContext, layout: &InstallLayout) -> Result<UninstallReport> {
    let target = &layout.target_path;

    let removed_artifact = match fs::remove_file(target) {
        Ok(()) => {
            log_info!("[EPM::Uninstall] Removed {}", target.display().to_string().cyan());
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log_info!(
                "[EPM::Uninstall] No epm binary found at {}",
                target.display().to_string().yellow()
            );
            false
        }
        Err(e) => return Err(InstallError::fs("remove", target, e)),
    };

    // The sudo wrapper in the system bin dir is left in place; removing it would need sudo again.
    let rc_cleaned = if platform.privileged {
        false
    } else {
        unregister_path(platform, &layout.target_dir)?
    };

    log_info!("[EPM::Uninstall] Uninstall complete.");
    Ok(UninstallReport {
        removed_artifact,
        rc_cleaned,
    })
}
