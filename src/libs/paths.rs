// Resolves where `epm` lives on disk for a given platform context.
// Root installs go straight into the system bin directory; everyone else gets
// `~/.local/bin` plus a forwarding wrapper in the system bin directory.

use crate::log_debug;
use crate::schemas::platform_context::PlatformContext;
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};

/// Name of the installed command.
pub const ARTIFACT_NAME: &str = "epm";

/// Bin directory used for privileged installs and for the sudo wrapper.
pub const SYSTEM_BIN_DIR: &str = "/usr/local/bin";

/// All filesystem locations an install or uninstall touches (apart from the rc file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// Directory that receives the artifact; also the directory exported on `PATH`.
    pub target_dir: PathBuf,
    /// `target_dir/epm`.
    pub target_path: PathBuf,
    /// Where the forwarding wrapper is written for unprivileged installs.
    pub wrapper_path: PathBuf,
    /// Parent of the temporary download directory. Defaults to the system temp dir.
    pub scratch_dir: PathBuf,
}

impl InstallLayout {
    /// Builds a layout whose artifact is `target_dir/epm`.
    ///
    /// # Arguments
    /// * `target_dir`: directory that receives `epm`.
    /// * `wrapper_path`: full path of the sudo wrapper.
    ///
    /// Downloads are staged under the system temp dir until `scratch_dir` is changed.
    pub fn new(target_dir: impl Into<PathBuf>, wrapper_path: impl Into<PathBuf>) -> Self {
        let target_dir = target_dir.into();
        let target_path = target_dir.join(ARTIFACT_NAME);
        InstallLayout {
            target_dir,
            target_path,
            wrapper_path: wrapper_path.into(),
            scratch_dir: env::temp_dir(),
        }
    }

    /// The standard layout: `/usr/local/bin` for root, `~/.local/bin` otherwise.
    pub fn for_platform(platform: &PlatformContext) -> Self {
        let target_dir = if platform.privileged {
            PathBuf::from(SYSTEM_BIN_DIR)
        } else {
            platform.home.join(".local").join("bin")
        };
        let layout = InstallLayout::new(target_dir, Path::new(SYSTEM_BIN_DIR).join(ARTIFACT_NAME));

        log_debug!(
            "[EPM::Paths] Target: {}, wrapper: {}",
            layout.target_path.display().to_string().cyan(),
            layout.wrapper_path.display().to_string().yellow()
        );
        layout
    }
}
