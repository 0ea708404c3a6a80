//! # Platform Context
//!
//! The handful of host facts the installer branches on: whether we run as root,
//! which shell launched us, and where the user's home directory is.
//!
//! These are captured once by [`PlatformContext::detect`] in the command layer and
//! passed down explicitly, so the install and uninstall logic never reads global
//! process state on its own. Tests build contexts by hand instead.

use crate::error::{InstallError, Result};
use crate::log_debug;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// The shells whose rc files we know how to edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellKind {
    Bash,
    Zsh,
    /// Anything else, including an unset `$SHELL`. Holds the raw value for logging.
    Unrecognized(String),
}

impl ShellKind {
    /// Classifies the value of `$SHELL`.
    ///
    /// Only the final path component is inspected, so `/usr/local/bin/zsh` and
    /// `/bin/bash` are recognized while a directory named `zsh-stuff/bin/fish` is not.
    pub fn from_shell_var(value: Option<&str>) -> Self {
        let raw = value.unwrap_or("");
        let name = Path::new(raw)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(raw);

        if name.contains("zsh") {
            ShellKind::Zsh
        } else if name.contains("bash") {
            ShellKind::Bash
        } else {
            ShellKind::Unrecognized(raw.to_string())
        }
    }

    /// File name of the rc file for this shell, or `None` for unrecognized shells.
    pub fn rc_file_name(&self) -> Option<&'static str> {
        match self {
            ShellKind::Bash => Some(".bashrc"),
            ShellKind::Zsh => Some(".zshrc"),
            ShellKind::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellKind::Bash => write!(f, "bash"),
            ShellKind::Zsh => write!(f, "zsh"),
            ShellKind::Unrecognized(raw) if raw.is_empty() => write!(f, "<unset>"),
            ShellKind::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// Host facts captured once per run and handed to the install and uninstall logic.
#[derive(Debug, Clone)]
pub struct PlatformContext {
    /// `true` when the effective uid is 0.
    pub privileged: bool,
    /// Shell from `$SHELL`; picks the rc file.
    pub shell: ShellKind,
    /// Home directory of the invoking user.
    pub home: PathBuf,
}

impl PlatformContext {
    /// Reads the effective uid, `$SHELL` and the home directory of the running process.
    pub fn detect() -> Result<Self> {
        let privileged = nix::unistd::geteuid().is_root();
        let shell = ShellKind::from_shell_var(env::var("SHELL").ok().as_deref());
        let home = dirs::home_dir().ok_or(InstallError::HomeDirUnavailable)?;

        log_debug!(
            "[EPM::Platform] privileged={}, shell={}, home={}",
            privileged,
            shell,
            home.display()
        );

        Ok(PlatformContext {
            privileged,
            shell,
            home,
        })
    }

    /// Path of the rc file we would edit, or `None` when the shell is unrecognized.
    pub fn rc_file(&self) -> Option<PathBuf> {
        self.shell.rc_file_name().map(|name| self.home.join(name))
    }
}
