use crate::libs::utilities::download::DEFAULT_BASE_URL;
use clap::Parser;

/// Command line for the epm installer.
///
/// `epm-installer <password>` installs, `epm-installer --uninstall` removes.
#[derive(Parser, Debug)]
#[command(name = "epm-installer")]
#[command(about = "Install or uninstall epm.", long_about = None)]
pub struct Cli {
    /// Password to download epm. Required unless --uninstall is given.
    pub password: Option<String>,

    /// Uninstall epm instead of installing it.
    #[arg(long)]
    pub uninstall: bool,

    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long)]
    pub debug: bool,

    /// Base URL the epm script is downloaded from.
    #[arg(long, env = "EPM_INSTALL_URL", default_value = DEFAULT_BASE_URL, hide_env_values = true)]
    pub base_url: String,
}

/// The operation selected on the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Install { password: String },
    Uninstall,
}

impl Cli {
    /// Picks the action. `None` means an install was requested without a password.
    pub fn action(&self) -> Option<Action> {
        if self.uninstall {
            return Some(Action::Uninstall);
        }
        self.password
            .clone()
            .map(|password| Action::Install { password })
    }
}
