mod cli;
mod commands;
mod error;
mod installers;
mod libs;
mod logger;
mod schemas;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use cli::cmd_enums::{Action, Cli};
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);

    let Some(action) = cli.action() else {
        // clap's own usage errors exit with 2; a missing password must exit with 1.
        let err = Cli::command().error(
            clap::error::ErrorKind::MissingRequiredArgument,
            "Password is required for installation",
        );
        let _ = err.print();
        return ExitCode::from(1);
    };

    match run(action, &cli.base_url) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            crate::log_error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Runs the selected action and prints a one-line summary of what changed.
fn run(action: Action, base_url: &str) -> anyhow::Result<()> {
    match action {
        Action::Install { password } => {
            let report =
                commands::install::run(&password, base_url).context("Installation failed")?;
            // Root installs have no rc file and no wrapper to report on.
            let rc_file = report
                .rc_update
                .as_ref()
                .and_then(|update| update.rc_file())
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "none".to_string());
            crate::log_info!(
                "[EPM::Main] epm is available at {} (rc file: {}, sudo wrapper: {})",
                report.target_path.display().to_string().green(),
                rc_file,
                if report.wrapper_installed { "yes" } else { "no" }
            );
        }
        Action::Uninstall => {
            let report = commands::uninstall::run().context("Uninstall failed")?;
            crate::log_info!(
                "[EPM::Main] Binary removed: {}, PATH export removed: {}",
                if report.removed_artifact { "yes" } else { "no" },
                if report.rc_cleaned { "yes" } else { "no" }
            );
        }
    }
    Ok(())
}
