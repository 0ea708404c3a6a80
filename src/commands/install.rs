//! # Install Command
//!
//! Downloads the epm script, makes it executable and moves it into the target
//! directory. For non-root users it also puts `~/.local/bin` on `PATH` and drops a
//! forwarding wrapper into `/usr/local/bin` so `sudo epm` keeps working.
//!
//! The download lands in a scoped temporary directory that is removed whenever
//! [`install_with`] returns, whether it succeeded or not. Nothing outside the
//! target directory is touched before the download has succeeded.

use crate::error::{InstallError, Result};
use crate::installers::shellrc::{RcUpdate, register_path};
use crate::libs::paths::InstallLayout;
use crate::libs::privileged_writer::{PrivilegedWriter, SudoWriter, wrapper_script};
use crate::libs::utilities::download::download_artifact;
use crate::libs::utilities::file_operations::{
    ensure_interpreter_header, make_executable, move_into_place,
};
use crate::schemas::platform_context::PlatformContext;
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Name of the downloaded file inside the temporary directory.
const DOWNLOAD_FILE_NAME: &str = "epm.py";

/// What an install changed, mostly for the tests and the final summary.
#[derive(Debug)]
pub struct InstallReport {
    pub target_path: PathBuf,
    /// `None` for root installs, which never touch rc files.
    pub rc_update: Option<RcUpdate>,
    pub wrapper_installed: bool,
}

/// Installs epm for the current process: detects the platform and uses `sudo` for the wrapper.
pub fn run(password: &str, base_url: &str) -> Result<InstallReport> {
    let platform = PlatformContext::detect()?;
    let layout = InstallLayout::for_platform(&platform);
    install_with(password, &platform, &layout, base_url, &SudoWriter::default())
}

/// Performs the install against an explicit platform, layout and privileged writer.
///
/// # Arguments
/// * `password`: sent as the `password` query parameter; never logged.
/// * `platform`: decides whether rc files and the wrapper are handled.
/// * `layout`: target directory, wrapper path and scratch directory for the download.
/// * `base_url`: where the script is downloaded from.
/// * `writer`: writes the sudo wrapper for unprivileged installs.
///
/// # Returns
/// * `Ok(InstallReport)` once `epm` is in place. A failed wrapper only shows up as
///   `wrapper_installed: false`.
/// * `Err(InstallError)` for download failures and filesystem errors. The artifact
///   and rc file are untouched when the download fails.
pub fn install_with(
    password: &str,
    platform: &PlatformContext,
    layout: &InstallLayout,
    base_url: &str,
    writer: &dyn PrivilegedWriter,
) -> Result<InstallReport> {
    fs::create_dir_all(&layout.target_dir)
        .map_err(|e| InstallError::fs("create directory", &layout.target_dir, e))?;

    let temp_dir = tempfile::Builder::new()
        .prefix("epm-install-")
        .tempdir_in(&layout.scratch_dir)
        .map_err(|e| InstallError::fs("create temporary directory in", &layout.scratch_dir, e))?;
    let downloaded = temp_dir.path().join(DOWNLOAD_FILE_NAME);
    log_debug!("[EPM::Install] Using temporary directory {}", temp_dir.path().display());

    download_artifact(base_url, password, &downloaded)?;
    ensure_interpreter_header(&downloaded)?;
    make_executable(&downloaded)?;

    log_info!(
        "[EPM::Install] Moving to {}",
        layout.target_path.display().to_string().cyan()
    );
    move_into_place(&downloaded, &layout.target_path)?;
    drop(temp_dir);

    log_info!(
        "[EPM::Install] Installed epm → {}",
        layout.target_path.display().to_string().green()
    );

    let mut report = InstallReport {
        target_path: layout.target_path.clone(),
        rc_update: None,
        wrapper_installed: false,
    };

    if !platform.privileged {
        let update = register_path(platform, &layout.target_dir)?;
        if let Some(rc_file) = update.rc_file() {
            log_info!("[EPM::Install] Reload your shell or run:");
            log_info!("[EPM::Install]   source {}", rc_file.display().to_string().bold());
        }
        report.rc_update = Some(update);
        report.wrapper_installed = install_wrapper(layout, writer);
    }

    log_info!("[EPM::Install] Done.");
    Ok(report)
}

/// Writes the sudo wrapper. Failures are reported and swallowed.
fn install_wrapper(layout: &InstallLayout, writer: &dyn PrivilegedWriter) -> bool {
    let script = wrapper_script(&layout.target_path);
    match writer.write_executable(&layout.wrapper_path, &script) {
        Ok(()) => {
            log_info!(
                "[EPM::Install] Installed sudo wrapper → {}",
                layout.wrapper_path.display().to_string().green()
            );
            true
        }
        Err(e) => {
            log_warn!("[EPM::Install] Could not write root wrapper: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::rc_markers::EXPORT_MARK;
    use crate::schemas::platform_context::ShellKind;
    use crate::test_support::{RecordingWriter, serve_once};
    use std::path::Path;
    use tempfile::{TempDir, tempdir};

    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    struct Sandbox {
        home: TempDir,
        platform: PlatformContext,
        layout: InstallLayout,
    }

    fn sandbox(privileged: bool, shell: ShellKind) -> Sandbox {
        let home = tempdir().unwrap();
        let platform = PlatformContext {
            privileged,
            shell,
            home: home.path().to_path_buf(),
        };
        let scratch = home.path().join("scratch");
        fs::create_dir_all(&scratch).unwrap();
        let mut layout = InstallLayout::new(
            home.path().join(".local/bin"),
            home.path().join("system-bin/epm"),
        );
        layout.scratch_dir = scratch;
        Sandbox {
            home,
            platform,
            layout,
        }
    }

    fn rc(home: &Path, name: &str) -> String {
        fs::read_to_string(home.join(name)).unwrap_or_default()
    }

    #[test]
    fn unprivileged_install_places_executable_and_registers_path() {
        let sb = sandbox(false, ShellKind::Bash);
        let server = serve_once(200, "print('epm')\n");
        let writer = RecordingWriter::default();

        let report = install_with("pw", &sb.platform, &sb.layout, &server.url, &writer).unwrap();

        let installed = fs::read_to_string(&report.target_path).unwrap();
        assert_eq!(installed, "#!/usr/bin/env python3\nprint('epm')\n");
        #[cfg(unix)]
        {
            let mode = fs::metadata(&report.target_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }

        assert_eq!(
            report.rc_update,
            Some(RcUpdate::Added(sb.home.path().join(".bashrc")))
        );
        assert!(rc(sb.home.path(), ".bashrc").contains(EXPORT_MARK));

        assert!(report.wrapper_installed);
        let writes = writer.writes.borrow();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, sb.layout.wrapper_path);
        assert!(writes[0].1.contains(&format!("exec \"{}\" \"$@\"", sb.layout.target_path.display())));
    }

    #[test]
    fn repeated_installs_keep_a_single_marker_pair() {
        let sb = sandbox(false, ShellKind::Zsh);
        let writer = RecordingWriter::default();

        for _ in 0..2 {
            let server = serve_once(200, "#!/usr/bin/env python3\nprint('epm')\n");
            install_with("pw", &sb.platform, &sb.layout, &server.url, &writer).unwrap();
        }

        let content = rc(sb.home.path(), ".zshrc");
        assert_eq!(content.matches(EXPORT_MARK).count(), 1);
        assert_eq!(content.matches("export PATH=").count(), 1);
        assert_eq!(
            fs::read_to_string(&sb.layout.target_path).unwrap(),
            "#!/usr/bin/env python3\nprint('epm')\n"
        );
    }

    #[test]
    fn forbidden_download_leaves_no_artifact_and_no_rc_changes() {
        let sb = sandbox(false, ShellKind::Bash);
        fs::write(sb.home.path().join(".bashrc"), "alias ll='ls -l'\n").unwrap();
        let server = serve_once(403, "bad password");
        let writer = RecordingWriter::default();

        let err = install_with("wrong", &sb.platform, &sb.layout, &server.url, &writer).unwrap_err();

        assert!(matches!(err, InstallError::HttpStatus { status: 403, .. }));
        assert!(!sb.layout.target_path.exists());
        assert_eq!(rc(sb.home.path(), ".bashrc"), "alias ll='ls -l'\n");
        assert!(writer.writes.borrow().is_empty());
    }

    #[test]
    fn wrapper_failure_does_not_fail_the_install() {
        let sb = sandbox(false, ShellKind::Bash);
        let server = serve_once(200, "print('epm')\n");
        let writer = RecordingWriter::failing();

        let report = install_with("pw", &sb.platform, &sb.layout, &server.url, &writer).unwrap();

        assert!(!report.wrapper_installed);
        assert!(report.target_path.exists());
    }

    #[test]
    fn privileged_install_skips_rc_and_wrapper() {
        let sb = sandbox(true, ShellKind::Bash);
        let server = serve_once(200, "print('epm')\n");
        let writer = RecordingWriter::default();

        let report = install_with("pw", &sb.platform, &sb.layout, &server.url, &writer).unwrap();

        assert!(report.rc_update.is_none());
        assert!(!report.wrapper_installed);
        assert!(writer.writes.borrow().is_empty());
        assert!(!sb.home.path().join(".bashrc").exists());
    }

    #[test]
    fn unrecognized_shell_still_installs_without_rc_edits() {
        let sb = sandbox(false, ShellKind::Unrecognized("/usr/bin/fish".into()));
        let server = serve_once(200, "print('epm')\n");
        let writer = RecordingWriter::default();

        let report = install_with("pw", &sb.platform, &sb.layout, &server.url, &writer).unwrap();

        assert_eq!(report.rc_update, Some(RcUpdate::Skipped));
        assert!(!sb.home.path().join(".bashrc").exists());
        assert!(!sb.home.path().join(".zshrc").exists());
        assert!(report.wrapper_installed);
    }

    fn scratch_entries(sb: &Sandbox) -> usize {
        fs::read_dir(&sb.layout.scratch_dir).unwrap().count()
    }

    #[test]
    fn download_dir_is_removed_after_failed_install() {
        let sb = sandbox(false, ShellKind::Bash);
        let server = serve_once(403, "bad password");

        install_with("wrong", &sb.platform, &sb.layout, &server.url, &RecordingWriter::default())
            .unwrap_err();

        assert_eq!(scratch_entries(&sb), 0);
    }

    #[test]
    fn download_dir_is_removed_after_successful_install() {
        let sb = sandbox(false, ShellKind::Bash);
        let server = serve_once(200, "print('epm')\n");

        install_with("pw", &sb.platform, &sb.layout, &server.url, &RecordingWriter::default())
            .unwrap();

        assert_eq!(scratch_entries(&sb), 0);
        assert!(sb.layout.target_path.exists());
    }

    #[test]
    fn missing_scratch_dir_fails_before_any_download() {
        let mut sb = sandbox(false, ShellKind::Bash);
        sb.layout.scratch_dir = sb.home.path().join("does-not-exist");

        let err = install_with(
            "pw",
            &sb.platform,
            &sb.layout,
            "http://127.0.0.1:9/epm.py",
            &RecordingWriter::default(),
        )
        .unwrap_err();

        assert!(matches!(err, InstallError::Filesystem { .. }), "{err}");
        assert!(!sb.layout.target_path.exists());
    }
}
