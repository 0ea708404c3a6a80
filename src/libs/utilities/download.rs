// Password-gated download of the epm script.
//
// The password travels as a plaintext `password=` query parameter because that is
// what the server expects. It is never logged: every URL we print goes through
// `redacted_url`.

use crate::error::{InstallError, Result};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs::File;
use std::io;
use std::path::Path;

/// Where the epm script is served from.
pub const DEFAULT_BASE_URL: &str = "https://epm.nahcrof.com/install/epm.py";

const PASSWORD_PARAM: &str = "password";

/// `base_url` with the password parameter masked, safe to show in logs.
pub fn redacted_url(base_url: &str) -> String {
    let sep = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{sep}{PASSWORD_PARAM}=***")
}

/// Downloads `base_url?password=<password>` and streams the body into `dest`.
///
/// Only a `200` response counts as success. Any other status becomes
/// [`InstallError::HttpStatus`]; DNS, connection and TLS problems become
/// [`InstallError::Transport`]. There are no retries.
pub fn download_artifact(base_url: &str, password: &str, dest: &Path) -> Result<()> {
    if !base_url.starts_with("https://") {
        log_warn!(
            "[EPM::Download] {} is not HTTPS; the password will be sent unencrypted",
            base_url.yellow()
        );
    }

    log_info!(
        "[EPM::Download] Downloading {} → {}",
        redacted_url(base_url).blue(),
        dest.display().to_string().cyan()
    );

    let response = match ureq::get(base_url).query(PASSWORD_PARAM, password).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, response)) => {
            return Err(InstallError::HttpStatus {
                status,
                reason: response.status_text().to_string(),
            });
        }
        Err(ureq::Error::Transport(transport)) => {
            // ureq's transport message can embed the request URL, so only keep the kind and detail.
            let detail = transport
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| transport.kind().to_string());
            return Err(InstallError::Transport(detail));
        }
    };

    // ureq only errors on 4xx/5xx; anything else that is not a plain 200 is refused too.
    if response.status() != 200 {
        return Err(InstallError::HttpStatus {
            status: response.status(),
            reason: response.status_text().to_string(),
        });
    }

    let mut file = File::create(dest).map_err(|e| InstallError::fs("create", dest, e))?;
    let mut reader = response.into_reader();
    let bytes = io::copy(&mut reader, &mut file)
        .map_err(|e| InstallError::Transport(format!("reading response body: {e}")))?;

    log_debug!(
        "[EPM::Download] Wrote {} bytes to {}",
        bytes,
        dest.display().to_string().green()
    );
    Ok(())
}
