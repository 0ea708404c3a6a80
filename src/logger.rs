// Logging for the installer.
// Every message goes to stderr with a coloured level tag; `log_debug!` output
// only appears when the installer was started with `--debug`.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// `log_info!` for progress and result messages the user should see.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_green("[INFO]"), format!($($arg)*)));
}

/// `log_warn!` for problems that do not stop the install (e.g., a failed sudo wrapper).
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_yellow("[WARN]"), format!($($arg)*)));
}

/// `log_error!` for fatal failures right before the process exits non-zero.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_red("[ERROR]"), format!($($arg)*)));
}

/// `log_debug!` for internal detail, gated on [`is_debug_enabled`].
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
           eprintln!("{} {}", colored::Colorize::dimmed("[DEBUG]"), format!($($arg)*));
        }
    };
}

// Set once from `main`; read by every `log_debug!` call site.
static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Initializes the logger with the `--debug` flag from the command line.
/// Call once, before any install or uninstall work starts.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    log_debug!("[EPM::Logger] Debug logging enabled");
}

/// Returns `true` when debug output was requested. Defaults to `false` if `init` never ran.
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|f| f.load(Ordering::Relaxed))
        .unwrap_or(false)
}
