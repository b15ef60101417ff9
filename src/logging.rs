//! Diagnostics setup shared by the binaries.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive for diagnostics.
pub const LOG_ENV: &str = "LAUNCHER_LOG";

/// Install a subscriber that writes to standard error.
///
/// Standard output belongs to the launched application, so nothing is ever
/// logged there. `default_directive` applies when [`LOG_ENV`] is unset or
/// cannot be parsed.
pub fn init(default_directive: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    // A second call keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
