//! Structured logging configuration.
//!
//! Library records emitted through the `log` facade (request failures from the
//! pipeline, dropped stale updates from the store) are bridged into the same
//! subscriber.

use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr
///
/// Log levels are configurable via the `RUST_LOG` env var.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // `try_init` so tests and repeated calls don't panic
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

/// Log a completed client command
///
/// # Arguments
///
/// * `command` - Command name
/// * `elapsed` - Wall time spent, including network round trips
/// * `ok` - Whether the command succeeded
pub fn log_command(command: &str, elapsed: Duration, ok: bool) {
    let duration_ms = elapsed.as_millis() as u64;
    if !ok {
        tracing::warn!(command = command, duration_ms = duration_ms, "Command failed");
    } else if duration_ms > 1000 {
        tracing::warn!(
            command = command,
            duration_ms = duration_ms,
            "Slow command"
        );
    } else {
        tracing::debug!(command = command, duration_ms = duration_ms, "Command completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init();
        init();
    }

    #[test]
    fn test_log_command() {
        log_command("show", Duration::from_millis(3), true);
        log_command("auto", Duration::from_millis(2500), true);
        log_command("load", Duration::from_millis(40), false);
    }
}
