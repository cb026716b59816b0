//! Logging Infrastructure
//!
//! Console output by default, or a daily rolling file when a log directory
//! is given and exists.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Log file prefix inside the log directory
const LOG_FILE_PREFIX: &str = "milkrun-client";

/// Initialize the logger
///
/// `RUST_LOG` takes precedence over `log_level` when set. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_logger(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX);
            let _ = subscriber
                .with_writer(file_appender)
                .with_ansi(false)
                .try_init();
            return;
        }
    }

    let _ = subscriber.try_init();
}
