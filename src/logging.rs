// SPDX-License-Identifier: MIT
//
// Logging setup.
//
// The terminal belongs to the editor, so log records go to a file and
// only when asked for: `KILO_LOG` holds an `EnvFilter` directive
// (`debug`, `kilo_term=trace`, ...) and `KILO_LOG_DIR` picks the
// directory for `kilo.log` (default: the working directory).

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter directive variable.
pub const LOG_ENV: &str = "KILO_LOG";
/// Log directory variable.
pub const LOG_DIR_ENV: &str = "KILO_LOG_DIR";
/// Log file name inside the log directory.
pub const LOG_FILE: &str = "kilo.log";

/// Install the file subscriber if `KILO_LOG` is set.
///
/// The returned guard flushes the non-blocking writer when dropped; keep
/// it alive until the program is about to exit.
pub fn init() -> Option<WorkerGuard> {
    let filter = filter_from(env::var(LOG_ENV).ok().as_deref())?;
    let dir = log_dir(env::var_os(LOG_DIR_ENV));

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        // Global subscriber already installed; drop guard so writer shuts down.
        Err(_) => None,
    }
}

/// Parse a filter directive. `None` if logging is off or the directive
/// doesn't parse.
fn filter_from(directive: Option<&str>) -> Option<EnvFilter> {
    let directive = directive?.trim();
    if directive.is_empty() {
        return None;
    }
    EnvFilter::try_new(directive).ok()
}

fn log_dir(var: Option<OsString>) -> PathBuf {
    var.filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
}
