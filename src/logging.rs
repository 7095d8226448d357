//! Tracing setup
//!
//! The TUI owns stdout, so interactive runs log to a file in the XDG data
//! directory. One-shot `--dump` runs log to stderr instead. Filtering follows
//! `RUST_LOG`, defaulting to `storefront=info`.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "storefront.log";

const DEFAULT_DIRECTIVE: &str = "storefront=info";

/// Where log output is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to `storefront.log` in the given directory
    File(PathBuf),
    /// Write to stderr
    Stderr,
}

/// Default log directory (`~/.local/share/storefront/` on Linux)
pub fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "storefront").map(|dirs| dirs.data_local_dir().to_path_buf())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber
///
/// The returned guard flushes buffered file output when dropped; keep it alive
/// for the lifetime of the program.
pub fn init(target: LogTarget) -> std::io::Result<Option<WorkerGuard>> {
    match target {
        LogTarget::File(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            // A subscriber may already be set (e.g. in tests); keep the first one
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Ok(Some(guard))
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init();
            Ok(None)
        }
    }
}
