//! Tracing setup.
//!
//! One-shot commands log to stderr. The TUI owns the terminal, so it logs
//! to a file under the configured log directory instead.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

/// Opens (creating as needed) the log file at `path` for appending.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Logs to stderr.
pub fn init_stderr(level: tracing::Level) {
    fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Logs to `path`, without colors.
pub fn init_file(level: tracing::Level, path: &Path) -> io::Result<()> {
    let file = open_log_file(path)?;
    fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_file_creates_dirs_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("leaddesk.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
