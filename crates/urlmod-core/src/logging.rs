//! Tracing setup for the CLI and for programs embedding the model.

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,urlmod=debug";
const LOG_FILE: &str = "urlmod.log";

/// `$XDG_STATE_HOME/urlmod/urlmod.log`
pub fn log_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("urlmod")?;
    Ok(dirs.get_state_home().join(LOG_FILE))
}

/// Append handle shared by every event writer.
#[derive(Clone)]
struct LogFile(Arc<File>);

impl LogFile {
    fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create log dir {}", dir.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        Ok(Self(Arc::new(file)))
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.0).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.0).flush()
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Logs to [`log_path`]. Returns Err (state dir unusable, subscriber already
/// set) so the caller can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    init_logging_to(&log_path()?)
}

/// Logs to an explicit file.
pub fn init_logging_to(path: &Path) -> Result<()> {
    let writer = LogFile::open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    tracing::info!(path = %path.display(), "urlmod logging to file");
    Ok(())
}

/// Stderr only. No-op when a subscriber is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_is_under_urlmod_state_dir() {
        // HOME may be unset in sandboxed runs.
        if let Ok(path) = log_path() {
            assert!(path.ends_with("urlmod/urlmod.log"), "{}", path.display());
        }
    }

    #[test]
    fn log_file_creates_parent_dirs_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/urlmod.log");

        let mut first = LogFile::open(&path).unwrap();
        first.write_all(b"one\n").unwrap();
        let mut second = first.make_writer();
        second.write_all(b"two\n").unwrap();
        second.flush().unwrap();

        let mut reopened = LogFile::open(&path).unwrap();
        reopened.write_all(b"three\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\nthree\n");
    }
}
