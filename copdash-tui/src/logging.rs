//! File logging for the TUI.
//!
//! The terminal belongs to ratatui while the app runs, so tracing output goes
//! to a per-launch file under the platform data directory. Old files are
//! pruned to a bounded count.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "copdash";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No suitable data directory available for logs")]
    NoDataDir,
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove old log file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create log file at {path}: {source}")]
    CreateLogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing to write to a per-launch log file.
///
/// Subsequent calls are no-ops. Returns the log file path so the caller can
/// mention it; failures are returned so startup can continue without logs.
pub fn init() -> Result<PathBuf, LoggingError> {
    let log_dir = log_directory()?;
    init_in(&log_dir)
}

fn init_in(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let log_file_name = format_log_file_name(Local::now());
    let log_path = log_dir.join(&log_file_name);
    if LOG_GUARD.get().is_some() {
        return Ok(log_path);
    }
    ensure_file_exists(&log_path)?;

    let file_appender = rolling::never(log_dir, &log_file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    prune_old_logs(log_dir, MAX_LOG_FILES)?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(file_writer);
    let subscriber = Registry::default().with(build_env_filter()).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("Logging initialized; log file at {}", log_path.display());
    Ok(log_path)
}

fn log_directory() -> Result<PathBuf, LoggingError> {
    dirs::data_local_dir()
        .map(|dir| dir.join("copdash").join("logs"))
        .ok_or(LoggingError::NoDataDir)
}

fn ensure_file_exists(path: &Path) -> Result<(), LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| LoggingError::CreateLogFile {
            path: path.to_path_buf(),
            source,
        })
}

fn prune_old_logs(dir: &Path, max_files: usize) -> Result<(), LoggingError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("log"))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|(modified, _)| *modified);
    let excess = entries.len().saturating_sub(max_files);
    for (_, path) in entries.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::RemoveFile { path, source })?;
    }
    Ok(())
}

fn format_log_file_name(now: DateTime<Local>) -> String {
    format!("{LOG_FILE_PREFIX}_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// `RUST_LOG` wins; otherwise info for our crates and warnings elsewhere.
fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,copdash_core=info,copdash_render=info,copdash_tui=info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::{thread, time::Duration};
    use tempfile::tempdir;

    #[test]
    fn log_filename_has_timestamp_and_prefix() {
        let fixed = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_log_file_name(fixed), "copdash_2024-03-09_14-05-07.log");
    }

    #[test]
    fn prune_removes_oldest_files_beyond_limit() {
        let dir = tempdir().unwrap();
        for idx in 0..12 {
            ensure_file_exists(&dir.path().join(format!("copdash_{idx}.log"))).unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        prune_old_logs(dir.path(), 10).unwrap();
        let logs = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "log"))
            .count();
        assert_eq!(logs, 10);
        assert!(dir.path().join("notes.txt").exists());
        assert!(!dir.path().join("copdash_0.log").exists());
    }
}
