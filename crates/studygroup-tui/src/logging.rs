//! File logging. The TUI owns the terminal, so nothing is written to
//! stdout or stderr; events go to a daily log file under the data dir.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{anyhow, Context, Result};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Maximum number of log files to retain.
const MAX_LOG_FILES: usize = 7;
const LOG_FILE_PREFIX: &str = "studygroup.log";
const FILTER_ENV: &str = "STUDYGROUP_LOG";

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the program or buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
    let log_dir = log_directory()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to prepare log directory {}", log_dir.display()))?;
    prune_old_logs(&log_dir, MAX_LOG_FILES)?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&log_dir, LOG_FILE_PREFIX));
    let file_layer = fmt::layer().with_ansi(false).with_target(true).with_writer(writer);

    let subscriber = Registry::default().with(build_env_filter()).with(file_layer);
    tracing::subscriber::set_global_default(subscriber).context("Failed to install global tracing subscriber")?;

    tracing::info!(dir = %log_dir.display(), version = env!("CARGO_PKG_VERSION"), "logging initialized");
    Ok(guard)
}

fn log_directory() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("studygroup").join("logs"))
        .ok_or_else(|| anyhow!("No suitable data directory available for logs"))
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Delete the oldest log files until at most `max_files` remain.
fn prune_old_logs(dir: &Path, max_files: usize) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
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
        fs::remove_file(&path).with_context(|| format!("Failed to remove old log file {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};
    use tempfile::tempdir;

    #[test]
    fn test_prune_keeps_newest() {
        let dir = tempdir().unwrap();
        for day in 1..=9 {
            fs::write(dir.path().join(format!("{LOG_FILE_PREFIX}.2026-10-0{day}")), "x").unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        prune_old_logs(dir.path(), 7).unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 8);
        assert!(names.contains(&"notes.txt".to_string()));
        assert!(!names.contains(&format!("{LOG_FILE_PREFIX}.2026-10-01")));
        assert!(!names.contains(&format!("{LOG_FILE_PREFIX}.2026-10-02")));
    }

    #[test]
    fn test_prune_under_limit_is_noop() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(LOG_FILE_PREFIX), "x").unwrap();
        prune_old_logs(dir.path(), 7).unwrap();
        assert!(dir.path().join(LOG_FILE_PREFIX).exists());
    }
}
