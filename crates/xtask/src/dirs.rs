//! Platform-specific directory utilities
//!
//! Logs follow platform cache conventions; the save root comes from
//! [`save_runtime::PersistenceConfig`] (`SAVE_DATA_DIR` or `~/.terminal_rpg`).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name of the log file inside each session directory.
pub const LOG_FILE: &str = "slots.log";

/// Get the platform-specific log directory
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/terminal_rpg/logs`
/// - Linux: `~/.cache/terminal_rpg/logs` (or `$XDG_CACHE_HOME/terminal_rpg/logs`)
/// - Windows: `%LOCALAPPDATA%\terminal_rpg\logs`
/// - Fallback: `<tmp>/terminal_rpg/logs`
pub fn log_dir() -> PathBuf {
    let base_dir = directories::ProjectDirs::from("", "", "terminal_rpg")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("terminal_rpg"));

    base_dir.join("logs")
}

/// List all session directories in the log directory
///
/// Returns (session_id, path) pairs, newest first.
pub fn list_sessions(log_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !log_dir.exists() {
        return Ok(Vec::new());
    }

    let mut sessions: Vec<(String, PathBuf, std::time::SystemTime)> = Vec::new();

    for entry in std::fs::read_dir(log_dir)
        .with_context(|| format!("Failed to read log directory: {}", log_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir()
            && let Some(session_id) = path.file_name().and_then(|n| n.to_str())
        {
            let modified = entry.metadata()?.modified()?;
            sessions.push((session_id.to_string(), path.clone(), modified));
        }
    }

    sessions.sort_by(|a, b| b.2.cmp(&a.2));

    Ok(sessions
        .into_iter()
        .map(|(id, path, _)| (id, path))
        .collect())
}

/// Find the log file for a specific session
pub fn find_session_log(log_dir: &Path, session_id: &str) -> Result<PathBuf> {
    let log_path = log_dir.join(session_id).join(LOG_FILE);

    if !log_path.exists() {
        anyhow::bail!("Log file not found: {}", log_path.display());
    }

    Ok(log_path)
}

/// Find the most recent session's log file, skipping `current` (the session
/// of the running process).
pub fn find_latest_log(log_dir: &Path, current: Option<&str>) -> Result<(String, PathBuf)> {
    let sessions = list_sessions(log_dir)?;

    let (session_id, session_path) = sessions
        .iter()
        .find(|(id, path)| Some(id.as_str()) != current && path.join(LOG_FILE).exists())
        .context("No sessions with a log file found in log directory")?;

    Ok((session_id.clone(), session_path.join(LOG_FILE)))
}
