//! Tracing setup for the gateway process.
//!
//! Console output is always on. When enabled in config, the same events are
//! also written, without ANSI colours, to a per-session log file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

const SESSION_HEADER: &str = "=== Simtr Session Log ===";

/// Install the global subscriber. Returns the session log path when file logging is on.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log level '{}'", config.level))?,
    };

    let (file_layer, session_path) = if config.file_enabled {
        let dir = match &config.dir {
            Some(dir) => dir.clone(),
            None => default_log_dir()?,
        };
        let (file, path) = open_session_log(&dir, Utc::now())?;
        let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(path) = &session_path {
        tracing::info!("File logging enabled: {:?}", path);
    }
    Ok(session_path)
}

/// `logs/` next to the running executable.
pub fn default_log_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to resolve executable path")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs"))
}

pub fn session_log_path(dir: &Path, started_at: DateTime<Utc>) -> PathBuf {
    dir.join(format!(
        "simtr-session-{}-{}.log",
        started_at.format("%Y-%m-%d"),
        started_at.timestamp_millis()
    ))
}

/// Create the log directory and a fresh session file with its header line.
pub fn open_session_log(dir: &Path, started_at: DateTime<Utc>) -> Result<(File, PathBuf)> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create log dir {:?}", dir))?;
    let path = session_log_path(dir, started_at);
    let mut file =
        File::create(&path).with_context(|| format!("Failed to create log file {:?}", path))?;
    writeln!(file, "{}", SESSION_HEADER)?;
    Ok((file, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_log_name() {
        let started = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        let path = session_log_path(Path::new("/tmp/logs"), started);
        assert_eq!(
            path,
            PathBuf::from(format!("/tmp/logs/simtr-session-2025-03-09-{}.log", started.timestamp_millis()))
        );
    }

    #[test]
    fn test_open_session_log_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let (file, path) = open_session_log(&log_dir, Utc::now()).unwrap();
        drop(file);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", SESSION_HEADER));
    }
}
