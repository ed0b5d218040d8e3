//! File logging for the battle binary.
//!
//! Standard output belongs to the battle transcript, so tracing output goes
//! to `<log dir>/<session>/battle.log` only.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::CliConfig;

/// Installs the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn setup_logging(config: &CliConfig) -> Result<WorkerGuard> {
    let base = config.log_dir.clone().unwrap_or_else(default_log_dir);
    let session_id = config.session_id.clone().unwrap_or_else(timestamp_session_id);
    let session_dir = create_session_dir(&base, &session_id)?;

    let file_appender = tracing_appender::rolling::never(&session_dir, "battle.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("tracing subscriber already installed")?;

    tracing::info!(session = %session_id, "logging initialized");
    tracing::info!("log file: {}/battle.log", session_dir.display());

    Ok(guard)
}

/// Platform cache directory, e.g. `~/.cache/battle/logs` on Linux.
fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "battle")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("battle"))
        .join("logs")
}

fn timestamp_session_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{secs}")
}

fn create_session_dir(base: &Path, session_id: &str) -> Result<PathBuf> {
    let dir = base.join(session_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    Ok(dir)
}
