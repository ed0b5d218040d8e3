//! CLI-specific configuration for the headless battle player.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use battle_core::{BattleFormat, ConfigError};

/// Settings for one run of the `battle` binary.
///
/// Presentation pacing lives in [`client_frontend_core::FrontendConfig`];
/// this only covers what the terminal driver itself needs.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub format: BattleFormat,
    /// Seed for the automated opponent.
    pub seed: u64,
    pub frame_interval: Duration,
    /// Acknowledge every message immediately instead of waiting for the
    /// auto-advance timeout.
    pub auto_acknowledge: bool,
    /// Overrides the platform cache directory for log files.
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
    /// Frames to run before giving up on a battle that never ends.
    pub max_frames: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: BattleFormat::Double,
            seed: 0,
            frame_interval: Duration::from_millis(16),
            auto_acknowledge: true,
            log_dir: None,
            session_id: None,
            max_frames: 100_000,
        }
    }
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_FORMAT` - `single`, `double`, `triple` or `rotation` (default: double)
    /// - `BATTLE_SEED` - Seed for the automated opponent (default: 0)
    /// - `CLI_FRAME_INTERVAL_MS` - Frame interval in milliseconds (default: 16)
    /// - `CLI_AUTO_ACKNOWLEDGE` - Skip through messages (default: true)
    /// - `BATTLE_LOG_DIR` - Directory for log files (default: platform cache dir)
    /// - `BATTLE_SESSION_ID` - Log subdirectory name (default: timestamp)
    /// - `CLI_MAX_FRAMES` - Frame budget for one battle (default: 100000)
    ///
    /// # Errors
    ///
    /// An unknown `BATTLE_FORMAT` is a configuration error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(name) = env::var("BATTLE_FORMAT") {
            config.format = BattleFormat::parse(&name)?;
        }
        if let Some(seed) = read_env::<u64>("BATTLE_SEED") {
            config.seed = seed;
        }
        if let Some(millis) = read_env::<u64>("CLI_FRAME_INTERVAL_MS") {
            config.frame_interval = Duration::from_millis(millis.max(1));
        }
        if let Some(auto) = read_env_bool("CLI_AUTO_ACKNOWLEDGE") {
            config.auto_acknowledge = auto;
        }
        if let Ok(dir) = env::var("BATTLE_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Ok(id) = env::var("BATTLE_SESSION_ID") {
            config.session_id = Some(id);
        }
        if let Some(frames) = read_env::<u64>("CLI_MAX_FRAMES") {
            config.max_frames = frames.max(1);
        }

        Ok(config)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
