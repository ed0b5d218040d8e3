//! Frontend configuration structures and loaders.
//!
//! This module contains presentation settings that are shared across
//! different frontend implementations (CLI, GUI, etc.).

use std::env;
use std::time::Duration;

/// Frontend-specific configuration.
///
/// This contains UI-related settings like message pacing and animation timing.
#[derive(Clone, Debug, Default)]
pub struct FrontendConfig {
    pub messages: MessageConfig,
    pub animation: AnimationConfig,
}

impl FrontendConfig {
    pub const fn new(messages: MessageConfig, animation: AnimationConfig) -> Self {
        Self {
            messages,
            animation,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_MESSAGE_CAPACITY` - Message log capacity (default: 64)
    /// - `BATTLE_TEXT_SPEED` - Characters printed per second, 0 prints instantly (default: 40)
    /// - `BATTLE_AUTO_ADVANCE_MS` - Idle time before a printed message closes (default: 3000)
    /// - `BATTLE_REVEAL_MS` - Duration of the reveal animation (default: 600)
    /// - `SHOW_DAMAGE_MESSAGES` - Show damage messages (default: true)
    /// - `SHOW_HEALING_MESSAGES` - Show healing messages (default: true)
    /// - `SHOW_STATUS_MESSAGES` - Show status messages (default: true)
    /// - `SHOW_TURN_MESSAGES` - Show a message when a turn begins (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Message configuration
        if let Some(capacity) = read_env::<usize>("BATTLE_MESSAGE_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }
        if let Some(speed) = read_env::<u32>("BATTLE_TEXT_SPEED") {
            config.messages.chars_per_second = speed;
        }
        if let Some(millis) = read_env::<u64>("BATTLE_AUTO_ADVANCE_MS") {
            config.messages.auto_advance = Duration::from_millis(millis);
        }

        // Animation configuration
        if let Some(millis) = read_env::<u64>("BATTLE_REVEAL_MS") {
            config.animation.reveal = Duration::from_millis(millis);
        }

        // Message visibility settings
        if let Some(show) = read_env_bool("SHOW_DAMAGE_MESSAGES") {
            config.messages.visibility.show_damage = show;
        }
        if let Some(show) = read_env_bool("SHOW_HEALING_MESSAGES") {
            config.messages.visibility.show_healing = show;
        }
        if let Some(show) = read_env_bool("SHOW_STATUS_MESSAGES") {
            config.messages.visibility.show_status = show;
        }
        if let Some(show) = read_env_bool("SHOW_TURN_MESSAGES") {
            config.messages.visibility.show_turns = show;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
    /// Printing speed; zero prints the whole text at once.
    pub chars_per_second: u32,
    /// Idle time after printing before an auto-advance message closes itself.
    pub auto_advance: Duration,
    pub visibility: MessageVisibility,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            chars_per_second: 40,
            auto_advance: Duration::from_secs(3),
            visibility: MessageVisibility::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnimationConfig {
    /// Length of the pixelation-style reveal played before a reveal message.
    pub reveal: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            reveal: Duration::from_millis(600),
        }
    }
}

/// Controls which packet kinds generate visible messages.
///
/// Packets whose message is hidden are released without waiting for the
/// player.
#[derive(Clone, Debug)]
pub struct MessageVisibility {
    /// Show damage messages (e.g., "Gale took 12 damage.").
    pub show_damage: bool,
    /// Show healing messages (e.g., "Ripple regained 15 HP.").
    pub show_healing: bool,
    /// Show status changes (e.g., "Boulder was poisoned!").
    pub show_status: bool,
    /// Show turn counters (e.g., "Turn 3").
    pub show_turns: bool,
}

impl Default for MessageVisibility {
    fn default() -> Self {
        Self {
            show_damage: true,
            show_healing: true,
            show_status: true,
            show_turns: false, // Turn counter is shown in the HUD
        }
    }
}

pub(crate) fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

pub(crate) fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
