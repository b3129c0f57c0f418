//! Safety settings and behavior tuning
//!
//! Defines all configurable options for the pacing and gesture engines.
//! Values can be overridden from a JSON settings file or from environment
//! variables; the defaults here are the ones the bot ships with.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default minimum click delay, in seconds.
pub const DEFAULT_MIN_CLICK_DELAY_SECS: f64 = 0.5;
/// Default maximum click delay, in seconds.
pub const DEFAULT_MAX_CLICK_DELAY_SECS: f64 = 2.0;
/// Default cadence of mandatory scheduled breaks, in seconds.
pub const DEFAULT_BREAK_FREQUENCY_SECS: u64 = 3_600;
/// Default cap on continuous session time, in seconds.
pub const DEFAULT_MAX_SESSION_SECS: u64 = 14_400;
/// Default fractional jitter applied to every delay (0.3 = up to 30%).
pub const DEFAULT_RANDOM_VARIANCE: f64 = 0.3;
/// Default per-action chance of an unscheduled micro-break.
pub const DEFAULT_MICRO_BREAK_CHANCE: f64 = 0.001;
/// Default chance of idle cursor drift per opportunity.
pub const DEFAULT_MOVEMENT_CHANCE: f64 = 0.30;
/// Default chance of a deliberate misclick that gets corrected.
pub const DEFAULT_MISTAKE_CHANCE: f64 = 0.03;
/// Default chance of typing one wrong letter and erasing it.
pub const DEFAULT_TYPO_CHANCE: f64 = 0.05;
/// Clicks never land closer than this to a region edge, in pixels.
pub const DEFAULT_CLICK_MARGIN_PX: u32 = 5;
/// Default spread for click offsets, in pixels.
pub const DEFAULT_CLICK_VARIANCE_PX: u32 = 10;

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Session pacing and break policy
    pub pacing: PacingConfig,
    /// Per-gesture randomization
    pub gesture: GestureConfig,
}

impl Settings {
    /// Defaults plus overrides read from the process environment.
    ///
    /// Recognized variables: `MIN_CLICK_DELAY`, `MAX_CLICK_DELAY`,
    /// `BREAK_FREQUENCY`, `MAX_SESSION_DURATION`, `ENABLE_FATIGUE`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key/value lookup.
    ///
    /// Malformed values are ignored and the current value kept.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parsed(&lookup, "MIN_CLICK_DELAY") {
            self.pacing.min_click_delay_secs = v;
        }
        if let Some(v) = parsed(&lookup, "MAX_CLICK_DELAY") {
            self.pacing.max_click_delay_secs = v;
        }
        if let Some(v) = parsed(&lookup, "BREAK_FREQUENCY") {
            self.pacing.break_frequency_secs = v;
        }
        if let Some(v) = parsed(&lookup, "MAX_SESSION_DURATION") {
            self.pacing.max_session_secs = v;
        }
        if let Some(v) = lookup("ENABLE_FATIGUE") {
            self.pacing.enable_fatigue = v.eq_ignore_ascii_case("true");
        }
        self
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Create settings tuned for long unattended runs: slower clicks,
    /// more jitter, and a shorter leash on session length.
    pub fn cautious_preset() -> Self {
        Self {
            pacing: PacingConfig {
                min_click_delay_secs: 0.8,
                max_click_delay_secs: 2.5,
                break_frequency_secs: 2_700,
                max_session_secs: 10_800,
                random_variance: 0.4,
                ..Default::default()
            },
            gesture: GestureConfig {
                movement_chance: 0.35,
                ..Default::default()
            },
        }
    }

    /// Create settings for short attended sessions: snappier clicks,
    /// fewer forced pauses. Fatigue stays on.
    pub fn burst_preset() -> Self {
        Self {
            pacing: PacingConfig {
                min_click_delay_secs: 0.4,
                max_click_delay_secs: 1.5,
                break_frequency_secs: 5_400,
                max_session_secs: 7_200,
                ..Default::default()
            },
            gesture: GestureConfig::default(),
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.parse().ok())
}

/// Session pacing and break policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum delay before a generic click, in seconds
    pub min_click_delay_secs: f64,
    /// Maximum delay before a generic click, in seconds
    pub max_click_delay_secs: f64,
    /// Seconds between mandatory scheduled breaks
    pub break_frequency_secs: u64,
    /// Maximum continuous session duration, in seconds
    pub max_session_secs: u64,
    /// Whether delays stretch as the session wears on
    pub enable_fatigue: bool,
    /// Fractional jitter applied to every delay (0.3 = up to 30%)
    pub random_variance: f64,
    /// Per-action probability of an unscheduled micro-break
    pub micro_break_chance: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_click_delay_secs: DEFAULT_MIN_CLICK_DELAY_SECS,
            max_click_delay_secs: DEFAULT_MAX_CLICK_DELAY_SECS,
            break_frequency_secs: DEFAULT_BREAK_FREQUENCY_SECS,
            max_session_secs: DEFAULT_MAX_SESSION_SECS,
            enable_fatigue: true,
            random_variance: DEFAULT_RANDOM_VARIANCE,
            micro_break_chance: DEFAULT_MICRO_BREAK_CHANCE,
        }
    }
}

/// Per-gesture randomization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Safety margin kept between a click point and the region edge, px
    pub click_margin_px: u32,
    /// Spread of click offsets around the region center, px
    pub click_variance_px: u32,
    /// Chance of idle cursor drift per opportunity
    pub movement_chance: f64,
    /// Chance of a deliberate misclick that gets corrected
    pub mistake_chance: f64,
    /// Chance of typing one wrong letter and erasing it
    pub typo_chance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_margin_px: DEFAULT_CLICK_MARGIN_PX,
            click_variance_px: DEFAULT_CLICK_VARIANCE_PX,
            movement_chance: DEFAULT_MOVEMENT_CHANCE,
            mistake_chance: DEFAULT_MISTAKE_CHANCE,
            typo_chance: DEFAULT_TYPO_CHANCE,
        }
    }
}

/// Settings load/parse errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
}
