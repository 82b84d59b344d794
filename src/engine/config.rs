//=========================================================================
// Engine Configuration
//=========================================================================
//
// Serializable engine settings.
//
// Every field has a default, so a TOML file only needs the keys it wants
// to change:
//
// ```toml
// channel_capacity = 256
//
// [window]
// title = "Sandbox"
// width = 1280
// height = 720
//
// [timing]
// tps = 120.0
// max_fixed_steps_per_frame = 40
//
// [hotkeys]
// pause = "Space"
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::game::Clock;
use crate::core::input::KeyCode;

//=== ConfigError =========================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

//=== EngineConfig ========================================================

/// Top-level engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window creation parameters.
    pub window: WindowConfig,

    /// Frame and fixed-step timing.
    pub timing: TimingConfig,

    /// Built-in debug hotkeys.
    pub hotkeys: HotkeyConfig,

    /// Capacity of the platform → core event channel.
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            timing: TimingConfig::default(),
            hotkeys: HotkeyConfig::default(),
            channel_capacity: 128,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be positive".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        self.timing.validate()
    }
}

//=== WindowConfig ========================================================

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stagehand".to_string(),
            width: 1600,
            height: 900,
            resizable: true,
        }
    }
}

//=== TimingConfig ========================================================

/// Frame and fixed-step timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fixed simulation ticks per second.
    pub tps: f64,

    /// Longest frame delta fed to the simulation, in seconds.
    pub max_frame_delta: f64,

    /// Upper bound on fixed passes in one frame. `None` derives a cap that
    /// covers a full `max_frame_delta` plus the carried remainder.
    pub max_fixed_steps_per_frame: Option<u32>,

    /// Frame rate cap. `None` runs unthrottled.
    pub target_fps: Option<f64>,

    /// Use a constant frame delta (seconds) instead of wall time.
    pub simulated_delta: Option<f64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tps: 60.0,
            max_frame_delta: 0.25,
            max_fixed_steps_per_frame: None,
            target_fps: None,
            simulated_delta: None,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tps > 0.0) {
            return Err(ConfigError::Invalid(format!("tps must be positive, got {}", self.tps)));
        }
        if !(self.max_frame_delta > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_frame_delta must be positive, got {}",
                self.max_frame_delta
            )));
        }
        if let Some(cap) = self.max_fixed_steps_per_frame {
            let needed = self.steps_per_max_frame();
            if u64::from(cap) < needed {
                return Err(ConfigError::Invalid(format!(
                    "max_fixed_steps_per_frame = {cap} cannot cover max_frame_delta = {} at {} tps (needs {needed})",
                    self.max_frame_delta, self.tps
                )));
            }
        }
        if let Some(fps) = self.target_fps {
            if !(fps > 0.0) {
                return Err(ConfigError::Invalid(format!("target_fps must be positive, got {fps}")));
            }
        }
        if let Some(delta) = self.simulated_delta {
            if !(delta >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "simulated_delta must not be negative, got {delta}"
                )));
            }
        }
        Ok(())
    }

    /// Fixed passes needed to consume one clamped frame.
    fn steps_per_max_frame(&self) -> u64 {
        // Tolerance keeps exact multiples such as 0.25 s at 60 tps at 15.
        (self.max_frame_delta * self.tps - 1e-9).ceil().max(1.0) as u64
    }

    /// Effective per-frame fixed step cap.
    pub fn max_fixed_steps(&self) -> u32 {
        match self.max_fixed_steps_per_frame {
            Some(cap) => cap,
            None => u32::try_from(self.steps_per_max_frame() + 1).unwrap_or(u32::MAX),
        }
    }

    /// Length of one fixed step.
    pub fn fixed_step(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tps)
    }

    /// Clamp applied to frame deltas.
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_secs_f64(self.max_frame_delta)
    }

    /// Minimum frame duration when a frame cap is set.
    pub fn frame_budget(&self) -> Option<Duration> {
        self.target_fps.map(|fps| Duration::from_secs_f64(1.0 / fps))
    }

    /// Delta source for the frame timer.
    pub fn clock(&self) -> Clock {
        match self.simulated_delta {
            Some(delta) => Clock::Simulated(Duration::from_secs_f64(delta)),
            None => Clock::Realtime,
        }
    }
}

//=== HotkeyConfig ========================================================

/// Built-in debug hotkeys. `None` disables a binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Closes the window.
    pub close: Option<KeyCode>,

    /// Toggles simulation pause.
    pub pause: Option<KeyCode>,

    /// Advances one frame while paused.
    pub step: Option<KeyCode>,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            close: Some(KeyCode::Escape),
            pause: Some(KeyCode::KeyP),
            step: Some(KeyCode::KeyO),
        }
    }
}

impl HotkeyConfig {
    /// No hotkeys at all.
    pub fn disabled() -> Self {
        Self {
            close: None,
            pause: None,
            step: None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();

        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.hotkeys.close, Some(KeyCode::Escape));
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = EngineConfig::from_toml_str(
            r#"
            channel_capacity = 32

            [timing]
            tps = 120.0
            simulated_delta = 0.5

            [hotkeys]
            pause = "Space"
            "#,
        )
        .unwrap();

        assert_eq!(config.channel_capacity, 32);
        assert_eq!(config.timing.tps, 120.0);
        assert_eq!(config.timing.max_fixed_steps_per_frame, None);
        assert_eq!(config.timing.clock(), Clock::Simulated(Duration::from_millis(500)));
        assert_eq!(config.hotkeys.pause, Some(KeyCode::Space));
        assert_eq!(config.hotkeys.step, Some(KeyCode::KeyO));
        assert_eq!(config.window.title, "Stagehand");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EngineConfig::from_toml_str("[timing]\ntps = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("channel_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("[window]\nwidth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("[timing]\nmax_fixed_steps_per_frame = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn step_cap_must_cover_the_longest_frame() {
        // 0.25 s at 60 tps is 15 steps.
        let err = EngineConfig::from_toml_str("[timing]\nmax_fixed_steps_per_frame = 8").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = EngineConfig::from_toml_str("[timing]\nmax_fixed_steps_per_frame = 15").unwrap();
        assert_eq!(config.timing.max_fixed_steps(), 15);

        let config = EngineConfig::from_toml_str("[timing]\nmax_frame_delta = 0.1\nmax_fixed_steps_per_frame = 6").unwrap();
        assert_eq!(config.timing.max_fixed_steps(), 6);

        let err = EngineConfig::from_toml_str("[timing]\nmax_frame_delta = 0.1\nmax_fixed_steps_per_frame = 5")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn derived_step_cap_covers_max_frame_delta() {
        assert_eq!(TimingConfig::default().max_fixed_steps(), 16);

        let timing = TimingConfig {
            tps: 64.0,
            ..TimingConfig::default()
        };
        assert_eq!(timing.max_fixed_steps(), 17);

        let timing = TimingConfig {
            tps: 64.0,
            max_fixed_steps_per_frame: Some(40),
            ..TimingConfig::default()
        };
        assert_eq!(timing.max_fixed_steps(), 40);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("timing = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn derived_durations() {
        let timing = TimingConfig {
            tps: 64.0,
            target_fps: Some(32.0),
            ..TimingConfig::default()
        };

        assert_eq!(timing.fixed_step(), Duration::from_micros(15_625));
        assert_eq!(timing.frame_budget(), Some(Duration::from_micros(31_250)));
        assert_eq!(timing.clock(), Clock::Realtime);
    }
}
