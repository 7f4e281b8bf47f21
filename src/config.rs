//! Engine tunables.
//!
//! The debounce and decay windows (and the motion thresholds of the cursor modes) are empirical
//! values that depend on the platform and the pointing device, so they live here rather than as
//! constants in the state machines. With the `config` feature they can be loaded from a TOML file.

use std::time::Duration;

/// Default input sampling period (~60 Hz).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;
/// Same-sign scroll pulses closer than this are treated as one physical notch.
pub const DEFAULT_SCROLL_DEBOUNCE_MS: u64 = 10;
/// How long a scroll-up/down sprite stays up without a new pulse.
pub const DEFAULT_SCROLL_DECAY_MS: u64 = 150;
/// Arrow cursors hide after this long without qualifying motion.
pub const DEFAULT_ARROW_HIDE_MS: u64 = 200;
/// Minimum pointer motion that re-orients an arrow cursor.
pub const DEFAULT_ARROW_MIN_MOTION: f64 = 2.0;
/// Minimum pointer motion that moves a dot cursor.
pub const DEFAULT_DOT_MIN_MOTION: f64 = 0.5;
/// Width of each resize band around the rendered content.
pub const DEFAULT_RESIZE_MARGIN: f64 = 15.0;

/// Timing and threshold parameters for one overlay engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    pub scroll_debounce: Duration,
    pub scroll_decay: Duration,
    pub arrow_hide_after: Duration,
    pub arrow_min_motion: f64,
    pub dot_min_motion: f64,
    pub resize_margin: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            scroll_debounce: Duration::from_millis(DEFAULT_SCROLL_DEBOUNCE_MS),
            scroll_decay: Duration::from_millis(DEFAULT_SCROLL_DECAY_MS),
            arrow_hide_after: Duration::from_millis(DEFAULT_ARROW_HIDE_MS),
            arrow_min_motion: DEFAULT_ARROW_MIN_MOTION,
            dot_min_motion: DEFAULT_DOT_MIN_MOTION,
            resize_margin: DEFAULT_RESIZE_MARGIN,
        }
    }
}

impl EngineConfig {
    /// Override the sampling period; mostly useful for tests.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

#[cfg(feature = "config")]
mod file {
    use super::EngineConfig;
    use crate::error::{OverlayError, Result};
    use serde::Deserialize;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    /// On-disk representation; every field is optional and falls back to the default.
    #[derive(Debug, Default, Deserialize)]
    struct EngineConfigFile {
        tick_interval_ms: Option<u64>,
        scroll_debounce_ms: Option<u64>,
        scroll_decay_ms: Option<u64>,
        arrow_hide_ms: Option<u64>,
        arrow_min_motion: Option<f64>,
        dot_min_motion: Option<f64>,
        resize_margin: Option<f64>,
    }

    impl EngineConfig {
        /// Parse tunables from a TOML document.
        pub fn from_toml_str(contents: &str) -> Result<Self> {
            let file: EngineConfigFile = toml::from_str(contents)
                .map_err(|e| OverlayError::config(format!("engine config: {e}")))?;
            let defaults = EngineConfig::default();

            let config = EngineConfig {
                tick_interval: file
                    .tick_interval_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.tick_interval),
                scroll_debounce: file
                    .scroll_debounce_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.scroll_debounce),
                scroll_decay: file
                    .scroll_decay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.scroll_decay),
                arrow_hide_after: file
                    .arrow_hide_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.arrow_hide_after),
                arrow_min_motion: file.arrow_min_motion.unwrap_or(defaults.arrow_min_motion),
                dot_min_motion: file.dot_min_motion.unwrap_or(defaults.dot_min_motion),
                resize_margin: file.resize_margin.unwrap_or(defaults.resize_margin),
            };

            if config.tick_interval.is_zero() {
                return Err(OverlayError::config(
                    "engine config: tick_interval_ms must be positive",
                ));
            }
            for (name, value) in [
                ("arrow_min_motion", config.arrow_min_motion),
                ("dot_min_motion", config.dot_min_motion),
                ("resize_margin", config.resize_margin),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(OverlayError::config(format!(
                        "engine config: {name} must be a non-negative number"
                    )));
                }
            }
            Ok(config)
        }

        /// Load tunables from a TOML file.
        pub fn load(path: &Path) -> Result<Self> {
            let contents =
                std::fs::read_to_string(path).map_err(|e| OverlayError::asset_io(path, e))?;
            Self::from_toml_str(&contents)
        }

        /// `<config_dir>/input-overlay/engine.toml`, if the platform has a config directory.
        pub fn default_path() -> Option<PathBuf> {
            dirs::config_dir().map(|dir| dir.join("input-overlay").join("engine.toml"))
        }

        /// Load from the default path, falling back to defaults when the file is absent.
        pub fn load_or_default() -> Result<Self> {
            match Self::default_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn partial_file_keeps_defaults() {
            let config = EngineConfig::from_toml_str("scroll_decay_ms = 250\n").unwrap();
            assert_eq!(config.scroll_decay, Duration::from_millis(250));
            assert_eq!(config.scroll_debounce, Duration::from_millis(10));
            assert_eq!(config.tick_interval, Duration::from_millis(16));
        }

        #[test]
        fn rejects_negative_thresholds() {
            let err = EngineConfig::from_toml_str("resize_margin = -1.0\n").unwrap_err();
            assert!(matches!(err, OverlayError::ConfigError { .. }));
        }

        #[test]
        fn rejects_zero_tick() {
            assert!(EngineConfig::from_toml_str("tick_interval_ms = 0\n").is_err());
        }
    }
}
