//! Chart motion configuration system
//!
//! This crate provides centralized configuration for the motion engine,
//! loading settings from `motion.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "motion.toml";

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`MotionConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MotionConfig {
    /// Frame pass settings
    pub render: RenderConfig,
    /// Redraw request coalescing
    pub throttle: ThrottleConfig,
    /// Defaults for transitions created by hosts
    pub animation: AnimationConfig,
}

/// Render configuration threaded through every frame pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Force-complete every transition before drawing it
    pub disable_animations: bool,
    /// Outline the measured bounds of every drawn geometry
    pub show_debug_lines: bool,
    /// Spacing between pulled frames while the canvas is invalid
    pub frame_interval_ms: u64,
}

/// Throttler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Minimum delay before a coalesced redraw request runs
    pub delay_ms: u64,
}

/// Default transition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: u64,
    /// Easing name in snake_case (e.g. `ease_out`, `linear`, `bounce_out`)
    pub easing: String,
    /// Additional cycles after the first one
    pub repeat: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            disable_animations: false,
            show_debug_lines: false,
            frame_interval_ms: 16, // ~60fps
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { delay_ms: 10 }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 800,
            easing: "ease_out".to_string(),
            repeat: 0,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl MotionConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from `motion.toml` in the current directory,
    /// or return the default configuration if the file doesn't exist or is invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparsable numeric values are ignored and leave the current value in place.
    pub fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Render settings
        if let Some(val) = lookup("MOTION_DISABLE_ANIMATIONS") {
            self.render.disable_animations = parse_flag(&val);
        }
        if let Some(val) = lookup("MOTION_DEBUG_LINES") {
            self.render.show_debug_lines = parse_flag(&val);
        }
        if let Some(val) = lookup("MOTION_FRAME_INTERVAL_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.render.frame_interval_ms = ms;
            }
        }

        // Throttle settings
        if let Some(val) = lookup("MOTION_THROTTLE_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.throttle.delay_ms = ms;
            }
        }

        // Animation defaults
        if let Some(val) = lookup("MOTION_DURATION_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.animation.duration_ms = ms;
            }
        }
        if let Some(easing) = lookup("MOTION_EASING") {
            self.animation.easing = easing;
        }
        if let Some(val) = lookup("MOTION_REPEAT") {
            if let Ok(repeat) = val.parse::<u32>() {
                self.animation.repeat = repeat;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from motion.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
