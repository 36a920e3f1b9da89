#![forbid(unsafe_code)]

//! Canvas interaction configuration.
//!
//! [`CanvasConfig`] groups the tunable knobs of the canvas host. With the
//! `config` feature it can be loaded from TOML or JSON:
//!
//! ```toml
//! # canvas.toml
//! hit_tolerance = 3
//! fallback_on_rejected_start = true
//! cancel_on_new_press = true
//! ```
//!
//! ```rust,ignore
//! let config = CanvasConfig::from_toml_file("canvas.toml")?;
//! ```
//!
//! Every field has a default, so a partial file is valid.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canvas interaction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CanvasConfig {
    /// Extra canvas units around component bounds when picking a target
    /// (default: 2).
    pub hit_tolerance: i32,
    /// When a target rejects the start of a poke, reinterpret the press as a
    /// selection gesture (default: true). When false the gesture just ends.
    pub fallback_on_rejected_start: bool,
    /// A press that arrives while a gesture is still active cancels that
    /// gesture first (default: true). When false the press is ignored.
    pub cancel_on_new_press: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: 2,
            fallback_on_rejected_start: true,
            cancel_on_new_press: true,
        }
    }
}

impl CanvasConfig {
    #[must_use]
    pub fn with_hit_tolerance(mut self, tolerance: i32) -> Self {
        self.hit_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_fallback_on_rejected_start(mut self, enabled: bool) -> Self {
        self.fallback_on_rejected_start = enabled;
        self
    }

    #[must_use]
    pub fn with_cancel_on_new_press(mut self, enabled: bool) -> Self {
        self.cancel_on_new_press = enabled;
        self
    }

    /// Validate parameter ranges. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.hit_tolerance < 0 {
            errors.push(format!(
                "hit_tolerance must be >= 0, got {}",
                self.hit_tolerance
            ));
        }
        if self.hit_tolerance > 64 {
            errors.push(format!(
                "hit_tolerance must be <= 64, got {}",
                self.hit_tolerance
            ));
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// `Ok(self)` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`CanvasConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read canvas config: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("failed to parse canvas config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("failed to parse canvas config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid canvas config: {}", .0.join("; "))]
    Validation(Vec<String>),
}
