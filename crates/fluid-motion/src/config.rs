#![forbid(unsafe_code)]

//! Tunables as data.
//!
//! Every threshold the physics layer consults is grouped into a single
//! [`FluidConfig`] that can be loaded from TOML or JSON at startup (feature
//! `config`).
//!
//! # Loading
//!
//! ```toml
//! # fluid-motion.toml
//! [projection]
//! decay_rate = 0.99
//!
//! [dismiss]
//! progress_threshold = 0.4
//! ```
//!
//! ```rust,ignore
//! let config = FluidConfig::from_toml_file("fluid-motion.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the constant the corresponding module uses, so a
//! partial file only overrides what it names.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drag::SettleConfig;
use crate::projection::ProjectionConfig;
use crate::rubberband::RubberbandConfig;
use crate::spatial::{DismissConfig, SpatialConfig};
use crate::spring::SpringSelection;

/// All physics tunables.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FluidConfig {
    /// Release-speed tiers for picking a settle spring.
    pub spring_selection: SpringSelection,
    pub projection: ProjectionConfig,
    pub rubberband: RubberbandConfig,
    /// Direction inference and transition geometry.
    pub spatial: SpatialConfig,
    pub dismiss: DismissConfig,
    /// Spring rest thresholds.
    pub settle: SettleConfig,
}

impl FluidConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
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
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter is in range.
    ///
    /// Returns one message per problem; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let sel = &self.spring_selection;
        if !(sel.quick >= 0.0 && sel.quick <= sel.momentum && sel.momentum <= sel.flick) {
            errors.push(format!(
                "spring_selection must satisfy 0 <= quick <= momentum <= flick, got {} / {} / {}",
                sel.quick, sel.momentum, sel.flick
            ));
        }

        let r = self.projection.decay_rate;
        if !(r > 0.0 && r < 1.0) {
            errors.push(format!("projection.decay_rate must be in (0, 1), got {r}"));
        }

        if !(self.rubberband.coefficient > 0.0) {
            errors.push(format!(
                "rubberband.coefficient must be > 0, got {}",
                self.rubberband.coefficient
            ));
        }
        if self.rubberband.velocity_adjusted && !(self.rubberband.max_velocity > 0.0) {
            errors.push(format!(
                "rubberband.max_velocity must be > 0 when velocity_adjusted, got {}",
                self.rubberband.max_velocity
            ));
        }

        let spatial = &self.spatial;
        for (name, value) in [
            ("spatial.dead_zone", spatial.dead_zone),
            ("spatial.velocity_threshold", spatial.velocity_threshold),
        ] {
            if !(value >= 0.0) {
                errors.push(format!("{name} must be >= 0, got {value}"));
            }
        }
        for (name, value) in [
            ("spatial.slide_distance_x", spatial.slide_distance_x),
            ("spatial.slide_distance_y", spatial.slide_distance_y),
        ] {
            if !value.is_finite() {
                errors.push(format!("{name} must be finite, got {value}"));
            }
        }
        if !(spatial.center_scale > 0.0) {
            errors.push(format!(
                "spatial.center_scale must be > 0, got {}",
                spatial.center_scale
            ));
        }

        let dismiss = &self.dismiss;
        for (name, value) in [
            ("dismiss.progress_threshold", dismiss.progress_threshold),
            ("dismiss.min_progress", dismiss.min_progress),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be in [0, 1], got {value}"));
            }
        }
        if !(dismiss.velocity_threshold >= 0.0) {
            errors.push(format!(
                "dismiss.velocity_threshold must be >= 0, got {}",
                dismiss.velocity_threshold
            ));
        }

        for (name, value) in [
            ("settle.rest_displacement", self.settle.rest_displacement),
            ("settle.rest_velocity", self.settle.rest_velocity),
        ] {
            if !(value > 0.0) {
                errors.push(format!("{name} must be > 0, got {value}"));
            }
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`FluidConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[source] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::DECAY_RATE_NORMAL;

    #[test]
    fn default_matches_module_defaults() {
        let config = FluidConfig::default();
        assert_eq!(config.projection.decay_rate, DECAY_RATE_NORMAL);
        assert_eq!(config.rubberband.coefficient, 0.55);
        assert_eq!(config.spatial.dead_zone, 20.0);
        assert_eq!(config.spatial.velocity_threshold, 100.0);
        assert_eq!(config.dismiss.progress_threshold, 0.5);
        assert_eq!(config.dismiss.velocity_threshold, 500.0);
        assert_eq!(config.dismiss.min_progress, 0.1);
        assert_eq!(config.spring_selection.flick, 2000.0);
        assert_eq!(config.settle.rest_displacement, 0.01);
    }

    #[test]
    fn default_validates_clean() {
        let errors = FluidConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn validate_catches_bad_decay_rate() {
        let mut config = FluidConfig::default();
        config.projection.decay_rate = 1.0;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("projection.decay_rate")));
    }

    #[test]
    fn validate_catches_nan() {
        let mut config = FluidConfig::default();
        config.rubberband.coefficient = f64::NAN;
        config.settle.rest_velocity = f64::NAN;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("rubberband.coefficient")));
        assert!(errors.iter().any(|e| e.contains("settle.rest_velocity")));
    }

    #[test]
    fn validate_catches_unordered_tiers() {
        let mut config = FluidConfig::default();
        config.spring_selection.quick = 5000.0;
        assert!(config.validate().iter().any(|e| e.contains("spring_selection")));
    }

    #[test]
    fn multiple_validation_errors_collected() {
        let mut config = FluidConfig::default();
        config.projection.decay_rate = 0.0;
        config.dismiss.progress_threshold = 2.0;
        config.spatial.center_scale = 0.0;
        let err = config.validated().unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 3, "{errors:?}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_preserves_defaults() {
        let config = FluidConfig::from_toml_str(
            r#"
            [projection]
            decay_rate = 0.99

            [dismiss]
            progress_threshold = 0.4
            "#,
        )
        .unwrap();
        assert_eq!(config.projection.decay_rate, 0.99);
        assert_eq!(config.dismiss.progress_threshold, 0.4);
        assert_eq!(config.dismiss.velocity_threshold, 500.0);
        assert_eq!(config.rubberband, RubberbandConfig::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_round_trips_through_loader() {
        let mut config = FluidConfig::default();
        config.spatial.dead_zone = 12.0;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(FluidConfig::from_json_str(&json).unwrap(), config);
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_toml_reports_parse_error() {
        let err = FluidConfig::from_toml_str("[projection\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn missing_file_is_io_error() {
        let err = FluidConfig::from_toml_file("/nonexistent/fluid-motion.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
