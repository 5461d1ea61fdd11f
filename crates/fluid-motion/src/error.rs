#![forbid(unsafe_code)]

//! Error taxonomy for the physics core.
//!
//! Every fallible operation fails synchronously with a [`FluidError`]. Contract
//! violations (bad decay rate, non-positive spring response, empty snap set)
//! are rejected rather than clamped: they indicate a configuration bug in the
//! caller. A collapsed range (`min == max`) is *not* an error; rubberbanding
//! treats it as fully resistant.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FluidError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FluidError {
    #[error("invalid parameter `{name}`: expected {expected}, got {value}")]
    InvalidParameter {
        name: &'static str,
        expected: &'static str,
        value: f64,
    },

    #[error("snap set must contain at least one point")]
    EmptySnapSet,

    #[error("unknown spring preset: {name}")]
    UnknownPreset { name: String },

    #[error("non-finite input `{name}` cannot select a snap target")]
    NonFiniteInput { name: &'static str },
}

impl FluidError {
    #[must_use]
    pub fn invalid(name: &'static str, expected: &'static str, value: f64) -> Self {
        Self::InvalidParameter {
            name,
            expected,
            value,
        }
    }

    /// Whether the error is a caller contract violation (as opposed to a
    /// sensor fault surfacing through the inputs).
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::NonFiniteInput { .. })
    }
}

/// Validate a decay rate lies in the open interval `(0, 1)`.
pub(crate) fn check_decay_rate(decay_rate: f64) -> Result<f64> {
    if decay_rate > 0.0 && decay_rate < 1.0 {
        Ok(decay_rate)
    } else {
        Err(FluidError::invalid("decay_rate", "a value in (0, 1)", decay_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message_names_field() {
        let err = FluidError::invalid("response", "> 0", -1.0);
        assert_eq!(
            err.to_string(),
            "invalid parameter `response`: expected > 0, got -1"
        );
        assert!(err.is_contract_violation());
    }

    #[test]
    fn non_finite_is_not_contract_violation() {
        let err = FluidError::NonFiniteInput { name: "position" };
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn decay_rate_bounds_are_exclusive() {
        assert!(check_decay_rate(0.5).is_ok());
        assert!(check_decay_rate(0.0).is_err());
        assert!(check_decay_rate(1.0).is_err());
        assert!(check_decay_rate(1.5).is_err());
        assert!(check_decay_rate(f64::NAN).is_err());
    }
}
