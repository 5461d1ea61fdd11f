#![forbid(unsafe_code)]

//! Perceptual spring model.
//!
//! Designers tune springs with two perceptual parameters rather than raw
//! physics constants:
//!
//! - **damping ratio** (ζ): 1.0 is critically damped (no overshoot); values
//!   below 1.0 overshoot perceptibly.
//! - **response** (seconds): the time constant of the motion. Shorter is
//!   snappier.
//!
//! [`FluidSpring::to_coefficients`] converts these into the stiffness and
//! damping a unit-mass oscillator needs:
//!
//!   stiffness = (2π / response)²
//!   damping   = 4π · ζ / response
//!
//! # Invariants
//!
//! 1. `response > 0` and `damping_ratio > 0` for every constructed spring.
//! 2. Shorter response ⇒ strictly higher stiffness.
//! 3. Higher damping ratio ⇒ strictly higher damping at fixed response.
//! 4. [`FluidSpring::blend`] never extrapolates: the factor is clamped to
//!    `[0, 1]`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{FluidError, Result};

/// A spring described by damping ratio and response time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidSpring {
    damping_ratio: f64,
    response: f64,
}

impl FluidSpring {
    /// Create a custom spring. Both parameters must be strictly positive.
    pub fn new(damping_ratio: f64, response: f64) -> Result<Self> {
        if response.is_nan() || response <= 0.0 {
            return Err(FluidError::invalid("response", "> 0 seconds", response));
        }
        if damping_ratio.is_nan() || damping_ratio <= 0.0 {
            return Err(FluidError::invalid("damping_ratio", "> 0", damping_ratio));
        }
        Ok(Self {
            damping_ratio,
            response,
        })
    }

    const fn preset(damping_ratio: f64, response: f64) -> Self {
        Self {
            damping_ratio,
            response,
        }
    }

    #[inline]
    #[must_use]
    pub const fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    #[inline]
    #[must_use]
    pub const fn response(&self) -> f64 {
        self.response
    }

    /// Derive oscillator coefficients (unit mass, no seeded velocity).
    #[must_use]
    pub fn to_coefficients(&self) -> SpringCoefficients {
        let omega = 2.0 * PI / self.response;
        SpringCoefficients {
            stiffness: omega * omega,
            damping: 4.0 * PI * self.damping_ratio / self.response,
            mass: 1.0,
            velocity: None,
        }
    }

    /// Interpolate damping ratio and response independently.
    ///
    /// `factor` is clamped to `[0, 1]` first; 0 yields `a`, 1 yields `b`.
    #[must_use]
    pub fn blend(a: Self, b: Self, factor: f64) -> Self {
        let t = factor.clamp(0.0, 1.0);
        Self {
            damping_ratio: a.damping_ratio * (1.0 - t) + b.damping_ratio * t,
            response: a.response * (1.0 - t) + b.response * t,
        }
    }

    /// Whether the spring overshoots its target.
    #[inline]
    #[must_use]
    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio < 1.0
    }

    /// Whether the spring approaches its target slower than critical.
    #[inline]
    #[must_use]
    pub fn is_overdamped(&self) -> bool {
        self.damping_ratio > 1.0
    }
}

impl From<SpringPreset> for FluidSpring {
    fn from(preset: SpringPreset) -> Self {
        preset.spring()
    }
}

/// Physical coefficients for a damped oscillator. Always derived, never
/// hand-authored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCoefficients {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Initial velocity to seed the motion with, if any.
    pub velocity: Option<f64>,
}

impl SpringCoefficients {
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Damping at which the oscillator converges fastest without overshoot.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Named spring presets.
///
/// Resolved once at configuration time; string names go through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum SpringPreset {
    /// Fast, no overshoot. Button feedback, small moves.
    Quick,
    /// Default settle, no overshoot.
    Smooth,
    /// Quick with a hint of overshoot.
    Snappy,
    /// Playful overshoot.
    Bouncy,
    /// Soft, unhurried.
    Gentle,
    /// Settling after a medium-speed release.
    Momentum,
    /// Settling after a hard flick.
    Flick,
    /// Bottom sheets and drawers.
    Sheet,
    /// Background transitions.
    Slow,
}

impl SpringPreset {
    pub const ALL: [Self; 9] = [
        Self::Quick,
        Self::Smooth,
        Self::Snappy,
        Self::Bouncy,
        Self::Gentle,
        Self::Momentum,
        Self::Flick,
        Self::Sheet,
        Self::Slow,
    ];

    #[must_use]
    pub const fn spring(self) -> FluidSpring {
        match self {
            Self::Quick => FluidSpring::preset(1.0, 0.25),
            Self::Smooth => FluidSpring::preset(1.0, 0.4),
            Self::Snappy => FluidSpring::preset(0.85, 0.3),
            Self::Bouncy => FluidSpring::preset(0.6, 0.5),
            Self::Gentle => FluidSpring::preset(1.0, 0.6),
            Self::Momentum => FluidSpring::preset(0.9, 0.45),
            Self::Flick => FluidSpring::preset(0.85, 0.2),
            Self::Sheet => FluidSpring::preset(0.9, 0.35),
            Self::Slow => FluidSpring::preset(1.0, 0.8),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Smooth => "smooth",
            Self::Snappy => "snappy",
            Self::Bouncy => "bouncy",
            Self::Gentle => "gentle",
            Self::Momentum => "momentum",
            Self::Flick => "flick",
            Self::Sheet => "sheet",
            Self::Slow => "slow",
        }
    }
}

impl fmt::Display for SpringPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpringPreset {
    type Err = FluidError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FluidError::UnknownPreset { name: s.to_owned() })
    }
}

// ---------------------------------------------------------------------------
// Velocity-based selection
// ---------------------------------------------------------------------------

/// Speed thresholds (points/second) for [`SpringSelection::for_velocity`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SpringSelection {
    /// Speeds above this use [`SpringPreset::Flick`] (default: 2000).
    pub flick: f64,
    /// Speeds above this use [`SpringPreset::Momentum`] (default: 1000).
    pub momentum: f64,
    /// Speeds above this use [`SpringPreset::Quick`] (default: 500).
    pub quick: f64,
}

impl Default for SpringSelection {
    fn default() -> Self {
        Self {
            flick: 2000.0,
            momentum: 1000.0,
            quick: 500.0,
        }
    }
}

impl SpringSelection {
    /// Pick a preset for a release speed. Sign is ignored; the cascade is
    /// checked from the fastest tier down and falls back to `Smooth`.
    #[must_use]
    pub fn for_velocity(&self, velocity: f64) -> SpringPreset {
        let speed = velocity.abs();
        if speed > self.flick {
            SpringPreset::Flick
        } else if speed > self.momentum {
            SpringPreset::Momentum
        } else if speed > self.quick {
            SpringPreset::Quick
        } else {
            SpringPreset::Smooth
        }
    }
}

/// [`SpringSelection::for_velocity`] with default thresholds.
#[must_use]
pub fn spring_for_velocity(velocity: f64) -> SpringPreset {
    SpringSelection::default().for_velocity(velocity)
}
