#![forbid(unsafe_code)]

//! Damped harmonic oscillator integrator.
//!
//! Drives a value toward a target with the classical spring equation:
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!   a = F / mass
//!
//! Coefficients come from [`FluidSpring::to_coefficients`]; a seeded
//! velocity (the release velocity of a gesture) carries straight into the
//! motion.
//!
//! # Integration
//!
//! Semi-implicit Euler. Large frame deltas are subdivided into steps of at
//! most 4 ms so stiff springs stay stable.
//!
//! # Invariants
//!
//! 1. Once at rest, position equals the target exactly and velocity is 0.
//! 2. A motion at rest does not move again unless retargeted or kicked.
//! 3. Zero or negative `dt` is a no-op.

use std::time::Duration;

use super::Animation;
use crate::spring::{FluidSpring, SpringCoefficients};

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Default displacement below which the motion may rest.
pub const DEFAULT_REST_DISPLACEMENT: f64 = 0.01;

/// Default speed below which the motion may rest.
pub const DEFAULT_REST_VELOCITY: f64 = 0.1;

/// A spring-driven motion from a start position toward a target.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use fluid_motion::animation::{Animation, SpringMotion};
/// use fluid_motion::spring::SpringPreset;
///
/// let mut motion = SpringMotion::new(0.0, 100.0, SpringPreset::Smooth.spring());
/// for _ in 0..240 {
///     motion.tick(Duration::from_millis(16));
/// }
/// assert!(motion.is_complete());
/// assert_eq!(motion.position(), 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct SpringMotion {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    rest_displacement: f64,
    rest_velocity: f64,
    at_rest: bool,
}

impl SpringMotion {
    /// Start at `from` with zero velocity, heading for `to`.
    #[must_use]
    pub fn new(from: f64, to: f64, spring: FluidSpring) -> Self {
        Self::from_coefficients(from, to, spring.to_coefficients())
    }

    /// Start from explicit coefficients. A seeded `velocity` in the
    /// coefficients becomes the initial velocity.
    #[must_use]
    pub fn from_coefficients(from: f64, to: f64, coefficients: SpringCoefficients) -> Self {
        Self {
            position: from,
            velocity: coefficients.velocity.unwrap_or(0.0),
            target: to,
            stiffness: coefficients.stiffness,
            damping: coefficients.damping,
            mass: coefficients.mass,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_velocity: DEFAULT_REST_VELOCITY,
            at_rest: false,
        }
    }

    /// Set the rest thresholds (builder pattern). Negative values take abs.
    #[must_use]
    pub fn with_rest_thresholds(mut self, displacement: f64, velocity: f64) -> Self {
        self.rest_displacement = displacement.abs();
        self.rest_velocity = velocity.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Change the target. Wakes the motion if it was at rest.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_displacement {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Add to the velocity. Wakes the motion.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let force = -self.stiffness * displacement - self.damping * self.velocity;
        let acceleration = force / self.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < self.rest_displacement
            && self.velocity.abs() < self.rest_velocity
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for SpringMotion {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }
}
