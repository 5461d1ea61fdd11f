#![forbid(unsafe_code)]

//! Momentum projection.
//!
//! Given a release velocity and a per-frame decay rate, computes the total
//! distance an object coasts before effectively stopping:
//!
//!   distance = velocity · r / (1 − r)
//!
//! The result is linear in velocity, preserves its sign, and grows without
//! bound as `r → 1`. Axes are projected independently; there is no coupling.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, check_decay_rate};
use crate::geometry::Vector2;

/// Standard scroll-view deceleration.
pub const DECAY_RATE_NORMAL: f64 = 0.998;

/// Faster stop, for paging-like surfaces.
pub const DECAY_RATE_FAST: f64 = 0.99;

/// Coast distance for a 1D velocity.
///
/// Fails with `InvalidParameter` unless `decay_rate ∈ (0, 1)`. Non-finite
/// velocities propagate.
pub fn project(velocity: f64, decay_rate: f64) -> Result<f64> {
    let r = check_decay_rate(decay_rate)?;
    Ok(velocity * r / (1.0 - r))
}

/// Per-axis coast distance for a 2D velocity.
pub fn project_2d(velocity: Vector2, decay_rate: f64) -> Result<Vector2> {
    Ok(Vector2::new(
        project(velocity.x, decay_rate)?,
        project(velocity.y, decay_rate)?,
    ))
}

/// Resting position after coasting from `position`.
pub fn projected_position(
    position: Vector2,
    velocity: Vector2,
    decay_rate: f64,
) -> Result<Vector2> {
    Ok(position + project_2d(velocity, decay_rate)?)
}

/// Projection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ProjectionConfig {
    /// Decay rate in `(0, 1)` (default: [`DECAY_RATE_NORMAL`]).
    pub decay_rate: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            decay_rate: DECAY_RATE_NORMAL,
        }
    }
}
