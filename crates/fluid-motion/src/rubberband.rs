#![forbid(unsafe_code)]

//! Rubberband resistance past a boundary.
//!
//! Motion beyond an edge is mapped through a logarithmic curve so that each
//! additional point of drag buys less displacement:
//!
//!   band(x) = L · c · ln(1 + |x| / (c · L))      (sign of x restored)
//!
//! where `L` is the characteristic limit (usually the bounded range) and `c`
//! the coefficient.
//!
//! # Invariants
//!
//! 1. `band(0) == 0`.
//! 2. Monotonically increasing and strictly sub-linear in `|x|`:
//!    `band(x) < x` for `x > 0`.
//! 3. A *higher* coefficient means *less* resistance (more travel) for the
//!    same offset.
//! 4. A zero limit (collapsed range) is fully resistant: every offset maps
//!    to the boundary.
//! 5. NaN inputs propagate.
//! 6. An unbounded range (`[0, ∞)`) still resists with a finite result,
//!    using [`UNBOUNDED_LIMIT`] as the characteristic limit.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Bounds1D, Bounds2D, Vector2};

/// Stiff edge.
pub const COEFFICIENT_TIGHT: f64 = 0.35;
/// Default edge feel.
pub const COEFFICIENT_DEFAULT: f64 = 0.55;
/// Loose edge.
pub const COEFFICIENT_LOOSE: f64 = 0.7;

/// Characteristic limit used when the range is infinite, in points.
pub const UNBOUNDED_LIMIT: f64 = 1000.0;

/// Maximum boost [`velocity_adjusted_coefficient`] applies at full speed.
const VELOCITY_BOOST: f64 = 0.2;

/// Resisted displacement for an `offset` past the boundary.
#[must_use]
pub fn rubberband(offset: f64, limit: f64, coefficient: f64) -> f64 {
    if offset.is_nan() {
        return offset;
    }
    let limit = if limit == f64::INFINITY { UNBOUNDED_LIMIT } else { limit };
    let scale = coefficient * limit;
    if scale <= 0.0 {
        // Collapsed range: pinned to the boundary.
        return 0.0;
    }
    let band = scale * (offset.abs() / scale).ln_1p();
    band.copysign(offset)
}

/// Raw offset that [`rubberband`] maps to `resisted`.
///
/// Exact inverse for a positive scale. A collapsed range has no inverse and
/// returns `resisted` unchanged.
#[must_use]
pub fn rubberband_inverse(resisted: f64, limit: f64, coefficient: f64) -> f64 {
    if resisted.is_nan() {
        return resisted;
    }
    let limit = if limit == f64::INFINITY { UNBOUNDED_LIMIT } else { limit };
    let scale = coefficient * limit;
    if scale <= 0.0 {
        return resisted;
    }
    let raw = scale * (resisted.abs() / scale).exp_m1();
    raw.copysign(resisted)
}

/// Apply rubberbanding to `value` outside `[min, max]`.
///
/// Values inside the range pass through unchanged; values outside are
/// pulled toward the crossed edge using the range length as the limit.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64, coefficient: f64) -> f64 {
    let range = max - min;
    if value < min {
        min - rubberband(min - value, range, coefficient)
    } else if value > max {
        max + rubberband(value - max, range, coefficient)
    } else {
        value
    }
}

/// Raw value that [`clamp`] renders at `value`.
///
/// Identity inside the range. Falls back to `value` itself when the inverse
/// overflows, so a finite input always yields a finite result.
#[must_use]
pub fn unclamp(value: f64, min: f64, max: f64, coefficient: f64) -> f64 {
    let range = max - min;
    let raw = if value < min {
        min - rubberband_inverse(min - value, range, coefficient)
    } else if value > max {
        max + rubberband_inverse(value - max, range, coefficient)
    } else {
        value
    };
    if raw.is_finite() || !value.is_finite() {
        raw
    } else {
        value
    }
}

/// [`unclamp`] against a [`Bounds1D`].
#[must_use]
pub fn unclamp_bounds(value: f64, bounds: Bounds1D, coefficient: f64) -> f64 {
    unclamp(value, bounds.min(), bounds.max(), coefficient)
}

/// [`clamp`] against a [`Bounds1D`].
#[must_use]
pub fn clamp_bounds(value: f64, bounds: Bounds1D, coefficient: f64) -> f64 {
    clamp(value, bounds.min(), bounds.max(), coefficient)
}

/// Per-axis [`clamp`] against a [`Bounds2D`].
#[must_use]
pub fn clamp_2d(point: Vector2, bounds: Bounds2D, coefficient: f64) -> Vector2 {
    Vector2::new(
        clamp_bounds(point.x, bounds.x, coefficient),
        clamp_bounds(point.y, bounds.y, coefficient),
    )
}

/// Fraction of the raw offset swallowed by resistance.
///
/// 0 for a zero offset, tends to 1 as `|offset|` grows.
#[must_use]
pub fn resistance_factor(offset: f64, limit: f64, coefficient: f64) -> f64 {
    if offset == 0.0 {
        return 0.0;
    }
    let magnitude = offset.abs();
    1.0 - rubberband(magnitude, limit, coefficient) / magnitude
}

/// Loosen `base` by up to 20% as `|velocity|` approaches `max_velocity`.
///
/// Fast motion gets *more* give at the edge, not less. Speeds beyond
/// `max_velocity` are saturated; a non-positive `max_velocity` saturates
/// immediately.
#[must_use]
pub fn velocity_adjusted_coefficient(base: f64, velocity: f64, max_velocity: f64) -> f64 {
    let ratio = if max_velocity > 0.0 {
        (velocity.abs() / max_velocity).min(1.0)
    } else {
        1.0
    };
    base * (1.0 + VELOCITY_BOOST * ratio)
}

// ---------------------------------------------------------------------------
// Edge helpers
// ---------------------------------------------------------------------------

/// The boundary a value has crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
    None,
}

/// Name the boundary crossed along `axis`, or [`Edge::None`] when inside
/// (boundaries inclusive).
#[must_use]
pub fn detect_edge(value: f64, min: f64, max: f64, axis: Axis) -> Edge {
    match axis {
        Axis::Horizontal if value < min => Edge::Left,
        Axis::Horizontal if value > max => Edge::Right,
        Axis::Vertical if value < min => Edge::Top,
        Axis::Vertical if value > max => Edge::Bottom,
        _ => Edge::None,
    }
}

/// Signed distance past the crossed boundary; 0 inside or on an edge.
#[must_use]
pub fn overscroll(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        value - min
    } else if value > max {
        value - max
    } else {
        0.0
    }
}

/// Whether `value` lies strictly outside `[min, max]`.
#[must_use]
pub fn is_overscrolling(value: f64, min: f64, max: f64) -> bool {
    overscroll(value, min, max) != 0.0
}

/// Rubberband settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RubberbandConfig {
    /// Resistance coefficient (default: [`COEFFICIENT_DEFAULT`]).
    pub coefficient: f64,
    /// Speed at which the velocity boost saturates (default: 3000).
    pub max_velocity: f64,
    /// Whether live drags loosen the edge with speed (default: false).
    pub velocity_adjusted: bool,
}

impl Default for RubberbandConfig {
    fn default() -> Self {
        Self {
            coefficient: COEFFICIENT_DEFAULT,
            max_velocity: 3000.0,
            velocity_adjusted: false,
        }
    }
}

impl RubberbandConfig {
    /// Coefficient to use for a drag moving at `velocity`.
    #[must_use]
    pub fn coefficient_for(&self, velocity: f64) -> f64 {
        if self.velocity_adjusted {
            velocity_adjusted_coefficient(self.coefficient, velocity, self.max_velocity)
        } else {
            self.coefficient
        }
    }
}
