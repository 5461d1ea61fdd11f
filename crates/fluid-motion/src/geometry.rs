#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! [`Vector2`] is used polymorphically for positions, velocities and
//! translations. [`Bounds1D`] / [`Bounds2D`] describe the range an element may
//! rest in; rubberbanding applies past either edge.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::error::{FluidError, Result};

/// A 2D vector in points (or points/second for velocities).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Component along an axis.
    #[inline]
    #[must_use]
    pub fn get(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Replace the component along an axis.
    #[inline]
    #[must_use]
    pub fn with(self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(value, self.y),
            Axis::Vertical => Self::new(self.x, value),
        }
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Motion axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A closed range `[min, max]` along one axis.
///
/// `min == max` is a valid, collapsed range: any offset past it is fully
/// resisted by rubberbanding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds1D {
    min: f64,
    max: f64,
}

impl Bounds1D {
    /// Create a range. Fails if `min > max`, either end is NaN, or the
    /// range contains no finite value. One-sided ranges such as `[0, ∞)`
    /// are accepted.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min.is_nan() || max.is_nan() {
            return Err(FluidError::invalid("bounds", "non-NaN edges", f64::NAN));
        }
        if min == f64::INFINITY {
            return Err(FluidError::invalid("bounds.min", "< +inf", min));
        }
        if max == f64::NEG_INFINITY {
            return Err(FluidError::invalid("bounds.max", "> -inf", max));
        }
        if min > max {
            return Err(FluidError::invalid("bounds.min", "<= bounds.max", min));
        }
        Ok(Self { min, max })
    }

    /// A collapsed range at a single point.
    #[must_use]
    pub const fn point(at: f64) -> Self {
        Self { min: at, max: at }
    }

    #[inline]
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Length of the range (`max - min`).
    #[inline]
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Inclusive containment.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Hard clamp into the range. NaN passes through.
    #[inline]
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Two independent ranges, one per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub x: Bounds1D,
    pub y: Bounds1D,
}

impl Bounds2D {
    #[must_use]
    pub const fn new(x: Bounds1D, y: Bounds1D) -> Self {
        Self { x, y }
    }

    /// Bounds spanning `[0, width] × [0, height]`.
    pub fn from_size(width: f64, height: f64) -> Result<Self> {
        Ok(Self::new(Bounds1D::new(0.0, width)?, Bounds1D::new(0.0, height)?))
    }

    #[inline]
    #[must_use]
    pub fn axis(&self, axis: Axis) -> Bounds1D {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, point: Vector2) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }

    /// Hard clamp a point into the bounds.
    #[inline]
    #[must_use]
    pub fn clamp(&self, point: Vector2) -> Vector2 {
        Vector2::new(self.x.clamp(point.x), self.y.clamp(point.y))
    }
}
