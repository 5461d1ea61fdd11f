#![forbid(unsafe_code)]

//! Snap-point resolution.
//!
//! Picks the candidate rest position nearest to where the element *would*
//! coast to (current position plus projected momentum), not where it is now.
//!
//! # Invariants
//!
//! 1. The snap set is non-empty; an empty set is rejected with
//!    [`FluidError::EmptySnapSet`].
//! 2. Exactly one candidate is returned. A single-element set always
//!    returns that element.
//! 3. Candidate order only matters for exact ties: the first minimum in
//!    iteration order wins.
//! 4. A NaN or infinite projected position cannot choose a candidate and is
//!    reported as [`FluidError::NonFiniteInput`].

use crate::error::{FluidError, Result};
use crate::geometry::{Bounds2D, Vector2};
use crate::projection::{project, project_2d};

/// Index of the candidate nearest `target` (first minimum wins).
fn nearest_index_by<T>(
    candidates: &[T],
    target_is_finite: bool,
    distance: impl Fn(&T) -> f64,
) -> Result<usize> {
    if candidates.is_empty() {
        return Err(FluidError::EmptySnapSet);
    }
    if !target_is_finite {
        return Err(FluidError::NonFiniteInput { name: "projected" });
    }
    let mut best = 0;
    let mut best_distance = distance(&candidates[0]);
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        let d = distance(candidate);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    Ok(best)
}

/// Index of the point nearest `value`.
pub fn nearest_snap_index(value: f64, points: &[f64]) -> Result<usize> {
    nearest_index_by(points, value.is_finite(), |p| (p - value).abs())
}

/// The point nearest `value`.
pub fn nearest_snap_point(value: f64, points: &[f64]) -> Result<f64> {
    nearest_snap_index(value, points).map(|i| points[i])
}

/// Index of the point nearest the projected rest position.
pub fn project_to_nearest_snap_index(
    current: f64,
    velocity: f64,
    points: &[f64],
    decay_rate: f64,
) -> Result<usize> {
    let projected = current + project(velocity, decay_rate)?;
    nearest_snap_index(projected, points)
}

/// The point nearest the projected rest position.
pub fn project_to_nearest_snap_point(
    current: f64,
    velocity: f64,
    points: &[f64],
    decay_rate: f64,
) -> Result<f64> {
    project_to_nearest_snap_index(current, velocity, points, decay_rate).map(|i| points[i])
}

// ---------------------------------------------------------------------------
// Corners
// ---------------------------------------------------------------------------

/// Named corner of a rectangular area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CornerAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// A named 2D rest position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub anchor: CornerAnchor,
    pub point: Vector2,
}

impl Corner {
    #[must_use]
    pub const fn new(anchor: CornerAnchor, point: Vector2) -> Self {
        Self { anchor, point }
    }

    /// The four corners of `bounds`, in reading order.
    #[must_use]
    pub fn for_bounds(bounds: Bounds2D) -> [Self; 4] {
        let (left, right) = (bounds.x.min(), bounds.x.max());
        let (top, bottom) = (bounds.y.min(), bounds.y.max());
        [
            Self::new(CornerAnchor::TopLeft, Vector2::new(left, top)),
            Self::new(CornerAnchor::TopRight, Vector2::new(right, top)),
            Self::new(CornerAnchor::BottomLeft, Vector2::new(left, bottom)),
            Self::new(CornerAnchor::BottomRight, Vector2::new(right, bottom)),
        ]
    }
}

/// The corner nearest `position` by Euclidean distance.
pub fn nearest_corner(position: Vector2, corners: &[Corner]) -> Result<Corner> {
    let finite = position.x.is_finite() && position.y.is_finite();
    nearest_index_by(corners, finite, |c| c.point.distance(position)).map(|i| corners[i])
}

/// The corner nearest the projected rest position.
pub fn project_to_nearest_corner(
    position: Vector2,
    velocity: Vector2,
    corners: &[Corner],
    decay_rate: f64,
) -> Result<Corner> {
    let projected = position + project_2d(velocity, decay_rate)?;
    nearest_corner(projected, corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds1D;

    const POINTS: [f64; 4] = [0.0, 100.0, 200.0, 300.0];

    #[test]
    fn zero_velocity_snaps_by_distance() {
        assert_eq!(project_to_nearest_snap_point(110.0, 0.0, &POINTS, 0.998).unwrap(), 100.0);
    }

    #[test]
    fn velocity_carries_to_further_point() {
        // 0.5 decay projects 1:1, so 110 + 150 = 260 → 300.
        assert_eq!(project_to_nearest_snap_point(110.0, 150.0, &POINTS, 0.5).unwrap(), 300.0);
        assert_eq!(project_to_nearest_snap_point(110.0, -80.0, &POINTS, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn single_point_always_wins() {
        assert_eq!(project_to_nearest_snap_point(-9e9, 5e5, &[42.0], 0.998).unwrap(), 42.0);
    }

    #[test]
    fn unordered_set_same_answer() {
        let shuffled = [300.0, 0.0, 200.0, 100.0];
        assert_eq!(nearest_snap_point(180.0, &shuffled).unwrap(), 200.0);
        assert_eq!(nearest_snap_point(180.0, &POINTS).unwrap(), 200.0);
    }

    #[test]
    fn exact_tie_picks_first_encountered() {
        assert_eq!(nearest_snap_point(50.0, &[100.0, 0.0]).unwrap(), 100.0);
        assert_eq!(nearest_snap_point(50.0, &[0.0, 100.0]).unwrap(), 0.0);
    }

    #[test]
    fn empty_set_rejected() {
        assert_eq!(nearest_snap_point(0.0, &[]), Err(FluidError::EmptySnapSet));
        assert!(nearest_corner(Vector2::ZERO, &[]).is_err());
    }

    #[test]
    fn invalid_decay_rejected() {
        assert!(matches!(
            project_to_nearest_snap_point(0.0, 1.0, &POINTS, 1.0),
            Err(FluidError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn nan_position_reported() {
        assert_eq!(
            nearest_snap_index(f64::NAN, &POINTS),
            Err(FluidError::NonFiniteInput { name: "projected" })
        );
    }

    #[test]
    fn infinite_position_reported() {
        let err = Err(FluidError::NonFiniteInput { name: "projected" });
        assert_eq!(nearest_snap_point(f64::INFINITY, &POINTS), err);
        assert_eq!(nearest_snap_point(f64::NEG_INFINITY, &POINTS), err);
        assert_eq!(project_to_nearest_snap_point(0.0, 1e308, &POINTS, 0.998), err);
        let corners = Corner::for_bounds(Bounds2D::from_size(100.0, 100.0).unwrap());
        assert_eq!(
            nearest_corner(Vector2::new(f64::INFINITY, 0.0), &corners),
            Err(FluidError::NonFiniteInput { name: "projected" })
        );
    }

    #[test]
    fn corner_resolution_uses_projection() {
        let bounds = Bounds2D::new(
            Bounds1D::new(0.0, 300.0).unwrap(),
            Bounds1D::new(0.0, 600.0).unwrap(),
        );
        let corners = Corner::for_bounds(bounds);
        let origin = Vector2::new(40.0, 50.0);
        let still = project_to_nearest_corner(origin, Vector2::ZERO, &corners, 0.5).unwrap();
        assert_eq!(still.anchor, CornerAnchor::TopLeft);

        let flung = project_to_nearest_corner(
            Vector2::new(40.0, 50.0),
            Vector2::new(200.0, 500.0),
            &corners,
            0.5,
        )
        .unwrap();
        assert_eq!(flung.anchor, CornerAnchor::BottomRight);
        assert_eq!(flung.point, Vector2::new(300.0, 600.0));
    }
}
