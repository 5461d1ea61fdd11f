#![forbid(unsafe_code)]

//! Spatial consistency for enter/exit transitions.
//!
//! An element that entered from the left must leave to the left. The
//! [`OriginRegistry`] remembers, per element, the [`Direction`] it entered
//! from; [`enter_transform`] and [`exit_transform`] are the same pure
//! function of that direction, so exits mirror entries by construction.
//!
//! The registry is an explicitly constructed store owned by the navigation
//! layer. Entries live until [`OriginRegistry::clear`] or
//! [`OriginRegistry::clear_all`]; nothing expires on its own.
//!
//! # Invariants
//!
//! 1. `enter_transform(d) == exit_transform(d)` for every direction.
//! 2. `d.opposite().opposite() == d`; `Center` and `None` are fixed points.
//! 3. Dismiss progress is always in `[0, 1]` (NaN propagates); motion in the
//!    wrong direction yields 0.
//! 4. A flick with almost no travel never dismisses.

use std::hash::Hash;

use ahash::AHashMap;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::geometry::Vector2;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Where an element came from (or goes to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    /// From the center: scale and fade, no translation.
    #[default]
    Center,
    /// No spatial relationship: the element is simply visible.
    None,
}

impl Direction {
    pub const ALL: [Self; 6] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::Center,
        Self::None,
    ];

    /// Flip left↔right and up↔down. Identity on `Center` and `None`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Center => Self::Center,
            Self::None => Self::None,
        }
    }

    #[must_use]
    pub const fn is_directional(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Up | Self::Down)
    }
}

/// Direction an element entered from, plus the optional point it came from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpatialOrigin {
    pub direction: Direction,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl SpatialOrigin {
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            x: None,
            y: None,
        }
    }

    #[must_use]
    pub const fn at(direction: Direction, point: Vector2) -> Self {
        Self {
            direction,
            x: Some(point.x),
            y: Some(point.y),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Keyed store of element origins.
#[derive(Debug, Clone)]
pub struct OriginRegistry<K: Eq + Hash = String> {
    origins: AHashMap<K, SpatialOrigin>,
}

impl<K: Eq + Hash> Default for OriginRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> OriginRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origins: AHashMap::new(),
        }
    }

    /// Record (or overwrite) the origin of `id`.
    pub fn set_origin(&mut self, id: K, origin: SpatialOrigin) {
        tracing::trace!(direction = ?origin.direction, "origin registered");
        self.origins.insert(id, origin);
    }

    /// Origin of `id`; unknown ids come from the center.
    #[must_use]
    pub fn origin(&self, id: &K) -> SpatialOrigin {
        self.origins.get(id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn has(&self, id: &K) -> bool {
        self.origins.contains_key(id)
    }

    /// Forget `id`. Returns the removed origin, if any.
    pub fn clear(&mut self, id: &K) -> Option<SpatialOrigin> {
        self.origins.remove(id)
    }

    pub fn clear_all(&mut self) {
        tracing::trace!(count = self.origins.len(), "origins cleared");
        self.origins.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Transform for the exit of `id`, mirroring its entry.
    #[must_use]
    pub fn exit_transform(&self, id: &K, config: &SpatialConfig) -> TransformState {
        exit_transform(self.origin(id).direction, config)
    }
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// Visual transform of an element at the edge of an enter/exit transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    /// In `[0, 1]`.
    pub opacity: f64,
}

impl TransformState {
    /// Fully visible, untransformed.
    pub const VISIBLE: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    /// Linear interpolation; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, to: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a * (1.0 - t) + b * t;
        Self {
            translate_x: mix(self.translate_x, to.translate_x),
            translate_y: mix(self.translate_y, to.translate_y),
            scale: mix(self.scale, to.scale),
            opacity: mix(self.opacity, to.opacity).clamp(0.0, 1.0),
        }
    }
}

/// Off-screen transform an element enters from.
#[must_use]
pub fn enter_transform(direction: Direction, config: &SpatialConfig) -> TransformState {
    let slide = |translate_x, translate_y| TransformState {
        translate_x,
        translate_y,
        scale: 1.0,
        opacity: 1.0,
    };
    match direction {
        Direction::Left => slide(-config.slide_distance_x, 0.0),
        Direction::Right => slide(config.slide_distance_x, 0.0),
        Direction::Up => slide(0.0, -config.slide_distance_y),
        Direction::Down => slide(0.0, config.slide_distance_y),
        Direction::Center => TransformState {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: config.center_scale,
            opacity: 0.0,
        },
        Direction::None => TransformState::VISIBLE,
    }
}

/// Off-screen transform an element exits to. Identical to
/// [`enter_transform`] for the same direction.
#[must_use]
pub fn exit_transform(direction: Direction, config: &SpatialConfig) -> TransformState {
    enter_transform(direction, config)
}

/// Transform part-way through a transition: 0 is the off-screen origin
/// transform, 1 is fully visible.
#[must_use]
pub fn transition_transform(
    direction: Direction,
    progress: f64,
    config: &SpatialConfig,
) -> TransformState {
    enter_transform(direction, config).lerp(TransformState::VISIBLE, progress)
}

// ---------------------------------------------------------------------------
// Direction inference
// ---------------------------------------------------------------------------

/// Direction of `position` relative to `center`, by the dominant axis.
///
/// Within the dead zone on both axes the result is `Center`.
#[must_use]
pub fn direction_from_position(
    position: Vector2,
    center: Vector2,
    config: &SpatialConfig,
) -> Direction {
    let dx = position.x - center.x;
    let dy = position.y - center.y;
    if dx.abs() <= config.dead_zone && dy.abs() <= config.dead_zone {
        return Direction::Center;
    }
    dominant_direction(dx, dy)
}

/// Direction of travel by the dominant axis; `None` when both axis speeds
/// are below the velocity threshold.
#[must_use]
pub fn direction_from_velocity(velocity: Vector2, config: &SpatialConfig) -> Direction {
    let threshold = config.velocity_threshold;
    if velocity.x.abs() < threshold && velocity.y.abs() < threshold {
        return Direction::None;
    }
    dominant_direction(velocity.x, velocity.y)
}

fn dominant_direction(dx: f64, dy: f64) -> Direction {
    if dx.abs() > dy.abs() {
        if dx < 0.0 { Direction::Left } else { Direction::Right }
    } else if dy < 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

// ---------------------------------------------------------------------------
// Dismiss
// ---------------------------------------------------------------------------

/// Displacement along the dismiss direction (Euclidean for `Center`).
fn dismiss_displacement(direction: Direction, delta: Vector2) -> f64 {
    match direction {
        Direction::Left => -delta.x,
        Direction::Right => delta.x,
        Direction::Up => -delta.y,
        Direction::Down => delta.y,
        Direction::Center => delta.length(),
        Direction::None => 0.0,
    }
}

/// How far a dismiss gesture has progressed, in `[0, 1]`.
///
/// Motion against the dismiss direction yields 0. A non-positive
/// `threshold` treats any forward motion as complete.
#[must_use]
pub fn dismiss_progress(
    direction: Direction,
    translation_x: f64,
    translation_y: f64,
    threshold: f64,
) -> f64 {
    let displacement = dismiss_displacement(direction, Vector2::new(translation_x, translation_y));
    if threshold <= 0.0 {
        return if displacement > 0.0 { 1.0 } else { 0.0 };
    }
    (displacement / threshold).clamp(0.0, 1.0)
}

/// Signed speed in the dismiss direction; negative when moving back toward
/// the origin.
#[must_use]
pub fn dismiss_velocity(direction: Direction, velocity: Vector2) -> f64 {
    dismiss_displacement(direction, velocity)
}

/// Dismiss thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DismissConfig {
    /// Progress that dismisses on its own (default: 0.5).
    pub progress_threshold: f64,
    /// Speed that dismisses with minimal progress (default: 500).
    pub velocity_threshold: f64,
    /// Progress a fast flick still needs (default: 0.1).
    pub min_progress: f64,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self {
            progress_threshold: 0.5,
            velocity_threshold: 500.0,
            min_progress: 0.1,
        }
    }
}

impl DismissConfig {
    /// Decide whether a released gesture dismisses.
    ///
    /// `velocity` is the signed speed in the dismiss direction (see
    /// [`dismiss_velocity`]).
    #[must_use]
    pub fn should_dismiss(&self, progress: f64, velocity: f64) -> bool {
        progress > self.progress_threshold
            || (velocity > self.velocity_threshold && progress > self.min_progress)
    }
}

/// [`DismissConfig::should_dismiss`] with default thresholds.
#[must_use]
pub fn should_dismiss(progress: f64, velocity: f64) -> bool {
    DismissConfig::default().should_dismiss(progress, velocity)
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Geometry for transforms and direction inference.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SpatialConfig {
    /// Half-width of the `Center` zone in points (default: 20).
    pub dead_zone: f64,
    /// Minimum axis speed for a direction (default: 100).
    pub velocity_threshold: f64,
    /// Horizontal slide distance (default: 375).
    pub slide_distance_x: f64,
    /// Vertical slide distance (default: 812).
    pub slide_distance_y: f64,
    /// Scale of a `Center` transition's hidden state (default: 0.9).
    pub center_scale: f64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            dead_zone: 20.0,
            velocity_threshold: 100.0,
            slide_distance_x: 375.0,
            slide_distance_y: 812.0,
            center_scale: 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SpatialConfig {
        SpatialConfig::default()
    }

    #[test]
    fn registry_lifecycle() {
        let mut registry = OriginRegistry::new();
        assert_eq!(registry.origin(&"card".to_string()).direction, Direction::Center);
        assert!(!registry.has(&"card".to_string()));

        registry.set_origin("card".to_string(), SpatialOrigin::new(Direction::Left));
        assert!(registry.has(&"card".to_string()));
        assert_eq!(registry.origin(&"card".to_string()).direction, Direction::Left);

        registry.set_origin("card".to_string(), SpatialOrigin::new(Direction::Up));
        assert_eq!(registry.origin(&"card".to_string()).direction, Direction::Up);
        assert_eq!(registry.len(), 1);

        assert!(registry.clear(&"card".to_string()).is_some());
        assert!(registry.is_empty());
        assert!(registry.clear(&"card".to_string()).is_none());
    }

    #[test]
    fn clear_all_isolates() {
        let mut registry: OriginRegistry<u32> = OriginRegistry::new();
        registry.set_origin(1, SpatialOrigin::new(Direction::Right));
        registry.set_origin(2, SpatialOrigin::at(Direction::Down, Vector2::new(4.0, 5.0)));
        assert_eq!(registry.origin(&2).x, Some(4.0));
        registry.clear_all();
        assert!(registry.is_empty());
        assert_eq!(registry.origin(&1), SpatialOrigin::default());
    }

    #[test]
    fn exit_mirrors_entry() {
        for d in Direction::ALL {
            assert_eq!(enter_transform(d, &cfg()), exit_transform(d, &cfg()), "{d:?}");
        }
        let mut registry = OriginRegistry::new();
        registry.set_origin("sheet".to_string(), SpatialOrigin::new(Direction::Left));
        let exit = registry.exit_transform(&"sheet".to_string(), &cfg());
        assert!(exit.translate_x < 0.0);
    }

    #[test]
    fn center_and_none_transforms() {
        let center = enter_transform(Direction::Center, &cfg());
        assert_eq!((center.translate_x, center.translate_y), (0.0, 0.0));
        assert!(center.scale < 1.0);
        assert_eq!(center.opacity, 0.0);
        assert_eq!(enter_transform(Direction::None, &cfg()), TransformState::VISIBLE);
    }

    #[test]
    fn opposite_is_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Center.opposite(), Direction::Center);
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn transition_endpoints() {
        let start = transition_transform(Direction::Right, 0.0, &cfg());
        assert_eq!(start, enter_transform(Direction::Right, &cfg()));
        assert_eq!(transition_transform(Direction::Right, 1.0, &cfg()), TransformState::VISIBLE);
        let mid = transition_transform(Direction::Center, 0.5, &cfg());
        assert!((mid.opacity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn position_direction_with_dead_zone() {
        let c = Vector2::new(100.0, 100.0);
        let near = Vector2::new(110.0, 85.0);
        assert_eq!(direction_from_position(near, c, &cfg()), Direction::Center);
        assert_eq!(direction_from_position(Vector2::new(20.0, 110.0), c, &cfg()), Direction::Left);
        assert_eq!(direction_from_position(Vector2::new(180.0, 90.0), c, &cfg()), Direction::Right);
        assert_eq!(direction_from_position(Vector2::new(90.0, 10.0), c, &cfg()), Direction::Up);
        assert_eq!(direction_from_position(Vector2::new(100.0, 130.0), c, &cfg()), Direction::Down);
    }

    #[test]
    fn velocity_direction_below_threshold_is_none() {
        assert_eq!(direction_from_velocity(Vector2::new(50.0, -99.0), &cfg()), Direction::None);
        assert_eq!(direction_from_velocity(Vector2::new(-400.0, 120.0), &cfg()), Direction::Left);
        assert_eq!(direction_from_velocity(Vector2::new(30.0, 600.0), &cfg()), Direction::Down);
    }

    #[test]
    fn dismiss_progress_clamped_and_directional() {
        assert_eq!(dismiss_progress(Direction::Right, 100.0, 0.0, 200.0), 0.5);
        assert_eq!(dismiss_progress(Direction::Right, -100.0, 0.0, 200.0), 0.0);
        assert_eq!(dismiss_progress(Direction::Left, -400.0, 0.0, 200.0), 1.0);
        assert_eq!(dismiss_progress(Direction::Down, 0.0, 50.0, 100.0), 0.5);
        assert_eq!(dismiss_progress(Direction::Up, 0.0, 50.0, 100.0), 0.0);
        assert_eq!(dismiss_progress(Direction::Center, 30.0, 40.0, 100.0), 0.5);
        assert_eq!(dismiss_progress(Direction::None, 300.0, 300.0, 100.0), 0.0);
        assert!(dismiss_progress(Direction::Right, f64::NAN, 0.0, 100.0).is_nan());
    }

    #[test]
    fn dismiss_decision() {
        assert!(should_dismiss(0.6, 0.0));
        assert!(!should_dismiss(0.05, 1000.0));
        assert!(should_dismiss(0.2, 800.0));
        assert!(!should_dismiss(0.3, 200.0));
        assert!(!should_dismiss(0.3, -800.0));
    }

    #[test]
    fn dismiss_velocity_is_signed() {
        let v = Vector2::new(-600.0, 20.0);
        assert_eq!(dismiss_velocity(Direction::Left, v), 600.0);
        assert_eq!(dismiss_velocity(Direction::Right, v), -600.0);
    }
}
