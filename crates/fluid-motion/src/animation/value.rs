#![forbid(unsafe_code)]

//! Interruptible animatable values.
//!
//! An [`AnimatedValue`] owns one scalar and at most one in-flight
//! [`SpringMotion`]. Every command supersedes whatever was in flight, at
//! once: there is no queueing and no merging of old and new motion.
//!
//! | Command | Motion | Velocity afterwards |
//! |---------|--------|---------------------|
//! | [`animate_to`](AnimatedValue::animate_to) | new spring | current (if preserved) or 0 |
//! | [`redirect`](AnimatedValue::redirect) | new spring | current, always |
//! | [`set_immediately`](AnimatedValue::set_immediately) | none, jumps | 0 |
//! | [`cancel`](AnimatedValue::cancel) | none, stays in place | 0 |
//!
//! # Invariants
//!
//! 1. A completion callback fires exactly once, and only for a motion that
//!    reached rest. Superseded motions drop their callback unfired.
//! 2. On natural completion the value equals the target and velocity is 0.
//! 3. `set_immediately(x)` twice in a row leaves the same state.

use std::fmt;
use std::time::Duration;

use super::Animation;
use super::spring::{DEFAULT_REST_DISPLACEMENT, DEFAULT_REST_VELOCITY, SpringMotion};
use crate::geometry::Vector2;
use crate::spring::FluidSpring;

/// Identifies one commanded motion of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MotionId(u64);

type Completion<T> = Box<dyn FnOnce(T)>;

struct ActiveMotion {
    id: MotionId,
    motion: SpringMotion,
    on_complete: Option<Completion<f64>>,
}

/// A single-owner animatable scalar.
pub struct AnimatedValue {
    value: f64,
    velocity: f64,
    active: Option<ActiveMotion>,
    next_id: u64,
    rest_displacement: f64,
    rest_velocity: f64,
}

impl fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("value", &self.value)
            .field("velocity", &self.velocity)
            .field("target", &self.target())
            .field("motion", &self.active.as_ref().map(|a| a.id))
            .finish()
    }
}

impl AnimatedValue {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            velocity: 0.0,
            active: None,
            next_id: 0,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_velocity: DEFAULT_REST_VELOCITY,
        }
    }

    /// Rest thresholds applied to every motion started afterwards.
    #[must_use]
    pub fn with_rest_thresholds(mut self, displacement: f64, velocity: f64) -> Self {
        self.rest_displacement = displacement.abs();
        self.rest_velocity = velocity.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Last known velocity (0 when idle).
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Target of the in-flight motion.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.active.as_ref().map(|a| a.motion.target())
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the in-flight motion.
    #[must_use]
    pub fn active_motion(&self) -> Option<MotionId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Spring toward `target`, seeded with the current velocity when
    /// `preserve_velocity` is set, otherwise from rest.
    pub fn animate_to(
        &mut self,
        target: f64,
        spring: impl Into<FluidSpring>,
        preserve_velocity: bool,
    ) -> MotionId {
        let velocity = if preserve_velocity { self.velocity } else { 0.0 };
        self.start(target, spring.into(), velocity, None)
    }

    /// [`animate_to`](Self::animate_to) with a callback run once the motion
    /// comes to rest. The callback receives the rest value.
    pub fn animate_to_then(
        &mut self,
        target: f64,
        spring: impl Into<FluidSpring>,
        preserve_velocity: bool,
        on_complete: impl FnOnce(f64) + 'static,
    ) -> MotionId {
        let velocity = if preserve_velocity { self.velocity } else { 0.0 };
        self.start(target, spring.into(), velocity, Some(Box::new(on_complete)))
    }

    /// Spring toward `target` seeded with an explicit velocity, e.g. the
    /// release velocity of a gesture.
    pub fn animate_with_velocity(
        &mut self,
        target: f64,
        spring: impl Into<FluidSpring>,
        velocity: f64,
    ) -> MotionId {
        self.start(target, spring.into(), velocity, None)
    }

    /// Retarget mid-flight, always keeping the current velocity.
    pub fn redirect(&mut self, target: f64, spring: impl Into<FluidSpring>) -> MotionId {
        self.animate_to(target, spring, true)
    }

    /// Jump to `value` with no animation.
    pub fn set_immediately(&mut self, value: f64) {
        self.supersede("set_immediately");
        self.value = value;
        self.velocity = 0.0;
    }

    /// Halt in place.
    pub fn cancel(&mut self) {
        self.supersede("cancel");
        self.velocity = 0.0;
    }

    fn start(
        &mut self,
        target: f64,
        spring: FluidSpring,
        velocity: f64,
        on_complete: Option<Completion<f64>>,
    ) -> MotionId {
        self.supersede("retarget");
        let id = MotionId(self.next_id);
        self.next_id += 1;
        let motion = SpringMotion::from_coefficients(
            self.value,
            target,
            spring.to_coefficients().with_velocity(velocity),
        )
        .with_rest_thresholds(self.rest_displacement, self.rest_velocity);
        self.velocity = velocity;
        self.active = Some(ActiveMotion {
            id,
            motion,
            on_complete,
        });
        id
    }

    fn supersede(&mut self, reason: &'static str) {
        if let Some(active) = self.active.take() {
            tracing::debug!(motion = active.id.0, reason, "motion superseded");
        }
    }

    /// Advance the in-flight motion. Returns the id of the motion that came
    /// to rest during this call, if any.
    pub fn advance(&mut self, dt: Duration) -> Option<MotionId> {
        let active = self.active.as_mut()?;
        active.motion.advance(dt);
        self.value = active.motion.position();
        self.velocity = active.motion.velocity();
        if !active.motion.is_at_rest() {
            return None;
        }

        let finished = self.active.take()?;
        self.velocity = 0.0;
        if let Some(callback) = finished.on_complete {
            callback(self.value);
        }
        Some(finished.id)
    }
}

impl Animation for AnimatedValue {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        !self.is_animating()
    }

    fn value(&self) -> f64 {
        self.value
    }
}

// ---------------------------------------------------------------------------
// AnimatedVector
// ---------------------------------------------------------------------------

/// Two independent [`AnimatedValue`]s driven as one position.
///
/// Axes never coordinate; the vector only tracks whether the most recent
/// command has finished on both.
pub struct AnimatedVector {
    x: AnimatedValue,
    y: AnimatedValue,
    on_complete: Option<Completion<Vector2>>,
}

impl fmt::Debug for AnimatedVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedVector")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl AnimatedVector {
    #[must_use]
    pub fn new(value: Vector2) -> Self {
        Self {
            x: AnimatedValue::new(value.x),
            y: AnimatedValue::new(value.y),
            on_complete: None,
        }
    }

    #[must_use]
    pub fn with_rest_thresholds(self, displacement: f64, velocity: f64) -> Self {
        Self {
            x: self.x.with_rest_thresholds(displacement, velocity),
            y: self.y.with_rest_thresholds(displacement, velocity),
            on_complete: self.on_complete,
        }
    }

    #[must_use]
    pub fn value(&self) -> Vector2 {
        Vector2::new(self.x.value(), self.y.value())
    }

    #[must_use]
    pub fn velocity(&self) -> Vector2 {
        Vector2::new(self.x.velocity(), self.y.velocity())
    }

    /// Target of the in-flight motion, per axis falling back to the current
    /// value for an axis already at rest.
    #[must_use]
    pub fn target(&self) -> Option<Vector2> {
        if !self.is_animating() {
            return None;
        }
        Some(Vector2::new(
            self.x.target().unwrap_or(self.x.value()),
            self.y.target().unwrap_or(self.y.value()),
        ))
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }

    pub fn animate_to(
        &mut self,
        target: Vector2,
        spring: impl Into<FluidSpring>,
        preserve_velocity: bool,
    ) {
        let spring = spring.into();
        self.on_complete = None;
        self.x.animate_to(target.x, spring, preserve_velocity);
        self.y.animate_to(target.y, spring, preserve_velocity);
    }

    /// [`animate_to`](Self::animate_to) with a callback run once both axes
    /// come to rest.
    pub fn animate_to_then(
        &mut self,
        target: Vector2,
        spring: impl Into<FluidSpring>,
        preserve_velocity: bool,
        on_complete: impl FnOnce(Vector2) + 'static,
    ) {
        self.animate_to(target, spring, preserve_velocity);
        self.on_complete = Some(Box::new(on_complete));
    }

    pub fn animate_with_velocity(
        &mut self,
        target: Vector2,
        spring: impl Into<FluidSpring>,
        velocity: Vector2,
    ) {
        let spring = spring.into();
        self.on_complete = None;
        self.x.animate_with_velocity(target.x, spring, velocity.x);
        self.y.animate_with_velocity(target.y, spring, velocity.y);
    }

    pub fn redirect(&mut self, target: Vector2, spring: impl Into<FluidSpring>) {
        self.animate_to(target, spring, true);
    }

    pub fn set_immediately(&mut self, value: Vector2) {
        self.on_complete = None;
        self.x.set_immediately(value.x);
        self.y.set_immediately(value.y);
    }

    pub fn cancel(&mut self) {
        self.on_complete = None;
        self.x.cancel();
        self.y.cancel();
    }

    /// Advance both axes. Returns the rest position when the most recent
    /// command finished on both axes during this call.
    pub fn advance(&mut self, dt: Duration) -> Option<Vector2> {
        if !self.is_animating() {
            return None;
        }
        self.x.advance(dt);
        self.y.advance(dt);
        if self.is_animating() {
            return None;
        }
        let rest = self.value();
        if let Some(callback) = self.on_complete.take() {
            callback(rest);
        }
        Some(rest)
    }
}
