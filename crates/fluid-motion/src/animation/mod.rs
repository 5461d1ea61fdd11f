#![forbid(unsafe_code)]

//! Frame-driven motion primitives.
//!
//! Everything here is advanced explicitly by the caller with [`Animation::tick`]
//! from a render-frame or gesture-event source. There is no scheduler and no
//! background thread: interruption is modeled as cancel-then-restart.
//!
//! - [`SpringMotion`]: damped oscillator integrator.
//! - [`AnimatedValue`] / [`AnimatedVector`]: single-owner animatable values
//!   that can be redirected mid-flight without losing velocity.

pub mod spring;
pub mod value;

use std::time::Duration;

pub use spring::SpringMotion;
pub use value::{AnimatedValue, AnimatedVector, MotionId};

/// A motion advanced by elapsed time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the motion has come to rest.
    fn is_complete(&self) -> bool;

    /// Current value.
    fn value(&self) -> f64;
}
