#![forbid(unsafe_code)]

//! Interruptible gesture physics.
//!
//! # Role
//! `fluid-motion` turns raw gesture input (positions, translations, release
//! velocities) into motion that feels physical: momentum carries an element
//! past the finger, snap points catch it, edges resist with a rubberband,
//! and a spring settles it. Every motion can be grabbed mid-flight without
//! a visual jump.
//!
//! # Primary responsibilities
//! - **Springs**: [`FluidSpring`] in damping-ratio/response form, presets,
//!   and velocity-based selection.
//! - **Projection and snapping**: where a release would coast, and which snap
//!   point or corner it should land on.
//! - **Rubberbanding**: logarithmic resistance past boundaries.
//! - **Spatial model**: direction-aware enter/exit transforms and dismissal.
//! - **Direct manipulation**: [`DragSession`] and [`SnapSheet`] compose the
//!   above into drag → release → settle.
//!
//! # Time
//! Nothing here reads a clock or spawns a thread. Callers drive motion with
//! explicit `Duration` deltas from their frame source and stamp input samples
//! with their own monotonic timestamps.

pub mod animation;
pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod projection;
pub mod rubberband;
pub mod sheet;
pub mod snap;
pub mod spatial;
pub mod spring;
pub mod velocity;

pub use animation::{AnimatedValue, AnimatedVector, Animation, MotionId, SpringMotion};
pub use config::{ConfigError, FluidConfig};
pub use drag::{AxisLock, DragConfig, DragPhase, DragSession, SettlePlan, SnapTargets};
pub use error::{FluidError, Result};
pub use geometry::{Axis, Bounds1D, Bounds2D, Vector2};
pub use sheet::{SheetConfig, SnapSheet};
pub use snap::{Corner, CornerAnchor};
pub use spatial::{Direction, OriginRegistry, SpatialOrigin, TransformState};
pub use spring::{FluidSpring, SpringPreset};
pub use velocity::VelocityTracker;

// Re-export tracing macros at crate root for ergonomic use.
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
