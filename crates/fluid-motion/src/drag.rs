#![forbid(unsafe_code)]

//! Direct manipulation: drag → release → settle.
//!
//! [`DragSession`] composes projection, snapping, rubberbanding and spring
//! settling into the lifecycle of one draggable element.
//!
//! # State Machine
//!
//! ```text
//!            begin                 end
//!   Idle ───────────▶ Dragging ───────────▶ Settling
//!    ▲                  ▲  │ cancel_gesture     │
//!    │                  │  └───────────────────▶│
//!    │                  │        begin          │
//!    │                  └───────────────────────┤
//!    │                 spring at rest           │
//!    └──────────────────────────────────────────┘
//! ```
//!
//! - **Dragging**: position follows input 1:1 (no spring smoothing), with
//!   rubberband resistance past the bounds.
//! - **Settling**: the release velocity is projected, snap points or corners
//!   resolve a rest point, the rest point is hard-clamped to the bounds, and
//!   a spring seeded with the release velocity carries the element there.
//!
//! # Invariants
//!
//! 1. While dragging, `position == rubberband(saved_offset + translation)`
//!    exactly.
//! 2. Re-grabbing mid-settle cancels the spring and resumes tracking from
//!    the live position, not the original grab point. A grab past a bound
//!    stores the raw offset that rubberbands to the live position, so the
//!    first update does not jump.
//! 3. The settle callback fires once per settle that reaches rest; settles
//!    superseded by a re-grab, [`DragSession::cancel_gesture`] or
//!    [`DragSession::set_position`] never report.
//! 4. A failed release (e.g. NaN velocity with snap points) leaves the
//!    session untouched.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::animation::AnimatedVector;
use crate::animation::spring::{DEFAULT_REST_DISPLACEMENT, DEFAULT_REST_VELOCITY};
use crate::config::FluidConfig;
use crate::error::{FluidError, Result, check_decay_rate};
use crate::geometry::{Axis, Bounds2D, Vector2};
use crate::projection::{DECAY_RATE_NORMAL, project_2d};
use crate::rubberband::{RubberbandConfig, clamp_bounds, unclamp_bounds};
use crate::snap::{Corner, nearest_corner, nearest_snap_index};
use crate::spring::{FluidSpring, SpringPreset, SpringSelection};
use crate::velocity::VelocityTracker;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Lifecycle phase of a [`DragSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPhase {
    Idle,
    Dragging,
    Settling,
}

/// Which axes follow the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisLock {
    #[default]
    Both,
    Horizontal,
    Vertical,
}

impl AxisLock {
    #[must_use]
    pub fn allows(self, axis: Axis) -> bool {
        match self {
            Self::Both => true,
            Self::Horizontal => axis == Axis::Horizontal,
            Self::Vertical => axis == Axis::Vertical,
        }
    }

    /// Zero out the components of `v` on locked axes.
    #[must_use]
    pub fn mask(self, v: Vector2) -> Vector2 {
        Vector2::new(
            if self.allows(Axis::Horizontal) { v.x } else { 0.0 },
            if self.allows(Axis::Vertical) { v.y } else { 0.0 },
        )
    }
}

/// Candidate rest positions for a release.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SnapTargets {
    /// Coast to the projected position.
    #[default]
    None,
    /// Independent snap sets per axis; an axis without a set coasts freely.
    Points {
        x: Option<Vec<f64>>,
        y: Option<Vec<f64>>,
    },
    /// Named 2D corners, resolved by Euclidean distance.
    Corners(Vec<Corner>),
}

/// Spring used to settle after release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleSpring {
    Fixed(FluidSpring),
    /// Pick a preset from the release speed.
    ForVelocity(SpringSelection),
}

impl Default for SettleSpring {
    fn default() -> Self {
        Self::Fixed(SpringPreset::Smooth.spring())
    }
}

impl SettleSpring {
    #[must_use]
    pub fn resolve(&self, release_velocity: Vector2) -> FluidSpring {
        match self {
            Self::Fixed(spring) => *spring,
            Self::ForVelocity(selection) => {
                selection.for_velocity(release_velocity.length()).spring()
            }
        }
    }
}

/// When a settling spring counts as at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SettleConfig {
    /// Residual displacement in points (default: 0.01).
    pub rest_displacement: f64,
    /// Residual speed in points/second (default: 0.1).
    pub rest_velocity: f64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_velocity: DEFAULT_REST_VELOCITY,
        }
    }
}

/// Static configuration of a draggable element.
#[derive(Debug, Clone, PartialEq)]
pub struct DragConfig {
    pub bounds: Option<Bounds2D>,
    pub axis: AxisLock,
    pub snap: SnapTargets,
    pub spring: SettleSpring,
    pub decay_rate: f64,
    pub rubberband: RubberbandConfig,
    pub settle: SettleConfig,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            bounds: None,
            axis: AxisLock::Both,
            snap: SnapTargets::None,
            spring: SettleSpring::default(),
            decay_rate: DECAY_RATE_NORMAL,
            rubberband: RubberbandConfig::default(),
            settle: SettleConfig::default(),
        }
    }
}

impl DragConfig {
    /// Defaults taken from a [`FluidConfig`]. The settle spring is picked
    /// from the release speed using the configured velocity tiers.
    #[must_use]
    pub fn from_config(config: &FluidConfig) -> Self {
        Self {
            spring: SettleSpring::ForVelocity(config.spring_selection),
            decay_rate: config.projection.decay_rate,
            rubberband: config.rubberband,
            settle: config.settle,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds2D) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: AxisLock) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_snap_points(mut self, x: Option<Vec<f64>>, y: Option<Vec<f64>>) -> Self {
        self.snap = SnapTargets::Points { x, y };
        self
    }

    #[must_use]
    pub fn with_corners(mut self, corners: impl Into<Vec<Corner>>) -> Self {
        self.snap = SnapTargets::Corners(corners.into());
        self
    }

    #[must_use]
    pub fn with_spring(mut self, spring: impl Into<FluidSpring>) -> Self {
        self.spring = SettleSpring::Fixed(spring.into());
        self
    }

    #[must_use]
    pub fn with_velocity_springs(mut self, selection: SpringSelection) -> Self {
        self.spring = SettleSpring::ForVelocity(selection);
        self
    }

    #[must_use]
    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    #[must_use]
    pub fn with_rubberband(mut self, rubberband: RubberbandConfig) -> Self {
        self.rubberband = rubberband;
        self
    }

    /// Reject configurations that can never release successfully.
    pub fn validate(&self) -> Result<()> {
        check_decay_rate(self.decay_rate)?;
        match &self.snap {
            SnapTargets::Points { x, y } => {
                if x.as_ref().is_some_and(Vec::is_empty) || y.as_ref().is_some_and(Vec::is_empty) {
                    return Err(FluidError::EmptySnapSet);
                }
            }
            SnapTargets::Corners(corners) if corners.is_empty() => {
                return Err(FluidError::EmptySnapSet);
            }
            _ => {}
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Release outcome
// ---------------------------------------------------------------------------

/// How a release was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlePlan {
    /// Release velocity after axis locking.
    pub velocity: Vector2,
    /// Where momentum alone would carry the element.
    pub projected: Vector2,
    /// Final rest point (snapped, then clamped to bounds).
    pub target: Vector2,
    pub spring: FluidSpring,
    /// Chosen snap index per axis, for [`SnapTargets::Points`].
    pub snap_index_x: Option<usize>,
    pub snap_index_y: Option<usize>,
    /// Chosen corner, for [`SnapTargets::Corners`].
    pub corner: Option<Corner>,
}

// ---------------------------------------------------------------------------
// DragSession
// ---------------------------------------------------------------------------

/// Drag → release → settle lifecycle of one element.
pub struct DragSession {
    config: DragConfig,
    phase: DragPhase,
    saved_offset: Vector2,
    position: AnimatedVector,
    tracker: VelocityTracker,
    last_plan: Option<SettlePlan>,
    on_settle: Option<Box<dyn FnMut(Vector2)>>,
}

impl fmt::Debug for DragSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSession")
            .field("phase", &self.phase)
            .field("position", &self.position.value())
            .field("saved_offset", &self.saved_offset)
            .field("target", &self.position.target())
            .finish_non_exhaustive()
    }
}

impl DragSession {
    /// Create an idle session resting at `initial`.
    pub fn new(config: DragConfig, initial: Vector2) -> Result<Self> {
        config.validate()?;
        let position = AnimatedVector::new(initial)
            .with_rest_thresholds(config.settle.rest_displacement, config.settle.rest_velocity);
        Ok(Self {
            config,
            phase: DragPhase::Idle,
            saved_offset: initial,
            position,
            tracker: VelocityTracker::new(),
            last_plan: None,
            on_settle: None,
        })
    }

    /// Register a callback run each time a settle comes to rest.
    pub fn on_settle(&mut self, callback: impl FnMut(Vector2) + 'static) {
        self.on_settle = Some(Box::new(callback));
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    #[must_use]
    pub fn position(&self) -> Vector2 {
        self.position.value()
    }

    /// Input velocity while dragging; spring velocity otherwise.
    #[must_use]
    pub fn velocity(&self) -> Vector2 {
        match self.phase {
            DragPhase::Dragging => self.tracked_velocity(),
            _ => self.position.velocity(),
        }
    }

    /// Velocity estimated from the samples of the current drag.
    #[must_use]
    pub fn tracked_velocity(&self) -> Vector2 {
        self.config.axis.mask(self.tracker.velocity())
    }

    /// Raw (un-resisted) offset captured when the current drag began.
    /// Equals the rendered position unless the grab happened past a bound.
    #[must_use]
    pub fn saved_offset(&self) -> Vector2 {
        self.saved_offset
    }

    /// Rest point of the in-flight settle.
    #[must_use]
    pub fn target(&self) -> Option<Vector2> {
        self.position.target()
    }

    #[must_use]
    pub fn last_plan(&self) -> Option<&SettlePlan> {
        self.last_plan.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Gesture began. Interrupts any settle and captures the live position.
    pub fn begin(&mut self, time: Duration) {
        if self.phase == DragPhase::Settling {
            tracing::debug!(
                x = self.position.value().x,
                y = self.position.value().y,
                "settle interrupted by drag"
            );
        }
        self.position.cancel();
        self.saved_offset = self.unresist(self.position.value());
        self.tracker.reset();
        self.tracker.add_sample(time, self.saved_offset);
        self.phase = DragPhase::Dragging;
        tracing::debug!(x = self.saved_offset.x, y = self.saved_offset.y, "drag began");
    }

    /// Gesture moved by `translation` since it began. Returns the rendered
    /// position. Ignored outside `Dragging`.
    pub fn update(&mut self, translation: Vector2, time: Duration) -> Vector2 {
        if self.phase != DragPhase::Dragging {
            return self.position.value();
        }
        let raw = self.saved_offset + self.config.axis.mask(translation);
        self.tracker.add_sample(time, raw);
        let resisted = self.resist(raw);
        self.position.set_immediately(resisted);
        tracing::trace!(x = resisted.x, y = resisted.y, "drag update");
        resisted
    }

    fn resist(&self, raw: Vector2) -> Vector2 {
        let Some(bounds) = self.config.bounds else {
            return raw;
        };
        let velocity = self.tracker.velocity();
        let rubberband = &self.config.rubberband;
        Vector2::new(
            clamp_bounds(raw.x, bounds.x, rubberband.coefficient_for(velocity.x)),
            clamp_bounds(raw.y, bounds.y, rubberband.coefficient_for(velocity.y)),
        )
    }

    /// Raw offset that renders at `shown`; the inverse of [`Self::resist`]
    /// for a drag at rest.
    fn unresist(&self, shown: Vector2) -> Vector2 {
        let Some(bounds) = self.config.bounds else {
            return shown;
        };
        let coefficient = self.config.rubberband.coefficient_for(0.0);
        Vector2::new(
            unclamp_bounds(shown.x, bounds.x, coefficient),
            unclamp_bounds(shown.y, bounds.y, coefficient),
        )
    }

    /// Gesture released with `velocity`. Resolves the rest point and starts
    /// settling. Returns `Ok(None)` when no drag is in progress.
    pub fn end(&mut self, velocity: Vector2) -> Result<Option<SettlePlan>> {
        if self.phase != DragPhase::Dragging {
            return Ok(None);
        }
        let plan = self.plan(self.config.axis.mask(velocity))?;
        self.position
            .animate_with_velocity(plan.target, plan.spring, plan.velocity);
        self.phase = DragPhase::Settling;
        self.last_plan = Some(plan);
        tracing::debug!(
            target_x = plan.target.x,
            target_y = plan.target.y,
            velocity_x = plan.velocity.x,
            velocity_y = plan.velocity.y,
            "drag released"
        );
        Ok(Some(plan))
    }

    /// [`end`](Self::end) using the velocity estimated from input samples.
    pub fn end_with_tracked_velocity(&mut self) -> Result<Option<SettlePlan>> {
        let velocity = self.tracked_velocity();
        self.end(velocity)
    }

    fn plan(&self, velocity: Vector2) -> Result<SettlePlan> {
        let current = self.position.value();
        let projected = current + project_2d(velocity, self.config.decay_rate)?;

        let mut target = projected;
        let mut snap_index_x = None;
        let mut snap_index_y = None;
        let mut corner = None;
        let axis = self.config.axis;
        match &self.config.snap {
            SnapTargets::None => {}
            SnapTargets::Points { x, y } => {
                if let Some(points) = x.as_deref().filter(|_| axis.allows(Axis::Horizontal)) {
                    let i = nearest_snap_index(projected.x, points)?;
                    target.x = points[i];
                    snap_index_x = Some(i);
                }
                if let Some(points) = y.as_deref().filter(|_| axis.allows(Axis::Vertical)) {
                    let i = nearest_snap_index(projected.y, points)?;
                    target.y = points[i];
                    snap_index_y = Some(i);
                }
            }
            SnapTargets::Corners(corners) => {
                let chosen = nearest_corner(projected, corners)?;
                target = chosen.point;
                corner = Some(chosen);
            }
        }

        // Locked axes stay where the drag started.
        if !self.config.axis.allows(Axis::Horizontal) {
            target.x = current.x;
        }
        if !self.config.axis.allows(Axis::Vertical) {
            target.y = current.y;
        }
        if let Some(bounds) = self.config.bounds {
            target = bounds.clamp(target);
        }

        Ok(SettlePlan {
            velocity,
            projected,
            target,
            spring: self.config.spring.resolve(velocity),
            snap_index_x,
            snap_index_y,
            corner,
        })
    }

    /// Gesture aborted (e.g. Escape): spring back to where the drag began,
    /// hard-clamped to the bounds.
    pub fn cancel_gesture(&mut self) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        let home = match self.config.bounds {
            Some(bounds) => bounds.clamp(self.saved_offset),
            None => self.saved_offset,
        };
        let spring = self.config.spring.resolve(Vector2::ZERO);
        self.position.animate_to(home, spring, false);
        self.phase = DragPhase::Settling;
        tracing::debug!("drag cancelled");
    }

    /// Programmatic move, e.g. to open a sheet. Keeps any current velocity.
    pub fn animate_to(&mut self, target: Vector2, spring: impl Into<FluidSpring>) {
        let target = match self.config.bounds {
            Some(bounds) => bounds.clamp(target),
            None => target,
        };
        self.position.redirect(target, spring);
        self.phase = DragPhase::Settling;
    }

    /// Jump with no animation; the session becomes idle.
    pub fn set_position(&mut self, position: Vector2) {
        self.position.set_immediately(position);
        self.saved_offset = position;
        self.phase = DragPhase::Idle;
    }

    /// Advance the settle spring. Returns the phase after the tick.
    pub fn tick(&mut self, dt: Duration) -> DragPhase {
        if self.phase != DragPhase::Settling {
            return self.phase;
        }
        if let Some(rest) = self.position.advance(dt) {
            self.phase = DragPhase::Idle;
            tracing::debug!(x = rest.x, y = rest.y, "settle complete");
            if let Some(callback) = self.on_settle.as_mut() {
                callback(rest);
            }
        }
        self.phase
    }
}
