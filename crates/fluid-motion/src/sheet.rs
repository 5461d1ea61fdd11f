#![forbid(unsafe_code)]

//! Vertical bottom sheet with snap points.
//!
//! A [`SnapSheet`] is a [`DragSession`] locked to the vertical axis whose
//! bounds span its snap points. Releases resolve to the snap point nearest
//! the projected rest position, and the current snap index is reported to a
//! callback once per change.

use std::fmt;
use std::time::Duration;

use crate::config::FluidConfig;
use crate::drag::{AxisLock, DragConfig, DragPhase, DragSession, SettleConfig, SettleSpring};
use crate::error::{FluidError, Result};
use crate::geometry::{Bounds1D, Bounds2D, Vector2};
use crate::projection::DECAY_RATE_NORMAL;
use crate::rubberband::RubberbandConfig;
use crate::spring::{FluidSpring, SpringPreset};

/// Configuration of a [`SnapSheet`].
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    /// Vertical rest positions. Order is preserved; indices refer to it.
    pub snap_points: Vec<f64>,
    pub initial_index: usize,
    pub spring: SettleSpring,
    pub decay_rate: f64,
    pub rubberband: RubberbandConfig,
    pub settle: SettleConfig,
}

impl SheetConfig {
    #[must_use]
    pub fn new(snap_points: impl Into<Vec<f64>>) -> Self {
        Self {
            snap_points: snap_points.into(),
            initial_index: 0,
            spring: SettleSpring::Fixed(SpringPreset::Sheet.spring()),
            decay_rate: DECAY_RATE_NORMAL,
            rubberband: RubberbandConfig::default(),
            settle: SettleConfig::default(),
        }
    }

    /// Snap points plus defaults taken from a [`FluidConfig`]. The sheet
    /// keeps its fixed [`SpringPreset::Sheet`] spring.
    #[must_use]
    pub fn from_config(snap_points: impl Into<Vec<f64>>, config: &FluidConfig) -> Self {
        Self {
            decay_rate: config.projection.decay_rate,
            rubberband: config.rubberband,
            settle: config.settle,
            ..Self::new(snap_points)
        }
    }

    #[must_use]
    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.initial_index = index;
        self
    }

    #[must_use]
    pub fn with_spring(mut self, spring: impl Into<FluidSpring>) -> Self {
        self.spring = SettleSpring::Fixed(spring.into());
        self
    }

    #[must_use]
    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = decay_rate;
        self
    }
}

/// A draggable sheet resting at one of several vertical snap points.
pub struct SnapSheet {
    session: DragSession,
    snap_points: Vec<f64>,
    current_index: usize,
    on_index_change: Option<Box<dyn FnMut(usize)>>,
}

impl fmt::Debug for SnapSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapSheet")
            .field("session", &self.session)
            .field("snap_points", &self.snap_points)
            .field("current_index", &self.current_index)
            .finish_non_exhaustive()
    }
}

impl SnapSheet {
    pub fn new(config: SheetConfig) -> Result<Self> {
        let points = config.snap_points;
        let Some(&initial) = points.get(config.initial_index) else {
            if points.is_empty() {
                return Err(FluidError::EmptySnapSet);
            }
            return Err(FluidError::invalid(
                "initial_index",
                "an index into snap_points",
                config.initial_index as f64,
            ));
        };
        if points.iter().any(|p| !p.is_finite()) {
            return Err(FluidError::NonFiniteInput { name: "snap_points" });
        }

        let lo = points.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let bounds = Bounds2D::new(Bounds1D::point(0.0), Bounds1D::new(lo, hi)?);
        let drag = DragConfig {
            bounds: Some(bounds),
            axis: AxisLock::Vertical,
            spring: config.spring,
            decay_rate: config.decay_rate,
            rubberband: config.rubberband,
            settle: config.settle,
            ..DragConfig::default()
        }
        .with_snap_points(None, Some(points.clone()));

        Ok(Self {
            session: DragSession::new(drag, Vector2::new(0.0, initial))?,
            snap_points: points,
            current_index: config.initial_index,
            on_index_change: None,
        })
    }

    /// Register a callback run with the new index whenever it changes.
    pub fn on_index_change(&mut self, callback: impl FnMut(usize) + 'static) {
        self.on_index_change = Some(Box::new(callback));
    }

    /// Register a callback run each time the sheet comes to rest.
    pub fn on_settle(&mut self, mut callback: impl FnMut(f64) + 'static) {
        self.session.on_settle(move |rest| callback(rest.y));
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.session.position().y
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.session.velocity().y
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.session.phase()
    }

    /// Index of the snap point the sheet rests at or is heading to.
    #[must_use]
    pub fn current_snap_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_snap_point(&self) -> f64 {
        self.snap_points[self.current_index]
    }

    #[must_use]
    pub fn snap_points(&self) -> &[f64] {
        &self.snap_points
    }

    pub fn begin(&mut self, time: Duration) {
        self.session.begin(time);
    }

    /// Vertical finger travel since the drag began. Returns the rendered
    /// position.
    pub fn update(&mut self, translation: f64, time: Duration) -> f64 {
        self.session.update(Vector2::new(0.0, translation), time).y
    }

    /// Release with a vertical velocity. Returns the snap index the sheet is
    /// heading to, or `None` when no drag was in progress.
    pub fn end(&mut self, velocity: f64) -> Result<Option<usize>> {
        let Some(plan) = self.session.end(Vector2::new(0.0, velocity))? else {
            return Ok(None);
        };
        let index = plan.snap_index_y.unwrap_or(self.current_index);
        self.set_index(index);
        Ok(Some(index))
    }

    /// Gesture aborted: spring back to the current snap point, which may
    /// differ from the grab position after a mid-settle re-grab.
    pub fn cancel_gesture(&mut self) {
        if self.session.phase() != DragPhase::Dragging {
            return;
        }
        let spring = self.session.config().spring.resolve(Vector2::ZERO);
        self.session
            .animate_to(Vector2::new(0.0, self.current_snap_point()), spring);
        tracing::debug!(index = self.current_index, "sheet drag cancelled");
    }

    /// Animate to snap point `index`, keeping any current velocity.
    pub fn snap_to(&mut self, index: usize) -> Result<()> {
        let Some(&point) = self.snap_points.get(index) else {
            return Err(FluidError::invalid(
                "index",
                "an index into snap_points",
                index as f64,
            ));
        };
        let spring = self.session.config().spring.resolve(Vector2::ZERO);
        self.session.animate_to(Vector2::new(0.0, point), spring);
        self.set_index(index);
        Ok(())
    }

    /// Advance the settle spring. Returns the rendered position.
    pub fn tick(&mut self, dt: Duration) -> f64 {
        self.session.tick(dt);
        self.position()
    }

    fn set_index(&mut self, index: usize) {
        if index == self.current_index {
            return;
        }
        tracing::debug!(from = self.current_index, to = index, "snap index changed");
        self.current_index = index;
        if let Some(callback) = self.on_index_change.as_mut() {
            callback(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const MS_16: Duration = Duration::from_millis(16);

    fn sheet() -> SnapSheet {
        SnapSheet::new(
            SheetConfig::new(vec![100.0, 400.0, 700.0])
                .with_initial_index(2)
                .with_decay_rate(0.9),
        )
        .unwrap()
    }

    fn settle(sheet: &mut SnapSheet) {
        for _ in 0..400 {
            sheet.tick(MS_16);
            if sheet.phase() == DragPhase::Idle {
                return;
            }
        }
        panic!("sheet did not settle: {sheet:?}");
    }

    #[test]
    fn starts_at_initial_index() {
        let s = sheet();
        assert_eq!(s.position(), 700.0);
        assert_eq!(s.current_snap_index(), 2);
        assert_eq!(s.current_snap_point(), 700.0);
    }

    #[test]
    fn flick_up_snaps_to_projected_point() {
        let mut s = sheet();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        s.on_index_change(move |i| log.borrow_mut().push(i));

        s.begin(Duration::ZERO);
        s.update(-100.0, MS_16);
        // 600 + (-50 · 0.9 / 0.1) = 150 → nearest 100.
        assert_eq!(s.end(-50.0).unwrap(), Some(0));
        settle(&mut s);
        assert_eq!(s.position(), 100.0);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn small_release_returns_to_same_point_without_callback() {
        let mut s = sheet();
        let calls = Rc::new(RefCell::new(0));
        let c = Rc::clone(&calls);
        s.on_index_change(move |_| *c.borrow_mut() += 1);

        s.begin(Duration::ZERO);
        s.update(-50.0, MS_16);
        assert_eq!(s.end(0.0).unwrap(), Some(2));
        settle(&mut s);
        assert_eq!(s.position(), 700.0);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn drag_past_ends_rubberbands() {
        let mut s = sheet();
        s.begin(Duration::ZERO);
        let p = s.update(200.0, MS_16);
        assert!(p > 700.0 && p < 900.0, "{p}");
    }

    #[test]
    fn snap_to_validates_index() {
        let mut s = sheet();
        assert!(matches!(
            s.snap_to(3),
            Err(FluidError::InvalidParameter { name: "index", .. })
        ));
        s.snap_to(1).unwrap();
        assert_eq!(s.current_snap_index(), 1);
        settle(&mut s);
        assert_eq!(s.position(), 400.0);
    }

    #[test]
    fn cancel_after_regrab_rests_on_current_snap_point() {
        let mut s = sheet();
        s.snap_to(0).unwrap();
        for _ in 0..5 {
            s.tick(MS_16);
        }
        let grabbed = s.position();
        assert!(grabbed > 100.0 && grabbed < 700.0, "{grabbed}");

        s.begin(Duration::from_millis(80));
        s.update(-10.0, Duration::from_millis(96));
        s.cancel_gesture();
        settle(&mut s);
        assert_eq!(s.current_snap_index(), 0);
        assert_eq!(s.position(), s.current_snap_point());
    }

    #[test]
    fn cancel_outside_drag_is_noop() {
        let mut s = sheet();
        s.cancel_gesture();
        assert_eq!(s.phase(), DragPhase::Idle);
        assert_eq!(s.position(), 700.0);
    }

    #[test]
    fn invalid_configs_rejected() {
        assert_eq!(
            SnapSheet::new(SheetConfig::new(Vec::new())).unwrap_err(),
            FluidError::EmptySnapSet
        );
        assert!(SnapSheet::new(SheetConfig::new(vec![0.0]).with_initial_index(1)).is_err());
        assert!(SnapSheet::new(SheetConfig::new(vec![0.0, f64::NAN])).is_err());
    }

    #[test]
    fn settle_callback_reports_rest() {
        let mut s = sheet();
        let rest = Rc::new(RefCell::new(None));
        let r = Rc::clone(&rest);
        s.on_settle(move |y| *r.borrow_mut() = Some(y));
        s.snap_to(0).unwrap();
        settle(&mut s);
        assert_eq!(*rest.borrow(), Some(100.0));
    }
}
