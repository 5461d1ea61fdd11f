//! End-to-end gesture scenarios composing the physics modules.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use fluid_motion::drag::{DragConfig, DragPhase, DragSession};
use fluid_motion::geometry::{Bounds2D, Vector2};
use fluid_motion::sheet::{SheetConfig, SnapSheet};
use fluid_motion::snap::{Corner, CornerAnchor};
use fluid_motion::spatial::{
    self, Direction, DismissConfig, OriginRegistry, SpatialConfig, SpatialOrigin, TransformState,
};
use fluid_motion::spring::SpringPreset;
use fluid_motion::{AnimatedValue, FluidConfig, VelocityTracker};

const MS_16: Duration = Duration::from_millis(16);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn run_to_rest(session: &mut DragSession) -> usize {
    for frame in 0..600 {
        if session.tick(MS_16) == DragPhase::Idle {
            return frame + 1;
        }
    }
    panic!("session did not settle: {session:?}");
}

#[test]
fn pip_flick_lands_in_far_corner() {
    let area = Bounds2D::from_size(390.0, 844.0).unwrap();
    let config = DragConfig::default()
        .with_bounds(area)
        .with_corners(Corner::for_bounds(area).to_vec());
    let mut pip = DragSession::new(config, Vector2::ZERO).unwrap();

    pip.begin(ms(0));
    for i in 1..=4u64 {
        pip.update(Vector2::new(5.0 * i as f64, 12.0 * i as f64), ms(8 * i));
    }
    let plan = pip.end(Vector2::new(300.0, 700.0)).unwrap().unwrap();
    assert_eq!(plan.corner.map(|c| c.anchor), Some(CornerAnchor::BottomRight));
    assert_eq!(plan.target, Vector2::new(390.0, 844.0));

    run_to_rest(&mut pip);
    assert_eq!(pip.position(), Vector2::new(390.0, 844.0));
}

#[test]
fn gentle_release_stays_in_nearest_corner() {
    let area = Bounds2D::from_size(390.0, 844.0).unwrap();
    let config = DragConfig::default()
        .with_bounds(area)
        .with_corners(Corner::for_bounds(area).to_vec());
    let mut pip = DragSession::new(config, Vector2::new(390.0, 0.0)).unwrap();

    pip.begin(ms(0));
    pip.update(Vector2::new(-60.0, 40.0), ms(16));
    let plan = pip.end(Vector2::ZERO).unwrap().unwrap();
    assert_eq!(plan.corner.map(|c| c.anchor), Some(CornerAnchor::TopRight));
}

#[test]
fn interrupted_settles_report_only_the_final_rest() {
    let rests = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&rests);
    let config = DragConfig::default()
        .with_snap_points(Some(vec![0.0, 200.0, 400.0]), None)
        .with_decay_rate(0.8);
    let mut session = DragSession::new(config, Vector2::ZERO).unwrap();
    session.on_settle(move |p| seen.borrow_mut().push(p));

    // Throw right, grab it mid-flight, throw back left.
    session.begin(ms(0));
    session.update(Vector2::new(50.0, 0.0), ms(16));
    session.end(Vector2::new(200.0, 0.0)).unwrap();
    for _ in 0..6 {
        session.tick(MS_16);
    }
    let grabbed_at = session.position();

    session.begin(ms(200));
    assert_eq!(session.saved_offset(), grabbed_at);
    session.update(Vector2::new(-20.0, 0.0), ms(216));
    let plan = session.end(Vector2::new(-400.0, 0.0)).unwrap().unwrap();
    assert_eq!(plan.snap_index_x, Some(0));

    run_to_rest(&mut session);
    for _ in 0..30 {
        session.tick(MS_16);
    }
    assert_eq!(*rests.borrow(), vec![Vector2::ZERO]);
}

#[test]
fn tracked_velocity_drives_release() {
    let mut session = DragSession::new(
        DragConfig::default().with_decay_rate(0.9),
        Vector2::ZERO,
    )
    .unwrap();
    session.begin(ms(0));
    for i in 1..=6u64 {
        session.update(Vector2::new(0.0, -8.0 * i as f64), ms(8 * i));
    }
    let plan = session.end_with_tracked_velocity().unwrap().unwrap();
    assert!((plan.velocity.y + 1000.0).abs() < 1e-6, "{:?}", plan.velocity);
    assert!((plan.projected.y - (-48.0 - 9000.0)).abs() < 1e-6);
}

#[test]
fn swipe_to_dismiss_flow() {
    let layout = SpatialConfig::default();
    let dismiss = DismissConfig::default();
    let mut card = DragSession::new(DragConfig::default(), Vector2::ZERO).unwrap();

    // Short slow drag: springs back.
    card.begin(ms(0));
    card.update(Vector2::new(60.0, 5.0), ms(100));
    let translation = card.position() - card.saved_offset();
    let progress = spatial::dismiss_progress(Direction::Right, translation.x, translation.y, 300.0);
    let velocity = spatial::dismiss_velocity(Direction::Right, Vector2::new(80.0, 0.0));
    assert!(!dismiss.should_dismiss(progress, velocity));
    card.cancel_gesture();
    run_to_rest(&mut card);
    assert_eq!(card.position(), Vector2::ZERO);

    // Short fast flick: dismisses and exits toward the flick.
    card.begin(ms(1000));
    card.update(Vector2::new(45.0, 0.0), ms(1016));
    let flick = Vector2::new(900.0, 30.0);
    let translation = card.position() - card.saved_offset();
    let progress = spatial::dismiss_progress(Direction::Right, translation.x, translation.y, 300.0);
    assert!(dismiss.should_dismiss(progress, spatial::dismiss_velocity(Direction::Right, flick)));

    let exit_direction = spatial::direction_from_velocity(flick, &layout);
    assert_eq!(exit_direction, Direction::Right);
    let exit = spatial::exit_transform(exit_direction, &layout);
    assert_eq!(exit.translate_x, 375.0);

    // Flicking back toward the origin never dismisses.
    let back = spatial::dismiss_velocity(Direction::Right, Vector2::new(-900.0, 0.0));
    assert!(!dismiss.should_dismiss(0.2, back));
}

#[test]
fn navigation_origins_round_trip() {
    let layout = SpatialConfig::default();
    let mut origins = OriginRegistry::new();
    origins.set_origin("detail".to_string(), SpatialOrigin::new(Direction::Right));
    origins.set_origin(
        "menu".to_string(),
        SpatialOrigin::at(Direction::Left, Vector2::new(0.0, 44.0)),
    );

    let detail = origins.origin(&"detail".to_string()).direction;
    let enter = spatial::enter_transform(detail, &layout);
    assert_eq!(enter, origins.exit_transform(&"detail".to_string(), &layout));
    assert_eq!(spatial::transition_transform(detail, 1.0, &layout), TransformState::VISIBLE);
    let halfway = spatial::transition_transform(detail, 0.5, &layout);
    assert_eq!(halfway.translate_x, 187.5);

    // Unknown ids fall back to a centered fade.
    let unknown = origins.exit_transform(&"settings".to_string(), &layout);
    assert_eq!(unknown.scale, 0.9);
    assert_eq!(unknown.opacity, 0.0);

    origins.clear_all();
    assert!(origins.is_empty());
}

#[test]
fn sheet_from_shared_config() {
    let mut config = FluidConfig::default();
    config.projection.decay_rate = 0.9;
    let mut sheet = SnapSheet::new(
        SheetConfig::from_config(vec![80.0, 420.0, 760.0], &config).with_initial_index(2),
    )
    .unwrap();

    let changes = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&changes);
    sheet.on_index_change(move |i| log.borrow_mut().push(i));

    sheet.begin(ms(0));
    sheet.update(-120.0, ms(16));
    // 640 - 40 · 9 = 280 → 420.
    assert_eq!(sheet.end(-40.0).unwrap(), Some(1));
    for _ in 0..600 {
        sheet.tick(MS_16);
        if sheet.phase() == DragPhase::Idle {
            break;
        }
    }
    assert_eq!(sheet.position(), 420.0);

    sheet.snap_to(0).unwrap();
    assert_eq!(*changes.borrow(), vec![1, 0]);
}

#[test]
fn redirect_keeps_momentum_and_drops_stale_callback() {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&fired);
    let second = Rc::clone(&fired);

    let mut value = AnimatedValue::new(0.0);
    value.animate_to_then(
        100.0,
        SpringPreset::Smooth,
        false,
        move |v| first.borrow_mut().push(("first", v)),
    );
    for _ in 0..5 {
        value.advance(MS_16);
    }
    let velocity = value.velocity();
    assert!(velocity > 0.0);

    value.animate_to_then(
        -50.0,
        SpringPreset::Snappy,
        true,
        move |v| second.borrow_mut().push(("second", v)),
    );
    assert_eq!(value.velocity(), velocity);
    for _ in 0..600 {
        value.advance(MS_16);
    }
    assert_eq!(*fired.borrow(), vec![("second", -50.0)]);
}

#[test]
fn velocity_tracker_matches_reported_velocity() {
    let mut tracker = VelocityTracker::new();
    for i in 0..8u64 {
        tracker.add_sample(ms(10 * i), Vector2::new(3.0 * i as f64, 0.0));
    }
    assert!((tracker.velocity().x - 300.0).abs() < 1e-6);
}
