#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use fluid_motion::drag::{AxisLock, DragConfig, DragPhase, DragSession};
use fluid_motion::geometry::{Bounds2D, Vector2};
use fluid_motion::snap::Corner;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Begin,
    Update(i16, i16),
    End(i16, i16),
    EndTracked,
    Cancel,
    SetPosition(i16, i16),
    Tick(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    width: u16,
    height: u16,
    corners: bool,
    axis: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    // Cap length to keep fuzzing fast.
    if input.ops.len() > 256 {
        return;
    }
    let Ok(bounds) = Bounds2D::from_size(f64::from(input.width), f64::from(input.height)) else {
        return;
    };
    let axis = match input.axis % 3 {
        0 => AxisLock::Both,
        1 => AxisLock::Horizontal,
        _ => AxisLock::Vertical,
    };
    let mut config = DragConfig::default().with_bounds(bounds).with_axis(axis);
    if input.corners {
        config = config.with_corners(Corner::for_bounds(bounds).to_vec());
    }
    let Ok(mut session) = DragSession::new(config, Vector2::ZERO) else {
        return;
    };

    let mut now = Duration::ZERO;
    for op in input.ops {
        now += Duration::from_millis(8);
        match op {
            Op::Begin => session.begin(now),
            Op::Update(dx, dy) => {
                session.update(Vector2::new(f64::from(dx), f64::from(dy)), now);
            }
            Op::End(vx, vy) => {
                let plan = session.end(Vector2::new(f64::from(vx), f64::from(vy)));
                if let Ok(Some(plan)) = plan {
                    assert!(bounds.contains(plan.target), "target escaped bounds: {plan:?}");
                }
            }
            Op::EndTracked => {
                let _ = session.end_with_tracked_velocity();
            }
            Op::Cancel => session.cancel_gesture(),
            Op::SetPosition(x, y) => session.set_position(Vector2::new(f64::from(x), f64::from(y))),
            Op::Tick(ms) => {
                session.tick(Duration::from_millis(u64::from(ms)));
            }
        }

        let p = session.position();
        assert!(p.x.is_finite() && p.y.is_finite(), "position diverged: {p:?}");
    }

    // Whatever happened, the session comes to rest.
    for _ in 0..2000 {
        if session.tick(Duration::from_millis(16)) != DragPhase::Settling {
            break;
        }
    }
    assert_ne!(session.phase(), DragPhase::Settling);
});
