#![no_main]

use fluid_motion::projection::project;
use fluid_motion::rubberband::{clamp, rubberband};
use fluid_motion::snap::nearest_snap_index;
use fluid_motion::spatial::{Direction, dismiss_progress};
use fluid_motion::spring::FluidSpring;
use libfuzzer_sys::fuzz_target;

fn f64_at(data: &[u8], i: usize) -> f64 {
    let mut bytes = [0u8; 8];
    for (k, b) in bytes.iter_mut().enumerate() {
        *b = data.get(i * 8 + k).copied().unwrap_or(0);
    }
    f64::from_le_bytes(bytes)
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 512 {
        return;
    }
    let a = f64_at(data, 0);
    let b = f64_at(data, 1);
    let c = f64_at(data, 2);

    // Rubberband never amplifies a finite offset.
    let out = rubberband(a, b, c);
    if a.is_finite() && out.is_finite() {
        assert!(out.abs() <= a.abs() * (1.0 + 1e-12), "rubberband({a}, {b}, {c}) = {out}");
    }
    if a.is_finite() && b.is_finite() && b <= c {
        let _ = clamp(a, b, c, 0.55);
    }

    // Projection rejects rates outside (0, 1) and never panics otherwise.
    match project(a, b) {
        Ok(_) => assert!(b > 0.0 && b < 1.0),
        Err(_) => assert!(!(b > 0.0 && b < 1.0)),
    }

    // Spring construction validates both parameters.
    if let Ok(spring) = FluidSpring::new(a, b) {
        assert!(spring.damping_ratio() > 0.0 && spring.response() > 0.0);
        let k = spring.to_coefficients();
        assert!(k.stiffness >= 0.0 && k.damping >= 0.0);
    }

    // Snap selection on arbitrary point sets.
    let points: Vec<f64> = (3..data.len() / 8).map(|i| f64_at(data, i)).collect();
    if let Ok(i) = nearest_snap_index(a, &points) {
        assert!(i < points.len());
    }

    for direction in Direction::ALL {
        let p = dismiss_progress(direction, a, b, c);
        assert!(p.is_nan() || (0.0..=1.0).contains(&p));
    }
});
