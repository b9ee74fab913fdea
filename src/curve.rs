// Parametric heart outline. Used both to rasterize the particle sprite and to
// pick emission points.

use std::f64::consts::PI;

use crate::vector::Vector;

/// Parameter step used when sweeping the full outline.
pub const OUTLINE_STEP: f64 = 0.01;

/// Point on the heart for `t` in `[-PI, PI]`. Y points up.
pub fn point_on_heart(t: f64) -> Vector {
    Vector::new(
        160.0 * t.sin().powi(3),
        130.0 * t.cos() - 50.0 * (2.0 * t).cos() - 20.0 * (3.0 * t).cos() - 10.0 * (4.0 * t).cos()
            + 25.0,
    )
}

/// Maps a uniform sample `u` in `[0, 1)` to a curve parameter.
///
/// Uniform in `t`, not in arc length, so emission is denser where the curve
/// bends slowly.
pub fn parameter_from_unit(u: f64) -> f64 {
    PI - 2.0 * PI * u
}

// Upper bound on outline samples; finer steps are refused.
const MAX_OUTLINE_POINTS: usize = 1 << 20;

/// Closed outline swept from `-PI` at `step`, ending at the first parameter
/// that reaches `PI`. Empty when `step` is not positive or would need more
/// than `MAX_OUTLINE_POINTS` samples.
pub fn outline(step: f64) -> Vec<Vector> {
    let steps = (2.0 * PI / step).ceil();
    if !(step > 0.0) || !(steps <= MAX_OUTLINE_POINTS as f64) {
        return Vec::new();
    }
    let steps = steps as usize;
    let mut points = Vec::with_capacity(steps + 1);
    points.push(point_on_heart(-PI));
    let mut t = -PI;
    let mut i = 0;
    while t < PI && i < steps {
        i += 1;
        t = -PI + i as f64 * step;
        points.push(point_on_heart(t));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector, b: Vector) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn known_points() {
        assert!(close(point_on_heart(0.0), Vector::new(0.0, 75.0)));
        assert!(close(point_on_heart(PI / 2.0), Vector::new(160.0, 65.0)));
    }

    #[test]
    fn bottom_tip() {
        assert!(close(point_on_heart(PI), Vector::new(0.0, -145.0)));
    }

    #[test]
    fn outline_is_closed() {
        let points = outline(OUTLINE_STEP);
        assert!(points.len() > 600);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.x - last.x).abs() < 1.0);
        assert!((first.y - last.y).abs() < 1.0);
    }

    #[test]
    fn unusable_steps_give_empty_outline() {
        assert!(outline(0.0).is_empty());
        assert!(outline(-1.0).is_empty());
        assert!(outline(f64::NAN).is_empty());
        assert!(outline(1e-300).is_empty());
        assert!(outline(f64::MIN_POSITIVE).is_empty());
    }

    #[test]
    fn coarse_step_still_reaches_the_end() {
        let points = outline(10.0);
        assert_eq!(points.len(), 2);
        assert!(close(points[0], point_on_heart(-PI)));
        assert!(close(points[1], point_on_heart(-PI + 10.0)));
    }

    #[test]
    fn unit_sample_covers_full_range() {
        assert_eq!(parameter_from_unit(0.0), PI);
        assert!((parameter_from_unit(1.0) + PI).abs() < 1e-12);
    }
}
