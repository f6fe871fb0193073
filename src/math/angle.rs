use std::f64::consts::{PI, TAU};

use super::Point2;

/// Four-quadrant arctangent of `y / x` in `[0, 2π)`.
///
/// Unlike `f64::atan2`, the result is never negative. Returns `0` at the origin.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn atan4(y: f64, x: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    let a = y.atan2(x);
    if a >= 0.0 {
        return a;
    }
    let wrapped = a + TAU;
    // Tiny negative angles round up to exactly 2π.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Turning angle at `p2` when walking `p1 -> p2 -> p3`, in `(-π, π]`.
///
/// Positive for a left (counter-clockwise) turn, negative for a right turn,
/// zero when walking straight on. Returns `0` if either leg has zero length.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn angle_turn(p1: &Point2, p2: &Point2, p3: &Point2) -> f64 {
    let out = p3 - p2;
    let back = p1 - p2;
    let x = out.dot(&back);
    let y = out.x * back.y - out.y * back.x;
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    PI - atan4(y, x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn atan4_covers_all_quadrants() {
        assert_abs_diff_eq!(atan4(1.0, 1.0), PI / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(atan4(1.0, -1.0), 3.0 * PI / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(atan4(-1.0, -1.0), 5.0 * PI / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(atan4(-1.0, 1.0), 7.0 * PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn atan4_on_axes() {
        assert_abs_diff_eq!(atan4(0.0, 2.0), 0.0);
        assert_abs_diff_eq!(atan4(2.0, 0.0), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(atan4(0.0, -2.0), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(atan4(-2.0, 0.0), 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(atan4(0.0, 0.0), 0.0);
    }

    #[test]
    fn atan4_never_reaches_full_turn() {
        let a = atan4(-1e-300, 1.0);
        assert!((0.0..TAU).contains(&a));
    }

    #[test]
    fn straight_walk_does_not_turn() {
        let t = angle_turn(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert_abs_diff_eq!(t, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn left_and_right_turns_have_opposite_signs() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 0.0);
        let left = angle_turn(&p1, &p2, &Point2::new(1.0, 1.0));
        let right = angle_turn(&p1, &p2, &Point2::new(1.0, -1.0));
        assert_abs_diff_eq!(left, FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(right, -FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_turn_is_zero() {
        let p = Point2::new(3.0, 3.0);
        assert_abs_diff_eq!(angle_turn(&p, &p, &Point2::new(4.0, 4.0)), 0.0);
    }
}
