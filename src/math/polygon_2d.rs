use super::angle::angle_turn;
use super::Point2;

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Sums the turning angles around a closed polygon.
///
/// A simple counter-clockwise polygon turns through `2π`, a clockwise one
/// through `-2π`. Repeated consecutive vertices contribute nothing.
#[must_use]
pub fn total_turn(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| angle_turn(&points[(i + n - 1) % n], &points[i], &points[(i + 1) % n]))
        .sum()
}
