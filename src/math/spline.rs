use super::Point2;

/// Evaluates a uniform Catmull-Rom segment between `p1` and `p2`.
///
/// `p0` and `p3` are the neighbouring control points that shape the tangents.
/// `t = 0` yields `p1`, `t = 1` yields `p2`.
#[must_use]
pub fn catmull_rom(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2, t: f64) -> Point2 {
    let (p0, p1, p2, p3) = (p0.coords, p1.coords, p2.coords, p3.coords);
    let t2 = t * t;
    let t3 = t2 * t;
    let v = (p1 * 2.0
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
        * 0.5;
    Point2::from(v)
}

/// Samples a smooth path through every point of a control polyline.
///
/// Each span between consecutive control points is split into
/// `samples_per_segment` steps. The first and last control points are
/// duplicated as their own outer neighbours, so the path starts and ends
/// exactly on them. Fewer than two points are returned unchanged.
#[must_use]
pub fn catmull_rom_chain(points: &[Point2], samples_per_segment: usize) -> Vec<Point2> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    let samples = samples_per_segment.max(1);
    let mut path = Vec::with_capacity((n - 1) * samples + 1);
    path.push(points[0]);

    for i in 0..n - 1 {
        let p0 = &points[i.saturating_sub(1)];
        let p1 = &points[i];
        let p2 = &points[i + 1];
        let p3 = &points[(i + 2).min(n - 1)];
        for s in 1..samples {
            #[allow(clippy::cast_precision_loss)]
            let t = s as f64 / samples as f64;
            path.push(catmull_rom(p0, p1, p2, p3, t));
        }
        path.push(*p2);
    }
    path
}
