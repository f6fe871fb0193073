use super::{Matrix2, Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// A line in implicit form: `a * x + b * y = c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImplicitLine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl ImplicitLine {
    /// Creates a new implicit line from its coefficients.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Returns `a * x + b * y - c`; zero for points on the line.
    #[must_use]
    pub fn residual(&self, p: &Point2) -> f64 {
        self.a * p.x + self.b * p.y - self.c
    }

    /// Returns `true` if both `a` and `b` vanish, so the equation names no line.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.a.abs() < TOLERANCE && self.b.abs() < TOLERANCE
    }
}

/// Inverts a 2x2 matrix using Cramer's rule.
///
/// Returns `None` if the determinant is exactly zero.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn mat2_inverse(m: &Matrix2) -> Option<Matrix2> {
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    if det == 0.0 {
        return None;
    }
    Some(Matrix2::new(
        m[(1, 1)] / det,
        -m[(0, 1)] / det,
        -m[(1, 0)] / det,
        m[(0, 0)] / det,
    ))
}

/// Converts the explicit line through `p1` and `p2` to implicit form.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the two points coincide.
pub fn line_exp_to_imp(p1: &Point2, p2: &Point2) -> Result<ImplicitLine> {
    if (p2 - p1).norm() < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "line through identical points ({}, {})",
            p1.x, p1.y
        ))
        .into());
    }
    Ok(ImplicitLine::new(
        p2.y - p1.y,
        p1.x - p2.x,
        p1.x * p2.y - p2.x * p1.y,
    ))
}

/// Intersects two implicit lines.
///
/// Returns `None` if either line is degenerate or the lines are parallel
/// (including coincident).
#[must_use]
pub fn lines_imp_intersect(l1: &ImplicitLine, l2: &ImplicitLine) -> Option<Point2> {
    if l1.is_degenerate() || l2.is_degenerate() {
        return None;
    }
    let m = Matrix2::new(l1.a, l1.b, l2.a, l2.b);
    // Scale-aware parallel test: the raw determinant of nearly parallel lines
    // rarely lands on exactly zero.
    let scale = (l1.a.abs() + l1.b.abs()) * (l2.a.abs() + l2.b.abs());
    if m.determinant().abs() <= TOLERANCE * scale {
        return None;
    }
    let inv = mat2_inverse(&m)?;
    Some(Point2::from(inv * Vector2::new(l1.c, l2.c)))
}

/// Intersects the line through `p1`, `p2` with the line through `p3`, `p4`.
///
/// Returns `Ok(None)` for parallel or coincident lines.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if either pair of points coincides.
pub fn lines_exp_intersect(
    p1: &Point2,
    p2: &Point2,
    p3: &Point2,
    p4: &Point2,
) -> Result<Option<Point2>> {
    let l1 = line_exp_to_imp(p1, p2)?;
    let l2 = line_exp_to_imp(p3, p4)?;
    Ok(lines_imp_intersect(&l1, &l2))
}

/// Returns the foot of the perpendicular dropped from `p3` onto the line
/// through `p1` and `p2`.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if `p1` and `p2` coincide.
pub fn line_exp_perp(p1: &Point2, p2: &Point2, p3: &Point2) -> Result<Point2> {
    let d = p2 - p1;
    let bot = d.norm_squared();
    if bot < TOLERANCE * TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "perpendicular onto zero-length line at ({}, {})",
            p1.x, p1.y
        ))
        .into());
    }
    let t = (p3 - p1).dot(&d) / bot;
    Ok(p1 + d * t)
}

/// Computes the orthocentre of a triangle.
///
/// Returns `None` for degenerate (collinear) triangles.
#[must_use]
pub fn triangle_orthocentre(p1: &Point2, p2: &Point2, p3: &Point2) -> Option<Point2> {
    let p23 = line_exp_perp(p2, p3, p1).ok()?;
    let p31 = line_exp_perp(p3, p1, p2).ok()?;
    lines_exp_intersect(p1, &p23, p2, &p31).ok().flatten()
}

/// Returns the segment of half-length `w` perpendicular to `p1 -> p2`,
/// centred on the line end `p1`.
///
/// With `d` the unit vector from `p2` to `p1`, the points are
/// `p1 + w * (-d.y, d.x)` and `p1 + w * (d.y, -d.x)`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if `p1` equals `p2`.
pub fn line_end_perpendicular(p1: &Point2, p2: &Point2, w: f64) -> Result<[Point2; 2]> {
    let d = p1 - p2;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    let d = d / len;
    Ok([
        Point2::new(p1.x - d.y * w, p1.y + d.x * w),
        Point2::new(p1.x + d.y * w, p1.y - d.x * w),
    ])
}
