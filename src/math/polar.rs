use super::angle::atan4;
use super::Vector2;

/// A polar coordinate `(r, theta)` relative to an implicit origin.
///
/// `theta` is measured counter-clockwise from the positive x axis and lies in
/// `[0, 2π)` when produced by [`to_polar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    pub r: f64,
    pub theta: f64,
}

impl Polar {
    /// Creates a new polar coordinate.
    #[must_use]
    pub fn new(r: f64, theta: f64) -> Self {
        Self { r, theta }
    }
}

/// Converts a cartesian offset from the origin to polar form.
#[must_use]
pub fn to_polar(v: &Vector2) -> Polar {
    Polar::new(v.norm(), atan4(v.y, v.x))
}

/// Converts a polar coordinate back to a cartesian offset from the origin.
#[must_use]
pub fn from_polar(p: &Polar) -> Vector2 {
    let (sin, cos) = p.theta.sin_cos();
    Vector2::new(p.r * cos, p.r * sin)
}
