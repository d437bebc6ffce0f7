//! Two-dimensional vector math used by the motion model.

use std::ops::{Add, Mul};

/// Lengths below this are treated as the zero vector when normalizing.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// A 2D vector in screen space (pixels, +Y pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline(always)]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub fn scale(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }

    /// Euclidean length.
    #[inline(always)]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or [`Vec2::ZERO`] for near-zero input.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len < NORMALIZE_EPSILON {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len)
    }

    /// Clamps each axis independently to `[min_x, max_x] x [min_y, max_y]`.
    #[inline]
    pub fn clamp(self, min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self::new(
            min_x.max(max_x.min(self.x)),
            min_y.max(max_y.min(self.y)),
        )
    }

    #[inline(always)]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline(always)]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    #[inline(always)]
    fn mul(self, rhs: f32) -> Vec2 {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_add_and_scale() {
        let v = Vec2::new(1.0, -2.0) + Vec2::new(0.5, 4.0);
        assert_eq!(v, Vec2::new(1.5, 2.0));
        assert_eq!(v * 2.0, Vec2::new(3.0, 4.0));
        assert_eq!(v.scale(0.0), Vec2::ZERO);
    }

    #[test]
    fn test_length() {
        assert!(approx(Vec2::new(3.0, 4.0).length(), 5.0));
        assert_eq!(Vec2::ZERO.length(), 0.0);
    }

    #[test]
    fn test_normalize_diagonal_is_unit_length() {
        let n = Vec2::new(1.0, -1.0).normalize();
        assert!(approx(n.length(), 1.0));
        assert!(approx(n.x, std::f32::consts::FRAC_1_SQRT_2));
        assert!(approx(n.y, -std::f32::consts::FRAC_1_SQRT_2));
    }

    #[test]
    fn test_normalize_near_zero_returns_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        assert_eq!(Vec2::new(1e-7, -1e-7).normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_clamp_axes_independently() {
        let v = Vec2::new(-10.0, 500.0).clamp(0.0, 100.0, 0.0, 200.0);
        assert_eq!(v, Vec2::new(0.0, 200.0));

        let inside = Vec2::new(40.0, 60.0).clamp(0.0, 100.0, 0.0, 200.0);
        assert_eq!(inside, Vec2::new(40.0, 60.0));
    }
}
