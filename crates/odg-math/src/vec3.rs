//! Triplets: an RGB or XYZ value, or one row of a [`crate::Mat3`].

use std::ops::{Add, Index, Mul, Sub};

/// Three `f64` components. Carries RGB as `(x, y, z) = (R, G, B)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    /// First component.
    pub x: f64,
    /// Second component. Luminance when holding XYZ.
    pub y: f64,
    /// Third component.
    pub z: f64,
}

impl Vec3 {
    /// `(0, 0, 0)`
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// `(1, 1, 1)`, RGB white.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(self, o: Self) -> f64 {
        self.to_glam().dot(o.to_glam())
    }

    #[inline]
    pub fn cross(self, o: Self) -> Self {
        Self::from_glam(self.to_glam().cross(o.to_glam()))
    }

    /// False if any component is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.to_glam().is_finite()
    }

    #[inline]
    pub fn to_glam(self) -> glam::DVec3 {
        glam::DVec3::from_array(self.to_array())
    }

    #[inline]
    pub fn from_glam(v: glam::DVec3) -> Self {
        Self::from_array(v.to_array())
    }
}

impl Index<usize> for Vec3 {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 has three components, got index {i}"),
        }
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self::from_glam(self.to_glam() + o.to_glam())
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Self::from_glam(self.to_glam() - o.to_glam())
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        Self::from_glam(self.to_glam() * k)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(a: [f64; 3]) -> Self {
        Self::from_array(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(a + Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(a - Vec3::ONE, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(a * 0.5, Vec3::new(0.5, 1.0, 1.5));
        assert_eq!(a.dot(Vec3::ONE), 6.0);
        assert_eq!(a[1], 2.0);
    }

    #[test]
    fn cross_is_orthogonal() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(a.cross(b), Vec3::new(0.0, 0.0, 1.0));

        let p = Vec3::new(0.3, -1.2, 2.0);
        let q = Vec3::new(4.0, 0.5, -0.7);
        assert!(p.cross(q).dot(p).abs() < 1e-12);
    }

    #[test]
    fn non_finite_detected() {
        assert!(Vec3::ONE.is_finite());
        assert!(!Vec3::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Vec3::new(0.0, 0.0, f64::NEG_INFINITY).is_finite());
    }
}
