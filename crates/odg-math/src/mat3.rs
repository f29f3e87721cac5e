//! Row-major 3x3 matrices acting on column vectors.
//!
//! ```text
//! | m00 m01 m02 |   | x |
//! | m10 m11 m12 | * | y |
//! | m20 m21 m22 |   | z |
//! ```
//!
//! Rows are what OCIO writes, so the storage matches the config layout and
//! [`Mat3::to_homogeneous`] is a plain copy with padding.

use crate::Vec3;
use std::ops::{Index, Mul};

/// Determinants below this magnitude are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// A 3x3 matrix.
///
/// ```rust
/// use odg_math::{Mat3, Vec3};
///
/// let v = Vec3::new(1.0, 2.0, 3.0);
/// assert_eq!(Mat3::IDENTITY * v, v);
/// assert_eq!(Mat3::diagonal(2.0, 1.0, 1.0) * v, Vec3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// `m[row][col]`
    pub m: [[f64; 3]; 3],
}

impl Mat3 {
    /// All zeros.
    pub const ZERO: Self = Self { m: [[0.0; 3]; 3] };

    /// Identity.
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    #[inline]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Matrix whose columns are `c0`, `c1`, `c2`.
    pub fn from_col_vecs(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_rows([c0.to_array(), c1.to_array(), c2.to_array()]).transpose()
    }

    #[inline]
    pub const fn diagonal(a: f64, b: f64, c: f64) -> Self {
        Self::from_rows([[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]])
    }

    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.m[i])
    }

    #[inline]
    pub fn col(&self, j: usize) -> Vec3 {
        Vec3::new(self.m[0][j], self.m[1][j], self.m[2][j])
    }

    pub fn transpose(&self) -> Self {
        Self::from_rows([self.col(0).to_array(), self.col(1).to_array(), self.col(2).to_array()])
    }

    /// Scalar triple product of the rows.
    pub fn determinant(&self) -> f64 {
        self.row(0).dot(self.row(1).cross(self.row(2)))
    }

    /// Inverse, or `None` when the determinant is non-finite or below
    /// [`SINGULAR_EPSILON`].
    ///
    /// Column `j` of the inverse is the cross product of the other two rows
    /// divided by the determinant.
    ///
    /// ```rust
    /// use odg_math::Mat3;
    ///
    /// let inv = Mat3::diagonal(2.0, 4.0, 8.0).inverse().unwrap();
    /// assert_eq!(inv, Mat3::diagonal(0.5, 0.25, 0.125));
    /// assert!(Mat3::ZERO.inverse().is_none());
    /// ```
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let (r0, r1, r2) = (self.row(0), self.row(1), self.row(2));
        let k = det.recip();
        Some(Self::from_col_vecs(r1.cross(r2) * k, r2.cross(r0) * k, r0.cross(r1) * k))
    }

    /// `self * v`.
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }

    /// `self * other`.
    pub fn mul_mat(&self, other: &Self) -> Self {
        let cols = [0, 1, 2].map(|j| self.transform(other.col(j)));
        Self::from_col_vecs(cols[0], cols[1], cols[2])
    }

    /// False if any entry is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Row-major 4x4 with this matrix in the top-left block, as
    /// `MatrixTransform` expects.
    ///
    /// ```rust
    /// use odg_math::Mat3;
    ///
    /// let h = Mat3::diagonal(2.0, 3.0, 4.0).to_homogeneous();
    /// assert_eq!([h[0], h[5], h[10], h[15]], [2.0, 3.0, 4.0, 1.0]);
    /// ```
    pub fn to_homogeneous(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.m.iter().enumerate() {
            out[i * 4..i * 4 + 3].copy_from_slice(row);
        }
        out[15] = 1.0;
        out
    }

    /// Top-left block of a row-major 4x4.
    pub fn from_homogeneous(h: &[f64; 16]) -> Self {
        Self::from_rows([0, 1, 2].map(|i| [h[i * 4], h[i * 4 + 1], h[i * 4 + 2]]))
    }

    /// To glam's column-major layout.
    pub fn to_glam(&self) -> glam::DMat3 {
        glam::DMat3::from_cols(self.col(0).to_glam(), self.col(1).to_glam(), self.col(2).to_glam())
    }

    /// From glam's column-major layout.
    pub fn from_glam(m: glam::DMat3) -> Self {
        let [c0, c1, c2] = [m.x_axis, m.y_axis, m.z_axis].map(Vec3::from_glam);
        Self::from_col_vecs(c0, c1, c2)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(v)
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl Index<usize> for Mat3 {
    type Output = [f64; 3];

    fn index(&self, row: usize) -> &[f64; 3] {
        &self.m[row]
    }
}
