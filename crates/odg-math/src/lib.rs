//! # odg-math
//!
//! `f64` matrix and vector primitives for turning chromaticities into the
//! matrices written to OCIO configs.
//!
//! [`Mat3`] is row-major and multiplies column vectors, the layout OCIO's
//! `MatrixTransform` uses. [`Vec3`] holds RGB or XYZ. Both convert to and
//! from [`glam`] for cross-checking.
//!
//! ```rust
//! use odg_math::{Mat3, Vec3};
//!
//! let rgb_to_xyz = Mat3::from_rows([
//!     [0.4123908, 0.3575843, 0.1804808],
//!     [0.2126390, 0.7151687, 0.0721923],
//!     [0.0193308, 0.1191948, 0.9505322],
//! ]);
//!
//! let white = rgb_to_xyz * Vec3::ONE;
//! assert!((white.y - 1.0).abs() < 1e-6);
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

mod mat3;
mod vec3;

pub use mat3::*;
pub use vec3::*;

/// glam types used by the conversions.
pub mod glam {
    pub use ::glam::{DMat3, DVec3};
}
