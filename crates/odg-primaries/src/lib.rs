//! # odg-primaries
//!
//! Colorimetry for measured displays: RGB-XYZ matrices from xy
//! chromaticities, and CCT/Duv of a white point ([`cct`]).
//!
//! ```rust
//! use odg_primaries::{rgb_to_xyz_matrix, DISPLAY_P3};
//! use odg_math::Vec3;
//!
//! let m = rgb_to_xyz_matrix(&DISPLAY_P3).unwrap();
//! let white = m * Vec3::ONE;
//! assert!((white.y - 1.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cct;

pub use cct::{cct_duv, planckian_uv, xy_to_uv, CctDuv, CctError, CCT_MAX, CCT_MIN};

use odg_math::{Mat3, Vec3};
use thiserror::Error;

/// Why a matrix could not be derived.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrimariesError {
    /// NaN or infinite coordinate.
    #[error("{which} chromaticity ({x}, {y}) is not finite")]
    NonFinite {
        /// `red`, `green`, `blue` or `white`.
        which: &'static str,
        /// x
        x: f64,
        /// y
        y: f64,
    },

    /// `y = 0` has no XYZ lift.
    #[error("{which} chromaticity ({x}, {y}) has zero luminance (y = 0)")]
    ZeroLuminance {
        /// `red`, `green`, `blue` or `white`.
        which: &'static str,
        /// x
        x: f64,
        /// y
        y: f64,
    },

    /// Collinear primaries.
    #[error("primaries of '{name}' are degenerate (singular matrix)")]
    Singular {
        /// [`Primaries::name`]
        name: &'static str,
    },
}

/// Three primaries and a white point as CIE 1931 xy.
///
/// ```rust
/// use odg_primaries::{Primaries, D65_XY};
///
/// let measured = Primaries {
///     r: (0.680, 0.320),
///     g: (0.265, 0.690),
///     b: (0.150, 0.060),
///     w: D65_XY,
///     name: "Measured",
/// };
/// assert!(odg_primaries::rgb_to_xyz_matrix(&measured).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red.
    pub r: (f64, f64),
    /// Green.
    pub g: (f64, f64),
    /// Blue.
    pub b: (f64, f64),
    /// White.
    pub w: (f64, f64),
    /// Label used in errors.
    pub name: &'static str,
}

impl Primaries {
    /// White point lifted to XYZ with `Y = 1`.
    pub fn white_xyz(&self) -> Result<Vec3, PrimariesError> {
        lift("white", self.w)
    }

    /// Red, green and blue lifted to XYZ with `Y = 1`.
    fn primaries_xyz(&self) -> Result<[Vec3; 3], PrimariesError> {
        Ok([lift("red", self.r)?, lift("green", self.g)?, lift("blue", self.b)?])
    }
}

/// CIE D65.
pub const D65_XY: (f64, f64) = (0.31270, 0.32900);

/// CIE D50.
pub const D50_XY: (f64, f64) = (0.34567, 0.35850);

/// sRGB / Rec.709.
pub const SRGB: Primaries = Primaries {
    r: (0.6400, 0.3300),
    g: (0.3000, 0.6000),
    b: (0.1500, 0.0600),
    w: D65_XY,
    name: "sRGB",
};

/// Rec.2020.
pub const REC2020: Primaries = Primaries {
    r: (0.7080, 0.2920),
    g: (0.1700, 0.7970),
    b: (0.1310, 0.0460),
    w: D65_XY,
    name: "Rec.2020",
};

/// P3 primaries with a D65 white, the usual shape of a wide-gamut panel.
pub const DISPLAY_P3: Primaries = Primaries {
    r: (0.6800, 0.3200),
    g: (0.2650, 0.6900),
    b: (0.1500, 0.0600),
    w: D65_XY,
    name: "Display P3",
};

/// sRGB RGB-to-XYZ matrix for the xy D65 white (0.3127, 0.3290), to
/// seven decimals.
pub const SRGB_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.4123908, 0.3575843, 0.1804808],
    [0.2126390, 0.7151687, 0.0721923],
    [0.0193308, 0.1191948, 0.9505322],
]);

fn lift(which: &'static str, (x, y): (f64, f64)) -> Result<Vec3, PrimariesError> {
    if !(x.is_finite() && y.is_finite()) {
        Err(PrimariesError::NonFinite { which, x, y })
    } else if y.abs() < 1e-12 {
        Err(PrimariesError::ZeroLuminance { which, x, y })
    } else {
        Ok(Vec3::new(x / y, 1.0, (1.0 - x - y) / y))
    }
}

/// Matrix taking linear RGB to XYZ, scaled so RGB white lands on the white
/// point at `Y = 1`. No chromatic adaptation.
///
/// # Errors
///
/// A non-finite coordinate, `y = 0`, or collinear primaries.
pub fn rgb_to_xyz_matrix(primaries: &Primaries) -> Result<Mat3, PrimariesError> {
    let [r, g, b] = primaries.primaries_xyz()?;
    let white = primaries.white_xyz()?;
    let singular = || PrimariesError::Singular { name: primaries.name };

    // Per-primary gains that make R+G+B sum to the white point.
    let gains = Mat3::from_col_vecs(r, g, b).inverse().ok_or_else(singular)? * white;
    Ok(Mat3::from_col_vecs(r * gains.x, g * gains.y, b * gains.z))
}

/// Inverse of [`rgb_to_xyz_matrix`].
pub fn xyz_to_rgb_matrix(primaries: &Primaries) -> Result<Mat3, PrimariesError> {
    rgb_to_xyz_matrix(primaries)?
        .inverse()
        .ok_or(PrimariesError::Singular { name: primaries.name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        for i in 0..3 {
            assert_abs_diff_eq!(a[i], b[i], epsilon = eps);
        }
    }

    #[test]
    fn srgb_matches_reference_matrix() {
        let m = rgb_to_xyz_matrix(&SRGB).unwrap();
        for i in 0..3 {
            assert_vec_close(m.row(i), SRGB_TO_XYZ.row(i), 1e-6);
        }
        // Row sums are the white point itself
        assert_vec_close(SRGB_TO_XYZ * Vec3::ONE, SRGB.white_xyz().unwrap(), 1e-6);
    }

    #[test]
    fn rgb_white_is_white_point() {
        for space in [SRGB, REC2020, DISPLAY_P3] {
            let white = rgb_to_xyz_matrix(&space).unwrap() * Vec3::ONE;
            assert_vec_close(white, space.white_xyz().unwrap(), 1e-12);
        }
    }

    #[test]
    fn inverse_round_trips() {
        let to_xyz = rgb_to_xyz_matrix(&REC2020).unwrap();
        let to_rgb = xyz_to_rgb_matrix(&REC2020).unwrap();
        let rgb = Vec3::new(0.5, 0.3, 0.8);
        assert_vec_close(to_rgb * (to_xyz * rgb), rgb, 1e-12);
    }

    #[test]
    fn measured_primaries_with_off_white() {
        let panel = Primaries {
            r: (0.6835, 0.3130),
            g: (0.2640, 0.6905),
            b: (0.1505, 0.0580),
            w: (0.3140, 0.3300),
            name: "Panel",
        };
        let m = rgb_to_xyz_matrix(&panel).unwrap();
        assert_abs_diff_eq!((m * Vec3::ONE).y, 1.0, epsilon = 1e-12);
        assert!(m.is_finite());
    }

    #[test]
    fn collinear_primaries_are_singular() {
        let p = Primaries {
            r: (0.2, 0.2),
            g: (0.3, 0.3),
            b: (0.4, 0.4),
            w: D65_XY,
            name: "Collinear",
        };
        assert_eq!(rgb_to_xyz_matrix(&p), Err(PrimariesError::Singular { name: "Collinear" }));
    }

    #[test]
    fn bad_coordinates_name_the_culprit() {
        let zero_y = Primaries { b: (0.15, 0.0), ..SRGB };
        assert!(matches!(
            rgb_to_xyz_matrix(&zero_y),
            Err(PrimariesError::ZeroLuminance { which: "blue", .. })
        ));

        let nan = Primaries { w: (f64::NAN, 0.329), ..SRGB };
        assert!(matches!(
            rgb_to_xyz_matrix(&nan),
            Err(PrimariesError::NonFinite { which: "white", .. })
        ));
    }
}
