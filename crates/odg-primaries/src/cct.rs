//! Correlated color temperature (CCT) and Duv estimation.
//!
//! CCT is the temperature of the point on the Planckian (blackbody) locus
//! closest to a chromaticity in the CIE 1960 UCS (u, v) diagram, and Duv
//! is the signed distance to that point (positive above the locus, toward
//! green; negative below, toward magenta).
//!
//! Locus points come from `colorimetry`, which integrates the Planck
//! spectrum against the CIE 1931 observer. The closest point is found the
//! way Ohno (2013) frames the problem: scan a geometric temperature table
//! over [`CCT_MIN`, `CCT_MAX`], then refine inside the bracketing interval
//! with a golden-section search.
//!
//! A chromaticity whose closest sampled point is a table end is still
//! reported, with [`CctDuv::clamped`] set: its true CCT lies beyond the
//! bound, and `duv` is the distance to the bound.
//!
//! # Example
//!
//! ```rust
//! use odg_primaries::{cct_duv, D65_XY};
//!
//! let r = cct_duv(D65_XY.0, D65_XY.1).unwrap();
//! assert!((r.cct - 6504.0).abs() < 50.0);
//! assert!(r.duv > 0.0);
//! assert!(!r.clamped);
//! ```

use colorimetry::{cct::CCT, xyz::XYZ};
use thiserror::Error;

/// Lowest temperature sampled. The `colorimetry` locus is defined above
/// 1000 K.
pub const CCT_MIN: f64 = 1_010.0;

/// Highest temperature sampled.
pub const CCT_MAX: f64 = 100_000.0;

// 1% steps, as in Ohno's cascade table
const TABLE_RATIO: f64 = 1.01;
const GOLDEN_TOLERANCE: f64 = 1e-2;

/// Errors from CCT/Duv estimation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CctError {
    /// Input coordinate is NaN or infinite.
    #[error("chromaticity ({x}, {y}) is not finite")]
    NonFinite {
        /// x coordinate.
        x: f64,
        /// y coordinate.
        y: f64,
    },

    /// The xy to uv projection is undefined (-2x + 12y + 3 = 0).
    #[error("chromaticity ({x}, {y}) is a singular point of the uv projection")]
    Singular {
        /// x coordinate.
        x: f64,
        /// y coordinate.
        y: f64,
    },

    /// The locus point at a temperature could not be evaluated.
    #[error("Planckian locus undefined at {kelvin} K: {reason}")]
    Locus {
        /// Temperature requested.
        kelvin: f64,
        /// Error reported by the locus model.
        reason: String,
    },
}

/// Result of a CCT estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CctDuv {
    /// Correlated color temperature in kelvin.
    pub cct: f64,
    /// Signed distance from the Planckian locus in CIE 1960 uv.
    pub duv: f64,
    /// `cct` is [`CCT_MIN`] or [`CCT_MAX`] and the real value lies beyond.
    pub clamped: bool,
}

/// Projects CIE 1931 xy to CIE 1960 UCS uv.
pub fn xy_to_uv(x: f64, y: f64) -> Result<(f64, f64), CctError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(CctError::NonFinite { x, y });
    }
    let d = -2.0 * x + 12.0 * y + 3.0;
    if d.abs() < 1e-12 {
        return Err(CctError::Singular { x, y });
    }
    Ok((4.0 * x / d, 6.0 * y / d))
}

/// Projects CIE 1960 UCS uv back to CIE 1931 xy.
pub fn uv_to_xy(u: f64, v: f64) -> (f64, f64) {
    let d = 2.0 * u - 8.0 * v + 4.0;
    (3.0 * u / d, 2.0 * v / d)
}

/// Planckian locus chromaticity in xy.
pub fn planckian_xy(kelvin: f64) -> Result<(f64, f64), CctError> {
    let locus = |reason: String| CctError::Locus { kelvin, reason };

    let cct = CCT::new(kelvin, 0.0).map_err(|e| locus(format!("{e:?}")))?;
    let xyz: XYZ = cct.try_into().map_err(|e| locus(format!("{e:?}")))?;
    let [x, y, z] = xyz.values();
    let sum = x + y + z;
    if !(sum.is_finite() && sum > 0.0) {
        return Err(locus(format!("XYZ sum {sum}")));
    }
    Ok((x / sum, y / sum))
}

/// Planckian locus chromaticity in CIE 1960 uv.
pub fn planckian_uv(kelvin: f64) -> Result<(f64, f64), CctError> {
    let (x, y) = planckian_xy(kelvin)?;
    xy_to_uv(x, y)
}

/// Estimates CCT and Duv of an xy chromaticity.
///
/// # Errors
///
/// - [`CctError::NonFinite`] / [`CctError::Singular`] for undefined input
/// - [`CctError::Locus`] if the locus model rejects a sampled temperature
pub fn cct_duv(x: f64, y: f64) -> Result<CctDuv, CctError> {
    let (u, v) = xy_to_uv(x, y)?;
    let dist = |t: f64| -> Result<f64, CctError> {
        let (ut, vt) = planckian_uv(t)?;
        Ok((u - ut).hypot(v - vt))
    };

    // Coarse table scan
    let mut temps = Vec::new();
    let mut t = CCT_MIN;
    while t < CCT_MAX {
        temps.push(t);
        t *= TABLE_RATIO;
    }
    temps.push(CCT_MAX);

    let mut best = (0, f64::INFINITY);
    for (i, &t) in temps.iter().enumerate() {
        let d = dist(t)?;
        if d < best.1 {
            best = (i, d);
        }
    }
    let best = best.0;

    let clamped = best == 0 || best == temps.len() - 1;
    let cct = if clamped {
        temps[best]
    } else {
        golden_section(temps[best - 1], temps[best + 1], dist)?
    };

    let (_, vt) = planckian_uv(cct)?;
    let sign = if v >= vt { 1.0 } else { -1.0 };

    Ok(CctDuv {
        cct,
        duv: sign * dist(cct)?,
        clamped,
    })
}

/// Minimizes a unimodal `f` on `[a, b]`.
fn golden_section(
    mut a: f64,
    mut b: f64,
    f: impl Fn(f64) -> Result<f64, CctError>,
) -> Result<f64, CctError> {
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let (mut fc, mut fd) = (f(c)?, f(d)?);
    while (b - a) > GOLDEN_TOLERANCE {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c)?;
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d)?;
        }
    }
    Ok((a + b) / 2.0)
}
