//! Measured display characterization.
//!
//! A [`DisplayCharacterization`] is built once from the input document and
//! then only read. Luminance updates go through
//! [`DisplayCharacterization::with_luminance`], which returns a new value,
//! and the contrast ratio is always derived from the two luminances.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use odg_primaries::Primaries;
use serde::Deserialize;

/// Gamma used when a document does not specify one.
pub const DEFAULT_GAMMA: f64 = 2.4;

/// CIE 1931 xy chromaticity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromaticity {
    /// x coordinate.
    pub x: f64,
    /// y coordinate.
    pub y: f64,
}

impl Chromaticity {
    /// Creates a chromaticity.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `(x, y)`.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Returns true if both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Chromaticity {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Chromaticity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// Measured red, green and blue primaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbPrimaries {
    /// Red primary.
    pub red: Chromaticity,
    /// Green primary.
    pub green: Chromaticity,
    /// Blue primary.
    pub blue: Chromaticity,
}

impl RgbPrimaries {
    /// Primaries labelled in check order.
    pub fn labelled(&self) -> [(&'static str, Chromaticity); 3] {
        [("red", self.red), ("green", self.green), ("blue", self.blue)]
    }
}

/// Electro-optical transfer function of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum EotfType {
    /// SMPTE ST 2084 perceptual quantizer.
    Pq,
    /// Hybrid log-gamma.
    Hlg,
    /// Pure power law, see `gamma_value`.
    Gamma,
    /// Measured response curve. Accepted on input, not derivable.
    Custom,
}

impl EotfType {
    /// Returns the document spelling (`PQ`, `HLG`, `GAMMA`, `CUSTOM`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pq => "PQ",
            Self::Hlg => "HLG",
            Self::Gamma => "GAMMA",
            Self::Custom => "CUSTOM",
        }
    }

    /// Returns true for HDR transfer functions.
    pub fn is_hdr(&self) -> bool {
        matches!(self, Self::Pq | Self::Hlg)
    }
}

impl fmt::Display for EotfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EotfType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PQ" => Ok(Self::Pq),
            "HLG" => Ok(Self::Hlg),
            "GAMMA" => Ok(Self::Gamma),
            "CUSTOM" => Ok(Self::Custom),
            _ => Err(format!("unknown EOTF '{s}' (expected PQ, HLG, GAMMA or CUSTOM)")),
        }
    }
}

impl TryFrom<String> for EotfType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Measured characteristics of one display.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCharacterization {
    name: String,
    primaries: RgbPrimaries,
    white_point: Chromaticity,
    black_level: f64,
    peak_luminance: f64,
    eotf: EotfType,
    gamma_value: f64,
    measured_response: Option<PathBuf>,
    viewing_conditions: BTreeMap<String, serde_yaml::Value>,
}

impl DisplayCharacterization {
    /// Creates a characterization with default gamma and no viewing conditions.
    pub fn new(
        name: impl Into<String>,
        primaries: RgbPrimaries,
        white_point: Chromaticity,
        black_level: f64,
        peak_luminance: f64,
        eotf: EotfType,
    ) -> Self {
        Self {
            name: name.into(),
            primaries,
            white_point,
            black_level,
            peak_luminance,
            eotf,
            gamma_value: DEFAULT_GAMMA,
            measured_response: None,
            viewing_conditions: BTreeMap::new(),
        }
    }

    /// Example HDR panel: P3 primaries, D65 white, 0.005 to 1000 cd/m², PQ.
    pub fn example() -> Self {
        let viewing = [
            ("ambient_light", serde_yaml::Value::from(5.0)),
            ("viewing_angle", serde_yaml::Value::from(0.0)),
            ("surround", serde_yaml::Value::from("dark")),
        ];
        Self::new(
            "Custom HDR Display",
            RgbPrimaries {
                red: Chromaticity::new(0.680, 0.320),
                green: Chromaticity::new(0.265, 0.690),
                blue: Chromaticity::new(0.150, 0.060),
            },
            Chromaticity::new(0.3127, 0.3290),
            0.005,
            1000.0,
            EotfType::Pq,
        )
        .with_viewing_conditions(viewing.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// Returns a copy with a different gamma exponent.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma_value = gamma;
        self
    }

    /// Returns a copy with a different EOTF.
    pub fn with_eotf(mut self, eotf: EotfType) -> Self {
        self.eotf = eotf;
        self
    }

    /// Returns a copy with updated luminance; the contrast ratio follows.
    pub fn with_luminance(mut self, black_level: f64, peak_luminance: f64) -> Self {
        self.black_level = black_level;
        self.peak_luminance = peak_luminance;
        self
    }

    /// Returns a copy recording a measured response LUT.
    pub fn with_measured_response(mut self, path: impl Into<PathBuf>) -> Self {
        self.measured_response = Some(path.into());
        self
    }

    /// Returns a copy with the given viewing conditions.
    pub fn with_viewing_conditions(mut self, conditions: BTreeMap<String, serde_yaml::Value>) -> Self {
        self.viewing_conditions = conditions;
        self
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Measured primaries.
    #[inline]
    pub fn primaries(&self) -> &RgbPrimaries {
        &self.primaries
    }

    /// Measured white point.
    #[inline]
    pub fn white_point(&self) -> Chromaticity {
        self.white_point
    }

    /// Black level in cd/m².
    #[inline]
    pub fn black_level(&self) -> f64 {
        self.black_level
    }

    /// Peak luminance in cd/m².
    #[inline]
    pub fn peak_luminance(&self) -> f64 {
        self.peak_luminance
    }

    /// `peak_luminance / black_level`; infinite or NaN when black is zero.
    #[inline]
    pub fn contrast_ratio(&self) -> f64 {
        self.peak_luminance / self.black_level
    }

    /// Transfer function.
    #[inline]
    pub fn eotf(&self) -> EotfType {
        self.eotf
    }

    /// Gamma exponent used by [`EotfType::Gamma`].
    #[inline]
    pub fn gamma_value(&self) -> f64 {
        self.gamma_value
    }

    /// Measured response LUT, if recorded.
    #[inline]
    pub fn measured_response(&self) -> Option<&Path> {
        self.measured_response.as_deref()
    }

    /// Free-form viewing conditions.
    #[inline]
    pub fn viewing_conditions(&self) -> &BTreeMap<String, serde_yaml::Value> {
        &self.viewing_conditions
    }

    /// Name lower-cased with spaces and dashes replaced by underscores.
    pub fn slug(&self) -> String {
        slug(&self.name)
    }

    /// Primaries and white point in the colorimetry engine's form.
    pub fn to_primaries(&self) -> Primaries {
        Primaries {
            r: self.primaries.red.as_tuple(),
            g: self.primaries.green.as_tuple(),
            b: self.primaries.blue.as_tuple(),
            w: self.white_point.as_tuple(),
            name: "measured display",
        }
    }
}

/// Lower-cases `name` and replaces spaces and dashes with underscores.
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_follows_luminance() {
        let c = DisplayCharacterization::example();
        assert_eq!(c.contrast_ratio(), 1000.0 / 0.005);

        let updated = c.clone().with_luminance(0.1, 500.0);
        assert_eq!(updated.contrast_ratio(), 500.0 / 0.1);
        assert_eq!(updated.peak_luminance(), 500.0);
        // Original untouched
        assert_eq!(c.black_level(), 0.005);
    }

    #[test]
    fn test_black_zero_ratio_not_finite() {
        let c = DisplayCharacterization::example().with_luminance(0.0, 1000.0);
        assert!(!c.contrast_ratio().is_finite());
    }

    #[test]
    fn test_eotf_parse() {
        assert_eq!("PQ".parse::<EotfType>(), Ok(EotfType::Pq));
        assert_eq!("gamma".parse::<EotfType>(), Ok(EotfType::Gamma));
        assert!("SRGB".parse::<EotfType>().is_err());
        assert!(EotfType::Hlg.is_hdr());
        assert!(!EotfType::Gamma.is_hdr());
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Custom HDR Display"), "custom_hdr_display");
        assert_eq!(slug("LED-Wall A"), "led_wall_a");
    }

    #[test]
    fn test_to_primaries() {
        let p = DisplayCharacterization::example().to_primaries();
        assert_eq!(p.r, (0.680, 0.320));
        assert_eq!(p.w, (0.3127, 0.3290));
    }

    #[test]
    fn test_defaults() {
        let c = DisplayCharacterization::example();
        assert_eq!(c.gamma_value(), DEFAULT_GAMMA);
        assert!(c.measured_response().is_none());
        assert_eq!(c.viewing_conditions()["surround"], serde_yaml::Value::from("dark"));
    }
}
