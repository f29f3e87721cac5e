//! Catalog of OCIO v2 builtin transform styles.
//!
//! A `BuiltinTransform` refers to a transform by style name only; whether
//! the name exists depends on the OCIO library that eventually loads the
//! config. The catalog records which styles are considered available so a
//! generator can pick a supported style (or a fallback) before writing.
//!
//! Style lookup is tolerant the way OCIO's own registry is: case, `-`, `_`
//! and spaces are ignored when matching, and the canonical spelling is
//! returned.

use std::collections::BTreeMap;

use crate::error::{OcioError, OcioResult};
use crate::transform::{BuiltinTransform, TransformDirection};

// ============================================================================
// Standard styles
// ============================================================================

/// ACES and camera transforms used by the built-in base configs.
pub const ACES_STYLES: &[&str] = &[
    "ACEScc_to_ACES2065-1",
    "ACEScct_to_ACES2065-1",
    "ACEScg_to_ACES2065-1",
    "ACES-LMT - ACES 1.3 Reference Gamut Compression",
    "ACES-OUTPUT - ACES2065-1_to_CIE-XYZ-D65 - SDR-VIDEO_1.0",
    "ACES-OUTPUT - ACES2065-1_to_CIE-XYZ-D65 - HDR-VIDEO-1000nit-15nit_REC2020lim_1.1",
    "ARRI_ALEXA-LOGC-EI800-AWG_to_ACES2065-1",
    "ARRI_LOGC4_to_ACES2065-1",
    "SONY_SLOG3-SGAMUT3_to_ACES2065-1",
    "PANASONIC_VLOG-VGAMUT_to_ACES2065-1",
    "RED_LOG3G10-RWG_to_ACES2065-1",
    "UTILITY - ACES-AP0_to_CIE-XYZ-D65_BFD",
    "UTILITY - ACES-AP1_to_CIE-XYZ-D65_BFD",
    "UTILITY - ACES-AP1_to_LINEAR-REC709_BFD",
];

/// Display encodings from the display reference (CIE-XYZ-D65).
pub const DISPLAY_STYLES: &[&str] = &[
    "DISPLAY - CIE-XYZ-D65_to_sRGB",
    "DISPLAY - CIE-XYZ-D65_to_REC.1886-REC.709",
    "DISPLAY - CIE-XYZ-D65_to_REC.2100-PQ",
    "DISPLAY - CIE-XYZ-D65_to_DisplayP3",
];

/// Transfer curves from linear to encoded signal.
pub const CURVE_STYLES: &[&str] = &[
    "CURVE - LINEAR_to_ST-2084",
    "CURVE - ST-2084_to_LINEAR",
    "CURVE - LINEAR_to_HLG",
];

/// Gamut mapping styles shipped in the standard catalog.
pub const GAMUT_MAP_STYLES: &[&str] = &[
    "GAMUT-MAP - PERCEPTUAL",
    "GAMUT-MAP - SATURATION",
    "GAMUT-MAP - RELATIVE",
    "GAMUT-MAP - ABSOLUTE",
];

/// Normalizes a style for matching: lowercase, no `-`, `_` or spaces.
pub fn normalize_style(style: &str) -> String {
    style.to_lowercase().replace(['-', '_', ' '], "")
}

/// Set of builtin transform styles considered available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltinCatalog {
    /// Normalized key -> canonical style.
    styles: BTreeMap<String, String>,
}

impl BuiltinCatalog {
    /// Creates an empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the standard catalog (ACES, display, curve and the four
    /// standard gamut-map styles).
    pub fn standard() -> Self {
        ACES_STYLES
            .iter()
            .chain(DISPLAY_STYLES)
            .chain(CURVE_STYLES)
            .chain(GAMUT_MAP_STYLES)
            .fold(Self::empty(), |c, s| c.with_style(*s))
    }

    /// Adds a style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.insert(style);
        self
    }

    /// Removes a style.
    pub fn without_style(mut self, style: &str) -> Self {
        self.styles.remove(&normalize_style(style));
        self
    }

    /// Adds a style in place.
    pub fn insert(&mut self, style: impl Into<String>) {
        let style = style.into();
        self.styles.insert(normalize_style(&style), style);
    }

    /// Checks whether a style is available.
    pub fn contains(&self, style: &str) -> bool {
        self.styles.contains_key(&normalize_style(style))
    }

    /// Returns the canonical spelling of a style.
    pub fn canonical(&self, style: &str) -> Option<&str> {
        self.styles.get(&normalize_style(style)).map(String::as_str)
    }

    /// Resolves a style to a forward builtin transform.
    ///
    /// # Errors
    ///
    /// [`OcioError::BuiltinNotFound`] if the style is not in the catalog.
    pub fn lookup(&self, style: &str) -> OcioResult<BuiltinTransform> {
        let canonical = self.canonical(style).ok_or_else(|| OcioError::BuiltinNotFound {
            style: style.to_string(),
        })?;
        Ok(BuiltinTransform {
            style: canonical.to_string(),
            direction: TransformDirection::Forward,
        })
    }

    /// Returns all canonical styles in key order.
    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.styles.values().map(String::as_str)
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Checks if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_contents() {
        let c = BuiltinCatalog::standard();
        assert!(c.contains("CURVE - LINEAR_to_ST-2084"));
        assert!(c.contains("CURVE - LINEAR_to_HLG"));
        assert!(c.contains("GAMUT-MAP - PERCEPTUAL"));
        assert!(c.contains("ACEScg_to_ACES2065-1"));
        assert!(!c.contains("GAMUT-MAP - CLIP"));
        assert!(!c.contains("GAMUT-MAP - SOFT-CLIP"));
    }

    #[test]
    fn test_style_normalization() {
        let c = BuiltinCatalog::standard();
        let b = c.lookup("gamut_map perceptual").unwrap();
        assert_eq!(b.style, "GAMUT-MAP - PERCEPTUAL");
        assert_eq!(b.direction, TransformDirection::Forward);
        assert!(c.contains("curvelineartost2084"));
    }

    #[test]
    fn test_unknown_style() {
        let err = BuiltinCatalog::standard().lookup("GAMUT-MAP - NOPE").unwrap_err();
        assert!(matches!(err, OcioError::BuiltinNotFound { style } if style == "GAMUT-MAP - NOPE"));
    }

    #[test]
    fn test_with_and_without() {
        let c = BuiltinCatalog::standard()
            .with_style("GAMUT-MAP - SOFT-CLIP")
            .without_style("GAMUT-MAP - PERCEPTUAL");
        assert!(c.contains("GAMUT-MAP - SOFT-CLIP"));
        assert!(!c.contains("GAMUT-MAP - PERCEPTUAL"));
        assert_eq!(BuiltinCatalog::empty().len(), 0);
    }
}
