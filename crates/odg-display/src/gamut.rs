//! Gamut mapping strategies and their builtin style fallbacks.

use std::fmt;
use std::str::FromStr;

use odg_ocio::{BuiltinCatalog, OcioResult};
use serde::Deserialize;
use tracing::debug;

/// How out-of-gamut colors are brought into the display's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum GamutStrategy {
    /// Hard clip at the display boundary. Adds no transform.
    #[default]
    Clip,
    /// Perceptual compression.
    Perceptual,
    /// Saturation-preserving compression.
    Saturation,
    /// Relative colorimetric.
    Relative,
    /// Absolute colorimetric.
    Absolute,
    /// Soft knee near the boundary.
    SoftClip,
    /// Compression along constant hue lines.
    HuePreserving,
    /// Content-adaptive compression.
    Adaptive,
}

impl GamutStrategy {
    /// All strategies in declaration order.
    pub const ALL: [GamutStrategy; 8] = [
        Self::Clip,
        Self::Perceptual,
        Self::Saturation,
        Self::Relative,
        Self::Absolute,
        Self::SoftClip,
        Self::HuePreserving,
        Self::Adaptive,
    ];

    /// Returns the document spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::Perceptual => "perceptual",
            Self::Saturation => "saturation",
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::SoftClip => "soft_clip",
            Self::HuePreserving => "hue_preserving",
            Self::Adaptive => "adaptive",
        }
    }

    /// Builtin styles to try, most specific first. Empty for [`Self::Clip`].
    pub fn candidate_styles(&self) -> &'static [&'static str] {
        match self {
            Self::Clip => &[],
            Self::Perceptual => &["GAMUT-MAP - PERCEPTUAL"],
            Self::Saturation => &["GAMUT-MAP - SATURATION"],
            Self::Relative => &["GAMUT-MAP - RELATIVE"],
            Self::Absolute => &["GAMUT-MAP - ABSOLUTE"],
            Self::SoftClip => &["GAMUT-MAP - SOFT-CLIP", "GAMUT-MAP - PERCEPTUAL"],
            Self::Adaptive => &["GAMUT-MAP - ADAPTIVE", "GAMUT-MAP - PERCEPTUAL"],
            Self::HuePreserving => &["GAMUT-MAP - HUE-PRESERVING", "GAMUT-MAP - SATURATION"],
        }
    }

    /// Picks the first candidate style the catalog provides.
    ///
    /// Returns `Ok(None)` for [`Self::Clip`]. When no candidate is
    /// available the catalog's error for the primary style is returned.
    pub fn resolve(&self, catalog: &BuiltinCatalog) -> OcioResult<Option<String>> {
        let candidates = self.candidate_styles();
        let Some(primary) = candidates.first() else {
            return Ok(None);
        };

        for style in candidates {
            if let Some(canonical) = catalog.canonical(style) {
                if style != primary {
                    debug!(strategy = self.as_str(), requested = primary, resolved = canonical, "gamut style fallback");
                }
                return Ok(Some(canonical.to_string()));
            }
        }

        catalog.lookup(primary).map(|b| Some(b.style))
    }
}

impl fmt::Display for GamutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamutStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == key)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|g| g.as_str()).collect();
                format!("unknown gamut mapping '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

impl TryFrom<String> for GamutStrategy {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
