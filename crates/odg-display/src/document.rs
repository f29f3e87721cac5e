//! Display configuration document.
//!
//! The document is YAML, deserialized with serde into typed sections.
//! Unknown EOTF or gamut names fail at load time, so everything after this
//! point works with closed enums.
//!
//! ```yaml
//! display:
//!   name: "Custom HDR Display"
//! primaries:
//!   red: [0.680, 0.320]
//!   green: [0.265, 0.690]
//!   blue: [0.150, 0.060]
//! white_point: [0.3127, 0.3290]
//! luminance:
//!   black_level: 0.005
//!   peak_luminance: 1000
//! eotf:
//!   type: PQ
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use odg_ocio::builtin;
use serde::Deserialize;
use thiserror::Error;

use crate::characterization::{Chromaticity, DisplayCharacterization, EotfType, RgbPrimaries, DEFAULT_GAMMA};
use crate::gamut::GamutStrategy;

/// Error loading an input document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The YAML is malformed or does not match the expected shape.
    #[error("invalid YAML in {origin}: {source}")]
    Parse {
        /// File path, or `<string>` for in-memory input.
        origin: String,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// `display:` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplaySection {
    /// Display name.
    pub name: String,
}

/// `primaries:` section, each an `[x, y]` pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrimariesSection {
    /// Red xy.
    pub red: [f64; 2],
    /// Green xy.
    pub green: [f64; 2],
    /// Blue xy.
    pub blue: [f64; 2],
}

/// `luminance:` section, in cd/m².
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LuminanceSection {
    /// Black level.
    pub black_level: f64,
    /// Peak luminance.
    pub peak_luminance: f64,
}

/// `eotf:` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EotfSection {
    /// Transfer function.
    #[serde(rename = "type")]
    pub kind: EotfType,
    /// Exponent for `GAMMA`.
    #[serde(default = "default_gamma")]
    pub gamma_value: f64,
    /// Additional EOTFs; non-empty enables multi-variant output.
    #[serde(default)]
    pub variants: Vec<EotfType>,
    /// Measured response LUT for `CUSTOM`.
    #[serde(default)]
    pub measured_response: Option<PathBuf>,
}

/// `validation:` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationSection {
    /// Overrides the policy's strict mode when present.
    #[serde(default)]
    pub strict_mode: Option<bool>,
}

/// `ocio.base_config:` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BaseConfigSection {
    /// Config kind, `cg` or `studio`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Config release.
    pub config_version: String,
    /// ACES version.
    pub aces_version: String,
    /// OCIO version.
    pub ocio_version: String,
}

impl Default for BaseConfigSection {
    fn default() -> Self {
        Self {
            kind: "studio".into(),
            config_version: "v2.1.0".into(),
            aces_version: "v1.3".into(),
            ocio_version: "v2.3".into(),
        }
    }
}

impl BaseConfigSection {
    /// Builtin identifier, e.g. `studio-config-v2.1.0_aces-v1.3_ocio-v2.3`.
    pub fn identifier(&self) -> String {
        builtin::identifier(&self.kind, &self.config_version, &self.aces_version, &self.ocio_version)
    }
}

/// `ocio:` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OcioSection {
    /// Output path for the generated config.
    #[serde(default)]
    pub output_config: Option<PathBuf>,
    /// Base config selection.
    #[serde(default)]
    pub base_config: BaseConfigSection,
}

/// Complete display configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayDocument {
    /// Display identity.
    pub display: DisplaySection,
    /// Measured primaries.
    pub primaries: PrimariesSection,
    /// Measured white point `[x, y]`.
    pub white_point: [f64; 2],
    /// Measured luminance.
    pub luminance: LuminanceSection,
    /// Transfer function.
    pub eotf: EotfSection,
    /// Free-form viewing conditions.
    #[serde(default)]
    pub viewing_conditions: BTreeMap<String, serde_yaml::Value>,
    /// Free-form extra settings, merged into viewing conditions.
    #[serde(default)]
    pub advanced: BTreeMap<String, serde_yaml::Value>,
    /// Validation overrides.
    #[serde(default)]
    pub validation: ValidationSection,
    /// Gamut mapping strategy.
    #[serde(default)]
    pub gamut_mapping: GamutStrategy,
    /// Output and base config settings.
    #[serde(default)]
    pub ocio: OcioSection,
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

impl DisplayDocument {
    /// Parses a document from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        parse(text, "<string>")
    }

    /// Loads a document from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = read(path)?;
        parse(&text, &path.display().to_string())
    }

    /// Builds the characterization. `advanced` keys win over
    /// `viewing_conditions` keys.
    pub fn characterization(&self) -> DisplayCharacterization {
        let mut viewing = self.viewing_conditions.clone();
        viewing.extend(self.advanced.iter().map(|(k, v)| (k.clone(), v.clone())));

        let primaries = RgbPrimaries {
            red: Chromaticity::from(self.primaries.red),
            green: Chromaticity::from(self.primaries.green),
            blue: Chromaticity::from(self.primaries.blue),
        };

        let mut c = DisplayCharacterization::new(
            self.display.name.clone(),
            primaries,
            Chromaticity::from(self.white_point),
            self.luminance.black_level,
            self.luminance.peak_luminance,
            self.eotf.kind,
        )
        .with_gamma(self.eotf.gamma_value)
        .with_viewing_conditions(viewing);

        if let Some(lut) = &self.eotf.measured_response {
            c = c.with_measured_response(lut.clone());
        }
        c
    }
}

pub(crate) fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound { path: path.to_path_buf() }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

pub(crate) fn parse<T: serde::de::DeserializeOwned>(text: &str, origin: &str) -> Result<T, LoadError> {
    serde_yaml::from_str(text).map_err(|source| LoadError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// Example document describing [`DisplayCharacterization::example`].
pub const EXAMPLE_DOCUMENT: &str = r#"display:
  name: "Custom HDR Display"

primaries:
  red: [0.680, 0.320]
  green: [0.265, 0.690]
  blue: [0.150, 0.060]

white_point: [0.3127, 0.3290]

luminance:
  black_level: 0.005
  peak_luminance: 1000

eotf:
  type: PQ
  gamma_value: 2.4

viewing_conditions:
  ambient_light: 5.0
  viewing_angle: 0.0
  surround: dark

gamut_mapping: clip

validation:
  strict_mode: false

ocio:
  base_config:
    type: studio
    config_version: v2.1.0
    aces_version: v1.3
    ocio_version: v2.3
"#;
