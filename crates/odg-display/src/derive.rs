//! Colorspace derivation.
//!
//! Turns a [`DisplayCharacterization`] into a display-referred OCIO color
//! space: an optional gamut-map stage, the XYZ-to-display-RGB matrix, then
//! the EOTF encoding curve.
//!
//! ```
//! use odg_display::{derive, DisplayCharacterization, GamutStrategy, Stage};
//! use odg_ocio::BuiltinCatalog;
//!
//! let panel = DisplayCharacterization::example();
//! let cs = derive(&panel, GamutStrategy::Clip, &BuiltinCatalog::standard())?;
//!
//! assert_eq!(cs.name(), "Custom HDR Display - Display");
//! assert_eq!(cs.pipeline().stages().len(), 2);
//! assert!(matches!(cs.pipeline().stages()[0], Stage::Matrix { .. }));
//! # Ok::<(), odg_display::DeriveError>(())
//! ```

use std::collections::HashSet;

use odg_ocio::{
    BitDepth, BuiltinCatalog, ColorSpace, Encoding, Family, OcioError, ReferenceSpace, Transform,
};
use odg_primaries::{xyz_to_rgb_matrix, PrimariesError};
use thiserror::Error;
use tracing::debug;

use crate::characterization::{slug, DisplayCharacterization, EotfType};
use crate::gamut::GamutStrategy;

/// Builtin style encoding linear light with ST 2084.
pub const PQ_STYLE: &str = "CURVE - LINEAR_to_ST-2084";

/// Builtin style encoding linear light with HLG.
pub const HLG_STYLE: &str = "CURVE - LINEAR_to_HLG";

/// View name used for generated display/view entries.
pub const VIEW_NAME: &str = "Output";

/// Error deriving a colorspace.
#[derive(Debug, Error)]
pub enum DeriveError {
    /// A measurement cannot be used for derivation.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Primaries do not yield an invertible matrix.
    #[error(transparent)]
    Colorimetry(#[from] PrimariesError),

    /// The EOTF has no transform representation.
    #[error("EOTF {eotf} is not supported for derivation")]
    UnsupportedEotf {
        /// Requested EOTF.
        eotf: EotfType,
    },

    /// No builtin transform is available for a stage.
    #[error(transparent)]
    Builtin(#[from] OcioError),

    /// The same EOTF was requested twice in multi-variant mode.
    #[error("EOTF variant {eotf} requested more than once")]
    DuplicateVariant {
        /// Repeated EOTF.
        eotf: EotfType,
    },
}

// ============================================================================
// Pipeline
// ============================================================================

/// EOTF encoding curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// SMPTE ST 2084.
    Pq,
    /// Hybrid log-gamma.
    Hlg,
    /// Power law with the given exponent.
    Gamma(f64),
}

impl Curve {
    /// Builtin style for builtin-backed curves.
    pub fn style(&self) -> Option<&'static str> {
        match self {
            Self::Pq => Some(PQ_STYLE),
            Self::Hlg => Some(HLG_STYLE),
            Self::Gamma(_) => None,
        }
    }

    /// OCIO transform encoding linear light with this curve.
    pub fn to_transform(&self) -> Transform {
        match self {
            Self::Pq | Self::Hlg => Transform::builtin(self.style().unwrap_or_default()),
            Self::Gamma(g) => Transform::exponent(*g).inverse(),
        }
    }
}

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Gamut mapping through a builtin.
    GamutMap {
        /// Requested strategy.
        strategy: GamutStrategy,
        /// Resolved builtin style.
        style: String,
    },
    /// Reference XYZ to display RGB.
    Matrix {
        /// Row-major 4x4 homogeneous matrix.
        matrix: [f64; 16],
    },
    /// EOTF encoding.
    Curve(Curve),
}

impl Stage {
    /// OCIO transform for this stage.
    pub fn to_transform(&self) -> Transform {
        match self {
            Self::GamutMap { style, .. } => Transform::builtin(style.clone()),
            Self::Matrix { matrix } => Transform::matrix(*matrix),
            Self::Curve(c) => c.to_transform(),
        }
    }
}

/// Ordered stages: optional gamut map, matrix, curve.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformPipeline {
    stages: Vec<Stage>,
}

impl TransformPipeline {
    /// Builds a pipeline in the only valid stage order.
    pub fn new(gamut: Option<(GamutStrategy, String)>, matrix: [f64; 16], curve: Curve) -> Self {
        let mut stages = Vec::with_capacity(3);
        if let Some((strategy, style)) = gamut {
            stages.push(Stage::GamutMap { strategy, style });
        }
        stages.push(Stage::Matrix { matrix });
        stages.push(Stage::Curve(curve));
        Self { stages }
    }

    /// Stages in application order.
    #[inline]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The XYZ-to-RGB matrix.
    pub fn matrix(&self) -> Option<&[f64; 16]> {
        self.stages.iter().find_map(|s| match s {
            Stage::Matrix { matrix } => Some(matrix),
            _ => None,
        })
    }

    /// The encoding curve.
    pub fn curve(&self) -> Option<Curve> {
        self.stages.iter().find_map(|s| match s {
            Stage::Curve(c) => Some(*c),
            _ => None,
        })
    }

    /// Resolved gamut-map style, if a gamut stage exists.
    pub fn gamut_style(&self) -> Option<&str> {
        self.stages.iter().find_map(|s| match s {
            Stage::GamutMap { style, .. } => Some(style.as_str()),
            _ => None,
        })
    }

    /// Group transform of all stages.
    pub fn to_transform(&self) -> Transform {
        Transform::group(self.stages.iter().map(Stage::to_transform).collect())
    }
}

// ============================================================================
// Colorspace record
// ============================================================================

/// Naming and classification of a derived colorspace.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSpaceIdentity {
    /// Colorspace name, also used as the display name.
    pub name: String,
    /// Short alias.
    pub alias: String,
    /// Family.
    pub family: Family,
    /// Encoding.
    pub encoding: Encoding,
    /// Bit depth.
    pub bit_depth: BitDepth,
    /// Categories.
    pub categories: Vec<String>,
    /// Description.
    pub description: String,
}

/// Derived display colorspace ready to add to a config.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayColorSpace {
    identity: ColorSpaceIdentity,
    pipeline: TransformPipeline,
    eotf: EotfType,
    strategy: GamutStrategy,
}

impl DisplayColorSpace {
    /// Colorspace name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Display name for the display/view entry.
    #[inline]
    pub fn display_name(&self) -> &str {
        &self.identity.name
    }

    /// Identity record.
    #[inline]
    pub fn identity(&self) -> &ColorSpaceIdentity {
        &self.identity
    }

    /// Transform pipeline.
    #[inline]
    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    /// EOTF this colorspace encodes.
    #[inline]
    pub fn eotf(&self) -> EotfType {
        self.eotf
    }

    /// Requested gamut strategy.
    #[inline]
    pub fn strategy(&self) -> GamutStrategy {
        self.strategy
    }

    /// Builds the display-referred OCIO colorspace.
    pub fn to_colorspace(&self) -> ColorSpace {
        let id = &self.identity;
        let mut builder = ColorSpace::builder(id.name.clone())
            .alias(id.alias.clone())
            .family(id.family)
            .encoding(id.encoding)
            .bit_depth(id.bit_depth)
            .description(id.description.clone())
            .reference_space(ReferenceSpace::Display)
            .from_reference(self.pipeline.to_transform());
        for category in &id.categories {
            builder = builder.category(category.clone());
        }
        builder.build()
    }
}

// ============================================================================
// Derivation
// ============================================================================

/// Derives a display colorspace.
///
/// # Errors
///
/// - [`DeriveError::InvalidInput`] for non-finite or degenerate measurements
/// - [`DeriveError::Colorimetry`] for singular primaries
/// - [`DeriveError::Builtin`] when no gamut-map style is available
/// - [`DeriveError::UnsupportedEotf`] for `CUSTOM`
pub fn derive(
    display: &DisplayCharacterization,
    strategy: GamutStrategy,
    catalog: &BuiltinCatalog,
) -> Result<DisplayColorSpace, DeriveError> {
    derive_named(display, strategy, catalog, display.eotf(), None)
}

/// Derives one colorspace per EOTF, in order, with `" - {EOTF}"` suffixes.
///
/// # Errors
///
/// [`DeriveError::DuplicateVariant`] if an EOTF repeats, otherwise as
/// [`derive`].
pub fn derive_variants(
    display: &DisplayCharacterization,
    strategy: GamutStrategy,
    eotfs: &[EotfType],
    catalog: &BuiltinCatalog,
) -> Result<Vec<DisplayColorSpace>, DeriveError> {
    let mut seen = HashSet::new();
    if let Some(dup) = eotfs.iter().find(|e| !seen.insert(**e)) {
        return Err(DeriveError::DuplicateVariant { eotf: *dup });
    }

    eotfs
        .iter()
        .map(|&eotf| derive_named(display, strategy, catalog, eotf, Some(eotf)))
        .collect()
}

fn derive_named(
    display: &DisplayCharacterization,
    strategy: GamutStrategy,
    catalog: &BuiltinCatalog,
    eotf: EotfType,
    variant: Option<EotfType>,
) -> Result<DisplayColorSpace, DeriveError> {
    precheck(display, eotf)?;

    let matrix = xyz_to_rgb_matrix(&display.to_primaries())?.to_homogeneous();
    let gamut = strategy.resolve(catalog)?.map(|style| (strategy, style));
    let curve = match eotf {
        EotfType::Pq => Curve::Pq,
        EotfType::Hlg => Curve::Hlg,
        EotfType::Gamma => Curve::Gamma(display.gamma_value()),
        EotfType::Custom => return Err(DeriveError::UnsupportedEotf { eotf }),
    };
    if let Some(style) = curve.style() {
        catalog.lookup(style)?;
    }

    let pipeline = TransformPipeline::new(gamut, matrix, curve);
    let identity = identity(display, strategy, eotf, variant);
    debug!(
        name = %identity.name,
        eotf = %eotf,
        gamut = pipeline.gamut_style().unwrap_or("none"),
        "derived display colorspace"
    );

    Ok(DisplayColorSpace {
        identity,
        pipeline,
        eotf,
        strategy,
    })
}

fn precheck(display: &DisplayCharacterization, eotf: EotfType) -> Result<(), DeriveError> {
    let invalid = |field, reason: String| Err(DeriveError::InvalidInput { field, reason });

    let p = display.primaries();
    let points = [
        ("red primary", p.red),
        ("green primary", p.green),
        ("blue primary", p.blue),
        ("white point", display.white_point()),
    ];
    for (field, xy) in points {
        if !xy.is_finite() {
            return invalid(field, format!("{xy} is not finite"));
        }
        if xy.y == 0.0 {
            return invalid(field, format!("{xy} has y = 0"));
        }
    }

    let peak = display.peak_luminance();
    if !(peak.is_finite() && peak > 0.0) {
        return invalid("peak luminance", format!("{peak} must be positive and finite"));
    }
    let black = display.black_level();
    if !(black.is_finite() && black >= 0.0) {
        return invalid("black level", format!("{black} must be non-negative and finite"));
    }
    let gamma = display.gamma_value();
    if eotf == EotfType::Gamma && !(gamma.is_finite() && gamma > 0.0) {
        return invalid("gamma value", format!("{gamma} must be positive and finite"));
    }
    Ok(())
}

fn identity(
    display: &DisplayCharacterization,
    strategy: GamutStrategy,
    eotf: EotfType,
    variant: Option<EotfType>,
) -> ColorSpaceIdentity {
    let name = display.name();
    let (full_name, alias) = match variant {
        Some(v) => (
            format!("{name} - {v} - Display"),
            format!("{}_{}_display", slug(name), v.as_str().to_lowercase()),
        ),
        None => (format!("{name} - Display"), format!("{}_display", slug(name))),
    };

    let encoding = if eotf.is_hdr() {
        Encoding::Hdr
    } else {
        Encoding::Sdr
    };

    ColorSpaceIdentity {
        name: full_name,
        alias,
        family: Family::Display,
        encoding,
        bit_depth: BitDepth::F32,
        categories: vec!["file-io".into(), "display".into()],
        description: format!(
            "Display colorspace for {name} (Peak: {} cd/m², Black: {} cd/m², EOTF: {eotf}, Gamut: {strategy})",
            display.peak_luminance(),
            display.black_level()
        ),
    }
}
