//! Display characterization to OCIO colorspace generation.
//!
//! Takes measured display data (primaries, white point, luminance, EOTF),
//! checks it against a validation policy and derives a display-referred
//! colorspace that is merged into a built-in ACES base config.
//!
//! # Pipeline
//!
//! ```text
//! display_config.yaml -> DisplayDocument -> DisplayCharacterization
//!                                            |-> validate() -> ValidationReport
//!                                            '-> derive()   -> DisplayColorSpace
//!                                                  -> odg_ocio::Config -> .ocio
//! ```
//!
//! # Example
//!
//! ```
//! use odg_display::{derive, validate, DisplayDocument, GamutStrategy, ValidationPolicy};
//! use odg_display::document::EXAMPLE_DOCUMENT;
//! use odg_ocio::{builtin, BuiltinCatalog};
//!
//! let doc = DisplayDocument::from_yaml_str(EXAMPLE_DOCUMENT)?;
//! let panel = doc.characterization();
//!
//! let report = validate(&panel, &ValidationPolicy::default());
//! assert!(report.passed());
//!
//! let cs = derive(&panel, GamutStrategy::Perceptual, &BuiltinCatalog::standard())?;
//! let mut config = builtin::resolve(&doc.ocio.base_config.identifier())?;
//! odg_display::generate::merge_into(&mut config, std::slice::from_ref(&cs))?;
//!
//! assert!(config.serialize().contains("Custom HDR Display - Display"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod characterization;
mod derive;
mod gamut;
mod policy;
mod validate;

pub mod document;
pub mod generate;

pub use characterization::{slug, Chromaticity, DisplayCharacterization, EotfType, RgbPrimaries, DEFAULT_GAMMA};
pub use derive::{
    derive, derive_variants, ColorSpaceIdentity, Curve, DeriveError, DisplayColorSpace, Stage, TransformPipeline,
    HLG_STYLE, PQ_STYLE, VIEW_NAME,
};
pub use document::{DisplayDocument, LoadError};
pub use gamut::GamutStrategy;
pub use generate::{GenerateError, GenerateOptions, Generation, SettingsSource};
pub use policy::{ValidationOverrides, ValidationPolicy};
pub use validate::{validate, Diagnostic, DiagnosticCode, ValidationReport};
