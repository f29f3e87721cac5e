//! OpenColorIO v2 config model for generated display color spaces.
//!
//! This crate provides the config side of the display generator:
//! - Define color spaces, displays, views and roles
//! - Build transform chains from matrix, exponent and builtin transforms
//! - Built-in ACES CG/Studio base configs addressed by `ocio://` identifier
//! - A catalog of available builtin transform styles
//! - Validate and serialize configs to `.ocio` YAML
//!
//! There is no pixel processing here; configs are written for an OCIO
//! runtime to load.
//!
//! # Quick Start
//!
//! ```
//! use odg_ocio::{builtin, ColorSpace, Family, ReferenceSpace, Transform};
//!
//! let mut config = builtin::resolve("ocio://studio-config-v2.1.0_aces-v1.3_ocio-v2.3")?;
//!
//! let panel = ColorSpace::builder("Panel - Display")
//!     .family(Family::Display)
//!     .reference_space(ReferenceSpace::Display)
//!     .from_reference(Transform::group(vec![Transform::builtin("CURVE - LINEAR_to_ST-2084")]))
//!     .build();
//! config.add_colorspace(panel)?;
//! config.add_display_view("Panel", "Output", "Panel - Display")?;
//!
//! let yaml = config.serialize();
//! assert!(yaml.contains("!<View> {name: Output, colorspace: Panel - Display}"));
//! # Ok::<(), odg_ocio::OcioError>(())
//! ```
//!
//! # Roles
//!
//! Roles provide semantic access to color spaces:
//!
//! ```
//! use odg_ocio::builtin;
//!
//! let config = builtin::resolve("cg-config-v2.1.0_aces-v1.3_ocio-v2.3")?;
//! let linear = config.colorspace("scene_linear").unwrap();
//! assert_eq!(linear.name(), "ACEScg");
//! # Ok::<(), odg_ocio::OcioError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod colorspace;
mod config;
mod display;
mod error;
mod role;
mod serialize;
mod transform;

pub mod builtin;
pub mod builtin_transforms;
pub mod validate;

// Re-exports
pub use builtin_transforms::BuiltinCatalog;
pub use colorspace::{BitDepth, ColorSpace, ColorSpaceBuilder, Encoding, Family, ReferenceSpace};
pub use config::{Config, FileRule, ProfileVersion};
pub use display::{Display, DisplayManager, View, ViewTransform};
pub use error::{OcioError, OcioResult};
pub use role::{names as role_names, Roles};
pub use transform::{
    BuiltinTransform, ExponentTransform, GroupTransform, MatrixTransform, NegativeStyle, Transform,
    TransformDirection,
};
pub use validate::{check as validate_config, has_errors, has_warnings, Issue, IssueCategory, Severity};
