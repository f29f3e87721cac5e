//! Failures while assembling or writing a config.

use std::path::PathBuf;
use thiserror::Error;

/// Shorthand for `Result<T, OcioError>`.
pub type OcioResult<T> = Result<T, OcioError>;

/// Config assembly and output failures.
#[derive(Debug, Error)]
pub enum OcioError {
    /// Writing the config file failed.
    #[error("I/O error writing {path}: {source}")]
    Io {
        /// Destination.
        path: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },

    /// No color space, alias or role by this name.
    #[error("color space not found: {name}")]
    ColorSpaceNotFound {
        /// Looked-up name.
        name: String,
    },

    /// Name or alias already used by a color space or role.
    #[error("color space name already defined: {name}")]
    DuplicateColorSpace {
        /// Clashing name.
        name: String,
    },

    /// The display already has a view with this name.
    #[error("view '{view}' already defined for display '{display}'")]
    DuplicateView {
        /// Display.
        display: String,
        /// View.
        view: String,
    },

    /// `ocio://` identifier that no built-in config answers to.
    #[error(
        "unknown built-in config: {name} (available: {})",
        .known.iter().map(|k| format!("ocio://{k}")).collect::<Vec<_>>().join(", ")
    )]
    UnknownBuiltinConfig {
        /// Requested identifier, prefix stripped.
        name: String,
        /// Identifiers that resolve.
        known: Vec<String>,
    },

    /// Style missing from the builtin catalog.
    #[error("builtin transform style not available: {style}")]
    BuiltinNotFound {
        /// Requested style.
        style: String,
    },
}
