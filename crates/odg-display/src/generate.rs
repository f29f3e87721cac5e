//! End-to-end generation: load, validate, derive, merge into a base config
//! and write.
//!
//! Each step logs through `tracing`. Validation diagnostics are emitted at
//! the level matching their severity, so a subscriber sees the report as it
//! is produced.

use std::path::{Path, PathBuf};

use odg_ocio::{builtin, validate_config, BuiltinCatalog, Config, Issue, OcioError, Severity};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::characterization::{DisplayCharacterization, EotfType};
use crate::derive::{derive, derive_variants, DeriveError, DisplayColorSpace, VIEW_NAME};
use crate::document::{DisplayDocument, LoadError};
use crate::gamut::GamutStrategy;
use crate::policy::{ValidationOverrides, ValidationPolicy};
use crate::validate::{validate, Diagnostic, ValidationReport};

/// Default input document path.
pub const DEFAULT_CONFIG_PATH: &str = "display_config.yaml";

/// Default validation settings path.
pub const DEFAULT_SETTINGS_PATH: &str = "validation_settings.yaml";

/// Error from a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Input document or settings could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Strict validation failed; nothing was written.
    #[error("validation failed in strict mode ({} violation(s))", report.violations().count())]
    ValidationFailed {
        /// Full report.
        report: ValidationReport,
    },

    /// Colorspace derivation failed.
    #[error("colorspace derivation failed: {0}")]
    Derive(#[from] DeriveError),

    /// The base config identifier is unknown.
    #[error("cannot load base config: {source}")]
    BaseConfig {
        /// Resolution error, listing known identifiers.
        #[source]
        source: OcioError,
    },

    /// The derived colorspace or display/view could not be added.
    #[error("cannot add display colorspace: {source}")]
    Merge {
        /// Config error.
        #[source]
        source: OcioError,
    },

    /// The merged config failed structural validation.
    #[error("generated config is invalid: {}", issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidConfig {
        /// Error-level issues.
        issues: Vec<Issue>,
    },

    /// The output file could not be written.
    #[error("cannot write output: {source}")]
    Write {
        /// I/O error.
        #[source]
        source: OcioError,
    },
}

/// Where validation settings come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsSource {
    /// Built-in defaults only.
    Defaults,
    /// Conventional path; a missing file falls back to defaults.
    Default(PathBuf),
    /// Named by the user; a missing file is an error.
    Explicit(PathBuf),
}

impl SettingsSource {
    /// Loads overrides from this source.
    pub fn load(&self) -> Result<ValidationOverrides, LoadError> {
        match self {
            Self::Defaults => Ok(ValidationOverrides::default()),
            Self::Default(path) => match ValidationOverrides::load(path) {
                Err(LoadError::NotFound { path }) => {
                    info!(path = %path.display(), "validation settings not found, using defaults");
                    Ok(ValidationOverrides::default())
                }
                other => other.inspect(|_| info!(path = %path.display(), "loaded validation settings")),
            },
            Self::Explicit(path) => {
                let o = ValidationOverrides::load(path)?;
                info!(path = %path.display(), "loaded validation settings");
                Ok(o)
            }
        }
    }
}

/// Options for one generation run. Set fields override the document.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Display document path.
    pub config_path: PathBuf,
    /// Output path override.
    pub output: Option<PathBuf>,
    /// Validation settings source.
    pub settings: SettingsSource,
    /// Force strict validation.
    pub strict: bool,
    /// Gamut strategy override.
    pub gamut_mapping: Option<GamutStrategy>,
    /// EOTF variants override.
    pub eotf_variants: Vec<EotfType>,
    /// Extra builtin styles the target runtime provides.
    pub extra_builtins: Vec<String>,
    /// Serialize without writing.
    pub dry_run: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            output: None,
            settings: SettingsSource::Default(PathBuf::from(DEFAULT_SETTINGS_PATH)),
            strict: false,
            gamut_mapping: None,
            eotf_variants: Vec::new(),
            extra_builtins: Vec::new(),
            dry_run: false,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Loaded characterization.
    pub characterization: DisplayCharacterization,
    /// Effective gamut strategy.
    pub gamut_mapping: GamutStrategy,
    /// Validation report.
    pub report: ValidationReport,
    /// Derived colorspaces, in insertion order.
    pub colorspaces: Vec<DisplayColorSpace>,
    /// Base config identifier used.
    pub base_config: String,
    /// Merged config.
    pub config: Config,
    /// Serialized config.
    pub yaml: String,
    /// Output path, written unless dry run.
    pub output_path: PathBuf,
    /// Whether the file was written.
    pub written: bool,
}

/// Default output file name for a display: `{slug}_config.ocio`.
pub fn default_output_path(display: &DisplayCharacterization) -> PathBuf {
    PathBuf::from(format!("{}_config.ocio", display.slug()))
}

/// Picks the output path: explicit, then document, then default.
pub fn output_path(explicit: Option<&Path>, doc: &DisplayDocument, display: &DisplayCharacterization) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| doc.ocio.output_config.clone())
        .unwrap_or_else(|| default_output_path(display))
}

/// Builds the effective policy: defaults, then settings, then the
/// document's strict flag, then the forced strict flag.
pub fn effective_policy(overrides: &ValidationOverrides, doc: &DisplayDocument, force_strict: bool) -> ValidationPolicy {
    let mut policy = ValidationPolicy::default().with_overrides(overrides);
    if let Some(strict) = doc.validation.strict_mode {
        policy = policy.with_strict_mode(strict);
    }
    if force_strict {
        policy = policy.with_strict_mode(true);
    }
    policy
}

/// Adds derived colorspaces and one `Output` view per colorspace.
pub fn merge_into(config: &mut Config, colorspaces: &[DisplayColorSpace]) -> Result<(), OcioError> {
    for cs in colorspaces {
        config.add_colorspace(cs.to_colorspace())?;
        config.add_display_view(cs.display_name(), VIEW_NAME, cs.name())?;
        debug!(display = cs.display_name(), view = VIEW_NAME, "added display view");
    }
    Ok(())
}

fn log_diagnostic(d: &Diagnostic) {
    match d.severity {
        Severity::Info => info!(code = %d.code, "{}", d.message),
        Severity::Warning => warn!(code = %d.code, "{}", d.message),
        Severity::Error => error!(code = %d.code, "{}", d.message),
    }
}

fn log_issue(issue: &Issue) {
    match issue.severity {
        Severity::Info => debug!(context = issue.context.as_deref(), "{}", issue.message),
        Severity::Warning => warn!(context = issue.context.as_deref(), "{}", issue.message),
        Severity::Error => error!(context = issue.context.as_deref(), "{}", issue.message),
    }
}

/// Runs a full generation.
///
/// # Errors
///
/// See [`GenerateError`]. Strict validation failure returns before any
/// base config is loaded or file written.
pub fn run(opts: &GenerateOptions) -> Result<Generation, GenerateError> {
    info!(path = %opts.config_path.display(), "loading display configuration");
    let doc = DisplayDocument::load(&opts.config_path)?;
    let overrides = opts.settings.load()?;
    run_document(&doc, &overrides, opts)
}

/// Runs generation for an already loaded document.
pub fn run_document(
    doc: &DisplayDocument,
    overrides: &ValidationOverrides,
    opts: &GenerateOptions,
) -> Result<Generation, GenerateError> {
    let characterization = doc.characterization();
    let policy = effective_policy(overrides, doc, opts.strict);

    info!(display = characterization.name(), strict = policy.strict_mode, "validating measurements");
    let report = validate(&characterization, &policy);
    report.diagnostics.iter().for_each(log_diagnostic);
    if !report.passed() {
        return Err(GenerateError::ValidationFailed { report });
    }

    let mut catalog = BuiltinCatalog::standard();
    for style in &opts.extra_builtins {
        catalog.insert(style.clone());
    }

    let gamut_mapping = opts.gamut_mapping.unwrap_or(doc.gamut_mapping);
    let variants = if opts.eotf_variants.is_empty() {
        &doc.eotf.variants
    } else {
        &opts.eotf_variants
    };
    let colorspaces = if variants.is_empty() {
        vec![derive(&characterization, gamut_mapping, &catalog)?]
    } else {
        derive_variants(&characterization, gamut_mapping, variants, &catalog)?
    };

    let base_config = doc.ocio.base_config.identifier();
    info!(base = %base_config, "loading base config");
    let mut config = builtin::resolve(&base_config).map_err(|source| GenerateError::BaseConfig { source })?;
    merge_into(&mut config, &colorspaces).map_err(|source| GenerateError::Merge { source })?;

    let issues = validate_config(&config, &catalog);
    issues.iter().for_each(log_issue);
    let errors: Vec<Issue> = issues.into_iter().filter(|i| i.severity == Severity::Error).collect();
    if !errors.is_empty() {
        return Err(GenerateError::InvalidConfig { issues: errors });
    }

    let yaml = config.serialize();
    let output_path = output_path(opts.output.as_deref(), doc, &characterization);
    let written = if opts.dry_run {
        info!(path = %output_path.display(), "dry run, not writing");
        false
    } else {
        config.write(&output_path).map_err(|source| GenerateError::Write { source })?;
        info!(path = %output_path.display(), colorspaces = colorspaces.len(), "wrote OCIO config");
        true
    };

    Ok(Generation {
        characterization,
        gamut_mapping,
        report,
        colorspaces,
        base_config,
        config,
        yaml,
        output_path,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EXAMPLE_DOCUMENT;

    fn example() -> DisplayDocument {
        DisplayDocument::from_yaml_str(EXAMPLE_DOCUMENT).unwrap()
    }

    #[test]
    fn test_output_path_priority() {
        let mut doc = example();
        let c = doc.characterization();
        assert_eq!(output_path(None, &doc, &c), PathBuf::from("custom_hdr_display_config.ocio"));

        doc.ocio.output_config = Some(PathBuf::from("doc.ocio"));
        assert_eq!(output_path(None, &doc, &c), PathBuf::from("doc.ocio"));
        assert_eq!(output_path(Some(Path::new("cli.ocio")), &doc, &c), PathBuf::from("cli.ocio"));
    }

    #[test]
    fn test_policy_layering() {
        let mut doc = example();
        let relaxed = ValidationOverrides {
            strict_mode: Some(true),
            max_contrast_ratio: Some(1e6),
            ..Default::default()
        };

        // Document says false, overriding the settings file
        let p = effective_policy(&relaxed, &doc, false);
        assert!(!p.strict_mode);
        assert_eq!(p.max_contrast_ratio, 1e6);

        doc.validation.strict_mode = None;
        assert!(effective_policy(&relaxed, &doc, false).strict_mode);
        assert!(effective_policy(&ValidationOverrides::default(), &example(), true).strict_mode);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("panel.ocio");
        let opts = GenerateOptions {
            output: Some(out.clone()),
            settings: SettingsSource::Defaults,
            dry_run: true,
            ..Default::default()
        };

        let g = run_document(&example(), &ValidationOverrides::default(), &opts).unwrap();
        assert!(!g.written);
        assert!(!out.exists());
        assert!(g.yaml.contains("Custom HDR Display - Display"));
    }

    #[test]
    fn test_strict_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("panel.ocio");
        let text = EXAMPLE_DOCUMENT
            .replace("peak_luminance: 1000", "peak_luminance: 1.0")
            .replace("black_level: 0.005", "black_level: 0.02");
        let doc = DisplayDocument::from_yaml_str(&text).unwrap();
        let opts = GenerateOptions {
            output: Some(out.clone()),
            strict: true,
            ..Default::default()
        };

        match run_document(&doc, &ValidationOverrides::default(), &opts) {
            Err(GenerateError::ValidationFailed { report }) => {
                assert!(report.strict);
                assert!(report.violations().count() >= 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_unknown_base_config() {
        let text = EXAMPLE_DOCUMENT.replace("config_version: v2.1.0", "config_version: v9.9.9");
        let doc = DisplayDocument::from_yaml_str(&text).unwrap();
        let opts = GenerateOptions {
            dry_run: true,
            ..Default::default()
        };
        let err = run_document(&doc, &ValidationOverrides::default(), &opts).unwrap_err();
        assert!(matches!(err, GenerateError::BaseConfig { .. }));
        let msg = err.to_string();
        assert!(msg.contains("studio-config-v2.1.0_aces-v1.3_ocio-v2.3"), "{msg}");
    }

    #[test]
    fn test_variants_override_document() {
        let opts = GenerateOptions {
            eotf_variants: vec![EotfType::Pq, EotfType::Hlg],
            dry_run: true,
            ..Default::default()
        };
        let g = run_document(&example(), &ValidationOverrides::default(), &opts).unwrap();
        assert_eq!(g.colorspaces.len(), 2);
        let displays: Vec<&str> = g.config.displays().display_names().collect();
        assert!(displays.contains(&"Custom HDR Display - PQ - Display"));
        assert!(displays.contains(&"Custom HDR Display - HLG - Display"));
    }

    #[test]
    fn test_soft_clip_with_declared_builtin() {
        let opts = GenerateOptions {
            gamut_mapping: Some(GamutStrategy::SoftClip),
            extra_builtins: vec!["GAMUT-MAP - SOFT-CLIP".into()],
            dry_run: true,
            ..Default::default()
        };
        let g = run_document(&example(), &ValidationOverrides::default(), &opts).unwrap();
        assert_eq!(g.gamut_mapping, GamutStrategy::SoftClip);
        assert_eq!(g.colorspaces[0].pipeline().gamut_style(), Some("GAMUT-MAP - SOFT-CLIP"));
        assert!(g.yaml.contains("GAMUT-MAP - SOFT-CLIP"));
    }

    #[test]
    fn test_settings_sources() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("validation_settings.yaml");

        assert_eq!(SettingsSource::Default(missing.clone()).load().unwrap(), ValidationOverrides::default());
        assert!(matches!(
            SettingsSource::Explicit(missing.clone()).load(),
            Err(LoadError::NotFound { .. })
        ));

        std::fs::write(&missing, "strict_mode: [").unwrap();
        assert!(matches!(SettingsSource::Default(missing).load(), Err(LoadError::Parse { .. })));
    }
}
