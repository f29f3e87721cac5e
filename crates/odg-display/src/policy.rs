//! Validation policy: which checks run and their thresholds.

use std::path::Path;

use serde::Deserialize;

use crate::document::{parse, read, LoadError};

/// Checks, thresholds and failure behavior for measurement validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationPolicy {
    /// Check primaries lie inside the xy triangle.
    pub check_primaries: bool,
    /// Check white point range, CCT and Duv.
    pub check_white_point: bool,
    /// Check black and peak luminance.
    pub check_luminance: bool,
    /// Check the contrast ratio range.
    pub check_contrast: bool,
    /// Inclusive lower contrast bound.
    pub min_contrast_ratio: f64,
    /// Inclusive upper contrast bound.
    pub max_contrast_ratio: f64,
    /// Lowest accepted white point CCT in kelvin.
    pub min_white_point_temp: f64,
    /// Highest accepted white point CCT in kelvin.
    pub max_white_point_temp: f64,
    /// Largest accepted |Duv|.
    pub max_duv_deviation: f64,
    /// Violations are errors and abort generation.
    pub strict_mode: bool,
    /// In strict mode, stop checking after the first error.
    pub fail_fast: bool,
    /// In permissive mode, report violations as warnings rather than info.
    pub warn_on_validation_failure: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            check_primaries: true,
            check_white_point: true,
            check_luminance: true,
            check_contrast: true,
            min_contrast_ratio: 100.0,
            max_contrast_ratio: 10000.0,
            min_white_point_temp: 4000.0,
            max_white_point_temp: 10000.0,
            max_duv_deviation: 0.15,
            strict_mode: false,
            fail_fast: false,
            warn_on_validation_failure: true,
        }
    }
}

/// Partial policy read from a settings file. Absent keys keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct ValidationOverrides {
    pub check_primaries: Option<bool>,
    pub check_white_point: Option<bool>,
    pub check_luminance: Option<bool>,
    pub check_contrast: Option<bool>,
    pub min_contrast_ratio: Option<f64>,
    pub max_contrast_ratio: Option<f64>,
    pub min_white_point_temp: Option<f64>,
    pub max_white_point_temp: Option<f64>,
    pub max_duv_deviation: Option<f64>,
    pub strict_mode: Option<bool>,
    pub fail_fast: Option<bool>,
    pub warn_on_validation_failure: Option<bool>,
}

impl ValidationOverrides {
    /// Parses overrides from YAML. An empty document yields no overrides.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        parse_overrides(text, "<string>")
    }

    /// Loads overrides from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        parse_overrides(&read(path)?, &path.display().to_string())
    }
}

fn parse_overrides(text: &str, origin: &str) -> Result<ValidationOverrides, LoadError> {
    if text.trim().is_empty() {
        return Ok(ValidationOverrides::default());
    }
    let parsed: Option<ValidationOverrides> = parse(text, origin)?;
    Ok(parsed.unwrap_or_default())
}

impl ValidationPolicy {
    /// Returns this policy with every present override applied.
    pub fn with_overrides(mut self, o: &ValidationOverrides) -> Self {
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = o.$field { self.$field = v; })*
            };
        }
        apply!(
            check_primaries,
            check_white_point,
            check_luminance,
            check_contrast,
            min_contrast_ratio,
            max_contrast_ratio,
            min_white_point_temp,
            max_white_point_temp,
            max_duv_deviation,
            strict_mode,
            fail_fast,
            warn_on_validation_failure,
        );
        self
    }

    /// Returns this policy with strict mode set.
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = ValidationPolicy::default();
        assert!(p.check_primaries && p.check_contrast);
        assert_eq!(p.min_contrast_ratio, 100.0);
        assert_eq!(p.max_contrast_ratio, 10000.0);
        assert_eq!(p.max_duv_deviation, 0.15);
        assert!(!p.strict_mode);
        assert!(!p.fail_fast);
        assert!(p.warn_on_validation_failure);
    }

    #[test]
    fn test_overrides_merge_key_by_key() {
        let o = ValidationOverrides::from_yaml_str("max_contrast_ratio: 1000000\ncheck_white_point: false\n").unwrap();
        let p = ValidationPolicy::default().with_overrides(&o);

        assert_eq!(p.max_contrast_ratio, 1_000_000.0);
        assert!(!p.check_white_point);
        // Untouched keys keep defaults
        assert_eq!(p.min_contrast_ratio, 100.0);
        assert!(p.check_primaries);
        assert_eq!(p.min_white_point_temp, 4000.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ValidationOverrides::from_yaml_str("check_gamma: true\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("check_gamma"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(ValidationOverrides::from_yaml_str("").unwrap(), ValidationOverrides::default());
        assert_eq!(ValidationOverrides::from_yaml_str("~\n").unwrap(), ValidationOverrides::default());
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(ValidationOverrides::from_yaml_str("strict_mode: sometimes\n").is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation_settings.yaml");
        std::fs::write(&path, "strict_mode: true\nfail_fast: true\n").unwrap();

        let p = ValidationPolicy::default().with_overrides(&ValidationOverrides::load(&path).unwrap());
        assert!(p.strict_mode);
        assert!(p.fail_fast);
    }
}
