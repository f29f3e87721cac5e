//! Measurement validation.
//!
//! Checks run in a fixed order (primaries, white point, luminance,
//! contrast) and every sub-check produces one [`Diagnostic`], passing or
//! not. Nothing is printed here; callers render the report.
//!
//! # Example
//!
//! ```
//! use odg_display::{validate, DisplayCharacterization, ValidationPolicy};
//!
//! let panel = DisplayCharacterization::example();
//! let report = validate(&panel, &ValidationPolicy::default());
//!
//! // 200000:1 is above the default range, but permissive mode only warns
//! assert!(report.passed());
//! assert_eq!(report.violations().count(), 1);
//! ```

use std::fmt;

use odg_ocio::Severity;
use odg_primaries::{cct_duv, CCT_MAX};

use crate::characterization::{Chromaticity, DisplayCharacterization};
use crate::policy::ValidationPolicy;

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A primary inside or outside the xy triangle.
    PrimaryRange,
    /// White point coordinate range.
    WhitePointRange,
    /// White point correlated color temperature.
    WhitePointCct,
    /// White point distance from the Planckian locus.
    WhitePointDuv,
    /// CCT/Duv could not be computed; the check was skipped.
    DuvSkipped,
    /// Black level sign.
    BlackLevel,
    /// Peak luminance sign.
    PeakLuminance,
    /// Peak above black.
    LuminanceOrder,
    /// Contrast ratio range.
    ContrastRange,
}

impl DiagnosticCode {
    /// Short kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryRange => "primary-range",
            Self::WhitePointRange => "white-point-range",
            Self::WhitePointCct => "white-point-cct",
            Self::WhitePointDuv => "white-point-duv",
            Self::DuvSkipped => "duv-skipped",
            Self::BlackLevel => "black-level",
            Self::PeakLuminance => "peak-luminance",
            Self::LuminanceOrder => "luminance-order",
            Self::ContrastRange => "contrast-range",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one sub-check.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity after policy is applied.
    pub severity: Severity,
    /// Sub-check identifier.
    pub code: DiagnosticCode,
    /// Human-readable message.
    pub message: String,
    /// True if the measurement failed the sub-check.
    pub violation: bool,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

/// All diagnostics from one validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Diagnostics in check order.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the report was produced in strict mode.
    pub strict: bool,
}

impl ValidationReport {
    /// True iff no diagnostic has [`Severity::Error`].
    pub fn passed(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Failed sub-checks.
    pub fn violations(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.violation)
    }

    /// Diagnostics with the given code.
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }
}

/// Validates a characterization against a policy.
pub fn validate(display: &DisplayCharacterization, policy: &ValidationPolicy) -> ValidationReport {
    let mut checker = Checker {
        policy,
        report: ValidationReport {
            diagnostics: Vec::new(),
            strict: policy.strict_mode,
        },
    };

    if policy.check_primaries {
        check_primaries(display, &mut checker);
    }
    if policy.check_white_point {
        check_white_point(display, &mut checker);
    }
    if policy.check_luminance {
        check_luminance(display, &mut checker);
    }
    if policy.check_contrast {
        check_contrast(display, &mut checker);
    }

    checker.report
}

// ============================================================================
// Checks
// ============================================================================

struct Checker<'a> {
    policy: &'a ValidationPolicy,
    report: ValidationReport,
}

impl Checker<'_> {
    fn halted(&self) -> bool {
        self.policy.strict_mode && self.policy.fail_fast && !self.report.passed()
    }

    fn violation_severity(&self) -> Severity {
        if self.policy.strict_mode {
            Severity::Error
        } else if self.policy.warn_on_validation_failure {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    fn push(&mut self, severity: Severity, code: DiagnosticCode, message: String, violation: bool) {
        if self.halted() {
            return;
        }
        self.report.diagnostics.push(Diagnostic {
            severity,
            code,
            message,
            violation,
        });
    }

    /// Records a pass or a violation. Messages are built only if recorded.
    fn check(
        &mut self,
        ok: bool,
        code: DiagnosticCode,
        pass: impl FnOnce() -> String,
        fail: impl FnOnce() -> String,
    ) {
        if self.halted() {
            return;
        }
        if ok {
            self.push(Severity::Info, code, pass(), false);
        } else {
            let severity = self.violation_severity();
            self.push(severity, code, fail(), true);
        }
    }
}

fn in_unit_triangle(c: Chromaticity) -> bool {
    (0.0..=1.0).contains(&c.x) && (0.0..=1.0).contains(&c.y) && c.x + c.y <= 1.0
}

fn check_primaries(display: &DisplayCharacterization, checker: &mut Checker) {
    for (label, xy) in display.primaries().labelled() {
        checker.check(
            in_unit_triangle(xy),
            DiagnosticCode::PrimaryRange,
            || format!("{label} primary {xy} is within the valid xy chromaticity triangle"),
            || format!("{label} primary {xy} is outside the valid xy chromaticity triangle (0 <= x, y <= 1, x + y <= 1)"),
        );
    }
}

fn check_white_point(display: &DisplayCharacterization, checker: &mut Checker) {
    let wp = display.white_point();
    let in_range = (0.0..=1.0).contains(&wp.x) && (0.0..=1.0).contains(&wp.y);
    checker.check(
        in_range,
        DiagnosticCode::WhitePointRange,
        || format!("white point {wp} is within valid range [0, 1]"),
        || format!("white point {wp} is outside valid range [0, 1]"),
    );

    let policy = checker.policy;
    match cct_duv(wp.x, wp.y) {
        Ok(cd) => {
            let (lo, hi) = (policy.min_white_point_temp, policy.max_white_point_temp);
            let beyond = if cd.cct >= CCT_MAX { "above" } else { "below" };
            checker.check(
                !cd.clamped && (lo..=hi).contains(&cd.cct),
                DiagnosticCode::WhitePointCct,
                || format!("white point CCT ({:.0}K) is within acceptable range [{lo:.0}, {hi:.0}]K", cd.cct),
                || {
                    if cd.clamped {
                        format!(
                            "white point CCT is {beyond} {:.0}K, off the Planckian locus range and outside acceptable range [{lo:.0}, {hi:.0}]K",
                            cd.cct
                        )
                    } else {
                        format!("white point CCT ({:.0}K) is outside acceptable range [{lo:.0}, {hi:.0}]K", cd.cct)
                    }
                },
            );

            let max = policy.max_duv_deviation;
            checker.check(
                cd.duv.abs() <= max,
                DiagnosticCode::WhitePointDuv,
                || format!("white point Duv ({:+.4}) is within acceptable range (±{max:.4})", cd.duv),
                || format!("white point Duv ({:+.4}) exceeds maximum deviation (±{max:.4})", cd.duv),
            );
        }
        Err(e) => checker.push(
            Severity::Warning,
            DiagnosticCode::DuvSkipped,
            format!("could not calculate CCT/Duv ({e}); skipping white point temperature checks"),
            false,
        ),
    }
}

fn check_luminance(display: &DisplayCharacterization, checker: &mut Checker) {
    let black = display.black_level();
    let peak = display.peak_luminance();

    checker.check(
        black >= 0.0,
        DiagnosticCode::BlackLevel,
        || format!("black level ({black} cd/m²) is non-negative"),
        || format!("black level ({black} cd/m²) cannot be negative"),
    );
    checker.check(
        peak > 0.0,
        DiagnosticCode::PeakLuminance,
        || format!("peak luminance ({peak} cd/m²) is positive"),
        || format!("peak luminance ({peak} cd/m²) must be positive"),
    );
    checker.check(
        peak > black,
        DiagnosticCode::LuminanceOrder,
        || format!("peak luminance ({peak} cd/m²) is above black level ({black} cd/m²)"),
        || format!("peak luminance ({peak} cd/m²) must be greater than black level ({black} cd/m²)"),
    );
}

fn check_contrast(display: &DisplayCharacterization, checker: &mut Checker) {
    let black = display.black_level();
    if black <= 0.0 || !black.is_finite() {
        checker.check(
            false,
            DiagnosticCode::ContrastRange,
            String::new,
            || format!("contrast ratio is undefined (black level is {black} cd/m²)"),
        );
        return;
    }

    let ratio = display.contrast_ratio();
    let (lo, hi) = (checker.policy.min_contrast_ratio, checker.policy.max_contrast_ratio);
    checker.check(
        (lo..=hi).contains(&ratio),
        DiagnosticCode::ContrastRange,
        || format!("contrast ratio {ratio:.0}:1 is within acceptable range [{lo:.0}, {hi:.0}]"),
        || format!("contrast ratio {ratio:.0}:1 is outside acceptable range [{lo:.0}, {hi:.0}]"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characterization::{EotfType, RgbPrimaries};

    fn sdr_panel() -> DisplayCharacterization {
        DisplayCharacterization::new(
            "Panel",
            RgbPrimaries {
                red: Chromaticity::new(0.64, 0.33),
                green: Chromaticity::new(0.30, 0.60),
                blue: Chromaticity::new(0.15, 0.06),
            },
            Chromaticity::new(0.3127, 0.3290),
            0.1,
            100.0,
            EotfType::Gamma,
        )
    }

    fn strict() -> ValidationPolicy {
        ValidationPolicy::default().with_strict_mode(true)
    }

    fn with_red(c: DisplayCharacterization, x: f64, y: f64) -> DisplayCharacterization {
        let mut p = *c.primaries();
        p.red = Chromaticity::new(x, y);
        DisplayCharacterization::new(c.name(), p, c.white_point(), c.black_level(), c.peak_luminance(), c.eotf())
    }

    #[test]
    fn test_valid_panel_passes_everything() {
        let report = validate(&sdr_panel(), &strict());
        assert!(report.passed());
        assert_eq!(report.violations().count(), 0);
        // 3 primaries + range + CCT + Duv + 3 luminance + contrast
        assert_eq!(report.diagnostics.len(), 10);
        assert!(report.strict);
    }

    #[test]
    fn test_primary_outside_triangle() {
        let bad = with_red(sdr_panel(), 0.7, 0.4);

        let report = validate(&bad, &strict());
        assert!(!report.passed());
        let v: Vec<_> = report.violations().collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].code, DiagnosticCode::PrimaryRange);
        assert_eq!(v[0].severity, Severity::Error);
        assert!(v[0].message.starts_with("red primary"));

        let permissive = validate(&bad, &ValidationPolicy::default());
        assert!(permissive.passed());
        assert_eq!(permissive.violations().next().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_nan_primary_fails() {
        let bad = with_red(sdr_panel(), f64::NAN, 0.3);
        assert!(!validate(&bad, &strict()).passed());
    }

    #[test]
    fn test_quiet_permissive_reports_info() {
        let policy = ValidationPolicy {
            warn_on_validation_failure: false,
            ..ValidationPolicy::default()
        };
        let report = validate(&DisplayCharacterization::example(), &policy);
        let v: Vec<_> = report.violations().collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity, Severity::Info);
        assert!(report.passed());
    }

    #[test]
    fn test_hdr_contrast_out_of_range() {
        let report = validate(&DisplayCharacterization::example(), &ValidationPolicy::default());
        let contrast: Vec<_> = report.with_code(DiagnosticCode::ContrastRange).collect();
        assert_eq!(contrast.len(), 1);
        assert!(contrast[0].violation);
        assert_eq!(contrast[0].severity, Severity::Warning);
        assert!(contrast[0].message.contains("200000:1"));
        assert!(report.passed());

        assert!(!validate(&DisplayCharacterization::example(), &strict()).passed());
    }

    #[test]
    fn test_strict_collects_all_violations() {
        // Peak below black: order and contrast both fail
        let bad = sdr_panel().with_luminance(0.02, 0.01);
        let report = validate(&bad, &strict());
        let codes: Vec<_> = report.violations().map(|d| d.code).collect();
        assert_eq!(codes, vec![DiagnosticCode::LuminanceOrder, DiagnosticCode::ContrastRange]);
    }

    #[test]
    fn test_fail_fast_stops_at_first_error() {
        let bad = with_red(sdr_panel(), 0.7, 0.4).with_luminance(0.02, 0.01);
        let policy = ValidationPolicy {
            fail_fast: true,
            ..strict()
        };
        let report = validate(&bad, &policy);
        assert!(!report.passed());
        let last = report.diagnostics.last().unwrap();
        assert_eq!(last.code, DiagnosticCode::PrimaryRange);
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(report.violations().count(), 1);
        assert_eq!(report.with_code(DiagnosticCode::LuminanceOrder).count(), 0);
    }

    #[test]
    fn test_fail_fast_ignored_when_permissive() {
        let bad = with_red(sdr_panel(), 0.7, 0.4).with_luminance(0.02, 0.01);
        let policy = ValidationPolicy {
            fail_fast: true,
            ..ValidationPolicy::default()
        };
        assert_eq!(validate(&bad, &policy).violations().count(), 3);
    }

    #[test]
    fn test_zero_black_contrast_undefined() {
        let report = validate(&sdr_panel().with_luminance(0.0, 100.0), &strict());
        let v: Vec<_> = report.violations().collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].code, DiagnosticCode::ContrastRange);
        assert!(v[0].message.contains("undefined"));
    }

    #[test]
    fn test_white_point_cct_and_duv() {
        let report = validate(&sdr_panel(), &ValidationPolicy::default());
        let cct = report.with_code(DiagnosticCode::WhitePointCct).next().unwrap();
        assert!(!cct.violation);
        assert!(cct.message.contains("CCT (6"));

        let warm = DisplayCharacterization::new(
            "Warm",
            *sdr_panel().primaries(),
            Chromaticity::new(0.4476, 0.4074),
            0.1,
            100.0,
            EotfType::Gamma,
        );
        let report = validate(&warm, &strict());
        let cct = report.with_code(DiagnosticCode::WhitePointCct).next().unwrap();
        assert!(cct.violation);
        assert!(!report.passed());
    }

    fn with_white(x: f64, y: f64) -> DisplayCharacterization {
        let c = sdr_panel();
        DisplayCharacterization::new("White", *c.primaries(), Chromaticity::new(x, y), 0.1, 100.0, EotfType::Gamma)
    }

    #[test]
    fn test_off_locus_white_points_fail_strict() {
        // Deep red, saturated blue, hot blue-white
        for (x, y) in [(0.60, 0.38), (0.15, 0.06), (0.25, 0.25)] {
            let report = validate(&with_white(x, y), &strict());
            assert!(!report.passed(), "({x}, {y}) passed");
            let cct = report.with_code(DiagnosticCode::WhitePointCct).next().unwrap();
            assert!(cct.violation, "({x}, {y}): {}", cct.message);
            assert_eq!(cct.severity, Severity::Error);
            assert_eq!(report.with_code(DiagnosticCode::DuvSkipped).count(), 0);
        }
    }

    #[test]
    fn test_clamped_cct_names_the_bound() {
        let report = validate(&with_white(0.15, 0.06), &ValidationPolicy::default());
        let cct = report.with_code(DiagnosticCode::WhitePointCct).next().unwrap();
        assert!(cct.violation);
        assert_eq!(cct.severity, Severity::Warning);
        assert!(cct.message.contains("above 100000K"), "{}", cct.message);

        // Duv is still measured against the bound
        let duv = report.with_code(DiagnosticCode::WhitePointDuv).next().unwrap();
        assert!(duv.violation, "{}", duv.message);
    }

    #[test]
    fn test_duv_skipped_only_for_undefined_coordinates() {
        for (x, y) in [(f64::NAN, 0.33), (1.5, 0.0)] {
            let report = validate(&with_white(x, y), &ValidationPolicy::default());
            let skipped: Vec<_> = report.with_code(DiagnosticCode::DuvSkipped).collect();
            assert_eq!(skipped.len(), 1, "({x}, {y})");
            assert_eq!(skipped[0].severity, Severity::Warning);
            assert!(!skipped[0].violation);
            assert_eq!(report.with_code(DiagnosticCode::WhitePointCct).count(), 0);
            assert_eq!(report.with_code(DiagnosticCode::WhitePointDuv).count(), 0);
        }
    }

    fn with_primaries(red: (f64, f64), green: (f64, f64), blue: (f64, f64)) -> DisplayCharacterization {
        let c = sdr_panel();
        let p = RgbPrimaries {
            red: Chromaticity::new(red.0, red.1),
            green: Chromaticity::new(green.0, green.1),
            blue: Chromaticity::new(blue.0, blue.1),
        };
        DisplayCharacterization::new(c.name(), p, c.white_point(), c.black_level(), c.peak_luminance(), c.eotf())
    }

    #[test]
    fn test_primary_triangle_boundary() {
        let cases = [
            ((0.0, 0.0), true),
            ((1.0, 0.0), true),
            ((0.0, 1.0), true),
            ((0.5, 0.5), true),
            ((0.5, 0.5000001), false),
        ];
        for (xy, inside) in cases {
            let panel = with_primaries(xy, (0.30, 0.60), (0.15, 0.06));

            let report = validate(&panel, &strict());
            let red = report.with_code(DiagnosticCode::PrimaryRange).next().unwrap();
            assert_eq!(red.violation, !inside, "strict {xy:?}: {}", red.message);
            let expected = if inside { Severity::Info } else { Severity::Error };
            assert_eq!(red.severity, expected, "strict {xy:?}");

            let report = validate(&panel, &ValidationPolicy::default());
            let red = report.with_code(DiagnosticCode::PrimaryRange).next().unwrap();
            assert_eq!(red.violation, !inside, "permissive {xy:?}");
            let expected = if inside { Severity::Info } else { Severity::Warning };
            assert_eq!(red.severity, expected, "permissive {xy:?}");
            assert!(report.passed() || !inside, "permissive {xy:?}");
        }
    }

    #[test]
    fn test_toggles_disable_checks() {
        let policy = ValidationPolicy {
            check_primaries: false,
            check_white_point: false,
            check_luminance: false,
            ..strict()
        };
        let report = validate(&DisplayCharacterization::example(), &policy);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].code, DiagnosticCode::ContrastRange);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let panel = DisplayCharacterization::example();
        let before = panel.clone();
        let _ = validate(&panel, &strict());
        assert_eq!(panel, before);
    }
}
