//! Consistency checks for an assembled config.
//!
//! Run after merging generated color spaces into a base config and before
//! writing. Errors are references an OCIO runtime would refuse to load;
//! warnings are gaps it tolerates.
//!
//! # Example
//!
//! ```
//! use odg_ocio::{builtin, validate, BuiltinCatalog};
//!
//! let config = builtin::resolve("cg-config-v2.1.0_aces-v1.3_ocio-v2.3")?;
//! let issues = validate::check(&config, &BuiltinCatalog::standard());
//! assert!(!validate::has_errors(&issues));
//! # Ok::<(), odg_ocio::OcioError>(())
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::builtin_transforms::BuiltinCatalog;
use crate::colorspace::{ColorSpace, ReferenceSpace};
use crate::config::Config;
use crate::display::{Display, DisplayManager, View};
use crate::role::names;

/// How bad an issue is. Ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational.
    Info,
    /// Loadable, but probably not what was intended.
    Warning,
    /// Would fail to load or resolve.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// What an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    /// A role or view names an undefined color space.
    MissingColorSpace,
    /// A recommended role is absent.
    MissingRole,
    /// Display, view or active-list problem.
    MissingDisplay,
    /// A view names an undefined view transform.
    MissingViewTransform,
    /// Transform misuse or an unavailable builtin style.
    InvalidTransform,
    /// Name or alias clash.
    Duplicate,
}

/// One finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Severity.
    pub severity: Severity,
    /// Category.
    pub category: IssueCategory,
    /// Message for logs.
    pub message: String,
    /// The element concerned: a role, color space or `display:view`.
    pub context: Option<String>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

#[derive(Default)]
struct Findings(Vec<Issue>);

impl Findings {
    fn push(&mut self, severity: Severity, category: IssueCategory, at: Option<&str>, message: String) {
        self.0.push(Issue {
            severity,
            category,
            message,
            context: at.map(str::to_owned),
        });
    }

    fn error(&mut self, category: IssueCategory, at: &str, message: String) {
        self.push(Severity::Error, category, Some(at), message);
    }

    fn warn(&mut self, category: IssueCategory, at: &str, message: String) {
        self.push(Severity::Warning, category, Some(at), message);
    }
}

/// Runs every check. Builtin styles are resolved against `catalog`.
pub fn check(config: &Config, catalog: &BuiltinCatalog) -> Vec<Issue> {
    let mut found = Findings::default();
    roles(config, &mut found);
    displays(config, &mut found);
    active_lists(config, &mut found);
    let mut seen = HashSet::new();
    for cs in config.colorspaces() {
        colorspace(cs, catalog, &mut seen, &mut found);
    }
    found.0
}

fn roles(config: &Config, found: &mut Findings) {
    let roles = config.roles();
    if !roles.contains(names::DEFAULT) {
        found.warn(
            IssueCategory::MissingRole,
            names::DEFAULT,
            format!("recommended role '{}' is not defined", names::DEFAULT),
        );
    }
    for (role, target) in roles.iter().filter(|(_, cs)| config.colorspace(cs).is_none()) {
        found.error(
            IssueCategory::MissingColorSpace,
            role,
            format!("role '{role}' references non-existent color space '{target}'"),
        );
    }
}

fn displays(config: &Config, found: &mut Findings) {
    let manager = config.displays();
    if manager.displays().is_empty() {
        found.push(
            Severity::Warning,
            IssueCategory::MissingDisplay,
            None,
            "no displays defined".into(),
        );
        return;
    }
    for display in manager.displays() {
        if display.views().is_empty() {
            found.warn(
                IssueCategory::MissingDisplay,
                display.name(),
                format!("display '{}' has no views", display.name()),
            );
        }
        for view in display.views() {
            view_refs(config, manager, display, view, found);
        }
    }
}

fn view_refs(config: &Config, manager: &DisplayManager, display: &Display, view: &View, found: &mut Findings) {
    let at = format!("{}:{}", display.name(), view.name());
    let target = config.colorspace(view.colorspace());

    match (target, view.view_transform()) {
        (None, _) => found.error(
            IssueCategory::MissingColorSpace,
            &at,
            format!(
                "view '{}' in display '{}' references non-existent color space '{}'",
                view.name(),
                display.name(),
                view.colorspace()
            ),
        ),
        (Some(cs), Some(_)) if cs.reference_space() != ReferenceSpace::Display => found.error(
            IssueCategory::InvalidTransform,
            &at,
            format!(
                "view '{}' pairs a view transform with scene-referred color space '{}'",
                view.name(),
                cs.name()
            ),
        ),
        _ => {}
    }

    if let Some(vt) = view.view_transform().filter(|vt| manager.view_transform(vt).is_none()) {
        found.error(
            IssueCategory::MissingViewTransform,
            &at,
            format!("view '{}' references non-existent view transform '{vt}'", view.name()),
        );
    }
}

fn active_lists(config: &Config, found: &mut Findings) {
    let manager = config.displays();
    for name in config.active_displays().iter().filter(|n| manager.display(n).is_none()) {
        found.warn(
            IssueCategory::MissingDisplay,
            name,
            format!("active display '{name}' is not defined"),
        );
    }

    let known: HashSet<&str> = manager.displays().iter().flat_map(|d| d.view_names()).collect();
    for name in config.active_views().iter().filter(|n| !known.contains(n.as_str())) {
        found.warn(
            IssueCategory::MissingDisplay,
            name,
            format!("active view '{name}' is not used by any display"),
        );
    }
}

fn colorspace(cs: &ColorSpace, catalog: &BuiltinCatalog, seen: &mut HashSet<String>, found: &mut Findings) {
    let name = cs.name();
    if !seen.insert(name.to_lowercase()) {
        found.error(IssueCategory::Duplicate, name, format!("duplicate color space name: '{name}'"));
    }
    for alias in cs.aliases() {
        if !seen.insert(alias.to_lowercase()) {
            found.warn(
                IssueCategory::Duplicate,
                name,
                format!("alias '{alias}' for '{name}' conflicts with existing name"),
            );
        }
    }

    let transforms: Vec<_> = cs.to_reference().into_iter().chain(cs.from_reference()).collect();
    if cs.is_data() && !transforms.is_empty() {
        found.warn(
            IssueCategory::InvalidTransform,
            name,
            format!("data color space '{name}' has transforms defined (will be ignored)"),
        );
    }

    let mut missing = Vec::new();
    for t in transforms {
        t.for_each_builtin(&mut |style| {
            if !catalog.contains(style) {
                missing.push(style);
            }
        });
    }
    for style in missing {
        found.error(
            IssueCategory::InvalidTransform,
            name,
            format!("color space '{name}' uses unavailable builtin style '{style}'"),
        );
    }
}

/// Any issue at [`Severity::Error`].
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Any issue at [`Severity::Warning`] or above.
pub fn has_warnings(issues: &[Issue]) -> bool {
    issues.iter().any(|i| i.severity >= Severity::Warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtin, Transform};

    fn categories(issues: &[Issue]) -> Vec<IssueCategory> {
        issues.iter().map(|i| i.category).collect()
    }

    #[test]
    fn empty_config_only_warns() {
        let issues = check(&Config::new(), &BuiltinCatalog::standard());
        let cats = categories(&issues);
        assert!(cats.contains(&IssueCategory::MissingRole));
        assert!(cats.contains(&IssueCategory::MissingDisplay));
        assert!(!has_errors(&issues));
    }

    #[test]
    fn every_builtin_config_is_clean() {
        for id in builtin::available_configs() {
            let config = builtin::resolve(id).unwrap();
            let issues = check(&config, &BuiltinCatalog::standard());
            assert!(!has_warnings(&issues), "{id}: {issues:?}");
        }
    }

    #[test]
    fn dangling_role() {
        let mut config = Config::new();
        config.set_role(names::SCENE_LINEAR, "ACEScg");
        let issues = check(&config, &BuiltinCatalog::standard());
        let hit = issues
            .iter()
            .find(|i| i.category == IssueCategory::MissingColorSpace)
            .expect("missing colorspace issue");
        assert_eq!(hit.severity, Severity::Error);
        assert_eq!(hit.context.as_deref(), Some("scene_linear"));
    }

    #[test]
    fn builtin_style_must_be_in_catalog() {
        let mut config = Config::new();
        config
            .add_colorspace(
                ColorSpace::builder("Panel - Display")
                    .reference_space(ReferenceSpace::Display)
                    .from_reference(Transform::group(vec![Transform::builtin("GAMUT-MAP - SOFT-CLIP")]))
                    .build(),
            )
            .unwrap();

        let issues = check(&config, &BuiltinCatalog::standard());
        assert!(has_errors(&issues));
        assert!(issues.iter().any(|i| i.message.contains("GAMUT-MAP - SOFT-CLIP")));

        let extended = BuiltinCatalog::standard().with_style("GAMUT-MAP - SOFT-CLIP");
        assert!(!has_errors(&check(&config, &extended)));
    }

    #[test]
    fn severity_tokens_and_order() {
        let shown: Vec<_> = [Severity::Info, Severity::Warning, Severity::Error]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(shown, ["INFO", "WARN", "ERROR"]);
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn warnings_are_not_errors() {
        let warning = Issue {
            severity: Severity::Warning,
            category: IssueCategory::MissingRole,
            message: "test".into(),
            context: None,
        };
        assert!(!has_errors(std::slice::from_ref(&warning)));
        assert!(has_warnings(std::slice::from_ref(&warning)));
        assert_eq!(warning.to_string(), "[WARN] test");

        let error = Issue {
            severity: Severity::Error,
            ..warning
        };
        assert!(has_errors(&[error]));
    }
}
