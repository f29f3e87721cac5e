//! OCIO configuration model.
//!
//! A [`Config`] is assembled in memory (usually starting from one of the
//! [`builtin`](crate::builtin) base configs), extended with generated
//! color spaces and display/view entries, then serialized with
//! [`Config::serialize`] or [`Config::write`].
//!
//! # Example
//!
//! ```
//! use odg_ocio::{ColorSpace, Config, Family, ReferenceSpace};
//!
//! let mut config = Config::new();
//! config.add_colorspace(
//!     ColorSpace::builder("Monitor - Display")
//!         .family(Family::Display)
//!         .reference_space(ReferenceSpace::Display)
//!         .build(),
//! )?;
//! config.add_display_view("Monitor", "Output", "Monitor - Display")?;
//!
//! assert_eq!(config.displays().displays().len(), 1);
//! # Ok::<(), odg_ocio::OcioError>(())
//! ```

use std::fmt;

use crate::colorspace::{ColorSpace, ReferenceSpace};
use crate::display::{Display, DisplayManager, View, ViewTransform};
use crate::error::{OcioError, OcioResult};
use crate::role::{names, Roles};

/// OCIO configuration.
///
/// A config defines:
/// - Color spaces and their transforms
/// - Roles (semantic mappings)
/// - Displays, views and view transforms
/// - File rules
#[derive(Debug, Clone)]
pub struct Config {
    name: String,
    description: String,
    version: ProfileVersion,
    search_path: Vec<String>,
    strict_parsing: bool,
    luma: [f64; 3],
    /// Scene- and display-referred spaces in definition order.
    colorspaces: Vec<ColorSpace>,
    roles: Roles,
    displays: DisplayManager,
    /// Active displays (subset to show in UI), empty means all.
    active_displays: Vec<String>,
    /// Active views (subset to show in UI), empty means all.
    active_views: Vec<String>,
    inactive_colorspaces: Vec<String>,
    file_rules: Vec<FileRule>,
}

/// `ocio_profile_version` of a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProfileVersion {
    /// Major version (always 2 for generated configs).
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl ProfileVersion {
    /// Creates a profile version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl Default for ProfileVersion {
    fn default() -> Self {
        Self::new(2, 0)
    }
}

impl fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// File rule for automatic color space assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRule {
    /// Rule name.
    pub name: String,
    /// Assigned color space (or role).
    pub colorspace: String,
    /// Glob pattern.
    pub pattern: Option<String>,
    /// Extension filter.
    pub extension: Option<String>,
}

impl FileRule {
    /// Name of the catch-all rule OCIO v2 requires last.
    pub const DEFAULT: &'static str = "Default";

    /// Creates the catch-all `Default` rule.
    pub fn default_rule(colorspace: impl Into<String>) -> Self {
        Self {
            name: Self::DEFAULT.to_string(),
            colorspace: colorspace.into(),
            pattern: None,
            extension: None,
        }
    }

    /// Checks if this is the catch-all rule.
    pub fn is_default(&self) -> bool {
        self.name == Self::DEFAULT
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates an empty v2.0 config.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            version: ProfileVersion::default(),
            search_path: Vec::new(),
            strict_parsing: true,
            luma: [0.2126, 0.7152, 0.0722],
            colorspaces: Vec::new(),
            roles: Roles::new(),
            displays: DisplayManager::new(),
            active_displays: Vec::new(),
            active_views: Vec::new(),
            inactive_colorspaces: Vec::new(),
            file_rules: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns config name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns config description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the profile version.
    #[inline]
    pub fn version(&self) -> ProfileVersion {
        self.version
    }

    /// Returns the LUT search path entries.
    #[inline]
    pub fn search_path(&self) -> &[String] {
        &self.search_path
    }

    /// Returns the strict parsing flag.
    #[inline]
    pub fn strict_parsing(&self) -> bool {
        self.strict_parsing
    }

    /// Returns luma coefficients.
    #[inline]
    pub fn luma(&self) -> [f64; 3] {
        self.luma
    }

    /// Returns all color spaces, scene- and display-referred.
    #[inline]
    pub fn colorspaces(&self) -> &[ColorSpace] {
        &self.colorspaces
    }

    /// Returns color spaces relative to one reference space.
    pub fn colorspaces_in(&self, reference: ReferenceSpace) -> impl Iterator<Item = &ColorSpace> {
        self.colorspaces
            .iter()
            .filter(move |cs| cs.reference_space() == reference)
    }

    /// Gets a color space by name, alias or role.
    pub fn colorspace(&self, name: &str) -> Option<&ColorSpace> {
        let resolved = self.roles.get(name).unwrap_or(name);
        self.colorspaces.iter().find(|cs| cs.matches_name(resolved))
    }

    /// Returns color space names.
    pub fn colorspace_names(&self) -> impl Iterator<Item = &str> {
        self.colorspaces.iter().map(|cs| cs.name())
    }

    /// Returns role mappings.
    #[inline]
    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    /// Returns display manager.
    #[inline]
    pub fn displays(&self) -> &DisplayManager {
        &self.displays
    }

    /// Returns active displays.
    #[inline]
    pub fn active_displays(&self) -> &[String] {
        &self.active_displays
    }

    /// Returns active views.
    #[inline]
    pub fn active_views(&self) -> &[String] {
        &self.active_views
    }

    /// Returns inactive color spaces.
    #[inline]
    pub fn inactive_colorspaces(&self) -> &[String] {
        &self.inactive_colorspaces
    }

    /// Returns the file rules as defined.
    #[inline]
    pub fn file_rules(&self) -> &[FileRule] {
        &self.file_rules
    }

    /// Returns the file rules with a trailing `Default` rule guaranteed.
    ///
    /// A missing default rule maps to the `default` role when defined,
    /// otherwise to the first color space.
    pub fn effective_file_rules(&self) -> Vec<FileRule> {
        let mut rules = self.file_rules.clone();
        if !rules.iter().any(FileRule::is_default) {
            let target = if self.roles.contains(names::DEFAULT) {
                names::DEFAULT.to_string()
            } else {
                self.colorspace_names()
                    .next()
                    .unwrap_or(names::DEFAULT)
                    .to_string()
            };
            rules.push(FileRule::default_rule(target));
        }
        rules
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Sets config name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets config description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Sets the profile version.
    pub fn set_version(&mut self, version: ProfileVersion) {
        self.version = version;
    }

    /// Adds a search path entry.
    pub fn add_search_path(&mut self, path: impl Into<String>) {
        self.search_path.push(path.into());
    }

    /// Sets a role.
    pub fn set_role(&mut self, role: impl Into<String>, colorspace: impl Into<String>) {
        self.roles.define(role, colorspace);
    }

    /// Appends a file rule.
    pub fn add_file_rule(&mut self, rule: FileRule) {
        self.file_rules.push(rule);
    }

    /// Replaces the active display list.
    pub fn set_active_displays(&mut self, displays: Vec<String>) {
        self.active_displays = displays;
    }

    /// Replaces the active view list.
    pub fn set_active_views(&mut self, views: Vec<String>) {
        self.active_views = views;
    }

    /// Marks a color space inactive.
    pub fn add_inactive_colorspace(&mut self, name: impl Into<String>) {
        self.inactive_colorspaces.push(name.into());
    }

    /// Adds a display with its views.
    pub fn add_display(&mut self, display: Display) {
        self.displays.add_display(display);
    }

    /// Adds a shared view transform.
    pub fn add_view_transform(&mut self, vt: ViewTransform) {
        self.displays.add_view_transform(vt);
    }

    /// Adds a color space.
    ///
    /// # Errors
    ///
    /// [`OcioError::DuplicateColorSpace`] if its name or an alias collides
    /// (case-insensitively) with an existing color space name, alias, or
    /// role name.
    pub fn add_colorspace(&mut self, cs: ColorSpace) -> OcioResult<()> {
        for name in cs.all_names() {
            let taken = self.colorspaces.iter().any(|c| c.matches_name(name))
                || self.roles.iter().any(|(role, _)| role.eq_ignore_ascii_case(name));
            if taken {
                return Err(OcioError::DuplicateColorSpace {
                    name: name.to_string(),
                });
            }
        }
        self.colorspaces.push(cs);
        Ok(())
    }

    /// Adds a view on a display, creating the display if needed.
    ///
    /// Non-empty `active_displays` / `active_views` lists get the new names
    /// appended so the entry is not hidden.
    ///
    /// # Errors
    ///
    /// - [`OcioError::ColorSpaceNotFound`] if `colorspace` is not defined
    /// - [`OcioError::DuplicateView`] if the display already has `view`
    pub fn add_display_view(&mut self, display: &str, view: &str, colorspace: &str) -> OcioResult<()> {
        if self.colorspace(colorspace).is_none() {
            return Err(OcioError::ColorSpaceNotFound {
                name: colorspace.to_string(),
            });
        }

        match self.displays.display_mut(display) {
            Some(d) if d.view(view).is_some() => {
                return Err(OcioError::DuplicateView {
                    display: display.to_string(),
                    view: view.to_string(),
                });
            }
            Some(d) => d.add_view(View::new(view, colorspace)),
            None => {
                let mut d = Display::new(display);
                d.add_view(View::new(view, colorspace));
                self.displays.add_display(d);
            }
        }

        if !self.active_displays.is_empty() && !self.active_displays.iter().any(|d| d == display) {
            self.active_displays.push(display.to_string());
        }
        if !self.active_views.is_empty() && !self.active_views.iter().any(|v| v == view) {
            self.active_views.push(view.to_string());
        }
        Ok(())
    }
}
