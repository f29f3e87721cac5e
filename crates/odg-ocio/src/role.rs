//! Roles: purpose-named aliases for color spaces.
//!
//! Applications ask for `scene_linear` or `data` instead of a concrete
//! color space name, so a config can swap the working space without
//! touching client code.

use std::collections::BTreeMap;

/// Role names set by the built-in ACES base configs.
pub mod names {
    /// Fallback for the `Default` file rule.
    pub const DEFAULT: &str = "default";
    /// Non-color data.
    pub const DATA: &str = "data";
    /// Linear working space.
    pub const SCENE_LINEAR: &str = "scene_linear";
    /// Log space for compositing.
    pub const COMPOSITING_LOG: &str = "compositing_log";
    /// Grading space.
    pub const COLOR_TIMING: &str = "color_timing";
    /// Matte painting space.
    pub const MATTE_PAINT: &str = "matte_paint";
    /// Scene-referred interchange (ACES2065-1).
    pub const ACES_INTERCHANGE: &str = "aces_interchange";
    /// Display-referred interchange (CIE XYZ, D65 white).
    pub const CIE_XYZ_D65_INTERCHANGE: &str = "cie_xyz_d65_interchange";
}

/// Role table. Iterates in role-name order so serialized configs are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roles(BTreeMap<String, String>);

impl Roles {
    /// No roles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `role` at `colorspace`, overwriting an earlier definition.
    pub fn define(&mut self, role: impl Into<String>, colorspace: impl Into<String>) {
        self.0.insert(role.into(), colorspace.into());
    }

    /// Color space for `role`.
    pub fn get(&self, role: &str) -> Option<&str> {
        self.0.get(role).map(String::as_str)
    }

    /// True if `role` is defined.
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    /// `(role, colorspace)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(r, cs)| (r.as_str(), cs.as_str()))
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no role is defined.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redefine_overwrites() {
        let mut roles = Roles::new();
        roles.define(names::DEFAULT, "ACEScg");
        roles.define(names::DEFAULT, "ACES2065-1");
        assert_eq!(roles.get("default"), Some("ACES2065-1"));
        assert_eq!(roles.len(), 1);
        assert!(!roles.contains(names::DATA));
    }

    #[test]
    fn iterates_by_role_name() {
        let mut roles = Roles::new();
        roles.define(names::SCENE_LINEAR, "ACEScg");
        roles.define(names::DATA, "Raw");
        roles.define(names::COLOR_TIMING, "ACEScct");

        let order: Vec<_> = roles.iter().map(|(r, _)| r).collect();
        assert_eq!(order, ["color_timing", "data", "scene_linear"]);
    }
}
