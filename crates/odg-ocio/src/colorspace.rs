//! Color spaces and their classification.
//!
//! OCIO v2 has two references. Scene-referred spaces are defined relative
//! to the scene reference (ACES2065-1 in the ACES configs) and are written
//! under `colorspaces`. Display-referred spaces are defined relative to the
//! display reference (CIE-XYZ-D65) and are written under
//! `display_colorspaces`. A color space carries at most one transform in
//! each direction; an OCIO runtime inverts the other when needed.
//!
//! # Example
//!
//! ```
//! use odg_ocio::{ColorSpace, Encoding, Family, ReferenceSpace};
//!
//! let cs = ColorSpace::builder("Monitor - Display")
//!     .family(Family::Display)
//!     .encoding(Encoding::Hdr)
//!     .reference_space(ReferenceSpace::Display)
//!     .category("display")
//!     .build();
//!
//! assert_eq!(cs.name(), "Monitor - Display");
//! assert_eq!(cs.encoding().as_str(), "hdr-video");
//! ```

use crate::transform::Transform;

/// Value of the `encoding:` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Linear light relative to the scene.
    SceneLinear,
    /// Linear light relative to the display.
    DisplayLinear,
    /// Log camera or working encodings.
    Log,
    /// SDR video signal.
    Sdr,
    /// HDR video signal (PQ or HLG).
    Hdr,
    /// Non-color values.
    Data,
    /// No encoding written.
    #[default]
    Unknown,
}

impl Encoding {
    /// Config token, empty for [`Encoding::Unknown`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SceneLinear => "scene-linear",
            Self::DisplayLinear => "display-linear",
            Self::Log => "log",
            Self::Sdr => "sdr-video",
            Self::Hdr => "hdr-video",
            Self::Data => "data",
            Self::Unknown => "",
        }
    }
}

/// Value of the `family:` key, used by applications to group menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Family {
    /// Display output spaces.
    Display,
    /// Camera and input spaces.
    Input,
    /// Helper spaces.
    Utility,
    /// ACES working and interchange spaces.
    Aces,
    /// No family written.
    #[default]
    Other,
}

impl Family {
    /// Config token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Display => "Display",
            Self::Input => "Input",
            Self::Utility => "Utility",
            Self::Aces => "ACES",
            Self::Other => "",
        }
    }
}

/// Value of the `bitdepth:` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitDepth {
    /// `8ui`
    Uint8,
    /// `10ui`
    Uint10,
    /// `16ui`
    Uint16,
    /// `16f`
    F16,
    /// `32f`
    #[default]
    F32,
}

impl BitDepth {
    /// Config token (`8ui`, `32f`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uint8 => "8ui",
            Self::Uint10 => "10ui",
            Self::Uint16 => "16ui",
            Self::F16 => "16f",
            Self::F32 => "32f",
        }
    }
}

/// Which reference a color space's transforms are relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferenceSpace {
    /// Scene reference (`colorspaces`).
    #[default]
    Scene,
    /// Display reference (`display_colorspaces`).
    Display,
}

/// A named color space entry.
#[derive(Debug, Clone, Default)]
pub struct ColorSpace {
    name: String,
    aliases: Vec<String>,
    description: String,
    family: Family,
    encoding: Encoding,
    bit_depth: BitDepth,
    is_data: bool,
    categories: Vec<String>,
    reference_space: ReferenceSpace,
    /// This space to the reference.
    to_reference: Option<Transform>,
    /// The reference to this space.
    from_reference: Option<Transform>,
}

impl ColorSpace {
    /// Creates a scene-referred color space with no transforms.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Starts a builder.
    #[inline]
    pub fn builder(name: impl Into<String>) -> ColorSpaceBuilder {
        ColorSpaceBuilder { cs: Self::new(name) }
    }

    /// Name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Aliases in insertion order.
    #[inline]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Free-text description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Family.
    #[inline]
    pub fn family(&self) -> Family {
        self.family
    }

    /// Encoding.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Bit depth.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// True for non-color data; OCIO skips conversion for these.
    #[inline]
    pub fn is_data(&self) -> bool {
        self.is_data
    }

    /// Category tags.
    #[inline]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Reference this space is defined against.
    #[inline]
    pub fn reference_space(&self) -> ReferenceSpace {
        self.reference_space
    }

    /// Transform into the reference, if any.
    #[inline]
    pub fn to_reference(&self) -> Option<&Transform> {
        self.to_reference.as_ref()
    }

    /// Transform out of the reference, if any.
    #[inline]
    pub fn from_reference(&self) -> Option<&Transform> {
        self.from_reference.as_ref()
    }

    /// Case-insensitive match against the name or any alias.
    pub fn matches_name(&self, name: &str) -> bool {
        self.all_names().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// The name followed by every alias.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Fluent construction of a [`ColorSpace`].
#[derive(Debug)]
pub struct ColorSpaceBuilder {
    cs: ColorSpace,
}

impl ColorSpaceBuilder {
    /// Appends an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.cs.aliases.push(alias.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.cs.description = text.into();
        self
    }

    /// Sets the family.
    pub fn family(mut self, family: Family) -> Self {
        self.cs.family = family;
        self
    }

    /// Sets the encoding. [`Encoding::Data`] also sets the data flag.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.cs.encoding = encoding;
        self.cs.is_data |= encoding == Encoding::Data;
        self
    }

    /// Sets the bit depth.
    pub fn bit_depth(mut self, depth: BitDepth) -> Self {
        self.cs.bit_depth = depth;
        self
    }

    /// Sets the data flag.
    pub fn is_data(mut self, is_data: bool) -> Self {
        self.cs.is_data = is_data;
        self
    }

    /// Appends a category tag.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.cs.categories.push(category.into());
        self
    }

    /// Sets the reference space.
    pub fn reference_space(mut self, space: ReferenceSpace) -> Self {
        self.cs.reference_space = space;
        self
    }

    /// Sets the transform into the reference.
    pub fn to_reference(mut self, transform: Transform) -> Self {
        self.cs.to_reference = Some(transform);
        self
    }

    /// Sets the transform out of the reference.
    pub fn from_reference(mut self, transform: Transform) -> Self {
        self.cs.from_reference = Some(transform);
        self
    }

    /// Finishes the color space.
    pub fn build(self) -> ColorSpace {
        self.cs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_aliases() {
        let cs = ColorSpace::builder("Panel - Display")
            .alias("panel_display")
            .family(Family::Display)
            .encoding(Encoding::Sdr)
            .build();

        assert_eq!(cs.family(), Family::Display);
        assert_eq!(cs.reference_space(), ReferenceSpace::Scene);
        assert!(cs.matches_name("PANEL - display"));
        assert!(cs.matches_name("Panel_Display"));
        assert!(!cs.matches_name("panel"));
        assert_eq!(cs.all_names().collect::<Vec<_>>(), ["Panel - Display", "panel_display"]);
    }

    #[test]
    fn test_display_defaults() {
        let cs = ColorSpace::new("X");
        assert_eq!(cs.bit_depth(), BitDepth::F32);
        assert_eq!(cs.encoding().as_str(), "");
        assert_eq!(cs.family().as_str(), "");
        assert!(cs.to_reference().is_none() && cs.from_reference().is_none());
    }

    #[test]
    fn test_data_encoding_sets_flag() {
        assert!(ColorSpace::builder("Raw").encoding(Encoding::Data).build().is_data());
        assert!(!ColorSpace::builder("Lin").encoding(Encoding::SceneLinear).build().is_data());
    }

    #[test]
    fn test_tokens() {
        assert_eq!(BitDepth::F32.as_str(), "32f");
        assert_eq!(BitDepth::Uint10.as_str(), "10ui");
        assert_eq!(Encoding::Hdr.as_str(), "hdr-video");
        assert_eq!(Family::Aces.as_str(), "ACES");
    }
}
