//! Displays, views and view transforms.
//!
//! Each display owns an ordered list of views; the first view is the one
//! applications select by default. A view names a color space directly, or
//! pairs a shared view transform with a display color space.
//!
//! # Example
//!
//! ```
//! use odg_ocio::{Display, View};
//!
//! let mut display = Display::new("sRGB - Display");
//! display.add_view(
//!     View::new("ACES 1.0 - SDR Video", "sRGB - Display")
//!         .with_view_transform("ACES 1.0 - SDR Video"),
//! );
//! display.add_view(View::new("Raw", "Raw"));
//!
//! assert_eq!(display.view_names().collect::<Vec<_>>(), ["ACES 1.0 - SDR Video", "Raw"]);
//! ```

use crate::transform::Transform;

/// One entry in a display's view list.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    name: String,
    colorspace: String,
    view_transform: Option<String>,
    description: String,
}

impl View {
    /// A view showing `colorspace` as is.
    pub fn new(name: impl Into<String>, colorspace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colorspace: colorspace.into(),
            view_transform: None,
            description: String::new(),
        }
    }

    /// Routes the view through a view transform. `colorspace` must then be
    /// display-referred.
    pub fn with_view_transform(mut self, name: impl Into<String>) -> Self {
        self.view_transform = Some(name.into());
        self
    }

    /// Attaches a description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// View name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color space shown by this view.
    #[inline]
    pub fn colorspace(&self) -> &str {
        &self.colorspace
    }

    /// View transform name, if routed through one.
    #[inline]
    pub fn view_transform(&self) -> Option<&str> {
        self.view_transform.as_deref()
    }

    /// Description, possibly empty.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A named output device with its views.
#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    name: String,
    views: Vec<View>,
}

impl Display {
    /// A display with no views.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            views: Vec::new(),
        }
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a view. Uniqueness is enforced by [`crate::Config::add_display_view`].
    pub fn add_view(&mut self, view: View) {
        self.views.push(view);
    }

    /// Views in order.
    #[inline]
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Exact-name view lookup.
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name() == name)
    }

    /// View names in order.
    pub fn view_names(&self) -> impl Iterator<Item = &str> {
        self.views.iter().map(View::name)
    }
}

/// Shared scene-to-display transform referenced by views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewTransform {
    name: String,
    family: String,
    description: String,
    from_scene_reference: Option<Transform>,
}

impl ViewTransform {
    /// A view transform with no transform attached yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Sets the scene-reference to display-reference transform.
    pub fn with_from_scene_reference(mut self, t: Transform) -> Self {
        self.from_scene_reference = Some(t);
        self
    }

    /// Name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family, possibly empty.
    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Description, possibly empty.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Scene-to-display transform, if set.
    #[inline]
    pub fn from_scene_reference(&self) -> Option<&Transform> {
        self.from_scene_reference.as_ref()
    }
}

/// Displays and view transforms of a config. Lookups are exact-name.
#[derive(Debug, Clone, Default)]
pub struct DisplayManager {
    displays: Vec<Display>,
    view_transforms: Vec<ViewTransform>,
}

impl DisplayManager {
    /// Empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a display.
    pub fn add_display(&mut self, display: Display) {
        self.displays.push(display);
    }

    /// Displays in order.
    #[inline]
    pub fn displays(&self) -> &[Display] {
        &self.displays
    }

    /// Display by name.
    pub fn display(&self, name: &str) -> Option<&Display> {
        self.displays.iter().find(|d| d.name() == name)
    }

    /// Mutable display by name.
    pub fn display_mut(&mut self, name: &str) -> Option<&mut Display> {
        self.displays.iter_mut().find(|d| d.name() == name)
    }

    /// Display names in order.
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.displays.iter().map(Display::name)
    }

    /// Appends a view transform.
    pub fn add_view_transform(&mut self, vt: ViewTransform) {
        self.view_transforms.push(vt);
    }

    /// View transform by name.
    pub fn view_transform(&self, name: &str) -> Option<&ViewTransform> {
        self.view_transforms.iter().find(|vt| vt.name() == name)
    }

    /// View transforms in order.
    #[inline]
    pub fn view_transforms(&self) -> &[ViewTransform] {
        &self.view_transforms
    }
}
