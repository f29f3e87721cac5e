//! Built-in OCIO base configurations.
//!
//! Provides the ACES CG and Studio base configs by their canonical
//! identifiers, the same names OCIO itself accepts as `ocio://` URIs:
//!
//! ```text
//! {type}-config-{config_version}_aces-{aces_version}_ocio-{ocio_version}
//! ```
//!
//! The configs are built programmatically. Their transforms reference
//! OCIO builtin styles, so they carry no LUT files.
//!
//! # Example
//!
//! ```
//! use odg_ocio::builtin;
//!
//! let config = builtin::resolve("ocio://studio-config-v2.1.0_aces-v1.3_ocio-v2.3")?;
//! assert_eq!(config.version().to_string(), "2.3");
//! assert!(config.colorspace("ACEScg").is_some());
//! # Ok::<(), odg_ocio::OcioError>(())
//! ```

use crate::colorspace::{ColorSpace, ColorSpaceBuilder, Encoding, Family, ReferenceSpace};
use crate::config::{Config, FileRule, ProfileVersion};
use crate::display::{Display, View, ViewTransform};
use crate::error::{OcioError, OcioResult};
use crate::role::names;
use crate::transform::Transform;

/// URI scheme OCIO uses for built-in configs.
pub const URI_PREFIX: &str = "ocio://";

/// Identifiers of every built-in base config.
pub const KNOWN_CONFIGS: &[&str] = &[
    "cg-config-v1.0.0_aces-v1.3_ocio-v2.1",
    "studio-config-v1.0.0_aces-v1.3_ocio-v2.1",
    "cg-config-v2.1.0_aces-v1.3_ocio-v2.3",
    "studio-config-v2.1.0_aces-v1.3_ocio-v2.3",
];

const SDR_VIEW: &str = "ACES 1.0 - SDR Video";
const HDR_VIEW: &str = "ACES 1.1 - HDR Video (1000 nits & Rec.2020 lim)";
const UNTONEMAPPED_VIEW: &str = "Un-tone-mapped";
const RAW: &str = "Raw";

/// Builds a canonical identifier from its parts.
///
/// ```
/// assert_eq!(
///     odg_ocio::builtin::identifier("cg", "v2.1.0", "v1.3", "v2.3"),
///     "cg-config-v2.1.0_aces-v1.3_ocio-v2.3"
/// );
/// ```
pub fn identifier(kind: &str, config_version: &str, aces_version: &str, ocio_version: &str) -> String {
    format!("{kind}-config-{config_version}_aces-{aces_version}_ocio-{ocio_version}")
}

/// Returns the identifiers of all built-in configs.
pub fn available_configs() -> &'static [&'static str] {
    KNOWN_CONFIGS
}

/// Resolves a built-in config by identifier, with or without `ocio://`.
///
/// # Errors
///
/// [`OcioError::UnknownBuiltinConfig`] listing the known identifiers.
pub fn resolve(id: &str) -> OcioResult<Config> {
    let bare = id.strip_prefix(URI_PREFIX).unwrap_or(id);
    match bare {
        "cg-config-v1.0.0_aces-v1.3_ocio-v2.1" => Ok(base_config(Kind::Cg, Release::V1)),
        "studio-config-v1.0.0_aces-v1.3_ocio-v2.1" => Ok(base_config(Kind::Studio, Release::V1)),
        "cg-config-v2.1.0_aces-v1.3_ocio-v2.3" => Ok(base_config(Kind::Cg, Release::V2)),
        "studio-config-v2.1.0_aces-v1.3_ocio-v2.3" => Ok(base_config(Kind::Studio, Release::V2)),
        _ => Err(OcioError::UnknownBuiltinConfig {
            name: id.to_string(),
            known: KNOWN_CONFIGS.iter().map(|k| k.to_string()).collect(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Cg,
    Studio,
}

/// Config release: v1.0.0 targets OCIO 2.1, v2.1.0 targets OCIO 2.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    V1,
    V2,
}

fn base_config(kind: Kind, release: Release) -> Config {
    let (colorspaces_version, ocio) = match release {
        Release::V1 => ("v1.0.0", ProfileVersion::new(2, 1)),
        Release::V2 => ("v2.1.0", ProfileVersion::new(2, 3)),
    };
    let label = match kind {
        Kind::Cg => "CG",
        Kind::Studio => "Studio",
    };

    let mut config = Config::new();
    config.set_version(ocio);
    config.set_name(format!(
        "Academy Color Encoding System - {label} Config [COLORSPACES {colorspaces_version}] [ACES v1.3] [OCIO v{ocio}]"
    ));
    config.set_description(format!(
        "The Academy Color Encoding System reference {} config.",
        label.to_lowercase()
    ));

    // Roles
    config.set_role(names::ACES_INTERCHANGE, "ACES2065-1");
    config.set_role(names::CIE_XYZ_D65_INTERCHANGE, "CIE-XYZ-D65");
    config.set_role(names::COLOR_TIMING, "ACEScct");
    config.set_role(names::COMPOSITING_LOG, "ACEScct");
    config.set_role(names::DATA, RAW);
    config.set_role(names::DEFAULT, "ACES2065-1");
    config.set_role(names::MATTE_PAINT, "ACEScct");
    config.set_role(names::SCENE_LINEAR, "ACEScg");
    config.add_file_rule(FileRule::default_rule(names::DEFAULT));

    // View transforms
    config.add_view_transform(
        ViewTransform::new(SDR_VIEW)
            .with_description("Component of ACES Output Transforms for SDR D65 video")
            .with_from_scene_reference(Transform::builtin(
                "ACES-OUTPUT - ACES2065-1_to_CIE-XYZ-D65 - SDR-VIDEO_1.0",
            )),
    );
    if kind == Kind::Studio {
        config.add_view_transform(
            ViewTransform::new(HDR_VIEW)
                .with_description("Component of ACES Output Transforms for 1000 nit HDR D65 video")
                .with_from_scene_reference(Transform::builtin(
                    "ACES-OUTPUT - ACES2065-1_to_CIE-XYZ-D65 - HDR-VIDEO-1000nit-15nit_REC2020lim_1.1",
                )),
        );
    }
    config.add_view_transform(
        ViewTransform::new(UNTONEMAPPED_VIEW)
            .with_description("Linear chromatic adaptation from ACES white to D65")
            .with_from_scene_reference(Transform::builtin("UTILITY - ACES-AP0_to_CIE-XYZ-D65_BFD")),
    );

    // Displays
    let mut displays = vec![
        sdr_display("sRGB - Display"),
        sdr_display("Rec.1886 Rec.709 - Display"),
    ];
    if kind == Kind::Studio {
        displays.push(hdr_display("Rec.2100-PQ - Display"));
        displays.push(sdr_display("P3-D65 - Display"));
    }
    config.set_active_displays(displays.iter().map(|d| d.name().to_string()).collect());
    let mut views = vec![SDR_VIEW.to_string()];
    if kind == Kind::Studio {
        views.push(HDR_VIEW.to_string());
    }
    views.extend([UNTONEMAPPED_VIEW.to_string(), RAW.to_string()]);
    config.set_active_views(views);
    displays.into_iter().for_each(|d| config.add_display(d));

    // Color spaces; names are unique by construction
    let mut spaces = vec![
        scene("ACES2065-1", Family::Aces, Encoding::SceneLinear, None)
            .alias("aces2065_1")
            .alias("ACES - ACES2065-1")
            .alias("lin_ap0")
            .description("The Academy Color Encoding System reference color space")
            .build(),
        scene("ACEScc", Family::Aces, Encoding::Log, Some("ACEScc_to_ACES2065-1"))
            .alias("ACES - ACEScc")
            .alias("acescc_ap1")
            .build(),
        scene("ACEScct", Family::Aces, Encoding::Log, Some("ACEScct_to_ACES2065-1"))
            .alias("ACES - ACEScct")
            .alias("acescct_ap1")
            .build(),
        scene("ACEScg", Family::Aces, Encoding::SceneLinear, Some("ACEScg_to_ACES2065-1"))
            .alias("ACES - ACEScg")
            .alias("lin_ap1")
            .build(),
        ColorSpace::builder("Linear Rec.709 (sRGB)")
            .alias("lin_rec709_srgb")
            .alias("lin_srgb")
            .family(Family::Utility)
            .encoding(Encoding::SceneLinear)
            .category("file-io")
            .to_reference(Transform::group(vec![
                Transform::builtin("UTILITY - ACES-AP1_to_LINEAR-REC709_BFD").inverse(),
                Transform::builtin("ACEScg_to_ACES2065-1"),
            ]))
            .build(),
        ColorSpace::builder(RAW)
            .family(Family::Utility)
            .encoding(Encoding::Data)
            .description("The utility \"Raw\" colorspace.")
            .category("file-io")
            .build(),
    ];

    if kind == Kind::Studio {
        spaces.push(camera("ARRI LogC3 (EI800)", "arri_logc3_ei800", "ARRI_ALEXA-LOGC-EI800-AWG_to_ACES2065-1"));
        if release == Release::V2 {
            spaces.push(camera("ARRI LogC4", "arri_logc4", "ARRI_LOGC4_to_ACES2065-1"));
        }
        spaces.push(camera("S-Log3 S-Gamut3", "slog3_sgamut3", "SONY_SLOG3-SGAMUT3_to_ACES2065-1"));
        spaces.push(camera("V-Log V-Gamut", "vlog_vgamut", "PANASONIC_VLOG-VGAMUT_to_ACES2065-1"));
        spaces.push(camera("Log3G10 REDWideGamutRGB", "log3g10_rwg", "RED_LOG3G10-RWG_to_ACES2065-1"));
    }

    spaces.push(
        ColorSpace::builder("CIE-XYZ-D65")
            .alias("cie_xyz_d65")
            .family(Family::Utility)
            .encoding(Encoding::DisplayLinear)
            .reference_space(ReferenceSpace::Display)
            .description("The CIE XYZ (D65) display connection colorspace.")
            .build(),
    );
    spaces.push(display_space("sRGB - Display", "srgb_display", Encoding::Sdr, "DISPLAY - CIE-XYZ-D65_to_sRGB"));
    spaces.push(display_space(
        "Rec.1886 Rec.709 - Display",
        "rec1886_rec709_display",
        Encoding::Sdr,
        "DISPLAY - CIE-XYZ-D65_to_REC.1886-REC.709",
    ));
    if kind == Kind::Studio {
        spaces.push(display_space(
            "Rec.2100-PQ - Display",
            "rec2100_pq_display",
            Encoding::Hdr,
            "DISPLAY - CIE-XYZ-D65_to_REC.2100-PQ",
        ));
        spaces.push(display_space("P3-D65 - Display", "p3d65_display", Encoding::Sdr, "DISPLAY - CIE-XYZ-D65_to_DisplayP3"));
    }

    for cs in spaces {
        // Built-in names never collide
        let _ = config.add_colorspace(cs);
    }
    config
}

// ============================================================================
// Color space and display helpers
// ============================================================================

fn scene(name: &str, family: Family, encoding: Encoding, to_ref: Option<&str>) -> ColorSpaceBuilder {
    let builder = ColorSpace::builder(name)
        .family(family)
        .encoding(encoding)
        .category("file-io")
        .category("working-space");
    match to_ref {
        Some(style) => builder.to_reference(Transform::builtin(style)),
        None => builder,
    }
}

fn camera(name: &str, alias: &str, style: &str) -> ColorSpace {
    ColorSpace::builder(name)
        .alias(alias)
        .family(Family::Input)
        .encoding(Encoding::Log)
        .category("file-io")
        .to_reference(Transform::builtin(style))
        .build()
}

fn display_space(name: &str, alias: &str, encoding: Encoding, style: &str) -> ColorSpace {
    ColorSpace::builder(name)
        .alias(alias)
        .family(Family::Display)
        .encoding(encoding)
        .reference_space(ReferenceSpace::Display)
        .category("file-io")
        .from_reference(Transform::builtin(style))
        .build()
}

fn sdr_display(name: &str) -> Display {
    let mut d = Display::new(name);
    d.add_view(View::new(SDR_VIEW, name).with_view_transform(SDR_VIEW));
    d.add_view(View::new(UNTONEMAPPED_VIEW, name).with_view_transform(UNTONEMAPPED_VIEW));
    d.add_view(View::new(RAW, RAW));
    d
}

fn hdr_display(name: &str) -> Display {
    let mut d = Display::new(name);
    d.add_view(View::new(HDR_VIEW, name).with_view_transform(HDR_VIEW));
    d.add_view(View::new(UNTONEMAPPED_VIEW, name).with_view_transform(UNTONEMAPPED_VIEW));
    d.add_view(View::new(RAW, RAW));
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_all_known() {
        for id in available_configs() {
            let config = resolve(id).unwrap();
            assert!(config.colorspace("ACEScg").is_some(), "{id}");
            assert!(config.colorspace("scene_linear").is_some(), "{id}");
            assert!(!config.active_displays().is_empty(), "{id}");
        }
    }

    #[test]
    fn resolve_with_uri_prefix() {
        let config = resolve("ocio://cg-config-v1.0.0_aces-v1.3_ocio-v2.1").unwrap();
        assert_eq!(config.version(), ProfileVersion::new(2, 1));
        assert!(config.name().contains("CG Config"));
    }

    #[test]
    fn studio_has_camera_spaces() {
        let cg = resolve("cg-config-v2.1.0_aces-v1.3_ocio-v2.3").unwrap();
        let studio = resolve("studio-config-v2.1.0_aces-v1.3_ocio-v2.3").unwrap();
        assert!(cg.colorspace("S-Log3 S-Gamut3").is_none());
        assert!(studio.colorspace("S-Log3 S-Gamut3").is_some());
        assert!(studio.colorspace("ARRI LogC4").is_some());
        assert!(studio.displays().display("Rec.2100-PQ - Display").is_some());
        assert!(studio.colorspaces().len() > cg.colorspaces().len());
    }

    #[test]
    fn unknown_lists_alternatives() {
        let err = resolve("ocio://studio-config-v9.9.9_aces-v1.3_ocio-v2.3").unwrap_err();
        let OcioError::UnknownBuiltinConfig { name, known } = &err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(name, "ocio://studio-config-v9.9.9_aces-v1.3_ocio-v2.3");
        assert_eq!(known.len(), KNOWN_CONFIGS.len());
        assert!(err.to_string().contains("ocio://studio-config-v2.1.0_aces-v1.3_ocio-v2.3"));
    }

    #[test]
    fn identifier_format() {
        let id = identifier("studio", "v1.0.0", "v1.3", "v2.1");
        assert!(resolve(&id).is_ok());
    }
}
