//! OCIO v2 config serialization.
//!
//! Emits the YAML layout OCIO itself writes: top-level scalars, `roles`,
//! `file_rules`, `displays`, active lists, `view_transforms`,
//! `display_colorspaces` and `colorspaces`, with objects tagged verbatim
//! (`!<ColorSpace>`, `!<MatrixTransform>`, ...). Scalars are quoted only
//! when plain YAML would misread them.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

use crate::colorspace::{ColorSpace, ReferenceSpace};
use crate::config::{Config, FileRule};
use crate::display::{View, ViewTransform};
use crate::error::{OcioError, OcioResult};
use crate::transform::{NegativeStyle, Transform, TransformDirection};

impl Config {
    /// Serializes the config to OCIO v2 YAML.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = write_config(&mut out, self);
        out
    }

    /// Serializes the config and writes it to `path`.
    ///
    /// # Errors
    ///
    /// [`OcioError::Io`] if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> OcioResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.serialize()).map_err(|source| OcioError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn write_config(out: &mut String, config: &Config) -> std::fmt::Result {
    writeln!(out, "ocio_profile_version: {}", config.version())?;
    writeln!(out)?;
    writeln!(out, "environment:")?;
    writeln!(out, "  {{}}")?;
    writeln!(out, "search_path: {}", scalar(&config.search_path().join(":")))?;
    writeln!(out, "strictparsing: {}", config.strict_parsing())?;
    writeln!(out, "luma: {}", float_list(&config.luma()))?;
    writeln!(out)?;
    if !config.name().is_empty() {
        writeln!(out, "name: {}", scalar(config.name()))?;
    }
    if !config.description().is_empty() {
        writeln!(out, "description: {}", scalar(config.description()))?;
    }
    writeln!(out)?;

    writeln!(out, "roles:")?;
    for (role, cs) in config.roles().iter() {
        writeln!(out, "  {}: {}", scalar(role), scalar(cs))?;
    }
    writeln!(out)?;

    writeln!(out, "file_rules:")?;
    for rule in config.effective_file_rules() {
        writeln!(out, "  - {}", file_rule(&rule))?;
    }
    writeln!(out)?;

    writeln!(out, "displays:")?;
    for display in config.displays().displays() {
        writeln!(out, "  {}:", scalar(display.name()))?;
        for v in display.views() {
            writeln!(out, "    - {}", view(v))?;
        }
    }
    writeln!(out)?;

    writeln!(out, "active_displays: {}", string_list(config.active_displays()))?;
    writeln!(out, "active_views: {}", string_list(config.active_views()))?;
    if !config.inactive_colorspaces().is_empty() {
        writeln!(out, "inactive_colorspaces: {}", string_list(config.inactive_colorspaces()))?;
    }
    writeln!(out)?;

    let view_transforms = config.displays().view_transforms();
    if !view_transforms.is_empty() {
        writeln!(out, "view_transforms:")?;
        for vt in view_transforms {
            write_view_transform(out, vt)?;
        }
        writeln!(out)?;
    }

    let display_spaces: Vec<_> = config.colorspaces_in(ReferenceSpace::Display).collect();
    if !display_spaces.is_empty() {
        writeln!(out, "display_colorspaces:")?;
        for cs in display_spaces {
            write_colorspace(out, cs)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "colorspaces:")?;
    for cs in config.colorspaces_in(ReferenceSpace::Scene) {
        write_colorspace(out, cs)?;
    }
    Ok(())
}

// ============================================================================
// Objects
// ============================================================================

fn file_rule(rule: &FileRule) -> String {
    let mut fields = vec![
        format!("name: {}", flow_scalar(&rule.name)),
        format!("colorspace: {}", flow_scalar(&rule.colorspace)),
    ];
    if let Some(p) = &rule.pattern {
        fields.push(format!("pattern: {}", flow_scalar(p)));
    }
    if let Some(e) = &rule.extension {
        fields.push(format!("extension: {}", flow_scalar(e)));
    }
    format!("!<Rule> {{{}}}", fields.join(", "))
}

fn view(v: &View) -> String {
    let mut fields = vec![format!("name: {}", flow_scalar(v.name()))];
    match v.view_transform() {
        Some(vt) => {
            fields.push(format!("view_transform: {}", flow_scalar(vt)));
            fields.push(format!("display_colorspace: {}", flow_scalar(v.colorspace())));
        }
        None => fields.push(format!("colorspace: {}", flow_scalar(v.colorspace()))),
    }
    if !v.description().is_empty() {
        fields.push(format!("description: {}", flow_scalar(v.description())));
    }
    format!("!<View> {{{}}}", fields.join(", "))
}

fn write_view_transform(out: &mut String, vt: &ViewTransform) -> std::fmt::Result {
    writeln!(out, "  - !<ViewTransform>")?;
    writeln!(out, "    name: {}", scalar(vt.name()))?;
    if !vt.family().is_empty() {
        writeln!(out, "    family: {}", scalar(vt.family()))?;
    }
    if !vt.description().is_empty() {
        writeln!(out, "    description: {}", scalar(vt.description()))?;
    }
    if let Some(t) = vt.from_scene_reference() {
        write_transform_field(out, "from_scene_reference", t, 4)?;
    }
    Ok(())
}

fn write_colorspace(out: &mut String, cs: &ColorSpace) -> std::fmt::Result {
    writeln!(out, "  - !<ColorSpace>")?;
    writeln!(out, "    name: {}", scalar(cs.name()))?;
    if !cs.aliases().is_empty() {
        writeln!(out, "    aliases: {}", string_list(cs.aliases()))?;
    }
    writeln!(out, "    family: {}", scalar(cs.family().as_str()))?;
    writeln!(out, "    equalitygroup: \"\"")?;
    writeln!(out, "    bitdepth: {}", cs.bit_depth().as_str())?;
    writeln!(out, "    description: {}", scalar(cs.description()))?;
    writeln!(out, "    isdata: {}", cs.is_data())?;
    if !cs.categories().is_empty() {
        writeln!(out, "    categories: {}", string_list(cs.categories()))?;
    }
    if !cs.encoding().as_str().is_empty() {
        writeln!(out, "    encoding: {}", cs.encoding().as_str())?;
    }
    writeln!(out, "    allocation: uniform")?;

    let (to_key, from_key) = match cs.reference_space() {
        ReferenceSpace::Scene => ("to_scene_reference", "from_scene_reference"),
        ReferenceSpace::Display => ("to_display_reference", "from_display_reference"),
    };
    if let Some(t) = cs.to_reference() {
        write_transform_field(out, to_key, t, 4)?;
    }
    if let Some(t) = cs.from_reference() {
        write_transform_field(out, from_key, t, 4)?;
    }
    writeln!(out)
}

// ============================================================================
// Transforms
// ============================================================================

fn write_transform_field(out: &mut String, key: &str, t: &Transform, indent: usize) -> std::fmt::Result {
    let pad = " ".repeat(indent);
    match t {
        Transform::Group(g) => {
            writeln!(out, "{pad}{key}: !<GroupTransform>")?;
            write_group_body(out, &g.transforms, g.direction, indent + 2)
        }
        other => writeln!(out, "{pad}{key}: {}", transform_flow(other)),
    }
}

fn write_group_body(
    out: &mut String,
    children: &[Transform],
    direction: TransformDirection,
    indent: usize,
) -> std::fmt::Result {
    let pad = " ".repeat(indent);
    if direction == TransformDirection::Inverse {
        writeln!(out, "{pad}direction: inverse")?;
    }
    writeln!(out, "{pad}children:")?;
    for child in children {
        match child {
            Transform::Group(g) => {
                writeln!(out, "{pad}  - !<GroupTransform>")?;
                write_group_body(out, &g.transforms, g.direction, indent + 4)?;
            }
            other => writeln!(out, "{pad}  - {}", transform_flow(other))?,
        }
    }
    Ok(())
}

/// Flow-style rendering of a non-group transform.
fn transform_flow(t: &Transform) -> String {
    let (tag, mut fields, direction) = match t {
        Transform::Matrix(m) => {
            let mut fields = vec![format!("matrix: {}", float_list(&m.matrix))];
            if m.offset.iter().any(|o| *o != 0.0) {
                fields.push(format!("offset: {}", float_list(&m.offset)));
            }
            ("MatrixTransform", fields, m.direction)
        }
        Transform::Exponent(e) => {
            let mut fields = vec![format!("value: {}", float_list(&e.value))];
            if e.negative_style != NegativeStyle::Clamp {
                fields.push(format!("style: {}", e.negative_style.as_str()));
            }
            ("ExponentTransform", fields, e.direction)
        }
        Transform::Builtin(b) => (
            "BuiltinTransform",
            vec![format!("style: {}", flow_scalar(&b.style))],
            b.direction,
        ),
        Transform::Group(g) => {
            let children: Vec<_> = g.transforms.iter().map(transform_flow).collect();
            ("GroupTransform", vec![format!("children: [{}]", children.join(", "))], g.direction)
        }
    };
    if direction == TransformDirection::Inverse {
        fields.push("direction: inverse".to_string());
    }
    format!("!<{tag}> {{{}}}", fields.join(", "))
}

// ============================================================================
// Scalars
// ============================================================================

const RESERVED: &[&str] = &["true", "false", "yes", "no", "on", "off", "null", "~"];

/// Block-context scalar.
fn scalar(s: &str) -> Cow<'_, str> {
    if needs_quotes(s, false) { Cow::Owned(quote(s)) } else { Cow::Borrowed(s) }
}

/// Flow-context scalar (inside `{}` or `[]`).
fn flow_scalar(s: &str) -> Cow<'_, str> {
    if needs_quotes(s, true) { Cow::Owned(quote(s)) } else { Cow::Borrowed(s) }
}

fn needs_quotes(s: &str, flow: bool) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if s.trim() != s || RESERVED.contains(&s.to_lowercase().as_str()) || s.parse::<f64>().is_ok() {
        return true;
    }
    if "!&*-?:,[]{}#|>@`\"'%".contains(first) && !(first == '-' && s.len() > 1 && !s.starts_with("- ")) {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') || s.contains(['\n', '\t', '"']) {
        return true;
    }
    flow && s.contains([',', '[', ']', '{', '}'])
}

fn quote(s: &str) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push('"');
    for c in s.chars() {
        match c {
            '"' => q.push_str("\\\""),
            '\\' => q.push_str("\\\\"),
            '\n' => q.push_str("\\n"),
            '\t' => q.push_str("\\t"),
            c => q.push(c),
        }
    }
    q.push('"');
    q
}

fn string_list(items: &[String]) -> String {
    let items: Vec<_> = items.iter().map(|s| flow_scalar(s)).collect();
    format!("[{}]", items.join(", "))
}

fn float_list(values: &[f64]) -> String {
    let items: Vec<_> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use crate::colorspace::{Encoding, Family};
    use crate::transform::MatrixTransform;

    fn panel() -> ColorSpace {
        ColorSpace::builder("Panel - Display")
            .alias("panel_display")
            .family(Family::Display)
            .encoding(Encoding::Hdr)
            .category("file-io")
            .category("display")
            .reference_space(ReferenceSpace::Display)
            .description("Display colorspace for Panel (Peak: 1000 cd/m², Black: 0.005 cd/m²)")
            .from_reference(Transform::group(vec![
                Transform::builtin("GAMUT-MAP - PERCEPTUAL"),
                Transform::matrix(MatrixTransform::IDENTITY),
                Transform::exponent(2.4).inverse(),
            ]))
            .build()
    }

    #[test]
    fn test_scalar_quoting() {
        assert_eq!(scalar("ACEScg"), "ACEScg");
        assert_eq!(scalar("sRGB - Display"), "sRGB - Display");
        assert_eq!(scalar("ACES-LMT - ACES 1.3"), "ACES-LMT - ACES 1.3");
        assert_eq!(scalar(""), "\"\"");
        assert_eq!(scalar("2.3"), "\"2.3\"");
        assert_eq!(scalar("true"), "\"true\"");
        assert_eq!(scalar("Peak: 1000"), "\"Peak: 1000\"");
        assert_eq!(scalar("-x"), "-x");
        assert_eq!(scalar("- x"), "\"- x\"");
        assert_eq!(flow_scalar("a, b"), "\"a, b\"");
        assert_eq!(scalar("a, b"), "a, b");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_transform_flow() {
        let t = Transform::builtin("CURVE - LINEAR_to_ST-2084");
        assert_eq!(transform_flow(&t), "!<BuiltinTransform> {style: CURVE - LINEAR_to_ST-2084}");

        let e = Transform::exponent(2.4).inverse();
        assert_eq!(
            transform_flow(&e),
            "!<ExponentTransform> {value: [2.4, 2.4, 2.4, 1], direction: inverse}"
        );

        let m = Transform::matrix(MatrixTransform::IDENTITY);
        assert_eq!(
            transform_flow(&m),
            "!<MatrixTransform> {matrix: [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]}"
        );
    }

    #[test]
    fn test_display_colorspace_block() {
        let mut out = String::new();
        write_colorspace(&mut out, &panel()).unwrap();

        assert!(out.starts_with("  - !<ColorSpace>\n    name: Panel - Display\n"));
        assert!(out.contains("    aliases: [panel_display]\n"));
        assert!(out.contains("    family: Display\n"));
        assert!(out.contains("    bitdepth: 32f\n"));
        assert!(out.contains("    description: \"Display colorspace for Panel (Peak: 1000 cd/m², Black: 0.005 cd/m²)\"\n"));
        assert!(out.contains("    categories: [file-io, display]\n"));
        assert!(out.contains("    encoding: hdr-video\n"));
        assert!(out.contains(
            "    from_display_reference: !<GroupTransform>\n      children:\n        - !<BuiltinTransform> {style: GAMUT-MAP - PERCEPTUAL}\n        - !<MatrixTransform>"
        ));
        assert!(out.contains("        - !<ExponentTransform> {value: [2.4, 2.4, 2.4, 1], direction: inverse}\n"));
    }

    #[test]
    fn test_full_config_sections() {
        let mut config = builtin::resolve("studio-config-v2.1.0_aces-v1.3_ocio-v2.3").unwrap();
        config.add_colorspace(panel()).unwrap();
        config.add_display_view("Panel", "Output", "Panel - Display").unwrap();
        let yaml = config.serialize();

        assert!(yaml.starts_with("ocio_profile_version: 2.3\n"));
        let order = [
            "\nroles:\n",
            "\nfile_rules:\n",
            "\ndisplays:\n",
            "\nactive_displays: ",
            "\nview_transforms:\n",
            "\ndisplay_colorspaces:\n",
            "\ncolorspaces:\n",
        ];
        let positions: Vec<_> = order.iter().map(|k| yaml.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");

        assert!(yaml.contains("  - !<Rule> {name: Default, colorspace: default}\n"));
        assert!(yaml.contains("  Panel:\n    - !<View> {name: Output, colorspace: Panel - Display}\n"));
        assert!(yaml.contains(
            "    - !<View> {name: ACES 1.0 - SDR Video, view_transform: ACES 1.0 - SDR Video, display_colorspace: sRGB - Display}\n"
        ));
        assert!(yaml.contains("Rec.2100-PQ - Display, P3-D65 - Display, Panel]\n"));
        assert!(yaml.contains("  scene_linear: ACEScg\n"));

        // Display-referred spaces are listed before the scene-referred section
        let panel_at = yaml.find("name: Panel - Display").unwrap();
        assert!(panel_at < yaml.find("\ncolorspaces:\n").unwrap());
        assert!(yaml.contains("    to_scene_reference: !<BuiltinTransform> {style: ACEScg_to_ACES2065-1}\n"));
        assert!(yaml.contains("      children:\n        - !<BuiltinTransform> {style: UTILITY - ACES-AP1_to_LINEAR-REC709_BFD, direction: inverse}\n"));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ocio");
        let config = builtin::resolve("cg-config-v2.1.0_aces-v1.3_ocio-v2.3").unwrap();
        config.write(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), config.serialize());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ocio");
        let err = Config::new().write(&path).unwrap_err();
        assert!(matches!(err, OcioError::Io { path: p, .. } if p == path));
    }
}
