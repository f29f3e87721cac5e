//! odg - OCIO display config generator
//!
//! Reads measured display characteristics, validates them and writes an
//! OCIO config containing a matching display colorspace.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use odg_display::document::EXAMPLE_DOCUMENT;
use odg_display::generate::{self, DEFAULT_SETTINGS_PATH, GenerateOptions, Generation, SettingsSource};
use odg_display::{EotfType, GamutStrategy};
use odg_ocio::builtin;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "odg")]
#[command(author, version, about = "Generate an OCIO config from measured display characteristics")]
#[command(long_about = "
Validates measured display data (primaries, white point, luminance, EOTF)
and writes an OCIO config with a display colorspace derived from it, merged
into a built-in ACES base config.

Examples:
  odg                                   # Read display_config.yaml
  odg panel.yaml -o panel.ocio          # Explicit input and output
  odg panel.yaml --strict               # Abort on any validation failure
  odg panel.yaml --gamut-mapping perceptual
  odg panel.yaml --eotf-variant PQ --eotf-variant HLG
  odg panel.yaml --dry-run              # Print the config instead of writing
  odg --write-example display_config.yaml
")]
struct Cli {
    /// Display configuration document
    #[arg(default_value = generate::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Output OCIO config path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Validation settings file (default: validation_settings.yaml if present)
    #[arg(long)]
    validation_settings: Option<PathBuf>,

    /// Treat every validation failure as fatal
    #[arg(long)]
    strict: bool,

    /// Gamut mapping strategy (clip, perceptual, saturation, relative,
    /// absolute, soft_clip, hue_preserving, adaptive)
    #[arg(short, long)]
    gamut_mapping: Option<GamutStrategy>,

    /// Generate one colorspace per EOTF (repeatable: PQ, HLG, GAMMA)
    #[arg(short = 'e', long = "eotf-variant")]
    eotf_variants: Vec<EotfType>,

    /// Declare an extra builtin transform style available at the target
    #[arg(long = "builtin-style")]
    builtin_styles: Vec<String>,

    /// Validate and derive, print the config to stdout, write nothing
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Write an example display configuration and exit
    #[arg(long, value_name = "PATH", conflicts_with = "dry_run")]
    write_example: Option<PathBuf>,

    /// List built-in base configs and exit
    #[arg(long)]
    list_base_configs: bool,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn,odg=info,odg_display=info",
        1 => "info,odg=debug,odg_display=debug,odg_ocio=debug",
        _ => "debug,odg=trace,odg_display=trace,odg_ocio=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .init();
}

fn write_example(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing file: {}", path.display());
    }
    fs::write(path, EXAMPLE_DOCUMENT).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Example display configuration written to {}", path.display());
    Ok(())
}

fn print_summary(g: &Generation) {
    let c = &g.characterization;
    println!("Display: {}", c.name());
    println!("  Peak luminance: {} cd/m²", c.peak_luminance());
    println!("  Black level:    {} cd/m²", c.black_level());
    println!("  Contrast ratio: {:.0}:1", c.contrast_ratio());
    println!("  EOTF:           {}", c.eotf());
    println!("  Gamut mapping:  {}", g.gamut_mapping);
    println!("  Base config:    {}{}", builtin::URI_PREFIX, g.base_config);

    let violations = g.report.violations().count();
    if violations > 0 {
        println!("  Validation:     passed with {violations} warning(s)");
    } else {
        println!("  Validation:     passed");
    }

    println!();
    println!("OCIO config written to {}", g.output_path.display());
    println!("Colorspaces created:");
    for cs in &g.colorspaces {
        println!("  - {}", cs.name());
    }

    let abs = fs::canonicalize(&g.output_path).unwrap_or_else(|_| g.output_path.clone());
    println!();
    println!("To use this config:");
    println!("  export OCIO={}", abs.display());
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_base_configs {
        for id in builtin::available_configs() {
            println!("{}{id}", builtin::URI_PREFIX);
        }
        return Ok(());
    }

    if let Some(path) = &cli.write_example {
        return write_example(path);
    }

    let settings = match cli.validation_settings {
        Some(path) => SettingsSource::Explicit(path),
        None => SettingsSource::Default(PathBuf::from(DEFAULT_SETTINGS_PATH)),
    };
    let opts = GenerateOptions {
        config_path: cli.config,
        output: cli.output,
        settings,
        strict: cli.strict,
        gamut_mapping: cli.gamut_mapping,
        eotf_variants: cli.eotf_variants,
        extra_builtins: cli.builtin_styles,
        dry_run: cli.dry_run,
    };
    debug!(?opts, "generate options");

    let generation = generate::run(&opts)
        .with_context(|| format!("Failed to generate OCIO config from {}", opts.config_path.display()))?;

    if opts.dry_run {
        print!("{}", generation.yaml);
        info!(
            colorspaces = generation.colorspaces.len(),
            output = %generation.output_path.display(),
            "dry run complete"
        );
    } else {
        print_summary(&generation);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["odg"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("display_config.yaml"));
        assert!(cli.output.is_none());
        assert!(!cli.strict && !cli.dry_run);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn typed_flags() {
        let cli = Cli::try_parse_from([
            "odg",
            "panel.yaml",
            "-o",
            "out.ocio",
            "--gamut-mapping",
            "soft_clip",
            "-e",
            "PQ",
            "--eotf-variant",
            "hlg",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.gamut_mapping, Some(GamutStrategy::SoftClip));
        assert_eq!(cli.eotf_variants, vec![EotfType::Pq, EotfType::Hlg]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(Cli::try_parse_from(["odg", "--gamut-mapping", "stretch"]).is_err());
        assert!(Cli::try_parse_from(["odg", "-e", "SRGB"]).is_err());
    }
}
