#![deny(unsafe_code)]
//! CLI binary for pigment.
//!
//! Subcommands:
//! - `convert <color>`: every color-model representation of a HEX color
//! - `contrast <fg> <bg>`: WCAG contrast report, optionally with suggestions
//! - `simulate <color>`: color-vision deficiency simulation
//! - `harmony <color> <kind>`: derive a harmony, optionally save it as a palette
//! - `extract <image>`: dominant colors of an image, optionally saved as a palette
//! - `average <image>`: arithmetic, luma-weighted or median average color
//! - `similar <color> <palette>`: palette entries closest to a color
//! - `gradient <from> <to>`: evenly blended steps between two colors
//! - `audit <palette>`: color pairs that collapse under color-vision deficiencies
//! - `transcode <input> <output>`: convert a palette between formats
//! - `formats`: list supported palette formats

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use pigment_codecs as codecs;
use pigment_core::accessibility::{readable_text_color, relative_luminance, suggest_accessible_colors};
use pigment_core::color::gradient;
use pigment_core::harmony::harmony_by_name;
use pigment_core::similar;
use pigment_core::vision::{audit_palette, simulate_all};
use pigment_core::{
    average_color, extract_dominant, find_similar, simulate, AverageMethod, AccessibilityReport, Color, ColorModel, Deficiency,
    DominantColor, ExtractOptions, Format, Palette, PixelSample, SimulationOptions, TextSize,
    WcagLevel,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "pigment", about = "Color science and palette interchange")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a color in every supported model.
    Convert {
        /// Color as #RGB, #RRGGBB or #RRGGBBAA.
        color: String,
    },
    /// Contrast ratio and WCAG compliance of a foreground/background pair.
    Contrast {
        foreground: String,
        background: String,

        /// Also suggest foreground variants reaching this level (aa or aaa).
        #[arg(long)]
        suggest: Option<String>,

        /// Use large-text thresholds for suggestions.
        #[arg(long)]
        large: bool,
    },
    /// Simulate color-vision deficiencies.
    Simulate {
        color: String,

        /// Deficiency name (e.g. "deuteranopia"); all six when omitted.
        #[arg(short, long)]
        deficiency: Option<String>,

        /// Simulation options as a JSON string (e.g. '{"severity": 0.8}').
        #[arg(long, default_value = "{}")]
        options: String,
    },
    /// Derive a color harmony.
    Harmony {
        color: String,

        /// complementary, analogous, triadic, split-complementary, tetradic or monochromatic.
        kind: String,

        /// Write the harmony as a palette; format chosen by extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract dominant colors from an image.
    Extract {
        image: PathBuf,

        /// Number of colors (1-64).
        #[arg(short = 'k', long)]
        count: Option<usize>,

        /// Quantization bits per channel (1-8).
        #[arg(long)]
        bits: Option<u8>,

        /// Skip fully transparent pixels.
        #[arg(long)]
        alpha: bool,

        /// Extraction options as a JSON string; flags above take precedence.
        #[arg(long, default_value = "{}")]
        options: String,

        /// Write the result as a palette; format chosen by extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Average color of an image.
    Average {
        image: PathBuf,

        /// arithmetic, weighted (by luma) or median.
        #[arg(short, long, default_value = "arithmetic")]
        method: String,
    },
    /// Palette entries closest to a color.
    Similar {
        color: String,
        palette: PathBuf,

        /// Input format; guessed from extension or content when omitted.
        #[arg(long)]
        from: Option<String>,

        /// Largest CIE76 distance reported.
        #[arg(long, default_value_t = similar::DEFAULT_MAX_DISTANCE)]
        max_distance: f64,

        /// Number of matches reported.
        #[arg(short = 'n', long, default_value_t = similar::DEFAULT_MAX_RESULTS)]
        limit: usize,
    },
    /// Blend from one color to another.
    Gradient {
        from: String,
        to: String,

        /// Intermediate colors between the two ends.
        #[arg(short, long, default_value_t = 5)]
        steps: usize,

        /// Write the gradient as a palette; format chosen by extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Find palette colors that become confusable under color-vision deficiencies.
    Audit {
        palette: PathBuf,

        /// Input format; guessed from extension or content when omitted.
        #[arg(long)]
        from: Option<String>,

        /// Simulation options as a JSON string.
        #[arg(long, default_value = "{}")]
        options: String,
    },
    /// Convert a palette file from one format to another.
    Transcode {
        input: PathBuf,
        output: PathBuf,

        /// Input format; guessed from extension or content when omitted.
        #[arg(long)]
        from: Option<String>,

        /// Output format; taken from the output extension when omitted.
        #[arg(long)]
        to: Option<String>,
    },
    /// List supported palette formats.
    Formats,
}

fn parse_options(text: &str) -> Result<Value, CliError> {
    serde_json::from_str(text).map_err(|e| CliError::Input(format!("invalid --options JSON: {e}")))
}

fn parse_color(text: &str) -> Result<Color, CliError> {
    Ok(Color::from_hex(text)?)
}

fn io_error(path: &Path, e: std::io::Error) -> CliError {
    CliError::Io(format!("{}: {e}", path.display()))
}

/// Resolves the format of an input palette: explicit name, then extension,
/// then content sniffing.
fn input_format(path: &Path, explicit: Option<&str>, bytes: &[u8]) -> Result<Format, CliError> {
    if let Some(name) = explicit {
        return Ok(name.parse()?);
    }
    Format::from_path(path)
        .ok()
        .or_else(|| codecs::detect(bytes))
        .ok_or_else(|| CliError::Input(format!("cannot tell the format of {}", path.display())))
}

fn read_palette(path: &Path, explicit: Option<&str>) -> Result<Palette, CliError> {
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    let format = input_format(path, explicit, &bytes)?;
    log::info!("reading {} as {format}", path.display());
    let mut palette = codecs::decode(format, &bytes)?;
    if palette.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            palette.name = stem.to_string();
        }
    }
    Ok(palette)
}

fn write_palette(palette: &Palette, path: &Path, explicit: Option<&str>) -> Result<Format, CliError> {
    let format = match explicit {
        Some(name) => name.parse()?,
        None => Format::from_path(path)?,
    };
    let bytes = codecs::encode(palette, format)?;
    std::fs::write(path, bytes).map_err(|e| io_error(path, e))?;
    log::info!("wrote {} swatches to {} as {format}", palette.len(), path.display());
    Ok(format)
}

/// Decodes an image into RGBA pixels plus its width and height.
fn load_pixels(path: &Path) -> Result<(Vec<Color>, usize, usize), CliError> {
    let img = image::open(path)?.to_rgba8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels: Vec<Color> = img
        .pixels()
        .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
        .collect();
    log::info!("{}: {w}x{h} pixels", path.display());
    Ok((pixels, w, h))
}

/// Decodes an image and runs the extractor over its RGBA pixels.
fn extract_from_image(path: &Path, options: &ExtractOptions) -> Result<Vec<DominantColor>, CliError> {
    let (pixels, w, h) = load_pixels(path)?;
    let sample = PixelSample::new(w, h, &pixels)?;
    Ok(extract_dominant(&sample, options))
}

fn average_of_image(path: &Path, method: AverageMethod) -> Result<Color, CliError> {
    let (pixels, w, h) = load_pixels(path)?;
    let sample = PixelSample::new(w, h, &pixels)?;
    Ok(average_color(&sample, method))
}

fn transcode(input: &Path, output: &Path, from: Option<&str>, to: Option<&str>) -> Result<(Palette, Format), CliError> {
    let palette = read_palette(input, from)?;
    let format = write_palette(&palette, output, to)?;
    Ok((palette, format))
}

fn convert_report(color: Color) -> Value {
    let mut models = serde_json::Map::new();
    for model in ColorModel::ALL {
        models.insert(model.name().to_string(), json!(color.format(model)));
    }
    json!({
        "models": models,
        "luminance": relative_luminance(color),
        "readable_text": readable_text_color(color).to_hex(),
    })
}

fn parse_level(text: &str) -> Result<WcagLevel, CliError> {
    match text.to_ascii_lowercase().as_str() {
        "aa" => Ok(WcagLevel::Aa),
        "aaa" => Ok(WcagLevel::Aaa),
        other => Err(CliError::Input(format!("unknown WCAG level '{other}', expected aa or aaa"))),
    }
}

fn print(json_mode: bool, value: &Value, human: impl FnOnce()) -> Result<(), CliError> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let json_mode = cli.json;
    match cli.command {
        Command::Formats => {
            let info: Vec<Value> = Format::ALL
                .iter()
                .map(|f| {
                    json!({
                        "name": f.name(),
                        "extension": f.extension(),
                        "binary": f.is_binary(),
                        "description": f.description(),
                    })
                })
                .collect();
            print(json_mode, &json!(info), || {
                for f in Format::ALL {
                    let kind = if f.is_binary() { "binary" } else { "text" };
                    println!("  {:<5} .{:<5} {:<7} {}", f.name(), f.extension(), kind, f.description());
                }
            })?;
        }
        Command::Convert { color } => {
            let color = parse_color(&color)?;
            let report = convert_report(color);
            print(json_mode, &report, || {
                for model in ColorModel::ALL {
                    println!("{:<5} {}", model.name(), color.format(model));
                }
                println!("luminance {:.4}", relative_luminance(color));
                println!("text on it reads best in {}", readable_text_color(color));
            })?;
        }
        Command::Contrast {
            foreground,
            background,
            suggest,
            large,
        } => {
            let report = AccessibilityReport::new(parse_color(&foreground)?, parse_color(&background)?);
            let size = if large { TextSize::Large } else { TextSize::Normal };
            let suggestions = match suggest.as_deref().map(parse_level).transpose()? {
                Some(level) => suggest_accessible_colors(report.foreground, report.background, level, size),
                None => Vec::new(),
            };
            let mut value = serde_json::to_value(report)?;
            value["normal_text"] = json!(report.normal_text_level());
            value["large_text"] = json!(report.large_text_level());
            if suggest.is_some() {
                value["suggestions"] = json!(suggestions.iter().map(|c| c.to_hex()).collect::<Vec<_>>());
            }
            print(json_mode, &value, || {
                println!("contrast {:.2}:1", report.ratio);
                println!("normal text: {}", report.normal_text_level());
                println!("large text:  {}", report.large_text_level());
                if suggest.is_some() {
                    if suggestions.is_empty() {
                        println!("no lightness variant reaches the requested level");
                    }
                    for c in &suggestions {
                        println!("suggest {c}");
                    }
                }
            })?;
        }
        Command::Simulate {
            color,
            deficiency,
            options,
        } => {
            let color = parse_color(&color)?;
            let options = SimulationOptions::from_json(&parse_options(&options)?)?;
            let results = match deficiency {
                Some(name) => {
                    let d: Deficiency = name.parse()?;
                    vec![(d, simulate(color, d, &options))]
                }
                None => simulate_all(color, &options),
            };
            let value = json!(results
                .iter()
                .map(|(d, c)| json!({"deficiency": d.name(), "color": c.to_hex()}))
                .collect::<Vec<_>>());
            print(json_mode, &value, || {
                for (d, c) in &results {
                    println!("{:<15} {c}", d.name());
                }
            })?;
        }
        Command::Harmony {
            color,
            kind,
            output,
        } => {
            let result = harmony_by_name(parse_color(&color)?, &kind)?;
            if let Some(path) = &output {
                write_palette(&Palette::from_harmony(&result), path, None)?;
            }
            let value = json!({
                "base": result.base.to_hex(),
                "kind": result.kind.name(),
                "colors": result.colors.iter().map(|c| c.to_hex()).collect::<Vec<_>>(),
            });
            print(json_mode, &value, || {
                println!("{} of {}", result.kind, result.base);
                for c in &result.colors {
                    println!("  {c}");
                }
            })?;
        }
        Command::Extract {
            image,
            count,
            bits,
            alpha,
            options,
            output,
        } => {
            let base = ExtractOptions::from_json(&parse_options(&options)?)?;
            let options = ExtractOptions::new(
                count.unwrap_or(base.count()),
                bits.unwrap_or(base.bits_per_channel()),
                alpha || base.respect_alpha(),
            )?;
            let dominant = extract_from_image(&image, &options)?;
            if let Some(path) = &output {
                let name = image
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("extracted");
                write_palette(&Palette::from_dominant(name, &dominant), path, None)?;
            }
            let value = json!(dominant
                .iter()
                .map(|d| json!({"color": d.color.to_hex(), "weight": d.weight, "pixel_count": d.pixel_count}))
                .collect::<Vec<_>>());
            print(json_mode, &value, || {
                for d in &dominant {
                    println!("{}  {:>6.2}%", d.color, d.weight * 100.0);
                }
            })?;
        }
        Command::Audit {
            palette,
            from,
            options,
        } => {
            let options = SimulationOptions::from_json(&parse_options(&options)?)?;
            let palette = read_palette(&palette, from.as_deref())?;
            let audit = audit_palette(&palette.colors(), &Deficiency::ALL, &options);
            print(json_mode, &serde_json::to_value(&audit)?, || {
                println!("score {:.2}", audit.score);
                for &(i, j) in &audit.problematic_pairs {
                    println!(
                        "  {} ({}) ~ {} ({})",
                        palette.display_name(i),
                        palette.colors()[i],
                        palette.display_name(j),
                        palette.colors()[j]
                    );
                }
            })?;
        }
        Command::Average { image, method } => {
            let method: AverageMethod = method.parse()?;
            let color = average_of_image(&image, method)?;
            let value = json!({"method": method.name(), "color": color.to_hex()});
            print(json_mode, &value, || println!("{method} average {color}"))?;
        }
        Command::Similar {
            color,
            palette,
            from,
            max_distance,
            limit,
        } => {
            let target = parse_color(&color)?;
            let palette = read_palette(&palette, from.as_deref())?;
            let matches = find_similar(target, &palette.colors(), max_distance, limit)?;
            let value = json!(matches
                .iter()
                .map(|m| json!({
                    "index": m.index,
                    "name": palette.display_name(m.index),
                    "color": m.color.to_hex(),
                    "distance": m.distance,
                    "similarity": m.similarity,
                }))
                .collect::<Vec<_>>());
            print(json_mode, &value, || {
                if matches.is_empty() {
                    println!("nothing within {max_distance}");
                }
                for m in &matches {
                    println!(
                        "{} {:<16} dE {:>6.2}  {:>5.1}%",
                        m.color,
                        palette.display_name(m.index),
                        m.distance,
                        m.similarity
                    );
                }
            })?;
        }
        Command::Gradient {
            from,
            to,
            steps,
            output,
        } => {
            let colors = gradient(parse_color(&from)?, parse_color(&to)?, steps);
            if let Some(path) = &output {
                write_palette(&Palette::from_colors("gradient", colors.iter().copied()), path, None)?;
            }
            let value = json!(colors.iter().map(|c| c.to_hex()).collect::<Vec<_>>());
            print(json_mode, &value, || {
                for c in &colors {
                    println!("{c}");
                }
            })?;
        }
        Command::Transcode {
            input,
            output,
            from,
            to,
        } => {
            let (palette, format) = transcode(&input, &output, from.as_deref(), to.as_deref())?;
            let value = json!({
                "input": input.display().to_string(),
                "output": output.display().to_string(),
                "format": format.name(),
                "swatches": palette.len(),
            });
            print(json_mode, &value, || {
                eprintln!("{} swatches -> {} ({format})", palette.len(), output.display());
            })?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pigment_core::palette::Swatch;

    fn sample_palette() -> Palette {
        let mut p = Palette::new("Sample");
        p.push(Swatch::new(Color::rgb(255, 0, 0)).named("red"));
        p.push(Swatch::new(Color::rgb(0, 0, 255)).named("blue"));
        p
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pigment", "convert", "#FF0000", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn transcode_json_to_gpl_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("sample.json");
        let gpl_path = dir.path().join("sample.gpl");
        write_palette(&sample_palette(), &json_path, None).unwrap();

        let (palette, format) = transcode(&json_path, &gpl_path, None, None).unwrap();
        assert_eq!(format, Format::Gpl);
        assert_eq!(palette.len(), 2);

        let back = read_palette(&gpl_path, None).unwrap();
        assert_eq!(back.colors(), sample_palette().colors());
        assert_eq!(back.name, "Sample");
    }

    #[test]
    fn read_palette_sniffs_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatches.bin");
        std::fs::write(&path, codecs::encode(&sample_palette(), Format::Ase).unwrap()).unwrap();
        let p = read_palette(&path, None).unwrap();
        assert_eq!(p.source, Some(Format::Ase));
        // ASE carries no palette name, so the file stem is used.
        assert_eq!(p.name, "swatches");
    }

    #[test]
    fn write_palette_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_palette(&sample_palette(), &dir.path().join("out.txt"), None).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_palette(&dir.path().join("absent.gpl"), None).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn extract_from_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flag.png");
        let img = image::RgbaImage::from_fn(4, 4, |x, _| {
            if x < 3 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        img.save(&path).unwrap();

        let options = ExtractOptions::with_count(2).unwrap();
        let dominant = extract_from_image(&path, &options).unwrap();
        assert_eq!(dominant.len(), 2);
        assert_eq!(dominant[0].color, Color::rgb(255, 0, 0));
        assert_eq!(dominant[0].weight, 0.75);
        assert_eq!(dominant[1].color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn extract_from_garbage_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = extract_from_image(&path, &ExtractOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 14);
    }

    #[test]
    fn average_from_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half.png");
        let img = image::RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([200, 100, 50, 255])
            }
        });
        img.save(&path).unwrap();
        let avg = average_of_image(&path, AverageMethod::Arithmetic).unwrap();
        assert_eq!(avg, Color::rgb(100, 50, 25));
    }

    #[test]
    fn similar_subcommand_parses_defaults() {
        let cli = Cli::try_parse_from(["pigment", "similar", "#FF0000", "brand.gpl"]).unwrap();
        match cli.command {
            Command::Similar {
                max_distance, limit, ..
            } => {
                assert_eq!(max_distance, similar::DEFAULT_MAX_DISTANCE);
                assert_eq!(limit, similar::DEFAULT_MAX_RESULTS);
            }
            _ => panic!("expected the similar subcommand"),
        }
    }

    #[test]
    fn gradient_writes_palette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.less");
        let colors = gradient(Color::BLACK, Color::WHITE, 1);
        write_palette(&Palette::from_colors("gradient", colors), &path, None).unwrap();
        let back = read_palette(&path, None).unwrap();
        assert_eq!(back.source, Some(Format::Less));
        assert_eq!(
            back.colors(),
            vec![Color::BLACK, Color::rgb(128, 128, 128), Color::WHITE]
        );
    }

    #[test]
    fn convert_report_lists_every_model() {
        let report = convert_report(Color::rgb(255, 0, 0));
        assert_eq!(report["models"]["hex"], "#FF0000");
        assert_eq!(report["models"].as_object().unwrap().len(), ColorModel::ALL.len());
        assert_eq!(report["readable_text"], "#000000");
    }

    #[test]
    fn bad_options_json_is_input_error() {
        assert_eq!(parse_options("{oops").unwrap_err().exit_code(), 12);
    }

    #[test]
    fn level_names() {
        assert_eq!(parse_level("AAA").unwrap(), WcagLevel::Aaa);
        assert!(parse_level("A").is_err());
    }
}
