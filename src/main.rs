use clap::{Parser, Subcommand};
use imgnorm::config::{self, NormalizeConfig};
use imgnorm::imaging::{
    Background, Dimension, ImageFormat, fit_within, resize_to_width, resize_with_tolerance,
};
use imgnorm::types::{ConversionReport, ImageInfo};
use imgnorm::{data_url, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "imgnorm")]
#[command(about = "Convert, flatten and resize images")]
#[command(long_about = "\
Convert, flatten and resize images

Supported formats: jpg, png, gif, webp, tiff. The output format is taken
from --format or, when absent, from the output file extension.

Transparency:
  convert   always flattens onto the background color
  resize    removes alpha (onto black) only for jpg and tiff
  fit       same as resize

Run 'imgnorm gen-config' to generate a documented imgnorm.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Shared output options.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output format (defaults to the output file extension)
    #[arg(long)]
    format: Option<ImageFormat>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an image to another format, flattening transparency
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Background for transparent pixels (#rrggbb, #rgb, white, black)
        #[arg(long)]
        background: Option<Background>,
        /// Input and output are base64 text (input may carry a data: prefix)
        #[arg(long)]
        base64: bool,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Resize to a width, or to an exact size within a deformation tolerance
    Resize {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        width: i32,
        /// Exact height; without it the aspect ratio is kept
        #[arg(long)]
        height: Option<i32>,
        /// Maximum aspect-ratio deformation for exact sizes
        #[arg(long)]
        tolerance: Option<f64>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Shrink into a bounding box, keeping the aspect ratio
    Fit {
        input: PathBuf,
        output: PathBuf,
        /// Maximum width (0 = unbounded)
        #[arg(long, default_value_t = 0)]
        max_width: i32,
        /// Maximum height (0 = unbounded)
        #[arg(long, default_value_t = 0)]
        max_height: i32,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Show format, size and color type of an image
    Info {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print a stock imgnorm.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    run(cli.command, &cli.config)
}

fn run(command: Command, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // gen-config runs without reading a config file
    if let Command::GenConfig = command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    let settings: NormalizeConfig = config::load_config(config_path)?;
    let converter = settings.conversion.converter();

    match command {
        Command::Convert {
            input,
            output,
            background,
            base64,
            out,
        } => {
            let format = output_format(out.format, &output)?;
            let background = match background {
                Some(bg) => bg,
                None => settings.conversion.background()?,
            };

            let (input_bytes, output_bytes) = if base64 {
                let text = std::fs::read_to_string(&input)?;
                let text = text.trim();
                let has_prefix = text.starts_with(data_url::BASE64_URL_PREFIX);
                let converted = converter.convert_base64(text, background, format, has_prefix)?;
                std::fs::write(&output, &converted)?;
                (text.len(), converted.len())
            } else {
                let bytes = std::fs::read(&input)?;
                let converted = converter.convert_bytes(&bytes, background, format)?;
                std::fs::write(&output, &converted)?;
                (bytes.len(), converted.len())
            };

            report(
                ConversionReport {
                    input: input.display().to_string(),
                    output: output.display().to_string(),
                    format,
                    input_bytes,
                    output_bytes,
                    size: None,
                },
                out.json,
            )?;
        }
        Command::Resize {
            input,
            output,
            width,
            height,
            tolerance,
            out,
        } => {
            let format = output_format(out.format, &output)?;
            let bytes = std::fs::read(&input)?;
            let image = converter.decode(&bytes)?;

            let resized = match height {
                Some(height) => {
                    let tolerance = tolerance.unwrap_or(settings.resize.deformation_tolerance);
                    resize_with_tolerance(&image, Dimension::new(width, height), tolerance)?
                }
                None => resize_to_width(&image, width)?,
            };
            let encoded = converter.convert_image(&resized, format)?;
            std::fs::write(&output, &encoded)?;

            report(
                ConversionReport {
                    input: input.display().to_string(),
                    output: output.display().to_string(),
                    format,
                    input_bytes: bytes.len(),
                    output_bytes: encoded.len(),
                    size: Some(Dimension::of(&resized)),
                },
                out.json,
            )?;
        }
        Command::Fit {
            input,
            output,
            max_width,
            max_height,
            out,
        } => {
            let format = output_format(out.format, &output)?;
            let bytes = std::fs::read(&input)?;
            let image = converter.decode(&bytes)?;

            let fitted = fit_within(&image, max_width, max_height)?;
            let encoded = converter.convert_image(&fitted, format)?;
            std::fs::write(&output, &encoded)?;

            report(
                ConversionReport {
                    input: input.display().to_string(),
                    output: output.display().to_string(),
                    format,
                    input_bytes: bytes.len(),
                    output_bytes: encoded.len(),
                    size: Some(Dimension::of(&fitted)),
                },
                out.json,
            )?;
        }
        Command::Info { input, json } => {
            let bytes = std::fs::read(&input)?;
            let info = ImageInfo::inspect(converter.codec(), &bytes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                output::print_info(&input.display().to_string(), &info);
            }
        }
        Command::GenConfig => unreachable!("gen-config returns before the config is loaded"),
    }

    Ok(())
}

/// Route `log` output to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Explicit `--format`, else the output file extension.
fn output_format(explicit: Option<ImageFormat>, output: &Path) -> Result<ImageFormat, String> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    output
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .ok_or_else(|| {
            format!(
                "cannot infer output format from {}; pass --format",
                output.display()
            )
        })
}

fn report(report: ConversionReport, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_conversion(&report);
    }
    Ok(())
}
