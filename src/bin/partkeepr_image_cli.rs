//! PartKeepr image CLI
//!
//! Commands: inspect, render, not-found, presets
//! Outputs JSON to stdout, logs to stderr
//! Exit codes: 1 for usage/config errors, 2 for render failures

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use partkeepr_imaging::{
    ImageRenderer, PresetRegistry, RasterCodec, RasterFormat, RenderOptions, RendererConfig,
    ResizeMode, TargetSpec, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "partkeepr-image")]
#[command(about = "PartKeepr image renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Renderer configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of extra preset files
    #[arg(long)]
    presets_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Fit,
    Exact,
    Scale,
}

impl From<Mode> for ResizeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Fit => ResizeMode::FitWithinPadded,
            Mode::Exact => ResizeMode::FitWithinExactCropped,
            Mode::Scale => ResizeMode::ScaleExact,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print a source image's dimensions and type
    Inspect {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Render a source image
    Render {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Named preset; replaces mode/width/height/padding
        #[arg(long, conflicts_with_all = ["mode", "width", "height", "padding"])]
        preset: Option<String>,

        #[arg(long, value_enum, default_value = "fit")]
        mode: Mode,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Pad fitted output (fit mode only)
        #[arg(long)]
        padding: bool,

        /// Output type (gif, jpeg, png, wbmp, xbm)
        #[arg(short, long)]
        format: Option<RasterFormat>,
    },

    /// Render the "image not found" placeholder as PNG
    NotFound {
        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        /// Write here instead of printing base64
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available presets
    Presets,
}

fn fail(code: u8, error: impl std::fmt::Display) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::from(code)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match RendererConfig::load(path) {
            Ok(c) => c,
            Err(e) => return fail(1, e),
        },
        None => RendererConfig::default(),
    };

    let mut registry = PresetRegistry::with_builtins(config.presets.clone());
    if let Some(dir) = &cli.presets_dir {
        if let Err(e) = registry.load_from_dir(dir) {
            return fail(1, format!("Failed to load presets: {}", e));
        }
    }

    let options = RenderOptions::from(&config);

    match cli.command {
        Commands::Inspect { input } => {
            let renderer = ImageRenderer::with_codec(input, RasterCodec::new(), options);
            match renderer.inspect() {
                Ok(source) => {
                    println!("{}", serde_json::json!({ "success": true, "source": source }));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(2, e),
            }
        }

        Commands::Render { input, output, preset, mode, width, height, padding, format } => {
            let target = match preset {
                Some(id) => match registry.get(&id) {
                    Some(p) => p.target(),
                    None => return fail(1, format!("Preset not found: {}", id)),
                },
                None => match (width, height) {
                    (Some(w), Some(h)) => TargetSpec::new(w, h, mode.into()).with_padding(padding),
                    _ => return fail(1, "--width and --height are required without --preset"),
                },
            };
            let target = match format {
                Some(f) => target.with_format(f),
                None => target,
            };

            let renderer = ImageRenderer::with_codec(input, RasterCodec::new(), options);
            match renderer.render(&output, &target) {
                Ok(result) => {
                    let output = serde_json::json!({
                        "success": true,
                        "engine_version": ENGINE_VERSION,
                        "result": result,
                    });
                    println!("{}", output);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(2, e),
            }
        }

        Commands::NotFound { width, height, output } => {
            let data = match partkeepr_imaging::render_not_found(width, height) {
                Ok(d) => d,
                Err(e) => return fail(2, e),
            };
            let output = match output {
                Some(path) => match std::fs::write(&path, &data) {
                    Ok(()) => serde_json::json!({ "success": true, "output_path": path }),
                    Err(e) => return fail(2, e),
                },
                None => serde_json::json!({
                    "success": true,
                    "content_type": RasterFormat::Png.mime_type(),
                    "data_base64": STANDARD.encode(&data),
                }),
            };
            println!("{}", output);
            ExitCode::SUCCESS
        }

        Commands::Presets => {
            let presets: Vec<_> = registry.list();
            match serde_json::to_string_pretty(&presets) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(1, e),
            }
        }
    }
}
