use clap::{Args as ClapArgs, Parser, Subcommand};
use heji_glyphs::{GlyphInspector, GlyphInspectorBuilder, RasterConfig};
use log::{LevelFilter, SetLoggerError};
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print the resolved prime to codepoint mapping (default)
    Verify,
    /// Compare PUA candidate pairs by advance width and ink density
    Candidates(RasterArgs),
}

#[derive(Debug, Clone, ClapArgs)]
struct RasterArgs {
    /// Em size in pixels used when rendering glyphs
    #[arg(long, default_value_t = 200.0)]
    point_size: f32,

    /// Width and height of the square raster canvas
    #[arg(long, default_value_t = 200)]
    canvas_size: u32,

    /// Luminance below which a pixel counts as ink
    #[arg(long, default_value_t = 128)]
    ink_threshold: u8,
}

#[derive(Parser)]
#[command(name = "heji-glyphs")]
#[command(about = "Verify HEJI2 prime accidental glyphs in bundled fonts", long_about = None)]
struct Args {
    /// Project root the mapping and font paths are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Mapping document, relative to the root
    #[arg(long, value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// Font file, relative to the root (repeatable)
    #[arg(long = "font", value_name = "FILE")]
    fonts: Vec<PathBuf>,

    /// Primes to resolve, anchored at the first one
    #[arg(long, value_delimiter = ',')]
    primes: Option<Vec<u32>>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    fn inspector(&self) -> GlyphInspectorBuilder {
        let mut builder = GlyphInspector::builder().root(&self.root);
        if let Some(mapping) = &self.mapping {
            builder = builder.mapping_path(mapping);
        }
        if !self.fonts.is_empty() {
            builder = builder.font_paths(&self.fonts);
        }
        if let Some(primes) = &self.primes {
            builder = builder.primes(primes.iter().copied());
        }
        builder
    }
}

/// Diagnostics go to stderr so stdout carries only the report
fn init_logger() -> Result<(), SetLoggerError> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logger() {
        eprintln!("Failed to install logger: {}", e);
    }

    let result = match args.command.clone().unwrap_or(Command::Verify) {
        Command::Verify => args
            .inspector()
            .build()
            .resolve()
            .map(|mapping| mapping.to_string()),
        Command::Candidates(raster) => args
            .inspector()
            .raster(RasterConfig {
                canvas_size: raster.canvas_size,
                point_size: raster.point_size,
                ink_threshold: raster.ink_threshold,
                ..RasterConfig::default()
            })
            .build()
            .candidates()
            .map(|report| report.to_string()),
    };

    match result {
        Ok(report) => print!("{}", report),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
