use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use raw_decode_rs::image_pipeline::{
    BorderMode, DecodeConfig, Gamma, RawToRgbPipeline, TiffCompression, WhiteBalanceReference,
};
use raw_decode_rs::logger;

use tracing::info;

/// Develop a Bayer RAW capture (.dng, .arw, ...) into an RGB image, writing every stage.
#[derive(Parser)]
#[command(name = "raw-decode")]
#[command(version, long_about = None)]
struct Cli {
    /// Path to the RAW image to be processed
    #[arg(short, long, value_name = "PATH")]
    image: PathBuf,

    /// White reference: a pixel as `row,col` / `(row,col)`, or gains as `[r,g,b]`
    #[arg(short, long, value_name = "REF", default_value = "1200,230")]
    white_reference: WhiteBalanceReference,

    /// Gamma exponent as `numerator/denominator`
    #[arg(short, long, value_name = "FRACTION", default_value = "1./2.2")]
    gamma: Gamma,

    /// Directory where the stage images are written
    #[arg(short, long, value_name = "DIR", default_value = "results")]
    output: PathBuf,

    /// Extension (and format) of the written images: .png, .jpg, .bmp or .tiff
    #[arg(short, long, value_name = "EXT", default_value = ".png")]
    extension: String,

    /// Demosaic border handling: reflect or zero
    #[arg(long, value_name = "MODE", default_value = "reflect")]
    border: BorderMode,

    /// Use LZW compression for TIFF output
    #[arg(long)]
    lzw: bool,

    /// Only write the final gamma corrected image
    #[arg(long)]
    final_only: bool,
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();

    let config = DecodeConfig::builder()
        .white_reference(cli.white_reference)
        .gamma(cli.gamma)
        .extension(cli.extension)
        .border(cli.border)
        .tiff_compression(if cli.lzw { TiffCompression::Lzw } else { TiffCompression::None })
        .write_intermediates(!cli.final_only)
        .build();
    let pipeline = RawToRgbPipeline::new(config)?;

    info!(
        white_reference = %pipeline.config().white_reference,
        gamma = %pipeline.config().gamma,
        border = %pipeline.config().border,
        "RAW development pipeline initialized"
    );

    let timings = pipeline
        .convert_file(&cli.image, &cli.output)
        .with_context(|| format!("failed to develop {}", cli.image.display()))?;

    info!(
        "Development successful in {:.1}ms, results in {}",
        timings.total_duration().as_secs_f64() * 1000.0,
        cli.output.display()
    );

    Ok(())
}
