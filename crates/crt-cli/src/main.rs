//! crt - Trinitron CRT look for still images
//!
//! Applies a phosphor stripe mask, scanlines, noise, spherical aberration
//! and a brightness trim to a PNG or JPEG.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

mod logging;
mod preset;
mod process;

use preset::{Overrides, Preset};

#[derive(Parser)]
#[command(name = "crt")]
#[command(author, version, about = "Make an image look like a photo of a Trinitron CRT")]
#[command(long_about = "
Applies, in order: an RGB phosphor stripe mask, vertical scanlines,
Gaussian noise, spherical aberration (barrel warp) and a brightness trim.
Input may be PNG or JPEG; output format follows the output extension.

Examples:
  crt photo.jpg crt.png
  crt photo.jpg crt.jpg --strength 0.2 --seed 7 --quality 90
  crt photo.png out.png --preset soft.yaml -v
")]
struct Cli {
    /// Input image
    input: PathBuf,

    /// Output image (.png, .jpg or .jpeg)
    output: PathBuf,

    /// Spherical aberration strength [default: 0.1]
    #[arg(short, long)]
    strength: Option<f32>,

    /// Seed for the noise generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Noise standard deviation [default: 10]
    #[arg(long)]
    noise_sigma: Option<f32>,

    /// Final brightness multiplier [default: 1.05]
    #[arg(short, long)]
    brightness: Option<f64>,

    /// JPEG quality 1-100 [default: 75]
    #[arg(short, long)]
    quality: Option<u8>,

    /// YAML preset with effect parameters
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Write log to a file instead of stderr
    #[arg(long)]
    log: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            strength: self.strength,
            seed: self.seed,
            noise_sigma: self.noise_sigma,
            brightness: self.brightness,
            quality: self.quality,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(cli.verbose, cli.log.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error processing image: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(()) => {
            println!(
                "Image processed successfully and saved as {}",
                cli.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error processing image: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let preset = match &cli.preset {
        Some(path) => Preset::load(path)?,
        None => Preset::default(),
    };
    let (params, options) = preset.resolve(&cli.overrides());

    process::run(&cli.input, &cli.output, &params, &options)
}
