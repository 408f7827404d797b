use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use piececut::batch;
use piececut::{Segmenter, SegmenterConfig};

#[derive(Parser)]
#[command(name = "piececut")]
#[command(about = "Find pieces laid out in a photo and crop each into its own image")]
struct Cli {
    /// Image file, or a directory of images to process in batch
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    output: PathBuf,

    /// TOML file with segmenter settings; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Minimum piece area in pixels
    #[arg(long)]
    min_area: Option<u32>,

    /// Maximum piece area in pixels
    #[arg(long)]
    max_area: Option<u32>,

    /// Pixels kept around each piece when cropping
    #[arg(long)]
    padding: Option<u32>,

    /// Row height in pixels used to order pieces top-to-bottom
    #[arg(long)]
    row_band: Option<u32>,

    /// Skip writing the annotated detection image
    #[arg(long)]
    no_visualize: bool,

    /// Save intermediate masks to directory, one sub-directory per image (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn segmenter_config(&self) -> anyhow::Result<SegmenterConfig> {
        let mut config = match &self.config {
            Some(path) => SegmenterConfig::from_toml_file(path)?,
            None => SegmenterConfig::default(),
        };
        if let Some(v) = self.min_area {
            config.min_area = v;
        }
        if let Some(v) = self.max_area {
            config.max_area = v;
        }
        if let Some(v) = self.padding {
            config.padding = v;
        }
        if let Some(v) = self.row_band {
            config.row_band = v;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut segmenter = Segmenter::new(args.segmenter_config()?)?;
    log::debug!("Segmenter settings: {:?}", segmenter.config());
    if let Some(debug_dir) = &args.debug_out {
        segmenter = segmenter.with_debug(debug_dir)?;
    }
    let visualize = !args.no_visualize;

    if args.input.is_dir() {
        let summary = batch::run_batch(&segmenter, &args.input, &args.output, visualize)
            .with_context(|| format!("Batch processing {} failed", args.input.display()))?;

        println!("\n=== Batch Summary ===");
        println!("Total images processed: {}", summary.images());
        println!("Successful: {}", summary.successes());
        println!("Failed: {}", summary.failures());
        println!("Total pieces detected: {}", summary.total_pieces());
        for entry in &summary.entries {
            match &entry.error {
                None => println!("  ok   {}: {} pieces", entry.image.display(), entry.pieces_detected),
                Some(e) => println!("  fail {}: {}", entry.image.display(), e),
            }
        }
    } else {
        let report = batch::process_image(&segmenter, &args.input, &args.output, visualize)
            .with_context(|| format!("Processing {} failed", args.input.display()))?;

        println!("\n=== Segmentation Results ===");
        println!("Pieces detected: {}", report.pieces.len());
        for piece in &report.pieces {
            println!(
                "  {:03} at ({}, {}) {}x{} -> {}",
                piece.index,
                piece.bbox.x,
                piece.bbox.y,
                piece.bbox.width,
                piece.bbox.height,
                piece.path.display()
            );
        }
        if let Some(path) = &report.visualization {
            println!("Visualization: {}", path.display());
        }
        println!("Manifest: {}", report.manifest.display());
    }

    Ok(())
}
