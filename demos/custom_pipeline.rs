use piececut::{Segmenter, SegmenterConfig};
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path>", args[0]);
        std::process::exit(1);
    }

    let img = Segmenter::load_image(&args[1])?;
    println!("Loaded image: {}x{}", img.width(), img.height());

    println!("\n=== Default Settings ===");
    let standard = Segmenter::new(SegmenterConfig::default())?;
    let boxes = standard.detect_image(&img)?;
    println!("Total pieces: {}", boxes.len());
    for (i, bbox) in boxes.iter().enumerate() {
        println!("  {:03}: ({}, {}) {}x{}", i, bbox.x, bbox.y, bbox.width, bbox.height);
    }

    // Larger pieces, coarser rows, more aggressive smoothing
    println!("\n\n=== Custom Settings (Large Pieces) ===");
    let custom = Segmenter::new(SegmenterConfig {
        min_area: 2_000,
        row_band: 200,
        blur_kernel: 7,
        threshold_block: 21,
        ..SegmenterConfig::default()
    })?;
    let custom_boxes = custom.detect_image(&img)?;
    println!("Total pieces: {} (default settings found {})", custom_boxes.len(), boxes.len());

    custom.visualize(&img, &custom_boxes, Some(std::path::Path::new("custom_detection.png")))?;
    println!("Visualization saved to custom_detection.png");

    Ok(())
}
