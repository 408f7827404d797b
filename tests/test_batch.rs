//! Integration tests for single-image and directory processing.

mod common;

use common::*;
use piececut::batch::{self, ImageReport};

#[test]
fn test_process_image_writes_output_tree() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let img = squares_image(300, 300, &[square(200, 20, 45), square(20, 30, 45), square(100, 200, 50)]);
    let input = save_png(&img, dir.path(), "tray.png");
    let out = dir.path().join("out");

    let report = batch::process_image(&default_segmenter(), &input, &out, true)?;

    assert_eq!(report.pieces.len(), 3);
    assert_eq!((report.width, report.height), (300, 300));
    for (idx, piece) in report.pieces.iter().enumerate() {
        assert_eq!(piece.index, idx);
        assert_eq!(piece.path, out.join("pieces").join(format!("tray_{:03}.jpg", idx)));
        assert!(piece.path.is_file());
    }
    assert_eq!(report.visualization, Some(out.join("results").join("detected_pieces.jpg")));
    assert!(out.join("results").join("detected_pieces.jpg").is_file());

    let manifest: ImageReport = serde_json::from_str(&std::fs::read_to_string(&report.manifest)?)?;
    assert_eq!(manifest, report);

    Ok(())
}

#[test]
fn test_process_image_can_skip_visualization() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let input = save_png(&squares_image(150, 150, &[square(40, 40, 50)]), dir.path(), "one.png");
    let out = dir.path().join("out");

    let report = batch::process_image(&default_segmenter(), &input, &out, false)?;
    assert_eq!(report.visualization, None);
    assert!(!out.join("results").join("detected_pieces.jpg").exists());
    assert!(report.manifest.is_file());

    Ok(())
}

#[test]
fn test_collect_images_filters_and_sorts() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let img = squares_image(60, 60, &[]);
    save_png(&img, dir.path(), "b.png");
    save_png(&img, dir.path(), "a.PNG");
    std::fs::write(dir.path().join("notes.txt"), b"not an image")?;
    std::fs::create_dir(dir.path().join("nested.jpg"))?;

    let found = batch::collect_images(dir.path())?;
    let names: Vec<_> = found
        .iter()
        .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
        .collect();
    assert_eq!(names, vec!["a.PNG", "b.png"]);

    Ok(())
}

#[test]
fn test_batch_continues_after_a_bad_image() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let input = dir.path().join("in");
    std::fs::create_dir(&input)?;
    save_png(&squares_image(200, 200, &[square(30, 30, 50)]), &input, "a.png");
    std::fs::write(input.join("b.jpg"), b"corrupt")?;
    save_png(
        &squares_image(200, 200, &[square(20, 20, 45), square(120, 120, 45)]),
        &input,
        "c.png",
    );
    let out = dir.path().join("out");

    let summary = batch::run_batch(&default_segmenter(), &input, &out, true)?;

    assert_eq!(summary.images(), 3);
    assert_eq!(summary.successes(), 2);
    assert_eq!(summary.failures(), 1);
    assert_eq!(summary.total_pieces(), 3);
    assert!(!summary.entries[1].succeeded());
    assert!(out.join("a").join("pieces").join("a_000.jpg").is_file());
    assert!(out.join("c").join("pieces").join("c_001.jpg").is_file());

    Ok(())
}

#[test]
fn test_batch_debug_dumps_are_kept_per_image() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let input = dir.path().join("in");
    std::fs::create_dir(&input)?;
    save_png(&squares_image(200, 200, &[square(30, 30, 50)]), &input, "a.png");
    save_png(&squares_image(300, 100, &[square(20, 20, 45)]), &input, "b.png");
    let debug_dir = dir.path().join("debug");
    let segmenter = default_segmenter().with_debug(&debug_dir)?;

    let summary = batch::run_batch(&segmenter, &input, &dir.path().join("out"), false)?;
    assert_eq!(summary.successes(), 2);

    let mut runs: Vec<String> = std::fs::read_dir(&debug_dir)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    runs.sort();
    assert_eq!(runs, vec!["000_a", "001_b"]);

    for (run, dims) in [("000_a", (200, 200)), ("001_b", (300, 100))] {
        let stages = std::fs::read_dir(debug_dir.join(run))?.count();
        assert_eq!(stages, 5, "{}", run);
        let gray = image::open(debug_dir.join(run).join("00_grayscale.png"))?;
        assert_eq!((gray.width(), gray.height()), dims);
    }

    Ok(())
}

#[test]
fn test_unwritable_manifest_is_reported() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let input = save_png(&squares_image(150, 150, &[square(40, 40, 50)]), dir.path(), "one.png");
    let out = dir.path().join("out");
    std::fs::create_dir_all(out.join("results").join("one_manifest.json"))?;

    let err = batch::process_image(&default_segmenter(), &input, &out, false).unwrap_err();
    assert!(matches!(err, SegmentError::Manifest { .. }));
    assert_eq!(err.stage(), "manifest");
    assert!(out.join("pieces").join("one_000.jpg").is_file());

    Ok(())
}

#[test]
fn test_batch_on_missing_directory_fails() {
    let err = batch::run_batch(
        &default_segmenter(),
        std::path::Path::new("/definitely/not/here"),
        std::path::Path::new("/tmp/unused"),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, SegmentError::ReadDir { .. }));
}
