mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from piececut for tests
pub use piececut::{BoundingBox, SegmentError, Segmenter, SegmenterConfig};

/// Segmenter with default settings
pub fn default_segmenter() -> Segmenter {
    Segmenter::new(SegmenterConfig::default()).expect("default config is valid")
}

/// Assert `actual` is within `tolerance` pixels of `expected` on every edge
pub fn assert_box_near(actual: &BoundingBox, expected: &BoundingBox, tolerance: u32) {
    let edges = [
        (actual.x, expected.x),
        (actual.y, expected.y),
        (actual.right(), expected.right()),
        (actual.bottom(), expected.bottom()),
    ];
    for (a, e) in edges {
        assert!(
            a.abs_diff(e) <= tolerance,
            "box {:?} is not within {}px of {:?}",
            actual,
            tolerance,
            expected
        );
    }
}
