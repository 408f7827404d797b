use crate::models::BoundingBox;

/// Sort boxes top-to-bottom in bands of `row_band` pixels, then left-to-right.
///
/// The sort is stable, so boxes sharing a band and an x coordinate keep the
/// order they were found in.
pub fn reading_order(boxes: &mut [BoundingBox], row_band: u32) {
    let band = row_band.max(1);
    boxes.sort_by_key(|b| (b.y / band, b.x));
}
