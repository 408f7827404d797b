use image::GrayImage;
use imageproc::contours::{self, BorderType};
use imageproc::point::Point;
use crate::models::{BoundingBox, Contour};

/// Find the outer boundaries of foreground regions in a binary mask.
///
/// Holes and regions nested inside holes are skipped. Boundaries are
/// returned in raster order of their first pixel, simplified so that only
/// the points where the chain changes direction are kept.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    contours::find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour::new(simplify_chain(&c.points)))
        .collect()
}

/// Drop points lying on a straight run between their neighbours
pub fn simplify_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let direction = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let curr = points[i];
            let next = points[(i + 1) % n];
            direction(prev, curr) != direction(curr, next)
        })
        .map(|i| points[i])
        .collect()
}

/// Bounding boxes of contours whose area lies strictly between the bounds
pub fn filter_by_area(contours: &[Contour], min_area: u32, max_area: u32) -> Vec<BoundingBox> {
    let (min_area, max_area) = (min_area as f64, max_area as f64);
    contours
        .iter()
        .filter(|c| {
            let area = c.area();
            min_area < area && area < max_area
        })
        .filter_map(|c| c.bounding_box())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn filled(mask: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn square_simplifies_to_corners() {
        let mut mask = GrayImage::new(30, 30);
        filled(&mut mask, 5, 5, 10, 10);
        let found = find_external_contours(&mask);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].points.len(), 4);
        assert_eq!(found[0].area(), 81.0);
        assert_eq!(found[0].bounding_box(), Some(BoundingBox::new(5, 5, 10, 10)));
    }

    #[test]
    fn holes_and_nested_regions_are_ignored() {
        let mut mask = GrayImage::new(40, 40);
        filled(&mut mask, 2, 2, 30, 30);
        for y in 6..28 {
            for x in 6..28 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        filled(&mut mask, 12, 12, 6, 6);
        let found = find_external_contours(&mask);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].bounding_box(), Some(BoundingBox::new(2, 2, 30, 30)));
    }

    #[test]
    fn area_bounds_are_exclusive() {
        let mut mask = GrayImage::new(30, 30);
        filled(&mut mask, 5, 5, 10, 10);
        let found = find_external_contours(&mask);
        assert!(filter_by_area(&found, 81, 1000).is_empty());
        assert!(filter_by_area(&found, 10, 81).is_empty());
        assert_eq!(filter_by_area(&found, 80, 82).len(), 1);
    }

    #[test]
    fn empty_mask_has_no_contours() {
        assert!(find_external_contours(&GrayImage::new(16, 16)).is_empty());
    }
}
