use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};

use crate::models::Contour;

/// Outer borders of top-level foreground regions (non-zero pixels).
/// Holes and regions nested inside holes are skipped.
pub fn find_external_contours(binary: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| Contour::new(c.points))
        .collect()
}
