use image::{DynamicImage, GrayImage};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::open;

/// Sigma matching a 15x15 Gaussian kernel with automatic sigma
pub const BLUR_SIGMA: f32 = 2.6;

pub const CANNY_LOW: f32 = 30.0;
pub const CANNY_HIGH: f32 = 100.0;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Binarize with a global Otsu threshold; pixels above the level become 255
pub fn apply_binary_threshold(img: &GrayImage) -> GrayImage {
    let level = otsu_level(img);
    threshold(img, level, ThresholdType::Binary)
}

/// Erode then dilate with a square element of the given radius
pub fn apply_opening(img: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return img.clone();
    }
    open(img, Norm::LInf, radius)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}
