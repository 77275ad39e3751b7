use crate::detection::preprocessing;
use crate::pipeline::{PipelineContext, PipelineStep};
use anyhow::Result;
use image::DynamicImage;

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, image: DynamicImage, _context: &PipelineContext) -> Result<DynamicImage> {
        Ok(DynamicImage::ImageLuma8(preprocessing::to_grayscale(&image)))
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Apply Gaussian blur
pub struct BlurStep {
    pub sigma: f32,
}

impl PipelineStep for BlurStep {
    fn process(&self, image: DynamicImage, _context: &PipelineContext) -> Result<DynamicImage> {
        let gray = image.to_luma8();
        Ok(DynamicImage::ImageLuma8(preprocessing::apply_blur(&gray, self.sigma)))
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Otsu binarization
pub struct BinaryThresholdStep;

impl PipelineStep for BinaryThresholdStep {
    fn process(&self, image: DynamicImage, _context: &PipelineContext) -> Result<DynamicImage> {
        let gray = image.to_luma8();
        Ok(DynamicImage::ImageLuma8(preprocessing::apply_binary_threshold(&gray)))
    }

    fn name(&self) -> &str {
        "Binary Threshold"
    }
}

/// Morphological opening to drop speckles
pub struct OpeningStep {
    pub radius: u8,
}

impl PipelineStep for OpeningStep {
    fn process(&self, image: DynamicImage, _context: &PipelineContext) -> Result<DynamicImage> {
        let gray = image.to_luma8();
        Ok(DynamicImage::ImageLuma8(preprocessing::apply_opening(&gray, self.radius)))
    }

    fn name(&self) -> &str {
        "Morphological Opening"
    }
}

/// Detect edges using Canny
pub struct EdgeDetectionStep {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, image: DynamicImage, _context: &PipelineContext) -> Result<DynamicImage> {
        let gray = image.to_luma8();
        let edges = preprocessing::detect_edges(&gray, self.low_threshold, self.high_threshold);
        Ok(DynamicImage::ImageLuma8(edges))
    }

    fn name(&self) -> &str {
        "Edge Detection"
    }
}
