use anyhow::{Context, Result, bail};
use image::Rgb;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// RGB colour triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_pixel(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }
}

/// Structuring element size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KernelSize {
    pub width: u32,
    pub height: u32,
}

impl KernelSize {
    /// Chebyshev radius covering the kernel; 3x3 → 1
    pub fn radius(&self) -> u8 {
        (self.width.max(self.height) / 2).min(u8::MAX as u32) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Toggle {
    pub enabled: bool,
}

impl Default for Toggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FisheyeConfig {
    pub enabled: bool,
    pub k1: f32,
    pub k2: f32,
}

impl Default for FisheyeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            k1: 0.2,
            k2: 0.13,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MorphologyConfig {
    pub enabled: bool,
    pub kernel_size: KernelSize,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kernel_size: KernelSize {
                width: 3,
                height: 3,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    pub grayscale: Toggle,
    pub binary_threshold: Toggle,
    pub morphological_opening: MorphologyConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LineDetectionConfig {
    pub enabled: bool,
    /// Minimum Hough votes for a line
    pub threshold: u32,
    pub min_line_length: u32,
    pub max_line_gap: u32,
}

impl Default for LineDetectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 100,
            min_line_length: 150,
            max_line_gap: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContourSelectionConfig {
    pub enabled: bool,
    pub min_area: f64,
    pub max_aspect_ratio: f64,
    /// Accepted for config compatibility; spanning is decided by `top_bottom_tolerance`
    pub min_height_ratio: f64,
    pub max_approx_vertices: usize,
    pub min_approx_vertices: usize,
    pub top_bottom_tolerance: u32,
}

impl Default for ContourSelectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_area: 1000.0,
            max_aspect_ratio: 5.0,
            min_height_ratio: 0.8,
            max_approx_vertices: 6,
            min_approx_vertices: 4,
            top_bottom_tolerance: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    pub enabled: bool,
    pub color: RgbColor,
    pub thickness: u32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: RgbColor::new(30, 200, 30),
            thickness: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContourStrokeConfig {
    pub enabled: bool,
    pub color: RgbColor,
    pub thickness: u32,
    /// Accepted for config compatibility; not used when drawing
    pub aspect_ratio_threshold: f64,
}

impl Default for ContourStrokeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: RgbColor::new(0, 0, 255),
            thickness: 2,
            aspect_ratio_threshold: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub neutral_color: RgbColor,
    pub lines: StrokeConfig,
    pub contours: ContourStrokeConfig,
    pub contour_fitted_line: StrokeConfig,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            neutral_color: RgbColor::new(128, 128, 128),
            lines: StrokeConfig::default(),
            contours: ContourStrokeConfig::default(),
            contour_fitted_line: StrokeConfig {
                enabled: true,
                color: RgbColor::new(255, 255, 0),
                thickness: 3,
            },
        }
    }
}

/// Every tunable of the frame pipeline. Built once, then shared by reference.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fisheye_correction: FisheyeConfig,
    pub preprocessing: PreprocessingConfig,
    pub line_detection: LineDetectionConfig,
    pub contour_detection: Toggle,
    pub contour_selection: ContourSelectionConfig,
    pub drawing: DrawingConfig,
}

impl Config {
    /// Load a JSON config file; sections and fields left out keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let selection = &self.contour_selection;
        if selection.min_approx_vertices > selection.max_approx_vertices {
            bail!(
                "contour_selection: min_approx_vertices ({}) exceeds max_approx_vertices ({})",
                selection.min_approx_vertices,
                selection.max_approx_vertices
            );
        }
        if selection.max_aspect_ratio <= 0.0 {
            bail!("contour_selection: max_aspect_ratio must be positive");
        }
        if selection.min_area < 0.0 {
            bail!("contour_selection: min_area must not be negative");
        }

        let drawing = &self.drawing;
        for (name, thickness) in [
            ("lines", drawing.lines.thickness),
            ("contours", drawing.contours.thickness),
            ("contour_fitted_line", drawing.contour_fitted_line.thickness),
        ] {
            if thickness == 0 {
                bail!("drawing.{name}: thickness must be at least 1");
            }
        }

        let kernel = self.preprocessing.morphological_opening.kernel_size;
        if kernel.width == 0 || kernel.height == 0 {
            bail!("preprocessing.morphological_opening: kernel_size must be non-zero");
        }

        Ok(())
    }
}
