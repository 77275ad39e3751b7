pub mod contours;
pub mod fisheye;
pub mod fit;
pub mod gate;
pub mod lines;
pub mod preprocessing;
pub mod selector;
pub mod steps;

use anyhow::Result;
use image::{DynamicImage, RgbImage};
use tracing::debug;

use crate::config::Config;
use crate::models::{Contour, ExtrapolatedSegment, LineSegment};
use crate::overlay::{Canvas, OverlayCompositor};
use crate::pipeline::{DebugConfig, Pipeline, PipelineContext};
use fisheye::FisheyeCorrector;
use lines::LineDetector;
use selector::SpanningCandidateSelector;
use steps::*;

/// Boundary picked for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub contour: Contour,
    pub line: Option<ExtrapolatedSegment>,
}

/// Everything detected in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameAnalysis {
    pub lines: Vec<LineSegment>,
    pub contour_count: usize,
    pub boundary: Option<Boundary>,
}

/// Result of processing one frame
pub struct ProcessedFrame {
    pub analysis: FrameAnalysis,
    pub canvas: Canvas,
}

/// Per-frame orchestrator: undistort, binarize, detect, select, composite
pub struct FrameProcessor<'a> {
    config: &'a Config,
    fisheye: Option<FisheyeCorrector>,
    binarize: Pipeline,
    edges: Pipeline,
    line_detector: LineDetector,
    selector: SpanningCandidateSelector<'a>,
    compositor: OverlayCompositor<'a>,
    debug: Option<DebugConfig>,
}

impl<'a> FrameProcessor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            fisheye: config
                .fisheye_correction
                .enabled
                .then(|| FisheyeCorrector::new(&config.fisheye_correction)),
            binarize: build_binarize_pipeline(config),
            edges: build_edge_pipeline(),
            line_detector: LineDetector::new(&config.line_detection),
            selector: SpanningCandidateSelector::new(&config.contour_selection),
            compositor: OverlayCompositor::new(&config.drawing),
            debug: None,
        }
    }

    /// Save intermediate images of every frame under the debug directory
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn process(&self, frame_number: usize, frame: &RgbImage) -> Result<ProcessedFrame> {
        let frame = match &self.fisheye {
            Some(corrector) => corrector.undistort(frame),
            None => frame.clone(),
        };

        let analysis = self.analyze(frame_number, &frame)?;
        let canvas = self.render(&frame, &analysis);

        if let Some(debug_config) = &self.debug {
            debug_config.save(
                "canvas",
                frame_number,
                &DynamicImage::ImageRgb8(canvas.image().clone()),
            )?;
        }

        Ok(ProcessedFrame { analysis, canvas })
    }

    /// Detect raw lines and the spanning boundary in an already corrected frame
    pub fn analyze(&self, frame_number: usize, frame: &RgbImage) -> Result<FrameAnalysis> {
        let context = PipelineContext {
            frame_number,
            debug: self.debug.clone(),
        };
        let (width, height) = frame.dimensions();

        let binary = self
            .binarize
            .run(DynamicImage::ImageRgb8(frame.clone()), &context)?
            .to_luma8();

        let lines = if self.config.line_detection.enabled {
            let edges = self
                .edges
                .run(DynamicImage::ImageLuma8(binary.clone()), &context)?
                .to_luma8();
            self.line_detector.detect(&edges)
        } else {
            Vec::new()
        };

        let contours = if self.config.contour_detection.enabled {
            contours::find_external_contours(&binary)
        } else {
            Vec::new()
        };

        let boundary = if self.config.contour_selection.enabled {
            self.selector
                .select(&contours, height, width)
                .map(|selection| Boundary {
                    contour: selection.contour.clone(),
                    line: selection.line,
                })
        } else {
            None
        };

        debug!(
            "Frame {}: {} lines, {} contours, boundary {}",
            frame_number,
            lines.len(),
            contours.len(),
            match &boundary {
                Some(b) => format!("width {}", b.contour.bounding_box().width),
                None => "not found".to_string(),
            }
        );

        Ok(FrameAnalysis {
            lines,
            contour_count: contours.len(),
            boundary,
        })
    }

    /// Composite lines, then the boundary outline, then its fitted line
    pub fn render(&self, frame: &RgbImage, analysis: &FrameAnalysis) -> Canvas {
        let drawing = &self.config.drawing;
        let mut canvas = self.compositor.prepare(frame);

        if drawing.lines.enabled {
            for line in &analysis.lines {
                canvas.draw_line(
                    line.x1,
                    line.y1,
                    line.x2,
                    line.y2,
                    drawing.lines.color,
                    drawing.lines.thickness,
                );
            }
        }

        if let Some(boundary) = &analysis.boundary {
            if drawing.contours.enabled {
                canvas.draw_contour(
                    &boundary.contour,
                    drawing.contours.color,
                    drawing.contours.thickness,
                );
            }
            if let (true, Some(line)) = (drawing.contour_fitted_line.enabled, boundary.line) {
                canvas.draw_line(
                    line.x_top,
                    line.y_top,
                    line.x_bottom,
                    line.y_bottom,
                    drawing.contour_fitted_line.color,
                    drawing.contour_fitted_line.thickness,
                );
            }
        }

        canvas
    }
}

/// Grayscale, then optional blur + Otsu threshold, then optional opening.
/// Grayscale conversion runs regardless of its toggle.
pub fn build_binarize_pipeline(config: &Config) -> Pipeline {
    let options = &config.preprocessing;
    let mut pipeline = Pipeline::new("binary").add_step(Box::new(GrayscaleStep));

    if options.binary_threshold.enabled {
        pipeline = pipeline
            .add_step(Box::new(BlurStep {
                sigma: preprocessing::BLUR_SIGMA,
            }))
            .add_step(Box::new(BinaryThresholdStep));
    }

    if options.morphological_opening.enabled {
        pipeline = pipeline.add_step(Box::new(OpeningStep {
            radius: options.morphological_opening.kernel_size.radius(),
        }));
    }

    pipeline
}

pub fn build_edge_pipeline() -> Pipeline {
    Pipeline::new("edges").add_step(Box::new(EdgeDetectionStep {
        low_threshold: preprocessing::CANNY_LOW,
        high_threshold: preprocessing::CANNY_HIGH,
    }))
}
