pub mod config;
pub mod detection;
pub mod geometry;
pub mod media;
pub mod models;
pub mod output;
pub mod overlay;
pub mod pipeline;

pub use config::{Config, RgbColor};
pub use detection::{Boundary, FrameAnalysis, FrameProcessor, ProcessedFrame};
pub use models::{Bounds, BoundingBox, Contour, ExtrapolatedSegment, FittedLine, LineSegment};
pub use overlay::{Canvas, OverlayCompositor};
pub use pipeline::{DebugConfig, Pipeline, PipelineContext, PipelineStep};
