#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from seamline for tests
pub use seamline::config::{Config, ContourSelectionConfig, DrawingConfig, RgbColor};
pub use seamline::models::{Bounds, BoundingBox, Contour, ExtrapolatedSegment, LineSegment};
