use tracing::trace;

use crate::config::ContourSelectionConfig;
use crate::models::{BoundingBox, Contour};

/// Narrow-and-tall shapes below this width are treated as blobs...
pub const BLOB_MAX_WIDTH: u32 = 100;
/// ...when taller than this
pub const BLOB_MIN_HEIGHT: u32 = 50;

/// Polygon approximation tolerance as a fraction of the perimeter
pub const APPROX_EPSILON_RATIO: f64 = 0.001;

/// First rule a contour failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SmallArea,
    BlobLike,
    TooWide,
    CompactPolygon,
}

/// Outcome of gating one contour together with the measurements taken on the way
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateVerdict {
    pub rejection: Option<Rejection>,
    pub area: f64,
    pub bounding_box: BoundingBox,
    pub aspect_ratio: f64,
    /// Only measured when the first three rules pass
    pub vertex_count: Option<usize>,
}

impl GateVerdict {
    pub fn accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Ordered reject rules for boundary-like contours
pub struct ContourGate<'a> {
    config: &'a ContourSelectionConfig,
}

impl<'a> ContourGate<'a> {
    pub fn new(config: &'a ContourSelectionConfig) -> Self {
        Self { config }
    }

    /// Apply the rules in order and stop at the first rejection
    pub fn evaluate(&self, contour: &Contour) -> GateVerdict {
        let area = contour.area();
        let bounding_box = contour.bounding_box();
        let aspect_ratio = contour.aspect_ratio();

        let mut verdict = GateVerdict {
            rejection: None,
            area,
            bounding_box,
            aspect_ratio,
            vertex_count: None,
        };

        if area < self.config.min_area {
            verdict.rejection = Some(Rejection::SmallArea);
        } else if bounding_box.width < BLOB_MAX_WIDTH && bounding_box.height > BLOB_MIN_HEIGHT {
            verdict.rejection = Some(Rejection::BlobLike);
        } else if aspect_ratio > self.config.max_aspect_ratio {
            verdict.rejection = Some(Rejection::TooWide);
        } else {
            let vertices = contour.approximate(APPROX_EPSILON_RATIO).len();
            verdict.vertex_count = Some(vertices);
            let band = self.config.min_approx_vertices..=self.config.max_approx_vertices;
            if band.contains(&vertices) {
                verdict.rejection = Some(Rejection::CompactPolygon);
            }
        }

        trace!(
            "Gate: area={:.0}, box={}x{}@({}, {}), aspect={:.3}, vertices={:?} -> {:?}",
            area,
            bounding_box.width,
            bounding_box.height,
            bounding_box.x,
            bounding_box.y,
            aspect_ratio,
            verdict.vertex_count,
            verdict.rejection
        );

        verdict
    }
}
