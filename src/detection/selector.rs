use tracing::debug;

use crate::config::ContourSelectionConfig;
use crate::detection::fit::fit_line;
use crate::detection::gate::ContourGate;
use crate::models::{Bounds, BoundingBox, Contour, ExtrapolatedSegment};

/// The contour chosen as the spanning boundary, with its extended fit line.
/// `line` is `None` when the contour points are degenerate.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'c> {
    pub contour: &'c Contour,
    pub width: u32,
    pub line: Option<ExtrapolatedSegment>,
}

/// Picks the narrowest gated contour running from the top to the bottom of the frame
pub struct SpanningCandidateSelector<'a> {
    gate: ContourGate<'a>,
    tolerance: u32,
}

impl<'a> SpanningCandidateSelector<'a> {
    pub fn new(config: &'a ContourSelectionConfig) -> Self {
        Self {
            gate: ContourGate::new(config),
            tolerance: config.top_bottom_tolerance,
        }
    }

    /// Whether the box reaches both the top and bottom rows within the tolerance
    pub fn spans(&self, bbox: &BoundingBox, frame_height: u32) -> bool {
        let tolerance = self.tolerance as i64;
        bbox.y as i64 <= tolerance && bbox.bottom() >= frame_height as i64 - tolerance
    }

    /// Select the boundary among `contours`; `None` when nothing spans the frame.
    /// Equal widths resolve to the contour that comes first in `contours`.
    pub fn select<'c>(
        &self,
        contours: &'c [Contour],
        frame_height: u32,
        frame_width: u32,
    ) -> Option<Selection<'c>> {
        let mut accepted = 0usize;
        let candidates: Vec<(&Contour, u32)> = contours
            .iter()
            .filter_map(|contour| {
                let verdict = self.gate.evaluate(contour);
                if !verdict.accepted() {
                    return None;
                }
                accepted += 1;
                self.spans(&verdict.bounding_box, frame_height)
                    .then_some((contour, verdict.bounding_box.width))
            })
            .collect();

        debug!(
            "Selection: {} contours, {} passed gate, {} spanning",
            contours.len(),
            accepted,
            candidates.len()
        );

        let (contour, width) = candidates.into_iter().min_by_key(|&(_, width)| width)?;

        let line = match fit_line(contour) {
            Some(fitted) => Some(fitted.extrapolate(Bounds::new(frame_width, frame_height))),
            None => {
                debug!("Selection: degenerate contour, no line fitted");
                None
            }
        };

        Some(Selection {
            contour,
            width,
            line,
        })
    }
}
