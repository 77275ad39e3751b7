use image::GrayImage;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};

use crate::config::LineDetectionConfig;
use crate::models::LineSegment;

/// Non-maximum suppression radius in Hough space
pub const SUPPRESSION_RADIUS: u32 = 8;

/// Hough-based segment detector.
///
/// Each voted line is walked across the edge map; runs of edge pixels are
/// joined across gaps of at most `max_line_gap` and kept when at least
/// `min_line_length` long.
pub struct LineDetector {
    threshold: u32,
    min_line_length: u32,
    max_line_gap: u32,
}

impl LineDetector {
    pub fn new(config: &LineDetectionConfig) -> Self {
        Self {
            threshold: config.threshold,
            min_line_length: config.min_line_length,
            max_line_gap: config.max_line_gap,
        }
    }

    pub fn detect(&self, edges: &GrayImage) -> Vec<LineSegment> {
        let options = LineDetectionOptions {
            vote_threshold: self.threshold,
            suppression_radius: SUPPRESSION_RADIUS,
        };

        detect_lines(edges, options)
            .iter()
            .flat_map(|line| self.split_into_segments(edges, line))
            .collect()
    }

    fn split_into_segments(&self, edges: &GrayImage, line: &PolarLine) -> Vec<LineSegment> {
        let (width, height) = edges.dimensions();
        let theta = (line.angle_in_degrees as f32).to_radians();
        let (sin, cos) = theta.sin_cos();
        let origin = (line.r * cos, line.r * sin);
        let direction = (-sin, cos);
        let reach = ((width as f32).hypot(height as f32)).ceil() as i32;

        let point_at = |t: i32| {
            (
                origin.0 + t as f32 * direction.0,
                origin.1 + t as f32 * direction.1,
            )
        };
        // A pixel within one step across the line counts as on it
        let on_edge = |(x, y): (f32, f32)| {
            (-1..=1).any(|k| {
                let px = (x + k as f32 * cos).round();
                let py = (y + k as f32 * sin).round();
                px >= 0.0
                    && py >= 0.0
                    && (px as u32) < width
                    && (py as u32) < height
                    && edges.get_pixel(px as u32, py as u32)[0] > 0
            })
        };

        let max_step = self.max_line_gap as i32 + 1;
        let mut segments = Vec::new();
        let mut run: Option<(i32, i32)> = None;

        for t in -reach..=reach {
            if !on_edge(point_at(t)) {
                continue;
            }
            run = match run {
                Some((start, last)) if t - last <= max_step => Some((start, t)),
                Some(finished) => {
                    self.push_run(&mut segments, finished, &point_at);
                    Some((t, t))
                }
                None => Some((t, t)),
            };
        }
        if let Some(finished) = run {
            self.push_run(&mut segments, finished, &point_at);
        }

        segments
    }

    fn push_run(
        &self,
        segments: &mut Vec<LineSegment>,
        (start, last): (i32, i32),
        point_at: &impl Fn(i32) -> (f32, f32),
    ) {
        if ((last - start) as u32) < self.min_line_length {
            return;
        }
        let (x1, y1) = point_at(start);
        let (x2, y2) = point_at(last);
        segments.push(LineSegment {
            x1: x1.round() as i32,
            y1: y1.round() as i32,
            x2: x2.round() as i32,
            y2: y2.round() as i32,
        });
    }
}
