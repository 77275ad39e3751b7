use imageproc::geometry::{arc_length, contour_area};
use imageproc::point::Point;

use crate::geometry;

/// Minimal axis-aligned box around a contour, pixel-inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// Closed polygon boundary of a connected region, in frame coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point<i32>>,
}

impl Contour {
    /// Returns `None` for an empty point list; a contour always has at least one point.
    pub fn new(points: Vec<Point<i32>>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn from_coords(coords: &[(i32, i32)]) -> Option<Self> {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let first = self.points[0];
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        BoundingBox {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }

    /// Enclosed area of the polygon through the contour points
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }

    /// Closed perimeter length
    pub fn perimeter(&self) -> f64 {
        arc_length(&self.points, true)
    }

    pub fn aspect_ratio(&self) -> f64 {
        let bbox = self.bounding_box();
        if bbox.height == 0 {
            return 0.0;
        }
        bbox.width as f64 / bbox.height as f64
    }

    /// Douglas-Peucker reduction with tolerance `epsilon_ratio` × perimeter
    pub fn approximate(&self, epsilon_ratio: f64) -> Vec<Point<i32>> {
        geometry::approximate_closed_polygon(&self.points, epsilon_ratio * self.perimeter())
    }

    /// Copy of this contour moved down by `dy` pixels
    pub fn shifted(&self, dy: i32) -> Contour {
        Contour {
            points: self.points.iter().map(|p| Point::new(p.x, p.y + dy)).collect(),
        }
    }
}

/// Straight segment reported by the line detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        let dx = (self.x2 - self.x1) as f64;
        let dy = (self.y2 - self.y1) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Total-least-squares line: a point on the line and a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedLine {
    pub point: (f64, f64),
    pub direction: (f64, f64),
}

/// A line's crossings with the top and bottom rows of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtrapolatedSegment {
    pub x_top: i32,
    pub y_top: i32,
    pub x_bottom: i32,
    pub y_bottom: i32,
}

/// Width/height of the region a line is extended across
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
