//! Planar helpers shared by the selector and the compositor.
//!
//! - `extend`: stretch a two-point line to the top and bottom rows of a region.
//! - `approximate_closed_polygon`: Douglas-Peucker for closed outlines.
use imageproc::point::Point;

use crate::models::{Bounds, ExtrapolatedSegment};

/// Extend the line through `(x1, y1)` and `(x2, y2)` to rows `0` and `bounds.height - 1`.
///
/// Vertical lines keep `x1` at both ends. A horizontal line has no crossing
/// with those rows, so its ends are also pinned to `x1`. Both x values are
/// truncated and clamped to `[0, bounds.width - 1]`.
pub fn extend(x1: f64, y1: f64, x2: f64, y2: f64, bounds: Bounds) -> ExtrapolatedSegment {
    let y_top = 0.0;
    let y_bottom = bounds.height.saturating_sub(1) as f64;

    let (x_top, x_bottom) = if x1 != x2 {
        let slope = (y2 - y1) / (x2 - x1);
        let intercept = y1 - slope * x1;
        if slope == 0.0 {
            (x1, x1)
        } else {
            ((y_top - intercept) / slope, (y_bottom - intercept) / slope)
        }
    } else {
        (x1, x1)
    };

    ExtrapolatedSegment {
        x_top: clamp_column(x_top, x1, bounds.width),
        y_top: y_top as i32,
        x_bottom: clamp_column(x_bottom, x1, bounds.width),
        y_bottom: y_bottom as i32,
    }
}

fn clamp_column(x: f64, fallback: f64, width: u32) -> i32 {
    let x = if x.is_finite() { x } else { fallback };
    let max = width.saturating_sub(1) as f64;
    // NaN survives clamp and casts to 0
    x.trunc().clamp(0.0, max) as i32
}

/// Douglas-Peucker simplification of a closed outline.
///
/// The outline is split at the point farthest from the first point and both
/// halves are simplified as open chains. The first point is dropped again
/// if it lies within `epsilon` of the line through its neighbours, so the
/// vertex count does not depend on where tracing started.
pub fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let start = points[0];
    let mut far = 0;
    let mut far_dist = 0i64;
    for (i, p) in points.iter().enumerate().skip(1) {
        let dx = (p.x - start.x) as i64;
        let dy = (p.y - start.y) as i64;
        let d = dx * dx + dy * dy;
        if d > far_dist {
            far_dist = d;
            far = i;
        }
    }
    if far == 0 {
        return vec![start];
    }

    let mut closing: Vec<Point<i32>> = points[far..].to_vec();
    closing.push(start);

    let mut result = simplify_open(&points[..=far], epsilon);
    let second = simplify_open(&closing, epsilon);
    result.extend_from_slice(&second[1..second.len() - 1]);

    if result.len() > 3 {
        let prev = result[result.len() - 1];
        let next = result[1];
        if perpendicular_distance(result[0], prev, next) <= epsilon {
            result.remove(0);
        }
    }

    result
}

/// Open-chain Douglas-Peucker; always keeps both endpoints
fn simplify_open(chain: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if chain.len() < 3 {
        return chain.to_vec();
    }

    let mut keep = vec![false; chain.len()];
    keep[0] = true;
    keep[chain.len() - 1] = true;

    let mut stack = vec![(0usize, chain.len() - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut index = first;
        for i in first + 1..last {
            let d = perpendicular_distance(chain[i], chain[first], chain[last]);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }
        if max_dist > epsilon {
            keep[index] = true;
            stack.push((first, index));
            stack.push((index, last));
        }
    }

    chain
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn perpendicular_distance(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let dx = bx - ax;
    let dy = by - ay;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    ((px - ax) * dy - (py - ay) * dx).abs() / len
}
