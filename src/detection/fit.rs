use crate::geometry;
use crate::models::{Bounds, Contour, ExtrapolatedSegment, FittedLine};

const EPS: f64 = 1e-9;

/// Total-least-squares line through the contour points.
///
/// Returns `None` when the points have no spread (all coincident), since
/// the direction is undefined. The direction points downwards (`vy >= 0`).
pub fn fit_line(contour: &Contour) -> Option<FittedLine> {
    let points = contour.points();
    let n = points.len() as f64;

    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));
    let mu = (sum_x / n, sum_y / n);

    let mut cov_xx = 0.0;
    let mut cov_xy = 0.0;
    let mut cov_yy = 0.0;
    for p in points {
        let dx = p.x as f64 - mu.0;
        let dy = p.y as f64 - mu.1;
        cov_xx += dx * dx;
        cov_xy += dx * dy;
        cov_yy += dy * dy;
    }
    cov_xx /= n;
    cov_xy /= n;
    cov_yy /= n;

    let trace = cov_xx + cov_yy;
    if trace <= EPS {
        return None;
    }

    // Largest eigenvalue of the covariance and its eigenvector
    let det_part = (cov_xx - cov_yy) * (cov_xx - cov_yy) + 4.0 * cov_xy * cov_xy;
    let lambda = 0.5 * (trace + det_part.max(0.0).sqrt());
    let mut dir = if cov_xy.abs() > EPS {
        (cov_xy, lambda - cov_xx)
    } else if cov_xx >= cov_yy {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    };

    let norm = dir.0.hypot(dir.1);
    if norm <= EPS {
        return None;
    }
    dir = (dir.0 / norm, dir.1 / norm);
    if dir.1 < 0.0 || (dir.1 == 0.0 && dir.0 < 0.0) {
        dir = (-dir.0, -dir.1);
    }

    Some(FittedLine {
        point: mu,
        direction: dir,
    })
}

impl FittedLine {
    /// Extend to rows `0` and `height - 1` of a `width` x `height` frame
    pub fn extrapolate(&self, bounds: Bounds) -> ExtrapolatedSegment {
        let (x, y) = self.point;
        let (vx, vy) = self.direction;
        geometry::extend(x, y, x + vx, y + vy, bounds)
    }
}
