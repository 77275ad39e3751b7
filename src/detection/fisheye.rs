use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, warp_with};

use crate::config::FisheyeConfig;

/// Equidistant fisheye undistortion with a camera matrix derived from the frame size
pub struct FisheyeCorrector {
    k1: f32,
    k2: f32,
}

impl FisheyeCorrector {
    pub fn new(config: &FisheyeConfig) -> Self {
        Self {
            k1: config.k1,
            k2: config.k2,
        }
    }

    /// Distorted source position for an undistorted output pixel
    pub fn source_position(&self, u: f32, v: f32, width: u32, height: u32) -> (f32, f32) {
        let fx = width as f32 / 2.0;
        let fy = height as f32 / 2.0;
        let (cx, cy) = (fx, fy);

        let x = (u - cx) / fx;
        let y = (v - cy) / fy;
        let r = (x * x + y * y).sqrt();
        if r < 1e-8 {
            return (u, v);
        }

        let theta = r.atan();
        let theta2 = theta * theta;
        let theta_d = theta * (1.0 + self.k1 * theta2 + self.k2 * theta2 * theta2);
        let scale = theta_d / r;

        (fx * x * scale + cx, fy * y * scale + cy)
    }

    pub fn undistort(&self, frame: &RgbImage) -> RgbImage {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return frame.clone();
        }
        warp_with(
            frame,
            |u, v| self.source_position(u, v, width, height),
            Interpolation::Bilinear,
            Rgb([0, 0, 0]),
        )
    }
}
