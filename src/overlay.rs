use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::config::{DrawingConfig, RgbColor};
use crate::geometry;
use crate::models::{Bounds, Contour};

/// Colour of the thin extension drawn for every line
pub const EXTENSION_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
pub const EXTENSION_THICKNESS: u32 = 1;

/// Builds canvases with blank space above the frame
pub struct OverlayCompositor<'a> {
    config: &'a DrawingConfig,
}

impl<'a> OverlayCompositor<'a> {
    pub fn new(config: &'a DrawingConfig) -> Self {
        Self { config }
    }

    /// Double-height canvas: neutral fill on top, a copy of `frame` below
    pub fn prepare(&self, frame: &RgbImage) -> Canvas {
        let (width, height) = frame.dimensions();
        let neutral = self.config.neutral_color.to_pixel();
        let mut image = RgbImage::from_pixel(width, height * 2, neutral);
        imageops::replace(&mut image, frame, 0, height as i64);
        Canvas {
            image,
            frame_height: height,
        }
    }
}

/// Composited visualization buffer, twice the frame height
pub struct Canvas {
    image: RgbImage,
    frame_height: u32,
}

impl Canvas {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The frame half with overlays, at the original resolution
    pub fn bottom_half(&self) -> RgbImage {
        imageops::crop_imm(&self.image, 0, self.frame_height, self.width(), self.frame_height)
            .to_image()
    }

    /// Draw a frame-space segment in the lower half, then its extension
    /// across the whole canvas in [`EXTENSION_COLOR`]
    pub fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: RgbColor,
        thickness: u32,
    ) {
        let shift = self.frame_height as i32;
        let (y1, y2) = (y1 + shift, y2 + shift);

        draw_thick_segment(
            &mut self.image,
            (x1 as f32, y1 as f32),
            (x2 as f32, y2 as f32),
            color.to_pixel(),
            thickness,
        );

        let extended = geometry::extend(
            x1 as f64,
            y1 as f64,
            x2 as f64,
            y2 as f64,
            Bounds::new(self.width(), self.height()),
        );
        draw_thick_segment(
            &mut self.image,
            (extended.x_bottom as f32, extended.y_bottom as f32),
            (extended.x_top as f32, extended.y_top as f32),
            EXTENSION_COLOR,
            EXTENSION_THICKNESS,
        );
    }

    /// Closed outline of a frame-space contour, lower half only
    pub fn draw_contour(&mut self, contour: &Contour, color: RgbColor, thickness: u32) {
        let shifted = contour.shifted(self.frame_height as i32);
        let points = shifted.points();
        let pixel = color.to_pixel();

        if points.len() == 1 {
            let p = points[0];
            draw_thick_segment(
                &mut self.image,
                (p.x as f32, p.y as f32),
                (p.x as f32, p.y as f32),
                pixel,
                thickness,
            );
            return;
        }

        for (i, p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            draw_thick_segment(
                &mut self.image,
                (p.x as f32, p.y as f32),
                (q.x as f32, q.y as f32),
                pixel,
                thickness,
            );
        }
    }
}

/// Segment with round caps; widths of 1 or less use a plain 1-px line
fn draw_thick_segment(
    image: &mut RgbImage,
    start: (f32, f32),
    end: (f32, f32),
    color: Rgb<u8>,
    thickness: u32,
) {
    if thickness <= 1 {
        draw_line_segment_mut(image, start, end, color);
        return;
    }

    let half = thickness as f32 / 2.0;
    let radius = half.round() as i32;
    draw_filled_circle_mut(image, (start.0.round() as i32, start.1.round() as i32), radius, color);
    draw_filled_circle_mut(image, (end.0.round() as i32, end.1.round() as i32), radius, color);

    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let len = dx.hypot(dy);
    if len < 1.0 {
        return;
    }

    let (nx, ny) = (-dy / len * half, dx / len * half);
    let corner = |x: f32, y: f32| Point::new(x.round() as i32, y.round() as i32);
    let quad = [
        corner(start.0 + nx, start.1 + ny),
        corner(end.0 + nx, end.1 + ny),
        corner(end.0 - nx, end.1 - ny),
        corner(start.0 - nx, start.1 - ny),
    ];
    // draw_polygon_mut rejects outlines whose first and last points coincide
    if quad[0] != quad[3] {
        draw_polygon_mut(image, &quad, color);
    }
}
