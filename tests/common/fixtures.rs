use image::{GrayImage, Luma, Rgb, RgbImage};
use seamline::config::Config;
use seamline::models::Contour;

/// Axis-aligned rectangle outline through its four corners (pixel-inclusive size)
pub fn rect_contour(x: i32, y: i32, width: i32, height: i32) -> Contour {
    let (x1, y1) = (x + width - 1, y + height - 1);
    Contour::from_coords(&[(x, y), (x1, y), (x1, y1), (x, y1)]).expect("non-empty")
}

/// Tall strip whose right edge zig-zags inwards by `amplitude`.
/// Straight left edge, many vertices, bounding width equals `width`.
pub fn sawtooth_strip(x: i32, y: i32, width: i32, height: i32, amplitude: i32) -> Contour {
    let right = x + width - 1;
    let bottom = y + height - 1;
    let teeth = 8;

    let mut coords = vec![(x, y)];
    for i in 0..=teeth {
        let px = if i % 2 == 1 { right - amplitude } else { right };
        let py = y + i * (height - 1) / teeth;
        coords.push((px, py));
    }
    coords.push((x, bottom));
    Contour::from_coords(&coords).expect("non-empty")
}

/// Black image with a white filled rectangle
pub fn filled_rect_image(
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    rect_width: u32,
    rect_height: u32,
) -> GrayImage {
    let mut img = GrayImage::new(width, height);
    for py in y..(y + rect_height).min(height) {
        for px in x..(x + rect_width).min(width) {
            img.put_pixel(px, py, Luma([255]));
        }
    }
    img
}

/// Tall white strip with three rectangular notches cut into its right edge
pub fn notched_strip_image(width: u32, height: u32, x: u32, strip_width: u32) -> GrayImage {
    let mut img = filled_rect_image(width, height, x, 2, strip_width, height - 4);
    let notch_depth = 15;
    let notch_height = 20;
    for notch_y in [height / 6, height * 2 / 5, height * 2 / 3] {
        for py in notch_y..notch_y + notch_height {
            for px in x + strip_width - notch_depth..x + strip_width {
                img.put_pixel(px, py, Luma([0]));
            }
        }
    }
    img
}

pub fn gray_to_rgb(img: &GrayImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let v = img.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

/// Gradient frame with distinct pixels everywhere
pub fn gradient_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 77])
    })
}

/// Defaults with undistortion and the blur/threshold/opening chain off,
/// so synthetic binary frames reach contour extraction unchanged
pub fn plain_config() -> Config {
    let mut config = Config::default();
    config.fisheye_correction.enabled = false;
    config.preprocessing.binary_threshold.enabled = false;
    config.preprocessing.morphological_opening.enabled = false;
    config
}
