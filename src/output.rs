use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, DynamicImage, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// NeuQuant sampling speed, 1 (best) to 30 (fastest)
pub const GIF_QUANTIZER_SPEED: i32 = 10;

/// Append-only animated GIF writer with a fixed frame size and rate
pub struct VideoSink {
    encoder: GifEncoder<BufWriter<File>>,
    path: PathBuf,
    width: u32,
    height: u32,
    delay: Delay,
    frames_written: usize,
}

impl VideoSink {
    pub fn create(path: &Path, width: u32, height: u32, fps: f64) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create video file {}", path.display()))?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_QUANTIZER_SPEED);
        encoder.set_repeat(Repeat::Infinite)?;

        // Delay is stored as a ratio of milliseconds
        let delay = Delay::from_numer_denom_ms(1_000_000, (fps * 1000.0).round().max(1.0) as u32);

        info!(
            "Saving processed video to: {} with FPS: {:.1} and dimensions: ({}, {})",
            path.display(),
            fps,
            width,
            height
        );

        Ok(Self {
            encoder,
            path: path.to_path_buf(),
            width,
            height,
            delay,
            frames_written: 0,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Append a frame, resizing it first when its size differs from the sink's
    pub fn write(&mut self, frame: &RgbImage) -> Result<()> {
        let resized;
        let frame = if frame.dimensions() != (self.width, self.height) {
            debug!(
                "Resizing frame from {:?} to {:?} for video output",
                frame.dimensions(),
                (self.width, self.height)
            );
            resized = imageops::resize(frame, self.width, self.height, FilterType::Triangle);
            &resized
        } else {
            frame
        };

        let rgba = DynamicImage::ImageRgb8(frame.clone()).to_rgba8();
        self.encoder
            .encode_frame(image::Frame::from_parts(rgba, 0, 0, self.delay))
            .with_context(|| format!("Failed to write frame to {}", self.path.display()))?;
        self.frames_written += 1;
        Ok(())
    }

    /// Flush the trailer and close the file
    pub fn finish(self) -> PathBuf {
        info!(
            "Processed video saved: {} ({} frames)",
            self.path.display(),
            self.frames_written
        );
        drop(self.encoder);
        self.path
    }
}
