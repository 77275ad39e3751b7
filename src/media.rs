//! Frame sources: animated GIFs stand in for video, folders and single files for stills.
use anyhow::{Context, Result, anyhow, bail};
use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, DynamicImage, Frames, ImageDecoder, RgbImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

/// Stills larger than this are scaled down to `MAX_STILL_HEIGHT` rows
pub const MAX_STILL_WIDTH: u32 = 800;
pub const MAX_STILL_HEIGHT: u32 = 500;

/// Frame rate used when the source does not provide one
pub const DEFAULT_FPS: f64 = 30.0;

/// One decoded frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbImage,
    /// 1-based position in the stream
    pub number: usize,
    /// Seconds from stream start; `None` for stills
    pub timestamp: Option<f64>,
}

enum Source {
    Stills {
        files: Vec<PathBuf>,
        next: usize,
    },
    Animation {
        frames: Frames<'static>,
        pending: Option<image::Frame>,
        elapsed_ms: f64,
    },
}

/// Sequential frame reader. A read error after opening ends the stream.
pub struct MediaSource {
    source: Source,
    frame_count: usize,
    fps: Option<f64>,
    dimensions: Option<(u32, u32)>,
}

impl MediaSource {
    /// Open an animated GIF, a still image or a directory of stills
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Self::open_directory(path);
        }
        if !path.is_file() {
            bail!("Input path does not exist: {}", path.display());
        }

        match extension_of(path).as_deref() {
            Some("gif") => Self::open_animation(path),
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => {
                Ok(Self::from_stills(vec![path.to_path_buf()]))
            }
            _ => bail!(
                "Unsupported input file: {} (expected an animated GIF or an image)",
                path.display()
            ),
        }
    }

    fn open_directory(dir: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .filter(|p| {
                extension_of(p).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            })
            .collect();

        if files.is_empty() {
            bail!("No valid image files found in folder: {}", dir.display());
        }
        files.sort();

        info!("Found {} images in {}", files.len(), dir.display());
        Ok(Self::from_stills(files))
    }

    fn from_stills(files: Vec<PathBuf>) -> Self {
        Self {
            source: Source::Stills { files, next: 0 },
            frame_count: 0,
            fps: None,
            dimensions: None,
        }
    }

    fn open_animation(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Error opening video file: {}", path.display()))?;
        let decoder = GifDecoder::new(BufReader::new(file))
            .with_context(|| format!("Error opening video file: {}", path.display()))?;
        let dimensions = decoder.dimensions();

        let mut frames = decoder.into_frames();
        let first = frames
            .next()
            .ok_or_else(|| anyhow!("Video file has no frames: {}", path.display()))?
            .with_context(|| format!("Error decoding first frame of {}", path.display()))?;

        let (numer, denom) = first.delay().numer_denom_ms();
        let fps = (numer > 0).then(|| 1000.0 * denom as f64 / numer as f64);

        info!(
            "Video properties: {}x{} @ {}",
            dimensions.0,
            dimensions.1,
            fps.map_or("unknown FPS".to_string(), |f| format!("{:.1} FPS", f))
        );

        Ok(Self {
            source: Source::Animation {
                frames,
                pending: Some(first),
                elapsed_ms: 0.0,
            },
            frame_count: 0,
            fps,
            dimensions: Some(dimensions),
        })
    }

    /// True for frame-timed sources (animations)
    pub fn is_video(&self) -> bool {
        matches!(self.source, Source::Animation { .. })
    }

    /// Frame rate reported by the source, if any
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    /// Native frame size of a video source
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    pub fn frames_read(&self) -> usize {
        self.frame_count
    }
}

impl Iterator for MediaSource {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let (image, timestamp) = match &mut self.source {
            Source::Stills { files, next } => {
                let path = files.get(*next)?;
                *next += 1;
                match image::open(path) {
                    Ok(img) => (fit_still(img), None),
                    Err(e) => {
                        warn!("Error reading image file {}: {}", path.display(), e);
                        return None;
                    }
                }
            }
            Source::Animation {
                frames,
                pending,
                elapsed_ms,
            } => {
                let frame = match pending.take() {
                    Some(frame) => frame,
                    None => match frames.next()? {
                        Ok(frame) => frame,
                        Err(e) => {
                            warn!("Error decoding frame {}: {}", self.frame_count + 1, e);
                            return None;
                        }
                    },
                };
                let timestamp = *elapsed_ms / 1000.0;
                let (numer, denom) = frame.delay().numer_denom_ms();
                if denom > 0 {
                    *elapsed_ms += numer as f64 / denom as f64;
                }
                let rgb = DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8();
                (rgb, Some(timestamp))
            }
        };

        self.frame_count += 1;
        Some(Frame {
            image,
            number: self.frame_count,
            timestamp,
        })
    }
}

/// Scale oversized stills to `MAX_STILL_HEIGHT` rows, keeping the aspect ratio
pub fn fit_still(img: DynamicImage) -> RgbImage {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if height <= MAX_STILL_HEIGHT && width <= MAX_STILL_WIDTH {
        return rgb;
    }

    let scale = MAX_STILL_HEIGHT as f64 / height as f64;
    let new_width = ((width as f64 * scale) as u32).max(1);
    imageops::resize(&rgb, new_width, MAX_STILL_HEIGHT, FilterType::Triangle)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
