use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use seamline::media::{DEFAULT_FPS, MediaSource};
use seamline::output::VideoSink;
use seamline::{Config, DebugConfig, FrameProcessor};

#[derive(Parser)]
#[command(name = "seamline")]
#[command(about = "Overlay a detected top-to-bottom boundary onto video frames or images")]
struct Cli {
    /// Animated GIF, image file, or directory of images
    #[arg(value_name = "INPUT")]
    input_path: PathBuf,

    /// Directory for saved video and frames
    #[arg(long, value_name = "DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Save the processed stream as <name>_processed.gif (video input only)
    #[arg(long)]
    save_video: bool,

    /// Save every composited canvas as a PNG
    #[arg(long)]
    save_frames: bool,

    /// JSON configuration file; missing fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save intermediate images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    max_frames: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;

    let mut media = MediaSource::open(&args.input_path)?;

    let mut processor = FrameProcessor::new(&config);
    if let Some(debug_dir) = args.debug_out {
        processor = processor.with_debug(DebugConfig::prepare(debug_dir)?);
    }

    let mut video_sink = None;
    if args.save_video {
        match (media.is_video(), media.dimensions()) {
            (true, Some((width, height))) => {
                let fps = media.fps().filter(|f| *f > 0.0).unwrap_or_else(|| {
                    warn!("Invalid FPS in input video, setting FPS to {}", DEFAULT_FPS);
                    DEFAULT_FPS
                });
                let stem = args
                    .input_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("video");
                let path = args.output_dir.join(format!("{}_processed.gif", stem));
                video_sink = Some(VideoSink::create(&path, width, height, fps)?);
            }
            _ => warn!(
                "--save-video is enabled, but the input is not a video. No video will be saved."
            ),
        }
    }

    let mut boundaries_found = 0usize;
    for frame in media.by_ref() {
        let processed = processor.process(frame.number, &frame.image)?;

        debug!(
            "Frame: {}, Time: {:.2}s",
            frame.number,
            frame.timestamp.unwrap_or(0.0)
        );
        if processed.analysis.boundary.is_some() {
            boundaries_found += 1;
        }

        if let Some(sink) = video_sink.as_mut() {
            sink.write(&processed.canvas.bottom_half())?;
        }

        if args.save_frames {
            let path = args.output_dir.join(format!("frame_{:05}.png", frame.number));
            processed
                .canvas
                .image()
                .save(&path)
                .map_err(|e| anyhow::anyhow!("Failed to save frame {}: {}", path.display(), e))?;
        }

        if args.max_frames.is_some_and(|max| frame.number as u64 >= max) {
            info!("Reached --max-frames, stopping");
            break;
        }
    }

    if let Some(sink) = video_sink {
        sink.finish();
    }

    info!(
        "Processed {} frames, boundary found in {}",
        media.frames_read(),
        boundaries_found
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_frames_must_be_positive() {
        assert!(Cli::try_parse_from(["seamline", "clip.gif", "--max-frames", "0"]).is_err());

        let cli = Cli::try_parse_from(["seamline", "clip.gif", "--max-frames", "3"])
            .expect("valid arguments");
        assert_eq!(cli.max_frames, Some(3));
        assert_eq!(cli.output_dir, PathBuf::from("output"));
    }
}
