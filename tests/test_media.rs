//! Frame sources and the GIF video sink.

mod common;

use common::*;
use image::{Rgb, RgbImage};
use seamline::media::{MAX_STILL_HEIGHT, MediaSource};
use seamline::output::VideoSink;
use tempfile::TempDir;

#[test]
fn test_directory_frames_are_sorted_and_filtered() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    gradient_frame(30, 20).save(dir.path().join("b.png"))?;
    gradient_frame(10, 20).save(dir.path().join("a.png"))?;
    gradient_frame(20, 20).save(dir.path().join("c.png"))?;
    std::fs::write(dir.path().join("notes.txt"), "not an image")?;

    let media = MediaSource::open(dir.path())?;
    assert!(!media.is_video());
    assert_eq!(media.fps(), None);

    let frames: Vec<_> = media.collect();
    let widths: Vec<u32> = frames.iter().map(|f| f.image.width()).collect();
    assert_eq!(widths, vec![10, 30, 20]);
    assert_eq!(frames.iter().map(|f| f.number).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(frames.iter().all(|f| f.timestamp.is_none()));
    Ok(())
}

#[test]
fn test_empty_directory_is_an_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("readme.txt"), "nothing here")?;

    let err = MediaSource::open(dir.path()).err().expect("should fail");
    assert!(err.to_string().contains("No valid image files"));
    Ok(())
}

#[test]
fn test_missing_and_unsupported_inputs_fail() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    assert!(MediaSource::open(&dir.path().join("missing.png")).is_err());

    let clip = dir.path().join("clip.mp4");
    std::fs::write(&clip, b"\x00\x00\x00\x18ftyp")?;
    assert!(MediaSource::open(&clip).is_err());
    Ok(())
}

#[test]
fn test_oversized_still_is_scaled_to_max_height() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("large.png");
    gradient_frame(1000, 600).save(&path)?;

    let frames: Vec<_> = MediaSource::open(&path)?.collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].image.height(), MAX_STILL_HEIGHT);
    assert_eq!(frames[0].image.width(), 833);
    Ok(())
}

#[test]
fn test_small_still_keeps_its_size() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("small.bmp");
    gradient_frame(64, 48).save(&path)?;

    let frame = MediaSource::open(&path)?.next().expect("one frame");
    assert_eq!(frame.image.dimensions(), (64, 48));
    Ok(())
}

#[test]
fn test_video_sink_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("clip_processed.gif");

    let mut sink = VideoSink::create(&path, 40, 30, 10.0)?;
    assert_eq!(sink.dimensions(), (40, 30));
    sink.write(&RgbImage::from_pixel(40, 30, Rgb([255, 0, 0])))?;
    // Mismatched frames are resized to the sink's size
    sink.write(&RgbImage::from_pixel(20, 20, Rgb([0, 0, 255])))?;
    assert_eq!(sink.frames_written(), 2);
    assert_eq!(sink.finish(), path);

    let media = MediaSource::open(&path)?;
    assert!(media.is_video());
    assert_eq!(media.dimensions(), Some((40, 30)));
    let fps = media.fps().expect("fps");
    assert!((fps - 10.0).abs() < 0.5, "fps={}", fps);

    let frames: Vec<_> = media.collect();
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.image.dimensions() == (40, 30)));
    assert_eq!(frames[0].timestamp, Some(0.0));
    let second = frames[1].timestamp.expect("timestamp");
    assert!((second - 0.1).abs() < 0.01, "t={}", second);
    Ok(())
}

#[test]
fn test_video_sink_handles_full_size_frames() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("large_processed.gif");

    let mut sink = VideoSink::create(&path, 800, 500, 30.0)?;
    for _ in 0..3 {
        sink.write(&gradient_frame(800, 500))?;
    }
    assert_eq!(sink.frames_written(), 3);
    sink.finish();

    let media = MediaSource::open(&path)?;
    assert_eq!(media.dimensions(), Some((800, 500)));
    assert_eq!(media.count(), 3);
    Ok(())
}
