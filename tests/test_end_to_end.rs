//! Binary image → contours → selection → overlay.

mod common;

use common::*;
use image::Rgb;
use seamline::detection::contours::find_external_contours;
use seamline::detection::fit::fit_line;
use seamline::detection::gate::{ContourGate, Rejection};
use seamline::detection::selector::SpanningCandidateSelector;
use seamline::{FrameAnalysis, FrameProcessor};

const WIDTH: u32 = 300;
const HEIGHT: u32 = 300;

#[test]
fn test_thin_full_height_rectangle_yields_nothing() {
    let binary = filled_rect_image(WIDTH, HEIGHT, 100, 2, 20, HEIGHT - 4);
    let contours = find_external_contours(&binary);
    assert_eq!(contours.len(), 1);

    let config = ContourSelectionConfig::default();
    let selector = SpanningCandidateSelector::new(&config);
    assert!(selector.select(&contours, HEIGHT, WIDTH).is_none());
}

#[test]
fn test_full_height_rectangle_rejected_by_vertex_band() {
    let binary = filled_rect_image(WIDTH, HEIGHT, 60, 2, 120, HEIGHT - 4);
    let contours = find_external_contours(&binary);
    assert_eq!(contours.len(), 1);

    let config = ContourSelectionConfig::default();
    let gate = ContourGate::new(&config);
    let verdict = gate.evaluate(&contours[0]);
    assert_eq!(verdict.bounding_box.width, 120);
    assert_eq!(verdict.vertex_count, Some(4));
    assert_eq!(verdict.rejection, Some(Rejection::CompactPolygon));

    let selector = SpanningCandidateSelector::new(&config);
    assert!(selector.select(&contours, HEIGHT, WIDTH).is_none());
}

#[test]
fn test_notched_strip_selected_with_vertical_line() {
    let binary = notched_strip_image(WIDTH, HEIGHT, 60, 120);
    let contours = find_external_contours(&binary);
    assert_eq!(contours.len(), 1);

    let config = ContourSelectionConfig::default();
    let verdict = ContourGate::new(&config).evaluate(&contours[0]);
    assert!(verdict.accepted(), "{:?}", verdict);
    assert!(verdict.vertex_count.is_some_and(|n| n > config.max_approx_vertices));

    let selector = SpanningCandidateSelector::new(&config);
    let selection = selector
        .select(&contours, HEIGHT, WIDTH)
        .expect("notched strip should be selected");
    assert_eq!(selection.width, 120);

    let fitted = fit_line(selection.contour).expect("fit");
    let (vx, vy) = fitted.direction;
    assert!(vx.abs() < 0.1 * vy.abs(), "direction ({}, {})", vx, vy);

    let line = selection.line.expect("extrapolated line");
    assert!((60..180).contains(&line.x_top), "x_top={}", line.x_top);
    assert!((60..180).contains(&line.x_bottom), "x_bottom={}", line.x_bottom);
}

#[test]
fn test_single_stepped_corner_gives_seven_vertices() {
    let mut binary = filled_rect_image(WIDTH, HEIGHT, 60, 2, 120, HEIGHT - 4);
    // 10x48 step out of the bottom-right corner
    for y in 250..298 {
        for x in 170..180 {
            binary.put_pixel(x, y, image::Luma([0]));
        }
    }
    let contours = find_external_contours(&binary);
    assert_eq!(contours.len(), 1);

    let config = ContourSelectionConfig::default();
    let verdict = ContourGate::new(&config).evaluate(&contours[0]);
    assert_eq!(verdict.vertex_count, Some(7));
    assert!(verdict.accepted(), "{:?}", verdict);

    let selection = SpanningCandidateSelector::new(&config)
        .select(&contours, HEIGHT, WIDTH)
        .expect("stepped strip should be selected");
    assert_eq!(selection.width, 120);
    let line = selection.line.expect("extrapolated line");
    assert!((60..180).contains(&line.x_top) && (60..180).contains(&line.x_bottom));
}

#[test]
fn test_frame_processor_draws_boundary() -> anyhow::Result<()> {
    let mut config = plain_config();
    config.line_detection.enabled = false;
    let processor = FrameProcessor::new(&config);
    let frame = gray_to_rgb(&notched_strip_image(WIDTH, HEIGHT, 60, 120));

    let processed = processor.process(1, &frame)?;
    let boundary = processed.analysis.boundary.as_ref().expect("boundary");
    assert!(boundary.line.is_some());

    let canvas = processed.canvas.image();
    assert_eq!(canvas.height(), 2 * HEIGHT);

    // Outline drawn on the strip's straight left edge, in the frame half
    let outline = config.drawing.contours.color.to_pixel();
    assert_eq!(*canvas.get_pixel(60, HEIGHT + 150), outline);

    // Only the fitted line's extension reaches into the blank half
    let row = HEIGHT / 2;
    let extension_hits: Vec<u32> = (0..WIDTH)
        .filter(|&x| *canvas.get_pixel(x, row) == Rgb([0, 200, 0]))
        .collect();
    assert!(!extension_hits.is_empty(), "no extension in the top half");
    assert!(extension_hits.iter().all(|x| (60..180).contains(x)));
    Ok(())
}

#[test]
fn test_no_boundary_leaves_frame_untouched() -> anyhow::Result<()> {
    let mut config = plain_config();
    config.line_detection.enabled = false;
    let processor = FrameProcessor::new(&config);

    // Blank frame: no contours, no lines
    let frame = gray_to_rgb(&image::GrayImage::new(80, 60));
    let processed = processor.process(1, &frame)?;

    assert_eq!(processed.analysis, FrameAnalysis::default());
    assert_eq!(processed.canvas.bottom_half(), frame);
    Ok(())
}

#[test]
fn test_render_skips_disabled_layers() -> anyhow::Result<()> {
    let mut config = plain_config();
    config.line_detection.enabled = false;
    config.drawing.contours.enabled = false;
    config.drawing.contour_fitted_line.enabled = false;
    let processor = FrameProcessor::new(&config);

    let frame = gray_to_rgb(&notched_strip_image(WIDTH, HEIGHT, 60, 120));
    let processed = processor.process(1, &frame)?;

    assert!(processed.analysis.boundary.is_some());
    assert_eq!(processed.canvas.bottom_half(), frame);
    Ok(())
}

#[test]
fn test_full_preprocessing_chain_runs() -> anyhow::Result<()> {
    let config = Config::default();
    let processor = FrameProcessor::new(&config);
    let frame = gray_to_rgb(&notched_strip_image(160, 120, 20, 100));

    let processed = processor.process(1, &frame)?;
    assert_eq!(processed.canvas.height(), 240);
    assert_eq!(processed.canvas.width(), 160);
    Ok(())
}
