use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use vcount::config::Config;
use vcount::error::Error;
use vcount::mjpeg::MjpegWriter;
use vcount::pipeline::StreamProcessor;
use vcount::source::Frames;

/// Black frames with a white 16x16 square at each given top row; `None`
/// leaves the frame empty.
fn frames(tops: &[Option<i32>]) -> Vec<RgbImage> {
    tops.iter()
        .map(|top| {
            let mut frame = RgbImage::new(100, 100);
            if let Some(y) = top {
                draw_filled_rect_mut(&mut frame, Rect::at(40, *y).of_size(16, 16), Rgb([255, 255, 255]));
            }
            frame
        })
        .collect()
}

fn moving_square() -> Vec<RgbImage> {
    frames(&[None, Some(10), Some(25), Some(40), Some(55), Some(70)])
}

#[test]
fn counts_square_crossing_the_middle() {
    let mut proc = StreamProcessor::from_config(&Config::default());
    let mut totals = Vec::new();
    let mut centroids = Vec::new();

    for frame in moving_square() {
        let p = proc.process(&frame).unwrap();
        totals.push(p.update.total);
        centroids.extend(p.detections.iter().map(|d| d.centroid.y));
    }

    assert_eq!(centroids, vec![18, 33, 48, 63, 78]);
    assert_eq!(totals, vec![0, 0, 0, 0, 1, 1]);
    assert_eq!(proc.counter().unwrap().line_y(), 50);
}

#[test]
fn annotated_frame_shows_line_and_boxes() {
    let mut proc = StreamProcessor::from_config(&Config::default());
    let frames = moving_square();

    proc.process(&frames[0]).unwrap();
    let p = proc.process(&frames[1]).unwrap();

    assert_eq!(p.annotated.dimensions(), (100, 100));
    assert_eq!(*p.annotated.get_pixel(0, 50), Rgb([0, 255, 255]));

    let b = p.detections[0].bbox;
    assert_eq!(*p.annotated.get_pixel(b.left() as u32, b.top() as u32), Rgb([0, 0, 255]));
}

#[test]
fn run_drains_source_and_feeds_sink() {
    let mut proc = StreamProcessor::from_config(&Config::default());
    let mut writer = MjpegWriter::new(Vec::new());

    let total = proc
        .run(&mut Frames(moving_square().into_iter()), |p| writer.write_frame(&p.annotated))
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(writer.frames(), 6);
}

#[test]
fn custom_line_must_fit_frame() {
    let mut proc = StreamProcessor::from_config(&Config::default()).with_line(100);

    assert!(matches!(
        proc.process(&RgbImage::new(100, 100)),
        Err(Error::LineOutOfBounds { line_y: 100, .. })
    ));
}

#[test]
fn frame_size_is_fixed_per_stream() {
    let mut proc = StreamProcessor::from_config(&Config::default());
    proc.process(&RgbImage::new(100, 100)).unwrap();

    assert!(matches!(
        proc.process(&RgbImage::new(80, 100)),
        Err(Error::FrameSizeMismatch { .. })
    ));
}

#[test]
fn still_scene_counts_nothing() {
    let mut proc = StreamProcessor::from_config(&Config::default());
    let frames = frames(&[Some(30); 10]);

    let total = proc.run(&mut Frames(frames.into_iter()), |_| Ok(())).unwrap();

    assert_eq!(total, 0);
    assert!(proc.counter().unwrap().is_empty());
}
