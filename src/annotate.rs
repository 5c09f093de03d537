use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use serde_derive::{Deserialize, Serialize};

use crate::counter::VehicleCounter;
use crate::Detection;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnnotateConfig {
    pub line_color: [u8; 3],
    pub box_color: [u8; 3],
    pub centroid_color: [u8; 3],
    pub path_color: [u8; 3],
    pub centroid_radius: i32,
    pub draw_paths: bool,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            line_color: [0, 255, 255],
            box_color: [0, 0, 255],
            centroid_color: [255, 0, 0],
            path_color: [0, 255, 0],
            centroid_radius: 2,
            draw_paths: true,
        }
    }
}

/// Draws detections and counter state over a frame for operators. Has no
/// influence on counting.
#[derive(Default)]
pub struct Annotator {
    config: AnnotateConfig,
}

impl Annotator {
    pub fn new(config: AnnotateConfig) -> Self {
        Self { config }
    }

    pub fn draw_line(&self, frame: &mut RgbImage, line_y: i32) {
        let w = frame.width().saturating_sub(1) as f32;

        draw_line_segment_mut(
            frame,
            (0.0, line_y as f32),
            (w, line_y as f32),
            Rgb(self.config.line_color),
        );
    }

    pub fn draw_detections(&self, frame: &mut RgbImage, dets: &[Detection]) {
        for det in dets {
            let b = &det.bbox;
            let rect = Rect::at(b.left(), b.top()).of_size(b.width() as u32, b.height() as u32);

            draw_hollow_rect_mut(frame, rect, Rgb(self.config.box_color));
            draw_filled_circle_mut(
                frame,
                (det.centroid.x, det.centroid.y),
                self.config.centroid_radius,
                Rgb(self.config.centroid_color),
            );
        }
    }

    pub fn draw_paths(&self, frame: &mut RgbImage, counter: &VehicleCounter) {
        for track in counter.tracks() {
            for pair in track.path.windows(2) {
                draw_line_segment_mut(
                    frame,
                    (pair[0].x as f32, pair[0].y as f32),
                    (pair[1].x as f32, pair[1].y as f32),
                    Rgb(self.config.path_color),
                );
            }
        }
    }

    /// Full overlay: counting line, track paths, then current detections.
    pub fn draw(&self, frame: &mut RgbImage, dets: &[Detection], counter: Option<&VehicleCounter>) {
        if let Some(counter) = counter {
            self.draw_line(frame, counter.line_y());

            if self.config.draw_paths {
                self.draw_paths(frame, counter);
            }
        }

        self.draw_detections(frame, dets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterConfig;

    #[test]
    fn box_corners_are_inclusive() {
        let mut frame = RgbImage::new(50, 50);
        let det = Detection::from_ltwh(10, 10, 20, 20).unwrap();

        Annotator::default().draw_detections(&mut frame, &[det]);

        let blue = Rgb([0, 0, 255]);
        assert_eq!(*frame.get_pixel(10, 10), blue);
        assert_eq!(*frame.get_pixel(29, 29), blue);
        assert_eq!(*frame.get_pixel(30, 30), Rgb([0, 0, 0]));
        assert_eq!(*frame.get_pixel(20, 20), Rgb([255, 0, 0]));
    }

    #[test]
    fn line_spans_frame_width() {
        let mut frame = RgbImage::new(40, 30);
        let counter = VehicleCounter::centered((40, 30), CounterConfig::default()).unwrap();

        Annotator::default().draw(&mut frame, &[], Some(&counter));

        let cyan = Rgb([0, 255, 255]);
        assert_eq!(*frame.get_pixel(0, 15), cyan);
        assert_eq!(*frame.get_pixel(39, 15), cyan);
        assert_eq!(*frame.get_pixel(20, 14), Rgb([0, 0, 0]));
    }
}
