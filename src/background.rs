use image::{imageops, GrayImage, Luma, RgbImage};
use log::debug;
use serde_derive::{Deserialize, Serialize};

/// Separates moving foreground from the learned background.
///
/// Implementations keep adaptive state between calls, so `apply` must see
/// every frame of a stream exactly once and in capture order.
pub trait BackgroundSubtractor {
    /// Returns a mask of the frame's size, 255 = foreground, 0 = background.
    fn apply(&mut self, frame: &RgbImage) -> GrayImage;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Weight of the newest frame in the background model
    pub learning_rate: f32,
    /// Minimal absolute luma difference for a foreground pixel
    pub threshold: u8,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            threshold: 30,
        }
    }
}

/// Exponential running average of the luma channel.
pub struct RunningAverage {
    config: BackgroundConfig,
    dims: (u32, u32),
    model: Vec<f32>,
}

impl RunningAverage {
    pub fn new(config: BackgroundConfig) -> Self {
        Self {
            config,
            dims: (0, 0),
            model: Vec::new(),
        }
    }

    fn reset(&mut self, luma: &GrayImage) {
        debug!("initializing background model {:?}", luma.dimensions());

        self.dims = luma.dimensions();
        self.model = luma.pixels().map(|p| p[0] as f32).collect();
    }
}

impl Default for RunningAverage {
    fn default() -> Self {
        Self::new(BackgroundConfig::default())
    }
}

impl BackgroundSubtractor for RunningAverage {
    fn apply(&mut self, frame: &RgbImage) -> GrayImage {
        let luma = imageops::grayscale(frame);
        let (w, h) = luma.dimensions();

        if self.model.is_empty() || self.dims != (w, h) {
            self.reset(&luma);
            return GrayImage::new(w, h);
        }

        let lr = self.config.learning_rate.clamp(0.0, 1.0);
        let threshold = self.config.threshold as f32;
        let mut mask = GrayImage::new(w, h);

        for ((bg, px), out) in self
            .model
            .iter_mut()
            .zip(luma.pixels())
            .zip(mask.pixels_mut())
        {
            let v = px[0] as f32;

            if (v - *bg).abs() > threshold {
                *out = Luma([255]);
            }

            *bg = *bg * (1.0 - lr) + v * lr;
        }

        mask
    }
}
