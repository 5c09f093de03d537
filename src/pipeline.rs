use image::RgbImage;
use log::{debug, error, info};

use crate::annotate::Annotator;
use crate::background::{BackgroundSubtractor, RunningAverage};
use crate::config::Config;
use crate::counter::{CountUpdate, CounterConfig, VehicleCounter};
use crate::detector::BlobDetector;
use crate::error::Error;
use crate::source::FrameSource;
use crate::Detection;

/// Result of processing one frame.
pub struct Processed {
    pub update: CountUpdate,
    pub detections: Vec<Detection>,
    pub annotated: RgbImage,
}

/// Everything one camera stream needs, from raw frame to count.
///
/// The counter is created on the first frame, once the frame size is known.
pub struct StreamProcessor<B: BackgroundSubtractor> {
    subtractor: B,
    detector: BlobDetector,
    annotator: Annotator,
    counter_config: CounterConfig,
    line_y: Option<i32>,
    counter: Option<VehicleCounter>,
}

impl StreamProcessor<RunningAverage> {
    pub fn from_config(config: &Config) -> Self {
        let mut proc = Self::new(
            RunningAverage::new(config.background.clone()),
            BlobDetector::new(config.detector.clone()),
            Annotator::new(config.annotate.clone()),
            config.counter.clone(),
        );
        proc.line_y = config.line_y;

        proc
    }
}

impl<B: BackgroundSubtractor> StreamProcessor<B> {
    pub fn new(
        subtractor: B,
        detector: BlobDetector,
        annotator: Annotator,
        counter_config: CounterConfig,
    ) -> Self {
        Self {
            subtractor,
            detector,
            annotator,
            counter_config,
            line_y: None,
            counter: None,
        }
    }

    /// Fixes the counting line row instead of the frame's middle.
    pub fn with_line(mut self, line_y: i32) -> Self {
        self.line_y = Some(line_y);
        self
    }

    #[inline]
    pub fn counter(&self) -> Option<&VehicleCounter> {
        self.counter.as_ref()
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.counter.as_ref().map_or(0, |c| c.total())
    }

    pub fn process(&mut self, frame: &RgbImage) -> Result<Processed, Error> {
        let dims = frame.dimensions();

        let counter = match &mut self.counter {
            Some(c) if c.dims() != dims => {
                return Err(Error::FrameSizeMismatch {
                    expected: c.dims(),
                    actual: dims,
                })
            }
            Some(c) => c,
            empty => {
                let line_y = self.line_y.unwrap_or((dims.1 / 2) as i32);
                debug!("creating vehicle counter {:?}, line y={}", dims, line_y);

                empty.insert(VehicleCounter::new(dims, line_y, self.counter_config.clone())?)
            }
        };

        let mask = self.subtractor.apply(frame);
        let mask = self.detector.filter_mask(&mask);
        let detections = self.detector.detect(&mask);

        let update = counter.update(&detections);

        let mut annotated = frame.clone();
        self.annotator
            .draw(&mut annotated, &detections, Some(&*counter));

        Ok(Processed {
            update,
            detections,
            annotated,
        })
    }

    /// Processes `source` until it ends or fails to deliver a frame, handing
    /// every processed frame to `sink`. Returns the final count.
    pub fn run<S, F>(&mut self, source: &mut S, mut sink: F) -> Result<u64, Error>
    where
        S: FrameSource,
        F: FnMut(&Processed) -> Result<(), Error>,
    {
        loop {
            let frame = match source.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("end of stream");
                    break;
                }
                Err(err) => {
                    error!("frame capture failed, stopping: {}", err);
                    break;
                }
            };

            let processed = self.process(&frame)?;
            sink(&processed)?;
        }

        Ok(self.total())
    }
}
