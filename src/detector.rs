use crate::bbox::BBox;
use crate::detection::Detection;

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use log::{debug, trace};
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BlobDetectorConfig {
    pub min_width: i32,
    pub min_height: i32,
    /// Dilation passes run after opening
    pub dilate_iterations: u32,
}

impl Default for BlobDetectorConfig {
    fn default() -> Self {
        Self {
            min_width: 13,
            min_height: 13,
            dilate_iterations: 2,
        }
    }
}

/// Cleans a raw foreground mask: closing fills small holes, opening removes
/// specks, and the final dilations merge fragments of one vehicle into a
/// single blob. The structuring element is the 3x3 cross.
pub fn filter_mask(mask: &GrayImage, dilate_iterations: u32) -> GrayImage {
    let closing = morphology::close(mask, Norm::L1, 1);
    let opening = morphology::open(&closing, Norm::L1, 1);

    (0..dilate_iterations).fold(opening, |m, _| morphology::dilate(&m, Norm::L1, 1))
}

pub struct BlobDetector {
    config: BlobDetectorConfig,
}

impl Default for BlobDetector {
    fn default() -> Self {
        Self::new(BlobDetectorConfig::default())
    }
}

impl BlobDetector {
    pub fn new(config: BlobDetectorConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &BlobDetectorConfig {
        &self.config
    }

    #[inline]
    pub fn filter_mask(&self, mask: &GrayImage) -> GrayImage {
        filter_mask(mask, self.config.dilate_iterations)
    }

    /// Finds vehicle candidates in a foreground mask (non-zero = foreground).
    ///
    /// Only outermost contours are used, so holes and blobs nested in holes
    /// never produce a detection of their own. Boxes smaller than the
    /// configured minimum are dropped.
    pub fn detect(&self, mask: &GrayImage) -> Vec<Detection> {
        let (fw, fh) = mask.dimensions();
        let contours = find_contours::<i32>(mask);

        let outer: Vec<_> = contours
            .iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .collect();

        debug!("found {} vehicle contours", outer.len());

        let mut matches = Vec::with_capacity(outer.len());
        for (i, contour) in outer.into_iter().enumerate() {
            let bbox = match BBox::enclosing(contour.points.iter().map(|p| (p.x, p.y))) {
                Some(b) => b.as_ltwh(),
                None => continue,
            };

            let valid = bbox.width() >= self.config.min_width
                && bbox.height() >= self.config.min_height
                && bbox.fits_in(fw, fh);

            trace!(
                "contour #{}: pos=({}, {}) size=({}, {}) valid={}",
                i,
                bbox.left(),
                bbox.top(),
                bbox.width(),
                bbox.height(),
                valid
            );

            if !valid {
                continue;
            }

            if let Some(det) = Detection::from_bbox(bbox) {
                matches.push(det);
            }
        }

        debug!("found {} valid vehicle contours", matches.len());

        matches
    }
}
