use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltwh};

/// One candidate vehicle in a single frame: pixel box plus its center.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub bbox: BBox<Ltwh>,
    pub centroid: na::Point2<i32>,
}

impl Detection {
    /// Builds a detection from a left-top-width-height box, `None` when
    /// the box has no area.
    pub fn from_ltwh(x: i32, y: i32, w: i32, h: i32) -> Option<Self> {
        Self::from_bbox(BBox::ltwh(x, y, w, h))
    }

    pub fn from_bbox(bbox: BBox<Ltwh>) -> Option<Self> {
        if bbox.is_empty() {
            return None;
        }

        let (cx, cy) = bbox.center();

        Some(Self {
            bbox,
            centroid: na::Point2::new(cx, cy),
        })
    }

    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(self.centroid.x as f32, self.centroid.y as f32)
    }

    #[inline]
    pub fn distance_to(&self, p: &na::Point2<i32>) -> f32 {
        na::distance(&self.center(), &na::Point2::new(p.x as f32, p.y as f32))
    }

    #[inline(always)]
    pub fn diagonal(&self) -> f32 {
        self.bbox.diagonal()
    }
}
