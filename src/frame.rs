use crate::detection::Detection;

/// Detection set of one captured frame.
pub struct Frame {
    /// (width, height) in pixels
    pub dims: (u32, u32),
    pub detections: Vec<Detection>,
}

impl Frame {
    #[inline]
    pub fn new(dims: (u32, u32), detections: Vec<Detection>) -> Self {
        Self { dims, detections }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
