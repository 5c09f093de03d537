use crate::history::History;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Side of the counting line a centroid lies on. The line row itself
/// belongs to `Below`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Above,
    Below,
}

impl Side {
    #[inline]
    pub fn of(y: i32, line_y: i32) -> Self {
        if y < line_y {
            Side::Above
        } else {
            Side::Below
        }
    }
}

/// Direction of a line crossing in image coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Crossing {
    /// Increasing y
    Down,
    /// Decreasing y
    Up,
}

#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub id: u64,
    pub history: History,
    pub last_seen: u64,
    pub unseen: u32,
    pub counted: bool,
}

impl TrackedObject {
    pub fn new(id: u64, frame: u64, centroid: na::Point2<i32>, history_len: usize) -> Self {
        let mut history = History::with_capacity(history_len);
        history.push(centroid);

        Self {
            id,
            history,
            last_seen: frame,
            unseen: 0,
            counted: false,
        }
    }

    #[inline]
    pub fn centroid(&self) -> na::Point2<i32> {
        // history is never empty: it is seeded in `new`
        self.history
            .latest()
            .copied()
            .unwrap_or_else(na::Point2::origin)
    }

    pub fn observe(&mut self, frame: u64, centroid: na::Point2<i32>) {
        self.history.push(centroid);
        self.last_seen = frame;
        self.unseen = 0;
    }

    #[inline]
    pub fn miss(&mut self) {
        self.unseen += 1;
    }

    #[inline]
    pub fn is_stale(&self, max_unseen: u32) -> bool {
        self.unseen > max_unseen
    }

    /// Crossing between the two newest centroids, if they sit on
    /// different sides of `line_y`.
    pub fn crossing(&self, line_y: i32) -> Option<Crossing> {
        let (prev, curr) = self.history.last_pair()?;

        match (Side::of(prev.y, line_y), Side::of(curr.y, line_y)) {
            (Side::Above, Side::Below) => Some(Crossing::Down),
            (Side::Below, Side::Above) => Some(Crossing::Up),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj_at(ys: &[i32]) -> TrackedObject {
        let mut obj = TrackedObject::new(1, 0, na::Point2::new(0, ys[0]), 8);
        for (i, &y) in ys.iter().enumerate().skip(1) {
            obj.observe(i as u64, na::Point2::new(0, y));
        }
        obj
    }

    #[test]
    fn line_row_counts_as_below() {
        assert_eq!(Side::of(49, 50), Side::Above);
        assert_eq!(Side::of(50, 50), Side::Below);
    }

    #[test]
    fn crossing_direction() {
        assert_eq!(obj_at(&[40, 60]).crossing(50), Some(Crossing::Down));
        assert_eq!(obj_at(&[60, 40]).crossing(50), Some(Crossing::Up));
        assert_eq!(obj_at(&[30, 50]).crossing(50), Some(Crossing::Down));
        assert_eq!(obj_at(&[50, 60]).crossing(50), None);
        assert_eq!(obj_at(&[40]).crossing(50), None);
    }

    #[test]
    fn only_newest_pair_matters() {
        assert_eq!(obj_at(&[40, 60, 70]).crossing(50), None);
    }

    #[test]
    fn observe_resets_staleness() {
        let mut obj = obj_at(&[10]);
        obj.miss();
        obj.miss();
        assert!(obj.is_stale(1));

        obj.observe(3, na::Point2::new(0, 12));
        assert_eq!(obj.unseen, 0);
        assert_eq!(obj.last_seen, 3);
        assert!(!obj.is_stale(1));
    }
}
