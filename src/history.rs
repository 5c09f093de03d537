use nalgebra as na;
use std::collections::VecDeque;
use std::fmt;

/// Centroid path of a track, oldest point first.
///
/// Holds at most `capacity` points; pushing onto a full history drops the
/// oldest one. Storage grows with the path, not with `capacity`. Counting
/// only ever looks at the two newest points.
pub struct History {
    points: VecDeque<na::Point2<i32>>,
    capacity: usize,
}

impl Clone for History {
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
            capacity: self.capacity,
        }
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.points.fmt(f)
    }
}

impl History {
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(cap.min(8)),
            capacity: cap,
        }
    }

    #[inline]
    pub fn push(&mut self, p: na::Point2<i32>) -> Option<na::Point2<i32>> {
        let dropped = if self.is_full() {
            self.points.pop_front()
        } else {
            None
        };

        self.points.push_back(p);

        dropped
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.points.len() == self.capacity
    }

    #[inline]
    pub fn latest(&self) -> Option<&na::Point2<i32>> {
        self.points.back()
    }

    /// The two newest points as `(previous, latest)`.
    #[inline]
    pub fn last_pair(&self) -> Option<(&na::Point2<i32>, &na::Point2<i32>)> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }

        Some((&self.points[n - 2], &self.points[n - 1]))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &'_ na::Point2<i32>> {
        self.points.iter()
    }
}
