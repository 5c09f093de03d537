use crate::tracker::TrackedObject;
use nalgebra as na;
use serde_derive::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    Tracking,
    Counted,
}

/// Read-only view of a live tracked object.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Track {
    pub track_id: u64,
    pub time_since_update: u32,
    pub last_seen: u64,
    pub counted: bool,

    // oldest first
    pub path: Vec<na::Point2<i32>>,
}

impl Track {
    #[inline]
    pub fn state(&self) -> TrackState {
        if self.counted {
            TrackState::Counted
        } else {
            TrackState::Tracking
        }
    }

    #[inline]
    pub fn centroid(&self) -> Option<na::Point2<i32>> {
        self.path.last().copied()
    }
}

impl From<&TrackedObject> for Track {
    fn from(o: &TrackedObject) -> Track {
        Track {
            track_id: o.id,
            time_since_update: o.unseen,
            last_seen: o.last_seen,
            counted: o.counted,
            path: o.history.iter().copied().collect(),
        }
    }
}
