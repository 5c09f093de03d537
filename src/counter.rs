use std::str::FromStr;

use log::{debug, info, trace};
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::frame::Frame;
use crate::track::Track;
use crate::tracker::{Crossing, TrackedObject};
use crate::Detection;

/// Longest centroid path a track may keep.
pub const MAX_HISTORY_LEN: usize = 1024;

/// Which line crossings add to the count.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CountDirection {
    #[default]
    Both,
    Down,
    Up,
}

impl CountDirection {
    #[inline]
    pub fn accepts(&self, crossing: Crossing) -> bool {
        matches!(
            (self, crossing),
            (CountDirection::Both, _)
                | (CountDirection::Down, Crossing::Down)
                | (CountDirection::Up, Crossing::Up)
        )
    }
}

impl FromStr for CountDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "both" => Ok(CountDirection::Both),
            "down" => Ok(CountDirection::Down),
            "up" => Ok(CountDirection::Up),
            _ => Err(Error::UnknownDirection(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CounterConfig {
    /// Fixed matching radius in pixels
    pub max_distance: f32,
    /// Radius as a multiple of the detection's diagonal; the larger of the
    /// two radii wins
    pub size_factor: f32,
    /// Consecutive unmatched frames an object survives
    pub max_unseen: u32,
    pub history_len: usize,
    pub direction: CountDirection,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            max_distance: 50.0,
            size_factor: 0.0,
            max_unseen: 5,
            history_len: 32,
            direction: CountDirection::Both,
        }
    }
}

impl CounterConfig {
    #[inline]
    fn radius(&self, det: &Detection) -> f32 {
        self.max_distance.max(self.size_factor * det.diagonal())
    }
}

/// Outcome of one `VehicleCounter::update` call.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CountUpdate {
    pub frame: u64,
    pub total: u64,
    pub matched: usize,
    pub counted: Vec<u64>,
    pub spawned: Vec<u64>,
    pub evicted: Vec<u64>,
}

impl CountUpdate {
    #[inline]
    pub fn crossed(&self) -> usize {
        self.counted.len()
    }
}

/// Counting state of one camera stream.
pub struct VehicleCounter {
    config: CounterConfig,
    dims: (u32, u32),
    line_y: i32,
    objects: Vec<TrackedObject>,
    next_id: u64,
    frame: u64,
    total: u64,
}

impl VehicleCounter {
    /// `dims` is (width, height); `line_y` must lie within `[0, height)`.
    pub fn new(dims: (u32, u32), line_y: i32, config: CounterConfig) -> Result<Self, Error> {
        let (width, height) = dims;

        if width == 0 || height == 0 {
            return Err(Error::EmptyFrame(width, height));
        }

        if line_y < 0 || line_y as i64 >= height as i64 {
            return Err(Error::LineOutOfBounds { line_y, height });
        }

        if !(2..=MAX_HISTORY_LEN).contains(&config.history_len) {
            return Err(Error::HistoryLength {
                len: config.history_len,
                max: MAX_HISTORY_LEN,
            });
        }

        Ok(Self {
            config,
            dims,
            line_y,
            objects: Vec::with_capacity(64),
            next_id: 1,
            frame: 0,
            total: 0,
        })
    }

    /// Counter with the line across the middle of the frame.
    pub fn centered(dims: (u32, u32), config: CounterConfig) -> Result<Self, Error> {
        Self::new(dims, (dims.1 / 2) as i32, config)
    }

    /// Greedy nearest-centroid assignment. Objects are visited in ascending
    /// id and each claims the closest free detection inside its radius.
    /// Returns the detection index matched to every object (by position in
    /// `self.objects`) and the claimed flags.
    fn assignment(&self, dets: &[Detection]) -> (Vec<Option<usize>>, Vec<bool>) {
        let mut claimed = vec![false; dets.len()];

        let matches = self
            .objects
            .iter()
            .map(|obj| {
                let last = obj.centroid();
                let mut best: Option<(usize, f32)> = None;

                for (j, det) in dets.iter().enumerate() {
                    if claimed[j] {
                        continue;
                    }

                    let dist = det.distance_to(&last);
                    if dist > self.config.radius(det) {
                        continue;
                    }

                    if best.map_or(true, |(_, d)| dist < d) {
                        best = Some((j, dist));
                    }
                }

                if let Some((j, dist)) = best {
                    trace!("object #{} -> detection {} at {:.1}px", obj.id, j, dist);
                    claimed[j] = true;
                }

                best.map(|(j, _)| j)
            })
            .collect();

        (matches, claimed)
    }

    /// Advances the counter by one frame. Must be called once per captured
    /// frame, in capture order, even when `dets` is empty.
    pub fn update(&mut self, dets: &[Detection]) -> CountUpdate {
        let frame = self.frame;
        let mut upd = CountUpdate {
            frame,
            ..Default::default()
        };

        let (matches, claimed) = self.assignment(dets);

        for (obj, m) in self.objects.iter_mut().zip(matches) {
            match m {
                Some(j) => {
                    obj.observe(frame, dets[j].centroid);
                    upd.matched += 1;
                }
                None => obj.miss(),
            }
        }

        let max_unseen = self.config.max_unseen;
        let evicted = &mut upd.evicted;
        self.objects.retain(|o| {
            if o.is_stale(max_unseen) {
                evicted.push(o.id);
                false
            } else {
                true
            }
        });

        for (det, _) in dets.iter().zip(claimed).filter(|(_, c)| !c) {
            let id = self.next_id;
            self.next_id += 1;

            self.objects.push(TrackedObject::new(
                id,
                frame,
                det.centroid,
                self.config.history_len,
            ));
            upd.spawned.push(id);
        }

        for obj in self.objects.iter_mut().filter(|o| !o.counted) {
            match obj.crossing(self.line_y) {
                Some(dir) if self.config.direction.accepts(dir) => {
                    obj.counted = true;
                    self.total += 1;
                    upd.counted.push(obj.id);

                    info!(
                        "vehicle #{} crossed line y={} going {:?}, total={}",
                        obj.id, self.line_y, dir, self.total
                    );
                }
                _ => {}
            }
        }

        debug!(
            "frame #{}: {} detections, {} matched, {} new, {} evicted, {} tracked",
            frame,
            dets.len(),
            upd.matched,
            upd.spawned.len(),
            upd.evicted.len(),
            self.objects.len()
        );

        self.frame += 1;
        upd.total = self.total;

        upd
    }

    /// Same as `update`, checking the frame belongs to this stream.
    pub fn update_frame(&mut self, frame: &Frame) -> Result<CountUpdate, Error> {
        if frame.dims != self.dims {
            return Err(Error::FrameSizeMismatch {
                expected: self.dims,
                actual: frame.dims,
            });
        }

        Ok(self.update(&frame.detections))
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn line_y(&self) -> i32 {
        self.line_y
    }

    #[inline]
    pub fn dims(&self) -> (u32, u32) {
        self.dims
    }

    #[inline]
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Number of frames processed so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn tracks(&self) -> Vec<Track> {
        self.objects.iter().map(Into::into).collect()
    }

    pub fn track(&self, id: u64) -> Option<Track> {
        self.objects
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|i| (&self.objects[i]).into())
    }
}
