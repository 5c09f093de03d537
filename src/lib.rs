pub mod annotate;
pub mod background;
pub mod bbox;
pub mod config;
pub mod counter;
pub mod detection;
pub mod detector;
pub mod error;
pub mod frame;
pub mod mjpeg;
pub mod pipeline;
pub mod source;

mod history;
mod track;
mod tracker;

pub use counter::{CountDirection, CountUpdate, CounterConfig, VehicleCounter};
pub use detection::Detection;
pub use frame::Frame;
pub use track::{Track, TrackState};
pub use tracker::Crossing;

use error::Error;
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

pub trait Counting {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<CountUpdate, Error>;
    fn total(&self, src: &str) -> u64;
    fn tracks(&self, src: &str) -> Rc<[Track]>;
}

/// Independent counters for several camera streams, keyed by source name.
pub struct CounterRegistry {
    config: CounterConfig,
    counters: HashMap<String, VehicleCounter>,
}

impl CounterRegistry {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            counters: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, src: &str) -> Option<&VehicleCounter> {
        self.counters.get(src)
    }

    /// Drops a finished stream, returning its counter.
    pub fn remove(&mut self, src: &str) -> Option<VehicleCounter> {
        self.counters.remove(src)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

impl Default for CounterRegistry {
    fn default() -> Self {
        Self::new(CounterConfig::default())
    }
}

impl Counting for CounterRegistry {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<CountUpdate, Error> {
        let counter = match self.counters.entry(src.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                debug!("creating vehicle counter for {} {:?}", src, frame.dims);

                e.insert(VehicleCounter::centered(frame.dims, self.config.clone())?)
            }
        };

        counter.update_frame(frame)
    }

    #[inline]
    fn total(&self, src: &str) -> u64 {
        self.counters.get(src).map_or(0, |c| c.total())
    }

    #[inline]
    fn tracks(&self, src: &str) -> Rc<[Track]> {
        if let Some(counter) = self.counters.get(src) {
            return counter.tracks().into_boxed_slice().into();
        }

        Rc::new([])
    }
}
