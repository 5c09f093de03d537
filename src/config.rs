use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::annotate::AnnotateConfig;
use crate::background::BackgroundConfig;
use crate::counter::CounterConfig;
use crate::detector::BlobDetectorConfig;
use crate::error::Error;

/// Settings of a whole stream. Every section and field is optional in the
/// JSON form and falls back to its default.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub background: BackgroundConfig,
    pub detector: BlobDetectorConfig,
    pub counter: CounterConfig,
    pub annotate: AnnotateConfig,
    /// Counting line row; half the frame height when unset
    pub line_y: Option<i32>,
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;

        Self::from_json(&text)
    }
}
