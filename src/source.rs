use std::path::{Path, PathBuf};

use image::RgbImage;
use log::{debug, info};

use crate::error::Error;

/// Ordered supply of frames for one stream.
pub trait FrameSource {
    /// Next frame in capture order, `Ok(None)` once the stream has ended.
    fn read(&mut self) -> Result<Option<RgbImage>, Error>;
}

/// Address of a camera feed on the traffic camera network.
pub fn feed_url(server: &str, camera: &str) -> String {
    format!("rtmp://8.15.251.{}:1935/rtplive/R3_{}", server, camera)
}

const EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "ppm"];

/// Frames decoded from the image files of a directory, in file name order.
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequence {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);

            if is_image && path.is_file() {
                paths.push(path);
            }
        }

        paths.sort();
        info!("{} frames in {}", paths.len(), dir.as_ref().display());

        Ok(Self { paths, next: 0 })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequence {
    fn read(&mut self) -> Result<Option<RgbImage>, Error> {
        let path = match self.paths.get(self.next) {
            Some(p) => p,
            None => return Ok(None),
        };
        self.next += 1;

        debug!("reading {}", path.display());

        Ok(Some(image::open(path)?.to_rgb8()))
    }
}

/// Adapts any iterator of frames, e.g. frames produced in memory.
pub struct Frames<I>(pub I);

impl<I: Iterator<Item = RgbImage>> FrameSource for Frames<I> {
    #[inline]
    fn read(&mut self) -> Result<Option<RgbImage>, Error> {
        Ok(self.0.next())
    }
}
