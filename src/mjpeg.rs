use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::Error;

pub const BOUNDARY: &str = "frame";
pub const CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Writes frames as a `multipart/x-mixed-replace` stream of JPEG parts.
pub struct MjpegWriter<W: Write> {
    inner: W,
    quality: u8,
    buf: Vec<u8>,
    frames: u64,
}

impl<W: Write> MjpegWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_quality(inner, 80)
    }

    pub fn with_quality(inner: W, quality: u8) -> Self {
        Self {
            inner,
            quality: quality.clamp(1, 100),
            buf: Vec::new(),
            frames: 0,
        }
    }

    pub fn write_frame(&mut self, frame: &RgbImage) -> Result<(), Error> {
        self.buf.clear();
        JpegEncoder::new_with_quality(&mut self.buf, self.quality).encode_image(frame)?;

        write!(
            self.inner,
            "--{}\r\nContent-Type: image/jpeg\r\n\r\n",
            BOUNDARY
        )?;
        self.inner.write_all(&self.buf)?;
        self.inner.write_all(b"\r\n")?;
        self.inner.flush()?;

        self.frames += 1;

        Ok(())
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
