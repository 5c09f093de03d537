use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Counting line y={line_y} is outside of frame height {height}")]
    LineOutOfBounds { line_y: i32, height: u32 },

    #[error("Frame has no pixels: {0}x{1}")]
    EmptyFrame(u32, u32),

    #[error("Frame size changed mid-stream: expected {expected:?}, got {actual:?}")]
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Track history must hold 2 to {max} points, got {len}")]
    HistoryLength { len: usize, max: usize },

    #[error("Unknown counting direction: {0}")]
    UnknownDirection(String),

    #[error("Image Error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
}
