//! Error type shared by the white-balance engine.
//!
//! Numeric degeneracies inside the math resolve to documented fallbacks and
//! never surface here; these variants cover structural preconditions and the
//! few operations whose caller must pick the fallback.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WbError {
    #[error("expected 3 interleaved channels, got {0}")]
    ChannelCount(usize),

    #[error("pixel buffer holds {actual} samples but {width}x{height}x3 needs {expected}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("camera color profile is required on the metadata path")]
    MissingProfile,

    #[error("matrix is singular (determinant {0:e})")]
    SingularMatrix(f64),

    #[error("degenerate white point: {0}")]
    DegenerateWhitePoint(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WbError>;
