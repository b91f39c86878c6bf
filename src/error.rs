//! Error type for the WBWT codec.
//!
//! Only decoding can fail. Compression of in-range text is infallible, so
//! the encode side of the pipeline returns plain values.

use thiserror::Error;

/// Errors surfaced while decoding a WBWT frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The buffer does not start with the WBWT magic number.
    #[error("invalid magic number")]
    InvalidMagic,

    /// The container version is not one this decoder understands.
    #[error("unsupported container version: {0}")]
    UnsupportedVersion(u32),

    /// The frame is structurally damaged: a field overruns the buffer, a
    /// count disagrees with the decoded data, or a decoded stream cannot be
    /// mapped back through the pipeline.
    #[error("corrupt frame: {0}")]
    CorruptFrame(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
