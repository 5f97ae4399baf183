use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QuantizeError {
    #[error("image has no pixels to quantize")]
    EmptyInput,

    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("cannot split {available} distinct colors into {requested} clusters")]
    InvalidColorCount { requested: usize, available: usize },

    #[error("gaussian mask size must be odd and positive, got {0}")]
    InvalidMaskSize(usize),

    #[error("gaussian sigma must be finite and positive, got {0}")]
    InvalidSigma(f64),
}
