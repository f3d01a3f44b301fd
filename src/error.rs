use thiserror::Error;

/// Errors raised by the bead pattern pipeline.
///
/// Only `InvalidInput` can originate in the core stages; the decode and
/// encode variants belong to the byte-level glue around them.
#[derive(Debug, Error)]
pub enum BeadError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unable to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("PNG encode error: {0}")]
    Encode(#[source] image::ImageError),
}

impl BeadError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BeadError::InvalidInput(msg.into())
    }
}
