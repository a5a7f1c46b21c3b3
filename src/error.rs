use std::io;
use thiserror::Error;

use crate::types::ImageFormat;

/// Errors that can occur while probing an image header
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Unknown image format")]
    UnknownFormat,

    #[error("Malformed {format} header: {message}")]
    Format {
        format: ImageFormat,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ProbeError {
    pub(crate) fn format(format: ImageFormat, message: impl Into<String>) -> Self {
        ProbeError::Format {
            format,
            message: message.into(),
        }
    }

    /// Returns true when the input was recognised but its header is broken
    pub fn is_malformed(&self) -> bool {
        matches!(self, ProbeError::Format { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
