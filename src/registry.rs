//! Format registry and dispatcher
//!
//! Detection predicates are not disjoint for malformed input, so the
//! order of [`FormatRegistry::STANDARD`] is part of the public contract:
//! the first format whose detector accepts a header wins.

use tracing::debug;

use crate::error::{ProbeError, Result};
use crate::header::Header;
use crate::io::ByteSource;
use crate::types::{Dimensions, ImageFormat};

/// Ordered, immutable list of formats consulted during detection.
#[derive(Debug, Clone, Copy)]
pub struct FormatRegistry {
    formats: &'static [ImageFormat],
}

impl FormatRegistry {
    /// WebP, FLIF, PNG, GIF, JPEG, BMP, TIFF, ICO.
    pub const STANDARD: FormatRegistry = FormatRegistry {
        formats: &[
            ImageFormat::WebP,
            ImageFormat::Flif,
            ImageFormat::Png,
            ImageFormat::Gif,
            ImageFormat::Jpeg,
            ImageFormat::Bmp,
            ImageFormat::Tiff,
            ImageFormat::Ico,
        ],
    };

    #[inline]
    pub fn formats(&self) -> &'static [ImageFormat] {
        self.formats
    }

    /// Returns the first registered format whose detector accepts `header`.
    pub fn detect(&self, header: &Header) -> Option<ImageFormat> {
        self.formats
            .iter()
            .copied()
            .find(|format| format.detect(header))
    }

    /// Reads the prefix once, detects the format and parses it.
    pub fn detect_and_parse<S: ByteSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<(ImageFormat, Dimensions)> {
        let header = Header::read(source)?;
        let format = self.detect(&header).ok_or(ProbeError::UnknownFormat)?;
        debug!(%format, size = header.total_size(), "detected image format");
        let dimensions = format.parse(source, &header)?;
        Ok((format, dimensions))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Detects the format of a captured header using the standard registry.
#[inline]
pub fn detect_format(header: &Header) -> Option<ImageFormat> {
    FormatRegistry::STANDARD.detect(header)
}

/// Detects and parses `source` using the standard registry.
pub fn detect_and_parse<S: ByteSource + ?Sized>(source: &S) -> Result<Dimensions> {
    FormatRegistry::STANDARD
        .detect_and_parse(source)
        .map(|(_, dimensions)| dimensions)
}
