//! Per-format detectors and header parsers.
//!
//! Every format exposes a `detect(&Header) -> bool` predicate that only
//! looks at the captured prefix, and a `parse` function that extracts the
//! dimensions, issuing further positioned reads when the prefix is not
//! enough. [`ImageFormat`] ties the pairs together as a closed set.

pub mod bmp;
pub mod flif;
pub mod gif;
pub mod ico;
pub mod jpeg;
pub mod png;
pub mod tiff;
pub mod webp;

use crate::error::{ProbeError, Result};
use crate::header::Header;
use crate::io::ByteSource;
use crate::types::{Dimensions, ImageFormat};

impl ImageFormat {
    /// Checks the prefix against this format's magic bytes.
    pub fn detect(&self, header: &Header) -> bool {
        match self {
            ImageFormat::WebP => webp::detect(header),
            ImageFormat::Flif => flif::detect(header),
            ImageFormat::Png => png::detect(header),
            ImageFormat::Gif => gif::detect(header),
            ImageFormat::Jpeg => jpeg::detect(header),
            ImageFormat::Bmp => bmp::detect(header),
            ImageFormat::Tiff => tiff::detect(header),
            ImageFormat::Ico => ico::detect(header),
        }
    }

    /// Extracts dimensions assuming `detect` already matched.
    pub fn parse<S: ByteSource + ?Sized>(&self, source: &S, header: &Header) -> Result<Dimensions> {
        match self {
            ImageFormat::WebP => webp::parse(source, header),
            ImageFormat::Flif => flif::parse(header),
            ImageFormat::Png => png::parse(header),
            ImageFormat::Gif => gif::parse(header),
            ImageFormat::Jpeg => jpeg::parse(source),
            ImageFormat::Bmp => bmp::parse(header),
            ImageFormat::Tiff => tiff::parse(source, header),
            ImageFormat::Ico => ico::parse(header),
        }
    }
}

/// Positioned fixed-size read. A range past the end of the source is a
/// truncated header rather than an I/O failure.
pub(crate) fn read_array<const N: usize, S: ByteSource + ?Sized>(
    source: &S,
    offset: u64,
    format: ImageFormat,
) -> Result<[u8; N]> {
    let in_bounds = offset
        .checked_add(N as u64)
        .is_some_and(|end| end <= source.total_size());
    if !in_bounds {
        return Err(ProbeError::format(
            format,
            format!("header truncated: need {N} bytes at offset {offset}"),
        ));
    }

    let bytes = source.read_at(offset, N)?;
    bytes.as_slice().try_into().map_err(|_| {
        ProbeError::format(
            format,
            format!("short read: wanted {N} bytes, got {}", bytes.len()),
        )
    })
}
