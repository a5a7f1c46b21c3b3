use byteorder::{BigEndian, ByteOrder};
use tracing::trace;

use crate::error::{ProbeError, Result};
use crate::header::Header;
use crate::io::ByteSource;
use crate::types::{Dimensions, ImageFormat};

pub const MIN_SIZE: u64 = 2;
pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

pub const MARKER_PREFIX: u8 = 0xFF;
pub const MARKER_TEM: u8 = 0x01;
pub const MARKER_EOI: u8 = 0xD9;
pub const MARKER_SOS: u8 = 0xDA;

const SCAN_WINDOW: usize = 4096;

#[inline]
pub fn detect(header: &Header) -> bool {
    header.total_size() >= MIN_SIZE && header.starts_with(&JPEG_SOI)
}

/// Baseline, extended sequential, progressive and lossless frame headers.
#[inline]
pub fn is_sof_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3)
}

/// Markers that stand alone without a length field.
#[inline]
pub fn is_standalone_marker(marker: u8) -> bool {
    matches!(marker, MARKER_TEM | 0xD0..=0xD7)
}

/// Walks the marker segments after SOI until the first SOF0..SOF3 frame
/// header, which stores height before width.
pub fn parse<S: ByteSource + ?Sized>(source: &S) -> Result<Dimensions> {
    let mut cursor = SegmentCursor::new(source, JPEG_SOI.len() as u64);

    loop {
        let marker = cursor.next_marker()?;
        trace!(marker, offset = cursor.position(), "JPEG marker");

        if is_sof_marker(marker) {
            // Segment length (2) and sample precision (1).
            cursor.skip(3)?;
            let height = cursor.be_u16()?;
            let width = cursor.be_u16()?;
            return Dimensions::checked(ImageFormat::Jpeg, width.into(), height.into());
        }

        match marker {
            MARKER_SOS | MARKER_EOI => {
                return Err(ProbeError::format(
                    ImageFormat::Jpeg,
                    format!("reached marker {marker:#04X} before a frame header"),
                ));
            }
            m if is_standalone_marker(m) => continue,
            _ => {
                let length = cursor.be_u16()?;
                if length < 2 {
                    return Err(ProbeError::format(
                        ImageFormat::Jpeg,
                        format!("segment {marker:#04X} has invalid length {length}"),
                    ));
                }
                cursor.skip(u64::from(length) - 2)?;
            }
        }
    }
}

/// Forward-only reader over a byte source that fetches in fixed windows,
/// so a marker scan costs one read per window rather than one per byte.
struct SegmentCursor<'a, S: ?Sized> {
    source: &'a S,
    size: u64,
    window: Vec<u8>,
    window_start: u64,
    pos: u64,
}

impl<'a, S: ByteSource + ?Sized> SegmentCursor<'a, S> {
    fn new(source: &'a S, pos: u64) -> Self {
        Self {
            source,
            size: source.total_size(),
            window: Vec::new(),
            window_start: pos,
            pos,
        }
    }

    #[inline]
    fn position(&self) -> u64 {
        self.pos
    }

    fn read_u8(&mut self) -> Result<u8> {
        let window_end = self.window_start + self.window.len() as u64;
        if self.pos < self.window_start || self.pos >= window_end {
            self.refill()?;
        }
        let byte = self.window[(self.pos - self.window_start) as usize];
        self.pos += 1;
        Ok(byte)
    }

    fn refill(&mut self) -> Result<()> {
        if self.pos >= self.size {
            return Err(ProbeError::format(
                ImageFormat::Jpeg,
                "marker stream ended before a frame header",
            ));
        }
        let len = (self.size - self.pos).min(SCAN_WINDOW as u64) as usize;
        self.window = self.source.read_at(self.pos, len)?;
        self.window_start = self.pos;
        if self.window.is_empty() {
            return Err(ProbeError::format(ImageFormat::Jpeg, "empty read"));
        }
        Ok(())
    }

    fn be_u16(&mut self) -> Result<u16> {
        let raw = [self.read_u8()?, self.read_u8()?];
        Ok(BigEndian::read_u16(&raw))
    }

    fn skip(&mut self, n: u64) -> Result<()> {
        self.pos = self.pos.saturating_add(n);
        if self.pos > self.size {
            return Err(ProbeError::format(
                ImageFormat::Jpeg,
                "segment runs past the end of the stream",
            ));
        }
        Ok(())
    }

    /// Advances to the next `0xFF`, swallows fill bytes and returns the
    /// marker code that follows.
    fn next_marker(&mut self) -> Result<u8> {
        let mut byte = self.read_u8()?;
        while byte != MARKER_PREFIX {
            byte = self.read_u8()?;
        }
        while byte == MARKER_PREFIX {
            byte = self.read_u8()?;
        }
        Ok(byte)
    }
}
