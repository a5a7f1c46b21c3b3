use crate::error::{ProbeError, Result};
use crate::header::Header;
use crate::types::{Dimensions, ImageFormat};

pub const MIN_SIZE: u64 = 16;
pub const FLIF_MAGIC: &[u8; 4] = b"FLIF";

const VARINT_START: usize = 6;
const VALUE_MASK: u8 = 0x7F;
const CONTINUATION_BIT: u8 = 0x80;

#[inline]
pub fn detect(header: &Header) -> bool {
    header.total_size() >= MIN_SIZE && header.starts_with(FLIF_MAGIC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// The input ended while the continuation bit was still set.
    Unterminated,
    /// The value does not fit in 32 bits.
    Overflow,
}

/// Decodes one big-endian base-128 varint, returning the value and the
/// number of bytes consumed.
pub fn read_varint(data: &[u8]) -> std::result::Result<(u32, usize), VarintError> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        value = (value << 7) | u64::from(byte & VALUE_MASK);
        if value > u64::from(u32::MAX) {
            return Err(VarintError::Overflow);
        }
        if byte & CONTINUATION_BIT == 0 {
            return Ok((value as u32, i + 1));
        }
    }
    Err(VarintError::Unterminated)
}

/// Byte 4 packs channel count and interlacing, byte 5 the bytes per
/// channel; neither matters for the dimensions, which follow as two
/// varints storing `width - 1` and `height - 1`.
pub fn parse(header: &Header) -> Result<Dimensions> {
    let bytes = header.as_bytes();
    let tail = bytes.get(VARINT_START..).unwrap_or_default();

    let (width, used) = read_varint(tail).map_err(varint_error)?;
    let (height, _) = read_varint(&tail[used..]).map_err(varint_error)?;

    Dimensions::from_wide(
        ImageFormat::Flif,
        i64::from(width) + 1,
        i64::from(height) + 1,
    )
}

fn varint_error(err: VarintError) -> ProbeError {
    let message = match err {
        VarintError::Unterminated => "dimension varint runs past the header",
        VarintError::Overflow => "dimension varint overflows 32 bits",
    };
    ProbeError::format(ImageFormat::Flif, message)
}
