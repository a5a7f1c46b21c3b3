use byteorder::{ByteOrder, LittleEndian};
use tracing::trace;

use super::read_array;
use crate::error::{ProbeError, Result};
use crate::header::Header;
use crate::io::ByteSource;
use crate::types::{Dimensions, ImageFormat};

pub const MIN_SIZE: u64 = 24;

pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const WEBP_MAGIC: &[u8; 4] = b"WEBP";

pub const CHUNK_LOSSY: &[u8; 4] = b"VP8 ";
pub const CHUNK_LOSSLESS: &[u8; 4] = b"VP8L";
pub const CHUNK_EXTENDED: &[u8; 4] = b"VP8X";

pub const VP8_START_CODE: [u8; 3] = [0x9D, 0x01, 0x2A];

const VP8_DIMENSION_MASK: u16 = 0x3FFF;

const VP8L_DIMENSIONS_OFFSET: usize = 21;
const VP8_START_CODE_OFFSET: usize = 23;
const VP8_DIMENSIONS_OFFSET: u64 = 26;
const VP8X_CANVAS_OFFSET: u64 = 24;

#[inline]
pub fn detect(header: &Header) -> bool {
    header.total_size() >= MIN_SIZE
        && header.starts_with(RIFF_MAGIC)
        && header.matches_at(8, WEBP_MAGIC)
}

pub fn parse<S: ByteSource + ?Sized>(source: &S, header: &Header) -> Result<Dimensions> {
    let fields = header.fields(ImageFormat::WebP);
    let chunk: [u8; 4] = fields.array(12)?;

    let (width, height) = match &chunk {
        CHUNK_LOSSLESS => {
            let packed = fields.array(VP8L_DIMENSIONS_OFFSET)?;
            lossless_dimensions(packed)
        }
        CHUNK_LOSSY => {
            let start_code: [u8; 3] = fields.array(VP8_START_CODE_OFFSET)?;
            if start_code != VP8_START_CODE {
                return Err(ProbeError::format(
                    ImageFormat::WebP,
                    format!("bad VP8 start code {start_code:02X?}"),
                ));
            }
            let raw = read_array::<4, _>(source, VP8_DIMENSIONS_OFFSET, ImageFormat::WebP)?;
            lossy_dimensions(raw)
        }
        CHUNK_EXTENDED => {
            let raw = read_array::<6, _>(source, VP8X_CANVAS_OFFSET, ImageFormat::WebP)?;
            extended_dimensions(raw)
        }
        other => {
            return Err(ProbeError::format(
                ImageFormat::WebP,
                format!(
                    "unsupported WebP variant {:?}",
                    String::from_utf8_lossy(other)
                ),
            ));
        }
    };

    trace!(
        chunk = %String::from_utf8_lossy(&chunk),
        width,
        height,
        "decoded WebP dimensions"
    );
    Dimensions::checked(ImageFormat::WebP, width, height)
}

/// Unpacks the 14-bit `width - 1` and `height - 1` fields that follow
/// the VP8L signature byte.
#[inline]
pub fn lossless_dimensions([a, b, c, d]: [u8; 4]) -> (u32, u32) {
    let (a, b, c, d) = (u32::from(a), u32::from(b), u32::from(c), u32::from(d));
    let width = 1 + (((b & 0x07) << 8) | a);
    let height = 1 + (((d & 0x01) << 10) | (c << 2) | ((b & 0xC0) >> 6));
    (width, height)
}

/// Frame width and height from the two little-endian fields after the
/// start code. The top two bits of each carry the upscaling mode and are
/// masked off.
#[inline]
pub fn lossy_dimensions(raw: [u8; 4]) -> (u32, u32) {
    let width = LittleEndian::read_u16(&raw[0..2]) & VP8_DIMENSION_MASK;
    let height = LittleEndian::read_u16(&raw[2..4]) & VP8_DIMENSION_MASK;
    (width.into(), height.into())
}

/// Canvas size: two little-endian 24-bit `size - 1` fields.
#[inline]
pub fn extended_dimensions(raw: [u8; 6]) -> (u32, u32) {
    let width = LittleEndian::read_u24(&raw[0..3]) + 1;
    let height = LittleEndian::read_u24(&raw[3..6]) + 1;
    (width, height)
}
