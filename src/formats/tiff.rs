//! TIFF: walks the first Image File Directory for ImageWidth and
//! ImageLength.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::trace;

use super::read_array;
use crate::error::{ProbeError, Result};
use crate::header::Header;
use crate::io::ByteSource;
use crate::types::{Dimensions, ImageFormat};

pub const MIN_SIZE: u64 = 8;

pub const LITTLE_ENDIAN_MAGIC: [u8; 4] = [b'I', b'I', 0x2A, 0x00];
pub const BIG_ENDIAN_MAGIC: [u8; 4] = [b'M', b'M', 0x00, 0x2A];

pub const TAG_IMAGE_WIDTH: u16 = 256;
pub const TAG_IMAGE_LENGTH: u16 = 257;

const IFD_COUNT_SIZE: u64 = 2;
const IFD_ENTRY_SIZE: u64 = 12;
const INLINE_VALUE_SIZE: usize = 4;

#[inline]
pub fn detect(header: &Header) -> bool {
    header.total_size() >= MIN_SIZE
        && (header.starts_with(&LITTLE_ENDIAN_MAGIC) || header.starts_with(&BIG_ENDIAN_MAGIC))
}

/// TIFF 6.0 field types.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
}

impl FieldType {
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => FieldType::Byte,
            2 => FieldType::Ascii,
            3 => FieldType::Short,
            4 => FieldType::Long,
            5 => FieldType::Rational,
            6 => FieldType::SByte,
            7 => FieldType::Undefined,
            8 => FieldType::SShort,
            9 => FieldType::SLong,
            10 => FieldType::SRational,
            11 => FieldType::Float,
            12 => FieldType::Double,
            _ => return None,
        })
    }

    /// Size in bytes of a single value.
    pub fn size(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Decodes the first value in `raw` as an integer. Rationals are
    /// divided out and floats truncated toward zero.
    pub fn decode<B: ByteOrder>(self, raw: [u8; 8]) -> Option<i64> {
        let value = match self {
            FieldType::Byte | FieldType::Ascii | FieldType::Undefined => i64::from(raw[0]),
            FieldType::SByte => i64::from(raw[0] as i8),
            FieldType::Short => i64::from(B::read_u16(&raw)),
            FieldType::SShort => i64::from(B::read_i16(&raw)),
            FieldType::Long => i64::from(B::read_u32(&raw)),
            FieldType::SLong => i64::from(B::read_i32(&raw)),
            FieldType::Rational => {
                let numerator = i64::from(B::read_u32(&raw[0..4]));
                let denominator = i64::from(B::read_u32(&raw[4..8]));
                numerator.checked_div(denominator)?
            }
            FieldType::SRational => {
                let numerator = i64::from(B::read_i32(&raw[0..4]));
                let denominator = i64::from(B::read_i32(&raw[4..8]));
                numerator.checked_div(denominator)?
            }
            FieldType::Float => truncate(f64::from(B::read_f32(&raw)))?,
            FieldType::Double => truncate(B::read_f64(&raw))?,
        };
        Some(value)
    }
}

fn truncate(value: f64) -> Option<i64> {
    (value.is_finite() && value.abs() < i64::MAX as f64).then_some(value as i64)
}

pub fn parse<S: ByteSource + ?Sized>(source: &S, header: &Header) -> Result<Dimensions> {
    let ifd_offset = header.fields(ImageFormat::Tiff).array::<4>(4)?;
    if header.starts_with(&BIG_ENDIAN_MAGIC) {
        walk_directory::<BigEndian, S>(source, BigEndian::read_u32(&ifd_offset))
    } else {
        walk_directory::<LittleEndian, S>(source, LittleEndian::read_u32(&ifd_offset))
    }
}

/// Scans the entries of the directory at `ifd_offset`, decoding every
/// field in byte order `B`.
fn walk_directory<B: ByteOrder, S: ByteSource + ?Sized>(
    source: &S,
    ifd_offset: u32,
) -> Result<Dimensions> {
    let ifd_offset = u64::from(ifd_offset);
    let count: [u8; 2] = read_array(source, ifd_offset, ImageFormat::Tiff)?;
    let entry_count = B::read_u16(&count);
    trace!(ifd_offset, entry_count, "TIFF directory");

    let mut width = None;
    let mut height = None;

    for index in 0..u64::from(entry_count) {
        let entry_offset = ifd_offset + IFD_COUNT_SIZE + index * IFD_ENTRY_SIZE;
        let entry: [u8; 12] = read_array(source, entry_offset, ImageFormat::Tiff)?;

        let tag = B::read_u16(&entry[0..2]);
        if tag != TAG_IMAGE_WIDTH && tag != TAG_IMAGE_LENGTH {
            continue;
        }

        let type_code = B::read_u16(&entry[2..4]);
        let field_type = FieldType::from_code(type_code).ok_or_else(|| {
            ProbeError::format(
                ImageFormat::Tiff,
                format!("unsupported field type {type_code} for tag {tag}"),
            )
        })?;
        let value = read_value::<B, S>(source, field_type, &entry)?;
        trace!(tag, ?field_type, value, "TIFF dimension entry");

        if tag == TAG_IMAGE_WIDTH {
            width = Some(value);
        } else {
            height = Some(value);
        }

        if let (Some(width), Some(height)) = (width, height) {
            return Dimensions::from_wide(ImageFormat::Tiff, width, height);
        }
    }

    let missing = if width.is_none() {
        "ImageWidth"
    } else {
        "ImageLength"
    };
    Err(ProbeError::format(
        ImageFormat::Tiff,
        format!("first directory has no {missing} entry"),
    ))
}

/// Values up to four bytes sit left-justified in the entry itself;
/// larger ones live at the offset stored there.
fn read_value<B: ByteOrder, S: ByteSource + ?Sized>(
    source: &S,
    field_type: FieldType,
    entry: &[u8; 12],
) -> Result<i64> {
    let mut raw = [0u8; 8];
    if field_type.size() <= INLINE_VALUE_SIZE {
        raw[..INLINE_VALUE_SIZE].copy_from_slice(&entry[8..12]);
    } else {
        let offset = u64::from(B::read_u32(&entry[8..12]));
        raw = read_array(source, offset, ImageFormat::Tiff)?;
    }

    field_type.decode::<B>(raw).ok_or_else(|| {
        ProbeError::format(
            ImageFormat::Tiff,
            format!("{field_type:?} value cannot be represented as a dimension"),
        )
    })
}
