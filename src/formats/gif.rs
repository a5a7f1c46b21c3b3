use crate::error::Result;
use crate::header::Header;
use crate::types::{Dimensions, ImageFormat};

pub const MIN_SIZE: u64 = 10;

pub const GIF87A: &[u8; 6] = b"GIF87a";
pub const GIF89A: &[u8; 6] = b"GIF89a";

#[inline]
pub fn detect(header: &Header) -> bool {
    header.total_size() >= MIN_SIZE && (header.starts_with(GIF87A) || header.starts_with(GIF89A))
}

/// Logical screen width and height, little-endian at offsets 6 and 8.
pub fn parse(header: &Header) -> Result<Dimensions> {
    let fields = header.fields(ImageFormat::Gif);
    let width = fields.le_u16(6)?;
    let height = fields.le_u16(8)?;
    Dimensions::checked(ImageFormat::Gif, width.into(), height.into())
}
