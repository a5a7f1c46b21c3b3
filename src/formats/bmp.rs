use crate::error::{ProbeError, Result};
use crate::header::Header;
use crate::types::{Dimensions, ImageFormat};

pub const MIN_SIZE: u64 = 26;

/// `BITMAPCOREHEADER`, with 16-bit unsigned dimensions.
pub const CORE_HEADER_SIZE: u32 = 12;
/// `BITMAPINFOHEADER` and every later variant, with 32-bit signed dimensions.
pub const INFO_HEADER_SIZE: u32 = 40;

const DIB_HEADER_OFFSET: usize = 14;

#[inline]
pub fn detect(header: &Header) -> bool {
    header.total_size() >= MIN_SIZE && header.starts_with(b"BM")
}

pub fn parse(header: &Header) -> Result<Dimensions> {
    let fields = header.fields(ImageFormat::Bmp);
    let header_size = fields.le_u32(DIB_HEADER_OFFSET)?;

    match header_size {
        CORE_HEADER_SIZE => {
            let width = fields.le_u16(18)?;
            let height = fields.le_u16(20)?;
            Dimensions::checked(ImageFormat::Bmp, width.into(), height.into())
        }
        size if size >= INFO_HEADER_SIZE => {
            let width = fields.le_i32(18)?;
            // Top-down bitmaps store a negative height.
            let height = fields.le_i32(22)?.unsigned_abs();
            Dimensions::from_wide(ImageFormat::Bmp, width.into(), height.into())
        }
        size => Err(ProbeError::format(
            ImageFormat::Bmp,
            format!("unsupported BMP header (size {size})"),
        )),
    }
}
