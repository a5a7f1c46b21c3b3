use crate::error::Result;
use crate::header::Header;
use crate::types::{Dimensions, ImageFormat};

/// `ICONDIR`: reserved, type and image count, two bytes each.
pub const MIN_SIZE: u64 = 6;

pub const TYPE_ICON: u16 = 1;
pub const TYPE_CURSOR: u16 = 2;

pub fn detect(header: &Header) -> bool {
    if header.total_size() < MIN_SIZE {
        return false;
    }
    let fields = header.fields(ImageFormat::Ico);
    matches!(
        (fields.le_u16(0), fields.le_u16(2)),
        (Ok(0), Ok(TYPE_ICON))
    )
}

/// Width and height of the first directory entry.
///
/// The raw bytes are reported as stored. A stored 0 means 256 pixels by
/// convention, but it is not remapped here and fails the non-zero check.
pub fn parse(header: &Header) -> Result<Dimensions> {
    let fields = header.fields(ImageFormat::Ico);
    let width = fields.u8(6)?;
    let height = fields.u8(7)?;
    Dimensions::checked(ImageFormat::Ico, width.into(), height.into())
}
