use crate::error::Result;
use crate::header::Header;
use crate::types::{Dimensions, ImageFormat};

pub const MIN_SIZE: u64 = 24;

#[inline]
pub fn detect(header: &Header) -> bool {
    header.total_size() >= MIN_SIZE
        && header.matches_at(1, b"PNG")
        && header.matches_at(12, b"IHDR")
}

pub fn parse(header: &Header) -> Result<Dimensions> {
    let fields = header.fields(ImageFormat::Png);
    let width = fields.be_u32(16)?;
    let height = fields.be_u32(20)?;
    Dimensions::checked(ImageFormat::Png, width, height)
}
