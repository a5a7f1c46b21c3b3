//! Captured header prefix.

use std::io;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{ProbeError, Result};
use crate::io::ByteSource;
use crate::types::{ImageFormat, PREFIX_LEN};

/// The leading bytes of a source together with the source's total size.
///
/// Read once per probe and shared by every detector, so no detector ever
/// issues its own read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    bytes: Vec<u8>,
    total_size: u64,
}

impl Header {
    pub fn read<S: ByteSource + ?Sized>(source: &S) -> io::Result<Self> {
        let total_size = source.total_size();
        let bytes = source.read_prefix(PREFIX_LEN)?;
        Ok(Self { bytes, total_size })
    }

    /// Builds a header from bytes already in hand; anything past
    /// [`PREFIX_LEN`] is dropped.
    pub fn from_parts(bytes: &[u8], total_size: u64) -> Self {
        let len = bytes.len().min(PREFIX_LEN);
        Self {
            bytes: bytes[..len].to_vec(),
            total_size,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    #[inline]
    pub fn starts_with(&self, magic: &[u8]) -> bool {
        self.bytes.starts_with(magic)
    }

    /// True when `pattern` appears verbatim at `offset`.
    #[inline]
    pub fn matches_at(&self, offset: usize, pattern: &[u8]) -> bool {
        self.bytes
            .get(offset..offset + pattern.len())
            .is_some_and(|window| window == pattern)
    }

    pub(crate) fn fields(&self, format: ImageFormat) -> Fields<'_> {
        Fields {
            bytes: &self.bytes,
            format,
        }
    }
}

/// Bounds-checked field access that reports truncation as a malformed
/// header of `format`.
pub(crate) struct Fields<'a> {
    bytes: &'a [u8],
    format: ImageFormat,
}

impl Fields<'_> {
    pub(crate) fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        self.bytes
            .get(offset..)
            .and_then(|tail| tail.get(..N))
            .and_then(|window| window.try_into().ok())
            .ok_or_else(|| {
                ProbeError::format(
                    self.format,
                    format!(
                        "header truncated: need {N} bytes at offset {offset}, have {}",
                        self.bytes.len()
                    ),
                )
            })
    }

    #[inline]
    pub(crate) fn u8(&self, offset: usize) -> Result<u8> {
        self.array::<1>(offset).map(|[b]| b)
    }

    #[inline]
    pub(crate) fn le_u16(&self, offset: usize) -> Result<u16> {
        self.array::<2>(offset).map(|raw| LittleEndian::read_u16(&raw))
    }

    #[inline]
    pub(crate) fn le_u32(&self, offset: usize) -> Result<u32> {
        self.array::<4>(offset).map(|raw| LittleEndian::read_u32(&raw))
    }

    #[inline]
    pub(crate) fn le_i32(&self, offset: usize) -> Result<i32> {
        self.array::<4>(offset).map(|raw| LittleEndian::read_i32(&raw))
    }

    #[inline]
    pub(crate) fn be_u32(&self, offset: usize) -> Result<u32> {
        self.array::<4>(offset).map(|raw| BigEndian::read_u32(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_caps_prefix() {
        let header = Header::from_parts(&[0xAB; 64], 64);
        assert_eq!(header.as_bytes().len(), PREFIX_LEN);
        assert_eq!(header.total_size(), 64);
    }

    #[test]
    fn matches_at_out_of_bounds() {
        let header = Header::from_parts(b"GIF8", 4);
        assert!(header.matches_at(0, b"GIF"));
        assert!(!header.matches_at(2, b"F89a"));
    }

    #[test]
    fn fields_report_truncation() {
        let header = Header::from_parts(&[1, 2, 3], 3);
        let fields = header.fields(ImageFormat::Gif);
        assert_eq!(fields.le_u16(1).unwrap(), 0x0302);
        let err = fields.le_u16(2).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn fields_decode_byte_order() {
        let header = Header::from_parts(&[0x00, 0x00, 0x01, 0x2C, 0xFF, 0xFF, 0xFF, 0xFF], 8);
        let fields = header.fields(ImageFormat::Bmp);
        assert_eq!(fields.be_u32(0).unwrap(), 300);
        assert_eq!(fields.le_u32(0).unwrap(), 0x2C01_0000);
        assert_eq!(fields.le_i32(4).unwrap(), -1);
    }
}
