//! Hand-built headers and an instrumented byte source shared by the
//! integration tests.

#![allow(dead_code)]

use imgprobe::ByteSource;
use std::cell::Cell;
use std::io;

/// In-memory source that counts every read it serves.
pub struct CountingSource {
    data: Vec<u8>,
    reads: Cell<usize>,
}

impl CountingSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            reads: Cell::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl ByteSource for CountingSource {
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        self.data.read_at(offset, len)
    }

    fn total_size(&self) -> u64 {
        self.data.len() as u64
    }
}

fn pad(mut data: Vec<u8>, len: usize) -> Vec<u8> {
    if data.len() < len {
        data.resize(len, 0);
    }
    data
}

fn riff(chunk: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&((payload.len() + 12) as u32).to_le_bytes());
    data.extend_from_slice(b"WEBP");
    data.extend_from_slice(chunk);
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    pad(data, 32)
}

/// Lossless WebP with raw packed bytes a, b, c, d at offset 21.
pub fn webp_lossless(packed: [u8; 4]) -> Vec<u8> {
    let mut payload = vec![0x2F];
    payload.extend_from_slice(&packed);
    riff(b"VP8L", &payload)
}

/// Lossy WebP with raw (possibly scale-flagged) 16-bit width and height.
pub fn webp_lossy(width: u16, height: u16) -> Vec<u8> {
    let mut payload = vec![0x10, 0x02, 0x00, 0x9D, 0x01, 0x2A];
    payload.extend_from_slice(&width.to_le_bytes());
    payload.extend_from_slice(&height.to_le_bytes());
    riff(b"VP8 ", &payload)
}

pub fn webp_extended(width: u32, height: u32) -> Vec<u8> {
    let mut payload = vec![0x10, 0, 0, 0];
    payload.extend_from_slice(&(width - 1).to_le_bytes()[..3]);
    payload.extend_from_slice(&(height - 1).to_le_bytes()[..3]);
    riff(b"VP8X", &payload)
}

/// Encodes `value` as a big-endian base-128 varint.
pub fn varint(mut value: u32) -> Vec<u8> {
    let mut groups = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    groups.reverse();
    groups
}

pub fn flif(width: u32, height: u32) -> Vec<u8> {
    let mut data = b"FLIF".to_vec();
    data.push(0x43);
    data.push(b'1');
    data.extend(varint(width - 1));
    data.extend(varint(height - 1));
    pad(data, 20)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data.extend_from_slice(&[0; 4]);
    data
}

pub fn gif(version: &[u8; 6], width: u16, height: u16) -> Vec<u8> {
    let mut data = version.to_vec();
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&[0xF7, 0x00, 0x00]);
    data
}

/// SOI, one APP0 segment with two filler bytes, then SOF0.
pub fn jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0xAA, 0xBB];
    data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[0x03, 0x01, 0x22, 0x00]);
    data
}

pub fn bmp_info(width: i32, height: i32) -> Vec<u8> {
    let mut data = b"BM".to_vec();
    data.extend_from_slice(&[0; 12]);
    data.extend_from_slice(&40u32.to_le_bytes());
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    pad(data, 54)
}

pub fn bmp_core(width: u16, height: u16) -> Vec<u8> {
    let mut data = b"BM".to_vec();
    data.extend_from_slice(&[0; 12]);
    data.extend_from_slice(&12u32.to_le_bytes());
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    pad(data, 26)
}

/// One TIFF directory entry: tag, type, count and the raw value field.
pub struct Entry {
    pub tag: u16,
    pub field_type: u16,
    pub value: [u8; 4],
}

impl Entry {
    pub fn short(tag: u16, value: u16, big_endian: bool) -> Self {
        let bytes = if big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        Self {
            tag,
            field_type: 3,
            value: [bytes[0], bytes[1], 0, 0],
        }
    }

    pub fn long(tag: u16, value: u32, big_endian: bool) -> Self {
        Self {
            tag,
            field_type: 4,
            value: if big_endian {
                value.to_be_bytes()
            } else {
                value.to_le_bytes()
            },
        }
    }
}

/// TIFF with its first directory at offset 8 followed by `extra` bytes.
pub fn tiff(big_endian: bool, entries: &[Entry], extra: &[u8]) -> Vec<u8> {
    let u16b = |v: u16| {
        if big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    };
    let u32b = |v: u32| {
        if big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    };

    let mut data = if big_endian {
        vec![b'M', b'M', 0x00, 0x2A]
    } else {
        vec![b'I', b'I', 0x2A, 0x00]
    };
    data.extend_from_slice(&u32b(8));
    data.extend_from_slice(&u16b(entries.len() as u16));
    for entry in entries {
        data.extend_from_slice(&u16b(entry.tag));
        data.extend_from_slice(&u16b(entry.field_type));
        data.extend_from_slice(&u32b(1));
        data.extend_from_slice(&entry.value);
    }
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(extra);
    data
}

/// Offset of the first byte after the directory built by [`tiff`].
pub fn tiff_tail_offset(entry_count: usize) -> u32 {
    (8 + 2 + entry_count * 12 + 4) as u32
}

pub fn ico(width: u8, height: u8) -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x01, 0x00, 0x01, 0x00];
    data.extend_from_slice(&[width, height, 0, 0, 1, 0, 32, 0]);
    data.extend_from_slice(&[0; 8]);
    data
}
