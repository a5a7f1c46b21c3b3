//! Byte sources
//!
//! Defines the positioned-read interface the format parsers consume,
//! together with adapters for files, memory maps and in-memory buffers.
//! The prober never opens or closes anything itself: a caller hands it a
//! source and keeps ownership of it.

use memmap2::Mmap;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Random-access, read-only view of an image's bytes.
///
/// Implementations must return exactly `len` bytes from `read_at` or an
/// error; a range that runs past `total_size` is reported as
/// [`io::ErrorKind::UnexpectedEof`].
///
/// # Example
///
/// ```
/// use imgprobe::io::ByteSource;
///
/// let data = vec![0x47, 0x49, 0x46, 0x38, 0x39, 0x61];
/// assert_eq!(data.total_size(), 6);
/// assert_eq!(data.read_at(3, 3).unwrap(), b"89a");
/// ```
pub trait ByteSource {
    /// Reads `len` bytes starting at byte `offset`
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>>;

    /// Returns the total size in bytes
    fn total_size(&self) -> u64;

    /// Reads up to `n` leading bytes; shorter sources yield everything
    fn read_prefix(&self, n: usize) -> io::Result<Vec<u8>> {
        let available = usize::try_from(self.total_size()).unwrap_or(usize::MAX);
        self.read_at(0, n.min(available))
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    #[inline]
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        (**self).read_at(offset, len)
    }

    #[inline]
    fn total_size(&self) -> u64 {
        (**self).total_size()
    }

    #[inline]
    fn read_prefix(&self, n: usize) -> io::Result<Vec<u8>> {
        (**self).read_prefix(n)
    }
}

impl ByteSource for [u8] {
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        slice_range(self, offset, len).map(<[u8]>::to_vec)
    }

    #[inline]
    fn total_size(&self) -> u64 {
        self.len() as u64
    }
}

impl ByteSource for Vec<u8> {
    #[inline]
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        self.as_slice().read_at(offset, len)
    }

    #[inline]
    fn total_size(&self) -> u64 {
        self.len() as u64
    }
}

fn slice_range(data: &[u8], offset: u64, len: usize) -> io::Result<&[u8]> {
    usize::try_from(offset)
        .ok()
        .and_then(|start| Some(start..start.checked_add(len)?))
        .and_then(|range| data.get(range))
        .ok_or_else(|| out_of_range(offset, len, data.len() as u64))
}

fn out_of_range(offset: u64, len: usize, size: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("read of {len} bytes at offset {offset} exceeds source size {size}"),
    )
}

/// File-backed source.
///
/// Seek-then-read pairs are serialized behind a mutex so a shared
/// `&FileSource` stays consistent across threads.
pub struct FileSource {
    file: Mutex<File>,
    path: PathBuf,
    size: u64,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).open(path)?;
        Self::from_file(file, path)
    }

    /// Wraps an already opened file. The file's cursor is left wherever
    /// the last read put it.
    pub fn from_file(mut file: File, path: impl Into<PathBuf>) -> io::Result<Self> {
        let metadata = file.metadata()?;
        let size = if metadata.is_file() {
            metadata.len()
        } else {
            let size = file.seek(SeekFrom::End(0))?;
            file.seek(SeekFrom::Start(0))?;
            size
        };

        Ok(Self {
            file: Mutex::new(file),
            path: path.into(),
            size,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        if offset.checked_add(len as u64).is_none_or(|end| end > self.size) {
            return Err(out_of_range(offset, len, self.size));
        }

        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("file source lock poisoned"))?;
        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    #[inline]
    fn total_size(&self) -> u64 {
        self.size
    }
}

/// Memory-mapped source: zero-copy slicing, no locking.
pub struct MmapSource {
    mmap: Option<Mmap>,
    path: PathBuf,
}

impl MmapSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).open(path)?;

        // Mapping a zero-length file fails on some platforms.
        let mmap = if file.metadata()?.len() == 0 {
            None
        } else {
            // SAFETY: the map is read-only; callers must not truncate the file
            // while the source is alive.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
        })
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for MmapSource {
    #[inline]
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        self.as_slice().read_at(offset, len)
    }

    #[inline]
    fn total_size(&self) -> u64 {
        self.as_slice().len() as u64
    }
}
