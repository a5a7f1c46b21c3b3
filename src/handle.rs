use std::fmt;

use tracing::debug;

use crate::error::{ProbeError, Result};
use crate::header::Header;
use crate::io::ByteSource;
use crate::registry::FormatRegistry;
use crate::types::{Dimensions, ImageFormat};

/// A byte source bound to its detected format and lazily computed
/// dimensions.
///
/// Construction reads the header prefix and runs detection; the first
/// successful call to [`ImageHandle::dimensions`] parses and caches the
/// result, and later calls never touch the source again.
///
/// # Example
///
/// ```
/// use imgprobe::{ImageFormat, ImageHandle};
///
/// let gif = b"GIF89a\x40\x01\xF0\x00".to_vec();
/// let mut handle = ImageHandle::new(&gif).unwrap();
/// assert_eq!(handle.format(), ImageFormat::Gif);
/// let dims = handle.dimensions().unwrap();
/// assert_eq!((dims.width(), dims.height()), (320, 240));
/// ```
pub struct ImageHandle<'a, S: ?Sized> {
    source: &'a S,
    header: Header,
    format: ImageFormat,
    dimensions: Option<Dimensions>,
}

impl<'a, S: ByteSource + ?Sized> ImageHandle<'a, S> {
    pub fn new(source: &'a S) -> Result<Self> {
        Self::with_registry(source, &FormatRegistry::STANDARD)
    }

    pub fn with_registry(source: &'a S, registry: &FormatRegistry) -> Result<Self> {
        let header = Header::read(source)?;
        let format = registry.detect(&header).ok_or(ProbeError::UnknownFormat)?;
        debug!(%format, size = header.total_size(), "opened image handle");

        Ok(Self {
            source,
            header,
            format,
            dimensions: None,
        })
    }

    /// Returns the cached dimensions, parsing the header on first use.
    /// A failed parse leaves the cache empty.
    pub fn dimensions(&mut self) -> Result<Dimensions> {
        if let Some(dimensions) = self.dimensions {
            return Ok(dimensions);
        }
        let dimensions = self.format.parse(self.source, &self.header)?;
        self.dimensions = Some(dimensions);
        Ok(dimensions)
    }

    /// Cached dimensions without forcing evaluation.
    #[inline]
    pub fn cached_dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.dimensions.is_some()
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn total_size(&self) -> u64 {
        self.header.total_size()
    }

    #[inline]
    pub fn source(&self) -> &'a S {
        self.source
    }
}

impl<S: ?Sized> fmt::Display for ImageHandle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dimensions {
            None => write!(f, "{}(not evaluated)", self.format),
            Some(dims) => write!(
                f,
                "{}(width={}, height={}, size={})",
                self.format,
                dims.width(),
                dims.height(),
                self.header.total_size()
            ),
        }
    }
}

impl<S: ?Sized> fmt::Debug for ImageHandle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("format", &self.format)
            .field("total_size", &self.header.total_size())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}
