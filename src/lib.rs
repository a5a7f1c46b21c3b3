//! Image dimensions from file headers.
//!
//! Identifies WebP, FLIF, PNG, GIF, JPEG, BMP, TIFF and ICO images from a
//! 26-byte prefix and reads their width and height without touching pixel
//! data. JPEG, TIFF and some WebP variants need a few extra positioned
//! reads; everything else is answered from the prefix alone.

pub mod error;
pub mod formats;
pub mod handle;
pub mod header;
pub mod io;
pub mod options;
pub mod registry;
pub mod types;

use std::path::Path;

pub use error::{ProbeError, Result};
pub use handle::ImageHandle;
pub use header::Header;
pub use io::{ByteSource, FileSource, MmapSource};
pub use options::{OutputMode, ProbeOptions, SourceKind};
pub use registry::{FormatRegistry, detect_and_parse, detect_format};
pub use types::{Dimensions, ImageFormat, PREFIX_LEN};

/// Returns the dimensions of the image held by `source`.
pub fn get_dimensions<S: ByteSource + ?Sized>(source: &S) -> Result<Dimensions> {
    detect_and_parse(source)
}

/// Opens `path` with a [`FileSource`] and probes it.
pub fn probe_path(path: impl AsRef<Path>) -> Result<(ImageFormat, Dimensions)> {
    probe_path_with(path, &ProbeOptions::default())
}

/// Opens `path` with the source selected in `options` and probes it.
pub fn probe_path_with(
    path: impl AsRef<Path>,
    options: &ProbeOptions,
) -> Result<(ImageFormat, Dimensions)> {
    let registry = FormatRegistry::STANDARD;
    match options.source {
        SourceKind::File => registry.detect_and_parse(&FileSource::open(path)?),
        SourceKind::Mmap => registry.detect_and_parse(&MmapSource::open(path)?),
    }
}
