use serde::Serialize;
use std::fmt;

use crate::error::{ProbeError, Result};

/// Length of the header prefix captured before dispatching to a parser.
pub const PREFIX_LEN: usize = 26;

/// Pixel dimensions of an image. Both sides are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    pub(crate) fn checked(format: ImageFormat, width: u32, height: u32) -> Result<Self> {
        Self::new(width, height).ok_or_else(|| {
            ProbeError::format(format, format!("zero dimension ({width}x{height})"))
        })
    }

    /// Widens signed or oversized header values, rejecting anything
    /// that is not a positive `u32`.
    pub(crate) fn from_wide(format: ImageFormat, width: i64, height: i64) -> Result<Self> {
        let narrow = |value: i64, side: &str| {
            u32::try_from(value).map_err(|_| {
                ProbeError::format(format, format!("{side} {value} is out of range"))
            })
        };
        Self::checked(format, narrow(width, "width")?, narrow(height, "height")?)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<Dimensions> for (u32, u32) {
    fn from(dims: Dimensions) -> Self {
        (dims.width, dims.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The closed set of container formats the prober understands.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    WebP,
    Flif,
    Png,
    Gif,
    Jpeg,
    Bmp,
    Tiff,
    Ico,
}

impl ImageFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::WebP => "WebP",
            ImageFormat::Flif => "FLIF",
            ImageFormat::Png => "PNG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Ico => "ICO",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::WebP => "webp",
            ImageFormat::Flif => "flif",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Ico => "ico",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
