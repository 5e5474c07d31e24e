// Boost/Apache2 License

//! In-memory source images.

use crate::Error;

use std::convert::TryFrom;
use std::fmt;

/// Bytes per pixel of every supported format.
pub const BYTES_PER_PIXEL: usize = 4;

/// Bit masks selecting each channel out of a 32-bit pixel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChannelMasks {
    pub alpha: u32,
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

/// The layout of a pixel in a [`Surface`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8 bits per channel, stored as B, G, R, A in memory.
    Argb8888,
}

impl PixelFormat {
    /// The channel masks for this format.
    pub fn masks(self) -> ChannelMasks {
        match self {
            Self::Argb8888 => ChannelMasks {
                alpha: 0xFF00_0000,
                red: 0x00FF_0000,
                green: 0x0000_FF00,
                blue: 0x0000_00FF,
            },
        }
    }

    /// Bits per pixel.
    pub fn bits_per_pixel(self) -> u16 {
        match self {
            Self::Argb8888 => 32,
        }
    }
}

/// An owned ARGB image that a cursor is built from.
pub struct Surface {
    width: u32,
    height: u32,

    /// Bytes per row.
    pitch: usize,

    format: PixelFormat,

    /// `pitch * height` bytes of pixel data.
    pixels: Box<[u8]>,
}

impl Surface {
    /// Copy `data` into a new surface of the given size.
    ///
    /// `data` must hold exactly `width * height * 4` bytes, and both
    /// dimensions must be non-zero and fit in an `i32`.
    pub fn new(width: u32, height: u32, data: &[u8]) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_argument(
                "size",
                format!("{}x{} surface has no pixels", width, height),
            ));
        }

        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(Error::invalid_argument(
                "size",
                format!("{}x{} does not fit a bitmap header", width, height),
            ));
        }

        let pitch = (width as usize)
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| Error::invalid_argument("size", "row length overflows"))?;
        let expected = pitch
            .checked_mul(height as usize)
            .ok_or_else(|| Error::invalid_argument("size", "image length overflows"))?;

        if data.len() != expected {
            return Err(Error::invalid_argument(
                "data",
                format!(
                    "expected {} bytes for a {}x{} image, got {}",
                    expected,
                    width,
                    height,
                    data.len()
                ),
            ));
        }

        Ok(Self {
            width,
            height,
            pitch,
            format: PixelFormat::Argb8888,
            pixels: data.into(),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// The pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The raw pixel bytes, row by row from the top.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Check that rows are tightly packed 32-bit pixels.
    pub(crate) fn check_pitch(&self) -> Result<(), Error> {
        if self.pitch != self.width as usize * BYTES_PER_PIXEL
            || self.pixels.len() != self.pitch * self.height as usize
        {
            return Err(Error::Assertion("surface pitch == width * 4"));
        }

        Ok(())
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .field("format", &self.format)
            .finish()
    }
}
