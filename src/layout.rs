// Boost/Apache2 License

//! Structure layouts shared with the system libraries.
//!
//! Field order, width and signedness follow the Win32 headers exactly. The
//! bitmap records derive [`Pod`], which refuses to compile if the compiler
//! would have to insert padding anywhere.

use crate::gdi::RawHandle;
use crate::surface::ChannelMasks;

use bytemuck::{Pod, Zeroable};

use std::convert::TryFrom;
use std::ffi::c_void;
use std::mem;
use std::ptr;

/// Compression modes for a device-independent bitmap.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Compression {
    /// Uncompressed.
    Rgb = 0x0000,

    /// 8-bit run-length encoding.
    Rle8 = 0x0001,

    /// 4-bit run-length encoding.
    Rle4 = 0x0002,

    /// Uncompressed, with the channel layout given by the header's color masks.
    BitFields = 0x0003,

    /// The image is a JPEG.
    Jpeg = 0x0004,

    /// The image is a PNG.
    Png = 0x0005,

    /// Uncompressed CMYK.
    Cmyk = 0x000B,

    /// 8-bit run-length encoded CMYK.
    CmykRle8 = 0x000C,

    /// 4-bit run-length encoded CMYK.
    CmykRle4 = 0x000D,
}

/// How the color table of a DIB section is interpreted.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DibUsage {
    /// The color table holds literal RGB values.
    RgbColors = 0,

    /// The color table holds indices into the selected palette.
    PalColors = 1,
}

/// A CIE XYZ color endpoint, in 2.30 fixed point.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct CieXyz {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Red, green and blue CIE XYZ endpoints.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct CieXyzTriple {
    pub red: CieXyz,
    pub green: CieXyz,
    pub blue: CieXyz,
}

/// The `BITMAPV4HEADER` record.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct BitmapV4Header {
    /// Size of this record in bytes.
    pub size: u32,
    pub width: i32,
    /// Negative for top-down row order.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    /// A [`Compression`] value.
    pub compression: u32,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used: u32,
    pub clr_important: u32,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
    pub cs_type: u32,
    pub endpoints: CieXyzTriple,
    pub gamma_red: u32,
    pub gamma_green: u32,
    pub gamma_blue: u32,
}

impl BitmapV4Header {
    /// Size of the record, as stored in its `size` field.
    pub const SIZE: u32 = mem::size_of::<Self>() as u32;

    /// Header for a top-down, 32 bits per pixel, bit-field masked image.
    pub fn top_down_32bpp(width: i32, height: i32, masks: ChannelMasks) -> Self {
        Self {
            size: Self::SIZE,
            width,
            height: -height,
            planes: 1,
            bit_count: 32,
            compression: Compression::BitFields as u32,
            alpha_mask: masks.alpha,
            red_mask: masks.red,
            green_mask: masks.green,
            blue_mask: masks.blue,
            ..Self::zeroed()
        }
    }

    /// The compression mode, if it is a known one.
    pub fn compression(&self) -> Option<Compression> {
        Compression::try_from(self.compression).ok()
    }
}

impl TryFrom<u32> for Compression {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, u32> {
        Ok(match value {
            0x0000 => Self::Rgb,
            0x0001 => Self::Rle8,
            0x0002 => Self::Rle4,
            0x0003 => Self::BitFields,
            0x0004 => Self::Jpeg,
            0x0005 => Self::Png,
            0x000B => Self::Cmyk,
            0x000C => Self::CmykRle8,
            0x000D => Self::CmykRle4,
            other => return Err(other),
        })
    }
}

/// The `RGBQUAD` record.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct RgbQuad {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

/// A `BITMAPINFO` record whose header is a [`BitmapV4Header`].
///
/// The color table is never read for bit-field images, but it is part of the
/// record the system expects to be addressable.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct BitmapInfo {
    pub header: BitmapV4Header,
    pub colors: [RgbQuad; 1],
}

impl BitmapInfo {
    /// Bitmap info for a top-down 32-bit image with the given channel masks.
    pub fn top_down_32bpp(width: i32, height: i32, masks: ChannelMasks) -> Self {
        Self {
            header: BitmapV4Header::top_down_32bpp(width, height, masks),
            colors: [RgbQuad::default()],
        }
    }
}

/// The `ICONINFO` record.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IconInfo {
    /// `TRUE` for an icon, `FALSE` for a cursor.
    pub icon: i32,
    pub x_hotspot: u32,
    pub y_hotspot: u32,
    /// The monochrome mask bitmap.
    pub mask: RawHandle,
    /// The color bitmap.
    pub color: RawHandle,
}

impl IconInfo {
    /// Describe a cursor with the given hotspot and bitmaps.
    pub fn cursor(x_hotspot: u32, y_hotspot: u32, mask: RawHandle, color: RawHandle) -> Self {
        Self {
            icon: 0,
            x_hotspot,
            y_hotspot,
            mask,
            color,
        }
    }

    /// Whether this describes an icon rather than a cursor.
    pub fn is_icon(&self) -> bool {
        self.icon != 0
    }
}

/// The cursor library's own record for a cursor.
///
/// Fallback cursors are stored in one of these so that code expecting a
/// library cursor can use them unchanged.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CursorRecord {
    /// Link to the next cursor in the library's list.
    pub next: *mut CursorRecord,

    /// The driver's payload; the `HICON` on Windows.
    pub driver_data: *mut c_void,
}

impl CursorRecord {
    /// A record with no successor, carrying `icon` as its driver data.
    pub fn for_icon(icon: RawHandle) -> Self {
        Self {
            next: ptr::null_mut(),
            driver_data: crate::strict::reconstitute(icon) as *mut c_void,
        }
    }

    /// The icon handle carried in the driver data.
    pub fn icon(&self) -> RawHandle {
        crate::strict::expose(self.driver_data as *const ())
    }
}
