// Boost/Apache2 License

//! Functions for making the bitmaps a cursor is built from.

use crate::dc::DeviceContext;
use crate::gdi::{Gdi, RawHandle};
use crate::gdi_object::{AsGdiObject, BorrowedGdiObject, OwnedGdiObject};
use crate::layout::{BitmapInfo, DibUsage};
use crate::memory::MemoryBlock;
use crate::surface::{PixelFormat, Surface};
use crate::{Error, PlatformError};

use std::convert::TryFrom;
use std::num::NonZeroU32;
use std::ptr::NonNull;
use std::slice;

/// The padding unit of mask rows, in bits: the width of a pointer.
pub const MASK_PAD: NonZeroU32 = match NonZeroU32::new(usize::BITS) {
    Some(pad) => pad,
    None => panic!("pointers have no width"),
};

/// Bytes per row of a monochrome mask `width` pixels wide.
///
/// A width that is already a multiple of `pad` still gains a whole extra pad
/// unit. Cursor libraries size their masks this way and consumers of the mask
/// depend on the exact length, so it is kept as is.
pub fn mask_row_bytes(width: u32, pad: NonZeroU32) -> usize {
    let pad = pad.get();
    let padded_bits = u64::from(width) + u64::from(pad - width % pad);
    (padded_bits / 8) as usize
}

/// Total bytes of a monochrome mask of the given size.
pub fn mask_len(width: u32, height: u32, pad: NonZeroU32) -> usize {
    mask_row_bytes(width, pad) * height as usize
}

/// Report `created`, unless it succeeded and `cleanup` did not.
///
/// When both fail, the creation error wins and the cleanup error is logged.
fn settle<T>(
    created: Result<T, PlatformError>,
    cleanup: Result<(), PlatformError>,
) -> Result<T, PlatformError> {
    match (created, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(cleanup)) => Err(cleanup),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(cleanup)) => {
            tracing::error!("cleanup after \"{}\" also failed: {}", err, cleanup);
            Err(err)
        }
    }
}

fn to_i32(name: &'static str, value: u32) -> Result<i32, Error> {
    i32::try_from(value)
        .map_err(|_| Error::invalid_argument(name, format!("{} does not fit an i32", value)))
}

/// A top-down 32-bit DIB section.
pub struct DibSection<'g, G: Gdi + ?Sized> {
    /// The bitmap.
    object: OwnedGdiObject<'g, G>,

    /// Pixel memory, owned by the bitmap.
    bits: NonNull<u8>,

    width: u32,
    height: u32,
    format: PixelFormat,
}

impl<'g, G: Gdi + ?Sized> DibSection<'g, G> {
    /// Create a section with the same size and format as `surface`.
    pub fn for_surface(gdi: &'g G, surface: &Surface) -> Result<Self, Error> {
        Self::new(gdi, surface.width(), surface.height(), surface.format())
    }

    /// Create a section of the given size, with one top-down row per image row.
    ///
    /// A device context for the entire screen is held only while the section
    /// is requested.
    pub fn new(gdi: &'g G, width: u32, height: u32, format: PixelFormat) -> Result<Self, Error> {
        let info = BitmapInfo::top_down_32bpp(
            to_i32("width", width)?,
            to_i32("height", height)?,
            format.masks(),
        );

        let mut screen = DeviceContext::for_entire_screen(gdi)?;
        let section = unsafe { gdi.create_dib_section(screen.as_raw(), &info, DibUsage::RgbColors) }
            .map(|(handle, bits)| (unsafe { OwnedGdiObject::new(gdi, handle) }, bits));

        // The section does not need the context; release it before anything else.
        let released = screen.release();
        let (object, bits) = settle(section, released)?;

        Ok(Self {
            object,
            bits,
            width,
            height,
            format,
        })
    }

    /// The raw bitmap handle, or zero once released.
    pub fn as_raw(&self) -> RawHandle {
        self.object.as_raw()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.width as usize * usize::from(self.format.bits_per_pixel() / 8)
    }

    /// Length of the pixel memory in bytes.
    pub fn len(&self) -> usize {
        self.pitch() * self.height as usize
    }

    /// Whether the section has no pixel memory left.
    pub fn is_empty(&self) -> bool {
        self.bits().is_empty()
    }

    /// The pixel memory; empty once released.
    pub fn bits(&self) -> &[u8] {
        if self.object.is_valid() {
            unsafe { slice::from_raw_parts(self.bits.as_ptr(), self.len()) }
        } else {
            &[]
        }
    }

    /// The pixel memory, mutably; empty once released.
    pub fn bits_mut(&mut self) -> &mut [u8] {
        if self.object.is_valid() {
            unsafe { slice::from_raw_parts_mut(self.bits.as_ptr(), self.len()) }
        } else {
            &mut []
        }
    }

    /// Copy the pixels of `surface` into the section.
    pub fn copy_from(&mut self, surface: &Surface) -> Result<(), Error> {
        surface.check_pitch()?;

        if surface.format() != self.format
            || surface.height() != self.height
            || surface.pitch() != self.pitch()
            || !self.object.is_valid()
        {
            return Err(Error::Assertion("DIB rows == surface rows"));
        }

        self.bits_mut().copy_from_slice(surface.pixels());
        Ok(())
    }

    /// Delete the section now.
    pub fn release(&mut self) -> Result<(), PlatformError> {
        self.object.release()
    }
}

impl<G: Gdi + ?Sized> AsGdiObject for DibSection<'_, G> {
    fn as_gdi_object(&self) -> Option<BorrowedGdiObject<'_>> {
        self.object.as_gdi_object()
    }
}

/// A monochrome mask that lets every pixel through.
///
/// Cursors built from 32-bit color bitmaps take their transparency from the
/// alpha channel, so the mask only has to be all ones.
pub struct MaskBitmap<'g, G: Gdi + ?Sized> {
    object: OwnedGdiObject<'g, G>,
    len: usize,
}

impl<'g, G: Gdi + ?Sized> MaskBitmap<'g, G> {
    /// Create an all-ones mask of the given size.
    pub fn opaque(gdi: &'g G, width: u32, height: u32) -> Result<Self, Error> {
        let w = to_i32("width", width)?;
        let h = to_i32("height", height)?;
        let len = mask_len(width, height, MASK_PAD);

        let mut bits = MemoryBlock::alloc(gdi, len)?;
        bits.as_mut_slice().fill(0xFF);

        let object = unsafe { gdi.create_bitmap(w, h, 1, 1, bits.as_ptr()) }
            .map(|handle| unsafe { OwnedGdiObject::new(gdi, handle) });

        // The bitmap holds its own copy of the bits.
        let freed = bits.free();

        Ok(Self {
            object: settle(object, freed)?,
            len,
        })
    }

    /// The raw bitmap handle, or zero once released.
    pub fn as_raw(&self) -> RawHandle {
        self.object.as_raw()
    }

    /// Length of the bits the mask was created from.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the mask was created from no bits at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Delete the mask now.
    pub fn release(&mut self) -> Result<(), PlatformError> {
        self.object.release()
    }
}

impl<G: Gdi + ?Sized> AsGdiObject for MaskBitmap<'_, G> {
    fn as_gdi_object(&self) -> Option<BorrowedGdiObject<'_>> {
        self.object.as_gdi_object()
    }
}
