// Boost/Apache2 License

//! Building a color cursor directly from GDI.
//!
//! This does what the cursor library's own Windows driver does: a top-down
//! 32-bit DIB section carries the color and alpha, an all-ones monochrome
//! bitmap is the mask, and `CreateIconIndirect` combines the two. The result
//! is wrapped in a record shaped like the library's cursor record.

use crate::bitmap::{DibSection, MaskBitmap};
use crate::gdi::{Gdi, RawHandle};
use crate::icon::{assemble_icon, Hotspot, OwnedIcon};
use crate::layout::CursorRecord;
use crate::memory::MemoryBlock;
use crate::surface::Surface;
use crate::{Error, PlatformError};

use std::ffi::c_void;
use std::fmt;
use std::mem;
use std::ptr;

/// Build a cursor icon from `surface`.
///
/// Every intermediate resource is released before this returns, whether it
/// succeeds or not.
pub fn create_cursor_icon<'g, G: Gdi + ?Sized>(
    gdi: &'g G,
    surface: &Surface,
    hotspot: Hotspot,
) -> Result<OwnedIcon<'g, G>, Error> {
    hotspot.validate(surface.width(), surface.height())?;

    let mut color = DibSection::for_surface(gdi, surface)?;
    let mut mask = MaskBitmap::opaque(gdi, surface.width(), surface.height())?;

    let icon = assemble_icon(gdi, surface, hotspot, &mask, &mut color)?;

    mask.release()?;
    color.release()?;
    Ok(icon)
}

/// A cursor built by [`create_cursor_icon`], stored in a library-style record.
///
/// The record's `driver_data` is the icon handle and its `next` link is null.
pub struct FallbackCursor<'g, G: Gdi + ?Sized> {
    /// The icon. Declared first so it is destroyed before the record is freed.
    icon: OwnedIcon<'g, G>,

    /// A `CursorRecord` pointing at `icon`.
    record: MemoryBlock<'g, G>,
}

impl<'g, G: Gdi + ?Sized> FallbackCursor<'g, G> {
    /// Build a cursor from `surface`.
    pub fn new(gdi: &'g G, surface: &Surface, hotspot: Hotspot) -> Result<Self, Error> {
        let icon = create_cursor_icon(gdi, surface, hotspot)?;
        Self::from_icon(icon).map_err(Into::into)
    }

    /// Wrap an existing icon in a cursor record.
    pub fn from_icon(icon: OwnedIcon<'g, G>) -> Result<Self, PlatformError> {
        let mut record = MemoryBlock::alloc(icon.gdi(), mem::size_of::<CursorRecord>())?;

        unsafe {
            ptr::write(
                record.as_mut_ptr() as *mut CursorRecord,
                CursorRecord::for_icon(icon.as_raw()),
            );
        }

        Ok(Self { icon, record })
    }

    /// Pointer to the cursor record, or null once released.
    pub fn as_ptr(&self) -> *mut c_void {
        self.record.as_ptr() as *mut c_void
    }

    /// A copy of the cursor record, or `None` once released.
    pub fn record(&self) -> Option<CursorRecord> {
        let ptr = self.record.as_ptr() as *const CursorRecord;
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { ptr::read(ptr) })
        }
    }

    /// The icon handle, or zero once released.
    pub fn icon(&self) -> RawHandle {
        self.icon.as_raw()
    }

    /// Destroy the icon and free the record.
    ///
    /// The record is freed even if destroying the icon fails.
    pub fn release(&mut self) -> Result<(), PlatformError> {
        let destroyed = self.icon.release();
        let freed = self.record.free();
        destroyed.and(freed)
    }
}

impl<G: Gdi + ?Sized> fmt::Debug for FallbackCursor<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackCursor")
            .field("record", &self.as_ptr())
            .field("icon", &self.icon)
            .finish()
    }
}
