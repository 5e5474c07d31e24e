// Boost/Apache2 License

//! The calls this crate makes into the windowing subsystem.

use crate::layout::{BitmapInfo, DibUsage, IconInfo};
use crate::PlatformError;

use std::ptr::NonNull;

/// A raw handle value. Zero is never a valid handle.
pub type RawHandle = isize;

/// The null window, standing for the entire screen.
pub const SCREEN: RawHandle = 0;

/// The windowing subsystem.
///
/// Every method mirrors one system call. A method either returns the acquired
/// resource or the error that the platform reported for that call; nothing is
/// left in ambient "last error" state for the caller to query.
///
/// # Safety
///
/// Handles returned by an implementation must stay valid until they are
/// passed to the matching release method of the same implementation. The
/// pixel pointer returned by `create_dib_section` must stay valid for the
/// length described by the bitmap header until the section is deleted, and
/// blocks returned by `alloc` must be valid, zeroed and aligned for a pointer
/// for `len` bytes until they are freed.
pub unsafe trait Gdi {
    /// Acquire a device context for `window`, or for the whole screen if `window` is [`SCREEN`].
    fn get_dc(&self, window: RawHandle) -> Result<RawHandle, PlatformError>;

    /// Release a device context acquired with [`get_dc`](Gdi::get_dc).
    ///
    /// # Safety
    ///
    /// `dc` must have been acquired for `window` and not yet released.
    unsafe fn release_dc(&self, window: RawHandle, dc: RawHandle) -> Result<(), PlatformError>;

    /// Create a DIB section, returning the bitmap and a pointer to its pixels.
    ///
    /// # Safety
    ///
    /// `dc` must be a live device context.
    unsafe fn create_dib_section(
        &self,
        dc: RawHandle,
        info: &BitmapInfo,
        usage: DibUsage,
    ) -> Result<(RawHandle, NonNull<u8>), PlatformError>;

    /// Create a device-dependent bitmap from raw bits.
    ///
    /// # Safety
    ///
    /// `bits` must point to enough data for the described bitmap.
    unsafe fn create_bitmap(
        &self,
        width: i32,
        height: i32,
        planes: u32,
        bits_per_pixel: u32,
        bits: *const u8,
    ) -> Result<RawHandle, PlatformError>;

    /// Delete a GDI object.
    ///
    /// # Safety
    ///
    /// `object` must be a live GDI object that is not selected into a DC.
    unsafe fn delete_object(&self, object: RawHandle) -> Result<(), PlatformError>;

    /// Create an icon or cursor from an icon description.
    ///
    /// # Safety
    ///
    /// The bitmaps named in `info` must be live.
    unsafe fn create_icon_indirect(&self, info: &IconInfo) -> Result<RawHandle, PlatformError>;

    /// Destroy an icon or cursor.
    ///
    /// # Safety
    ///
    /// `icon` must be a live icon created by this implementation.
    unsafe fn destroy_icon(&self, icon: RawHandle) -> Result<(), PlatformError>;

    /// Allocate a zeroed block of `len` bytes, aligned for a pointer.
    fn alloc(&self, len: usize) -> Result<NonNull<u8>, PlatformError>;

    /// Free a block returned by [`alloc`](Gdi::alloc).
    ///
    /// # Safety
    ///
    /// `block` must be live and not be used afterwards.
    unsafe fn free(&self, block: NonNull<u8>) -> Result<(), PlatformError>;
}
