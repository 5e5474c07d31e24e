// Boost/Apache2 License

//! Generalized GDI object types.

use crate::gdi::{Gdi, RawHandle};
use crate::handle::__sealed::Sealed;
use crate::handle::{OwnedHandle, Release};
use crate::PlatformError;

use std::marker::PhantomData;
use std::num::NonZeroIsize;

/// An owned GDI object, deleted with `DeleteObject`.
///
/// DIB sections and monochrome bitmaps are both released this way.
pub type OwnedGdiObject<'g, G> = OwnedHandle<'g, G, DeleteObject>;

/// A releaser corresponding to the `DeleteObject` syscall.
#[derive(Debug, Copy, Clone, Default)]
pub struct DeleteObject;

unsafe impl Sealed for DeleteObject {
    const KIND: &'static str = "GDI object";

    unsafe fn release<G: Gdi + ?Sized>(
        &self,
        gdi: &G,
        handle: RawHandle,
    ) -> Result<(), PlatformError> {
        gdi.delete_object(handle)
    }
}

unsafe impl Release for DeleteObject {}

impl<'g, G: Gdi + ?Sized> OwnedGdiObject<'g, G> {
    /// Take ownership of a GDI object.
    ///
    /// # Safety
    ///
    /// `handle` must be zero or a live GDI object created by `gdi`.
    pub unsafe fn new(gdi: &'g G, handle: RawHandle) -> Self {
        Self::from_raw(gdi, handle, DeleteObject)
    }
}

/// A borrowed GDI object.
#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
pub struct BorrowedGdiObject<'a> {
    /// The handle to the GDI object.
    handle: NonZeroIsize,

    /// This handle is represented by a `&'a OwnedGdiObject`.
    _marker: PhantomData<&'a ()>,
}

impl<'a> BorrowedGdiObject<'a> {
    /// Creates a new borrowed GDI object.
    ///
    /// # Safety
    ///
    /// `handle` must be a valid handle to a GDI object that outlives `'a`.
    pub unsafe fn new(handle: NonZeroIsize) -> Self {
        Self {
            handle,
            _marker: PhantomData,
        }
    }

    /// The raw handle.
    pub fn as_raw(&self) -> RawHandle {
        self.handle.get()
    }
}

/// A trait that allows one to borrow a GDI object.
pub trait AsGdiObject {
    /// Borrows the GDI object, or `None` if it has been released.
    fn as_gdi_object(&self) -> Option<BorrowedGdiObject<'_>>;
}

impl<G: Gdi + ?Sized> AsGdiObject for OwnedGdiObject<'_, G> {
    fn as_gdi_object(&self) -> Option<BorrowedGdiObject<'_>> {
        NonZeroIsize::new(self.as_raw()).map(|handle| unsafe { BorrowedGdiObject::new(handle) })
    }
}

impl<'a> AsGdiObject for BorrowedGdiObject<'a> {
    fn as_gdi_object(&self) -> Option<BorrowedGdiObject<'_>> {
        Some(*self)
    }
}
