// Boost/Apache2 License

//! Owned native handles.

use crate::gdi::{Gdi, RawHandle};
use crate::PlatformError;
use __sealed::Sealed;

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroIsize;

/// An owned native handle, released through `R` when dropped.
///
/// A handle is either valid or invalid. Releasing an invalid handle does
/// nothing and succeeds, and a handle becomes invalid as soon as it has been
/// released once, so the system never sees the same handle freed twice.
pub struct OwnedHandle<'g, G: Gdi + ?Sized, R: Release> {
    /// The subsystem the handle came from.
    gdi: &'g G,

    /// The handle, or `None` once released.
    handle: Option<NonZeroIsize>,

    /// How to release the handle.
    releaser: R,

    /// Never `Sync`; `Send` only when `G` is `Sync`.
    _thread_safety: PhantomData<Cell<()>>,
}

impl<G: Gdi + ?Sized, R: Release> Drop for OwnedHandle<'_, G, R> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::error!("leaked {}: {}", R::KIND, err);
        }
    }
}

impl<'g, G: Gdi + ?Sized, R: Release> OwnedHandle<'g, G, R> {
    /// Take ownership of a raw handle.
    ///
    /// A zero `handle` produces an invalid handle.
    ///
    /// # Safety
    ///
    /// `handle` must be zero or a live handle of the kind `R` releases,
    /// created by `gdi` and owned by nobody else.
    pub unsafe fn from_raw(gdi: &'g G, handle: RawHandle, releaser: R) -> Self {
        let handle = NonZeroIsize::new(handle);
        if let Some(handle) = handle {
            tracing::trace!("acquired {} {:#x}", R::KIND, handle.get());
        }

        Self {
            gdi,
            handle,
            releaser,
            _thread_safety: PhantomData,
        }
    }

    /// The raw handle, or zero if it is no longer valid.
    pub fn as_raw(&self) -> RawHandle {
        self.handle.map_or(0, NonZeroIsize::get)
    }

    /// Whether this handle still owns a resource.
    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// The releaser for this handle.
    pub fn releaser(&self) -> &R {
        &self.releaser
    }

    /// The subsystem this handle belongs to.
    pub fn gdi(&self) -> &'g G {
        self.gdi
    }

    /// Release the handle now.
    ///
    /// The handle is invalid afterwards even if the platform reported an error.
    pub fn release(&mut self) -> Result<(), PlatformError> {
        match self.handle.take() {
            None => Ok(()),
            Some(handle) => {
                tracing::trace!("releasing {} {:#x}", R::KIND, handle.get());
                unsafe { self.releaser.release(self.gdi, handle.get()) }
            }
        }
    }
}

impl<G: Gdi + ?Sized, R: Release> fmt::Debug for OwnedHandle<'_, G, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct HexDebug(RawHandle);

        impl fmt::Debug for HexDebug {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#010x}", self.0)
            }
        }

        f.debug_struct("OwnedHandle")
            .field("kind", &R::KIND)
            .field("handle", &HexDebug(self.as_raw()))
            .finish()
    }
}

/// The way a kind of handle is released.
///
/// # Safety
///
/// This trait should not be implemented outside of this crate.
pub unsafe trait Release: Sealed {}

pub(crate) mod __sealed {
    use super::*;

    #[doc(hidden)]
    pub unsafe trait Sealed {
        /// Human-readable name of the handle kind.
        const KIND: &'static str;

        /// Release the handle.
        unsafe fn release<G: Gdi + ?Sized>(
            &self,
            gdi: &G,
            handle: RawHandle,
        ) -> Result<(), PlatformError>;
    }
}
