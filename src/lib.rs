// Boost/Apache2 License

#![forbid(future_incompatible, rust_2018_idioms)]
#![allow(clippy::uninlined_format_args)]

//! Hardware cursors built from ARGB images on top of GDI.
//!
//! A [`HardwareCursor`] first asks a [`CursorLibrary`] (such as SDL2) to build
//! the cursor. That call is known to fail intermittently on Windows, so after
//! [`NATIVE_ATTEMPTS`] tries the cursor is built directly from GDI instead: a
//! 32-bit DIB section for color and alpha, an all-ones monochrome mask, and
//! `CreateIconIndirect` to combine them. The result is wrapped in a record
//! that looks like one of the library's own cursors.
//!
//! All calls into the windowing subsystem go through the [`Gdi`] trait. On
//! Windows, [`Win32`] implements it with the real system calls.

// Public modules.
pub mod bitmap;
pub mod cursor;
pub mod dc;
pub mod fallback;
pub mod gdi;
pub mod gdi_object;
pub mod handle;
pub mod icon;
pub mod layout;
pub mod library;
pub mod memory;
pub mod surface;

// Private modules.
mod error;

#[cfg(test)]
mod testing;

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod win32;
        pub use win32::Win32;
    }
}

pub use cursor::{HardwareCursor, State, NATIVE_ATTEMPTS};
pub use error::{Error, PlatformError};
pub use gdi::{Gdi, RawHandle};
pub use icon::Hotspot;
pub use library::CursorLibrary;
pub use surface::Surface;

mod strict {
    #![allow(clippy::useless_transmute, clippy::transmutes_expressible_as_ptr_casts)]

    //! Strict provenance polyfill, for handles stored in pointer fields.

    use std::mem;

    /// Create an invalid pointer from an `isize`.
    #[inline]
    pub(crate) fn invalid(val: isize) -> *const () {
        unsafe { mem::transmute(val) }
    }

    /// Get the address of a pointer as an `isize`.
    #[inline]
    pub(crate) fn addr(ptr: *const ()) -> isize {
        unsafe { mem::transmute(ptr) }
    }

    /// Expose the address of a pointer.
    #[inline]
    pub(crate) fn expose(ptr: *const ()) -> isize {
        addr(ptr)
    }

    /// Reconstitute a pointer from an `isize`.
    #[inline]
    pub(crate) fn reconstitute(val: isize) -> *const () {
        invalid(val)
    }
}
