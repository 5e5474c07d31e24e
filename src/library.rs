// Boost/Apache2 License

//! The cursor library whose native constructor is tried first.

use crate::icon::Hotspot;
use crate::surface::Surface;
use crate::PlatformError;

use std::cell::Cell;
use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A platform library that can turn a surface into a color cursor.
///
/// With SDL2 this is `SDL_CreateColorCursor` and `SDL_FreeCursor`. That
/// constructor is known to fail intermittently on Windows, which is why
/// [`HardwareCursor`](crate::HardwareCursor) retries it and then falls back
/// to building the cursor itself.
///
/// # Safety
///
/// Cursors returned by `create_color_cursor` must stay valid until passed to
/// `free_cursor`, and must not borrow from `surface`.
pub unsafe trait CursorLibrary {
    /// Create a cursor from `surface`, with its tip at `hotspot`.
    ///
    /// On failure, the error should carry the library's own message.
    fn create_color_cursor(
        &self,
        surface: &Surface,
        hotspot: Hotspot,
    ) -> Result<NonNull<c_void>, PlatformError>;

    /// Free a cursor returned by `create_color_cursor`.
    ///
    /// # Safety
    ///
    /// `cursor` must be live and not used afterwards.
    unsafe fn free_cursor(&self, cursor: NonNull<c_void>);
}

/// A cursor owned by the cursor library.
pub struct NativeCursor<'l, L: CursorLibrary + ?Sized> {
    library: &'l L,

    /// The cursor, or `None` once freed.
    cursor: Option<NonNull<c_void>>,

    /// Neither `Send` nor `Sync`.
    _thread_safety: PhantomData<Cell<()>>,
}

impl<L: CursorLibrary + ?Sized> Drop for NativeCursor<'_, L> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<'l, L: CursorLibrary + ?Sized> NativeCursor<'l, L> {
    /// Create a cursor through the library.
    pub fn new(library: &'l L, surface: &Surface, hotspot: Hotspot) -> Result<Self, PlatformError> {
        let cursor = library.create_color_cursor(surface, hotspot)?;

        Ok(Self {
            library,
            cursor: Some(cursor),
            _thread_safety: PhantomData,
        })
    }

    /// The library's cursor pointer, or null once freed.
    pub fn as_ptr(&self) -> *mut c_void {
        self.cursor.map_or(std::ptr::null_mut(), NonNull::as_ptr)
    }

    /// Free the cursor now. Freeing twice is a no-op.
    pub fn release(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            tracing::trace!("freeing library cursor {:p}", cursor);
            unsafe { self.library.free_cursor(cursor) }
        }
    }
}

impl<L: CursorLibrary + ?Sized> fmt::Debug for NativeCursor<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeCursor").field(&self.as_ptr()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedLibrary;

    #[test]
    fn frees_once() {
        let library = ScriptedLibrary::working();
        let surface = Surface::new(1, 1, &[1, 2, 3, 4]).unwrap();

        let mut cursor = NativeCursor::new(&library, &surface, Hotspot::new(0, 0)).unwrap();
        assert!(!cursor.as_ptr().is_null());
        assert_eq!(library.live(), 1);

        cursor.release();
        cursor.release();
        assert!(cursor.as_ptr().is_null());
        drop(cursor);
        assert_eq!(library.live(), 0);
    }

    #[test]
    fn failure_carries_library_message() {
        let library = ScriptedLibrary::broken();
        let surface = Surface::new(1, 1, &[0; 4]).unwrap();

        let err = NativeCursor::new(&library, &surface, Hotspot::new(0, 0)).unwrap_err();
        assert_eq!(err.function(), "SDL_CreateColorCursor");
        assert!(err.message().is_some());
    }
}
