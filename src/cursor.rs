// Boost/Apache2 License

//! Hardware cursors, built natively when possible and by hand otherwise.

use crate::fallback::FallbackCursor;
use crate::gdi::Gdi;
use crate::icon::Hotspot;
use crate::library::{CursorLibrary, NativeCursor};
use crate::surface::Surface;
use crate::{Error, PlatformError};

use std::ffi::c_void;
use std::fmt;

/// How many times the library's constructor is tried before falling back.
///
/// The native constructor sometimes fails once and then succeeds when called
/// again, so a few attempts are made before building the cursor by hand.
pub const NATIVE_ATTEMPTS: usize = 3;

/// Where a [`HardwareCursor`] is in its construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    /// Nothing has been acquired yet.
    Uninitialized,

    /// The surface holds the caller's pixels.
    SurfaceBuilt,

    /// The library's constructor is being tried.
    PrimaryAttempted,

    /// The library's constructor produced a cursor.
    Succeeded,

    /// The cursor is being built by hand.
    FallbackAttempted,

    /// A cursor exists and can be used.
    Ready,

    /// Everything has been released.
    Disposed,
}

/// The cursor behind a [`HardwareCursor`], by how it was made.
pub enum CursorResource<'a, G: Gdi + ?Sized, L: CursorLibrary + ?Sized> {
    /// Made by the cursor library.
    Native(NativeCursor<'a, L>),

    /// Made by hand after the library failed.
    Fallback(FallbackCursor<'a, G>),
}

impl<G: Gdi + ?Sized, L: CursorLibrary + ?Sized> CursorResource<'_, G, L> {
    /// The cursor as the library sees it: its own pointer, or the fallback record.
    pub fn as_ptr(&self) -> *mut c_void {
        match self {
            Self::Native(cursor) => cursor.as_ptr(),
            Self::Fallback(cursor) => cursor.as_ptr(),
        }
    }

    /// Whether the cursor was made by hand.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Release the cursor now.
    pub fn release(&mut self) -> Result<(), PlatformError> {
        match self {
            Self::Native(cursor) => {
                cursor.release();
                Ok(())
            }
            Self::Fallback(cursor) => cursor.release(),
        }
    }
}

impl<G: Gdi + ?Sized, L: CursorLibrary + ?Sized> fmt::Debug for CursorResource<'_, G, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(cursor) => fmt::Debug::fmt(cursor, f),
            Self::Fallback(cursor) => fmt::Debug::fmt(cursor, f),
        }
    }
}

/// A color cursor built from an ARGB image.
///
/// The library's native constructor is tried first, up to
/// [`NATIVE_ATTEMPTS`] times. If it keeps failing, the cursor is built
/// directly from GDI and wrapped so that it looks like a library cursor.
///
/// The cursor owns its source surface for as long as it lives. Both are
/// released by [`dispose`](HardwareCursor::dispose) or on drop, whichever
/// comes first. Using the cursor after disposing it panics.
pub struct HardwareCursor<'a, G: Gdi + ?Sized, L: CursorLibrary + ?Sized> {
    gdi: &'a G,
    library: &'a L,

    /// Released before the surface.
    cursor: Option<CursorResource<'a, G, L>>,
    surface: Option<Surface>,

    hotspot: Hotspot,
    state: State,
}

impl<'a, G: Gdi + ?Sized, L: CursorLibrary + ?Sized> HardwareCursor<'a, G, L> {
    /// Create a cursor from `width * height` ARGB pixels.
    ///
    /// The arguments are checked before any resource is acquired. On error,
    /// everything acquired so far has been released.
    pub fn new(
        gdi: &'a G,
        library: &'a L,
        width: u32,
        height: u32,
        data: &[u8],
        hotspot: Hotspot,
    ) -> Result<Self, Error> {
        let mut cursor = Self {
            gdi,
            library,
            cursor: None,
            surface: None,
            hotspot,
            state: State::Uninitialized,
        };

        match cursor.build(width, height, data) {
            Ok(()) => Ok(cursor),
            Err(err) => {
                if let Err(cleanup) = cursor.dispose() {
                    tracing::error!("failed to clean up after \"{}\": {}", err, cleanup);
                }

                Err(err)
            }
        }
    }

    fn build(&mut self, width: u32, height: u32, data: &[u8]) -> Result<(), Error> {
        let hotspot = self.hotspot;
        hotspot.validate(width, height)?;

        let surface: &Surface = self.surface.insert(Surface::new(width, height, data)?);
        enter(&mut self.state, State::SurfaceBuilt);

        let mut last_error = None;
        for attempt in 1..=NATIVE_ATTEMPTS {
            enter(&mut self.state, State::PrimaryAttempted);

            match NativeCursor::new(self.library, surface, hotspot) {
                Ok(native) => {
                    if attempt == 1 {
                        tracing::debug!("native cursor constructor succeeded on the first try");
                    } else {
                        tracing::debug!("native cursor constructor succeeded on attempt {}", attempt);
                    }

                    self.cursor = Some(CursorResource::Native(native));
                    enter(&mut self.state, State::Succeeded);
                    enter(&mut self.state, State::Ready);
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!(
                        "native cursor constructor failed (attempt {} of {}): {}",
                        attempt,
                        NATIVE_ATTEMPTS,
                        err
                    );
                    last_error = Some(err);
                }
            }
        }

        let primary = match last_error {
            Some(err) => err,
            None => return Err(Error::Assertion("at least one native attempt")),
        };

        enter(&mut self.state, State::FallbackAttempted);
        tracing::info!("building the cursor from GDI instead");

        match FallbackCursor::new(self.gdi, surface, hotspot) {
            Ok(fallback) => {
                tracing::info!("GDI cursor construction succeeded");
                self.cursor = Some(CursorResource::Fallback(fallback));
                enter(&mut self.state, State::Ready);
                Ok(())
            }
            Err(err) => Err(Error::CursorCreation {
                primary,
                source: Box::new(err),
            }),
        }
    }

    /// Release the cursor, then the surface.
    ///
    /// Disposing more than once, or after a failed construction, does nothing.
    pub fn dispose(&mut self) -> Result<(), Error> {
        let released = match self.cursor.take() {
            Some(mut cursor) => cursor.release(),
            None => Ok(()),
        };

        self.surface = None;
        if self.state != State::Disposed {
            enter(&mut self.state, State::Disposed);
        }

        released.map_err(Into::into)
    }

    /// Where the cursor is in its lifecycle.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether [`dispose`](HardwareCursor::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.state == State::Disposed
    }

    /// The underlying cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has been disposed.
    pub fn resource(&self) -> &CursorResource<'a, G, L> {
        match &self.cursor {
            Some(cursor) => cursor,
            None => panic!("hardware cursor used after disposal"),
        }
    }

    /// The cursor pointer to hand to the library, e.g. to make it current.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has been disposed.
    pub fn as_ptr(&self) -> *mut c_void {
        self.resource().as_ptr()
    }

    /// Whether the cursor was built by hand.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has been disposed.
    pub fn is_fallback(&self) -> bool {
        self.resource().is_fallback()
    }

    /// The image the cursor was built from.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has been disposed.
    pub fn surface(&self) -> &Surface {
        match &self.surface {
            Some(surface) => surface,
            None => panic!("hardware cursor used after disposal"),
        }
    }

    pub fn hotspot(&self) -> Hotspot {
        self.hotspot
    }
}

fn enter(state: &mut State, next: State) {
    tracing::trace!("hardware cursor: {:?} -> {:?}", state, next);
    *state = next;
}

impl<G: Gdi + ?Sized, L: CursorLibrary + ?Sized> Drop for HardwareCursor<'_, G, L> {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            tracing::error!("failed to dispose hardware cursor: {}", err);
        }
    }
}

impl<G: Gdi + ?Sized, L: CursorLibrary + ?Sized> fmt::Debug for HardwareCursor<'_, G, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HardwareCursor")
            .field("state", &self.state)
            .field("hotspot", &self.hotspot)
            .field("cursor", &self.cursor)
            .field("surface", &self.surface)
            .finish()
    }
}
