// Boost/Apache2 License

//! Functions for managing device contexts.

use crate::gdi::{Gdi, RawHandle, SCREEN};
use crate::handle::__sealed::Sealed;
use crate::handle::{OwnedHandle, Release};
use crate::PlatformError;

/// A device context obtained with `GetDC`.
pub type DeviceContext<'g, G> = OwnedHandle<'g, G, ReleaseDc>;

/// A DC releaser corresponding to the `GetDC` and `ReleaseDC` syscalls.
///
/// `ReleaseDC` needs the window the context was acquired for, so it is kept here.
#[derive(Debug, Copy, Clone)]
pub struct ReleaseDc {
    window: RawHandle,
}

impl ReleaseDc {
    /// The window the device context belongs to; [`SCREEN`] for the entire screen.
    pub fn window(&self) -> RawHandle {
        self.window
    }
}

unsafe impl Sealed for ReleaseDc {
    const KIND: &'static str = "device context";

    unsafe fn release<G: Gdi + ?Sized>(
        &self,
        gdi: &G,
        handle: RawHandle,
    ) -> Result<(), PlatformError> {
        gdi.release_dc(self.window, handle)
    }
}

unsafe impl Release for ReleaseDc {}

impl<'g, G: Gdi + ?Sized> DeviceContext<'g, G> {
    /// Get the device context for a window.
    pub fn for_window(gdi: &'g G, window: RawHandle) -> Result<Self, PlatformError> {
        let dc = gdi.get_dc(window)?;
        Ok(unsafe { Self::from_raw(gdi, dc, ReleaseDc { window }) })
    }

    /// Get the device context for the entire screen.
    pub fn for_entire_screen(gdi: &'g G) -> Result<Self, PlatformError> {
        Self::for_window(gdi, SCREEN)
    }

    /// Get the device context for a window described by a raw window handle.
    #[cfg(feature = "raw-window-handle")]
    pub fn for_window_handle(
        gdi: &'g G,
        window: &impl raw_window_handle::HasRawWindowHandle,
    ) -> Result<Self, crate::Error> {
        use raw_window_handle::RawWindowHandle;

        match window.raw_window_handle() {
            RawWindowHandle::Win32(handle) if !handle.hwnd.is_null() => {
                let hwnd = crate::strict::expose(handle.hwnd as *const ());
                Self::for_window(gdi, hwnd).map_err(Into::into)
            }
            _ => Err(crate::Error::invalid_argument(
                "window",
                "not a Win32 window handle",
            )),
        }
    }

    /// The window this context was acquired for.
    pub fn window(&self) -> RawHandle {
        self.releaser().window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Kind, RecordingGdi};

    #[test]
    fn screen_dc_is_released_against_null_window() {
        let gdi = RecordingGdi::new();
        let mut dc = DeviceContext::for_entire_screen(&gdi).unwrap();

        assert_eq!(dc.window(), SCREEN);
        assert!(dc.is_valid());
        dc.release().unwrap();
        dc.release().unwrap();

        assert_eq!(gdi.acquired(Kind::DeviceContext), 1);
        assert_eq!(gdi.released(Kind::DeviceContext), 1);
        assert_eq!(gdi.released_dc_windows(), vec![SCREEN]);
    }

    #[test]
    fn window_dc_remembers_window() {
        let gdi = RecordingGdi::new();
        let dc = DeviceContext::for_window(&gdi, 0x77).unwrap();
        assert_eq!(dc.window(), 0x77);
        drop(dc);

        assert_eq!(gdi.released_dc_windows(), vec![0x77]);
        gdi.assert_balanced();
    }

    #[test]
    fn get_dc_failure_is_reported() {
        let gdi = RecordingGdi::new();
        gdi.fail_next("GetDC");

        let err = DeviceContext::for_entire_screen(&gdi).unwrap_err();
        assert_eq!(err.function(), "GetDC");
        assert_eq!(gdi.acquired(Kind::DeviceContext), 0);
    }

    #[cfg(feature = "raw-window-handle")]
    #[test]
    fn dc_for_raw_window_handle() {
        use raw_window_handle::{
            HasRawWindowHandle, RawWindowHandle, Win32WindowHandle, XlibWindowHandle,
        };

        struct Window(RawWindowHandle);

        unsafe impl HasRawWindowHandle for Window {
            fn raw_window_handle(&self) -> RawWindowHandle {
                self.0
            }
        }

        let gdi = RecordingGdi::new();

        let mut handle = Win32WindowHandle::empty();
        handle.hwnd = 0x440 as *mut std::ffi::c_void;
        let dc = DeviceContext::for_window_handle(&gdi, &Window(RawWindowHandle::Win32(handle)))
            .unwrap();
        assert_eq!(dc.window(), 0x440);
        drop(dc);
        assert_eq!(gdi.released_dc_windows(), vec![0x440]);

        let null = Window(RawWindowHandle::Win32(Win32WindowHandle::empty()));
        let xlib = Window(RawWindowHandle::Xlib(XlibWindowHandle::empty()));
        for window in &[null, xlib] {
            let err = DeviceContext::for_window_handle(&gdi, window).unwrap_err();
            assert!(matches!(err, crate::Error::InvalidArgument { name: "window", .. }));
        }

        assert_eq!(gdi.acquired(Kind::DeviceContext), 1);
        gdi.assert_balanced();
    }
}
