// Boost/Apache2 License

//! The real windowing subsystem, through `user32` and `gdi32`.

use crate::gdi::{Gdi, RawHandle};
use crate::layout::{BitmapInfo, DibUsage, IconInfo};
use crate::PlatformError;

use std::ffi::c_void;
use std::ptr::{self, NonNull};

use windows_sys::Win32::Foundation::ERROR_NOT_ENOUGH_MEMORY;
use windows_sys::Win32::Graphics::Gdi::{
    CreateBitmap, CreateDIBSection, DeleteObject, GetDC, ReleaseDC, BITMAPINFO,
};
use windows_sys::Win32::System::Memory::{GetProcessHeap, HeapAlloc, HeapFree, HEAP_ZERO_MEMORY};
use windows_sys::Win32::UI::WindowsAndMessaging::{CreateIconIndirect, DestroyIcon, ICONINFO};

/// GDI on the calling thread.
#[derive(Debug, Copy, Clone, Default)]
pub struct Win32;

impl Win32 {
    /// GDI as seen from the calling thread.
    pub fn new() -> Self {
        Self
    }
}

unsafe impl Gdi for Win32 {
    fn get_dc(&self, window: RawHandle) -> Result<RawHandle, PlatformError> {
        let dc = unsafe { GetDC(window) };

        if dc == 0 {
            Err(PlatformError::last_error("GetDC"))
        } else {
            Ok(dc)
        }
    }

    unsafe fn release_dc(&self, window: RawHandle, dc: RawHandle) -> Result<(), PlatformError> {
        // ReleaseDC returns 1 if the DC was released.
        if ReleaseDC(window, dc) == 1 {
            Ok(())
        } else {
            Err(PlatformError::last_error("ReleaseDC"))
        }
    }

    unsafe fn create_dib_section(
        &self,
        dc: RawHandle,
        info: &BitmapInfo,
        usage: DibUsage,
    ) -> Result<(RawHandle, NonNull<u8>), PlatformError> {
        let mut bits: *mut c_void = ptr::null_mut();

        // The V4 header starts with its own size, which is how GDI tells it
        // apart from a plain BITMAPINFOHEADER.
        let bitmap = CreateDIBSection(
            dc,
            info as *const BitmapInfo as *const BITMAPINFO,
            usage as u32,
            &mut bits,
            0,
            0,
        );

        if bitmap == 0 {
            return Err(PlatformError::last_error("CreateDIBSection"));
        }

        match NonNull::new(bits.cast::<u8>()) {
            Some(bits) => Ok((bitmap, bits)),
            None => {
                let err = PlatformError::last_error("CreateDIBSection");
                if DeleteObject(bitmap) == 0 {
                    tracing::error!(
                        "leaked DIB section {:#x} without pixels: {}",
                        bitmap,
                        PlatformError::last_error("DeleteObject")
                    );
                }
                Err(err)
            }
        }
    }

    unsafe fn create_bitmap(
        &self,
        width: i32,
        height: i32,
        planes: u32,
        bits_per_pixel: u32,
        bits: *const u8,
    ) -> Result<RawHandle, PlatformError> {
        let bitmap = CreateBitmap(width, height, planes, bits_per_pixel, bits.cast());

        if bitmap == 0 {
            Err(PlatformError::last_error("CreateBitmap"))
        } else {
            Ok(bitmap)
        }
    }

    unsafe fn delete_object(&self, object: RawHandle) -> Result<(), PlatformError> {
        if DeleteObject(object) == 0 {
            Err(PlatformError::last_error("DeleteObject"))
        } else {
            Ok(())
        }
    }

    unsafe fn create_icon_indirect(&self, info: &IconInfo) -> Result<RawHandle, PlatformError> {
        let icon = CreateIconIndirect(info as *const IconInfo as *const ICONINFO);

        if icon == 0 {
            Err(PlatformError::last_error("CreateIconIndirect"))
        } else {
            Ok(icon)
        }
    }

    unsafe fn destroy_icon(&self, icon: RawHandle) -> Result<(), PlatformError> {
        if DestroyIcon(icon) == 0 {
            Err(PlatformError::last_error("DestroyIcon"))
        } else {
            Ok(())
        }
    }

    fn alloc(&self, len: usize) -> Result<NonNull<u8>, PlatformError> {
        let heap = unsafe { GetProcessHeap() };
        if heap == 0 {
            return Err(PlatformError::last_error("GetProcessHeap"));
        }

        // HeapAlloc does not set the last error.
        let block = unsafe { HeapAlloc(heap, HEAP_ZERO_MEMORY, len) };
        NonNull::new(block.cast::<u8>())
            .ok_or_else(|| PlatformError::from_code("HeapAlloc", ERROR_NOT_ENOUGH_MEMORY))
    }

    unsafe fn free(&self, block: NonNull<u8>) -> Result<(), PlatformError> {
        let heap = GetProcessHeap();
        if heap == 0 {
            return Err(PlatformError::last_error("GetProcessHeap"));
        }

        if HeapFree(heap, 0, block.as_ptr() as *const c_void) == 0 {
            Err(PlatformError::last_error("HeapFree"))
        } else {
            Ok(())
        }
    }
}
