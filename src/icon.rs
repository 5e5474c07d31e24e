// Boost/Apache2 License

//! Icon and cursor resources.

use crate::bitmap::DibSection;
use crate::gdi::{Gdi, RawHandle};
use crate::gdi_object::AsGdiObject;
use crate::handle::__sealed::Sealed;
use crate::handle::{OwnedHandle, Release};
use crate::layout::IconInfo;
use crate::surface::Surface;
use crate::{Error, PlatformError};

use std::convert::TryFrom;

/// An owned icon or cursor, destroyed with `DestroyIcon`.
pub type OwnedIcon<'g, G> = OwnedHandle<'g, G, DestroyIcon>;

/// A releaser corresponding to the `DestroyIcon` syscall.
#[derive(Debug, Copy, Clone, Default)]
pub struct DestroyIcon;

unsafe impl Sealed for DestroyIcon {
    const KIND: &'static str = "icon";

    unsafe fn release<G: Gdi + ?Sized>(
        &self,
        gdi: &G,
        handle: RawHandle,
    ) -> Result<(), PlatformError> {
        gdi.destroy_icon(handle)
    }
}

unsafe impl Release for DestroyIcon {}

impl<'g, G: Gdi + ?Sized> OwnedIcon<'g, G> {
    /// Take ownership of an icon.
    ///
    /// # Safety
    ///
    /// `handle` must be zero or a live icon created by `gdi`.
    pub unsafe fn new(gdi: &'g G, handle: RawHandle) -> Self {
        Self::from_raw(gdi, handle, DestroyIcon)
    }
}

/// The pixel within a cursor image that is the pointer's tip.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Hotspot {
    pub x: i32,
    pub y: i32,
}

impl Hotspot {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check the hotspot against an image size, returning it as unsigned coordinates.
    pub fn validate(self, width: u32, height: u32) -> Result<(u32, u32), Error> {
        let x = u32::try_from(self.x)
            .map_err(|_| Error::invalid_argument("hotspot", format!("x = {} is negative", self.x)))?;
        let y = u32::try_from(self.y)
            .map_err(|_| Error::invalid_argument("hotspot", format!("y = {} is negative", self.y)))?;

        if x >= width || y >= height {
            return Err(Error::invalid_argument(
                "hotspot",
                format!("({}, {}) lies outside a {}x{} image", x, y, width, height),
            ));
        }

        Ok((x, y))
    }
}

impl From<(i32, i32)> for Hotspot {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Combine a color bitmap and a mask into a cursor.
///
/// The surface's pixels are copied into `color` first. Once this returns,
/// the cursor no longer depends on `mask` or `color`; they may be released.
pub fn assemble_icon<'g, G: Gdi + ?Sized, M: AsGdiObject + ?Sized>(
    gdi: &'g G,
    surface: &Surface,
    hotspot: Hotspot,
    mask: &M,
    color: &mut DibSection<'_, G>,
) -> Result<OwnedIcon<'g, G>, Error> {
    let (x, y) = hotspot.validate(surface.width(), surface.height())?;

    color.copy_from(surface)?;

    let mask = mask
        .as_gdi_object()
        .ok_or(Error::Assertion("mask bitmap is live"))?;
    let color = color
        .as_gdi_object()
        .ok_or(Error::Assertion("color bitmap is live"))?;

    let info = IconInfo::cursor(x, y, mask.as_raw(), color.as_raw());
    let icon = unsafe { gdi.create_icon_indirect(&info) }?;
    Ok(unsafe { OwnedIcon::new(gdi, icon) })
}
