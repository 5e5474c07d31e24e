// Boost/Apache2 License

//! Test doubles for the windowing subsystem and the cursor library.

use crate::gdi::{Gdi, RawHandle};
use crate::icon::Hotspot;
use crate::layout::{BitmapInfo, CursorRecord, DibUsage, IconInfo};
use crate::library::CursorLibrary;
use crate::surface::Surface;
use crate::PlatformError;

use std::alloc::{self, Layout};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::c_void;
use std::ptr::{self, NonNull};
use std::slice;

/// Error code reported by injected failures (`ERROR_NO_SYSTEM_RESOURCES`).
pub(crate) const INJECTED_CODE: u32 = 1450;

/// The kinds of resource `RecordingGdi` keeps count of.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Kind {
    DeviceContext,
    GdiObject,
    Icon,
    Memory,
}

const KINDS: [Kind; 4] = [Kind::DeviceContext, Kind::GdiObject, Kind::Icon, Kind::Memory];

/// A `Gdi` that hands out fake handles and records every call.
///
/// Releasing a handle that is not live panics, so double releases fail the test.
pub(crate) struct RecordingGdi {
    inner: RefCell<Inner>,
}

#[derive(Default)]
struct Inner {
    next_handle: RawHandle,
    live: HashMap<RawHandle, Kind>,
    dc_windows: HashMap<RawHandle, RawHandle>,
    acquired: HashMap<Kind, usize>,
    released: HashMap<Kind, usize>,
    released_dc_windows: Vec<RawHandle>,
    deleted_objects: Vec<RawHandle>,
    dibs: HashMap<RawHandle, Box<[u8]>>,
    blocks: HashMap<usize, Layout>,
    bitmap_infos: Vec<BitmapInfo>,
    bitmaps: Vec<(i32, i32, u32, u32)>,
    mask_bits: Vec<Vec<u8>>,
    icon_infos: Vec<IconInfo>,
    color_snapshots: Vec<Vec<u8>>,
    failures: Vec<&'static str>,
    calls: Vec<&'static str>,
}

impl Inner {
    fn enter(&mut self, function: &'static str) -> Result<(), PlatformError> {
        self.calls.push(function);

        match self.failures.iter().position(|&f| f == function) {
            Some(index) => {
                self.failures.remove(index);
                Err(PlatformError::with_message(
                    function,
                    INJECTED_CODE,
                    "injected failure",
                ))
            }
            None => Ok(()),
        }
    }

    fn acquire(&mut self, kind: Kind) -> RawHandle {
        self.next_handle += 0x10;
        let handle = self.next_handle;
        self.live.insert(handle, kind);
        *self.acquired.entry(kind).or_default() += 1;
        handle
    }

    fn release(&mut self, kind: Kind, handle: RawHandle) {
        match self.live.remove(&handle) {
            Some(found) if found == kind => {}
            Some(found) => panic!("released {:?} {:#x} as {:?}", found, handle, kind),
            None => panic!("released {:?} {:#x}, which is not live", kind, handle),
        }
        *self.released.entry(kind).or_default() += 1;
    }

    fn is_live(&self, kind: Kind, handle: RawHandle) -> bool {
        self.live.get(&handle) == Some(&kind)
    }
}

impl RecordingGdi {
    pub(crate) fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                next_handle: 0x1000,
                ..Inner::default()
            }),
        }
    }

    /// Make the next call to `function` fail.
    pub(crate) fn fail_next(&self, function: &'static str) {
        self.inner.borrow_mut().failures.push(function);
    }

    /// A live GDI object not backed by anything.
    pub(crate) fn fake_bitmap(&self) -> RawHandle {
        self.inner.borrow_mut().acquire(Kind::GdiObject)
    }

    pub(crate) fn acquired(&self, kind: Kind) -> usize {
        self.inner.borrow().acquired.get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn released(&self, kind: Kind) -> usize {
        self.inner.borrow().released.get(&kind).copied().unwrap_or(0)
    }

    /// Total acquisitions across all kinds.
    pub(crate) fn total_acquired(&self) -> usize {
        KINDS.iter().map(|&kind| self.acquired(kind)).sum()
    }

    /// Assert that everything acquired has been released.
    pub(crate) fn assert_balanced(&self) {
        for &kind in &KINDS {
            assert_eq!(
                self.acquired(kind),
                self.released(kind),
                "{:?} acquisitions and releases differ",
                kind
            );
        }

        let inner = self.inner.borrow();
        assert!(inner.live.is_empty(), "live handles: {:?}", inner.live);
        assert!(inner.blocks.is_empty(), "{} blocks leaked", inner.blocks.len());
    }

    /// The functions called so far, in order.
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.inner.borrow().calls.clone()
    }

    pub(crate) fn released_dc_windows(&self) -> Vec<RawHandle> {
        self.inner.borrow().released_dc_windows.clone()
    }

    /// GDI objects deleted so far, in order.
    pub(crate) fn deleted_objects(&self) -> Vec<RawHandle> {
        self.inner.borrow().deleted_objects.clone()
    }

    pub(crate) fn last_bitmap_info(&self) -> Option<BitmapInfo> {
        self.inner.borrow().bitmap_infos.last().copied()
    }

    /// Width, height, planes and bits per pixel of the last `create_bitmap` call.
    pub(crate) fn last_bitmap(&self) -> Option<(i32, i32, u32, u32)> {
        self.inner.borrow().bitmaps.last().copied()
    }

    /// The bits passed to the last `create_bitmap` call.
    pub(crate) fn last_mask_bits(&self) -> Option<Vec<u8>> {
        self.inner.borrow().mask_bits.last().cloned()
    }

    pub(crate) fn last_icon_info(&self) -> Option<IconInfo> {
        self.inner.borrow().icon_infos.last().copied()
    }

    /// The color bitmap's pixels at the moment the last icon was created.
    pub(crate) fn last_color_snapshot(&self) -> Option<Vec<u8>> {
        self.inner.borrow().color_snapshots.last().cloned()
    }

    /// Whether `icon` is a live icon.
    pub(crate) fn is_live_icon(&self, icon: RawHandle) -> bool {
        self.inner.borrow().is_live(Kind::Icon, icon)
    }
}

unsafe impl Gdi for RecordingGdi {
    fn get_dc(&self, window: RawHandle) -> Result<RawHandle, PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("GetDC")?;
        let dc = inner.acquire(Kind::DeviceContext);
        inner.dc_windows.insert(dc, window);
        Ok(dc)
    }

    unsafe fn release_dc(&self, window: RawHandle, dc: RawHandle) -> Result<(), PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("ReleaseDC")?;
        assert_eq!(inner.dc_windows.remove(&dc), Some(window), "DC released for the wrong window");
        inner.release(Kind::DeviceContext, dc);
        inner.released_dc_windows.push(window);
        Ok(())
    }

    unsafe fn create_dib_section(
        &self,
        dc: RawHandle,
        info: &BitmapInfo,
        usage: DibUsage,
    ) -> Result<(RawHandle, NonNull<u8>), PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("CreateDIBSection")?;
        assert!(inner.is_live(Kind::DeviceContext, dc), "DIB requested without a live DC");
        assert_eq!(usage, DibUsage::RgbColors);

        let header = &info.header;
        let len = header.width.unsigned_abs() as usize
            * header.height.unsigned_abs() as usize
            * header.bit_count as usize
            / 8;

        inner.bitmap_infos.push(*info);
        let handle = inner.acquire(Kind::GdiObject);
        let mut pixels = vec![0u8; len].into_boxed_slice();
        let bits = NonNull::new(pixels.as_mut_ptr()).unwrap_or_else(NonNull::dangling);
        inner.dibs.insert(handle, pixels);
        Ok((handle, bits))
    }

    unsafe fn create_bitmap(
        &self,
        width: i32,
        height: i32,
        planes: u32,
        bits_per_pixel: u32,
        bits: *const u8,
    ) -> Result<RawHandle, PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("CreateBitmap")?;

        let snapshot = inner
            .blocks
            .get(&(bits as usize))
            .map(|layout| slice::from_raw_parts(bits, layout.size()).to_vec())
            .unwrap_or_default();
        inner.mask_bits.push(snapshot);
        inner.bitmaps.push((width, height, planes, bits_per_pixel));
        Ok(inner.acquire(Kind::GdiObject))
    }

    unsafe fn delete_object(&self, object: RawHandle) -> Result<(), PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("DeleteObject")?;
        inner.release(Kind::GdiObject, object);
        inner.deleted_objects.push(object);
        inner.dibs.remove(&object);
        Ok(())
    }

    unsafe fn create_icon_indirect(&self, info: &IconInfo) -> Result<RawHandle, PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("CreateIconIndirect")?;
        assert!(inner.is_live(Kind::GdiObject, info.mask), "mask bitmap is not live");
        assert!(inner.is_live(Kind::GdiObject, info.color), "color bitmap is not live");

        let snapshot = inner
            .dibs
            .get(&info.color)
            .map(|pixels| pixels.to_vec())
            .unwrap_or_default();
        inner.color_snapshots.push(snapshot);
        inner.icon_infos.push(*info);
        Ok(inner.acquire(Kind::Icon))
    }

    unsafe fn destroy_icon(&self, icon: RawHandle) -> Result<(), PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("DestroyIcon")?;
        inner.release(Kind::Icon, icon);
        Ok(())
    }

    fn alloc(&self, len: usize) -> Result<NonNull<u8>, PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("alloc")?;

        // Zero-length blocks still get a distinct address.
        let layout = Layout::from_size_align(len.max(1), 16)
            .map_err(|_| PlatformError::new("alloc", 8))?;
        let ptr = NonNull::new(unsafe { alloc::alloc_zeroed(layout) })
            .ok_or_else(|| PlatformError::new("alloc", 8))?;
        inner.blocks.insert(ptr.as_ptr() as usize, layout);
        *inner.acquired.entry(Kind::Memory).or_default() += 1;
        Ok(ptr)
    }

    unsafe fn free(&self, block: NonNull<u8>) -> Result<(), PlatformError> {
        let mut inner = self.inner.borrow_mut();
        inner.enter("free")?;
        let layout = match inner.blocks.remove(&(block.as_ptr() as usize)) {
            Some(layout) => layout,
            None => panic!("freed unknown block {:p}", block),
        };
        alloc::dealloc(block.as_ptr(), layout);
        *inner.released.entry(Kind::Memory).or_default() += 1;
        Ok(())
    }
}

/// A `CursorLibrary` whose native constructor fails a set number of times.
pub(crate) struct ScriptedLibrary {
    failures_left: Cell<usize>,
    calls: Cell<usize>,
    created: Cell<usize>,
    freed: Cell<usize>,
    hotspots: RefCell<Vec<Hotspot>>,
}

impl ScriptedLibrary {
    /// A library whose first `failures` calls fail.
    pub(crate) fn failing(failures: usize) -> Self {
        Self {
            failures_left: Cell::new(failures),
            calls: Cell::new(0),
            created: Cell::new(0),
            freed: Cell::new(0),
            hotspots: RefCell::new(Vec::new()),
        }
    }

    /// A library that always succeeds.
    pub(crate) fn working() -> Self {
        Self::failing(0)
    }

    /// A library that never succeeds.
    pub(crate) fn broken() -> Self {
        Self::failing(usize::MAX)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Cursors created and not yet freed.
    pub(crate) fn live(&self) -> usize {
        self.created.get() - self.freed.get()
    }

    pub(crate) fn hotspots(&self) -> Vec<Hotspot> {
        self.hotspots.borrow().clone()
    }
}

unsafe impl CursorLibrary for ScriptedLibrary {
    fn create_color_cursor(
        &self,
        surface: &Surface,
        hotspot: Hotspot,
    ) -> Result<NonNull<c_void>, PlatformError> {
        self.calls.set(self.calls.get() + 1);
        self.hotspots.borrow_mut().push(hotspot);
        assert!(!surface.pixels().is_empty());

        let failures = self.failures_left.get();
        if failures > 0 {
            self.failures_left.set(failures - 1);
            return Err(PlatformError::with_message(
                "SDL_CreateColorCursor",
                0,
                "CreateIconIndirect(): The parameter is incorrect.",
            ));
        }

        let record = Box::new(CursorRecord {
            next: ptr::null_mut(),
            driver_data: ptr::null_mut(),
        });
        self.created.set(self.created.get() + 1);
        Ok(NonNull::from(Box::leak(record)).cast())
    }

    unsafe fn free_cursor(&self, cursor: NonNull<c_void>) {
        drop(Box::from_raw(cursor.cast::<CursorRecord>().as_ptr()));
        self.freed.set(self.freed.get() + 1);
    }
}
