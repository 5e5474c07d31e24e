// Boost/Apache2 License

//! Raw memory blocks from the windowing subsystem's allocator.

use crate::gdi::Gdi;
use crate::PlatformError;

use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::slice;

/// A zero-initialized block of memory, freed when dropped.
pub struct MemoryBlock<'g, G: Gdi + ?Sized> {
    gdi: &'g G,

    /// The block, or `None` once freed.
    ptr: Option<NonNull<u8>>,

    len: usize,

    /// Neither `Send` nor `Sync`.
    _thread_safety: PhantomData<Cell<()>>,
}

impl<G: Gdi + ?Sized> Drop for MemoryBlock<'_, G> {
    fn drop(&mut self) {
        if let Err(err) = self.free() {
            tracing::error!("leaked {} byte block: {}", self.len, err);
        }
    }
}

impl<'g, G: Gdi + ?Sized> MemoryBlock<'g, G> {
    /// Allocate `len` zeroed bytes.
    pub fn alloc(gdi: &'g G, len: usize) -> Result<Self, PlatformError> {
        let ptr = gdi.alloc(len)?;
        tracing::trace!("allocated {} byte block at {:p}", len, ptr);

        Ok(Self {
            gdi,
            ptr: Some(ptr),
            len,
            _thread_safety: PhantomData,
        })
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the block is zero bytes long.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer to the start of the block, or null once freed.
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.map_or(std::ptr::null(), |ptr| ptr.as_ptr() as *const u8)
    }

    /// Mutable pointer to the start of the block, or null once freed.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.map_or(std::ptr::null_mut(), NonNull::as_ptr)
    }

    /// The contents of the block; empty once freed.
    pub fn as_slice(&self) -> &[u8] {
        match self.ptr {
            Some(ptr) => unsafe { slice::from_raw_parts(ptr.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// The contents of the block, mutably; empty once freed.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self.ptr {
            Some(ptr) => unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    /// Free the block now. Freeing twice is a no-op.
    pub fn free(&mut self) -> Result<(), PlatformError> {
        match self.ptr.take() {
            None => Ok(()),
            Some(ptr) => {
                tracing::trace!("freeing {} byte block at {:p}", self.len, ptr);
                unsafe { self.gdi.free(ptr) }
            }
        }
    }
}
