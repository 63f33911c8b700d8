//! Native memory blocks allocated outside of the Rust global allocator.
//!
//! [`NativeBlock`] owns a page-aligned region obtained from the platform `mmap` module
//! and releases it exactly once: either through an explicit [`NativeBlock::release`]
//! call (idempotent) or when the block is dropped. A block that is converted with
//! [`NativeBlock::into_raw`] is no longer owned; it must be turned back into a block
//! with [`NativeBlock::from_raw`] to be released.
//!
//! # Content
//!
//! The content of a fresh or grown block is unspecified. Depending on the platform the
//! pages may be zeroed by the OS, but a reallocation that stays within the current
//! capacity only changes the logical length and exposes whatever bytes were there.
//! Callers that need zeroes must call [`NativeBlock::zero`].

use std::{ops::Range, sync::Arc};

use crate::{mmap, stats::AllocationStats};

/// An owned, page-aligned block of native memory.
pub struct NativeBlock {
    /// Start of the region, null once released.
    ptr: *mut u8,
    /// Requested size in bytes.
    len: usize,
    /// Page-rounded size of the underlying region.
    capacity: usize,
    tracker: Option<Arc<AllocationStats>>,
}

/// A native block that has been detached from its owner.
///
/// Dropping a `RawBlock` leaks the memory.
#[derive(Debug)]
pub struct RawBlock {
    ptr: *mut u8,
    len: usize,
    capacity: usize,
    tracker: Option<Arc<AllocationStats>>,
}

impl RawBlock {
    pub fn ptr(&self) -> *mut u8 {
        self.ptr
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl NativeBlock {
    /// Allocates a block of `size` bytes with unspecified content.
    pub fn allocate(size: usize) -> std::io::Result<NativeBlock> {
        Self::allocate_with(size, None)
    }

    /// Allocates a block of `size` bytes that also reports to `tracker`.
    pub fn allocate_tracked(
        size: usize,
        tracker: Arc<AllocationStats>,
    ) -> std::io::Result<NativeBlock> {
        Self::allocate_with(size, Some(tracker))
    }

    fn allocate_with(
        size: usize,
        tracker: Option<Arc<AllocationStats>>,
    ) -> std::io::Result<NativeBlock> {
        let (ptr, capacity) = mmap::allocate(size)?;
        assert!((ptr as usize).is_multiple_of(mmap::get_page_size()));
        AllocationStats::global().on_allocate(capacity);
        if let Some(tracker) = &tracker {
            tracker.on_allocate(capacity);
        }
        Ok(NativeBlock {
            ptr: ptr as _,
            len: size,
            capacity,
            tracker,
        })
    }

    /// Changes the size of the block to `new_size` bytes.
    ///
    /// Existing bytes are preserved up to the smaller of the old and new length; the
    /// content beyond that is unspecified. The block may move.
    ///
    /// # Panics
    ///
    /// Panics if the block has been released.
    pub fn reallocate(&mut self, new_size: usize) -> std::io::Result<()> {
        assert!(!self.is_released(), "native block has been released");
        let (ptr, capacity) =
            unsafe { mmap::reallocate(self.ptr as _, self.capacity, new_size)? };
        if capacity != self.capacity {
            log::debug!(
                "native block reallocated: {} -> {} bytes",
                self.capacity,
                capacity
            );
            AllocationStats::global().on_resize(self.capacity, capacity);
            if let Some(tracker) = &self.tracker {
                tracker.on_resize(self.capacity, capacity);
            }
        }
        self.ptr = ptr as _;
        self.capacity = capacity;
        self.len = new_size;
        Ok(())
    }

    /// Frees the block.
    ///
    /// Returns `true` if this call released the memory and `false` if the block had
    /// already been released.
    pub fn release(&mut self) -> bool {
        if self.ptr.is_null() {
            return false;
        }
        let ptr = std::mem::replace(&mut self.ptr, std::ptr::null_mut());
        if let Err(e) = unsafe { mmap::free(ptr as _, self.capacity) } {
            log::warn!("failed to free native block of {} bytes: {e}", self.capacity);
        }
        AllocationStats::global().on_release(self.capacity);
        if let Some(tracker) = &self.tracker {
            tracker.on_release(self.capacity);
        }
        self.len = 0;
        self.capacity = 0;
        true
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.ptr.is_null()
    }

    /// Requested length of the block in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Page-rounded size of the underlying region in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn ptr(&self) -> *mut u8 {
        self.ptr
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        assert!(!self.is_released(), "native block has been released");
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        assert!(!self.is_released(), "native block has been released");
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    /// Reinterprets the block as a slice of `T`.
    ///
    /// # Panics
    ///
    /// Panics if the length is not a multiple of `size_of::<T>()`.
    #[inline]
    pub fn as_slice<T>(&self) -> &[T]
    where
        T: bytemuck::AnyBitPattern,
    {
        bytemuck::cast_slice(self.as_bytes())
    }

    #[inline]
    pub fn as_mut_slice<T>(&mut self) -> &mut [T]
    where
        T: bytemuck::AnyBitPattern + bytemuck::NoUninit,
    {
        bytemuck::cast_slice_mut(self.as_bytes_mut())
    }

    /// Zeroes the given byte range with a single bulk write.
    pub fn zero(&mut self, range: Range<usize>) {
        assert!(
            range.start <= range.end && range.end <= self.len,
            "range {range:?} out of bounds (len: {})",
            self.len
        );
        assert!(!self.is_released(), "native block has been released");
        unsafe {
            std::ptr::write_bytes(self.ptr.add(range.start), 0, range.end - range.start);
        }
    }

    /// Detaches the memory from this owner without freeing it.
    pub fn into_raw(self) -> RawBlock {
        let mut this = std::mem::ManuallyDrop::new(self);
        RawBlock {
            ptr: this.ptr,
            len: this.len,
            capacity: this.capacity,
            tracker: this.tracker.take(),
        }
    }

    /// Takes ownership of a block previously detached with [`NativeBlock::into_raw`].
    ///
    /// # Safety
    ///
    /// `raw` must come from `into_raw` and must not have been turned back into a
    /// block already.
    pub unsafe fn from_raw(raw: RawBlock) -> NativeBlock {
        NativeBlock {
            ptr: raw.ptr,
            len: raw.len,
            capacity: raw.capacity,
            tracker: raw.tracker,
        }
    }
}

impl Drop for NativeBlock {
    fn drop(&mut self) {
        self.release();
    }
}

// SAFETY: NativeBlock owns its region and frees it exactly once.
unsafe impl Send for NativeBlock {}

// SAFETY: shared access only hands out shared slices.
unsafe impl Sync for NativeBlock {}

impl std::fmt::Debug for NativeBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeBlock")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .finish()
    }
}
