//! Word arrays in native memory.
//!
//! A [`NativeLongArray`] keeps its words in a [`NativeBlock`], which lives outside the
//! Rust global allocator. The block is released exactly once, on [`LongArray::close`]
//! or when the array is dropped; there is no deferred reclamation.

use std::sync::Arc;

use longbits_common::{Result, error::Error};
use longbits_page_alloc::{native_block::NativeBlock, stats::AllocationStats};

use crate::long_array::{LongArray, LongArrayFactory, byte_len, word_range};

/// A word array backed by a native memory block.
///
/// Not zero-initialized: words added by [`LongArray::resize`], as well as the words of
/// an array created with [`NativeLongArray::new`], have unspecified content.
pub struct NativeLongArray {
    block: NativeBlock,
    tracker: Option<Arc<AllocationStats>>,
}

impl NativeLongArray {
    /// Allocates `size` words with unspecified content.
    pub fn new(size: u64) -> Result<NativeLongArray> {
        Self::allocate(size, None)
    }

    /// Allocates `size` words that also report to `tracker`.
    pub fn new_tracked(size: u64, tracker: Arc<AllocationStats>) -> Result<NativeLongArray> {
        Self::allocate(size, Some(tracker))
    }

    /// Allocates `size` zero words.
    pub fn zeroed(size: u64) -> Result<NativeLongArray> {
        let mut array = Self::new(size)?;
        array.fill(0, size, 0);
        Ok(array)
    }

    fn allocate(size: u64, tracker: Option<Arc<AllocationStats>>) -> Result<NativeLongArray> {
        let bytes = byte_len(size)?;
        let block = match &tracker {
            Some(tracker) => NativeBlock::allocate_tracked(bytes, tracker.clone()),
            None => NativeBlock::allocate(bytes),
        }
        .map_err(|e| Error::io(format!("allocate {size} native words"), e))?;
        Ok(NativeLongArray { block, tracker })
    }

    /// Wraps an existing block; its length must be a whole number of words.
    pub fn from_block(block: NativeBlock) -> Result<NativeLongArray> {
        if block.is_released() {
            return Err(Error::closed("native block"));
        }
        if !block.len().is_multiple_of(8) {
            return Err(Error::invalid_arg(
                "block",
                format!("length {} is not a multiple of 8", block.len()),
            ));
        }
        Ok(NativeLongArray {
            block,
            tracker: None,
        })
    }

    pub fn into_block(self) -> NativeBlock {
        self.block
    }

    pub fn is_closed(&self) -> bool {
        self.block.is_released()
    }
}

impl LongArray for NativeLongArray {
    type Factory = NativeLongArrayFactory;

    #[inline]
    fn size(&self) -> u64 {
        (self.block.len() / 8) as u64
    }

    #[inline]
    fn words(&self) -> &[u64] {
        self.block.as_slice()
    }

    #[inline]
    fn words_mut(&mut self) -> &mut [u64] {
        self.block.as_mut_slice()
    }

    fn resize(&mut self, new_size: u64) -> Result<()> {
        if self.is_closed() {
            return Err(Error::closed("native array"));
        }
        let bytes = byte_len(new_size)?;
        self.block
            .reallocate(bytes)
            .map_err(|e| Error::io(format!("resize native array to {new_size} words"), e))
    }

    fn is_zero_initialized(&self) -> bool {
        false
    }

    fn factory(&self) -> NativeLongArrayFactory {
        NativeLongArrayFactory {
            tracker: self.tracker.clone(),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.block.release();
        Ok(())
    }

    /// Zero uses a bulk write; any other value is written once and then doubled with
    /// block copies.
    fn fill(&mut self, start: u64, length: u64, value: u64) {
        let range = word_range(start, length, self.size());
        if range.is_empty() {
            return;
        }
        if value == 0 {
            self.block.zero(range.start * 8..range.end * 8);
            return;
        }
        let words = self.words_mut();
        let len = range.len();
        words[range.start] = value;
        let mut filled = 1;
        while filled < len {
            let n = filled.min(len - filled);
            words.copy_within(range.start..range.start + n, range.start + filled);
            filled += n;
        }
    }
}

impl PartialEq for NativeLongArray {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_closed(), other.is_closed()) {
            (false, false) => self.block.ptr() == other.block.ptr() || self.words_equal(other),
            (closed, other_closed) => closed && other_closed,
        }
    }
}

impl Eq for NativeLongArray {}

impl std::hash::Hash for NativeLongArray {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if !self.is_closed() {
            self.words().hash(state);
        }
    }
}

impl std::fmt::Debug for NativeLongArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLongArray")
            .field("block", &self.block)
            .field("size", &self.size())
            .finish()
    }
}

/// Creates zero-filled native arrays, optionally reporting to a shared tracker.
#[derive(Debug, Clone, Default)]
pub struct NativeLongArrayFactory {
    pub tracker: Option<Arc<AllocationStats>>,
}

impl NativeLongArrayFactory {
    pub fn tracked(tracker: Arc<AllocationStats>) -> NativeLongArrayFactory {
        NativeLongArrayFactory {
            tracker: Some(tracker),
        }
    }
}

impl LongArrayFactory for NativeLongArrayFactory {
    type Array = NativeLongArray;

    fn create(&self, size: u64) -> Result<NativeLongArray> {
        let mut array = NativeLongArray::allocate(size, self.tracker.clone())?;
        array.fill(0, size, 0);
        Ok(array)
    }
}
