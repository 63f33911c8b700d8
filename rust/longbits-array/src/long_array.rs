//! The storage contract shared by all word array backends.

use std::ops::Range;

use longbits_common::{Result, error::Error};

/// Creates arrays of one particular backend kind.
///
/// Derived arrays (clones, sub-ranges) are created through the factory of their source
/// so that they keep using the same kind of storage.
pub trait LongArrayFactory {
    type Array: LongArray;

    /// Creates an array of `size` words, all zero.
    ///
    /// The returned array is zero-filled even when the backend is not
    /// zero-initialized.
    fn create(&self, size: u64) -> Result<Self::Array>;
}

/// A resizable sequence of `u64` words addressed by a 64-bit index.
///
/// # Bounds
///
/// Element accessors (`get`, `set`, `fill`, `copy_from` on the source side) panic when
/// an index falls outside `[0, size)`, the same way slice indexing does. Operations that
/// may allocate or touch the file system return a `Result`.
///
/// # Zero initialization
///
/// When [`LongArray::is_zero_initialized`] is `false`, words added by `resize` have
/// unspecified content and callers that need zeroes must `fill` them.
pub trait LongArray: Sized {
    type Factory: LongArrayFactory<Array = Self>;

    /// Number of words.
    fn size(&self) -> u64;

    /// All words `[0, size)` as a slice.
    fn words(&self) -> &[u64];

    fn words_mut(&mut self) -> &mut [u64];

    /// Truncates or extends the array to `new_size` words.
    fn resize(&mut self, new_size: u64) -> Result<()>;

    /// Whether words added by `resize` are guaranteed to read as zero.
    fn is_zero_initialized(&self) -> bool;

    /// Returns a factory creating arrays of the same backend kind.
    fn factory(&self) -> Self::Factory;

    /// Releases the resources held by the array. Idempotent.
    ///
    /// Element access after `close` panics.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn get(&self, index: u64) -> u64 {
        let index = check_index(index, self.size());
        self.words()[index]
    }

    #[inline]
    fn set(&mut self, index: u64, value: u64) {
        let index = check_index(index, self.size());
        self.words_mut()[index] = value;
    }

    /// Sets `length` words starting at `start` to `value`.
    fn fill(&mut self, start: u64, length: u64, value: u64) {
        let range = word_range(start, length, self.size());
        self.words_mut()[range].fill(value);
    }

    /// Copies `length` words of `src` starting at `from_start` to `dest`.
    ///
    /// When `dest + length` exceeds `size()`, the array grows to fit if `grow` is set;
    /// otherwise the copy is truncated at the end of this array. Words between the old
    /// size and `dest` of a grown array are zero.
    ///
    /// Returns the number of words copied.
    fn copy_from<S: LongArray>(
        &mut self,
        dest: u64,
        src: &S,
        from_start: u64,
        length: u64,
        grow: bool,
    ) -> Result<u64> {
        let src_range = word_range(from_start, length, src.size());
        let end = dest
            .checked_add(length)
            .ok_or_else(|| Error::invalid_arg("length", "destination range overflows"))?;
        let size = self.size();
        let length = if end <= size {
            length
        } else if grow {
            self.resize(end)?;
            if !self.is_zero_initialized() && dest > size {
                self.fill(size, dest - size, 0);
            }
            length
        } else {
            size.saturating_sub(dest)
        };
        if length == 0 {
            return Ok(0);
        }
        let src_words = &src.words()[src_range.start..src_range.start + length as usize];
        let dest = dest as usize;
        self.words_mut()[dest..dest + length as usize].copy_from_slice(src_words);
        Ok(length)
    }

    /// `self[i] &= other[i]` over the shorter of the two arrays.
    fn and<S: LongArray>(&mut self, other: &S) {
        combine(self.words_mut(), other.words(), |a, b| a & b);
    }

    /// `self[i] |= other[i]` over the shorter of the two arrays.
    fn or<S: LongArray>(&mut self, other: &S) {
        combine(self.words_mut(), other.words(), |a, b| a | b);
    }

    /// `self[i] ^= other[i]` over the shorter of the two arrays.
    fn xor<S: LongArray>(&mut self, other: &S) {
        combine(self.words_mut(), other.words(), |a, b| a ^ b);
    }

    /// `self[i] &= !other[i]` over the shorter of the two arrays.
    fn and_not<S: LongArray>(&mut self, other: &S) {
        combine(self.words_mut(), other.words(), |a, b| a & !b);
    }

    /// Deep copy with the same backend kind and content.
    fn try_clone(&self) -> Result<Self> {
        let size = self.size();
        let mut copy = self.factory().create(size)?;
        copy.copy_from(0, self, 0, size, false)?;
        Ok(copy)
    }

    /// Value equality across backends: same size and same words.
    fn words_equal<S: LongArray>(&self, other: &S) -> bool {
        self.words() == other.words()
    }
}

#[inline]
fn combine(dest: &mut [u64], src: &[u64], op: impl Fn(u64, u64) -> u64) {
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = op(*d, s);
    }
}

/// Validates a word index against `size` and converts it for slice access.
#[inline]
#[track_caller]
pub(crate) fn check_index(index: u64, size: u64) -> usize {
    assert!(index < size, "index {index} out of bounds (size: {size})");
    index as usize
}

/// Validates `[start, start + length)` against `size`.
#[inline]
#[track_caller]
pub(crate) fn word_range(start: u64, length: u64, size: u64) -> Range<usize> {
    let end = start.checked_add(length);
    assert!(
        end.is_some_and(|end| end <= size),
        "range {start}+{length} out of bounds (size: {size})"
    );
    start as usize..(start + length) as usize
}

/// Converts a word count into a byte count addressable on this platform.
pub(crate) fn byte_len(size: u64) -> Result<usize> {
    size.checked_mul(8)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(|| Error::invalid_arg("size", format!("{size} words are not addressable")))
}
