//! A growable bit set addressed by 64-bit indices, stored in any [`LongArray`] backend.
//!
//! [`LongArrayBitSet`] tracks the number of words in use (the index of the highest
//! nonzero word plus one) so that scans, counts and conversions never look past the
//! highest set bit, whatever the size of the underlying storage.
//!
//! [`LongArray`]: longbits_array::LongArray

pub mod bit_set;
pub mod iter;

mod bitwise;
mod ranges;
mod scan;

#[cfg(test)]
mod tests;

pub use bit_set::LongArrayBitSet;
pub use iter::{SetBits, SetBitsRev};

/// Number of bits in a storage word.
pub const BITS_PER_WORD: u64 = 64;

/// `log2(BITS_PER_WORD)`: shift converting a bit index into a word index.
pub const ADDRESS_BITS_PER_WORD: u32 = 6;

/// Capacity in bits of a bit set created without an explicit capacity.
pub const DEFAULT_CAPACITY_BITS: u64 = 64;

/// Index of the word holding `bit`.
#[inline]
pub(crate) fn word_index(bit: u64) -> u64 {
    bit >> ADDRESS_BITS_PER_WORD
}

/// Single-bit mask of `bit` within its word.
#[inline]
pub(crate) fn bit_mask(bit: u64) -> u64 {
    1u64 << (bit & (BITS_PER_WORD - 1))
}
