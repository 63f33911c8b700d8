//! The bit set type: construction, single-bit access, storage growth and conversions.
//!
//! Range operations, scans and bitwise combination live in sibling modules and extend
//! [`LongArrayBitSet`] with further `impl` blocks.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use itertools::Itertools;
use longbits_array::{HeapLongArray, LongArray, LongArrayFactory};
use longbits_common::Result;

use crate::{
    BITS_PER_WORD, DEFAULT_CAPACITY_BITS, bit_mask,
    iter::{SetBits, SetBitsRev},
    word_index,
};

/// A growable set of `u64` bit indices stored in a [`LongArray`].
///
/// Bit `i` is bit `i % 64` (LSB first) of word `i / 64`.
///
/// # Words in use
///
/// `words_in_use` is the smallest word count such that every word at or above it is
/// zero. The following holds after every mutation (checked with `debug_assert!`):
///
/// - `words_in_use <= size` of the underlying array
/// - `words_in_use == 0` or word `words_in_use - 1` is nonzero
/// - every word in `[words_in_use, size)` is zero
///
/// Queries, scans and conversions only ever look at the words in use.
///
/// # Sticky size
///
/// A bit set created with an explicit capacity, or wrapping an existing array, has a
/// sticky size: `try_clone` keeps the full storage size instead of trimming to the
/// words in use. The flag survives growth, so a clone never shrinks below the
/// requested capacity.
///
/// # Errors and panics
///
/// Operations that may grow the storage (`set`, `flip`, `set_range`, `or`, `xor`, ...)
/// return a `Result`, since growing a native or file-mapped array can fail. Clearing
/// operations never grow and are infallible. A malformed range (`start > end`) panics.
///
/// After [`LongArrayBitSet::close`], operations that touch the words of a closed
/// native or mapped array panic.
pub struct LongArrayBitSet<A: LongArray = HeapLongArray> {
    pub(crate) words: A,
    pub(crate) words_in_use: u64,
    pub(crate) size_is_sticky: bool,
}

impl LongArrayBitSet<HeapLongArray> {
    /// Creates an empty heap bit set with room for [`DEFAULT_CAPACITY_BITS`] bits.
    pub fn new() -> Self {
        let words = vec![0u64; words_for(DEFAULT_CAPACITY_BITS) as usize];
        Self::empty(HeapLongArray::from(words), false)
    }

    /// Creates an empty heap bit set with room for `bits` bits. The size is sticky.
    pub fn with_capacity(bits: u64) -> Self {
        let words = vec![0u64; words_for(bits) as usize];
        Self::empty(HeapLongArray::from(words), true)
    }

    /// Creates a bit set from LSB-first words. Trailing zero words are dropped.
    pub fn from_words(words: &[u64]) -> Self {
        let len = words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
        Self::from_array_with(HeapLongArray::from(&words[..len]), false)
    }

    /// Creates a bit set from LSB-first bytes: bit `i` is bit `i % 8` of byte `i / 8`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let words = bytes[..len]
            .chunks(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word[..chunk.len()].copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect::<Vec<_>>();
        Self::from_array_with(HeapLongArray::from(words), false)
    }
}

impl Default for LongArrayBitSet<HeapLongArray> {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<u64> for LongArrayBitSet<HeapLongArray> {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut words = Vec::new();
        for bit in iter {
            let index = word_index(bit) as usize;
            if index >= words.len() {
                words.resize(index + 1, 0);
            }
            words[index] |= bit_mask(bit);
        }
        Self::from_array_with(HeapLongArray::from(words), false)
    }
}

impl<A: LongArray> LongArrayBitSet<A> {
    /// Creates an empty bit set with room for [`DEFAULT_CAPACITY_BITS`] bits in an
    /// array made by `factory`.
    pub fn new_in<F>(factory: &F) -> Result<Self>
    where
        F: LongArrayFactory<Array = A>,
    {
        let words = factory.create(words_for(DEFAULT_CAPACITY_BITS))?;
        Ok(Self::empty(words, false))
    }

    /// Creates an empty bit set with room for `bits` bits in an array made by
    /// `factory`. The size is sticky.
    pub fn with_capacity_in<F>(bits: u64, factory: &F) -> Result<Self>
    where
        F: LongArrayFactory<Array = A>,
    {
        let words = factory.create(words_for(bits))?;
        Ok(Self::empty(words, true))
    }

    /// Wraps an existing array, taking its words as they are. The size is sticky.
    ///
    /// The words in use are found by scanning the array backward for the last
    /// nonzero word.
    pub fn from_array(array: A) -> Self {
        Self::from_array_with(array, true)
    }

    fn empty(words: A, size_is_sticky: bool) -> Self {
        let bit_set = LongArrayBitSet {
            words,
            words_in_use: 0,
            size_is_sticky,
        };
        bit_set.check_invariants();
        bit_set
    }

    fn from_array_with(words: A, size_is_sticky: bool) -> Self {
        let mut bit_set = LongArrayBitSet {
            words_in_use: words.size(),
            words,
            size_is_sticky,
        };
        bit_set.recalculate_words_in_use();
        bit_set.check_invariants();
        bit_set
    }

    /// Returns the value of `bit`. Bits beyond the words in use are clear.
    #[inline]
    pub fn get(&self, bit: u64) -> bool {
        let index = word_index(bit);
        index < self.words_in_use && self.words.get(index) & bit_mask(bit) != 0
    }

    /// Sets `bit`, growing the storage if needed.
    pub fn set(&mut self, bit: u64) -> Result<()> {
        let index = word_index(bit);
        self.expand_to(index)?;
        self.words.words_mut()[index as usize] |= bit_mask(bit);
        self.check_invariants();
        Ok(())
    }

    pub fn set_value(&mut self, bit: u64, value: bool) -> Result<()> {
        if value {
            self.set(bit)
        } else {
            self.clear(bit);
            Ok(())
        }
    }

    /// Clears `bit`. Never grows the storage.
    pub fn clear(&mut self, bit: u64) {
        let index = word_index(bit);
        if index >= self.words_in_use {
            return;
        }
        self.words.words_mut()[index as usize] &= !bit_mask(bit);
        self.recalculate_words_in_use();
        self.check_invariants();
    }

    /// Inverts `bit`, growing the storage if needed.
    pub fn flip(&mut self, bit: u64) -> Result<()> {
        let index = word_index(bit);
        self.expand_to(index)?;
        self.words.words_mut()[index as usize] ^= bit_mask(bit);
        self.recalculate_words_in_use();
        self.check_invariants();
        Ok(())
    }

    /// Clears every bit, keeping the storage size.
    pub fn clear_all(&mut self) {
        if self.words_in_use > 0 {
            self.words.fill(0, self.words_in_use, 0);
            self.words_in_use = 0;
        }
        self.check_invariants();
    }

    /// Index of the highest set bit plus one, or 0 when no bit is set.
    pub fn len(&self) -> u64 {
        match self.used_words().last() {
            Some(&last) => {
                BITS_PER_WORD * (self.words_in_use - 1)
                    + (BITS_PER_WORD - last.leading_zeros() as u64)
            }
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words_in_use == 0
    }

    /// Number of bits the storage can hold without growing.
    pub fn capacity(&self) -> u64 {
        self.words.size().saturating_mul(BITS_PER_WORD)
    }

    pub fn words_in_use(&self) -> u64 {
        self.words_in_use
    }

    pub fn is_size_sticky(&self) -> bool {
        self.size_is_sticky
    }

    /// Number of set bits.
    pub fn cardinality(&self) -> u64 {
        self.used_words()
            .iter()
            .map(|w| w.count_ones() as u64)
            .sum()
    }

    /// Iterates over the set bits in ascending order.
    pub fn iter(&self) -> SetBits<'_> {
        SetBits::new(self.used_words())
    }

    /// Iterates over the set bits in descending order.
    pub fn iter_rev(&self) -> SetBitsRev<'_> {
        SetBitsRev::new(self.used_words())
    }

    /// Copies the words in use into a vector.
    pub fn to_long_array(&self) -> Vec<u64> {
        self.used_words().to_vec()
    }

    /// Little-endian bytes up to and including the byte holding the highest set bit.
    pub fn to_byte_array(&self) -> Vec<u8> {
        let Some((&last, full)) = self.used_words().split_last() else {
            return Vec::new();
        };
        let last_bytes = (BITS_PER_WORD as usize - last.leading_zeros() as usize).div_ceil(8);
        let mut bytes = Vec::with_capacity(full.len() * 8 + last_bytes);
        for word in full {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes.extend_from_slice(&last.to_le_bytes()[..last_bytes]);
        bytes
    }

    /// Deep copy in the same kind of storage.
    ///
    /// A bit set with a sticky size keeps its storage size; any other is trimmed to
    /// its words in use.
    pub fn try_clone(&self) -> Result<Self> {
        self.try_clone_in(&self.words.factory())
    }

    /// Deep copy into an array made by `factory`.
    pub fn try_clone_in<F: LongArrayFactory>(
        &self,
        factory: &F,
    ) -> Result<LongArrayBitSet<F::Array>> {
        let size = if self.size_is_sticky {
            self.words.size()
        } else {
            self.words_in_use
        };
        let mut words = factory.create(size)?;
        words.copy_from(0, &self.words, 0, self.words_in_use, false)?;
        let copy = LongArrayBitSet {
            words,
            words_in_use: self.words_in_use,
            size_is_sticky: self.size_is_sticky,
        };
        copy.check_invariants();
        Ok(copy)
    }

    /// Shrinks the storage to the words in use.
    pub fn trim_to_size(&mut self) -> Result<()> {
        if self.words_in_use != self.words.size() {
            self.words.resize(self.words_in_use)?;
            self.check_invariants();
        }
        Ok(())
    }

    /// The underlying word array.
    pub fn array(&self) -> &A {
        &self.words
    }

    pub fn into_array(self) -> A {
        self.words
    }

    /// Closes the underlying array.
    pub fn close(&mut self) -> Result<()> {
        self.words.close()
    }

    /// The words `[0, words_in_use)`.
    #[inline]
    pub(crate) fn used_words(&self) -> &[u64] {
        if self.words_in_use == 0 {
            return &[];
        }
        &self.words.words()[..self.words_in_use as usize]
    }

    /// Grows the storage to at least `words_required` words: doubling the current
    /// size, or exactly `words_required` if that is larger.
    pub(crate) fn ensure_capacity(&mut self, words_required: u64) -> Result<()> {
        let size = self.words.size();
        if size >= words_required {
            return Ok(());
        }
        let request = size.saturating_mul(2).max(words_required);
        self.words.resize(request)?;
        if !self.words.is_zero_initialized() {
            self.words.fill(size, request - size, 0);
        }
        log::trace!("bit set storage grown from {size} to {request} words");
        Ok(())
    }

    /// Makes word `word_index` part of the words in use, growing the storage if
    /// needed. The caller must leave that word nonzero or recalculate.
    pub(crate) fn expand_to(&mut self, word_index: u64) -> Result<()> {
        let words_required = word_index + 1;
        if self.words_in_use < words_required {
            self.ensure_capacity(words_required)?;
            self.words_in_use = words_required;
        }
        Ok(())
    }

    /// Lowers `words_in_use` past trailing zero words, scanning back from the current
    /// value.
    pub(crate) fn recalculate_words_in_use(&mut self) {
        self.words_in_use = self
            .used_words()
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |i| i as u64 + 1);
    }

    #[inline]
    pub(crate) fn check_invariants(&self) {
        debug_assert!(
            self.words_in_use <= self.words.size(),
            "words in use {} exceed size {}",
            self.words_in_use,
            self.words.size()
        );
        debug_assert!(
            self.words_in_use == 0 || self.words.get(self.words_in_use - 1) != 0,
            "last word in use is zero"
        );
        debug_assert!(
            self.words_in_use == self.words.size() || self.words.get(self.words_in_use) == 0,
            "word past the words in use is nonzero"
        );
    }
}

/// Number of words needed to hold `bits` bits.
#[inline]
pub(crate) fn words_for(bits: u64) -> u64 {
    bits.div_ceil(BITS_PER_WORD)
}

impl<'a, A: LongArray> IntoIterator for &'a LongArrayBitSet<A> {
    type Item = u64;
    type IntoIter = SetBits<'a>;

    fn into_iter(self) -> SetBits<'a> {
        self.iter()
    }
}

impl<A: LongArray, B: LongArray> PartialEq<LongArrayBitSet<B>> for LongArrayBitSet<A> {
    fn eq(&self, other: &LongArrayBitSet<B>) -> bool {
        self.used_words() == other.used_words()
    }
}

impl<A: LongArray> Eq for LongArrayBitSet<A> {}

impl<A: LongArray> Hash for LongArrayBitSet<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.used_words().hash(state);
    }
}

/// Formats the set bits as `{0, 63, 64}`.
impl<A: LongArray> fmt::Display for LongArrayBitSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}

impl<A: LongArray> fmt::Debug for LongArrayBitSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongArrayBitSet")
            .field("words_in_use", &self.words_in_use)
            .field("size", &self.words.size())
            .field("size_is_sticky", &self.size_is_sticky)
            .finish()
    }
}
