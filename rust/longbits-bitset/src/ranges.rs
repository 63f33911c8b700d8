//! Operations over half-open bit ranges `[start, end)`.
//!
//! Each operation touches the first and last word of the range through a boundary mask
//! and the words in between as a whole:
//!
//! ```text
//! first word mask: u64::MAX << (start % 64)          bits at or above start
//! last word mask:  u64::MAX >> (-end % 64)           bits below end
//! ```
//!
//! When the range fits in one word the two masks are combined with `&`.

use std::ops::Range;

use longbits_array::LongArray;
use longbits_common::Result;

use crate::{BITS_PER_WORD, LongArrayBitSet, bit_set::words_for, word_index};

impl<A: LongArray> LongArrayBitSet<A> {
    /// Sets every bit in `range`, growing the storage if needed.
    ///
    /// # Panics
    ///
    /// Panics if `range.start > range.end`.
    pub fn set_range(&mut self, range: Range<u64>) -> Result<()> {
        let Some((start, end)) = checked_range(&range) else {
            return Ok(());
        };
        let start_word = word_index(start);
        let end_word = word_index(end - 1);
        self.expand_to(end_word)?;

        let first_mask = first_word_mask(start);
        let last_mask = last_word_mask(end);
        if start_word == end_word {
            self.words.words_mut()[start_word as usize] |= first_mask & last_mask;
        } else {
            self.words.fill(start_word + 1, end_word - start_word - 1, u64::MAX);
            let words = self.words.words_mut();
            words[start_word as usize] |= first_mask;
            words[end_word as usize] |= last_mask;
        }
        self.check_invariants();
        Ok(())
    }

    pub fn set_range_value(&mut self, range: Range<u64>, value: bool) -> Result<()> {
        if value {
            self.set_range(range)
        } else {
            self.clear_range(range);
            Ok(())
        }
    }

    /// Clears every bit in `range`. Never grows the storage.
    ///
    /// # Panics
    ///
    /// Panics if `range.start > range.end`.
    pub fn clear_range(&mut self, range: Range<u64>) {
        let Some((start, end)) = checked_range(&range) else {
            return;
        };
        let start_word = word_index(start);
        if start_word >= self.words_in_use {
            return;
        }
        let end = end.min(self.words_in_use * BITS_PER_WORD);
        let end_word = word_index(end - 1);

        let first_mask = first_word_mask(start);
        let last_mask = last_word_mask(end);
        if start_word == end_word {
            self.words.words_mut()[start_word as usize] &= !(first_mask & last_mask);
        } else {
            self.words.fill(start_word + 1, end_word - start_word - 1, 0);
            let words = self.words.words_mut();
            words[start_word as usize] &= !first_mask;
            words[end_word as usize] &= !last_mask;
        }
        self.recalculate_words_in_use();
        self.check_invariants();
    }

    /// Inverts every bit in `range`, growing the storage if needed.
    ///
    /// # Panics
    ///
    /// Panics if `range.start > range.end`.
    pub fn flip_range(&mut self, range: Range<u64>) -> Result<()> {
        let Some((start, end)) = checked_range(&range) else {
            return Ok(());
        };
        let start_word = word_index(start) as usize;
        let end_word = word_index(end - 1) as usize;
        self.expand_to(end_word as u64)?;

        let first_mask = first_word_mask(start);
        let last_mask = last_word_mask(end);
        let words = self.words.words_mut();
        if start_word == end_word {
            words[start_word] ^= first_mask & last_mask;
        } else {
            words[start_word] ^= first_mask;
            for word in &mut words[start_word + 1..end_word] {
                *word = !*word;
            }
            words[end_word] ^= last_mask;
        }
        self.recalculate_words_in_use();
        self.check_invariants();
        Ok(())
    }

    /// Returns the bits of `range` as a new bit set whose bit 0 is bit `range.start`
    /// of this one.
    ///
    /// The result is created in the same kind of storage, with a sticky size of
    /// `range` clipped to [`LongArrayBitSet::len`].
    ///
    /// # Panics
    ///
    /// Panics if `range.start > range.end`.
    pub fn get_range(&self, range: Range<u64>) -> Result<Self> {
        let factory = self.words.factory();
        let len = self.len();
        let start = range.start;
        let end = match checked_range(&range) {
            Some((start, end)) if start < len => end.min(len),
            _ => return Self::with_capacity_in(0, &factory),
        };

        let mut result = Self::with_capacity_in(end - start, &factory)?;
        let target_words = words_for(end - start);
        let mut source = word_index(start);
        let shift = start & (BITS_PER_WORD - 1);

        if shift == 0 {
            result
                .words
                .copy_from(0, &self.words, source, target_words - 1, false)?;
            source += target_words - 1;
        } else {
            let src = self.words.words();
            let dest = result.words.words_mut();
            for word in &mut dest[..target_words as usize - 1] {
                let s = source as usize;
                *word = (src[s] >> shift) | (src[s + 1] << (BITS_PER_WORD - shift));
                source += 1;
            }
        }

        // The last word may straddle two source words.
        let src = self.words.words();
        let s = source as usize;
        let last_mask = last_word_mask(end);
        let last = if (end - 1) & (BITS_PER_WORD - 1) < shift {
            (src[s] >> shift) | ((src[s + 1] & last_mask) << (BITS_PER_WORD - shift))
        } else {
            (src[s] & last_mask) >> shift
        };
        result.words.set(target_words - 1, last);

        result.words_in_use = target_words;
        result.recalculate_words_in_use();
        result.check_invariants();
        Ok(result)
    }
}

/// Returns `None` for an empty range.
#[inline]
#[track_caller]
fn checked_range(range: &Range<u64>) -> Option<(u64, u64)> {
    assert!(
        range.start <= range.end,
        "range start {} is greater than end {}",
        range.start,
        range.end
    );
    (range.start < range.end).then_some((range.start, range.end))
}

#[inline]
pub(crate) fn first_word_mask(start: u64) -> u64 {
    u64::MAX << (start & (BITS_PER_WORD - 1))
}

#[inline]
pub(crate) fn last_word_mask(end: u64) -> u64 {
    u64::MAX >> (end.wrapping_neg() & (BITS_PER_WORD - 1))
}
