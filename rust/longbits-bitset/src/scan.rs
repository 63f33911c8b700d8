//! Forward and backward searches for set and clear bits.
//!
//! A search masks the starting word down to the bits at or after (forward) or at or
//! before (backward) the start position, then walks whole words. Clear-bit searches
//! run the same loop over complemented words, so the position found is always the
//! absolute bit index: `trailing_zeros` going forward, `63 - leading_zeros` going
//! backward.

use longbits_array::LongArray;

use crate::{BITS_PER_WORD, LongArrayBitSet, word_index};

impl<A: LongArray> LongArrayBitSet<A> {
    /// The first set bit at or after `from`.
    pub fn next_set_bit(&self, from: u64) -> Option<u64> {
        let words = self.used_words();
        let mut index = word_index(from) as usize;
        if index >= words.len() {
            return None;
        }
        let mut word = words[index] & (u64::MAX << (from & (BITS_PER_WORD - 1)));
        loop {
            if word != 0 {
                return Some(index as u64 * BITS_PER_WORD + word.trailing_zeros() as u64);
            }
            index += 1;
            if index == words.len() {
                return None;
            }
            word = words[index];
        }
    }

    /// The first clear bit at or after `from`.
    ///
    /// Every bit past the words in use is clear, so a position is always found.
    pub fn next_clear_bit(&self, from: u64) -> u64 {
        let words = self.used_words();
        let mut index = word_index(from) as usize;
        if index >= words.len() {
            return from;
        }
        let mut word = !words[index] & (u64::MAX << (from & (BITS_PER_WORD - 1)));
        loop {
            if word != 0 {
                return index as u64 * BITS_PER_WORD + word.trailing_zeros() as u64;
            }
            index += 1;
            if index == words.len() {
                return index as u64 * BITS_PER_WORD;
            }
            word = !words[index];
        }
    }

    /// The last set bit at or before `from`.
    pub fn previous_set_bit(&self, from: u64) -> Option<u64> {
        let words = self.used_words();
        let mut index = word_index(from) as usize;
        if index >= words.len() {
            return self.len().checked_sub(1);
        }
        let mut word = words[index] & at_or_below_mask(from);
        loop {
            if word != 0 {
                return Some(highest_bit(index, word));
            }
            if index == 0 {
                return None;
            }
            index -= 1;
            word = words[index];
        }
    }

    /// The last clear bit at or before `from`.
    pub fn previous_clear_bit(&self, from: u64) -> Option<u64> {
        let words = self.used_words();
        let mut index = word_index(from) as usize;
        if index >= words.len() {
            return Some(from);
        }
        let mut word = !words[index] & at_or_below_mask(from);
        loop {
            if word != 0 {
                return Some(highest_bit(index, word));
            }
            if index == 0 {
                return None;
            }
            index -= 1;
            word = !words[index];
        }
    }
}

#[inline]
fn at_or_below_mask(bit: u64) -> u64 {
    u64::MAX >> (BITS_PER_WORD - 1 - (bit & (BITS_PER_WORD - 1)))
}

/// Absolute index of the highest set bit of the nonzero word at `index`.
#[inline]
fn highest_bit(index: usize, word: u64) -> u64 {
    (index as u64 + 1) * BITS_PER_WORD - 1 - word.leading_zeros() as u64
}
