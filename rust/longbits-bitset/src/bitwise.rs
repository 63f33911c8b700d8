//! Word-wise combination of two bit sets, possibly over different storage kinds.
//!
//! The words are combined by the storage contract's `and`, `or`, `xor` and `and_not`,
//! which work over the shorter of the two arrays. Words past either set's words in
//! use are zero, so the result only depends on the words in use. `and` and `and_not`
//! never grow this set; `or` and `xor` first grow it to the other set's words in use.

use longbits_array::LongArray;
use longbits_common::Result;

use crate::LongArrayBitSet;

impl<A: LongArray> LongArrayBitSet<A> {
    /// Keeps only the bits that are also set in `other`.
    pub fn and<B: LongArray>(&mut self, other: &LongArrayBitSet<B>) {
        let common = self.words_in_use.min(other.words_in_use);
        if self.words_in_use > common {
            self.words.fill(common, self.words_in_use - common, 0);
            self.words_in_use = common;
        }
        if common > 0 {
            self.words.and(&other.words);
        }
        self.recalculate_words_in_use();
        self.check_invariants();
    }

    /// Adds the bits set in `other`.
    pub fn or<B: LongArray>(&mut self, other: &LongArrayBitSet<B>) -> Result<()> {
        if other.words_in_use == 0 {
            return Ok(());
        }
        self.ensure_capacity(other.words_in_use)?;
        self.words.or(&other.words);
        self.words_in_use = self.words_in_use.max(other.words_in_use);
        self.check_invariants();
        Ok(())
    }

    /// Inverts the bits set in `other`.
    pub fn xor<B: LongArray>(&mut self, other: &LongArrayBitSet<B>) -> Result<()> {
        if other.words_in_use == 0 {
            return Ok(());
        }
        self.ensure_capacity(other.words_in_use)?;
        self.words.xor(&other.words);
        self.words_in_use = self.words_in_use.max(other.words_in_use);
        self.recalculate_words_in_use();
        self.check_invariants();
        Ok(())
    }

    /// Removes the bits set in `other`.
    pub fn and_not<B: LongArray>(&mut self, other: &LongArrayBitSet<B>) {
        if self.words_in_use == 0 || other.words_in_use == 0 {
            return;
        }
        self.words.and_not(&other.words);
        self.recalculate_words_in_use();
        self.check_invariants();
    }

    /// Whether any bit is set in both sets.
    pub fn intersects<B: LongArray>(&self, other: &LongArrayBitSet<B>) -> bool {
        self.used_words()
            .iter()
            .zip(other.used_words())
            .any(|(a, b)| a & b != 0)
    }
}
