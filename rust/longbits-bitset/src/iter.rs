//! Iterators over the set bits of a [`LongArrayBitSet`](crate::LongArrayBitSet).

use std::iter::FusedIterator;

use crate::BITS_PER_WORD;

/// Yields the indices of the set bits in ascending order.
#[derive(Clone)]
pub struct SetBits<'a> {
    words: std::slice::Iter<'a, u64>,
    /// Unvisited bits of the current word.
    current_word: u64,
    /// Bit index of bit 0 of `current_word`.
    base_index: u64,
    next_base_index: u64,
}

impl<'a> SetBits<'a> {
    pub(crate) fn new(words: &'a [u64]) -> Self {
        SetBits {
            words: words.iter(),
            current_word: 0,
            base_index: 0,
            next_base_index: 0,
        }
    }
}

impl Iterator for SetBits<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        loop {
            if self.current_word != 0 {
                let index = self.base_index + self.current_word.trailing_zeros() as u64;
                self.current_word &= self.current_word - 1;
                return Some(index);
            }
            self.current_word = *self.words.next()?;
            self.base_index = self.next_base_index;
            self.next_base_index += BITS_PER_WORD;
        }
    }
}

impl FusedIterator for SetBits<'_> {}

/// Yields the indices of the set bits in descending order.
#[derive(Clone)]
pub struct SetBitsRev<'a> {
    words: std::slice::Iter<'a, u64>,
    current_word: u64,
    base_index: u64,
}

impl<'a> SetBitsRev<'a> {
    pub(crate) fn new(words: &'a [u64]) -> Self {
        SetBitsRev {
            words: words.iter(),
            current_word: 0,
            base_index: words.len() as u64 * BITS_PER_WORD,
        }
    }
}

impl Iterator for SetBitsRev<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        loop {
            if self.current_word != 0 {
                let bit = BITS_PER_WORD - 1 - self.current_word.leading_zeros() as u64;
                self.current_word &= !(1u64 << bit);
                return Some(self.base_index + bit);
            }
            self.current_word = *self.words.next_back()?;
            self.base_index -= BITS_PER_WORD;
        }
    }
}

impl FusedIterator for SetBitsRev<'_> {}
