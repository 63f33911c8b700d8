//! Word arrays on the Rust heap.

use longbits_common::{Result, error::Error};

use crate::long_array::{LongArray, LongArrayFactory};

/// A `Vec<u64>`-backed word array.
///
/// Zero-initialized: words added by `resize` read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HeapLongArray(Vec<u64>);

impl HeapLongArray {
    /// Creates an array of `size` zero words.
    pub fn new(size: u64) -> Result<HeapLongArray> {
        let mut array = HeapLongArray::default();
        array.resize(size)?;
        Ok(array)
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.0
    }
}

impl From<Vec<u64>> for HeapLongArray {
    fn from(words: Vec<u64>) -> Self {
        HeapLongArray(words)
    }
}

impl From<&[u64]> for HeapLongArray {
    fn from(words: &[u64]) -> Self {
        HeapLongArray(words.to_vec())
    }
}

impl LongArray for HeapLongArray {
    type Factory = HeapLongArrayFactory;

    #[inline]
    fn size(&self) -> u64 {
        self.0.len() as u64
    }

    #[inline]
    fn words(&self) -> &[u64] {
        &self.0
    }

    #[inline]
    fn words_mut(&mut self) -> &mut [u64] {
        &mut self.0
    }

    fn resize(&mut self, new_size: u64) -> Result<()> {
        let new_len = usize::try_from(new_size).map_err(|_| {
            Error::invalid_arg("new_size", format!("{new_size} words are not addressable"))
        })?;
        if new_len > self.0.len() {
            self.0
                .try_reserve_exact(new_len - self.0.len())
                .map_err(|e| Error::invalid_operation(format!("grow heap array: {e}")))?;
        }
        self.0.resize(new_len, 0);
        Ok(())
    }

    fn is_zero_initialized(&self) -> bool {
        true
    }

    fn factory(&self) -> HeapLongArrayFactory {
        HeapLongArrayFactory
    }

    fn try_clone(&self) -> Result<Self> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapLongArrayFactory;

impl LongArrayFactory for HeapLongArrayFactory {
    type Array = HeapLongArray;

    fn create(&self, size: u64) -> Result<HeapLongArray> {
        HeapLongArray::new(size)
    }
}
