mod bit_set_tests;
mod bitwise_tests;
mod scan_tests;

use crate::LongArrayBitSet;

/// Naive reference model: one `bool` per bit.
#[derive(Debug, Clone, Default)]
pub(crate) struct Oracle(Vec<bool>);

impl Oracle {
    pub fn set(&mut self, bit: u64, value: bool) {
        let bit = bit as usize;
        if bit >= self.0.len() {
            if !value {
                return;
            }
            self.0.resize(bit + 1, false);
        }
        self.0[bit] = value;
    }

    pub fn get(&self, bit: u64) -> bool {
        self.0.get(bit as usize).copied().unwrap_or(false)
    }

    pub fn bits(&self) -> Vec<u64> {
        (0..self.0.len() as u64).filter(|&i| self.get(i)).collect()
    }

    pub fn len(&self) -> u64 {
        self.bits().last().map_or(0, |&b| b + 1)
    }
}

/// Builds a heap bit set with `count` random bits below `limit`, plus its oracle.
pub(crate) fn random_bit_set(
    rng: &mut fastrand::Rng,
    count: usize,
    limit: u64,
) -> (LongArrayBitSet, Oracle) {
    let mut bit_set = LongArrayBitSet::new();
    let mut oracle = Oracle::default();
    for _ in 0..count {
        let bit = rng.u64(0..limit);
        bit_set.set(bit).unwrap();
        oracle.set(bit, true);
    }
    (bit_set, oracle)
}
