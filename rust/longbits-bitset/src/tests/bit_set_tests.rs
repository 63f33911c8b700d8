use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use longbits_array::{HeapLongArray, LongArray};

use super::Oracle;
use crate::{DEFAULT_CAPACITY_BITS, LongArrayBitSet};

fn hash_of(bit_set: &LongArrayBitSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    bit_set.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_new_bit_set() {
    let bit_set = LongArrayBitSet::new();
    assert!(bit_set.is_empty());
    assert_eq!(bit_set.len(), 0);
    assert_eq!(bit_set.cardinality(), 0);
    assert_eq!(bit_set.capacity(), DEFAULT_CAPACITY_BITS);
    assert!(!bit_set.is_size_sticky());
    assert!(!bit_set.get(0));
    assert!(!bit_set.get(u64::MAX));
}

#[test]
fn test_set_get_clear() {
    let mut bit_set = LongArrayBitSet::new();
    bit_set.set(5).unwrap();
    bit_set.set(200).unwrap();
    assert!(bit_set.get(5));
    assert!(bit_set.get(200));
    assert!(!bit_set.get(6));
    assert_eq!(bit_set.len(), 201);
    assert_eq!(bit_set.words_in_use(), 4);
    assert_eq!(bit_set.cardinality(), 2);

    bit_set.clear(200);
    assert_eq!(bit_set.words_in_use(), 1);
    assert_eq!(bit_set.len(), 6);
    bit_set.clear(5);
    assert!(bit_set.is_empty());
    assert_eq!(bit_set.words_in_use(), 0);

    // Clearing beyond the words in use never grows.
    let capacity = bit_set.capacity();
    bit_set.clear(1 << 40);
    assert_eq!(bit_set.capacity(), capacity);
}

#[test]
fn test_set_value() {
    let mut bit_set = LongArrayBitSet::new();
    bit_set.set_value(70, true).unwrap();
    assert!(bit_set.get(70));
    bit_set.set_value(70, false).unwrap();
    assert!(!bit_set.get(70));
    assert!(bit_set.is_empty());
}

#[test]
fn test_flip_twice_restores() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut bit_set = LongArrayBitSet::new();
    for _ in 0..200 {
        bit_set.set(rng.u64(0..1000)).unwrap();
    }
    for _ in 0..200 {
        let bit = rng.u64(0..2000);
        let before = bit_set.get(bit);
        let words = bit_set.to_long_array();
        bit_set.flip(bit).unwrap();
        assert_ne!(bit_set.get(bit), before);
        bit_set.flip(bit).unwrap();
        assert_eq!(bit_set.get(bit), before);
        assert_eq!(bit_set.to_long_array(), words);
    }
}

#[test]
fn test_prefix_cardinality_and_len() {
    for n in [0u64, 1, 63, 64, 65, 127, 128, 129, 1000] {
        let mut bit_set = LongArrayBitSet::new();
        bit_set.set_range(0..n).unwrap();
        assert_eq!(bit_set.cardinality(), n, "n = {n}");
        assert_eq!(bit_set.len(), n, "n = {n}");
    }
}

#[test]
fn test_growth_doubles() {
    let mut bit_set = LongArrayBitSet::new();
    assert_eq!(bit_set.array().size(), 1);
    bit_set.set(64).unwrap();
    assert_eq!(bit_set.array().size(), 2);
    bit_set.set(130).unwrap();
    assert_eq!(bit_set.array().size(), 4);
    bit_set.set(64 * 100).unwrap();
    assert_eq!(bit_set.array().size(), 101);
}

#[test]
fn test_sticky_size_survives_clone() {
    let mut sticky = LongArrayBitSet::with_capacity(1000);
    assert!(sticky.is_size_sticky());
    assert_eq!(sticky.capacity(), 1024);
    sticky.set(3).unwrap();
    let clone = sticky.try_clone().unwrap();
    assert_eq!(clone.array().size(), 16);
    assert!(clone.is_size_sticky());
    assert_eq!(clone, sticky);

    let mut loose = LongArrayBitSet::new();
    loose.set(1000).unwrap();
    loose.clear(1000);
    loose.set(3).unwrap();
    let clone = loose.try_clone().unwrap();
    assert_eq!(clone.array().size(), 1);
    assert_eq!(clone, loose);

    // Growing keeps the size sticky, so clones never fall below the capacity.
    sticky.set(5000).unwrap();
    assert!(sticky.is_size_sticky());
    sticky.clear(5000);
    let clone = sticky.try_clone().unwrap();
    assert!(clone.array().size() >= 16);
    assert_eq!(clone, sticky);
}

#[test]
fn test_sticky_clone_after_grow_and_clear() {
    let mut bit_set = LongArrayBitSet::with_capacity(128);
    bit_set.set(200).unwrap();
    bit_set.clear(200);
    assert!(bit_set.is_empty());
    let clone = bit_set.try_clone().unwrap();
    assert!(clone.is_size_sticky());
    assert!(clone.capacity() >= 128);
}

#[test]
fn test_trim_to_size() {
    let mut bit_set = LongArrayBitSet::with_capacity(64 * 10);
    bit_set.set(70).unwrap();
    bit_set.trim_to_size().unwrap();
    assert_eq!(bit_set.array().size(), 2);
    assert!(bit_set.get(70));
    bit_set.clear_all();
    bit_set.trim_to_size().unwrap();
    assert_eq!(bit_set.array().size(), 0);
    bit_set.set(1).unwrap();
    assert_eq!(bit_set.array().size(), 1);
}

#[test]
fn test_from_array_wraps_words() {
    let array = HeapLongArray::from(vec![0b101, 0, 1, 0, 0]);
    let bit_set = LongArrayBitSet::from_array(array);
    assert!(bit_set.is_size_sticky());
    assert_eq!(bit_set.words_in_use(), 3);
    assert_eq!(bit_set.iter().collect::<Vec<_>>(), vec![0, 2, 128]);
    assert_eq!(bit_set.into_array().size(), 5);
}

#[test]
fn test_word_and_byte_conversions() {
    let bit_set = LongArrayBitSet::from_words(&[1, 0, 1 << 8, 0, 0]);
    assert_eq!(bit_set.words_in_use(), 3);
    assert_eq!(bit_set.to_long_array(), vec![1, 0, 1 << 8]);

    let bytes = bit_set.to_byte_array();
    assert_eq!(bytes.len(), 18);
    assert_eq!(bytes[0], 1);
    assert_eq!(bytes[17], 1);
    assert_eq!(LongArrayBitSet::from_bytes(&bytes), bit_set);

    assert!(LongArrayBitSet::new().to_byte_array().is_empty());
    assert!(LongArrayBitSet::from_bytes(&[0, 0, 0]).is_empty());
    assert_eq!(
        LongArrayBitSet::from_bytes(&[0x80, 0x01]).iter().collect::<Vec<_>>(),
        vec![7, 8]
    );
}

#[test]
fn test_from_iter_and_iterators() {
    let bits = [3u64, 64, 1, 500, 64, 127];
    let bit_set: LongArrayBitSet = bits.iter().copied().collect();
    assert_eq!(bit_set.iter().collect::<Vec<_>>(), vec![1, 3, 64, 127, 500]);
    assert_eq!(bit_set.iter_rev().collect::<Vec<_>>(), vec![500, 127, 64, 3, 1]);
    assert_eq!((&bit_set).into_iter().count(), 5);
    assert_eq!(LongArrayBitSet::new().iter_rev().next(), None);
}

#[test]
fn test_display() {
    let bit_set: LongArrayBitSet = [0u64, 63, 64].into_iter().collect();
    assert_eq!(bit_set.to_string(), "{0, 63, 64}");
    assert_eq!(LongArrayBitSet::new().to_string(), "{}");
}

#[test]
fn test_equality_ignores_storage_size() {
    let mut a = LongArrayBitSet::with_capacity(64 * 8);
    let mut b = LongArrayBitSet::new();
    a.set(10).unwrap();
    b.set(10).unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    b.set(700).unwrap();
    assert_ne!(a, b);
    b.clear(700);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_clear_all() {
    let mut bit_set: LongArrayBitSet = (0..300u64).step_by(3).collect();
    let size = bit_set.array().size();
    bit_set.clear_all();
    assert!(bit_set.is_empty());
    assert_eq!(bit_set.array().size(), size);
    assert!(bit_set.array().words().iter().all(|&w| w == 0));
}

#[test]
fn test_random_single_bit_ops() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut bit_set = LongArrayBitSet::new();
    let mut oracle = Oracle::default();
    for _ in 0..5000 {
        let bit = rng.u64(0..3000);
        match rng.u8(0..3) {
            0 => {
                bit_set.set(bit).unwrap();
                oracle.set(bit, true);
            }
            1 => {
                bit_set.clear(bit);
                oracle.set(bit, false);
            }
            _ => {
                bit_set.flip(bit).unwrap();
                oracle.set(bit, !oracle.get(bit));
            }
        }
    }
    assert_eq!(bit_set.iter().collect::<Vec<_>>(), oracle.bits());
    assert_eq!(bit_set.len(), oracle.len());
    assert_eq!(bit_set.cardinality(), oracle.bits().len() as u64);
}
