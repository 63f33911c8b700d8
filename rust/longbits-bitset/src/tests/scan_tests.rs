use super::{Oracle, random_bit_set};
use crate::LongArrayBitSet;

fn oracle_next(oracle: &Oracle, from: u64, value: bool, limit: u64) -> Option<u64> {
    (from..limit).find(|&b| oracle.get(b) == value)
}

fn oracle_previous(oracle: &Oracle, from: u64, value: bool) -> Option<u64> {
    (0..=from).rev().find(|&b| oracle.get(b) == value)
}

#[test]
fn test_sticky_128_scenario() {
    let mut bit_set = LongArrayBitSet::with_capacity(128);
    for bit in [0, 63, 64, 127] {
        bit_set.set(bit).unwrap();
    }
    assert_eq!(bit_set.cardinality(), 4);
    assert_eq!(bit_set.next_set_bit(1), Some(63));
    assert_eq!(bit_set.previous_set_bit(127), Some(127));
    assert_eq!(bit_set.previous_set_bit(126), Some(64));
    assert_eq!(bit_set.capacity(), 128);
}

#[test]
fn test_scans_on_empty_set() {
    let bit_set = LongArrayBitSet::new();
    assert_eq!(bit_set.next_set_bit(0), None);
    assert_eq!(bit_set.next_clear_bit(0), 0);
    assert_eq!(bit_set.next_clear_bit(1000), 1000);
    assert_eq!(bit_set.previous_set_bit(1000), None);
    assert_eq!(bit_set.previous_clear_bit(1000), Some(1000));
    assert_eq!(bit_set.previous_clear_bit(0), Some(0));
}

#[test]
fn test_scan_boundaries() {
    let mut bit_set = LongArrayBitSet::new();
    bit_set.set_range(0..128).unwrap();
    assert_eq!(bit_set.next_clear_bit(0), 128);
    assert_eq!(bit_set.previous_clear_bit(127), None);
    assert_eq!(bit_set.previous_set_bit(0), Some(0));
    assert_eq!(bit_set.previous_set_bit(5000), Some(127));

    bit_set.clear(0);
    assert_eq!(bit_set.previous_set_bit(0), None);
    assert_eq!(bit_set.previous_clear_bit(100), Some(0));
    assert_eq!(bit_set.next_set_bit(0), Some(1));

    bit_set.clear(64);
    assert_eq!(bit_set.next_clear_bit(1), 64);
    assert_eq!(bit_set.previous_clear_bit(127), Some(64));
    assert_eq!(bit_set.next_set_bit(128), None);
}

#[test]
fn test_set_bit_loops() {
    let bits = vec![0u64, 5, 64, 640, 641, 9999];
    let bit_set: LongArrayBitSet = bits.iter().copied().collect();

    let mut forward = Vec::new();
    let mut next = bit_set.next_set_bit(0);
    while let Some(bit) = next {
        forward.push(bit);
        next = bit.checked_add(1).and_then(|from| bit_set.next_set_bit(from));
    }
    assert_eq!(forward, bits);

    let mut backward = Vec::new();
    let mut previous = bit_set
        .len()
        .checked_sub(1)
        .and_then(|from| bit_set.previous_set_bit(from));
    while let Some(bit) = previous {
        backward.push(bit);
        previous = bit.checked_sub(1).and_then(|from| bit_set.previous_set_bit(from));
    }
    backward.reverse();
    assert_eq!(backward, bits);
    let descending = bits.iter().rev().copied().collect::<Vec<_>>();
    assert_eq!(bit_set.iter_rev().collect::<Vec<_>>(), descending);
}

#[test]
fn test_scans_match_oracle() {
    let mut rng = fastrand::Rng::with_seed(2024);
    for round in 0..20 {
        let (mut bit_set, mut oracle) = random_bit_set(&mut rng, 40 + round * 10, 700);
        // Dense runs make clear-bit scans cross whole words.
        let start = rng.u64(0..500);
        bit_set.set_range(start..start + 150).unwrap();
        (start..start + 150).for_each(|b| oracle.set(b, true));

        let limit = bit_set.words_in_use() * 64;
        for from in 0..limit + 70 {
            assert_eq!(
                bit_set.next_set_bit(from),
                oracle_next(&oracle, from, true, limit),
                "next_set_bit({from})"
            );
            assert_eq!(
                bit_set.next_clear_bit(from),
                oracle_next(&oracle, from, false, limit).unwrap_or(from.max(limit)),
                "next_clear_bit({from})"
            );
            assert_eq!(
                bit_set.previous_set_bit(from),
                oracle_previous(&oracle, from, true),
                "previous_set_bit({from})"
            );
            assert_eq!(
                bit_set.previous_clear_bit(from),
                oracle_previous(&oracle, from, false),
                "previous_clear_bit({from})"
            );
        }
    }
}

#[test]
fn test_next_and_previous_bracket() {
    let mut rng = fastrand::Rng::with_seed(5);
    let (bit_set, oracle) = random_bit_set(&mut rng, 100, 2000);
    for x in 0..2100 {
        let Some(y) = bit_set.next_set_bit(x) else {
            assert_eq!(bit_set.previous_set_bit(x), bit_set.len().checked_sub(1));
            continue;
        };
        assert_eq!(bit_set.previous_set_bit(y), Some(y));
        let below = x.checked_sub(1).and_then(|from| bit_set.previous_set_bit(from));
        let expected = x
            .checked_sub(1)
            .and_then(|from| oracle_previous(&oracle, from, true));
        assert_eq!(below, expected);
        assert!(below.is_none_or(|b| b < x));
        assert!((x..y).all(|b| !bit_set.get(b)));
    }
}
