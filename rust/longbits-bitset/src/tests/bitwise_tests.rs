use longbits_array::LongArray;

use super::random_bit_set;
use crate::LongArrayBitSet;

#[test]
fn test_or_disjoint_ranges() {
    let mut a = LongArrayBitSet::with_capacity(70);
    let mut b = LongArrayBitSet::with_capacity(70);
    a.set_range(0..40).unwrap();
    b.set_range(40..70).unwrap();
    a.or(&b).unwrap();
    assert_eq!(a.cardinality(), 70);
    assert_eq!(a.len(), 70);
    assert_eq!(a.next_clear_bit(0), 70);
}

#[test]
fn test_and_then_or_restores_other() {
    let mut rng = fastrand::Rng::with_seed(11);
    for _ in 0..50 {
        let (b, _) = random_bit_set(&mut rng, 60, 1000);
        let (c, _) = random_bit_set(&mut rng, 60, 1000);
        let mut a = b.try_clone().unwrap();
        a.and(&c);
        a.or(&b).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_xor_with_self_copy_collapses() {
    let mut rng = fastrand::Rng::with_seed(12);
    let (mut a, _) = random_bit_set(&mut rng, 100, 5000);
    let copy = a.try_clone().unwrap();
    assert!(a.words_in_use() > 0);
    a.xor(&copy).unwrap();
    assert!(a.is_empty());
    assert_eq!(a.words_in_use(), 0);
    assert_eq!(a.cardinality(), 0);
}

#[test]
fn test_and_shrinks_words_in_use() {
    let mut a: LongArrayBitSet = [1u64, 500].into_iter().collect();
    let b: LongArrayBitSet = [1u64, 2].into_iter().collect();
    a.and(&b);
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![1]);
    assert_eq!(a.words_in_use(), 1);
    assert!(a.array().words().iter().all(|&w| w <= 2));

    a.and(&LongArrayBitSet::new());
    assert!(a.is_empty());
}

#[test]
fn test_or_and_xor_grow() {
    let mut a: LongArrayBitSet = [3u64].into_iter().collect();
    let b: LongArrayBitSet = [3u64, 1000].into_iter().collect();
    a.or(&b).unwrap();
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![3, 1000]);

    let mut c: LongArrayBitSet = [3u64].into_iter().collect();
    c.xor(&b).unwrap();
    assert_eq!(c.iter().collect::<Vec<_>>(), vec![1000]);
    assert_eq!(c.words_in_use(), 16);

    let mut d: LongArrayBitSet = [1000u64].into_iter().collect();
    d.xor(&b).unwrap();
    assert_eq!(d.iter().collect::<Vec<_>>(), vec![3]);
    assert_eq!(d.words_in_use(), 1);
}

#[test]
fn test_and_not() {
    let mut a: LongArrayBitSet = (0..200u64).collect();
    let b: LongArrayBitSet = (100..300u64).collect();
    a.and_not(&b);
    assert_eq!(a.len(), 100);
    assert_eq!(a.cardinality(), 100);
    assert_eq!(a.words_in_use(), 2);
}

#[test]
fn test_intersects() {
    let a: LongArrayBitSet = [5u64, 700].into_iter().collect();
    let b: LongArrayBitSet = [6u64, 700].into_iter().collect();
    let c: LongArrayBitSet = [6u64, 701].into_iter().collect();
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
    assert!(!a.intersects(&LongArrayBitSet::new()));
}

#[test]
fn test_random_bitwise_against_sets() {
    use std::collections::BTreeSet;

    let mut rng = fastrand::Rng::with_seed(77);
    for _ in 0..40 {
        let (a, _) = random_bit_set(&mut rng, 80, 1200);
        let (b, _) = random_bit_set(&mut rng, 80, 1200);
        let sa: BTreeSet<u64> = a.iter().collect();
        let sb: BTreeSet<u64> = b.iter().collect();

        let mut and = a.try_clone().unwrap();
        and.and(&b);
        assert_eq!(and.iter().collect::<BTreeSet<_>>(), &sa & &sb);

        let mut or = a.try_clone().unwrap();
        or.or(&b).unwrap();
        assert_eq!(or.iter().collect::<BTreeSet<_>>(), &sa | &sb);

        let mut xor = a.try_clone().unwrap();
        xor.xor(&b).unwrap();
        assert_eq!(xor.iter().collect::<BTreeSet<_>>(), &sa ^ &sb);

        let mut and_not = a.try_clone().unwrap();
        and_not.and_not(&b);
        assert_eq!(and_not.iter().collect::<BTreeSet<_>>(), &sa - &sb);

        assert_eq!(a.intersects(&b), !sa.is_disjoint(&sb));
    }
}
