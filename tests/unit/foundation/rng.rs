use super::*;

#[test]
fn same_seed_same_stream() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..32 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn f64_01_in_range() {
    let mut r = Rng64::new(7);
    for _ in 0..1000 {
        let v = r.next_f64_01();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn uniform_respects_bounds() {
    let mut r = Rng64::new(9);
    for _ in 0..1000 {
        let v = r.uniform(-1.0, 1.0);
        assert!((-1.0..1.0).contains(&v));
    }
}

#[test]
fn range_inclusive_hits_both_ends() {
    let mut r = Rng64::new(42);
    let mut seen = [false; 3];
    for _ in 0..500 {
        let v = r.range_inclusive(2, 4);
        assert!((2..=4).contains(&v));
        seen[v - 2] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
fn sample_distinct_has_no_repeats() {
    let mut r = Rng64::new(5);
    let picks = r.sample_distinct(20, 6);
    assert_eq!(picks.len(), 6);
    let mut sorted = picks.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 6);
    assert!(picks.iter().all(|&i| i < 20));
}

#[test]
fn sample_distinct_clamps_to_population() {
    let mut r = Rng64::new(5);
    assert_eq!(r.sample_distinct(3, 10).len(), 3);
    assert!(r.sample_distinct(0, 2).is_empty());
}
