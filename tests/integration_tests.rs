use geoflux::SortError;
use geoflux::prelude::*;
use rand::Rng;

fn assert_sorts<T: FluxOrd + Ord + std::fmt::Debug>(mut input: Vec<T>) {
    let mut expected = input.clone();
    expected.sort();
    geoflux_sort(&mut input).unwrap();
    assert_eq!(input, expected);
}

#[test]
fn test_empty() {
    let mut data: Vec<i32> = vec![];
    geoflux_sort(&mut data).unwrap();
    assert!(data.is_empty());
}

#[test]
fn test_single_element() {
    let mut data = vec![42];
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, vec![42]);
}

#[test]
fn test_basic_sort() {
    let mut data = vec![64, 34, 25, 12, 22, 11, 90];
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, vec![11, 12, 22, 25, 34, 64, 90]);
}

#[test]
fn test_duplicates() {
    let mut data = vec![5, 2, 8, 2, 5, 5, 1, 8];
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, vec![1, 2, 2, 5, 5, 5, 8, 8]);
}

#[test]
fn test_reversed_small() {
    let mut data = vec![6, 5, 4, 3, 2, 1];
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_negatives() {
    let mut data = vec![3, -1, 4, -1, 5, -9, 2, -6];
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, vec![-9, -6, -1, -1, 2, 3, 4, 5]);
}

#[test]
fn test_already_sorted() {
    // Long enough to clear the insertion fast path; the sorted scan should
    // return without touching the data.
    let mut data: Vec<i32> = (0..500).collect();
    let expected = data.clone();
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, expected);
}

#[test]
fn test_all_equal() {
    let mut data = vec![7u32; 120];
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, vec![7u32; 120]);
}

#[test]
fn test_reversed_main_loop() {
    // Past the insertion fast path, so every migration mechanism runs.
    assert_sorts((1..=200).rev().collect::<Vec<i32>>());
}

#[test]
fn test_small_boundary_sizes() {
    // Crosses the fast-path boundary at 20 elements in both directions.
    let mut rng = rand::rng();
    for len in 0..=24 {
        let input: Vec<i32> = (0..len).map(|_| rng.random_range(-100..100)).collect();
        assert_sorts(input);
    }
}

#[test]
fn test_fuzz_random() {
    let mut rng = rand::rng();
    for _ in 0..500 {
        let len = rng.random_range(0..64);
        let input: Vec<i32> = (0..len).map(|_| rng.random_range(-1000..1000)).collect();
        assert_sorts(input);
    }
}

#[test]
fn test_fuzz_random_large() {
    let mut rng = rand::rng();

    // 40 iterations of larger sorts across a wide value range.
    for _ in 0..40 {
        let len = rng.random_range(200..800);
        let input: Vec<i64> = (0..len)
            .map(|_| rng.random_range(-1_000_000..1_000_000))
            .collect();
        assert_sorts(input);
    }
}

#[test]
fn test_clustered_bands() {
    // Three well-separated value bands, the distribution group migration is
    // built for.
    let mut rng = rand::rng();
    let mut input: Vec<u32> = Vec::with_capacity(600);
    for _ in 0..200 {
        input.push(rng.random_range(1..=10));
    }
    for _ in 0..200 {
        input.push(rng.random_range(40..=50));
    }
    for _ in 0..200 {
        input.push(rng.random_range(90..=100));
    }
    assert_sorts(input);
}

#[test]
fn test_nearly_sorted() {
    let mut rng = rand::rng();
    let mut input: Vec<i32> = (0..400).collect();
    // Disturb the tail only.
    for value in input.iter_mut().skip(360) {
        *value = rng.random_range(0..400);
    }
    assert_sorts(input);
}

#[test]
fn test_narrow_value_range() {
    // Two adjacent values force maximal grouping: everything is within
    // tolerance of everything else, so groups hit the length cap.
    let mut rng = rand::rng();
    let input: Vec<i32> = (0..300).map(|_| rng.random_range(100..=101)).collect();
    assert_sorts(input);
}

#[test]
fn test_type_diversity() {
    let mut rng = rand::rng();

    let input: Vec<u8> = (0..150).map(|_| rng.random()).collect();
    assert_sorts(input);

    let input: Vec<i16> = (0..150).map(|_| rng.random()).collect();
    assert_sorts(input);

    let input: Vec<u64> = (0..150).map(|_| rng.random()).collect();
    assert_sorts(input);
}

#[test]
fn test_floats() {
    let mut rng = rand::rng();
    let mut data: Vec<f64> = (0..300).map(|_| rng.random_range(-1e6..1e6)).collect();
    let mut expected = data.clone();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, expected);
}

#[test]
fn test_infinities_are_orderable() {
    // The span between two same-sign infinities is NaN, but every element
    // pair here is orderable, so the sort must succeed rather than error.
    let mut data: Vec<f64> = (0..50).rev().map(f64::from).collect();
    data.push(f64::INFINITY);
    data.push(f64::INFINITY);
    data.extend([-3.5, 12.0, f64::NEG_INFINITY, 0.25, f64::NEG_INFINITY, 7.0, -40.0]);

    let mut expected = data.clone();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, expected);
}

#[test]
fn test_nan_is_an_error_not_a_panic() {
    let mut data = vec![3.0, 1.0, f64::NAN, 2.0, 4.0];
    assert_eq!(geoflux_sort(&mut data), Err(SortError::Incomparable));
}

#[test]
fn test_failed_sort_preserves_elements() {
    fn sorted_bits(values: &[f64]) -> Vec<u64> {
        let mut bits: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        bits.sort_unstable();
        bits
    }

    let mut rng = rand::rng();
    let mut data: Vec<f64> = (0..64).map(|_| rng.random_range(-100.0..100.0)).collect();
    data[40] = f64::NAN;
    let original = sorted_bits(&data);

    assert_eq!(geoflux_sort(&mut data), Err(SortError::Incomparable));
    // Same multiset of bit patterns: nothing lost, nothing duplicated.
    assert_eq!(sorted_bits(&data), original);
}

#[test]
fn test_idempotent() {
    let mut rng = rand::rng();
    let mut data: Vec<i32> = (0..250).map(|_| rng.random_range(-500..500)).collect();
    geoflux_sort(&mut data).unwrap();
    let once = data.clone();
    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, once);
}

#[test]
fn test_tolerance_contract() {
    // Integer tolerances floor at 1 so narrow ranges still group.
    assert_eq!(i32::tolerance(4), Some(1));
    assert_eq!(i32::tolerance(100), Some(5));
    assert_eq!(i32::tolerance(0), None);
    assert_eq!(u8::tolerance(255), Some(12));

    // Floats keep the fraction and signal zero range with None.
    assert_eq!(f64::tolerance(0.0), None);
    let tol = f64::tolerance(10.0).unwrap();
    assert!((tol - 0.5).abs() < 1e-12);
}

#[test]
fn test_span_is_exact_at_extremes() {
    assert_eq!(5i32.span(&-3), 8u32);
    assert_eq!(i32::MIN.span(&i32::MAX), u32::MAX);
    assert_eq!(255u8.span(&0), 255);
    assert_eq!(1.5f64.span(&-2.5), 4.0);
}
