// Unit tests for business rules

use super::*;

/// Replays a fixed sequence of draws, cycling when exhausted
struct SequenceRandom {
    values: Vec<f64>,
    next: usize,
}

impl SequenceRandom {
    fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

#[test]
fn test_audio_strategy_table() {
    use AudioStrategy::*;

    assert_eq!(AudioStrategy::select(true, true, MixMode::Mix), Mix);
    assert_eq!(AudioStrategy::select(true, true, MixMode::Bgm), BgmOnly);
    assert_eq!(AudioStrategy::select(true, false, MixMode::Mix), SourceOnly);
    assert_eq!(AudioStrategy::select(true, false, MixMode::Bgm), SourceOnly);
    assert_eq!(AudioStrategy::select(false, true, MixMode::Mix), BgmOnly);
    assert_eq!(AudioStrategy::select(false, true, MixMode::Bgm), BgmOnly);
    assert_eq!(AudioStrategy::select(false, false, MixMode::Mix), Silent);
    assert_eq!(AudioStrategy::select(false, false, MixMode::Bgm), Silent);
}

#[test]
fn test_audio_strategy_inputs() {
    assert!(AudioStrategy::Mix.uses_bgm());
    assert!(AudioStrategy::Mix.uses_source());
    assert!(!AudioStrategy::BgmOnly.uses_source());
    assert!(!AudioStrategy::SourceOnly.uses_bgm());
    assert!(!AudioStrategy::Silent.has_output());
}

#[test]
fn test_explicit_duration_is_clamped() {
    let mut rng = SequenceRandom::new(&[0.5]);
    assert_eq!(DurationResolver::resolve(Some(0.0), 10.0, 25.0, &mut rng).total, 5.0);
    assert_eq!(DurationResolver::resolve(Some(1000.0), 10.0, 25.0, &mut rng).total, 60.0);
    assert_eq!(DurationResolver::resolve(Some(12.346), 10.0, 25.0, &mut rng).total, 12.35);
}

#[test]
fn test_random_duration_uses_draw() {
    let mut rng = SequenceRandom::new(&[0.5]);
    let plan = DurationResolver::resolve(None, 10.0, 25.0, &mut rng);
    assert_eq!(plan.total, 17.5);
}

#[test]
fn test_random_duration_always_within_bounds() {
    let draws = [0.0, 0.1, 0.37, 0.5, 0.9, 0.999_999];
    let bounds = [(10.0, 25.0), (0.0, 1.0), (50.0, 1000.0), (25.0, 10.0), (-5.0, 3.0)];
    for &(min, max) in &bounds {
        for &draw in &draws {
            let mut rng = SequenceRandom::new(&[draw]);
            let total = DurationResolver::resolve(None, min, max, &mut rng).total;
            assert!(
                (MIN_TOTAL_SECONDS..=MAX_TOTAL_SECONDS).contains(&total),
                "{} out of range for bounds ({}, {})",
                total,
                min,
                max
            );
        }
    }
}

#[test]
fn test_non_finite_explicit_falls_back_to_draw() {
    let mut rng = SequenceRandom::new(&[0.0]);
    let plan = DurationResolver::resolve(Some(f64::NAN), 12.0, 20.0, &mut rng);
    assert_eq!(plan.total, 12.0);
}

#[test]
fn test_pick_index() {
    let mut rng = SequenceRandom::new(&[0.0, 0.5, 0.999_999]);
    assert_eq!(pick_index(&mut rng, 4), Some(0));
    assert_eq!(pick_index(&mut rng, 4), Some(2));
    assert_eq!(pick_index(&mut rng, 4), Some(3));
    assert_eq!(pick_index(&mut rng, 0), None);
}

#[test]
fn test_shuffle_is_a_permutation() {
    let mut rng = SequenceRandom::new(&[0.3, 0.8, 0.1, 0.6]);
    let mut items = vec![1, 2, 3, 4, 5];
    shuffle(&mut rng, &mut items);
    let mut sorted = items.clone();
    sorted.sort();
    assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_shuffle_with_zero_draws_rotates_deterministically() {
    // j is always 0: each position i swaps with the head
    let mut rng = SequenceRandom::new(&[0.0]);
    let mut items = vec!["a", "b", "c"];
    shuffle(&mut rng, &mut items);
    assert_eq!(items, vec!["b", "c", "a"]);
}
