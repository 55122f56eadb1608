// tests/matcher_integration_test.rs
// End-to-end candidate ranking over seeded random hash sequences:
// length filtering, ordering, pruning behaviour and the parallel modes.

use std::collections::HashMap;

use ferrous_hashmatch::{
    Execution, MatchOpt, MatchResult, ParallelPruning, Symbol, length_window, match_sequence,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_sequence(rng: &mut StdRng, len: usize) -> Vec<Symbol> {
    (0..len).map(|_| rng.gen_range(0..=Symbol::MAX)).collect()
}

/// Candidates with ascending lengths spread around `center`.
fn random_candidates(rng: &mut StdRng, count: usize, center: usize, spread: usize) -> (Vec<Vec<Symbol>>, Vec<usize>) {
    let mut lengths: Vec<usize> = (0..count)
        .map(|_| rng.gen_range(center - spread..=center + spread))
        .collect();
    lengths.sort_unstable();
    let candidates = lengths.iter().map(|&len| random_sequence(rng, len)).collect();
    (candidates, lengths)
}

/// One bit flipped per position: Hamming distance 1 to the source everywhere.
fn noisy_copy(x: &[Symbol]) -> Vec<Symbol> {
    x.iter().enumerate().map(|(i, &v)| v ^ (1 << (i % 16))).collect()
}

fn exhaustive() -> Execution {
    Execution::Parallel {
        pruning: ParallelPruning::Disabled,
    }
}

#[test]
fn test_length_tolerance_scenario() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);
    let lengths = vec![80, 90, 100, 110, 120];
    let candidates: Vec<Vec<Symbol>> = lengths.iter().map(|&len| random_sequence(&mut rng, len)).collect();
    let query = random_sequence(&mut rng, 100);

    let opt = MatchOpt::default().with_execution(exhaustive());
    let results = match_sequence(&query, 100.0, &candidates, &lengths, &opt).unwrap();

    let mut indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn test_results_respect_tolerance_and_ordering() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let (candidates, lengths) = random_candidates(&mut rng, 60, 40, 15);
    let query = random_sequence(&mut rng, 40);

    for tolerance in [0.0, 0.05, 0.1, 0.3] {
        for execution in [
            Execution::Sequential,
            exhaustive(),
            Execution::Parallel {
                pruning: ParallelPruning::Shared,
            },
        ] {
            let opt = MatchOpt::default()
                .with_length_tolerance(tolerance)
                .with_execution(execution);
            let results = match_sequence(&query, 40.0, &candidates, &lengths, &opt).unwrap();

            for r in &results {
                let len = lengths[r.index] as f64;
                assert!(len >= (1.0 - tolerance) * 40.0, "{execution:?}: length {len} below window");
                assert!(len <= (1.0 + tolerance) * 40.0, "{execution:?}: length {len} above window");
                assert!(r.score >= 0.0, "{execution:?}: score {} for {}", r.score, r.index);
            }
            assert!(
                results.windows(2).all(|w| w[0].score <= w[1].score),
                "{execution:?}: scores not ascending"
            );
        }
    }
}

#[test]
fn test_exhaustive_mode_scores_whole_window() {
    let mut rng = StdRng::seed_from_u64(42);
    let (candidates, lengths) = random_candidates(&mut rng, 50, 30, 10);
    let query = random_sequence(&mut rng, 30);
    let opt = MatchOpt::default().with_execution(exhaustive());

    let results = match_sequence(&query, 30.0, &candidates, &lengths, &opt).unwrap();
    let window = length_window(&lengths, 30.0, opt.length_tolerance);
    assert_eq!(results.len(), window.len());

    let mut indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    indices.sort_unstable();
    assert_eq!(indices, window.collect::<Vec<_>>());
}

#[test]
fn test_pruned_modes_agree_with_exhaustive_scores() {
    let mut rng = StdRng::seed_from_u64(1234);
    let (candidates, lengths) = random_candidates(&mut rng, 40, 25, 5);
    let query = random_sequence(&mut rng, 25);
    let base = MatchOpt::default().with_length_tolerance(0.2).with_gully(0.5).with_penalty(2);

    let all: HashMap<usize, f64> = match_sequence(&query, 25.0, &candidates, &lengths, &base.clone().with_execution(exhaustive()))
        .unwrap()
        .into_iter()
        .map(|r| (r.index, r.score))
        .collect();

    let sequential = match_sequence(&query, 25.0, &candidates, &lengths, &base).unwrap();
    let shared = match_sequence(
        &query,
        25.0,
        &candidates,
        &lengths,
        &base.clone().with_execution(Execution::Parallel {
            pruning: ParallelPruning::Shared,
        }),
    )
    .unwrap();

    // The first candidate of the window always faces an infinite best.
    let window = length_window(&lengths, 25.0, 0.2);
    assert!(sequential.iter().any(|r| r.index == window.start));
    assert!(!shared.is_empty());

    for r in sequential.iter().chain(&shared) {
        assert_eq!(all.get(&r.index), Some(&r.score), "candidate {}", r.index);
    }
}

#[test]
fn test_noisy_copy_is_best_match() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(99);
    let query = random_sequence(&mut rng, 40);
    let mut candidates: Vec<Vec<Symbol>> = (0..20).map(|_| random_sequence(&mut rng, 40)).collect();
    candidates[13] = noisy_copy(&query);
    let lengths = vec![40; 20];

    let opt = MatchOpt::default().with_execution(exhaustive());
    let results = match_sequence(&query, 40.0, &candidates, &lengths, &opt).unwrap();
    assert_eq!(results.len(), 20);
    assert_eq!(results[0].index, 13);
    assert!(results[0].score < results[1].score);
}

#[test]
fn test_sequential_keeps_copy_at_window_start() {
    let mut rng = StdRng::seed_from_u64(100);
    let query = random_sequence(&mut rng, 32);
    let mut candidates: Vec<Vec<Symbol>> = vec![noisy_copy(&query)];
    candidates.extend((0..15).map(|_| random_sequence(&mut rng, 32)));
    let lengths = vec![32; 16];

    let results = match_sequence(&query, 32.0, &candidates, &lengths, &MatchOpt::default()).unwrap();
    assert_eq!(results[0].index, 0);
}

#[test]
fn test_identical_candidates_keep_index_order() {
    let query: Vec<Symbol> = vec![5, 9, 2, 1000, 4];
    let candidates = vec![query.clone(); 4];
    let lengths = vec![5; 4];
    let opt = MatchOpt::default().with_execution(exhaustive());

    let results = match_sequence(&query, 5.0, &candidates, &lengths, &opt).unwrap();
    assert_eq!(
        results,
        (0..4).map(|index| MatchResult { index, score: 0.0 }).collect::<Vec<_>>()
    );
}

#[test]
fn test_empty_window_returns_nothing() {
    let candidates = vec![vec![1 as Symbol; 10], vec![2; 50]];
    let results = match_sequence(&[1; 30], 30.0, &candidates, &[10, 50], &MatchOpt::default()).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_gully_zero_corner_decoys_rank_last() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(2024);
    // Query symbols keep the top bit clear, decoy filler sets it, so the
    // only zero-distance cells of a decoy are its two corners.
    let query: Vec<Symbol> = (0..12).map(|_| rng.gen_range(0..0x8000)).collect();
    let decoy = |rng: &mut StdRng| -> Vec<Symbol> {
        let mut d: Vec<Symbol> = (0..12).map(|_| rng.gen_range(0x8000..=Symbol::MAX)).collect();
        d[0] = query[11];
        d[11] = query[0];
        d
    };

    let mut candidates: Vec<Vec<Symbol>> = (0..6).map(|_| decoy(&mut rng)).collect();
    candidates.push(query.clone());
    candidates.extend((0..5).map(|_| random_sequence(&mut rng, 12)));
    let lengths = vec![12; candidates.len()];

    for execution in [
        Execution::Sequential,
        exhaustive(),
        Execution::Parallel {
            pruning: ParallelPruning::Shared,
        },
    ] {
        let opt = MatchOpt::default().with_gully(0.0).with_execution(execution);
        let results = match_sequence(&query, 12.0, &candidates, &lengths, &opt).unwrap();
        assert_eq!(results[0], MatchResult { index: 6, score: 0.0 }, "{execution:?}");
    }

    let opt = MatchOpt::default().with_gully(0.0).with_execution(exhaustive());
    let results = match_sequence(&query, 12.0, &candidates, &lengths, &opt).unwrap();
    let decoy_scores: Vec<f64> = results.iter().filter(|r| r.index < 6).map(|r| r.score).collect();
    assert_eq!(decoy_scores, vec![f64::INFINITY; 6]);
}
