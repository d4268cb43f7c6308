//! Tournament selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;

/// Tournament selection: draw `k` individuals uniformly at random (with
/// replacement) and return the index of the fittest.
///
/// All comparisons assume **minimization**. A later draw replaces the current
/// winner when its fitness is `<=`, so equal-fitness contestants are never
/// discarded in favour of a strictly worse one.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );

    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() <= population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

/// Returns the fitter of two individuals, preferring `a` on ties.
pub fn fitter<'a, I: Individual>(a: &'a I, b: &'a I) -> &'a I {
    if a.fitness() <= b.fitness() {
        a
    } else {
        b
    }
}
