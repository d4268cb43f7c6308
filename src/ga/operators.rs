//! Generic operators for position-aligned chromosomes.
//!
//! These work on plain gene slices whose index order is shared by every
//! individual in a run, so position `i` means the same decision in both
//! parents.
//!
//! # Crossover Operators
//!
//! - [`single_point_crossover`]: prefix of one parent, suffix of the other, O(n)
//!
//! # Mutation Helpers
//!
//! - [`mutation_sites`]: independent per-gene Bernoulli draws, O(n)
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

use rand::Rng;

/// Single-point crossover.
///
/// Returns `parent1[..cut]` followed by `parent2[cut..]`.
///
/// # Panics
/// Panics if parents have different lengths or `cut > len`.
pub fn single_point_crossover<T: Clone>(parent1: &[T], parent2: &[T], cut: usize) -> Vec<T> {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(cut <= n, "cut point {cut} out of range for length {n}");

    let mut child = Vec::with_capacity(n);
    child.extend_from_slice(&parent1[..cut]);
    child.extend_from_slice(&parent2[cut..]);
    child
}

/// Draws a cut point uniformly from `[0, len)`.
///
/// # Panics
/// Panics if `len == 0`.
pub fn random_cut_point<R: Rng>(len: usize, rng: &mut R) -> usize {
    assert!(len > 0, "cannot cut an empty chromosome");
    rng.random_range(0..len)
}

/// Selects gene positions to mutate, each independently with probability `rate`.
///
/// Returned indices are strictly increasing.
pub fn mutation_sites<R: Rng>(len: usize, rate: f64, rng: &mut R) -> Vec<usize> {
    let rate = rate.clamp(0.0, 1.0);
    (0..len).filter(|_| rng.random_bool(rate)).collect()
}

/// Picks a uniformly random index in `[0, n)` different from `current`
/// whenever `n > 1`.
///
/// # Panics
/// Panics if `n == 0`.
pub fn random_other_index<R: Rng>(n: usize, current: Option<usize>, rng: &mut R) -> usize {
    assert!(n > 0, "cannot pick from an empty range");
    match current {
        Some(cur) if n > 1 && cur < n => {
            let idx = rng.random_range(0..n - 1);
            if idx >= cur {
                idx + 1
            } else {
                idx
            }
        }
        _ => rng.random_range(0..n),
    }
}
