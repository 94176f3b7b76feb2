//! Generic slice-based genetic operators.
//!
//! Building blocks for [`CandidateProblem::crossover`] and
//! [`CandidateProblem::mutate`](super::CandidateProblem::mutate)
//! implementations over flat buffers.
//!
//! # Crossover Operators
//!
//! - [`uniform_crossover`]: each gene drawn from either parent. O(n)
//! - [`one_point_crossover`]: prefix of one parent, suffix of the other. O(n)
//!
//! # Mutation Operators
//!
//! - [`bit_flip_mutation`]: flip each 0/1 gene with a fixed probability. O(n)
//! - [`creep_mutation`]: bounded uniform perturbation of real genes. O(n)
//!
//! # References
//!
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
//! - Davis (1991), *Handbook of Genetic Algorithms* (creep mutation)
//!
//! [`CandidateProblem::crossover`]: super::CandidateProblem::crossover

use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Uniform crossover: each position is copied from `parent1` or `parent2`
/// with equal probability.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn uniform_crossover<T: Copy, R: Rng>(parent1: &[T], parent2: &[T], rng: &mut R) -> Vec<T> {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );

    parent1
        .iter()
        .zip(parent2)
        .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
        .collect()
}

/// One-point crossover: `parent1[..cut] ++ parent2[cut..]` for a random cut.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn one_point_crossover<T: Copy, R: Rng>(parent1: &[T], parent2: &[T], rng: &mut R) -> Vec<T> {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n == 0 {
        return Vec::new();
    }

    let cut = rng.random_range(0..=n);
    let mut child = Vec::with_capacity(n);
    child.extend_from_slice(&parent1[..cut]);
    child.extend_from_slice(&parent2[cut..]);
    child
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Flips each 0/1 gene with probability `rate`. Returns the number of
/// flipped genes.
///
/// Non-zero genes are treated as 1 and become 0.
pub fn bit_flip_mutation<R: Rng>(bits: &mut [u8], rate: f64, rng: &mut R) -> usize {
    let rate = unit_rate(rate);
    let mut flipped = 0;
    for bit in bits.iter_mut() {
        if rng.random_bool(rate) {
            *bit = u8::from(*bit == 0);
            flipped += 1;
        }
    }
    flipped
}

/// Adds a uniform perturbation in `[-step, step]` to each gene with
/// probability `rate`, clamping the result into `[lower, upper]`.
/// Returns the number of perturbed genes.
///
/// # Panics
/// Panics if `lower > upper` or `step` is negative.
pub fn creep_mutation<R: Rng>(
    values: &mut [f64],
    rate: f64,
    step: f64,
    lower: f64,
    upper: f64,
    rng: &mut R,
) -> usize {
    assert!(lower <= upper, "lower bound must not exceed upper bound");
    assert!(step >= 0.0, "step must be non-negative");

    let rate = unit_rate(rate);
    let mut changed = 0;
    for v in values.iter_mut() {
        if rng.random_bool(rate) {
            let delta = if step > 0.0 {
                rng.random_range(-step..=step)
            } else {
                0.0
            };
            *v = (*v + delta).clamp(lower, upper);
            changed += 1;
        }
    }
    changed
}

fn unit_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}
