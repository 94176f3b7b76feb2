//! Parent selection strategies.
//!
//! Strategies work on a slice of fitness values and return the index of the
//! chosen slot, so they apply to any population layout.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use rand::Rng;
use std::cmp::Ordering;

/// Selection strategy for choosing parents.
///
/// All strategies assume **minimization** (lower fitness = better). NaN
/// fitness values are treated as worse than any number.
///
/// # Examples
///
/// ```
/// use u_evolve::ga::Selection;
///
/// let sel = Selection::Tournament(3);
/// assert_eq!(sel, Selection::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Pick `k` slots at random (with replacement), keep the best.
    ///
    /// Higher `k` means stronger selection pressure; `k = 1` is uniform.
    Tournament(usize),

    /// Fitness-proportionate selection on inverted fitness.
    ///
    /// Weight of slot `i` is `max_fitness - fitness_i + floor`, where the
    /// floor is 1% of the finite fitness span. Slots with `+inf` or NaN
    /// fitness get no weight.
    Roulette,

    /// Linear ranking: the best slot weighs `n`, the worst weighs `1`.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a slot index from `fitness`.
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn select<R: Rng>(&self, fitness: &[f64], rng: &mut R) -> usize {
        assert!(!fitness.is_empty(), "cannot select from empty population");

        match self {
            Selection::Tournament(k) => tournament(fitness, *k, rng),
            Selection::Roulette => roulette(fitness, rng),
            Selection::Rank => rank(fitness, rng),
        }
    }
}

/// Total order used for ranking: ascending, NaN last.
pub(crate) fn cmp_fitness(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

fn tournament<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitness.len();

    let mut best = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if cmp_fitness(fitness[idx], fitness[best]) == Ordering::Less {
            best = idx;
        }
    }
    best
}

fn roulette<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let (min, max) = fitness
        .iter()
        .filter(|f| f.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &f| {
            (lo.min(f), hi.max(f))
        });
    if max < min {
        // no finite fitness at all
        return rng.random_range(0..n);
    }

    let span = max - min;
    let floor = if span > 0.0 { span * 0.01 } else { 1.0 };
    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| {
            if f.is_finite() {
                max - f + floor
            } else if f == f64::NEG_INFINITY {
                (span + floor) * n as f64
            } else {
                0.0
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1
}

fn rank<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| cmp_fitness(fitness[a], fitness[b]));

    // weight of rank r (0 = best) is n - r
    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (r, &idx) in order.iter().enumerate() {
        cumulative += (n - r) as f64;
        if cumulative > threshold {
            return idx;
        }
    }

    order[n - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn counts(sel: Selection, fitness: &[f64], draws: usize) -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = vec![0u32; fitness.len()];
        for _ in 0..draws {
            counts[sel.select(fitness, &mut rng)] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_best() {
        let c = counts(Selection::Tournament(4), &[10.0, 5.0, 1.0, 8.0], 10_000);
        assert!(c[2] > 6000, "expected best >60%, got {c:?}");
    }

    #[test]
    fn test_tournament_size_1_is_uniform() {
        let c = counts(Selection::Tournament(1), &[10.0, 5.0, 1.0, 8.0], 10_000);
        for &n in &c {
            assert!(n > 1500, "expected uniform, got {c:?}");
        }
    }

    #[test]
    fn test_tournament_size_0_behaves_like_1() {
        let c = counts(Selection::Tournament(0), &[3.0, 1.0], 2_000);
        assert!(c[0] > 700 && c[1] > 700, "got {c:?}");
    }

    #[test]
    fn test_roulette_favors_best() {
        let c = counts(Selection::Roulette, &[100.0, 50.0, 1.0, 80.0], 10_000);
        assert!(c[2] > c[0], "best should beat worst: {c:?}");
    }

    #[test]
    fn test_roulette_handles_infinite_fitness() {
        let c = counts(Selection::Roulette, &[f64::INFINITY, 2.0, f64::NAN], 5_000);
        assert!(c[1] > c[0] && c[1] > c[2], "finite slot should dominate: {c:?}");

        let c = counts(Selection::Roulette, &[f64::INFINITY, f64::INFINITY], 1_000);
        assert_eq!(c.iter().sum::<u32>(), 1_000);
    }

    #[test]
    fn test_rank_favors_best() {
        let c = counts(Selection::Rank, &[100.0, 50.0, 1.0, 80.0], 10_000);
        assert!(c[2] > c[0], "best should beat worst: {c:?}");
    }

    #[test]
    fn test_rank_puts_nan_last() {
        let c = counts(Selection::Rank, &[f64::NAN, 4.0, 3.0], 10_000);
        assert!(c[2] > c[1] && c[1] > c[0], "got {c:?}");
    }

    #[test]
    fn test_single_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        for sel in [Selection::Tournament(3), Selection::Roulette, Selection::Rank] {
            assert_eq!(sel.select(&[5.0], &mut rng), 0);
        }
    }

    #[test]
    fn test_cmp_fitness_orders_nan_last() {
        assert_eq!(cmp_fitness(1.0, 2.0), Ordering::Less);
        assert_eq!(cmp_fitness(f64::NAN, 2.0), Ordering::Greater);
        assert_eq!(cmp_fitness(2.0, f64::NAN), Ordering::Less);
        assert_eq!(cmp_fitness(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_panics() {
        let mut rng = StdRng::seed_from_u64(42);
        Selection::Tournament(3).select(&[], &mut rng);
    }
}
