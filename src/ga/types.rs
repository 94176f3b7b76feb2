//! Problem contract for the reference population.
//!
//! [`CandidateProblem`] is what a user implements to plug a domain into
//! [`GaPopulation`](super::GaPopulation): how to create, score, recombine
//! and perturb a two-component candidate.

use rand::Rng;

use super::error::PopulationError;
use crate::evolve::DeepClone;

/// Defines a problem evolved by [`GaPopulation`](super::GaPopulation).
///
/// A candidate is a pair `(X, Y)` of independent decision-variable groups.
/// Problems with a single group can use `()`-like placeholders such as an
/// empty `Vec<u8>` for `Y`.
///
/// # Thread Safety
///
/// `CandidateProblem` must be `Send + Sync` because the population may
/// score candidates in parallel using rayon.
///
/// # Implementing
///
/// ```ignore
/// struct Sphere { dim: usize }
///
/// impl CandidateProblem for Sphere {
///     type X = Vec<f64>;
///     type Y = Vec<f64>;
///
///     fn create_candidate<R: Rng>(&self, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
///         let x = (0..self.dim).map(|_| rng.random_range(-5.0..5.0)).collect();
///         (x, Vec::new())
///     }
///
///     fn evaluate(&self, x: &Vec<f64>, _y: &Vec<f64>) -> Result<f64, PopulationError> {
///         Ok(x.iter().map(|v| v * v).sum())
///     }
/// }
/// ```
pub trait CandidateProblem: Send + Sync {
    /// First candidate component.
    type X: DeepClone + Send + Sync;

    /// Second candidate component.
    type Y: DeepClone + Send + Sync;

    /// Checks the problem definition before a population is built on it.
    ///
    /// The default accepts every instance.
    fn validate(&self) -> Result<(), PopulationError> {
        Ok(())
    }

    /// Creates a random candidate.
    fn create_candidate<R: Rng>(&self, rng: &mut R) -> (Self::X, Self::Y);

    /// Scores a candidate. Lower is better.
    ///
    /// Must be a pure function of the candidate.
    fn evaluate(&self, x: &Self::X, y: &Self::Y) -> Result<f64, PopulationError>;

    /// Produces one child from two parents.
    ///
    /// The default copies the first parent (no crossover).
    fn crossover<R: Rng>(
        &self,
        first: (&Self::X, &Self::Y),
        _second: (&Self::X, &Self::Y),
        _rng: &mut R,
    ) -> (Self::X, Self::Y) {
        (first.0.deep_clone(), first.1.deep_clone())
    }

    /// Perturbs a candidate in place.
    ///
    /// The default is a no-op.
    fn mutate<R: Rng>(&self, _x: &mut Self::X, _y: &mut Self::Y, _rng: &mut R) {}
}
