//! GA population configuration.
//!
//! [`GaConfig`] holds the operator parameters of a
//! [`GaPopulation`](super::GaPopulation). Population size and generation
//! count are not part of it: they are arguments of
//! [`Optimizer::solve`](crate::evolve::Optimizer::solve).

use super::error::PopulationError;
use super::selection::Selection;

/// Configuration for the reference GA population.
///
/// # Defaults
///
/// ```
/// use u_evolve::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert!((config.mutation_rate - 0.1).abs() < 1e-12);
/// assert!(config.seed.is_none());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_selection(Selection::Rank)
///     .with_elite_ratio(0.05)
///     .with_mutation_rate(0.2)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Fraction of slots carried unchanged into the next generation
    /// (0.0–1.0). Elites are never mutated.
    pub elite_ratio: f64,

    /// Probability of recombining two parents (0.0–1.0).
    ///
    /// When crossover is not applied the first parent is copied.
    pub crossover_rate: f64,

    /// Probability of mutating a non-elite slot (0.0–1.0).
    pub mutation_rate: f64,

    /// Whether to score candidates in parallel using rayon.
    ///
    /// Ignored when the `parallel` feature is disabled.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            elite_ratio: 0.1,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Convenience for `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of elites kept in a population of `population_size`.
    ///
    /// Always leaves at least one non-elite slot when the population has
    /// more than one slot.
    pub fn elite_count(&self, population_size: usize) -> usize {
        let elites = (population_size as f64 * self.elite_ratio) as usize;
        elites.min(population_size.saturating_sub(1))
    }

    /// Validates the configuration.
    ///
    /// Rates set directly on the fields (bypassing the clamping builders)
    /// are checked here.
    pub fn validate(&self) -> Result<(), PopulationError> {
        for (name, value) in [
            ("elite_ratio", self.elite_ratio),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PopulationError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if let Selection::Tournament(0) = self.selection {
            return Err(PopulationError::InvalidConfig(
                "tournament size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
