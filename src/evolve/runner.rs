//! Generational loop execution.
//!
//! [`Optimizer`] drives a [`Population`] through
//! initialization → (evaluation → selection → mutation → elitism check) × n
//! and keeps an owned copy of the best candidate ever seen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, debug_span, info, trace};

use super::observer::{GenerationObserver, NoopObserver};
use super::solution::Solution;
use super::types::Population;

/// The [`Solution`] type produced when optimizing with population `P`.
pub type SolutionOf<P> =
    Solution<<P as Population>::Instance, <P as Population>::X, <P as Population>::Y>;

/// Elitist generational optimizer.
///
/// The optimizer is bound to one problem definition and can run any number
/// of independent solves over it. Each solve builds a fresh population.
///
/// # Usage
///
/// ```ignore
/// let optimizer = Optimizer::<GaPopulation<MyProblem>>::new(Arc::new(problem))
///     .with_population_config(GaConfig::default().with_seed(42));
/// let best = optimizer.solve(200, 50)?;
/// println!("fitness {} in {:?} ms", best.fitness, best.execution_time_ms);
/// ```
pub struct Optimizer<P: Population> {
    instance: Arc<P::Instance>,
    config: P::Config,
}

impl<P: Population> Optimizer<P> {
    /// Creates an optimizer with the population's default configuration.
    pub fn new(instance: Arc<P::Instance>) -> Self {
        Self {
            instance,
            config: P::Config::default(),
        }
    }

    /// Sets the configuration handed to every population this optimizer
    /// creates.
    pub fn with_population_config(mut self, config: P::Config) -> Self {
        self.config = config;
        self
    }

    /// The bound problem definition.
    pub fn instance(&self) -> &Arc<P::Instance> {
        &self.instance
    }

    /// The population configuration.
    pub fn population_config(&self) -> &P::Config {
        &self.config
    }

    /// Runs `iterations` generations over a population of `population_size`
    /// and returns the best solution observed.
    ///
    /// `iterations == 0` is valid and returns the best initial candidate.
    /// The returned solution carries the elapsed time of the whole call.
    ///
    /// # Errors
    ///
    /// Any error raised by the population (including a rejected
    /// `population_size`) is returned unchanged. No partial result is
    /// produced.
    pub fn solve(
        &self,
        iterations: usize,
        population_size: usize,
    ) -> Result<SolutionOf<P>, P::Error> {
        self.solve_observed(iterations, population_size, None, NoopObserver)
    }

    /// Like [`solve`](Self::solve), with an optional cancellation flag.
    ///
    /// The flag is polled before every generation. Once it is set the loop
    /// stops and the best solution found so far is returned, stamped with
    /// the elapsed time.
    pub fn solve_with_cancel(
        &self,
        iterations: usize,
        population_size: usize,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SolutionOf<P>, P::Error> {
        self.solve_observed(iterations, population_size, cancel, NoopObserver)
    }

    /// Like [`solve_with_cancel`](Self::solve_with_cancel), reporting
    /// progress to `observer`.
    pub fn solve_observed<O: GenerationObserver>(
        &self,
        iterations: usize,
        population_size: usize,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: O,
    ) -> Result<SolutionOf<P>, P::Error> {
        let span = debug_span!("solve", iterations, population_size);
        let _guard = span.enter();
        let start = Instant::now();

        let mut population = P::new(Arc::clone(&self.instance), population_size, &self.config)?;
        population.initialize()?;

        // The view borrows live slots; keep a copy.
        let mut best = population.best().to_solution();
        debug!(fitness = best.fitness, "population initialized");
        observer.on_initialized(best.fitness);

        let mut completed = 0usize;
        for generation in 1..=iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break;
                }
            }

            population.evaluate()?;
            population.selection()?;
            population.mutate()?;

            let view = population.best();
            if best.is_improved_by(view.fitness) {
                let mut candidate = view.to_solution();
                candidate.generation = generation;
                debug!(
                    generation,
                    previous = best.fitness,
                    fitness = candidate.fitness,
                    "new best"
                );
                best = candidate;
                observer.on_improvement(generation, best.fitness);
            }

            trace!(generation, best = best.fitness, "generation done");
            observer.on_generation(generation, best.fitness);
            completed = generation;
        }

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        best.execution_time_ms = Some(elapsed_ms);

        if completed < iterations {
            info!(
                generations = completed,
                fitness = best.fitness,
                elapsed_ms,
                "solve cancelled"
            );
        } else {
            info!(
                generations = completed,
                fitness = best.fitness,
                elapsed_ms,
                "solve finished"
            );
        }

        Ok(best)
    }
}

impl<P: Population> std::fmt::Debug for Optimizer<P>
where
    P::Config: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Optimizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
