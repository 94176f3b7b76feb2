//! Reference population: elitist GA over a [`CandidateProblem`].

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use super::config::GaConfig;
use super::error::PopulationError;
use super::selection::cmp_fitness;
use super::types::CandidateProblem;
use crate::evolve::{BestView, DeepClone, Population};

/// One live candidate and its score.
struct Slot<X, Y> {
    x: X,
    y: Y,
    fitness: f64,
    // candidate changed since `fitness` was computed
    stale: bool,
}

impl<X: DeepClone, Y: DeepClone> Slot<X, Y> {
    fn copy(&self) -> Self {
        Self {
            x: self.x.deep_clone(),
            y: self.y.deep_clone(),
            fitness: self.fitness,
            stale: self.stale,
        }
    }
}

/// Generational GA population.
///
/// - **selection** keeps the `elite_count` best slots unchanged and refills
///   the rest with children of parents chosen by [`GaConfig::selection`];
/// - **mutate** perturbs each non-elite slot with probability
///   [`GaConfig::mutation_rate`].
///
/// Children and mutated slots are rescored at the end of `mutate`, so
/// [`best`](Population::best) always pairs a candidate with its own
/// fitness. Ties for the best slot go to the lowest index.
pub struct GaPopulation<P: CandidateProblem> {
    instance: Arc<P>,
    config: GaConfig,
    size: usize,
    slots: Vec<Slot<P::X, P::Y>>,
    elite_count: usize,
    rng: StdRng,
}

impl<P: CandidateProblem> GaPopulation<P> {
    /// Number of live slots (0 before initialization).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` before initialization.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fitness of every slot, in slot order.
    pub fn fitness(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.fitness).collect()
    }

    /// Number of elites kept by the last selection.
    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    fn ensure_initialized(&self) -> Result<(), PopulationError> {
        if self.slots.is_empty() {
            return Err(PopulationError::NotInitialized);
        }
        Ok(())
    }

    fn rescore(&mut self, only_stale: bool) -> Result<(), PopulationError> {
        let problem = &*self.instance;
        let score = |slot: &mut Slot<P::X, P::Y>| -> Result<(), PopulationError> {
            if only_stale && !slot.stale {
                return Ok(());
            }
            slot.fitness = problem.evaluate(&slot.x, &slot.y)?;
            slot.stale = false;
            Ok(())
        };

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return self.slots.par_iter_mut().try_for_each(score);
        }

        self.slots.iter_mut().try_for_each(score)
    }
}

impl<P: CandidateProblem> Population for GaPopulation<P> {
    type Instance = P;
    type X = P::X;
    type Y = P::Y;
    type Config = GaConfig;
    type Error = PopulationError;

    fn new(instance: Arc<P>, size: usize, config: &GaConfig) -> Result<Self, PopulationError> {
        if size == 0 {
            return Err(PopulationError::InvalidSize(size));
        }
        config.validate()?;
        instance.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        Ok(Self {
            instance,
            config: config.clone(),
            size,
            slots: Vec::with_capacity(size),
            elite_count: 0,
            rng,
        })
    }

    fn initialize(&mut self) -> Result<(), PopulationError> {
        let problem = &*self.instance;
        let rng = &mut self.rng;
        self.slots = (0..self.size)
            .map(|_| {
                let (x, y) = problem.create_candidate(rng);
                Slot {
                    x,
                    y,
                    fitness: f64::NAN,
                    stale: true,
                }
            })
            .collect();
        self.elite_count = 0;
        self.rescore(false)
    }

    fn evaluate(&mut self) -> Result<(), PopulationError> {
        self.ensure_initialized()?;
        self.rescore(false)
    }

    fn selection(&mut self) -> Result<(), PopulationError> {
        self.ensure_initialized()?;

        let n = self.slots.len();
        let elite_count = self.config.elite_count(n);
        let fitness = self.fitness();

        // stable sort: equal fitness keeps slot order
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| cmp_fitness(fitness[a], fitness[b]));

        let mut next: Vec<Slot<P::X, P::Y>> = Vec::with_capacity(n);
        next.extend(order[..elite_count].iter().map(|&i| self.slots[i].copy()));

        while next.len() < n {
            let a = self.config.selection.select(&fitness, &mut self.rng);
            let b = self.config.selection.select(&fitness, &mut self.rng);

            if self.rng.random_bool(self.config.crossover_rate) {
                let (pa, pb) = (&self.slots[a], &self.slots[b]);
                let (x, y) = self
                    .instance
                    .crossover((&pa.x, &pa.y), (&pb.x, &pb.y), &mut self.rng);
                next.push(Slot {
                    x,
                    y,
                    fitness: f64::NAN,
                    stale: true,
                });
            } else {
                next.push(self.slots[a].copy());
            }
        }

        trace!(elites = elite_count, size = n, "selection done");
        self.slots = next;
        self.elite_count = elite_count;
        Ok(())
    }

    fn mutate(&mut self) -> Result<(), PopulationError> {
        self.ensure_initialized()?;

        let problem = &*self.instance;
        let rate = self.config.mutation_rate;
        for slot in self.slots.iter_mut().skip(self.elite_count) {
            if self.rng.random_bool(rate) {
                problem.mutate(&mut slot.x, &mut slot.y, &mut self.rng);
                slot.stale = true;
            }
        }

        self.rescore(true)
    }

    /// # Panics
    /// Panics if called before [`initialize`](Population::initialize).
    fn best(&self) -> BestView<'_, P, P::X, P::Y> {
        let Some((mut best, rest)) = self.slots.split_first() else {
            panic!("GaPopulation::best called before initialize");
        };
        for slot in rest {
            if cmp_fitness(slot.fitness, best.fitness).is_lt() {
                best = slot;
            }
        }
        BestView::new(&self.instance, &best.x, &best.y, best.fitness)
    }
}

impl<P: CandidateProblem> std::fmt::Debug for GaPopulation<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaPopulation")
            .field("size", &self.size)
            .field("live", &self.slots.len())
            .field("elite_count", &self.elite_count)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
