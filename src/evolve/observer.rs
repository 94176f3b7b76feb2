//! Per-generation progress hooks.

/// Receives progress events from a solve call.
///
/// Every method has a no-op default, so implementors only override what
/// they need. Fitness values reported here are always those of the
/// optimizer's tracked best, never of an unaccepted population candidate.
pub trait GenerationObserver {
    /// Called once, after the initial best has been copied.
    fn on_initialized(&mut self, _best_fitness: f64) {}

    /// Called after the elitism check of every generation (1-based).
    fn on_generation(&mut self, _generation: usize, _best_fitness: f64) {}

    /// Called when `generation` replaced the tracked best.
    fn on_improvement(&mut self, _generation: usize, _fitness: f64) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

/// Records the best-fitness trajectory of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessHistory {
    /// Tracked best fitness after initialization and after each generation.
    pub best_fitness: Vec<f64>,
    /// Generations that replaced the tracked best, in order.
    pub improvements: Vec<usize>,
}

impl FitnessHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of generations recorded (the initial entry excluded).
    pub fn generations(&self) -> usize {
        self.best_fitness.len().saturating_sub(1)
    }
}

impl GenerationObserver for FitnessHistory {
    fn on_initialized(&mut self, best_fitness: f64) {
        self.best_fitness.clear();
        self.improvements.clear();
        self.best_fitness.push(best_fitness);
    }

    fn on_generation(&mut self, _generation: usize, best_fitness: f64) {
        self.best_fitness.push(best_fitness);
    }

    fn on_improvement(&mut self, generation: usize, _fitness: f64) {
        self.improvements.push(generation);
    }
}

impl<O: GenerationObserver + ?Sized> GenerationObserver for &mut O {
    fn on_initialized(&mut self, best_fitness: f64) {
        (**self).on_initialized(best_fitness);
    }

    fn on_generation(&mut self, generation: usize, best_fitness: f64) {
        (**self).on_generation(generation, best_fitness);
    }

    fn on_improvement(&mut self, generation: usize, fitness: f64) {
        (**self).on_improvement(generation, fitness);
    }
}
