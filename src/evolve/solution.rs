//! Result values and the deep-copy boundary.
//!
//! [`BestView`] is what a population hands out: a borrowed look at its
//! current best slot. [`Solution`] is what the optimizer keeps and returns:
//! an owned value that no population can reach.

use std::fmt;
use std::sync::Arc;

use super::types::DeepClone;

/// Borrowed view of a population's current best candidate.
///
/// The references point into live population storage, so the view cannot
/// outlive the population borrow it came from. Use
/// [`to_solution`](BestView::to_solution) to keep it.
pub struct BestView<'a, I: ?Sized, X, Y> {
    /// Problem definition shared by the population.
    pub instance: &'a Arc<I>,
    /// First component of the best candidate.
    pub x: &'a X,
    /// Second component of the best candidate.
    pub y: &'a Y,
    /// Fitness of the best candidate (lower is better).
    pub fitness: f64,
}

impl<'a, I: ?Sized, X, Y> BestView<'a, I, X, Y> {
    /// Bundles borrowed parts into a view.
    pub fn new(instance: &'a Arc<I>, x: &'a X, y: &'a Y, fitness: f64) -> Self {
        Self {
            instance,
            x,
            y,
            fitness,
        }
    }
}

impl<I: ?Sized, X: DeepClone, Y: DeepClone> BestView<'_, I, X, Y> {
    /// Deep-copies the viewed candidate into an owned [`Solution`].
    ///
    /// The problem definition is shared, not copied. The returned solution
    /// has no execution time and a generation tag of 0.
    pub fn to_solution(&self) -> Solution<I, X, Y> {
        Solution {
            instance: Arc::clone(self.instance),
            x: self.x.deep_clone(),
            y: self.y.deep_clone(),
            fitness: self.fitness,
            execution_time_ms: None,
            generation: 0,
        }
    }
}

impl<I: ?Sized, X: fmt::Debug, Y: fmt::Debug> fmt::Debug for BestView<'_, I, X, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestView")
            .field("x", self.x)
            .field("y", self.y)
            .field("fitness", &self.fitness)
            .finish_non_exhaustive()
    }
}

/// An owned optimization result.
///
/// A `Solution` owns its candidate buffers outright; the only thing it
/// shares is the immutable problem definition. It does not implement
/// [`Clone`]: copies go through [`deep_clone`](Solution::deep_clone) so the
/// no-aliasing contract stays visible at every call site.
pub struct Solution<I: ?Sized, X, Y> {
    /// Problem definition this solution belongs to.
    pub instance: Arc<I>,
    /// First candidate component.
    pub x: X,
    /// Second candidate component.
    pub y: Y,
    /// Fitness value (lower is better).
    pub fitness: f64,
    /// Wall-clock milliseconds of the whole solve call.
    ///
    /// `None` until the optimizer stamps the value it returns.
    pub execution_time_ms: Option<u64>,
    /// Generation at which this solution became the tracked best.
    ///
    /// 0 means it came from the initial population.
    pub generation: usize,
}

impl<I: ?Sized, X: DeepClone, Y: DeepClone> Solution<I, X, Y> {
    /// Returns a copy sharing no candidate storage with `self`.
    ///
    /// Scalars, including the execution time and generation tag, are
    /// copied verbatim.
    pub fn deep_clone(&self) -> Self {
        Self {
            instance: Arc::clone(&self.instance),
            x: self.x.deep_clone(),
            y: self.y.deep_clone(),
            fitness: self.fitness,
            execution_time_ms: self.execution_time_ms,
            generation: self.generation,
        }
    }
}

impl<I: ?Sized, X, Y> Solution<I, X, Y> {
    /// Borrows this solution as a [`BestView`].
    pub fn view(&self) -> BestView<'_, I, X, Y> {
        BestView::new(&self.instance, &self.x, &self.y, self.fitness)
    }

    /// Returns `true` if `candidate` strictly improves on this solution.
    ///
    /// Ties do not count, and a NaN fitness never improves anything.
    pub fn is_improved_by(&self, candidate: f64) -> bool {
        candidate < self.fitness
    }
}

impl<I: ?Sized, X: fmt::Debug, Y: fmt::Debug> fmt::Debug for Solution<I, X, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solution")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("fitness", &self.fitness)
            .field("execution_time_ms", &self.execution_time_ms)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
