//! Elitist generational evolutionary optimizer.
//!
//! - **evolve**: the optimization driver. [`evolve::Optimizer`] runs a
//!   fixed number of evaluate → select → mutate generations over any
//!   [`evolve::Population`] and returns the best candidate ever seen as an
//!   owned [`evolve::Solution`], detached from population storage and
//!   stamped with the run's wall-clock time.
//! - **ga**: a reference population with tournament/roulette/rank
//!   selection, in-population elitism, crossover, mutation and optional
//!   rayon-parallel evaluation over a user-defined
//!   [`ga::CandidateProblem`].
//! - **problems**: ready-made problem definitions, currently a
//!   placement/transfer-rate caching problem.
//!
//! # Architecture
//!
//! The driver depends on nothing but the [`evolve::Population`] contract:
//! encodings, operators and fitness functions all live with the
//! collaborators. Logging goes through `tracing`; the library never
//! installs a subscriber.

pub mod evolve;
pub mod ga;
pub mod problems;
