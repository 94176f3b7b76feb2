//! Reference Genetic Algorithm population.
//!
//! A generic, domain-agnostic [`Population`](crate::evolve::Population)
//! implementation. Users describe their problem by implementing
//! [`CandidateProblem`]; [`GaPopulation`] supplies initialization,
//! parallel evaluation, elitist selection, crossover and mutation.
//!
//! # Core Traits
//!
//! - [`CandidateProblem`]: creation, evaluation and operators for a
//!   two-component candidate
//!
//! # Key Types
//!
//! - [`GaConfig`]: operator parameters (selection, rates, seed)
//! - [`GaPopulation`]: the population driven by
//!   [`Optimizer`](crate::evolve::Optimizer)
//! - [`PopulationError`]: failures raised by the population or the problem
//!
//! # Submodules
//!
//! - [`operators`]: slice-based crossover and mutation operators
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
mod error;
pub mod operators;
mod population;
mod selection;
mod types;

pub use config::GaConfig;
pub use error::PopulationError;
pub use population::GaPopulation;
pub use selection::Selection;
pub use types::CandidateProblem;
