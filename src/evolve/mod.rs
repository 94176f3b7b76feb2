//! Elitist generational optimizer.
//!
//! The [`Optimizer`] drives any [`Population`] through a fixed number of
//! evaluate → select → mutate generations and keeps an owned copy of the
//! best candidate ever observed. The population may rewrite its slots in
//! place as it likes; the tracked best is detached through [`DeepClone`]
//! and only replaced on strict improvement, so it never regresses and
//! never aliases live storage.
//!
//! # Core Traits
//!
//! - [`Population`]: the collaborator holding and evolving candidates
//! - [`DeepClone`]: copy contract for candidate components
//! - [`GenerationObserver`]: progress sink for logging or UIs
//!
//! # Key Types
//!
//! - [`Optimizer`]: executes the loop
//! - [`Solution`]: owned result value
//! - [`BestView`]: borrowed view of a population's current best

mod observer;
mod runner;
mod solution;
mod types;

pub use observer::{FitnessHistory, GenerationObserver, NoopObserver};
pub use runner::{Optimizer, SolutionOf};
pub use solution::{BestView, Solution};
pub use types::{DeepClone, Population};
