use thiserror::Error;

/// Errors raised by [`GaPopulation`](super::GaPopulation) and the problems
/// it evolves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PopulationError {
    #[error("population size must be at least 1, got {0}")]
    InvalidSize(usize),

    #[error("invalid GA configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid problem instance: {0}")]
    InvalidInstance(String),

    #[error("population used before initialize")]
    NotInitialized,

    #[error("fitness evaluation failed: {0}")]
    Evaluation(String),
}
