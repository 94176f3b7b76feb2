//! Ready-made problem definitions for [`GaPopulation`](crate::ga::GaPopulation).
//!
//! - [`caching`]: joint object placement and transfer-rate assignment over
//!   users × objects × servers
//! - [`tensor`]: the dense buffer used by its candidates

pub mod caching;
pub mod tensor;

pub use caching::{CachingInstance, InstanceError, Objective};
pub use tensor::Tensor3;
