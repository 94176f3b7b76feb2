//! Joint object placement and transfer-rate assignment.
//!
//! Users request objects that can be served from any of several servers.
//! A candidate decides, for every user/object pair, which server serves it
//! (X, a one-hot 0/1 tensor) and at what rate (Y, a real tensor). An object
//! occupies storage on every server that serves it to at least one user.
//!
//! The objective maximizes `Q = U - G - H`:
//!
//! - `U`: delivered volume, `Σ x·y·b_n`
//! - `G`: transfer cost, `Σ x·y·b_n·k_s`
//! - `H`: storage cost, `Σ d_ns` over stored `(n, s)`
//!
//! Fitness is `-Q + penalty · violations`, so lower is better. A violation
//! is a user/object pair not served by exactly one server, a server whose
//! stored volume exceeds its capacity, a server link whose summed rate
//! exceeds its capacity, or an assigned rate outside the pair's bounds.

use rand::Rng;
use thiserror::Error;

use super::tensor::Tensor3;
use crate::ga::operators::creep_mutation;
use crate::ga::{CandidateProblem, PopulationError};

/// Problem definition errors, reported before any population is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    #[error("{axis} must be at least 1")]
    EmptyAxis { axis: &'static str },

    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} must be finite and non-negative")]
    InvalidValue { field: &'static str },

    #[error("{field} must not be NaN or negative")]
    InvalidCapacity { field: &'static str },

    #[error("rate bounds [{min}, {max}] are invalid")]
    InvalidRateBounds { min: f64, max: f64 },
}

impl From<InstanceError> for PopulationError {
    fn from(err: InstanceError) -> Self {
        PopulationError::InvalidInstance(err.to_string())
    }
}

/// Objective terms of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Objective {
    /// Delivered volume `U`.
    pub utility: f64,
    /// Transfer cost `G`.
    pub transfer_cost: f64,
    /// Storage cost `H`.
    pub storage_cost: f64,
    /// Number of constraint violations.
    pub violations: usize,
}

impl Objective {
    /// `U - G - H`.
    pub fn net_value(&self) -> f64 {
        self.utility - self.transfer_cost - self.storage_cost
    }
}

/// A caching/delivery problem instance.
///
/// ```
/// use u_evolve::problems::caching::CachingInstance;
///
/// let instance = CachingInstance::new(3, 4, 2)
///     .with_link_cost(vec![0.1, 0.4])
///     .with_rate_bounds(0.2, 2.0);
/// assert!(instance.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CachingInstance {
    /// Number of users.
    pub users: usize,
    /// Number of objects.
    pub objects: usize,
    /// Number of servers.
    pub servers: usize,
    /// Object sizes `b_n` (length `objects`).
    pub object_sizes: Vec<f64>,
    /// Server capacities `B_s` (length `servers`).
    pub server_capacity: Vec<f64>,
    /// Storage costs `d_ns`, object-major (length `objects * servers`).
    pub storage_cost: Vec<f64>,
    /// Per-unit transfer cost `k_s` of each server (length `servers`).
    pub link_cost: Vec<f64>,
    /// Capacity `C_l` of each server's link, in summed rate (length
    /// `servers`, `f64::INFINITY` for an unlimited link).
    pub link_capacity: Vec<f64>,
    /// Lowest admissible rate of each served pair, user-major (length
    /// `users * objects`).
    pub min_rate: Vec<f64>,
    /// Highest admissible rate of each served pair, user-major (length
    /// `users * objects`).
    pub max_rate: Vec<f64>,
    /// Fitness added per violation.
    pub penalty: f64,
}

impl CachingInstance {
    /// Unit-size objects, servers large enough for every object, storage
    /// cost 0.1, transfer cost 0.2, unlimited links, rates in `[0.1, 1.0]`,
    /// penalty 100.
    pub fn new(users: usize, objects: usize, servers: usize) -> Self {
        Self {
            users,
            objects,
            servers,
            object_sizes: vec![1.0; objects],
            server_capacity: vec![objects as f64; servers],
            storage_cost: vec![0.1; objects * servers],
            link_cost: vec![0.2; servers],
            link_capacity: vec![f64::INFINITY; servers],
            min_rate: vec![0.1; users * objects],
            max_rate: vec![1.0; users * objects],
            penalty: 100.0,
        }
    }

    /// Sets the object sizes `b_n`.
    pub fn with_object_sizes(mut self, sizes: Vec<f64>) -> Self {
        self.object_sizes = sizes;
        self
    }

    /// Sets the server storage capacities `B_s`.
    pub fn with_server_capacity(mut self, capacity: Vec<f64>) -> Self {
        self.server_capacity = capacity;
        self
    }

    /// Sets the storage costs `d_ns`, object-major.
    pub fn with_storage_cost(mut self, cost: Vec<f64>) -> Self {
        self.storage_cost = cost;
        self
    }

    /// Sets the per-unit transfer cost of each server link.
    pub fn with_link_cost(mut self, cost: Vec<f64>) -> Self {
        self.link_cost = cost;
        self
    }

    /// Sets the capacity of each server link.
    pub fn with_link_capacity(mut self, capacity: Vec<f64>) -> Self {
        self.link_capacity = capacity;
        self
    }

    /// Sets the same rate bounds for every user/object pair.
    pub fn with_rate_bounds(mut self, min: f64, max: f64) -> Self {
        let pairs = self.users * self.objects;
        self.min_rate = vec![min; pairs];
        self.max_rate = vec![max; pairs];
        self
    }

    /// Sets per-pair rate bounds, user-major.
    pub fn with_pair_rate_bounds(mut self, min: Vec<f64>, max: Vec<f64>) -> Self {
        self.min_rate = min;
        self.max_rate = max;
        self
    }

    /// Sets the fitness penalty per violation.
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Checks dimensions, vector lengths and parameter ranges.
    pub fn validate(&self) -> Result<(), InstanceError> {
        for (axis, len) in [
            ("users", self.users),
            ("objects", self.objects),
            ("servers", self.servers),
        ] {
            if len == 0 {
                return Err(InstanceError::EmptyAxis { axis });
            }
        }

        for (field, values, expected) in [
            ("object_sizes", &self.object_sizes, self.objects),
            ("server_capacity", &self.server_capacity, self.servers),
            ("storage_cost", &self.storage_cost, self.objects * self.servers),
            ("link_cost", &self.link_cost, self.servers),
        ] {
            if values.len() != expected {
                return Err(InstanceError::LengthMismatch {
                    field,
                    expected,
                    actual: values.len(),
                });
            }
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(InstanceError::InvalidValue { field });
            }
        }

        if self.link_capacity.len() != self.servers {
            return Err(InstanceError::LengthMismatch {
                field: "link_capacity",
                expected: self.servers,
                actual: self.link_capacity.len(),
            });
        }
        if self.link_capacity.iter().any(|c| c.is_nan() || *c < 0.0) {
            return Err(InstanceError::InvalidCapacity {
                field: "link_capacity",
            });
        }

        if !self.penalty.is_finite() || self.penalty < 0.0 {
            return Err(InstanceError::InvalidValue { field: "penalty" });
        }

        let pairs = self.users * self.objects;
        for (field, bounds) in [("min_rate", &self.min_rate), ("max_rate", &self.max_rate)] {
            if bounds.len() != pairs {
                return Err(InstanceError::LengthMismatch {
                    field,
                    expected: pairs,
                    actual: bounds.len(),
                });
            }
        }
        for (&min, &max) in self.min_rate.iter().zip(&self.max_rate) {
            if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
                return Err(InstanceError::InvalidRateBounds { min, max });
            }
        }
        Ok(())
    }

    /// `[min, max]` rate of user `m` fetching object `n`.
    pub fn rate_bounds(&self, m: usize, n: usize) -> (f64, f64) {
        let pair = m * self.objects + n;
        (self.min_rate[pair], self.max_rate[pair])
    }

    /// Computes the objective terms of a candidate.
    ///
    /// # Panics
    /// Panics if the tensors do not match the instance dimensions.
    pub fn objective(&self, x: &Tensor3<u8>, y: &Tensor3<f64>) -> Objective {
        let dims = (self.users, self.objects, self.servers);
        assert_eq!(x.dims(), dims, "placement tensor has wrong dimensions");
        assert_eq!(y.dims(), dims, "rate tensor has wrong dimensions");

        let mut obj = Objective::default();
        let mut stored = vec![false; self.objects * self.servers];
        let mut link_load = vec![0.0; self.servers];

        for m in 0..self.users {
            for n in 0..self.objects {
                let size = self.object_sizes[n];
                let (min_rate, max_rate) = self.rate_bounds(m, n);
                let mut assigned = 0;
                for s in 0..self.servers {
                    if x[(m, n, s)] == 0 {
                        continue;
                    }
                    assigned += 1;
                    stored[n * self.servers + s] = true;

                    let rate = y[(m, n, s)];
                    if !(min_rate..=max_rate).contains(&rate) {
                        obj.violations += 1;
                    }
                    link_load[s] += rate;
                    let volume = rate * size;
                    obj.utility += volume;
                    obj.transfer_cost += volume * self.link_cost[s];
                }
                if assigned != 1 {
                    obj.violations += 1;
                }
            }
        }

        let mut load = vec![0.0; self.servers];
        for n in 0..self.objects {
            for s in 0..self.servers {
                if stored[n * self.servers + s] {
                    load[s] += self.object_sizes[n];
                    obj.storage_cost += self.storage_cost[n * self.servers + s];
                }
            }
        }
        obj.violations += load
            .iter()
            .zip(&self.server_capacity)
            .filter(|(used, cap)| used > cap)
            .count();
        obj.violations += link_load
            .iter()
            .zip(&self.link_capacity)
            .filter(|(used, cap)| used > cap)
            .count();

        obj
    }

    fn random_rate<R: Rng>(&self, m: usize, n: usize, rng: &mut R) -> f64 {
        let (min, max) = self.rate_bounds(m, n);
        if max > min {
            rng.random_range(min..=max)
        } else {
            min
        }
    }
}

impl CandidateProblem for CachingInstance {
    type X = Tensor3<u8>;
    type Y = Tensor3<f64>;

    fn validate(&self) -> Result<(), PopulationError> {
        Ok(CachingInstance::validate(self)?)
    }

    /// One random server per user/object pair, at a random admissible rate.
    fn create_candidate<R: Rng>(&self, rng: &mut R) -> (Tensor3<u8>, Tensor3<f64>) {
        let mut x = Tensor3::filled(self.users, self.objects, self.servers, 0u8);
        let mut y = Tensor3::filled(self.users, self.objects, self.servers, 0.0);
        for m in 0..self.users {
            for n in 0..self.objects {
                let s = rng.random_range(0..self.servers);
                x[(m, n, s)] = 1;
                y[(m, n, s)] = self.random_rate(m, n, rng);
            }
        }
        (x, y)
    }

    fn evaluate(&self, x: &Tensor3<u8>, y: &Tensor3<f64>) -> Result<f64, PopulationError> {
        let obj = self.objective(x, y);
        let fitness = -obj.net_value() + self.penalty * obj.violations as f64;
        if fitness.is_nan() {
            return Err(PopulationError::Evaluation(
                "objective evaluated to NaN".into(),
            ));
        }
        Ok(fitness)
    }

    /// Uniform crossover over user/object pairs: each pair's placement and
    /// rates come together from one parent.
    fn crossover<R: Rng>(
        &self,
        first: (&Tensor3<u8>, &Tensor3<f64>),
        second: (&Tensor3<u8>, &Tensor3<f64>),
        rng: &mut R,
    ) -> (Tensor3<u8>, Tensor3<f64>) {
        let mut x = first.0.clone();
        let mut y = first.1.clone();
        for m in 0..self.users {
            for n in 0..self.objects {
                if rng.random_bool(0.5) {
                    x.row_mut(m, n).copy_from_slice(second.0.row(m, n));
                    y.row_mut(m, n).copy_from_slice(second.1.row(m, n));
                }
            }
        }
        (x, y)
    }

    /// Moves one random pair to another server, then creeps the rates of
    /// every served pair.
    fn mutate<R: Rng>(&self, x: &mut Tensor3<u8>, y: &mut Tensor3<f64>, rng: &mut R) {
        let m = rng.random_range(0..self.users);
        let n = rng.random_range(0..self.objects);
        let s = rng.random_range(0..self.servers);
        let rate = self.random_rate(m, n, rng);
        x.row_mut(m, n).fill(0);
        y.row_mut(m, n).fill(0.0);
        x[(m, n, s)] = 1;
        y[(m, n, s)] = rate;

        for m in 0..self.users {
            for n in 0..self.objects {
                let (min, max) = self.rate_bounds(m, n);
                let step = (max - min) * 0.1;
                let (placement, rates) = (x.row(m, n), y.row_mut(m, n));
                for (served, r) in placement.iter().zip(rates.iter_mut()) {
                    if *served != 0 {
                        creep_mutation(std::slice::from_mut(r), 0.3, step, min, max, rng);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::Optimizer;
    use crate::ga::{GaConfig, GaPopulation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn small() -> CachingInstance {
        CachingInstance::new(2, 2, 2)
            .with_link_cost(vec![0.1, 0.5])
            .with_storage_cost(vec![0.1; 4])
    }

    fn optimal(instance: &CachingInstance) -> (Tensor3<u8>, Tensor3<f64>) {
        let mut x = Tensor3::filled(2, 2, 2, 0u8);
        let mut y = Tensor3::filled(2, 2, 2, 0.0);
        for m in 0..2 {
            for n in 0..2 {
                x[(m, n, 0)] = 1;
                y[(m, n, 0)] = instance.rate_bounds(m, n).1;
            }
        }
        (x, y)
    }

    #[test]
    fn test_validate_defaults() {
        assert!(CachingInstance::new(3, 5, 2).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_axis() {
        assert_eq!(
            CachingInstance::new(0, 1, 1).validate(),
            Err(InstanceError::EmptyAxis { axis: "users" })
        );
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let err = CachingInstance::new(1, 2, 2)
            .with_link_cost(vec![0.1])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            InstanceError::LengthMismatch {
                field: "link_cost",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = CachingInstance::new(1, 1, 1)
            .with_object_sizes(vec![-1.0])
            .validate()
            .unwrap_err();
        assert_eq!(err, InstanceError::InvalidValue { field: "object_sizes" });

        let err = CachingInstance::new(1, 1, 1)
            .with_rate_bounds(2.0, 1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, InstanceError::InvalidRateBounds { .. }));
    }

    #[test]
    fn test_instance_error_converts() {
        let err: PopulationError = InstanceError::EmptyAxis { axis: "servers" }.into();
        assert_eq!(
            err,
            PopulationError::InvalidInstance("servers must be at least 1".into())
        );
    }

    #[test]
    fn test_objective_of_known_optimum() {
        let instance = small();
        let (x, y) = optimal(&instance);
        let obj = instance.objective(&x, &y);

        assert_eq!(obj.violations, 0);
        assert!((obj.utility - 4.0).abs() < 1e-12);
        assert!((obj.transfer_cost - 0.4).abs() < 1e-12);
        assert!((obj.storage_cost - 0.2).abs() < 1e-12);
        assert!((instance.evaluate(&x, &y).unwrap() + 3.4).abs() < 1e-12);
    }

    #[test]
    fn test_objective_counts_violations() {
        let instance = small().with_server_capacity(vec![1.0, 1.0]);
        let (mut x, mut y) = optimal(&instance);
        // server 0 now stores two unit objects with capacity 1
        x[(0, 0, 1)] = 1; // pair (0, 0) double-served
        y[(0, 0, 1)] = 5.0; // and above max_rate

        let obj = instance.objective(&x, &y);
        assert_eq!(obj.violations, 3);
        assert!(instance.evaluate(&x, &y).unwrap() > 200.0);
    }

    #[test]
    fn test_validate_rejects_bad_link_and_pair_bounds() {
        let err = small()
            .with_link_capacity(vec![1.0, f64::NAN])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            InstanceError::InvalidCapacity {
                field: "link_capacity"
            }
        );

        let err = small()
            .with_pair_rate_bounds(vec![0.1; 3], vec![1.0; 4])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            InstanceError::LengthMismatch {
                field: "min_rate",
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_link_overload_is_penalized() {
        let instance = small().with_link_capacity(vec![1.0, 10.0]);
        let (mut x, mut y) = optimal(&instance);

        // four pairs at rate 1.0 share link 0
        let obj = instance.objective(&x, &y);
        assert_eq!(obj.violations, 1);
        assert!(instance.evaluate(&x, &y).unwrap() > 90.0);

        // the same placement moved to the roomier link
        for m in 0..2 {
            for n in 0..2 {
                x.row_mut(m, n).copy_from_slice(&[0, 1]);
                y.row_mut(m, n).copy_from_slice(&[0.0, 1.0]);
            }
        }
        assert_eq!(instance.objective(&x, &y).violations, 0);
    }

    #[test]
    fn test_pair_rate_bounds() {
        let instance =
            small().with_pair_rate_bounds(vec![0.1, 0.1, 0.1, 0.5], vec![1.0, 1.0, 1.0, 0.8]);
        assert!(instance.validate().is_ok());
        assert_eq!(instance.rate_bounds(1, 1), (0.5, 0.8));

        let (x, mut y) = optimal(&instance);
        assert_eq!(y[(1, 1, 0)], 0.8);
        assert_eq!(instance.objective(&x, &y).violations, 0);

        y[(1, 1, 0)] = 0.2;
        assert_eq!(instance.objective(&x, &y).violations, 1);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let (mut x, mut y) = instance.create_candidate(&mut rng);
            instance.mutate(&mut x, &mut y, &mut rng);
            assert_eq!(instance.objective(&x, &y).violations, 0);
            for s in 0..2 {
                let rate = y[(1, 1, s)];
                assert!(x[(1, 1, s)] == 0 || (0.5..=0.8).contains(&rate));
            }
        }
    }

    #[test]
    fn test_random_candidates_are_feasible() {
        let instance = CachingInstance::new(4, 3, 3);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let (x, y) = instance.create_candidate(&mut rng);
            assert_eq!(instance.objective(&x, &y).violations, 0);
        }
    }

    #[test]
    fn test_operators_keep_one_server_per_pair() {
        let instance = CachingInstance::new(3, 3, 4);
        let mut rng = StdRng::seed_from_u64(7);
        let (ax, ay) = instance.create_candidate(&mut rng);
        let (bx, by) = instance.create_candidate(&mut rng);

        let (mut x, mut y) = instance.crossover((&ax, &ay), (&bx, &by), &mut rng);
        for _ in 0..50 {
            instance.mutate(&mut x, &mut y, &mut rng);
        }

        for m in 0..3 {
            for n in 0..3 {
                assert_eq!(x.row(m, n).iter().map(|&b| b as usize).sum::<usize>(), 1);
            }
        }
        assert_eq!(instance.objective(&x, &y).violations, 0);
    }

    #[test]
    fn test_ga_finds_near_optimum() {
        let optimizer = Optimizer::<GaPopulation<CachingInstance>>::new(Arc::new(small()))
            .with_population_config(
                GaConfig::default()
                    .with_seed(42)
                    .with_mutation_rate(0.5)
                    .with_parallel(false),
            );

        let best = optimizer.solve(200, 40).unwrap();

        assert_eq!(best.instance.objective(&best.x, &best.y).violations, 0);
        assert!(best.fitness < -3.0, "expected near -3.4, got {}", best.fitness);
        assert!(best.execution_time_ms.is_some());
    }

    #[test]
    fn test_invalid_instance_fails_fast() {
        let optimizer = Optimizer::<GaPopulation<CachingInstance>>::new(Arc::new(
            CachingInstance::new(2, 0, 2),
        ));
        let err = optimizer.solve(10, 5).unwrap_err();
        assert!(matches!(err, PopulationError::InvalidInstance(_)));
    }
}
