//! Tradeoff simulation parameters.

use census_dp_core::checks::{check_epsilon, check_sensitivity};
use census_dp_core::{DpError, MechanismKind, Result};

/// Parameters for an ε sweep of the privacy/utility tradeoff.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    /// Query sensitivity, fixed across the sweep.
    pub sensitivity: f64,
    /// Smallest ε in the grid.
    pub epsilon_min: f64,
    /// Largest ε in the grid.
    pub epsilon_max: f64,
    /// Number of log-spaced steps; the grid has `steps + 1` points.
    pub steps: usize,
    /// Independent noise draws per ε.
    pub draws_per_epsilon: usize,
    /// Noise family.
    pub kind: MechanismKind,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            epsilon_min: 0.1,
            epsilon_max: 10.0,
            steps: 20,
            draws_per_epsilon: 1_000,
            kind: MechanismKind::Laplace,
        }
    }
}

impl SweepConfig {
    /// Create a validated Laplace sweep configuration.
    pub fn new(
        sensitivity: f64,
        epsilon_min: f64,
        epsilon_max: f64,
        steps: usize,
        draws_per_epsilon: usize,
    ) -> Result<Self> {
        let config = Self {
            sensitivity,
            epsilon_min,
            epsilon_max,
            steps,
            draws_per_epsilon,
            kind: MechanismKind::Laplace,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the sensitivity.
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set the ε range.
    pub fn with_epsilon_range(mut self, epsilon_min: f64, epsilon_max: f64) -> Self {
        self.epsilon_min = epsilon_min;
        self.epsilon_max = epsilon_max;
        self
    }

    /// Set the number of grid steps.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Set the number of draws per ε.
    pub fn with_draws_per_epsilon(mut self, draws_per_epsilon: usize) -> Self {
        self.draws_per_epsilon = draws_per_epsilon;
        self
    }

    /// Set the noise family.
    pub fn with_kind(mut self, kind: MechanismKind) -> Self {
        self.kind = kind;
        self
    }

    /// Validate parameters.
    pub fn validate(&self) -> Result<()> {
        check_sensitivity("sweep", self.sensitivity)?;
        check_epsilon("sweep epsilon_min", self.epsilon_min)?;
        check_epsilon("sweep epsilon_max", self.epsilon_max)?;
        if self.epsilon_max < self.epsilon_min {
            return Err(DpError::invalid(format!(
                "sweep: epsilon_max {} is below epsilon_min {}",
                self.epsilon_max, self.epsilon_min
            )));
        }
        if self.steps == 0 {
            return Err(DpError::invalid("sweep: steps must be positive"));
        }
        if self.draws_per_epsilon == 0 {
            return Err(DpError::invalid("sweep: draws_per_epsilon must be positive"));
        }
        Ok(())
    }
}
