//! Privacy/utility tradeoff simulation over a log-spaced ε grid.
//!
//! Without post-processing, `published = true + noise`, so the L1 error of a
//! single cell is exactly `|noise|` whatever the true count. The simulator
//! therefore needs no data: for each ε it draws noise, records `|noise|`, and
//! aggregates mean and standard deviation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use census_dp_core::checks::check_epsilon;
use census_dp_core::{draw_one, DpError, MechanismSpec, NoiseSampler, Result, RngSampler};

use crate::params::SweepConfig;
use crate::stats::{mean_and_std, spearman};

/// `count + 1` log-uniformly spaced points from `epsilon_min` to `epsilon_max`.
///
/// Point `i` is `10^(log10(epsilon_min) + i·Δ)` with
/// `Δ = (log10(epsilon_max) - log10(epsilon_min)) / count`; the endpoints are
/// the inputs themselves.
pub fn epsilon_grid(epsilon_min: f64, epsilon_max: f64, count: usize) -> Result<Vec<f64>> {
    check_epsilon("epsilon_grid min", epsilon_min)?;
    check_epsilon("epsilon_grid max", epsilon_max)?;
    if epsilon_max < epsilon_min {
        return Err(DpError::invalid(format!(
            "epsilon_grid: max {epsilon_max} is below min {epsilon_min}"
        )));
    }
    if count == 0 {
        return Err(DpError::invalid("epsilon_grid: count must be positive"));
    }

    let lo = epsilon_min.log10();
    let delta = (epsilon_max.log10() - lo) / count as f64;
    Ok((0..=count)
        .map(|i| match i {
            0 => epsilon_min,
            i if i == count => epsilon_max,
            i => 10f64.powf(lo + i as f64 * delta),
        })
        .collect())
}

/// Aggregated error at one ε.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepPoint {
    /// Privacy-loss parameter.
    pub epsilon: f64,
    /// Calibrated noise parameter (Laplace scale or geometric probability).
    pub parameter: f64,
    /// Per-draw L1 error, `|noise|`.
    pub draws: Vec<f64>,
    /// Mean of `draws`.
    pub mean_l1: f64,
    /// Population standard deviation of `draws`.
    pub std_l1: f64,
    /// Analytic expectation of `|noise|`.
    pub expected_l1: f64,
}

/// Ordered sweep output, one point per ε.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepResult {
    config: SweepConfig,
    points: Vec<SweepPoint>,
}

impl SweepResult {
    /// Configuration that produced this result.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Points in increasing ε order.
    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    /// Iterate over points.
    pub fn iter(&self) -> std::slice::Iter<'_, SweepPoint> {
        self.points.iter()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the sweep is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The ε grid.
    pub fn epsilons(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.epsilon).collect()
    }

    /// `(ε, mean_l1, std_l1)` triples, ready for plotting.
    pub fn triples(&self) -> Vec<(f64, f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.epsilon, p.mean_l1, p.std_l1))
            .collect()
    }

    /// Spearman correlation between ε and mean L1 error.
    ///
    /// Strictly negative when more privacy loss buys less error.
    pub fn spearman_correlation(&self) -> Option<f64> {
        let means: Vec<f64> = self.points.iter().map(|p| p.mean_l1).collect();
        spearman(&self.epsilons(), &means)
    }
}

impl<'a> IntoIterator for &'a SweepResult {
    type Item = &'a SweepPoint;
    type IntoIter = std::slice::Iter<'a, SweepPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn simulate_point<S: NoiseSampler + ?Sized>(
    config: &SweepConfig,
    epsilon: f64,
    sampler: &mut S,
) -> Result<SweepPoint> {
    let spec = MechanismSpec::new(config.sensitivity, epsilon, config.kind)?;
    let calibration = spec.calibrate();

    let draws = (0..config.draws_per_epsilon)
        .map(|_| draw_one(calibration, sampler).map(f64::abs))
        .collect::<Result<Vec<f64>>>()?;
    let (mean_l1, std_l1) = mean_and_std(&draws);

    log::debug!(
        "sweep {} epsilon={epsilon:.4}: mean L1 {mean_l1:.4} (std {std_l1:.4}, expected {:.4})",
        config.kind,
        calibration.expected_abs()
    );

    Ok(SweepPoint {
        epsilon,
        parameter: calibration.parameter(),
        draws,
        mean_l1,
        std_l1,
        expected_l1: calibration.expected_abs(),
    })
}

/// Run the sweep, drawing every value from `sampler` in ε order.
pub fn simulate_tradeoff<S: NoiseSampler + ?Sized>(
    config: &SweepConfig,
    sampler: &mut S,
) -> Result<SweepResult> {
    config.validate()?;
    let grid = epsilon_grid(config.epsilon_min, config.epsilon_max, config.steps)?;
    let points = grid
        .into_iter()
        .map(|epsilon| simulate_point(config, epsilon, sampler))
        .collect::<Result<Vec<_>>>()?;
    Ok(SweepResult {
        config: config.clone(),
        points,
    })
}

/// Run the sweep with one independent, seeded stream per ε.
///
/// Point `i` only depends on `seed` and `i`, so points can be computed in any
/// order (or on separate workers) with identical results.
pub fn simulate_tradeoff_seeded(config: &SweepConfig, seed: u64) -> Result<SweepResult> {
    config.validate()?;
    let grid = epsilon_grid(config.epsilon_min, config.epsilon_max, config.steps)?;
    let points = grid
        .into_iter()
        .enumerate()
        .map(|(i, epsilon)| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(i as u64);
            simulate_point(config, epsilon, &mut RngSampler::new(rng))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SweepResult {
        config: config.clone(),
        points,
    })
}
