//! Mechanism specifications and their noise calibration.
//!
//! A [`MechanismSpec`] pairs a query sensitivity with a privacy-loss budget ε
//! and a noise family. [`MechanismSpec::calibrate`] derives the distribution
//! parameter the noise generator needs:
//!
//! * Laplace: `scale = sensitivity / ε`
//! * Geometric: `probability = 1 - exp(-ε / sensitivity)`

use statrs::distribution::{ContinuousCDF, Laplace};

use crate::checks::{check_confidence, check_epsilon, check_sensitivity};
use crate::error::{DpError, Result};

/// Noise family used by a mechanism.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MechanismKind {
    /// Continuous, symmetric Laplace noise.
    #[default]
    Laplace,
    /// Integer-valued two-sided geometric ("discrete Laplace") noise.
    Geometric,
}

impl std::fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Laplace => f.write_str("laplace"),
            Self::Geometric => f.write_str("geometric"),
        }
    }
}

/// Largest Laplace scale accepted.
///
/// Exponential variates reach a few hundred at most, so draws at this scale
/// stay finite.
pub const MAX_LAPLACE_SCALE: f64 = 1e300;

/// One instantiation of a noise mechanism.
///
/// Construction validates that the derived noise parameter is usable, so a
/// `MechanismSpec` never produces NaN or undefined noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MechanismSpec {
    sensitivity: f64,
    epsilon: f64,
    kind: MechanismKind,
}

impl MechanismSpec {
    /// Create a mechanism spec, failing on non-positive or non-finite inputs.
    pub fn new(sensitivity: f64, epsilon: f64, kind: MechanismKind) -> Result<Self> {
        let label = format!("{kind} mechanism");
        check_sensitivity(&label, sensitivity)?;
        check_epsilon(&label, epsilon)?;

        let spec = Self {
            sensitivity,
            epsilon,
            kind,
        };
        match spec.calibrate() {
            Calibration::Laplace { scale } if !(scale > 0.0 && scale <= MAX_LAPLACE_SCALE) => {
                Err(DpError::invalid(format!(
                    "{label}: sensitivity {sensitivity} / epsilon {epsilon} gives unusable scale {scale}"
                )))
            }
            // 1 - p must stay below 1 or the geometric variate is unbounded.
            Calibration::Geometric { probability }
                if probability <= 0.0 || 1.0 - probability == 1.0 =>
            {
                Err(DpError::invalid(format!(
                    "{label}: epsilon {epsilon} / sensitivity {sensitivity} gives success probability {probability}, too small to sample"
                )))
            }
            calibration => {
                if calibration.is_degenerate() {
                    log::warn!(
                        "{label}: epsilon/sensitivity = {} saturates the geometric probability at 1; noise is always zero",
                        epsilon / sensitivity
                    );
                }
                Ok(spec)
            }
        }
    }

    /// Laplace mechanism with the given sensitivity and epsilon.
    pub fn laplace(sensitivity: f64, epsilon: f64) -> Result<Self> {
        Self::new(sensitivity, epsilon, MechanismKind::Laplace)
    }

    /// Two-sided geometric mechanism with the given sensitivity and epsilon.
    pub fn geometric(sensitivity: f64, epsilon: f64) -> Result<Self> {
        Self::new(sensitivity, epsilon, MechanismKind::Geometric)
    }

    /// Maximum change in the query output from changing one record.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Privacy-loss budget of one application.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Noise family.
    pub fn kind(&self) -> MechanismKind {
        self.kind
    }

    /// Derive the distribution parameter for this mechanism.
    pub fn calibrate(&self) -> Calibration {
        let calibration = match self.kind {
            MechanismKind::Laplace => Calibration::Laplace {
                scale: self.sensitivity / self.epsilon,
            },
            // 1 - e^(-x) without cancellation for small x.
            MechanismKind::Geometric => Calibration::Geometric {
                probability: -(-self.epsilon / self.sensitivity).exp_m1(),
            },
        };
        log::debug!(
            "calibrated {} (sensitivity={}, epsilon={}): {:?}",
            self.kind,
            self.sensitivity,
            self.epsilon,
            calibration
        );
        calibration
    }
}

/// Calibrated noise distribution parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Calibration {
    /// Laplace noise with location 0.
    Laplace {
        /// Scale `b`; mean absolute deviation of the noise.
        scale: f64,
    },
    /// Difference of two geometric variates (support starting at 1).
    Geometric {
        /// Success probability of each geometric variate, in (0, 1].
        probability: f64,
    },
}

impl Calibration {
    /// The scalar parameter (scale or success probability).
    pub fn parameter(&self) -> f64 {
        match *self {
            Self::Laplace { scale } => scale,
            Self::Geometric { probability } => probability,
        }
    }

    /// Whether the noise collapses to a constant zero.
    pub fn is_degenerate(&self) -> bool {
        matches!(*self, Self::Geometric { probability } if probability >= 1.0)
    }

    /// Expected absolute value of one noise draw.
    pub fn expected_abs(&self) -> f64 {
        match *self {
            Self::Laplace { scale } => scale,
            // 2α / (1 - α²) with α = 1 - p, without cancellation.
            Self::Geometric { probability: p } => 2.0 * (1.0 - p) / (p * (2.0 - p)),
        }
    }

    /// Variance of one noise draw.
    pub fn variance(&self) -> f64 {
        match *self {
            Self::Laplace { scale } => 2.0 * scale * scale,
            Self::Geometric { probability } => {
                let alpha = 1.0 - probability;
                2.0 * alpha / (probability * probability)
            }
        }
    }

    /// Standard deviation of one noise draw.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest `h` with `P(|noise| <= h) >= confidence`.
    pub fn interval_half_width(&self, confidence: f64) -> Result<f64> {
        check_confidence("interval_half_width", confidence)?;
        match *self {
            Self::Laplace { scale } => {
                let dist = Laplace::new(0.0, scale)
                    .map_err(|e| DpError::invalid(format!("laplace scale {scale}: {e}")))?;
                Ok(dist.inverse_cdf(0.5 + confidence / 2.0))
            }
            Self::Geometric { probability } => {
                if probability >= 1.0 {
                    return Ok(0.0);
                }
                let alpha = 1.0 - probability;
                // P(|X| > k) = 2 α^(k+1) / (1 + α)
                let target = (1.0 - confidence) * (1.0 + alpha) / 2.0;
                let k = (target.ln() / (-probability).ln_1p()).ceil() - 1.0;
                Ok(k.max(0.0))
            }
        }
    }
}
