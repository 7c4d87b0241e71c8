//! Random variate sources for noise generation.
//!
//! Every noise draw goes through a [`NoiseSampler`] passed in by the caller;
//! there is no process-wide random state. Tests substitute a seeded
//! [`RngSampler`] or a [`ReplaySampler`] fixture without touching calibration
//! or table logic.
//!
//! None of the provided sources is a cryptographically secure generator, and
//! the Laplace draws use plain floating point sampling. This is a known
//! relaxation of the formal differential privacy threat model: the output is
//! suitable for illustrating the privacy/utility tradeoff, not for releasing
//! data against an adversary who can exploit RNG or floating point artifacts.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Geometric};

use crate::error::{DpError, Result};
use crate::mechanism::MAX_LAPLACE_SCALE;

/// A source of the two variates the mechanisms need.
pub trait NoiseSampler {
    /// One draw from Laplace(0, `scale`).
    fn laplace(&mut self, scale: f64) -> Result<f64>;

    /// Number of Bernoulli(`probability`) trials up to and including the
    /// first success; support `{1, 2, 3, ...}`.
    fn geometric(&mut self, probability: f64) -> Result<u64>;
}

impl<S: NoiseSampler + ?Sized> NoiseSampler for &mut S {
    fn laplace(&mut self, scale: f64) -> Result<f64> {
        (**self).laplace(scale)
    }

    fn geometric(&mut self, probability: f64) -> Result<u64> {
        (**self).geometric(probability)
    }
}

fn check_scale(scale: f64) -> Result<()> {
    if !(scale > 0.0 && scale <= MAX_LAPLACE_SCALE) {
        return Err(DpError::invalid(format!(
            "laplace scale is {scale}, must be in (0, {MAX_LAPLACE_SCALE:e}]"
        )));
    }
    Ok(())
}

fn check_probability(probability: f64) -> Result<()> {
    if !(probability > 0.0 && probability <= 1.0) || 1.0 - probability == 1.0 {
        return Err(DpError::invalid(format!(
            "geometric probability is {probability}, must be in (0, 1]"
        )));
    }
    Ok(())
}

/// Sampler backed by any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    /// Wrap a generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

}

impl RngSampler<StdRng> {
    /// Seed a `StdRng` from the thread-local generator.
    ///
    /// Seeding failure is reported rather than replaced with a fixed seed.
    pub fn from_entropy() -> Result<Self> {
        Ok(Self::new(StdRng::from_rng(thread_rng())?))
    }
}

impl RngSampler<ChaCha8Rng> {
    /// Reproducible sampler for tests and simulations.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseSampler for RngSampler<R> {
    fn laplace(&mut self, scale: f64) -> Result<f64> {
        check_scale(scale)?;
        // A Laplace variate is an exponential with a uniformly random sign.
        let dist = Exp::new(1.0 / scale)
            .map_err(|e| DpError::invalid(format!("laplace scale {scale}: {e}")))?;
        let magnitude = dist.sample(&mut self.rng);
        if !magnitude.is_finite() {
            return Err(DpError::randomness(format!(
                "laplace draw at scale {scale} is not finite"
            )));
        }
        Ok(if self.rng.gen_bool(0.5) { magnitude } else { -magnitude })
    }

    fn geometric(&mut self, probability: f64) -> Result<u64> {
        check_probability(probability)?;
        // rand_distr counts failures before the first success.
        let dist = Geometric::new(probability)
            .map_err(|e| DpError::invalid(format!("geometric probability {probability}: {e}")))?;
        Ok(dist.sample(&mut self.rng).saturating_add(1))
    }
}

/// Fixture that replays queued draws in order.
///
/// Laplace values are returned as-is (the scale is validated but not
/// applied). Running out of values is an error, never a silent zero.
#[derive(Clone, Debug, Default)]
pub struct ReplaySampler {
    laplace: VecDeque<f64>,
    geometric: VecDeque<u64>,
}

impl ReplaySampler {
    /// Empty replay queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue Laplace draws.
    pub fn with_laplace<I: IntoIterator<Item = f64>>(mut self, values: I) -> Self {
        self.laplace.extend(values);
        self
    }

    /// Queue geometric trial counts.
    pub fn with_geometric<I: IntoIterator<Item = u64>>(mut self, values: I) -> Self {
        self.geometric.extend(values);
        self
    }

    /// Number of queued (laplace, geometric) draws left.
    pub fn remaining(&self) -> (usize, usize) {
        (self.laplace.len(), self.geometric.len())
    }
}

impl NoiseSampler for ReplaySampler {
    fn laplace(&mut self, scale: f64) -> Result<f64> {
        check_scale(scale)?;
        self.laplace
            .pop_front()
            .ok_or_else(|| DpError::randomness("replay sampler has no laplace draws left"))
    }

    fn geometric(&mut self, probability: f64) -> Result<u64> {
        check_probability(probability)?;
        match self.geometric.pop_front() {
            None => Err(DpError::randomness(
                "replay sampler has no geometric draws left",
            )),
            Some(0) => Err(DpError::randomness(
                "replayed geometric draw 0 is outside the support {1, 2, ...}",
            )),
            Some(k) => Ok(k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = RngSampler::seeded(42);
        let mut b = RngSampler::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.laplace(1.5).unwrap(), b.laplace(1.5).unwrap());
            assert_eq!(a.geometric(0.3).unwrap(), b.geometric(0.3).unwrap());
        }
    }

    #[test]
    fn test_geometric_support_starts_at_one() {
        let mut s = RngSampler::seeded(7);
        let draws: Vec<u64> = (0..20_000).map(|_| s.geometric(0.6).unwrap()).collect();
        assert!(draws.iter().all(|&k| k >= 1));
        let mean = draws.iter().sum::<u64>() as f64 / draws.len() as f64;
        // E[G] = 1 / p
        assert!((mean - 1.0 / 0.6).abs() < 0.05);
    }

    #[test]
    fn test_geometric_probability_one_is_constant() {
        let mut s = RngSampler::seeded(3);
        for _ in 0..100 {
            assert_eq!(s.geometric(1.0).unwrap(), 1);
        }
    }

    #[test]
    fn test_laplace_statistics() {
        let mut s = RngSampler::seeded(123);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| s.laplace(2.0).unwrap()).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let mad = draws.iter().map(|x| x.abs()).sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 0.1);
        assert!((mad - 2.0).abs() < 0.1);
        assert!((var - 8.0).abs() < 0.8);
    }

    #[test]
    fn test_large_scale_draws_stay_finite() {
        let mut s = RngSampler::seeded(11);
        for _ in 0..1_000 {
            assert!(s.laplace(MAX_LAPLACE_SCALE).unwrap().is_finite());
        }
        assert!(matches!(
            s.laplace(1e308),
            Err(DpError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_geometric_rejects_probability_lost_in_rounding() {
        let mut s = RngSampler::seeded(2);
        assert!(matches!(
            s.geometric(1e-17),
            Err(DpError::InvalidParameters { .. })
        ));
        let mut replay = ReplaySampler::new().with_geometric([1]);
        assert!(replay.geometric(1e-17).is_err());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut s = RngSampler::seeded(0);
        assert!(matches!(
            s.laplace(0.0),
            Err(DpError::InvalidParameters { .. })
        ));
        assert!(s.laplace(f64::NAN).is_err());
        assert!(s.geometric(0.0).is_err());
        assert!(s.geometric(1.5).is_err());
    }

    #[test]
    fn test_replay_in_order_then_exhausted() {
        let mut s = ReplaySampler::new()
            .with_laplace([0.5, -1.0])
            .with_geometric([3, 1]);
        assert_eq!(s.laplace(1.0).unwrap(), 0.5);
        assert_eq!(s.laplace(1.0).unwrap(), -1.0);
        assert_eq!(s.geometric(0.5).unwrap(), 3);
        assert_eq!(s.remaining(), (0, 1));
        assert_eq!(s.geometric(0.5).unwrap(), 1);
        assert!(matches!(s.laplace(1.0), Err(DpError::Randomness { .. })));
        assert!(matches!(s.geometric(0.5), Err(DpError::Randomness { .. })));
    }

    #[test]
    fn test_replay_rejects_zero_geometric() {
        let mut s = ReplaySampler::new().with_geometric([0]);
        assert!(matches!(s.geometric(0.5), Err(DpError::Randomness { .. })));
    }

    #[test]
    fn test_from_entropy_draws() {
        let mut s = RngSampler::from_entropy().unwrap();
        assert!(s.laplace(1.0).unwrap().is_finite());
    }
}
