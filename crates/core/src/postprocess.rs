//! Post-processing of noisy tables into publishable tables.
//!
//! Post-processing never consumes privacy budget; it only shapes the output.
//! The policy is explicit per release: round to the nearest integer (ties to
//! even) and then clamp negative cells to zero. Both steps are idempotent, so
//! applying a policy to its own output is a no-op.

use ndarray::ArrayD;

use crate::checks::check_same_shape;
use crate::error::{DpError, Result};
use crate::mechanism::MechanismKind;
use crate::noise::NoisyTable;
use crate::tensor::{is_integral, AxisLabels, Tensor};

/// Declared post-processing policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PostProcessPolicy {
    /// Round each cell to the nearest integer, ties to even.
    pub round: bool,
    /// Replace negative cells with zero (applied after rounding).
    pub clamp_negative: bool,
}

impl Default for PostProcessPolicy {
    fn default() -> Self {
        Self::laplace_counts()
    }
}

impl PostProcessPolicy {
    /// Create a policy.
    pub fn new(round: bool, clamp_negative: bool) -> Self {
        Self {
            round,
            clamp_negative,
        }
    }

    /// Round and clamp: integer, non-negative counts from continuous noise.
    pub fn laplace_counts() -> Self {
        Self::new(true, true)
    }

    /// Clamp only; geometric output is already integral.
    pub fn geometric_counts() -> Self {
        Self::new(false, true)
    }

    /// Publish the raw noisy values unchanged.
    pub fn raw() -> Self {
        Self::new(false, false)
    }

    /// Preset matching a mechanism family.
    pub fn default_for(kind: MechanismKind) -> Self {
        match kind {
            MechanismKind::Laplace => Self::laplace_counts(),
            MechanismKind::Geometric => Self::geometric_counts(),
        }
    }

    /// Set the rounding flag.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Set the clamping flag.
    pub fn with_clamp_negative(mut self, clamp_negative: bool) -> Self {
        self.clamp_negative = clamp_negative;
        self
    }

    /// Apply the policy to one value.
    pub fn apply_value(&self, mut v: f64) -> f64 {
        if self.round {
            v = v.round_ties_even();
        }
        // Also folds -0.0 into 0.0.
        if self.clamp_negative && v <= 0.0 {
            v = 0.0;
        }
        v
    }

    /// Apply the policy cell-wise, returning a new array.
    pub fn apply(&self, values: &Tensor) -> Tensor {
        values.mapv(|v| self.apply_value(v))
    }

    /// Post-process a noisy table into a publishable one.
    pub fn publish(&self, noisy: &NoisyTable) -> PublishedTable {
        PublishedTable {
            values: self.apply(noisy.values()),
            policy: *self,
            labels: noisy.labels().to_vec(),
        }
    }

    /// Like [`publish`](Self::publish), but requires the noisy table to have
    /// `expected_shape`.
    pub fn publish_as(&self, noisy: &NoisyTable, expected_shape: &[usize]) -> Result<PublishedTable> {
        check_same_shape(expected_shape, noisy.shape())?;
        Ok(self.publish(noisy))
    }
}

/// A post-processed table ready for release.
#[derive(Clone, Debug, PartialEq)]
pub struct PublishedTable {
    values: Tensor,
    policy: PostProcessPolicy,
    labels: Vec<AxisLabels>,
}

impl PublishedTable {
    /// Published values.
    pub fn values(&self) -> &Tensor {
        &self.values
    }

    /// Policy that produced this table.
    pub fn policy(&self) -> PostProcessPolicy {
        self.policy
    }

    /// Axis labels carried over from the true table.
    pub fn labels(&self) -> &[AxisLabels] {
        &self.labels
    }

    /// Shape of the table.
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Whether every cell is a whole number.
    pub fn is_integral(&self) -> bool {
        is_integral(&self.values)
    }

    /// Published values as integer counts.
    ///
    /// Fails when a cell is fractional, e.g. Laplace output published without
    /// rounding.
    pub fn to_counts(&self) -> Result<ArrayD<i64>> {
        if !self.is_integral() {
            return Err(DpError::invalid(
                "published table has fractional cells; publish with rounding enabled",
            ));
        }
        Ok(self.values.mapv(|v| v as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::add_noise;
    use crate::tensor::CountTable;
    use ndarray::{array, IxDyn};
    use proptest::prelude::*;

    fn noisy(values: Tensor) -> NoisyTable {
        let zeros = CountTable::new(ArrayD::zeros(IxDyn(values.shape())));
        add_noise(&zeros, &values, MechanismKind::Laplace).unwrap()
    }

    #[test]
    fn test_round_half_to_even() {
        let p = PostProcessPolicy::new(true, false);
        let out = p.apply(&array![0.5, 1.5, 2.5, -0.5, -1.5, 2.4, 2.6].into_dyn());
        assert_eq!(out, array![0.0, 2.0, 2.0, -0.0, -2.0, 2.0, 3.0].into_dyn());
    }

    #[test]
    fn test_round_then_clamp() {
        let p = PostProcessPolicy::laplace_counts();
        let out = p.apply(&array![-0.4, -3.7, 4.2, 0.0].into_dyn());
        assert_eq!(out, array![0.0, 0.0, 4.0, 0.0].into_dyn());
        assert!(out.iter().all(|v| v.is_sign_positive()));
    }

    #[test]
    fn test_builders_toggle_steps() {
        let round_only = PostProcessPolicy::raw().with_round(true);
        assert_eq!(round_only, PostProcessPolicy::new(true, false));
        assert_eq!(round_only.apply_value(-0.6), -1.0);

        let clamp_only = PostProcessPolicy::laplace_counts().with_round(false);
        assert_eq!(clamp_only, PostProcessPolicy::geometric_counts());
        assert_eq!(clamp_only.apply_value(-0.6), 0.0);
        assert_eq!(clamp_only.apply_value(2.25), 2.25);

        let unclamped = PostProcessPolicy::laplace_counts().with_clamp_negative(false);
        assert_eq!(unclamped.apply_value(-2.5), -2.0);
    }

    #[test]
    fn test_raw_is_identity() {
        let values = array![[-1.25, 3.5], [0.0, 2.0]].into_dyn();
        let published = PostProcessPolicy::raw().publish(&noisy(values.clone()));
        assert_eq!(published.values(), &values);
        assert!(published.to_counts().is_err());
    }

    #[test]
    fn test_to_counts() {
        let published = PostProcessPolicy::laplace_counts()
            .publish(&noisy(array![[-1.2, 3.5], [7.9, 2.0]].into_dyn()));
        assert_eq!(
            published.to_counts().unwrap(),
            array![[0i64, 4], [8, 2]].into_dyn()
        );
    }

    #[test]
    fn test_publish_as_checks_shape() {
        let n = noisy(array![1.0, 2.0, 3.0].into_dyn());
        let p = PostProcessPolicy::default();
        assert!(p.publish_as(&n, &[3]).is_ok());
        assert!(matches!(
            p.publish_as(&n, &[3, 1]),
            Err(DpError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_default_for_kind() {
        assert!(PostProcessPolicy::default_for(MechanismKind::Laplace).round);
        let g = PostProcessPolicy::default_for(MechanismKind::Geometric);
        assert!(!g.round && g.clamp_negative);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn clamping_gives_non_negative(values in proptest::collection::vec(-50.0f64..50.0, 1..40), round in any::<bool>()) {
            let policy = PostProcessPolicy::new(round, true);
            let out = policy.apply(&ArrayD::from_shape_vec(IxDyn(&[values.len()]), values).unwrap());
            prop_assert!(out.iter().all(|&v| v >= 0.0 && v.is_sign_positive()));
        }

        #[test]
        fn policy_is_idempotent(
            values in proptest::collection::vec(-50.0f64..50.0, 1..40),
            round in any::<bool>(),
            clamp in any::<bool>(),
        ) {
            let policy = PostProcessPolicy::new(round, clamp);
            let t = ArrayD::from_shape_vec(IxDyn(&[values.len()]), values).unwrap();
            let once = policy.apply(&t);
            let twice = policy.apply(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
