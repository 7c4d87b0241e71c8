//! One-call release pipeline: truth → noisy → published → error report.

use census_dp_accounting::ErrorReport;
use census_dp_core::{
    add_noise, noise_table, CountTable, MechanismKind, MechanismSpec, NoiseSampler, NoisyTable,
    PostProcessPolicy, PublishedTable, Result, Tensor,
};

/// Parameters of a single table release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReleaseConfig {
    /// Query sensitivity (1 for counting queries).
    pub sensitivity: f64,
    /// Privacy-loss budget.
    pub epsilon: f64,
    /// Noise family.
    pub kind: MechanismKind,
    /// Post-processing; `None` picks the preset for `kind`.
    pub policy: Option<PostProcessPolicy>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            epsilon: 1.0,
            kind: MechanismKind::Laplace,
            policy: None,
        }
    }
}

impl ReleaseConfig {
    /// Set the sensitivity.
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set ε.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the noise family.
    pub fn with_kind(mut self, kind: MechanismKind) -> Self {
        self.kind = kind;
        self
    }

    /// Override the post-processing policy.
    pub fn with_policy(mut self, policy: PostProcessPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// The effective post-processing policy.
    pub fn policy(&self) -> PostProcessPolicy {
        self.policy
            .unwrap_or_else(|| PostProcessPolicy::default_for(self.kind))
    }

    /// Build the mechanism this release uses.
    pub fn mechanism(&self) -> Result<MechanismSpec> {
        MechanismSpec::new(self.sensitivity, self.epsilon, self.kind)
    }

    /// Validate parameters.
    pub fn validate(&self) -> Result<()> {
        self.mechanism().map(|_| ())
    }
}

/// Every stage of one release, retained for comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRelease {
    config: ReleaseConfig,
    truth: CountTable,
    noisy: NoisyTable,
    published: PublishedTable,
    report: ErrorReport,
}

impl TableRelease {
    /// Noise `truth` with draws from `sampler`, post-process, and measure.
    pub fn run<S: NoiseSampler + ?Sized>(
        truth: CountTable,
        config: &ReleaseConfig,
        sampler: &mut S,
    ) -> Result<Self> {
        let spec = config.mechanism()?;
        let noisy = noise_table(&truth, &spec, sampler)?;
        Self::finish(truth, config, noisy)
    }

    /// Release `truth` with a fixed, pre-drawn noise array.
    pub fn with_noise(truth: CountTable, config: &ReleaseConfig, noise: &Tensor) -> Result<Self> {
        config.validate()?;
        let noisy = add_noise(&truth, noise, config.kind)?;
        Self::finish(truth, config, noisy)
    }

    fn finish(truth: CountTable, config: &ReleaseConfig, noisy: NoisyTable) -> Result<Self> {
        let published = config.policy().publish_as(&noisy, truth.shape())?;
        let report = ErrorReport::for_published(&truth, &published)?;
        log::debug!(
            "released {:?} table: {} epsilon={}, total L1 {}, relative L1 {:.2}%",
            truth.shape(),
            config.kind,
            config.epsilon,
            report.total_l1(),
            report.relative_l1()
        );
        Ok(Self {
            config: *config,
            truth,
            noisy,
            published,
            report,
        })
    }

    /// Configuration used.
    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// The true table.
    pub fn truth(&self) -> &CountTable {
        &self.truth
    }

    /// Noisy values before post-processing.
    pub fn noisy(&self) -> &NoisyTable {
        &self.noisy
    }

    /// Post-processed values.
    pub fn published(&self) -> &PublishedTable {
        &self.published
    }

    /// Error of the published table against the truth.
    pub fn report(&self) -> &ErrorReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use census_dp_accounting::RelativeError;
    use census_dp_core::{DpError, ReplaySampler, RngSampler};
    use ndarray::array;

    fn truth() -> CountTable {
        CountTable::new(array![[18u64, 19], [13, 16], [10, 10], [8, 5], [0, 1]].into_dyn())
    }

    #[test]
    fn test_policy_follows_kind() {
        let cfg = ReleaseConfig::default();
        assert_eq!(cfg.policy(), PostProcessPolicy::laplace_counts());
        let geo = cfg.with_kind(MechanismKind::Geometric);
        assert_eq!(geo.policy(), PostProcessPolicy::geometric_counts());
        let raw = geo.with_policy(PostProcessPolicy::raw());
        assert_eq!(raw.policy(), PostProcessPolicy::raw());
    }

    #[test]
    fn test_validate() {
        assert!(ReleaseConfig::default().validate().is_ok());
        assert!(ReleaseConfig::default().with_epsilon(0.0).validate().is_err());
        assert!(ReleaseConfig::default()
            .with_sensitivity(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_fixed_noise_release() {
        let noise = array![[0.0, -1.0], [-3.0, 1.0], [-1.0, -2.0], [3.0, -3.0], [0.0, 0.0]]
            .into_dyn();
        let release = TableRelease::with_noise(truth(), &ReleaseConfig::default(), &noise).unwrap();
        assert_eq!(
            release.published().values(),
            &array![[18.0, 18.0], [10.0, 17.0], [9.0, 8.0], [11.0, 2.0], [0.0, 1.0]].into_dyn()
        );
        assert_eq!(release.report().total_l1(), 14.0);
        assert_eq!(release.report().relative_l1(), RelativeError::Ratio(14.0));
        assert_eq!(release.truth().total(), 100);
    }

    #[test]
    fn test_clamping_is_visible_in_stages() {
        let truth = CountTable::new(array![0u64, 3].into_dyn());
        let mut sampler = ReplaySampler::new().with_laplace([-2.5, 0.75]);
        let release = TableRelease::run(truth, &ReleaseConfig::default(), &mut sampler).unwrap();
        assert_eq!(release.noisy().values(), &array![-2.5, 3.75].into_dyn());
        assert_eq!(release.published().values(), &array![0.0, 4.0].into_dyn());
        assert_eq!(release.report().total_l1(), 1.0);
    }

    #[test]
    fn test_geometric_release_is_integral() {
        let cfg = ReleaseConfig::default().with_kind(MechanismKind::Geometric);
        let release = TableRelease::run(truth(), &cfg, &mut RngSampler::seeded(3)).unwrap();
        assert!(release.published().is_integral());
        assert!(release.published().values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_bad_noise_shape() {
        let err = TableRelease::with_noise(truth(), &ReleaseConfig::default(), &array![1.0].into_dyn())
            .unwrap_err();
        assert!(matches!(err, DpError::ShapeMismatch { .. }));
    }
}
