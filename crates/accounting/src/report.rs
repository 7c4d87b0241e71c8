//! Error accounting: how far a published table is from the truth.

use std::fmt;

use ndarray::{ArrayD, Zip};

use census_dp_core::checks::check_same_shape;
use census_dp_core::{CountTable, PublishedTable, Result, Tensor};

/// Relative error of one cell, with an explicit sentinel for a zero truth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RelativeError {
    /// `absolute / true`; `0.0` when both are zero.
    Ratio(f64),
    /// The true value is zero but the published value is not, so the ratio
    /// is unbounded (`+∞`).
    Unbounded,
}

impl RelativeError {
    /// Relative error of `absolute` against a true value of `truth`.
    pub fn of(absolute: f64, truth: f64) -> Self {
        if truth == 0.0 {
            if absolute == 0.0 {
                Self::Ratio(0.0)
            } else {
                Self::Unbounded
            }
        } else {
            Self::Ratio(absolute / truth)
        }
    }

    /// Whether the ratio is finite.
    pub fn is_bounded(&self) -> bool {
        matches!(self, Self::Ratio(_))
    }

    /// The ratio, or `None` for the unbounded sentinel.
    pub fn value(&self) -> Option<f64> {
        match *self {
            Self::Ratio(r) => Some(r),
            Self::Unbounded => None,
        }
    }

    /// The ratio as a float, with `Unbounded` mapped to `f64::INFINITY`.
    pub fn as_f64(&self) -> f64 {
        self.value().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for RelativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratio(r) => match f.precision() {
                Some(p) => write!(f, "{r:.p$}"),
                None => write!(f, "{r}"),
            },
            Self::Unbounded => f.write_str("∞"),
        }
    }
}

/// Cell-wise and aggregate error of a published table.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorReport {
    absolute: Tensor,
    relative: ArrayD<RelativeError>,
    total_l1: f64,
    true_total: u64,
    relative_l1: RelativeError,
}

impl ErrorReport {
    /// Compare published values against the true table.
    ///
    /// Fails with `ShapeMismatch` when the shapes differ.
    pub fn compute(truth: &CountTable, published: &Tensor) -> Result<Self> {
        check_same_shape(truth.shape(), published.shape())?;

        let absolute = Zip::from(published)
            .and(truth.counts())
            .map_collect(|&p, &t| (p - t as f64).abs());
        let relative = Zip::from(&absolute)
            .and(truth.counts())
            .map_collect(|&a, &t| RelativeError::of(a, t as f64));
        let total_l1 = absolute.sum();
        let true_total = truth.total();
        let relative_l1 = RelativeError::of(100.0 * total_l1, true_total as f64);

        Ok(Self {
            absolute,
            relative,
            total_l1,
            true_total,
            relative_l1,
        })
    }

    /// Compare a published table against the true table.
    pub fn for_published(truth: &CountTable, published: &PublishedTable) -> Result<Self> {
        Self::compute(truth, published.values())
    }

    /// `|published - true|` per cell.
    pub fn absolute(&self) -> &Tensor {
        &self.absolute
    }

    /// `absolute / true` per cell.
    pub fn relative(&self) -> &ArrayD<RelativeError> {
        &self.relative
    }

    /// Sum of absolute errors over all cells.
    pub fn total_l1(&self) -> f64 {
        self.total_l1
    }

    /// Sum of the true counts.
    pub fn true_total(&self) -> u64 {
        self.true_total
    }

    /// `100 × total_l1 / Σ true`, in percent.
    pub fn relative_l1(&self) -> RelativeError {
        self.relative_l1
    }

    /// Largest cell-wise absolute error.
    pub fn max_absolute(&self) -> f64 {
        self.absolute.iter().copied().fold(0.0, f64::max)
    }

    /// Mean relative error over bounded cells, and how many unbounded cells
    /// were left out.
    pub fn mean_bounded_relative(&self) -> (Option<f64>, usize) {
        let bounded: Vec<f64> = self.relative.iter().filter_map(RelativeError::value).collect();
        let excluded = self.relative.len() - bounded.len();
        if bounded.is_empty() {
            return (None, excluded);
        }
        (
            Some(bounded.iter().sum::<f64>() / bounded.len() as f64),
            excluded,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use census_dp_core::DpError;
    use ndarray::{array, IxDyn};

    fn truth() -> CountTable {
        CountTable::new(array![[18u64, 19], [13, 16], [10, 10], [8, 5], [0, 1]].into_dyn())
    }

    #[test]
    fn test_fixed_noise_report() {
        let published =
            array![[18.0, 18.0], [10.0, 17.0], [9.0, 8.0], [11.0, 2.0], [0.0, 1.0]].into_dyn();
        let report = ErrorReport::compute(&truth(), &published).unwrap();

        assert_eq!(
            report.absolute(),
            &array![[0.0, 1.0], [3.0, 1.0], [1.0, 2.0], [3.0, 3.0], [0.0, 0.0]].into_dyn()
        );
        assert_eq!(report.total_l1(), 14.0);
        assert_eq!(report.true_total(), 100);
        assert_eq!(report.relative_l1(), RelativeError::Ratio(14.0));
        assert_eq!(report.relative()[[4, 0]], RelativeError::Ratio(0.0));
        assert_eq!(report.relative()[[1, 0]], RelativeError::Ratio(3.0 / 13.0));
        assert_eq!(report.max_absolute(), 3.0);
    }

    #[test]
    fn test_zero_truth_is_unbounded() {
        let truth = CountTable::new(array![0u64, 4].into_dyn());
        let report = ErrorReport::compute(&truth, &array![1.0, 4.0].into_dyn()).unwrap();
        assert_eq!(report.relative()[[0]], RelativeError::Unbounded);
        assert_eq!(report.relative()[[0]].as_f64(), f64::INFINITY);
        assert_eq!(report.relative()[[0]].to_string(), "∞");

        let (mean, excluded) = report.mean_bounded_relative();
        assert_eq!(mean, Some(0.0));
        assert_eq!(excluded, 1);
    }

    #[test]
    fn test_all_zero_truth_relative_l1() {
        let truth = CountTable::new(ArrayD::zeros(IxDyn(&[3])));
        let exact = ErrorReport::compute(&truth, &array![0.0, 0.0, 0.0].into_dyn()).unwrap();
        assert_eq!(exact.relative_l1(), RelativeError::Ratio(0.0));

        let off = ErrorReport::compute(&truth, &array![0.0, 2.0, 0.0].into_dyn()).unwrap();
        assert_eq!(off.relative_l1(), RelativeError::Unbounded);
        assert_eq!(off.mean_bounded_relative().1, 1);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = ErrorReport::compute(&truth(), &Tensor::zeros(IxDyn(&[10]))).unwrap_err();
        assert!(matches!(err, DpError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_display_precision() {
        assert_eq!(format!("{:.2}", RelativeError::Ratio(0.12345)), "0.12");
        assert_eq!(format!("{:.2}", RelativeError::Unbounded), "∞");
    }
}
