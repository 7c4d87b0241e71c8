//! Table types and low-level array operations.

use ndarray::{ArrayD, IxDyn};

use crate::checks::check_same_shape;
use crate::error::{DpError, Result};

/// Dynamic-dimensional floating point array (noise, noisy and published values).
pub type Tensor = ArrayD<f64>;

/// Dynamic-dimensional array of true counts.
pub type Counts = ArrayD<u64>;

/// Category labels along one axis of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisLabels {
    /// Axis name, e.g. `"occupation"`.
    pub name: String,
    /// Category labels in index order.
    pub categories: Vec<String>,
}

impl AxisLabels {
    /// Create labels for an axis.
    pub fn new<N, I, S>(name: N, categories: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of categories on this axis.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the axis has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Position of a category, if present.
    pub fn position(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }
}

/// A contingency table of true, non-negative counts.
///
/// The shape is fixed at construction and carried unchanged through noising
/// and post-processing.
#[derive(Clone, Debug, PartialEq)]
pub struct CountTable {
    counts: Counts,
    labels: Vec<AxisLabels>,
}

impl CountTable {
    /// Wrap an unlabeled array of counts.
    pub fn new(counts: Counts) -> Self {
        Self {
            counts,
            labels: Vec::new(),
        }
    }

    /// Build a table from a shape and row-major values.
    pub fn from_shape_vec(shape: &[usize], values: Vec<u64>) -> Result<Self> {
        let found = vec![values.len()];
        let counts = ArrayD::from_shape_vec(IxDyn(shape), values)
            .map_err(|_| DpError::shape(&[shape.iter().product()], &found))?;
        Ok(Self::new(counts))
    }

    /// Attach axis labels; one entry per axis, each as long as its axis.
    pub fn with_labels(mut self, labels: Vec<AxisLabels>) -> Result<Self> {
        let label_shape: Vec<usize> = labels.iter().map(AxisLabels::len).collect();
        check_same_shape(self.counts.shape(), &label_shape)?;
        self.labels = labels;
        Ok(self)
    }

    /// The underlying counts.
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Axis labels (empty when the table is unlabeled).
    pub fn labels(&self) -> &[AxisLabels] {
        &self.labels
    }

    /// Shape of the table.
    pub fn shape(&self) -> &[usize] {
        self.counts.shape()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the table has no cells.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts converted to floating point.
    pub fn to_tensor(&self) -> Tensor {
        self.counts.mapv(|c| c as f64)
    }
}

impl From<Counts> for CountTable {
    fn from(counts: Counts) -> Self {
        Self::new(counts)
    }
}

/// Sum of absolute values.
pub fn l1_norm(t: &Tensor) -> f64 {
    t.iter().map(|v| v.abs()).sum()
}

/// Whether every value is a finite whole number.
pub fn is_integral(t: &Tensor) -> bool {
    t.iter().all(|v| v.is_finite() && v.fract() == 0.0)
}
