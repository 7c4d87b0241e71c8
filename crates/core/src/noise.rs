//! Noise generation and table noising.

use ndarray::{ArrayD, IxDyn};

use crate::checks::check_same_shape;
use crate::error::{DpError, Result};
use crate::mechanism::{Calibration, MechanismKind, MechanismSpec};
use crate::sampler::NoiseSampler;
use crate::tensor::{AxisLabels, CountTable, Tensor};

/// Draw one noise value from a calibrated distribution.
///
/// Geometric noise is the difference of two independent geometric variates,
/// an integer-valued distribution symmetric around zero with
/// `P(k) ∝ (1 - p)^|k|`.
pub fn draw_one<S: NoiseSampler + ?Sized>(calibration: Calibration, sampler: &mut S) -> Result<f64> {
    match calibration {
        Calibration::Laplace { scale } => sampler.laplace(scale),
        Calibration::Geometric { probability } => {
            let a = sampler.geometric(probability)?;
            let b = sampler.geometric(probability)?;
            Ok(a as f64 - b as f64)
        }
    }
}

/// Draw an array of i.i.d. noise values with the given shape.
pub fn draw_noise<S: NoiseSampler + ?Sized>(
    spec: &MechanismSpec,
    shape: &[usize],
    sampler: &mut S,
) -> Result<Tensor> {
    let calibration = spec.calibrate();
    let len: usize = shape.iter().product();
    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        values.push(draw_one(calibration, sampler)?);
    }
    ArrayD::from_shape_vec(IxDyn(shape), values)
        .map_err(|e| DpError::invalid(format!("noise shape {shape:?}: {e}")))
}

/// A count table with noise added, before any post-processing.
#[derive(Clone, Debug, PartialEq)]
pub struct NoisyTable {
    values: Tensor,
    kind: MechanismKind,
    labels: Vec<AxisLabels>,
}

impl NoisyTable {
    /// Raw noisy values; may be negative or fractional.
    pub fn values(&self) -> &Tensor {
        &self.values
    }

    /// Mechanism family that produced the noise.
    pub fn kind(&self) -> MechanismKind {
        self.kind
    }

    /// Axis labels carried over from the true table.
    pub fn labels(&self) -> &[AxisLabels] {
        &self.labels
    }

    /// Shape of the table.
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }
}

/// Add a pre-drawn noise array to a count table.
///
/// Fails with `ShapeMismatch` when the noise does not have the table's shape.
pub fn add_noise(table: &CountTable, noise: &Tensor, kind: MechanismKind) -> Result<NoisyTable> {
    check_same_shape(table.shape(), noise.shape())?;
    let values = table.to_tensor() + noise;
    Ok(NoisyTable {
        values,
        kind,
        labels: table.labels().to_vec(),
    })
}

/// Draw noise for every cell of `table` and add it.
///
/// Cells with a true count of zero are noised exactly like any other cell;
/// skipping them would reveal which categories are empty.
pub fn noise_table<S: NoiseSampler + ?Sized>(
    table: &CountTable,
    spec: &MechanismSpec,
    sampler: &mut S,
) -> Result<NoisyTable> {
    let noise = draw_noise(spec, table.shape(), sampler)?;
    log::trace!(
        "noised {:?} table with {} (epsilon={}), noise L1 {}",
        table.shape(),
        spec.kind(),
        spec.epsilon(),
        crate::tensor::l1_norm(&noise)
    );
    add_noise(table, &noise, spec.kind())
}
