//! Parameter checks shared by calibration and configuration types.

use crate::error::{DpError, Result};

/// Returns an error if `epsilon` is not strictly positive and finite.
pub fn check_epsilon(label: &str, epsilon: f64) -> Result<()> {
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(DpError::invalid(format!(
            "{label}: epsilon is {epsilon}, must be positive and finite"
        )));
    }
    Ok(())
}

/// Returns an error if `sensitivity` is not strictly positive and finite.
pub fn check_sensitivity(label: &str, sensitivity: f64) -> Result<()> {
    if !sensitivity.is_finite() || sensitivity <= 0.0 {
        return Err(DpError::invalid(format!(
            "{label}: sensitivity is {sensitivity}, must be positive and finite"
        )));
    }
    Ok(())
}

/// Returns an error unless `confidence` lies in the open interval (0, 1).
pub fn check_confidence(label: &str, confidence: f64) -> Result<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(DpError::invalid(format!(
            "{label}: confidence is {confidence}, must be in (0, 1)"
        )));
    }
    Ok(())
}

/// Returns a shape mismatch error unless both shapes are identical.
pub fn check_same_shape(expected: &[usize], found: &[usize]) -> Result<()> {
    if expected != found {
        return Err(DpError::shape(expected, found));
    }
    Ok(())
}
