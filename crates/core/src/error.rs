//! Error types for noise calibration and table release.

/// Errors that can occur while calibrating, drawing or applying noise.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DpError {
    /// Invalid parameter provided (non-positive sensitivity or epsilon, bad config).
    #[error("invalid parameter: {msg}")]
    InvalidParameters {
        /// Human-readable error description.
        msg: String,
    },

    /// Two arrays that must agree in shape do not.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Shape the operation required.
        expected: Vec<usize>,
        /// Shape that was supplied.
        found: Vec<usize>,
    },

    /// The randomness source failed or ran out of values.
    #[error("randomness source failure: {msg}")]
    Randomness {
        /// Human-readable error description.
        msg: String,
    },
}

/// Result type for DP operations.
pub type Result<T> = std::result::Result<T, DpError>;

impl DpError {
    /// Create an invalid parameter error.
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameters { msg: msg.into() }
    }

    /// Create a shape mismatch error.
    pub fn shape(expected: &[usize], found: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }

    /// Create a randomness failure error.
    pub fn randomness<S: Into<String>>(msg: S) -> Self {
        Self::Randomness { msg: msg.into() }
    }
}

impl From<rand::Error> for DpError {
    fn from(err: rand::Error) -> Self {
        Self::randomness(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_error_message_lists_both_shapes() {
        let err = DpError::shape(&[5, 2], &[2, 5]);
        assert_eq!(
            err.to_string(),
            "shape mismatch: expected [5, 2], found [2, 5]"
        );
    }
}
