//! Core ε-differential-privacy primitives for count tables.
//!
//! This crate provides the noise-calibration engine: mechanism
//! specifications, calibrated Laplace and two-sided geometric noise drawn
//! through an injectable sampler, table noising, and post-processing into
//! publishable tables.
//!
//! The default samplers are not cryptographically secure; see [`sampler`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checks;
pub mod error;
pub mod mechanism;
pub mod noise;
pub mod postprocess;
pub mod sampler;
pub mod tensor;

pub use error::{DpError, Result};
pub use mechanism::{Calibration, MechanismKind, MechanismSpec};
pub use noise::{add_noise, draw_noise, draw_one, noise_table, NoisyTable};
pub use postprocess::{PostProcessPolicy, PublishedTable};
pub use sampler::{NoiseSampler, ReplaySampler, RngSampler};
pub use tensor::{is_integral, l1_norm, AxisLabels, CountTable, Counts, Tensor};

/// Common imports for downstream users.
pub mod prelude {
    pub use crate::{
        add_noise, draw_noise, draw_one, is_integral, l1_norm, noise_table, AxisLabels,
        Calibration, CountTable, Counts, DpError, MechanismKind, MechanismSpec, NoiseSampler,
        NoisyTable, PostProcessPolicy, PublishedTable, ReplaySampler, Result, RngSampler, Tensor,
    };
}
