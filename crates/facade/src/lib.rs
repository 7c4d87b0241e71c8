//! Differentially private release of census-style contingency tables.
//!
//! Re-exports the noise engine ([`core`]) and error accounting
//! ([`accounting`]), and adds the end-to-end [`TableRelease`] pipeline plus
//! small helpers to build tables from records.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod population;
pub mod release;
pub mod tabulate;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use census_dp_accounting as accounting;
pub use census_dp_core as core;

pub use accounting::{
    epsilon_grid, simulate_tradeoff, simulate_tradeoff_seeded, ErrorReport, RelativeError,
    SweepConfig, SweepPoint, SweepResult,
};
pub use core::prelude as core_prelude;
pub use core::{
    add_noise, draw_noise, noise_table, AxisLabels, Calibration, CountTable, DpError,
    MechanismKind, MechanismSpec, NoiseSampler, NoisyTable, PostProcessPolicy, PublishedTable,
    ReplaySampler, Result, RngSampler, Tensor,
};
pub use population::{census_table, synthetic_census, Person};
pub use release::{ReleaseConfig, TableRelease};
pub use tabulate::{crosstab, Categorical};

/// Convenience prelude covering a full release.
pub mod prelude {
    pub use crate::accounting::prelude::*;
    pub use crate::core::prelude::*;
    pub use crate::population::{census_table, synthetic_census, Person};
    pub use crate::release::{ReleaseConfig, TableRelease};
    pub use crate::tabulate::{crosstab, Categorical};
}
