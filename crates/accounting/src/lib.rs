//! Error accounting and privacy/utility tradeoff simulation.
//!
//! [`report`] measures how far a published table is from the truth, cell by
//! cell and in aggregate. [`sweep`] estimates how that error shrinks as ε
//! grows, by simulating the noise alone over a log-spaced ε grid.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod params;
pub mod report;
pub mod stats;
pub mod sweep;

pub use params::SweepConfig;
pub use report::{ErrorReport, RelativeError};
pub use stats::{average_ranks, mean_and_std, spearman};
pub use sweep::{
    epsilon_grid, simulate_tradeoff, simulate_tradeoff_seeded, SweepPoint, SweepResult,
};

/// Common imports for error accounting.
pub mod prelude {
    pub use crate::{
        epsilon_grid, mean_and_std, simulate_tradeoff, simulate_tradeoff_seeded, spearman,
        ErrorReport, RelativeError, SweepConfig, SweepPoint, SweepResult,
    };
}
