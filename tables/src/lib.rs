//! Lookup tables for the strong-field QED processes.
//!
//! Two table sets exist, both keyed by a log-spaced quantum-parameter axis:
//! [`RadiationTables`] for nonlinear inverse Compton scattering and
//! [`PairTables`] for multiphoton Breit-Wheeler pair creation. Both are
//! immutable after construction and shared across worker threads.

mod cdf;
mod error;
mod grid;
mod pair;
mod radiation;

pub use error::TableError;
pub use grid::LogGrid;
pub use pair::{PairTableParams, PairTables};
pub use radiation::{RadiationTableParams, RadiationTables, ridgers_fit};

pub(crate) use cdf::FractionCdf;

pub type Result<T> = std::result::Result<T, TableError>;
