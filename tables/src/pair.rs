//! Cross-section tables for multiphoton Breit-Wheeler pair creation.

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::{Array1, Array2};
use ndarray_npy::{NpzReader, NpzWriter};

use config::FINE_STRUCTURE;

use crate::radiation::log_of_positive;
use crate::{FractionCdf, LogGrid, Result, TableError};

/// Scaling constants for [`PairTables`].
#[derive(Debug, Clone, Copy)]
pub struct PairTableParams {
    /// Reduced Compton wavelength over the reference length.
    pub normalized_compton_wavelength: f64,
}

/// Immutable lookup tables for the multiphoton Breit-Wheeler process.
#[derive(Debug)]
pub struct PairTables {
    grid: LogGrid,
    /// ln of the pair-production characteristic function `T(χ_γ)`.
    log_t: Array1<f64>,
    /// Inverse-CDF of the electron energy fraction; the positron takes the
    /// complement.
    cdf: FractionCdf,
    /// Normalized pair-production rate scale `α / λ̄_C`.
    factor_dn_dt: f64,
    clamp_events: AtomicU64,
}

impl PairTables {
    pub fn from_arrays(
        params: PairTableParams,
        chi_min: f64,
        chi_max: f64,
        t_table: Array1<f64>,
        cdf: Array2<f64>,
    ) -> Result<Self> {
        let grid = LogGrid::new(chi_min, chi_max, t_table.len())?;
        let log_t = log_of_positive(&t_table)?;
        let cdf = FractionCdf::new(&grid, cdf)?;

        Ok(Self {
            grid,
            log_t,
            cdf,
            factor_dn_dt: FINE_STRUCTURE / params.normalized_compton_wavelength,
            clamp_events: AtomicU64::new(0),
        })
    }

    /// Reads the table artifact written by [`PairTables::save_npz`].
    pub fn from_npz(path: &Path, params: PairTableParams) -> Result<Self> {
        let mut npz = NpzReader::new(File::open(path)?)?;
        let names = npz.names()?;
        for required in ["chi_range", "t", "cdf"] {
            if !names.iter().any(|n| n == required) {
                return Err(TableError::MissingArray(required.into()));
            }
        }
        let chi_range: Array1<f64> = npz.by_name("chi_range.npy")?;
        let t_table: Array1<f64> = npz.by_name("t.npy")?;
        let cdf: Array2<f64> = npz.by_name("cdf.npy")?;
        if chi_range.len() != 2 {
            return Err(TableError::ShapeMismatch {
                expected: 2,
                found: chi_range.len(),
            });
        }
        Self::from_arrays(params, chi_range[0], chi_range[1], t_table, cdf)
    }

    /// Writes the table artifact.
    pub fn save_npz(&self, path: &Path) -> Result<()> {
        let mut npz = NpzWriter::new(File::create(path)?);
        let chi_range = Array1::from_vec(vec![self.grid.chi_min(), self.grid.chi_max()]);
        npz.add_array("chi_range", &chi_range)?;
        npz.add_array("t", &self.log_t.mapv(f64::exp))?;
        npz.add_array("cdf", self.cdf.table())?;
        npz.finish()?;
        Ok(())
    }

    /// Instantaneous pair production rate `dN_pair/dt` for a photon at
    /// `(χ_γ, γ_γ)`.
    #[inline]
    pub fn pair_production_yield(&self, photon_chi: f64, photon_gamma: f64) -> f64 {
        let (i, frac, clamped) = self.grid.locate(photon_chi);
        if clamped {
            self.clamp_events.fetch_add(1, Ordering::Relaxed);
        }
        let log_t = self.log_t[i] + frac * (self.log_t[i + 1] - self.log_t[i]);
        self.factor_dn_dt * photon_chi * log_t.exp() / photon_gamma
    }

    /// Inverse-transform sample of the electron energy fraction for a photon
    /// at `photon_chi`, given a uniform variate `u ∈ (0, 1)`. The positron
    /// fraction is the complement, so the pair always carries the full
    /// photon energy.
    #[inline]
    pub fn sample_electron_fraction(&self, photon_chi: f64, u: f64) -> f64 {
        let (i, frac, clamped) = self.grid.locate(photon_chi);
        if clamped {
            self.clamp_events.fetch_add(1, Ordering::Relaxed);
        }
        self.cdf.sample(i, frac, u)
    }

    /// Number of out-of-range lookups clamped since construction.
    pub fn clamp_events(&self) -> u64 {
        self.clamp_events.load(Ordering::Relaxed)
    }
}
