//! Cross-section tables for nonlinear inverse Compton scattering.

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::{Array1, Array2};
use ndarray_npy::{NpzReader, NpzWriter};

use config::FINE_STRUCTURE;

use crate::{FractionCdf, LogGrid, Result, TableError};

/// The Ridgers fit of the quantum correction factor `g(χ)` to the classical
/// synchrotron power.
#[inline]
pub fn ridgers_fit(chi: f64) -> f64 {
    let denom = 1.0 + 4.8 * (1.0 + chi) * (1.7 * chi).ln_1p() + 2.44 * chi * chi;
    denom.powf(-2.0 / 3.0)
}

/// Scaling constants and regime thresholds for [`RadiationTables`].
#[derive(Debug, Clone, Copy)]
pub struct RadiationTableParams {
    /// Below this χ a lepton does not radiate.
    pub minimum_chi_continuous: f64,
    /// Above this χ emission is sampled discretely.
    pub minimum_chi_discontinuous: f64,
    /// Reduced Compton wavelength over the reference length; sets the
    /// normalized emission-rate and radiated-power scales.
    pub normalized_compton_wavelength: f64,
}

/// Immutable lookup tables for the Monte-Carlo radiation process.
///
/// Shared read-only across worker threads. Out-of-range χ lookups clamp to
/// the table endpoints and are counted in [`RadiationTables::clamp_events`].
#[derive(Debug)]
pub struct RadiationTables {
    grid: LogGrid,
    /// ln of the integrated emission spectrum, for log-log interpolation.
    log_yield: Array1<f64>,
    cdf: FractionCdf,
    minimum_chi_continuous: f64,
    minimum_chi_discontinuous: f64,
    /// Normalized emission-rate scale `√3/(2π) · α / λ̄_C`.
    factor_dn_dt: f64,
    /// Normalized classical radiated-power scale `2α / (3 λ̄_C)`.
    factor_classical_power: f64,
    clamp_events: AtomicU64,
}

impl RadiationTables {
    /// Builds the tables from raw arrays.
    ///
    /// `yield_table` holds the integrated emission spectrum on a log-spaced
    /// χ axis of `[chi_min, chi_max]`; `cdf` holds the inverse-CDF of the
    /// emitted-photon χ as a fraction of the parent χ, rows along the same
    /// axis, columns along a uniform `u` grid.
    pub fn from_arrays(
        params: RadiationTableParams,
        chi_min: f64,
        chi_max: f64,
        yield_table: Array1<f64>,
        cdf: Array2<f64>,
    ) -> Result<Self> {
        let grid = LogGrid::new(chi_min, chi_max, yield_table.len())?;
        let log_yield = log_of_positive(&yield_table)?;
        let cdf = FractionCdf::new(&grid, cdf)?;
        let lambda = params.normalized_compton_wavelength;

        Ok(Self {
            grid,
            log_yield,
            cdf,
            minimum_chi_continuous: params.minimum_chi_continuous,
            minimum_chi_discontinuous: params.minimum_chi_discontinuous,
            factor_dn_dt: 3f64.sqrt() / (2.0 * std::f64::consts::PI) * FINE_STRUCTURE / lambda,
            factor_classical_power: 2.0 * FINE_STRUCTURE / (3.0 * lambda),
            clamp_events: AtomicU64::new(0),
        })
    }

    /// Reads the table artifact written by [`RadiationTables::save_npz`].
    pub fn from_npz(path: &Path, params: RadiationTableParams) -> Result<Self> {
        let mut npz = NpzReader::new(File::open(path)?)?;
        let names = npz.names()?;
        for required in ["chi_range", "yield", "cdf"] {
            if !names.iter().any(|n| n == required) {
                return Err(TableError::MissingArray(required.into()));
            }
        }
        let chi_range: Array1<f64> = npz.by_name("chi_range.npy")?;
        let yield_table: Array1<f64> = npz.by_name("yield.npy")?;
        let cdf: Array2<f64> = npz.by_name("cdf.npy")?;
        if chi_range.len() != 2 {
            return Err(TableError::ShapeMismatch {
                expected: 2,
                found: chi_range.len(),
            });
        }
        Self::from_arrays(params, chi_range[0], chi_range[1], yield_table, cdf)
    }

    /// Writes the table artifact.
    pub fn save_npz(&self, path: &Path) -> Result<()> {
        let mut npz = NpzWriter::new(File::create(path)?);
        let chi_range = Array1::from_vec(vec![self.grid.chi_min(), self.grid.chi_max()]);
        npz.add_array("chi_range", &chi_range)?;
        npz.add_array("yield", &self.log_yield.mapv(f64::exp))?;
        npz.add_array("cdf", self.cdf.table())?;
        npz.finish()?;
        Ok(())
    }

    pub fn minimum_chi_continuous(&self) -> f64 {
        self.minimum_chi_continuous
    }

    pub fn minimum_chi_discontinuous(&self) -> f64 {
        self.minimum_chi_discontinuous
    }

    /// Instantaneous photon production rate `dN/dt` for a lepton at `(χ, γ)`,
    /// in emissions per unit normalized time.
    #[inline]
    pub fn photon_production_yield(&self, chi: f64, gamma: f64) -> f64 {
        let (i, frac, clamped) = self.grid.locate(chi);
        if clamped {
            self.clamp_events.fetch_add(1, Ordering::Relaxed);
        }
        let log_s = self.log_yield[i] + frac * (self.log_yield[i + 1] - self.log_yield[i]);
        self.factor_dn_dt * log_s.exp() / gamma
    }

    /// Inverse-transform sample of the emitted-photon χ for a parent at
    /// `chi`, given a uniform variate `u ∈ (0, 1)`.
    ///
    /// Non-decreasing in `u` for fixed `chi`; never exceeds the parent χ.
    #[inline]
    pub fn sample_photon_chi(&self, chi: f64, u: f64) -> f64 {
        let (i, frac, clamped) = self.grid.locate(chi);
        if clamped {
            self.clamp_events.fetch_add(1, Ordering::Relaxed);
        }
        self.cdf.sample(i, frac, u) * chi
    }

    /// Energy radiated continuously over `delta_t` by a lepton at `chi`,
    /// using the classical synchrotron power with the Ridgers quantum
    /// correction.
    #[inline]
    pub fn radiated_energy_corrected(&self, chi: f64, delta_t: f64) -> f64 {
        self.factor_classical_power * chi * chi * ridgers_fit(chi) * delta_t
    }

    /// Number of out-of-range lookups clamped since construction.
    pub fn clamp_events(&self) -> u64 {
        self.clamp_events.load(Ordering::Relaxed)
    }
}

pub(crate) fn log_of_positive(table: &Array1<f64>) -> Result<Array1<f64>> {
    for (index, &value) in table.iter().enumerate() {
        if !(value > 0.0) {
            return Err(TableError::NonPositiveEntry { index, value });
        }
    }
    Ok(table.mapv(f64::ln))
}

#[cfg(test)]
mod test {
    use super::*;

    fn flat_tables() -> RadiationTables {
        let params = RadiationTableParams {
            minimum_chi_continuous: 1e-3,
            minimum_chi_discontinuous: 1e-2,
            normalized_compton_wavelength: 1.0,
        };
        // Constant spectrum, linear CDF: the sampled fraction equals u.
        let n = 8;
        let yield_table = Array1::from_elem(n, 1.0);
        let cdf = Array2::from_shape_fn((n, 11), |(_, j)| (j as f64 / 10.0).max(1e-3));
        RadiationTables::from_arrays(params, 1e-3, 1e2, yield_table, cdf).unwrap()
    }

    #[test]
    fn test_ridgers_fit_limits() {
        // Classical limit.
        assert!((ridgers_fit(0.0) - 1.0).abs() < 1e-12);
        // Strong quantum suppression.
        assert!(ridgers_fit(10.0) < 0.05);
        // Monotone decreasing.
        assert!(ridgers_fit(0.1) > ridgers_fit(0.2));
    }

    #[test]
    fn test_yield_scaling() {
        let tables = flat_tables();
        let y1 = tables.photon_production_yield(0.1, 100.0);
        let y2 = tables.photon_production_yield(0.1, 200.0);
        assert!((y1 / y2 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sampled_chi_never_exceeds_parent() {
        let tables = flat_tables();
        for k in 1..100 {
            let u = k as f64 / 100.0;
            let chi_gamma = tables.sample_photon_chi(0.5, u);
            assert!(chi_gamma > 0.0 && chi_gamma <= 0.5);
        }
    }

    #[test]
    fn test_sample_monotone_in_u() {
        let tables = flat_tables();
        let mut previous = 0.0;
        for k in 0..=1000 {
            let u = k as f64 / 1000.0;
            let chi_gamma = tables.sample_photon_chi(2.0, u);
            assert!(chi_gamma >= previous);
            previous = chi_gamma;
        }
    }

    #[test]
    fn test_out_of_range_lookups_are_counted() {
        let tables = flat_tables();
        assert_eq!(tables.clamp_events(), 0);
        tables.photon_production_yield(1e6, 10.0);
        tables.photon_production_yield(1e-9, 10.0);
        assert_eq!(tables.clamp_events(), 2);
    }

    #[test]
    fn test_rejects_non_positive_spectrum() {
        let params = RadiationTableParams {
            minimum_chi_continuous: 1e-3,
            minimum_chi_discontinuous: 1e-2,
            normalized_compton_wavelength: 1.0,
        };
        let yield_table = Array1::from_vec(vec![1.0, 0.0, 1.0]);
        let cdf = Array2::from_elem((3, 4), 0.5);
        RadiationTables::from_arrays(params, 1e-3, 1e2, yield_table, cdf).unwrap_err();
    }

    #[test]
    fn test_npz_round_trip() {
        let tables = flat_tables();
        let path = std::env::temp_dir().join("radiation_tables_test.npz");
        tables.save_npz(&path).unwrap();

        let params = RadiationTableParams {
            minimum_chi_continuous: 1e-3,
            minimum_chi_discontinuous: 1e-2,
            normalized_compton_wavelength: 1.0,
        };
        let reloaded = RadiationTables::from_npz(&path, params).unwrap();
        let y0 = tables.photon_production_yield(0.1, 100.0);
        let y1 = reloaded.photon_production_yield(0.1, 100.0);
        assert!((y0 - y1).abs() < 1e-12 * y0.abs());
        std::fs::remove_file(&path).ok();
    }
}
