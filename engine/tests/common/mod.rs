//! Shared fixtures: flat synthetic tables, constant-field arrays and a
//! scripted random generator for single-event scenarios.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use ndarray::{Array1, Array2};

use config::{FINE_STRUCTURE, SpeciesQedConfig};
use tables::{PairTableParams, PairTables, RadiationTableParams, RadiationTables};

pub const CHI_CONTINUOUS: f64 = 1e-2;
pub const CHI_DISCONTINUOUS: f64 = 1e-1;
pub const CHI_PHOTON: f64 = 1e-1;

/// A reduced Compton wavelength that makes the radiation emission-rate
/// prefactor exactly one, so a flat spectrum value `S` gives the rate
/// `S / γ`.
pub fn unit_rate_wavelength() -> f64 {
    3f64.sqrt() / (2.0 * std::f64::consts::PI) * FINE_STRUCTURE
}

/// Test settings: unit Schwinger field, so a particle with momentum `p`
/// transverse to a magnetic field `b` has exactly `χ = p · b`.
pub fn test_config() -> SpeciesQedConfig {
    SpeciesQedConfig {
        chi_threshold_continuous: CHI_CONTINUOUS,
        chi_threshold_discontinuous: CHI_DISCONTINUOUS,
        chi_threshold_photon: CHI_PHOTON,
        norm_schwinger_field: 1.0,
        normalized_compton_wavelength: unit_rate_wavelength(),
        dt: 1.0,
        ..Default::default()
    }
}

/// Flat integrated spectrum and a linear inverse-CDF: the sampled photon χ
/// is `u` times the parent χ.
pub fn radiation_tables(config: &SpeciesQedConfig, yield_value: f64) -> Arc<RadiationTables> {
    let params = RadiationTableParams {
        minimum_chi_continuous: config.chi_threshold_continuous,
        minimum_chi_discontinuous: config.chi_threshold_discontinuous,
        normalized_compton_wavelength: config.normalized_compton_wavelength,
    };
    let n = 16;
    let yield_table = Array1::from_elem(n, yield_value);
    let cdf = Array2::from_shape_fn((n, 101), |(_, j)| (j as f64 / 100.0).max(1e-9));
    Arc::new(RadiationTables::from_arrays(params, 1e-4, 1e3, yield_table, cdf).unwrap())
}

/// Flat characteristic function and a linear inverse-CDF: the electron
/// energy fraction is `u`, flattened near the endpoints so neither product
/// falls below rest energy in the test kinematics.
pub fn pair_tables(config: &SpeciesQedConfig, t_value: f64) -> Arc<PairTables> {
    let params = PairTableParams {
        normalized_compton_wavelength: config.normalized_compton_wavelength,
    };
    let n = 16;
    let t_table = Array1::from_elem(n, t_value);
    let cdf = Array2::from_shape_fn((n, 101), |(_, j)| (j as f64 / 100.0).clamp(0.05, 0.95));
    Arc::new(PairTables::from_arrays(params, 1e-4, 1e3, t_table, cdf).unwrap())
}

/// Constant-field arrays in the interpolator layout for `n` particles.
pub fn constant_fields(n: usize, e: [f64; 3], b: [f64; 3]) -> (Vec<f64>, Vec<f64>) {
    let mut epart = Vec::with_capacity(3 * n);
    let mut bpart = Vec::with_capacity(3 * n);
    for c in 0..3 {
        epart.extend(std::iter::repeat_n(e[c], n));
        bpart.extend(std::iter::repeat_n(b[c], n));
    }
    (epart, bpart)
}

/// A generator that replays a scripted sequence of uniform variates, then
/// falls back to 0.5.
pub struct SequenceRng(VecDeque<u64>);

impl SequenceRng {
    pub fn from_uniforms(uniforms: &[f64]) -> Self {
        Self(uniforms.iter().map(|&u| uniform_bits(u)).collect())
    }
}

/// The `next_u64` output that makes the standard f64 sampler return `u`.
fn uniform_bits(u: f64) -> u64 {
    ((u * (1u64 << 53) as f64) as u64) << 11
}

impl rand::RngCore for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0.pop_front().unwrap_or_else(|| uniform_bits(0.5))
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
}
