//! Demo run: an electron beam radiating in a constant magnetic field, the
//! emitted photons decaying into pairs.
//!
//! Uses analytic surrogate tables; production runs load the tabulated
//! cross-sections from their NPZ artifact instead.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array1, Array2};

use config::{PBAR_STYLE, RadiationKind, SpeciesQedConfig};
use engine::{ParticleBlock, QedStage};
use tables::{PairTableParams, PairTables, RadiationTableParams, RadiationTables, ridgers_fit};

const STEPS: usize = 200;
const BEAM_SIZE: usize = 2000;
const TABLE_SIZE: usize = 128;

fn electron_config() -> SpeciesQedConfig {
    SpeciesQedConfig {
        radiation_model: RadiationKind::MonteCarlo,
        dt: 0.05,
        ..Default::default()
    }
}

fn photon_config() -> SpeciesQedConfig {
    SpeciesQedConfig {
        multiphoton_bw: true,
        dt: 0.05,
        ..Default::default()
    }
}

/// Surrogate radiation tables: a softened power-law spectrum and a cubic
/// inverse-CDF.
fn surrogate_radiation_tables(config: &SpeciesQedConfig) -> engine::Result<RadiationTables> {
    let params = RadiationTableParams {
        minimum_chi_continuous: config.chi_threshold_continuous,
        minimum_chi_discontinuous: config.chi_threshold_discontinuous,
        normalized_compton_wavelength: config.normalized_compton_wavelength,
    };
    let (chi_min, chi_max): (f64, f64) = (1e-4, 1e2);
    let log_span = (chi_max / chi_min).log10();
    let yield_table = Array1::from_shape_fn(TABLE_SIZE, |i| {
        let chi = chi_min * 10f64.powf(log_span * i as f64 / (TABLE_SIZE - 1) as f64);
        chi * ridgers_fit(chi).cbrt()
    });
    let cdf = Array2::from_shape_fn((TABLE_SIZE, 64), |(_, j)| {
        let u = j as f64 / 63.0;
        (u * u * u).max(1e-6)
    });
    Ok(RadiationTables::from_arrays(
        params, chi_min, chi_max, yield_table, cdf,
    )?)
}

/// Surrogate pair tables: the exponential suppression of the
/// pair-production characteristic function and a flattened symmetric
/// energy split.
fn surrogate_pair_tables(config: &SpeciesQedConfig) -> engine::Result<PairTables> {
    let params = PairTableParams {
        normalized_compton_wavelength: config.normalized_compton_wavelength,
    };
    let (chi_min, chi_max): (f64, f64) = (1e-2, 1e2);
    let log_span = (chi_max / chi_min).log10();
    let t_table = Array1::from_shape_fn(TABLE_SIZE, |i| {
        let chi = chi_min * 10f64.powf(log_span * i as f64 / (TABLE_SIZE - 1) as f64);
        0.16 * (-8.0 / (3.0 * chi)).exp()
    });
    let cdf = Array2::from_shape_fn((TABLE_SIZE, 64), |(_, j)| {
        let u = j as f64 / 63.0;
        u.clamp(0.02, 0.98)
    });
    Ok(PairTables::from_arrays(
        params, chi_min, chi_max, t_table, cdf,
    )?)
}

/// Constant-field arrays in the interpolator layout for `n` particles.
fn constant_fields(n: usize, e: [f64; 3], b: [f64; 3]) -> (Vec<f64>, Vec<f64>) {
    let mut epart = Vec::with_capacity(3 * n);
    let mut bpart = Vec::with_capacity(3 * n);
    for c in 0..3 {
        epart.extend(std::iter::repeat_n(e[c], n));
        bpart.extend(std::iter::repeat_n(b[c], n));
    }
    (epart, bpart)
}

fn main() -> engine::Result<()> {
    let config = electron_config();
    let radiation_tables = Arc::new(surrogate_radiation_tables(&config)?);
    let pair_tables = Arc::new(surrogate_pair_tables(&config)?);

    let mut electron_stage = QedStage::new(
        &config,
        Some(Arc::clone(&radiation_tables)),
        None,
        1,
        0xBEA3,
    )?;
    let mut photon_stage = QedStage::new(
        &photon_config(),
        None,
        Some(Arc::clone(&pair_tables)),
        1,
        0xBEA4,
    )?;

    // A mildly chirped electron beam along x in a transverse magnetic
    // field strong enough to push χ into the Monte-Carlo regime.
    let mut electrons = ParticleBlock::new(1)?;
    for i in 0..BEAM_SIZE {
        let p = 800.0 + 400.0 * (i as f64 / (BEAM_SIZE - 1) as f64);
        electrons.push(&[0.0], [p, 0.0, 0.0], 1.0, -1)?;
    }
    let mut photons = ParticleBlock::new(1)?;
    let mut pair_electrons = ParticleBlock::new(1)?;
    let mut pair_positrons = ParticleBlock::new(1)?;

    let b_field = [0.0, 0.0, 2.0 * config.norm_schwinger_field / 1000.0];
    let initial_energy = electrons.kinetic_energy_lepton();

    let mut radiated_energy = 0.0;
    let mut pair_energy = 0.0;
    let mut photons_removed = 0;

    let bar = ProgressBar::new(STEPS as u64);
    bar.set_style(ProgressStyle::with_template(PBAR_STYLE).unwrap_or(ProgressStyle::default_bar()));

    for _ in 0..STEPS {
        let (epart, bpart) = constant_fields(electrons.len(), [0.0; 3], b_field);
        let report =
            electron_stage.run_radiation(&mut electrons, &epart, &bpart, 0, Some(&mut photons))?;
        radiated_energy += report.radiation.radiated_energy;

        let (epart, bpart) = constant_fields(photons.len(), [0.0; 3], b_field);
        let mut bmin = [0];
        let mut bmax = [photons.len()];
        let report = photon_stage.run_breit_wheeler(
            &mut photons,
            &epart,
            &bpart,
            0,
            Some(&mut pair_electrons),
            Some(&mut pair_positrons),
            &mut bmin,
            &mut bmax,
        )?;
        pair_energy += report.pairs.pair_energy;
        photons_removed += report.photons_removed;

        bar.inc(1);
    }
    bar.finish();

    let final_energy = electrons.kinetic_energy_lepton()
        + photons.kinetic_energy_photon()
        + pair_electrons.kinetic_energy_lepton()
        + pair_positrons.kinetic_energy_lepton()
        + radiated_energy;

    println!("electrons:        {}", electrons.len());
    println!("photons stored:   {}", photons.len());
    println!("photons decayed:  {photons_removed}");
    println!(
        "pairs created:    {} + {}",
        pair_electrons.len(),
        pair_positrons.len()
    );
    println!("radiated energy:  {radiated_energy:.6e}");
    println!("pair energy:      {pair_energy:.6e}");
    println!(
        "energy balance:   {:.6e} -> {:.6e} (relative drift {:.3e})",
        initial_energy,
        final_energy,
        (final_energy - initial_energy).abs() / initial_energy
    );
    let clamps = electron_stage.table_clamp_events() + photon_stage.table_clamp_events();
    if clamps > 0 {
        eprintln!("warning: {clamps} table lookups were clamped to the chi axis bounds");
    }

    Ok(())
}
