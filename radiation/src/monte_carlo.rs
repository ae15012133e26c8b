//! Monte-Carlo nonlinear inverse Compton scattering.
//!
//! Each particle is advanced through the outer timestep by sub-steps of an
//! optical-depth countdown. Above the discontinuous threshold, emission
//! times are sampled from `τ = −ln(1 − u)` against the tabulated production
//! yield; between the two thresholds the remaining time is handled by the
//! continuous quantum-corrected damping.

use config::{EPS_TAU, SpeciesQedConfig, YIELD_FLOOR};
use rand::Rng;
use species::{FieldView, ProductBuffer, RangeMut, TAU_SENTINEL};
use tables::RadiationTables;

use crate::RadiationStats;
use crate::chi::{particle_chi, refresh_particle_chi};

/// The Monte-Carlo radiation engine of one species.
#[derive(Debug, Clone)]
pub struct MonteCarloRadiation {
    dt: f64,
    max_iterations: u32,
    photon_sampling: u32,
    inv_photon_sampling: f64,
    photon_gamma_threshold: f64,
    one_over_mass_square: f64,
    inv_norm_schwinger: f64,
}

impl MonteCarloRadiation {
    pub fn new(config: &SpeciesQedConfig) -> Self {
        Self {
            dt: config.dt,
            max_iterations: config.max_monte_carlo_iterations,
            photon_sampling: config.photon.sampling,
            inv_photon_sampling: 1.0 / f64::from(config.photon.sampling),
            photon_gamma_threshold: config.photon.gamma_threshold,
            one_over_mass_square: config.one_over_mass_square(),
            inv_norm_schwinger: config.inv_norm_schwinger_field(),
        }
    }

    /// Advances every particle of the range through the timestep.
    ///
    /// Macro-photons go into `photons` when a buffer is provided and the
    /// emitted γ clears the storage threshold; otherwise their energy is
    /// booked into the returned scalar. The RNG is owned by the worker
    /// processing this range.
    pub fn apply<R: Rng>(
        &self,
        range: &mut RangeMut<'_>,
        fields: &FieldView<'_>,
        tables: &RadiationTables,
        mut photons: Option<&mut ProductBuffer>,
        rng: &mut R,
    ) -> RadiationStats {
        let mut stats = RadiationStats::default();
        let chi_continuous = tables.minimum_chi_continuous();
        let chi_discontinuous = tables.minimum_chi_discontinuous();

        for i in 0..range.len() {
            let ipart = range.start + i;
            let charge_over_mass_square = f64::from(range.charge[i]) * self.one_over_mass_square;

            let mut local_time = 0.0;
            let mut iterations = 0u32;

            while local_time < self.dt && iterations < self.max_iterations {
                let gamma = range.lorentz_factor(i);
                // Zero kinetic energy: nothing to radiate.
                if gamma == 1.0 {
                    break;
                }
                let chi = particle_chi(
                    charge_over_mass_square,
                    self.inv_norm_schwinger,
                    range.mom_x[i],
                    range.mom_y[i],
                    range.mom_z[i],
                    gamma,
                    fields.ex(ipart),
                    fields.ey(ipart),
                    fields.ez(ipart),
                    fields.bx(ipart),
                    fields.by(ipart),
                    fields.bz(ipart),
                );

                // New discontinuous event: draw the target optical depth.
                // The draw excludes u = 1 by construction of the uniform
                // variate, and repeats past the singular draw at u = 0.
                if chi > chi_discontinuous && range.tau[i] <= EPS_TAU {
                    while range.tau[i] <= EPS_TAU {
                        range.tau[i] = -(1.0 - rng.random::<f64>()).ln();
                    }
                }

                if range.tau[i] > EPS_TAU {
                    // Emission countdown in progress.
                    let rate = tables.photon_production_yield(chi, gamma);
                    if rate <= YIELD_FLOOR {
                        // The countdown stalls; it carries over to the next
                        // timestep.
                        local_time = self.dt;
                        iterations += 1;
                        continue;
                    }
                    let emission_time = (range.tau[i] / rate).min(self.dt - local_time);
                    range.tau[i] -= rate * emission_time;

                    if range.tau[i] <= EPS_TAU {
                        self.photon_emission(
                            range,
                            i,
                            chi,
                            gamma,
                            photons.as_deref_mut(),
                            tables,
                            rng,
                            &mut stats,
                        );
                        // A fresh countdown may be drawn on the next
                        // sub-step.
                        range.tau[i] = TAU_SENTINEL;
                    }

                    iterations += 1;
                    local_time += emission_time;
                } else if chi > chi_continuous && gamma > 1.0 {
                    // Continuous regime: one damping segment consumes the
                    // remaining time.
                    let energy = tables.radiated_energy_corrected(chi, self.dt - local_time);
                    let damping = energy * gamma / (gamma * gamma - 1.0);
                    range.mom_x[i] -= damping * range.mom_x[i];
                    range.mom_y[i] -= damping * range.mom_y[i];
                    range.mom_z[i] -= damping * range.mom_z[i];

                    stats.radiated_energy += range.weight[i] * (gamma - range.lorentz_factor(i));
                    local_time = self.dt;
                } else {
                    // χ too low to radiate at all.
                    local_time = self.dt;
                }
            }

            if iterations >= self.max_iterations && local_time < self.dt {
                stats.cap_hits += 1;
            }
        }

        // Diagnostic pass, separate from the in-loop local χ.
        refresh_particle_chi(range, fields, self.one_over_mass_square, self.inv_norm_schwinger);
        stats
    }

    /// Emission of one quantum: samples the photon χ, applies the parent
    /// recoil along the emission direction, and either stores macro-photons
    /// or books the energy into the scalar.
    #[allow(clippy::too_many_arguments)]
    fn photon_emission<R: Rng>(
        &self,
        range: &mut RangeMut<'_>,
        i: usize,
        chi: f64,
        gamma: f64,
        photons: Option<&mut ProductBuffer>,
        tables: &RadiationTables,
        rng: &mut R,
        stats: &mut RadiationStats,
    ) {
        let photon_chi = tables.sample_photon_chi(chi, rng.random::<f64>());
        let photon_gamma = photon_chi / chi * (gamma - 1.0);

        // Momentum conservation in the emission direction; the photon is
        // emitted along the parent momentum (1/γ aperture is negligible).
        let (px, py, pz) = (range.mom_x[i], range.mom_y[i], range.mom_z[i]);
        let recoil = photon_gamma / (gamma * gamma - 1.0).sqrt();
        range.mom_x[i] -= recoil * px;
        range.mom_y[i] -= recoil * py;
        range.mom_z[i] -= recoil * pz;

        if let Some(buffer) = photons {
            if photon_gamma >= self.photon_gamma_threshold {
                let inv_norm = 1.0 / (px * px + py * py + pz * pz).sqrt();
                let mom = [
                    photon_gamma * px * inv_norm,
                    photon_gamma * py * inv_norm,
                    photon_gamma * pz * inv_norm,
                ];
                let weight = range.weight[i] * self.inv_photon_sampling;
                let pos = range.position(i);
                for _ in 0..self.photon_sampling {
                    buffer.push(pos, mom, weight, 0, photon_chi);
                }
                stats.photons_emitted += u64::from(self.photon_sampling);
                // Energy is carried by the macro-photons, not the scalar.
                return;
            }
        }

        // No macro-photon stored: the emitted energy would otherwise be
        // lost, so it goes into the radiated-energy scalar.
        stats.radiated_energy += range.weight[i] * (gamma - range.lorentz_factor(i));
    }
}
