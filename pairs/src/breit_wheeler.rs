use config::{ConfigError, EPS_TAU, SpeciesQedConfig, YIELD_FLOOR};
use rand::Rng;
use species::{FieldView, ProductBuffer, RangeMut, TAU_SENTINEL};
use tables::PairTables;

use crate::PairStats;
use crate::chi::photon_chi;

/// The multiphoton Breit-Wheeler engine of one photon species.
#[derive(Debug, Clone)]
pub struct MultiphotonBreitWheeler {
    dt: f64,
    max_iterations: u32,
    sampling: [u32; 2],
    inv_sampling: [f64; 2],
    chi_threshold: f64,
    inv_norm_schwinger: f64,
}

impl MultiphotonBreitWheeler {
    /// Builds the engine from the species settings.
    ///
    /// Fails when the settings are inconsistent or when the pair
    /// cross-section tables were never loaded.
    pub fn build(config: &SpeciesQedConfig, tables_loaded: bool) -> config::Result<Self> {
        config.validate()?;
        if !tables_loaded {
            return Err(ConfigError::MissingTables {
                model: "multiphoton-BW",
                tables: "pair",
            });
        }
        Ok(Self {
            dt: config.dt,
            max_iterations: config.max_monte_carlo_iterations,
            sampling: config.pair_creation_sampling,
            inv_sampling: config.pair_creation_sampling.map(|s| 1.0 / f64::from(s)),
            chi_threshold: config.chi_threshold_photon,
            inv_norm_schwinger: config.inv_norm_schwinger_field(),
        })
    }

    /// Advances every photon of the range through the timestep.
    ///
    /// A photon whose countdown fires decays: its pair is staged into the
    /// `electrons`/`positrons` buffers (when provided), its weight is
    /// zeroed, and the converted energy is booked regardless of whether the
    /// products were materialized.
    pub fn apply<R: Rng>(
        &self,
        range: &mut RangeMut<'_>,
        fields: &FieldView<'_>,
        tables: &PairTables,
        mut electrons: Option<&mut ProductBuffer>,
        mut positrons: Option<&mut ProductBuffer>,
        rng: &mut R,
    ) -> PairStats {
        let mut stats = PairStats::default();

        for i in 0..range.len() {
            // Already decayed earlier in the step chain.
            if range.weight[i] <= 0.0 {
                continue;
            }
            let ipart = range.start + i;

            let mut local_time = 0.0;
            let mut iterations = 0u32;

            while local_time < self.dt && iterations < self.max_iterations {
                let photon_gamma = range.momentum_norm(i);
                let chi = photon_chi(
                    self.inv_norm_schwinger,
                    range.mom_x[i],
                    range.mom_y[i],
                    range.mom_z[i],
                    photon_gamma,
                    fields.ex(ipart),
                    fields.ey(ipart),
                    fields.ez(ipart),
                    fields.bx(ipart),
                    fields.by(ipart),
                    fields.bz(ipart),
                );
                // Below the threshold the photon cannot decay; the local
                // fields are frozen within the step, so the photon is done.
                if chi <= self.chi_threshold {
                    local_time = self.dt;
                    break;
                }

                // New countdown towards the decay event.
                if range.tau[i] <= EPS_TAU {
                    while range.tau[i] <= EPS_TAU {
                        range.tau[i] = -(1.0 - rng.random::<f64>()).ln();
                    }
                }

                let rate = tables.pair_production_yield(chi, photon_gamma);
                if rate <= YIELD_FLOOR {
                    local_time = self.dt;
                    iterations += 1;
                    continue;
                }
                let event_time = (range.tau[i] / rate).min(self.dt - local_time);
                range.tau[i] -= rate * event_time;

                if range.tau[i] <= EPS_TAU {
                    self.pair_creation(
                        range,
                        i,
                        chi,
                        photon_gamma,
                        electrons.as_deref_mut(),
                        positrons.as_deref_mut(),
                        tables,
                        rng,
                        &mut stats,
                    );
                    // The photon is gone.
                    break;
                }

                iterations += 1;
                local_time += event_time;
            }

            if iterations >= self.max_iterations && local_time < self.dt && range.weight[i] > 0.0 {
                stats.cap_hits += 1;
            }
        }

        stats
    }

    /// Decay of one photon: samples the electron energy fraction, emits
    /// both product kinds collinear with the parent momentum, and marks the
    /// photon for removal.
    #[allow(clippy::too_many_arguments)]
    fn pair_creation<R: Rng>(
        &self,
        range: &mut RangeMut<'_>,
        i: usize,
        chi: f64,
        photon_gamma: f64,
        electrons: Option<&mut ProductBuffer>,
        positrons: Option<&mut ProductBuffer>,
        tables: &PairTables,
        rng: &mut R,
        stats: &mut PairStats,
    ) {
        let electron_fraction = tables.sample_electron_fraction(chi, rng.random::<f64>());
        // The fractions sum to one, so the pair carries the full photon
        // energy.
        let fractions = [electron_fraction, 1.0 - electron_fraction];
        let charges = [-1i16, 1];

        let inv_norm = 1.0 / photon_gamma;
        let unit = [
            range.mom_x[i] * inv_norm,
            range.mom_y[i] * inv_norm,
            range.mom_z[i] * inv_norm,
        ];
        let parent_weight = range.weight[i];
        let pos = range.position(i);

        for (k, target) in [electrons, positrons].into_iter().enumerate() {
            let Some(buffer) = target else {
                continue;
            };
            let gamma_k = fractions[k] * photon_gamma;
            // A vanishing fraction can drive γ below one; the momentum
            // radicand is clamped at zero.
            let momentum_norm = (gamma_k * gamma_k - 1.0).max(0.0).sqrt();
            let mom = [
                momentum_norm * unit[0],
                momentum_norm * unit[1],
                momentum_norm * unit[2],
            ];
            let weight = parent_weight * self.inv_sampling[k];
            for _ in 0..self.sampling[k] {
                buffer.push(pos, mom, weight, charges[k], fractions[k] * chi);
            }
            stats.pairs_created += u64::from(self.sampling[k]);
        }

        stats.pair_energy += parent_weight * photon_gamma;
        stats.photons_decayed += 1;
        range.weight[i] = 0.0;
        range.tau[i] = TAU_SENTINEL;
    }
}
