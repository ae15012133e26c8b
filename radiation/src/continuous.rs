use config::SpeciesQedConfig;
use species::{FieldView, RangeMut};
use tables::RadiationTables;

use crate::chi::{particle_chi, refresh_particle_chi};
use crate::RadiationStats;

/// Deterministic radiation reaction: Landau-Lifshitz damping with the
/// Ridgers quantum correction, applied over the full timestep.
///
/// Creates no macro-photons; the whole radiated energy goes into the
/// scalar accumulator.
#[derive(Debug, Clone)]
pub struct ContinuousRadiation {
    dt: f64,
    one_over_mass_square: f64,
    inv_norm_schwinger: f64,
}

impl ContinuousRadiation {
    pub fn new(config: &SpeciesQedConfig) -> Self {
        Self {
            dt: config.dt,
            one_over_mass_square: config.one_over_mass_square(),
            inv_norm_schwinger: config.inv_norm_schwinger_field(),
        }
    }

    /// Damps every particle of the range in place and returns the energy
    /// bookkeeping for the call.
    pub fn apply(
        &self,
        range: &mut RangeMut<'_>,
        fields: &FieldView<'_>,
        tables: &RadiationTables,
    ) -> RadiationStats {
        let mut stats = RadiationStats::default();
        let chi_threshold = tables.minimum_chi_continuous();

        for i in 0..range.len() {
            let ipart = range.start + i;
            let gamma = range.lorentz_factor(i);
            if gamma == 1.0 {
                continue;
            }
            let chi = particle_chi(
                f64::from(range.charge[i]) * self.one_over_mass_square,
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
            if chi <= chi_threshold {
                continue;
            }

            let energy = tables.radiated_energy_corrected(chi, self.dt);
            let damping = energy * gamma / (gamma * gamma - 1.0);
            range.mom_x[i] -= damping * range.mom_x[i];
            range.mom_y[i] -= damping * range.mom_y[i];
            range.mom_z[i] -= damping * range.mom_z[i];

            stats.radiated_energy += range.weight[i] * (gamma - range.lorentz_factor(i));
        }

        refresh_particle_chi(range, fields, self.one_over_mass_square, self.inv_norm_schwinger);
        stats
    }
}
