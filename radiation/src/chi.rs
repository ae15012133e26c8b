//! Lorentz-invariant quantum parameter of a charged particle.

use species::{FieldView, RangeMut};

/// Computes χ for a lepton from the local field sample:
///
/// `χ = |q|/m² · 1/E_s · √|(E·p)² − (γE + p×B)²|`
///
/// The radicand is a difference of squared components and can come out
/// negative through floating-point cancellation; the absolute value clamps
/// it before the square root.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn particle_chi(
    charge_over_mass_square: f64,
    inv_norm_schwinger: f64,
    px: f64,
    py: f64,
    pz: f64,
    gamma: f64,
    ex: f64,
    ey: f64,
    ez: f64,
    bx: f64,
    by: f64,
    bz: f64,
) -> f64 {
    let e_dot_p = ex * px + ey * py + ez * pz;
    let fx = gamma * ex - by * pz + bz * py;
    let fy = gamma * ey - bz * px + bx * pz;
    let fz = gamma * ez - bx * py + by * px;

    charge_over_mass_square.abs()
        * inv_norm_schwinger
        * (e_dot_p * e_dot_p - fx * fx - fy * fy - fz * fz).abs().sqrt()
}

/// Refreshes the stored diagnostic `chi[i]` of a lepton range from the
/// final momenta.
///
/// Kept separate from the Monte-Carlo loop, which works on a local χ; the
/// stored value is only ever a diagnostic.
pub fn refresh_particle_chi(
    range: &mut RangeMut<'_>,
    fields: &FieldView<'_>,
    one_over_mass_square: f64,
    inv_norm_schwinger: f64,
) {
    for i in 0..range.len() {
        let ipart = range.start + i;
        let gamma = range.lorentz_factor(i);
        range.chi[i] = particle_chi(
            f64::from(range.charge[i]) * one_over_mass_square,
            inv_norm_schwinger,
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
    }
}
