//! Lorentz-invariant quantum parameter of a photon.

use species::{FieldView, RangeMut};

/// Computes χ_γ for a photon of momentum `k` and `γ_γ = |k|`:
///
/// `χ_γ = 1/E_s · √|(E·k)² − (γ_γ E + k×B)²|`
///
/// As for leptons, cancellation in the radicand is clamped through the
/// absolute value.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn photon_chi(
    inv_norm_schwinger: f64,
    kx: f64,
    ky: f64,
    kz: f64,
    photon_gamma: f64,
    ex: f64,
    ey: f64,
    ez: f64,
    bx: f64,
    by: f64,
    bz: f64,
) -> f64 {
    let e_dot_k = ex * kx + ey * ky + ez * kz;
    let fx = photon_gamma * ex - by * kz + bz * ky;
    let fy = photon_gamma * ey - bz * kx + bx * kz;
    let fz = photon_gamma * ez - bx * ky + by * kx;

    inv_norm_schwinger * (e_dot_k * e_dot_k - fx * fx - fy * fy - fz * fz).abs().sqrt()
}

/// Refreshes the stored diagnostic `chi[i]` of a photon range.
pub fn refresh_photon_chi(
    range: &mut RangeMut<'_>,
    fields: &FieldView<'_>,
    inv_norm_schwinger: f64,
) {
    for i in 0..range.len() {
        let ipart = range.start + i;
        let photon_gamma = range.momentum_norm(i);
        range.chi[i] = photon_chi(
            inv_norm_schwinger,
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
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_photon_chi_pure_magnetic() {
        // k = (k, 0, 0), B = (0, 0, b): E·k = 0 and |k×B| = k·b.
        let k = 100.0;
        let b = 0.5;
        let chi = photon_chi(1.0, k, 0.0, 0.0, k, 0.0, 0.0, 0.0, 0.0, 0.0, b);
        assert!((chi - k * b).abs() < 1e-12);
    }

    #[test]
    fn test_photon_chi_parallel_field_cancels() {
        // E parallel to k: a photon co-propagating with the field has a
        // vanishing invariant up to rounding.
        let k = 1e6;
        let chi = photon_chi(1.0, k, 0.0, 0.0, k, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(chi.is_finite());
        assert!(chi >= 0.0);
    }
}
