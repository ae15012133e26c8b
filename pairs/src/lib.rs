//! Multiphoton Breit-Wheeler pair creation.
//!
//! Photons above the χ threshold run the same optical-depth countdown as
//! the radiating leptons; when the countdown fires, the photon decays into
//! an electron-positron pair staged in thread-local buffers and is marked
//! for removal by zeroing its weight.

mod breit_wheeler;
mod chi;

pub use breit_wheeler::MultiphotonBreitWheeler;
pub use chi::{photon_chi, refresh_photon_chi};

/// Per-call outcome of a pair-creation pass over one photon range.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairStats {
    /// Energy converted into pairs, `Σ weight · γ_γ` over decayed photons.
    pub pair_energy: f64,
    /// Macro-leptons appended to the product buffers.
    pub pairs_created: u64,
    /// Photons whose weight was zeroed this call.
    pub photons_decayed: u64,
    /// Photons whose sub-stepping was truncated by the iteration cap.
    pub cap_hits: u64,
}

impl PairStats {
    /// Accumulates the outcome of another range into this one.
    pub fn merge(&mut self, other: &Self) {
        self.pair_energy += other.pair_energy;
        self.pairs_created += other.pairs_created;
        self.photons_decayed += other.photons_decayed;
        self.cap_hits += other.cap_hits;
    }
}
