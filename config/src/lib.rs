//! Compile-time constants and per-species settings for the QED stage.

mod error;
mod species;

pub use error::ConfigError;
pub use species::{PhotonSettings, RadiationKind, SpeciesQedConfig};

pub type Result<T> = std::result::Result<T, ConfigError>;

// ==================== Monte-Carlo sub-stepping

/// Optical depths below this value count as "no emission in progress". A fresh
/// countdown is drawn the next time the particle enters the discontinuous regime.
pub const EPS_TAU: f64 = 1e-100;

/// Production yields below this floor finish the timestep without emission
/// instead of dividing by a near-zero rate.
pub const YIELD_FLOOR: f64 = 1e-100;

/// Default hard cap on Monte-Carlo sub-steps per particle per timestep.
pub const DEFAULT_MAX_MC_ITERATIONS: u32 = 100;

// ==================== Physical constants

/// The fine structure constant.
pub const FINE_STRUCTURE: f64 = 7.2973525693e-3;

/// Reduced Compton wavelength over the reference length `c/ω_ref`, for a
/// 0.8 µm reference wavelength. Overridden per run through
/// [`SpeciesQedConfig::normalized_compton_wavelength`].
pub const DEFAULT_NORMALIZED_COMPTON_WAVELENGTH: f64 = 3.0327e-6;

/// Schwinger field over the reference field `m_e c ω_ref / e`, for a 0.8 µm
/// reference wavelength.
pub const DEFAULT_NORM_SCHWINGER_FIELD: f64 = 4.121e5;

// ==================== Misc

/// Default number of particles handled per worker range.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Starting capacity of the product staging buffers.
pub const PRODUCT_BUFFER_INIT_CAPACITY: usize = 256;

/// Progress bar style for the driver binaries.
pub const PBAR_STYLE: &str =
    "{spinner} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}";
