//! Particle containers for the QED stage.
//!
//! The host PIC engine owns the real species; this crate mirrors the part of
//! their layout the QED processes touch: a structure-of-arrays particle
//! block, disjoint mutable range views for fork-join parallelism, read-only
//! views over the interpolated fields, and thread-local staging buffers for
//! freshly created macro-particles.

mod buffer;
mod compact;
mod error;
mod fields;
mod particles;

pub use buffer::ProductBuffer;
pub use compact::{remove_decayed, remove_decayed_all};
pub use error::SpeciesError;
pub use fields::FieldView;
pub use particles::{ParticleBlock, RangeMut};

pub type Result<T> = std::result::Result<T, SpeciesError>;

/// Sentinel stored in `tau` after an emission event; any value at or below
/// the `EPS_TAU` threshold means no countdown is in progress.
pub const TAU_SENTINEL: f64 = -1.0;
