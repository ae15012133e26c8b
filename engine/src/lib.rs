//! The per-patch QED stage.
//!
//! Ties the Monte-Carlo engines together the way the host PIC loop drives
//! them: disjoint particle ranges are processed fork-join style with one
//! random stream and one set of staging buffers per worker, the scalar
//! accumulators are reduced at the end of the stage, product buffers are
//! flushed into the receiving species and decayed photons are compacted
//! out.

mod error;
mod stage;

pub use error::EngineError;
pub use stage::{QedStage, StageReport};

pub type Result<T> = std::result::Result<T, EngineError>;

pub use pairs::PairStats;
pub use radiation::RadiationStats;
pub use species::{FieldView, ParticleBlock, ProductBuffer};
