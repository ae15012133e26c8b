use config::{ConfigError, RadiationKind, SpeciesQedConfig};
use rand::Rng;
use species::{FieldView, ProductBuffer, RangeMut};
use tables::RadiationTables;

use crate::{ContinuousRadiation, MonteCarloRadiation, RadiationStats};

/// The radiation model of one species, selected once at construction.
///
/// A tagged variant instead of a trait object: the hook fires once per
/// particle range per timestep and the branch is hoisted out of the
/// vectorizable loops.
#[derive(Debug, Clone)]
pub enum RadiationModel {
    None,
    Continuous(ContinuousRadiation),
    MonteCarlo(MonteCarloRadiation),
}

impl RadiationModel {
    /// Builds the model from the species settings.
    ///
    /// Fails when the settings are inconsistent or when a radiating model
    /// is requested without loaded cross-section tables.
    pub fn build(config: &SpeciesQedConfig, tables_loaded: bool) -> config::Result<Self> {
        config.validate()?;
        let model = match config.radiation_model {
            RadiationKind::None => Self::None,
            RadiationKind::ContinuousLL => Self::Continuous(ContinuousRadiation::new(config)),
            RadiationKind::MonteCarlo => Self::MonteCarlo(MonteCarloRadiation::new(config)),
        };
        if !matches!(model, Self::None) && !tables_loaded {
            return Err(ConfigError::MissingTables {
                model: match config.radiation_model {
                    RadiationKind::ContinuousLL => "continuous-LL",
                    _ => "MC",
                },
                tables: "radiation",
            });
        }
        Ok(model)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Runs the selected model over one particle range.
    pub fn apply<R: Rng>(
        &self,
        range: &mut RangeMut<'_>,
        fields: &FieldView<'_>,
        tables: &RadiationTables,
        photons: Option<&mut ProductBuffer>,
        rng: &mut R,
    ) -> RadiationStats {
        match self {
            Self::None => RadiationStats::default(),
            Self::Continuous(model) => model.apply(range, fields, tables),
            Self::MonteCarlo(model) => model.apply(range, fields, tables, photons, rng),
        }
    }
}
