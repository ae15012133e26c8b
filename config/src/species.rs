//! Per-species QED settings, read from a namelist file or built in code.

use std::path::Path;

use config_file::FromConfigFile;
use serde::Deserialize;

use crate::{ConfigError, Result};
use crate::{DEFAULT_MAX_MC_ITERATIONS, DEFAULT_NORMALIZED_COMPTON_WAVELENGTH};
use crate::DEFAULT_NORM_SCHWINGER_FIELD;

/// Radiation-reaction model of a charged species.
///
/// Selected once at species construction; the hot loops never branch on a
/// trait object.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RadiationKind {
    /// No radiation reaction.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Deterministic Landau–Lifshitz damping with the Ridgers quantum
    /// correction, applied over the full timestep.
    #[serde(rename = "continuous-LL")]
    ContinuousLL,
    /// Monte-Carlo nonlinear inverse Compton scattering with macro-photon
    /// emission.
    #[serde(rename = "MC")]
    MonteCarlo,
}

/// Storage policy for macro-photons emitted by a radiating species.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PhotonSettings {
    /// Number of macro-photons created per discrete emission event. The
    /// parent weight is split evenly between them.
    pub sampling: u32,
    /// Emitted-photon `γ` below which no macro-photon is stored. The energy
    /// is still accounted in the radiated-energy scalar.
    pub gamma_threshold: f64,
}

impl Default for PhotonSettings {
    fn default() -> Self {
        Self {
            sampling: 1,
            gamma_threshold: 2.0,
        }
    }
}

/// The QED settings of one species, fixed at construction.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpeciesQedConfig {
    /// Radiation-reaction model tag.
    pub radiation_model: RadiationKind,
    /// Whether photons of this species decay through the multiphoton
    /// Breit–Wheeler process.
    pub multiphoton_bw: bool,
    /// Species mass in electron masses. Irrelevant for photons.
    pub mass: f64,
    /// Macro-photon storage policy.
    pub photon: PhotonSettings,
    /// Number of macro-electrons and macro-positrons created per pair event.
    pub pair_creation_sampling: [u32; 2],
    /// Below this χ a lepton radiates nothing at all.
    pub chi_threshold_continuous: f64,
    /// Above this χ a lepton samples discrete emission events; between the
    /// two thresholds it is damped continuously.
    pub chi_threshold_discontinuous: f64,
    /// Below this χ a photon cannot decay into a pair.
    pub chi_threshold_photon: f64,
    /// Hard cap on Monte-Carlo sub-steps per particle per timestep.
    pub max_monte_carlo_iterations: u32,
    /// Outer timestep in normalized units.
    pub dt: f64,
    /// Schwinger field over the reference field.
    pub norm_schwinger_field: f64,
    /// Reduced Compton wavelength over the reference length.
    pub normalized_compton_wavelength: f64,
}

impl Default for SpeciesQedConfig {
    fn default() -> Self {
        Self {
            radiation_model: RadiationKind::None,
            multiphoton_bw: false,
            mass: 1.0,
            photon: PhotonSettings::default(),
            pair_creation_sampling: [1, 1],
            chi_threshold_continuous: 1e-3,
            chi_threshold_discontinuous: 1e-2,
            chi_threshold_photon: 1e-2,
            max_monte_carlo_iterations: DEFAULT_MAX_MC_ITERATIONS,
            dt: 0.1,
            norm_schwinger_field: DEFAULT_NORM_SCHWINGER_FIELD,
            normalized_compton_wavelength: DEFAULT_NORMALIZED_COMPTON_WAVELENGTH,
        }
    }
}

impl SpeciesQedConfig {
    /// Reads a species configuration from a TOML namelist.
    pub fn from_namelist(path: &Path) -> Result<Self> {
        let config = Self::from_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings for consistency. Fatal at species construction.
    pub fn validate(&self) -> Result<()> {
        if self.photon.sampling < 1 {
            return Err(ConfigError::InvalidSampling {
                name: "radiation_photon_sampling",
                value: self.photon.sampling,
            });
        }
        for (k, name) in ["pair_creation_sampling[0]", "pair_creation_sampling[1]"]
            .into_iter()
            .enumerate()
        {
            if self.pair_creation_sampling[k] < 1 {
                return Err(ConfigError::InvalidSampling {
                    name,
                    value: self.pair_creation_sampling[k],
                });
            }
        }
        if self.chi_threshold_discontinuous <= self.chi_threshold_continuous {
            return Err(ConfigError::ThresholdOrder {
                continuous: self.chi_threshold_continuous,
                discontinuous: self.chi_threshold_discontinuous,
            });
        }
        self.check_positive()?;
        if self.max_monte_carlo_iterations < 1 {
            return Err(ConfigError::InvalidSampling {
                name: "max_monte_carlo_iterations",
                value: self.max_monte_carlo_iterations,
            });
        }
        Ok(())
    }

    fn check_positive(&self) -> Result<()> {
        let positive = [
            ("chi_threshold_continuous", self.chi_threshold_continuous),
            ("chi_threshold_photon", self.chi_threshold_photon),
            ("dt", self.dt),
            ("mass", self.mass),
            ("norm_schwinger_field", self.norm_schwinger_field),
            (
                "normalized_compton_wavelength",
                self.normalized_compton_wavelength,
            ),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(self.photon.gamma_threshold >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "radiation_photon_gamma_threshold",
                value: self.photon.gamma_threshold,
            });
        }
        Ok(())
    }

    /// `1 / E_Schwinger` in normalized units, the χ scaling factor.
    pub fn inv_norm_schwinger_field(&self) -> f64 {
        1.0 / self.norm_schwinger_field
    }

    /// `1 / m²`, entering the lepton χ through `|q|/m²`.
    pub fn one_over_mass_square(&self) -> f64 {
        1.0 / (self.mass * self.mass)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        SpeciesQedConfig::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_sampling() {
        let mut config = SpeciesQedConfig::default();
        config.photon.sampling = 0;
        config.validate().unwrap_err();

        let mut config = SpeciesQedConfig::default();
        config.pair_creation_sampling = [1, 0];
        config.validate().unwrap_err();
    }

    #[test]
    fn test_threshold_order() {
        let mut config = SpeciesQedConfig::default();
        config.chi_threshold_continuous = 0.5;
        config.chi_threshold_discontinuous = 0.1;
        config.validate().unwrap_err();
    }

    #[test]
    fn test_negative_timestep() {
        let mut config = SpeciesQedConfig::default();
        config.dt = -1.0;
        config.validate().unwrap_err();
    }

    #[test]
    fn test_namelist_parsing() {
        let namelist = r#"
            radiation_model = "MC"
            multiphoton_bw = true
            dt = 0.5
            pair_creation_sampling = [2, 3]

            [photon]
            sampling = 4
            gamma_threshold = 5.0
        "#;
        let path = std::env::temp_dir().join("species_qed_namelist_test.toml");
        std::fs::write(&path, namelist).unwrap();

        let config = SpeciesQedConfig::from_namelist(&path).unwrap();
        assert_eq!(config.radiation_model, RadiationKind::MonteCarlo);
        assert!(config.multiphoton_bw);
        assert_eq!(config.dt, 0.5);
        assert_eq!(config.pair_creation_sampling, [2, 3]);
        assert_eq!(config.photon.sampling, 4);
        assert_eq!(config.photon.gamma_threshold, 5.0);
        // Unset keys fall back to the defaults.
        assert_eq!(config.mass, 1.0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_namelist_is_fatal() {
        let namelist = r#"
            radiation_model = "MC"

            [photon]
            sampling = 0
            gamma_threshold = 2.0
        "#;
        let path = std::env::temp_dir().join("species_qed_bad_namelist_test.toml");
        std::fs::write(&path, namelist).unwrap();
        SpeciesQedConfig::from_namelist(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
    }
}
