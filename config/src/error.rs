#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A sampling factor below 1 would create zero-weight products.
    #[error("{name} must be at least 1 (got {value})")]
    InvalidSampling { name: &'static str, value: u32 },

    /// The regime boundaries are inverted or degenerate.
    #[error(
        "chi_threshold_discontinuous ({discontinuous}) must be greater than \
         chi_threshold_continuous ({continuous})"
    )]
    ThresholdOrder { continuous: f64, discontinuous: f64 },

    /// Thresholds, timestep, mass and field normalizations must be positive.
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    /// A Monte-Carlo model was requested for a species but the matching
    /// cross-section tables were never loaded.
    #[error("species uses {model} but no {tables} tables are loaded")]
    MissingTables {
        model: &'static str,
        tables: &'static str,
    },

    /// Error from the configuration file reader.
    #[error("configuration file error: {0}")]
    FileError(#[from] config_file::ConfigFileError),
}
