#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Species-level settings error, fatal at construction.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Table artifact could not be loaded or validated.
    #[error("table error: {0}")]
    Table(#[from] tables::TableError),

    /// Particle container misuse.
    #[error("species error: {0}")]
    Species(#[from] species::SpeciesError),
}
