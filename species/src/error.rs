#[derive(thiserror::Error, Debug)]
pub enum SpeciesError {
    /// Position dimensionality must be 1, 2 or 3.
    #[error("invalid position dimensionality {0}")]
    InvalidDimension(usize),

    /// SoA component arrays must all have the same length.
    #[error("component length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// A buffer can only be flushed into a block of the same dimensionality.
    #[error("dimensionality mismatch: block is {block}-dimensional, buffer is {buffer}-dimensional")]
    DimensionMismatch { block: usize, buffer: usize },

    /// Interpolated-field arrays come as three contiguous components.
    #[error("field array length {len} is not a multiple of 3")]
    FieldLayout { len: usize },

    /// Bin bounds must tile the block contiguously.
    #[error("bin bounds do not tile the particle block")]
    InvalidBins,
}
