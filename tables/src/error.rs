#[derive(thiserror::Error, Debug)]
pub enum TableError {
    /// The χ axis bounds are degenerate or non-positive.
    #[error("invalid chi axis: [{chi_min}, {chi_max}] with {size} points")]
    InvalidAxis {
        chi_min: f64,
        chi_max: f64,
        size: usize,
    },

    /// A table does not match the shape implied by its axes.
    #[error("table shape mismatch: expected {expected} entries, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// Rates and integrated spectra must be strictly positive to allow
    /// log-log interpolation.
    #[error("non-positive table entry {value} at index {index}")]
    NonPositiveEntry { index: usize, value: f64 },

    /// An inverse-CDF row must be non-decreasing and stay within (0, 1].
    #[error("inverse-CDF row {row} is not a valid cumulative table")]
    InvalidCdfRow { row: usize },

    /// A named array is missing from the table artifact.
    #[error("array `{0}` missing from table file")]
    MissingArray(String),

    #[error("table file read error: {0}")]
    Npz(#[from] ndarray_npy::ReadNpzError),

    #[error("table file write error: {0}")]
    NpzWrite(#[from] ndarray_npy::WriteNpzError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
