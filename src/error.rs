//! Error types for trueno-freqs operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building frequency tables or charts.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file export, config loading).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// YAML configuration error.
    #[cfg(feature = "config")]
    #[error("Config parse error: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// Input is not a table (no columns, or a bare sequence).
    #[error("Invalid input shape: {0}")]
    InvalidShape(String),

    /// Columns of a table have different lengths.
    #[error("Column length mismatch: '{column}' has {len} rows, expected {expected}")]
    ColumnLengthMismatch {
        /// Offending column.
        column: String,
        /// Its length.
        len: usize,
        /// Length of the first column.
        expected: usize,
    },

    /// Two columns share a name.
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),

    /// A requested column does not exist.
    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),

    /// Grouping was requested without any key column.
    #[error("At least one grouping column is required")]
    NoGroupingKeys,

    /// A column cannot be used as a grouping key.
    #[error("Column '{0}' holds nested list values and cannot be grouped")]
    UnsupportedKey(String),

    /// The weight column holds non-numeric values.
    #[error("Weight column '{0}' must be numeric")]
    NonNumericWeight(String),

    /// Too many grouping dimensions for a chart.
    #[error(
        "Grouping by {requested} variables is too complex to visualize (max {max}); \
         request tabular output instead"
    )]
    TooManyDimensions {
        /// Number of grouping keys requested.
        requested: usize,
        /// Maximum number of keys a chart supports.
        max: usize,
    },

    /// Invalid option value.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Invalid chart dimensions.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}
