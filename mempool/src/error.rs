//! Error types for reading and writing transaction pools.

use thiserror::Error;

/// A line that could not be turned into a [`Transaction`](crate::Transaction).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A whitespace-separated token is not exactly one `Key=Value` pair.
    #[error("Invalid token [{0}]")]
    InvalidToken(String),

    /// A required key is absent from the line.
    #[error("Field {field} not found in line [{line}]")]
    FieldNotFound {
        /// Key that was looked up.
        field: &'static str,
        /// The full offending line.
        line: String,
    },

    /// A numeric field holds something that does not parse.
    #[error("Invalid value for field {field} [{value}]")]
    InvalidValue {
        /// Key whose value was rejected.
        field: &'static str,
        /// The raw value text.
        value: String,
    },
}

/// Everything that can go wrong between reading input and writing output.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input record.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reading or writing the underlying stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

/// Result alias defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
