use std::io;

use thiserror::Error;

/// Errors produced while building, reading or writing Ising models.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The first meaningful line of a UAI08 file is not the `ISING` marker.
    #[error("line {line}: expected `ISING` header, found {found:?}")]
    MalformedHeader { line: usize, found: String },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A function-table entry declares a different arity than its scope.
    #[error("line {line}: expected function table of size {expected}, found {found:?}")]
    ArityMismatch { line: usize, expected: usize, found: String },

    #[error("invalid model: {0}")]
    InvalidModel(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidModel(message.into())
    }
}
