//! Error type shared by the reader and the parser.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while opening or reading a delimited file.
///
/// Running out of input is never an error: readers report it as `Ok(None)`
/// or `Ok(false)`.
#[derive(Debug, Error)]
pub enum TableError {
    /// The path given to the parser does not name an existing file.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// The stream could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The tokenizer rejected the input.
    #[error("CSV error: {0}")]
    Csv(csv::Error),
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            TableError::Io(err.into())
        } else {
            TableError::Csv(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
