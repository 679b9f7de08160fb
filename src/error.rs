use std::error::Error as StdError;
use std::fmt;

/// Errors raised by the bootstrap machinery.
///
/// All of these indicate a programmer or input error, not a transient
/// condition: nothing here is retried, and no partial result is returned.
#[derive(Debug)]
pub enum Error {
    /// Input carried an unsupported number of axes (1 or 2 expected).
    Dimension { ndim: usize },
    /// Arrays that must agree on a length did not.
    ShapeMismatch { expected: usize, found: usize },
    /// Unknown resampling method tag.
    UnsupportedMethod(String),
    Io(std::io::Error),
    Csv(csv::Error),
    /// A file that should hold data contained no records.
    EmptyFile,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Dimension { ndim } => {
                write!(f, "expected 1 or 2 axes, got {}", ndim)
            }
            Error::ShapeMismatch { expected, found } => {
                write!(f, "length mismatch: expected {}, found {}", expected, found)
            }
            Error::UnsupportedMethod(name) => {
                write!(f, "unsupported resampling method: {:?}", name)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Csv(e) => write!(f, "CSV parsing error: {}", e),
            Error::EmptyFile => write!(f, "file contains no data records"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}
