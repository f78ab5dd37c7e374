//! Errors shared by the engine, the check drivers and the binaries
//!
//! There are two classes of failure that must never be confused:
//!
//! * `Usage` errors come from the person running the check, e.g. a malformed
//!   `--warning` value. They are reported and the check exits UNKNOWN.
//! * `Coding` errors mean the check itself is broken, e.g. it asked for a
//!   threshold it never declared. They are logged loudly and also exit
//!   UNKNOWN, but they point at a bug rather than at the command line.

use std::io;
use std::result::Result as StdResult;

use crate::threshold::ThresholdError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad input from the command line
    #[error("{0}")]
    Usage(String),

    /// The check violated the engine's contract
    #[error("coding error: {0}")]
    Coding(String),

    /// A threshold that failed to parse outside of option validation
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The check ran but could not produce a result
    #[error("{0}")]
    Check(String),
}

impl Error {
    pub fn usage<S: Into<String>>(msg: S) -> Error {
        Error::Usage(msg.into())
    }

    pub fn coding<S: Into<String>>(msg: S) -> Error {
        Error::Coding(msg.into())
    }

    pub fn is_usage(&self) -> bool {
        match *self {
            Error::Usage(_) | Error::Threshold(_) => true,
            _ => false,
        }
    }

    pub fn is_coding(&self) -> bool {
        matches!(*self, Error::Coding(_))
    }
}

/// All the results in this crate are results with `Error`s
pub type Result<T> = StdResult<T, Error>;
