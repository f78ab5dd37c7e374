//! nagcheck: thresholds and status tracking for nagios-compatible checks
//!
//! Monitoring systems like Nagios, Icinga and Sensu run a check script and
//! look at two things: the first line it prints and its exit code. This crate
//! takes care of both for the common case of "compare a number to a warning
//! and a critical threshold":
//!
//! * [`Threshold`](threshold/struct.Threshold.html) parses the standard
//!   `[@][start:]end` threshold syntax and decides whether a result breaches
//!   it.
//! * [`StatusEngine`](engine/struct.StatusEngine.html) holds the status of a
//!   check run, only ever lets it get worse, keeps the named thresholds, and
//!   builds the output line.
//! * The [`plugin`](plugin/index.html) module has small traits for the kinds
//!   of checks people actually write, and drivers that wire them into a
//!   `StatusEngine`.
//!
//! ```rust
//! use nagcheck::{StatusEngine, ThresholdOptions, Status};
//!
//! let mut engine = StatusEngine::new();
//! engine.add_thresholds("", Some("3"), Some("5"));
//! engine.validate_thresholds("", None, None, &ThresholdOptions::new()).unwrap();
//! engine.ok();
//! engine.check_thresholds(4.0, "").unwrap();
//! assert_eq!(engine.status(), Status::Warning);
//! ```
//!
//! The check scripts shipped with this crate are documented in
//! [`scripts`](scripts/index.html).

use std::cmp::Ordering;
use std::fmt;
use std::process;
use std::str::FromStr;

use serde::Deserialize;

pub mod cli;
pub mod engine;
pub mod error;
pub mod logging;
pub mod perfdata;
pub mod plugin;
pub mod scripts;
pub mod threshold;
pub mod validate;

pub use crate::engine::StatusEngine;
pub use crate::error::{Error, Result};
pub use crate::threshold::{Boundary, Simple, Threshold, ThresholdError, ThresholdOptions};

/// All possible exit statuses of a check
///
/// Statuses are ordered by how hard they are to overwrite, not by their exit
/// code: `Critical > Warning > Unknown > Ok`. `max` of two statuses is the
/// one a check should report.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

/// Settability precedence, most severe first
pub const PRECEDENCE: [Status; 4] = [
    Status::Critical,
    Status::Warning,
    Status::Unknown,
    Status::Ok,
];

impl Status {
    /// Exit the process with this status' exit code
    pub fn exit(self) -> ! {
        process::exit(self.code())
    }

    /// The exit code monitoring systems expect for this status
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// Position in `PRECEDENCE`, higher wins
    pub fn severity(self) -> usize {
        PRECEDENCE.len()
            - PRECEDENCE
                .iter()
                .position(|&s| s == self)
                .unwrap_or(PRECEDENCE.len())
    }

    /// The strings that `from_str` accepts, for use as clap possible values
    pub fn str_values() -> [&'static str; 4] {
        ["ok", "warning", "critical", "unknown"]
    }
}

impl PartialOrd for Status {
    fn partial_cmp(&self, other: &Status) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Status {
    fn cmp(&self, other: &Status) -> Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Status, String> {
        match s.trim().to_ascii_lowercase().as_ref() {
            "ok" => Ok(Status::Ok),
            "warning" | "warn" => Ok(Status::Warning),
            "critical" | "crit" => Ok(Status::Critical),
            "unknown" => Ok(Status::Unknown),
            _ => Err(format!(
                "Unexpected exit status '{}', expected one of: {}",
                s,
                Status::str_values().join(", ")
            )),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{}", msg)
    }
}
