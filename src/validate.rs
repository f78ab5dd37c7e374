//! Validation of command line values
//!
//! The `is_*` predicates answer yes or no, the `validate_*` functions turn a
//! no into a usage error that names the offending option.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref PERF_LABEL: Regex = Regex::new(r"^[\w][\w ./%:-]*$").unwrap();
    static ref FLOAT: Regex = Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap();
}

/// Something that can be used as a perfdata label
pub fn is_label(label: &str) -> bool {
    PERF_LABEL.is_match(label)
}

pub fn is_float(s: &str) -> bool {
    FLOAT.is_match(s)
}

pub fn validate_label<'a>(label: &'a str, name: &str) -> Result<&'a str> {
    if is_label(label) {
        Ok(label)
    } else {
        Err(Error::usage(format!(
            "invalid {} '{}', must start with a word character and contain no quotes or '='",
            name, label
        )))
    }
}

/// Parse a float, optionally bounded by `min`/`max` (inclusive)
pub fn validate_float(value: &str, name: &str, min: Option<f64>, max: Option<f64>) -> Result<f64> {
    let trimmed = value.trim();
    if !is_float(trimmed) {
        return Err(Error::usage(format!("invalid {} '{}', must be a number", name, value)));
    }
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| Error::usage(format!("invalid {} '{}', must be a number", name, value)))?;
    if let Some(min) = min {
        if parsed < min {
            return Err(Error::usage(format!("invalid {} '{}', may not be less than {}", name, value, min)));
        }
    }
    if let Some(max) = max {
        if parsed > max {
            return Err(Error::usage(format!("invalid {} '{}', may not be greater than {}", name, value, max)));
        }
    }
    Ok(parsed)
}
