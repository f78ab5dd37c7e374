//! Performance data
//!
//! Nagios lets a check append machine readable metrics after a `|` on its
//! output line:
//!
//! ```plain
//! OK: load is 0.5 | 'load1'=0.5;5;10;0;
//! ```
//!
//! each one formatted as `'<label>'=<value><unit>;<warn>;<crit>;<min>;<max>`.

use std::fmt;

/// Format a number the way perfdata wants it: no trailing `.0`, blank if unset
pub fn fmt_number(n: Option<f64>) -> String {
    match n {
        Some(n) => format!("{}", n),
        None => String::new(),
    }
}

/// One metric in a check's perfdata
#[derive(Clone, Debug, PartialEq)]
pub struct PerfData {
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub warning: Option<f64>,
    pub critical: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PerfData {
    pub fn new<S: Into<String>>(label: S, value: f64) -> PerfData {
        PerfData {
            label: label.into(),
            value,
            unit: String::new(),
            warning: None,
            critical: None,
            min: None,
            max: None,
        }
    }

    pub fn unit<S: Into<String>>(mut self, unit: S) -> PerfData {
        self.unit = unit.into();
        self
    }

    pub fn thresholds(mut self, warning: Option<f64>, critical: Option<f64>) -> PerfData {
        self.warning = warning;
        self.critical = critical;
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> PerfData {
        self.min = min;
        self.max = max;
        self
    }
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = format!(
            "'{}'={}{};{};{};{};{}",
            self.label.replace('\'', "''"),
            fmt_number(Some(self.value)),
            self.unit,
            fmt_number(self.warning),
            fmt_number(self.critical),
            fmt_number(self.min),
            fmt_number(self.max)
        );
        let trimmed = out.trim_end_matches(';').len();
        out.truncate(trimmed);
        write!(f, "{}", out)
    }
}
