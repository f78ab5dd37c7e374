//! The status of a single check run
//!
//! A `StatusEngine` starts out UNKNOWN, is told `ok()` once the check gets
//! going, and from then on only ever gets worse as thresholds are breached.
//! It also owns the named thresholds of the check, the raw option values they
//! are built from, and the pieces of the final output line.

use std::cmp::max;
use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use lazy_static::lazy_static;
use log::{debug, info};

use crate::error::{Error, Result};
use crate::perfdata::{fmt_number, PerfData};
use crate::threshold::{Boundary, Threshold, ThresholdOptions};
use crate::Status;

lazy_static! {
    static ref ALWAYS_PASS: Threshold = Threshold::always_pass();
}

/// The status a check moves to when `requested` is asked for in `current`
///
/// Asking for OK always resets, that is how a check says it has started.
/// Anything else only takes effect if it is at least as severe as the current
/// status, see `PRECEDENCE`.
pub fn transition(current: Status, requested: Status) -> Status {
    match requested {
        Status::Ok => Status::Ok,
        _ => max(current, requested),
    }
}

/// `warning`/`critical`, or `<name>_warning`/`<name>_critical`
pub fn threshold_name(name: &str, level: &str) -> String {
    if name.is_empty() {
        level.to_owned()
    } else {
        format!("{}_{}", name, level)
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::coding("threshold name must be a non-empty string"));
    }
    Ok(())
}

#[derive(Debug)]
pub struct StatusEngine {
    status: Status,
    thresholds: HashMap<String, Threshold>,
    options: BTreeMap<String, Option<String>>,
    message: String,
    perfdata: Vec<PerfData>,
}

impl Default for StatusEngine {
    fn default() -> StatusEngine {
        StatusEngine {
            status: Status::Unknown,
            thresholds: HashMap::new(),
            options: BTreeMap::new(),
            message: String::new(),
            perfdata: Vec::new(),
        }
    }
}

impl StatusEngine {
    pub fn new() -> StatusEngine {
        StatusEngine::default()
    }

    // Status

    pub fn status(&self) -> Status {
        self.status
    }

    /// Move towards `requested`, following `transition`
    pub fn escalate(&mut self, requested: Status) {
        let next = transition(self.status, requested);
        if next != self.status {
            debug!("status {} -> {}", self.status, next);
        } else if requested != self.status {
            debug!("ignoring {}, status is already {}", requested, self.status);
        }
        self.status = next;
    }

    pub fn ok(&mut self) {
        self.escalate(Status::Ok)
    }

    pub fn warning(&mut self) {
        self.escalate(Status::Warning)
    }

    pub fn critical(&mut self) {
        self.escalate(Status::Critical)
    }

    pub fn unknown(&mut self) {
        self.escalate(Status::Unknown)
    }

    /// Set the status from its name, following the same rules as `ok()`,
    /// `warning()` etc.
    pub fn set_status(&mut self, status: &str) -> Result<()> {
        let status = status.parse::<Status>().map_err(Error::Coding)?;
        self.escalate(status);
        Ok(())
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    pub fn is_warning(&self) -> bool {
        self.status == Status::Warning
    }

    pub fn is_critical(&self) -> bool {
        self.status == Status::Critical
    }

    pub fn is_unknown(&self) -> bool {
        self.status == Status::Unknown
    }

    // Thresholds

    pub fn set_threshold(&mut self, name: &str, threshold: Threshold) -> Result<()> {
        check_name(name)?;
        self.thresholds.insert(name.to_owned(), threshold);
        Ok(())
    }

    /// Look up a threshold
    ///
    /// Asking for a threshold that was never set is a bug in the check unless
    /// `optional` is true, in which case the result never breaches.
    pub fn get_threshold(&self, name: &str, optional: bool) -> Result<&Threshold> {
        check_name(name)?;
        match self.thresholds.get(name) {
            Some(threshold) => Ok(threshold),
            None if optional => Ok(&*ALWAYS_PASS),
            None => Err(Error::coding(format!(
                "threshold '{}' was never set",
                name
            ))),
        }
    }

    /// Declare the `warning`/`critical` options of a check, with defaults
    ///
    /// With a `name` the options are `<name>_warning` and `<name>_critical`.
    /// The values are only recorded here, `validate_thresholds` turns them
    /// into `Threshold`s.
    pub fn add_thresholds(
        &mut self,
        name: &str,
        default_warning: Option<&str>,
        default_critical: Option<&str>,
    ) {
        for &(level, default) in &[("warning", default_warning), ("critical", default_critical)] {
            self.options
                .insert(threshold_name(name, level), default.map(str::to_owned));
        }
    }

    /// Record the value the command line gave for an option
    pub fn set_option<S: Into<String>>(&mut self, name: &str, value: S) {
        self.options.insert(name.to_owned(), Some(value.into()));
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(|v| v.as_deref())
    }

    /// The declared options, in name order
    pub fn options(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.options
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Build the threshold `name` and store it
    ///
    /// The threshold text is `threshold` if given, otherwise the recorded option value
    /// for `name`. A bad spec is a usage error.
    pub fn validate_threshold(
        &mut self,
        name: &str,
        threshold: Option<&str>,
        opts: &ThresholdOptions,
    ) -> Result<()> {
        check_name(name)?;
        let raw = match threshold {
            Some(spec) => Some(spec.to_owned()),
            None => self.option(name).map(str::to_owned),
        };
        let mut opts = opts.clone();
        if opts.name.is_empty() {
            opts.name = name.replace('_', " ");
        }
        let parsed = Threshold::parse(raw.as_deref().unwrap_or(""), &opts)
            .map_err(|e| Error::Usage(e.to_string()))?;
        self.thresholds.insert(name.to_owned(), parsed);
        Ok(())
    }

    pub fn validate_thresholds(
        &mut self,
        name: &str,
        warning: Option<&str>,
        critical: Option<&str>,
        opts: &ThresholdOptions,
    ) -> Result<()> {
        self.validate_threshold(&threshold_name(name, "warning"), warning, opts)?;
        self.validate_threshold(&threshold_name(name, "critical"), critical, opts)
    }

    /// Check `result` against threshold `name`, escalating on a breach
    ///
    /// Returns a description of the breach, or an empty string. Thresholds
    /// that were never set never breach.
    pub fn check_threshold(&mut self, name: &str, result: f64) -> Result<String> {
        let breach = self.get_threshold(name, true)?.breach(result);
        match breach {
            Some(detail) => {
                if name.contains("warning") {
                    self.warning();
                } else {
                    self.critical();
                }
                let msg = format!("({} threshold breached: {})", name.replace('_', " "), detail);
                info!("{}", msg);
                Ok(msg)
            }
            None => Ok(String::new()),
        }
    }

    /// Check both thresholds of `name`, adding the most severe breach to the
    /// message
    pub fn check_thresholds(&mut self, result: f64, name: &str) -> Result<()> {
        let critical = self.check_threshold(&threshold_name(name, "critical"), result)?;
        let warning = self.check_threshold(&threshold_name(name, "warning"), result)?;
        let msg = if critical.is_empty() { warning } else { critical };
        if !msg.is_empty() {
            self.add_message(&msg);
        }
        Ok(())
    }

    /// The `;<warning>;<critical>` perfdata suffix for the standard thresholds
    ///
    /// `boundary` must be `lower` or `upper`.
    pub fn get_perf_thresholds(&self, boundary: &str) -> Result<String> {
        let boundary = boundary.parse::<Boundary>().map_err(Error::Coding)?;
        Ok(self.perf_thresholds("", boundary))
    }

    pub fn perf_thresholds(&self, name: &str, boundary: Boundary) -> String {
        let (warning, critical) = self.perf_threshold_values(name, boundary);
        format!(";{};{}", fmt_number(warning), fmt_number(critical))
    }

    pub fn perf_threshold_values(&self, name: &str, boundary: Boundary) -> (Option<f64>, Option<f64>) {
        let bound = |level| {
            self.thresholds
                .get(&threshold_name(name, level))
                .and_then(|t| t.bound(boundary))
        };
        (bound("warning"), bound("critical"))
    }

    // Output

    pub fn add_message(&mut self, msg: &str) {
        if msg.is_empty() {
            return;
        }
        if !self.message.is_empty() && !self.message.ends_with(' ') {
            self.message.push(' ');
        }
        self.message.push_str(msg);
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn add_perfdata(&mut self, perfdata: PerfData) {
        self.perfdata.push(perfdata);
    }

    pub fn perfdata(&self) -> &[PerfData] {
        &self.perfdata
    }

    /// The line a monitoring system reads: `STATUS: message | perfdata`
    pub fn output(&self) -> String {
        let mut out = self.status.to_string();
        if !self.message.is_empty() {
            out.push_str(": ");
            out.push_str(&self.message);
        }
        if !self.perfdata.is_empty() {
            out.push_str(" | ");
            out.push_str(&self.perfdata.iter().join(" "));
        }
        out
    }
}
