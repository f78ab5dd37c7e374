//! Kinds of checks, and the drivers that run them
//!
//! Most checks fall into one of three shapes:
//!
//! * they measure a number and compare it to thresholds (`NumericCheck`),
//! * they read a status that something else already decided on
//!   (`StatusCheck`),
//! * they write a value somewhere and make sure they can read it back
//!   (`RoundTripCheck`).
//!
//! A check implements one of those, and `run` takes care of setting up the
//! `StatusEngine`, evaluating, and turning errors into an UNKNOWN result:
//!
//! ```rust
//! use nagcheck::plugin::{self, Check, NumericCheck};
//! use nagcheck::{Result, Status, StatusEngine, ThresholdOptions};
//!
//! struct Answer;
//!
//! impl Check for Answer {
//!     fn name(&self) -> &str {
//!         "check-answer"
//!     }
//!
//!     fn setup(&mut self, engine: &mut StatusEngine) -> Result<()> {
//!         engine.add_thresholds("", Some("40"), Some("50"));
//!         engine.validate_thresholds("", None, None, &ThresholdOptions::new())
//!     }
//! }
//!
//! impl NumericCheck for Answer {
//!     fn metric(&self) -> &str {
//!         "answer"
//!     }
//!
//!     fn measure(&mut self) -> Result<f64> {
//!         Ok(42.0)
//!     }
//! }
//!
//! let outcome = plugin::run(&mut Answer, &mut StatusEngine::new(), plugin::evaluate_numeric);
//! assert_eq!(outcome.status, Status::Warning);
//! assert_eq!(
//!     outcome.output,
//!     "WARNING: answer = 42 (warning threshold breached: 42 > 40) | 'answer'=42;40;50"
//! );
//! ```

use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{error, info, warn};

use crate::engine::StatusEngine;
use crate::error::{Error, Result};
use crate::perfdata::{fmt_number, PerfData};
use crate::threshold::Boundary;
use crate::Status;

/// Anything that can be run as a check
pub trait Check {
    /// Used in error output, e.g. `check-load`
    fn name(&self) -> &str;

    /// Declare and validate thresholds
    ///
    /// Runs before the engine is set to OK, so a usage error here leaves the
    /// check UNKNOWN.
    fn setup(&mut self, _engine: &mut StatusEngine) -> Result<()> {
        Ok(())
    }
}

/// A check that produces a number
pub trait NumericCheck: Check {
    /// Name of the number, used in the message and as the perfdata label
    fn metric(&self) -> &str;

    fn unit(&self) -> &str {
        ""
    }

    /// Which thresholds to use, `""` means plain `warning`/`critical`
    fn threshold_prefix(&self) -> &str {
        ""
    }

    /// Which end of the thresholds to report in perfdata
    fn perf_boundary(&self) -> Boundary {
        Boundary::Upper
    }

    fn measure(&mut self) -> Result<f64>;
}

/// A check that reports a status decided elsewhere
pub trait StatusCheck: Check {
    /// The raw status, e.g. `ok` or `critical`
    fn read_status(&mut self) -> Result<String>;

    /// If set, the status is compared with this value instead of being
    /// interpreted: equal is OK, anything else is CRITICAL
    fn expected(&self) -> Option<&str> {
        None
    }
}

/// A check that writes a value and reads it back
pub trait RoundTripCheck: Check {
    fn write(&mut self, value: &str) -> Result<()>;

    /// `None` if nothing is there
    fn read(&mut self) -> Result<Option<String>>;

    /// Remove whatever `write` left behind
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The result of a check run
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: Status,
    pub output: String,
}

impl Outcome {
    /// Print the output line and exit with the status code
    pub fn exit(self) -> ! {
        println!("{}", self.output);
        self.status.exit()
    }

    fn from_engine(engine: &StatusEngine) -> Outcome {
        Outcome {
            status: engine.status(),
            output: engine.output(),
        }
    }
}

/// Run `check`: setup, `ok()`, then `evaluate`
///
/// Errors never escape, they become an UNKNOWN outcome.
pub fn run<C, F>(check: &mut C, engine: &mut StatusEngine, evaluate: F) -> Outcome
where
    C: Check + ?Sized,
    F: FnOnce(&mut C, &mut StatusEngine) -> Result<()>,
{
    let result = match check.setup(engine) {
        Ok(()) => {
            engine.ok();
            evaluate(check, engine)
        }
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => {
            info!("{} finished {}", check.name(), engine.status());
            Outcome::from_engine(engine)
        }
        Err(e) => failed(check.name(), &e),
    }
}

/// The outcome of a check that could not run
pub fn failed(name: &str, err: &Error) -> Outcome {
    if err.is_coding() {
        error!("bug in {}: {}", name, err);
    } else {
        warn!("{} failed: {}", name, err);
    }
    let output = if err.is_usage() {
        format!("{}: {}: usage error: {}", Status::Unknown, name, err)
    } else {
        format!("{}: {}: {}", Status::Unknown, name, err)
    };
    Outcome {
        status: Status::Unknown,
        output,
    }
}

/// Measure, check the thresholds, record perfdata
pub fn evaluate_numeric<C>(check: &mut C, engine: &mut StatusEngine) -> Result<()>
where
    C: NumericCheck + ?Sized,
{
    let value = check.measure()?;
    if !value.is_finite() {
        return Err(Error::Check(format!(
            "{} is not a finite number: {}",
            check.metric(),
            value
        )));
    }
    let prefix = check.threshold_prefix().to_owned();
    engine.add_message(&format!(
        "{} = {}{}",
        check.metric(),
        fmt_number(Some(value)),
        check.unit()
    ));
    engine.check_thresholds(value, &prefix)?;

    let (warning, critical) = engine.perf_threshold_values(&prefix, check.perf_boundary());
    engine.add_perfdata(
        PerfData::new(check.metric(), value)
            .unit(check.unit())
            .thresholds(warning, critical),
    );
    Ok(())
}

/// Read a status and escalate to it, or compare it with `expected`
pub fn evaluate_status<C>(check: &mut C, engine: &mut StatusEngine) -> Result<()>
where
    C: StatusCheck + ?Sized,
{
    let raw = check.read_status()?;
    let raw = raw.trim();
    let name = check.name().to_owned();

    if let Some(expected) = check.expected() {
        if raw == expected {
            engine.add_message(&format!("{} is '{}'", name, raw));
        } else {
            engine.critical();
            engine.add_message(&format!("{} is '{}', expected '{}'", name, raw, expected));
        }
        return Ok(());
    }

    match raw.parse::<Status>() {
        Ok(status) => {
            engine.escalate(status);
            engine.add_message(&format!("{} reports {}", name, status));
        }
        Err(_) => {
            engine.unknown();
            engine.add_message(&format!("{} reported unrecognized status '{}'", name, raw));
        }
    }
    Ok(())
}

/// Write a fresh token, read it back, clean up, and time the whole thing
///
/// A failed write or read is CRITICAL: the thing being checked is broken,
/// not the check. The standard thresholds apply to the round trip time in
/// seconds.
pub fn evaluate_round_trip<C>(check: &mut C, engine: &mut StatusEngine) -> Result<()>
where
    C: RoundTripCheck + ?Sized,
{
    let token = unique_token(check.name());
    let start = Instant::now();

    if let Err(e) = check.write(&token) {
        engine.critical();
        engine.add_message(&format!("failed to write: {}", e));
        clean_up(check, engine);
        return Ok(());
    }
    let read = check.read();
    let elapsed = start.elapsed().as_secs_f64();

    match read {
        Ok(Some(ref value)) if *value == token => {
            engine.add_message(&format!("wrote and read back a value in {:.3}s", elapsed));
        }
        Ok(Some(value)) => {
            engine.critical();
            engine.add_message(&format!("wrote '{}' but read back '{}'", token, value));
        }
        Ok(None) => {
            engine.critical();
            engine.add_message(&format!("wrote '{}' but read back nothing", token));
        }
        Err(e) => {
            engine.critical();
            engine.add_message(&format!("failed to read back: {}", e));
        }
    }

    clean_up(check, engine);

    engine.check_thresholds(elapsed, "")?;
    let (warning, critical) = engine.perf_threshold_values("", Boundary::Upper);
    engine.add_perfdata(
        PerfData::new("round_trip_time", elapsed)
            .unit("s")
            .thresholds(warning, critical)
            .range(Some(0.0), None),
    );
    Ok(())
}

/// A write can fail halfway, so this runs whether or not it succeeded
fn clean_up<C>(check: &mut C, engine: &mut StatusEngine)
where
    C: RoundTripCheck + ?Sized,
{
    if let Err(e) = check.cleanup() {
        warn!("{} cleanup failed: {}", check.name(), e);
        engine.warning();
        engine.add_message(&format!("cleanup failed: {}", e));
    }
}

static TOKENS: AtomicUsize = AtomicUsize::new(0);

/// Different on every call, and recognisable if it gets left behind
fn unique_token(name: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let n = TOKENS.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}-{}", name, process::id(), nanos, n)
}

// ////////////////////////////////////////////////////////////////////////////
// Testing

#[cfg(test)]
mod integration {
    use super::*;
    use crate::threshold::ThresholdOptions;

    struct Fixed {
        value: f64,
        warning: &'static str,
        critical: &'static str,
    }

    impl Check for Fixed {
        fn name(&self) -> &str {
            "check-fixed"
        }

        fn setup(&mut self, engine: &mut StatusEngine) -> Result<()> {
            engine.add_thresholds("", Some(self.warning), Some(self.critical));
            engine.validate_thresholds("", None, None, &ThresholdOptions::new())
        }
    }

    impl NumericCheck for Fixed {
        fn metric(&self) -> &str {
            "fixed"
        }

        fn unit(&self) -> &str {
            "%"
        }

        fn measure(&mut self) -> Result<f64> {
            Ok(self.value)
        }
    }

    fn numeric(value: f64) -> Outcome {
        let mut check = Fixed {
            value,
            warning: "3",
            critical: "5",
        };
        run(&mut check, &mut StatusEngine::new(), evaluate_numeric)
    }

    #[test]
    fn numeric_ok() {
        let outcome = numeric(2.0);
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.output, "OK: fixed = 2% | 'fixed'=2%;3;5");
    }

    #[test]
    fn numeric_warning() {
        let outcome = numeric(4.0);
        assert_eq!(outcome.status, Status::Warning);
        assert!(outcome.output.contains("warning threshold breached"));
        assert!(!outcome.output.contains("critical threshold"));
    }

    #[test]
    fn numeric_critical() {
        let outcome = numeric(6.0);
        assert_eq!(outcome.status, Status::Critical);
        assert_eq!(
            outcome.output,
            "CRITICAL: fixed = 6% (critical threshold breached: 6 > 5) | 'fixed'=6%;3;5"
        );
    }

    #[test]
    fn bad_threshold_is_a_usage_error() {
        let mut check = Fixed {
            value: 1.0,
            warning: "banana",
            critical: "5",
        };
        let outcome = run(&mut check, &mut StatusEngine::new(), evaluate_numeric);
        assert_eq!(outcome.status, Status::Unknown);
        assert!(outcome.output.starts_with("UNKNOWN: check-fixed: usage error:"), "{}", outcome.output);
        assert!(outcome.output.contains("banana"));
    }

    #[test]
    fn non_finite_measurements_are_unknown() {
        let outcome = numeric(f64::NAN);
        assert_eq!(outcome.status, Status::Unknown);
    }

    struct Undeclared;

    impl Check for Undeclared {
        fn name(&self) -> &str {
            "check-undeclared"
        }
    }

    #[test]
    fn coding_errors_are_unknown() {
        let outcome = run(&mut Undeclared, &mut StatusEngine::new(), |_, engine| {
            engine.get_threshold("warning", false).map(|_| ())
        });
        assert_eq!(outcome.status, Status::Unknown);
        assert!(outcome.output.contains("coding error"), "{}", outcome.output);
    }

    struct Reported {
        status: &'static str,
        expected: Option<&'static str>,
    }

    impl Check for Reported {
        fn name(&self) -> &str {
            "service"
        }
    }

    impl StatusCheck for Reported {
        fn read_status(&mut self) -> Result<String> {
            Ok(format!("{}\n", self.status))
        }

        fn expected(&self) -> Option<&str> {
            self.expected
        }
    }

    fn status(status: &'static str, expected: Option<&'static str>) -> Outcome {
        run(
            &mut Reported { status, expected },
            &mut StatusEngine::new(),
            evaluate_status,
        )
    }

    #[test]
    fn reported_statuses_are_escalated_to() {
        assert_eq!(status("ok", None).status, Status::Ok);
        assert_eq!(status("WARNING", None).status, Status::Warning);
        assert_eq!(status("critical", None).status, Status::Critical);
        assert_eq!(status("unknown", None).status, Status::Unknown);
        assert_eq!(status("critical", None).output, "CRITICAL: service reports CRITICAL");
    }

    #[test]
    fn unrecognized_status_is_unknown() {
        let outcome = status("sideways", None);
        assert_eq!(outcome.status, Status::Unknown);
        assert!(outcome.output.contains("sideways"));
    }

    #[test]
    fn expected_values() {
        assert_eq!(status("green", Some("green")).status, Status::Ok);
        let outcome = status("red", Some("green"));
        assert_eq!(outcome.status, Status::Critical);
        assert_eq!(outcome.output, "CRITICAL: service is 'red', expected 'green'");
    }

    #[derive(Default)]
    struct Store {
        value: Option<String>,
        fail_write: bool,
        fill_up: bool,
        corrupt: bool,
        cleaned: bool,
    }

    impl Check for Store {
        fn name(&self) -> &str {
            "store"
        }

        fn setup(&mut self, engine: &mut StatusEngine) -> Result<()> {
            engine.add_thresholds("", Some("1"), Some("2"));
            engine.validate_thresholds("", None, None, &ThresholdOptions::new().integer(false))
        }
    }

    impl RoundTripCheck for Store {
        fn write(&mut self, value: &str) -> Result<()> {
            if self.fail_write {
                return Err(Error::Check("read-only".to_owned()));
            }
            if self.fill_up {
                self.value = Some(value[..1].to_owned());
                return Err(Error::Check("No space left on device".to_owned()));
            }
            self.value = Some(if self.corrupt {
                value.to_uppercase()
            } else {
                value.to_owned()
            });
            Ok(())
        }

        fn read(&mut self) -> Result<Option<String>> {
            Ok(self.value.clone())
        }

        fn cleanup(&mut self) -> Result<()> {
            self.value = None;
            self.cleaned = true;
            Ok(())
        }
    }

    #[test]
    fn round_trip_ok() {
        let mut store = Store::default();
        let outcome = run(&mut store, &mut StatusEngine::new(), evaluate_round_trip);
        assert_eq!(outcome.status, Status::Ok, "{}", outcome.output);
        assert!(outcome.output.contains("'round_trip_time'="));
        assert!(outcome.output.ends_with("s;1;2;0"), "{}", outcome.output);
        assert!(store.cleaned);
        assert_eq!(store.value, None);
    }

    #[test]
    fn round_trip_mismatch_is_critical() {
        let mut store = Store {
            corrupt: true,
            ..Store::default()
        };
        let outcome = run(&mut store, &mut StatusEngine::new(), evaluate_round_trip);
        assert_eq!(outcome.status, Status::Critical);
        assert!(outcome.output.contains("read back"));
    }

    #[test]
    fn round_trip_write_failure_is_critical() {
        let mut store = Store {
            fail_write: true,
            ..Store::default()
        };
        let outcome = run(&mut store, &mut StatusEngine::new(), evaluate_round_trip);
        assert_eq!(outcome.status, Status::Critical);
        assert!(outcome.output.contains("read-only"));
    }

    #[test]
    fn partial_writes_are_cleaned_up() {
        let mut store = Store {
            fill_up: true,
            ..Store::default()
        };
        let outcome = run(&mut store, &mut StatusEngine::new(), evaluate_round_trip);
        assert_eq!(outcome.status, Status::Critical);
        assert_eq!(outcome.output, "CRITICAL: failed to write: No space left on device");
        assert!(store.cleaned);
        assert_eq!(store.value, None);
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(unique_token("a"), unique_token("a"));
        assert!(unique_token("store").starts_with("store-"));
    }
}
