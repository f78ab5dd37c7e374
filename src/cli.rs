//! Command line pieces shared by the check scripts
//!
//! Flatten these into a check's `Args`:
//!
//! ```rust,no_run
//! use structopt::StructOpt;
//! use nagcheck::cli::{ThresholdArgs, Verbosity};
//!
//! #[derive(StructOpt)]
//! struct Args {
//!     #[structopt(flatten)]
//!     thresholds: ThresholdArgs,
//!     #[structopt(flatten)]
//!     verbosity: Verbosity,
//! }
//! ```

use log::LevelFilter;
use serde::Deserialize;
use structopt::StructOpt;

use crate::engine::{threshold_name, StatusEngine};

/// `-w/--warning` and `-c/--critical`
#[derive(StructOpt, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ThresholdArgs {
    #[structopt(
        short = "w",
        long = "warning",
        help = "Warning threshold, in nagios format: [@][start:]end"
    )]
    pub warning: Option<String>,
    #[structopt(
        short = "c",
        long = "critical",
        help = "Critical threshold, in nagios format: [@][start:]end"
    )]
    pub critical: Option<String>,
}

impl ThresholdArgs {
    /// Record the values that were given on the command line
    ///
    /// Anything that was not given keeps the default from
    /// `StatusEngine::add_thresholds`.
    pub fn apply(&self, engine: &mut StatusEngine, name: &str) {
        if let Some(ref warning) = self.warning {
            engine.set_option(&threshold_name(name, "warning"), warning.as_str());
        }
        if let Some(ref critical) = self.critical {
            engine.set_option(&threshold_name(name, "critical"), critical.as_str());
        }
    }
}

/// `-v`, repeatable
#[derive(StructOpt, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Verbosity {
    #[structopt(
        short = "v",
        long = "verbose",
        parse(from_occurrences),
        help = "Log details to stderr, repeat for more"
    )]
    pub verbose: u8,
}

impl Verbosity {
    pub fn level(self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Help text explaining the threshold syntax, for `after_help`
pub const THRESHOLD_HELP: &str = "About thresholds:

    A single number is an upper bound: '-w 80' warns if the value is over 80.

    A range 'start:end' alerts if the value is outside of it, 'start:' only
    has a lower bound. Prefixing a range with '@' alerts if the value is
    inside of it instead. Bounds are inclusive.

        -w 80       warn if > 80
        -w 10:      warn if < 10
        -w 10:80    warn if < 10 or > 80
        -w @10:80   warn if >= 10 and <= 80";
