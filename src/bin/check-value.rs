//! Check a number against warning and critical thresholds

use std::io::{self, IsTerminal, Read};

use serde::Deserialize;
use structopt::StructOpt;

use nagcheck::cli::{ThresholdArgs, Verbosity, THRESHOLD_HELP};
use nagcheck::logging;
use nagcheck::plugin::{self, Check, NumericCheck, Outcome};
use nagcheck::validate::{validate_float, validate_label};
use nagcheck::{Boundary, Error, Result, Simple, StatusEngine, ThresholdOptions};

/// Check a number against nagios-style thresholds.
///
/// The number is taken from the command line, or read from stdin if it is not
/// given, so this can be the end of a pipeline:
///
///     wc -l < /var/spool/queue | check-value -w 100 -c 1000 --label queue
#[derive(Deserialize, StructOpt, Debug)]
#[structopt(
    name = "check-value (part of nagcheck)",
    setting = structopt::clap::AppSettings::ColoredHelp,
    after_help = THRESHOLD_HELP
)]
struct Args {
    #[structopt(flatten)]
    thresholds: ThresholdArgs,
    #[structopt(
        short = "l",
        long = "label",
        default_value = "value",
        help = "Name of the value in the output and perfdata"
    )]
    label: String,
    #[structopt(short = "u", long = "unit", help = "Unit of the value, e.g. 's' or '%'")]
    unit: Option<String>,
    #[structopt(
        long = "lower",
        help = "Single number thresholds are lower bounds instead of upper bounds"
    )]
    lower: bool,
    #[structopt(long = "float", help = "Allow thresholds that are not whole numbers")]
    float: bool,
    #[structopt(long = "allow-negative", help = "Allow negative thresholds")]
    allow_negative: bool,
    #[structopt(flatten)]
    verbosity: Verbosity,
    #[structopt(help = "The value to check. Read from stdin if not given")]
    value: Option<String>,
}

struct ValueCheck {
    label: String,
    unit: String,
    raw: Option<String>,
    opts: ThresholdOptions,
}

impl ValueCheck {
    fn from_args(args: &Args, stdin: Option<String>) -> ValueCheck {
        let simple = if args.lower { Simple::Lower } else { Simple::Upper };
        ValueCheck {
            label: args.label.clone(),
            unit: args.unit.clone().unwrap_or_default(),
            raw: args.value.clone().or(stdin),
            opts: ThresholdOptions::new()
                .simple(simple)
                .integer(!args.float)
                .positive(!args.allow_negative)
                .optional(true),
        }
    }
}

impl Check for ValueCheck {
    fn name(&self) -> &str {
        "check-value"
    }

    fn setup(&mut self, engine: &mut StatusEngine) -> Result<()> {
        validate_label(&self.label, "--label")?;
        engine.validate_thresholds("", None, None, &self.opts)
    }
}

impl NumericCheck for ValueCheck {
    fn metric(&self) -> &str {
        &self.label
    }

    fn unit(&self) -> &str {
        &self.unit
    }

    fn perf_boundary(&self) -> Boundary {
        match self.opts.simple {
            Simple::Lower => Boundary::Lower,
            Simple::Upper => Boundary::Upper,
        }
    }

    fn measure(&mut self) -> Result<f64> {
        match self.raw {
            Some(ref raw) => validate_float(raw, "value", None, None),
            None => Err(Error::usage("no value given on the command line or stdin")),
        }
    }
}

fn do_check(args: &Args, stdin: Option<String>) -> Outcome {
    let mut engine = StatusEngine::new();
    engine.add_thresholds("", None, None);
    args.thresholds.apply(&mut engine, "");
    let mut check = ValueCheck::from_args(args, stdin);
    plugin::run(&mut check, &mut engine, plugin::evaluate_numeric)
}

/// The first non-blank line of `input`
///
/// A terminal is never read from, nobody is going to type the value in.
fn read_value<R: Read>(mut input: R, is_terminal: bool) -> Option<String> {
    if is_terminal {
        log::info!("stdin is a terminal, not waiting for a value");
        return None;
    }
    let mut buf = String::new();
    match input.read_to_string(&mut buf) {
        Ok(_) => buf.lines().map(str::trim).find(|l| !l.is_empty()).map(str::to_owned),
        Err(e) => {
            log::warn!("unable to read stdin: {}", e);
            None
        }
    }
}

fn read_stdin() -> Option<String> {
    let stdin = io::stdin();
    let is_terminal = stdin.is_terminal();
    read_value(stdin.lock(), is_terminal)
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    logging::init(args.verbosity.level());
    let stdin = if args.value.is_none() { read_stdin() } else { None };
    do_check(&args, stdin).exit();
}
