//! Check the load average of the system
//!
//! Load average is the number of processes *waiting* to do work in a queue, either
//! due to IO or CPU constraints. The numbers used to check are the load averaged
//! over 1, 5 and 15 minutes, respectively

use std::fs;
use std::str::FromStr;
use std::thread;

use serde::Deserialize;
use structopt::StructOpt;

use nagcheck::cli::{ThresholdArgs, Verbosity};
use nagcheck::logging;
use nagcheck::plugin::{self, Check, NumericCheck, Outcome};
use nagcheck::{Error, Result, StatusEngine, ThresholdOptions};

const PERIODS: [&str; 3] = ["load1", "load5", "load15"];

/// Check the load average of the system
///
/// Load average is the number of processes *waiting* to do work in a queue, either
/// due to IO or CPU constraints. The numbers used to check are the load averaged
/// over 1, 5 and 15 minutes, respectively
#[derive(Deserialize, Debug, StructOpt)]
#[structopt(
    name = "check-load (part of nagcheck)",
    setting = structopt::clap::AppSettings::ColoredHelp,
    after_help = "Thresholds are comma separated, one per period. A single threshold \
                  applies to all three periods. Each one can be a full nagios range, \
                  e.g. '-w 5,@0:0.1,2.5'."
)]
struct Args {
    #[structopt(flatten)]
    thresholds: ThresholdArgs,
    #[structopt(
        long = "per-cpu",
        help = "Divide the load average by the number of processors on the \
                system."
    )]
    per_cpu: bool,
    #[structopt(flatten)]
    verbosity: Verbosity,
}

/// The contents of /proc/loadavg
#[derive(Debug, PartialEq, Clone, Copy)]
struct LoadAvg {
    one: f64,
    five: f64,
    fifteen: f64,
}

impl LoadAvg {
    fn load() -> Result<LoadAvg> {
        let contents = fs::read_to_string("/proc/loadavg")?;
        contents.parse()
    }

    fn values(&self) -> [f64; 3] {
        [self.one, self.five, self.fifteen]
    }

    fn per_cpu(self, cpus: usize) -> LoadAvg {
        let cpus = cpus.max(1) as f64;
        LoadAvg {
            one: self.one / cpus,
            five: self.five / cpus,
            fifteen: self.fifteen / cpus,
        }
    }
}

impl FromStr for LoadAvg {
    type Err = Error;

    fn from_str(s: &str) -> Result<LoadAvg> {
        let mut parts = s.split_whitespace().map(|part| {
            part.parse::<f64>()
                .map_err(|e| Error::Check(format!("unable to parse load average '{}': {}", part, e)))
        });
        let mut next = || {
            parts
                .next()
                .unwrap_or_else(|| Err(Error::Check(format!("too few fields in load average '{}'", s.trim()))))
        };
        Ok(LoadAvg {
            one: next()?,
            five: next()?,
            fifteen: next()?,
        })
    }
}

/// Split `5,3.5,2.5` into one threshold per period
fn split_levels(raw: &str) -> Result<Vec<String>> {
    let levels: Vec<String> = raw.split(',').map(|l| l.trim().to_owned()).collect();
    match levels.len() {
        1 => Ok(vec![levels[0].clone(); PERIODS.len()]),
        3 => Ok(levels),
        n => Err(Error::usage(format!(
            "expected 1 or 3 comma separated thresholds, got {} in '{}'",
            n, raw
        ))),
    }
}

/// One period of the load average
struct Period {
    name: &'static str,
    value: f64,
}

impl Check for Period {
    fn name(&self) -> &str {
        "check-load"
    }
}

impl NumericCheck for Period {
    fn metric(&self) -> &str {
        self.name
    }

    fn threshold_prefix(&self) -> &str {
        self.name
    }

    fn measure(&mut self) -> Result<f64> {
        Ok(self.value)
    }
}

struct LoadCheck {
    thresholds: ThresholdArgs,
    cpus: usize,
    load: Option<LoadAvg>,
}

impl Check for LoadCheck {
    fn name(&self) -> &str {
        "check-load"
    }

    fn setup(&mut self, engine: &mut StatusEngine) -> Result<()> {
        let warnings = split_levels(self.thresholds.warning.as_deref().unwrap_or("5,3.5,2.5"))?;
        let criticals = split_levels(self.thresholds.critical.as_deref().unwrap_or("10,5,3"))?;
        let opts = ThresholdOptions::new().integer(false);
        for (i, period) in PERIODS.iter().enumerate() {
            engine.add_thresholds(period, Some(&warnings[i]), Some(&criticals[i]));
            engine.validate_thresholds(period, None, None, &opts)?;
        }
        Ok(())
    }
}

fn evaluate(check: &mut LoadCheck, engine: &mut StatusEngine) -> Result<()> {
    let load = match check.load {
        Some(load) => load,
        None => LoadAvg::load()?,
    };
    let load = load.per_cpu(check.cpus);
    if check.cpus > 1 {
        engine.add_message(&format!("divided by {} cpus:", check.cpus));
    }
    for (&name, &value) in PERIODS.iter().zip(load.values().iter()) {
        plugin::evaluate_numeric(&mut Period { name, value }, engine)?;
    }
    Ok(())
}

fn do_check(args: &Args, load: Option<LoadAvg>, cpus: usize) -> Outcome {
    let mut check = LoadCheck {
        thresholds: args.thresholds.clone(),
        cpus: if args.per_cpu { cpus } else { 1 },
        load,
    };
    plugin::run(&mut check, &mut StatusEngine::new(), evaluate)
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    logging::init(args.verbosity.level());
    let cpus = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    do_check(&args, None, cpus).exit();
}
