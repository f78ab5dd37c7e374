//! Report a status that something else wrote to a file

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;
use structopt::StructOpt;

use nagcheck::cli::Verbosity;
use nagcheck::logging;
use nagcheck::plugin::{self, Check, Outcome, StatusCheck};
use nagcheck::{Error, Result, Status, StatusEngine};

/// Report the status written in a file.
///
/// Batch jobs and cron scripts can write `ok`, `warning`, `critical` or
/// `unknown` to a file when they finish, and this turns that into a check.
/// Only the first non-empty line of the file is read.
///
/// With `--expect` the first line is compared with a fixed value instead,
/// and anything else is CRITICAL.
#[derive(Deserialize, StructOpt, Debug)]
#[structopt(
    name = "check-status-file (part of nagcheck)",
    setting = structopt::clap::AppSettings::ColoredHelp
)]
struct Args {
    #[structopt(
        long = "expect",
        help = "The value the file must contain. If not given the file must \
                contain a status."
    )]
    expect: Option<String>,
    #[structopt(
        long = "missing",
        default_value = "critical",
        possible_values = &Status::str_values(),
        help = "The status to report if the file does not exist"
    )]
    missing: Status,
    #[structopt(flatten)]
    verbosity: Verbosity,
    #[structopt(help = "The file to read", parse(from_os_str))]
    path: PathBuf,
}

struct StatusFile {
    path: PathBuf,
    expect: Option<String>,
}

impl Check for StatusFile {
    fn name(&self) -> &str {
        "check-status-file"
    }
}

impl StatusCheck for StatusFile {
    fn read_status(&mut self) -> Result<String> {
        let contents = fs::read_to_string(&self.path)?;
        contents
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| Error::Check(format!("{} is empty", self.path.display())))
    }

    fn expected(&self) -> Option<&str> {
        self.expect.as_deref()
    }
}

fn do_check(args: &Args) -> Outcome {
    let mut check = StatusFile {
        path: args.path.clone(),
        expect: args.expect.clone(),
    };
    let missing = args.missing;
    plugin::run(&mut check, &mut StatusEngine::new(), |check, engine| {
        match fs::metadata(&check.path) {
            Err(ref e) if e.kind() == ErrorKind::NotFound => {
                engine.escalate(missing);
                engine.add_message(&format!("{} does not exist", check.path.display()));
                Ok(())
            }
            _ => plugin::evaluate_status(check, engine),
        }
    })
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    logging::init(args.verbosity.level());
    do_check(&args).exit();
}
