//! Check that we can write to disk and read it back

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use structopt::StructOpt;

use nagcheck::cli::{ThresholdArgs, Verbosity, THRESHOLD_HELP};
use nagcheck::logging;
use nagcheck::plugin::{self, Check, Outcome, RoundTripCheck};
use nagcheck::{Error, Result, StatusEngine, ThresholdOptions};

/// Check that a filesystem works by writing a file and reading it back.
///
/// Does not try to create the directory, or do anything else. Writes a short
/// unique value to the file, reads it back, and then deletes the file. The
/// thresholds apply to how long that takes, in seconds.
#[derive(StructOpt, Deserialize, Debug)]
#[structopt(
    name = "check-file-roundtrip (part of nagcheck)",
    setting = structopt::clap::AppSettings::ColoredHelp,
    after_help = THRESHOLD_HELP
)]
struct Args {
    #[structopt(flatten)]
    thresholds: ThresholdArgs,
    #[structopt(flatten)]
    verbosity: Verbosity,
    #[structopt(help = "The file to write to", parse(from_os_str))]
    filename: PathBuf,
}

struct FileRoundTrip {
    path: PathBuf,
}

impl FileRoundTrip {
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("/"))
    }
}

impl Check for FileRoundTrip {
    fn name(&self) -> &str {
        "check-file-roundtrip"
    }

    fn setup(&mut self, engine: &mut StatusEngine) -> Result<()> {
        engine.validate_thresholds("", None, None, &ThresholdOptions::new().integer(false))
    }
}

impl RoundTripCheck for FileRoundTrip {
    fn write(&mut self, value: &str) -> Result<()> {
        let mut f = fs::File::create(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                Error::Check(format!("directory {} does not exist", self.dir().display()))
            }
            _ => Error::Check(format!("unable to create {}: {}", self.path.display(), e)),
        })?;
        f.write_all(value.as_bytes())?;
        f.flush()
            .map_err(|e| Error::Check(format!("couldn't flush bytes to {}: {}", self.path.display(), e)))?;
        f.sync_all()?;
        Ok(())
    }

    fn read(&mut self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(ref e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn cleanup(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(ref e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Check(format!("unable to remove {}: {}", self.path.display(), e))),
            Ok(()) => Ok(()),
        }
    }
}

fn do_check(args: &Args) -> Outcome {
    let mut engine = StatusEngine::new();
    engine.add_thresholds("", Some("1"), Some("5"));
    args.thresholds.apply(&mut engine, "");
    let mut check = FileRoundTrip {
        path: args.filename.clone(),
    };
    plugin::run(&mut check, &mut engine, plugin::evaluate_round_trip)
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    logging::init(args.verbosity.level());
    do_check(&args).exit();
}

#[cfg(test)]
mod test {
    use nagcheck::Status;
    use structopt::StructOpt;

    use super::{do_check, Args};

    fn build_args(argv: Vec<&str>) -> Args {
        Args::from_iter(argv.into_iter())
    }

    #[test]
    fn can_parse_args() {
        let args = build_args(vec!["check-file-roundtrip", "-w", "0.5", "/tmp/probe"]);
        assert_eq!(args.thresholds.warning, Some("0.5".to_owned()));
        assert_eq!(args.filename.to_str(), Some("/tmp/probe"));
    }

    #[test]
    fn writes_reads_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe");
        let outcome = do_check(&build_args(vec!["check-file-roundtrip", path.to_str().unwrap()]));
        assert_eq!(outcome.status, Status::Ok, "{}", outcome.output);
        assert!(outcome.output.contains("'round_trip_time'="), "{}", outcome.output);
        assert!(outcome.output.ends_with("s;1;5;0"), "{}", outcome.output);
        assert!(!path.exists());
    }

    #[test]
    fn missing_directory_is_critical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-there").join("probe");
        let outcome = do_check(&build_args(vec!["check-file-roundtrip", path.to_str().unwrap()]));
        assert_eq!(outcome.status, Status::Critical);
        assert!(outcome.output.contains("does not exist"), "{}", outcome.output);
    }

    #[test]
    fn slow_round_trips_breach_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe");
        let argv = vec!["check-file-roundtrip", "-c", "@0:1000", path.to_str().unwrap()];
        let outcome = do_check(&build_args(argv));
        assert_eq!(outcome.status, Status::Critical);
        assert!(outcome.output.contains("critical threshold breached"), "{}", outcome.output);
    }

    #[test]
    fn bad_thresholds_are_unknown() {
        let outcome = do_check(&build_args(vec!["check-file-roundtrip", "-w", "soon", "/tmp/probe"]));
        assert_eq!(outcome.status, Status::Unknown);
        assert!(outcome.output.contains("usage error"), "{}", outcome.output);
    }
}
