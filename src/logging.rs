//! Logging setup for check scripts
//!
//! stdout belongs to the monitoring system, it reads exactly one line from
//! it. Everything else goes to stderr through `env_logger`.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Send logs to stderr at `level`, unless `RUST_LOG` says otherwise
///
/// Safe to call more than once, later calls are ignored.
pub fn init(level: LevelFilter) {
    let default = level.to_string().to_lowercase();
    let _ = Builder::from_env(Env::default().default_filter_or(default))
        .target(Target::Stderr)
        .format_timestamp(None)
        .try_init();
}
