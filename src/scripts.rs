//! Documentation about the check scripts shipped with nagcheck
//!
//! Every script prints one line, `STATUS: message | perfdata`, and exits
//! 0 for OK, 1 for WARNING, 2 for CRITICAL and 3 for UNKNOWN.
//!
//! - [check-value](#check-value)
//! - [check-load](#check-load)
//! - [check-status-file](#check-status-file)
//! - [check-file-roundtrip](#check-file-roundtrip)
//!
//! # check-value
//!
//! Cross platform. Checks a number given on the command line or stdin.
//!
//! ```plain
//! $ check-value --help
//! check-value (part of nagcheck) 0.1.0
//! Check a number against nagios-style thresholds.
//!
//! USAGE:
//!     check-value [FLAGS] [OPTIONS] [value]
//!
//! FLAGS:
//!         --allow-negative    Allow negative thresholds
//!         --float             Allow thresholds that are not whole numbers
//!     -h, --help              Prints help information
//!         --lower             Single number thresholds are lower bounds instead of upper bounds
//!     -V, --version           Prints version information
//!     -v, --verbose           Log details to stderr, repeat for more
//!
//! OPTIONS:
//!     -c, --critical <critical>    Critical threshold, in nagios format: [@][start:]end
//!     -l, --label <label>          Name of the value in the output and perfdata [default: value]
//!     -u, --unit <unit>            Unit of the value, e.g. 's' or '%'
//!     -w, --warning <warning>      Warning threshold, in nagios format: [@][start:]end
//!
//! ARGS:
//!     <value>    The value to check. Read from stdin if not given
//! ```
//!
//! # check-load
//!
//! Linux-only. Reads /proc/loadavg.
//!
//! ```plain
//! $ check-load --help
//! check-load (part of nagcheck) 0.1.0
//! Check the load average of the system
//!
//! USAGE:
//!     check-load [FLAGS] [OPTIONS]
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!         --per-cpu    Divide the load average by the number of processors on the system.
//!     -V, --version    Prints version information
//!     -v, --verbose    Log details to stderr, repeat for more
//!
//! OPTIONS:
//!     -c, --critical <critical>    Critical threshold, in nagios format: [@][start:]end
//!     -w, --warning <warning>      Warning threshold, in nagios format: [@][start:]end
//!
//! Thresholds are comma separated, one per period. A single threshold applies to all three periods. Each one can be a
//! full nagios range, e.g. '-w 5,@0:0.1,2.5'.
//! ```
//!
//! # check-status-file
//!
//! Cross platform. Reports a status written to a file by something else.
//!
//! ```plain
//! $ check-status-file --help
//! check-status-file (part of nagcheck) 0.1.0
//! Report the status written in a file.
//!
//! USAGE:
//!     check-status-file [FLAGS] [OPTIONS] <path>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!     -v, --verbose    Log details to stderr, repeat for more
//!
//! OPTIONS:
//!         --expect <expect>      The value the file must contain. If not given the file must contain a status.
//!         --missing <missing>    The status to report if the file does not exist [default: critical]  [possible
//!                                values: ok, warning, critical, unknown]
//!
//! ARGS:
//!     <path>    The file to read
//! ```
//!
//! # check-file-roundtrip
//!
//! Cross platform. Writes a file, reads it back and times it.
//!
//! ```plain
//! $ check-file-roundtrip --help
//! check-file-roundtrip (part of nagcheck) 0.1.0
//! Check that a filesystem works by writing a file and reading it back.
//!
//! USAGE:
//!     check-file-roundtrip [FLAGS] [OPTIONS] <filename>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!     -v, --verbose    Log details to stderr, repeat for more
//!
//! OPTIONS:
//!     -c, --critical <critical>    Critical threshold, in nagios format: [@][start:]end
//!     -w, --warning <warning>      Warning threshold, in nagios format: [@][start:]end
//!
//! ARGS:
//!     <filename>    The file to write to
//! ```
