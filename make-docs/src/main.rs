//! Regenerate `src/scripts.rs` from the `--help` of every check
//!
//! Run after `cargo build`: `cargo run -p make-docs > src/scripts.rs`

use std::env;
use std::process::Command;

struct Script {
    name: &'static str,
    about: &'static str,
}

const SCRIPTS: &[Script] = &[
    Script {
        name: "check-value",
        about: "Cross platform. Checks a number given on the command line or stdin.",
    },
    Script {
        name: "check-load",
        about: "Linux-only. Reads /proc/loadavg.",
    },
    Script {
        name: "check-status-file",
        about: "Cross platform. Reports a status written to a file by something else.",
    },
    Script {
        name: "check-file-roundtrip",
        about: "Cross platform. Writes a file, reads it back and times it.",
    },
];

fn main() {
    let bin_dir = env::args()
        .nth(1)
        .unwrap_or_else(|| "target/debug".to_owned());

    let mut out = comment(
        "Documentation about the check scripts shipped with nagcheck\n\n\
         Every script prints one line, `STATUS: message | perfdata`, and exits\n\
         0 for OK, 1 for WARNING, 2 for CRITICAL and 3 for UNKNOWN."
            .split('\n'),
    );
    out.push_str("\n//!\n");
    out.push_str(&comment(SCRIPTS.iter().map(|s| format!("- [{0}](#{0})", s.name))));
    out.push('\n');
    for script in SCRIPTS {
        out.push_str(&format!(
            "//!\n//! # {0}\n//!\n//! {1}\n//!\n//! ```plain\n//! $ {0} --help\n",
            script.name, script.about
        ));
        let help = Command::new(format!("{}/{}", bin_dir, script.name))
            .arg("--help")
            .output()
            .unwrap_or_else(|e| panic!("couldn't run {}: {}", script.name, e))
            .stdout;
        let help = String::from_utf8(help)
            .unwrap_or_else(|e| panic!("{} --help is not utf8: {}", script.name, e));
        out.push_str(&comment(help.trim_end().split('\n')));
        out.push_str("\n//! ```\n");
    }
    print!("{}", out);
}

/// Doc-comment every line
fn comment<S: AsRef<str>, I: Iterator<Item = S>>(lines: I) -> String {
    lines
        .map(|l| format!("//! {}", l.as_ref()).trim_end().to_owned())
        .collect::<Vec<String>>()
        .join("\n")
}
