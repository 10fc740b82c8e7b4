//! docquery CLI entry point
//!
//! Parses arguments, installs logging and dispatches through `cli::run`.
//! Errors go to stderr with a non-zero exit code.

use docquery::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
