//! CLI module for docquery
//!
//! Provides command-line interface for:
//! - plan: Print the explained query plan of a request
//! - query: Run getMany against records loaded from a file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, PlanArgs, QueryArgs, ResourceArgs};
pub use commands::{plan, query, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_response};
