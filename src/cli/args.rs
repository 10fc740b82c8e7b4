//! CLI argument definitions using clap
//!
//! Commands:
//! - docquery plan --schema <path> --options <path> --request <path>
//! - docquery query --schema <path> --options <path> --data <path> --request <path>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::{LogConfig, LogFormat};

/// docquery - plan and run CRUD queries over a document store
#[derive(Parser, Debug)]
#[command(name = "docquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log level directive, e.g. `debug` or `docquery=trace`
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit log records as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the query plan of a request and print it
    Plan(PlanArgs),

    /// Load records into an in-memory store and run getMany
    Query(QueryArgs),
}

/// Resource selection shared by every command
#[derive(Args, Debug, Clone)]
pub struct ResourceArgs {
    /// Model schema file (one schema or an array of schemas)
    #[arg(long)]
    pub schema: PathBuf,

    /// Model to query; defaults to the first schema in the file
    #[arg(long)]
    pub model: Option<String>,

    /// Resource configuration file
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Parsed request parameters file
    #[arg(long)]
    pub request: PathBuf,

    /// Path parameter, `name=value`; repeatable
    #[arg(long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub resource: ResourceArgs,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub resource: ResourceArgs,

    /// Records to load: an object mapping model names to arrays of records
    #[arg(long)]
    pub data: PathBuf,
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn log_config(&self) -> LogConfig {
        let format = if self.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Plain
        };
        LogConfig::new(self.log_level.clone(), format)
    }
}
