//! CLI command implementations
//!
//! Both commands load the model schemas into a fresh in-memory database and
//! resolve the request against the resource configuration. `plan` stops at
//! the explained plan; `query` loads records and runs getMany.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::CrudOptions;
use crate::crud::{CrudRequest, CrudService};
use crate::executor::{DocumentStore, InMemoryDatabase, InMemoryModel};
use crate::observability::init_logging;
use crate::planner::{ExplainPlan, QueryPlanBuilder};
use crate::request::ParsedRequestParams;
use crate::schema::ModelSchema;

use super::args::{Cli, Command, PlanArgs, QueryArgs, ResourceArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_response};

/// Schema file contents: one schema or several
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaFile {
    Many(Vec<ModelSchema>),
    One(ModelSchema),
}

/// Everything a command needs to answer one request
struct Resource {
    db: InMemoryDatabase,
    model: InMemoryModel,
    options: CrudOptions,
    request: CrudRequest,
}

/// Parse arguments, install logging, run the command and print its output
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(&cli.log_config())?;
    let output = run_command(&cli.command)?;
    write_response(&output)
}

pub fn run_command(command: &Command) -> CliResult<Value> {
    match command {
        Command::Plan(args) => plan(args),
        Command::Query(args) => query(args),
    }
}

fn load_resource(args: &ResourceArgs) -> CliResult<Resource> {
    let schemas = match read_json_file::<SchemaFile>(&args.schema)? {
        SchemaFile::Many(schemas) => schemas,
        SchemaFile::One(schema) => vec![schema],
    };
    let first = schemas
        .first()
        .map(|s| s.name.clone())
        .ok_or_else(|| CliError::config_error("Schema file defines no model"))?;

    let db = InMemoryDatabase::new();
    for schema in schemas {
        db.register(schema)?;
    }
    let model = db.model(args.model.as_deref().unwrap_or(first.as_str()))?;

    let options = match &args.options {
        Some(path) => CrudOptions::from_json_file(path)?,
        None => CrudOptions::default(),
    };

    let parsed: ParsedRequestParams = read_json_file(&args.request)?;
    let request = CrudRequest::new(parsed).with_path_params(
        &options.params,
        args.params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;

    Ok(Resource {
        db,
        model,
        options,
        request,
    })
}

/// Explained multi-record plan; a rejected request yields a rejection
/// explanation rather than an error
pub fn plan(args: &PlanArgs) -> CliResult<Value> {
    let resource = load_resource(&args.resource)?;
    let descriptor = resource.model.descriptor();

    let explained = match QueryPlanBuilder::new(descriptor, &resource.options.query)
        .build_many(&resource.request.parsed)
    {
        Ok(plan) => plan.explain(descriptor.identity()),
        Err(e) => ExplainPlan::from_error(&e).to_json(),
    };
    Ok(explained)
}

/// getMany over the loaded records
pub fn query(args: &QueryArgs) -> CliResult<Value> {
    let resource = load_resource(&args.resource)?;

    let data: BTreeMap<String, Vec<Value>> = read_json_file(&args.data)?;
    for (name, records) in data {
        let store = resource.db.model(&name)?;
        let records = records
            .into_iter()
            .map(|record| match record {
                Value::Object(map) => Ok(map),
                _ => Err(CliError::config_error(format!(
                    "Record of '{}' is not an object",
                    name
                ))),
            })
            .collect::<CliResult<Vec<Map<String, Value>>>>()?;
        store.insert_many(records)?;
    }

    let service = CrudService::new(resource.model, resource.options);
    let response = service.get_many(&resource.request)?;
    Ok(serde_json::to_value(response)?)
}
