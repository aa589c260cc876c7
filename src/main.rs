//! cypher-template - run Cypher requests from the command line

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;

use cypher_template::config::Config;
use cypher_template::graph::backends::neo4j::Neo4jClient;
use cypher_template::graph::{mapper, Conn, Request, Row, Template};
use cypher_template::AppError;

#[derive(Parser)]
#[command(name = "cypher-template")]
#[command(about = "Run Cypher queries against Neo4j and print records as JSON")]
struct Cli {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a query and print every record as a JSON line
    Query {
        /// Cypher query text
        cypher: String,

        /// Query parameter as name=value; values are parsed as JSON, falling back to strings
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, JsonValue)>,

        /// Require exactly one record
        #[arg(long)]
        single: bool,

        /// Label reported in logs and cardinality errors
        #[arg(long, default_value = "Record")]
        label: String,
    },
}

fn parse_param(raw: &str) -> Result<(String, JsonValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| JsonValue::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Adds a hint to wrong-cardinality errors of `--single` queries.
fn single_query_error(err: AppError) -> color_eyre::Report {
    if err.is_cardinality() {
        color_eyre::eyre::eyre!("{} (run without --single to print every record)", err)
    } else {
        err.into()
    }
}

fn print_row(row: Row) -> color_eyre::Result<()> {
    println!("{}", serde_json::to_string(&row.into_inner())?);
    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let client = Neo4jClient::connect(&config.neo4j).await?;
    tracing::info!("Connected to Neo4j");
    let mut conn = Conn::new(client);

    match cli.command {
        Command::Query {
            cypher,
            params,
            single,
            label,
        } => {
            let request = Request::new(cypher).with_params(params.into_iter().collect());
            let mut template = Template::<Row, _>::with_label(&mut conn, label);

            if single {
                let row = template
                    .query_single(&request, mapper::raw())
                    .await
                    .map_err(single_query_error)?;
                print_row(row)?;
            } else {
                let result = template.query(&request, mapper::raw()).await?;
                if let Some(summary) = &result.summary {
                    tracing::info!(
                        records = summary.records,
                        elapsed = ?summary.consumed_after,
                        "Query complete"
                    );
                }
                for row in result.records {
                    print_row(row)?;
                }
            }
        }
    }

    Ok(())
}
