//! api-tracer command line.
//!
//! Shows how the tracing layer would tag a request, lists the hosts of the
//! endpoint table, and validates table files before they are shipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hyper::http::Request;
use serde_json::json;

use api_tracer::client::ApiTraceLayer;
use api_tracer::config::{load_config, ApiTracerConfig};
use api_tracer::endpoints::{self, EndpointTree};
use api_tracer::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "api-tracer")]
#[command(about = "Classify Google API requests the way the tracing layer tags them", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the span tags for a request URL
    Classify {
        url: String,
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
    },
    /// List hosts of the active endpoint table
    Hosts,
    /// Validate an endpoint table file
    Check { table: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ApiTracerConfig::from_env(),
    };
    init_logging(&config.observability)?;

    match cli.command {
        Commands::Classify { url, method } => {
            let url = url::Url::parse(&url)?;
            let request = Request::builder()
                .method(method.as_str())
                .uri(url.as_str())
                .body(())?;
            let layer = ApiTraceLayer::new(&config.tracer)?;
            print_json(&serde_json::to_value(layer.tags_for(&request))?)?;
        }
        Commands::Hosts => {
            let tree = active_tree(&config)?;
            let hosts: Vec<_> = tree
                .hosts()
                .into_iter()
                .map(|(host, endpoints)| json!({ "host": host, "endpoints": endpoints }))
                .collect();
            print_json(&json!(hosts))?;
        }
        Commands::Check { table } => {
            let tree = check_table(&table)?;
            print_json(&json!({
                "table": table.display().to_string(),
                "hosts": tree.hosts().len(),
                "endpoints": tree.len(),
            }))?;
        }
    }

    Ok(())
}

fn active_tree(config: &ApiTracerConfig) -> Result<Arc<EndpointTree>, endpoints::TableError> {
    match &config.tracer.endpoint_table {
        Some(path) => Ok(Arc::new(endpoints::load_from_path(path)?)),
        None => endpoints::init(),
    }
}

fn check_table(path: &Path) -> Result<EndpointTree, endpoints::TableError> {
    let tree = endpoints::load_from_path(path).inspect_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Endpoint table rejected");
    })?;
    tracing::info!(path = %path.display(), endpoints = tree.len(), "Endpoint table is valid");
    Ok(tree)
}

fn print_json(value: &serde_json::Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
