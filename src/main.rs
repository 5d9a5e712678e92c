use anyhow::Context;
use clap::{Parser, Subcommand};
use planetary_gazetteer::catalog::{self, Catalog};
use planetary_gazetteer::config::Config;
use planetary_gazetteer::search::{CoordinatePolicy, SearchError, SearchService};
use planetary_gazetteer::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Planetary Gazetteer — fuzzy search for named surface features.
///
/// Loads one CSV per body from the data directory, then either serves the
/// HTTP API or answers a single query on stdout.
///
/// Examples:
///   gazetteer serve --port 3000
///   gazetteer bodies
///   gazetteer search mars "gale"
///   gazetteer list venus --policy strict
#[derive(Parser)]
#[command(name = "gazetteer", version, about, long_about = None)]
struct Cli {
    /// Config file (TOML). Defaults to <config dir>/gazetteer/config.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding one CSV file per body.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// How to treat rows with an unknown coordinate system: "permissive" or "strict".
    #[arg(long, global = true, value_parser = parse_policy)]
    policy: Option<CoordinatePolicy>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// List the bodies that have data.
    Bodies,
    /// Fuzzy search feature names on one body. Without a query, report whether the body has data.
    Search {
        body: String,
        query: Option<String>,
    },
    /// List every feature on one body.
    List { body: String },
}

fn parse_policy(s: &str) -> Result<CoordinatePolicy, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // ── Configuration ───────────────────────────────────────────

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }
    if let Some(policy) = cli.policy {
        config.search.coordinate_policy = policy;
    }
    let command = cli.command.unwrap_or(Command::Serve { host: None, port: None });
    if let Command::Serve { host, port } = &command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    // ── Build catalog ───────────────────────────────────────────

    let sources = catalog::discover_sources(
        &config.data.dir,
        &config.data.extension,
        &config.data.skip_lines,
    )
    .context("discovering data sources")?;
    let (catalog, report) = Catalog::build(sources).await;
    let bodies = catalog.len();
    let search = SearchService::new(catalog, config.search.coordinate_policy);
    tracing::info!(
        bodies,
        failed = report.failed.len(),
        policy = %search.policy(),
        "catalog ready"
    );

    // ── Dispatch ────────────────────────────────────────────────

    match command {
        Command::Serve { .. } => {
            let addr = config.bind_addr();
            server::start(search, &addr)
                .await
                .with_context(|| format!("serving on {}", addr))?;
        }
        Command::Bodies => {
            print_json(&serde_json::json!({ "planets": search.list_bodies() }))?;
        }
        Command::Search { body, query } => {
            let response = search.search(&body, query.as_deref());
            print_outcome(response)?;
        }
        Command::List { body } => {
            print_outcome(search.list(&body))?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_outcome<T: serde::Serialize>(outcome: Result<T, SearchError>) -> anyhow::Result<()> {
    match outcome {
        Ok(response) => print_json(&response),
        Err(e) => {
            print_json(&serde_json::json!({ "hasData": false }))?;
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
