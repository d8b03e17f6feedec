//! cellstore CLI.
//!
//! Provides the `cellstore` binary with subcommands for working with a
//! record database: `init` creates or migrates it, `store` serializes a
//! JSON graph document into it, `counts` and `get-identity` inspect it.
//!
//! The database path and busy timeout default to `CELLSTORE_DB_PATH` and
//! `CELLSTORE_BUSY_TIMEOUT_MS`; flags override both. Logs go to stderr and
//! are filtered by `RUST_LOG` (default: "info").

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

use cellstore_core::{EntityKind, GraphDocument, SemanticGraph};
use cellstore_storage::{RecordStore, SqliteStore, StoreConfig, StoreError};

/// Semantic model record store.
#[derive(Parser)]
#[command(name = "cellstore", about = "Persist semantic model graphs to SQLite")]
struct Cli {
    /// Path to the record database file.
    #[arg(short, long, global = true)]
    db: Option<String>,

    /// Milliseconds to wait on a locked database.
    #[arg(long, global = true)]
    busy_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create the database, or apply pending migrations to it.
    Init,

    /// Serialize a graph document into the database.
    Store {
        /// JSON graph document to store.
        graph: PathBuf,
    },

    /// Print the number of stored rows per entity kind.
    Counts,

    /// Print one naming record.
    GetIdentity {
        uuid: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli);

    let exit_code = match cli.command {
        Commands::Init => run_init(&config),
        Commands::Store { graph } => run_store(&config, &graph),
        Commands::Counts => run_counts(&config),
        Commands::GetIdentity { uuid } => run_get_identity(&config, &uuid),
    };
    process::exit(exit_code);
}

/// Environment configuration with command-line overrides applied.
fn resolve_config(cli: &Cli) -> StoreConfig {
    let mut config = StoreConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(ms) = cli.busy_timeout_ms {
        config.busy_timeout_ms = ms;
    }
    config
}

fn open(config: &StoreConfig) -> Result<SqliteStore, i32> {
    SqliteStore::open(config).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", config.db_path, e);
        3
    })
}

fn print_json(value: &impl serde::Serialize) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}

/// Execute the init subcommand. Exit code: 0 = success, 3 = I/O error.
fn run_init(config: &StoreConfig) -> i32 {
    match open(config) {
        Ok(_) => {
            tracing::info!(db = %config.db_path, "database ready");
            0
        }
        Err(code) => code,
    }
}

/// Execute the store subcommand.
///
/// Returns exit code: 0 = success, 1 = store error, 3 = I/O or parse error.
fn run_store(config: &StoreConfig, graph_path: &Path) -> i32 {
    let graph = match load_graph(graph_path) {
        Ok(graph) => graph,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    tracing::debug!(path = %graph_path.display(), elements = graph.element_count(), "graph loaded");

    let mut store = match open(config) {
        Ok(store) => store,
        Err(code) => return code,
    };

    let mut serializer = cellstore_storage::Serializer::new(&mut store);
    let result = serializer.serialize(&graph, graph.root());
    let summary = serializer.last_summary();
    match result {
        Ok(()) => {
            if let Some(summary) = summary {
                print_json(&summary);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn load_graph(path: &Path) -> Result<SemanticGraph, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    let document: GraphDocument = serde_json::from_str(&text)
        .map_err(|e| format!("failed to parse '{}': {}", path.display(), e))?;
    SemanticGraph::from_document(document)
        .map_err(|e| format!("invalid graph in '{}': {}", path.display(), e))
}

/// Execute the counts subcommand. Exit code: 0 = success, 1 = store error,
/// 3 = I/O error.
fn run_counts(config: &StoreConfig) -> i32 {
    let store = match open(config) {
        Ok(store) => store,
        Err(code) => return code,
    };

    // Entity kinds print in dependency order.
    let mut counts: IndexMap<&'static str, u64> = IndexMap::new();
    for entity in EntityKind::ALL {
        match store.count(entity) {
            Ok(n) => {
                counts.insert(entity.table(), n);
            }
            Err(e) => {
                eprintln!("Error: failed to count {}: {}", entity, e);
                return 1;
            }
        }
    }
    print_json(&counts);
    0
}

/// Execute the get-identity subcommand. Exit code: 0 = found, 1 = missing
/// or store error, 3 = I/O error.
fn run_get_identity(config: &StoreConfig, uuid: &str) -> i32 {
    let store = match open(config) {
        Ok(store) => store,
        Err(code) => return code,
    };

    match store.get_identity(uuid) {
        Ok(identity) => {
            print_json(&identity);
            0
        }
        Err(StoreError::NotFound { .. }) => {
            eprintln!("Error: no identity with uuid '{}'", uuid);
            1
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
