//! ATLAS CLI: command-line interface for the ATLAS Network
//!
//! Inspects saved graph files and runs the interactive shell.

use atlas_network::graph::{NodeId, PropertyValue};
use atlas_network::query::{self, GraphSummary};
use atlas_network::{AtlasConfig, CommandOutput, EdgeType, GraphStore, Session};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "atlas", version, about = "ATLAS Network CLI")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "ATLAS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive shell
    Shell {
        /// Graph file to load first
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Count nodes per kind and edges per relationship type
    Summary {
        file: PathBuf,
    },
    /// Shortest directed path between two nodes
    Path {
        file: PathBuf,
        source: String,
        target: String,

        /// Only follow edges of this relationship type
        #[arg(long)]
        via: Option<String>,
    },
    /// Report cross-reference problems
    Check {
        file: PathBuf,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = load_config(&cli)?;
    init_logging(&cli, &config)?;

    match cli.command {
        Commands::Shell { file } => run_shell(config, file, cli.format),
        Commands::Summary { file } => run_summary(&file, cli.format),
        Commands::Path { file, source, target, via } => {
            run_path(&file, &source, &target, via, cli.format)
        }
        Commands::Check { file } => run_check(&file, cli.format),
    }
}

fn load_config(cli: &Cli) -> CliResult<AtlasConfig> {
    match &cli.config {
        Some(path) => Ok(AtlasConfig::from_file(path)?),
        None => Ok(AtlasConfig::default()),
    }
}

fn init_logging(cli: &Cli, config: &AtlasConfig) -> CliResult<()> {
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = LevelFilter::from_str(level)
        .map_err(|_| format!("invalid log level '{}'", level))?;

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run_summary(file: &Path, format: OutputFormat) -> CliResult<()> {
    let store = query::load_from_file(file)?;
    let summary = query::summarize(&store);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => print_summary(&summary),
    }
    Ok(())
}

fn print_summary(summary: &GraphSummary) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["kind", "count", "ids"]);
    for (kind, ids) in &summary.nodes {
        table.add_row(vec![kind.to_string(), ids.len().to_string(), join_ids(ids)]);
    }
    println!("{}", table);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["relationship_type", "count"]);
    for (edge_type, count) in &summary.relationship_types {
        table.add_row(vec![edge_type.to_string(), count.to_string()]);
    }
    println!("{}", table);
    println!("{} node(s), {} edge(s)", summary.node_count(), summary.edge_count);
}

fn run_path(
    file: &Path,
    source: &str,
    target: &str,
    via: Option<String>,
    format: OutputFormat,
) -> CliResult<()> {
    let store = query::load_from_file(file)?;
    let (source, target) = (NodeId::new(source), NodeId::new(target));

    let nodes = match via {
        Some(edge_type) => {
            query::find_shortest_path_via(&store, &source, &target, &EdgeType::new(edge_type))?
        }
        None => query::find_shortest_path(&store, &source, &target)?,
    };

    render(&CommandOutput::Path { nodes }, format)
}

fn run_check(file: &Path, format: OutputFormat) -> CliResult<()> {
    let store = query::load_from_file(file)?;
    let violations = store.check_invariants();
    let count = violations.len();

    render(&CommandOutput::Violations { violations }, format)?;
    if count > 0 {
        return Err(format!("{} invariant violation(s)", count).into());
    }
    Ok(())
}

fn run_shell(config: AtlasConfig, file: Option<PathBuf>, format: OutputFormat) -> CliResult<()> {
    let store = match &file {
        Some(path) => query::load_from_file(path)?,
        None => GraphStore::new(),
    };
    let mut session = Session::with_store(store, config);
    let prompt = session.config().shell.prompt.clone();

    println!("ATLAS Interactive Shell v{}", atlas_network::version());
    println!("Type 'help' for commands, 'exit' to quit.\n");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        eprint!("{}", prompt);
        std::io::stderr().flush()?;

        let Some(line) = lines.next() else {
            break; // EOF
        };

        match session.execute_line(&line?) {
            Ok(Some(output)) => {
                if output.is_exit() {
                    break;
                }
                if let Err(e) = render(&output, format) {
                    eprintln!("Error: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    println!("Bye!");
    Ok(())
}

fn render(output: &CommandOutput, format: OutputFormat) -> CliResult<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    match output {
        CommandOutput::NodeIds { kind, ids } => {
            table.set_header(vec![format!("{} id", kind)]);
            for id in ids {
                table.add_row(vec![id.to_string()]);
            }
        }
        CommandOutput::Node { id, fields } => {
            table.set_header(vec![id.to_string(), String::new()]);
            for (key, value) in fields {
                table.add_row(vec![key.clone(), format_table_value(value)]);
            }
        }
        CommandOutput::Relationships { edges, .. } => {
            table.set_header(vec!["source", "target", "relationship_type", "properties"]);
            for edge in edges {
                let mut attributes = edge.attributes.clone();
                let edge_type = attributes
                    .shift_remove("relationship_type")
                    .map(|v| format_table_value(&v))
                    .unwrap_or_default();
                table.add_row(vec![
                    edge.source.to_string(),
                    edge.target.to_string(),
                    edge_type,
                    format_table_value(&PropertyValue::Map(attributes)),
                ]);
            }
        }
        CommandOutput::EdgeAttributes { attributes, .. } => {
            table.set_header(vec!["attribute", "value"]);
            for (key, value) in attributes {
                table.add_row(vec![key.clone(), format_table_value(value)]);
            }
        }
        CommandOutput::Violations { violations } if !violations.is_empty() => {
            table.set_header(vec!["violation"]);
            for violation in violations {
                table.add_row(vec![violation.to_string()]);
            }
        }
        other => {
            println!("{}", other);
            return Ok(());
        }
    }

    println!("{}", table);
    Ok(())
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(", ")
}

fn format_table_value(v: &PropertyValue) -> String {
    match v {
        PropertyValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
