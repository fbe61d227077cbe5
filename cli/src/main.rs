//! kgeval CLI: ground truth and retrieval scoring for knowledge-graph benchmarks
//!
//! Loads a serialized graph, runs the configured scenario catalog and scores
//! retrieved id sets taken from benchmark reports or a JSON export.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use kgeval::{
    CatalogOutcome, EvaluationConfig, EvaluationReport, GraphStore, JsonRetrievedSets,
    MarkdownReports, PatternQueryEngine, RetrievedSetSource,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "kgeval", version, about = "Knowledge-graph benchmark evaluation")]
struct Cli {
    /// YAML config (scenarios, code attribute, extraction rules)
    #[arg(long, global = true, env = "KGEVAL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ground truth of every scenario
    GroundTruth {
        /// Serialized graph JSON
        #[arg(long)]
        graph: PathBuf,
    },
    /// Score retrieved sets against the ground truth
    Evaluate {
        /// Serialized graph JSON
        #[arg(long)]
        graph: PathBuf,

        /// Markdown benchmark report; later reports override earlier ones
        #[arg(long, required_unless_present = "retrieved", conflicts_with = "retrieved")]
        report: Vec<PathBuf>,

        /// JSON file of scenario -> method -> codes
        #[arg(long)]
        retrieved: Option<PathBuf>,
    },
    /// Node and edge counts of a graph
    Stats {
        /// Serialized graph JSON
        #[arg(long)]
        graph: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::GroundTruth { graph } => run_ground_truth(&config, graph, &cli.format),
        Commands::Evaluate {
            graph,
            report,
            retrieved,
        } => run_evaluate(&config, graph, report, retrieved.as_deref(), &cli.format),
        Commands::Stats { graph } => run_stats(&config, graph, &cli.format),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EvaluationConfig> {
    match path {
        Some(path) => EvaluationConfig::load(path).context("Failed to load config"),
        None => Ok(EvaluationConfig::default()),
    }
}

fn open_graph(config: &EvaluationConfig, path: &Path) -> anyhow::Result<GraphStore> {
    GraphStore::open(path, &config.store)
        .with_context(|| format!("Failed to load graph {}", path.display()))
}

fn run_ground_truth(
    config: &EvaluationConfig,
    graph: &Path,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let store = open_graph(config, graph)?;
    let outcome = PatternQueryEngine::new(&store).run_catalog(&config.scenarios);

    match format {
        OutputFormat::Json => {
            let failures: serde_json::Map<String, serde_json::Value> = outcome
                .failures
                .iter()
                .map(|(scenario, e)| (scenario.clone(), e.to_string().into()))
                .collect();
            let json = serde_json::json!({
                "truths": outcome.truths,
                "failures": failures,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Csv => {
            println!("Scenario,Code");
            for (scenario, truth) in &outcome.truths {
                for code in truth {
                    println!("{},{}", csv_field(scenario), csv_field(code));
                }
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Scenario", "Size", "Codes"]);
            for (scenario, truth) in &outcome.truths {
                let codes: Vec<&str> = truth.iter().map(String::as_str).collect();
                table.add_row(vec![
                    scenario.clone(),
                    truth.len().to_string(),
                    codes.join(", "),
                ]);
            }
            println!("{}", table);
        }
    }

    print_failures(&outcome, format);
    Ok(())
}

fn run_evaluate(
    config: &EvaluationConfig,
    graph: &Path,
    reports: &[PathBuf],
    retrieved: Option<&Path>,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let store = open_graph(config, graph)?;

    let sets = match retrieved {
        Some(path) => JsonRetrievedSets::new(path).retrieved_sets(),
        None if !reports.is_empty() => {
            MarkdownReports::new(&config.extraction, reports.to_vec())?.retrieved_sets()
        }
        None => bail!("either --report or --retrieved is required"),
    }
    .context("Failed to read retrieved sets")?;

    let outcome = PatternQueryEngine::new(&store).run_catalog(&config.scenarios);
    let report = EvaluationReport::assemble(&outcome.truths, &sets).with_failures(&outcome.failures);
    info!(rows = report.len(), "evaluation complete");

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "rows": report.rows,
                "summary": report.method_summary(),
                "failures": report.failures,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Csv => {
            print!("{}", report.to_csv());
        }
        OutputFormat::Table => {
            if report.is_empty() {
                println!("(no scenarios to score)");
            } else {
                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(EvaluationReport::COLUMNS.to_vec());
                for row in &report.rows {
                    table.add_row(vec![
                        row.scenario.clone(),
                        row.method.clone(),
                        format!("{:.2}", row.precision),
                        format!("{:.2}", row.recall),
                        format!("{:.2}", row.f1),
                        row.retrieved_count.to_string(),
                        row.true_count.to_string(),
                    ]);
                }
                println!("{}", table);

                let mut summary = Table::new();
                summary.set_header(vec!["Method", "Scenarios", "Precision", "Recall", "F1"]);
                for method in report.method_summary() {
                    summary.add_row(vec![
                        method.method,
                        method.scenarios.to_string(),
                        format!("{:.2}", method.mean_precision),
                        format!("{:.2}", method.mean_recall),
                        format!("{:.2}", method.mean_f1),
                    ]);
                }
                println!("{}", summary);
            }
        }
    }

    print_failures(&outcome, format);
    Ok(())
}

fn run_stats(config: &EvaluationConfig, graph: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let store = open_graph(config, graph)?;
    let stats = store.statistics();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Csv => {
            println!("Kind,Name,Count");
            for (label, count) in &stats.nodes_by_label {
                println!("node,{},{}", label, count);
            }
            for (relation, count) in &stats.edges_by_relation {
                println!("edge,{},{}", relation, count);
            }
        }
        OutputFormat::Table => {
            println!("Nodes: {}", stats.node_count);
            println!("Edges: {}", stats.edge_count);

            let mut table = Table::new();
            table.set_header(vec!["Kind", "Name", "Count"]);
            for (label, count) in &stats.nodes_by_label {
                table.add_row(vec!["node".to_string(), label.to_string(), count.to_string()]);
            }
            for (relation, count) in &stats.edges_by_relation {
                table.add_row(vec!["edge".to_string(), relation.to_string(), count.to_string()]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

/// Failures go to stderr so table and CSV output stay machine-readable
fn print_failures(outcome: &CatalogOutcome, format: &OutputFormat) {
    if matches!(format, OutputFormat::Json) {
        return;
    }
    for (scenario, e) in &outcome.failures {
        eprintln!("Scenario '{}' failed: {}", scenario, e);
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
