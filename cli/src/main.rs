//! tfnet CLI: clinical annotation and TF-network analysis
//!
//! Reads an optional YAML config, applies command-line overrides and runs the
//! library pipeline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::{Path, PathBuf};
use tfnet::clinical::SampleAnnotation;
use tfnet::logging::init_tracing;
use tfnet::network::{describe, load_network, MEASURE_COUNT};
use tfnet::{AnalysisConfig, AnalysisContext, CountPolicy, Measure, Sample};
use tracing::info;

#[derive(Parser)]
#[command(name = "tfnet-cli", version, about = "CLL footprint TF-network analysis")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "TFNET_CONFIG")]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

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
    /// Annotate, describe and intersect all selected samples
    Run {
        /// Master graph node-link JSON output
        #[arg(long)]
        output: Option<PathBuf>,

        /// Description table CSV output
        #[arg(long)]
        descriptions: Option<PathBuf>,

        /// Contribution-count policy for the intersection
        #[arg(long, value_parser = parse_policy)]
        count_policy: Option<CountPolicy>,

        /// Load and describe samples in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Print clinical annotations of the manifest samples
    Annotate,
    /// Describe a single interaction TSV
    Describe {
        /// Network file
        network: PathBuf,
    },
}

fn parse_policy(s: &str) -> Result<CountPolicy, String> {
    match s {
        "legacy" => Ok(CountPolicy::Legacy),
        "symmetric" => Ok(CountPolicy::Symmetric),
        other => Err(format!("unknown count policy '{}' (legacy|symmetric)", other)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "info" });

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Run {
            output,
            descriptions,
            count_policy,
            parallel,
        } => {
            if let Some(path) = output {
                config.master_graph_output = path;
            }
            if descriptions.is_some() {
                config.description_output = descriptions;
            }
            if let Some(policy) = count_policy {
                config.count_policy = policy;
            }
            config.parallel_describe |= parallel;
            run_pipeline(config, &cli.format)
        }
        Commands::Annotate => run_annotate(config, &cli.format),
        Commands::Describe { network } => run_describe(&config, &network, &cli.format),
    }
}

fn run_pipeline(config: AnalysisConfig, format: &OutputFormat) -> Result<()> {
    let ctx = AnalysisContext::load(config).context("loading clinical annotation")?;
    let outcome = tfnet::run(&ctx).context("network analysis failed")?;
    info!(
        "Master graph written to {}",
        ctx.config.master_graph_output.display()
    );

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "samples": outcome.samples,
                "master": {
                    "nodes": outcome.master.node_count(),
                    "edges": outcome.master.edge_count(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => {
            let rows = outcome
                .samples
                .iter()
                .map(|s| vec![s.sample.clone(), s.nodes.to_string(), s.edges.to_string()])
                .collect();
            emit(format, &["sample", "nodes", "edges"], rows)?;
            if let OutputFormat::Table = format {
                println!(
                    "Master graph: {} nodes, {} edges",
                    outcome.master.node_count(),
                    outcome.master.edge_count()
                );
            }
        }
    }
    Ok(())
}

fn run_annotate(config: AnalysisConfig, format: &OutputFormat) -> Result<()> {
    let ctx = AnalysisContext::load(config).context("loading clinical annotation")?;
    let samples = ctx.annotated_samples().context("annotating samples")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&samples)?),
        _ => {
            let rows = samples.iter().map(annotation_row).collect();
            emit(
                format,
                &[
                    "sample",
                    "label",
                    "patient",
                    "mutated",
                    "gender",
                    "diagnosis_collection",
                    "treatment_active",
                    "treatment_type",
                    "relapse",
                ],
                rows,
            )?;
        }
    }
    Ok(())
}

/// Name-derived columns read NA for names with too few fields
fn annotation_row(sample: &Sample) -> Vec<String> {
    let SampleAnnotation {
        mutated,
        gender,
        timeline,
        ..
    } = &sample.annotation;
    vec![
        sample.name.clone(),
        show(&sample.repr().ok()),
        show(&sample.patient_id().ok()),
        show(mutated),
        show(gender),
        show(&timeline.diagnosis_collection),
        show(&timeline.treatment_active),
        show(&timeline.treatment_type),
        show(&timeline.relapse),
    ]
}

fn run_describe(config: &AnalysisConfig, network: &Path, format: &OutputFormat) -> Result<()> {
    let graph = load_network(network)?;
    let description = describe(&graph, &config.centrality)
        .with_context(|| format!("describing {}", network.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&description)?),
        _ => {
            let mut header = vec!["TF"];
            header.extend(Measure::ALL.iter().map(Measure::name));
            let rows = description
                .nodes
                .iter()
                .zip(&description.values)
                .map(|(node, values)| {
                    let mut row = Vec::with_capacity(MEASURE_COUNT + 1);
                    row.push(node.clone());
                    row.extend(values.iter().map(|v| format!("{:.6}", v)));
                    row
                })
                .collect();
            emit(format, &header, rows)?;
        }
    }
    Ok(())
}

fn show<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "NA".to_string(), |v| v.to_string())
}

fn emit(format: &OutputFormat, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(std::io::stdout(), header, &rows)?,
        _ => {
            if rows.is_empty() {
                println!("(no results)");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(header);
            let count = rows.len();
            for row in rows {
                table.add_row(row);
            }
            println!("{}", table);
            println!("{} row(s)", count);
        }
    }
    Ok(())
}

fn write_csv<W: std::io::Write>(out: W, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
