use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use hitmatrix::hit_matrix::MatrixSummary;
use hitmatrix::hit_table::{read_hit_table, write_hit_table};
use hitmatrix::pipeline::{build_matrix, collect_hits, CollectOptions};
use hitmatrix::scanner::scan_pretty_files;
use hitmatrix::target_name::CanonicalTargetSet;
use hitmatrix::{HitError, HitRecord, TableFormat};

/// hitmatrix - Count hits of each query against each genome
///
/// Parses the *.pretty reports in a data folder (or a table written by
/// prettyparse) and writes a query-by-genome hit count matrix. Genomes
/// without any hit still get a column.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Folder containing the *.pretty report files
    #[clap(short = 'd', long = "data-folder", default_value = "data")]
    data_folder: PathBuf,

    /// Parsed hit table from prettyparse; reports are parsed directly if omitted
    #[clap(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Output matrix file
    #[clap(short = 'o', long = "output", default_value = "hit_matrix.tsv")]
    output: PathBuf,

    /// Output format
    #[clap(short = 'f', long = "format", value_enum, default_value = "tsv")]
    format: TableFormat,

    /// Also write the parsed hit table here
    #[clap(long = "records-out", conflicts_with = "input")]
    records_out: Option<PathBuf>,

    /// Number of top queries and genomes shown in the summary
    #[clap(short = 's', long = "summary", default_value = "10")]
    summary: usize,

    /// Skip printing the matrix summary
    #[clap(long = "no-summary")]
    no_summary: bool,

    /// Abort on the first unreadable report instead of skipping it
    #[clap(long = "strict", conflicts_with = "input")]
    strict: bool,

    /// Quiet mode (warnings and errors only)
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Hits and genome universe from either the reports or a parsed table
fn load_hits(args: &Args) -> Result<(Vec<HitRecord>, CanonicalTargetSet)> {
    match args.input {
        Some(ref table) => {
            if !table.exists() {
                anyhow::bail!("Input file '{}' does not exist", table.display());
            }
            let records = read_hit_table(table)
                .with_context(|| format!("Failed to read hit table {}", table.display()))?;

            let scan = scan_pretty_files(&args.data_folder)?;
            if scan.is_empty() {
                return Err(HitError::NoPrettyFiles(scan.dir).into());
            }
            Ok((records, CanonicalTargetSet::from_paths(&scan.files)))
        }
        None => {
            let options = CollectOptions {
                strict: args.strict,
            };
            let report = collect_hits(&args.data_folder, options)?;
            if let Some(ref path) = args.records_out {
                write_hit_table(path, &report.records)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                log::info!("Hit table written to {}", path.display());
            }
            let canonical = report.canonical_targets();
            Ok((report.records, canonical))
        }
    }
}

fn print_summary(summary: &MatrixSummary) {
    println!("\n=== Matrix Summary ===");
    println!(
        "Matrix dimensions: {} Query IDs x {} Targets",
        summary.num_queries, summary.num_targets
    );
    println!("Total hits in matrix: {}", summary.total_hits);
    println!("Non-zero entries: {}", summary.non_zero_entries);
    println!("Matrix density: {:.2}%", summary.density * 100.0);

    println!("\nTop {} Query IDs by total hits:", summary.top_queries.len());
    for (i, (query, total)) in summary.top_queries.iter().enumerate() {
        println!("  {:2}. {query}: {total} hits", i + 1);
    }
    println!("\nTop {} Targets by total hits:", summary.top_targets.len());
    for (i, (target, total)) in summary.top_targets.iter().enumerate() {
        println!("  {:2}. {target}: {total} hits", i + 1);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet);

    let (records, canonical) = load_hits(&args)?;
    log::info!(
        "{} hits, {} genomes in {}",
        records.len(),
        canonical.len(),
        args.data_folder.display()
    );

    let build = build_matrix(&records, &canonical);
    build
        .matrix
        .write(&args.output, args.format)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Matrix saved to {}", args.output.display());

    if !args.no_summary {
        print_summary(&MatrixSummary::from_table(&build.matrix.to_table(), args.summary));
    }

    Ok(())
}
