//! prettyparse - Extract hits from *.pretty reports into a flat table
//!
//! Writes one tab-separated row per hit section that carries both a Blastx
//! evalue and a query name. The table feeds `hitmatrix --input`.
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use hitmatrix::hit_table::write_hit_table;
use hitmatrix::pipeline::{collect_hits, CollectOptions};

#[derive(Parser)]
#[clap(
    name = "prettyparse",
    about = "Parse *.pretty files and extract blast hit information"
)]
struct Args {
    /// Folder containing the *.pretty report files
    #[clap(short = 'd', long = "data-folder", default_value = "data")]
    data_folder: PathBuf,

    /// Output TSV file
    #[clap(short = 'o', long = "output-file", default_value = "parsed_results.tsv")]
    output_file: PathBuf,

    /// Abort on the first unreadable report instead of skipping it
    #[clap(long = "strict")]
    strict: bool,

    /// Quiet mode (warnings and errors only)
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let report = collect_hits(
        &args.data_folder,
        CollectOptions {
            strict: args.strict,
        },
    )?;

    write_hit_table(&args.output_file, &report.records)
        .with_context(|| format!("Failed to write {}", args.output_file.display()))?;

    log::info!("Results written to {}", args.output_file.display());
    if !report.skipped.is_empty() {
        log::warn!(
            "{} of {} files were skipped",
            report.skipped.len(),
            report.files.len()
        );
    }

    Ok(())
}
