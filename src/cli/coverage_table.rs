use std::path::PathBuf;

use clap::Args;

use crate::binning::coverage::{build_coverage_table, CoverageReport};
use crate::cli::OutputFormat;
use crate::parsing::coverage::parse_sample_names_file;
use crate::utils::validation::sample_label_from_path;

#[derive(Args)]
pub struct CoverageTableArgs {
    /// Coordinate table written by cut-up
    #[arg(required = true)]
    pub coords: PathBuf,

    /// Interval depth sums for the coordinate table (e.g. `samtools bedcov` output)
    #[arg(required = true)]
    pub coverage: PathBuf,

    /// Alignment file for each depth column, in column order; names the column
    #[arg(long = "alignment")]
    pub alignments: Vec<PathBuf>,

    /// Sample name for each depth column, in column order
    #[arg(long = "sample", conflicts_with = "alignments")]
    pub samples: Vec<String>,

    /// File with one sample name per line; overrides --alignment names
    #[arg(long, conflicts_with = "samples")]
    pub sample_names: Option<PathBuf>,

    /// Output coverage table
    #[arg(long, required = true)]
    pub output: PathBuf,
}

/// Execute coverage-table subcommand
///
/// # Errors
///
/// Returns an error if no sample names are given or the inputs are
/// inconsistent.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CoverageTableArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let sample_names = resolve_sample_names(&args)?;

    if verbose {
        eprintln!("Sample columns: {}", sample_names.join(", "));
    }

    let report = build_coverage_table(&args.coords, &args.coverage, &sample_names, &args.output)?;

    match format {
        OutputFormat::Text => print_text_report(&args, &report),
        OutputFormat::Json => print_json_report(&args, &report)?,
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    Ok(())
}

fn resolve_sample_names(args: &CoverageTableArgs) -> anyhow::Result<Vec<String>> {
    let names = if let Some(path) = &args.sample_names {
        parse_sample_names_file(path)?
    } else if !args.samples.is_empty() {
        args.samples.clone()
    } else {
        args.alignments
            .iter()
            .map(|p| sample_label_from_path(p))
            .collect()
    };

    if names.is_empty() {
        anyhow::bail!("Provide sample names with --alignment, --sample or --sample-names");
    }

    Ok(names)
}

fn print_text_report(args: &CoverageTableArgs, report: &CoverageReport) {
    println!("Coverage Table Results");
    println!("{}", "=".repeat(60));
    println!("  Fragments: {}", report.fragments);
    println!("  Samples: {}", report.samples.join(", "));
    println!("\nTable: {}", args.output.display());
}

fn print_json_report(args: &CoverageTableArgs, report: &CoverageReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "output": args.output.display().to_string(),
        "report": report,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &CoverageReport) {
    println!("fragments\tsamples");
    println!("{}\t{}", report.fragments, report.samples.join(","));
}
