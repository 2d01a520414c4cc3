use std::path::PathBuf;

use clap::Args;

use crate::binning::consensus::{resolve_and_split, ConsensusReport, ResolveOptions};
use crate::cli::OutputFormat;
use crate::parsing::fasta::DEFAULT_LINE_WIDTH;

#[derive(Args)]
pub struct MergeBinsArgs {
    /// Cluster assignments per fragment (CSV with contig_id,cluster_id header)
    #[arg(required = true)]
    pub clusters: PathBuf,

    /// Original, unfragmented assembly
    #[arg(required = true)]
    pub assembly: PathBuf,

    /// Directory for bin.<label>.fa and unbinned.fa
    #[arg(long, required = true)]
    pub output_dir: PathBuf,

    /// Also write the merged contig_id,cluster_id table here
    #[arg(long)]
    pub merged_csv: Option<PathBuf>,

    /// Bases per FASTA line (0 writes each sequence on one line)
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub line_width: usize,
}

/// Execute merge-bins subcommand
///
/// # Errors
///
/// Returns an error if the assignments are malformed, a label is unusable as
/// a file name, or the bins cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MergeBinsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let options = ResolveOptions {
        line_width: args.line_width,
        merged_csv: args.merged_csv.clone(),
    };

    let report = resolve_and_split(&args.clusters, &args.assembly, &args.output_dir, &options)?;

    if verbose {
        eprintln!(
            "Resolved {} contigs to {} bins",
            report.mapping.len(),
            report.mapping.labels().len()
        );
    }

    match format {
        OutputFormat::Text => print_text_report(&args, &report),
        OutputFormat::Json => print_json_report(&args, &report)?,
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    Ok(())
}

fn print_text_report(args: &MergeBinsArgs, report: &ConsensusReport) {
    println!("Merge Results");
    println!("{}", "=".repeat(60));
    println!("  Contigs binned: {}", report.contigs_binned);
    println!("  Contigs unbinned: {}", report.contigs_unbinned);
    println!("  Contigs without consensus: {}", report.ambiguous.len());
    if report.assignment_only > 0 {
        println!(
            "  Assigned contigs missing from assembly: {}",
            report.assignment_only
        );
    }

    println!("\nFiles in {}:", args.output_dir.display());
    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("  {name}: {} contigs, {} bp", file.contigs, file.bases);
    }
}

fn print_json_report(args: &MergeBinsArgs, report: &ConsensusReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "output_dir": args.output_dir.display().to_string(),
        "report": report,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &ConsensusReport) {
    println!("file\tlabel\tcontigs\tbases");
    for file in &report.files {
        println!(
            "{}\t{}\t{}\t{}",
            file.path.display(),
            file.label.as_deref().unwrap_or("unbinned"),
            file.contigs,
            file.bases,
        );
    }
}
