use std::path::PathBuf;

use clap::Args;

use crate::binning::fragmenter::{fragment, FragmentReport};
use crate::cli::OutputFormat;
use crate::core::types::WindowConfig;
use crate::parsing::fasta::{is_fasta_file, DEFAULT_LINE_WIDTH};

#[derive(Args)]
pub struct CutUpArgs {
    /// Input assemblies (FASTA, optionally gzip/bgzip compressed)
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Window size in bases
    #[arg(short = 'c', long, default_value = "10000")]
    pub chunk_size: usize,

    /// Overlap between consecutive windows in bases (must be > 0 and < chunk size)
    #[arg(short = 'o', long, default_value = "100")]
    pub overlap_size: usize,

    /// Output FASTA of fragments
    #[arg(long, required = true)]
    pub fragments: PathBuf,

    /// Output coordinate table (parent, start, end, fragment id)
    #[arg(long, visible_alias = "bed", required = true)]
    pub coords: PathBuf,

    /// Bases per FASTA line (0 writes each sequence on one line)
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub line_width: usize,
}

/// Execute cut-up subcommand
///
/// # Errors
///
/// Returns an error if the window parameters are invalid or an input cannot
/// be fragmented.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CutUpArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    // Validate before touching any input
    let config = WindowConfig::new(args.chunk_size, args.overlap_size)?;

    for input in &args.inputs {
        if !is_fasta_file(input) {
            tracing::warn!(
                "{} does not have a FASTA extension, reading it as FASTA anyway",
                input.display()
            );
        }
    }

    if verbose {
        eprintln!(
            "Cutting {} input file(s) into {} bp windows ({} bp overlap)",
            args.inputs.len(),
            config.window_size(),
            config.overlap_size()
        );
    }

    let report = fragment(
        &args.inputs,
        config,
        args.line_width,
        &args.fragments,
        &args.coords,
    )?;

    match format {
        OutputFormat::Text => print_text_report(&args, &report),
        OutputFormat::Json => print_json_report(&args, &config, &report)?,
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    Ok(())
}

fn print_text_report(args: &CutUpArgs, report: &FragmentReport) {
    println!("Cut-up Results");
    println!("{}", "=".repeat(60));
    println!("  Contigs read: {}", report.contigs_read);
    println!("  Contigs split: {}", report.contigs_split);
    if report.contigs_skipped > 0 {
        println!("  Empty contigs skipped: {}", report.contigs_skipped);
    }
    println!("  Fragments written: {}", report.fragments_written);
    println!("  Total bases: {}", report.total_bases);
    println!("\nFragments: {}", args.fragments.display());
    println!("Coordinates: {}", args.coords.display());
}

fn print_json_report(
    args: &CutUpArgs,
    config: &WindowConfig,
    report: &FragmentReport,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "window": config,
        "fragments_path": args.fragments.display().to_string(),
        "coords_path": args.coords.display().to_string(),
        "report": report,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &FragmentReport) {
    println!("contigs_read\tcontigs_split\tcontigs_skipped\tfragments_written\ttotal_bases");
    println!(
        "{}\t{}\t{}\t{}\t{}",
        report.contigs_read,
        report.contigs_split,
        report.contigs_skipped,
        report.fragments_written,
        report.total_bases,
    );
}
