//! Command-line interface for contig-consensus.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **cut-up**: Cut assembly contigs into overlapping windows
//! - **coverage-table**: Build a per-fragment mean depth table
//! - **merge-bins**: Vote a bin per original contig and write one FASTA per bin
//!
//! ## Usage
//!
//! ```text
//! # Cut contigs into 10 kb windows
//! contig-consensus cut-up assembly.fa -c 10000 -o 100 \
//!     --fragments contigs_10K.fa --coords contigs_10K.bed
//!
//! # Mean depth per fragment from samtools bedcov sums
//! samtools bedcov contigs_10K.bed s1.bam s2.bam > bedcov.tsv
//! contig-consensus coverage-table contigs_10K.bed bedcov.tsv \
//!     --alignment s1.bam --alignment s2.bam --output coverage_table.tsv
//!
//! # Merge fragment clusters back onto contigs and write bins
//! contig-consensus merge-bins clustering_gt1000.csv assembly.fa --output-dir bins
//! ```

use clap::{Parser, Subcommand};

pub mod coverage_table;
pub mod cut_up;
pub mod merge_bins;

#[derive(Parser)]
#[command(name = "contig-consensus")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Cut contigs into windows for binning and merge window bins back onto contigs")]
#[command(
    long_about = "contig-consensus prepares assemblies for binners that expect short, evenly sized contigs and reconciles their output.\n\nIt provides:\n- Overlapping windows over long contigs, with a coordinate table\n- A mean depth table per window from interval coverage sums\n- A majority-vote bin per original contig, and one FASTA per bin"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Summary output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cut contigs into overlapping fixed-size windows
    CutUp(cut_up::CutUpArgs),

    /// Build a mean depth table from interval coverage sums
    CoverageTable(coverage_table::CoverageTableArgs),

    /// Merge per-fragment clusters onto contigs and write bin FASTA files
    MergeBins(merge_bins::MergeBinsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
