use clap::Parser;
use tracing_subscriber::EnvFilter;

mod binning;
mod cli;
mod core;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("contig_consensus=debug,info")
    } else {
        EnvFilter::new("contig_consensus=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::CutUp(args) => {
            cli::cut_up::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::CoverageTable(args) => {
            cli::coverage_table::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::MergeBins(args) => {
            cli::merge_bins::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
