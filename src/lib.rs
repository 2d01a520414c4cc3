//! # contig-consensus
//!
//! A library for preparing metagenomic assemblies for window-based binners and
//! reconciling their output with the original contigs.
//!
//! Binners such as CONCOCT work best on short, roughly uniform contigs, so long
//! contigs are cut into overlapping windows before binning. The binner then
//! labels each window independently, and windows of one contig may land in
//! different bins. `contig-consensus` handles both ends of that round trip.
//!
//! ## Features
//!
//! - **Windowing**: Fixed-size overlapping windows with the remainder folded
//!   into the last window
//! - **Coordinate table**: Where every window sits in its parent contig
//! - **Coverage table**: Mean depth per window and sample, from interval sums
//! - **Majority vote**: One bin per contig, ties broken by first-seen label
//! - **Bin splitting**: One FASTA per bin plus `unbinned.fa`, streamed from
//!   the original assembly
//!
//! ## Example
//!
//! ```rust,no_run
//! use contig_consensus::binning::consensus::resolve_consensus;
//! use contig_consensus::ClusterAssignment;
//!
//! let assignments = vec![
//!     ClusterAssignment::new("k141_7.concoct_part_0", "3"),
//!     ClusterAssignment::new("k141_7.concoct_part_1", "3"),
//!     ClusterAssignment::new("k141_7.concoct_part_2", "5"),
//! ];
//!
//! let (mapping, ambiguous) = resolve_consensus(&assignments).unwrap();
//! assert_eq!(mapping.get("k141_7").unwrap().as_str(), "3");
//! assert_eq!(ambiguous.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`binning`]: Fragmenter, coverage table builder and consensus resolver
//! - [`core`]: Core data types for contigs, fragments and cluster labels
//! - [`parsing`]: Readers and writers for FASTA, coordinate, coverage and cluster files
//! - [`cli`]: Command-line interface implementation

pub mod binning;
pub mod cli;
pub mod core;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use binning::consensus::{resolve_and_split, ConsensusMapping, ConsensusReport};
pub use binning::coverage::build_coverage_table;
pub use binning::fragmenter::fragment;
pub use core::contig::Contig;
pub use core::error::EngineError;
pub use core::fragment_id::FragmentId;
pub use core::types::*;
