//! Readers and writers for the files exchanged with external binning tools.
//!
//! This module provides parsers for:
//!
//! - **FASTA files**: Assemblies in, fragments and bins out (plain or gzip/bgzip)
//! - **Coordinate tables**: BED-like `parent, start, end, fragment_id` rows
//! - **Coverage sums**: Per-interval depth sums from an interval coverage tool
//! - **Cluster assignments**: `contig_id,cluster_id` CSV written by the binner
//!
//! ## Example
//!
//! ```rust,no_run
//! use contig_consensus::parsing::clusters::parse_clusters_text;
//!
//! let csv = "contig_id,cluster_id\nc1.concoct_part_0,3\nc1.concoct_part_1,3\n";
//! let assignments = parse_clusters_text(csv).unwrap();
//! assert_eq!(assignments.len(), 2);
//! ```
//!
//! ## Column Layouts
//!
//! | File         | Columns                                         | Header |
//! |--------------|-------------------------------------------------|--------|
//! | coordinates  | parent, start, end, fragment_id                 | No     |
//! | coverage     | parent, start, end, fragment_id, sum_1 [, ...]  | No     |
//! | clusters     | contig_id, cluster_id                           | Yes    |

use thiserror::Error;

pub mod clusters;
pub mod coords;
pub mod coverage;
pub mod fasta;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("noodles error: {0}")]
    Noodles(String),
}
