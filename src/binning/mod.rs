//! Fragmentation, coverage and consensus stages of a binning run.
//!
//! The three stages share no runtime state; they communicate through files:
//!
//! 1. [`fragmenter`] cuts an assembly into overlapping windows and writes a
//!    fragment FASTA plus a coordinate table.
//! 2. [`coverage`] turns interval depth sums for those windows into a
//!    mean-depth table for the binner.
//! 3. [`consensus`] votes a cluster label per original contig from the
//!    binner's per-fragment labels and splits the original assembly into one
//!    FASTA per bin, using [`bin_writer`] for the output files.

pub mod bin_writer;
pub mod consensus;
pub mod coverage;
pub mod fragmenter;
