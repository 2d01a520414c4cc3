//! Core data types for contig fragmentation and bin consensus.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Contig`](contig::Contig): An assembled sequence with its record name
//! - [`FragmentId`](fragment_id::FragmentId): Encode/decode pair for window ids
//! - [`WindowConfig`](types::WindowConfig): Validated window and overlap sizes
//! - [`CoordinateRecord`](types::CoordinateRecord): Where a fragment sits in its parent
//! - [`ClusterLabel`](types::ClusterLabel), [`ClusterAssignment`](types::ClusterAssignment):
//!   Binner output
//! - [`EngineError`](error::EngineError): Fatal error taxonomy
//!
//! ## Fragment Naming
//!
//! Every window written by the fragmenter is named after its parent:
//!
//! | Parent   | Window | Fragment id               |
//! |----------|--------|---------------------------|
//! | k141_7   | 0      | k141_7.concoct_part_0     |
//! | k141_7   | 1      | k141_7.concoct_part_1     |
//!
//! Ids without the suffix are accepted wherever fragment ids are read and
//! treated as an unsplit contig.

pub mod contig;
pub mod error;
pub mod fragment_id;
pub mod types;
