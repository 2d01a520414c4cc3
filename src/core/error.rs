use thiserror::Error;

use crate::parsing::ParseError;

/// Fatal errors raised by the fragmenter, coverage table builder and
/// consensus resolver.
///
/// Ambiguous consensus votes are not errors; they are reported through
/// [`crate::binning::consensus::AmbiguousConsensus`].
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Format(#[from] ParseError),

    #[error("Zero-length interval for fragment '{fragment_id}': [{start}, {end})")]
    ZeroLengthInterval {
        fragment_id: String,
        start: u64,
        end: u64,
    },

    #[error("Cluster label '{label}' cannot be used as a bin file name: {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
