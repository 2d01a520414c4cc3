use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::binning::fragmenter::create_output;
use crate::core::error::EngineError;
use crate::core::types::CoordinateRecord;
use crate::parsing::coords::parse_coords_file;
use crate::parsing::coverage::{parse_coverage_file, CoverageSums};
use crate::parsing::ParseError;

/// Prefix of every depth column in the coverage table
pub const COLUMN_PREFIX: &str = "cov_mean_sample_";

/// Mean depth of one fragment in each sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub fragment_id: String,
    pub mean_depths: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    /// Rows written, one per fragment
    pub fragments: usize,
    /// Sample labels, in column order
    pub samples: Vec<String>,
}

/// Mean depth over a half-open interval.
///
/// # Errors
///
/// Returns `EngineError::ZeroLengthInterval` if `end <= start`.
pub fn mean_depth(fragment_id: &str, start: u64, end: u64, sum: f64) -> Result<f64, EngineError> {
    if end <= start {
        return Err(EngineError::ZeroLengthInterval {
            fragment_id: fragment_id.to_string(),
            start,
            end,
        });
    }

    #[allow(clippy::cast_precision_loss)] // fragment lengths are far below 2^52
    let length = (end - start) as f64;
    Ok(sum / length)
}

/// Join coordinate records with depth sums and divide by interval length.
///
/// Rows come out in coordinate-table order. Every fragment in `coords` must
/// have exactly one sums row over the same interval, and every sums row must
/// name a known fragment.
///
/// # Errors
///
/// Returns `EngineError::Format` if the inputs disagree (unknown, missing or
/// duplicate fragments, mismatched intervals, wrong number of sample names),
/// or `EngineError::ZeroLengthInterval` for an empty interval.
pub fn compute_coverage_rows(
    coords: &[CoordinateRecord],
    sums: &[CoverageSums],
    sample_names: &[String],
) -> Result<Vec<CoverageRow>, EngineError> {
    let mut by_fragment: HashMap<&str, &CoverageSums> = HashMap::with_capacity(sums.len());

    for row in sums {
        if row.sums.len() != sample_names.len() {
            return Err(ParseError::InvalidFormat(format!(
                "Coverage row for '{}' has {} sample columns but {} sample names were given",
                row.fragment_id,
                row.sums.len(),
                sample_names.len()
            ))
            .into());
        }
        if by_fragment.insert(row.fragment_id.as_str(), row).is_some() {
            return Err(ParseError::InvalidFormat(format!(
                "Duplicate coverage row for fragment '{}'",
                row.fragment_id
            ))
            .into());
        }
    }

    let mut rows = Vec::with_capacity(coords.len());
    for record in coords {
        let sums_row = by_fragment
            .remove(record.fragment_id.as_str())
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "No coverage row for fragment '{}'",
                    record.fragment_id
                ))
            })?;

        if (sums_row.start, sums_row.end) != (record.start, record.end) {
            return Err(ParseError::InvalidFormat(format!(
                "Coverage interval [{}, {}) for '{}' does not match coordinate interval [{}, {})",
                sums_row.start, sums_row.end, record.fragment_id, record.start, record.end
            ))
            .into());
        }

        let mean_depths = sums_row
            .sums
            .iter()
            .map(|&sum| mean_depth(&record.fragment_id, record.start, record.end, sum))
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(CoverageRow {
            fragment_id: record.fragment_id.clone(),
            mean_depths,
        });
    }

    if let Some(unknown) = by_fragment.keys().next() {
        return Err(ParseError::InvalidFormat(format!(
            "Coverage row for fragment '{unknown}' is not in the coordinate table"
        ))
        .into());
    }

    Ok(rows)
}

/// Write the coverage table: a `contig` column, then one
/// `cov_mean_sample_<name>` column per sample, 3 decimal places.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_coverage_table<W: Write>(
    writer: &mut W,
    sample_names: &[String],
    rows: &[CoverageRow],
) -> io::Result<()> {
    write!(writer, "contig")?;
    for name in sample_names {
        write!(writer, "\t{COLUMN_PREFIX}{name}")?;
    }
    writeln!(writer)?;

    for row in rows {
        write!(writer, "{}", row.fragment_id)?;
        for depth in &row.mean_depths {
            write!(writer, "\t{depth:.3}")?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Build the per-fragment mean depth table from a coordinate table and an
/// interval coverage file.
///
/// # Errors
///
/// Returns `EngineError::Format` for unreadable or inconsistent inputs,
/// `EngineError::ZeroLengthInterval` for an empty interval, or
/// `EngineError::Io` if the output cannot be written. Nothing is written
/// unless every row is valid.
pub fn build_coverage_table(
    coords_path: &Path,
    sums_path: &Path,
    sample_names: &[String],
    output_path: &Path,
) -> Result<CoverageReport, EngineError> {
    let coords = parse_coords_file(coords_path)?;
    let sums = parse_coverage_file(sums_path)?;
    debug!(
        "Read {} coordinate rows and {} coverage rows",
        coords.len(),
        sums.len()
    );

    let rows = compute_coverage_rows(&coords, &sums, sample_names)?;

    let mut out = create_output(output_path)?;
    write_coverage_table(&mut out, sample_names, &rows)?;
    out.flush()?;

    info!(
        "Wrote mean depth for {} fragments across {} samples",
        rows.len(),
        sample_names.len()
    );

    Ok(CoverageReport {
        fragments: rows.len(),
        samples: sample_names.to_vec(),
    })
}
