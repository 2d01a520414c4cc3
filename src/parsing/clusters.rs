use std::path::Path;

use crate::core::types::ClusterAssignment;
use crate::parsing::ParseError;

const FRAGMENT_COLUMN: &str = "contig_id";
const LABEL_COLUMN: &str = "cluster_id";

/// Parse a cluster-assignment CSV file with a `contig_id,cluster_id` header
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_clusters_file(path: &Path) -> Result<Vec<ClusterAssignment>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_clusters_text(&content)
}

/// Parse cluster-assignment CSV text.
///
/// The first non-empty, non-comment line is the header and must name both
/// `contig_id` and `cluster_id` (case-insensitive, any order). Extra columns
/// are ignored. Rows keep their input order.
///
/// # Errors
///
/// Returns `ParseError::MissingColumn` if the header lacks a required column,
/// or `ParseError::InvalidFormat` if a row is too short or has an empty field.
pub fn parse_clusters_text(text: &str) -> Result<Vec<ClusterAssignment>, ParseError> {
    let mut assignments = Vec::new();
    let mut columns: Option<(usize, usize)> = None;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let Some((id_col, label_col)) = columns else {
            columns = Some(header_columns(&fields)?);
            continue;
        };

        let line_num = i + 1;
        let width = id_col.max(label_col) + 1;
        if fields.len() < width {
            return Err(ParseError::InvalidFormat(format!(
                "Cluster line {line_num} has {} fields, expected at least {width}",
                fields.len()
            )));
        }

        let (fragment_id, label) = (fields[id_col], fields[label_col]);
        if fragment_id.is_empty() || label.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Cluster line {line_num} has an empty contig or cluster id"
            )));
        }

        assignments.push(ClusterAssignment::new(fragment_id, label));
    }

    if columns.is_none() {
        return Err(ParseError::MissingColumn(format!(
            "{FRAGMENT_COLUMN}, {LABEL_COLUMN} (no header line found)"
        )));
    }

    Ok(assignments)
}

/// Locate the fragment-id and label columns in a header row
fn header_columns(fields: &[&str]) -> Result<(usize, usize), ParseError> {
    let find = |name: &str| {
        fields
            .iter()
            .position(|f| f.eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
    };

    Ok((find(FRAGMENT_COLUMN)?, find(LABEL_COLUMN)?))
}
