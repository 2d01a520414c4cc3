use std::io::{self, Write};
use std::path::Path;

use crate::core::types::CoordinateRecord;
use crate::parsing::ParseError;

/// Parse a coordinate table file: `parent, start, end, fragment_id`, tab-separated
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_coords_file(path: &Path) -> Result<Vec<CoordinateRecord>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_coords_text(&content)
}

/// Parse coordinate table text.
///
/// Blank lines and `#` comments are skipped. There is no header row.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has fewer than 4 fields,
/// non-integer offsets, or `start > end`.
pub fn parse_coords_text(text: &str) -> Result<Vec<CoordinateRecord>, ParseError> {
    let mut records = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < 4 {
            return Err(ParseError::InvalidFormat(format!(
                "Coordinate line {line_num} has fewer than 4 fields"
            )));
        }

        let start = parse_offset(fields[1], "start", line_num)?;
        let end = parse_offset(fields[2], "end", line_num)?;
        if start > end {
            return Err(ParseError::InvalidFormat(format!(
                "Coordinate line {line_num} has start {start} after end {end}"
            )));
        }

        records.push(CoordinateRecord {
            parent_contig_id: fields[0].trim().to_string(),
            start,
            end,
            fragment_id: fields[3].trim().to_string(),
        });
    }

    Ok(records)
}

pub(crate) fn parse_offset(field: &str, column: &str, line_num: usize) -> Result<u64, ParseError> {
    field.trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "Invalid {column} on line {line_num}: '{field}'"
        ))
    })
}

/// Write one coordinate row
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_coord_record<W: Write>(writer: &mut W, record: &CoordinateRecord) -> io::Result<()> {
    writeln!(
        writer,
        "{}\t{}\t{}\t{}",
        record.parent_contig_id, record.start, record.end, record.fragment_id
    )
}
