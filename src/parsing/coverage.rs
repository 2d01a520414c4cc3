use std::path::Path;

use crate::parsing::coords::parse_offset;
use crate::parsing::ParseError;

/// Depth sums over one fragment interval, one value per alignment sample
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSums {
    pub parent_contig_id: String,
    pub start: u64,
    pub end: u64,
    pub fragment_id: String,
    pub sums: Vec<f64>,
}

/// Parse an interval coverage file (e.g. `samtools bedcov` output).
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_coverage_file(path: &Path) -> Result<Vec<CoverageSums>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_coverage_text(&content)
}

/// Parse interval coverage text with columns
/// `parent, start, end, fragment_id, sum_1 [, sum_2, ...]`.
///
/// Every row must carry the same number of sum columns.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has fewer than 5 fields,
/// offsets or sums fail to parse, a sum is negative or not finite, or the
/// sum column count changes between rows.
pub fn parse_coverage_text(text: &str) -> Result<Vec<CoverageSums>, ParseError> {
    let mut rows: Vec<CoverageSums> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let line_num = i + 1;
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < 5 {
            return Err(ParseError::InvalidFormat(format!(
                "Coverage line {line_num} has fewer than 5 fields"
            )));
        }

        let sums = fields[4..]
            .iter()
            .map(|field| parse_sum(field, line_num))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = rows.first() {
            if first.sums.len() != sums.len() {
                return Err(ParseError::InvalidFormat(format!(
                    "Coverage line {line_num} has {} sample columns, expected {}",
                    sums.len(),
                    first.sums.len()
                )));
            }
        }

        rows.push(CoverageSums {
            parent_contig_id: fields[0].trim().to_string(),
            start: parse_offset(fields[1], "start", line_num)?,
            end: parse_offset(fields[2], "end", line_num)?,
            fragment_id: fields[3].trim().to_string(),
            sums,
        });
    }

    Ok(rows)
}

/// Read sample labels from a file, one per line, skipping blank lines.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if it contains no names.
pub fn parse_sample_names_file(path: &Path) -> Result<Vec<String>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    let names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect();

    if names.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "No sample names found in {}",
            path.display()
        )));
    }

    Ok(names)
}

fn parse_sum(field: &str, line_num: usize) -> Result<f64, ParseError> {
    let value: f64 = field.trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "Invalid depth sum on line {line_num}: '{field}'"
        ))
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(ParseError::InvalidFormat(format!(
            "Depth sum on line {line_num} must be a non-negative number: '{field}'"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_sample() {
        let text = "c1\t0\t100\tc1.concoct_part_0\t300\n";
        let rows = parse_coverage_text(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fragment_id, "c1.concoct_part_0");
        assert_eq!(rows[0].sums, vec![300.0]);
    }

    #[test]
    fn test_parse_multi_sample() {
        let text = "c1\t0\t100\tc1.concoct_part_0\t300\t50\nc1\t80\t250\tc1.concoct_part_1\t0\t17\n";
        let rows = parse_coverage_text(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].sums, vec![0.0, 17.0]);
        assert_eq!(rows[1].start, 80);
    }

    #[test]
    fn test_parse_inconsistent_columns() {
        let text = "c1\t0\t100\tc1.concoct_part_0\t300\t50\nc1\t80\t250\tc1.concoct_part_1\t0\n";
        assert!(parse_coverage_text(text).is_err());
    }

    #[test]
    fn test_parse_missing_sum() {
        let err = parse_coverage_text("c1\t0\t100\tc1.concoct_part_0\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_parse_sample_names_file() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut temp, b"gut_a\n\n gut_b \n").unwrap();
        let names = parse_sample_names_file(temp.path()).unwrap();
        assert_eq!(names, vec!["gut_a", "gut_b"]);
    }

    #[test]
    fn test_parse_rejects_bad_sums() {
        assert!(parse_coverage_text("c1\t0\t100\tf\tlots\n").is_err());
        assert!(parse_coverage_text("c1\t0\t100\tf\t-3\n").is_err());
        assert!(parse_coverage_text("c1\t0\t100\tf\tNaN\n").is_err());
    }
}
