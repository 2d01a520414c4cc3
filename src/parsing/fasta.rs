//! FASTA input and output using noodles.
//!
//! Assemblies are streamed record by record so that large inputs are never
//! held in memory as a whole. Supports both uncompressed and gzip/bgzip
//! compressed inputs.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::core::contig::Contig;
use crate::parsing::ParseError;

/// Default number of bases per sequence line in written FASTA
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    // Check for gzipped FASTA
    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".fna.bgz")
    {
        return true;
    }

    // Check for uncompressed FASTA
    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Sequential reader over the contigs of one FASTA file
pub struct ContigReader {
    inner: fasta::io::Reader<Box<dyn BufRead>>,
}

impl ContigReader {
    /// Open a FASTA file, decompressing it if the extension says so.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, ParseError> {
        let file = std::fs::File::open(path)?;
        let reader: Box<dyn BufRead> = if is_gzipped(path) {
            // bgzip is a series of gzip members
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::from_reader(reader))
    }

    pub fn from_reader(reader: Box<dyn BufRead>) -> Self {
        Self {
            inner: fasta::io::Reader::new(reader),
        }
    }
}

impl Iterator for ContigReader {
    type Item = Result<Contig, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.records().next()?;
        Some(
            result
                .map(|record| {
                    let name = String::from_utf8_lossy(record.name()).to_string();
                    Contig::new(name, record.sequence().as_ref().to_vec())
                })
                .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}"))),
        )
    }
}

/// Write one FASTA record.
///
/// A `line_width` of 0 writes the whole sequence on a single line.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_record<W: Write>(
    writer: &mut W,
    name: &str,
    sequence: &[u8],
    line_width: usize,
) -> io::Result<()> {
    let line_base_count = if line_width == 0 {
        sequence.len().max(1)
    } else {
        line_width
    };

    let mut fasta_writer = fasta::io::writer::Builder::default()
        .set_line_base_count(line_base_count)
        .build_from_writer(writer);

    let record = fasta::Record::new(
        fasta::record::Definition::new(name, None),
        fasta::record::Sequence::from(sequence.to_vec()),
    );

    fasta_writer.write_record(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_all(path: &Path) -> Vec<Contig> {
        ContigReader::open(path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.fna")));
        assert!(is_fasta_file(Path::new("test.fa.gz")));
        assert!(is_fasta_file(Path::new("test.fna.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/Assembly.FA")));

        assert!(!is_fasta_file(Path::new("test.bam")));
        assert!(!is_fasta_file(Path::new("test.csv")));
    }

    #[test]
    fn test_read_multiline_records() {
        let fasta_content = b">c1 len=12\nACGTACGT\nACGT\n>c2\nGGGG\n";

        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(fasta_content).unwrap();
        temp.flush().unwrap();

        let contigs = read_all(temp.path());
        assert_eq!(contigs.len(), 2);
        assert_eq!(contigs[0].name, "c1");
        assert_eq!(contigs[0].sequence, b"ACGTACGTACGT");
        assert_eq!(contigs[1].name, "c2");
        assert_eq!(contigs[1].length(), 4);
    }

    #[test]
    fn test_read_gzipped() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        {
            let mut encoder = GzEncoder::new(temp.as_file_mut(), Compression::default());
            encoder.write_all(b">c1\nACGT\n").unwrap();
            encoder.finish().unwrap();
        }

        let contigs = read_all(temp.path());
        assert_eq!(contigs, vec![Contig::new("c1", b"ACGT".to_vec())]);
    }

    #[test]
    fn test_read_empty_file() {
        let temp = NamedTempFile::with_suffix(".fa").unwrap();
        assert!(read_all(temp.path()).is_empty());
    }

    #[test]
    fn test_write_record_wraps_lines() {
        let mut buf = Vec::new();
        write_record(&mut buf, "c1", b"ACGTACGTAC", 4).unwrap();
        assert_eq!(buf, b">c1\nACGT\nACGT\nAC\n");
    }

    #[test]
    fn test_write_record_single_line() {
        let mut buf = Vec::new();
        write_record(&mut buf, "c1", b"ACGTACGTAC", 0).unwrap();
        assert_eq!(buf, b">c1\nACGTACGTAC\n");
    }
}
