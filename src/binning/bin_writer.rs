use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::core::types::ClusterLabel;
use crate::parsing::fasta::write_record;

/// Where a reconstructed contig is written
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BinTarget {
    Bin(ClusterLabel),
    Unbinned,
}

impl BinTarget {
    /// `bin.<label>.fa` for a bin, `unbinned.fa` otherwise
    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            Self::Bin(label) => format!("bin.{label}.fa"),
            Self::Unbinned => "unbinned.fa".to_string(),
        }
    }
}

/// What ended up in one output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinFileSummary {
    /// Cluster label, `None` for the unbinned file
    pub label: Option<String>,
    pub path: PathBuf,
    pub contigs: usize,
    pub bases: u64,
}

struct OpenBin {
    writer: BufWriter<File>,
    contigs: usize,
    bases: u64,
}

/// Output files keyed by target, opened on first write.
///
/// A file is truncated when first opened in a run and appended to for the
/// rest of it, so bins need not be known up front and a re-run replaces the
/// previous output. Each record is rendered in memory before it reaches the
/// file. All handles are flushed by [`BinWriterSet::finish`]; if the set is
/// dropped on an error path the buffered writers still flush on drop.
pub struct BinWriterSet {
    dir: PathBuf,
    line_width: usize,
    /// Open files in first-write order
    open: IndexMap<BinTarget, OpenBin>,
    record_buf: Vec<u8>,
}

impl BinWriterSet {
    /// Prepare a writer set rooted at `dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(dir: &Path, line_width: usize) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            line_width,
            open: IndexMap::new(),
            record_buf: Vec::new(),
        })
    }

    #[must_use]
    pub fn path_for(&self, target: &BinTarget) -> PathBuf {
        self.dir.join(target.file_name())
    }

    /// Append one contig to the file for `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn write(&mut self, target: &BinTarget, name: &str, sequence: &[u8]) -> io::Result<()> {
        self.record_buf.clear();
        write_record(&mut self.record_buf, name, sequence, self.line_width)?;

        if !self.open.contains_key(target) {
            let path = self.path_for(target);
            debug!("Opening bin file {}", path.display());
            let file = File::create(&path)?;
            self.open.insert(
                target.clone(),
                OpenBin {
                    writer: BufWriter::new(file),
                    contigs: 0,
                    bases: 0,
                },
            );
        }

        if let Some(bin) = self.open.get_mut(target) {
            bin.writer.write_all(&self.record_buf)?;
            bin.contigs += 1;
            bin.bases += sequence.len() as u64;
        }

        Ok(())
    }

    /// Flush and close every file, returning summaries in first-write order.
    ///
    /// # Errors
    ///
    /// Returns the first flush error encountered.
    pub fn finish(self) -> io::Result<Vec<BinFileSummary>> {
        let mut summaries = Vec::with_capacity(self.open.len());

        for (target, mut bin) in self.open {
            let path = self.dir.join(target.file_name());
            bin.writer.flush()?;

            summaries.push(BinFileSummary {
                label: match target {
                    BinTarget::Bin(label) => Some(label.0),
                    BinTarget::Unbinned => None,
                },
                path,
                contigs: bin.contigs,
                bases: bin.bases,
            });
        }

        Ok(summaries)
    }
}
