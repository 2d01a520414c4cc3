use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::contig::Contig;
use crate::core::error::EngineError;
use crate::core::fragment_id::FragmentId;
use crate::core::types::{Fragment, WindowConfig};
use crate::parsing::coords::write_coord_record;
use crate::parsing::fasta::{write_record, ContigReader};
use crate::parsing::ParseError;

/// Counts gathered while cutting an assembly
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FragmentReport {
    /// Contigs read from all inputs
    pub contigs_read: usize,
    /// Contigs cut into more than one window
    pub contigs_split: usize,
    /// Zero-length contigs that produced no fragment
    pub contigs_skipped: usize,
    /// Fragments written
    pub fragments_written: usize,
    /// Bases across all input contigs
    pub total_bases: u64,
}

/// Window offsets for a contig of `length` bases.
///
/// Contigs shorter than twice the window size are kept whole. Longer contigs
/// are cut into `window_size` windows every `stride` bases from offset 0; the
/// last window runs to the end of the contig, absorbing any remainder that
/// would otherwise form a window shorter than `window_size`.
///
/// The returned intervals are half-open, strictly increasing in start, and
/// together cover `[0, length)`. A zero-length contig has no intervals.
#[must_use]
pub fn window_intervals(length: usize, config: &WindowConfig) -> Vec<(usize, usize)> {
    if length == 0 {
        return Vec::new();
    }

    let window = config.window_size();
    if length < window.saturating_mul(2) {
        return vec![(0, length)];
    }

    let stride = config.stride();
    let mut intervals = Vec::with_capacity(length / stride + 1);
    let mut start = 0;

    while start + window <= length {
        if start + window + stride > length {
            intervals.push((start, length));
            break;
        }
        intervals.push((start, start + window));
        start += stride;
    }

    intervals
}

/// Fragments for one contig, numbered from 0 in offset order
#[must_use]
pub fn fragment_contig(contig_id: &str, length: usize, config: &WindowConfig) -> Vec<Fragment> {
    window_intervals(length, config)
        .into_iter()
        .enumerate()
        .map(|(part, (start, end))| Fragment {
            id: FragmentId::new(contig_id, part),
            start,
            end,
        })
        .collect()
}

/// Streams contigs into a fragment FASTA and a coordinate table
pub struct Fragmenter<F: Write, C: Write> {
    config: WindowConfig,
    line_width: usize,
    fasta_out: F,
    coords_out: C,
    seen: HashSet<String>,
    report: FragmentReport,
}

impl<F: Write, C: Write> Fragmenter<F, C> {
    pub fn new(config: WindowConfig, line_width: usize, fasta_out: F, coords_out: C) -> Self {
        Self {
            config,
            line_width,
            fasta_out,
            coords_out,
            seen: HashSet::new(),
            report: FragmentReport::default(),
        }
    }

    /// Cut one contig and write its fragments and coordinate rows.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Format` if the contig id was already seen, or
    /// `EngineError::Io` if writing fails.
    pub fn add_contig(&mut self, contig: &Contig) -> Result<(), EngineError> {
        if !self.seen.insert(contig.name.clone()) {
            return Err(ParseError::InvalidFormat(format!(
                "Duplicate contig id '{}' in assembly",
                contig.name
            ))
            .into());
        }

        self.report.contigs_read += 1;
        self.report.total_bases += contig.length() as u64;

        let fragments = fragment_contig(&contig.name, contig.length(), &self.config);
        if fragments.is_empty() {
            warn!("Skipping zero-length contig '{}'", contig.name);
            self.report.contigs_skipped += 1;
            return Ok(());
        }

        if fragments.len() > 1 {
            debug!(
                "Cut contig '{}' ({} bp) into {} fragments",
                contig.name,
                contig.length(),
                fragments.len()
            );
            self.report.contigs_split += 1;
        }

        for fragment in &fragments {
            write_record(
                &mut self.fasta_out,
                &fragment.id.to_string(),
                fragment.sequence(&contig.sequence),
                self.line_width,
            )?;
            write_coord_record(&mut self.coords_out, &fragment.to_coordinate_record())?;
        }
        self.report.fragments_written += fragments.len();

        Ok(())
    }

    /// Flush both outputs and return the run counts
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Io` if flushing fails.
    pub fn finish(mut self) -> Result<FragmentReport, EngineError> {
        self.fasta_out.flush()?;
        self.coords_out.flush()?;
        Ok(self.report)
    }
}

/// Cut every contig of `inputs` (in order) into windows.
///
/// Writes fragment sequences to `fragments_path` and the coordinate table to
/// `coords_path`, creating parent directories as needed. Both files are
/// truncated first, so re-running on the same input gives identical files.
///
/// # Errors
///
/// Returns `EngineError::Format` for unreadable FASTA or duplicate contig ids,
/// or `EngineError::Io` if an output cannot be written.
pub fn fragment(
    inputs: &[PathBuf],
    config: WindowConfig,
    line_width: usize,
    fragments_path: &Path,
    coords_path: &Path,
) -> Result<FragmentReport, EngineError> {
    info!(
        "Cutting contigs into {} bp windows with {} bp overlap",
        config.window_size(), config.overlap_size()
    );

    let fasta_out = create_output(fragments_path)?;
    let coords_out = create_output(coords_path)?;
    let mut fragmenter = Fragmenter::new(config, line_width, fasta_out, coords_out);

    for input in inputs {
        debug!("Reading assembly {}", input.display());
        for contig in ContigReader::open(input)? {
            fragmenter.add_contig(&contig?)?;
        }
    }

    let report = fragmenter.finish()?;
    info!(
        "Wrote {} fragments from {} contigs ({} split)",
        report.fragments_written, report.contigs_read, report.contigs_split
    );
    Ok(report)
}

pub(crate) fn create_output(path: &Path) -> Result<BufWriter<File>, EngineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}
