use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::binning::bin_writer::{BinFileSummary, BinTarget, BinWriterSet};
use crate::binning::fragmenter::create_output;
use crate::core::error::EngineError;
use crate::core::fragment_id::FragmentId;
use crate::core::types::{ClusterAssignment, ClusterLabel};
use crate::parsing::clusters::parse_clusters_file;
use crate::parsing::fasta::{ContigReader, DEFAULT_LINE_WIDTH};
use crate::parsing::ParseError;
use crate::utils::validation::validate_label;

/// Label counts for one contig, kept in first-seen order
#[derive(Debug, Clone, Default)]
pub struct LabelTally {
    counts: IndexMap<ClusterLabel, usize>,
}

impl LabelTally {
    pub fn add(&mut self, label: &ClusterLabel) {
        *self.counts.entry(label.clone()).or_default() += 1;
    }

    /// Most frequent label; among equally frequent labels the one seen first.
    #[must_use]
    pub fn winner(&self) -> Option<&ClusterLabel> {
        let mut best: Option<(&ClusterLabel, usize)> = None;
        for (label, &count) in &self.counts {
            // strictly greater keeps the earliest label on a tie
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }

    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Whether another label shares the winner's count
    #[must_use]
    pub fn is_tied(&self) -> bool {
        let top = self.counts.values().copied().max().unwrap_or(0);
        self.counts.values().filter(|&&c| c == top).count() > 1
    }

    pub fn counts(&self) -> impl Iterator<Item = (&ClusterLabel, usize)> {
        self.counts.iter().map(|(label, &count)| (label, count))
    }
}

/// A contig whose fragments were assigned to more than one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousConsensus {
    pub contig_id: String,
    /// Label counts in first-seen order
    pub label_counts: Vec<(String, usize)>,
    pub chosen_label: String,
    /// Whether the chosen label shared the top count with another label
    pub tied: bool,
}

impl std::fmt::Display for AmbiguousConsensus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No consensus cluster for contig {}: ", self.contig_id)?;
        for (i, (label, count)) in self.label_counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}={count}")?;
        }
        write!(f, " chosen cluster: {}", self.chosen_label)
    }
}

/// Consensus cluster label per original contig.
///
/// Iteration follows the order in which contigs first appear in the
/// assignments.
#[derive(Debug, Clone, Default)]
pub struct ConsensusMapping {
    labels: IndexMap<String, ClusterLabel>,
}

impl ConsensusMapping {
    #[must_use]
    pub fn get(&self, contig_id: &str) -> Option<&ClusterLabel> {
        self.labels.get(contig_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClusterLabel)> {
        self.labels.iter().map(|(id, label)| (id.as_str(), label))
    }

    /// Distinct labels, sorted
    #[must_use]
    pub fn labels(&self) -> Vec<&ClusterLabel> {
        let mut labels: Vec<&ClusterLabel> = self
            .labels
            .values()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        labels.sort();
        labels
    }
}

/// Majority vote of fragment labels per parent contig.
///
/// Fragment ids are mapped back to their parent with
/// [`FragmentId::demote`], so ids without the fragment suffix count as a
/// whole contig. Every contig with more than one distinct label is returned
/// as an [`AmbiguousConsensus`], in first-seen order.
///
/// # Errors
///
/// Returns `EngineError::Format` if a fragment id is assigned twice.
pub fn resolve_consensus(
    assignments: &[ClusterAssignment],
) -> Result<(ConsensusMapping, Vec<AmbiguousConsensus>), EngineError> {
    let mut seen_fragments: HashSet<&str> = HashSet::with_capacity(assignments.len());
    // use IndexMap to keep parents in first-seen order
    let mut tallies: IndexMap<String, LabelTally> = IndexMap::new();

    for assignment in assignments {
        if !seen_fragments.insert(assignment.fragment_id.as_str()) {
            return Err(ParseError::InvalidFormat(format!(
                "Fragment '{}' is assigned to a cluster more than once",
                assignment.fragment_id
            ))
            .into());
        }

        let parent = FragmentId::demote(&assignment.fragment_id).parent;
        tallies.entry(parent).or_default().add(&assignment.label);
    }

    let mut mapping = ConsensusMapping::default();
    let mut ambiguous = Vec::new();

    for (contig_id, tally) in tallies {
        let Some(chosen) = tally.winner().cloned() else {
            continue;
        };

        if tally.distinct() > 1 {
            ambiguous.push(AmbiguousConsensus {
                contig_id: contig_id.clone(),
                label_counts: tally
                    .counts()
                    .map(|(label, count)| (label.0.clone(), count))
                    .collect(),
                chosen_label: chosen.0.clone(),
                tied: tally.is_tied(),
            });
        }

        mapping.labels.insert(contig_id, chosen);
    }

    Ok((mapping, ambiguous))
}

/// Write the consensus mapping as `contig_id,cluster_id` CSV
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_mapping_csv<W: Write>(writer: &mut W, mapping: &ConsensusMapping) -> io::Result<()> {
    writeln!(writer, "contig_id,cluster_id")?;
    for (contig_id, label) in mapping.iter() {
        writeln!(writer, "{contig_id},{label}")?;
    }
    Ok(())
}

/// Options for [`resolve_and_split`]
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Bases per line in bin FASTA files, 0 for unwrapped
    pub line_width: usize,
    /// Also write the per-contig mapping as CSV to this path
    pub merged_csv: Option<PathBuf>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            merged_csv: None,
        }
    }
}

/// Outcome of a resolve-and-split run
#[derive(Debug, Clone, Serialize)]
pub struct ConsensusReport {
    #[serde(skip)]
    pub mapping: ConsensusMapping,
    /// Assembly contigs written to a bin
    pub contigs_binned: usize,
    /// Assembly contigs written to `unbinned.fa`
    pub contigs_unbinned: usize,
    /// Contigs with assignments but no record in the assembly
    pub assignment_only: usize,
    pub ambiguous: Vec<AmbiguousConsensus>,
    /// One entry per file written, in first-write order
    pub files: Vec<BinFileSummary>,
}

/// Vote on the cluster of every contig and split the original assembly into
/// one FASTA per consensus label plus `unbinned.fa`.
///
/// Contigs are streamed from `assembly_path` in order. Headers are reduced to
/// the parent contig id. Contigs that appear only in the assignments are
/// ignored.
///
/// # Errors
///
/// Returns `EngineError::Format` for malformed assignments or FASTA,
/// `EngineError::InvalidLabel` if a consensus label cannot be used in a file
/// name (checked before any bin file is opened), or `EngineError::Io` if an
/// output cannot be written.
pub fn resolve_and_split(
    clusters_path: &Path,
    assembly_path: &Path,
    output_dir: &Path,
    options: &ResolveOptions,
) -> Result<ConsensusReport, EngineError> {
    let assignments = parse_clusters_file(clusters_path)?;
    debug!("Read {} cluster assignments", assignments.len());

    let (mapping, ambiguous) = resolve_consensus(&assignments)?;

    for label in mapping.labels() {
        validate_label(label.as_str()).map_err(|e| EngineError::InvalidLabel {
            label: label.to_string(),
            reason: e.to_string(),
        })?;
    }

    for notice in &ambiguous {
        warn!("{notice}");
    }

    let mut bins = BinWriterSet::create(output_dir, options.line_width)?;
    let mut written: HashSet<String> = HashSet::new();
    let mut contigs_binned = 0;
    let mut contigs_unbinned = 0;

    for contig in ContigReader::open(assembly_path)? {
        let contig = contig?;
        let contig_id = FragmentId::parent_of(&contig.name);

        let target = match mapping.get(contig_id) {
            Some(label) => {
                contigs_binned += 1;
                BinTarget::Bin(label.clone())
            }
            None => {
                contigs_unbinned += 1;
                BinTarget::Unbinned
            }
        };

        bins.write(&target, contig_id, &contig.sequence)?;
        written.insert(contig_id.to_string());
    }

    let files = bins.finish()?;

    let assignment_only = mapping
        .iter()
        .filter(|(id, _)| !written.contains(*id))
        .inspect(|(id, _)| debug!("Contig '{id}' has assignments but is not in the assembly"))
        .count();

    if let Some(path) = &options.merged_csv {
        let mut out = create_output(path)?;
        write_mapping_csv(&mut out, &mapping)?;
        out.flush()?;
    }

    if !ambiguous.is_empty() {
        warn!(
            "{} of {} contigs had no consensus cluster",
            ambiguous.len(),
            mapping.len()
        );
    }
    info!(
        "Wrote {} binned and {} unbinned contigs into {} files",
        contigs_binned,
        contigs_unbinned,
        files.len()
    );

    Ok(ConsensusReport {
        mapping,
        contigs_binned,
        contigs_unbinned,
        assignment_only,
        ambiguous,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(pairs: &[(&str, &str)]) -> Vec<ClusterAssignment> {
        pairs
            .iter()
            .map(|(id, label)| ClusterAssignment::new(*id, *label))
            .collect()
    }

    fn label_of<'a>(mapping: &'a ConsensusMapping, id: &str) -> Option<&'a str> {
        mapping.get(id).map(ClusterLabel::as_str)
    }

    #[test]
    fn test_unanimous_contig() {
        let (mapping, ambiguous) = resolve_consensus(&assign(&[
            ("c1.concoct_part_0", "4"),
            ("c1.concoct_part_1", "4"),
        ]))
        .unwrap();
        assert_eq!(label_of(&mapping, "c1"), Some("4"));
        assert!(ambiguous.is_empty());
    }

    #[test]
    fn test_majority_wins() {
        let (mapping, ambiguous) = resolve_consensus(&assign(&[
            ("c1.concoct_part_0", "A"),
            ("c1.concoct_part_1", "B"),
            ("c1.concoct_part_2", "A"),
        ]))
        .unwrap();
        assert_eq!(label_of(&mapping, "c1"), Some("A"));
        assert_eq!(ambiguous.len(), 1);
        assert_eq!(ambiguous[0].chosen_label, "A");
        assert!(!ambiguous[0].tied);
        assert_eq!(
            ambiguous[0].label_counts,
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
    }

    #[test]
    fn test_tie_breaks_to_first_seen() {
        let (mapping, ambiguous) = resolve_consensus(&assign(&[
            ("c1.concoct_part_0", "B"),
            ("c1.concoct_part_1", "A"),
        ]))
        .unwrap();
        assert_eq!(label_of(&mapping, "c1"), Some("B"));
        assert!(ambiguous[0].tied);

        let (mapping, _) = resolve_consensus(&assign(&[
            ("c1.concoct_part_1", "A"),
            ("c1.concoct_part_0", "B"),
        ]))
        .unwrap();
        assert_eq!(label_of(&mapping, "c1"), Some("A"));
    }

    #[test]
    fn test_later_majority_beats_first_seen() {
        let (mapping, _) = resolve_consensus(&assign(&[
            ("c1.concoct_part_0", "B"),
            ("c1.concoct_part_1", "A"),
            ("c1.concoct_part_2", "A"),
        ]))
        .unwrap();
        assert_eq!(label_of(&mapping, "c1"), Some("A"));
    }

    #[test]
    fn test_tally_counts_in_first_seen_order() {
        let mut tally = LabelTally::default();
        for label in ["9", "3", "9", "1", "3"] {
            tally.add(&ClusterLabel::new(label));
        }
        let counts: Vec<(&str, usize)> = tally.counts().map(|(l, c)| (l.as_str(), c)).collect();
        assert_eq!(counts, vec![("9", 2), ("3", 2), ("1", 1)]);
        assert_eq!(tally.distinct(), 3);
        assert!(tally.is_tied());
        assert_eq!(tally.winner().map(ClusterLabel::as_str), Some("9"));
        assert!(LabelTally::default().winner().is_none());
    }

    #[test]
    fn test_mapping_keeps_first_seen_contig_order() {
        // interleaved fragments of many contigs
        let mut pairs = Vec::new();
        for part in 0..3 {
            for contig in (0..50).rev() {
                pairs.push((format!("k{contig}.concoct_part_{part}"), format!("{}", contig % 4)));
            }
        }
        let assignments: Vec<ClusterAssignment> = pairs
            .iter()
            .map(|(id, label)| ClusterAssignment::new(id.as_str(), label.as_str()))
            .collect();

        let (mapping, ambiguous) = resolve_consensus(&assignments).unwrap();
        assert!(ambiguous.is_empty());
        assert_eq!(mapping.len(), 50);
        let order: Vec<String> = mapping.iter().map(|(id, _)| id.to_string()).collect();
        let expected: Vec<String> = (0..50).rev().map(|c| format!("k{c}")).collect();
        assert_eq!(order, expected);
        assert_eq!(label_of(&mapping, "k13"), Some("1"));
    }

    #[test]
    fn test_bare_ids_are_whole_contigs() {
        let (mapping, _) =
            resolve_consensus(&assign(&[("c2", "7"), ("c1.concoct_part_0", "1")])).unwrap();
        assert_eq!(label_of(&mapping, "c2"), Some("7"));
        let order: Vec<&str> = mapping.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["c2", "c1"]);
    }

    #[test]
    fn test_duplicate_fragment_rejected() {
        let err = resolve_consensus(&assign(&[
            ("c1.concoct_part_0", "1"),
            ("c1.concoct_part_0", "2"),
        ]))
        .unwrap_err();
        assert!(matches!(err, EngineError::Format(_)));
    }

    #[test]
    fn test_ambiguous_display() {
        let notice = AmbiguousConsensus {
            contig_id: "c1".to_string(),
            label_counts: vec![("A".to_string(), 1), ("B".to_string(), 1)],
            chosen_label: "A".to_string(),
            tied: true,
        };
        assert_eq!(
            notice.to_string(),
            "No consensus cluster for contig c1: A=1, B=1 chosen cluster: A"
        );
    }

    #[test]
    fn test_write_mapping_csv() {
        let (mapping, _) = resolve_consensus(&assign(&[
            ("c1.concoct_part_0", "3"),
            ("c2.concoct_part_0", "0"),
        ]))
        .unwrap();
        let mut buf = Vec::new();
        write_mapping_csv(&mut buf, &mapping).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "contig_id,cluster_id\nc1,3\nc2,0\n"
        );
    }

    struct Fixture {
        dir: tempfile::TempDir,
        clusters: PathBuf,
        assembly: PathBuf,
    }

    fn fixture(clusters: &str, assembly: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let clusters_path = dir.path().join("clustering.csv");
        let assembly_path = dir.path().join("assembly.fa");
        std::fs::write(&clusters_path, clusters).unwrap();
        std::fs::write(&assembly_path, assembly).unwrap();
        Fixture {
            dir,
            clusters: clusters_path,
            assembly: assembly_path,
        }
    }

    fn unwrapped() -> ResolveOptions {
        ResolveOptions {
            line_width: 0,
            merged_csv: None,
        }
    }

    #[test]
    fn test_resolve_and_split() {
        let fx = fixture(
            "contig_id,cluster_id\n\
             c1.concoct_part_0,1\nc1.concoct_part_1,1\nc1.concoct_part_2,2\n\
             c3.concoct_part_0,2\n\
             ghost.concoct_part_0,9\n",
            ">c1 some description\nAAAACCCC\nGG\n>c2\nTTTT\n>c3\nGGGG\n",
        );
        let out = fx.dir.path().join("bins");

        let report = resolve_and_split(&fx.clusters, &fx.assembly, &out, &unwrapped()).unwrap();

        assert_eq!(report.contigs_binned, 2);
        assert_eq!(report.contigs_unbinned, 1);
        assert_eq!(report.assignment_only, 1);
        assert_eq!(report.ambiguous.len(), 1);
        assert_eq!(report.files.len(), 3);

        assert_eq!(
            std::fs::read_to_string(out.join("bin.1.fa")).unwrap(),
            ">c1\nAAAACCCCGG\n"
        );
        assert_eq!(
            std::fs::read_to_string(out.join("bin.2.fa")).unwrap(),
            ">c3\nGGGG\n"
        );
        assert_eq!(
            std::fs::read_to_string(out.join("unbinned.fa")).unwrap(),
            ">c2\nTTTT\n"
        );
        assert!(!out.join("bin.9.fa").exists());
    }

    #[test]
    fn test_resolve_strips_fragment_suffix_from_headers() {
        let fx = fixture(
            "contig_id,cluster_id\nc1.concoct_part_0,5\n",
            ">c1.concoct_part_0\nACGT\n",
        );
        let out = fx.dir.path().join("bins");
        resolve_and_split(&fx.clusters, &fx.assembly, &out, &unwrapped()).unwrap();
        assert_eq!(
            std::fs::read_to_string(out.join("bin.5.fa")).unwrap(),
            ">c1\nACGT\n"
        );
    }

    #[test]
    fn test_resolve_twice_is_idempotent() {
        let fx = fixture(
            "contig_id,cluster_id\nc1.concoct_part_0,1\nc2.concoct_part_0,2\n",
            ">c1\nAC\n>c2\nGT\n>c3\nTT\n",
        );
        let out = fx.dir.path().join("bins");

        resolve_and_split(&fx.clusters, &fx.assembly, &out, &unwrapped()).unwrap();
        let first: Vec<String> = ["bin.1.fa", "bin.2.fa", "unbinned.fa"]
            .iter()
            .map(|f| std::fs::read_to_string(out.join(f)).unwrap())
            .collect();

        resolve_and_split(&fx.clusters, &fx.assembly, &out, &unwrapped()).unwrap();
        let second: Vec<String> = ["bin.1.fa", "bin.2.fa", "unbinned.fa"]
            .iter()
            .map(|f| std::fs::read_to_string(out.join(f)).unwrap())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_writes_merged_csv() {
        let fx = fixture(
            "contig_id,cluster_id\nc1.concoct_part_0,1\nc1.concoct_part_1,1\n",
            ">c1\nAC\n",
        );
        let out = fx.dir.path().join("bins");
        let merged = fx.dir.path().join("clustering_merged.csv");
        let options = ResolveOptions {
            line_width: 0,
            merged_csv: Some(merged.clone()),
        };

        resolve_and_split(&fx.clusters, &fx.assembly, &out, &options).unwrap();
        assert_eq!(
            std::fs::read_to_string(merged).unwrap(),
            "contig_id,cluster_id\nc1,1\n"
        );
    }

    #[test]
    fn test_resolve_rejects_unsafe_label_before_writing() {
        let fx = fixture(
            "contig_id,cluster_id\nc1.concoct_part_0,../escape\n",
            ">c1\nAC\n>c2\nGT\n",
        );
        let out = fx.dir.path().join("bins");
        let err = resolve_and_split(&fx.clusters, &fx.assembly, &out, &unwrapped()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidLabel { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_resolve_missing_columns_is_fatal() {
        let fx = fixture("fragment,bin\nc1.concoct_part_0,1\n", ">c1\nAC\n");
        let out = fx.dir.path().join("bins");
        let err = resolve_and_split(&fx.clusters, &fx.assembly, &out, &unwrapped()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Format(ParseError::MissingColumn(_))
        ));
    }
}
