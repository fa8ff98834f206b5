//! CIGAR construction and alignment statistics.
//!
//! A single forward pass walks the gap-padded alignment column by column,
//! classifying each column, run-length encoding the classifications, and
//! accumulating counts, coordinates, and seq2-space positions. The encoding is
//! seq1-centric: a seq1 overhang appears as a soft clip, while a seq2 overhang
//! is absorbed silently. A trailing insertion or deletion run is an unresolved
//! end gap under the free-end-gap contract and is reclassified as a clip, with
//! counts, positions, and end coordinates pulled back accordingly.

use crate::banded::{AlignedPair, GAP};

/// CIGAR operation kinds describing how seq1 aligns to seq2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum CigarOpKind {
    /// Consuming match/mismatch column.
    Match,
    /// Base present in seq1 only.
    Insertion,
    /// Base present in seq2 only.
    Deletion,
    /// Unaligned seq1 bases outside the aligned region.
    SoftClip,
}

impl CigarOpKind {
    /// Single-letter operation code used in the wire record.
    pub fn letter(self) -> char {
        match self {
            CigarOpKind::Match => 'M',
            CigarOpKind::Insertion => 'I',
            CigarOpKind::Deletion => 'D',
            CigarOpKind::SoftClip => 'S',
        }
    }
}

/// CIGAR operation with run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct CigarOp {
    /// Operation kind.
    pub kind: CigarOpKind,
    /// Number of columns in the run, always at least one.
    pub len: u32,
}

impl CigarOp {
    /// Construct a new CIGAR operation.
    pub fn new(kind: CigarOpKind, len: u32) -> Self {
        Self { kind, len }
    }
}

/// Final summary of one semi-global alignment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct AlignmentReport {
    /// Run-length encoded edit script.
    pub cigar: Vec<CigarOp>,
    /// First aligned base on seq1 (inclusive).
    pub s1_start: usize,
    /// Past-the-end aligned base on seq1.
    pub s1_end: usize,
    /// First aligned base on seq2 (inclusive).
    pub s2_start: usize,
    /// Past-the-end aligned base on seq2.
    pub s2_end: usize,
    /// Total columns inside the aligned region.
    pub aligned_length: usize,
    /// Columns where both bases agree.
    pub match_count: usize,
    /// Columns where both bases are present but differ.
    pub mismatch_count: usize,
    /// Seq2 offsets of the mismatch columns.
    pub mismatch_positions: Vec<usize>,
    /// Columns consuming seq1 only, inside the aligned region.
    pub insertion_count: usize,
    /// Seq2 offsets at which each insertion occurs (between bases).
    pub insertion_positions: Vec<usize>,
    /// Columns consuming seq2 only, inside the aligned region.
    pub deletion_count: usize,
    /// Seq2 offsets of the deleted bases.
    pub deletion_positions: Vec<usize>,
    /// Mismatches plus insertions plus deletions.
    pub edit_distance: usize,
    /// Percentage of matching columns over the aligned length, 0.0 when the
    /// aligned length is zero.
    pub percent_identity: f64,
    /// Wall-clock time of the whole alignment call.
    pub elapsed_milliseconds: u128,
}

impl AlignmentReport {
    /// CIGAR as concatenated `<length><letter>` tokens.
    pub fn cigar_string(&self) -> String {
        let mut out = String::new();
        for op in &self.cigar {
            out.push_str(&op.len.to_string());
            out.push(op.kind.letter());
        }
        out
    }

    /// Serialize to the comma-separated wire record.
    pub fn to_record(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{:.6},{}",
            self.cigar_string(),
            self.s1_start,
            self.s1_end,
            self.s2_start,
            self.s2_end,
            self.aligned_length,
            self.match_count,
            self.mismatch_count,
            positions_field(&self.mismatch_positions),
            self.insertion_count,
            positions_field(&self.insertion_positions),
            self.deletion_count,
            positions_field(&self.deletion_positions),
            self.edit_distance,
            self.percent_identity,
            self.elapsed_milliseconds,
        )
    }
}

fn positions_field(positions: &[usize]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnClass {
    Match,
    Insertion,
    Deletion,
    Clip,
    Skip,
}

fn classify(base1: u8, base2: u8, started: bool) -> ColumnClass {
    if base1 == GAP {
        if started {
            ColumnClass::Deletion
        } else {
            ColumnClass::Skip
        }
    } else if base2 == GAP {
        if started {
            ColumnClass::Insertion
        } else {
            ColumnClass::Clip
        }
    } else {
        ColumnClass::Match
    }
}

/// Accumulator state threaded through the single forward pass.
#[derive(Debug, Default)]
struct CigarAccumulator {
    runs: Vec<CigarOp>,
    current: Option<(ColumnClass, u32)>,
    started: bool,
    s1_bases: usize,
    s2_bases: usize,
    s1_start: usize,
    s2_start: usize,
    match_count: usize,
    mismatch_count: usize,
    insertion_count: usize,
    deletion_count: usize,
    mismatch_positions: Vec<usize>,
    insertion_positions: Vec<usize>,
    deletion_positions: Vec<usize>,
}

impl CigarAccumulator {
    fn observe(&mut self, base1: u8, base2: u8) {
        if base1 != GAP && base2 != GAP && !self.started {
            self.started = true;
            self.s1_start = self.s1_bases;
            self.s2_start = self.s2_bases;
        }
        let class = classify(base1, base2, self.started);

        match class {
            ColumnClass::Match => {
                if base1 == base2 {
                    self.match_count += 1;
                } else {
                    self.mismatch_count += 1;
                    self.mismatch_positions.push(self.s2_bases);
                }
            }
            ColumnClass::Deletion => {
                self.deletion_count += 1;
                self.deletion_positions.push(self.s2_bases);
            }
            ColumnClass::Insertion => {
                self.insertion_count += 1;
                self.insertion_positions.push(self.s2_bases);
            }
            ColumnClass::Clip | ColumnClass::Skip => {}
        }

        match self.current {
            Some((kind, ref mut len)) if kind == class => *len += 1,
            Some((kind, len)) => {
                self.flush(kind, len);
                self.current = Some((class, 1));
            }
            None => self.current = Some((class, 1)),
        }

        if base1 != GAP {
            self.s1_bases += 1;
        }
        if base2 != GAP {
            self.s2_bases += 1;
        }
    }

    fn flush(&mut self, class: ColumnClass, len: u32) {
        let kind = match class {
            ColumnClass::Match => CigarOpKind::Match,
            ColumnClass::Insertion => CigarOpKind::Insertion,
            ColumnClass::Deletion => CigarOpKind::Deletion,
            ColumnClass::Clip => CigarOpKind::SoftClip,
            // A seq2 overhang leaves no trace in the seq1-centric script.
            ColumnClass::Skip => return,
        };
        self.runs.push(CigarOp::new(kind, len));
    }

    fn finish(mut self) -> Option<AlignmentReport> {
        let mut s1_end = self.s1_bases;
        let mut s2_end = self.s2_bases;

        if let Some((class, len)) = self.current.take() {
            let run = len as usize;
            match class {
                ColumnClass::Insertion => {
                    self.insertion_count -= run;
                    self.insertion_positions
                        .truncate(self.insertion_positions.len() - run);
                    s1_end -= run;
                    self.flush(ColumnClass::Clip, len);
                }
                ColumnClass::Deletion => {
                    self.deletion_count -= run;
                    self.deletion_positions
                        .truncate(self.deletion_positions.len() - run);
                    s2_end -= run;
                }
                other => self.flush(other, len),
            }
        }

        if !self.started {
            return None;
        }

        let edit_distance = self.mismatch_count + self.insertion_count + self.deletion_count;
        let aligned_length = self.match_count + edit_distance;
        let percent_identity = if aligned_length == 0 {
            0.0
        } else {
            100.0 * self.match_count as f64 / aligned_length as f64
        };

        Some(AlignmentReport {
            cigar: self.runs,
            s1_start: self.s1_start,
            s1_end,
            s2_start: self.s2_start,
            s2_end,
            aligned_length,
            match_count: self.match_count,
            mismatch_count: self.mismatch_count,
            mismatch_positions: self.mismatch_positions,
            insertion_count: self.insertion_count,
            insertion_positions: self.insertion_positions,
            deletion_count: self.deletion_count,
            deletion_positions: self.deletion_positions,
            edit_distance,
            percent_identity,
            elapsed_milliseconds: 0,
        })
    }
}

/// Summarize a gap-padded alignment into its report.
///
/// Returns `None` when no column aligns a base to a base, which callers treat
/// as a zero-length alignment.
pub fn summarize_alignment(pair: &AlignedPair) -> Option<AlignmentReport> {
    let mut accumulator = CigarAccumulator::default();
    for (&base1, &base2) in pair.seq1.iter().zip(pair.seq2.iter()) {
        accumulator.observe(base1, base2);
    }
    accumulator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(seq1: &str, seq2: &str) -> AlignedPair {
        AlignedPair {
            seq1: seq1.as_bytes().to_vec(),
            seq2: seq2.as_bytes().to_vec(),
        }
    }

    #[test]
    fn all_match_columns_collapse_into_one_run() {
        let report = summarize_alignment(&pair("ACGTA", "ACGTA")).expect("report");
        assert_eq!(report.cigar_string(), "5M");
        assert_eq!(report.match_count, 5);
        assert_eq!(report.edit_distance, 0);
        assert_eq!((report.s1_start, report.s1_end), (0, 5));
        assert_eq!((report.s2_start, report.s2_end), (0, 5));
        assert_eq!(report.percent_identity, 100.0);
    }

    #[test]
    fn mismatch_counts_into_match_run_with_position() {
        let report = summarize_alignment(&pair("ACGT", "AGGT")).expect("report");
        assert_eq!(report.cigar_string(), "4M");
        assert_eq!(report.match_count, 3);
        assert_eq!(report.mismatch_count, 1);
        assert_eq!(report.mismatch_positions, vec![1]);
        assert_eq!(report.edit_distance, 1);
        assert!((report.percent_identity - 75.0).abs() < 1e-9);
    }

    #[test]
    fn leading_seq1_overhang_becomes_soft_clip() {
        let report = summarize_alignment(&pair("TTACGT", "--ACGT")).expect("report");
        assert_eq!(report.cigar_string(), "2S4M");
        assert_eq!((report.s1_start, report.s1_end), (2, 6));
        assert_eq!((report.s2_start, report.s2_end), (0, 4));
        assert_eq!(report.match_count, 4);
    }

    #[test]
    fn leading_seq2_overhang_is_absorbed() {
        let report = summarize_alignment(&pair("--ACGT", "CCACGT")).expect("report");
        assert_eq!(report.cigar_string(), "4M");
        assert_eq!((report.s1_start, report.s1_end), (0, 4));
        assert_eq!((report.s2_start, report.s2_end), (2, 6));
        assert_eq!(report.deletion_count, 0);
    }

    #[test]
    fn interior_deletion_is_reported_with_position() {
        let report = summarize_alignment(&pair("AC-GT", "ACTGT")).expect("report");
        assert_eq!(report.cigar_string(), "2M1D2M");
        assert_eq!(report.deletion_count, 1);
        assert_eq!(report.deletion_positions, vec![2]);
        assert_eq!(report.aligned_length, 5);
        assert_eq!((report.s2_start, report.s2_end), (0, 5));
    }

    #[test]
    fn interior_insertion_is_reported_with_position() {
        let report = summarize_alignment(&pair("ACTGT", "AC-GT")).expect("report");
        assert_eq!(report.cigar_string(), "2M1I2M");
        assert_eq!(report.insertion_count, 1);
        assert_eq!(report.insertion_positions, vec![2]);
        assert_eq!((report.s1_start, report.s1_end), (0, 5));
        assert_eq!((report.s2_start, report.s2_end), (0, 4));
    }

    #[test]
    fn trailing_insertion_run_becomes_clip() {
        let report = summarize_alignment(&pair("ACGTTT", "ACGT--")).expect("report");
        assert_eq!(report.cigar_string(), "4M2S");
        assert_eq!(report.insertion_count, 0);
        assert!(report.insertion_positions.is_empty());
        assert_eq!((report.s1_start, report.s1_end), (0, 4));
        assert_eq!(report.edit_distance, 0);
        assert_eq!(report.percent_identity, 100.0);
    }

    #[test]
    fn trailing_deletion_run_is_absorbed() {
        let report = summarize_alignment(&pair("ACGT--", "ACGTCC")).expect("report");
        assert_eq!(report.cigar_string(), "4M");
        assert_eq!(report.deletion_count, 0);
        assert!(report.deletion_positions.is_empty());
        assert_eq!((report.s2_start, report.s2_end), (0, 4));
    }

    #[test]
    fn alignment_that_never_starts_yields_no_report() {
        assert!(summarize_alignment(&pair("AA--", "--AA")).is_none());
        assert!(summarize_alignment(&pair("", "")).is_none());
    }

    #[test]
    fn record_layout_matches_interface_contract() {
        let mut report = summarize_alignment(&pair("ACGT", "AGGT")).expect("report");
        report.elapsed_milliseconds = 7;
        let record = report.to_record();
        let fields: Vec<&str> = record.split(',').collect();
        assert_eq!(fields.len(), 16);
        assert_eq!(fields[0], "4M");
        assert_eq!(fields[7], "1");
        assert_eq!(fields[8], "1");
        assert_eq!(fields[14], "75.000000");
        assert_eq!(fields[15], "7");
    }
}
