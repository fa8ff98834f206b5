//! K-mer extraction and shared-content discovery between two sequences.
//!
//! Seeding works on exact k-mer matches: both sequences are sliced into
//! overlapping fixed-width windows, seq1's windows are indexed by content, and
//! every seq2 window whose content appears in the index becomes a candidate
//! anchor region.

use std::collections::HashMap;

/// A fixed-width window over a sequence, with half-open offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kmer<'a> {
    /// Window content, borrowed from the source sequence.
    pub text: &'a [u8],
    /// Start offset (inclusive) in the source sequence.
    pub start: usize,
    /// End offset (exclusive) in the source sequence.
    pub end: usize,
}

/// A region on seq1 and a region on seq2 known to hold identical content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonLocation {
    /// Start offset (inclusive) on seq1.
    pub s1_start: usize,
    /// End offset (exclusive) on seq1.
    pub s1_end: usize,
    /// Start offset (inclusive) on seq2.
    pub s2_start: usize,
    /// End offset (exclusive) on seq2.
    pub s2_end: usize,
}

/// Slice a sequence into its overlapping k-mers with stride 1.
///
/// Emits `seq.len() - kmer_size` windows; the window starting at
/// `seq.len() - kmer_size` is not produced. Degenerate sizes (`kmer_size == 0`
/// or `kmer_size >= seq.len()`) yield an empty vector.
pub fn sequence_kmers(seq: &[u8], kmer_size: usize) -> Vec<Kmer<'_>> {
    if kmer_size == 0 || kmer_size >= seq.len() {
        return Vec::new();
    }
    let count = seq.len() - kmer_size;
    let mut kmers = Vec::with_capacity(count);
    for start in 0..count {
        let end = start + kmer_size;
        kmers.push(Kmer {
            text: &seq[start..end],
            start,
            end,
        });
    }
    kmers
}

/// Intersect two k-mer lists by content.
///
/// Seq1 k-mers are indexed content → position with last-write-wins, so a k-mer
/// repeated in seq1 anchors only at its final occurrence. Every seq2 occurrence
/// of a shared k-mer produces its own location, in seq2 order.
pub fn common_locations<'a>(
    s1_kmers: &[Kmer<'a>],
    s2_kmers: &[Kmer<'a>],
) -> Vec<CommonLocation> {
    let mut s1_by_content: HashMap<&[u8], (usize, usize)> =
        HashMap::with_capacity(s1_kmers.len());
    for kmer in s1_kmers {
        s1_by_content.insert(kmer.text, (kmer.start, kmer.end));
    }

    let mut locations = Vec::new();
    for kmer in s2_kmers {
        if let Some(&(s1_start, s1_end)) = s1_by_content.get(kmer.text) {
            locations.push(CommonLocation {
                s1_start,
                s1_end,
                s2_start: kmer.start,
                s2_end: kmer.end,
            });
        }
    }
    locations
}
