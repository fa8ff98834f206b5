//! # Semi-global sequence alignment via seeded banded dynamic programming
//!
//! This library aligns two nucleotide sequences in overlap style: gaps inside
//! the aligned region are penalized, unaligned overhangs at either end of
//! either sequence are not. Rather than filling the full dynamic-programming
//! matrix it anchors the alignment first:
//!
//! 1. **K-mer indexing**: both sequences are sliced into overlapping windows
//! 2. **Common locations**: windows shared by content become candidate anchors
//! 3. **Seed chaining**: anchors merge along diagonals and the heaviest
//!    co-linear subset is selected
//! 4. **Plausibility filter**: chains implying grossly mismatched sequence
//!    lengths reject the whole alignment
//! 5. **Banded alignment**: dynamic programming restricted to a corridor
//!    around the chain
//! 6. **Summary**: one pass turns the aligned pair into a CIGAR and statistics
//!
//! ## Usage Example
//!
//! ```ignore
//! use chainalign::{AlignmentConfig, SemiGlobalAligner};
//!
//! let aligner = SemiGlobalAligner::new(AlignmentConfig::new(10, 50, 0.1));
//! let outcome = aligner.align(seq1.as_bytes(), seq2.as_bytes());
//! println!("{}", outcome.to_record());
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod banded;
pub mod chain;
pub mod cigar;
pub mod ffi;
pub mod kmer;
pub mod seed;

// Re-exports for convenience
pub use banded::{banded_alignment, AlignedPair};
pub use chain::{chain_seeds, SeedChain};
pub use cigar::{summarize_alignment, AlignmentReport, CigarOp, CigarOpKind};
pub use kmer::{common_locations, sequence_kmers, CommonLocation, Kmer};
pub use seed::{Seed, SeedSet};

use std::time::Instant;

use thiserror::Error;
use tracing::debug;

/// Tuning parameters for one alignment call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentConfig {
    /// Width of the windows used to find alignment seeds.
    pub kmer_size: usize,

    /// Margin in matrix columns kept around the seed chain. Larger values are
    /// more likely to contain the best alignment, at a performance cost.
    pub band_size: usize,

    /// How much the sequences may differ in length as judged by the seed
    /// chain. A value of 0.1 accepts span ratios between 0.9 and 1.1;
    /// anything outside is not aligned.
    pub allowed_length_discrepancy: f64,
}

impl AlignmentConfig {
    /// Create a configuration from the three tuning knobs.
    pub fn new(kmer_size: usize, band_size: usize, allowed_length_discrepancy: f64) -> Self {
        Self {
            kmer_size,
            band_size,
            allowed_length_discrepancy,
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self::new(10, 50, 0.1)
    }
}

/// Why an alignment call produced no alignment.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RejectReason {
    /// The sequences share no k-mer content.
    #[error("no common k-mer seeds between the sequences")]
    NoSeeds,

    /// The chain covers no distance on seq2, so the span ratio is undefined.
    #[error("seed chain covers no distance on seq2")]
    DegenerateChainSpan,

    /// The chain implies sequence lengths outside the allowed discrepancy.
    #[error("seed chain span ratio {ratio:.3} outside 1 ± {allowed}")]
    ImplausibleChain {
        /// Observed seq1-span over seq2-span ratio.
        ratio: f64,
        /// Configured length discrepancy tolerance.
        allowed: f64,
    },

    /// The banded step produced no column aligning a base to a base.
    #[error("banded alignment produced no aligned columns")]
    EmptyAlignment,
}

/// Result of one alignment call.
///
/// Every rejection serializes to the empty record; callers that only need the
/// wire format can use [`AlignmentOutcome::to_record`] without matching.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentOutcome {
    /// The sequences aligned; the full summary is attached.
    Aligned(AlignmentReport),
    /// No alignment was produced, with the stage that gave up.
    Rejected(RejectReason),
}

impl AlignmentOutcome {
    /// The report, when the sequences aligned.
    pub fn report(&self) -> Option<&AlignmentReport> {
        match self {
            AlignmentOutcome::Aligned(report) => Some(report),
            AlignmentOutcome::Rejected(_) => None,
        }
    }

    /// Wire-format record: the report serialization, or the empty string.
    pub fn to_record(&self) -> String {
        match self {
            AlignmentOutcome::Aligned(report) => report.to_record(),
            AlignmentOutcome::Rejected(_) => String::new(),
        }
    }
}

/// Seeded banded semi-global aligner.
///
/// Each call owns all of its working state, so one aligner may be shared
/// across threads and calls run with zero coordination.
#[derive(Debug, Clone, Default)]
pub struct SemiGlobalAligner {
    config: AlignmentConfig,
}

impl SemiGlobalAligner {
    /// Create an aligner with the given configuration.
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    /// The configuration this aligner runs with.
    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Align `seq1` against `seq2` and summarize the result.
    ///
    /// Degenerate inputs (empty sequences, k-mer size out of range) flow
    /// through as empty intermediate collections and come back as a
    /// [`RejectReason::NoSeeds`] rejection rather than an error.
    pub fn align(&self, seq1: &[u8], seq2: &[u8]) -> AlignmentOutcome {
        let clock = Instant::now();

        let s1_kmers = sequence_kmers(seq1, self.config.kmer_size);
        let s2_kmers = sequence_kmers(seq2, self.config.kmer_size);
        let locations = common_locations(&s1_kmers, &s2_kmers);
        debug!(locations = locations.len(), "collected common k-mer locations");

        let seed_set: SeedSet = locations.into_iter().collect();
        let chain = chain_seeds(seed_set);
        if chain.is_empty() {
            return AlignmentOutcome::Rejected(RejectReason::NoSeeds);
        }

        let ratio = match chain.span_ratio() {
            Some(ratio) => ratio,
            None => return AlignmentOutcome::Rejected(RejectReason::DegenerateChainSpan),
        };
        let allowed = self.config.allowed_length_discrepancy;
        if ratio < 1.0 - allowed || ratio > 1.0 + allowed {
            debug!(ratio, allowed, "seed chain span ratio out of tolerance");
            return AlignmentOutcome::Rejected(RejectReason::ImplausibleChain { ratio, allowed });
        }
        debug!(seeds = chain.len(), ratio, "seed chain accepted");

        let pair = match banded_alignment(seq1, seq2, &chain, self.config.band_size) {
            Some(pair) => pair,
            None => return AlignmentOutcome::Rejected(RejectReason::EmptyAlignment),
        };

        match summarize_alignment(&pair) {
            Some(mut report) => {
                report.elapsed_milliseconds = clock.elapsed().as_millis();
                debug!(
                    cigar = %report.cigar_string(),
                    identity = report.percent_identity,
                    "alignment complete"
                );
                AlignmentOutcome::Aligned(report)
            }
            None => AlignmentOutcome::Rejected(RejectReason::EmptyAlignment),
        }
    }
}
