use std::path::PathBuf;

use anyhow::{Context, Result};
use chainalign::{AlignmentConfig, AlignmentOutcome, SemiGlobalAligner};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chainalign", about = "Seeded banded semi-global sequence alignment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align two sequences and print the result record.
    Align {
        /// First sequence (plain FASTA without headers or raw sequence file).
        seq1: PathBuf,
        /// Second sequence file.
        seq2: PathBuf,
        /// K-mer width used to find alignment seeds.
        #[arg(long, default_value_t = 10)]
        kmer_size: usize,
        /// Corridor margin around the seed chain, in matrix columns.
        #[arg(long, default_value_t = 50)]
        band_size: usize,
        /// Allowed relative length discrepancy as judged by the seed chain.
        #[arg(long, default_value_t = 0.1)]
        length_discrepancy: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Align {
            seq1,
            seq2,
            kmer_size,
            band_size,
            length_discrepancy,
        } => run_align(
            seq1,
            seq2,
            AlignmentConfig::new(kmer_size, band_size, length_discrepancy),
        )?,
    }

    Ok(())
}

fn run_align(seq1_path: PathBuf, seq2_path: PathBuf, config: AlignmentConfig) -> Result<()> {
    let seq1 = read_sequence_file(&seq1_path)
        .with_context(|| format!("failed to read sequence from {}", seq1_path.display()))?;
    let seq2 = read_sequence_file(&seq2_path)
        .with_context(|| format!("failed to read sequence from {}", seq2_path.display()))?;

    let aligner = SemiGlobalAligner::new(config);
    match aligner.align(&seq1, &seq2) {
        AlignmentOutcome::Aligned(report) => println!("{}", report.to_record()),
        AlignmentOutcome::Rejected(reason) => {
            eprintln!("no alignment: {reason}");
            println!();
        }
    }

    Ok(())
}

fn read_sequence_file(path: &PathBuf) -> Result<Vec<u8>> {
    let contents = std::fs::read_to_string(path)?;
    let sequence: String = contents
        .lines()
        .filter(|line| !line.starts_with('>'))
        .map(str::trim)
        .collect();
    Ok(sequence.to_ascii_uppercase().into_bytes())
}
