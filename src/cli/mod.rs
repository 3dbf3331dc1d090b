//! Command-line interface for variant-annotator.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **annotate**: Annotate every row of a query table and write the table back out
//! - **query**: Annotate sequences given on the command line
//!
//! ## Usage
//!
//! ```text
//! # Mismatch-only annotation, at most 2 mismatches
//! variant-annotator annotate variants.fa reads.tsv annotated.tsv -m 2
//!
//! # Tolerate indels, label positions from a FASTQ reference, 8 threads
//! variant-annotator annotate variants.fq reads.tsv annotated.tsv -i -q -n 8
//!
//! # Quick look at a few sequences
//! variant-annotator query variants.fa ACGTACGT ACGTTCGT --format json
//! ```

use std::path::Path;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::catalog::store::ReferenceSet;
use crate::core::types::MatchMode;
use crate::matching::engine::{MatchingConfig, DEFAULT_START_POSITION};
use crate::parsing::fasta::load_references;

pub mod annotate;
pub mod query;

#[derive(Parser)]
#[command(name = "variant-annotator")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Assign sequences to reference variants and annotate their differences")]
#[command(
    long_about = "variant-annotator assigns each query sequence to its closest reference sequence.\n\nFor every query it reports:\n- The matching reference, or NA when none qualifies\n- The number of mismatches, insertions and deletions\n- The position and bases of each difference"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for the query command
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Annotate the sequences of a query table
    Annotate(annotate::AnnotateArgs),

    /// Annotate sequences given on the command line
    Query(query::QueryArgs),
}

/// Options controlling how queries are matched
#[derive(Args, Debug, Clone)]
pub struct MatchingArgs {
    /// Enable alignment so that insertions and deletions are annotated
    #[arg(short, long, conflicts_with = "mismatch_cutoff")]
    pub indel: bool,

    /// Maximum number of mismatches allowed without --indel (default: query length)
    #[arg(short, long)]
    pub mismatch_cutoff: Option<usize>,

    /// Number bases with labels from the FASTQ reference quality string
    #[arg(short = 'q', long)]
    pub numbered: bool,

    /// Position of the first base of each reference
    #[arg(short, long, default_value_t = DEFAULT_START_POSITION, allow_hyphen_values = true)]
    pub start_position: i64,
}

impl MatchingArgs {
    #[must_use]
    pub fn to_config(&self) -> MatchingConfig {
        MatchingConfig {
            mode: if self.indel {
                MatchMode::Indel
            } else {
                MatchMode::MismatchOnly
            },
            mismatch_cutoff: self.mismatch_cutoff,
            numbered: self.numbered,
            start_position: self.start_position,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load and index the reference file for a run
fn load_reference_set(path: &Path, numbered: bool) -> anyhow::Result<ReferenceSet> {
    let records = load_references(path, numbered)?;
    let references = ReferenceSet::build(records)?;

    info!(
        "Loaded {} references from {}",
        references.len(),
        path.display()
    );
    if !references.duplicate_sequences().is_empty() {
        info!(
            "{} pair(s) of references share identical sequences",
            references.duplicate_sequences().len()
        );
    }

    Ok(references)
}
