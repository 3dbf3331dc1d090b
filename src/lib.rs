//! # variant-annotator
//!
//! A library for assigning short sequences to the closest of a fixed set of
//! reference sequences and describing how they differ.
//!
//! Barcoded sequencing libraries are often built from a known set of designed
//! variants. Each consensus read has to be traced back to the variant it came
//! from, and any mismatches, insertions or deletions relative to that variant
//! recorded.
//!
//! ## Features
//!
//! - **Exact matching**: byte-identical queries short-circuit all scoring
//! - **Mismatch-only matching**: Hamming distance against same-length references,
//!   with an optional mismatch cutoff
//! - **Indel-aware matching**: global alignment against every reference
//! - **Deterministic ties**: the lowest reference ID wins, with a warning
//! - **Non-sequential numbering**: per-base position labels from FASTQ references
//! - **Parallel batches**: results come back in input order
//!
//! ## Example
//!
//! ```rust
//! use variant_annotator::{MatchingConfig, MatchingEngine, Reference, ReferenceSet};
//!
//! let references = ReferenceSet::build(vec![
//!     Reference::new("WT", "ACGTACGT"),
//!     Reference::new("A4T", "ACGAACGT"),
//! ])
//! .unwrap();
//!
//! let engine = MatchingEngine::new(&references, MatchingConfig::default());
//! let annotation = engine.annotate(b"ACGTACGA");
//!
//! assert_eq!(annotation.to_string(), "WT:1:0:0:T8A::");
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Reference set storage and indexing
//! - [`core`]: Core data types for references, results and annotations
//! - [`matching`]: Matching engine, alignment and batch processing
//! - [`parsing`]: Reference file loaders and query table IO
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::ReferenceSet;
pub use core::annotation::Annotation;
pub use core::reference::{PositionLabels, Reference};
pub use core::types::*;
pub use matching::engine::{MatchResult, MatchingConfig, MatchingEngine};
