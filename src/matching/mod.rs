//! Query matching engine.
//!
//! This module provides the core matching functionality:
//!
//! - [`MatchingEngine`](engine::MatchingEngine): per-query dispatch
//! - [`annotate_batch`](batch::annotate_batch): order-preserving parallel batches
//! - [`Aligner`](aligner::Aligner): pluggable global alignment for indel mode
//!
//! ## Matching Algorithm
//!
//! 1. **Exact match**: a byte-identical reference is returned immediately
//! 2. **Mismatch-only mode**: Hamming distance to references of the query's
//!    length; the minimum wins if it is within the mismatch cutoff
//! 3. **Indel mode**: global alignment against every reference, Hamming
//!    distance over the gapped pair, global minimum with no cutoff
//!
//! Ties go to the reference with the lowest ID and are logged as warnings.
//!
//! ## Example
//!
//! ```rust
//! use variant_annotator::catalog::store::ReferenceSet;
//! use variant_annotator::core::{MatchMode, Reference};
//! use variant_annotator::matching::engine::{MatchingConfig, MatchingEngine};
//!
//! let references = ReferenceSet::build(vec![
//!     Reference::new("WT", "ACGTACGTAC"),
//!     Reference::new("M1", "ACGTTCGTAC"),
//! ])
//! .unwrap();
//!
//! let config = MatchingConfig { mode: MatchMode::Indel, ..MatchingConfig::default() };
//! let engine = MatchingEngine::new(&references, config);
//!
//! assert_eq!(engine.annotate(b"ACGTGACGTAC").to_string(), "WT:0:1:0::-5G:");
//! ```

pub mod aligner;
pub mod batch;
pub mod diagnosis;
pub mod engine;
pub mod positions;
pub mod scoring;
