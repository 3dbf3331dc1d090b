//! Order-preserving parallel annotation of many queries.
//!
//! Each query is tagged with its input index, matched on a rayon pool, and
//! the `(index, result)` pairs are sorted back into input order. Output rows
//! are joined to input rows by position, so the order is part of the contract.

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::types::UnresolvedReason;
use crate::matching::engine::{MatchResult, MatchingEngine};
use crate::utils::validation::normalize_sequence;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Tallies of batch outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub exact: usize,
    pub approximate: usize,
    pub tied: usize,
    pub unresolved: usize,
    pub aligner_failures: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result {
                MatchResult::Exact { .. } => summary.exact += 1,
                MatchResult::Approximate { tied, .. } => {
                    summary.approximate += 1;
                    if !tied.is_empty() {
                        summary.tied += 1;
                    }
                }
                MatchResult::Unresolved { reason } => {
                    summary.unresolved += 1;
                    if matches!(reason, UnresolvedReason::AlignerFailure(_)) {
                        summary.aligner_failures += 1;
                    }
                }
            }
        }
        summary
    }
}

/// Match every query on a pool of `threads` workers, returning results in input order.
///
/// A failing query never aborts the batch: it comes back as `Unresolved` and
/// is logged with its input index.
///
/// # Errors
///
/// Returns `BatchError::ThreadPool` if the worker pool cannot be created.
pub fn annotate_batch<S>(
    engine: &MatchingEngine<'_>,
    queries: &[S],
    threads: usize,
) -> Result<Vec<MatchResult>, BatchError>
where
    S: AsRef<str> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()?;

    info!(
        "Annotating {} queries against {} references with {} thread(s)",
        queries.len(),
        engine.references().len(),
        pool.current_num_threads()
    );

    let mut tagged: Vec<(usize, MatchResult)> = pool.install(|| {
        queries
            .par_iter()
            .enumerate()
            .map(|(index, query)| {
                let result = engine.find_match(&normalize_sequence(query.as_ref()));
                if let MatchResult::Unresolved {
                    reason: UnresolvedReason::AlignerFailure(msg),
                } = &result
                {
                    warn!("Query {index} left unresolved: {msg}");
                }
                (index, result)
            })
            .collect()
    });

    tagged.sort_unstable_by_key(|(index, _)| *index);

    Ok(tagged.into_iter().map(|(_, result)| result).collect())
}
