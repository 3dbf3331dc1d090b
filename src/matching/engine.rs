use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::index::CandidateFinder;
use crate::catalog::store::ReferenceSet;
use crate::core::annotation::{Annotation, Differences, GAP};
use crate::core::types::{MatchMode, ReferenceId, UnresolvedReason};
use crate::matching::aligner::{Aligner, GappedAlignment, GlobalAligner};
use crate::matching::diagnosis::{diagnose_alignment, diagnose_mismatches};
use crate::matching::positions::PositionLabeler;
use crate::matching::scoring::{hamming_distance, select_best, BestCandidate, MatchCandidate};

/// Default position of the first base of a reference
pub const DEFAULT_START_POSITION: i64 = 1;

/// Result of matching one query against the reference set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchResult {
    /// The query is byte-identical to a reference
    Exact { reference: ReferenceId },

    /// The query is closest to a reference but differs from it
    Approximate {
        reference: ReferenceId,
        /// Hamming distance, over the gapped alignment in indel mode
        distance: usize,
        differences: Differences,
        /// Other references at the same minimum distance
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tied: Vec<ReferenceId>,
    },

    /// No reference could be assigned
    Unresolved { reason: UnresolvedReason },
}

impl MatchResult {
    /// The assigned reference, if any
    #[must_use]
    pub fn reference(&self) -> Option<&ReferenceId> {
        match self {
            Self::Exact { reference } | Self::Approximate { reference, .. } => Some(reference),
            Self::Unresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved { .. })
    }

    /// Build the annotation for this result
    #[must_use]
    pub fn to_annotation(&self) -> Annotation {
        match self {
            Self::Exact { reference } => {
                Annotation::resolved(reference.clone(), Differences::default())
            }
            Self::Approximate {
                reference,
                differences,
                ..
            } => Annotation::resolved(reference.clone(), differences.clone()),
            Self::Unresolved { .. } => Annotation::unresolved(),
        }
    }
}

/// Configuration for the matching engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Mismatch-only or indel-aware matching after an exact miss
    pub mode: MatchMode,
    /// Maximum Hamming distance accepted in mismatch-only mode (default: query length)
    pub mismatch_cutoff: Option<usize>,
    /// Report positions using per-reference labels when available
    pub numbered: bool,
    /// Position of the first reference base in sequential numbering
    pub start_position: i64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::MismatchOnly,
            mismatch_cutoff: None,
            numbered: false,
            start_position: DEFAULT_START_POSITION,
        }
    }
}

/// The main matching engine
pub struct MatchingEngine<'a> {
    references: &'a ReferenceSet,
    aligner: Box<dyn Aligner>,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create an engine using the default global aligner
    pub fn new(references: &'a ReferenceSet, config: MatchingConfig) -> Self {
        Self {
            references,
            aligner: Box::new(GlobalAligner::default()),
            config,
        }
    }

    /// Replace the aligner used in indel mode
    #[must_use]
    pub fn with_aligner(mut self, aligner: impl Aligner + 'static) -> Self {
        self.aligner = Box::new(aligner);
        self
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn references(&self) -> &ReferenceSet {
        self.references
    }

    /// Find the best matching reference for a query.
    ///
    /// The query is upper-cased first. An exact match always wins; otherwise
    /// the configured mode decides how the remaining references are compared.
    pub fn find_match(&self, query: &[u8]) -> MatchResult {
        let query = query.to_ascii_uppercase();
        let finder = CandidateFinder::new(self.references);

        if let Some(idx) = finder.find_exact(&query) {
            return MatchResult::Exact {
                reference: self.references.reference(idx).id.clone(),
            };
        }

        match self.config.mode {
            MatchMode::MismatchOnly => self.find_mismatch_only(&finder, &query),
            MatchMode::Indel => self.find_with_indels(&finder, &query),
        }
    }

    /// Find the match for a query and render it as an annotation
    pub fn annotate(&self, query: &[u8]) -> Annotation {
        self.find_match(query).to_annotation()
    }

    fn find_mismatch_only(&self, finder: &CandidateFinder<'_>, query: &[u8]) -> MatchResult {
        let candidates = finder.find_same_length(query);

        let scored = candidates.iter().map(|&index| MatchCandidate {
            index,
            distance: hamming_distance(query, &self.references.reference(index).sequence),
        });
        let Some(best) = select_best(scored) else {
            return MatchResult::Unresolved {
                reason: UnresolvedReason::NoCandidateOfMatchingLength,
            };
        };

        let cutoff = self.config.mismatch_cutoff.unwrap_or(query.len());
        if best.best.distance > cutoff {
            debug!(
                "Closest reference is {} mismatches away, above cutoff {}",
                best.best.distance, cutoff
            );
            return MatchResult::Unresolved {
                reason: UnresolvedReason::CutoffExceeded {
                    distance: best.best.distance,
                    cutoff,
                },
            };
        }

        let reference = self.references.reference(best.best.index);
        let labeler = self.labeler(best.best.index);
        let differences = diagnose_mismatches(query, &reference.sequence, &labeler);

        self.approximate(&best, differences)
    }

    fn find_with_indels(&self, finder: &CandidateFinder<'_>, query: &[u8]) -> MatchResult {
        if self.references.is_empty() {
            return MatchResult::Unresolved {
                reason: UnresolvedReason::EmptyReferenceSet,
            };
        }
        if query.contains(&GAP) {
            return MatchResult::Unresolved {
                reason: UnresolvedReason::GapInQuery,
            };
        }

        let mut alignments: Vec<GappedAlignment> = Vec::with_capacity(self.references.len());
        for index in finder.find_all() {
            let reference = self.references.reference(index);
            let aligned = self
                .aligner
                .align(query, &reference.sequence)
                .and_then(|alignment| {
                    alignment.validate(query, &reference.sequence)?;
                    Ok(alignment)
                });
            match aligned {
                Ok(alignment) => alignments.push(alignment),
                Err(e) => {
                    return MatchResult::Unresolved {
                        reason: UnresolvedReason::AlignerFailure(format!(
                            "aligning against {}: {e}",
                            reference.id
                        )),
                    };
                }
            }
        }

        let scored = alignments
            .iter()
            .enumerate()
            .map(|(index, alignment)| MatchCandidate {
                index,
                distance: hamming_distance(&alignment.query, &alignment.reference),
            });
        let Some(best) = select_best(scored) else {
            return MatchResult::Unresolved {
                reason: UnresolvedReason::EmptyReferenceSet,
            };
        };

        let labeler = self.labeler(best.best.index);
        let differences = diagnose_alignment(&alignments[best.best.index], &labeler);

        self.approximate(&best, differences)
    }

    fn labeler(&self, index: usize) -> PositionLabeler<'a> {
        PositionLabeler::for_reference(
            self.references.reference(index),
            self.config.numbered,
            self.config.start_position,
        )
    }

    fn approximate(&self, best: &BestCandidate, differences: Differences) -> MatchResult {
        let reference = self.references.reference(best.best.index).id.clone();
        let tied: Vec<ReferenceId> = best
            .tied
            .iter()
            .map(|&idx| self.references.reference(idx).id.clone())
            .collect();

        if best.is_tie() {
            let others: Vec<&str> = tied.iter().map(ReferenceId::as_str).collect();
            warn!(
                "Multiple references are {} differences from the query; choosing {} over {}",
                best.best.distance,
                reference,
                others.join(", ")
            );
        }

        MatchResult::Approximate {
            reference,
            distance: best.best.distance,
            differences,
            tied,
        }
    }
}
