//! Pairwise global alignment used by the indel-aware matcher.
//!
//! The engine only needs two equal-length gapped strings back from an
//! aligner, so any implementation of [`Aligner`] can be plugged in. The
//! default [`GlobalAligner`] runs rust-bio's affine-gap global alignment with
//! EMBOSS `needle`-like scoring.

use bio::alignment::pairwise;
use bio::alignment::AlignmentOperation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::annotation::GAP;
use crate::utils::validation::ungapped;

/// Largest DP matrix (query length x reference length) the default aligner will fill
pub const MAX_ALIGNMENT_CELLS: usize = 16_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("Alignment of {query} x {reference} bases exceeds the maximum matrix size")]
    TooLarge { query: usize, reference: usize },

    #[error("Aligner returned gapped sequences of different lengths ({query} vs {reference})")]
    UnequalLength { query: usize, reference: usize },

    #[error("Aligner output does not reproduce the {0} sequence once gaps are removed")]
    AlteredSequence(&'static str),
}

/// A pair of equal-length sequences with `-` marking gaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GappedAlignment {
    pub query: Vec<u8>,
    pub reference: Vec<u8>,
}

impl GappedAlignment {
    /// Alignment length in columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.query.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Check that this alignment is a gapped rendering of `query` against `reference`
    ///
    /// # Errors
    ///
    /// Returns `AlignError::UnequalLength` if the two rows differ in length, or
    /// `AlignError::AlteredSequence` if removing gaps does not give back the inputs.
    pub fn validate(&self, query: &[u8], reference: &[u8]) -> Result<(), AlignError> {
        if self.query.len() != self.reference.len() {
            return Err(AlignError::UnequalLength {
                query: self.query.len(),
                reference: self.reference.len(),
            });
        }
        if ungapped(&self.query) != query {
            return Err(AlignError::AlteredSequence("query"));
        }
        if ungapped(&self.reference) != reference {
            return Err(AlignError::AlteredSequence("reference"));
        }
        Ok(())
    }
}

/// A global pairwise aligner
pub trait Aligner: Send + Sync {
    /// Align `query` against `reference` end to end
    ///
    /// # Errors
    ///
    /// Returns an `AlignError` if the pair cannot be aligned.
    fn align(&self, query: &[u8], reference: &[u8]) -> Result<GappedAlignment, AlignError>;
}

/// Scoring for the default aligner, in half-point units so that the
/// EMBOSS default extension penalty of 0.5 stays integral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentScoring {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    /// Cost of the first base of a gap
    pub gap_open: i32,
    /// Cost of every further base of a gap
    pub gap_extend: i32,
}

impl Default for AlignmentScoring {
    fn default() -> Self {
        Self {
            match_score: 10,      // +5
            mismatch_penalty: 8,  // -4
            gap_open: 20,         // 10
            gap_extend: 1,        // 0.5
        }
    }
}

/// Affine-gap global aligner with end gaps scored like internal gaps
#[derive(Debug, Clone, Default)]
pub struct GlobalAligner {
    scoring: AlignmentScoring,
}

impl GlobalAligner {
    #[must_use]
    pub fn new(scoring: AlignmentScoring) -> Self {
        Self { scoring }
    }
}

impl Aligner for GlobalAligner {
    fn align(&self, query: &[u8], reference: &[u8]) -> Result<GappedAlignment, AlignError> {
        let (n, m) = (query.len(), reference.len());
        if n.saturating_mul(m) > MAX_ALIGNMENT_CELLS {
            return Err(AlignError::TooLarge {
                query: n,
                reference: m,
            });
        }
        if n == 0 || m == 0 {
            return Ok(GappedAlignment {
                query: [query, &vec![GAP; m][..]].concat(),
                reference: [&vec![GAP; n][..], reference].concat(),
            });
        }

        let AlignmentScoring {
            match_score,
            mismatch_penalty,
            gap_open,
            gap_extend,
        } = self.scoring;
        let score = move |a: u8, b: u8| {
            if a == b {
                match_score
            } else {
                -mismatch_penalty
            }
        };

        // rust-bio charges open + extend for the first gap base
        let mut aligner =
            pairwise::Aligner::with_capacity(n, m, -(gap_open - gap_extend), -gap_extend, score);
        let alignment = aligner.global(query, reference);

        Ok(gapped_rows(&alignment.operations, query, reference))
    }
}

/// Render alignment operations as two gapped rows
fn gapped_rows(
    operations: &[AlignmentOperation],
    query: &[u8],
    reference: &[u8],
) -> GappedAlignment {
    let mut aligned_query = Vec::with_capacity(query.len() + reference.len());
    let mut aligned_reference = Vec::with_capacity(query.len() + reference.len());
    let (mut x, mut y) = (0usize, 0usize);

    for op in operations {
        match *op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                aligned_query.push(query[x]);
                aligned_reference.push(reference[y]);
                x += 1;
                y += 1;
            }
            AlignmentOperation::Ins => {
                aligned_query.push(query[x]);
                aligned_reference.push(GAP);
                x += 1;
            }
            AlignmentOperation::Del => {
                aligned_query.push(GAP);
                aligned_reference.push(reference[y]);
                y += 1;
            }
            AlignmentOperation::Xclip(len) => {
                aligned_query.extend_from_slice(&query[x..x + len]);
                aligned_reference.extend(std::iter::repeat(GAP).take(len));
                x += len;
            }
            AlignmentOperation::Yclip(len) => {
                aligned_query.extend(std::iter::repeat(GAP).take(len));
                aligned_reference.extend_from_slice(&reference[y..y + len]);
                y += len;
            }
        }
    }

    GappedAlignment {
        query: aligned_query,
        reference: aligned_reference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn align(query: &str, reference: &str) -> (String, String) {
        let alignment = GlobalAligner::default()
            .align(query.as_bytes(), reference.as_bytes())
            .unwrap();
        alignment
            .validate(query.as_bytes(), reference.as_bytes())
            .unwrap();
        (
            String::from_utf8(alignment.query).unwrap(),
            String::from_utf8(alignment.reference).unwrap(),
        )
    }

    #[test]
    fn test_identical_sequences() {
        assert_eq!(align("ACGT", "ACGT"), ("ACGT".to_string(), "ACGT".to_string()));
    }

    #[test]
    fn test_mismatch_without_gaps() {
        assert_eq!(
            align("ACGAACGT", "ACGTACGT"),
            ("ACGAACGT".to_string(), "ACGTACGT".to_string())
        );
    }

    #[test]
    fn test_single_insertion() {
        assert_eq!(
            align("ACGTGACGTAC", "ACGTACGTAC"),
            ("ACGTGACGTAC".to_string(), "ACGT-ACGTAC".to_string())
        );
    }

    #[test]
    fn test_single_deletion() {
        assert_eq!(
            align("ACGACGTAC", "ACGTACGTAC"),
            ("ACG-ACGTAC".to_string(), "ACGTACGTAC".to_string())
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(align("", "ACG"), ("---".to_string(), "ACG".to_string()));
        assert_eq!(align("AC", ""), ("AC".to_string(), "--".to_string()));
        assert_eq!(align("", ""), (String::new(), String::new()));
    }

    #[test]
    fn test_too_large_rejected() {
        let long = vec![b'A'; 5_000];
        let result = GlobalAligner::default().align(&long, &long);
        assert!(matches!(result, Err(AlignError::TooLarge { .. })));
    }

    #[test]
    fn test_validate_detects_bad_output() {
        let unequal = GappedAlignment {
            query: b"AC".to_vec(),
            reference: b"A".to_vec(),
        };
        assert!(matches!(
            unequal.validate(b"AC", b"A"),
            Err(AlignError::UnequalLength { .. })
        ));

        let altered = GappedAlignment {
            query: b"AG".to_vec(),
            reference: b"AC".to_vec(),
        };
        assert_eq!(
            altered.validate(b"AC", b"AC"),
            Err(AlignError::AlteredSequence("query"))
        );
    }

    /// Affine score of a pair of gapped rows under the default scoring
    fn row_score(alignment: &GappedAlignment) -> i32 {
        let scoring = AlignmentScoring::default();
        let mut score = 0;
        let mut prev: Option<(bool, bool)> = None;
        for (&q, &r) in alignment.query.iter().zip(&alignment.reference) {
            let gaps = (q == GAP, r == GAP);
            score += match gaps {
                (false, false) if q == r => scoring.match_score,
                (false, false) => -scoring.mismatch_penalty,
                _ if prev == Some(gaps) => -scoring.gap_extend,
                _ => -scoring.gap_open,
            };
            prev = Some(gaps);
        }
        score
    }

    #[test]
    fn test_rows_score_as_optimal_alignment() {
        let pairs: [(&[u8], &[u8]); 5] = [
            (b"ACGTTTACGT", b"ACGTACGT"),
            (b"ACGT", b"TTACGTTT"),
            (b"GATTACA", b"GCATGCT"),
            (b"AAAAAAAAAC", b"CAAAAAAAAA"),
            (b"ACGTACGTACGTACGT", b"ACGTACGAACGTCGT"),
        ];
        let scoring = AlignmentScoring::default();
        let score = |a: u8, b: u8| {
            if a == b {
                scoring.match_score
            } else {
                -scoring.mismatch_penalty
            }
        };

        for (query, reference) in pairs {
            let alignment = GlobalAligner::default().align(query, reference).unwrap();
            alignment.validate(query, reference).unwrap();

            let mut expected = pairwise::Aligner::new(
                -(scoring.gap_open - scoring.gap_extend),
                -scoring.gap_extend,
                &score,
            );
            let optimal = expected.global(query, reference).score;
            assert_eq!(row_score(&alignment), optimal);
        }
    }
}
