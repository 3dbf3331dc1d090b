use serde::{Deserialize, Serialize};

/// Unique identifier for a reference sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferenceId(pub String);

impl ReferenceId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How queries that are not an exact match are compared to the references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Position-wise comparison against references of the same length only
    #[default]
    MismatchOnly,
    /// Global alignment against every reference, tolerating insertions and deletions
    Indel,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MismatchOnly => write!(f, "mismatch-only"),
            Self::Indel => write!(f, "indel"),
        }
    }
}

/// Why a query could not be assigned to a reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum UnresolvedReason {
    /// No reference has the same length as the query (mismatch-only mode)
    NoCandidateOfMatchingLength,
    /// The closest reference is further away than the mismatch cutoff
    CutoffExceeded { distance: usize, cutoff: usize },
    /// There are no references to compare against
    EmptyReferenceSet,
    /// The query contains the gap character, which alignment cannot place
    GapInQuery,
    /// The aligner failed or returned an unusable alignment
    AlignerFailure(String),
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCandidateOfMatchingLength => write!(f, "no reference of matching length"),
            Self::CutoffExceeded { distance, cutoff } => {
                write!(f, "distance {distance} exceeds mismatch cutoff {cutoff}")
            }
            Self::EmptyReferenceSet => write!(f, "reference set is empty"),
            Self::GapInQuery => write!(f, "query contains a gap character"),
            Self::AlignerFailure(msg) => write!(f, "aligner failure: {msg}"),
        }
    }
}
