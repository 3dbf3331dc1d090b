//! The colon-delimited annotation string written for every query.
//!
//! ```text
//! {reference}:{mismatches}:{insertions}:{deletions}:{mismatch list}:{insertion list}:{deletion list}[:{count}]
//! ```
//!
//! Each list is comma-joined. An entry is written as reference base, position
//! label, observed base, with `-` standing in for the gap side of an indel:
//!
//! | Kind      | Example |
//! |-----------|---------|
//! | Mismatch  | `A12G`  |
//! | Insertion | `-12T`  |
//! | Deletion  | `C7-`   |
//!
//! Unresolved queries are written as `NA:nan:nan:nan:::` so that "no
//! differences" and "not compared" stay distinguishable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::types::ReferenceId;

/// Reference field written for unresolved queries
pub const UNRESOLVED_REFERENCE: &str = "NA";

/// Count field written for unresolved queries
pub const NOT_AVAILABLE: &str = "nan";

/// Gap character used in alignments and annotation entries
pub const GAP: u8 = b'-';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Expected 7 or 8 colon-separated fields, found {0}")]
    FieldCount(usize),

    #[error("Invalid count field: '{0}'")]
    InvalidCount(String),

    #[error("Invalid difference entry: '{0}'")]
    InvalidEntry(String),

    #[error("{kind} count {count} does not match {listed} listed entries")]
    CountMismatch {
        kind: &'static str,
        count: usize,
        listed: usize,
    },

    #[error("Unresolved annotation must have 'nan' counts and empty lists")]
    MalformedUnresolved,
}

/// A single base-level difference between a query and its reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    /// Position label (sequential or from the reference numbering)
    pub position: i64,
    /// Base seen in the query, `-` for a deletion
    pub observed: char,
    /// Base in the reference, `-` for an insertion
    pub reference: char,
}

impl Difference {
    pub fn new(position: i64, observed: u8, reference: u8) -> Self {
        Self {
            position,
            observed: char::from(observed),
            reference: char::from(reference),
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.reference, self.position, self.observed)
    }
}

impl FromStr for Difference {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnnotationError::InvalidEntry(s.to_string());

        let mut chars = s.chars();
        let reference = chars.next().ok_or_else(invalid)?;
        let observed = chars.next_back().ok_or_else(invalid)?;
        let position = chars.as_str().parse::<i64>().map_err(|_| invalid())?;

        Ok(Self {
            position,
            observed,
            reference,
        })
    }
}

/// Mismatches, insertions and deletions of a query relative to its reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Differences {
    pub mismatches: Vec<Difference>,
    pub insertions: Vec<Difference>,
    pub deletions: Vec<Difference>,
}

impl Differences {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty() && self.insertions.is_empty() && self.deletions.is_empty()
    }

    /// Total number of differences of all kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.mismatches.len() + self.insertions.len() + self.deletions.len()
    }
}

/// Outcome recorded in an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    Resolved {
        reference: ReferenceId,
        differences: Differences,
    },
    Unresolved,
}

/// Serializable annotation of one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub call: Call,

    /// Caller-supplied value appended as a final field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<String>,
}

impl Annotation {
    pub fn resolved(reference: ReferenceId, differences: Differences) -> Self {
        Self {
            call: Call::Resolved {
                reference,
                differences,
            },
            count: None,
        }
    }

    #[must_use]
    pub fn unresolved() -> Self {
        Self {
            call: Call::Unresolved,
            count: None,
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: impl Into<String>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn reference(&self) -> Option<&ReferenceId> {
        match &self.call {
            Call::Resolved { reference, .. } => Some(reference),
            Call::Unresolved => None,
        }
    }

    #[must_use]
    pub fn differences(&self) -> Option<&Differences> {
        match &self.call {
            Call::Resolved { differences, .. } => Some(differences),
            Call::Unresolved => None,
        }
    }
}

fn join(entries: &[Difference]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.call {
            Call::Resolved {
                reference,
                differences,
            } => write!(
                f,
                "{}:{}:{}:{}:{}:{}:{}",
                reference,
                differences.mismatches.len(),
                differences.insertions.len(),
                differences.deletions.len(),
                join(&differences.mismatches),
                join(&differences.insertions),
                join(&differences.deletions),
            )?,
            Call::Unresolved => write!(
                f,
                "{UNRESOLVED_REFERENCE}:{NOT_AVAILABLE}:{NOT_AVAILABLE}:{NOT_AVAILABLE}:::"
            )?,
        }

        if let Some(count) = &self.count {
            write!(f, ":{count}")?;
        }
        Ok(())
    }
}

fn parse_list(field: &str) -> Result<Vec<Difference>, AnnotationError> {
    if field.is_empty() {
        return Ok(Vec::new());
    }
    field.split(',').map(str::parse).collect()
}

fn parse_count(field: &str, kind: &'static str, listed: usize) -> Result<usize, AnnotationError> {
    let count: usize = field
        .parse()
        .map_err(|_| AnnotationError::InvalidCount(field.to_string()))?;
    if count != listed {
        return Err(AnnotationError::CountMismatch {
            kind,
            count,
            listed,
        });
    }
    Ok(count)
}

impl FromStr for Annotation {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() != 7 && fields.len() != 8 {
            return Err(AnnotationError::FieldCount(fields.len()));
        }
        let count = fields.get(7).map(|c| (*c).to_string());

        if fields[0] == UNRESOLVED_REFERENCE {
            let well_formed = fields[1..4].iter().all(|f| *f == NOT_AVAILABLE)
                && fields[4..7].iter().all(|f| f.is_empty());
            if !well_formed {
                return Err(AnnotationError::MalformedUnresolved);
            }
            return Ok(Self {
                call: Call::Unresolved,
                count,
            });
        }

        let differences = Differences {
            mismatches: parse_list(fields[4])?,
            insertions: parse_list(fields[5])?,
            deletions: parse_list(fields[6])?,
        };
        parse_count(fields[1], "Mismatch", differences.mismatches.len())?;
        parse_count(fields[2], "Insertion", differences.insertions.len())?;
        parse_count(fields[3], "Deletion", differences.deletions.len())?;

        Ok(Self {
            call: Call::Resolved {
                reference: ReferenceId::new(fields[0]),
                differences,
            },
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Annotation {
        Annotation::resolved(
            ReferenceId::new("WT"),
            Differences {
                mismatches: vec![Difference::new(3, b'G', b'A'), Difference::new(9, b'T', b'C')],
                insertions: vec![Difference::new(5, b'T', GAP)],
                deletions: vec![Difference::new(-2, GAP, b'C')],
            },
        )
    }

    #[test]
    fn test_format_resolved() {
        assert_eq!(sample().to_string(), "WT:2:1:1:A3G,C9T:-5T:C-2-");
    }

    #[test]
    fn test_format_exact() {
        let annotation = Annotation::resolved(ReferenceId::new("WT"), Differences::default());
        assert_eq!(annotation.to_string(), "WT:0:0:0:::");
    }

    #[test]
    fn test_format_unresolved_uses_markers() {
        assert_eq!(Annotation::unresolved().to_string(), "NA:nan:nan:nan:::");
        assert_eq!(
            Annotation::unresolved().with_count("17").to_string(),
            "NA:nan:nan:nan::::17"
        );
    }

    #[test]
    fn test_format_with_empty_count_keeps_trailing_field() {
        let annotation = Annotation::resolved(ReferenceId::new("WT"), Differences::default())
            .with_count("");
        assert_eq!(annotation.to_string(), "WT:0:0:0::::");
    }

    #[test]
    fn test_parse_recovers_formatted_annotation() {
        for annotation in [
            sample(),
            sample().with_count("42"),
            Annotation::unresolved(),
            Annotation::unresolved().with_count(""),
            Annotation::resolved(ReferenceId::new("v2"), Differences::default()),
        ] {
            let parsed: Annotation = annotation.to_string().parse().unwrap();
            assert_eq!(parsed, annotation);
        }
    }

    #[test]
    fn test_parse_negative_position() {
        let entry: Difference = "C-2-".parse().unwrap();
        assert_eq!(entry.position, -2);
        assert_eq!(entry.reference, 'C');
        assert_eq!(entry.observed, '-');
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            "WT:1:0:0".parse::<Annotation>(),
            Err(AnnotationError::FieldCount(4))
        );
        assert!(matches!(
            "WT:2:0:0:A3G:::".parse::<Annotation>(),
            Err(AnnotationError::CountMismatch { count: 2, listed: 1, .. })
        ));
        assert!(matches!(
            "WT:x:0:0::::".parse::<Annotation>(),
            Err(AnnotationError::InvalidCount(_))
        ));
        assert!(matches!(
            "WT:1:0:0:AG:::".parse::<Annotation>(),
            Err(AnnotationError::InvalidEntry(_))
        ));
        assert_eq!(
            "NA:0:0:0:::".parse::<Annotation>(),
            Err(AnnotationError::MalformedUnresolved)
        );
    }
}
