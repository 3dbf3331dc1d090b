//! Translation of 0-based reference offsets into reported position labels.
//!
//! Offsets count reference bases, so an insertion is reported at the offset
//! of the reference base it precedes. A trailing insertion therefore sits one
//! past the last reference base; in labeled numbering such offsets continue
//! counting up from the last label.

use crate::core::reference::{PositionLabels, Reference};

/// Maps reference offsets to labels for one reference
#[derive(Debug, Clone, Copy)]
pub struct PositionLabeler<'a> {
    labels: Option<&'a [i64]>,
    start: i64,
}

impl<'a> PositionLabeler<'a> {
    /// Consecutive numbering beginning at `start`
    #[must_use]
    pub fn sequential(start: i64) -> Self {
        Self {
            labels: None,
            start,
        }
    }

    /// Labeler for `reference`; falls back to sequential numbering unless
    /// `numbered` is set and the reference carries a non-empty label list
    #[must_use]
    pub fn for_reference(reference: &'a Reference, numbered: bool, start: i64) -> Self {
        match &reference.labels {
            PositionLabels::Labeled(labels) if numbered && !labels.is_empty() => Self {
                labels: Some(labels.as_slice()),
                start,
            },
            _ => Self::sequential(start),
        }
    }

    /// Label for a 0-based reference offset
    #[must_use]
    #[allow(clippy::cast_possible_wrap)] // Offsets are bounded by sequence length
    pub fn label(&self, offset: usize) -> i64 {
        match self.labels {
            Some(labels) => match labels.get(offset) {
                Some(&label) => label,
                None => {
                    let last = labels.len() - 1;
                    labels[last] + (offset - last) as i64
                }
            },
            None => self.start + offset as i64,
        }
    }
}
