use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::warn;

use crate::core::reference::{PositionLabels, Reference};
use crate::core::types::ReferenceId;
use crate::utils::validation::{check_reference_limit, validate_reference_id};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReferenceSetError {
    #[error("Duplicate reference ID: {0}")]
    DuplicateReferenceId(ReferenceId),

    #[error("Reference {id} has {labels} position labels for {sequence} bases")]
    LabelLengthMismatch {
        id: ReferenceId,
        sequence: usize,
        labels: usize,
    },

    #[error("Invalid reference ID: {0}")]
    InvalidReferenceId(String),

    #[error("Too many references: {0} exceeds maximum allowed (100000)")]
    TooManyReferences(usize),
}

/// The immutable set of references that queries are matched against.
///
/// References are held in ascending ID order. Every "first encountered"
/// rule in matching refers to this order.
#[derive(Debug)]
pub struct ReferenceSet {
    /// All references, sorted by ID
    references: Vec<Reference>,

    /// Index: reference ID -> index in references vec
    id_to_index: HashMap<ReferenceId, usize>,

    /// Index: sequence -> lowest-ID reference with this exact sequence
    sequence_to_ref: HashMap<Vec<u8>, usize>,

    /// Index: sequence length -> indices of references with that length, in ID order
    pub length_to_refs: HashMap<usize, Vec<usize>>,

    /// Pairs of references sharing an identical sequence
    duplicate_sequences: Vec<(ReferenceId, ReferenceId)>,
}

impl ReferenceSet {
    /// Build a reference set from loader records.
    ///
    /// Sequences are upper-cased. Byte-identical sequences under different IDs
    /// are accepted but logged; exact matches resolve to the lowest ID.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceSetError::DuplicateReferenceId` if two records share an
    /// ID, `LabelLengthMismatch` if a label list does not cover its sequence,
    /// `InvalidReferenceId` for IDs that cannot be written to an annotation, or
    /// `TooManyReferences` if the limit is exceeded.
    pub fn build<I>(records: I) -> Result<Self, ReferenceSetError>
    where
        I: IntoIterator<Item = Reference>,
    {
        let mut references: Vec<Reference> = Vec::new();
        let mut seen: HashSet<ReferenceId> = HashSet::new();

        for mut reference in records {
            if check_reference_limit(references.len()).is_some() {
                return Err(ReferenceSetError::TooManyReferences(references.len()));
            }
            validate_reference_id(reference.id.as_str())
                .map_err(ReferenceSetError::InvalidReferenceId)?;
            if !seen.insert(reference.id.clone()) {
                return Err(ReferenceSetError::DuplicateReferenceId(reference.id));
            }
            if let PositionLabels::Labeled(labels) = &reference.labels {
                if labels.len() != reference.sequence.len() {
                    return Err(ReferenceSetError::LabelLengthMismatch {
                        id: reference.id,
                        sequence: reference.sequence.len(),
                        labels: labels.len(),
                    });
                }
            }
            reference.sequence.make_ascii_uppercase();
            references.push(reference);
        }

        references.sort_by(|a, b| a.id.cmp(&b.id));

        let mut set = Self {
            references: Vec::with_capacity(references.len()),
            id_to_index: HashMap::new(),
            sequence_to_ref: HashMap::new(),
            length_to_refs: HashMap::new(),
            duplicate_sequences: Vec::new(),
        };
        for reference in references {
            set.add_reference(reference);
        }

        Ok(set)
    }

    /// Add a reference that sorts after every reference already present
    fn add_reference(&mut self, reference: Reference) {
        let index = self.references.len();

        self.id_to_index.insert(reference.id.clone(), index);

        if let Some(&first) = self.sequence_to_ref.get(&reference.sequence) {
            let first_id = self.references[first].id.clone();
            warn!(
                "References {} and {} have identical sequences; exact matches resolve to {}",
                first_id, reference.id, first_id
            );
            self.duplicate_sequences
                .push((first_id, reference.id.clone()));
        } else {
            self.sequence_to_ref
                .insert(reference.sequence.clone(), index);
        }

        self.length_to_refs
            .entry(reference.len())
            .or_default()
            .push(index);

        self.references.push(reference);
    }

    /// Get a reference by ID
    pub fn get(&self, id: &ReferenceId) -> Option<&Reference> {
        self.id_to_index.get(id).map(|&idx| &self.references[idx])
    }

    /// Index of the reference with exactly this sequence
    pub fn find_by_sequence(&self, sequence: &[u8]) -> Option<usize> {
        self.sequence_to_ref.get(sequence).copied()
    }

    /// All references, sorted by ID
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Reference at an index
    pub fn reference(&self, index: usize) -> &Reference {
        &self.references[index]
    }

    /// Pairs of reference IDs whose sequences are byte-identical
    pub fn duplicate_sequences(&self) -> &[(ReferenceId, ReferenceId)] {
        &self.duplicate_sequences
    }

    /// Number of references in the set
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
