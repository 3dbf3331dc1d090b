use super::store::ReferenceSet;

/// Finds the references a query should be compared against
pub struct CandidateFinder<'a> {
    references: &'a ReferenceSet,
}

impl<'a> CandidateFinder<'a> {
    pub fn new(references: &'a ReferenceSet) -> Self {
        Self { references }
    }

    /// Index of the reference whose sequence is byte-identical to the query
    pub fn find_exact(&self, query: &[u8]) -> Option<usize> {
        self.references.find_by_sequence(query)
    }

    /// Indices of references with exactly the query's length, in ID order
    pub fn find_same_length(&self, query: &[u8]) -> &'a [usize] {
        self.references
            .length_to_refs
            .get(&query.len())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Indices of every reference, in ID order
    pub fn find_all(&self) -> std::ops::Range<usize> {
        0..self.references.len()
    }
}
