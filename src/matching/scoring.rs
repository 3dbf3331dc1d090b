/// Count the positions at which two equal-length sequences differ.
///
/// Gap characters are compared like any other byte, so a gap column in an
/// alignment counts as one difference.
///
/// # Examples
///
/// ```
/// use variant_annotator::matching::scoring::hamming_distance;
///
/// assert_eq!(hamming_distance(b"AAAA", b"AAAA"), 0);
/// assert_eq!(hamming_distance(b"AAAA", b"AAAT"), 1);
/// assert_eq!(hamming_distance(b"AC-GT", b"ACTG-"), 2);
/// ```
#[must_use]
pub fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
    debug_assert_eq!(a.len(), b.len(), "Hamming distance needs equal lengths");
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// A reference and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Index into the reference set
    pub index: usize,
    pub distance: usize,
}

/// The winning candidate and any others at the same distance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestCandidate {
    pub best: MatchCandidate,
    /// Indices of the other candidates sharing the minimum distance, in encounter order
    pub tied: Vec<usize>,
}

impl BestCandidate {
    #[must_use]
    pub fn is_tie(&self) -> bool {
        !self.tied.is_empty()
    }
}

/// Select the minimum-distance candidate; the first one encountered wins ties
pub fn select_best<I>(candidates: I) -> Option<BestCandidate>
where
    I: IntoIterator<Item = MatchCandidate>,
{
    let mut best: Option<MatchCandidate> = None;
    let mut tied = Vec::new();

    for candidate in candidates {
        match best {
            Some(current) if candidate.distance > current.distance => {}
            Some(current) if candidate.distance == current.distance => {
                tied.push(candidate.index);
            }
            _ => {
                best = Some(candidate);
                tied.clear();
            }
        }
    }

    best.map(|best| BestCandidate { best, tied })
}
