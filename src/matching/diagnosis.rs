use crate::core::annotation::{Difference, Differences, GAP};
use crate::matching::aligner::GappedAlignment;
use crate::matching::positions::PositionLabeler;

/// List the mismatches between a query and a reference of the same length
#[must_use]
pub fn diagnose_mismatches(
    query: &[u8],
    reference: &[u8],
    labeler: &PositionLabeler<'_>,
) -> Differences {
    let mismatches = query
        .iter()
        .zip(reference)
        .enumerate()
        .filter(|(_, (q, r))| q != r)
        .map(|(offset, (&q, &r))| Difference::new(labeler.label(offset), q, r))
        .collect();

    Differences {
        mismatches,
        ..Differences::default()
    }
}

/// Walk a gapped alignment and classify every differing column.
///
/// Positions are reference offsets: the number of reference bases consumed
/// before the column. An insertion is reported at the offset of the
/// reference base that follows it.
#[must_use]
pub fn diagnose_alignment(
    alignment: &GappedAlignment,
    labeler: &PositionLabeler<'_>,
) -> Differences {
    let mut differences = Differences::default();
    let mut offset = 0usize;

    for (&q, &r) in alignment.query.iter().zip(&alignment.reference) {
        if r == GAP {
            differences
                .insertions
                .push(Difference::new(labeler.label(offset), q, r));
            continue;
        }

        if q == GAP {
            differences
                .deletions
                .push(Difference::new(labeler.label(offset), q, r));
        } else if q != r {
            differences
                .mismatches
                .push(Difference::new(labeler.label(offset), q, r));
        }
        offset += 1;
    }

    differences
}
