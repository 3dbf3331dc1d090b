//! Centralized validation and helper functions.

use crate::core::annotation::{GAP, UNRESOLVED_REFERENCE};

/// Maximum number of references in a set; every query is compared to all of them
pub const MAX_REFERENCES: usize = 100_000;

/// Check if adding another reference would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new reference.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_reference_limit(count: usize) -> Option<String> {
    if count >= MAX_REFERENCES {
        Some(format!(
            "Too many references: adding another would exceed maximum of {MAX_REFERENCES}"
        ))
    } else {
        None
    }
}

/// Validate a reference identifier for use in annotations.
///
/// Identifiers end up as the first field of a colon-delimited annotation, so
/// they must be non-empty, free of `:` and whitespace, and must not collide
/// with the unresolved marker.
///
/// # Examples
///
/// ```
/// use variant_annotator::utils::validation::validate_reference_id;
///
/// assert!(validate_reference_id("WT").is_ok());
/// assert!(validate_reference_id("var:1").is_err());
/// assert!(validate_reference_id("NA").is_err());
/// ```
///
/// # Errors
///
/// Returns a description of the problem if the identifier is unusable.
pub fn validate_reference_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Reference ID is empty".to_string());
    }
    if id == UNRESOLVED_REFERENCE {
        return Err(format!(
            "Reference ID '{UNRESOLVED_REFERENCE}' is reserved for unresolved queries"
        ));
    }
    if id.contains(':') || id.chars().any(char::is_whitespace) {
        return Err(format!(
            "Reference ID '{id}' contains ':' or whitespace"
        ));
    }
    Ok(())
}

/// Upper-case a sequence and strip surrounding whitespace
#[must_use]
pub fn normalize_sequence(seq: &str) -> Vec<u8> {
    seq.trim().as_bytes().to_ascii_uppercase()
}

/// Remove gap characters from an aligned sequence
#[must_use]
pub fn ungapped(aligned: &[u8]) -> Vec<u8> {
    aligned.iter().copied().filter(|&b| b != GAP).collect()
}
