//! Reference set storage and indexing.
//!
//! A [`ReferenceSet`](store::ReferenceSet) is built once from loader records
//! and shared read-only by every query. It keeps references in ascending ID
//! order and indexes them by exact sequence and by length.
//!
//! ## Example
//!
//! ```rust
//! use variant_annotator::catalog::store::ReferenceSet;
//! use variant_annotator::core::Reference;
//!
//! let references = ReferenceSet::build(vec![
//!     Reference::new("WT", "ACGTACGT"),
//!     Reference::new("A3T", "ACTTACGT"),
//! ])
//! .unwrap();
//!
//! assert_eq!(references.len(), 2);
//! assert!(references.find_by_sequence(b"ACGTACGT").is_some());
//! ```

pub mod index;
pub mod store;
