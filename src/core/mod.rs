//! Core data types for variant assignment.
//!
//! - [`Reference`]: a named reference sequence with optional position labels
//! - [`PositionLabels`]: sequential or externally labeled base numbering
//! - [`ReferenceId`], [`MatchMode`], [`UnresolvedReason`]: matching metadata
//! - [`Annotation`]: the serialized description of one query's best match
//!
//! ## Position numbering
//!
//! | Mode       | Label of reference base `r` (0-based) |
//! |------------|----------------------------------------|
//! | Sequential | `start + r`                            |
//! | Labeled    | `labels[r]`                            |

pub mod annotation;
pub mod reference;
pub mod types;

pub use annotation::{Annotation, Call, Difference, Differences};
pub use reference::{PositionLabels, Reference};
pub use types::{MatchMode, ReferenceId, UnresolvedReason};
