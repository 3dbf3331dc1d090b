use serde::{Deserialize, Serialize};

use crate::core::types::ReferenceId;

/// Numbering of the bases along a reference sequence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionLabels {
    /// Bases are numbered consecutively from the configured start position
    #[default]
    Sequential,
    /// One externally meaningful label per base
    Labeled(Vec<i64>),
}

impl PositionLabels {
    #[must_use]
    pub fn is_labeled(&self) -> bool {
        matches!(self, Self::Labeled(_))
    }
}

/// A named reference sequence that queries are assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Unique identifier
    pub id: ReferenceId,

    /// Uppercase sequence
    #[serde(with = "sequence_string")]
    pub sequence: Vec<u8>,

    /// Base numbering used in non-sequential numbering mode
    #[serde(default)]
    pub labels: PositionLabels,
}

impl Reference {
    /// Create a reference, upper-casing the sequence
    pub fn new(id: impl Into<String>, sequence: impl AsRef<[u8]>) -> Self {
        Self {
            id: ReferenceId::new(id),
            sequence: sequence.as_ref().to_ascii_uppercase(),
            labels: PositionLabels::Sequential,
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<i64>) -> Self {
        self.labels = PositionLabels::Labeled(labels);
        self
    }

    /// Sequence length in bases
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Serialize sequences as strings rather than byte arrays
mod sequence_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seq: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(seq))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.into_bytes())
    }
}
