use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::core::types::ReferenceGenome;

/// A single contig/sequence in a reference genome.
///
/// The length may be unknown until the contig is resolved against a catalog.
/// Identity (equality and hashing) is the `(genome, id)` pair, so a resolved
/// and an unresolved handle on the same contig compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contig {
    /// Reference genome this contig belongs to
    genome: Arc<str>,

    /// Sequence name (e.g. `chr1`)
    id: Arc<str>,

    /// Sequence length in bases, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<u64>,
}

impl Contig {
    pub fn new(genome: impl AsRef<str>, id: impl AsRef<str>) -> Self {
        Self {
            genome: Arc::from(genome.as_ref()),
            id: Arc::from(id.as_ref()),
            length: None,
        }
    }

    pub fn with_length(genome: impl AsRef<str>, id: impl AsRef<str>, length: u64) -> Self {
        Self::new(genome, id).resolved(length)
    }

    /// Copy of this contig carrying `length`.
    ///
    /// A length that is already set is kept; lengths never change once known.
    #[must_use]
    pub fn resolved(&self, length: u64) -> Self {
        Self {
            genome: Arc::clone(&self.genome),
            id: Arc::clone(&self.id),
            length: Some(self.length.unwrap_or(length)),
        }
    }

    pub fn genome(&self) -> &str {
        &self.genome
    }

    pub fn reference_genome(&self) -> ReferenceGenome {
        ReferenceGenome {
            id: Arc::clone(&self.genome),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn length(&self) -> Option<u64> {
        self.length
    }
}

impl PartialEq for Contig {
    fn eq(&self, other: &Self) -> bool {
        self.genome == other.genome && self.id == other.id
    }
}

impl Eq for Contig {}

impl Hash for Contig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.genome.hash(state);
        self.id.hash(state);
    }
}

impl std::fmt::Display for Contig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.genome, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_length() {
        let unresolved = Contig::new("hg38", "chr1");
        let resolved = Contig::with_length("hg38", "chr1", 100);
        assert_eq!(unresolved, resolved);
        assert_ne!(Contig::new("hg19", "chr1"), resolved);
    }

    #[test]
    fn test_resolved_length_is_immutable() {
        let contig = Contig::new("hg38", "chr1").resolved(100);
        assert_eq!(contig.length(), Some(100));
        assert_eq!(contig.resolved(5).length(), Some(100));
    }
}
