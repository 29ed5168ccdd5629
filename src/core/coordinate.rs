use serde::{Deserialize, Serialize};

use crate::core::contig::Contig;

/// A border position on a contig.
///
/// Offsets address the gaps between bases, so `offset == contig length` is the
/// position just past the last base and is a valid coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicCoordinate {
    pub contig: Contig,
    pub offset: u64,
}

impl GenomicCoordinate {
    pub fn new(contig: Contig, offset: u64) -> Self {
        Self { contig, offset }
    }

    /// Parse a `contig:offset` string (e.g. `chr1:1500`) within `genome`.
    ///
    /// The split happens on the last colon so contig names that themselves
    /// contain colons (HLA alleles, for instance) still parse.
    pub fn parse(text: &str, genome: &str) -> Option<Self> {
        let (contig, offset) = text.trim().rsplit_once(':')?;
        if contig.is_empty() {
            return None;
        }
        let offset = offset.replace('_', "").replace(',', "").parse().ok()?;
        Some(Self::new(Contig::new(genome, contig), offset))
    }
}

impl std::fmt::Display for GenomicCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.contig.id(), self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let coord = GenomicCoordinate::parse("chr1:1,500", "hg38").unwrap();
        assert_eq!(coord.contig, Contig::new("hg38", "chr1"));
        assert_eq!(coord.offset, 1500);
        assert_eq!(coord.to_string(), "chr1:1500");

        let hla = GenomicCoordinate::parse("HLA-A*01:01:01:01:10", "hg38").unwrap();
        assert_eq!(hla.contig.id(), "HLA-A*01:01:01:01");
        assert_eq!(hla.offset, 10);
    }

    #[test]
    fn test_parse_invalid_coordinate() {
        assert!(GenomicCoordinate::parse("chr1", "hg38").is_none());
        assert!(GenomicCoordinate::parse(":5", "hg38").is_none());
        assert!(GenomicCoordinate::parse("chr1:-5", "hg38").is_none());
    }
}
