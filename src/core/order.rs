//! Total order over genomic coordinates.
//!
//! Coordinates are ordered by reference genome id (lexically), then by the
//! position of their contig in the genome's catalog contig list, then by
//! offset. The contig ranks are snapshotted from a [`ReferenceCatalog`] once,
//! which is sound because catalog metadata is static for its lifetime.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::store::{CatalogError, ReferenceCatalog};
use crate::core::contig::Contig;
use crate::core::coordinate::GenomicCoordinate;
use crate::core::types::ReferenceGenome;

/// Sort key of a coordinate under a [`CoordinateOrder`].
///
/// The derived ordering (genome id, contig rank, offset) is the coordinate
/// order itself, so keys can be sorted and binary searched directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoordinateKey {
    genome: Arc<str>,
    rank: usize,
    offset: u64,
}

impl CoordinateKey {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

#[derive(Debug, Clone, Default)]
pub struct CoordinateOrder {
    /// genome id -> contig id -> position in the catalog contig list
    ranks: HashMap<Arc<str>, HashMap<Arc<str>, usize>>,
}

impl CoordinateOrder {
    /// Build the order from every genome a catalog knows about
    ///
    /// # Errors
    ///
    /// Propagates any catalog lookup failure.
    pub fn from_catalog<C: ReferenceCatalog + ?Sized>(catalog: &C) -> Result<Self, CatalogError> {
        let mut lists = Vec::new();
        for genome in catalog.reference_genomes()? {
            let contigs = catalog.contigs(genome.id())?;
            lists.push((genome, contigs));
        }
        Ok(Self::from_contig_lists(lists))
    }

    /// Build the order from explicit `(genome, ordered contigs)` pairs
    pub fn from_contig_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = (ReferenceGenome, Vec<Contig>)>,
    {
        let mut ranks = HashMap::new();
        for (genome, contigs) in lists {
            let positions: HashMap<Arc<str>, usize> = contigs
                .iter()
                .enumerate()
                .map(|(rank, contig)| (Arc::from(contig.id()), rank))
                .collect();
            debug!(genome = %genome, contigs = positions.len(), "registered contig order");
            ranks.insert(genome.id, positions);
        }
        Self { ranks }
    }

    pub fn contains_genome(&self, genome: &str) -> bool {
        self.ranks.contains_key(genome)
    }

    /// Sort key for `coord`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReferenceGenomeNotFound` if the coordinate's genome
    /// is unknown, or `CatalogError::ContigNotFound` if its contig is not listed
    /// for that genome.
    pub fn key(&self, coord: &GenomicCoordinate) -> Result<CoordinateKey, CatalogError> {
        let genome = coord.contig.genome();
        let (genome_id, contigs) = self
            .ranks
            .get_key_value(genome)
            .ok_or_else(|| CatalogError::ReferenceGenomeNotFound(genome.to_string()))?;
        let rank = contigs
            .get(coord.contig.id())
            .copied()
            .ok_or_else(|| CatalogError::ContigNotFound {
                genome: genome.to_string(),
                contig: coord.contig.id().to_string(),
            })?;

        Ok(CoordinateKey {
            genome: Arc::clone(genome_id),
            rank,
            offset: coord.offset,
        })
    }

    /// Compare two coordinates
    ///
    /// # Errors
    ///
    /// Fails like [`CoordinateOrder::key`] if either coordinate is unknown.
    pub fn compare(
        &self,
        a: &GenomicCoordinate,
        b: &GenomicCoordinate,
    ) -> Result<Ordering, CatalogError> {
        Ok(self.key(a)?.cmp(&self.key(b)?))
    }

    /// Sort coordinates and drop duplicates, keeping each coordinate's key
    ///
    /// # Errors
    ///
    /// Fails on the first coordinate that cannot be keyed.
    pub fn sorted_distinct<I>(
        &self,
        coords: I,
    ) -> Result<Vec<(CoordinateKey, GenomicCoordinate)>, CatalogError>
    where
        I: IntoIterator<Item = GenomicCoordinate>,
    {
        let mut keyed = coords
            .into_iter()
            .map(|coord| Ok((self.key(&coord)?, coord)))
            .collect::<Result<Vec<_>, CatalogError>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.dedup_by(|a, b| a.0 == b.0);
        Ok(keyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> CoordinateOrder {
        CoordinateOrder::from_contig_lists(vec![
            (
                ReferenceGenome::new("g1"),
                vec![
                    Contig::with_length("g1", "chr2", 10),
                    Contig::with_length("g1", "chr1", 10),
                ],
            ),
            (
                ReferenceGenome::new("g0"),
                vec![Contig::with_length("g0", "chrZ", 10)],
            ),
        ])
    }

    fn coord(genome: &str, contig: &str, offset: u64) -> GenomicCoordinate {
        GenomicCoordinate::new(Contig::new(genome, contig), offset)
    }

    #[test]
    fn test_compare_uses_catalog_contig_order() {
        let order = order();
        // chr2 is listed before chr1, so it sorts first regardless of name
        assert_eq!(
            order
                .compare(&coord("g1", "chr2", 9), &coord("g1", "chr1", 0))
                .unwrap(),
            Ordering::Less
        );
        assert_eq!(
            order
                .compare(&coord("g1", "chr1", 3), &coord("g1", "chr1", 3))
                .unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_genomes_lexically_first() {
        let order = order();
        assert_eq!(
            order
                .compare(&coord("g1", "chr2", 0), &coord("g0", "chrZ", 9))
                .unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_unknown_genome() {
        let err = order()
            .compare(&coord("g1", "chr1", 0), &coord("hg38", "chr1", 0))
            .unwrap_err();
        assert!(matches!(err, CatalogError::ReferenceGenomeNotFound(g) if g == "hg38"));
    }

    #[test]
    fn test_compare_unknown_contig() {
        let err = order()
            .compare(&coord("g1", "chrX", 0), &coord("g1", "chr1", 0))
            .unwrap_err();
        assert!(matches!(err, CatalogError::ContigNotFound { contig, .. } if contig == "chrX"));
    }

    #[test]
    fn test_sorted_distinct() {
        let sorted = order()
            .sorted_distinct(vec![
                coord("g1", "chr1", 4),
                coord("g1", "chr2", 8),
                coord("g1", "chr1", 4),
                coord("g1", "chr1", 0),
            ])
            .unwrap();
        let coords: Vec<String> = sorted.iter().map(|(_, c)| c.to_string()).collect();
        assert_eq!(coords, vec!["chr2:8", "chr1:0", "chr1:4"]);
        assert!(sorted.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
