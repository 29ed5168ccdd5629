//! Nucleotide sequences that may span several contigs.

use serde::Serialize;
use tracing::debug;

use crate::catalog::shift::{left_gap_aware_shift, right_gap_aware_shift};
use crate::catalog::store::{CatalogError, ReferenceCatalog};
use crate::core::contig::Contig;
use crate::core::coordinate::GenomicCoordinate;

/// Outcome of looking a range up in an already fetched sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceLookup<T> {
    Found(T),
    Miss,
}

impl<T> SequenceLookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Miss => None,
        }
    }
}

/// Bases `[start, end)` of one contig
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContigSequence {
    pub contig: Contig,
    pub start: u64,
    pub end: u64,
    pub bases: String,
}

impl ContigSequence {
    pub fn new(contig: Contig, start: u64, bases: String) -> Self {
        let end = start + bases.len() as u64;
        Self {
            contig,
            start,
            end,
            bases,
        }
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// True if `coord` is a border inside (or at either end of) this fragment
    pub fn contains(&self, coord: &GenomicCoordinate) -> bool {
        coord.contig == self.contig && self.start <= coord.offset && coord.offset <= self.end
    }

    /// Sub-fragment `[from, to)`, `None` if it does not lie within this one
    pub fn slice(&self, from: u64, to: u64) -> Option<Self> {
        if from > to || from < self.start || to > self.end {
            return None;
        }
        let lo = usize::try_from(from - self.start).ok()?;
        let hi = usize::try_from(to - self.start).ok()?;
        let bases = self.bases.get(lo..hi)?.to_string();
        Some(Self::new(self.contig.clone(), from, bases))
    }
}

/// A sequence assembled from per-contig fragments in genome order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispersedSequence {
    fragments: Vec<ContigSequence>,
}

impl DispersedSequence {
    pub fn new(fragments: Vec<ContigSequence>) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &[ContigSequence] {
        &self.fragments
    }

    /// The bases of all fragments concatenated
    pub fn sequence(&self) -> String {
        self.fragments.iter().map(|f| f.bases.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fragments.iter().map(ContigSequence::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First border covered by this sequence
    pub fn first(&self) -> Option<GenomicCoordinate> {
        self.fragments
            .first()
            .map(|f| GenomicCoordinate::new(f.contig.clone(), f.start))
    }

    /// Last border covered by this sequence
    pub fn last(&self) -> Option<GenomicCoordinate> {
        self.fragments
            .last()
            .map(|f| GenomicCoordinate::new(f.contig.clone(), f.end))
    }

    fn fragment_of(&self, coord: &GenomicCoordinate) -> Option<usize> {
        self.fragments.iter().position(|f| f.contains(coord))
    }

    /// The part of this sequence between `start` and `end`.
    ///
    /// Misses when either border falls outside the fetched fragments or when
    /// `end` comes before `start`.
    pub fn lookup(
        &self,
        start: &GenomicCoordinate,
        end: &GenomicCoordinate,
    ) -> SequenceLookup<DispersedSequence> {
        let (Some(first), Some(last)) = (self.fragment_of(start), self.fragment_of(end)) else {
            return SequenceLookup::Miss;
        };

        let fragments = match first.cmp(&last) {
            std::cmp::Ordering::Greater => None,
            std::cmp::Ordering::Equal => self.fragments[first]
                .slice(start.offset, end.offset)
                .map(|f| vec![f]),
            std::cmp::Ordering::Less => {
                let head_fragment = &self.fragments[first];
                let tail_fragment = &self.fragments[last];
                let head = head_fragment.slice(start.offset, head_fragment.end);
                let tail = tail_fragment.slice(tail_fragment.start, end.offset);
                head.zip(tail).map(|(head, tail)| {
                    let mut fragments = vec![head];
                    fragments.extend(self.fragments[first + 1..last].iter().cloned());
                    fragments.push(tail);
                    fragments
                })
            }
        };

        match fragments {
            Some(fragments) => SequenceLookup::Found(Self::new(fragments)),
            None => SequenceLookup::Miss,
        }
    }

    /// The bases between `start` and `end`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CoordinateOutOfBounds` if the range is not
    /// covered by this sequence.
    pub fn substring(
        &self,
        start: &GenomicCoordinate,
        end: &GenomicCoordinate,
    ) -> Result<String, CatalogError> {
        self.lookup(start, end)
            .found()
            .map(|s| s.sequence())
            .ok_or_else(|| CatalogError::CoordinateOutOfBounds(format!("{start} - {end}")))
    }
}

/// Fetch the window `[coord - prefix, coord + suffix]` from `catalog`, one
/// fragment per contig traversed, in ascending genome order.
///
/// # Errors
///
/// Propagates catalog lookup and fetch failures.
pub fn assemble<C: ReferenceCatalog + ?Sized>(
    catalog: &C,
    coord: &GenomicCoordinate,
    prefix: u64,
    suffix: u64,
) -> Result<DispersedSequence, CatalogError> {
    let contigs = catalog.contigs(coord.contig.genome())?;
    let start = left_gap_aware_shift(&contigs, coord, prefix)?;
    let end = right_gap_aware_shift(&contigs, coord, suffix)?;

    let rank = |contig: &Contig| contigs.iter().position(|c| c == contig);
    let (Some(first), Some(last)) = (rank(&start.contig), rank(&end.contig)) else {
        return Err(CatalogError::ContigNotFound {
            genome: coord.contig.genome().to_string(),
            contig: coord.contig.id().to_string(),
        });
    };

    let mut fragments = Vec::with_capacity(last - first + 1);
    for (i, contig) in contigs.iter().enumerate().take(last + 1).skip(first) {
        let from = if i == first { start.offset } else { 0 };
        let to = if i == last {
            end.offset
        } else {
            contig.length().ok_or_else(|| CatalogError::UnresolvedLength {
                genome: contig.genome().to_string(),
                contig: contig.id().to_string(),
            })?
        };
        fragments.push(catalog.contig_sequence(contig, from, to)?);
    }

    debug!(
        %start,
        %end,
        fragments = fragments.len(),
        "assembled dispersed sequence"
    );

    Ok(DispersedSequence::new(fragments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(contig: &str, offset: u64) -> GenomicCoordinate {
        GenomicCoordinate::new(Contig::new("g", contig), offset)
    }

    fn fragment(contig: &str, start: u64, bases: &str) -> ContigSequence {
        ContigSequence::new(Contig::new("g", contig), start, bases.to_string())
    }

    fn sequence() -> DispersedSequence {
        DispersedSequence::new(vec![
            fragment("A", 6, "ACGT"),
            fragment("B", 0, "GGGGGGGGGG"),
            fragment("C", 0, "TTA"),
        ])
    }

    #[test]
    fn test_sequence_length_is_sum_of_fragments() {
        let seq = sequence();
        assert_eq!(seq.len(), 4 + 10 + 3);
        assert_eq!(seq.sequence().len(), seq.len());
        assert_eq!(seq.first(), Some(coord("A", 6)));
        assert_eq!(seq.last(), Some(coord("C", 3)));
    }

    #[test]
    fn test_substring_within_one_fragment() {
        assert_eq!(sequence().substring(&coord("A", 7), &coord("A", 9)).unwrap(), "CG");
        assert_eq!(sequence().substring(&coord("A", 8), &coord("A", 8)).unwrap(), "");
    }

    #[test]
    fn test_substring_across_fragments() {
        assert_eq!(
            sequence().substring(&coord("A", 8), &coord("C", 2)).unwrap(),
            "GTGGGGGGGGGGTT"
        );
        assert_eq!(sequence().substring(&coord("A", 10), &coord("B", 1)).unwrap(), "G");
    }

    #[test]
    fn test_substring_out_of_bounds() {
        let seq = sequence();
        assert!(matches!(
            seq.substring(&coord("A", 2), &coord("A", 8)),
            Err(CatalogError::CoordinateOutOfBounds(_))
        ));
        assert!(matches!(
            seq.substring(&coord("A", 8), &coord("D", 0)),
            Err(CatalogError::CoordinateOutOfBounds(_))
        ));
        assert_eq!(seq.lookup(&coord("B", 5), &coord("A", 7)), SequenceLookup::Miss);
        assert_eq!(seq.lookup(&coord("B", 5), &coord("B", 4)), SequenceLookup::Miss);
    }

    #[test]
    fn test_slice_keeps_fragment_structure() {
        let sliced = sequence()
            .lookup(&coord("A", 9), &coord("C", 1))
            .found()
            .unwrap();
        assert_eq!(sliced.fragments().len(), 3);
        assert_eq!(sliced.fragments()[0].start, 9);
        assert_eq!(sliced.fragments()[2].end, 1);
        assert_eq!(sliced.sequence(), "TGGGGGGGGGGT");
    }
}
