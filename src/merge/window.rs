use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::catalog::store::CatalogError;
use crate::core::band::Band;
use crate::core::coordinate::GenomicCoordinate;
use crate::core::order::{CoordinateKey, CoordinateOrder};
use crate::index::interval::IntervalIndex;

/// Borders probed past the outermost retained border when deciding whether a
/// window reaches the end of the data
const LOOKAHEAD: usize = 2;

/// Bands of a windowed query plus whether the window reached either end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowedResult {
    /// Distinct bands sorted by (start, end, track, name)
    pub bands: Vec<Arc<Band>>,
    pub is_leftmost: bool,
    pub is_rightmost: bool,
}

impl WindowedResult {
    fn empty() -> Self {
        Self {
            bands: Vec::new(),
            is_leftmost: true,
            is_rightmost: true,
        }
    }
}

/// Per-index candidates collected before the merge
struct Candidates {
    coverage: Vec<Arc<Band>>,
    generants: Vec<Arc<Band>>,
}

fn collect_candidates(
    index: &IntervalIndex,
    coord: &GenomicCoordinate,
    left: usize,
    right: usize,
) -> Result<Candidates, CatalogError> {
    let mut generants = index.left_borders_generants(left, coord)?;
    generants.extend(index.right_borders_generants(right, coord)?);
    Ok(Candidates {
        coverage: index.coverage(coord)?,
        generants,
    })
}

/// Merges windowed queries over independently indexed tracks.
#[derive(Debug, Clone)]
pub struct TrackMerger {
    order: Arc<CoordinateOrder>,
}

impl TrackMerger {
    pub fn new(order: Arc<CoordinateOrder>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &Arc<CoordinateOrder> {
        &self.order
    }

    /// Bands covering `coord` plus the bands on up to `left` distinct borders
    /// before it and `right` distinct borders after it, counted over the
    /// merged borders of all `indexes`.
    ///
    /// When `coord` is itself a border, it is reported through coverage and
    /// neither window counts it. The leftmost/rightmost flags are set when
    /// looking two borders past the window's outer border finds no further
    /// band in any index; this is a bounded probe, not a proof that the data
    /// ends there.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if `coord` or a band border
    /// cannot be ordered.
    pub fn query(
        &self,
        coord: &GenomicCoordinate,
        left: usize,
        right: usize,
        indexes: &[&IntervalIndex],
    ) -> Result<WindowedResult, CatalogError> {
        let per_index = indexes
            .par_iter()
            .map(|index| collect_candidates(index, coord, left, right))
            .collect::<Result<Vec<_>, _>>()?;

        let mut coverage: HashSet<Arc<Band>> = HashSet::new();
        let mut candidates: HashSet<Arc<Band>> = HashSet::new();
        for found in per_index {
            coverage.extend(found.coverage.iter().cloned());
            candidates.extend(found.coverage);
            candidates.extend(found.generants);
        }

        let keyed = candidates
            .into_iter()
            .map(|band| {
                let start = self.order.key(&band.start)?;
                let end = self.order.key(&band.end)?;
                Ok((start, end, band))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let borders = self.order.sorted_distinct(
            keyed
                .iter()
                .flat_map(|(_, _, band)| [band.start.clone(), band.end.clone()]),
        )?;
        if borders.is_empty() {
            debug!("No candidate bands around {}", coord);
            return Ok(WindowedResult::empty());
        }
        let border_keys: Vec<&CoordinateKey> = borders.iter().map(|(key, _)| key).collect();

        let key = self.order.key(coord)?;
        // A border at `coord` is already counted through coverage, so it
        // belongs to neither window and costs the left window one step
        let (before_start, before_end, after_start) = match border_keys.binary_search(&&key) {
            Ok(v) => (v.saturating_sub(left.saturating_sub(1)), v, v + 1),
            Err(ip) => (ip.saturating_sub(left), ip, ip),
        };
        let after_end = border_keys.len().min(after_start.saturating_add(right));

        let window: BTreeSet<&CoordinateKey> = border_keys[before_start..before_end]
            .iter()
            .chain(&border_keys[after_start..after_end])
            .copied()
            .collect();

        let mut selected: Vec<(CoordinateKey, CoordinateKey, Arc<Band>)> = keyed
            .into_iter()
            .filter(|(start, end, band)| {
                coverage.contains(band) || window.contains(start) || window.contains(end)
            })
            .collect();
        selected.sort_by(|a, b| {
            (&a.0, &a.1, &a.2.track, &a.2.name).cmp(&(&b.0, &b.1, &b.2.track, &b.2.name))
        });

        let leftmost_border = if before_start < before_end {
            &borders[before_start].1
        } else {
            coord
        };
        let rightmost_border = if after_start < after_end {
            &borders[after_end - 1].1
        } else {
            coord
        };

        let is_leftmost = self.stable_left(leftmost_border, indexes)?;
        let is_rightmost = self.stable_right(rightmost_border, indexes)?;

        debug!(
            "Window around {} (left={}, right={}) over {} indexes: {} bands, leftmost={}, rightmost={}",
            coord,
            left,
            right,
            indexes.len(),
            selected.len(),
            is_leftmost,
            is_rightmost
        );

        Ok(WindowedResult {
            bands: selected.into_iter().map(|(_, _, band)| band).collect(),
            is_leftmost,
            is_rightmost,
        })
    }

    fn stable_left(
        &self,
        border: &GenomicCoordinate,
        indexes: &[&IntervalIndex],
    ) -> Result<bool, CatalogError> {
        for index in indexes {
            let probed = index.left_borders_generants(LOOKAHEAD, border)?;
            let held = index.left_borders_generants(0, border)?;
            if probed.len() != held.len() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn stable_right(
        &self,
        border: &GenomicCoordinate,
        indexes: &[&IntervalIndex],
    ) -> Result<bool, CatalogError> {
        for index in indexes {
            let probed = index.right_borders_generants(LOOKAHEAD, border)?;
            let held = index.right_borders_generants(0, border)?;
            if probed.len() != held.len() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contig::Contig;
    use crate::core::types::ReferenceGenome;

    fn order() -> Arc<CoordinateOrder> {
        Arc::new(CoordinateOrder::from_contig_lists(vec![(
            ReferenceGenome::new("G"),
            vec![
                Contig::with_length("G", "A", 10),
                Contig::with_length("G", "B", 10),
            ],
        )]))
    }

    fn coord(contig: &str, offset: u64) -> GenomicCoordinate {
        GenomicCoordinate::new(Contig::new("G", contig), offset)
    }

    fn band(track: &str, contig: &str, start: u64, end: u64) -> Band {
        Band::new(
            track,
            coord(contig, start),
            coord(contig, end),
            format!("{track}:{start}-{end}"),
        )
        .unwrap()
    }

    fn index(bands: Vec<Band>) -> IntervalIndex {
        IntervalIndex::new(order(), bands).unwrap()
    }

    fn names(result: &WindowedResult) -> Vec<&str> {
        result.bands.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_seed_case_single_track() {
        let track = index(vec![band("T", "A", 2, 5), band("T", "A", 7, 10)]);
        let merger = TrackMerger::new(order());

        let result = merger.query(&coord("A", 9), 1, 1, &[&track]).unwrap();
        assert_eq!(names(&result), vec!["T:7-10"]);
        assert!(result.is_rightmost);
        assert!(!result.is_leftmost);
    }

    #[test]
    fn test_no_bands_is_empty_and_bounded() {
        let empty = index(Vec::new());
        let merger = TrackMerger::new(order());

        let result = merger.query(&coord("A", 3), 5, 5, &[&empty]).unwrap();
        assert!(result.bands.is_empty());
        assert!(result.is_leftmost);
        assert!(result.is_rightmost);

        let result = merger.query(&coord("A", 3), 5, 5, &[]).unwrap();
        assert_eq!(result, WindowedResult::empty());
    }

    #[test]
    fn test_window_counts_merged_borders() {
        // Borders: T1 at 1,3 and 6,8; T2 at 2,4
        let t1 = index(vec![band("T1", "A", 1, 3), band("T1", "A", 6, 8)]);
        let t2 = index(vec![band("T2", "A", 2, 4)]);
        let merger = TrackMerger::new(order());

        // Right of A:5 the merged borders are 6, 8: one border reaches T1:6-8
        let result = merger.query(&coord("A", 5), 0, 1, &[&t1, &t2]).unwrap();
        assert_eq!(names(&result), vec!["T1:6-8"]);

        // Left of A:5 the nearest merged border is 4, owned by T2 only
        let result = merger.query(&coord("A", 5), 1, 0, &[&t1, &t2]).unwrap();
        assert_eq!(names(&result), vec!["T2:2-4"]);
    }

    #[test]
    fn test_border_at_query_is_reported_through_coverage() {
        let track = index(vec![
            band("T", "A", 0, 2),
            band("T", "A", 2, 4),
            band("T", "A", 6, 8),
        ]);
        let merger = TrackMerger::new(order());

        // A:2 is covered by both touching bands; the right window then starts at 4
        let result = merger.query(&coord("A", 2), 0, 1, &[&track]).unwrap();
        assert_eq!(names(&result), vec!["T:0-2", "T:2-4"]);

        let result = merger.query(&coord("A", 2), 0, 2, &[&track]).unwrap();
        assert_eq!(names(&result), vec!["T:0-2", "T:2-4", "T:6-8"]);
        assert!(result.is_rightmost);
    }

    #[test]
    fn test_windows_cross_contig_boundaries() {
        let track = index(vec![
            band("T", "A", 1, 2),
            band("T", "A", 5, 6),
            band("T", "B", 3, 4),
            band("T", "B", 6, 7),
        ]);
        let merger = TrackMerger::new(order());

        let result = merger.query(&coord("A", 8), 0, 1, &[&track]).unwrap();
        assert_eq!(names(&result), vec!["T:3-4"]);
        assert!(!result.is_rightmost);

        let result = merger.query(&coord("B", 0), 1, 0, &[&track]).unwrap();
        assert_eq!(names(&result), vec!["T:5-6"]);
        assert!(!result.is_leftmost);
    }

    #[test]
    fn test_border_at_query_shortens_left_window() {
        let track = index(vec![
            band("T", "A", 0, 2),
            band("T", "A", 2, 4),
            band("T", "A", 4, 6),
            band("T", "A", 6, 8),
        ]);
        let merger = TrackMerger::new(order());

        // A:4 is a border and already counted, so left = 1 adds no border
        let result = merger.query(&coord("A", 4), 1, 0, &[&track]).unwrap();
        assert_eq!(names(&result), vec!["T:2-4", "T:4-6"]);
        assert!(!result.is_leftmost);

        let result = merger.query(&coord("A", 4), 2, 0, &[&track]).unwrap();
        assert_eq!(names(&result), vec!["T:0-2", "T:2-4", "T:4-6"]);
        assert!(result.is_leftmost);
    }

    #[test]
    fn test_merged_window_is_subset_of_separate_union() {
        // No border of T1 (1,3,6,8) coincides with one of T2 (2,4)
        let t1 = index(vec![band("T1", "A", 1, 3), band("T1", "A", 6, 8)]);
        let t2 = index(vec![band("T2", "A", 2, 4)]);
        let merger = TrackMerger::new(order());
        let at = coord("A", 5);

        let separate = |count: usize| -> HashSet<Arc<Band>> {
            [&t1, &t2]
                .iter()
                .flat_map(|t| merger.query(&at, count, count, &[*t]).unwrap().bands)
                .collect()
        };

        // Narrow windows count merged borders, so T2:2-4 hides T1:1-3
        let merged = merger.query(&at, 1, 1, &[&t1, &t2]).unwrap();
        let union = separate(1);
        assert_eq!(names(&merged), vec!["T2:2-4", "T1:6-8"]);
        assert_eq!(union.len(), 3);
        assert!(merged.bands.iter().all(|b| union.contains(b)));

        // Windows wide enough to reach every border give the plain union
        let merged = merger.query(&at, 10, 10, &[&t1, &t2]).unwrap();
        let union = separate(10);
        assert_eq!(merged.bands.len(), union.len());
        assert!(merged.bands.iter().all(|b| union.contains(b)));
        assert!(merged.is_leftmost && merged.is_rightmost);
    }

    #[test]
    fn test_output_is_sorted_and_distinct() {
        let t1 = index(vec![band("T1", "A", 4, 6), band("T1", "A", 2, 8)]);
        let t2 = index(vec![band("T2", "A", 2, 8)]);
        let merger = TrackMerger::new(order());

        let result = merger.query(&coord("A", 5), 5, 5, &[&t1, &t2, &t1]).unwrap();
        assert_eq!(names(&result), vec!["T1:2-8", "T2:2-8", "T1:4-6"]);
    }

    #[test]
    fn test_unknown_contig_is_an_error() {
        let track = index(vec![band("T", "A", 1, 2)]);
        let merger = TrackMerger::new(order());
        assert!(matches!(
            merger.query(&coord("Z", 1), 1, 1, &[&track]),
            Err(CatalogError::ContigNotFound { .. })
        ));
    }
}
