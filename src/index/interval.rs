use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::store::CatalogError;
use crate::core::band::Band;
use crate::core::coordinate::GenomicCoordinate;
use crate::core::order::{CoordinateKey, CoordinateOrder};
use crate::filter::query::FilterQuery;
use crate::index::IndexError;

/// Sorted-border index over an immutable collection of bands.
///
/// `borders` is the distinct, coordinate-ordered union of every band's start
/// and end. It is derived once at construction; filtering builds a new index
/// and leaves this one untouched.
#[derive(Debug, Clone)]
pub struct IntervalIndex {
    order: Arc<CoordinateOrder>,

    /// Bands sorted by (start, end)
    bands: Vec<Arc<Band>>,

    /// (start, end) keys, parallel to `bands`
    band_keys: Vec<(CoordinateKey, CoordinateKey)>,

    borders: Vec<GenomicCoordinate>,

    /// Keys parallel to `borders`, strictly ascending
    border_keys: Vec<CoordinateKey>,

    /// For each border, indices of the bands starting or ending on it
    generants: Vec<Vec<usize>>,
}

impl IntervalIndex {
    /// Index a collection of bands
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if a band lies on a genome or
    /// contig the order does not know.
    pub fn new<I>(order: Arc<CoordinateOrder>, bands: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Band>,
    {
        Self::from_shared(order, bands.into_iter().map(Arc::new).collect())
    }

    /// Index bands that may also belong to other indexes
    ///
    /// # Errors
    ///
    /// Fails like [`IntervalIndex::new`].
    pub fn from_shared(
        order: Arc<CoordinateOrder>,
        bands: Vec<Arc<Band>>,
    ) -> Result<Self, CatalogError> {
        let mut keyed = bands
            .into_iter()
            .map(|band| {
                let keys = (order.key(&band.start)?, order.key(&band.end)?);
                Ok((keys, band))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));

        let mut border_pairs: Vec<(CoordinateKey, GenomicCoordinate)> = keyed
            .iter()
            .flat_map(|((start_key, end_key), band)| {
                [
                    (start_key.clone(), band.start.clone()),
                    (end_key.clone(), band.end.clone()),
                ]
            })
            .collect();
        border_pairs.sort_by(|a, b| a.0.cmp(&b.0));
        border_pairs.dedup_by(|a, b| a.0 == b.0);
        let (border_keys, borders): (Vec<_>, Vec<_>) = border_pairs.into_iter().unzip();

        let mut generants = vec![Vec::new(); borders.len()];
        for (i, ((start_key, end_key), _)) in keyed.iter().enumerate() {
            // every band border is in border_keys by construction
            if let Ok(p) = border_keys.binary_search(start_key) {
                generants[p].push(i);
            }
            if end_key != start_key {
                if let Ok(p) = border_keys.binary_search(end_key) {
                    generants[p].push(i);
                }
            }
        }

        let (band_keys, bands): (Vec<_>, Vec<_>) = keyed.into_iter().unzip();
        debug!(
            bands = bands.len(),
            borders = borders.len(),
            "built interval index"
        );

        Ok(Self {
            order,
            bands,
            band_keys,
            borders,
            border_keys,
            generants,
        })
    }

    pub fn order(&self) -> &Arc<CoordinateOrder> {
        &self.order
    }

    pub fn bands(&self) -> &[Arc<Band>] {
        &self.bands
    }

    /// Distinct band borders in coordinate order
    pub fn borders(&self) -> &[GenomicCoordinate] {
        &self.borders
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Binary search `coord` among the borders: `Ok(rank)` if it is a
    /// border, `Err(insertion point)` otherwise
    fn locate(&self, coord: &GenomicCoordinate) -> Result<Result<usize, usize>, CatalogError> {
        let key = self.order.key(coord)?;
        Ok(self.border_keys.binary_search(&key))
    }

    fn left_range(
        &self,
        count: usize,
        coord: &GenomicCoordinate,
    ) -> Result<Range<usize>, CatalogError> {
        if self.borders.is_empty() {
            return Ok(0..0);
        }
        Ok(match self.locate(coord)? {
            Ok(p) => p.saturating_sub(count)..p + 1,
            Err(ip) => ip.saturating_sub(count)..ip,
        })
    }

    fn right_range(
        &self,
        count: usize,
        coord: &GenomicCoordinate,
    ) -> Result<Range<usize>, CatalogError> {
        let len = self.borders.len();
        if len == 0 {
            return Ok(0..0);
        }
        Ok(match self.locate(coord)? {
            Ok(p) => p..len.min(p.saturating_add(count).saturating_add(1)),
            Err(ip) => ip..len.min(ip.saturating_add(count)),
        })
    }

    /// Up to `count` borders left of `coord`, plus `coord` itself if it is a
    /// border, in ascending order
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if `coord` cannot be ordered.
    pub fn left_borders(
        &self,
        count: usize,
        coord: &GenomicCoordinate,
    ) -> Result<&[GenomicCoordinate], CatalogError> {
        let range = self.left_range(count, coord)?;
        Ok(&self.borders[range])
    }

    /// `coord` itself if it is a border, plus up to `count` borders right of
    /// it, in ascending order
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if `coord` cannot be ordered.
    pub fn right_borders(
        &self,
        count: usize,
        coord: &GenomicCoordinate,
    ) -> Result<&[GenomicCoordinate], CatalogError> {
        let range = self.right_range(count, coord)?;
        Ok(&self.borders[range])
    }

    /// Bands whose closed interval `[start, end]` contains `coord`.
    ///
    /// A band touching `coord` with either border counts as covering it,
    /// which keeps coverage and border generants consistent at shared borders.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if `coord` cannot be ordered.
    pub fn coverage(&self, coord: &GenomicCoordinate) -> Result<Vec<Arc<Band>>, CatalogError> {
        if self.bands.is_empty() {
            return Ok(Vec::new());
        }
        let key = self.order.key(coord)?;
        Ok(self
            .band_keys
            .iter()
            .zip(&self.bands)
            .filter(|((start, end), _)| *start <= key && *end >= key)
            .map(|(_, band)| Arc::clone(band))
            .collect())
    }

    /// Bands starting or ending exactly at `coord`
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if `coord` cannot be ordered.
    pub fn border_generants(
        &self,
        coord: &GenomicCoordinate,
    ) -> Result<Vec<Arc<Band>>, CatalogError> {
        if self.borders.is_empty() {
            return Ok(Vec::new());
        }
        Ok(match self.locate(coord)? {
            Ok(p) => self.collect_generants(p..p + 1),
            Err(_) => Vec::new(),
        })
    }

    /// Border generants of every coordinate returned by [`Self::left_borders`]
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if `coord` cannot be ordered.
    pub fn left_borders_generants(
        &self,
        count: usize,
        coord: &GenomicCoordinate,
    ) -> Result<Vec<Arc<Band>>, CatalogError> {
        let range = self.left_range(count, coord)?;
        Ok(self.collect_generants(range))
    }

    /// Border generants of every coordinate returned by [`Self::right_borders`]
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if `coord` cannot be ordered.
    pub fn right_borders_generants(
        &self,
        count: usize,
        coord: &GenomicCoordinate,
    ) -> Result<Vec<Arc<Band>>, CatalogError> {
        let range = self.right_range(count, coord)?;
        Ok(self.collect_generants(range))
    }

    /// Distinct bands generated by the borders in `range`, in index order
    fn collect_generants(&self, range: Range<usize>) -> Vec<Arc<Band>> {
        let indices: BTreeSet<usize> = self.generants[range].iter().flatten().copied().collect();
        indices
            .into_iter()
            .map(|i| Arc::clone(&self.bands[i]))
            .collect()
    }

    /// New index over the bands accepted by `query`
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Filter` if a band property cannot be evaluated.
    pub fn filter(&self, query: &FilterQuery) -> Result<IntervalIndex, IndexError> {
        let mut kept = Vec::new();
        for band in &self.bands {
            if query.matches(band)? {
                kept.push(Arc::clone(band));
            }
        }
        debug!(before = self.bands.len(), after = kept.len(), "filtered interval index");
        Ok(Self::from_shared(Arc::clone(&self.order), kept)?)
    }
}
