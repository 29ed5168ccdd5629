use std::sync::Arc;

use crate::catalog::store::CatalogError;
use crate::core::band::Band;
use crate::core::order::CoordinateOrder;
use crate::filter::query::FilterQuery;
use crate::index::interval::IntervalIndex;
use crate::index::IndexError;

/// A named band collection with its index
#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    /// Display name; the id unless set
    pub name: String,
    pub index: IntervalIndex,
}

impl Track {
    /// Index `bands` as track `id`
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` lookup failure if a band cannot be ordered.
    pub fn new(
        id: impl Into<String>,
        order: Arc<CoordinateOrder>,
        bands: Vec<Band>,
    ) -> Result<Self, CatalogError> {
        let id = id.into();
        Ok(Self {
            name: id.clone(),
            id,
            index: IntervalIndex::new(order, bands)?,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// A filtered view of this track; the view keeps the track id
    ///
    /// # Errors
    ///
    /// Propagates filter evaluation failures.
    pub fn filtered(&self, query: &FilterQuery) -> Result<Self, IndexError> {
        Ok(Self {
            id: self.id.clone(),
            name: self.name.clone(),
            index: self.index.filter(query)?,
        })
    }
}
