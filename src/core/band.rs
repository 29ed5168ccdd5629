use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::core::coordinate::GenomicCoordinate;
use crate::core::types::PropertyValue;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BandError {
    #[error("Band '{name}' starts on {start} but ends on {end}")]
    ContigMismatch {
        name: String,
        start: String,
        end: String,
    },

    #[error("Band '{name}' ends ({end}) before it starts ({start})")]
    Inverted { name: String, start: u64, end: u64 },
}

/// A named half-open interval `[start, end)` on a single contig.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Band {
    /// Track the band belongs to
    pub track: Arc<str>,

    pub start: GenomicCoordinate,

    pub end: GenomicCoordinate,

    pub name: String,

    /// Typed key/value properties consumed by the filter engine
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Band {
    /// Create a band, checking that both borders sit on the same contig and
    /// that the start does not come after the end.
    ///
    /// # Errors
    ///
    /// Returns `BandError::ContigMismatch` or `BandError::Inverted`.
    pub fn new(
        track: impl AsRef<str>,
        start: GenomicCoordinate,
        end: GenomicCoordinate,
        name: impl Into<String>,
    ) -> Result<Self, BandError> {
        let name = name.into();

        if start.contig != end.contig {
            return Err(BandError::ContigMismatch {
                name,
                start: start.contig.to_string(),
                end: end.contig.to_string(),
            });
        }
        if start.offset > end.offset {
            return Err(BandError::Inverted {
                name,
                start: start.offset,
                end: end.offset,
            });
        }

        Ok(Self {
            track: Arc::from(track.as_ref()),
            start,
            end,
            name,
            properties: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Number of bases covered
    pub fn len(&self) -> u64 {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `coord` is exactly this band's start or end
    pub fn is_generated_by(&self, coord: &GenomicCoordinate) -> bool {
        &self.start == coord || &self.end == coord
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}, {})", self.name, self.start, self.end.offset)
    }
}
