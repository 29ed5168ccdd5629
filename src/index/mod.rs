//! Per-track interval indexes.
//!
//! An [`IntervalIndex`](interval::IntervalIndex) answers border, coverage and
//! border-generant queries over one immutable band collection by binary search
//! over its sorted borders. A [`Track`](track::Track) names an index.

use thiserror::Error;

use crate::catalog::store::CatalogError;
use crate::filter::FilterError;

pub mod interval;
pub mod track;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}
