//! # bandscope
//!
//! A library for windowed neighborhood queries over genomic interval data.
//!
//! Given a coordinate on a reference genome, `bandscope` returns the intervals
//! ("bands") covering it plus the bands on the nearest interval borders to its
//! left and right, merged across several independently indexed tracks.
//!
//! ## Features
//!
//! - **Coordinate order**: Total order over coordinates driven by the catalog's contig order
//! - **Interval index**: Border, coverage and border-generant queries by binary search
//! - **Track merging**: One coherent window over several tracks, with leftmost/rightmost flags
//! - **Filters**: Typed attributes, clauses and AND/OR/XOR aggregates over band properties
//! - **Reference sequence**: Gap-aware shifting across contig boundaries and a single-slot cache
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use bandscope::{Band, Contig, CoordinateOrder, GenomicCoordinate, IntervalIndex, TrackMerger};
//! use bandscope::catalog::memory::InMemoryCatalog;
//!
//! let mut catalog = InMemoryCatalog::new();
//! catalog
//!     .add_genome("G", vec![("A", "ACGTACGTAC"), ("B", "TTTTTTTTTT")])
//!     .unwrap();
//! let order = Arc::new(CoordinateOrder::from_catalog(&catalog).unwrap());
//!
//! let at = |offset| GenomicCoordinate::new(Contig::new("G", "A"), offset);
//! let bands = vec![
//!     Band::new("T", at(2), at(5), "first").unwrap(),
//!     Band::new("T", at(7), at(10), "second").unwrap(),
//! ];
//! let index = IntervalIndex::new(Arc::clone(&order), bands).unwrap();
//!
//! let result = TrackMerger::new(order).query(&at(9), 1, 1, &[&index]).unwrap();
//! assert_eq!(result.bands.len(), 1);
//! assert_eq!(result.bands[0].name, "second");
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Reference catalogs, gap-aware shifting, dispersed sequence and caching
//! - [`core`]: Core data types for coordinates, contigs, bands and their order
//! - [`index`]: Per-track interval indexes
//! - [`filter`]: Attribute model and filter queries
//! - [`merge`]: Windowed queries across tracks
//! - [`parsing`]: Parsers for BED and FASTA files
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod filter;
pub mod index;
pub mod merge;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::{CatalogError, ReferenceCatalog};
pub use core::band::Band;
pub use core::contig::Contig;
pub use core::coordinate::GenomicCoordinate;
pub use core::order::CoordinateOrder;
pub use core::types::*;
pub use filter::query::FilterQuery;
pub use index::interval::IntervalIndex;
pub use merge::window::{TrackMerger, WindowedResult};
