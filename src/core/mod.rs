//! Core data types for windowed band queries.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`ReferenceGenome`](types::ReferenceGenome): a genome known to a catalog
//! - [`Contig`](contig::Contig): a named sequence within a genome, with a length once resolved
//! - [`GenomicCoordinate`](coordinate::GenomicCoordinate): a border position on a contig
//! - [`Band`](band::Band): a named half-open interval belonging to a track
//! - [`CoordinateOrder`](order::CoordinateOrder): the total order every query relies on
//!
//! ## Coordinates
//!
//! Coordinates address borders between bases, not bases:
//!
//! | Coordinate | Meaning |
//! |------------|---------|
//! | `chr1:0`   | before the first base |
//! | `chr1:5`   | between the 5th and 6th base |
//! | `chr1:LEN` | after the last base |

pub mod band;
pub mod contig;
pub mod coordinate;
pub mod order;
pub mod types;
