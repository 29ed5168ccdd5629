//! Parsers that turn files into reference sequences and bands.
//!
//! This module provides parsers for:
//!
//! - **FASTA files**: Load reference sequences, plain or gzip compressed
//! - **BED files**: Load a track of bands (BED3 to BED6)
//!
//! Parsing is all-or-nothing per file: the first malformed record fails the
//! whole file and the error names its line.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bandscope::parsing::bed::parse_bed_file;
//! use std::path::Path;
//!
//! let bands = parse_bed_file(Path::new("genes.bed"), "hg38", "genes").unwrap();
//! println!("{} bands", bands.len());
//! ```
//!
//! ## BED columns
//!
//! | Column | Field | Required |
//! |--------|-------|----------|
//! | 1 | chrom | Yes |
//! | 2 | chromStart | Yes |
//! | 3 | chromEnd | Yes |
//! | 4 | name | No |
//! | 5 | score (property `score`) | No |
//! | 6 | strand (property `strand`) | No |

use thiserror::Error;

use crate::core::band::BandError;

pub mod bed;
pub mod fasta;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("Invalid band on line {line}: {source}")]
    Band { line: usize, source: BandError },

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Too many records: {0} exceeds maximum allowed")]
    TooManyRecords(usize),
}
