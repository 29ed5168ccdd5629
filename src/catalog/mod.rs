//! Reference genome catalogs: contig metadata and nucleotide sequence.
//!
//! A [`ReferenceCatalog`](store::ReferenceCatalog) knows a set of reference
//! genomes, the ordered contigs of each, and how to fetch bases. The contig
//! order it reports is the order coordinates are sorted by.
//!
//! ## Sequence windows
//!
//! Windows around a coordinate may cross contig boundaries. The genome is
//! walked as the concatenation of its contigs, and a window that crosses a
//! boundary comes back as a [`DispersedSequence`](sequence::DispersedSequence)
//! with one fragment per contig.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bandscope::catalog::cache::CachingCatalog;
//! use bandscope::catalog::memory::InMemoryCatalog;
//! use bandscope::catalog::store::ReferenceCatalog;
//! use bandscope::core::coordinate::GenomicCoordinate;
//! use std::path::Path;
//!
//! let catalog = InMemoryCatalog::load_from_file(Path::new("genomes.json")).unwrap();
//! let cached = CachingCatalog::new(catalog);
//!
//! let coord = GenomicCoordinate::parse("chr1:1000", "hg38").unwrap();
//! let window = cached.sequence(&coord, 10, 10).unwrap();
//! println!("{}", window.sequence());
//! ```
//!
//! ## Catalog files
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "genomes": [ { "id": "hg38", "fasta": "hg38.fa.gz" } ]
//! }
//! ```

pub mod cache;
pub mod memory;
pub mod sequence;
pub mod shift;
pub mod store;
