//! Caching decorator for reference catalogs.
//!
//! Genome and contig lists are memoised for the lifetime of the decorator.
//! Sequence requests are served from a single buffered window that is
//! replaced, centred on the requested coordinate, whenever a request falls
//! outside of it. Sequential or local access hits the buffer; random access
//! refetches on nearly every call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::debug;

use crate::catalog::sequence::{ContigSequence, DispersedSequence, SequenceLookup};
use crate::catalog::shift::{left_gap_aware_shift, right_gap_aware_shift};
use crate::catalog::store::{CatalogError, ReferenceCatalog};
use crate::core::contig::Contig;
use crate::core::coordinate::GenomicCoordinate;
use crate::core::types::ReferenceGenome;

/// Default number of bases fetched on each side of a requested coordinate
pub const DEFAULT_WINDOW_RADIUS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Bases fetched on each side of the requested coordinate on a refetch
    pub window_radius: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            window_radius: DEFAULT_WINDOW_RADIUS,
        }
    }
}

/// Hit/miss counters of a [`CachingCatalog`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct CachingCatalog<C> {
    upstream: C,
    config: CacheConfig,
    genomes: OnceLock<Vec<ReferenceGenome>>,
    contigs: Mutex<HashMap<String, Vec<Contig>>>,
    /// The single buffered window
    buffer: Mutex<Option<DispersedSequence>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<C: ReferenceCatalog> CachingCatalog<C> {
    pub fn new(upstream: C) -> Self {
        Self::with_config(upstream, CacheConfig::default())
    }

    pub fn with_config(upstream: C, config: CacheConfig) -> Self {
        Self {
            upstream,
            config,
            genomes: OnceLock::new(),
            contigs: Mutex::new(HashMap::new()),
            buffer: Mutex::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn upstream(&self) -> &C {
        &self.upstream
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Range lookup against the buffered window
    fn lookup(
        &self,
        start: &GenomicCoordinate,
        end: &GenomicCoordinate,
    ) -> SequenceLookup<DispersedSequence> {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        match buffer.as_ref() {
            Some(window) => window.lookup(start, end),
            None => SequenceLookup::Miss,
        }
    }

    /// Replace the buffer with a fresh window centred on `coord`
    fn refill(
        &self,
        coord: &GenomicCoordinate,
        prefix: u64,
        suffix: u64,
    ) -> Result<(), CatalogError> {
        let radius = self.config.window_radius;
        // Fetch without holding the buffer lock; upstream calls may block
        let window = self
            .upstream
            .sequence(coord, prefix.max(radius), suffix.max(radius))?;
        debug!(
            %coord,
            bases = window.len(),
            fragments = window.fragments().len(),
            "refilled sequence buffer"
        );
        *self.buffer.lock().unwrap_or_else(PoisonError::into_inner) = Some(window);
        Ok(())
    }
}

impl<C: ReferenceCatalog> ReferenceCatalog for CachingCatalog<C> {
    fn reference_genomes(&self) -> Result<Vec<ReferenceGenome>, CatalogError> {
        if let Some(genomes) = self.genomes.get() {
            return Ok(genomes.clone());
        }
        let genomes = self.upstream.reference_genomes()?;
        Ok(self.genomes.get_or_init(|| genomes).clone())
    }

    fn contigs(&self, genome: &str) -> Result<Vec<Contig>, CatalogError> {
        {
            let cached = self.contigs.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(contigs) = cached.get(genome) {
                return Ok(contigs.clone());
            }
        }

        let contigs = self.upstream.contigs(genome)?;
        self.contigs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(genome.to_string(), contigs.clone());
        Ok(contigs)
    }

    fn contig_sequence(
        &self,
        contig: &Contig,
        start: u64,
        end: u64,
    ) -> Result<ContigSequence, CatalogError> {
        let from = GenomicCoordinate::new(contig.clone(), start);
        let to = GenomicCoordinate::new(contig.clone(), end);
        if let SequenceLookup::Found(window) = self.lookup(&from, &to) {
            if let [fragment] = window.fragments() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(fragment.clone());
            }
        }
        // Pass-through leaves the buffer in place
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.upstream.contig_sequence(contig, start, end)
    }

    fn sequence(
        &self,
        coord: &GenomicCoordinate,
        prefix: u64,
        suffix: u64,
    ) -> Result<DispersedSequence, CatalogError> {
        let contigs = self.contigs(coord.contig.genome())?;
        let start = left_gap_aware_shift(&contigs, coord, prefix)?;
        let end = right_gap_aware_shift(&contigs, coord, suffix)?;

        if let SequenceLookup::Found(found) = self.lookup(&start, &end) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(found);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(%start, %end, "sequence buffer miss");
        self.refill(coord, prefix, suffix)?;

        // The new window is centred on coord, so a second miss is a real error
        match self.lookup(&start, &end) {
            SequenceLookup::Found(found) => Ok(found),
            SequenceLookup::Miss => Err(CatalogError::CoordinateOutOfBounds(format!(
                "{start} - {end} not covered after refetch"
            ))),
        }
    }
}
