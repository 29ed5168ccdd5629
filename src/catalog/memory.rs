use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::sequence::ContigSequence;
use crate::catalog::store::{CatalogConfig, CatalogError, ReferenceCatalog};
use crate::core::contig::Contig;
use crate::core::types::ReferenceGenome;
use crate::parsing::fasta::read_fasta_file;
use crate::parsing::ParseError;
use crate::utils::validation::{check_contig_limit, is_valid_identifier};

/// A genome held in memory: its ordered contigs and their bases
#[derive(Debug, Clone)]
struct GenomeEntry {
    genome: ReferenceGenome,
    contigs: Vec<Contig>,
    bases: HashMap<Arc<str>, String>,
}

/// Reference catalog that keeps every sequence in memory.
///
/// Genomes are listed in registration order and contigs in the order they
/// were supplied (for FASTA-backed genomes, file order).
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    genomes: Vec<GenomeEntry>,

    /// Index: genome id -> index in genomes vec
    id_to_index: HashMap<Arc<str>, usize>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a genome from `(contig name, bases)` pairs in physical order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for an invalid or duplicate genome id, an
    /// invalid or duplicate contig name, non-ASCII bases, or too many contigs.
    pub fn add_genome<I, N, B>(&mut self, genome: &str, contigs: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = (N, B)>,
        N: AsRef<str>,
        B: Into<String>,
    {
        if !is_valid_identifier(genome) {
            return Err(CatalogError::Parse(format!(
                "Invalid reference genome id: '{genome}'"
            )));
        }
        if self.id_to_index.contains_key(genome) {
            return Err(CatalogError::Parse(format!(
                "Duplicate reference genome id: {genome}"
            )));
        }

        let mut entry = GenomeEntry {
            genome: ReferenceGenome::new(genome),
            contigs: Vec::new(),
            bases: HashMap::new(),
        };

        for (name, bases) in contigs {
            let name = name.as_ref();
            let bases = bases.into();

            if let Some(message) = check_contig_limit(entry.contigs.len()) {
                return Err(CatalogError::Parse(message));
            }
            if !is_valid_identifier(name) {
                return Err(CatalogError::Parse(format!(
                    "Invalid contig name in {genome}: '{name}'"
                )));
            }
            if !bases.is_ascii() {
                return Err(CatalogError::Parse(format!(
                    "Contig {name} in {genome} contains non-ASCII bases"
                )));
            }

            let contig = Contig::with_length(genome, name, bases.len() as u64);
            if entry.bases.insert(Arc::from(name), bases).is_some() {
                return Err(CatalogError::Parse(format!(
                    "Duplicate contig {name} in {genome}"
                )));
            }
            entry.contigs.push(contig);
        }

        debug!(genome, contigs = entry.contigs.len(), "registered genome");
        self.id_to_index.insert(Arc::clone(&entry.genome.id), self.genomes.len());
        self.genomes.push(entry);
        Ok(())
    }

    /// Register a genome from a FASTA file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io`/`CatalogError::Noodles`/`CatalogError::Parse`
    /// if the file cannot be read, as well as any error of [`Self::add_genome`].
    pub fn load_fasta(&mut self, genome: &str, path: &Path) -> Result<(), CatalogError> {
        let records = read_fasta_file(path).map_err(|e| match e {
            ParseError::Io(io) => CatalogError::Io(io),
            ParseError::Noodles(message) => CatalogError::Noodles(message),
            other => CatalogError::Parse(format!("{}: {other}", path.display())),
        })?;
        info!(genome, path = %path.display(), contigs = records.len(), "loaded FASTA");
        self.add_genome(genome, records.into_iter().map(|r| (r.name, r.bases)))
    }

    /// Build a catalog from a catalog description, loading every listed FASTA
    ///
    /// # Errors
    ///
    /// Fails on the first genome that cannot be loaded.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for source in &config.genomes {
            catalog.load_fasta(&source.id, &config.fasta_path(source))?;
        }
        Ok(catalog)
    }

    /// Load a catalog description file and every FASTA it lists
    ///
    /// # Errors
    ///
    /// Fails like [`CatalogConfig::load_from_file`] and [`Self::from_config`].
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        Self::from_config(&CatalogConfig::load_from_file(path)?)
    }

    /// Number of genomes in catalog
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    fn entry(&self, genome: &str) -> Result<&GenomeEntry, CatalogError> {
        self.id_to_index
            .get(genome)
            .map(|&idx| &self.genomes[idx])
            .ok_or_else(|| CatalogError::ReferenceGenomeNotFound(genome.to_string()))
    }
}

impl ReferenceCatalog for InMemoryCatalog {
    fn reference_genomes(&self) -> Result<Vec<ReferenceGenome>, CatalogError> {
        Ok(self.genomes.iter().map(|g| g.genome.clone()).collect())
    }

    fn contigs(&self, genome: &str) -> Result<Vec<Contig>, CatalogError> {
        Ok(self.entry(genome)?.contigs.clone())
    }

    fn contig_sequence(
        &self,
        contig: &Contig,
        start: u64,
        end: u64,
    ) -> Result<ContigSequence, CatalogError> {
        let entry = self.entry(contig.genome())?;
        let (id, bases) = entry.bases.get_key_value(contig.id()).ok_or_else(|| {
            CatalogError::ContigNotFound {
                genome: contig.genome().to_string(),
                contig: contig.id().to_string(),
            }
        })?;

        let out_of_bounds = || {
            CatalogError::CoordinateOutOfBounds(format!(
                "{}:{start}-{end} (contig length {})",
                id,
                bases.len()
            ))
        };
        if start > end {
            return Err(out_of_bounds());
        }
        let lo = usize::try_from(start).map_err(|_| out_of_bounds())?;
        let hi = usize::try_from(end).map_err(|_| out_of_bounds())?;
        let slice = bases.get(lo..hi).ok_or_else(out_of_bounds)?;

        let resolved = contig.resolved(bases.len() as u64);
        Ok(ContigSequence::new(resolved, start, slice.to_string()))
    }
}
