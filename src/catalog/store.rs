use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::catalog::sequence::{assemble, ContigSequence, DispersedSequence};
use crate::catalog::shift::shift_coordinate;
use crate::core::contig::Contig;
use crate::core::coordinate::GenomicCoordinate;
use crate::core::types::ReferenceGenome;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Reference genome not found: {0}")]
    ReferenceGenomeNotFound(String),

    #[error("Contig '{contig}' not found in reference genome '{genome}'")]
    ContigNotFound { genome: String, contig: String },

    #[error("Contig '{contig}' in reference genome '{genome}' has no known length")]
    UnresolvedLength { genome: String, contig: String },

    #[error("Coordinate out of bounds: {0}")]
    CoordinateOutOfBounds(String),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("noodles error: {0}")]
    Noodles(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Source of contig metadata and nucleotide sequence for reference genomes.
///
/// Implementations may block on file or network I/O. Contig lists are
/// returned in the genome's physical order, which is the order
/// [`CoordinateOrder`](crate::core::order::CoordinateOrder) ranks contigs by.
pub trait ReferenceCatalog {
    /// All known reference genomes
    fn reference_genomes(&self) -> Result<Vec<ReferenceGenome>, CatalogError>;

    /// Ordered contigs of a genome, lengths resolved
    fn contigs(&self, genome: &str) -> Result<Vec<Contig>, CatalogError>;

    /// Bases `[start, end)` of a single contig
    fn contig_sequence(
        &self,
        contig: &Contig,
        start: u64,
        end: u64,
    ) -> Result<ContigSequence, CatalogError>;

    fn contig_length(&self, genome: &str, contig: &str) -> Result<u64, CatalogError> {
        let found = self
            .contigs(genome)?
            .into_iter()
            .find(|c| c.id() == contig)
            .ok_or_else(|| CatalogError::ContigNotFound {
                genome: genome.to_string(),
                contig: contig.to_string(),
            })?;
        found.length().ok_or_else(|| CatalogError::UnresolvedLength {
            genome: genome.to_string(),
            contig: contig.to_string(),
        })
    }

    /// Copy of `contig` with its length filled in from the catalog
    fn resolve_contig(&self, contig: &Contig) -> Result<Contig, CatalogError> {
        if contig.length().is_some() {
            return Ok(contig.clone());
        }
        let length = self.contig_length(contig.genome(), contig.id())?;
        Ok(contig.resolved(length))
    }

    /// Walk `offset` positions along the genome's concatenated contigs,
    /// saturating at either end
    fn shift_coordinate(
        &self,
        coord: &GenomicCoordinate,
        offset: i64,
    ) -> Result<GenomicCoordinate, CatalogError> {
        let contigs = self.contigs(coord.contig.genome())?;
        shift_coordinate(&contigs, coord, offset)
    }

    /// Bases from `prefix` positions left of `coord` to `suffix` positions
    /// right of it, one fragment per contig traversed
    fn sequence(
        &self,
        coord: &GenomicCoordinate,
        prefix: u64,
        suffix: u64,
    ) -> Result<DispersedSequence, CatalogError> {
        assemble(self, coord, prefix, suffix)
    }
}

impl<C: ReferenceCatalog + ?Sized> ReferenceCatalog for Arc<C> {
    fn reference_genomes(&self) -> Result<Vec<ReferenceGenome>, CatalogError> {
        (**self).reference_genomes()
    }

    fn contigs(&self, genome: &str) -> Result<Vec<Contig>, CatalogError> {
        (**self).contigs(genome)
    }

    fn contig_sequence(
        &self,
        contig: &Contig,
        start: u64,
        end: u64,
    ) -> Result<ContigSequence, CatalogError> {
        (**self).contig_sequence(contig, start, end)
    }

    fn contig_length(&self, genome: &str, contig: &str) -> Result<u64, CatalogError> {
        (**self).contig_length(genome, contig)
    }

    fn sequence(
        &self,
        coord: &GenomicCoordinate,
        prefix: u64,
        suffix: u64,
    ) -> Result<DispersedSequence, CatalogError> {
        (**self).sequence(coord, prefix, suffix)
    }
}

/// Catalog file version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// One genome entry of a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeSource {
    pub id: String,

    /// FASTA file (plain or gzip); relative paths resolve against the
    /// catalog file's directory
    pub fasta: PathBuf,
}

/// Serializable catalog file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub version: String,
    pub genomes: Vec<GenomeSource>,

    /// Directory relative FASTA paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl CatalogConfig {
    /// Load a catalog description from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read or
    /// `CatalogError::Parse` if it is not a valid catalog description.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse a catalog description from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` on malformed JSON or duplicate genome ids.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let config: Self = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if config.version != CATALOG_VERSION {
            warn!(
                expected = CATALOG_VERSION,
                found = %config.version,
                "Catalog version mismatch"
            );
        }

        let mut seen = std::collections::HashSet::new();
        for genome in &config.genomes {
            if !seen.insert(genome.id.as_str()) {
                return Err(CatalogError::Parse(format!(
                    "Duplicate reference genome id: {}",
                    genome.id
                )));
            }
        }

        Ok(config)
    }

    /// FASTA path of a genome entry, resolved against the catalog directory
    pub fn fasta_path(&self, source: &GenomeSource) -> PathBuf {
        if source.fasta.is_absolute() {
            source.fasta.clone()
        } else {
            self.base_dir.join(&source.fasta)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_from_json() {
        let json = r#"{"version": "1.0.0", "genomes": [{"id": "hg38", "fasta": "hg38.fa"}]}"#;
        let config = CatalogConfig::from_json(json).unwrap();
        assert_eq!(config.genomes.len(), 1);
        assert_eq!(config.genomes[0].id, "hg38");
    }

    #[test]
    fn test_config_rejects_duplicate_genomes() {
        let json = r#"{"version": "1.0.0", "genomes": [
            {"id": "hg38", "fasta": "a.fa"},
            {"id": "hg38", "fasta": "b.fa"}
        ]}"#;
        assert!(matches!(
            CatalogConfig::from_json(json),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        assert!(matches!(
            CatalogConfig::from_json("{\"version\": "),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_config_resolves_relative_paths() {
        let mut temp = NamedTempFile::with_suffix(".json").unwrap();
        temp.write_all(
            br#"{"version": "1.0.0", "genomes": [
                {"id": "rel", "fasta": "rel.fa"},
                {"id": "abs", "fasta": "/data/abs.fa"}
            ]}"#,
        )
        .unwrap();
        temp.flush().unwrap();

        let config = CatalogConfig::load_from_file(temp.path()).unwrap();
        let dir = temp.path().parent().unwrap();
        assert_eq!(config.fasta_path(&config.genomes[0]), dir.join("rel.fa"));
        assert_eq!(
            config.fasta_path(&config.genomes[1]),
            PathBuf::from("/data/abs.fa")
        );
    }
}
