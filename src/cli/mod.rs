//! Command-line interface for bandscope.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **query**: Windowed neighborhood query over one or more BED tracks
//! - **sequence**: Bases around a coordinate, across contig boundaries
//! - **contigs**: List a genome's contigs in catalog order
//!
//! ## Usage
//!
//! ```text
//! # Bands covering chr1:1000 plus the 5 nearest borders on each side
//! bandscope query --fasta genome.fa --track genes.bed --coordinate chr1:1000
//!
//! # Same, across two tracks with a filter, as JSON
//! bandscope query --catalog catalog.json --genome hg38 \
//!     --track genes.bed --track peaks.bed --filter filter.json \
//!     --coordinate chr1:1,000 --left 2 --right 2 --format json
//!
//! # 20 bases either side of a contig end
//! bandscope sequence --fasta genome.fa --coordinate chr1:248956422 --prefix 20 --suffix 20
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::catalog::memory::InMemoryCatalog;
use crate::catalog::store::ReferenceCatalog;
use crate::core::coordinate::GenomicCoordinate;
use crate::parsing::fasta::is_fasta_file;

pub mod contigs;
pub mod query;
pub mod sequence;

#[derive(Parser)]
#[command(name = "bandscope")]
#[command(version)]
#[command(about = "Windowed neighborhood queries over genomic interval tracks")]
#[command(
    long_about = "bandscope answers windowed neighborhood queries over genomic interval data.\n\nGiven a coordinate on a reference genome it reports the bands covering it plus the bands on the nearest borders to its left and right, merged across independently indexed tracks. It can also print reference sequence around a coordinate, walking across contig boundaries."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bands around a coordinate, merged across tracks
    Query(query::QueryArgs),

    /// Reference bases around a coordinate
    Sequence(sequence::SequenceArgs),

    /// List contigs in catalog order
    Contigs(contigs::ContigsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Where reference genomes come from
#[derive(clap::Args, Debug)]
pub struct CatalogArgs {
    /// JSON genome catalog listing one FASTA per genome
    #[arg(long, conflicts_with = "fasta", required_unless_present = "fasta")]
    pub catalog: Option<PathBuf>,

    /// Single FASTA (optionally gzipped) used as the only genome
    #[arg(long)]
    pub fasta: Option<PathBuf>,

    /// Genome id; defaults to the only genome loaded, or the FASTA file stem
    #[arg(short, long)]
    pub genome: Option<String>,
}

impl CatalogArgs {
    /// Load the catalog and settle which genome coordinates refer to
    pub fn load(&self) -> anyhow::Result<(InMemoryCatalog, String)> {
        if let Some(fasta) = &self.fasta {
            if !is_fasta_file(fasta) {
                warn!("{} does not have a FASTA extension", fasta.display());
            }
            let genome = match &self.genome {
                Some(genome) => genome.clone(),
                None => fasta_stem(fasta)?,
            };
            let mut catalog = InMemoryCatalog::new();
            catalog
                .load_fasta(&genome, fasta)
                .with_context(|| format!("Failed to load {}", fasta.display()))?;
            return Ok((catalog, genome));
        }

        let path = self
            .catalog
            .as_ref()
            .ok_or_else(|| anyhow!("Either --catalog or --fasta is required"))?;
        let catalog = InMemoryCatalog::load_from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        info!("Loaded {} genomes from {}", catalog.len(), path.display());

        let genome = match &self.genome {
            Some(genome) => genome.clone(),
            None => {
                let genomes = catalog.reference_genomes()?;
                match genomes.as_slice() {
                    [only] => only.id().to_string(),
                    _ => bail!(
                        "Catalog holds {} genomes; choose one with --genome",
                        genomes.len()
                    ),
                }
            }
        };
        Ok((catalog, genome))
    }
}

/// FASTA file name without compression and FASTA extensions
fn fasta_stem(path: &Path) -> anyhow::Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Cannot derive a genome id from {}", path.display()))?;
    let mut stem = name;
    for ext in [".gz", ".bgz", ".fasta", ".fa", ".fna"] {
        if let Some(stripped) = stem.strip_suffix(ext) {
            stem = stripped;
        }
    }
    Ok(stem.to_string())
}

/// Parse a `contig:offset` argument on `genome`
pub fn parse_coordinate(text: &str, genome: &str) -> anyhow::Result<GenomicCoordinate> {
    GenomicCoordinate::parse(text, genome)
        .ok_or_else(|| anyhow!("Invalid coordinate '{}': expected contig:offset", text))
}
