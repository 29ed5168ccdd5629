use clap::Args;

use crate::catalog::cache::{CacheConfig, CachingCatalog, DEFAULT_WINDOW_RADIUS};
use crate::catalog::sequence::DispersedSequence;
use crate::catalog::store::ReferenceCatalog;
use crate::cli::{parse_coordinate, CatalogArgs, OutputFormat};

#[derive(Args)]
pub struct SequenceArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Coordinate as contig:offset
    #[arg(short, long)]
    pub coordinate: String,

    /// Bases to report before the coordinate
    #[arg(short, long, default_value = "10")]
    pub prefix: u64,

    /// Bases to report after the coordinate
    #[arg(short, long, default_value = "10")]
    pub suffix: u64,

    /// Bases buffered on each side of the coordinate
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_RADIUS)]
    pub window: u64,
}

pub fn run(args: SequenceArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (upstream, genome) = args.catalog.load()?;
    let catalog = CachingCatalog::with_config(
        upstream,
        CacheConfig {
            window_radius: args.window,
        },
    );

    let coord = parse_coordinate(&args.coordinate, &genome)?;
    let sequence = catalog.sequence(&coord, args.prefix, args.suffix)?;

    if verbose {
        let stats = catalog.stats();
        eprintln!(
            "{} fragments, cache hits {} misses {}",
            sequence.fragments().len(),
            stats.hits,
            stats.misses
        );
    }

    match format {
        OutputFormat::Text => println!("{}", sequence.sequence()),
        OutputFormat::Json => print_json(&args, &coord.to_string(), &sequence)?,
        OutputFormat::Tsv => print_tsv(&sequence),
    }

    Ok(())
}

fn print_json(
    args: &SequenceArgs,
    coord: &str,
    sequence: &DispersedSequence,
) -> anyhow::Result<()> {
    let fragments: Vec<serde_json::Value> = sequence
        .fragments()
        .iter()
        .map(|f| {
            serde_json::json!({
                "contig": f.contig.id(),
                "start": f.start,
                "end": f.end,
                "bases": f.bases,
            })
        })
        .collect();
    let output = serde_json::json!({
        "coordinate": coord,
        "prefix": args.prefix,
        "suffix": args.suffix,
        "sequence": sequence.sequence(),
        "fragments": fragments,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(sequence: &DispersedSequence) {
    println!("contig\tstart\tend\tbases");
    for f in sequence.fragments() {
        println!("{}\t{}\t{}\t{}", f.contig.id(), f.start, f.end, f.bases);
    }
}
